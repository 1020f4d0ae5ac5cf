//! Postgres implementations of the store ports.

pub mod follows;
pub mod likes;
pub mod posts;
pub mod timeline;

pub use follows::FollowRepository;
pub use likes::PostLikeRepository;
pub use posts::PostRepository;
pub use timeline::TimelineRepository;
