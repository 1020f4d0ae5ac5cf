pub mod fanout;
pub mod feed;
pub mod post_like;
pub mod post_read;
pub mod post_write;
pub mod timeline_read;

pub use fanout::FanoutService;
pub use feed::FeedService;
pub use post_like::PostLikeService;
pub use post_read::PostReadService;
pub use post_write::PostWriteService;
pub use timeline_read::TimelineReadService;
