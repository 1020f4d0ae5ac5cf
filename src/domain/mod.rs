pub mod cursor;
pub mod models;
