pub mod cleanup;
pub mod discover;
pub mod rows;

pub use cleanup::clean_feed;
pub use discover::discover_input_file;
pub use rows::{RowRejection, FEED_V1};
