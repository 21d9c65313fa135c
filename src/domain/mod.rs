pub mod changes;
pub mod listing;
