pub mod revise;

pub use revise::export_revise_csv;
