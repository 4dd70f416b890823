//! Services - table loading, type inference and export

pub mod export;
pub mod infer;
pub mod loader;

pub use export::write_csv;
pub use infer::infer_column_types;
pub use loader::load_table;
