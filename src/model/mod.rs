//! Data model for tabular data representation

pub mod column;
mod key;
mod table;

pub use column::ColumnRef;
pub use key::KeyIndex;
pub use table::{Row, Table};
