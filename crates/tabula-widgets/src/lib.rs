//! Data-table widgets for **tabula**.
//!
//! [`DataTable`](data_table::DataTable) is the main component. The pieces it
//! is built from are usable on their own: every widget implements
//! [`tabula_core::Component`], and the helpers are plain types.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`data_table`] | Paginated, sortable table with a filter bar and settle delay |
//! | [`filter_bar`] | Per-column filter buttons with a single open menu |
//!
//! # Building blocks
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pager`] | Page arithmetic and collapsed page-button layout |
//! | [`sorter`] | Stable column sort over a row permutation |
//! | [`format`] | Type-aware cell text: dates, floats, affixes, placeholder |
//! | [`header`] | Column declarations, loadable from JSON |
//! | [`value`] | Loosely typed cell values and rows |
//! | [`key`] | Key-binding helpers |
//! | [`error`] | [`TableError`](error::TableError) |

pub mod data_table;
pub mod error;
pub mod filter_bar;
pub mod format;
pub mod header;
pub mod key;
pub mod pager;
pub mod sorter;
pub mod value;

pub use data_table::{DataTable, TableOptions};
pub use error::TableError;
pub use header::{ColumnHeader, ColumnType};
pub use value::{Row, Value};
