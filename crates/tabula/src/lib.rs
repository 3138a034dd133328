//! **tabula** -- paginated, sortable data tables for [`ratatui`].
//!
//! Umbrella crate re-exporting everything needed from a single dependency:
//!
//! ```toml
//! [dependencies]
//! tabula = "0.1"
//! ```
//!
//! * Items from [`tabula_core`] sit at the crate root ([`Component`],
//!   [`Command`], [`Latency`]).
//! * The [`widgets`] module re-exports [`tabula_widgets`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so hosts do
//!   not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use tabula::widgets::{rows_from_json, headers_from_json, DataTable};
//! use tabula::Component;
//!
//! let headers = headers_from_json(HEADERS_JSON)?;
//! let rows = rows_from_json(ROWS_JSON)?;
//! let mut table = DataTable::new(headers, rows).with_title("Inventory");
//! table.focus();
//!
//! // In the host loop: forward keys, run returned commands, draw.
//! let cmd = table.update(tabula::widgets::data_table::Message::KeyPress(key));
//! terminal.draw(|f| table.view(f, f.area()))?;
//! ```

pub use tabula_core::*;
pub mod widgets {
    pub use tabula_widgets::*;
    pub use tabula_widgets::header::headers_from_json;
    pub use tabula_widgets::value::rows_from_json;
}

// Re-export dependencies for downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
