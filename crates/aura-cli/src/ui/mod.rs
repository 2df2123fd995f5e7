//! UI primitives for the Aura CLI.
//!
//! - **Context**: terminal detection (TTY, width, color, unicode)
//! - **Mode**: output mode resolution (json, plain, pretty)
//! - **Theme**: badges, colors, mood symbols
//! - **Render**: headers, tables, receipts, hints, errors
//! - **Format**: dates, energy bars, truncation

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{badge, blank_line, header, hint, kv, print, print_error, receipt, table};
