//! Output formatting for anchors.
//!
//! - Terminal: human-readable rule with colored headers
//! - JSON: machine-readable serialization

mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_anchor, format_rule};
