//! Report Rendering
//!
//! Renders a recommendation for display:
//! - `text`: the human-readable result panel
//! - `json`: the serialized response

pub mod json;
pub mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;
