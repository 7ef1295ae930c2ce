//! Helper functions shared by the views and templates
//!
//! Escaping, char-safe truncation, date display and URL building.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
