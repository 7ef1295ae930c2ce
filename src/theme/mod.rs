//! Theme module - visitor theme preference (light/dark and friends)

mod settings;

pub use settings::{ThemeOption, ThemeSettings};
