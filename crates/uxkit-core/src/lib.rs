pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod research;
pub mod slash;
pub mod study;
pub mod templates;

pub use error::{Result, UxkitError};
