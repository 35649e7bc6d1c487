pub mod config;
pub mod error;
pub mod tolerance;
pub mod traits;

pub use config::EditorConfig;
pub use error::{EaselError, Result};
pub use tolerance::Tolerance;
