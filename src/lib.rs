// Memekit caption compositing library

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod export;
pub mod interaction;
pub mod logging;
pub mod render;
pub mod resources;

pub use editor::{MemeEditor, PreviewStatus};
pub use error::{MemeError, Result};
