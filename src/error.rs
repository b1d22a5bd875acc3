// Error types module

use thiserror::Error;

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::resources::ResourceError;

/// Top-level error for editor operations.
///
/// Rendering itself never fails; these come from loading, encoding and
/// configuration.
#[derive(Error, Debug)]
pub enum MemeError {
    /// Template image, watermark or font could not be loaded
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// PNG encoding or writing the export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation needs a template image and none is selected
    #[error("No template image selected")]
    NoImage,
}

pub type Result<T> = std::result::Result<T, MemeError>;
