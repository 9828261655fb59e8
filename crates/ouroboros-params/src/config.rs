//! Binder configuration

use image::ImageFormat;

use crate::filetype::DEFAULT_IMAGE_FORMATS;

/// Source name that marks a field as an uploaded file by default
pub const DEFAULT_FILE_SOURCE: &str = "file";

// ============================================================================
// Bind Config
// ============================================================================

/// Options for [`Binder`](crate::Binder) and [`extract_with_config`](crate::extract_with_config)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindConfig {
    /// Fields declared `from` this source are bound from the file provider
    pub file_source: String,

    /// Formats accepted by the `image` flag
    pub image_formats: Vec<ImageFormat>,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            file_source: DEFAULT_FILE_SOURCE.to_string(),
            image_formats: DEFAULT_IMAGE_FORMATS.to_vec(),
        }
    }
}

impl BindConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source name that marks file fields
    pub fn file_source(mut self, source: impl Into<String>) -> Self {
        self.file_source = source.into();
        self
    }

    /// Replace the accepted image formats
    pub fn image_formats(mut self, formats: Vec<ImageFormat>) -> Self {
        self.image_formats = formats;
        self
    }

    /// Accept one more image format
    pub fn allow_image_format(mut self, format: ImageFormat) -> Self {
        if !self.image_formats.contains(&format) {
            self.image_formats.push(format);
        }
        self
    }
}
