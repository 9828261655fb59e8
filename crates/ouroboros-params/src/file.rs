//! Uploaded files
//!
//! File fields are never read from a source map. Their content is resolved by
//! name through a caller supplied [`FileProvider`], typically backed by a
//! parsed multipart body.

use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

use image::ImageFormat;
use thiserror::Error;
use tracing::debug;

use crate::errors::{ContentError, ErrorKind, FieldError, ParamsError, ParamsResult};
use crate::field::FieldDescriptor;
use crate::value::Bindable;

// ============================================================================
// File Types
// ============================================================================

/// A seekable byte stream
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Metadata sent along with an uploaded file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeader {
    /// Original filename
    pub filename: String,
    /// Declared size in bytes
    pub size: u64,
    /// Declared content type
    pub content_type: Option<String>,
}

impl FileHeader {
    /// Create a header for `filename`
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            size,
            content_type: None,
        }
    }

    /// Set the declared content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A validated upload bound to a record field
///
/// The stream is positioned at its start when the field is set.
pub struct FormFile {
    /// File content
    pub file: Box<dyn ReadSeek + Send>,
    /// Metadata sent by the client
    pub header: FileHeader,
    /// Detected mime type; empty unless the content was checked
    pub mime: String,
}

impl FormFile {
    /// Read the whole content from the start
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut content = Vec::new();
        self.file.read_to_end(&mut content)?;
        Ok(content)
    }
}

impl fmt::Debug for FormFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFile")
            .field("header", &self.header)
            .field("mime", &self.mime)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Errors returned by a [`FileProvider`]
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No file was sent under the requested name
    #[error("no such file")]
    MissingFile,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Other(Box<dyn StdError + Send + Sync>),
}

/// Resolves uploaded files by field name
pub trait FileProvider {
    /// Open the file sent under `name`.
    ///
    /// Returns [`ProviderError::MissingFile`] when nothing was sent.
    fn form_file(&self, name: &str)
        -> Result<(Box<dyn ReadSeek + Send>, FileHeader), ProviderError>;
}

// ============================================================================
// File Slot
// ============================================================================

/// Binds an uploaded file to a file field
pub struct FileSlot<'a> {
    descriptor: &'a FieldDescriptor,
    target: &'a mut dyn Bindable,
}

impl<'a> FileSlot<'a> {
    pub fn new(descriptor: &'a FieldDescriptor, target: &'a mut dyn Bindable) -> Self {
        Self { descriptor, target }
    }

    /// Resolve the field's file through `provider` and store it.
    ///
    /// A missing file is only an error when the field is required. Without a
    /// provider every file counts as missing. Provider and stream failures
    /// are returned unchanged.
    pub fn set_file(
        &mut self,
        provider: Option<&dyn FileProvider>,
        formats: &[ImageFormat],
    ) -> ParamsResult<()> {
        let descriptor = self.descriptor;
        if descriptor.is_ignored() {
            return Ok(());
        }

        let kind = self.target.kind();
        let slot = self
            .target
            .as_file_mut()
            .ok_or(ParamsError::WrongType {
                field: descriptor.name,
                found: kind,
            })?;

        let key = descriptor.key();
        let resolved = match provider {
            Some(provider) => provider.form_file(key),
            None => Err(ProviderError::MissingFile),
        };

        let (mut file, header) = match resolved {
            Ok(resolved) => resolved,
            Err(ProviderError::MissingFile) => {
                if descriptor.rules.required {
                    return Err(FieldError::new(key, ErrorKind::MissingParameter).into());
                }
                debug!("no file sent for field {}", key);
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let size = file.seek(SeekFrom::End(0))?;
        file.seek(SeekFrom::Start(0))?;
        if size == 0 {
            return Err(FieldError::new(key, ErrorKind::EmptyFile).into());
        }

        let mime = descriptor
            .rules
            .validate_file_content_with(&mut *file, formats)
            .map_err(|err| match err {
                ContentError::Io(err) => ParamsError::Io(err),
                ContentError::Invalid(kind) => FieldError::new(key, kind).into(),
            })?;

        debug!("bound file {:?} ({} bytes) to field {}", header.filename, size, key);
        *slot = Some(FormFile { file, header, mime });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_form_file_read_all() {
        let mut file = FormFile {
            file: Box::new(Cursor::new(b"content".to_vec())),
            header: FileHeader::new("notes.txt", 7),
            mime: String::new(),
        };
        assert_eq!(file.read_all().unwrap(), b"content");
        // Reading twice starts over
        assert_eq!(file.read_all().unwrap(), b"content");
    }

    #[test]
    fn test_form_file_debug_hides_stream() {
        let file = FormFile {
            file: Box::new(Cursor::new(Vec::<u8>::new())),
            header: FileHeader::new("a.png", 0).with_content_type("image/png"),
            mime: "image/png".to_string(),
        };
        let debug = format!("{:?}", file);
        assert!(debug.contains("a.png"));
        assert!(debug.ends_with(".. }"));
    }

    #[test]
    fn test_provider_error_display() {
        assert_eq!(ProviderError::MissingFile.to_string(), "no such file");
        let err = ProviderError::Other("multipart body is corrupted".into());
        assert_eq!(err.to_string(), "multipart body is corrupted");
    }
}
