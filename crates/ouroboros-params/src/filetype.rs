//! Content sniffing for uploaded streams
//!
//! Formats are recognised from their magic bytes; only the first
//! [`SNIFF_LEN`] bytes are read. Every function leaves the stream at its
//! start on success.

use std::io::{self, BufReader, Read, Seek, SeekFrom};

use image::{ImageError, ImageFormat, ImageReader};

use crate::errors::{ContentError, ErrorKind};

/// Number of leading bytes inspected to recognise a format
pub const SNIFF_LEN: u64 = 512;

/// Image formats accepted by the `image` flag unless configured otherwise
pub const DEFAULT_IMAGE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Fallback mime type for unrecognised content
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Recognise the image format of a stream
pub fn sniff<R>(stream: &mut R) -> io::Result<Option<ImageFormat>>
where
    R: Read + Seek + ?Sized,
{
    stream.seek(SeekFrom::Start(0))?;
    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    (&mut *stream).take(SNIFF_LEN).read_to_end(&mut head)?;
    stream.seek(SeekFrom::Start(0))?;

    Ok(image::guess_format(&head).ok())
}

/// Mime type of a stream, `application/octet-stream` when the content is
/// not a known image format
pub fn mime_type<R>(stream: &mut R) -> io::Result<String>
where
    R: Read + Seek + ?Sized,
{
    let mime = match sniff(stream)? {
        Some(format) => format.to_mime_type(),
        None => OCTET_STREAM,
    };
    Ok(mime.to_string())
}

/// Mime type of a stream that must hold an image in one of `accepted`.
///
/// The header is decoded to tell a truncated or corrupted image apart from
/// content that is not an accepted image at all. An accepted format this
/// build has no decoder for is reported as unsupported.
pub(crate) fn image_mime_type<R>(
    stream: &mut R,
    accepted: &[ImageFormat],
) -> Result<String, ContentError>
where
    R: Read + Seek + ?Sized,
{
    let format = match sniff(stream)? {
        Some(format) if accepted.contains(&format) => format,
        _ => return Err(ContentError::Invalid(ErrorKind::UnsupportedImageFormat)),
    };

    let decoded = ImageReader::with_format(BufReader::new(&mut *stream), format).into_dimensions();
    stream.seek(SeekFrom::Start(0))?;
    match decoded {
        Ok(_) => Ok(format.to_mime_type().to_string()),
        Err(ImageError::Unsupported(_)) => {
            Err(ContentError::Invalid(ErrorKind::UnsupportedImageFormat))
        }
        Err(_) => Err(ContentError::Invalid(ErrorKind::InvalidImage)),
    }
}
