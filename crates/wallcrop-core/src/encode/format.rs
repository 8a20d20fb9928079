//! Output format selection.
//!
//! Only two raster formats are written. A requested `gif` is stored as PNG
//! since both are lossless; anything unrecognized becomes JPEG.

use std::fmt;

/// Quality used when a request does not specify one.
pub const DEFAULT_COMPRESS_QUALITY: u8 = 90;

/// Compressed format of the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

/// Canonical file extension for a requested format tag.
///
/// Returns `"png"` for `png` and `gif` (any case) and `"jpg"` for everything
/// else, including no format at all.
pub fn get_file_extension(requested: Option<&str>) -> &'static str {
    match requested.map(str::to_ascii_lowercase).as_deref() {
        Some("png") | Some("gif") => "png",
        _ => "jpg",
    }
}

impl OutputFormat {
    /// Map a canonical extension from [`get_file_extension`] to a format.
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("png") {
            OutputFormat::Png
        } else {
            OutputFormat::Jpeg
        }
    }

    /// Resolve the format for a request's optional format tag.
    pub fn for_request(requested: Option<&str>) -> Self {
        Self::from_extension(get_file_extension(requested))
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(get_file_extension(None), "jpg");
        assert_eq!(get_file_extension(Some("png")), "png");
        assert_eq!(get_file_extension(Some("PNG")), "png");
        assert_eq!(get_file_extension(Some("Gif")), "png");
        assert_eq!(get_file_extension(Some("jpeg")), "jpg");
        assert_eq!(get_file_extension(Some("webp")), "jpg");
        assert_eq!(get_file_extension(Some("")), "jpg");
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(OutputFormat::from_extension("png"), OutputFormat::Png);
        assert_eq!(OutputFormat::from_extension("jpg"), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_extension("gif"), OutputFormat::Jpeg);
    }

    #[test]
    fn test_for_request() {
        assert_eq!(OutputFormat::for_request(Some("GIF")), OutputFormat::Png);
        assert_eq!(OutputFormat::for_request(None), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::for_request(Some("bmp")), OutputFormat::Jpeg);
    }

    #[test]
    fn test_names() {
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Jpeg.to_string(), "jpg");
    }
}
