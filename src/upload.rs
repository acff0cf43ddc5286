use image::ImageFormat;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("The uploaded file is empty.")]
    Empty,
    #[error("The uploaded file is not a valid PNG or JPEG image.")]
    Unsupported,
    #[error("The uploaded file is not a valid PNG or JPEG image.")]
    Decode(#[source] image::ImageError),
}

/// An upload that has been decoded successfully. The original bytes are what
/// gets sent to the provider.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl UploadedImage {
    /// Accepts PNG and JPEG only, sniffed from the content rather than the
    /// file name, and requires a full decode to succeed.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let format = image::guess_format(&bytes).map_err(|_| ImageError::Unsupported)?;
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(ImageError::Unsupported);
        }

        let img = image::load_from_memory_with_format(&bytes, format).map_err(ImageError::Decode)?;

        Ok(Self {
            width: img.width(),
            height: img.height(),
            bytes,
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        match self.format {
            ImageFormat::Png => "image/png",
            _ => "image/jpeg",
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    pub(crate) fn sample(format: ImageOutputFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 3, Rgb([200, 30, 30]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), format).unwrap();
        out
    }

    #[test]
    fn accepts_png() {
        let upload = UploadedImage::decode(sample(ImageOutputFormat::Png)).unwrap();
        assert_eq!(upload.mime_type(), "image/png");
        assert_eq!(upload.dimensions(), (4, 3));
    }

    #[test]
    fn accepts_jpeg_and_keeps_original_bytes() {
        let bytes = sample(ImageOutputFormat::Jpeg(85));
        let upload = UploadedImage::decode(bytes.clone()).unwrap();
        assert_eq!(upload.mime_type(), "image/jpeg");
        assert_eq!(upload.bytes(), bytes.as_slice());
    }

    #[test]
    fn rejects_other_formats() {
        let bmp = sample(ImageOutputFormat::Bmp);
        assert!(matches!(UploadedImage::decode(bmp), Err(ImageError::Unsupported)));
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert!(matches!(
            UploadedImage::decode(b"definitely not an image".to_vec()),
            Err(ImageError::Unsupported)
        ));
        assert!(matches!(UploadedImage::decode(Vec::new()), Err(ImageError::Empty)));
    }

    #[test]
    fn rejects_truncated_png() {
        let mut png = sample(ImageOutputFormat::Png);
        png.truncate(20);
        assert!(matches!(UploadedImage::decode(png), Err(ImageError::Decode(_))));
    }
}
