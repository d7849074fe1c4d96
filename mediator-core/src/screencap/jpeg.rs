//! JPEG frame encoder backed by the `image` crate.

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::error::MediatorError;
use crate::screencap::buffer::FrameBuffer;
use crate::screencap::device::FrameEncoder;
use crate::screencap::types::{PixelFormat, RawScreenFrame};

/// Lossy JPEG encoder for captured screens.
///
/// Captured frames are usually 4 bytes per pixel; JPEG wants packed RGB,
/// so pixels are converted into a scratch buffer that is kept between
/// frames.
#[derive(Debug, Default)]
pub struct JpegFrameEncoder {
    scratch: Vec<u8>,
}

impl JpegFrameEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pack `image` into tightly laid out RGB in `self.scratch`.
    fn to_rgb(&mut self, image: &RawScreenFrame) -> Result<(), MediatorError> {
        let bpp = image.format.bytes_per_pixel();
        let row_bytes = image.width as usize * bpp;
        if (image.stride as usize) < row_bytes || image.data.len() < image.byte_len() {
            return Err(MediatorError::Encode(format!(
                "raw frame too small: {} bytes for {}x{} stride {}",
                image.data.len(),
                image.width,
                image.height,
                image.stride
            )));
        }

        self.scratch.clear();
        self.scratch
            .reserve(image.width as usize * image.height as usize * 3);

        for y in 0..image.height {
            let row = image.row(y);
            match image.format {
                PixelFormat::Rgb8 => self.scratch.extend_from_slice(row),
                PixelFormat::Rgba8 => {
                    for px in row.chunks_exact(4) {
                        self.scratch.extend_from_slice(&px[..3]);
                    }
                }
                PixelFormat::Bgra8 => {
                    for px in row.chunks_exact(4) {
                        self.scratch.extend_from_slice(&[px[2], px[1], px[0]]);
                    }
                }
            }
        }
        Ok(())
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(
        &mut self,
        sink: &mut FrameBuffer,
        image: &RawScreenFrame,
        quality: u8,
    ) -> Result<(), MediatorError> {
        if image.width == 0 || image.height == 0 {
            return Err(MediatorError::Encode("empty image".into()));
        }
        self.to_rgb(image)?;

        let mut encoder = JpegEncoder::new_with_quality(sink, quality.clamp(1, 100));
        encoder.encode(
            &self.scratch,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32, format: PixelFormat) -> RawScreenFrame {
        let bpp = format.bytes_per_pixel();
        let mut data = Vec::with_capacity(width as usize * height as usize * bpp);
        for y in 0..height {
            for x in 0..width {
                let px = [(x * 4) as u8, (y * 4) as u8, 128, 255];
                data.extend_from_slice(&px[..bpp]);
            }
        }
        RawScreenFrame::packed(width, height, format, data)
    }

    #[test]
    fn encodes_jpeg_markers() {
        let mut enc = JpegFrameEncoder::new();
        let mut sink = FrameBuffer::new();
        enc.encode(&mut sink, &gradient(64, 48, PixelFormat::Rgba8), 80)
            .unwrap();
        let bytes = sink.as_bytes();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn bgra_is_swizzled() {
        let mut enc = JpegFrameEncoder::new();
        let raw = RawScreenFrame::packed(1, 1, PixelFormat::Bgra8, vec![10, 20, 30, 255]);
        enc.to_rgb(&raw).unwrap();
        assert_eq!(enc.scratch, vec![30, 20, 10]);
    }

    #[test]
    fn lower_quality_is_smaller() {
        let image = gradient(128, 128, PixelFormat::Rgb8);
        let mut enc = JpegFrameEncoder::new();

        let mut low = FrameBuffer::new();
        enc.encode(&mut low, &image, 10).unwrap();
        let mut high = FrameBuffer::new();
        enc.encode(&mut high, &image, 95).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn truncated_data_is_an_error() {
        let mut enc = JpegFrameEncoder::new();
        let mut sink = FrameBuffer::new();
        let raw = RawScreenFrame::packed(4, 4, PixelFormat::Rgba8, vec![0; 10]);
        let err = enc.encode(&mut sink, &raw, 80).unwrap_err();
        assert!(matches!(err, MediatorError::Encode(_)));
    }
}
