// ==========================================
// Wood QC Report - Header images
// ==========================================
// JPEG only: the file is embedded as-is (DCTDecode) after reading
// its frame header for size and colour components.
// ==========================================

use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported image format: {0} (only baseline/progressive JPEG)")]
    Unsupported(String),

    #[error("corrupt JPEG: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub width_px: u32,
    pub height_px: u32,
    pub components: u8,
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    pub fn load(path: &Path) -> Result<Self, ImageError> {
        let data = fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_jpeg(data)
    }

    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
            return Err(ImageError::Unsupported("missing JPEG SOI marker".to_string()));
        }

        let mut pos = 2;
        while pos + 4 <= data.len() {
            if data[pos] != 0xFF {
                return Err(ImageError::Corrupt(format!("expected marker at byte {}", pos)));
            }
            let marker = data[pos + 1];
            // fill bytes and standalone markers carry no length
            if marker == 0xFF {
                pos += 1;
                continue;
            }
            if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
                pos += 2;
                continue;
            }

            let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
            if length < 2 || pos + 2 + length > data.len() {
                return Err(ImageError::Corrupt("segment runs past end of file".to_string()));
            }

            if is_start_of_frame(marker) {
                let segment = &data[pos + 4..pos + 2 + length];
                if segment.len() < 6 {
                    return Err(ImageError::Corrupt("short frame header".to_string()));
                }
                let height_px = u16::from_be_bytes([segment[1], segment[2]]) as u32;
                let width_px = u16::from_be_bytes([segment[3], segment[4]]) as u32;
                let components = segment[5];
                if width_px == 0 || height_px == 0 {
                    return Err(ImageError::Corrupt("zero image dimension".to_string()));
                }
                if !matches!(components, 1 | 3 | 4) {
                    return Err(ImageError::Unsupported(format!("{} colour components", components)));
                }
                return Ok(Self {
                    width_px,
                    height_px,
                    components,
                    data,
                });
            }

            pos += 2 + length;
        }

        Err(ImageError::Corrupt("no frame header found".to_string()))
    }

    pub fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }

    /// Height for a given drawn width, keeping the aspect ratio.
    pub fn height_for_width(&self, width: f64) -> f64 {
        width * self.height_px as f64 / self.width_px as f64
    }
}

/// SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC).
fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal marker skeleton: SOI, APP0, SOF0 (w × h, 3 components), EOI.
    pub(crate) fn tiny_jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[1, 1, 0, 0, 1, 0, 1, 0, 0]);
        data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 8]);
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn test_reads_frame_header() {
        let image = EmbeddedImage::from_jpeg(tiny_jpeg(200, 80)).unwrap();
        assert_eq!(image.width_px, 200);
        assert_eq!(image.height_px, 80);
        assert_eq!(image.color_space(), "DeviceRGB");
        assert!((image.height_for_width(25.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_jpeg() {
        let png_magic = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(matches!(
            EmbeddedImage::from_jpeg(png_magic),
            Err(ImageError::Unsupported(_))
        ));
    }

    #[test]
    fn test_truncated_jpeg_is_corrupt() {
        let mut data = tiny_jpeg(10, 10);
        data.truncate(12);
        assert!(EmbeddedImage::from_jpeg(data).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EmbeddedImage::load(Path::new("no_such_logo.jpg")),
            Err(ImageError::Read { .. })
        ));
    }
}
