//! Seam for the image pipeline that prepares profile photos.

use thiserror::Error;

pub const DEFAULT_PHOTO_MAX_DIMENSION: u32 = 150;
pub const DEFAULT_PHOTO_QUALITY: f32 = 0.7;

#[derive(Debug, Error)]
#[error("Image could not be encoded: {0}")]
pub struct CodecError(pub String);

/// Turns raw image bytes into an embeddable, base64 encoded JPEG data URL.
pub trait ImageCodec: Send + Sync {
    fn encode_photo(&self, raw: &[u8], settings: PhotoSettings) -> Result<String, CodecError>;
}

/// Target size and compression for profile photos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoSettings {
    pub max_dimension: u32,
    pub quality: f32,
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_PHOTO_MAX_DIMENSION,
            quality: DEFAULT_PHOTO_QUALITY,
        }
    }
}

impl PhotoSettings {
    /// Scales `(width, height)` so the longer side is at most `max_dimension`,
    /// keeping the aspect ratio. Images already small enough are unchanged.
    pub fn fit(&self, width: u32, height: u32) -> (u32, u32) {
        let max = self.max_dimension;
        if width > height {
            if width > max {
                let scaled = (height as f64 * max as f64 / width as f64).round() as u32;
                return (max, scaled.max(1));
            }
        } else if height > max {
            let scaled = (width as f64 * max as f64 / height as f64).round() as u32;
            return (scaled.max(1), max);
        }
        (width, height)
    }
}
