//! Compare two decoded images for approximate equality.
//!
//! Used by integration tests to confirm that a compressor round-trips an
//! image within its documented tolerance (exact for lossless codecs, bounded
//! for lossy ones).

use crate::image::{AnyChannel, AnyChannels, FlatSamples, Image, Layer};
use half::f16;

/// Compares two decoded images channel by channel, allowing lossy codecs a
/// small per-sample tolerance.
pub trait ValidateImageResult {
    /// Returns true if `self` and `other` have the same channels and layer
    /// size, and every sample is within `tolerance` of its counterpart.
    fn validate_image_result(&self, other: &Self, tolerance: f32) -> bool;
}

impl ValidateImageResult for Image<Layer<AnyChannels<FlatSamples>>> {
    fn validate_image_result(&self, other: &Self, tolerance: f32) -> bool {
        self.layer_data.validate_image_result(&other.layer_data, tolerance)
    }
}

impl ValidateImageResult for Layer<AnyChannels<FlatSamples>> {
    fn validate_image_result(&self, other: &Self, tolerance: f32) -> bool {
        if self.size != other.size {
            eprintln!("size mismatch: {:?} != {:?}", self.size, other.size);
            return false;
        }

        self.channel_data.validate_image_result(&other.channel_data, tolerance)
    }
}

impl ValidateImageResult for AnyChannels<FlatSamples> {
    fn validate_image_result(&self, other: &Self, tolerance: f32) -> bool {
        if self.list.len() != other.list.len() {
            eprintln!("channel count mismatch: {} != {}", self.list.len(), other.list.len());
            return false;
        }

        self.list.iter().zip(other.list.iter())
            .all(|(own, other)| own.validate_image_result(other, tolerance))
    }
}

impl ValidateImageResult for AnyChannel<FlatSamples> {
    fn validate_image_result(&self, other: &Self, tolerance: f32) -> bool {
        if self.name != other.name {
            eprintln!("channel name mismatch: {} != {}", self.name, other.name);
            return false;
        }

        self.sample_data.validate_image_result(&other.sample_data, tolerance)
    }
}

impl ValidateImageResult for FlatSamples {
    fn validate_image_result(&self, other: &Self, tolerance: f32) -> bool {
        match (self, other) {
            (FlatSamples::F16(own), FlatSamples::F16(other)) => {
                compare_approx(own.iter().map(|sample| sample.to_f32()), other.iter().map(|sample: &f16| sample.to_f32()), tolerance)
            },

            (FlatSamples::F32(own), FlatSamples::F32(other)) => {
                compare_approx(own.iter().copied(), other.iter().copied(), tolerance)
            },

            (FlatSamples::U32(own), FlatSamples::U32(other)) => {
                own.len() == other.len() && own.iter().zip(other.iter()).all(|(a, b)| a == b)
            },

            _ => {
                eprintln!("sample type mismatch between compared channels");
                false
            }
        }
    }
}

fn compare_approx(own: impl ExactSizeIterator<Item = f32>, other: impl ExactSizeIterator<Item = f32>, tolerance: f32) -> bool {
    if own.len() != other.len() {
        eprintln!("sample count mismatch: {} != {}", own.len(), other.len());
        return false;
    }

    own.zip(other).all(|(a, b)| (a - b).abs() <= tolerance || (a.is_nan() && b.is_nan()))
}
