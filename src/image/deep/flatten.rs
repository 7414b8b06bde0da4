//! Deep-to-flat conversion utilities.
//!
//! Composites multiple deep images into a single flat RGBA image,
//! handling spatial alignment via data windows.

use crate::block::UncompressedDeepBlock;
use crate::image::deep::compositing::*;
use crate::image::deep::merge::*;
use crate::math::Vec2;
use crate::meta::attribute::IntegerBounds;
use std::collections::HashMap;

/// Represents a flat RGBA pixel
#[derive(Debug, Clone, Copy)]
pub struct FlatPixel {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for FlatPixel {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 0.0,
        }
    }
}

/// A deep image source with its spatial bounds
pub struct DeepImageSource {
    /// The blocks containing deep data
    pub blocks: Vec<UncompressedDeepBlock>,
    /// Data window (spatial extent) for this image
    pub data_window: IntegerBounds,
    /// A label identifying this source, used only for diagnostics
    pub label: String,
    /// Name of each channel, in the on-disk channel order
    pub channel_names: Vec<String>,
    /// Sample type of each channel, in the on-disk channel order
    pub channel_types: Vec<crate::meta::attribute::SampleType>,
}

impl DeepImageSource {
    /// Index of a named channel within `channel_names`, if present.
    fn channel_index(&self, name: &str) -> Option<usize> {
        self.channel_names.iter().position(|channel| channel == name)
    }
}

/// Compute the union of multiple data windows
pub fn union_of_windows(windows: &[IntegerBounds]) -> IntegerBounds {
    if windows.is_empty() {
        return IntegerBounds {
            position: Vec2(0, 0),
            size: Vec2(0, 0),
        };
    }

    let mut min_x = windows[0].position.x();
    let mut min_y = windows[0].position.y();
    let mut max_x = windows[0].position.x() + windows[0].size.x() as i32;
    let mut max_y = windows[0].position.y() + windows[0].size.y() as i32;

    for window in &windows[1..] {
        min_x = min_x.min(window.position.x());
        min_y = min_y.min(window.position.y());
        max_x = max_x.max(window.position.x() + window.size.x() as i32);
        max_y = max_y.max(window.position.y() + window.size.y() as i32);
    }

    IntegerBounds {
        position: Vec2(min_x, min_y),
        size: Vec2((max_x - min_x) as usize, (max_y - min_y) as usize),
    }
}

/// Composite multiple deep images into a flat RGBA image
///
/// This handles spatial alignment by:
/// 1. Computing the union of all data windows (or using `output_window` if given)
/// 2. For each pixel in that window, collecting samples from all sources
/// 3. Compositing using front-to-back Over operator
///
/// ## Arguments
///
/// * `sources` - Vector of deep image sources with their data windows
/// * `output_window` - Overrides the computed union, in case the caller wants
///   the result cropped or expanded to a specific window (for example, to
///   match a reference image's data window exactly)
///
/// ## Returns
///
/// A tuple of (flat pixels, composite data window)
pub fn composite_deep_to_flat(
    sources: &[DeepImageSource],
    output_window: Option<IntegerBounds>,
) -> (Vec<FlatPixel>, IntegerBounds) {
    let windows: Vec<_> = sources.iter().map(|s| s.data_window).collect();
    let union = output_window.unwrap_or_else(|| union_of_windows(&windows));

    let width = union.size.x();
    let height = union.size.y();
    let mut flat_pixels = vec![FlatPixel::default(); width * height];

    for y in 0..height {
        let global_y = union.position.y() + y as i32;

        for x in 0..width {
            let global_x = union.position.x() + x as i32;
            let mut all_samples = Vec::new();

            for source in sources {
                let local_x = global_x - source.data_window.position.x();
                let local_y = global_y - source.data_window.position.y();

                if local_x < 0
                    || local_y < 0
                    || (local_x as usize) >= source.data_window.size.x()
                    || (local_y as usize) >= source.data_window.size.y()
                {
                    continue;
                }

                let local_x = local_x as usize;
                let local_y = local_y as usize;

                let block = source.blocks.iter().find(|block| {
                    let block_y_start = block.index.pixel_position.y();
                    let block_y_end = block_y_start + block.index.pixel_size.y();
                    local_y >= block_y_start && local_y < block_y_end
                });

                let block = match block { Some(block) => block, None => continue };

                let block_row = local_y - block.index.pixel_position.y();
                let block_width = block.index.pixel_size.x();
                let pixel_idx = block_row * block_width + local_x;

                let raw_samples = extract_pixel_samples_typed(block, pixel_idx, &source.channel_types);

                let r_idx = source.channel_index("R");
                let g_idx = source.channel_index("G");
                let b_idx = source.channel_index("B");
                let a_idx = source.channel_index("A");
                let z_idx = source.channel_index("Z");

                for sample in raw_samples {
                    let channel = |index: Option<usize>| index.and_then(|i| sample.get(i).copied());
                    let r = channel(r_idx).unwrap_or(0.0);
                    let g = channel(g_idx).unwrap_or(0.0);
                    let b = channel(b_idx).unwrap_or(0.0);
                    let alpha = channel(a_idx).unwrap_or(1.0);
                    let depth = channel(z_idx).unwrap_or(0.0);

                    all_samples.push(DeepSample::new_unpremultiplied(depth, [r, g, b], alpha));
                }
            }

            // Sort and composite
            make_tidy(&mut all_samples);
            let (color, alpha) = composite_samples_front_to_back(&all_samples);

            // Unpremultiply for output
            let flat_idx = y * width + x;
            flat_pixels[flat_idx] = if alpha > 0.0001 {
                FlatPixel {
                    r: color[0] / alpha,
                    g: color[1] / alpha,
                    b: color[2] / alpha,
                    a: alpha,
                }
            } else {
                FlatPixel::default()
            };
        }
    }

    (flat_pixels, union)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_windows() {
        let windows = vec![
            IntegerBounds {
                position: Vec2(0, 0),
                size: Vec2(100, 100),
            },
            IntegerBounds {
                position: Vec2(50, 50),
                size: Vec2(100, 100),
            },
        ];

        let union = union_of_windows(&windows);
        assert_eq!(union.position, Vec2(0, 0));
        assert_eq!(union.size, Vec2(150, 150));
    }

    #[test]
    fn test_union_with_negative_offsets() {
        let windows = vec![
            IntegerBounds {
                position: Vec2(-50, -50),
                size: Vec2(100, 100),
            },
            IntegerBounds {
                position: Vec2(0, 0),
                size: Vec2(100, 100),
            },
        ];

        let union = union_of_windows(&windows);
        assert_eq!(union.position, Vec2(-50, -50));
        assert_eq!(union.size, Vec2(150, 150));
    }
}
