//! A simple pixel storage that keeps all samples in one flat, row-major `Vec`.

use crate::image::write::channels::GetPixel;
use crate::image::read::rgba_channels::RgbaChannelsInfo;
use crate::image::ContainsNaN;
use crate::math::Vec2;

/// Store all samples for a layer in a single flat array, indexed by pixel position.
/// All pixels must have the same tuple type, for example `(f32, f32, f32)` for an RGB layer.
/// The vector contains one row after another, so its length always equals `resolution.area()`.
#[derive(Clone, PartialEq)]
pub struct PixelVec<Pixel> {

    /// The dimensions of the layer this pixel storage belongs to.
    pub resolution: Vec2<usize>,

    /// The flattened samples of all pixels of this layer, one row after another.
    pub pixels: Vec<Pixel>,
}

impl<Pixel: Sync + Copy> PixelVec<Pixel> {

    /// Create a new flat pixel storage, panicking if the pixel count does not match the resolution.
    pub fn new(resolution: impl Into<Vec2<usize>>, pixels: Vec<Pixel>) -> Self {
        let resolution = resolution.into();

        assert_eq!(
            resolution.area(), pixels.len(),
            "expected {} samples, but vector length is {}", resolution.area(), pixels.len()
        );

        Self { resolution, pixels }
    }

    /// Create a new pixel storage with each pixel initialized to the same value.
    pub fn constant(resolution: impl Into<Vec2<usize>>, pixel: Pixel) -> Self {
        let resolution = resolution.into();
        Self { resolution, pixels: vec![pixel; resolution.area()] }
    }

    /// Compute the flat index of the given pixel position within `pixels`.
    pub fn compute_pixel_index(&self, position: Vec2<usize>) -> usize {
        position.y() * self.resolution.width() + position.x()
    }
}

impl<Pixel: Sync + Copy + Default> PixelVec<Pixel> {

    /// Create a blank pixel storage sized to the channels being read.
    /// Can be used as a function reference wherever `collect_pixels` expects a constructor,
    /// for example `read().all_channels()...collect_pixels(PixelVec::constructor, PixelVec::set_pixel)`.
    pub fn constructor(resolution: Vec2<usize>, _channels: &impl Sync) -> Self {
        Self { resolution, pixels: vec![Pixel::default(); resolution.area()] }
    }

    /// Create a blank pixel storage sized to the rgba layer being read.
    /// Can be used as a function reference wherever `rgba_channels` expects a constructor,
    /// for example `read().all_channels()...rgba_channels(PixelVec::rgba_constructor, PixelVec::set_pixel)`.
    pub fn rgba_constructor(info: &RgbaChannelsInfo) -> Self {
        Self { resolution: info.resolution, pixels: vec![Pixel::default(); info.resolution.area()] }
    }
}

impl<Pixel: Sync + Copy> PixelVec<Pixel> {

    /// Update a single pixel in this storage. Accepts any value convertible into `Pixel`,
    /// so it works both with the plain tuples produced by `collect_pixels` and with the
    /// `RgbaPixel` values produced by `rgba_channels`.
    /// Can be used as a function reference, for example `PixelVec::set_pixel`.
    pub fn set_pixel<Value: Into<Pixel>>(image: &mut Self, position: Vec2<usize>, pixel: Value) {
        let index = image.compute_pixel_index(position);
        image.pixels[index] = pixel.into();
    }
}

impl<Pixel: Sync + Copy> GetPixel for PixelVec<Pixel> {
    type Pixel = Pixel;

    fn get_pixel(&self, position: Vec2<usize>) -> Pixel {
        self.pixels[self.compute_pixel_index(position)]
    }
}

impl<Pixel> ContainsNaN for PixelVec<Pixel> where Pixel: ContainsNaN {
    fn contains_nan_pixels(&self) -> bool {
        self.pixels.iter().any(|pixel| pixel.contains_nan_pixels())
    }
}

impl<T> std::fmt::Debug for PixelVec<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "PixelVec<{}>[{}]", std::any::type_name::<T>(), self.pixels.len())
    }
}
