

#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,

    missing_copy_implementations,
    missing_debug_implementations,

    clippy::all,
    clippy::restriction,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    missing_copy_implementations,
    trivial_numeric_casts,
    redundant_semicolon
)]

#![forbid(unsafe_code)]

// TODO #![warn(missing_docs)]


pub mod io; // public to allow for custom attribute byte parsing

pub mod math;
pub mod block;
pub mod compression;
pub mod meta;
pub mod image;
pub mod error;

#[macro_use]
extern crate smallvec;

#[cfg(test)]
extern crate image as piston_image;

/// Re-exports of all modules types commonly required for simple reading and writing of an exr image.
pub mod prelude {
    // main exports
    pub use crate::meta::MetaData;

    pub use crate::image::{read, write, FlatImage, AnyImage};
    pub use crate::image::{
        read_all_data_from_file, read_all_flat_layers_from_file,
        read_first_flat_layer_from_file, read_all_rgba_layers_from_file,
        read_first_rgba_layer_from_file,
    };
    pub use crate::image::WritableImage;
    pub use crate::block::samples::Sample;

    // core image data structures
    pub use crate::image::{
        Image, Layer, AnyChannels, AnyChannel, FlatSamples, SpecificChannels,
        Encoding, Blocks, RgbaChannels, RgbaSampleTypes, RgbaPixel, Levels, ContainsNaN,
    };

    // secondary data types
    pub use crate::meta;
    pub use crate::meta::attribute;
    pub use crate::error;
    pub use crate::block;
    pub use crate::image::pixel_vec;

    // re-export external stuff
    pub use half::f16;

    // export real types and attributes
    pub use crate::math::Vec2;
    pub use crate::compression::Compression;
    pub use attribute::{ Text, IntegerBounds };
    pub use error::{ Result, Error };
}



