//! How to read samples (a grid of `f16`, `f32` or `u32` values).

use crate::block::chunk::TileCoordinates;
use crate::block::lines::LineRef;
use crate::error::{Result, UnitResult};
use crate::image::read::any_channels::{ReadSamples, SamplesReader};
use crate::image::read::levels::ReadSamplesLevel;
use crate::image::FlatSamples;
use crate::math::Vec2;
use crate::meta::attribute::{ChannelDescription, SampleType};
use crate::meta::header::Header;
use half::f16;

/// Specify to read only the samples of the current resolution level, ignoring any deep data.
/// Can be configured using `ReadAllLevels` to also load smaller resolution levels.
/// Create this using `ReadBuilder::no_deep_data()`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct ReadFlatSamples;

/// Processes pixel blocks from a file and accumulates them into a single flat channel.
#[derive(Clone, PartialEq, Debug)]
pub struct FlatSamplesReader {
    resolution: Vec2<usize>, // respects resolution level
    level: Vec2<usize>,
    samples: FlatSamples,
}

impl ReadSamples for ReadFlatSamples {
    type Reader = FlatSamplesReader;

    fn create_sample_reader(&self, header: &Header, channel: &ChannelDescription) -> Result<Self::Reader> {
        self.create_samples_level_reader(header, channel, Vec2(0, 0), header.layer_size / channel.sampling)
    }
}

impl ReadSamplesLevel for ReadFlatSamples {
    type Reader = FlatSamplesReader;

    fn create_samples_level_reader(
        &self, _header: &Header, channel: &ChannelDescription, level: Vec2<usize>, resolution: Vec2<usize>
    ) -> Result<Self::Reader> {
        Ok(FlatSamplesReader {
            resolution, level,
            samples: allocate_flat_samples(channel.sample_type, resolution),
        })
    }
}

fn allocate_flat_samples(sample_type: SampleType, resolution: Vec2<usize>) -> FlatSamples {
    let count = resolution.area();
    debug_assert!(count < 1920 * 20 * 1920 * 20, "suspiciously large image: {} mega pixels", count / 1_000_000);

    match sample_type {
        SampleType::F16 => FlatSamples::F16(vec![f16::ZERO; count]),
        SampleType::F32 => FlatSamples::F32(vec![0.0; count]),
        SampleType::U32 => FlatSamples::U32(vec![0; count]),
    }
}

impl SamplesReader for FlatSamplesReader {
    type Samples = FlatSamples;

    fn is_block_desired(&self, tile: TileCoordinates) -> bool {
        tile.level_index == self.level
    }

    fn read_line(&mut self, line: LineRef<'_>) -> UnitResult {
        let image_width = self.resolution.width();
        debug_assert_ne!(image_width, 0, "image width calculation bug");

        let start_index = line.location.position.y() * image_width + line.location.position.x();
        let end_index = start_index + line.location.sample_count;

        match &mut self.samples {
            FlatSamples::F16(samples) => line.read_samples_into_slice(&mut samples[start_index .. end_index]),
            FlatSamples::F32(samples) => line.read_samples_into_slice(&mut samples[start_index .. end_index]),
            FlatSamples::U32(samples) => line.read_samples_into_slice(&mut samples[start_index .. end_index]),
        }
    }

    fn into_samples(self) -> FlatSamples {
        self.samples
    }
}

/// Specify to read deep data, where each pixel may store any number of samples.
/// Currently only supported through the block-level API,
/// via `UncompressedDeepBlock::decompress_chunk`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct ReadDeepSamples;
