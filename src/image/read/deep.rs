//! Reading deep data from EXR files.
//!
//! Deep data (a variable number of samples per pixel) does not fit the fixed-stride
//! `FlatSamples` storage that the generic channel-reading builder accumulates into,
//! so it is read through the block-level API instead: `Reader::read_from_buffered`
//! together with `UncompressedDeepBlock::decompress_chunk`, or the convenience
//! wrapper `read_deep_from_file` below.

use crate::block::{ChunksReader, Reader, UncompressedDeepBlock};
use crate::error::Result;
use crate::meta::header::Header;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Whether any header in this file declares deep (non-flat) pixel data.
pub fn has_deep_data(headers: &[Header]) -> bool {
    headers.iter().any(|header| header.deep)
}

/// Read every deep block of a single-part deep file into memory.
///
/// `pedantic` rejects files with invalid chunks instead of trying to recover from them.
/// This loads the whole file at once; for very large deep images prefer driving
/// `Reader::read_from_buffered` directly and processing chunks as they arrive.
pub fn read_deep_from_file(path: impl AsRef<Path>, pedantic: bool) -> Result<Vec<UncompressedDeepBlock>> {
    let file = BufReader::new(File::open(path)?);
    let reader = Reader::read_from_buffered(file, pedantic)?;

    if !has_deep_data(reader.headers()) {
        return Err(crate::error::Error::invalid("file does not contain deep data"));
    }

    let mut chunks_reader = reader.all_chunks(pedantic)?;
    let mut blocks = Vec::with_capacity(chunks_reader.expected_chunk_count());

    while let Some(chunk) = chunks_reader.read_next_chunk() {
        let block = UncompressedDeepBlock::decompress_chunk(chunk?, chunks_reader.meta_data(), pedantic)?;
        blocks.push(block);
    }

    Ok(blocks)
}
