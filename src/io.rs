

pub use ::std::io::{Read, Write};
use half::slice::{HalfFloatSliceExt};
use lebe::prelude::*;
use ::half::f16;
use crate::error::{Error, Result, PassiveResult, IoResult};


pub fn skip_bytes(read: &mut impl Read, count: u64) -> PassiveResult {
    let skipped = std::io::copy(
        &mut read.by_ref().take(count),
        &mut std::io::sink()
    )?;

    debug_assert_eq!(skipped, count);
    Ok(())
}

#[inline]
pub fn positive_i32(value: i32, name: &'static str) -> Result<u32> {
    if value < 0 { Err(Error::invalid(name)) }
    else { Ok(value as u32) }
}

/// Create the file at `path` and pass it to `write`. If `write` returns an error,
/// the partially written file is deleted instead of being left around corrupted.
pub fn attempt_delete_file_on_write_error<T>(
    path: &std::path::Path, write: impl FnOnce(std::fs::File) -> Result<T>
) -> Result<T> {
    let file = std::fs::File::create(path)?;

    match write(file) {
        Ok(value) => Ok(value),
        Err(error) => {
            let _ = std::fs::remove_file(path); // ignore deletion errors, original error is more important
            Err(error)
        }
    }
}


/// Wraps a reader or writer and keeps track of how many bytes have passed through it so far.
/// Chunk offsets in the file are absolute byte positions, so every reader and writer that
/// participates in locating or rewriting a chunk needs to know its own position.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tracking<T> {
    inner: T,
    position: usize,
}

impl<T> Tracking<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, position: 0 }
    }

    /// The number of bytes read or written through this wrapper so far.
    pub fn byte_position(&self) -> usize {
        self.position
    }
}

impl<T: Read> Read for Tracking<T> {
    fn read(&mut self, target_buffer: &mut [u8]) -> IoResult<usize> {
        let count = self.inner.read(target_buffer)?;
        self.position += count;
        Ok(count)
    }
}

impl<T: Write> Write for Tracking<T> {
    fn write(&mut self, buffer: &[u8]) -> IoResult<usize> {
        let count = self.inner.write(buffer)?;
        self.position += count;
        Ok(count)
    }

    fn flush(&mut self) -> IoResult<()> {
        self.inner.flush()
    }
}

impl<T: Write + std::io::Seek> Tracking<T> {
    /// Move the write cursor to an absolute byte position, used to go back and patch
    /// the offset table once every chunk has been written, or to skip over it up front.
    /// Writes zero bytes when seeking past the current end of the stream, since most
    /// writers (like a freshly created file) do not contain any bytes to seek over yet.
    pub fn seek_write_to(&mut self, target_position: usize) -> PassiveResult {
        if target_position < self.position {
            self.inner.seek(std::io::SeekFrom::Start(target_position as u64))?;
        }
        else if target_position > self.position {
            std::io::copy(
                &mut std::io::repeat(0).take((target_position - self.position) as u64),
                &mut self.inner
            )?;
        }

        self.position = target_position;
        Ok(())
    }
}

impl<T: Read + std::io::Seek> Tracking<T> {
    /// Move the read cursor to an absolute byte position.
    /// A no-op if the cursor is already there.
    pub fn seek_read_to(&mut self, target_position: usize) -> PassiveResult {
        if target_position != self.position {
            self.inner.seek(std::io::SeekFrom::Start(target_position as u64))?;
            self.position = target_position;
        }

        Ok(())
    }
}


pub struct PeekRead<T> {
    inner: T,
    peeked: Option<IoResult<u8>>,
}

impl<T: Read> PeekRead<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, peeked: None }
    }

    pub fn peek_u8(&mut self) -> &IoResult<u8> {
        self.peeked = self.peeked.take().or_else(|| Some(u8::read_from_little_endian(&mut self.inner)));
        self.peeked.as_ref().unwrap()
    }

    pub fn skip_if_eq(&mut self, value: u8) -> IoResult<bool> {
        match self.peek_u8() {
            Ok(peeked) if *peeked == value =>  {
                u8::read_from_little_endian(self).unwrap(); // skip, will be Ok(value)
                Ok(true)
            },

            Ok(_) => Ok(false),
            Err(_) => Err(u8::read_from_little_endian(self).err().unwrap())
        }
    }
}

impl<T: Read> PeekRead<Tracking<T>> {
    /// The number of bytes read through this wrapper so far.
    pub fn byte_position(&self) -> usize {
        self.inner.byte_position()
    }
}

impl<T: Read + std::io::Seek> PeekRead<Tracking<T>> {
    /// Move the read cursor to an absolute byte position, discarding any peeked byte.
    /// A no-op if the cursor is already there; otherwise reads and discards the
    /// bytes in between for short forward skips, and seeks directly for longer jumps.
    pub fn skip_to(&mut self, target_position: usize) -> PassiveResult {
        let current_position = self.byte_position();
        if target_position == current_position { return Ok(()); }

        // short forward skips avoid the syscall-level seek on streams where that is expensive
        const MAX_SKIP_DISTANCE: usize = 64 * 1024;

        if target_position > current_position && target_position - current_position <= MAX_SKIP_DISTANCE {
            skip_bytes(self, (target_position - current_position) as u64)
        }
        else {
            self.peeked = None;
            self.inner.seek_read_to(target_position)
        }
    }
}


impl<T: Read> Read for PeekRead<T> {
    fn read(&mut self, target_buffer: &mut [u8]) -> IoResult<usize> {
        if target_buffer.is_empty() {
            return Ok(0)
        }

        match self.peeked.take() {
            None => self.inner.read(target_buffer),
            Some(peeked) => {
                target_buffer[0] = peeked?;
                Ok(1 + self.inner.read(&mut target_buffer[1..])?)
            }
        }
    }
}

/// extension trait for primitive types like numbers and arrays
pub trait Data: Sized + Default + Clone {
    #[inline]
    fn read(read: &mut impl Read) -> Result<Self>;

    #[inline]
    fn read_slice(read: &mut impl Read, slice: &mut[Self]) -> PassiveResult;

    #[inline]
    fn read_vec(read: &mut impl Read, data_size: usize, estimated_max: usize, abort_on_max: bool) -> Result<Vec<Self>> {
        let mut vec = Vec::new();
        Self::read_into_vec(read, &mut vec, data_size, estimated_max, abort_on_max)?;
        Ok(vec)
    }

    #[inline]
    fn write(self, write: &mut impl Write) -> PassiveResult;

    #[inline]
    fn write_slice(write: &mut impl Write, slice: &[Self]) -> PassiveResult;

    const BYTE_SIZE: usize = ::std::mem::size_of::<Self>();

    /// If a block length greater than this number is decoded,
    /// it will not try to allocate that much memory, but instead consider
    /// that decoding the block length has gone wrong
    #[inline]
    fn read_into_vec(read: &mut impl Read, data: &mut Vec<Self>, data_size: usize, max: usize, abort_on_max: bool) -> PassiveResult {
        let start = data.len();
        let end = start + data_size;
        let max_end = start + max;

        debug_assert!(max <= 24 * std::u16::MAX as usize, "dangerously large max value ({}), was it read from an invalid file?", max);
        debug_assert!(data_size <= max, "suspiciously large data size: {} (max: {})", data_size, max);

        if data_size <= max {
            data.resize(end, Self::default());
            Self::read_slice(read, &mut data[start .. end])
        }
        else {
            if abort_on_max {
                return Err(Error::invalid("content size"))
            }

            println!("suspiciously large data size: {}, estimated max: {}", data_size, max);

            data.resize(max_end, Self::default());
            Self::read_slice(read, &mut data[start .. max_end])?;

            for _ in max..data_size {
                data.push(Self::read(read)?);
            }

            Ok(())
        }
    }

    #[inline]
    fn write_i32_sized_slice<W: Write>(write: &mut W, slice: &[Self]) -> PassiveResult {
        (slice.len() as i32).write(write)?;
        Self::write_slice(write, slice)
    }

    #[inline]
    fn read_i32_sized_vec(read: &mut impl Read, estimated_max: usize, abort_on_max: bool) -> Result<Vec<Self>> {
        let size = i32::read(read)?;
        debug_assert!(size >= 0);

        if size < 0 { Err(Error::invalid("negative array size")) }
        else { Self::read_vec(read, size as usize, estimated_max, abort_on_max) }
    }
}


macro_rules! implement_data_for_primitive {
    ($kind: ident) => {
        impl Data for $kind {
            fn read(read: &mut impl Read) -> Result<Self> {
                Ok(read.read_from_little_endian()?)
            }

            fn write(self, write: &mut impl Write) -> Result<()> {
                write.write_as_little_endian(&self)?;
                Ok(())
            }

            fn read_slice(read: &mut impl Read, slice: &mut [Self]) -> Result<()> {
                read.read_from_little_endian_into(slice)?;
                Ok(())
            }

            fn write_slice(write: &mut impl Write, slice: &[Self]) -> Result<()> {
                write.write_as_little_endian(slice)?;
                Ok(())
            }
        }
    };
}

implement_data_for_primitive!(u8);
implement_data_for_primitive!(i8);
implement_data_for_primitive!(i16);
implement_data_for_primitive!(u16);
implement_data_for_primitive!(u32);
implement_data_for_primitive!(i32);
implement_data_for_primitive!(i64);
implement_data_for_primitive!(u64);
implement_data_for_primitive!(f32);
implement_data_for_primitive!(f64);


impl Data for f16 {
    fn read(read: &mut impl Read) -> Result<Self> {
        u16::read(read).map(f16::from_bits)
    }

    fn read_slice(read: &mut impl Read, slice: &mut [Self]) -> Result<()> {
        let bits = slice.reinterpret_cast_mut();
        u16::read_slice(read, bits)
    }

    fn write(self, write: &mut impl Write) -> Result<()> {
        self.to_bits().write(write)
    }

    fn write_slice(write: &mut impl Write, slice: &[Self]) -> Result<()> {
        let bits = slice.reinterpret_cast();
        u16::write_slice(write, bits)
    }
}


#[cfg(test)]
mod test {
    use crate::io::PeekRead;
    use std::io::Read;

    #[test]
    fn peek(){
        use lebe::prelude::*;
        let buffer: &[u8] = &[0,1,2,3];
        let mut peek = PeekRead::new(buffer);

        assert_eq!(peek.peek_u8().as_ref().unwrap(), &0);
        assert_eq!(peek.peek_u8().as_ref().unwrap(), &0);
        assert_eq!(peek.peek_u8().as_ref().unwrap(), &0);
        assert_eq!(u8::read_from_little_endian(&mut peek).unwrap(), 0_u8); // TODO rename to "read u8 from little endian"?

        assert_eq!(peek.read(&mut [0,0]).unwrap(), 2);

        assert_eq!(peek.peek_u8().as_ref().unwrap(), &3);
        assert_eq!(u8::read_from_little_endian(&mut peek).unwrap(), 3_u8);

        assert!(peek.peek_u8().is_err());
        assert!(peek.peek_u8().is_err());
        assert!(peek.peek_u8().is_err());
        assert!(peek.peek_u8().is_err());

        assert!(u8::read_from_little_endian(&mut peek).is_err());
    }
}


