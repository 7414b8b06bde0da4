
// calculations inspired by
// https://github.com/AcademySoftwareFoundation/openexr/blob/master/OpenEXR/IlmImf/ImfTiledMisc.cpp

use crate::error::{Result, i32_to_usize};
use std::ops::{Add, Sub, Mul, Div, Neg};

/// An infinitely small vector, consisting of two scalar `x` and `y` coordinates.
/// Used to store pixel positions and dimensions throughout the crate.
/// Has some methods only available for `Vec2<usize>` or `Vec2<i32>`.
#[derive(Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Default)]
pub struct Vec2<T>(pub T, pub T);

impl<T: std::fmt::Debug> std::fmt::Debug for Vec2<T> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "({:?}, {:?})", self.0, self.1)
    }
}

impl<T: Copy> Vec2<T> {
    /// The first coordinate of this 2D vector.
    pub fn x(self) -> T { self.0 }

    /// The second coordinate of this 2D vector.
    pub fn y(self) -> T { self.1 }

    /// Synonym for the first coordinate, when this vector describes a 2D size.
    pub fn width(self) -> T { self.0 }

    /// Synonym for the second coordinate, when this vector describes a 2D size.
    pub fn height(self) -> T { self.1 }
}

impl Vec2<usize> {
    /// Number of pixels covered by a rectangle of this size. `width * height`.
    pub fn area(self) -> usize { self.0 * self.1 }

    /// Convert to `Vec2<i32>`, returning an error if the value is too large.
    pub fn to_i32(self) -> Vec2<i32> {
        Vec2(self.0 as i32, self.1 as i32)
    }
}

impl Vec2<i32> {
    /// Number of pixels covered by a rectangle of this size. `width * height`.
    pub fn area(self) -> usize { self.0 as usize * self.1 as usize }

    /// Convert to `Vec2<usize>`, returning an error naming `error_message` if negative.
    pub fn to_usize(self, error_message: &'static str) -> Result<Vec2<usize>> {
        Ok(Vec2(i32_to_usize(self.0, error_message)?, i32_to_usize(self.1, error_message)?))
    }
}

impl Vec2<f32> {
    /// Number of pixels covered by a rectangle of this size. `width * height`.
    pub fn area(self) -> f32 { self.0 * self.1 }
}

impl From<(usize, usize)> for Vec2<usize> {
    fn from((x, y): (usize, usize)) -> Self { Vec2(x, y) }
}

impl From<(i32, i32)> for Vec2<i32> {
    fn from((x, y): (i32, i32)) -> Self { Vec2(x, y) }
}

impl From<Vec2<usize>> for (usize, usize) {
    fn from(value: Vec2<usize>) -> Self { (value.0, value.1) }
}

impl From<Vec2<i32>> for (i32, i32) {
    fn from(value: Vec2<i32>) -> Self { (value.0, value.1) }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;
    fn add(self, other: Self) -> Self { Vec2(self.0 + other.0, self.1 + other.1) }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;
    fn sub(self, other: Self) -> Self { Vec2(self.0 - other.0, self.1 - other.1) }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Vec2<T> {
    type Output = Self;
    fn mul(self, scale: T) -> Self { Vec2(self.0 * scale, self.1 * scale) }
}

impl<T: Div<Output = T> + Copy> Div<T> for Vec2<T> {
    type Output = Self;
    fn div(self, scale: T) -> Self { Vec2(self.0 / scale, self.1 / scale) }
}

impl<T: Div<Output = T> + Copy> Div<Vec2<T>> for Vec2<T> {
    type Output = Self;
    fn div(self, other: Vec2<T>) -> Self { Vec2(self.0 / other.0, self.1 / other.1) }
}

impl<T: Neg<Output = T>> Neg for Vec2<T> {
    type Output = Self;
    fn neg(self) -> Self { Vec2(-self.0, -self.1) }
}

/// computes floor(log(x)/log(2))
pub fn floor_log_2(mut number: u32) -> u32 {
    debug_assert_ne!(number, 0);

    let mut log = 0;

//     TODO check if this unrolls properly?
    while number > 1 {
        log += 1;
        number >>= 1;
    }

    log
}


/// computes ceil(log(x)/log(2))
// taken from https://github.com/openexr/openexr/blob/master/OpenEXR/IlmImf/ImfTiledMisc.cpp
pub fn ceil_log_2(mut number: u32) -> u32 {
    debug_assert_ne!(number, 0);

    let mut log = 0;
    let mut round_up = 0;

    // TODO check if this unrolls properly
    while number > 1 {
        if number & 1 != 0 {
            round_up = 1;
        }

        log +=  1;
        number >>= 1;
    }

    log + round_up
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RoundingMode {
    Down, Up,
}

impl RoundingMode {
    pub fn log2(self, number: u32) -> u32 {
        match self {
            RoundingMode::Down => self::floor_log_2(number),
            RoundingMode::Up => self::ceil_log_2(number),
        }
    }

    pub fn divide(self, dividend: u32, divisor: u32) -> u32 {
        match self {
            RoundingMode::Up => (dividend + divisor - 1) / divisor, // only works for positive numbers
            RoundingMode::Down => dividend / divisor,
        }
    }
}

pub fn compute_tile_count(full_res: u32, tile_size: u32) -> u32 {
    // round up, because if the image is not evenly divisible by the tiles,
    // we add another tile at the end (which is only partially used)
    RoundingMode::Up.divide(full_res, tile_size)
}


// TODO this should be cached? log2 may be very expensive
pub fn compute_level_count(round: RoundingMode, full_res: u32) -> u32 {
    round.log2(full_res) + 1
}

pub fn compute_level_size(round: RoundingMode, full_res: u32, level_index: u32) -> u32 {
    round.divide(full_res,  1 << level_index).max(1)
}

// TODO cache these?
// TODO compute these directly instead of summing up an iterator?
pub fn rip_map_resolutions(round: RoundingMode, max_resolution: (u32, u32)) -> impl Iterator<Item=(u32, u32)> {
    let (w, h) = (compute_level_count(round, max_resolution.0), compute_level_count(round, max_resolution.1));

    (0..w) // TODO test this
        .flat_map(move |x_level|{ // FIXME may swap y and x order?
            (0..h).map(move |y_level| {
                // TODO progressively divide instead??
                let width = compute_level_size(round, max_resolution.0, x_level);
                let height = compute_level_size(round, max_resolution.1, y_level);
                (width, height)
            })
        })
}

// TODO cache all these level values when computing table offset size??
// TODO compute these directly instead of summing up an iterator?
pub fn mip_map_resolutions(round: RoundingMode, max_resolution: (u32, u32)) -> impl Iterator<Item=(u32, u32)> {
    (0..compute_level_count(round, max_resolution.0.max(max_resolution.1)))
        .map(move |level|{
            // TODO progressively divide instead??
            let width = compute_level_size(round, max_resolution.0, level);
            let height = compute_level_size(round, max_resolution.1, level);
            (width, height)
        })
}
