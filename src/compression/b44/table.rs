//! Non-linear quantization curve used by B44/B44A for channels marked `quantize_linearly = false`
//! (hue, chroma, saturation, alpha). Perceptual channels are log-compressed before the 4x4
//! min+diff quantization so that small relative changes in bright regions are not discarded.
//!
//! OpenEXR builds a `1 << 16`-entry lookup table indexed by the raw bits of the input half
//! value. Since B44 only ever looks up 16 values per call (one 4x4 tile of one channel), the
//! same mapping is computed directly here instead of precomputing the full table.

use half::f16;

fn exp_component(bits: u16) -> u16 {
    let h = f16::from_bits(bits);

    if h.is_nan() || h.is_infinite() {
        return 0x7c00;
    }

    let f = h.to_f32();
    let e = if f >= 0.0 { f.exp() - 1.0 } else { -((-f).exp() - 1.0) };
    f16::from_f32(e).to_bits()
}

fn log_component(bits: u16) -> u16 {
    let h = f16::from_bits(bits);

    if h.is_nan() || h.is_infinite() {
        return 0x7c00;
    }

    let f = h.to_f32();
    let l = if f >= 0.0 { (f + 1.0).ln() } else { -((-f + 1.0).ln()) };
    f16::from_f32(l).to_bits()
}

/// Maps a linear half-precision value to its log-compressed representation.
pub fn exp_table(bits: u16) -> u16 { exp_component(bits) }

/// Inverse of [`exp_table`], maps a log-compressed value back to a linear half-precision value.
pub fn log_table(bits: u16) -> u16 { log_component(bits) }
