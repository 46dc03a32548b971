//! Delay lines for time-based effects.
//!
//! # Types
//!
//! - [`DelayBuffer`] - Stereo block ring buffer. Whole blocks are written,
//!   read back at an integer delay and fed back with slice copies, split in
//!   two wherever a block straddles the end of the ring.
//! - [`InterpolatedDelay`] - Per-sample fractional delay for modulated paths
//!   (chorus), with linear or cubic interpolation.
//!
//! # Block ring ordering
//!
//! Per process call a [`DelayBuffer`] user must:
//!
//! 1. [`write_block`](DelayBuffer::write_block) the dry input at the write cursor,
//! 2. [`read_block`](DelayBuffer::read_block) from `(write_pos - delay) mod capacity`,
//! 3. optionally [`add_block`](DelayBuffer::add_block) the processed wet signal
//!    as feedback into the same region,
//! 4. [`advance`](DelayBuffer::advance) by exactly the block length.
//!
//! With capacity ≥ max delay + max block the read region never reaches
//! samples that are older than the ring holds.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};
use core::ops::Range;

/// The one or two index ranges covering `len` samples from `start` in a ring.
#[inline]
fn ring_segments(start: usize, len: usize, capacity: usize) -> (Range<usize>, Range<usize>) {
    let first = len.min(capacity - start);
    (start..start + first, 0..len - first)
}

/// Stereo block ring buffer.
///
/// # Example
///
/// ```rust
/// use ballista_core::DelayBuffer;
///
/// let mut ring = DelayBuffer::new();
/// ring.allocate(DelayBuffer::capacity_for(100, 32));
///
/// let block = [1.0_f32; 32];
/// let mut out = [0.0_f32; 32];
/// ring.write_block(0, &block);
/// ring.read_block(0, 100, &mut out);
/// ring.advance(block.len());
/// assert_eq!(out, [0.0; 32]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DelayBuffer {
    channels: [Vec<f32>; 2],
    write_pos: usize,
}

impl DelayBuffer {
    /// An empty ring. Call [`allocate`](Self::allocate) before use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity needed for `max_delay` samples with blocks up to `max_block`.
    pub const fn capacity_for(max_delay: usize, max_block: usize) -> usize {
        max_delay + max_block + 1
    }

    /// Resize to `capacity` samples per channel and clear. May allocate.
    pub fn allocate(&mut self, capacity: usize) {
        for ch in &mut self.channels {
            *ch = vec![0.0; capacity];
        }
        self.write_pos = 0;
        #[cfg(feature = "tracing")]
        tracing::debug!(capacity, "delay ring allocated");
    }

    /// Samples per channel.
    pub fn capacity(&self) -> usize {
        self.channels[0].len()
    }

    /// Copy `src` into `channel` at the write cursor.
    pub fn write_block(&mut self, channel: usize, src: &[f32]) {
        let cap = self.capacity();
        if cap == 0 {
            return;
        }
        let len = src.len().min(cap);
        let (a, b) = ring_segments(self.write_pos, len, cap);
        let split = a.len();
        let buf = &mut self.channels[channel];
        buf[a].copy_from_slice(&src[..split]);
        buf[b].copy_from_slice(&src[split..len]);
    }

    /// Fill `out` from `channel`, `delay` samples behind the write cursor.
    ///
    /// Delays longer than the ring allows for this block length are clamped.
    pub fn read_block(&self, channel: usize, delay: usize, out: &mut [f32]) {
        let cap = self.capacity();
        if cap == 0 {
            out.fill(0.0);
            return;
        }
        let len = out.len().min(cap);
        let delay = delay.min(cap - len);
        let start = (self.write_pos + cap - delay) % cap;
        let (a, b) = ring_segments(start, len, cap);
        let split = a.len();
        let buf = &self.channels[channel];
        out[..split].copy_from_slice(&buf[a]);
        out[split..len].copy_from_slice(&buf[b]);
    }

    /// Add `gain * src` into `channel` at the write cursor (feedback).
    pub fn add_block(&mut self, channel: usize, src: &[f32], gain: f32) {
        let cap = self.capacity();
        if cap == 0 {
            return;
        }
        let len = src.len().min(cap);
        let (a, b) = ring_segments(self.write_pos, len, cap);
        let split = a.len();
        let buf = &mut self.channels[channel];
        for (d, s) in buf[a].iter_mut().zip(&src[..split]) {
            *d += gain * s;
        }
        for (d, s) in buf[b].iter_mut().zip(&src[split..len]) {
            *d += gain * s;
        }
    }

    /// Move the write cursor forward by `len` samples.
    pub fn advance(&mut self, len: usize) {
        let cap = self.capacity();
        if cap > 0 {
            self.write_pos = (self.write_pos + len) % cap;
        }
    }

    /// Zero the contents and rewind the cursor. Does not allocate.
    pub fn clear(&mut self) {
        for ch in &mut self.channels {
            ch.fill(0.0);
        }
        self.write_pos = 0;
    }
}

/// Interpolation method for fractional delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    /// Two-point linear.
    #[default]
    Linear,
    /// Four-point cubic Lagrange.
    Cubic,
}

/// Single-channel fractional delay line.
///
/// A delay of `0.0` reads the most recently written sample, so
/// write-then-read gives an exact `d`-sample delay.
///
/// # Example
///
/// ```rust
/// use ballista_core::InterpolatedDelay;
///
/// let mut delay = InterpolatedDelay::new(64);
/// delay.write(1.0);
/// delay.write(0.0);
/// assert_eq!(delay.read(1.0), 1.0);
/// assert_eq!(delay.read(0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedDelay {
    buffer: Vec<f32>,
    write_pos: usize,
    interpolation: Interpolation,
}

impl InterpolatedDelay {
    /// A line holding up to `max_delay_samples` samples (at least 4).
    pub fn new(max_delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; max_delay_samples.max(4)],
            write_pos: 0,
            interpolation: Interpolation::Linear,
        }
    }

    /// Choose the interpolation used by [`read`](Self::read).
    pub fn set_interpolation(&mut self, interp: Interpolation) {
        self.interpolation = interp;
    }

    /// Read `delay_samples` behind the last written sample.
    #[inline]
    pub fn read(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        // Leave room for the cubic kernel's trailing tap.
        let delay = delay_samples.clamp(0.0, (len - 3) as f32);

        let delay_int = delay as usize;
        let frac = delay - delay_int as f32;

        let newest = (self.write_pos + len - 1) % len;
        let p1 = (newest + len - delay_int) % len;

        match self.interpolation {
            Interpolation::Linear => {
                let p2 = (p1 + len - 1) % len;
                let a = self.buffer[p1];
                a + (self.buffer[p2] - a) * frac
            }
            Interpolation::Cubic => {
                let y0 = self.buffer[(p1 + 1) % len];
                let y1 = self.buffer[p1];
                let y2 = self.buffer[(p1 + len - 1) % len];
                let y3 = self.buffer[(p1 + len - 2) % len];

                let t = frac;
                let a0 = y3 - y2 - y0 + y1;
                let a1 = y0 - y1 - a0;
                let a2 = y2 - y0;
                ((a0 * t + a1) * t + a2) * t + y1
            }
        }
    }

    /// Push one sample.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Zero the line.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

impl Default for InterpolatedDelay {
    fn default() -> Self {
        Self::new(4)
    }
}
