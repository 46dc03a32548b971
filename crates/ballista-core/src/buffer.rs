//! Stereo audio containers.
//!
//! - [`StereoBlock`] - the caller's block, borrowed mutably for one process call
//! - [`StereoBuffer`] - auxiliary buffers a processor owns, sized in `prepare`
//! - [`StereoSamples`] - whole-file stereo audio for offline hosts

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::processor::ProcessSpec;

/// A borrowed stereo block processed in place.
#[derive(Debug)]
pub struct StereoBlock<'a> {
    /// Left channel.
    pub left: &'a mut [f32],
    /// Right channel.
    pub right: &'a mut [f32],
}

impl<'a> StereoBlock<'a> {
    /// Wrap two channel slices of equal length.
    pub fn new(left: &'a mut [f32], right: &'a mut [f32]) -> Self {
        debug_assert_eq!(left.len(), right.len(), "channel lengths differ");
        Self { left, right }
    }

    /// Samples per channel (the shorter channel if they differ).
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// True for a zero-length block.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Restrict the block to what `spec` allows.
    ///
    /// Processing before `prepare`, or with a block longer than the prepared
    /// maximum, is a caller bug: debug builds panic. Release builds process
    /// only the first `max_block_size` samples and leave the rest untouched;
    /// an unprepared processor (maximum 0) leaves the whole block untouched.
    pub fn limit(self, spec: &ProcessSpec) -> StereoBlock<'a> {
        debug_assert!(spec.is_prepared(), "process called before prepare");
        debug_assert!(
            self.len() <= spec.max_block_size,
            "block of {} samples exceeds prepared maximum {}",
            self.len(),
            spec.max_block_size
        );
        let n = self.len().min(spec.max_block_size);
        let Self { left, right } = self;
        StereoBlock {
            left: &mut left[..n],
            right: &mut right[..n],
        }
    }

    /// Both channels as a pair.
    pub fn channels(&mut self) -> [&mut [f32]; 2] {
        [&mut *self.left, &mut *self.right]
    }
}

/// Owned stereo scratch buffer.
///
/// Allocated once in `prepare` at the maximum block size; per block, callers
/// work on the first `n` samples.
#[derive(Debug, Clone, Default)]
pub struct StereoBuffer {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// A zeroed buffer of `block_size` samples per channel.
    pub fn new(block_size: usize) -> Self {
        Self {
            left: vec![0.0; block_size],
            right: vec![0.0; block_size],
        }
    }

    /// Resize and zero. May allocate.
    pub fn resize(&mut self, block_size: usize) {
        self.left.clear();
        self.left.resize(block_size, 0.0);
        self.right.clear();
        self.right.resize(block_size, 0.0);
    }

    /// Zero both channels.
    pub fn clear(&mut self) {
        self.left.fill(0.0);
        self.right.fill(0.0);
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Mutable views of the first `n` samples of each channel.
    pub fn split_mut(&mut self, n: usize) -> (&mut [f32], &mut [f32]) {
        (&mut self.left[..n], &mut self.right[..n])
    }
}

/// Whole-file stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// From two channels of equal length.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self { left, right }
    }

    /// Duplicate a mono signal into both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            right: mono.clone(),
            left: mono,
        }
    }

    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.left.len().min(self.right.len())
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interleave as L, R, L, R, ...
    pub fn to_interleaved(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(&self.right)
            .flat_map(|(&l, &r)| [l, r])
            .collect()
    }

    /// De-interleave L, R pairs. A trailing odd sample is dropped.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        let (left, right) = interleaved.chunks_exact(2).map(|f| (f[0], f[1])).unzip();
        Self { left, right }
    }

    /// Largest absolute sample over both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(&self.right)
            .fold(0.0_f32, |m, x| m.max(x.abs()))
    }

    /// Iterate over blocks of at most `block_size` frames.
    pub fn blocks_mut(&mut self, block_size: usize) -> impl Iterator<Item = StereoBlock<'_>> {
        let size = block_size.max(1);
        self.left
            .chunks_mut(size)
            .zip(self.right.chunks_mut(size))
            .map(|(l, r)| StereoBlock::new(l, r))
    }
}
