//! The control surface: string-keyed parameter values read once per block.
//!
//! Processors only ever see `&dyn ControlSurface`. They read every control
//! they need at the top of `process` into a plain parameter struct and never
//! touch the surface again during the block, so a concurrent writer cannot
//! tear a block.
//!
//! [`ParamStore`] is the lock-free store a host owns: one atomic per
//! parameter, written from a UI or automation thread and read from the audio
//! thread without locks or allocation.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::param_info::ParamDescriptor;
use core::sync::atomic::{AtomicU32, Ordering};

/// Read access to named control values.
pub trait ControlSurface {
    /// Current value of `name`, or `None` if the surface has no such key.
    fn value(&self, name: &str) -> Option<f32>;

    /// Float value, or `default` when absent or non-finite.
    fn float_or(&self, name: &str, default: f32) -> f32 {
        self.value(name)
            .filter(|v| v.is_finite())
            .unwrap_or(default)
    }

    /// Toggle value (`>= 0.5` is on), or `default` when absent.
    fn flag_or(&self, name: &str, default: bool) -> bool {
        self.value(name).map_or(default, |v| v >= 0.5)
    }

    /// Choice index, rounded and floored at zero, or `default` when absent.
    fn choice_or(&self, name: &str, default: usize) -> usize {
        self.value(name)
            .filter(|v| v.is_finite())
            .map_or(default, |v| libm::roundf(v).max(0.0) as usize)
    }
}

impl ControlSurface for [(&str, f32)] {
    fn value(&self, name: &str) -> Option<f32> {
        self.iter().find(|(k, _)| *k == name).map(|&(_, v)| v)
    }
}

impl<const N: usize> ControlSurface for [(&str, f32); N] {
    fn value(&self, name: &str) -> Option<f32> {
        self.as_slice().value(name)
    }
}

impl<T: ControlSurface + ?Sized> ControlSurface for &T {
    fn value(&self, name: &str) -> Option<f32> {
        (**self).value(name)
    }
}

/// An empty surface: every processor falls back to its defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defaults;

impl ControlSurface for Defaults {
    fn value(&self, _name: &str) -> Option<f32> {
        None
    }
}

/// Lock-free parameter store built from a descriptor table.
///
/// Values are kept as `f32` bits in `AtomicU32`s with relaxed ordering.
/// Each value is independent; a block's snapshot may mix values from before
/// and after a concurrent multi-parameter edit, but never a torn float.
///
/// # Example
///
/// ```rust
/// use ballista_core::{ControlSurface, ParamDescriptor, ParamStore};
///
/// static PARAMS: [ParamDescriptor; 1] =
///     [ParamDescriptor::gain_db("threshold", "Threshold", -40.0, 0.0, -20.0)];
///
/// let store = ParamStore::new(&PARAMS);
/// assert_eq!(store.value("threshold"), Some(-20.0));
///
/// assert!(store.set("threshold", -60.0));
/// assert_eq!(store.value("threshold"), Some(-40.0));
/// assert!(!store.set("nope", 1.0));
/// ```
#[derive(Debug)]
pub struct ParamStore {
    descriptors: &'static [ParamDescriptor],
    values: Vec<AtomicU32>,
}

impl ParamStore {
    /// A store holding every descriptor's default.
    pub fn new(descriptors: &'static [ParamDescriptor]) -> Self {
        Self {
            descriptors,
            values: descriptors
                .iter()
                .map(|d| AtomicU32::new(d.default.to_bits()))
                .collect(),
        }
    }

    /// The descriptor table.
    pub fn descriptors(&self) -> &'static [ParamDescriptor] {
        self.descriptors
    }

    /// Index of `name` in the table.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }

    /// Current value of `name`.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|i| self.get_index(i))
    }

    /// Current value at `index`.
    #[inline]
    pub fn get_index(&self, index: usize) -> f32 {
        f32::from_bits(self.values[index].load(Ordering::Relaxed))
    }

    /// Write `name`, clamped to its range. Returns `false` for unknown names.
    pub fn set(&self, name: &str, value: f32) -> bool {
        let Some(i) = self.index_of(name) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(name, "write to unknown parameter ignored");
            return false;
        };
        let clamped = self.descriptors[i].clamp(value);
        self.values[i].store(clamped.to_bits(), Ordering::Relaxed);
        true
    }

    /// Write `name` from a normalised `[0, 1]` value.
    pub fn set_normalized(&self, name: &str, normalized: f32) -> bool {
        match self.index_of(name) {
            Some(i) => {
                let plain = self.descriptors[i].denormalize(normalized);
                self.values[i].store(plain.to_bits(), Ordering::Relaxed);
                true
            }
            None => false,
        }
    }

    /// Restore every default.
    pub fn reset_to_defaults(&self) {
        for (d, v) in self.descriptors.iter().zip(&self.values) {
            v.store(d.default.to_bits(), Ordering::Relaxed);
        }
    }

    /// `(name, value)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name, self.get_index(i)))
    }
}

impl ControlSurface for ParamStore {
    fn value(&self, name: &str) -> Option<f32> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARAMS: [ParamDescriptor; 3] = [
        ParamDescriptor::gain_db("threshold", "Threshold", -40.0, 0.0, -20.0),
        ParamDescriptor::toggle("stereo_link", "Link", true),
        ParamDescriptor::choice("slope", "Slope", &["12", "24", "36"], 1),
    ];

    #[test]
    fn test_slice_surface() {
        let controls: [(&str, f32); 2] = [("a", 1.0), ("b", 0.25)];
        assert_eq!(controls.value("b"), Some(0.25));
        assert_eq!(controls.value("c"), None);
        assert_eq!(controls.float_or("c", 3.0), 3.0);
        assert!(controls.flag_or("a", false));
        assert!(!controls.flag_or("b", true));
    }

    #[test]
    fn test_choice_or() {
        let controls: [(&str, f32); 3] = [("slope", 1.6), ("neg", -3.0), ("nan", f32::NAN)];
        assert_eq!(controls.choice_or("slope", 0), 2);
        assert_eq!(controls.choice_or("neg", 1), 0);
        assert_eq!(controls.choice_or("nan", 1), 1);
    }

    #[test]
    fn test_store_defaults() {
        let store = ParamStore::new(&PARAMS);
        assert_eq!(store.get("threshold"), Some(-20.0));
        assert_eq!(store.get("stereo_link"), Some(1.0));
        assert_eq!(store.get("slope"), Some(1.0));
    }

    #[test]
    fn test_store_clamps() {
        let store = ParamStore::new(&PARAMS);
        store.set("threshold", 12.0);
        store.set("slope", 7.0);
        assert_eq!(store.get("threshold"), Some(0.0));
        assert_eq!(store.get("slope"), Some(2.0));
        store.reset_to_defaults();
        assert_eq!(store.get("threshold"), Some(-20.0));
    }

    #[test]
    fn test_store_normalized() {
        let store = ParamStore::new(&PARAMS);
        store.set_normalized("threshold", 0.5);
        assert_eq!(store.get("threshold"), Some(-20.0));
        store.set_normalized("threshold", 0.0);
        assert_eq!(store.get("threshold"), Some(-40.0));
    }

    #[test]
    fn test_store_is_shareable() {
        use std::sync::Arc;
        let store = Arc::new(ParamStore::new(&PARAMS));
        let writer = Arc::clone(&store);
        std::thread::spawn(move || {
            writer.set("threshold", -10.0);
        })
        .join()
        .unwrap();
        assert_eq!(store.value("threshold"), Some(-10.0));
    }

    #[test]
    fn test_defaults_surface() {
        assert_eq!(Defaults.value("anything"), None);
        assert_eq!(Defaults.float_or("x", 2.0), 2.0);
    }
}
