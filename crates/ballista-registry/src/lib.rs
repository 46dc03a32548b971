//! Effect registry and factory for ballista processors.
//!
//! Hosts use the registry to discover the twelve effects, read their control
//! tables and meter counts, and create them by string id.
//!
//! # Example
//!
//! ```rust
//! use ballista_core::{Defaults, ProcessSpec, StereoBlock};
//! use ballista_registry::{EffectCategory, EffectRegistry};
//!
//! let registry = EffectRegistry::new();
//!
//! for effect in registry.effects_in_category(EffectCategory::Dynamics) {
//!     println!("{}: {}", effect.name, effect.description);
//! }
//!
//! if let Some(mut limiter) = registry.create("limiter") {
//!     limiter.prepare(ProcessSpec::stereo(48000.0, 64));
//!     let mut left = [0.9_f32; 64];
//!     let mut right = [0.9_f32; 64];
//!     limiter.process(&Defaults, StereoBlock::new(&mut left, &mut right));
//!     assert!(left.iter().all(|x| x.abs() <= 1.0));
//! }
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature; the registry only needs `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use ballista_core::{ParamDescriptor, Processor};
use ballista_effects::{
    Clipper, Compressor, Deesser, Delay, Distortion, Equalizer, Gain, Gate, Limiter, Multiband,
    Reverb, TiltEq, clipper, compressor, deesser, delay, distortion, equalizer, gain, gate,
    limiter, multiband, reverb, tilt_eq,
};

/// Category of effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Compressors, limiters, gates and clippers
    Dynamics,
    /// Equalizers
    Filter,
    /// Waveshaping
    Distortion,
    /// Delay and reverb
    TimeBased,
    /// Gain and stereo utilities
    Utility,
}

impl EffectCategory {
    /// All categories in display order.
    pub const ALL: [EffectCategory; 5] = [
        EffectCategory::Dynamics,
        EffectCategory::Filter,
        EffectCategory::Distortion,
        EffectCategory::TimeBased,
        EffectCategory::Utility,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => "Dynamics",
            EffectCategory::Filter => "Filter",
            EffectCategory::Distortion => "Distortion",
            EffectCategory::TimeBased => "Time-Based",
            EffectCategory::Utility => "Utility",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            EffectCategory::Dynamics => {
                "Compressors, limiters, gates, clippers and de-essers"
            }
            EffectCategory::Filter => "Parametric and tilt equalizers",
            EffectCategory::Distortion => "Waveshaping saturation and distortion",
            EffectCategory::TimeBased => "Delay, reverb and other time-based effects",
            EffectCategory::Utility => "Gain, pan, width and polarity",
        }
    }
}

/// Describes an effect in the registry.
#[derive(Debug, Clone)]
pub struct EffectDescriptor {
    /// Unique identifier, identical to the processor's `name()`.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the effect.
    pub description: &'static str,
    /// Category for organization.
    pub category: EffectCategory,
    /// The effect's control table.
    pub params: &'static [ParamDescriptor],
    /// Number of gain-reduction meters the effect reports.
    pub meter_count: usize,
}

impl EffectDescriptor {
    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Look up one of the effect's parameters by key.
    pub fn param(&self, name: &str) -> Option<&'static ParamDescriptor> {
        ballista_core::find_param(self.params, name)
    }
}

/// Factory function type for creating effects.
type EffectFactory = fn() -> Box<dyn Processor + Send>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: EffectDescriptor,
    factory: EffectFactory,
}

/// Registry of all available effects.
///
/// Created effects are unprepared; call `prepare` before processing.
pub struct EffectRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectRegistry {
    /// Creates a registry with all built-in effects.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(12),
        };
        registry.register_builtin_effects();
        registry
    }

    fn register_builtin_effects(&mut self) {
        // Dynamics
        self.register(
            EffectDescriptor {
                id: "compressor",
                name: "Compressor",
                description: "Feed-forward compressor with soft knee and parallel mix",
                category: EffectCategory::Dynamics,
                params: &compressor::PARAMS,
                meter_count: 2,
            },
            || Box::new(Compressor::new()),
        );
        self.register(
            EffectDescriptor {
                id: "gate",
                name: "Gate",
                description: "Downward expander with hold",
                category: EffectCategory::Dynamics,
                params: &gate::PARAMS,
                meter_count: 2,
            },
            || Box::new(Gate::new()),
        );
        self.register(
            EffectDescriptor {
                id: "limiter",
                name: "Limiter",
                description: "Instant-attack limiter with output ceiling",
                category: EffectCategory::Dynamics,
                params: &limiter::PARAMS,
                meter_count: 2,
            },
            || Box::new(Limiter::new()),
        );
        self.register(
            EffectDescriptor {
                id: "clipper",
                name: "Clipper",
                description: "Hard clipper with auto-gain",
                category: EffectCategory::Dynamics,
                params: &clipper::PARAMS,
                meter_count: 2,
            },
            || Box::new(Clipper::new()),
        );
        self.register(
            EffectDescriptor {
                id: "deesser",
                name: "De-esser",
                description: "Compresses the band above a Linkwitz-Riley split",
                category: EffectCategory::Dynamics,
                params: &deesser::PARAMS,
                meter_count: 2,
            },
            || Box::new(Deesser::new()),
        );
        self.register(
            EffectDescriptor {
                id: "multiband",
                name: "Multiband Compressor",
                description: "Four-band compressor with solo and bypass",
                category: EffectCategory::Dynamics,
                params: &multiband::PARAMS,
                meter_count: multiband::BANDS * 2,
            },
            || Box::new(Multiband::new()),
        );

        // Filter
        self.register(
            EffectDescriptor {
                id: "equalizer",
                name: "Equalizer",
                description: "HPF, shelves, two bells and LPF",
                category: EffectCategory::Filter,
                params: &equalizer::PARAMS,
                meter_count: 0,
            },
            || Box::new(Equalizer::new()),
        );
        self.register(
            EffectDescriptor {
                id: "tilt_eq",
                name: "Tilt EQ",
                description: "Opposing shelves around a pivot frequency",
                category: EffectCategory::Filter,
                params: &tilt_eq::PARAMS,
                meter_count: 0,
            },
            || Box::new(TiltEq::new()),
        );

        // Distortion
        self.register(
            EffectDescriptor {
                id: "distortion",
                name: "Distortion",
                description: "Waveshaper between tone filters",
                category: EffectCategory::Distortion,
                params: &distortion::PARAMS,
                meter_count: 0,
            },
            || Box::new(Distortion::new()),
        );

        // Time-based
        self.register(
            EffectDescriptor {
                id: "delay",
                name: "Delay",
                description: "Stereo feedback delay with drive, filters and chorus",
                category: EffectCategory::TimeBased,
                params: &delay::PARAMS,
                meter_count: 0,
            },
            || Box::new(Delay::new()),
        );
        self.register(
            EffectDescriptor {
                id: "reverb",
                name: "Reverb",
                description: "Freeverb-style room with predelay and modulation",
                category: EffectCategory::TimeBased,
                params: &reverb::PARAMS,
                meter_count: 0,
            },
            || Box::new(Reverb::new()),
        );

        // Utility
        self.register(
            EffectDescriptor {
                id: "gain",
                name: "Gain",
                description: "Gain, pan, stereo width, polarity and mute",
                category: EffectCategory::Utility,
                params: &gain::PARAMS,
                meter_count: 0,
            },
            || Box::new(Gain::new()),
        );
    }

    fn register(&mut self, descriptor: EffectDescriptor, factory: EffectFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Returns all registered effect descriptors.
    pub fn all_effects(&self) -> Vec<&EffectDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns effects in a specific category.
    pub fn effects_in_category(&self, category: EffectCategory) -> Vec<&EffectDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Returns the ids of all registered effects, in registration order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.descriptor.id).collect()
    }

    /// Gets the descriptor for an effect by id.
    pub fn get(&self, id: &str) -> Option<&EffectDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| &e.descriptor)
    }

    /// Creates a new, unprepared instance of an effect by id.
    pub fn create(&self, id: &str) -> Option<Box<dyn Processor + Send>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == id)
            .map(|e| (e.factory)())
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no effects are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
