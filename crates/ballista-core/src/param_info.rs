//! Parameter descriptors: names, ranges, defaults and display metadata.
//!
//! Every processor declares its controls as a `const` table of
//! [`ParamDescriptor`]s. The table is the single source of truth for the
//! string keys a host uses, the value ranges a store clamps to, and the
//! defaults a processor falls back on when a key is missing.
//!
//! # Example
//!
//! ```rust
//! use ballista_core::{ParamDescriptor, ParamKind};
//!
//! const THRESHOLD: ParamDescriptor =
//!     ParamDescriptor::gain_db("threshold", "Threshold", -40.0, 0.0, -20.0);
//! const LINK: ParamDescriptor = ParamDescriptor::toggle("stereo_link", "Stereo Link", true);
//!
//! assert_eq!(THRESHOLD.clamp(-100.0), -40.0);
//! assert_eq!(LINK.kind, ParamKind::Toggle);
//! assert_eq!(LINK.default, 1.0);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

use crate::control::ControlSurface;
use libm::{logf, powf, roundf};

/// Scaling curve between plain and normalised (`[0, 1]`) values.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Logarithmic**: `normalized = ln(value/min) / ln(max/min)` (needs `min > 0`)
/// - **Power(exp)**: `normalized = ((value - min) / (max - min))^(1/exp)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values; for frequencies and times.
    Logarithmic,
    /// Skewed by an exponent.
    Power(f32),
}

/// Value type of a control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    /// Continuous value.
    Float,
    /// On/off; stored as 0.0 or 1.0.
    Toggle,
    /// Integer index into the listed options.
    Choice(&'static [&'static str]),
}

/// Unit used when formatting a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Hertz.
    Hertz,
    /// Milliseconds.
    Milliseconds,
    /// Percentage.
    Percent,
    /// Ratio (n:1).
    Ratio,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Display suffix.
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Percent => "%",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}

/// Metadata for one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// String key on the control surface (e.g. `"threshold"`).
    pub name: &'static str,
    /// Display name.
    pub label: &'static str,
    /// Display unit.
    pub unit: ParamUnit,
    /// Float, toggle or choice.
    pub kind: ParamKind,
    /// Lowest value.
    pub min: f32,
    /// Highest value.
    pub max: f32,
    /// Value on construction and reset.
    pub default: f32,
    /// Recommended increment for encoders.
    pub step: f32,
    /// Normalisation curve.
    pub scale: ParamScale,
    /// Grouping for host displays (empty = top level).
    pub group: &'static str,
}

impl ParamDescriptor {
    /// A continuous control.
    pub const fn float(
        name: &'static str,
        label: &'static str,
        unit: ParamUnit,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            label,
            unit,
            kind: ParamKind::Float,
            min,
            max,
            default,
            step: 0.01,
            scale: ParamScale::Linear,
            group: "",
        }
    }

    /// A level in dB (threshold, makeup, output).
    pub const fn gain_db(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::float(name, label, ParamUnit::Decibels, min, max, default).with_step(0.1)
    }

    /// A time in milliseconds, log-scaled.
    pub const fn time_ms(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::float(name, label, ParamUnit::Milliseconds, min, max, default)
            .with_step(0.1)
            .with_scale(ParamScale::Logarithmic)
    }

    /// A frequency in Hz, log-scaled.
    pub const fn frequency_hz(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::float(name, label, ParamUnit::Hertz, min, max, default)
            .with_step(1.0)
            .with_scale(ParamScale::Logarithmic)
    }

    /// A 0–100 % amount.
    pub const fn percent(name: &'static str, label: &'static str, default: f32) -> Self {
        Self::float(name, label, ParamUnit::Percent, 0.0, 100.0, default).with_step(1.0)
    }

    /// A compression-style ratio, skewed towards low ratios.
    pub const fn ratio(
        name: &'static str,
        label: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self::float(name, label, ParamUnit::Ratio, min, max, default)
            .with_step(0.1)
            .with_scale(ParamScale::Power(2.0))
    }

    /// An on/off switch.
    pub const fn toggle(name: &'static str, label: &'static str, default: bool) -> Self {
        Self {
            name,
            label,
            unit: ParamUnit::None,
            kind: ParamKind::Toggle,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            step: 1.0,
            scale: ParamScale::Linear,
            group: "",
        }
    }

    /// A choice among `options`, stored as the index.
    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: usize,
    ) -> Self {
        Self {
            name,
            label,
            unit: ParamUnit::None,
            kind: ParamKind::Choice(options),
            min: 0.0,
            max: (options.len() - 1) as f32,
            default: default as f32,
            step: 1.0,
            scale: ParamScale::Linear,
            group: "",
        }
    }

    /// Override the step.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Override the scale.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Put the control in a display group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Clamp to the range. Toggles and choices snap to whole numbers; NaN
    /// becomes the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let v = value.clamp(self.min, self.max);
        match self.kind {
            ParamKind::Float => v,
            ParamKind::Toggle | ParamKind::Choice(_) => roundf(v),
        }
    }

    /// Plain value to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let v = self.clamp(value);
        match self.scale {
            ParamScale::Linear => (v - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 {
                    return (v - self.min) / range;
                }
                logf(v / self.min) / logf(self.max / self.min)
            }
            ParamScale::Power(exp) => powf((v - self.min) / range, 1.0 / exp),
        }
    }

    /// `[0, 1]` to a plain value.
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let n = normalized.clamp(0.0, 1.0);
        let v = match self.scale {
            ParamScale::Linear => self.min + n * (self.max - self.min),
            ParamScale::Logarithmic if self.min > 0.0 => self.min * powf(self.max / self.min, n),
            ParamScale::Logarithmic => self.min + n * (self.max - self.min),
            ParamScale::Power(exp) => self.min + powf(n, exp) * (self.max - self.min),
        };
        self.clamp(v)
    }

    /// Human-readable value with unit.
    pub fn format_value(&self, value: f32) -> String {
        match self.kind {
            ParamKind::Toggle => String::from(if value >= 0.5 { "on" } else { "off" }),
            ParamKind::Choice(options) => {
                let i = (self.clamp(value) as usize).min(options.len() - 1);
                String::from(options[i])
            }
            ParamKind::Float => match self.unit {
                ParamUnit::Hertz | ParamUnit::Percent => {
                    format!("{:.0}{}", value, self.unit.suffix())
                }
                _ => format!("{:.1}{}", value, self.unit.suffix()),
            },
        }
    }

    /// Read this control from `controls`, clamped; default when absent.
    #[inline]
    pub fn read(&self, controls: &dyn ControlSurface) -> f32 {
        controls
            .value(self.name)
            .map_or(self.default, |v| self.clamp(v))
    }

    /// Read a toggle.
    #[inline]
    pub fn read_flag(&self, controls: &dyn ControlSurface) -> bool {
        self.read(controls) >= 0.5
    }

    /// Read a choice index.
    #[inline]
    pub fn read_choice(&self, controls: &dyn ControlSurface) -> usize {
        self.read(controls) as usize
    }
}

/// Find a descriptor by key.
pub fn find_param<'a>(params: &'a [ParamDescriptor], name: &str) -> Option<&'a ParamDescriptor> {
    params.iter().find(|p| p.name == name)
}
