#![deny(missing_docs)]
//! Resolution-dependent mask erosion for masked similarity metrics.
//!
//! During multi-resolution registration each pyramid level blurs the images
//! by a different amount, so a fixed or moving mask used verbatim would let
//! background leak into the metric near the mask boundary. The
//! [`MaskErosionScheduler`] re-derives, at the start of every level, the mask
//! the metric sees by eroding the originally loaded mask by a radius that
//! depends on the level.

/// Key/value configuration source with command line overrides.
pub mod config;

/// A minimal registration driver.
pub mod driver;

/// Error types for the metric module.
pub mod error;

/// Registration lifecycle hooks and driver context.
pub mod lifecycle;

/// The mask consuming part of a similarity metric.
pub mod metric_base;

/// Mask loading and erosion collaborators.
pub mod provider;

/// Erosion radii per resolution level.
pub mod schedule;

/// The resolution-dependent mask erosion scheduler.
pub mod scheduler;

pub use crate::config::Configuration;
pub use crate::driver::ResolutionDriver;
pub use crate::error::{ConfigError, MetricError};
pub use crate::lifecycle::{LifecycleState, RegistrationComponent, RegistrationContext};
pub use crate::metric_base::{MaskedMetric, MetricBase};
pub use crate::provider::{FileMaskProvider, MaskEroder, MaskProvider, MorphologyEroder};
pub use crate::schedule::{
    erosion_radius, fixed_erosion_radius, moving_erosion_radius, ErosionSchedule, LevelRadii,
    MaskRole,
};
pub use crate::scheduler::{MaskErosionScheduler, OriginalMask};
