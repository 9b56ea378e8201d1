//! Folio Animation System
//!
//! Keyframe animations driven by the virtual clock.
//!
//! # Features
//!
//! - **Easing**: CSS timing functions and the usual polynomial curves
//! - **Keyframe Animations**: single-value and opacity/transform tracks with
//!   delay and fill mode
//! - **Presets**: the entrance/exit effects used across the page
//! - **Scheduler**: ticks animations and writes their frames into the page

pub mod easing;
pub mod keyframe;
pub mod presets;
pub mod scheduler;

pub use easing::Easing;
pub use keyframe::{
    FillMode, Keyframe, KeyframeAnimation, KeyframeProperties, MultiKeyframe,
    MultiKeyframeAnimation,
};
pub use presets::AnimationPreset;
pub use scheduler::{Animation, AnimationId, AnimationScheduler, AnimationTarget, TickReport};
