//! Animation presets for the page's entrance and exit effects

use crate::easing::Easing;
use crate::keyframe::{KeyframeAnimation, KeyframeProperties, MultiKeyframeAnimation};

/// Pre-built animations used by the page controllers
pub struct AnimationPreset;

impl AnimationPreset {
    // ========================================================================
    // Fade animations
    // ========================================================================

    /// Fade in from transparent to opaque
    pub fn fade_in(duration_ms: u32) -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::new(duration_ms)
            .keyframe(0.0, KeyframeProperties::opacity(0.0), Easing::Linear)
            .keyframe(1.0, KeyframeProperties::opacity(1.0), Easing::CSS_EASE_OUT)
    }

    /// Fade in while rising `distance` pixels into place
    pub fn fade_in_up(duration_ms: u32, distance: f32) -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::new(duration_ms)
            .keyframe(
                0.0,
                KeyframeProperties::opacity(0.0).with_translate_y(distance),
                Easing::Linear,
            )
            .keyframe(
                1.0,
                KeyframeProperties::opacity(1.0).with_translate_y(0.0),
                Easing::CSS_EASE_OUT,
            )
    }

    // ========================================================================
    // Scale animations
    // ========================================================================

    /// Scale up from 80% with fade
    pub fn scale_in(duration_ms: u32) -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::new(duration_ms)
            .keyframe(
                0.0,
                KeyframeProperties::opacity(0.0).with_scale(0.8),
                Easing::Linear,
            )
            .keyframe(
                1.0,
                KeyframeProperties::opacity(1.0).with_scale(1.0),
                Easing::CSS_EASE,
            )
    }

    /// Scale down to 80% with fade
    pub fn scale_out(duration_ms: u32) -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::new(duration_ms)
            .keyframe(
                0.0,
                KeyframeProperties::opacity(1.0).with_scale(1.0),
                Easing::Linear,
            )
            .keyframe(
                1.0,
                KeyframeProperties::opacity(0.0).with_scale(0.8),
                Easing::CSS_EASE,
            )
    }

    // ========================================================================
    // Slide animations
    // ========================================================================

    /// Slide in from `distance` pixels to the right
    pub fn slide_in_right(duration_ms: u32, distance: f32) -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::new(duration_ms)
            .keyframe(
                0.0,
                KeyframeProperties::default().with_translate_x(distance),
                Easing::Linear,
            )
            .keyframe(
                1.0,
                KeyframeProperties::default().with_translate_x(0.0),
                Easing::CSS_EASE,
            )
    }

    /// Slide out `distance` pixels to the right
    pub fn slide_out_right(duration_ms: u32, distance: f32) -> MultiKeyframeAnimation {
        MultiKeyframeAnimation::new(duration_ms)
            .keyframe(
                0.0,
                KeyframeProperties::default().with_translate_x(0.0),
                Easing::Linear,
            )
            .keyframe(
                1.0,
                KeyframeProperties::default().with_translate_x(distance),
                Easing::CSS_EASE,
            )
    }

    // ========================================================================
    // Single-value animations
    // ========================================================================

    /// Grow a bar from 0% to `percent`
    pub fn width_grow(duration_ms: u32, percent: f32) -> KeyframeAnimation {
        KeyframeAnimation::tween(duration_ms, 0.0, percent.clamp(0.0, 100.0), Easing::CSS_EASE_OUT)
    }

    /// Smooth scroll between two document offsets
    pub fn smooth_scroll(
        duration_ms: u32,
        from: f32,
        to: f32,
        easing: Easing,
    ) -> KeyframeAnimation {
        KeyframeAnimation::tween(duration_ms, from, to, easing)
    }
}
