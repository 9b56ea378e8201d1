//! Keyframe animations
//!
//! Single-value animations drive numeric properties such as a skill bar's
//! width or the scroll position. Multi-property animations drive the
//! `opacity` and `transform` pair used by every entrance and exit effect.

use crate::easing::Easing;

/// A single keyframe in a single-value animation
#[derive(Clone, Debug)]
pub struct Keyframe {
    /// Time position (0.0 to 1.0)
    pub time: f32,
    pub value: f32,
    /// Easing used when transitioning TO this keyframe
    pub easing: Easing,
}

/// Fill mode determines the animated value before/after playback
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillMode {
    /// Animated properties are cleared once playback ends
    None,
    /// Hold the final keyframe after playback
    #[default]
    Forwards,
    /// Apply the first keyframe during the delay
    Backwards,
    Both,
}

impl FillMode {
    fn holds_end(self) -> bool {
        matches!(self, FillMode::Forwards | FillMode::Both)
    }

    fn holds_start(self) -> bool {
        matches!(self, FillMode::Backwards | FillMode::Both)
    }
}

/// Shared clock for both animation kinds: delay and completion
#[derive(Clone, Debug)]
struct Playback {
    duration_ms: u32,
    delay_ms: u32,
    /// Negative while the delay is running
    current_time: f32,
    playing: bool,
    finished: bool,
}

impl Playback {
    fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            delay_ms: 0,
            current_time: 0.0,
            playing: false,
            finished: false,
        }
    }

    fn start(&mut self) {
        self.current_time = -(self.delay_ms as f32);
        self.playing = true;
        self.finished = false;
    }

    fn in_delay(&self) -> bool {
        self.current_time < 0.0
    }

    fn progress(&self) -> f32 {
        if self.in_delay() {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.current_time / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    fn tick(&mut self, dt_ms: f32) {
        if !self.playing {
            return;
        }
        self.current_time += dt_ms;

        let duration = self.duration_ms as f32;
        if self.current_time >= duration {
            self.current_time = duration;
            self.playing = false;
            self.finished = true;
        }
    }
}

/// Locate the keyframe pair around `progress` and the eased local fraction
fn segment<K>(
    keyframes: &[K],
    progress: f32,
    time: impl Fn(&K) -> f32,
    easing: impl Fn(&K) -> Easing,
) -> Option<(usize, usize, f32)> {
    if keyframes.is_empty() {
        return None;
    }
    let mut prev = 0;
    let mut next = 0;
    for (i, kf) in keyframes.iter().enumerate() {
        if time(kf) <= progress {
            prev = i;
        }
        if time(kf) >= progress {
            next = i;
            break;
        }
        next = i;
    }

    let (t0, t1) = (time(&keyframes[prev]), time(&keyframes[next]));
    if (t1 - t0).abs() < f32::EPSILON {
        return Some((prev, prev, 0.0));
    }
    let local = (progress - t0) / (t1 - t0);
    Some((prev, next, easing(&keyframes[next]).apply(local)))
}

/// A keyframe-based animation (single value)
#[derive(Clone, Debug)]
pub struct KeyframeAnimation {
    keyframes: Vec<Keyframe>,
    playback: Playback,
    fill_mode: FillMode,
}

impl KeyframeAnimation {
    pub fn new(duration_ms: u32, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keyframes,
            playback: Playback::new(duration_ms),
            fill_mode: FillMode::Forwards,
        }
    }

    /// Two-keyframe tween from `from` to `to`
    pub fn tween(duration_ms: u32, from: f32, to: f32, easing: Easing) -> Self {
        Self::new(
            duration_ms,
            vec![
                Keyframe {
                    time: 0.0,
                    value: from,
                    easing: Easing::Linear,
                },
                Keyframe {
                    time: 1.0,
                    value: to,
                    easing,
                },
            ],
        )
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.playback.delay_ms = delay_ms;
        self
    }

    pub fn fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    pub fn start(&mut self) {
        self.playback.start();
    }

    pub fn stop(&mut self) {
        self.playback.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playback.playing
    }

    pub fn is_finished(&self) -> bool {
        self.playback.finished
    }

    /// Still waiting out the start delay
    pub fn in_delay(&self) -> bool {
        self.playback.in_delay()
    }

    pub fn progress(&self) -> f32 {
        self.playback.progress()
    }

    pub fn fill(&self) -> FillMode {
        self.fill_mode
    }

    /// Whether the final value should persist once playback ends
    pub fn holds_end(&self) -> bool {
        self.fill_mode.holds_end()
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        self.sample_at(self.progress())
    }

    pub fn sample_at(&self, progress: f32) -> f32 {
        match segment(&self.keyframes, progress.clamp(0.0, 1.0), |k| k.time, |k| k.easing) {
            Some((prev, next, eased)) => {
                let a = self.keyframes[prev].value;
                let b = self.keyframes[next].value;
                a + (b - a) * eased
            }
            None => 0.0,
        }
    }

    /// Advance by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        self.playback.tick(dt_ms);
    }

    pub fn duration_ms(&self) -> u32 {
        self.playback.duration_ms
    }

    pub fn total_duration_ms(&self) -> u32 {
        self.playback.delay_ms + self.playback.duration_ms
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }
}

// ============================================================================
// Multi-Property Keyframe Animation
// ============================================================================

/// Properties animated together by entrance and exit effects
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeProperties {
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f32>,
    /// Uniform scale factor
    pub scale: Option<f32>,
    /// Translation X in pixels
    pub translate_x: Option<f32>,
    /// Translation Y in pixels
    pub translate_y: Option<f32>,
}

impl KeyframeProperties {
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn with_scale(mut self, value: f32) -> Self {
        self.scale = Some(value);
        self
    }

    pub fn with_translate_x(mut self, px: f32) -> Self {
        self.translate_x = Some(px);
        self
    }

    pub fn with_translate_y(mut self, px: f32) -> Self {
        self.translate_y = Some(px);
        self
    }

    /// Interpolate between two property sets
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            scale: lerp_opt(self.scale, other.scale, t),
            translate_x: lerp_opt(self.translate_x, other.translate_x, t),
            translate_y: lerp_opt(self.translate_y, other.translate_y, t),
        }
    }

    /// The CSS `opacity` value, if animated
    pub fn opacity_css(&self) -> Option<String> {
        self.opacity.map(css_number)
    }

    /// The CSS `transform` value, if any transform property is animated
    ///
    /// Produces the same forms the markup uses: `translateY(30px)`,
    /// `translateX(0)`, `scale(0.8)`.
    pub fn transform_css(&self) -> Option<String> {
        let mut parts = Vec::new();
        match (self.translate_x, self.translate_y) {
            (Some(x), Some(y)) => parts.push(format!("translate({}, {})", css_px(x), css_px(y))),
            (Some(x), None) => parts.push(format!("translateX({})", css_px(x))),
            (None, Some(y)) => parts.push(format!("translateY({})", css_px(y))),
            (None, None) => {}
        }
        if let Some(scale) = self.scale {
            parts.push(format!("scale({})", css_number(scale)));
        }
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Format a number for CSS, trimming float noise (`1`, `0.5`, `0.333`)
pub fn css_number(value: f32) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        // avoid "-0"
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Format a pixel length, with bare `0` for zero
pub fn css_px(value: f32) -> String {
    match css_number(value).as_str() {
        "0" => "0".to_string(),
        n => format!("{n}px"),
    }
}

/// A keyframe with multiple animated properties
#[derive(Clone, Debug)]
pub struct MultiKeyframe {
    /// Time position (0.0 to 1.0)
    pub time: f32,
    pub properties: KeyframeProperties,
    /// Easing used when transitioning TO this keyframe
    pub easing: Easing,
}

/// Multi-property keyframe animation
#[derive(Clone, Debug)]
pub struct MultiKeyframeAnimation {
    keyframes: Vec<MultiKeyframe>,
    playback: Playback,
    fill_mode: FillMode,
}

impl MultiKeyframeAnimation {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            keyframes: Vec::new(),
            playback: Playback::new(duration_ms),
            fill_mode: FillMode::Forwards,
        }
    }

    /// Add a keyframe (kept sorted by time)
    pub fn keyframe(mut self, time: f32, properties: KeyframeProperties, easing: Easing) -> Self {
        self.keyframes.push(MultiKeyframe {
            time,
            properties,
            easing,
        });
        self.keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        self
    }

    pub fn fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = fill_mode;
        self
    }

    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.playback.delay_ms = delay_ms;
        self
    }

    pub fn start(&mut self) {
        self.playback.start();
    }

    pub fn stop(&mut self) {
        self.playback.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playback.playing
    }

    pub fn is_finished(&self) -> bool {
        self.playback.finished
    }

    pub fn in_delay(&self) -> bool {
        self.playback.in_delay()
    }

    pub fn progress(&self) -> f32 {
        self.playback.progress()
    }

    pub fn fill(&self) -> FillMode {
        self.fill_mode
    }

    /// Properties to apply right now, `None` when nothing should be written
    /// (delay without backwards fill).
    pub fn current_properties(&self) -> Option<KeyframeProperties> {
        if self.playback.in_delay() {
            return self
                .fill_mode
                .holds_start()
                .then(|| self.sample_at(0.0));
        }
        Some(self.sample_at(self.progress()))
    }

    /// Whether the final frame should persist once playback ends
    pub fn holds_end(&self) -> bool {
        self.fill_mode.holds_end()
    }

    pub fn sample_at(&self, progress: f32) -> KeyframeProperties {
        match segment(&self.keyframes, progress.clamp(0.0, 1.0), |k| k.time, |k| k.easing) {
            Some((prev, next, eased)) => self.keyframes[prev]
                .properties
                .lerp(&self.keyframes[next].properties, eased),
            None => KeyframeProperties::default(),
        }
    }

    pub fn tick(&mut self, dt_ms: f32) {
        self.playback.tick(dt_ms);
    }

    pub fn duration_ms(&self) -> u32 {
        self.playback.duration_ms
    }

    pub fn total_duration_ms(&self) -> u32 {
        self.playback.delay_ms + self.playback.duration_ms
    }

    pub fn keyframes(&self) -> &[MultiKeyframe] {
        &self.keyframes
    }
}

impl Default for MultiKeyframeAnimation {
    fn default() -> Self {
        Self::new(300)
    }
}
