//! Viewport-triggered effects
//!
//! Three observers share the same shape: watch a set of elements and act
//! when one crosses its threshold. Whether an element fires once or every
//! time it re-enters is an explicit flag on each configuration.

use folio_animation::{Animation, AnimationPreset, AnimationTarget};
use folio_core::{ElementId, IntersectionObserver, ObserverOptions, RootMargin};
use rustc_hash::FxHashSet;

use crate::config::{LazyImageConfig, RevealConfig, SkillBarConfig};
use crate::context::Runtime;
use crate::error::{Result, SiteError};

fn parse_margin(name: &str, value: &str) -> Result<RootMargin> {
    value
        .parse::<RootMargin>()
        .map_err(|e| SiteError::InvalidConfig(format!("{name}: {e}")))
}

/// Fade-in-up reveal of section content
pub struct RevealAnimator {
    observer: IntersectionObserver,
    config: RevealConfig,
    revealed: FxHashSet<ElementId>,
}

impl RevealAnimator {
    pub fn setup(rt: &mut Runtime, config: &RevealConfig) -> Result<Self> {
        let margin = parse_margin("reveal.root_margin", &config.root_margin)?;
        let mut observer =
            IntersectionObserver::new(ObserverOptions::new(config.threshold, margin));
        let targets = rt.select_all(&config.selector)?;
        for &element in &targets {
            Self::conceal(rt, config, element);
            observer.observe(element);
        }
        tracing::debug!("reveal: observing {} elements", targets.len());
        Ok(Self {
            observer,
            config: config.clone(),
            revealed: FxHashSet::default(),
        })
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.revealed.contains(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.observer.observed_count()
    }

    pub fn update(&mut self, rt: &mut Runtime) {
        for entry in self.observer.check(&rt.page) {
            let element = entry.target;
            if entry.is_intersecting {
                if !self.revealed.insert(element) {
                    continue;
                }
                rt.page.add_class(element, &self.config.class);
                rt.animations.start(
                    AnimationTarget::Element(element),
                    Animation::Visual(AnimationPreset::fade_in_up(
                        self.config.duration_ms,
                        self.config.distance,
                    )),
                    &mut rt.page,
                );
                if self.config.once {
                    self.observer.unobserve(element);
                }
                tracing::trace!("revealed {:?}", element);
            } else if self.revealed.remove(&element) {
                // repeatable reveals hide again on exit
                rt.animations.cancel_target(AnimationTarget::Element(element));
                rt.page.remove_class(element, &self.config.class);
                Self::conceal(rt, &self.config, element);
            }
        }
    }

    fn conceal(rt: &mut Runtime, config: &RevealConfig, element: ElementId) {
        rt.page.set_style(element, "opacity", "0");
        rt.page.set_style(
            element,
            "transform",
            &format!("translateY({}px)", folio_animation::keyframe::css_number(config.distance)),
        );
    }
}

/// Percentage-width skill bars
pub struct SkillBars {
    observer: IntersectionObserver,
    config: SkillBarConfig,
    targets: Vec<(ElementId, f32)>,
    played: FxHashSet<ElementId>,
}

impl SkillBars {
    pub fn setup(rt: &mut Runtime, config: &SkillBarConfig) -> Result<Self> {
        let mut observer =
            IntersectionObserver::new(ObserverOptions::new(config.threshold, RootMargin::ZERO));
        let mut targets = Vec::new();
        for bar in rt.select_all(&config.selector)? {
            match Self::target_percent(rt, config, bar) {
                Some(percent) => {
                    targets.push((bar, percent));
                    observer.observe(bar);
                }
                None => tracing::warn!("skill bar {:?} has no target percentage", bar),
            }
        }
        tracing::debug!("skill bars: {} observed", targets.len());
        Ok(Self {
            observer,
            config: config.clone(),
            targets,
            played: FxHashSet::default(),
        })
    }

    /// Target from the configured attribute, falling back to `--progress`
    fn target_percent(rt: &Runtime, config: &SkillBarConfig, bar: ElementId) -> Option<f32> {
        rt.page
            .attribute(bar, &config.attribute)
            .or_else(|| rt.page.style(bar, "--progress"))
            .and_then(|raw| raw.trim().trim_end_matches('%').trim().parse::<f32>().ok())
            .map(|percent| percent.clamp(0.0, 100.0))
    }

    pub fn target(&self, bar: ElementId) -> Option<f32> {
        self.targets
            .iter()
            .find(|(id, _)| *id == bar)
            .map(|(_, percent)| *percent)
    }

    /// Bars that have started animating at least once
    pub fn played_count(&self) -> usize {
        self.played.len()
    }

    pub fn update(&mut self, rt: &mut Runtime) {
        for entry in self.observer.check(&rt.page) {
            let bar = entry.target;
            if !entry.is_intersecting {
                // repeatable bars empty out so the next entry grows them again
                if self.played.contains(&bar) {
                    rt.animations.cancel_target(AnimationTarget::Element(bar));
                    rt.page.set_style(bar, "width", "0%");
                }
                continue;
            }
            let Some(percent) = self.target(bar) else {
                continue;
            };
            rt.page.set_style(bar, "width", "0%");
            rt.animations.start(
                AnimationTarget::Element(bar),
                Animation::WidthPercent(
                    AnimationPreset::width_grow(self.config.duration_ms, percent)
                        .delay(self.config.delay_ms),
                ),
                &mut rt.page,
            );
            self.played.insert(bar);
            if self.config.once {
                self.observer.unobserve(bar);
            }
        }
    }
}

/// Deferred `img[data-src]` loading
pub struct LazyImages {
    observer: IntersectionObserver,
}

impl LazyImages {
    pub fn setup(rt: &mut Runtime, config: &LazyImageConfig) -> Result<Self> {
        let mut observer = IntersectionObserver::new(ObserverOptions::default());
        for image in rt.select_all(&config.selector)? {
            observer.observe(image);
        }
        Ok(Self { observer })
    }

    /// Images still waiting to load
    pub fn pending(&self) -> usize {
        self.observer.observed_count()
    }

    pub fn update(&mut self, rt: &mut Runtime) {
        for entry in self.observer.check(&rt.page) {
            if !entry.is_intersecting {
                continue;
            }
            let image = entry.target;
            if let Some(src) = rt.page.attribute(image, "data-src").map(str::to_string) {
                rt.page.set_attribute(image, "src", &src);
            }
            rt.page.remove_class(image, "lazy");
            self.observer.unobserve(image);
            tracing::trace!("lazy image {:?} loaded", image);
        }
    }
}
