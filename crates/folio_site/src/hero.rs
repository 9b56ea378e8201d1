//! Hero section: staggered entrance on load and the optional typing effect

use folio_animation::{Animation, AnimationPreset, AnimationTarget, FillMode};
use folio_core::ElementId;

use crate::config::{HeroConfig, TypingConfig};
use crate::context::{Runtime, Task};
use crate::error::Result;

const TYPING_FEATURE: &str = "typing-effect";

pub struct HeroEntrance {
    elements: Vec<ElementId>,
    config: HeroConfig,
    played: bool,
}

impl HeroEntrance {
    /// Hero elements start transparent and lowered until the page loads
    pub fn setup(rt: &mut Runtime, config: &HeroConfig) -> Result<Self> {
        let elements = rt.select_all(&config.selector)?;
        let offset = format!(
            "translateY({}px)",
            folio_animation::keyframe::css_number(config.distance)
        );
        for &element in &elements {
            rt.page.set_style(element, "opacity", "0");
            rt.page.set_style(element, "transform", &offset);
        }
        Ok(Self {
            elements,
            config: config.clone(),
            played: false,
        })
    }

    pub fn has_played(&self) -> bool {
        self.played
    }

    /// Mark the body loaded and fade the hero elements in, each one
    /// `stagger_ms` after the previous
    pub fn load(&mut self, rt: &mut Runtime) {
        if self.played {
            return;
        }
        self.played = true;
        let body = rt.page.body();
        rt.page.add_class(body, &self.config.loaded_class);

        for (index, &element) in self.elements.iter().enumerate() {
            let delay = index as u32 * self.config.stagger_ms;
            rt.animations.start(
                AnimationTarget::Element(element),
                Animation::Visual(
                    AnimationPreset::fade_in_up(self.config.duration_ms, self.config.distance)
                        .delay(delay)
                        .fill_mode(FillMode::Both),
                ),
                &mut rt.page,
            );
        }
        tracing::debug!("hero entrance: {} elements", self.elements.len());
    }
}

/// Retypes the hero highlight one character at a time
pub struct TypingEffect {
    element: ElementId,
    text: Vec<char>,
    typed: usize,
    config: TypingConfig,
}

impl TypingEffect {
    pub fn setup(rt: &mut Runtime, config: &TypingConfig) -> Result<Self> {
        let element = rt.require(TYPING_FEATURE, &config.selector)?;
        let text = rt.page.text(element).unwrap_or_default().chars().collect();
        Ok(Self {
            element,
            text,
            typed: 0,
            config: config.clone(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.typed >= self.text.len()
    }

    /// Clear the text and start typing after the initial delay
    pub fn start(&mut self, rt: &mut Runtime) {
        self.typed = 0;
        rt.page.set_text(self.element, "");
        rt.schedule(self.config.start_delay_ms, Task::TypeNextChar);
    }

    pub fn type_next(&mut self, rt: &mut Runtime) {
        if self.is_complete() {
            return;
        }
        self.typed += 1;
        let shown: String = self.text[..self.typed].iter().collect();
        rt.page.set_text(self.element, &shown);
        if !self.is_complete() {
            rt.schedule(self.config.char_ms, Task::TypeNextChar);
        }
    }
}
