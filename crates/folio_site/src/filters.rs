//! Project category filters

use folio_animation::{Animation, AnimationPreset, AnimationTarget};
use folio_core::{ElementId, TimerId};
use rustc_hash::FxHashMap;

use crate::config::FilterConfig;
use crate::context::{Runtime, Task};
use crate::error::Result;

/// `data-filter` value that matches every card
pub const FILTER_ALL: &str = "all";
const FILTERED_CLASS: &str = "filtered-out";
const ACTIVE_CLASS: &str = "active";

pub struct ProjectFilters {
    buttons: Vec<ElementId>,
    cards: Vec<ElementId>,
    config: FilterConfig,
    /// Cards scaling out, waiting to be taken out of the layout
    hiding: FxHashMap<ElementId, TimerId>,
    current: String,
}

impl ProjectFilters {
    pub fn setup(rt: &mut Runtime, config: &FilterConfig) -> Result<Self> {
        let buttons = rt.select_all(&config.button_selector)?;
        let cards = rt.select_all(&config.card_selector)?;
        tracing::debug!("filters: {} buttons, {} cards", buttons.len(), cards.len());
        Ok(Self {
            buttons,
            cards,
            config: config.clone(),
            hiding: FxHashMap::default(),
            current: FILTER_ALL.to_string(),
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Cards currently matching the filter
    pub fn visible_cards(&self, rt: &Runtime) -> Vec<ElementId> {
        self.cards
            .iter()
            .copied()
            .filter(|card| !rt.page.has_class(*card, FILTERED_CLASS))
            .collect()
    }

    pub fn click(&mut self, rt: &mut Runtime, target: ElementId) -> bool {
        let Some(button) = self.buttons.iter().copied().find(|b| rt.hit(*b, target)) else {
            return false;
        };
        for other in &self.buttons {
            rt.page.remove_class(*other, ACTIVE_CLASS);
        }
        rt.page.add_class(button, ACTIVE_CLASS);

        let filter = rt
            .page
            .attribute(button, "data-filter")
            .unwrap_or(FILTER_ALL)
            .to_string();
        self.apply(rt, &filter);
        true
    }

    pub fn apply(&mut self, rt: &mut Runtime, filter: &str) {
        for card in self.cards.clone() {
            let matches = filter == FILTER_ALL
                || rt.page.attribute(card, "data-category") == Some(filter);
            if matches {
                self.show(rt, card);
            } else {
                self.hide(rt, card);
            }
        }
        tracing::debug!("filter `{filter}` applied");
        self.current = filter.to_string();
    }

    fn show(&mut self, rt: &mut Runtime, card: ElementId) {
        if let Some(timer) = self.hiding.remove(&card) {
            rt.timers.cancel(timer);
        }
        let was_hidden = rt.page.has_class(card, FILTERED_CLASS);
        rt.page.remove_class(card, FILTERED_CLASS);
        rt.page.set_style(card, "display", "block");
        if was_hidden {
            rt.animations.start(
                AnimationTarget::Element(card),
                Animation::Visual(AnimationPreset::scale_in(self.config.animation_ms)),
                &mut rt.page,
            );
        }
    }

    fn hide(&mut self, rt: &mut Runtime, card: ElementId) {
        if rt.page.has_class(card, FILTERED_CLASS) {
            return;
        }
        rt.page.add_class(card, FILTERED_CLASS);
        rt.animations.start(
            AnimationTarget::Element(card),
            Animation::Visual(AnimationPreset::scale_out(self.config.animation_ms)),
            &mut rt.page,
        );
        let timer = rt.schedule(self.config.hide_after_ms, Task::HideCard(card));
        self.hiding.insert(card, timer);
    }

    /// The hide delay elapsed: take the card out of the layout
    pub fn finish_hide(&mut self, rt: &mut Runtime, card: ElementId) {
        if self.hiding.remove(&card).is_some() {
            rt.page.set_style(card, "display", "none");
        }
    }
}
