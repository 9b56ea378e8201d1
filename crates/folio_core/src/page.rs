//! Headless page tree
//!
//! An in-memory stand-in for the document: elements with ids, classes,
//! attributes, inline styles, text and a document-space vertical rect, plus
//! the viewport that scrolls over them. Controllers only ever touch the page
//! from the single UI thread that owns it, so nothing here is synchronized.
//!
//! Every mutator tolerates stale handles: operating on an element that has
//! been removed is a silent no-op, matching the guarded DOM access the page
//! scripts rely on.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::error::{CoreError, Result};
use crate::selector::{ComplexSelector, CompoundSelector, SelectorList, SelectorPart};

new_key_type! {
    /// Handle to an element in a [`Page`]
    pub struct ElementId;
}

/// Vertical extent of an element in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Visible window onto the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// A single element node
#[derive(Clone, Debug, Default)]
pub struct Element {
    tag: String,
    dom_id: Option<String>,
    classes: SmallVec<[String; 4]>,
    attributes: FxHashMap<String, String>,
    style: FxHashMap<String, String>,
    text: String,
    rect: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn dom_id(&self) -> Option<&str> {
        self.dom_id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Attribute lookup; `id` resolves to the DOM id
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.dom_id(),
            _ => self.attributes.get(name).map(String::as_str),
        }
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    fn matches_compound(&self, compound: &CompoundSelector) -> bool {
        compound.parts.iter().all(|part| match part {
            SelectorPart::Universal => true,
            SelectorPart::Tag(tag) => &self.tag == tag,
            SelectorPart::Id(id) => self.dom_id.as_deref() == Some(id.as_str()),
            SelectorPart::Class(class) => self.has_class(class),
            SelectorPart::Attribute { name, op } => {
                let joined;
                let actual = if name == "class" {
                    if self.classes.is_empty() {
                        None
                    } else {
                        joined = self.classes.join(" ");
                        Some(joined.as_str())
                    }
                } else {
                    self.attribute(name)
                };
                match (actual, op) {
                    (None, _) => false,
                    (Some(_), None) => true,
                    (Some(actual), Some((op, expected))) => op.matches(actual, expected),
                }
            }
        })
    }
}

/// The document: element tree, id index and viewport
pub struct Page {
    elements: SlotMap<ElementId, Element>,
    ids: FxHashMap<String, ElementId>,
    root: ElementId,
    body: ElementId,
    viewport: Viewport,
    document_height: f32,
}

impl Page {
    /// Create an empty page (`html` > `body`) with the given viewport size
    pub fn new(width: f32, height: f32) -> Self {
        let mut elements = SlotMap::with_key();
        let root = elements.insert(Element::new("html"));
        let body = elements.insert(Element::new("body"));
        elements[root].children.push(body);
        elements[body].parent = Some(root);

        Self {
            elements,
            ids: FxHashMap::default(),
            root,
            body,
            viewport: Viewport {
                scroll_y: 0.0,
                width,
                height,
            },
            document_height: height,
        }
    }

    /// The document element (`html`)
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn exists(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    // ========== Viewport ==========

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.viewport.scroll_y
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }

    pub fn set_document_height(&mut self, height: f32) {
        self.document_height = height.max(self.viewport.height);
        self.viewport.scroll_y = self.viewport.scroll_y.min(self.max_scroll());
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.document_height = self.document_height.max(height);
        self.viewport.scroll_y = self.viewport.scroll_y.min(self.max_scroll());
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f32 {
        (self.document_height - self.viewport.height).max(0.0)
    }

    /// Jump the viewport to `y`, clamped to the scrollable range.
    ///
    /// Returns the offset actually applied.
    pub fn scroll_to(&mut self, y: f32) -> f32 {
        let clamped = y.clamp(0.0, self.max_scroll());
        self.viewport.scroll_y = clamped;
        clamped
    }

    // ========== Tree construction ==========

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        self.elements.insert(Element::new(tag))
    }

    /// Create an element appended to `parent` and return a builder for it
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementBuilder<'_> {
        let id = self.create_element(tag);
        // A stale parent leaves the element detached; callers that care use append_child
        let _ = self.append_child(parent, id);
        ElementBuilder { page: self, id }
    }

    /// Move `child` under `parent` as its last child. Fails when `parent`
    /// is `child` or lies inside its subtree.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if !self.exists(parent) || !self.exists(child) {
            return Err(CoreError::StaleElement);
        }
        if self.contains(child, parent) {
            return Err(CoreError::HierarchyRequest);
        }
        self.detach(child);
        self.elements[parent].children.push(child);
        self.elements[child].parent = Some(parent);
        Ok(())
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.elements.get(id).and_then(|e| e.parent) {
            if let Some(parent) = self.elements.get_mut(parent) {
                parent.children.retain(|c| *c != id);
            }
        }
        if let Some(element) = self.elements.get_mut(id) {
            element.parent = None;
        }
    }

    /// Remove an element and its subtree. Returns false for stale handles and
    /// for the root and body, which cannot be removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || id == self.body || !self.exists(id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements.remove(current) {
                if let Some(dom_id) = element.dom_id {
                    if self.ids.get(&dom_id) == Some(&current) {
                        self.ids.remove(&dom_id);
                    }
                }
                stack.extend(element.children);
            }
        }
        true
    }

    // ========== Lookup ==========

    /// `getElementById`
    pub fn get_by_id(&self, dom_id: &str) -> Option<ElementId> {
        self.ids.get(dom_id).copied()
    }

    /// First element in document order matching `selector`
    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.select_first(&list))
    }

    /// All elements in document order matching `selector`
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementId>> {
        let list = SelectorList::parse(selector)?;
        Ok(self.select_all(&list))
    }

    pub fn select_first(&self, list: &SelectorList) -> Option<ElementId> {
        self.document_order()
            .into_iter()
            .find(|id| self.matches(*id, list))
    }

    pub fn select_all(&self, list: &SelectorList) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|id| self.matches(*id, list))
            .collect()
    }

    /// Whether the element matches any selector in the list
    pub fn matches(&self, id: ElementId, list: &SelectorList) -> bool {
        list.selectors
            .iter()
            .any(|selector| self.matches_complex(id, selector))
    }

    fn matches_complex(&self, id: ElementId, selector: &ComplexSelector) -> bool {
        let Some(element) = self.elements.get(id) else {
            return false;
        };
        if !element.matches_compound(selector.subject()) {
            return false;
        }

        // Walk ancestors, consuming ancestor compounds from right to left
        let ancestors = &selector.compounds[..selector.compounds.len() - 1];
        let mut remaining = ancestors.len();
        let mut cursor = element.parent;
        while remaining > 0 {
            let Some(ancestor) = cursor.and_then(|id| self.elements.get(id)) else {
                break;
            };
            if ancestor.matches_compound(&ancestors[remaining - 1]) {
                remaining -= 1;
            }
            cursor = ancestor.parent;
        }
        remaining == 0
    }

    /// Nearest inclusive ancestor matching the selector list
    pub fn closest(&self, id: ElementId, list: &SelectorList) -> Option<ElementId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.matches(current, list) {
                return Some(current);
            }
            cursor = self.elements.get(current).and_then(|e| e.parent);
        }
        None
    }

    /// Inclusive descendant check, like `Node.contains`
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.elements.get(current).and_then(|e| e.parent);
        }
        false
    }

    /// All attached elements in pre-order starting at the root
    pub fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.elements.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(element) = self.elements.get(id) else {
                continue;
            };
            order.push(id);
            stack.extend(element.children.iter().rev().copied());
        }
        order
    }

    // ========== Classes ==========

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements
            .get(id)
            .map(|e| e.has_class(class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: ElementId, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.classes.retain(|c| c != class);
        }
    }

    /// Toggle a class, returning whether it is now present
    pub fn toggle_class(&mut self, id: ElementId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.exists(id)
        }
    }

    // ========== Attributes ==========

    pub fn attribute(&self, id: ElementId, name: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.attribute(name))
    }

    /// Set an attribute. `id` re-indexes the element, `class` replaces the
    /// class list.
    pub fn set_attribute(&mut self, id: ElementId, name: &str, value: &str) {
        if !self.exists(id) {
            return;
        }
        match name {
            "id" => self.set_dom_id(id, Some(value)),
            "class" => {
                let element = &mut self.elements[id];
                element.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {
                self.elements[id]
                    .attributes
                    .insert(name.to_string(), value.to_string());
            }
        }
    }

    pub fn remove_attribute(&mut self, id: ElementId, name: &str) {
        match name {
            "id" => self.set_dom_id(id, None),
            "class" => {
                if let Some(element) = self.elements.get_mut(id) {
                    element.classes.clear();
                }
            }
            _ => {
                if let Some(element) = self.elements.get_mut(id) {
                    element.attributes.remove(name);
                }
            }
        }
    }

    fn set_dom_id(&mut self, id: ElementId, dom_id: Option<&str>) {
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        if let Some(old) = element.dom_id.take() {
            if self.ids.get(&old) == Some(&id) {
                self.ids.remove(&old);
            }
        }
        if let Some(new_id) = dom_id {
            element.dom_id = Some(new_id.to_string());
            self.ids.insert(new_id.to_string(), id);
        }
    }

    // ========== Inline style ==========

    pub fn style(&self, id: ElementId, property: &str) -> Option<&str> {
        self.elements.get(id).and_then(|e| e.style(property))
    }

    pub fn set_style(&mut self, id: ElementId, property: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element
                .style
                .insert(property.to_string(), value.to_string());
        }
    }

    pub fn remove_style(&mut self, id: ElementId, property: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.style.remove(property);
        }
    }

    // ========== Text and geometry ==========

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(id).map(|e| e.text.as_str())
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.text = text.to_string();
        }
    }

    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.elements.get(id).map(|e| e.rect)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(element) = self.elements.get_mut(id) {
            element.rect = rect;
        }
    }

    /// Form control value (the `value` attribute), empty when unset
    pub fn value(&self, id: ElementId) -> &str {
        self.attribute(id, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, id: ElementId, value: &str) {
        self.set_attribute(id, "value", value);
    }
}

impl Default for Page {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self::new(viewport.width, viewport.height)
    }
}

/// Fluent construction of a freshly appended element
pub struct ElementBuilder<'p> {
    page: &'p mut Page,
    id: ElementId,
}

impl ElementBuilder<'_> {
    pub fn id(self, dom_id: &str) -> Self {
        self.page.set_dom_id(self.id, Some(dom_id));
        self
    }

    pub fn class(self, class: &str) -> Self {
        for class in class.split_whitespace() {
            self.page.add_class(self.id, class);
        }
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.page.set_attribute(self.id, name, value);
        self
    }

    pub fn style(self, property: &str, value: &str) -> Self {
        self.page.set_style(self.id, property, value);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.page.set_text(self.id, text);
        self
    }

    pub fn rect(self, top: f32, height: f32) -> Self {
        self.page.set_rect(self.id, Rect::new(top, height));
        self
    }

    /// Finish building and return the element handle
    pub fn finish(self) -> ElementId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> (Page, ElementId, ElementId) {
        let mut page = Page::new(1280.0, 800.0);
        let body = page.body();
        let nav = page.append(body, "ul").id("nav-menu").class("nav-menu").finish();
        page.append(nav, "a")
            .class("nav-link active")
            .attr("href", "#home")
            .finish();
        let about_link = page
            .append(nav, "a")
            .class("nav-link")
            .attr("href", "#about")
            .finish();
        page.append(body, "section")
            .id("about")
            .rect(800.0, 600.0)
            .finish();
        (page, nav, about_link)
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let (mut page, nav, about_link) = sample_page();
        let body = page.body();

        assert!(matches!(
            page.append_child(about_link, nav),
            Err(CoreError::HierarchyRequest)
        ));
        assert!(matches!(
            page.append_child(nav, nav),
            Err(CoreError::HierarchyRequest)
        ));
        assert!(page.contains(nav, about_link));
        assert!(page.contains(body, nav));

        // moving a subtree elsewhere is still fine
        let footer = page.append(body, "footer").finish();
        page.append_child(footer, nav).unwrap();
        assert!(page.contains(footer, about_link));
        assert_eq!(page.query_selector_all(".nav-link").unwrap().len(), 2);
    }

    #[test]
    fn test_get_by_id_and_query() {
        let (page, nav, about_link) = sample_page();
        assert_eq!(page.get_by_id("nav-menu"), Some(nav));
        assert_eq!(page.query_selector_all(".nav-link").unwrap().len(), 2);
        assert_eq!(
            page.query_selector(r##".nav-link[href="#about"]"##).unwrap(),
            Some(about_link)
        );
        assert!(page
            .query_selector("#nav-menu a[href^='#']")
            .unwrap()
            .is_some());
        assert!(page.query_selector("section[id]").unwrap().is_some());
        assert!(page.query_selector("#missing").unwrap().is_none());
    }

    #[test]
    fn test_descendant_requires_ancestor() {
        let (mut page, _, _) = sample_page();
        let body = page.body();
        page.append(body, "a").attr("href", "#stray").finish();
        assert_eq!(page.query_selector_all("#nav-menu a").unwrap().len(), 2);
        assert_eq!(page.query_selector_all("a").unwrap().len(), 3);
    }

    #[test]
    fn test_class_operations() {
        let (mut page, nav, _) = sample_page();
        assert!(page.toggle_class(nav, "active"));
        assert!(page.has_class(nav, "active"));
        assert!(!page.toggle_class(nav, "active"));
        assert!(!page.has_class(nav, "active"));

        page.add_class(nav, "open");
        page.add_class(nav, "open");
        assert_eq!(page.get(nav).unwrap().classes(), &["nav-menu", "open"]);
    }

    #[test]
    fn test_remove_unregisters_subtree() {
        let (mut page, nav, about_link) = sample_page();
        assert!(page.remove(nav));
        assert!(!page.exists(about_link));
        assert!(page.get_by_id("nav-menu").is_none());
        assert!(!page.remove(nav));
        assert!(!page.remove(page.body()));

        // Stale handles are ignored
        page.add_class(nav, "x");
        page.set_text(nav, "x");
        assert!(!page.has_class(nav, "x"));
    }

    #[test]
    fn test_set_attribute_id_reindexes() {
        let (mut page, nav, _) = sample_page();
        page.set_attribute(nav, "id", "menu");
        assert!(page.get_by_id("nav-menu").is_none());
        assert_eq!(page.get_by_id("menu"), Some(nav));
        assert_eq!(page.attribute(nav, "id"), Some("menu"));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut page = Page::new(1280.0, 800.0);
        page.set_document_height(3000.0);
        assert_eq!(page.scroll_to(-50.0), 0.0);
        assert_eq!(page.scroll_to(10_000.0), 2200.0);
        assert_eq!(page.scroll_y(), 2200.0);

        page.set_document_height(1000.0);
        assert_eq!(page.scroll_y(), 200.0);
    }

    #[test]
    fn test_contains_and_closest() {
        let (page, nav, about_link) = sample_page();
        assert!(page.contains(nav, about_link));
        assert!(page.contains(nav, nav));
        assert!(!page.contains(about_link, nav));

        let list = SelectorList::parse(".nav-menu").unwrap();
        assert_eq!(page.closest(about_link, &list), Some(nav));
    }
}
