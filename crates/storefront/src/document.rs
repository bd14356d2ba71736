//! In-memory display surface.
//!
//! [`Document`] keeps a retained tree of the page's dynamic elements and a
//! journal of what changed since the last [`Document::take_patches`]. Each
//! journal entry becomes an HTMX out-of-band fragment, so the browser applies
//! exactly the mutations the page controller made.

use std::collections::{BTreeMap, HashMap, HashSet};

use askama::Template;

use crate::host::{Content, Element, ElementId, Observation, Surface};
use crate::render::{Attr, NodeTemplate};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    attrs: BTreeMap<String, String>,
    content: Content,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn from_element(element: Element, parent: Option<ElementId>) -> (ElementId, Self) {
        let node = Self {
            tag: element.tag,
            classes: element.classes,
            styles: element.styles,
            attrs: element.attrs,
            content: element.content,
            parent,
            children: Vec::new(),
        };
        (element.id, node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    Updated(ElementId),
    Appended { parent: ElementId, child: ElementId },
    Removed(ElementId),
}

/// Changes accumulated since the previous call to [`Document::take_patches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patchset {
    /// Concatenated out-of-band fragments.
    pub html: String,
    /// Requested window scroll position, if any.
    pub scroll_to: Option<u32>,
}

impl Patchset {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty() && self.scroll_to.is_none()
    }
}

/// Retained element tree implementing [`Surface`].
#[derive(Debug, Default)]
pub struct Document {
    nodes: HashMap<ElementId, Node>,
    roots: Vec<ElementId>,
    journal: Vec<Change>,
    scroll_request: Option<u32>,
    observed: BTreeMap<ElementId, Observation>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an element without journaling it.
    ///
    /// Used to build the initial layout that the full page render already
    /// contains. A missing parent makes the element a root.
    pub fn insert(&mut self, parent: Option<&ElementId>, element: Element) {
        let parent = parent.filter(|id| self.nodes.contains_key(*id)).cloned();
        let (id, node) = Node::from_element(element, parent.clone());
        self.detach(&id);
        match &parent {
            Some(parent_id) => {
                if let Some(parent_node) = self.nodes.get_mut(parent_id) {
                    parent_node.children.push(id.clone());
                }
            }
            None => self.roots.push(id.clone()),
        }
        self.nodes.insert(id, node);
    }

    /// Text content of an element, if it holds text.
    #[must_use]
    pub fn text(&self, id: &str) -> Option<&str> {
        match &self.nodes.get(&ElementId::from(id))?.content {
            Content::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Markup content of an element, if it holds markup.
    #[must_use]
    pub fn html(&self, id: &str) -> Option<&str> {
        match &self.nodes.get(&ElementId::from(id))?.content {
            Content::Html(html) => Some(html.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.nodes
            .get(&ElementId::from(id))
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    #[must_use]
    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.nodes
            .get(&ElementId::from(id))?
            .styles
            .get(property)
            .map(String::as_str)
    }

    /// Child ids of an element in document order.
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<ElementId> {
        self.nodes
            .get(&ElementId::from(id))
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_observed(&self, id: &str) -> bool {
        self.observed.contains_key(&ElementId::from(id))
    }

    #[must_use]
    pub fn observation(&self, id: &str) -> Option<Observation> {
        self.observed.get(&ElementId::from(id)).copied()
    }

    /// Render an element and its subtree.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn outer_html(&self, id: &str) -> askama::Result<Option<String>> {
        let id = ElementId::from(id);
        self.nodes
            .get(&id)
            .map(|node| self.render_node(&id, node, None))
            .transpose()
    }

    /// Drain the journal into out-of-band fragments.
    ///
    /// Fragments are rendered from the current state, in the order the
    /// changes were made. Elements that are gone by now are skipped, except
    /// for their deletion.
    pub fn take_patches(&mut self) -> Patchset {
        let journal = std::mem::take(&mut self.journal);
        let mut html = String::new();
        let mut appended: HashSet<&ElementId> = HashSet::new();
        let mut previous: Option<&Change> = None;

        for change in &journal {
            if previous == Some(change) {
                continue;
            }
            previous = Some(change);

            let fragment = match change {
                Change::Updated(id) => self
                    .nodes
                    .get(id)
                    .map(|node| self.render_node(id, node, Some("true"))),
                Change::Appended { parent, child } => {
                    // A parent appended earlier in this batch already rendered the child.
                    if appended.contains(parent) {
                        appended.insert(child);
                        continue;
                    }
                    appended.insert(child);
                    self.nodes.get(child).map(|node| {
                        self.render_node(child, node, None).and_then(|inner| {
                            let mut shell = NodeTemplate::shell(parent.as_str(), "beforeend");
                            shell.html = inner;
                            shell.render()
                        })
                    })
                }
                Change::Removed(id) => Some(NodeTemplate::shell(id.as_str(), "delete").render()),
            };

            match fragment {
                Some(Ok(fragment)) => html.push_str(fragment.trim_end()),
                Some(Err(e)) => tracing::error!(error = %e, "Failed to render patch"),
                None => {}
            }
        }

        Patchset {
            html,
            scroll_to: self.scroll_request.take(),
        }
    }

    fn render_node(
        &self,
        id: &ElementId,
        node: &Node,
        oob: Option<&'static str>,
    ) -> askama::Result<String> {
        let mut html = match &node.content {
            Content::Html(html) => html.clone(),
            Content::Text(_) | Content::Empty => String::new(),
        };
        for child_id in &node.children {
            if let Some(child) = self.nodes.get(child_id) {
                html.push_str(self.render_node(child_id, child, None)?.trim_end());
            }
        }

        let style = node
            .styles
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");

        NodeTemplate {
            tag: &node.tag,
            id: id.as_str(),
            class: node.classes.join(" "),
            style,
            attrs: node
                .attrs
                .iter()
                .map(|(name, value)| Attr { name, value })
                .collect(),
            text: match &node.content {
                Content::Text(text) => text.as_str(),
                _ => "",
            },
            html,
            oob,
        }
        .render()
    }

    /// Unlink an element from its parent and drop its subtree.
    fn detach(&mut self, id: &ElementId) -> bool {
        let Some(node) = self.nodes.remove(id) else {
            return false;
        };
        match &node.parent {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    parent.children.retain(|child| child != id);
                }
            }
            None => self.roots.retain(|root| root != id),
        }
        let mut pending = node.children;
        while let Some(child_id) = pending.pop() {
            if let Some(child) = self.nodes.remove(&child_id) {
                pending.extend(child.children);
            }
            self.observed.remove(&child_id);
        }
        self.observed.remove(id);
        true
    }

    fn modify(&mut self, id: &ElementId, apply: impl FnOnce(&mut Node) -> bool) {
        let Some(node) = self.nodes.get_mut(id) else {
            tracing::debug!(element = %id, "Ignoring update of missing element");
            return;
        };
        if apply(node) {
            self.journal.push(Change::Updated(id.clone()));
        }
    }
}

impl Surface for Document {
    fn append(&mut self, parent: &ElementId, element: Element) {
        if !self.nodes.contains_key(parent) {
            tracing::debug!(parent = %parent, child = %element.id, "Ignoring append to missing element");
            return;
        }
        let child = element.id.clone();
        self.insert(Some(parent), element);
        self.journal.push(Change::Appended {
            parent: parent.clone(),
            child,
        });
    }

    fn remove(&mut self, id: &ElementId) -> bool {
        let removed = self.detach(id);
        if removed {
            self.journal.push(Change::Removed(id.clone()));
        }
        removed
    }

    fn contains(&self, id: &ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    fn set_text(&mut self, id: &ElementId, text: &str) {
        self.modify(id, |node| {
            if matches!(&node.content, Content::Text(current) if current == text) {
                return false;
            }
            node.content = Content::Text(text.to_string());
            true
        });
    }

    fn set_html(&mut self, id: &ElementId, html: String) {
        self.modify(id, |node| {
            if matches!(&node.content, Content::Html(current) if *current == html) {
                return false;
            }
            node.content = Content::Html(html);
            true
        });
    }

    fn add_class(&mut self, id: &ElementId, class: &str) {
        self.modify(id, |node| {
            if node.classes.iter().any(|c| c == class) {
                return false;
            }
            node.classes.push(class.to_string());
            true
        });
    }

    fn remove_class(&mut self, id: &ElementId, class: &str) {
        self.modify(id, |node| {
            let before = node.classes.len();
            node.classes.retain(|c| c != class);
            node.classes.len() != before
        });
    }

    fn set_style(&mut self, id: &ElementId, property: &str, value: &str) {
        self.modify(id, |node| {
            if node.styles.get(property).is_some_and(|current| current == value) {
                return false;
            }
            node.styles.insert(property.to_string(), value.to_string());
            true
        });
    }

    fn count_class(&self, class: &str) -> usize {
        self.nodes
            .values()
            .filter(|node| node.classes.iter().any(|c| c == class))
            .count()
    }

    fn scroll_to(&mut self, top: u32) {
        self.scroll_request = Some(top);
    }

    fn observe(&mut self, id: &ElementId, observation: Observation) {
        if self.nodes.contains_key(id) {
            self.observed.insert(id.clone(), observation);
        }
    }

    fn unobserve(&mut self, id: &ElementId) {
        self.observed.remove(id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn document() -> Document {
        let mut doc = Document::new();
        doc.insert(None, Element::new("div", "notifications"));
        doc.insert(None, Element::new("span", "cart-count").text("0"));
        doc
    }

    #[test]
    fn test_insert_is_not_journaled() {
        let mut doc = document();
        assert!(doc.take_patches().is_empty());
        assert_eq!(doc.text("cart-count"), Some("0"));
    }

    #[test]
    fn test_set_text_produces_replacement() {
        let mut doc = document();
        doc.set_text(&"cart-count".into(), "3");
        let patches = doc.take_patches();
        assert!(patches.html.contains(r#"id="cart-count""#));
        assert!(patches.html.contains(r#"hx-swap-oob="true""#));
        assert!(patches.html.contains(">3</span>"));
        assert!(doc.take_patches().is_empty());
    }

    #[test]
    fn test_unchanged_text_is_not_journaled() {
        let mut doc = document();
        doc.set_text(&"cart-count".into(), "0");
        assert!(doc.take_patches().is_empty());
    }

    #[test]
    fn test_append_and_remove() {
        let mut doc = document();
        let parent = ElementId::from("notifications");
        doc.append(&parent, Element::new("div", "n-1").class("notification").text("hi"));
        assert_eq!(doc.count_class("notification"), 1);
        assert_eq!(doc.children("notifications"), vec![ElementId::from("n-1")]);

        let patches = doc.take_patches();
        assert!(patches.html.contains(r#"id="notifications" hx-swap-oob="beforeend""#));
        assert!(patches.html.contains(r#"id="n-1" class="notification""#));

        assert!(doc.remove(&"n-1".into()));
        assert!(!doc.remove(&"n-1".into()));
        assert_eq!(doc.count_class("notification"), 0);
        let patches = doc.take_patches();
        assert!(patches.html.contains(r#"id="n-1" hx-swap-oob="delete""#));
    }

    #[test]
    fn test_append_to_missing_parent_is_ignored() {
        let mut doc = document();
        doc.append(&"nowhere".into(), Element::new("div", "orphan"));
        assert!(!doc.contains(&"orphan".into()));
        assert!(doc.take_patches().is_empty());
    }

    #[test]
    fn test_removed_before_flush_only_deletes() {
        let mut doc = document();
        doc.append(&"notifications".into(), Element::new("div", "n-1"));
        doc.remove(&"n-1".into());
        let patches = doc.take_patches();
        assert!(!patches.html.contains("beforeend"));
        assert!(patches.html.contains("delete"));
    }

    #[test]
    fn test_nested_append_renders_child_once() {
        let mut doc = document();
        doc.append(&"notifications".into(), Element::new("div", "group"));
        doc.append(&"group".into(), Element::new("p", "line").text("x"));
        let patches = doc.take_patches();
        assert_eq!(patches.html.matches(r#"id="line""#).count(), 1);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let mut doc = document();
        doc.insert(Some(&"notifications".into()), Element::new("div", "group"));
        doc.insert(Some(&"group".into()), Element::new("p", "line").class("line"));
        doc.remove(&"notifications".into());
        assert!(!doc.contains(&"group".into()));
        assert_eq!(doc.count_class("line"), 0);
    }

    #[test]
    fn test_classes_and_styles() {
        let mut doc = document();
        let id = ElementId::from("notifications");
        doc.add_class(&id, "active");
        doc.add_class(&id, "active");
        doc.set_style(&id, "display", "block");
        assert!(doc.has_class("notifications", "active"));
        assert_eq!(doc.style("notifications", "display"), Some("block"));

        let patches = doc.take_patches();
        assert!(patches.html.contains(r#"class="active""#));
        assert!(patches.html.contains(r#"style="display: block""#));

        doc.remove_class(&id, "active");
        assert!(!doc.has_class("notifications", "active"));
        doc.remove_class(&id, "active");
        let patches = doc.take_patches();
        assert_eq!(patches.html.matches("hx-swap-oob").count(), 1);
    }

    #[test]
    fn test_text_is_escaped_and_html_is_not() {
        let mut doc = document();
        doc.set_text(&"cart-count".into(), "<3>");
        doc.set_html(&"notifications".into(), "<b>ok</b>".to_string());
        let count = doc.outer_html("cart-count").unwrap().unwrap();
        assert!(count.contains("&lt;3&gt;"));
        let notifications = doc.outer_html("notifications").unwrap().unwrap();
        assert!(notifications.contains("<b>ok</b>"));
    }

    #[test]
    fn test_outer_html_includes_children() {
        let mut doc = document();
        doc.insert(
            Some(&"notifications".into()),
            Element::new("div", "n-1").attr("role", "status").text("hello"),
        );
        let html = doc.outer_html("notifications").unwrap().unwrap();
        assert!(html.starts_with(r#"<div id="notifications">"#));
        assert!(html.contains(r#"<div id="n-1" role="status">hello</div>"#));
        assert!(doc.outer_html("missing").unwrap().is_none());
    }

    #[test]
    fn test_scroll_request_is_taken_once() {
        let mut doc = document();
        doc.scroll_to(420);
        assert_eq!(doc.take_patches().scroll_to, Some(420));
        assert_eq!(doc.take_patches().scroll_to, None);
    }

    #[test]
    fn test_observe_requires_element() {
        let mut doc = document();
        let observation = Observation {
            threshold: 0.7,
            root_margin_bottom_px: 100,
        };
        doc.observe(&"missing".into(), observation);
        assert!(!doc.is_observed("missing"));
        doc.observe(&"notifications".into(), observation);
        assert_eq!(doc.observation("notifications"), Some(observation));
        doc.unobserve(&"notifications".into());
        assert!(!doc.is_observed("notifications"));
    }
}
