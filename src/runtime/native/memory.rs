//! In-memory page model for running the loader outside a browser.
//!
//! Elements live in a shared arena and are addressed by index, so handles are
//! cheap to clone and observe each other's mutations. Selectors support the
//! subset the loader needs: a compound of an optional tag, an optional `#id`,
//! and any number of `.class` parts (`img#game-image`, `div.image-container`).

use crate::dom::{Document, Element, ImageCompletion, ImageOutcome};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    parent: Option<usize>,
    text: String,
    source: Option<String>,
    pending: Option<ImageCompletion>,
}

type Arena = Rc<RefCell<Vec<Node>>>;

/// A page whose elements are held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Arena,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an element described by a compound selector under `parent`.
    pub fn append(&self, parent: Option<&MemoryElement>, spec: &str) -> MemoryElement {
        let selector = Selector::parse(spec);
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag: selector.tag.unwrap_or_else(|| "div".to_string()),
            id: selector.id,
            classes: selector.classes,
            parent: parent.map(|p| p.index),
            ..Node::default()
        });
        MemoryElement {
            nodes: self.nodes.clone(),
            index: nodes.len() - 1,
        }
    }

    fn element(&self, index: usize) -> MemoryElement {
        MemoryElement {
            nodes: self.nodes.clone(),
            index,
        }
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;

    fn find_one(&self, selector: &str) -> Option<MemoryElement> {
        let selector = Selector::parse(selector);
        if selector.is_empty() {
            return None;
        }
        let index = self
            .nodes
            .borrow()
            .iter()
            .position(|node| selector.matches(node))?;
        Some(self.element(index))
    }

    fn get_by_id(&self, id: &str) -> Option<MemoryElement> {
        let index = self
            .nodes
            .borrow()
            .iter()
            .position(|node| node.id.as_deref() == Some(id))?;
        Some(self.element(index))
    }
}

/// Handle to an element of a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryElement {
    nodes: Arena,
    index: usize,
}

impl MemoryElement {
    fn with_node<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.nodes.borrow()[self.index])
    }

    fn with_node_mut<R>(&self, f: impl FnOnce(&mut Node) -> R) -> R {
        f(&mut self.nodes.borrow_mut()[self.index])
    }

    pub fn tag(&self) -> String {
        self.with_node(|node| node.tag.clone())
    }

    pub fn classes(&self) -> Vec<String> {
        self.with_node(|node| node.classes.clone())
    }

    pub fn text(&self) -> String {
        self.with_node(|node| node.text.clone())
    }

    /// The assigned image source, if any.
    pub fn source(&self) -> Option<String> {
        self.with_node(|node| node.source.clone())
    }

    /// Whether an assigned image is still waiting for its load to finish.
    pub fn image_pending(&self) -> bool {
        self.with_node(|node| node.pending.as_ref().is_some_and(|p| !p.is_settled()))
    }

    /// Settles the pending image load with `outcome`.
    ///
    /// Returns `false` when no load is pending. The completion runs after the
    /// arena borrow is released, so it may freely mutate other elements.
    pub fn finish_image(&self, outcome: ImageOutcome) -> bool {
        let pending = self.with_node_mut(|node| node.pending.take());
        pending.is_some_and(|completion| completion.settle(outcome))
    }
}

impl Element for MemoryElement {
    fn closest(&self, selector: &str) -> Option<Self> {
        let selector = Selector::parse(selector);
        if selector.is_empty() {
            return None;
        }
        let nodes = self.nodes.borrow();
        let mut current = Some(self.index);
        while let Some(index) = current {
            if selector.matches(&nodes[index]) {
                return Some(MemoryElement {
                    nodes: self.nodes.clone(),
                    index,
                });
            }
            current = nodes[index].parent;
        }
        None
    }

    fn add_class(&self, class: &str) {
        self.with_node_mut(|node| {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        });
    }

    fn has_class(&self, class: &str) -> bool {
        self.with_node(|node| node.classes.iter().any(|c| c == class))
    }

    fn set_text(&self, text: &str) {
        self.with_node_mut(|node| node.text = text.to_string());
    }

    fn set_image_source(&self, url: &str, completion: ImageCompletion) {
        self.with_node_mut(|node| {
            node.pending = Some(completion);
            node.source = Some(url.to_string());
        });
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    fn parse(input: &str) -> Self {
        let mut selector = Selector::default();
        let input = input.trim();
        let mut rest = input;

        let tag_end = rest.find(['#', '.']).unwrap_or(rest.len());
        if tag_end > 0 {
            selector.tag = Some(rest[..tag_end].to_lowercase());
        }
        rest = &rest[tag_end..];

        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['#', '.']).unwrap_or(body.len());
            let name = &body[..end];
            if !name.is_empty() {
                match marker {
                    '#' => selector.id = Some(name.to_string()),
                    _ => selector.classes.push(name.to_string()),
                }
            }
            rest = &body[end..];
        }

        selector
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty()
    }

    fn matches(&self, node: &Node) -> bool {
        self.tag.as_ref().is_none_or(|tag| *tag == node.tag)
            && self.id.as_ref().is_none_or(|id| node.id.as_ref() == Some(id))
            && self.classes.iter().all(|class| node.classes.contains(class))
    }
}
