//! Arena DOM and a small CSS matcher.
//!
//! Supported selector syntax: tag names, `*`, `.class`, `#id`, compounds of
//! those (`li.completed`) and the descendant combinator (whitespace).

use crate::locator::{ElementState, Selector};
use crate::result::{ProbeError, ProbeResult};
use crate::simulated::state::Filter;

/// Index of a node in the arena
pub type NodeId = usize;

const TEXT_TAG: &str = "#text";

/// What an element does when acted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    /// Inert element
    #[default]
    None,
    /// The new-todo input
    NewTodo,
    /// The toggle-all checkbox
    ToggleAll,
    /// An item's completion checkbox
    Toggle(u64),
    /// An item's label
    Label(u64),
    /// An item's edit field
    Edit(u64),
    /// An item's delete button
    Destroy(u64),
    /// The clear-completed button
    ClearCompleted,
    /// A filter link
    FilterLink(Filter),
}

impl Role {
    /// Whether the element can hold focus
    #[must_use]
    pub const fn focusable(self) -> bool {
        matches!(
            self,
            Self::NewTodo
                | Self::ToggleAll
                | Self::Toggle(_)
                | Self::Edit(_)
                | Self::Destroy(_)
                | Self::ClearCompleted
                | Self::FilterLink(_)
        )
    }
}

/// One element or text node
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Tag name, `#text` for text nodes
    pub tag: &'static str,
    /// `id` attribute
    pub id: Option<&'static str>,
    /// Class list
    pub classes: Vec<&'static str>,
    /// Text of a text node
    pub text: String,
    /// Parent node
    pub parent: Option<NodeId>,
    /// Children in order
    pub children: Vec<NodeId>,
    /// Hidden by style
    pub hidden: bool,
    /// Checkbox state
    pub checked: bool,
    /// Form control value
    pub value: Option<String>,
    /// Behavior on interaction
    pub role: Role,
}

impl Node {
    const fn is_element(&self) -> bool {
        !matches!(self.tag.as_bytes(), [b'#', ..])
    }
}

/// Rendered document
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Root node (`body`)
    pub const ROOT: NodeId = 0;

    /// Empty document with a `body`
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                tag: "body",
                ..Node::default()
            }],
        }
    }

    /// Append an element
    pub fn element(&mut self, parent: NodeId, tag: &'static str, classes: &[&'static str]) -> NodeId {
        self.append(
            parent,
            Node {
                tag,
                classes: classes.to_vec(),
                ..Node::default()
            },
        )
    }

    /// Append a text node
    pub fn text(&mut self, parent: NodeId, text: impl Into<String>) {
        self.append(
            parent,
            Node {
                tag: TEXT_TAG,
                text: text.into(),
                ..Node::default()
            },
        );
    }

    /// Mutable access to a node
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Shared access to a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    fn append(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = self.nodes.len();
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Concatenated text of the node and its descendants
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        if node.is_element() {
            for &child in &node.children {
                self.collect_text(child, out);
            }
        } else {
            out.push_str(&node.text);
        }
    }

    /// Whether the node and all its ancestors are shown
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if self.nodes[n].hidden {
                return false;
            }
            current = self.nodes[n].parent;
        }
        true
    }

    /// Element descendants of `id` in document order, excluding `id`
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if self.nodes[n].is_element() {
                out.push(n);
                stack.extend(self.nodes[n].children.iter().rev());
            }
        }
        out
    }

    /// First element with the given role
    #[must_use]
    pub fn find_role(&self, role: Role) -> Option<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|&n| self.nodes[n].role == role)
    }

    /// Elements matching a selector, in document order
    ///
    /// # Errors
    ///
    /// Returns error for CSS this matcher does not understand
    pub fn query(&self, selector: &Selector, focus: Option<Role>) -> ProbeResult<Vec<NodeId>> {
        match selector {
            Selector::Css(css) => {
                let compiled = parse_css(css)?;
                let mut all = vec![Self::ROOT];
                all.extend(self.descendants(Self::ROOT));
                Ok(all.into_iter().filter(|&n| self.matches(n, &compiled)).collect())
            }
            Selector::Focused => Ok(focus
                .filter(|r| r.focusable())
                .and_then(|r| self.find_role(r))
                .into_iter()
                .collect()),
            Selector::Nth { parent, index } => {
                Ok(self.query(parent, focus)?.into_iter().nth(*index).into_iter().collect())
            }
            Selector::Descendant { parent, css } => {
                let compiled = parse_css(css)?;
                Ok(self
                    .query(parent, focus)?
                    .into_iter()
                    .flat_map(|p| self.descendants(p))
                    .filter(|&n| self.matches(n, &compiled))
                    .collect())
            }
            Selector::Contains { parent, text } => Ok(self
                .query(parent, focus)?
                .into_iter()
                .flat_map(|p| self.descendants(p))
                .find(|&n| {
                    self.text_content(n).contains(text.as_str())
                        && !self.nodes[n]
                            .children
                            .iter()
                            .any(|&c| self.nodes[c].is_element() && self.text_content(c).contains(text.as_str()))
                })
                .into_iter()
                .collect()),
        }
    }

    /// Snapshot an element
    #[must_use]
    pub fn state(&self, id: NodeId, focus: Option<Role>) -> ElementState {
        let node = &self.nodes[id];
        ElementState {
            tag: node.tag.to_string(),
            text: self.text_content(id),
            classes: node.classes.iter().map(|c| (*c).to_string()).collect(),
            visible: self.is_visible(id),
            checked: node.checked,
            value: node.value.clone(),
            focused: node.role.focusable() && focus == Some(node.role),
        }
    }

    fn matches(&self, id: NodeId, selector: &[Compound]) -> bool {
        let Some((last, ancestors)) = selector.split_last() else {
            return false;
        };
        if !last.matches(&self.nodes[id]) {
            return false;
        }
        let mut remaining = ancestors;
        let mut current = self.nodes[id].parent;
        while let Some((wanted, rest)) = remaining.split_last() {
            let Some(n) = current else {
                return false;
            };
            if wanted.matches(&self.nodes[n]) {
                remaining = rest;
            }
            current = self.nodes[n].parent;
        }
        true
    }
}

/// `tag.class#id` compound selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        node.is_element()
            && self.tag.as_deref().map_or(true, |t| t.eq_ignore_ascii_case(node.tag))
            && self.id.as_deref().map_or(true, |i| node.id == Some(i))
            && self.classes.iter().all(|c| node.classes.contains(&c.as_str()))
    }
}

fn parse_css(css: &str) -> ProbeResult<Vec<Compound>> {
    let unsupported = || ProbeError::page(format!("unsupported selector {css:?}"));
    let parts: Vec<Compound> = css
        .split_whitespace()
        .map(|part| parse_compound(part).ok_or_else(unsupported))
        .collect::<ProbeResult<_>>()?;
    if parts.is_empty() {
        return Err(unsupported());
    }
    Ok(parts)
}

fn parse_compound(part: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(stripped) = rest.strip_prefix('*') {
        rest = stripped;
    } else {
        let end = rest.find(['.', '#']).unwrap_or(rest.len());
        if end > 0 {
            let tag = &rest[..end];
            if !is_ident(tag) {
                return None;
            }
            compound.tag = Some(tag.to_string());
        }
        rest = &rest[end..];
    }

    while !rest.is_empty() {
        let sigil = rest.as_bytes()[0];
        let body = &rest[1..];
        let end = body.find(['.', '#']).unwrap_or(body.len());
        let name = &body[..end];
        if !is_ident(name) {
            return None;
        }
        match sigil {
            b'.' => compound.classes.push(name.to_string()),
            b'#' => compound.id = Some(name.to_string()),
            _ => return None,
        }
        rest = &body[end..];
    }
    Some(compound)
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::Locator;

    /// ul.list > li.a "one", li.b.c > span "two" + text " three"
    fn sample() -> Dom {
        let mut dom = Dom::new();
        let ul = dom.element(Dom::ROOT, "ul", &["list"]);
        let a = dom.element(ul, "li", &["a"]);
        dom.text(a, "one");
        let b = dom.element(ul, "li", &["b", "c"]);
        let span = dom.element(b, "span", &[]);
        dom.text(span, "two");
        dom.text(b, " three");
        dom.node_mut(b).hidden = true;
        dom
    }

    fn texts(dom: &Dom, locator: &Locator) -> Vec<String> {
        dom.query(locator.selector(), None)
            .unwrap()
            .into_iter()
            .map(|n| dom.text_content(n))
            .collect()
    }

    #[test]
    fn test_descendant_combinator() {
        let dom = sample();
        assert_eq!(texts(&dom, &Locator::new(".list li")), ["one", "two three"]);
        assert_eq!(texts(&dom, &Locator::new("ul span")), ["two"]);
        assert!(texts(&dom, &Locator::new("span li")).is_empty());
    }

    #[test]
    fn test_compound_classes() {
        let dom = sample();
        assert_eq!(texts(&dom, &Locator::new("li.b.c")), ["two three"]);
        assert!(texts(&dom, &Locator::new("li.a.c")).is_empty());
    }

    #[test]
    fn test_nth_and_find() {
        let dom = sample();
        let items = Locator::new(".list li");
        assert_eq!(texts(&dom, &items.nth(1).find("span")), ["two"]);
        assert!(texts(&dom, &items.nth(5)).is_empty());
    }

    #[test]
    fn test_contains_picks_deepest() {
        let dom = sample();
        let found = dom
            .query(Locator::new(".list").contains("two").selector(), None)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(dom.node(found[0]).tag, "span");
    }

    #[test]
    fn test_visibility_inherits() {
        let dom = sample();
        let span = dom.query(&Selector::css("span"), None).unwrap()[0];
        assert!(!dom.is_visible(span));
        let a = dom.query(&Selector::css(".a"), None).unwrap()[0];
        assert!(dom.is_visible(a));
    }

    #[test]
    fn test_unsupported_css() {
        let dom = sample();
        assert!(dom.query(&Selector::css("ul > li"), None).is_err());
        assert!(dom.query(&Selector::css("li:first-child"), None).is_err());
        assert!(dom.query(&Selector::css("  "), None).is_err());
    }

    #[test]
    fn test_id_selector() {
        let mut dom = Dom::new();
        let input = dom.element(Dom::ROOT, "input", &["toggle-all"]);
        dom.node_mut(input).id = Some("toggle-all");
        assert_eq!(dom.query(&Selector::css("#toggle-all"), None).unwrap(), [input]);
        assert_eq!(dom.query(&Selector::css("input#toggle-all.toggle-all"), None).unwrap(), [input]);
    }
}
