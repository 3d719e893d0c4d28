use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node as ScraperNode;
use scraper::Html;
use url::Url;

/// One node of the owned page tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNode {
    Element(PageElement),
    Text(String),
}

/// An element of the host page, or one injected by the engine.
///
/// `injected` is the container's idempotency marker. Keeping it on the
/// element value itself means the marker's lifetime is exactly the
/// container's lifetime: a replacement tree after navigation starts clean,
/// and no side table can leak references to discarded containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub injected: bool,
}

impl PageElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            injected: false,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(attr, _)| *attr == name) {
            Some(entry) => entry.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(attr, _)| attr != name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn from_scraper(element: &scraper::node::Element) -> Self {
        Self {
            tag: element.name().to_ascii_lowercase(),
            attrs: element
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            injected: false,
        }
    }
}

/// An owned, mutable snapshot of the host page's DOM.
///
/// Built by walking a `scraper` parse into an `ego_tree` of [`PageNode`]s,
/// which the injection pass then mutates freely. Comments, doctypes, and
/// scripting nodes are not carried over.
#[derive(Debug, Clone)]
pub struct PageDom {
    tree: Tree<PageNode>,
    base: Option<Url>,
}

impl PageDom {
    pub fn parse(html: &str) -> Self {
        Self::parse_with_base(html, None)
    }

    /// Parses with a base URL for resolving relative item links.
    pub fn parse_with_base(html: &str, base: Option<&str>) -> Self {
        let doc = Html::parse_document(html);
        let mut tree = Tree::new(PageNode::Element(PageElement::new("#document")));
        copy_children(doc.tree.root(), tree.root_mut());
        Self {
            tree,
            base: base.and_then(|raw| Url::parse(raw).ok()),
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn element(&self, id: NodeId) -> Option<&PageElement> {
        match self.tree.get(id)?.value() {
            PageNode::Element(element) => Some(element),
            PageNode::Text(_) => None,
        }
    }

    fn with_element_mut<R>(
        &mut self,
        id: NodeId,
        apply: impl FnOnce(&mut PageElement) -> R,
    ) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        match node.value() {
            PageNode::Element(element) => Some(apply(element)),
            PageNode::Text(_) => None,
        }
    }

    /// All elements in document order, root included.
    pub fn elements(&self) -> impl Iterator<Item = (NodeId, &PageElement)> {
        self.tree.root().descendants().filter_map(|node| match node.value() {
            PageNode::Element(element) => Some((node.id(), element)),
            PageNode::Text(_) => None,
        })
    }

    /// Elements strictly below `id`, in document order. Empty when `id` is
    /// gone or not an element.
    pub fn descendant_elements(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &PageElement)> {
        self.tree
            .get(id)
            .into_iter()
            .flat_map(|node| node.descendants().skip(1))
            .filter_map(|node| match node.value() {
                PageNode::Element(element) => Some((node.id(), element)),
                PageNode::Text(_) => None,
            })
    }

    pub fn is_injected(&self, id: NodeId) -> bool {
        self.element(id).map(|el| el.injected).unwrap_or(false)
    }

    pub fn mark_injected(&mut self, id: NodeId) {
        self.with_element_mut(id, |element| element.injected = true);
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        Some(self.tree.get(id)?.prev_sibling()?.id())
    }

    /// Whether the node still hangs off the document root. Detached nodes
    /// remain addressable but must be treated as gone.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        let root = self.root_id();
        node.id() == root || node.ancestors().any(|ancestor| ancestor.id() == root)
    }

    pub fn prepend_child(&mut self, parent: NodeId, element: PageElement) -> Option<NodeId> {
        let mut node = self.tree.get_mut(parent)?;
        Some(node.prepend(PageNode::Element(element)).id())
    }

    pub fn append_child(&mut self, parent: NodeId, child: PageNode) -> Option<NodeId> {
        let mut node = self.tree.get_mut(parent)?;
        Some(node.append(child).id())
    }

    /// Inserts a new element as the immediately preceding sibling of `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, element: PageElement) -> Option<NodeId> {
        if self.tree.get(sibling)?.parent().is_none() {
            return None;
        }
        let mut node = self.tree.get_mut(sibling)?;
        Some(node.insert_before(PageNode::Element(element)).id())
    }

    pub fn insert_after(&mut self, sibling: NodeId, element: PageElement) -> Option<NodeId> {
        if self.tree.get(sibling)?.parent().is_none() {
            return None;
        }
        let mut node = self.tree.get_mut(sibling)?;
        Some(node.insert_after(PageNode::Element(element)).id())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.with_element_mut(id, |element| element.set_attr(name, value));
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.with_element_mut(id, |element| element.remove_attr(name));
    }

    /// Replaces the node's children with a single text node, or with nothing
    /// when `text` is empty.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let children: Vec<NodeId> = node.children().map(|child| child.id()).collect();
        for child in children {
            if let Some(mut child) = self.tree.get_mut(child) {
                child.detach();
            }
        }
        if !text.is_empty() {
            self.append_child(id, PageNode::Text(text.to_string()));
        }
    }

    /// Concatenated descendant text of the node.
    pub fn text_of(&self, id: NodeId) -> String {
        let Some(node) = self.tree.get(id) else {
            return String::new();
        };
        node.descendants()
            .filter_map(|n| match n.value() {
                PageNode::Text(text) => Some(text.as_str()),
                PageNode::Element(_) => None,
            })
            .collect()
    }

    /// Resolves a link target to an absolute URL string: already-absolute
    /// hrefs pass through, relative ones join against the page base.
    /// Fragments, bare queries, and javascript links are never item links.
    pub fn resolve_href(&self, href: &str) -> Option<String> {
        let trimmed = href.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with('#') || lower.starts_with('?') || lower.starts_with("javascript:") {
            return None;
        }
        if let Ok(url) = Url::parse(trimmed) {
            return Some(String::from(url));
        }
        self.base
            .as_ref()
            .and_then(|base| base.join(trimmed).ok())
            .map(String::from)
    }

    /// Serializes the tree back to HTML. Used by tests to compare whole-page
    /// snapshots; the `injected` marker deliberately leaves no trace here.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.tree.root().children() {
            render_node(child, &mut out);
        }
        out
    }
}

fn copy_children(src: NodeRef<'_, ScraperNode>, mut dst: ego_tree::NodeMut<'_, PageNode>) {
    for child in src.children() {
        match child.value() {
            ScraperNode::Element(element) => {
                let node = dst.append(PageNode::Element(PageElement::from_scraper(element)));
                copy_children(child, node);
            }
            ScraperNode::Text(text) => {
                dst.append(PageNode::Text(text.to_string()));
            }
            _ => {}
        }
    }
}

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

fn render_node(node: NodeRef<'_, PageNode>, out: &mut String) {
    match node.value() {
        PageNode::Text(text) => out.push_str(&escape_text(text)),
        PageNode::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&element.tag.as_str()) {
                return;
            }
            for child in node.children() {
                render_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
