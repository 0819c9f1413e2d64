#![forbid(unsafe_code)]

//! Arena-backed XML document with parent back-references.

use samlsig_core::Error;

/// Index of a node in its owning [`Document`].
///
/// A `NodeId` is only meaningful for the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A namespace-qualified name as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Prefix used in the source (`None` for unprefixed names).
    pub prefix: Option<String>,
    pub local_name: String,
    /// Namespace URI the name resolves to, if any.
    pub namespace_uri: Option<String>,
}

impl QName {
    /// An unprefixed name in no namespace.
    pub fn local(name: &str) -> Self {
        Self {
            prefix: None,
            local_name: name.to_owned(),
            namespace_uri: None,
        }
    }

    /// The name as it appears in markup (`prefix:local` or `local`).
    pub fn qualified(&self) -> String {
        match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", self.local_name),
            _ => self.local_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: QName,
    /// Attributes in document order, namespace declarations excluded.
    pub attributes: Vec<Attribute>,
    /// Namespace declarations made on this element as `(prefix, uri)`.
    /// The default namespace has prefix `""`; `("", "")` is `xmlns=""`.
    pub namespace_declarations: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
    ProcessingInstruction { target: String, data: Option<String> },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An owned, mutable XML document.
///
/// Node 0 is always the document node.  Detached nodes (for instance the old
/// text of an element after [`Document::set_text`]) stay in the table but are
/// no longer reachable from the root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document that contains only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The document element.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|id| self.element(*id).is_some())
    }

    pub fn node_kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.node_kind(id) {
            Some(NodeKind::Element(elem)) => Some(elem),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, Error> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(elem)) => Ok(elem),
            _ => Err(Error::XmlStructure(format!(
                "node {} is not an element",
                id.0
            ))),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Append a new node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Value of the un-namespaced attribute `name` on element `id`.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attributes
            .iter()
            .find(|a| a.name.namespace_uri.is_none() && a.name.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Set (or add) the un-namespaced attribute `name` on element `id`.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), Error> {
        let elem = self.element_mut(id)?;
        match elem
            .attributes
            .iter_mut()
            .find(|a| a.name.namespace_uri.is_none() && a.name.local_name == name)
        {
            Some(attr) => attr.value = value.to_owned(),
            None => elem.attributes.push(Attribute {
                name: QName::local(name),
                value: value.to_owned(),
            }),
        }
        Ok(())
    }

    /// Whether `id` is an element with the given namespace and local name.
    pub fn is_element_named(&self, id: NodeId, ns_uri: &str, local_name: &str) -> bool {
        self.element(id).is_some_and(|e| {
            e.name.local_name == local_name && e.name.namespace_uri.as_deref().unwrap_or("") == ns_uri
        })
    }

    /// First child element of `parent` with the given namespace and local name.
    pub fn first_child_element(
        &self,
        parent: NodeId,
        ns_uri: &str,
        local_name: &str,
    ) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.is_element_named(*c, ns_uri, local_name))
    }

    /// All child elements of `parent` with the given namespace and local name.
    pub fn child_elements(&self, parent: NodeId, ns_uri: &str, local_name: &str) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|c| self.is_element_named(*c, ns_uri, local_name))
            .collect()
    }

    /// First child element of `parent` with the given local name, in any namespace.
    pub fn first_child_named(&self, parent: NodeId, local_name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|c| self.element(*c).is_some_and(|e| e.name.local_name == local_name))
    }

    /// Concatenated text of the direct text children of `id`.
    pub fn text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|c| match self.node_kind(*c) {
                Some(NodeKind::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children of element `id` with a single text node.
    ///
    /// An empty `text` leaves the element without children.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), Error> {
        self.element_mut(id)?;
        let old = std::mem::take(&mut self.nodes[id.0].children);
        for child in old {
            self.nodes[child.0].parent = None;
        }
        if !text.is_empty() {
            self.append_child(id, NodeKind::Text(text.to_owned()));
        }
        Ok(())
    }
}
