//! Vertices of the node graph.
//!
//! A [`Node`] describes one value the generation engine has to produce: a class
//! instance, a collection, a map or an array, together with the fully resolved type
//! information needed to produce it. Nodes form a tree. Every node owns its children
//! through [`NodeRc`]s and refers back to its parent through a non-owning
//! [`NodeRef`], so dropping the root releases the whole tree.

use std::{
    fmt,
    sync::{Arc, OnceLock, Weak},
};

use crate::{
    model::Member,
    typesystem::{Bindings, ClassId, ClassRc, TypeDescriptor},
    Result,
};

/// Reference to a `Node`
pub type NodeRc = Arc<Node>;

/// A weak reference to a `Node`, used for parent back-references
#[derive(Clone, Debug, Default)]
pub struct NodeRef {
    weak_ref: Weak<Node>,
}

impl NodeRef {
    /// Create a new `NodeRef` from a strong reference
    pub fn new(strong_ref: &NodeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the node, returning None if the node has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<NodeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced node is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }
}

impl From<&NodeRc> for NodeRef {
    fn from(strong_ref: &NodeRc) -> Self {
        Self::new(strong_ref)
    }
}

/// The shape of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A class whose children are its members
    Class,
    /// A single-parameter container with one element child
    Collection,
    /// A key/value container with a key child and a value child
    Map,
    /// An array with one element child
    Array,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Class => "Class",
            NodeKind::Collection => "Collection",
            NodeKind::Map => "Map",
            NodeKind::Array => "Array",
        };
        f.write_str(name)
    }
}

/// Where a node hangs off its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Root,
    Member,
    Element,
    Key,
    Value,
}

/// A vertex of the node graph.
///
/// Children are computed exactly once while the graph is built and never change
/// afterwards, so a finished tree can be read from any number of threads.
pub struct Node {
    kind: NodeKind,
    /// The class as declared
    raw_class: ClassRc,
    /// The class to generate; differs from `raw_class` when a subtype was substituted
    target_class: ClassRc,
    /// Fully resolved generic shape; absent for plain classes
    generic_type: Option<TypeDescriptor>,
    member: Option<Member>,
    slot: Slot,
    parent: Option<NodeRef>,
    type_bindings: Bindings,
    children: OnceLock<Vec<NodeRc>>,
    cyclic: bool,
    ignored: bool,
    depth: usize,
}

impl Node {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        kind: NodeKind,
        raw_class: ClassRc,
        target_class: ClassRc,
        generic_type: Option<TypeDescriptor>,
        member: Option<Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
        type_bindings: Bindings,
    ) -> Self {
        Node {
            kind,
            raw_class,
            target_class,
            generic_type,
            member,
            slot,
            parent: parent.map(NodeRef::new),
            type_bindings,
            children: OnceLock::new(),
            cyclic: false,
            ignored: false,
            depth: parent.map_or(0, |p| p.depth + 1),
        }
    }

    /// Mark the node as a repeat of one of its ancestors; it will never get children
    pub(crate) fn into_cyclic(mut self) -> Self {
        self.cyclic = true;
        self
    }

    pub(crate) fn into_ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    /// Set the children, exactly once
    pub(crate) fn set_children(&self, children: Vec<NodeRc>) -> Result<()> {
        self.children
            .set(children)
            .map_err(|_| structural_error!("Children of '{}' have already been set", self.path()))
    }

    /// The shape of this node
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The class to generate, after subtype substitution
    #[must_use]
    pub fn resolved_class(&self) -> &ClassRc {
        &self.target_class
    }

    /// The class as declared by the member or root type
    #[must_use]
    pub fn raw_class(&self) -> &ClassRc {
        &self.raw_class
    }

    /// The fully resolved generic shape, e.g. `List<String>`; `None` for plain classes
    #[must_use]
    pub fn generic_type(&self) -> Option<&TypeDescriptor> {
        self.generic_type.as_ref()
    }

    /// The member this node populates; `None` for the root and for container elements
    #[must_use]
    pub fn originating_member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    /// The parent node, if there is one and it is still alive
    #[must_use]
    pub fn parent(&self) -> Option<NodeRc> {
        self.parent.as_ref().and_then(NodeRef::upgrade)
    }

    /// Bindings of this node's own type parameters and those of its generic supertypes
    #[must_use]
    pub fn type_bindings(&self) -> &Bindings {
        &self.type_bindings
    }

    /// The children, in member order; element first for collections and arrays,
    /// key then value for maps
    #[must_use]
    pub fn children(&self) -> &[NodeRc] {
        self.children.get().map_or(&[], Vec::as_slice)
    }

    /// Returns true if expansion stopped because an ancestor has the same type
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    /// Returns true if the member or class of this node is ignored
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Returns true if this node has no children
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Distance from the root, which is at depth 0
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The element node of a collection or array
    #[must_use]
    pub fn element(&self) -> Option<&NodeRc> {
        match self.kind {
            NodeKind::Collection | NodeKind::Array => self.children().first(),
            _ => None,
        }
    }

    /// The key node of a map
    #[must_use]
    pub fn key(&self) -> Option<&NodeRc> {
        match self.kind {
            NodeKind::Map => self.children().first(),
            _ => None,
        }
    }

    /// The value node of a map
    #[must_use]
    pub fn value(&self) -> Option<&NodeRc> {
        match self.kind {
            NodeKind::Map => self.children().get(1),
            _ => None,
        }
    }

    /// Returns true if `other` describes the same type, i.e. a repeat of `other` is a cycle
    #[must_use]
    pub fn same_type(&self, other: &Node) -> bool {
        self.is_type(other.target_class.id, other.generic_type.as_ref())
    }

    pub(crate) fn is_type(&self, class: ClassId, generic_type: Option<&TypeDescriptor>) -> bool {
        self.target_class.id == class && self.generic_type.as_ref() == generic_type
    }

    /// The chain from the root type to this node, e.g. `Person.pets[*].name`
    #[must_use]
    pub fn path(&self) -> String {
        let mut segments = vec![self.segment()];
        let mut next = self.parent();
        while let Some(node) = next {
            segments.push(node.segment());
            next = node.parent();
        }
        segments.reverse();
        segments.concat()
    }

    pub(crate) fn segment(&self) -> String {
        Self::slot_segment(self.slot, self.member.as_ref(), &self.target_class.name)
    }

    /// Render one path segment; `name` stands in for root nodes without a member
    pub(crate) fn slot_segment(slot: Slot, member: Option<&Member>, name: &str) -> String {
        match (slot, member) {
            (Slot::Member, Some(member)) => format!(".{member}"),
            (Slot::Root, Some(member)) => member.to_string(),
            (Slot::Root | Slot::Member, None) => name.to_string(),
            (Slot::Element, _) => "[*]".to_string(),
            (Slot::Key, _) => "<key>".to_string(),
            (Slot::Value, _) => "<value>".to_string(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}Node[{}, {}, depth={}, #chn={}",
            self.kind,
            self.path(),
            self.target_class.name,
            self.depth,
            self.children().len()
        )?;
        if self.cyclic {
            f.write_str(", cyclic")?;
        }
        if self.ignored {
            f.write_str(", ignored")?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("path", &self.path())
            .field("target_class", &self.target_class.id)
            .field("generic_type", &self.generic_type)
            .field("cyclic", &self.cyclic)
            .field("ignored", &self.ignored)
            .field("children", &self.children().len())
            .finish()
    }
}
