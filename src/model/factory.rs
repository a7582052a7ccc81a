//! Node graph construction.
//!
//! [`NodeGraphBuilder`] turns the root type of a [`RootContext`] into a fully expanded,
//! immutable tree of [`Node`]s. Every declared type on the way is resolved to a shape
//! without type variables before its node is created:
//!
//! 1. Type variables are looked up in the bindings of the parent node, walking up the
//!    ancestor chain and finally falling back to the root bindings. A variable nobody
//!    binds is a [`crate::Error::Resolution`].
//! 2. The declared class is replaced by its registered subtype, if any, and the node
//!    kind is derived from the target class: subtypes of `Map` become map nodes,
//!    subtypes of `Collection` collection nodes, arrays array nodes and everything
//!    else class nodes.
//! 3. The node records bindings for its own type parameters and for the parameters of
//!    all generic supertypes of its class, so inherited members and container
//!    elements resolve with the same lookup.
//! 4. A class, collection or map node whose type already occurs among its ancestors
//!    is marked cyclic and left without children. Repeats in independent branches are
//!    expanded normally.
//!
//! Children are computed eagerly, exactly once, while the tree is built.
//!
//! # Examples
//!
//! ```rust
//! use blueprint::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ClassRegistry::new()?);
//! let string = registry.platform(PlatformKind::String);
//! let pet = ClassBuilder::new(registry.clone(), "demo", "Pet")
//!     .field("name", string.into())
//!     .build()?;
//! let list = TypeDescriptor::parameterized(registry.platform(PlatformKind::List), vec![pet.id.into()]);
//!
//! let context = RootContext::builder(registry.clone(), list).build()?;
//! let root = NodeGraphBuilder::new(Arc::new(context)).build_root()?;
//!
//! assert_eq!(root.kind(), NodeKind::Collection);
//! let element = root.element().unwrap();
//! assert_eq!(element.resolved_class().id, pet.id);
//! assert_eq!(element.children()[0].path(), "List[*].name");
//! # Ok::<(), blueprint::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    model::{
        node::Slot, DeclaredAndInheritedMemberCollector, LeafClassifier, Member, MemberCollector,
        Node, NodeKind, NodeRc, PlatformLeafClassifier, RootContext,
    },
    typesystem::{
        BindingResolver, Bindings, ClassId, ClassRc, ClassRegistry, PlatformKind,
        TypeDescriptor, TypeVar,
    },
    Error, Result,
};

/// Upper bound on lookup steps for a single type variable. Exceeding it means the
/// bindings chain loops and the variable counts as unresolved.
const MAX_LOOKUP_STEPS: usize = 1024;

/// Upper bound on nested variable substitutions within one declared type
const MAX_RESOLUTION_DEPTH: usize = 64;

/// Builds the node tree of a [`RootContext`].
///
/// The builder holds no per-build state besides the context; cycle detection relies
/// on the ancestor chain of each node alone, so two independent branches may contain
/// the same type.
pub struct NodeGraphBuilder {
    context: Arc<RootContext>,
    resolver: BindingResolver,
    collector: Box<dyn MemberCollector>,
    classifier: Box<dyn LeafClassifier>,
}

impl NodeGraphBuilder {
    /// Create a builder using the default member collector and leaf classifier
    ///
    /// ## Arguments
    /// * 'context' - Root type, bindings and overrides of this build
    pub fn new(context: Arc<RootContext>) -> Self {
        let registry = context.registry().clone();
        let collector = DeclaredAndInheritedMemberCollector::new(registry.clone(), *context.config());

        NodeGraphBuilder {
            resolver: BindingResolver::new(registry),
            collector: Box::new(collector),
            classifier: Box::new(PlatformLeafClassifier),
            context,
        }
    }

    /// Use a different member collector
    #[must_use]
    pub fn with_collector(mut self, collector: impl MemberCollector + 'static) -> Self {
        self.collector = Box::new(collector);
        self
    }

    /// Use a different leaf classifier
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl LeafClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// The context this builder was created with
    pub fn context(&self) -> &Arc<RootContext> {
        &self.context
    }

    /// Build the complete tree for the root type of the context
    ///
    /// # Errors
    /// Returns [`Error::Resolution`] if a type variable cannot be resolved, or
    /// [`Error::Structural`] for type shapes that cannot be turned into nodes.
    pub fn build_root(&self) -> Result<NodeRc> {
        let root_type = self.context.parameterized_root_type();
        self.create_node(&root_type, None, Slot::Root, None)?
            .ok_or_else(|| structural_error!("No node created for the root type"))
    }

    /// Build the node for a single declared type below `parent`.
    ///
    /// `generic_type` is the declared shape; without it `class_hint` is used as a plain
    /// class. Returns `None` if the node would exceed the configured depth limit.
    ///
    /// ## Arguments
    /// * 'class_hint'   - The declared class
    /// * 'generic_type' - The declared shape, possibly referencing type variables
    /// * 'member'       - The member the node populates, if any
    /// * 'parent'       - The parent node; `None` builds a root node
    ///
    /// # Errors
    /// Returns [`Error::Resolution`] if a type variable cannot be resolved, or
    /// [`Error::Structural`] for type shapes that cannot be turned into nodes.
    pub fn build(
        &self,
        class_hint: ClassId,
        generic_type: Option<&TypeDescriptor>,
        member: Option<&Member>,
        parent: Option<&NodeRc>,
    ) -> Result<Option<NodeRc>> {
        let declared = generic_type
            .cloned()
            .unwrap_or(TypeDescriptor::Concrete(class_hint));
        let slot = match (parent, member) {
            (None, _) => Slot::Root,
            (Some(_), Some(_)) => Slot::Member,
            (Some(_), None) => Slot::Element,
        };

        self.create_node(&declared, member, slot, parent)
    }

    fn registry(&self) -> &Arc<ClassRegistry> {
        self.context.registry()
    }

    fn create_node(
        &self,
        declared: &TypeDescriptor,
        member: Option<&Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
    ) -> Result<Option<NodeRc>> {
        let depth = parent.map_or(0, |p| p.depth() + 1);
        if !self.context.config().allows_depth(depth) {
            log::debug!(
                "Depth limit {} reached, omitting '{}'",
                self.context.config().max_depth,
                self.describe(declared, member, slot, parent)
            );
            return Ok(None);
        }

        let node = self
            .new_node(declared, member, slot, parent)
            .map_err(|error| self.locate(error, declared, member, slot, parent))?;

        let node = Arc::new(node);
        log::trace!("Created node {node}");

        if !node.is_cyclic() && !node.is_ignored() {
            let children = self.create_children(&node)?;
            node.set_children(children)?;
        }

        Ok(Some(node))
    }

    /// Resolve `declared` and create its node, without children
    fn new_node(
        &self,
        declared: &TypeDescriptor,
        member: Option<&Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
    ) -> Result<Node> {
        let resolved = match self.resolve_vars(declared, parent, 0) {
            Ok(resolved) => resolved,
            Err(var) => {
                return Err(Error::Resolution {
                    var: format!("{}.{}", self.registry().class_name(var.owner), var.name),
                    path: self.describe(declared, member, slot, parent),
                })
            }
        };
        let resolved = match resolved {
            TypeDescriptor::Wildcard(_) => self.resolver.resolve_argument(&resolved, &Bindings::new())?,
            other => other,
        };

        Ok(match &resolved {
            TypeDescriptor::ArrayOf(component) => {
                self.array_node(&resolved, component, member, slot, parent)?
            }
            TypeDescriptor::Concrete(id) | TypeDescriptor::Parameterized(id, _) => {
                let class = self.registry().get_or_err(*id)?;
                match class.component() {
                    Some(component) => {
                        let component = TypeDescriptor::concrete(component);
                        let array = TypeDescriptor::array_of(component.clone());
                        self.array_node(&array, &component, member, slot, parent)?
                    }
                    None => self.class_node(class, &resolved, member, slot, parent)?,
                }
            }
            TypeDescriptor::TypeVarRef(_) | TypeDescriptor::Wildcard(_) => {
                return Err(structural_error!(
                    "Cannot create a node for '{}'",
                    self.registry().display(&resolved)
                ))
            }
        })
    }

    /// Attach the chain from the root to the node being created to errors that do not
    /// carry it yet
    fn locate(
        &self,
        error: Error,
        declared: &TypeDescriptor,
        member: Option<&Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
    ) -> Error {
        match error {
            Error::Structural {
                message,
                file,
                line,
            } => Error::Structural {
                message: format!(
                    "{} at {}",
                    message,
                    self.describe(declared, member, slot, parent)
                ),
                file,
                line,
            },
            Error::ClassNotFound(id) => structural_error!(
                "Class not found - {} at {}",
                id,
                self.describe(declared, member, slot, parent)
            ),
            other => other,
        }
    }

    fn array_node(
        &self,
        resolved: &TypeDescriptor,
        component: &TypeDescriptor,
        member: Option<&Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
    ) -> Result<Node> {
        let raw = self.class_of(resolved)?;
        let target = self.target_of(resolved)?;
        if raw.id != target.id {
            log::debug!("Subtype mapping '{}' to '{}'", raw.name, target.name);
        }

        let ignored = self.context.ignores(member, raw.id, target.id);
        let node = Node::new(
            NodeKind::Array,
            raw,
            target,
            Some(TypeDescriptor::array_of(component.clone())),
            member.cloned(),
            slot,
            parent,
            Bindings::new(),
        );

        Ok(if ignored { node.into_ignored() } else { node })
    }

    fn class_node(
        &self,
        raw: ClassRc,
        resolved: &TypeDescriptor,
        member: Option<&Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
    ) -> Result<Node> {
        let target = match self.context.subtype_of(raw.id) {
            Some(subtype) => {
                let target = self.registry().get_or_err(subtype)?;
                log::debug!("Subtype mapping '{}' to '{}'", raw.name, target.name);
                target
            }
            None => raw.clone(),
        };
        let kind = self.kind_of(target.id);

        let mut local = self.resolver.resolve(resolved, &Bindings::new())?;
        self.bind_open_vars(&raw, &mut local);
        if raw.id != target.id {
            let bridge = self.resolver.bridge_bindings(target.id, raw.id, &local)?;
            local.extend(&bridge);
            self.bind_open_vars(&target, &mut local);
        }

        if matches!(kind, NodeKind::Collection | NodeKind::Map) {
            for var in target.type_vars() {
                if local.contains(&var) {
                    continue;
                }

                log::debug!(
                    "Raw container '{}' defaults type parameter '{}' to Object",
                    target.name,
                    var
                );
                local.insert(var, TypeDescriptor::concrete(PlatformKind::Object.id()));
            }
        }

        let supertypes = self.resolver.supertype_bindings(target.id, &local)?;
        if !supertypes.is_empty() {
            log::trace!(
                "Supertype bindings of '{}': {}",
                target.name,
                supertypes
                    .iter()
                    .map(|(var, desc)| format!(
                        "{}.{} -> {}",
                        self.registry().class_name(var.owner),
                        var,
                        self.registry().display(desc)
                    ))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        let mut bindings = supertypes;
        bindings.extend(&local);
        self.default_container_bindings(kind, &target, &mut bindings);

        let generic_type = resolved.generic_shape();
        let cyclic = Self::has_ancestor_of_type(parent, target.id, generic_type.as_ref());
        let ignored = self.context.ignores(member, raw.id, target.id);

        let node = Node::new(
            kind,
            raw,
            target,
            generic_type,
            member.cloned(),
            slot,
            parent,
            bindings,
        );
        let node = if cyclic { node.into_cyclic() } else { node };
        Ok(if ignored { node.into_ignored() } else { node })
    }

    /// Bind the type parameters of a class used without arguments from the root bindings.
    ///
    /// Ancestors are not consulted: their bindings for the same class describe a
    /// different instance of it.
    fn bind_open_vars(&self, class: &ClassRc, local: &mut Bindings) {
        for var in class.type_vars() {
            if local.contains(&var) {
                continue;
            }

            if let Some(found) = self
                .context
                .root_bindings()
                .follow(&var)
                .filter(|found| !found.is_type_var())
            {
                local.insert(var, found.clone());
            }
        }
    }

    fn create_children(&self, node: &NodeRc) -> Result<Vec<NodeRc>> {
        let mut children = Vec::new();

        match node.kind() {
            NodeKind::Class => {
                if self.classifier.is_opaque(node.resolved_class()) {
                    return Ok(children);
                }

                for member in self.collector.collect(node.resolved_class())? {
                    children.extend(self.create_node(
                        &member.declared_type,
                        Some(&member),
                        Slot::Member,
                        Some(node),
                    )?);
                }
            }
            NodeKind::Collection => {
                let element = Self::container_var(PlatformKind::Collection, "E");
                children.extend(self.create_node(&element, None, Slot::Element, Some(node))?);
            }
            NodeKind::Map => {
                let key = Self::container_var(PlatformKind::Map, "K");
                let value = Self::container_var(PlatformKind::Map, "V");
                children.extend(self.create_node(&key, None, Slot::Key, Some(node))?);
                children.extend(self.create_node(&value, None, Slot::Value, Some(node))?);
            }
            NodeKind::Array => {
                let Some(TypeDescriptor::ArrayOf(component)) = node.generic_type() else {
                    return Err(structural_error!(
                        "Array node '{}' has no component type",
                        node.path()
                    ));
                };
                children.extend(self.create_node(component, None, Slot::Element, Some(node))?);
            }
        }

        Ok(children)
    }

    fn kind_of(&self, class: ClassId) -> NodeKind {
        if self.registry().is_subtype(class, PlatformKind::Map.id()) {
            NodeKind::Map
        } else if self.registry().is_subtype(class, PlatformKind::Collection.id()) {
            NodeKind::Collection
        } else {
            NodeKind::Class
        }
    }

    fn container_var(container: PlatformKind, name: &str) -> TypeDescriptor {
        TypeDescriptor::var(container.id(), name)
    }

    /// Containers whose hierarchy leaves the element, key or value parameter open
    /// (e.g. `class Names implements List` used raw) produce `Object` elements.
    fn default_container_bindings(&self, kind: NodeKind, target: &ClassRc, bindings: &mut Bindings) {
        let vars: &[(PlatformKind, &str)] = match kind {
            NodeKind::Collection => &[(PlatformKind::Collection, "E")],
            NodeKind::Map => &[(PlatformKind::Map, "K"), (PlatformKind::Map, "V")],
            NodeKind::Class | NodeKind::Array => &[],
        };

        for (container, name) in vars {
            let var = TypeVar::new(container.id(), *name);
            if bindings.follow(&var).is_some_and(|found| !found.is_type_var()) {
                continue;
            }

            log::debug!(
                "Raw container '{}' defaults type parameter '{}' to Object",
                target.name,
                var
            );
            bindings.insert(var, TypeDescriptor::concrete(PlatformKind::Object.id()));
        }
    }

    fn has_ancestor_of_type(
        parent: Option<&NodeRc>,
        class: ClassId,
        generic_type: Option<&TypeDescriptor>,
    ) -> bool {
        let mut next = parent.cloned();
        while let Some(ancestor) = next {
            if ancestor.is_type(class, generic_type) {
                return true;
            }
            next = ancestor.parent();
        }
        false
    }

    /// Replace every type variable in `descriptor`, looking each one up from `scope`
    /// upwards. Returns the first variable that cannot be resolved.
    fn resolve_vars(
        &self,
        descriptor: &TypeDescriptor,
        scope: Option<&NodeRc>,
        depth: usize,
    ) -> std::result::Result<TypeDescriptor, TypeVar> {
        let resolve_all = |items: &[TypeDescriptor]| {
            items
                .iter()
                .map(|item| self.resolve_vars(item, scope, depth + 1))
                .collect::<std::result::Result<Vec<_>, _>>()
        };

        match descriptor {
            TypeDescriptor::Concrete(_) => Ok(descriptor.clone()),
            TypeDescriptor::TypeVarRef(var) => {
                if depth >= MAX_RESOLUTION_DEPTH {
                    return Err(var.clone());
                }

                let (found, found_at) = self.lookup_var(var, scope).ok_or_else(|| var.clone())?;
                self.resolve_vars(&found, found_at.as_ref(), depth + 1)
            }
            TypeDescriptor::Parameterized(raw, args) => {
                Ok(TypeDescriptor::Parameterized(*raw, resolve_all(args.as_slice())?))
            }
            TypeDescriptor::Wildcard(bounds) => Ok(TypeDescriptor::Wildcard(resolve_all(bounds.as_slice())?)),
            TypeDescriptor::ArrayOf(component) => Ok(TypeDescriptor::array_of(self.resolve_vars(
                component,
                scope,
                depth + 1,
            )?)),
        }
    }

    /// Find the binding of `var`, starting at `scope` and walking up the ancestors, then
    /// consulting the root bindings.
    ///
    /// A binding to another variable continues the search for that variable at the same
    /// node. Returns the descriptor found and the node it was found at; `None` as node
    /// means it came from the root bindings.
    fn lookup_var(
        &self,
        var: &TypeVar,
        scope: Option<&NodeRc>,
    ) -> Option<(TypeDescriptor, Option<NodeRc>)> {
        let mut var = var.clone();
        let mut current = scope.cloned();

        for _ in 0..MAX_LOOKUP_STEPS {
            let Some(node) = current.take() else {
                break;
            };

            let next_var = match node.type_bindings().follow(&var) {
                Some(TypeDescriptor::TypeVarRef(next)) if *next != var => Some(next.clone()),
                Some(found) if !found.is_type_var() => return Some((found.clone(), Some(node.clone()))),
                _ => None,
            };

            match next_var {
                Some(next) => {
                    var = next;
                    current = Some(node);
                }
                None => current = node.parent(),
            }
        }

        self.context
            .root_bindings()
            .follow(&var)
            .filter(|found| !found.is_type_var())
            .map(|found| (found.clone(), None))
    }

    /// The class a resolved shape names; arrays get their array class
    fn class_of(&self, descriptor: &TypeDescriptor) -> Result<ClassRc> {
        match descriptor {
            TypeDescriptor::Concrete(id) | TypeDescriptor::Parameterized(id, _) => {
                self.registry().get_or_err(*id)
            }
            TypeDescriptor::ArrayOf(component) => {
                let component = self.class_of(component)?;
                self.registry().get_or_create_array(component.id)
            }
            _ => Err(structural_error!(
                "'{}' does not name a class",
                self.registry().display(descriptor)
            )),
        }
    }

    /// Like [`NodeGraphBuilder::class_of`], with registered subtypes applied
    fn target_of(&self, descriptor: &TypeDescriptor) -> Result<ClassRc> {
        match descriptor {
            TypeDescriptor::Concrete(id) | TypeDescriptor::Parameterized(id, _) => {
                let id = self.context.subtype_of(*id).unwrap_or(*id);
                self.registry().get_or_err(id)
            }
            TypeDescriptor::ArrayOf(component) => {
                let component = self.target_of(component)?;
                self.registry().get_or_create_array(component.id)
            }
            _ => self.class_of(descriptor),
        }
    }

    /// Render the chain from the root to a node about to be created, followed by its
    /// declared type
    fn describe(
        &self,
        declared: &TypeDescriptor,
        member: Option<&Member>,
        slot: Slot,
        parent: Option<&NodeRc>,
    ) -> String {
        let declared = self.registry().display(declared).to_string();
        match parent {
            Some(parent) => format!(
                "{}{}: {}",
                parent.path(),
                Node::slot_segment(slot, member, &declared),
                declared
            ),
            None => declared,
        }
    }
}
