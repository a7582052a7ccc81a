//! Root type, root bindings and per-member/per-class overrides of a build.
//!
//! A [`RootContext`] is created once per generation request through a
//! [`RootContextBuilder`]. Everything that can be checked without building the node
//! graph is checked while the context is being assembled: the root's type arguments,
//! subtype substitutions, nullable overrides on primitives and overrides naming
//! members that do not exist.
//!
//! # Examples
//!
//! ```rust
//! use blueprint::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ClassRegistry::new()?);
//! let map = registry.platform(PlatformKind::Map);
//! let string = registry.platform(PlatformKind::String);
//! let long = registry.platform(PlatformKind::Long);
//!
//! let context = RootContext::builder(registry.clone(), TypeDescriptor::concrete(map))
//!     .with_type_arguments(vec![string.into(), long.into()])?
//!     .subtype(map, registry.platform(PlatformKind::TreeMap))?
//!     .build()?;
//!
//! assert_eq!(context.root_bindings().len(), 2);
//! # Ok::<(), blueprint::Error>(())
//! ```

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    model::{Member, Node, NodeConfig},
    typesystem::{BindingResolver, Bindings, ClassId, ClassRc, ClassRegistry, TypeDescriptor},
    Error::Usage,
    Result,
};

/// Opaque handle of a user-supplied value generator. The node graph only records
/// which generator applies where; invoking it is up to the generation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorId(pub u32);

/// A member as identified by overrides: the declaring class and the member name
type MemberKey = (ClassId, String);

/// Validated root type information and overrides of a single build
pub struct RootContext {
    registry: Arc<ClassRegistry>,
    config: NodeConfig,
    root_type: TypeDescriptor,
    root_class: ClassId,
    root_type_arguments: Vec<TypeDescriptor>,
    root_bindings: Bindings,
    ignored_members: FxHashSet<MemberKey>,
    ignored_classes: FxHashSet<ClassId>,
    nullable_members: FxHashSet<MemberKey>,
    nullable_classes: FxHashSet<ClassId>,
    member_generators: FxHashMap<MemberKey, GeneratorId>,
    class_generators: FxHashMap<ClassId, GeneratorId>,
    subtypes: FxHashMap<ClassId, ClassId>,
}

impl RootContext {
    /// Start assembling a context for `root_type`
    pub fn builder(registry: Arc<ClassRegistry>, root_type: TypeDescriptor) -> RootContextBuilder {
        RootContextBuilder {
            registry,
            config: NodeConfig::default(),
            root_type,
            root_type_arguments: Vec::new(),
            ignored_members: FxHashSet::default(),
            ignored_classes: FxHashSet::default(),
            nullable_members: FxHashSet::default(),
            nullable_classes: FxHashSet::default(),
            member_generators: FxHashMap::default(),
            class_generators: FxHashMap::default(),
            subtypes: FxHashMap::default(),
        }
    }

    /// The registry all class ids of this context refer to
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// The build configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// The requested root type
    pub fn root_type(&self) -> &TypeDescriptor {
        &self.root_type
    }

    /// The class whose type parameters the root type arguments bind; the component class
    /// for array roots
    pub fn root_class(&self) -> ClassId {
        self.root_class
    }

    /// The caller-supplied type arguments of the root class
    pub fn root_type_arguments(&self) -> &[TypeDescriptor] {
        &self.root_type_arguments
    }

    /// The root type with the root type arguments applied to its innermost class, so
    /// `Link` given `[String]` becomes `Link<String>` and `List[]` given `[Long]` becomes
    /// `List<Long>[]`. This is the shape the root node is built from.
    #[must_use]
    pub fn parameterized_root_type(&self) -> TypeDescriptor {
        fn apply(shape: &TypeDescriptor, arguments: &[TypeDescriptor]) -> TypeDescriptor {
            match shape {
                TypeDescriptor::ArrayOf(component) => {
                    TypeDescriptor::array_of(apply(component, arguments))
                }
                TypeDescriptor::Concrete(id) if !arguments.is_empty() => {
                    TypeDescriptor::parameterized(*id, arguments.to_vec())
                }
                other => other.clone(),
            }
        }

        apply(&self.root_type, &self.root_type_arguments)
    }

    /// The root class' type parameters zipped with the root type arguments
    pub fn root_bindings(&self) -> &Bindings {
        &self.root_bindings
    }

    /// The substitute registered for `class`, if any
    pub fn subtype_of(&self, class: ClassId) -> Option<ClassId> {
        self.subtypes.get(&class).copied()
    }

    /// Returns true if the node's member, declared class or substituted class is ignored
    pub fn is_ignored(&self, node: &Node) -> bool {
        self.ignores(
            node.originating_member(),
            node.raw_class().id,
            node.resolved_class().id,
        )
    }

    /// Returns true if the node's member, declared class or substituted class may be
    /// left null
    pub fn is_nullable(&self, node: &Node) -> bool {
        let member = node.originating_member().map(Self::member_key);
        member.is_some_and(|key| self.nullable_members.contains(&key))
            || self.nullable_classes.contains(&node.resolved_class().id)
            || self.nullable_classes.contains(&node.raw_class().id)
    }

    /// The generator registered for the node's member, else for its substituted class,
    /// else for its declared class
    pub fn generator(&self, node: &Node) -> Option<GeneratorId> {
        node.originating_member()
            .and_then(|member| self.member_generators.get(&Self::member_key(member)))
            .or_else(|| self.class_generators.get(&node.resolved_class().id))
            .or_else(|| self.class_generators.get(&node.raw_class().id))
            .copied()
    }

    /// The ignore rule shared by node creation and [`RootContext::is_ignored`]
    pub(crate) fn ignores(&self, member: Option<&Member>, raw: ClassId, target: ClassId) -> bool {
        member.is_some_and(|m| self.ignored_members.contains(&Self::member_key(m)))
            || self.ignored_classes.contains(&raw)
            || self.ignored_classes.contains(&target)
    }

    fn member_key(member: &Member) -> MemberKey {
        (member.declaring_class, member.name.clone())
    }
}

/// Assembles and validates a [`RootContext`]
pub struct RootContextBuilder {
    registry: Arc<ClassRegistry>,
    config: NodeConfig,
    root_type: TypeDescriptor,
    root_type_arguments: Vec<TypeDescriptor>,
    ignored_members: FxHashSet<MemberKey>,
    ignored_classes: FxHashSet<ClassId>,
    nullable_members: FxHashSet<MemberKey>,
    nullable_classes: FxHashSet<ClassId>,
    member_generators: FxHashMap<MemberKey, GeneratorId>,
    class_generators: FxHashMap<ClassId, GeneratorId>,
    subtypes: FxHashMap<ClassId, ClassId>,
}

impl RootContextBuilder {
    /// Use a different build configuration
    #[must_use]
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Supply the type arguments of a generic root class
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if the root class is not generic, the number of
    /// arguments does not match its type parameters, or an argument is not a fully
    /// specified type (a type variable, a wildcard or a generic class without arguments).
    pub fn with_type_arguments(mut self, arguments: Vec<TypeDescriptor>) -> Result<Self> {
        let root = self.root_class()?;
        let parameters = self.bindable_parameters(&root);

        if parameters == 0 && !arguments.is_empty() {
            return Err(Usage(format!(
                "Class '{}' is not generic. Specifying type arguments ({}) is not valid for this class",
                self.registry.display(&self.root_type),
                self.display_all(&arguments)
            )));
        }

        if parameters != arguments.len() {
            return Err(self.arity_error(&root));
        }

        for argument in &arguments {
            self.check_type_argument(argument, &arguments)?;
        }

        self.root_type_arguments = arguments;
        Ok(self)
    }

    /// Do not expand the member `name` of `class`; it may be inherited
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if the class has no such field.
    pub fn ignore_member(mut self, class: ClassId, name: &str) -> Result<Self> {
        let key = self.member(class, name)?.0;
        self.ignored_members.insert(key);
        Ok(self)
    }

    /// Do not expand nodes of `class`
    #[must_use]
    pub fn ignore_class(mut self, class: ClassId) -> Self {
        self.ignored_classes.insert(class);
        self
    }

    /// Allow the member `name` of `class` to be left null
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if the class has no such field or the field is primitive.
    pub fn nullable_member(mut self, class: ClassId, name: &str) -> Result<Self> {
        let (key, declared_type) = self.member(class, name)?;
        if let Some(raw) = declared_type.raw_class() {
            if self.registry.get_or_err(raw)?.is_primitive() {
                return Err(Usage(format!(
                    "Primitive field '{}.{}' cannot be set to null",
                    self.registry.class_name(key.0),
                    key.1
                )));
            }
        }

        self.nullable_members.insert(key);
        Ok(self)
    }

    /// Allow every node of `class` to be left null
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if the class is primitive.
    pub fn nullable_class(mut self, class: ClassId) -> Result<Self> {
        let class_def = self.registry.get_or_err(class)?;
        if class_def.is_primitive() {
            return Err(Usage(format!(
                "Primitive class '{}' cannot be set to null",
                class_def.name
            )));
        }

        self.nullable_classes.insert(class);
        Ok(self)
    }

    /// Use `generator` for the member `name` of `class`
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if the class has no such field.
    pub fn generator_for_member(
        mut self,
        class: ClassId,
        name: &str,
        generator: GeneratorId,
    ) -> Result<Self> {
        let key = self.member(class, name)?.0;
        self.member_generators.insert(key, generator);
        Ok(self)
    }

    /// Use `generator` for every node of `class`
    #[must_use]
    pub fn generator_for_class(mut self, class: ClassId, generator: GeneratorId) -> Self {
        self.class_generators.insert(class, generator);
        self
    }

    /// Build nodes declared as `from` as `to` instead
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if `from` and `to` are the same class, `to` is not a
    /// subtype of `from`, or `to` is an interface or abstract class.
    pub fn subtype(mut self, from: ClassId, to: ClassId) -> Result<Self> {
        let from_class = self.registry.get_or_err(from)?;
        let to_class = self.registry.get_or_err(to)?;

        if from == to {
            return Err(Usage(format!(
                "Cannot map the class to itself: '{}'",
                to_class.fullname()
            )));
        }
        if !self.registry.is_subtype(to, from) {
            return Err(Usage(format!(
                "Class '{}' is not a subtype of '{}'",
                to_class.fullname(),
                from_class.fullname()
            )));
        }
        if !to_class.is_concrete() {
            return Err(Usage(format!(
                "Class must not be an interface or abstract class: '{}'",
                to_class.fullname()
            )));
        }

        self.subtypes.insert(from, to);
        Ok(self)
    }

    /// Finish the context
    ///
    /// # Errors
    /// Returns [`crate::Error::Usage`] if the root class is generic and was not given the
    /// matching number of type arguments, or the root type does not name a class.
    pub fn build(self) -> Result<RootContext> {
        let root = self.root_class()?;
        if self.bindable_parameters(&root) != self.root_type_arguments.len() {
            return Err(self.arity_error(&root));
        }

        let resolver = BindingResolver::new(self.registry.clone());
        let root_bindings = resolver.root_bindings(root.id, &self.root_type_arguments)?;

        Ok(RootContext {
            registry: self.registry,
            config: self.config,
            root_type: self.root_type,
            root_class: root.id,
            root_type_arguments: self.root_type_arguments,
            root_bindings,
            ignored_members: self.ignored_members,
            ignored_classes: self.ignored_classes,
            nullable_members: self.nullable_members,
            nullable_classes: self.nullable_classes,
            member_generators: self.member_generators,
            class_generators: self.class_generators,
            subtypes: self.subtypes,
        })
    }

    /// The class the root type arguments apply to
    fn root_class(&self) -> Result<ClassRc> {
        let mut root = &self.root_type;
        while let TypeDescriptor::ArrayOf(component) = root {
            root = component;
        }

        match root.raw_class() {
            Some(id) => self.registry.get_or_err(id),
            None => Err(Usage(format!(
                "Root type '{}' must name a class",
                self.registry.display(&self.root_type)
            ))),
        }
    }

    /// Parameters still open for root type arguments. A parameterized root already binds
    /// all of its own.
    fn bindable_parameters(&self, root: &ClassRc) -> usize {
        let mut shape = &self.root_type;
        while let TypeDescriptor::ArrayOf(component) = shape {
            shape = component;
        }

        match shape {
            TypeDescriptor::Parameterized(..) => 0,
            _ => root.arity(),
        }
    }

    fn arity_error(&self, root: &ClassRc) -> crate::Error {
        Usage(format!(
            "Class '{}' has {} type parameters: [{}]. Specify the required type arguments, got {}",
            root.fullname(),
            self.bindable_parameters(root),
            root.type_params.join(", "),
            self.root_type_arguments.len()
        ))
    }

    fn check_type_argument(
        &self,
        argument: &TypeDescriptor,
        all: &[TypeDescriptor],
    ) -> Result<()> {
        let invalid = |reason: &str| {
            Usage(format!(
                "Invalid type argument '{}' in ({}): {}",
                self.registry.display(argument),
                self.display_all(all),
                reason
            ))
        };

        match argument {
            TypeDescriptor::Concrete(id) => {
                if self.registry.get_or_err(*id)?.is_generic() {
                    return Err(invalid(
                        "generic classes must be given with their own type arguments",
                    ));
                }
                Ok(())
            }
            TypeDescriptor::Parameterized(id, args) => {
                if self.registry.get_or_err(*id)?.arity() != args.len() {
                    return Err(invalid("wrong number of type arguments"));
                }
                args.iter()
                    .try_for_each(|arg| self.check_type_argument(arg, all))
            }
            TypeDescriptor::ArrayOf(component) => self.check_type_argument(component, all),
            TypeDescriptor::TypeVarRef(_) | TypeDescriptor::Wildcard(_) => {
                Err(invalid("type arguments must be fully specified"))
            }
        }
    }

    /// Find the field `name` on `class` or one of its superclasses
    fn member(&self, class: ClassId, name: &str) -> Result<(MemberKey, TypeDescriptor)> {
        let mut next = Some(self.registry.get_or_err(class)?);
        let mut visited = FxHashSet::default();

        while let Some(current) = next {
            if !visited.insert(current.id) {
                break;
            }
            if let Some(field) = current.field(name) {
                return Ok(((current.id, name.to_string()), field.declared_type.clone()));
            }
            next = current
                .superclass()
                .and_then(TypeDescriptor::raw_class)
                .and_then(|superclass| self.registry.get(&superclass));
        }

        Err(Usage(format!(
            "Invalid field '{}' for class '{}'",
            name,
            self.registry.class_name(class)
        )))
    }

    fn display_all(&self, descriptors: &[TypeDescriptor]) -> String {
        descriptors
            .iter()
            .map(|desc| self.registry.display(desc).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
