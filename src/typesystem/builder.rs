//! Builder for class definitions.
//!
//! This module provides the [`ClassBuilder`] struct, which offers a fluent API for declaring
//! classes, their type parameters, supertypes, fields and setters, and registering them in
//! a [`ClassRegistry`].
//!
//! # Example
//!
//! ```rust
//! use blueprint::typesystem::{ClassBuilder, ClassRegistry, PlatformKind, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ClassRegistry::new()?);
//! let list = registry.platform(PlatformKind::List);
//!
//! let boxed = ClassBuilder::new(registry.clone(), "demo", "Box").type_param("T");
//! let value = boxed.var("T");
//! let items = TypeDescriptor::parameterized(list, vec![value.clone()]);
//! let boxed = boxed.field("value", value).field("items", items).build()?;
//!
//! assert_eq!(boxed.arity(), 1);
//! assert_eq!(boxed.fields.count(), 2);
//! # Ok::<(), blueprint::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    typesystem::{
        ClassDef, ClassFlags, ClassFlavor, ClassId, ClassRc, ClassRegistry, FieldDef, MemberFlags,
        MethodDef, TypeDescriptor, TypeVar,
    },
    Result,
};

/// Provides a fluent API for declaring classes
pub struct ClassBuilder {
    /// Class registry the class is registered in
    registry: Arc<ClassRegistry>,
    id: ClassId,
    namespace: String,
    name: String,
    flavor: ClassFlavor,
    flags: ClassFlags,
    type_params: Vec<String>,
    superclass: Option<TypeDescriptor>,
    interfaces: Vec<TypeDescriptor>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
}

impl ClassBuilder {
    /// Start declaring a regular class, allocating a fresh id from the registry
    ///
    /// ## Arguments
    /// * 'registry' - The class registry to use
    /// * 'namespace' - Namespace of the class, may be empty
    /// * 'name' - Simple name of the class
    pub fn new(registry: Arc<ClassRegistry>, namespace: &str, name: &str) -> Self {
        let id = registry.next_id();
        ClassBuilder {
            registry,
            id,
            namespace: namespace.to_string(),
            name: name.to_string(),
            flavor: ClassFlavor::Class,
            flags: ClassFlags::empty(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Use an id reserved earlier through [`ClassRegistry::next_id`] instead of the allocated one
    #[must_use]
    pub fn with_id(mut self, id: ClassId) -> Self {
        self.id = id;
        self
    }

    /// The id the class will be registered under
    #[must_use]
    pub fn id(&self) -> ClassId {
        self.id
    }

    /// A reference to one of this class' type parameters, for use in member declarations
    pub fn var(&self, name: &str) -> TypeDescriptor {
        TypeDescriptor::TypeVarRef(TypeVar::new(self.id, name))
    }

    /// Declare the next type parameter
    #[must_use]
    pub fn type_param(mut self, name: &str) -> Self {
        self.type_params.push(name.to_string());
        self
    }

    /// Declare the generic superclass
    #[must_use]
    pub fn extends(mut self, superclass: TypeDescriptor) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Declare an implemented interface
    #[must_use]
    pub fn implements(mut self, interface: TypeDescriptor) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Mark the class abstract
    #[must_use]
    pub fn abstract_class(mut self) -> Self {
        self.flags |= ClassFlags::ABSTRACT;
        self
    }

    /// Declare an interface instead of a class
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flavor = ClassFlavor::Interface;
        self.flags |= ClassFlags::ABSTRACT | ClassFlags::INTERFACE;
        self
    }

    /// Declare an enumeration instead of a class
    #[must_use]
    pub fn enumeration(mut self) -> Self {
        self.flavor = ClassFlavor::Enum;
        self.flags |= ClassFlags::ENUM | ClassFlags::FINAL;
        self
    }

    /// Mark the class as an opaque value type that is never expanded into members
    #[must_use]
    pub fn opaque(mut self) -> Self {
        self.flags |= ClassFlags::OPAQUE;
        self
    }

    /// Mark the class final
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.flags |= ClassFlags::FINAL;
        self
    }

    /// Declare an instance field
    #[must_use]
    pub fn field(mut self, name: &str, declared_type: TypeDescriptor) -> Self {
        self.fields
            .push(FieldDef::new(name, declared_type, MemberFlags::empty()));
        self
    }

    /// Declare a class-level field
    #[must_use]
    pub fn static_field(mut self, name: &str, declared_type: TypeDescriptor) -> Self {
        self.fields
            .push(FieldDef::new(name, declared_type, MemberFlags::STATIC));
        self
    }

    /// Declare a field that cannot be reassigned
    #[must_use]
    pub fn final_field(mut self, name: &str, declared_type: TypeDescriptor) -> Self {
        self.fields
            .push(FieldDef::new(name, declared_type, MemberFlags::FINAL));
        self
    }

    /// Declare a single-argument instance method
    #[must_use]
    pub fn setter(mut self, name: &str, parameter: TypeDescriptor) -> Self {
        self.methods
            .push(MethodDef::new(name, parameter, MemberFlags::empty()));
        self
    }

    /// Declare an arbitrary single-argument method
    #[must_use]
    pub fn method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    /// Finalize the declaration and register the class
    ///
    /// # Errors
    /// Returns an error if a type parameter is declared twice, a declaration references a
    /// type variable this class does not declare, or the class cannot be registered.
    pub fn build(self) -> Result<ClassRc> {
        for (index, param) in self.type_params.iter().enumerate() {
            if self.type_params[..index].contains(param) {
                return Err(structural_error!(
                    "Type parameter '{}' declared twice on '{}'",
                    param,
                    self.name
                ));
            }
        }

        let declared = self
            .superclass
            .iter()
            .chain(self.interfaces.iter())
            .map(|desc| ("supertype", desc))
            .chain(self.fields.iter().map(|f| (f.name.as_str(), &f.declared_type)))
            .chain(self.methods.iter().map(|m| (m.name.as_str(), &m.parameter)));
        for (member, descriptor) in declared {
            self.check_type_vars(member, descriptor)?;
        }

        let class = Arc::new(ClassDef::new(
            self.id,
            self.flavor,
            self.namespace,
            self.name,
            self.flags,
            self.type_params,
        ));

        if let Some(superclass) = self.superclass {
            class.set_superclass(superclass)?;
        }
        for interface in self.interfaces {
            class.interfaces.push(interface);
        }
        for field in self.fields {
            class.fields.push(field);
        }
        for method in self.methods {
            class.methods.push(method);
        }

        self.registry.insert(class.clone())?;
        Ok(class)
    }

    fn check_type_vars(&self, member: &str, descriptor: &TypeDescriptor) -> Result<()> {
        match descriptor {
            TypeDescriptor::Concrete(_) => Ok(()),
            TypeDescriptor::TypeVarRef(var) => {
                if var.owner == self.id && self.type_params.contains(&var.name) {
                    Ok(())
                } else {
                    Err(structural_error!(
                        "'{}.{}' references type variable '{}' which '{}' does not declare",
                        self.name,
                        member,
                        var.name,
                        self.name
                    ))
                }
            }
            TypeDescriptor::Parameterized(_, args) | TypeDescriptor::Wildcard(args) => args
                .iter()
                .try_for_each(|arg| self.check_type_vars(member, arg)),
            TypeDescriptor::ArrayOf(component) => self.check_type_vars(member, component),
        }
    }
}
