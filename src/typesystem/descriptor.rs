//! Uniform representation of declared type shapes.
//!
//! A [`TypeDescriptor`] is what a member declaration, a supertype clause or a
//! root request looks like before any type parameter has been resolved. It is
//! purely structural: classes are referenced by [`ClassId`], type parameters by
//! [`TypeVar`] (declaring class + parameter name), so two descriptors are equal
//! exactly when they describe the same declared shape.

use std::fmt;

use crate::typesystem::ClassId;

/// A type parameter declared by a generic class, e.g. the `T` of `Box<T>`.
///
/// Two classes may both declare a `T`; the owner keeps them apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar {
    /// The class declaring this parameter
    pub owner: ClassId,
    /// The parameter name as declared
    pub name: String,
}

impl TypeVar {
    /// Create a new type variable for `owner`
    pub fn new(owner: ClassId, name: impl Into<String>) -> Self {
        TypeVar {
            owner,
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A declared type shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// A class used without type arguments (`String`, `Person`, or a raw `List`)
    Concrete(ClassId),
    /// A generic class with its ordered type arguments (`Map<String, T>`)
    Parameterized(ClassId, Vec<TypeDescriptor>),
    /// A reference to a type parameter of some enclosing generic class
    TypeVarRef(TypeVar),
    /// A wildcard with its upper bounds; no bounds means `?`, i.e. Object
    Wildcard(Vec<TypeDescriptor>),
    /// An array of the component type
    ArrayOf(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Shorthand for [`TypeDescriptor::Concrete`]
    #[must_use]
    pub fn concrete(class: ClassId) -> Self {
        TypeDescriptor::Concrete(class)
    }

    /// Shorthand for [`TypeDescriptor::Parameterized`]
    #[must_use]
    pub fn parameterized(raw: ClassId, args: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Parameterized(raw, args)
    }

    /// Shorthand for a [`TypeDescriptor::TypeVarRef`] to `owner`'s parameter `name`
    pub fn var(owner: ClassId, name: impl Into<String>) -> Self {
        TypeDescriptor::TypeVarRef(TypeVar::new(owner, name))
    }

    /// `? extends bound`
    #[must_use]
    pub fn wildcard(bound: TypeDescriptor) -> Self {
        TypeDescriptor::Wildcard(vec![bound])
    }

    /// An unbounded `?`
    #[must_use]
    pub fn unbounded() -> Self {
        TypeDescriptor::Wildcard(Vec::new())
    }

    /// `component[]`
    #[must_use]
    pub fn array_of(component: TypeDescriptor) -> Self {
        TypeDescriptor::ArrayOf(Box::new(component))
    }

    /// The class this descriptor names directly, if it names one.
    ///
    /// Type variables, wildcards and arrays have no raw class of their own;
    /// arrays get one from [`crate::typesystem::ClassRegistry::get_or_create_array`].
    #[must_use]
    pub fn raw_class(&self) -> Option<ClassId> {
        match self {
            TypeDescriptor::Concrete(id) | TypeDescriptor::Parameterized(id, _) => Some(*id),
            _ => None,
        }
    }

    /// The type arguments of a parameterized descriptor, empty otherwise
    #[must_use]
    pub fn type_arguments(&self) -> &[TypeDescriptor] {
        match self {
            TypeDescriptor::Parameterized(_, args) => args,
            _ => &[],
        }
    }

    /// The referenced type variable, if this is a [`TypeDescriptor::TypeVarRef`]
    #[must_use]
    pub fn as_type_var(&self) -> Option<&TypeVar> {
        match self {
            TypeDescriptor::TypeVarRef(var) => Some(var),
            _ => None,
        }
    }

    /// Returns true for [`TypeDescriptor::TypeVarRef`]
    #[must_use]
    pub fn is_type_var(&self) -> bool {
        matches!(self, TypeDescriptor::TypeVarRef(_))
    }

    /// Returns true for [`TypeDescriptor::ArrayOf`]
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, TypeDescriptor::ArrayOf(_))
    }

    /// Returns true if no type variable occurs anywhere inside this descriptor
    #[must_use]
    pub fn is_fully_resolved(&self) -> bool {
        match self {
            TypeDescriptor::Concrete(_) => true,
            TypeDescriptor::TypeVarRef(_) => false,
            TypeDescriptor::Parameterized(_, args) | TypeDescriptor::Wildcard(args) => {
                args.iter().all(TypeDescriptor::is_fully_resolved)
            }
            TypeDescriptor::ArrayOf(component) => component.is_fully_resolved(),
        }
    }

    /// The generic shape worth remembering on a node.
    ///
    /// A bare concrete class carries no information beyond the class itself,
    /// so it is reported as absent.
    #[must_use]
    pub fn generic_shape(&self) -> Option<TypeDescriptor> {
        match self {
            TypeDescriptor::Concrete(_) => None,
            other => Some(other.clone()),
        }
    }
}

impl From<ClassId> for TypeDescriptor {
    fn from(class: ClassId) -> Self {
        TypeDescriptor::Concrete(class)
    }
}

impl From<TypeVar> for TypeDescriptor {
    fn from(var: TypeVar) -> Self {
        TypeDescriptor::TypeVarRef(var)
    }
}
