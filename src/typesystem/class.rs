//! Class definitions held by the [`crate::typesystem::ClassRegistry`].

use std::sync::{Arc, OnceLock};

use bitflags::bitflags;

use crate::{
    typesystem::{ClassId, TypeDescriptor, TypeVar},
    Result,
};

/// A vector that holds the declared fields of a class
pub type FieldList = Arc<boxcar::Vec<FieldDef>>;
/// A vector that holds the declared single-argument methods of a class
pub type MethodList = Arc<boxcar::Vec<MethodDef>>;
/// A vector that holds generic supertypes
pub type SupertypeList = Arc<boxcar::Vec<TypeDescriptor>>;
/// Reference to a `ClassDef`
pub type ClassRc = Arc<ClassDef>;

bitflags! {
    /// Modifiers of a class
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClassFlags: u32 {
        /// Class cannot be instantiated directly
        const ABSTRACT = 0x0001;
        /// Class is an interface
        const INTERFACE = 0x0002;
        /// Class cannot be subclassed
        const FINAL = 0x0004;
        /// Class is an enumeration
        const ENUM = 0x0008;
        /// Class is a value type that is generated as a whole, never member by member
        const OPAQUE = 0x0010;
    }
}

bitflags! {
    /// Modifiers of a field or method
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u32 {
        /// Member belongs to the class, not its instances
        const STATIC = 0x0001;
        /// Field cannot be reassigned
        const FINAL = 0x0002;
    }
}

/// What kind of class a [`ClassDef`] describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassFlavor {
    /// A regular class
    Class,
    /// An interface
    Interface,
    /// An enumeration
    Enum,
    /// An unboxed primitive
    Primitive,
    /// An array class synthesized by the registry
    Array {
        /// The element class
        component: ClassId,
    },
}

/// A field declared by a class
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared type, possibly referencing type variables of the declaring class
    pub declared_type: TypeDescriptor,
    /// Modifiers
    pub flags: MemberFlags,
}

impl FieldDef {
    /// Create a new field definition
    pub fn new(name: impl Into<String>, declared_type: TypeDescriptor, flags: MemberFlags) -> Self {
        FieldDef {
            name: name.into(),
            declared_type,
            flags,
        }
    }

    /// Returns true if this is a class-level field
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    /// Returns true if this field cannot be reassigned
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.flags.contains(MemberFlags::FINAL)
    }
}

/// A method taking exactly one argument, i.e. a setter candidate
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Type of the single parameter
    pub parameter: TypeDescriptor,
    /// Modifiers
    pub flags: MemberFlags,
}

impl MethodDef {
    /// Create a new method definition
    pub fn new(name: impl Into<String>, parameter: TypeDescriptor, flags: MemberFlags) -> Self {
        MethodDef {
            name: name.into(),
            parameter,
            flags,
        }
    }

    /// Returns true if this is a class-level method
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }
}

/// Represents a class, interface, enum, primitive or array class. Its declared
/// members and supertypes may reference the class' own type parameters.
pub struct ClassDef {
    /// Id
    pub id: ClassId,
    /// Namespace (can be empty)
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// The `ClassFlavor`
    pub flavor: ClassFlavor,
    /// Modifiers
    pub flags: ClassFlags,
    /// Declared type parameter names, in order
    pub type_params: Vec<String>,
    /// The generic superclass, aka 'extends'
    superclass: OnceLock<TypeDescriptor>,
    /// All generic interfaces this class implements
    pub interfaces: SupertypeList,
    /// All fields this class declares (not inherited ones)
    pub fields: FieldList,
    /// All single-argument methods this class declares
    pub methods: MethodList,
}

impl ClassDef {
    /// Create a new instance of a `ClassDef`
    pub fn new(
        id: ClassId,
        flavor: ClassFlavor,
        namespace: String,
        name: String,
        flags: ClassFlags,
        type_params: Vec<String>,
    ) -> Self {
        ClassDef {
            id,
            namespace,
            name,
            flavor,
            flags,
            type_params,
            superclass: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the generic superclass of this class, if it has one
    pub fn superclass(&self) -> Option<&TypeDescriptor> {
        self.superclass.get()
    }

    /// Set the generic superclass of this class
    ///
    /// # Errors
    /// Returns an error if the superclass has already been set, or if the
    /// descriptor does not name a class.
    pub fn set_superclass(&self, superclass: TypeDescriptor) -> Result<()> {
        if superclass.raw_class().is_none() {
            return Err(structural_error!(
                "Superclass of '{}' must name a class",
                self.name
            ));
        }

        self.superclass
            .set(superclass)
            .map_err(|_| structural_error!("Superclass of '{}' has already been set", self.name))
    }

    /// All direct generic supertypes, superclass first, then interfaces in declaration order
    pub fn supertypes(&self) -> Vec<TypeDescriptor> {
        let mut supertypes = Vec::with_capacity(self.interfaces.count() + 1);
        if let Some(superclass) = self.superclass() {
            supertypes.push(superclass.clone());
        }
        for (_, interface) in self.interfaces.iter() {
            supertypes.push(interface.clone());
        }
        supertypes
    }

    /// Returns the full name (Namespace.Name) of the entity
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// Number of declared type parameters
    #[must_use]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// Returns true if this class declares type parameters
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// The declared type parameters as [`TypeVar`]s, in order
    pub fn type_vars(&self) -> Vec<TypeVar> {
        self.type_params
            .iter()
            .map(|name| TypeVar::new(self.id, name.clone()))
            .collect()
    }

    /// The declared type parameter called `name`
    pub fn type_var(&self, name: &str) -> Option<TypeVar> {
        self.type_params
            .iter()
            .any(|param| param == name)
            .then(|| TypeVar::new(self.id, name))
    }

    /// Returns true for interfaces
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flavor == ClassFlavor::Interface || self.flags.contains(ClassFlags::INTERFACE)
    }

    /// Returns true for abstract classes and interfaces
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_interface() || self.flags.contains(ClassFlags::ABSTRACT)
    }

    /// Returns true if instances of exactly this class can be created
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        !self.is_abstract()
    }

    /// Returns true for enumerations
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.flavor == ClassFlavor::Enum || self.flags.contains(ClassFlags::ENUM)
    }

    /// Returns true for unboxed primitives
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.flavor == ClassFlavor::Primitive
    }

    /// Returns true for opaque value types
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.flags.contains(ClassFlags::OPAQUE)
    }

    /// Returns true for synthesized array classes
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, ClassFlavor::Array { .. })
    }

    /// The element class of an array class
    #[must_use]
    pub fn component(&self) -> Option<ClassId> {
        match self.flavor {
            ClassFlavor::Array { component } => Some(component),
            _ => None,
        }
    }

    /// Look up a declared (not inherited) field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields
            .iter()
            .map(|(_, field)| field)
            .find(|field| field.name == name)
    }
}

impl std::fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDef")
            .field("id", &self.id)
            .field("fullname", &self.fullname())
            .field("flavor", &self.flavor)
            .field("flags", &self.flags)
            .field("type_params", &self.type_params)
            .finish_non_exhaustive()
    }
}
