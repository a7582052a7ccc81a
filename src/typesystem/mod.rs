//! Class model standing in for runtime reflection.
//!
//! The node graph never inspects real program types. Instead every class it can
//! encounter is described up front in a [`ClassRegistry`]: its name, flavor,
//! declared type parameters, generic supertypes, fields and setters. Declared types
//! are expressed as [`TypeDescriptor`]s, and the [`BindingResolver`] turns them into
//! [`Bindings`] from type parameters to the descriptors bound to them.
//!
//! # Key Components
//!
//! - [`ClassId`]: Artificial class identifier, with reserved ranges for platform and array classes
//! - [`TypeDescriptor`]: Uniform representation of a declared type shape
//! - [`ClassDef`]: A registered class with its supertypes and members
//! - [`ClassRegistry`]: Central registry for all classes of a build
//! - [`ClassBuilder`]: Builder pattern for declaring classes
//! - [`PlatformKind`]: Pre-registered platform classes (`String`, `List<E>`, `Map<K, V>`, ...)
//! - [`BindingResolver`]: Computes type-parameter bindings from declared shapes
//!
//! # Examples
//!
//! ```rust
//! use blueprint::typesystem::{ClassBuilder, ClassRegistry, PlatformKind, TypeDescriptor};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ClassRegistry::new()?);
//! let string = registry.platform(PlatformKind::String);
//!
//! let person = ClassBuilder::new(registry.clone(), "demo", "Person")
//!     .field("name", TypeDescriptor::concrete(string))
//!     .build()?;
//!
//! assert_eq!(registry.get_by_fullname("demo.Person").unwrap().id, person.id);
//! # Ok::<(), blueprint::Error>(())
//! ```

mod bindings;
mod builder;
mod class;
mod descriptor;
mod id;
mod platform;
mod registry;
mod resolver;

pub use bindings::Bindings;
pub use builder::ClassBuilder;
pub use class::{
    ClassDef, ClassFlags, ClassFlavor, ClassRc, FieldDef, FieldList, MemberFlags, MethodDef,
    MethodList, SupertypeList,
};
pub use descriptor::{TypeDescriptor, TypeVar};
pub use id::{ClassId, ARRAY_CLASS_ID_START, USER_CLASS_ID_START};
pub use platform::{PlatformKind, COLLECTIONS_NAMESPACE, CORE_NAMESPACE};
pub use registry::{ClassRegistry, DescriptorDisplay};
pub use resolver::BindingResolver;
