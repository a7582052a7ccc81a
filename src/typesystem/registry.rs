//! Central class registry.
//!
//! The [`ClassRegistry`] is the type universe the node graph is built against. It
//! stands in for runtime reflection: every class a [`TypeDescriptor`] can name has
//! to be registered here, either up front (the [`PlatformKind`] classes), through a
//! [`crate::typesystem::ClassBuilder`], or on demand (array classes).
//!
//! # Registry Architecture
//!
//! - **Id-based lookup**: Primary index using [`ClassId`]s
//! - **Name-based lookup**: Secondary indices for full names and simple names
//! - **Array index**: Synthesized array classes keyed by their component class
//!
//! # Thread Safety
//!
//! - Lock-free data structures for primary storage (`SkipMap`)
//! - Concurrent hash maps for indices (`DashMap`)
//! - Atomic operations for id generation
//!
//! # Examples
//!
//! ```rust
//! use blueprint::typesystem::{ClassRegistry, PlatformKind};
//!
//! let registry = ClassRegistry::new()?;
//! let list = registry.get_platform(PlatformKind::List)?;
//! assert_eq!(list.fullname(), "core.collections.List");
//!
//! let string = registry.platform(PlatformKind::String);
//! let strings = registry.get_or_create_array(string)?;
//! assert_eq!(strings.name, "String[]");
//! # Ok::<(), blueprint::Error>(())
//! ```

use std::{
    fmt,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use rustc_hash::FxHashSet;
use strum::IntoEnumIterator;

use crate::{
    typesystem::{
        ClassDef, ClassFlags, ClassFlavor, ClassId, ClassRc, PlatformKind, TypeDescriptor,
        ARRAY_CLASS_ID_START, USER_CLASS_ID_START,
    },
    Error::{ClassInsert, ClassNotFound},
    Result,
};

/// Thread-safe registry of every class known to a build.
pub struct ClassRegistry {
    /// Primary class storage indexed by id
    classes: SkipMap<ClassId, ClassRc>,
    /// Atomic counter for user class ids
    next_id: AtomicU32,
    /// Atomic counter for synthesized array class ids
    next_array_id: AtomicU32,
    /// Secondary index: classes indexed by simple name (may have duplicates)
    classes_by_name: DashMap<String, Vec<ClassId>>,
    /// Secondary index: classes indexed by full name (namespace.name)
    classes_by_fullname: DashMap<String, ClassId>,
    /// Array classes indexed by their component class
    arrays: DashMap<ClassId, ClassId>,
}

impl ClassRegistry {
    /// Create a new class registry with all [`PlatformKind`] classes registered.
    ///
    /// # Errors
    /// Returns an error if the platform classes could not be registered.
    pub fn new() -> Result<Self> {
        let registry = ClassRegistry {
            classes: SkipMap::new(),
            next_id: AtomicU32::new(USER_CLASS_ID_START + 1),
            next_array_id: AtomicU32::new(ARRAY_CLASS_ID_START + 1),
            classes_by_name: DashMap::new(),
            classes_by_fullname: DashMap::new(),
            arrays: DashMap::new(),
        };

        registry.initialize_platform()?;
        Ok(registry)
    }

    fn initialize_platform(&self) -> Result<()> {
        for kind in PlatformKind::iter() {
            let class = ClassDef::new(
                kind.id(),
                kind.flavor(),
                kind.namespace().to_string(),
                kind.name().to_string(),
                kind.flags(),
                kind.type_params().iter().map(|p| (*p).to_string()).collect(),
            );

            if kind != PlatformKind::Object && class.flavor == ClassFlavor::Class {
                class.set_superclass(TypeDescriptor::concrete(PlatformKind::Object.id()))?;
            }

            if let Some(interface) = kind.direct_interface() {
                let forwarded = class
                    .type_vars()
                    .into_iter()
                    .map(TypeDescriptor::TypeVarRef)
                    .collect();
                class
                    .interfaces
                    .push(TypeDescriptor::parameterized(interface.id(), forwarded));
            }

            self.insert(Arc::new(class))?;
        }

        Ok(())
    }

    /// Allocate a fresh id for a user class.
    ///
    /// Reserving ids ahead of registration lets classes that reference each other
    /// be declared in any order.
    pub fn next_id(&self) -> ClassId {
        ClassId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a class
    ///
    /// # Errors
    /// Returns [`crate::Error::ClassInsert`] if the id or the full name is already taken.
    pub fn insert(&self, class: ClassRc) -> Result<()> {
        if self.classes.contains_key(&class.id) {
            return Err(ClassInsert(class.id));
        }

        match self.classes_by_fullname.entry(class.fullname()) {
            Entry::Occupied(_) => return Err(ClassInsert(class.id)),
            Entry::Vacant(entry) => {
                entry.insert(class.id);
            }
        }

        self.classes_by_name
            .entry(class.name.clone())
            .or_default()
            .push(class.id);
        self.classes.insert(class.id, class);

        Ok(())
    }

    /// Get a class by its id
    pub fn get(&self, id: &ClassId) -> Option<ClassRc> {
        self.classes.get(id).map(|entry| entry.value().clone())
    }

    /// Get a class by its id, failing if it is unknown
    ///
    /// # Errors
    /// Returns [`crate::Error::ClassNotFound`] if no class with this id is registered.
    pub fn get_or_err(&self, id: ClassId) -> Result<ClassRc> {
        self.get(&id).ok_or(ClassNotFound(id))
    }

    /// Get all classes with a simple name
    pub fn get_by_name(&self, name: &str) -> Vec<ClassRc> {
        match self.classes_by_name.get(name) {
            Some(ids) => ids.iter().filter_map(|id| self.get(id)).collect(),
            None => Vec::new(),
        }
    }

    /// Get a class by its full name (Namespace.Name)
    pub fn get_by_fullname(&self, fullname: &str) -> Option<ClassRc> {
        let id = *self.classes_by_fullname.get(fullname)?;
        self.get(&id)
    }

    /// The reserved id of a platform class
    #[must_use]
    pub fn platform(&self, kind: PlatformKind) -> ClassId {
        kind.id()
    }

    /// Get a platform class
    ///
    /// # Errors
    /// Returns [`crate::Error::ClassNotFound`] if the platform classes have not been registered.
    pub fn get_platform(&self, kind: PlatformKind) -> Result<ClassRc> {
        self.get_or_err(kind.id())
    }

    /// Get the array class for `component`, creating it on first use
    ///
    /// # Errors
    /// Returns an error if the component class is unknown.
    pub fn get_or_create_array(&self, component: ClassId) -> Result<ClassRc> {
        let component_class = self.get_or_err(component)?;

        match self.arrays.entry(component) {
            Entry::Occupied(entry) => self.get_or_err(*entry.get()),
            Entry::Vacant(entry) => {
                let id = ClassId::new(self.next_array_id.fetch_add(1, Ordering::Relaxed));
                let array = Arc::new(ClassDef::new(
                    id,
                    ClassFlavor::Array { component },
                    component_class.namespace.clone(),
                    format!("{}[]", component_class.name),
                    ClassFlags::FINAL,
                    Vec::new(),
                ));
                array.set_superclass(TypeDescriptor::concrete(PlatformKind::Object.id()))?;

                self.insert(array.clone())?;
                entry.insert(id);
                Ok(array)
            }
        }
    }

    /// The direct generic supertypes of a class, superclass first
    pub fn supertypes(&self, id: ClassId) -> Vec<TypeDescriptor> {
        self.get(&id)
            .map(|class| class.supertypes())
            .unwrap_or_default()
    }

    /// Returns true if `sub` is `sup`, or inherits from it through any chain of
    /// superclasses and interfaces.
    ///
    /// Every non-primitive class is a subtype of `Object`. Array classes are
    /// covariant in their component.
    pub fn is_subtype(&self, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup {
            return true;
        }

        let Some(sub_class) = self.get(&sub) else {
            return false;
        };

        if sup == PlatformKind::Object.id() {
            return !sub_class.is_primitive();
        }

        if let (Some(sub_component), Some(sup_component)) = (
            sub_class.component(),
            self.get(&sup).and_then(|class| class.component()),
        ) {
            return self.is_subtype(sub_component, sup_component);
        }

        let mut visited = FxHashSet::default();
        let mut pending = vec![sub];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }

            for supertype in self.supertypes(current) {
                match supertype.raw_class() {
                    Some(raw) if raw == sup => return true,
                    Some(raw) => pending.push(raw),
                    None => {}
                }
            }
        }

        false
    }

    /// Render a descriptor with class names instead of ids
    pub fn display<'a>(&'a self, descriptor: &'a TypeDescriptor) -> DescriptorDisplay<'a> {
        DescriptorDisplay {
            registry: self,
            descriptor,
        }
    }

    /// Simple name of a class, or its id if it is unknown
    pub fn class_name(&self, id: ClassId) -> String {
        self.get(&id)
            .map_or_else(|| id.to_string(), |class| class.name.clone())
    }

    /// Get the count of classes in the registry
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if there are no classes in the registry
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns an iterator over all classes, in id order
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, ClassId, ClassRc> {
        self.classes.iter()
    }

    /// Returns all classes, in id order
    pub fn all_classes(&self) -> Vec<ClassRc> {
        self.classes
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}

/// Display adapter returned by [`ClassRegistry::display`]
pub struct DescriptorDisplay<'a> {
    registry: &'a ClassRegistry,
    descriptor: &'a TypeDescriptor,
}

impl fmt::Display for DescriptorDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.descriptor {
            TypeDescriptor::Concrete(id) => f.write_str(&self.registry.class_name(*id)),
            TypeDescriptor::Parameterized(id, args) => {
                write!(f, "{}<", self.registry.class_name(*id))?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", self.registry.display(arg))?;
                }
                f.write_str(">")
            }
            TypeDescriptor::TypeVarRef(var) => f.write_str(&var.name),
            TypeDescriptor::Wildcard(bounds) => {
                f.write_str("?")?;
                for (index, bound) in bounds.iter().enumerate() {
                    f.write_str(if index == 0 { " extends " } else { " & " })?;
                    write!(f, "{}", self.registry.display(bound))?;
                }
                Ok(())
            }
            TypeDescriptor::ArrayOf(component) => {
                write!(f, "{}[]", self.registry.display(component))
            }
        }
    }
}
