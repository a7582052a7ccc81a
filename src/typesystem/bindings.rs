use rustc_hash::FxHashMap;

use crate::typesystem::{TypeDescriptor, TypeVar};

/// Maximum nesting followed by [`Bindings::substitute`]
const MAX_SUBSTITUTION_DEPTH: usize = 64;

/// Maps type variables to the descriptors bound to them.
///
/// A value may itself be a [`TypeDescriptor::TypeVarRef`]. That marks a variable
/// which could not be resolved where the map was built and has to be looked up
/// further up the node chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(FxHashMap<TypeVar, TypeDescriptor>);

impl Bindings {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Bindings(FxHashMap::default())
    }

    /// The descriptor bound to `var`
    #[must_use]
    pub fn get(&self, var: &TypeVar) -> Option<&TypeDescriptor> {
        self.0.get(var)
    }

    /// Returns true if `var` has an entry, resolved or not
    #[must_use]
    pub fn contains(&self, var: &TypeVar) -> bool {
        self.0.contains_key(var)
    }

    /// Bind `var`, replacing any earlier binding
    pub fn insert(&mut self, var: TypeVar, descriptor: TypeDescriptor) {
        self.0.insert(var, descriptor);
    }

    /// Copy all entries of `other` into this map, replacing existing ones
    pub fn extend(&mut self, other: &Bindings) {
        self.0
            .extend(other.0.iter().map(|(var, desc)| (var.clone(), desc.clone())));
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing is bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all entries in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&TypeVar, &TypeDescriptor)> {
        self.0.iter()
    }

    /// Look up `var` and keep following while the result is another variable bound
    /// in this same map.
    ///
    /// Returns the last descriptor reached, which is a `TypeVarRef` if the chain
    /// ends in a variable this map knows nothing more about.
    #[must_use]
    pub fn follow(&self, var: &TypeVar) -> Option<&TypeDescriptor> {
        let mut current = self.0.get(var)?;

        // A chain can visit every entry at most once
        for _ in 0..self.0.len() {
            match current {
                TypeDescriptor::TypeVarRef(next) if next != var => match self.0.get(next) {
                    Some(found) => current = found,
                    None => break,
                },
                _ => break,
            }
        }

        Some(current)
    }

    /// Replace every variable occurring in `descriptor` that this map resolves to
    /// a non-variable descriptor. Unknown variables are left in place.
    #[must_use]
    pub fn substitute(&self, descriptor: &TypeDescriptor) -> TypeDescriptor {
        self.substitute_with_depth(descriptor, 0)
    }

    fn substitute_with_depth(&self, descriptor: &TypeDescriptor, depth: usize) -> TypeDescriptor {
        if depth >= MAX_SUBSTITUTION_DEPTH {
            return descriptor.clone();
        }

        match descriptor {
            TypeDescriptor::Concrete(_) => descriptor.clone(),
            TypeDescriptor::TypeVarRef(var) => match self.follow(var) {
                Some(found) if !found.is_type_var() => self.substitute_with_depth(found, depth + 1),
                Some(found) => found.clone(),
                None => descriptor.clone(),
            },
            TypeDescriptor::Parameterized(raw, args) => TypeDescriptor::Parameterized(
                *raw,
                args.iter()
                    .map(|arg| self.substitute_with_depth(arg, depth + 1))
                    .collect(),
            ),
            TypeDescriptor::Wildcard(bounds) => TypeDescriptor::Wildcard(
                bounds
                    .iter()
                    .map(|bound| self.substitute_with_depth(bound, depth + 1))
                    .collect(),
            ),
            TypeDescriptor::ArrayOf(component) => {
                TypeDescriptor::array_of(self.substitute_with_depth(component, depth + 1))
            }
        }
    }
}

impl FromIterator<(TypeVar, TypeDescriptor)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (TypeVar, TypeDescriptor)>>(iter: I) -> Self {
        Bindings(iter.into_iter().collect())
    }
}
