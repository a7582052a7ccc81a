use std::{collections::VecDeque, sync::Arc};

use rustc_hash::FxHashSet;

use crate::{
    typesystem::{Bindings, ClassId, ClassRegistry, PlatformKind, TypeDescriptor, TypeVar},
    Result,
};

/// Turns declared type shapes into local type-parameter bindings.
///
/// The resolver is purely structural: it never walks the node graph. Whatever it
/// cannot resolve from the bindings it is handed stays behind as a `TypeVarRef`
/// placeholder for the node graph builder to look up in the ancestor chain.
pub struct BindingResolver {
    /// Reference to the class registry
    registry: Arc<ClassRegistry>,
}

impl BindingResolver {
    /// Create a new resolver with the given registry
    ///
    /// ## Arguments
    /// * 'registry' - The class registry to use
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        BindingResolver { registry }
    }

    /// Compute the bindings a descriptor establishes for its own class' type parameters.
    ///
    /// - `Concrete` establishes nothing.
    /// - `TypeVarRef` known to `inherited` yields that single mapping.
    /// - `Parameterized` zips the raw class' parameters with the arguments, each resolved
    ///   through [`BindingResolver::resolve_argument`].
    ///
    /// ## Arguments
    /// * 'descriptor' - The declared shape
    /// * 'inherited'  - Bindings visible where the shape was declared
    ///
    /// # Errors
    /// Returns an error if the raw class is unknown, the argument count does not match its
    /// declared parameters, or an argument is a wildcard with several bounds.
    pub fn resolve(&self, descriptor: &TypeDescriptor, inherited: &Bindings) -> Result<Bindings> {
        let mut local = Bindings::new();

        match descriptor {
            TypeDescriptor::TypeVarRef(var) => {
                if let Some(found) = inherited.follow(var) {
                    local.insert(var.clone(), found.clone());
                }
            }
            TypeDescriptor::Parameterized(raw, args) => {
                let class = self.registry.get_or_err(*raw)?;
                if class.arity() != args.len() {
                    return Err(structural_error!(
                        "'{}' declares {} type parameters but is used with {} arguments: {}",
                        class.name,
                        class.arity(),
                        args.len(),
                        self.registry.display(descriptor)
                    ));
                }

                for (param, arg) in class.type_vars().into_iter().zip(args) {
                    let resolved = self.resolve_argument(arg, inherited)?;
                    local.insert(param, resolved);
                }
            }
            TypeDescriptor::Concrete(_)
            | TypeDescriptor::Wildcard(_)
            | TypeDescriptor::ArrayOf(_) => {}
        }

        Ok(local)
    }

    /// Resolve a single type argument.
    ///
    /// Classes, parameterized classes and arrays are used as they are. A variable is
    /// looked up in `inherited` and stays a placeholder if it is unknown there. A
    /// wildcard resolves to its upper bound, an unbounded one to `Object`.
    ///
    /// # Errors
    /// Returns an error for a wildcard with more than one upper bound.
    pub fn resolve_argument(
        &self,
        argument: &TypeDescriptor,
        inherited: &Bindings,
    ) -> Result<TypeDescriptor> {
        match argument {
            TypeDescriptor::Concrete(_)
            | TypeDescriptor::Parameterized(..)
            | TypeDescriptor::ArrayOf(_) => Ok(argument.clone()),
            TypeDescriptor::TypeVarRef(var) => Ok(inherited
                .follow(var)
                .cloned()
                .unwrap_or_else(|| argument.clone())),
            TypeDescriptor::Wildcard(bounds) => match bounds.as_slice() {
                [] => Ok(TypeDescriptor::concrete(PlatformKind::Object.id())),
                [bound] => self.resolve_argument(bound, inherited),
                _ => Err(structural_error!(
                    "Wildcards with multiple upper bounds are not supported: {}",
                    self.registry.display(argument)
                )),
            },
        }
    }

    /// Bindings for the type parameters of every generic supertype of `class`.
    ///
    /// Each supertype argument is expressed through `local`, the bindings of `class`'
    /// own parameters, so `Child extends Base<String>` yields `Base.T -> String` and
    /// `ArrayList<E> implements List<E>` with `local = {ArrayList.E -> Long}` yields
    /// `List.E -> Long` and `Collection.E -> Long`. Arguments referencing parameters
    /// `local` does not bind are kept as placeholders.
    ///
    /// # Errors
    /// Returns an error if a class in the hierarchy is unknown or a supertype is
    /// declared with a wrong number of arguments.
    pub fn supertype_bindings(&self, class: ClassId, local: &Bindings) -> Result<Bindings> {
        let mut scope = local.clone();
        let mut bridge = Bindings::new();

        let mut visited = FxHashSet::default();
        let mut pending = VecDeque::from([class]);
        while let Some(current) = pending.pop_front() {
            if !visited.insert(current) {
                continue;
            }

            let current_class = self.registry.get_or_err(current)?;
            for supertype in current_class.supertypes() {
                let Some(raw) = supertype.raw_class() else {
                    continue;
                };

                for (param, arg) in self.resolve(&supertype, &scope)?.iter() {
                    let resolved = scope.substitute(arg);
                    bridge.insert(param.clone(), resolved.clone());
                    scope.insert(param.clone(), resolved);
                }

                pending.push_back(raw);
            }
        }

        Ok(bridge)
    }

    /// Bindings for a subtype standing in for a supertype.
    ///
    /// Given the bindings established for `sup` (e.g. `List<String>` gives
    /// `List.E -> String`), works out the parameters of `sub` (e.g. `ArrayList.E -> String`)
    /// by matching the supertype arguments `sub` declares against them. Parameters of `sub`
    /// that cannot be matched this way are paired positionally with those of `sup` when
    /// both declare the same number.
    ///
    /// # Errors
    /// Returns an error if either class is unknown or the hierarchy is malformed.
    pub fn bridge_bindings(
        &self,
        sub: ClassId,
        sup: ClassId,
        sup_bindings: &Bindings,
    ) -> Result<Bindings> {
        let sub_class = self.registry.get_or_err(sub)?;
        let sup_class = self.registry.get_or_err(sup)?;

        let mut bridge = Bindings::new();
        let hierarchy = self.supertype_bindings(sub, &Bindings::new())?;
        for sup_var in sup_class.type_vars() {
            let (Some(TypeDescriptor::TypeVarRef(sub_var)), Some(bound)) =
                (hierarchy.get(&sup_var), sup_bindings.follow(&sup_var))
            else {
                continue;
            };

            if sub_var.owner == sub && !bound.is_type_var() {
                bridge.insert(sub_var.clone(), bound.clone());
            }
        }

        if sub_class.arity() == sup_class.arity() {
            for (sub_var, sup_var) in sub_class.type_vars().into_iter().zip(sup_class.type_vars()) {
                if bridge.contains(&sub_var) {
                    continue;
                }
                if let Some(bound) = sup_bindings.follow(&sup_var) {
                    bridge.insert(sub_var, bound.clone());
                }
            }
        }

        Ok(bridge)
    }

    /// Bindings for the root class' parameters from the caller-supplied arguments.
    ///
    /// # Errors
    /// Returns an error if the root class is unknown.
    pub fn root_bindings(&self, root: ClassId, arguments: &[TypeDescriptor]) -> Result<Bindings> {
        let class = self.registry.get_or_err(root)?;

        Ok(class
            .type_vars()
            .into_iter()
            .zip(arguments.iter().cloned())
            .inspect(|(var, arg)| {
                log::trace!(
                    "Mapping type variable '{}' of '{}' to '{}'",
                    var,
                    class.name,
                    self.registry.display(arg)
                );
            })
            .collect())
    }

    /// The declared type variable `name` of `class`, if it declares one
    pub fn type_var(&self, class: ClassId, name: &str) -> Option<TypeVar> {
        self.registry.get(&class)?.type_var(name)
    }
}
