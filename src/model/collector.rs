//! Member discovery.
//!
//! The node graph builder does not know how a class' populatable members are found.
//! It asks a [`MemberCollector`], which returns an ordered list of [`Member`]s. The
//! default [`DeclaredAndInheritedMemberCollector`] mirrors field-based reflection:
//! declared instance fields of the class and its superclasses, optionally paired
//! with setters.

use std::{fmt, sync::Arc};

use rustc_hash::FxHashSet;

use crate::{
    model::{AssignmentStyle, NodeConfig},
    typesystem::{ClassDef, ClassId, ClassRc, ClassRegistry, FieldDef, MethodDef, TypeDescriptor},
    Result,
};

/// How the generation engine writes a member's value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mutator {
    /// Assign the field directly
    Field {
        /// Field name
        name: String,
    },
    /// Call the setter matched with the field
    Setter {
        /// Field name
        field: String,
        /// Setter name
        method: String,
    },
    /// Call a setter that has no matching field
    UnmatchedSetter {
        /// Setter name
        method: String,
    },
}

/// A populatable member of a class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    /// Field name, or the method name for unmatched setters
    pub name: String,
    /// The declared type, in terms of the declaring class' type parameters
    pub declared_type: TypeDescriptor,
    /// The class declaring the member, which may be a superclass of the collected one
    pub declaring_class: ClassId,
    /// How the member is assigned
    pub mutator: Mutator,
}

impl Member {
    /// Create a member assigned through its field
    pub fn field(declaring_class: ClassId, field: &FieldDef) -> Self {
        Member {
            name: field.name.clone(),
            declared_type: field.declared_type.clone(),
            declaring_class,
            mutator: Mutator::Field {
                name: field.name.clone(),
            },
        }
    }

    /// Returns true if the member has no backing field
    #[must_use]
    pub fn is_unmatched_setter(&self) -> bool {
        matches!(self.mutator, Mutator::UnmatchedSetter { .. })
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mutator {
            Mutator::UnmatchedSetter { method } => write!(f, "{method}()"),
            _ => f.write_str(&self.name),
        }
    }
}

/// Returns the ordered, populatable members of a class.
///
/// Implementations must be deterministic: the same class always yields the same list.
pub trait MemberCollector: Send + Sync {
    /// Collect the members of `class`
    ///
    /// # Errors
    /// Returns an error if the class hierarchy references unknown classes.
    fn collect(&self, class: &ClassDef) -> Result<Vec<Member>>;
}

/// Collects the declared instance fields of a class and its superclasses, subclass first.
///
/// Interfaces, arrays, `Object` and the platform classes contribute nothing. With
/// [`AssignmentStyle::Method`] each non-final field is paired with the setter named by
/// the configured [`crate::model::SetterStyle`] taking exactly the field's type.
pub struct DeclaredAndInheritedMemberCollector {
    registry: Arc<ClassRegistry>,
    config: NodeConfig,
}

impl DeclaredAndInheritedMemberCollector {
    /// Create a new collector
    ///
    /// ## Arguments
    /// * 'registry' - The class registry used to follow superclasses
    /// * 'config'   - Assignment and setter settings
    pub fn new(registry: Arc<ClassRegistry>, config: NodeConfig) -> Self {
        DeclaredAndInheritedMemberCollector { registry, config }
    }

    fn should_collect_from(class: &ClassDef) -> bool {
        !class.is_interface() && !class.is_array() && !class.id.is_platform()
    }

    /// The class followed by its superclasses, as far as they contribute members
    fn hierarchy(&self, class: &ClassDef) -> Result<Vec<ClassRc>> {
        let mut chain: Vec<ClassRc> = Vec::new();
        let mut next = if Self::should_collect_from(class) {
            Some(self.registry.get_or_err(class.id)?)
        } else {
            None
        };

        while let Some(current) = next {
            if chain.iter().any(|seen| seen.id == current.id) {
                return Err(structural_error!(
                    "Class '{}' inherits from itself",
                    current.name
                ));
            }

            next = match current.superclass().and_then(TypeDescriptor::raw_class) {
                Some(superclass) => {
                    let superclass = self.registry.get_or_err(superclass)?;
                    Self::should_collect_from(&superclass).then_some(superclass)
                }
                None => None,
            };
            chain.push(current);
        }

        Ok(chain)
    }

    fn matching_setter<'a>(&self, class: &'a ClassDef, field: &FieldDef) -> Option<&'a MethodDef> {
        let name = self.config.setter_style.setter_name(&field.name);
        class
            .methods
            .iter()
            .map(|(_, method)| method)
            .find(|method| {
                !method.is_static() && method.name == name && method.parameter == field.declared_type
            })
    }
}

impl MemberCollector for DeclaredAndInheritedMemberCollector {
    fn collect(&self, class: &ClassDef) -> Result<Vec<Member>> {
        let hierarchy = self.hierarchy(class)?;
        let method_assignment = self.config.assignment == AssignmentStyle::Method;

        let mut members = Vec::new();
        let mut matched = FxHashSet::default();
        for current in &hierarchy {
            for (_, field) in current.fields.iter() {
                if field.is_static() {
                    continue;
                }

                let mut member = Member::field(current.id, field);
                if method_assignment && !field.is_final() {
                    if let Some(setter) = self.matching_setter(current, field) {
                        matched.insert((setter.name.clone(), setter.parameter.clone()));
                        member.mutator = Mutator::Setter {
                            field: field.name.clone(),
                            method: setter.name.clone(),
                        };
                    }
                }
                members.push(member);
            }
        }

        let prefix = self.config.setter_style.prefix();
        if let (true, false, Some(prefix)) = (
            method_assignment,
            self.config.ignore_unmatched_setters,
            prefix,
        ) {
            // Overridden setters are only collected from the most derived class
            let mut seen = matched;
            let mut unmatched = Vec::new();
            for current in &hierarchy {
                for (_, method) in current.methods.iter() {
                    if method.is_static() || !method.name.starts_with(prefix) {
                        continue;
                    }
                    if seen.insert((method.name.clone(), method.parameter.clone())) {
                        unmatched.push(Member {
                            name: method.name.clone(),
                            declared_type: method.parameter.clone(),
                            declaring_class: current.id,
                            mutator: Mutator::UnmatchedSetter {
                                method: method.name.clone(),
                            },
                        });
                    }
                }
            }

            unmatched.sort_by(|a, b| a.name.cmp(&b.name));
            members.extend(unmatched);
        }

        Ok(members)
    }
}
