//! # blueprint Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the blueprint library. Import this module to get quick access to the essential
//! types for declaring classes and building node graphs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all blueprint operations
pub use crate::Error;

/// The result type used throughout blueprint
pub use crate::Result;

// ================================================================================================
// Type System
// ================================================================================================

/// Class model and registry
pub use crate::typesystem::{
    ClassBuilder, ClassDef, ClassFlags, ClassFlavor, ClassId, ClassRc, ClassRegistry, FieldDef,
    MemberFlags, MethodDef, PlatformKind,
};

/// Declared type shapes and their resolution
pub use crate::typesystem::{BindingResolver, Bindings, TypeDescriptor, TypeVar};

// ================================================================================================
// Node Graph
// ================================================================================================

/// Build configuration
pub use crate::model::{AssignmentStyle, NodeConfig, SetterStyle};

/// Root type arguments and overrides
pub use crate::model::{GeneratorId, RootContext, RootContextBuilder};

/// Member discovery and leaf classification
pub use crate::model::{
    DeclaredAndInheritedMemberCollector, LeafClassifier, Member, MemberCollector, Mutator,
    PlatformLeafClassifier,
};

/// The node tree
pub use crate::model::{Node, NodeGraphBuilder, NodeKind, NodeRc, NodeRef};

/// Traversal
pub use crate::model::{preorder, walk, NodeVisitor};
