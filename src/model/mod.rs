//! The node graph.
//!
//! This module turns a root type into the tree of [`Node`]s a value generation engine
//! walks. Building happens in two steps:
//!
//! 1. A [`RootContext`] is assembled through [`RootContext::builder`]. It validates the
//!    root's type arguments and collects per-member and per-class overrides: ignored
//!    members, nullable members, generators and subtype substitutions.
//! 2. A [`NodeGraphBuilder`] expands the root type into nodes, resolving every type
//!    variable on the way and stopping at cycles.
//!
//! Member discovery and leaf classification are pluggable through [`MemberCollector`]
//! and [`LeafClassifier`]; the defaults cover field-based models and the platform
//! classes of [`crate::typesystem::PlatformKind`].
//!
//! # Key Components
//!
//! - [`NodeConfig`] - Depth limit and member assignment settings
//! - [`RootContext`] - Root bindings and overrides of a single build
//! - [`NodeGraphBuilder`] - Creates the node tree
//! - [`Node`] - A class, collection, map or array to be populated
//! - [`walk`] / [`preorder`] - Read-only traversal of a finished tree
//!
//! # Thread Safety
//!
//! A finished tree is immutable. [`Node`] is `Send + Sync` and can be shared across
//! threads through [`NodeRc`].

mod classifier;
mod collector;
mod config;
mod context;
mod factory;
mod node;
mod visit;

pub use classifier::{LeafClassifier, PlatformLeafClassifier};
pub use collector::{DeclaredAndInheritedMemberCollector, Member, MemberCollector, Mutator};
pub use config::{AssignmentStyle, NodeConfig, SetterStyle};
pub use context::{GeneratorId, RootContext, RootContextBuilder};
pub use factory::NodeGraphBuilder;
pub use node::{Node, NodeKind, NodeRc, NodeRef};
pub use visit::{preorder, walk, NodeVisitor, PreorderIterator};
