// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # blueprint
//!
//! Builds the blueprint of a value before it is generated: an immutable tree of nodes
//! describing every class, collection, map and array reachable from a root type, with
//! all generic type parameters resolved to concrete types.
//!
//! A value generation engine consumes the tree. It only asks each node what class it is,
//! what its children are and whether it is a leaf, a cycle, a collection, a map or an
//! array; it never has to deal with type variables, wildcards or inheritance again.
//!
//! ## Features
//!
//! - **Structural type model** - Classes, type parameters and generic supertypes are
//!   declared through [`typesystem::ClassBuilder`] in a concurrent [`typesystem::ClassRegistry`]
//! - **Generic resolution** - Type variables resolve through the node, its ancestors and
//!   the root's type arguments, including inherited members and container elements
//! - **Cycle detection** - Self-referential models terminate with cyclic leaf nodes, while
//!   the same type in independent branches is expanded in full
//! - **Overrides** - Ignored and nullable members, generators and subtype substitution,
//!   all validated before the tree is built
//! - **Thread-safe results** - Finished trees are immutable and `Send + Sync`
//!
//! ## Quick Start
//!
//! ```rust
//! use blueprint::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(ClassRegistry::new()?);
//! let string = registry.platform(PlatformKind::String);
//! let list = registry.platform(PlatformKind::List);
//!
//! // class Box<T> { T value; List<T> items; }
//! let boxed = ClassBuilder::new(registry.clone(), "demo", "Box").type_param("T");
//! let t = boxed.var("T");
//! let boxed = boxed
//!     .field("value", t.clone())
//!     .field("items", TypeDescriptor::parameterized(list, vec![t]))
//!     .build()?;
//!
//! // Box<String>
//! let context = RootContext::builder(registry.clone(), boxed.id.into())
//!     .with_type_arguments(vec![string.into()])?
//!     .build()?;
//! let root = NodeGraphBuilder::new(Arc::new(context)).build_root()?;
//!
//! let items = &root.children()[1];
//! assert_eq!(items.kind(), NodeKind::Collection);
//! assert_eq!(items.element().unwrap().resolved_class().id, string);
//! # Ok::<(), blueprint::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`typesystem`] - Class model, type descriptors, registry and binding resolution
//! - [`model`] - Root context, member collection and the node graph itself
//! - [`prelude`] - Glob import of the commonly used types
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: node creation and
//! binding details at `trace`, subtype substitutions, raw container defaults and depth
//! truncation at `debug`. No logger is installed by the library.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result`]. Usage errors are reported while the
//! [`model::RootContext`] is assembled; resolution and structural errors abort the build
//! of the tree and name the member chain leading to the offending type.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use blueprint::prelude::*;
///
/// let registry = ClassRegistry::new()?;
/// assert!(registry.get_by_fullname("core.String").is_some());
/// # Ok::<(), blueprint::Error>(())
/// ```
pub mod prelude;

/// The class model standing in for runtime reflection.
///
/// Contains [`typesystem::ClassRegistry`] with the pre-registered platform classes,
/// [`typesystem::ClassBuilder`] for declaring classes, [`typesystem::TypeDescriptor`]
/// for declared type shapes and [`typesystem::BindingResolver`] for turning shapes into
/// type parameter bindings.
pub mod typesystem;

/// Root context and node graph construction.
///
/// See [`model::RootContext`] and [`model::NodeGraphBuilder`].
pub mod model;

/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `blueprint` Error type
///
/// # Examples
///
/// ```rust
/// use blueprint::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ClassRegistry::new()?);
/// let map = registry.platform(PlatformKind::Map);
///
/// match RootContext::builder(registry.clone(), map.into()).build() {
///     Err(Error::Usage(message)) => assert!(message.contains("has 2 type parameters")),
///     other => panic!("unexpected {:?}", other.map(|_| ())),
/// }
/// # Ok::<(), blueprint::Error>(())
/// ```
pub use error::Error;
