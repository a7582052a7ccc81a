//! Read-only traversal of a finished node tree.
//!
//! - [`preorder`] - Iterative depth-first iterator, parents before children
//! - [`walk`] - Drives a [`NodeVisitor`], which may skip subtrees
//!
//! Both are iterative, so arbitrarily deep trees do not exhaust the stack.

use crate::model::NodeRc;

/// Callbacks for [`walk`]
pub trait NodeVisitor {
    /// Called before the children of `node`. Returning false skips them and the matching
    /// [`NodeVisitor::leave`] call.
    fn enter(&mut self, node: &NodeRc) -> bool;

    /// Called after all children of `node` have been visited
    fn leave(&mut self, _node: &NodeRc) {}
}

/// Depth-first pre-order iterator over a node tree.
///
/// Children are visited in their declared order. Cyclic nodes have no children, so
/// the iteration always terminates.
///
/// # Examples
///
/// ```rust
/// use blueprint::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Arc::new(ClassRegistry::new()?);
/// let string = registry.platform(PlatformKind::String);
/// let map = TypeDescriptor::parameterized(
///     registry.platform(PlatformKind::Map),
///     vec![string.into(), string.into()],
/// );
///
/// let context = RootContext::builder(registry.clone(), map).build()?;
/// let root = NodeGraphBuilder::new(Arc::new(context)).build_root()?;
///
/// let paths: Vec<String> = preorder(&root).map(|node| node.path()).collect();
/// assert_eq!(paths, vec!["Map", "Map<key>", "Map<value>"]);
/// # Ok::<(), blueprint::Error>(())
/// ```
pub struct PreorderIterator {
    stack: Vec<NodeRc>,
}

impl Iterator for PreorderIterator {
    type Item = NodeRc;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev().cloned());
        Some(node)
    }
}

/// Iterate over `root` and all its descendants, parents first
pub fn preorder(root: &NodeRc) -> PreorderIterator {
    PreorderIterator {
        stack: vec![root.clone()],
    }
}

/// Visit `root` and its descendants depth-first
pub fn walk(root: &NodeRc, visitor: &mut impl NodeVisitor) {
    enum Step {
        Enter(NodeRc),
        Leave(NodeRc),
    }

    let mut stack = vec![Step::Enter(root.clone())];
    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(node) => {
                if !visitor.enter(&node) {
                    continue;
                }
                let children = node.children().iter().rev().cloned().map(Step::Enter);
                stack.push(Step::Leave(node.clone()));
                stack.extend(children);
            }
            Step::Leave(node) => visitor.leave(&node),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        model::{NodeGraphBuilder, RootContext},
        test::fixtures,
    };

    fn person_tree() -> NodeRc {
        let f = fixtures();
        let context = RootContext::builder(f.registry.clone(), f.person.id.into())
            .build()
            .unwrap();
        NodeGraphBuilder::new(Arc::new(context))
            .build_root()
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Option<&'static str>,
    }

    impl NodeVisitor for Recorder {
        fn enter(&mut self, node: &NodeRc) -> bool {
            self.events.push(format!("+{}", node.path()));
            self.skip.map_or(true, |skip| !node.path().ends_with(skip))
        }

        fn leave(&mut self, node: &NodeRc) {
            self.events.push(format!("-{}", node.path()));
        }
    }

    #[test]
    fn test_preorder_visits_parents_first() {
        let root = person_tree();
        let paths: Vec<String> = preorder(&root).map(|n| n.path()).collect();

        assert_eq!(paths[0], "Person");
        let address = paths.iter().position(|p| p == "Person.address").unwrap();
        let street = paths
            .iter()
            .position(|p| p == "Person.address.street")
            .unwrap();
        assert!(address < street);
        assert!(paths.contains(&"Person.pets[*]".to_string()));
    }

    #[test]
    fn test_walk_matches_preorder() {
        let root = person_tree();
        let mut recorder = Recorder::default();
        walk(&root, &mut recorder);

        let entered: Vec<String> = recorder
            .events
            .iter()
            .filter_map(|e| e.strip_prefix('+').map(str::to_string))
            .collect();
        let expected: Vec<String> = preorder(&root).map(|n| n.path()).collect();
        assert_eq!(entered, expected);
        assert_eq!(recorder.events.first().unwrap(), "+Person");
        assert_eq!(recorder.events.last().unwrap(), "-Person");
    }

    #[test]
    fn test_walk_skips_subtree() {
        let root = person_tree();
        let mut recorder = Recorder {
            skip: Some(".address"),
            ..Recorder::default()
        };
        walk(&root, &mut recorder);

        assert!(recorder.events.contains(&"+Person.address".to_string()));
        assert!(!recorder.events.contains(&"-Person.address".to_string()));
        assert!(!recorder
            .events
            .iter()
            .any(|e| e.starts_with("+Person.address.")));
    }
}
