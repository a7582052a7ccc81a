use crate::typesystem::{ClassDef, PlatformKind};

/// Decides which classes are generated as a whole and never expanded into members.
pub trait LeafClassifier: Send + Sync {
    /// Returns true if nodes of `class` never get children
    fn is_opaque(&self, class: &ClassDef) -> bool;
}

/// Treats primitives, enums, classes flagged opaque and every platform class except the
/// containers and `Object` as leaves.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformLeafClassifier;

impl LeafClassifier for PlatformLeafClassifier {
    fn is_opaque(&self, class: &ClassDef) -> bool {
        if class.is_primitive() || class.is_enum() || class.is_opaque() {
            return true;
        }

        match PlatformKind::from_id(class.id) {
            Some(kind) => !kind.is_container() && kind != PlatformKind::Object,
            None => false,
        }
    }
}
