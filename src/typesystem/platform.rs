//! Well-known platform classes.
//!
//! Every [`crate::typesystem::ClassRegistry`] starts out with these classes
//! registered under reserved ids, so member declarations can refer to `String`,
//! `List<E>` or `Map<K, V>` without declaring them first. The container classes
//! come with their generic supertypes, which is what lets the node builder find
//! the element type of `ArrayList<String>` through `Collection<E>`.

use strum::{EnumCount, EnumIter};

use crate::typesystem::{ClassFlags, ClassFlavor, ClassId};

/// Namespace of the language-level classes
pub const CORE_NAMESPACE: &str = "core";
/// Namespace of the container classes
pub const COLLECTIONS_NAMESPACE: &str = "core.collections";

/// All pre-registered platform classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum PlatformKind {
    /// Root of every class hierarchy
    Object,
    /// `boolean`
    Bool,
    /// `char`
    Char,
    /// `byte`
    I8,
    /// `short`
    I16,
    /// `int`
    I32,
    /// `long`
    I64,
    /// `float`
    F32,
    /// `double`
    F64,
    /// Immutable text
    String,
    /// Boxed `boolean`
    Boolean,
    /// Boxed `char`
    Character,
    /// Boxed `byte`
    Byte,
    /// Boxed `short`
    Short,
    /// Boxed `int`
    Integer,
    /// Boxed `long`
    Long,
    /// Boxed `float`
    Float,
    /// Boxed `double`
    Double,
    /// Arbitrary precision decimal
    BigDecimal,
    /// 128-bit identifier
    Uuid,
    /// Calendar date without time zone
    LocalDate,
    /// `Collection<E>`
    Collection,
    /// `List<E> extends Collection<E>`
    List,
    /// `Set<E> extends Collection<E>`
    Set,
    /// `ArrayList<E> implements List<E>`
    ArrayList,
    /// `HashSet<E> implements Set<E>`
    HashSet,
    /// `Map<K, V>`
    Map,
    /// `HashMap<K, V> implements Map<K, V>`
    HashMap,
    /// `TreeMap<K, V> implements Map<K, V>`
    TreeMap,
}

impl PlatformKind {
    /// Get the reserved id for this class
    #[must_use]
    pub fn id(&self) -> ClassId {
        ClassId::new(match self {
            PlatformKind::Object => 0x0000_0001,
            PlatformKind::Bool => 0x0000_0002,
            PlatformKind::Char => 0x0000_0003,
            PlatformKind::I8 => 0x0000_0004,
            PlatformKind::I16 => 0x0000_0005,
            PlatformKind::I32 => 0x0000_0006,
            PlatformKind::I64 => 0x0000_0007,
            PlatformKind::F32 => 0x0000_0008,
            PlatformKind::F64 => 0x0000_0009,
            PlatformKind::String => 0x0000_000A,
            PlatformKind::Boolean => 0x0000_000B,
            PlatformKind::Character => 0x0000_000C,
            PlatformKind::Byte => 0x0000_000D,
            PlatformKind::Short => 0x0000_000E,
            PlatformKind::Integer => 0x0000_000F,
            PlatformKind::Long => 0x0000_0010,
            PlatformKind::Float => 0x0000_0011,
            PlatformKind::Double => 0x0000_0012,
            PlatformKind::BigDecimal => 0x0000_0013,
            PlatformKind::Uuid => 0x0000_0014,
            PlatformKind::LocalDate => 0x0000_0015,
            PlatformKind::Collection => 0x0000_0020,
            PlatformKind::List => 0x0000_0021,
            PlatformKind::Set => 0x0000_0022,
            PlatformKind::ArrayList => 0x0000_0023,
            PlatformKind::HashSet => 0x0000_0024,
            PlatformKind::Map => 0x0000_0025,
            PlatformKind::HashMap => 0x0000_0026,
            PlatformKind::TreeMap => 0x0000_0027,
        })
    }

    /// Map a reserved id back to its platform class
    #[must_use]
    pub fn from_id(id: ClassId) -> Option<PlatformKind> {
        use strum::IntoEnumIterator;

        PlatformKind::iter().find(|kind| kind.id() == id)
    }

    /// The simple name of this class
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PlatformKind::Object => "Object",
            PlatformKind::Bool => "boolean",
            PlatformKind::Char => "char",
            PlatformKind::I8 => "byte",
            PlatformKind::I16 => "short",
            PlatformKind::I32 => "int",
            PlatformKind::I64 => "long",
            PlatformKind::F32 => "float",
            PlatformKind::F64 => "double",
            PlatformKind::String => "String",
            PlatformKind::Boolean => "Boolean",
            PlatformKind::Character => "Character",
            PlatformKind::Byte => "Byte",
            PlatformKind::Short => "Short",
            PlatformKind::Integer => "Integer",
            PlatformKind::Long => "Long",
            PlatformKind::Float => "Float",
            PlatformKind::Double => "Double",
            PlatformKind::BigDecimal => "BigDecimal",
            PlatformKind::Uuid => "UUID",
            PlatformKind::LocalDate => "LocalDate",
            PlatformKind::Collection => "Collection",
            PlatformKind::List => "List",
            PlatformKind::Set => "Set",
            PlatformKind::ArrayList => "ArrayList",
            PlatformKind::HashSet => "HashSet",
            PlatformKind::Map => "Map",
            PlatformKind::HashMap => "HashMap",
            PlatformKind::TreeMap => "TreeMap",
        }
    }

    /// The namespace of this class
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        if self.is_container() {
            COLLECTIONS_NAMESPACE
        } else {
            CORE_NAMESPACE
        }
    }

    /// Returns true for the collection and map classes
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            PlatformKind::Collection
                | PlatformKind::List
                | PlatformKind::Set
                | PlatformKind::ArrayList
                | PlatformKind::HashSet
                | PlatformKind::Map
                | PlatformKind::HashMap
                | PlatformKind::TreeMap
        )
    }

    /// Returns true for the unboxed primitives
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            PlatformKind::Bool
                | PlatformKind::Char
                | PlatformKind::I8
                | PlatformKind::I16
                | PlatformKind::I32
                | PlatformKind::I64
                | PlatformKind::F32
                | PlatformKind::F64
        )
    }

    /// The flavor this class is registered with
    #[must_use]
    pub fn flavor(&self) -> ClassFlavor {
        match self {
            PlatformKind::Collection | PlatformKind::List | PlatformKind::Set | PlatformKind::Map => {
                ClassFlavor::Interface
            }
            kind if kind.is_primitive() => ClassFlavor::Primitive,
            _ => ClassFlavor::Class,
        }
    }

    /// The modifier flags this class is registered with.
    ///
    /// Everything but `Object` and the containers is a final, opaque value type.
    #[must_use]
    pub fn flags(&self) -> ClassFlags {
        match self {
            PlatformKind::Collection | PlatformKind::List | PlatformKind::Set | PlatformKind::Map => {
                ClassFlags::ABSTRACT | ClassFlags::INTERFACE
            }
            PlatformKind::Object => ClassFlags::empty(),
            kind if kind.is_container() => ClassFlags::empty(),
            _ => ClassFlags::FINAL | ClassFlags::OPAQUE,
        }
    }

    /// The declared type parameter names, in order
    #[must_use]
    pub fn type_params(&self) -> &'static [&'static str] {
        match self {
            PlatformKind::Collection
            | PlatformKind::List
            | PlatformKind::Set
            | PlatformKind::ArrayList
            | PlatformKind::HashSet => &["E"],
            PlatformKind::Map | PlatformKind::HashMap | PlatformKind::TreeMap => &["K", "V"],
            _ => &[],
        }
    }

    /// The interface this class directly implements or extends, with its
    /// type arguments forwarded by name
    #[must_use]
    pub fn direct_interface(&self) -> Option<PlatformKind> {
        match self {
            PlatformKind::List | PlatformKind::Set => Some(PlatformKind::Collection),
            PlatformKind::ArrayList => Some(PlatformKind::List),
            PlatformKind::HashSet => Some(PlatformKind::Set),
            PlatformKind::HashMap | PlatformKind::TreeMap => Some(PlatformKind::Map),
            _ => None,
        }
    }
}
