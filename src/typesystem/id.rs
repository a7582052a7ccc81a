use std::fmt;
use std::hash::{Hash, Hasher};

/// First id handed out to user-registered classes. Everything below is reserved
/// for platform classes and synthesized array classes.
pub const USER_CLASS_ID_START: u32 = 0x0100_0000;

/// Range reserved for array classes created on demand by the registry.
pub const ARRAY_CLASS_ID_START: u32 = 0x00F0_0000;

/// An identifier for a class registered in a [`crate::typesystem::ClassRegistry`].
///
/// Ids are artificial: the high byte tells which range the class was allocated
/// from (platform, synthesized array or user), the low 24 bits are a running index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Creates a new id from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        ClassId(value)
    }

    /// Returns the raw id value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the range marker from the id (high byte)
    #[must_use]
    pub fn range(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the running index from the id (low 24 bits)
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this id belongs to a pre-registered platform class
    #[must_use]
    pub fn is_platform(&self) -> bool {
        self.0 != 0 && self.0 < ARRAY_CLASS_ID_START
    }

    /// Returns true if this id belongs to a synthesized array class
    #[must_use]
    pub fn is_array(&self) -> bool {
        (ARRAY_CLASS_ID_START..USER_CLASS_ID_START).contains(&self.0)
    }

    /// Returns true if this is a null id (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for ClassId {
    fn from(value: u32) -> Self {
        ClassId(value)
    }
}

impl From<ClassId> for u32 {
    fn from(id: ClassId) -> Self {
        id.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClassId(0x{:08x}, range: 0x{:02x}, index: {})",
            self.0,
            self.range(),
            self.index()
        )
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
