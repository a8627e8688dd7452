//! Type identifiers.
//!
//! A `TypeId` indexes the type table of a [`Symbols`](crate::Symbols)
//! registry. The core types are registered first, in a fixed order, so
//! their ids are compile-time constants.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Type identifier, an index into [`Symbols`](crate::Symbols).
///
/// # Pre-registered Types
/// `object`, `str`, `char`, `int`, `bool`, `float`, the error type and the
/// two array types used by the array-form join primitives (`str[]`,
/// `object[]`). User types start at [`TypeId::FIRST_USER`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const OBJECT: TypeId = TypeId(0);
    pub const STR: TypeId = TypeId(1);
    pub const CHAR: TypeId = TypeId(2);
    pub const INT: TypeId = TypeId(3);
    pub const BOOL: TypeId = TypeId(4);
    pub const FLOAT: TypeId = TypeId(5);
    pub const ERROR: TypeId = TypeId(6);
    pub const STR_ARRAY: TypeId = TypeId(7);
    pub const OBJECT_ARRAY: TypeId = TypeId(8);

    /// First ID handed out for user-declared types.
    pub const FIRST_USER: u32 = 9;

    #[inline]
    pub const fn new(index: u32) -> Self {
        TypeId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Exactly `str`; the join primitive selection compares on this.
    #[inline]
    pub const fn is_str(self) -> bool {
        self.0 == Self::STR.0
    }

    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 == Self::ERROR.0
    }
}

impl Hash for TypeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OBJECT => write!(f, "TypeId::OBJECT"),
            Self::STR => write!(f, "TypeId::STR"),
            Self::CHAR => write!(f, "TypeId::CHAR"),
            Self::INT => write!(f, "TypeId::INT"),
            Self::BOOL => write!(f, "TypeId::BOOL"),
            Self::FLOAT => write!(f, "TypeId::FLOAT"),
            Self::ERROR => write!(f, "TypeId::ERROR"),
            Self::STR_ARRAY => write!(f, "TypeId::STR_ARRAY"),
            Self::OBJECT_ARRAY => write!(f, "TypeId::OBJECT_ARRAY"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}
