//! ID and range newtypes for the lowered IR.

use std::fmt;

/// Index into a [`LowArena`](super::LowArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct LowId(u32);

impl LowId {
    /// Sentinel value indicating "no expression" (e.g. the receiver of a static call).
    pub const INVALID: LowId = LowId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for LowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "LowId::INVALID")
        } else {
            write!(f, "LowId({})", self.0)
        }
    }
}

impl Default for LowId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A contiguous range of expression IDs in a [`LowArena`](super::LowArena).
///
/// Used for call arguments and array initializers.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct LowRange {
    pub start: u32,
    pub len: u32,
}

impl LowRange {
    pub const EMPTY: Self = Self { start: 0, len: 0 };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl fmt::Debug for LowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LowRange({}..{})", self.start, self.start + self.len)
    }
}

/// Correlates a conditional-access guard with the receiver placeholder
/// inside its `when_not_null` branch.
///
/// Ids are handed out by the lowering session, never by global state.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ConditionalAccessId(u32);

impl ConditionalAccessId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ConditionalAccessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConditionalAccessId({})", self.0)
    }
}
