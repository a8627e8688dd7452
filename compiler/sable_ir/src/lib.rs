//! Sable IR - typed expression trees for the lowering passes.
//!
//! This crate contains the data the lowering passes consume and produce:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Type ids and the type/method registry ([`Symbols`])
//! - The enum-keyed special-member table ([`SpecialMembers`])
//! - The append-only typed expression arena ([`LowArena`])
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → TypeId(u32), Methods → MethodId(u32)
//! - **Flatten Everything**: No Box<LowExpr>, use LowId(u32) indices
//! - **Immutable Nodes**: the arena only grows; a rewrite builds new nodes and
//!   never edits existing ones, so sibling nodes may share children freely.

mod interner;
pub mod low;
mod name;
mod span;
pub mod special;
pub mod symbols;
mod type_id;

pub use interner::StringInterner;
pub use low::{
    BinaryOp, ConditionalAccessId, ConstValue, ConversionKind, LowArena, LowExpr, LowId, LowNode,
    LowRange,
};
pub use name::Name;
pub use span::Span;
pub use special::{JoinPrimitive, MissingSpecialMember, SpecialMember, SpecialMembers};
pub use symbols::{MethodId, MethodSig, SpecialType, Symbols, TypeKind, TypeParamConstraint};
pub use type_id::TypeId;
