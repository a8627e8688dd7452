//! Lowered expression IR: typed, bound and ready for code generation.
//!
//! The front-end hands the lowering passes a tree of [`LowExpr`] nodes that
//! has already passed type checking and overload resolution. Passes rewrite
//! it by appending new nodes to the same [`LowArena`]; existing nodes are
//! never edited, so a rewritten tree may share untouched subtrees with the
//! original.
//!
//! # Node Shapes
//!
//! `LowExpr` is a closed sum type. Passes match it exhaustively; shapes a
//! pass does not recognise are treated as opaque leaves.

mod arena;
mod expr;
mod ids;

pub use arena::*;
pub use expr::*;
pub use ids::*;
