//! Append-only arena for lowered expressions.
//!
//! [`LowArena`] uses struct-of-arrays layout (parallel `kinds`, `spans`,
//! `types`, `constants` arrays indexed by [`LowId`]). Nodes are immutable
//! once pushed: rewrites allocate replacements and leave the originals in
//! place, unreachable from the new root.

use crate::{Span, TypeId};

use super::expr::{ConstValue, LowExpr, LowNode};
use super::ids::{LowId, LowRange};

#[inline]
fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what}: {len} exceeds u32::MAX"))
}

/// Arena for lowered expressions.
///
/// # Index Spaces
///
/// - `kinds`/`spans`/`types`/`constants`: parallel arrays indexed by [`LowId`]
/// - `expr_lists`: flat `Vec<LowId>` indexed by [`LowRange`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LowArena {
    kinds: Vec<LowExpr>,
    spans: Vec<Span>,
    types: Vec<TypeId>,
    /// Compile-time values, `None` for runtime expressions.
    constants: Vec<Option<ConstValue>>,
    /// Flattened expression ID lists (call arguments, array initializers).
    expr_lists: Vec<LowId>,
}

impl LowArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID.
    pub fn push(&mut self, node: LowNode) -> LowId {
        let id = LowId::new(to_u32(self.kinds.len(), "lowered expressions"));
        self.kinds.push(node.kind);
        self.spans.push(node.span);
        self.types.push(node.ty);
        self.constants.push(node.constant);
        id
    }

    #[inline]
    pub fn kind(&self, id: LowId) -> &LowExpr {
        &self.kinds[id.index()]
    }

    #[inline]
    pub fn span(&self, id: LowId) -> Span {
        self.spans[id.index()]
    }

    #[inline]
    pub fn ty(&self, id: LowId) -> TypeId {
        self.types[id.index()]
    }

    #[inline]
    pub fn constant(&self, id: LowId) -> Option<ConstValue> {
        self.constants[id.index()]
    }

    /// Reconstruct a full `LowNode` from the parallel arrays.
    pub fn get(&self, id: LowId) -> LowNode {
        let i = id.index();
        LowNode {
            kind: self.kinds[i],
            span: self.spans[i],
            ty: self.types[i],
            constant: self.constants[i],
        }
    }

    /// Number of allocated nodes.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Highest conditional-access id used by any node, or 0 if none is.
    pub fn max_conditional_access(&self) -> u32 {
        self.kinds
            .iter()
            .filter_map(|kind| match *kind {
                LowExpr::ConditionalAccess { id, .. } | LowExpr::ConditionalReceiver(id) => {
                    Some(id.raw())
                }
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Whether `id` refers to an allocated node.
    #[inline]
    pub fn contains(&self, id: LowId) -> bool {
        id.is_valid() && id.index() < self.kinds.len()
    }

    /// Whether `range` lies inside the list storage.
    #[inline]
    pub fn contains_range(&self, range: LowRange) -> bool {
        range.start as usize + range.len() <= self.expr_lists.len()
    }

    /// Allocate a contiguous range of expression IDs.
    pub fn push_expr_list(&mut self, ids: &[LowId]) -> LowRange {
        if ids.is_empty() {
            return LowRange::EMPTY;
        }
        let start = to_u32(self.expr_lists.len(), "expression list entries");
        self.expr_lists.extend_from_slice(ids);
        LowRange::new(start, to_u32(ids.len(), "expression list entries"))
    }

    /// Get expression IDs from a range.
    pub fn get_expr_list(&self, range: LowRange) -> &[LowId] {
        if range.is_empty() {
            return &[];
        }
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Call `f` on every direct child of `id`, in evaluation order.
    ///
    /// Sentinel children (static receivers, missing array sizes) are skipped.
    pub fn for_each_child(&self, id: LowId, mut f: impl FnMut(LowId)) {
        let mut visit = |child: LowId| {
            if child.is_valid() {
                f(child);
            }
        };

        match *self.kind(id) {
            LowExpr::Literal
            | LowExpr::DefaultValue
            | LowExpr::Local(_)
            | LowExpr::ConditionalReceiver(_)
            | LowExpr::Error => {}
            LowExpr::Call { receiver, args, .. } => {
                visit(receiver);
                for &arg in self.get_expr_list(args) {
                    visit(arg);
                }
            }
            LowExpr::NullCoalesce { left, right, .. } | LowExpr::Binary { left, right, .. } => {
                visit(left);
                visit(right);
            }
            LowExpr::Conversion { operand, .. } | LowExpr::PassByCopy(operand) => visit(operand),
            LowExpr::ArrayCreation {
                size, initializer, ..
            } => {
                visit(size);
                if let Some(items) = initializer {
                    for &item in self.get_expr_list(items) {
                        visit(item);
                    }
                }
            }
            LowExpr::ConditionalAccess {
                receiver,
                when_not_null,
                ..
            } => {
                visit(receiver);
                visit(when_not_null);
            }
        }
    }

    /// Every node reachable from `root`, in pre-order.
    pub fn reachable(&self, root: LowId) -> Vec<LowId> {
        let mut out = Vec::new();
        if !root.is_valid() {
            return out;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            out.push(id);
            let start = stack.len();
            self.for_each_child(id, |child| stack.push(child));
            // Children were pushed in order; reverse so the first pops first.
            stack[start..].reverse();
        }
        out
    }
}
