//! Post-order lowering driver.
//!
//! Walks a typed tree bottom-up, rebuilding a node only when one of its
//! children changed, and hands every concatenation operator to
//! [`LowerSession::rewrite_concat`] once both of its operands are lowered.

use smallvec::SmallVec;

use sable_ir::{
    LowArena, LowExpr, LowId, LowNode, LowRange, SpecialMembers, StringInterner, Symbols,
};

use crate::{LowerOptions, LowerSession, LowerStats};

/// Result of lowering one tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LowerOutput {
    /// Root of the lowered tree. Equal to the input root if nothing changed.
    pub root: LowId,
    pub stats: LowerStats,
}

/// Lower the tree rooted at `root`, appending rewritten nodes to `arena`.
///
/// The input nodes are left in place; the returned root reaches only
/// lowered nodes. Runs [`validate`](crate::validate) afterwards when
/// `options.validate` is set.
pub fn lower(
    arena: &mut LowArena,
    symbols: &Symbols,
    members: &SpecialMembers,
    interner: &StringInterner,
    root: LowId,
    options: LowerOptions,
) -> LowerOutput {
    if !root.is_valid() {
        return LowerOutput {
            root,
            stats: LowerStats::default(),
        };
    }

    let nodes_before = arena.len();
    let mut session = LowerSession::new(arena, symbols, members, interner, options);
    let new_root = session.lower_expr(root);
    let stats = session.stats();

    tracing::debug!(
        concat_rewrites = stats.concat_rewrites,
        constant_folds = stats.constant_folds,
        eliminations = stats.operand_eliminations,
        fused_calls = stats.fused_calls,
        null_guards = stats.null_guards,
        new_nodes = arena.len() - nodes_before,
        "lowered expression tree"
    );

    if options.validate {
        crate::validate(arena, symbols, new_root);
    }

    LowerOutput {
        root: new_root,
        stats,
    }
}

impl LowerSession<'_> {
    /// Lower `id` and everything below it.
    pub fn lower_expr(&mut self, id: LowId) -> LowId {
        let node = self.arena.get(id);
        match node.kind {
            LowExpr::Literal
            | LowExpr::DefaultValue
            | LowExpr::Local(_)
            | LowExpr::ConditionalReceiver(_)
            | LowExpr::Error => id,

            LowExpr::Call {
                receiver,
                method,
                args,
            } => {
                let new_receiver = self.lower_optional(receiver);
                let new_args = self.lower_list(args);
                if new_receiver == receiver && new_args.is_none() {
                    return id;
                }
                self.rebuild(
                    node,
                    LowExpr::Call {
                        receiver: new_receiver,
                        method,
                        args: new_args.unwrap_or(args),
                    },
                )
            }

            LowExpr::NullCoalesce {
                left,
                right,
                left_conversion,
            } => {
                let new_left = self.lower_expr(left);
                let new_right = self.lower_expr(right);
                if new_left == left && new_right == right {
                    return id;
                }
                self.rebuild(
                    node,
                    LowExpr::NullCoalesce {
                        left: new_left,
                        right: new_right,
                        left_conversion,
                    },
                )
            }

            LowExpr::Conversion { operand, kind } => {
                let new_operand = self.lower_expr(operand);
                if new_operand == operand {
                    return id;
                }
                self.rebuild(
                    node,
                    LowExpr::Conversion {
                        operand: new_operand,
                        kind,
                    },
                )
            }

            LowExpr::ArrayCreation {
                element,
                size,
                initializer,
            } => {
                let new_size = self.lower_optional(size);
                let new_items = initializer.and_then(|items| self.lower_list(items));
                if new_size == size && new_items.is_none() {
                    return id;
                }
                self.rebuild(
                    node,
                    LowExpr::ArrayCreation {
                        element,
                        size: new_size,
                        initializer: new_items.or(initializer),
                    },
                )
            }

            LowExpr::PassByCopy(operand) => {
                let new_operand = self.lower_expr(operand);
                if new_operand == operand {
                    return id;
                }
                self.rebuild(node, LowExpr::PassByCopy(new_operand))
            }

            LowExpr::ConditionalAccess {
                receiver,
                when_not_null,
                id: access,
            } => {
                let new_receiver = self.lower_expr(receiver);
                let new_when_not_null = self.lower_expr(when_not_null);
                if new_receiver == receiver && new_when_not_null == when_not_null {
                    return id;
                }
                self.rebuild(
                    node,
                    LowExpr::ConditionalAccess {
                        receiver: new_receiver,
                        when_not_null: new_when_not_null,
                        id: access,
                    },
                )
            }

            LowExpr::Binary {
                op,
                method,
                left,
                right,
            } => {
                let new_left = self.lower_expr(left);
                let new_right = self.lower_expr(right);
                // An attached method means the operator was already lowered.
                if op.is_concat() && method.is_none() {
                    return self.rewrite_concat(node.span, op, new_left, new_right, node.ty);
                }
                if new_left == left && new_right == right {
                    return id;
                }
                self.rebuild(
                    node,
                    LowExpr::Binary {
                        op,
                        method,
                        left: new_left,
                        right: new_right,
                    },
                )
            }
        }
    }

    /// Lower an optional child, passing the sentinel through.
    fn lower_optional(&mut self, id: LowId) -> LowId {
        if id.is_valid() {
            self.lower_expr(id)
        } else {
            id
        }
    }

    /// Lower every expression in `range`. Returns the new range, or `None`
    /// if no element changed.
    fn lower_list(&mut self, range: LowRange) -> Option<LowRange> {
        let len = range.len();
        let mut lowered: SmallVec<[LowId; 8]> = SmallVec::with_capacity(len);
        let mut changed = false;
        for i in 0..len {
            // Re-borrow each step: lowering appends to the list storage.
            let item = self.arena.get_expr_list(range)[i];
            let new_item = self.lower_expr(item);
            changed |= new_item != item;
            lowered.push(new_item);
        }
        changed.then(|| self.arena.push_expr_list(&lowered))
    }

    /// Copy `node` with a new kind. Span, type and constant are kept.
    fn rebuild(&mut self, node: LowNode, kind: LowExpr) -> LowId {
        self.arena.push(LowNode { kind, ..node })
    }
}
