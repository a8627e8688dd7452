//! String concatenation rewriting.
//!
//! Each `a + b` over strings is rewritten bottom-up. Because children are
//! lowered first, a nested `((a + b) + c) + d` reaches the rewriter as
//! `join(a, b) + c` and is widened into one call instead of a chain:
//!
//! ```text
//! "abc" + "def" + expr1 + "moo" + "baz"
//!   => str.concat("abcdef", expr1?.to_str(), "moobaz")
//! ```
//!
//! The steps are:
//!
//! 1. normalize both operands to `str` (`normalize`)
//! 2. try to fold the pair outright (`fold`)
//! 3. flatten each side into its operand list (`flatten`)
//! 4. fold across the boundary between the two lists
//! 5. emit the smallest join overload for what remains (`fuse`)
//!
//! Expression lambdas take a separate path (`expr_tree`).

mod expr_tree;
mod flatten;
mod fold;
mod fuse;
mod normalize;

use sable_ir::{BinaryOp, ConstValue, LowId, Span, TypeId};

use crate::LowerSession;

pub use flatten::{OperandBuffer, OperandRecord};
pub use fold::checked_concat_len;
pub use fuse::select_primitive;

impl LowerSession<'_> {
    /// Rewrite the concatenation `left op right` whose result type is `ty`.
    ///
    /// `left` and `right` must already be lowered. The returned node is
    /// never a concatenation operator unless the session is lowering an
    /// expression lambda.
    ///
    /// # Panics
    ///
    /// Panics if `op` is not a concatenation operator.
    pub fn rewrite_concat(
        &mut self,
        span: Span,
        op: BinaryOp,
        left: LowId,
        right: LowId,
        ty: TypeId,
    ) -> LowId {
        assert!(
            op.is_concat(),
            "rewrite_concat reached with non-concatenation operator {op:?}"
        );
        self.stats.concat_rewrites += 1;

        if self.options.in_expression_lambda {
            return self.rewrite_concat_in_expression_lambda(span, op, left, right, ty);
        }

        let left = self.normalize_operand(span, left);
        let right = self.normalize_operand(span, right);
        debug_assert!(self.is_concat_operand(left), "left operand not normalized");
        debug_assert!(self.is_concat_operand(right), "right operand not normalized");

        if let Some(folded) = self.try_fold_two(span, left, right) {
            tracing::trace!(?folded, "concatenation folded to one operand");
            return folded;
        }

        let mut operands = self.flatten(left);
        let mut tail = self.flatten(right);

        let boundary = operands.last().copied().zip(tail.first().copied());
        if let Some((last, first)) = boundary {
            if let Some(folded) = self.try_fold_two(span, last, first) {
                operands.pop();
                tail[0] = folded;
            }
        }
        operands.extend_from_slice(&tail);

        let result = match operands.len() {
            0 => self.empty_string(span),
            1 => operands[0],
            _ => self.fuse_operands(span, &operands),
        };
        tracing::trace!(operands = operands.len(), ?result, "concatenation rewritten");
        result
    }

    /// Whether `id` may appear as an operand after normalization: a `str`
    /// expression, a null literal, or an error-typed expression.
    pub(crate) fn is_concat_operand(&self, id: LowId) -> bool {
        let ty = self.arena.ty(id);
        ty.is_str() || ty.is_error() || self.arena.constant(id) == Some(ConstValue::Null)
    }
}
