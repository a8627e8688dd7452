//! Constant folding and null/empty elimination for operand pairs.

use sable_ir::{ConstValue, JoinPrimitive, LowExpr, LowId, Span, StringInterner};

use crate::LowerSession;

/// Longest string a folded constant may produce.
const MAX_CONST_STR_LEN: usize = 0x7FFF_FFFF;

/// Length of `left ++ right`, or `None` if it would exceed the runtime's
/// signed 32-bit string length.
#[inline]
pub fn checked_concat_len(left: usize, right: usize) -> Option<usize> {
    left.checked_add(right).filter(|&len| len <= MAX_CONST_STR_LEN)
}

/// Length of a folded constant. A default operand adds nothing, so the
/// ceiling is not applied.
pub(super) fn folded_len(left: usize, right: usize, has_default: bool) -> Option<usize> {
    if has_default {
        return left.checked_add(right);
    }
    checked_concat_len(left, right)
}

/// Concatenate two constants, treating null and default as `""`.
///
/// Returns `None` for constants without a string value or when the result
/// would be too long.
fn fold_constants(
    left: ConstValue,
    right: ConstValue,
    interner: &StringInterner,
) -> Option<String> {
    let left_text = left.string_value(interner)?;
    let right_text = right.string_value(interner)?;

    let len = folded_len(
        left_text.len(),
        right_text.len(),
        left.is_default() || right.is_default(),
    )?;

    let mut out = String::with_capacity(len);
    out.push_str(left_text);
    out.push_str(right_text);
    Some(out)
}

impl LowerSession<'_> {
    /// Fold a pair of normalized operands into one expression, if possible.
    ///
    /// - two foldable constants become one literal
    /// - two null-or-empty operands become `""`
    /// - one null-or-empty operand leaves the other, made non-null
    pub(crate) fn try_fold_two(&mut self, span: Span, left: LowId, right: LowId) -> Option<LowId> {
        if let (Some(left_const), Some(right_const)) =
            (self.arena.constant(left), self.arena.constant(right))
        {
            if let Some(text) = fold_constants(left_const, right_const, self.interner) {
                self.stats.constant_folds += 1;
                return Some(self.string_literal(span, &text));
            }
        }

        if self.is_null_or_empty_constant(left) {
            self.stats.operand_eliminations += 1;
            if self.is_null_or_empty_constant(right) {
                return Some(self.empty_string(span));
            }
            return Some(self.rewrite_single_operand(span, right));
        }

        if self.is_null_or_empty_constant(right) {
            self.stats.operand_eliminations += 1;
            return Some(self.rewrite_single_operand(span, left));
        }

        None
    }

    /// A constant that contributes nothing to a concatenation.
    pub(crate) fn is_null_or_empty_constant(&self, id: LowId) -> bool {
        self.arena
            .constant(id)
            .is_some_and(ConstValue::is_null_or_empty_str)
            || *self.arena.kind(id) == LowExpr::DefaultValue
    }

    /// The concatenation of `operand` with nothing: `operand` as a non-null
    /// `str`.
    ///
    /// Joins that cannot return null are already safe. Other strings get
    /// `?? ""`; anything else is stringified through the unary join first.
    pub(crate) fn rewrite_single_operand(&mut self, span: Span, operand: LowId) -> LowId {
        if self.arena.ty(operand).is_str() {
            if self
                .classify_concat(operand)
                .is_some_and(|record| !record.can_return_null)
            {
                return operand;
            }
            let empty = self.empty_string(span);
            return self.coalesce(span, operand, empty);
        }

        let concat_object = self.members.join_method(JoinPrimitive::Unary);
        let stringified = self.call_static(span, concat_object, &[operand]);
        let empty = self.empty_string(span);
        self.coalesce(span, stringified, empty)
    }
}
