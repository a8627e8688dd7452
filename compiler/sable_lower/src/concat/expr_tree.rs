//! Concatenation inside expression lambdas.
//!
//! Expression trees are consumed as data, so the operator has to survive as
//! a binary node. Only the implementing overload is attached; no folding,
//! flattening or normalization happens here.

use sable_ir::{BinaryOp, JoinPrimitive, LowId, Span, TypeId};

use crate::LowerSession;

impl LowerSession<'_> {
    pub(super) fn rewrite_concat_in_expression_lambda(
        &mut self,
        span: Span,
        op: BinaryOp,
        left: LowId,
        right: LowId,
        ty: TypeId,
    ) -> LowId {
        let primitive = match op {
            BinaryOp::StrConcat => JoinPrimitive::BinaryStr,
            BinaryOp::StrObjConcat | BinaryOp::ObjStrConcat => JoinPrimitive::BinaryObj,
            BinaryOp::IntAdd | BinaryOp::StrEq => {
                unreachable!("{op:?} is not a concatenation operator")
            }
        };
        let method = self.members.join_method(primitive);
        tracing::trace!(?op, ?primitive, "concatenation kept as binary node");
        self.binary(span, op, Some(method), left, right, ty)
    }
}
