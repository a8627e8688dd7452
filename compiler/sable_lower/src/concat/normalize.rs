//! Operand normalization: turn any concatenation operand into a `str`.

use sable_ir::{
    ConstValue, ConversionKind, LowExpr, LowId, MethodId, SpecialMember, Span, TypeId,
};

use crate::LowerSession;

impl LowerSession<'_> {
    /// Rewrite `operand` so it produces a `str` (or stays a null literal).
    ///
    /// Rules, first match wins:
    ///
    /// - a boxing conversion is dropped and its operand normalized instead
    /// - a `char` literal becomes a one-character string literal
    /// - null literals and `str` operands pass through
    /// - special value types with their own `to_str` get a direct call
    /// - other value types get a direct call to the root `to_str`, behind a
    ///   copy when the call could mutate the operand's storage
    /// - everything else gets `operand?.to_str()`
    ///
    /// Error-typed operands are returned untouched.
    pub(crate) fn normalize_operand(&mut self, span: Span, operand: LowId) -> LowId {
        let mut expr = operand;
        if let LowExpr::Conversion {
            operand: inner,
            kind: ConversionKind::Boxing,
        } = *self.arena.kind(expr)
        {
            expr = inner;
        }

        let expr_span = self.arena.span(expr);
        if *self.arena.kind(expr) == LowExpr::Literal {
            match self.arena.constant(expr) {
                Some(ConstValue::Char(c)) => {
                    let mut buf = [0u8; 4];
                    return self.string_literal(expr_span, c.encode_utf8(&mut buf));
                }
                Some(ConstValue::Null) => return expr,
                _ => {}
            }
        }

        let ty = self.arena.ty(expr);
        if ty.is_str() || ty.is_error() {
            return expr;
        }

        let to_str = self.members.get(SpecialMember::ObjectToStr);

        // Special value types override `to_str` and never need a guard or copy.
        if self
            .symbols
            .special_type(ty)
            .is_some_and(|special| special.is_value_type())
        {
            if let Some(direct) = self.symbols.declared_override(ty, to_str) {
                return self.call_instance(expr_span, expr, direct);
            }
        }

        // A mutable value could be changed by its own `to_str`.
        if !self.symbols.is_reference_type(ty)
            && !self.symbols.is_readonly(ty)
            && self.arena.constant(expr).is_none()
        {
            expr = self.push(LowExpr::PassByCopy(expr), expr_span, ty);
        }

        if self.symbols.is_value_type(ty) {
            return self.call_instance(expr_span, expr, to_str);
        }

        self.null_guarded_to_str(span, expr, to_str)
    }

    /// `receiver?.to_str()`.
    fn null_guarded_to_str(&mut self, span: Span, receiver: LowId, to_str: MethodId) -> LowId {
        let id = self.next_conditional_access_id();
        let receiver_ty = self.arena.ty(receiver);
        let placeholder = self.push(LowExpr::ConditionalReceiver(id), span, receiver_ty);
        let when_not_null = self.call_instance(span, placeholder, to_str);
        self.stats.null_guards += 1;
        self.push(
            LowExpr::ConditionalAccess {
                receiver,
                when_not_null,
                id,
            },
            span,
            TypeId::STR,
        )
    }
}
