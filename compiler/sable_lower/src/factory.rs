//! Node construction helpers.
//!
//! Every synthesized node goes through these so its type and constant side
//! tables are filled consistently: calls take the callee's return type,
//! coalesces take the left operand's type, string literals are `str`.

use sable_ir::{
    BinaryOp, ConstValue, ConversionKind, LowExpr, LowId, LowNode, LowRange, MethodId, Name, Span,
    TypeId,
};

use crate::LowerSession;

impl LowerSession<'_> {
    /// Allocate a node without a constant.
    #[inline]
    pub fn push(&mut self, kind: LowExpr, span: Span, ty: TypeId) -> LowId {
        self.arena.push(LowNode::new(kind, span, ty))
    }

    /// A literal of type `ty` carrying `value`.
    pub fn literal(&mut self, span: Span, value: ConstValue, ty: TypeId) -> LowId {
        self.arena
            .push(LowNode::new(LowExpr::Literal, span, ty).with_constant(value))
    }

    /// A `str` literal.
    pub fn string_literal(&mut self, span: Span, text: &str) -> LowId {
        let name = self.interner.intern(text);
        self.literal(span, ConstValue::Str(name), TypeId::STR)
    }

    #[inline]
    pub fn empty_string(&mut self, span: Span) -> LowId {
        self.literal(span, ConstValue::Str(Name::EMPTY), TypeId::STR)
    }

    /// The `null` literal, typed as `ty`.
    #[inline]
    pub fn null_literal(&mut self, span: Span, ty: TypeId) -> LowId {
        self.literal(span, ConstValue::Null, ty)
    }

    /// `default(ty)`.
    pub fn default_value(&mut self, span: Span, ty: TypeId) -> LowId {
        self.arena
            .push(LowNode::new(LowExpr::DefaultValue, span, ty).with_constant(ConstValue::Default))
    }

    /// A read of the local `name`.
    pub fn local(&mut self, span: Span, name: &str, ty: TypeId) -> LowId {
        let name = self.interner.intern(name);
        self.push(LowExpr::Local(name), span, ty)
    }

    pub fn conversion(
        &mut self,
        span: Span,
        operand: LowId,
        kind: ConversionKind,
        ty: TypeId,
    ) -> LowId {
        self.push(LowExpr::Conversion { operand, kind }, span, ty)
    }

    /// `left ?? right` without a conversion on the left.
    pub fn coalesce(&mut self, span: Span, left: LowId, right: LowId) -> LowId {
        let ty = self.arena.ty(left);
        self.push(
            LowExpr::NullCoalesce {
                left,
                right,
                left_conversion: ConversionKind::Identity,
            },
            span,
            ty,
        )
    }

    /// A call to the static `method`.
    pub fn call_static(&mut self, span: Span, method: MethodId, args: &[LowId]) -> LowId {
        let sig = self.symbols.method(method);
        debug_assert!(sig.is_static, "call_static on instance method {method:?}");
        debug_assert_eq!(sig.params.len(), args.len(), "argument count for {method:?}");
        let ty = sig.return_type;
        let args = self.arena.push_expr_list(args);
        self.push(
            LowExpr::Call {
                receiver: LowId::INVALID,
                method,
                args,
            },
            span,
            ty,
        )
    }

    /// A call to the parameterless instance `method` on `receiver`.
    pub fn call_instance(&mut self, span: Span, receiver: LowId, method: MethodId) -> LowId {
        let sig = self.symbols.method(method);
        debug_assert!(!sig.is_static, "call_instance on static method {method:?}");
        let ty = sig.return_type;
        self.push(
            LowExpr::Call {
                receiver,
                method,
                args: LowRange::EMPTY,
            },
            span,
            ty,
        )
    }

    /// An inline array `new element[] { items.. }`.
    ///
    /// Only `str` and `object` elements have registered array types.
    pub fn array(&mut self, span: Span, element: TypeId, items: &[LowId]) -> LowId {
        let ty = match element {
            TypeId::STR => TypeId::STR_ARRAY,
            TypeId::OBJECT => TypeId::OBJECT_ARRAY,
            other => panic!("no array type registered for element {other:?}"),
        };
        let initializer = self.arena.push_expr_list(items);
        self.push(
            LowExpr::ArrayCreation {
                element,
                size: LowId::INVALID,
                initializer: Some(initializer),
            },
            span,
            ty,
        )
    }

    pub fn binary(
        &mut self,
        span: Span,
        op: BinaryOp,
        method: Option<MethodId>,
        left: LowId,
        right: LowId,
        ty: TypeId,
    ) -> LowId {
        self.push(
            LowExpr::Binary {
                op,
                method,
                left,
                right,
            },
            span,
            ty,
        )
    }
}
