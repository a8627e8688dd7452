//! Node kinds and constant values of the lowered IR.

use crate::symbols::MethodId;
use crate::{Name, Span, StringInterner, TypeId};

use super::ids::{ConditionalAccessId, LowId, LowRange};

/// Compile-time constant attached to a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstValue {
    Str(Name),
    Null,
    Char(char),
    Int(i64),
    Bool(bool),
    /// The default value of the node's type.
    Default,
}

impl ConstValue {
    /// Null and default-of-type constants.
    #[inline]
    pub const fn is_default(self) -> bool {
        matches!(self, ConstValue::Null | ConstValue::Default)
    }

    /// A constant that concatenates as nothing: null, default, or `""`.
    #[inline]
    pub const fn is_null_or_empty_str(self) -> bool {
        match self {
            ConstValue::Null | ConstValue::Default => true,
            ConstValue::Str(name) => name.is_empty(),
            _ => false,
        }
    }

    /// The text this constant contributes to a concatenation.
    ///
    /// Null and default fold as the empty string. Non-string constants have
    /// no string value here; they must be stringified first.
    pub fn string_value(self, interner: &StringInterner) -> Option<&str> {
        match self {
            ConstValue::Str(name) => Some(interner.lookup(name)),
            ConstValue::Null | ConstValue::Default => Some(""),
            ConstValue::Char(_) | ConstValue::Int(_) | ConstValue::Bool(_) => None,
        }
    }
}

/// Conversion applied by the front-end.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConversionKind {
    Identity,
    /// Value type to `object`.
    Boxing,
    /// Reference type to a base reference type.
    ImplicitReference,
}

/// Binary operator kinds that reach lowering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `str + str`
    StrConcat,
    /// `str + object`
    StrObjConcat,
    /// `object + str`
    ObjStrConcat,
    /// `int + int`
    IntAdd,
    /// `str == str`
    StrEq,
}

impl BinaryOp {
    #[inline]
    pub const fn is_concat(self) -> bool {
        matches!(
            self,
            BinaryOp::StrConcat | BinaryOp::StrObjConcat | BinaryOp::ObjStrConcat
        )
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::StrConcat
            | BinaryOp::StrObjConcat
            | BinaryOp::ObjStrConcat
            | BinaryOp::IntAdd => "+",
            BinaryOp::StrEq => "==",
        }
    }
}

/// Lowered expression kind.
///
/// All child references are arena ids; `LowExpr` is `Copy` so passes can
/// read a node out of the arena before pushing new ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LowExpr {
    /// A literal; its value is the node's constant.
    Literal,
    /// `default(T)`; its constant is [`ConstValue::Default`].
    DefaultValue,
    /// Read of a local variable or parameter.
    Local(Name),
    /// Method call. `receiver` is [`LowId::INVALID`] for static calls.
    Call {
        receiver: LowId,
        method: MethodId,
        args: LowRange,
    },
    /// `left ?? right`
    NullCoalesce {
        left: LowId,
        right: LowId,
        left_conversion: ConversionKind,
    },
    Conversion {
        operand: LowId,
        kind: ConversionKind,
    },
    /// `new T[size]` or `new T[] { .. }`.
    ///
    /// `size` is [`LowId::INVALID`] when only an initializer is given.
    ArrayCreation {
        element: TypeId,
        size: LowId,
        initializer: Option<LowRange>,
    },
    /// Evaluate the operand into a temporary copy; calls on the result
    /// cannot observe or mutate the original storage.
    PassByCopy(LowId),
    /// `receiver?.<when_not_null>`: null if `receiver` is null, otherwise
    /// `when_not_null` with every matching [`LowExpr::ConditionalReceiver`]
    /// bound to the receiver's value.
    ConditionalAccess {
        receiver: LowId,
        when_not_null: LowId,
        id: ConditionalAccessId,
    },
    /// Placeholder for the receiver of the enclosing conditional access.
    ConditionalReceiver(ConditionalAccessId),
    /// Binary operator. `method` is set when the operator must stay a
    /// binary node but its implementation has been chosen.
    Binary {
        op: BinaryOp,
        method: Option<MethodId>,
        left: LowId,
        right: LowId,
    },
    Error,
}

/// A complete node: kind plus its side tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LowNode {
    pub kind: LowExpr,
    pub span: Span,
    pub ty: TypeId,
    pub constant: Option<ConstValue>,
}

impl LowNode {
    #[inline]
    pub const fn new(kind: LowExpr, span: Span, ty: TypeId) -> Self {
        Self {
            kind,
            span,
            ty,
            constant: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_constant(self, value: ConstValue) -> Self {
        Self {
            constant: Some(value),
            ..self
        }
    }
}
