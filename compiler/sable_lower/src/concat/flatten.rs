//! Recognition and flattening of previously synthesized joins.
//!
//! Only shapes this pass itself produces are recognized: a call to a join
//! primitive (array forms only with an inline array), and `x ?? ""`. User
//! code calling `str.concat` directly is recognized too, which is harmless:
//! its operands are concatenated either way.

use smallvec::SmallVec;

use sable_ir::{ConstValue, ConversionKind, LowArena, LowExpr, LowId, LowRange, MethodId, Name};

use crate::LowerSession;

/// Operand list for one concatenation. Most joins have few operands.
pub type OperandBuffer = SmallVec<[LowId; 8]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Operands {
    /// Arguments of a positional join, or items of an inline array.
    List(LowRange),
    /// The left side of `x ?? ""`.
    Single(LowId),
}

/// The operands of a recognized join, and whether the join can produce null.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OperandRecord {
    operands: Operands,
    pub can_return_null: bool,
}

impl OperandRecord {
    /// The recognized operands, in order.
    pub fn operands(&self, arena: &LowArena) -> OperandBuffer {
        let mut buffer = OperandBuffer::new();
        self.append_to(arena, &mut buffer);
        buffer
    }

    fn append_to(&self, arena: &LowArena, buffer: &mut OperandBuffer) {
        match self.operands {
            Operands::List(range) => buffer.extend_from_slice(arena.get_expr_list(range)),
            Operands::Single(id) => buffer.push(id),
        }
    }
}

impl LowerSession<'_> {
    /// Recognize `id` as a join this pass could have produced.
    pub fn classify_concat(&self, id: LowId) -> Option<OperandRecord> {
        match *self.arena.kind(id) {
            LowExpr::Call { method, args, .. } => self.classify_join_call(method, args),
            LowExpr::NullCoalesce {
                left,
                right,
                left_conversion: ConversionKind::Identity,
            } => {
                if self.arena.constant(right) != Some(ConstValue::Str(Name::EMPTY)) {
                    return None;
                }
                // `join(..) ?? ""` exposes the join's operands one level down.
                if let LowExpr::Call { method, args, .. } = *self.arena.kind(left) {
                    if let Some(inner) = self.classify_join_call(method, args) {
                        return Some(OperandRecord {
                            can_return_null: false,
                            ..inner
                        });
                    }
                }
                Some(OperandRecord {
                    operands: Operands::Single(left),
                    can_return_null: false,
                })
            }
            LowExpr::NullCoalesce { .. }
            | LowExpr::Literal
            | LowExpr::DefaultValue
            | LowExpr::Local(_)
            | LowExpr::Conversion { .. }
            | LowExpr::ArrayCreation { .. }
            | LowExpr::PassByCopy(_)
            | LowExpr::ConditionalAccess { .. }
            | LowExpr::ConditionalReceiver(_)
            | LowExpr::Binary { .. }
            | LowExpr::Error => None,
        }
    }

    fn classify_join_call(&self, method: MethodId, args: LowRange) -> Option<OperandRecord> {
        let primitive = self.members.join_primitive(method)?;

        if primitive.is_array() {
            // The array's contents are only known when it is created inline.
            let &[array] = self.arena.get_expr_list(args) else {
                return None;
            };
            return match *self.arena.kind(array) {
                LowExpr::ArrayCreation {
                    initializer: Some(items),
                    ..
                } => Some(OperandRecord {
                    operands: Operands::List(items),
                    can_return_null: false,
                }),
                _ => None,
            };
        }

        Some(OperandRecord {
            operands: Operands::List(args),
            can_return_null: primitive.can_return_null(),
        })
    }

    /// The operands `id` contributes: its join operands if it is a
    /// recognized join, otherwise `id` itself.
    pub fn flatten(&self, id: LowId) -> OperandBuffer {
        let mut buffer = OperandBuffer::new();
        match self.classify_concat(id) {
            Some(record) => record.append_to(self.arena(), &mut buffer),
            None => buffer.push(id),
        }
        buffer
    }
}
