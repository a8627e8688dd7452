//! Emission of the join call for a flat operand list.

use sable_ir::{JoinPrimitive, LowId, Span, TypeId};

use crate::LowerSession;

/// The smallest join overload taking `count` operands.
///
/// `all_str` selects the string overloads; otherwise the object forms are
/// used. There is no four-operand object overload, so four mixed operands
/// use the object array.
///
/// # Panics
///
/// Panics if `count < 2`: one operand is returned as-is and zero operands
/// become `""` without calling a join.
pub fn select_primitive(count: usize, all_str: bool) -> JoinPrimitive {
    match count {
        0 | 1 => panic!("a fused join needs at least two operands, got {count}"),
        2 if all_str => JoinPrimitive::BinaryStr,
        2 => JoinPrimitive::BinaryObj,
        3 if all_str => JoinPrimitive::TernaryStr,
        3 => JoinPrimitive::TernaryObj,
        4 if all_str => JoinPrimitive::QuaternaryStr,
        _ if all_str => JoinPrimitive::ArrayStr,
        _ => JoinPrimitive::ArrayObj,
    }
}

impl LowerSession<'_> {
    /// Emit one join call over `operands` (at least two).
    pub fn fuse_operands(&mut self, span: Span, operands: &[LowId]) -> LowId {
        let all_str = operands.iter().all(|&id| self.arena.ty(id).is_str());
        let primitive = select_primitive(operands.len(), all_str);
        let method = self.members.join_method(primitive);
        self.stats.fused_calls += 1;
        tracing::trace!(operands = operands.len(), ?primitive, "fusing join");

        if primitive.is_array() {
            let element = if all_str { TypeId::STR } else { TypeId::OBJECT };
            let array = self.array(span, element, operands);
            return self.call_static(span, method, &[array]);
        }
        self.call_static(span, method, operands)
    }
}
