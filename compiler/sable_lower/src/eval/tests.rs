use pretty_assertions::assert_eq;
use sable_ir::{BinaryOp, ConstValue, JoinPrimitive, LowArena, LowId, SpecialMember, TypeId};

use super::*;
use crate::test_helpers::{Fixture, SPAN};

fn eval(fx: &Fixture, arena: &LowArena, env: &Env, id: LowId) -> Result<Value, EvalError> {
    evaluate(arena, &fx.symbols, &fx.members, &fx.interner, env, id)
}

#[test]
fn joins_treat_null_as_empty() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let a = s.local(SPAN, "a", TypeId::STR);
    let b = s.local(SPAN, "b", TypeId::STR);
    let c = s.local(SPAN, "c", TypeId::STR);
    let join = s.call_static(
        SPAN,
        fx.members.join_method(JoinPrimitive::TernaryStr),
        &[a, b, c],
    );
    let mut env = Env::new();
    env.bind(fx.interner.intern("a"), Value::str("x"));
    env.bind(fx.interner.intern("b"), Value::Null);
    env.bind(fx.interner.intern("c"), Value::str("z"));

    assert_eq!(eval(&fx, &arena, &env, join), Ok(Value::str("xz")));
}

#[test]
fn unary_join_passes_null_to_str_through() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let o = s.local(SPAN, "o", TypeId::OBJECT);
    let unary = s.call_static(SPAN, fx.members.join_method(JoinPrimitive::Unary), &[o]);
    let o_name = fx.interner.intern("o");

    let mut env = Env::new();
    env.bind(o_name, Value::Null);
    assert_eq!(eval(&fx, &arena, &env, unary), Ok(Value::str("")));

    env.bind(o_name, Value::object(None));
    assert_eq!(eval(&fx, &arena, &env, unary), Ok(Value::Null));

    env.bind(o_name, Value::object(Some("obj")));
    assert_eq!(eval(&fx, &arena, &env, unary), Ok(Value::str("obj")));
}

#[test]
fn conditional_access_short_circuits() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let node = s.local(SPAN, "node", fx.node);
    let guarded = s.normalize_operand(SPAN, node);
    let node_name = fx.interner.intern("node");

    let mut env = Env::new();
    env.bind(node_name, Value::Null);
    assert_eq!(eval(&fx, &arena, &env, guarded), Ok(Value::Null));

    env.bind(node_name, Value::object(Some("n1")));
    assert_eq!(eval(&fx, &arena, &env, guarded), Ok(Value::str("n1")));
}

#[test]
fn to_str_on_null_is_an_error() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let o = s.local(SPAN, "o", TypeId::OBJECT);
    let call = s.call_instance(SPAN, o, fx.members.get(SpecialMember::ObjectToStr));
    let mut env = Env::new();
    env.bind(fx.interner.intern("o"), Value::Null);

    assert_eq!(eval(&fx, &arena, &env, call), Err(EvalError::NullReceiver));
}

#[test]
fn value_types_stringify() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let n = s.literal(SPAN, ConstValue::Int(42), TypeId::INT);
    let int_str = s.normalize_operand(SPAN, n);
    let flag = s.literal(SPAN, ConstValue::Bool(false), TypeId::BOOL);
    let bool_str = s.normalize_operand(SPAN, flag);
    let env = Env::new();

    assert_eq!(eval(&fx, &arena, &env, int_str), Ok(Value::str("42")));
    assert_eq!(eval(&fx, &arena, &env, bool_str), Ok(Value::str("false")));
}

#[test]
fn unlowered_concat_operator() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let a = s.string_literal(SPAN, "a");
    let c = s.literal(SPAN, ConstValue::Char('c'), TypeId::CHAR);
    let null = s.null_literal(SPAN, TypeId::STR);
    let left = s.binary(SPAN, BinaryOp::StrObjConcat, None, a, c, TypeId::STR);
    let root = s.binary(SPAN, BinaryOp::StrConcat, None, left, null, TypeId::STR);

    assert_eq!(eval(&fx, &arena, &Env::new(), root), Ok(Value::str("ac")));
}

#[test]
fn array_join_over_inline_array() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let items: Vec<LowId> = ["p", "q", "r", "s", "t"]
        .iter()
        .map(|text| s.string_literal(SPAN, text))
        .collect();
    let array = s.array(SPAN, TypeId::STR, &items);
    let join = s.call_static(
        SPAN,
        fx.members.join_method(JoinPrimitive::ArrayStr),
        &[array],
    );

    assert_eq!(eval(&fx, &arena, &Env::new(), join), Ok(Value::str("pqrst")));
}

#[test]
fn unbound_local_is_reported() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let ghost = s.local(SPAN, "ghost", TypeId::STR);

    assert_eq!(
        eval(&fx, &arena, &Env::new(), ghost),
        Err(EvalError::UnboundLocal("ghost".to_owned()))
    );
    assert_eq!(
        EvalError::UnboundLocal("ghost".to_owned()).to_string(),
        "local `ghost` is not bound"
    );
}

#[test]
fn defaults_by_type() {
    let fx = Fixture::new();
    let mut arena = LowArena::new();
    let mut s = fx.session(&mut arena);
    let int_default = s.default_value(SPAN, TypeId::INT);
    let node_default = s.default_value(SPAN, fx.node);
    let point_default = s.default_value(SPAN, fx.point);
    let env = Env::new();

    assert_eq!(eval(&fx, &arena, &env, int_default), Ok(Value::Int(0)));
    assert_eq!(eval(&fx, &arena, &env, node_default), Ok(Value::Null));
    assert_eq!(
        eval(&fx, &arena, &env, point_default),
        Err(EvalError::UnsupportedDefault("Point".to_owned()))
    );
}
