//! End-to-end lowering scenarios.
//!
//! Each test builds a type-checked tree the way the front-end would, lowers
//! it, and checks both the rendered result and its runtime value.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use sable_ir::{
    BinaryOp, ConstValue, ConversionKind, JoinPrimitive, LowArena, LowExpr, LowId, SpecialMember,
    SpecialMembers, Span, StringInterner, Symbols, TypeId, TypeKind,
};
use sable_lower::display::render;
use sable_lower::eval::{evaluate, Env, Value};
use sable_lower::{init_tracing, lower, LowerOptions, LowerSession};

const SPAN: Span = Span::DUMMY;

// -- Fixture --

struct Compilation {
    interner: StringInterner,
    symbols: Symbols,
    members: SpecialMembers,
    node: TypeId,
}

impl Compilation {
    fn new() -> Self {
        let interner = StringInterner::new();
        let mut symbols = Symbols::core_library(&interner);
        let node = symbols.add_type(interner.intern("Node"), TypeKind::Class);
        let members = SpecialMembers::resolve(&symbols, &interner).unwrap();
        Self {
            interner,
            symbols,
            members,
            node,
        }
    }

    fn session<'a>(&'a self, arena: &'a mut LowArena) -> LowerSession<'a> {
        LowerSession::new(
            arena,
            &self.symbols,
            &self.members,
            &self.interner,
            LowerOptions::default(),
        )
    }

    fn lower_with(&self, arena: &mut LowArena, root: LowId, options: LowerOptions) -> LowId {
        let options = LowerOptions {
            validate: true,
            ..options
        };
        lower(arena, &self.symbols, &self.members, &self.interner, root, options).root
    }

    fn lower(&self, arena: &mut LowArena, root: LowId) -> LowId {
        self.lower_with(arena, root, LowerOptions::default())
    }

    fn render(&self, arena: &LowArena, id: LowId) -> String {
        render(arena, &self.symbols, &self.interner, id)
    }

    fn eval(&self, arena: &LowArena, env: &Env, id: LowId) -> Value {
        evaluate(arena, &self.symbols, &self.members, &self.interner, env, id).unwrap()
    }

    fn called_method(arena: &LowArena, id: LowId) -> sable_ir::MethodId {
        match *arena.kind(id) {
            LowExpr::Call { method, .. } => method,
            ref other => panic!("expected a call, got {other:?}"),
        }
    }
}

/// `left + right` with the operator the front-end would pick.
fn plus(s: &mut LowerSession<'_>, left: LowId, right: LowId) -> LowId {
    let op = match (s.arena().ty(left).is_str(), s.arena().ty(right).is_str()) {
        (true, true) => BinaryOp::StrConcat,
        (true, false) => BinaryOp::StrObjConcat,
        _ => BinaryOp::ObjStrConcat,
    };
    s.binary(SPAN, op, None, left, right, TypeId::STR)
}

/// `"abc" + "def" + expr1 + "moo" + "baz"`, left-nested.
fn constant_chain(c: &Compilation, arena: &mut LowArena, expr1_ty: TypeId) -> LowId {
    let mut s = c.session(arena);
    let abc = s.string_literal(SPAN, "abc");
    let def = s.string_literal(SPAN, "def");
    let expr1 = s.local(SPAN, "expr1", expr1_ty);
    let moo = s.string_literal(SPAN, "moo");
    let baz = s.string_literal(SPAN, "baz");
    let tree = plus(&mut s, abc, def);
    let tree = plus(&mut s, tree, expr1);
    let tree = plus(&mut s, tree, moo);
    plus(&mut s, tree, baz)
}

fn has_concat_operator(arena: &LowArena, root: LowId) -> bool {
    arena.reachable(root).into_iter().any(|id| {
        matches!(
            *arena.kind(id),
            LowExpr::Binary { op, method: None, .. } if op.is_concat()
        )
    })
}

// -- Scenarios --

#[test]
fn constant_chain_around_reference_operand() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let root = constant_chain(&c, &mut arena, c.node);

    let lowered = c.lower(&mut arena, root);

    assert_eq!(
        c.render(&arena, lowered),
        r#"str.concat("abcdef", expr1?.to_str(), "moobaz")"#
    );
    assert_eq!(
        Compilation::called_method(&arena, lowered),
        c.members.get(SpecialMember::ConcatStrStrStr)
    );
    assert!(!has_concat_operator(&arena, lowered));

    let expr1 = c.interner.intern("expr1");
    let mut env = Env::new();
    env.bind(expr1, Value::object(Some("X")));
    assert_eq!(c.eval(&arena, &env, lowered), Value::str("abcdefXmoobaz"));
    assert_eq!(c.eval(&arena, &env, root), Value::str("abcdefXmoobaz"));

    env.bind(expr1, Value::Null);
    assert_eq!(c.eval(&arena, &env, lowered), Value::str("abcdefmoobaz"));
}

#[test]
fn split_chain_fuses_across_boundary() {
    // ("abc" + "def" + null) + (expr1 + "moo" + "baz")
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let abc = s.string_literal(SPAN, "abc");
    let def = s.string_literal(SPAN, "def");
    let null = s.null_literal(SPAN, TypeId::STR);
    let expr1 = s.local(SPAN, "expr1", c.node);
    let moo = s.string_literal(SPAN, "moo");
    let baz = s.string_literal(SPAN, "baz");
    let left = plus(&mut s, abc, def);
    let left = plus(&mut s, left, null);
    let right = plus(&mut s, expr1, moo);
    let right = plus(&mut s, right, baz);
    let root = plus(&mut s, left, right);

    let lowered = c.lower(&mut arena, root);

    assert_eq!(
        c.render(&arena, lowered),
        r#"str.concat("abcdef", expr1?.to_str(), "moobaz")"#
    );
    assert!(!has_concat_operator(&arena, lowered));
    // The intermediate `expr1 + "moo"` join is not reachable.
    let moo = c.interner.intern("moo");
    assert!(arena
        .reachable(lowered)
        .into_iter()
        .all(|id| arena.constant(id) != Some(ConstValue::Str(moo))));

    let mut env = Env::new();
    env.bind(c.interner.intern("expr1"), Value::object(Some("-")));
    assert_eq!(c.eval(&arena, &env, lowered), Value::str("abcdef-moobaz"));
}

#[test]
fn constant_chain_around_error_operand() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let root = constant_chain(&c, &mut arena, TypeId::ERROR);

    let lowered = c.lower(&mut arena, root);

    assert_eq!(
        c.render(&arena, lowered),
        r#"str.concat("abcdef", expr1, "moobaz")"#
    );
    assert_eq!(
        Compilation::called_method(&arena, lowered),
        c.members.get(SpecialMember::ConcatObjObjObj)
    );
}

#[test]
fn null_plus_null() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let left = s.null_literal(SPAN, TypeId::STR);
    let right = s.null_literal(SPAN, TypeId::STR);
    let root = plus(&mut s, left, right);

    let lowered = c.lower(&mut arena, root);

    assert_eq!(arena.constant(lowered), Some(ConstValue::Str(sable_ir::Name::EMPTY)));
    assert_eq!(c.eval(&arena, &Env::new(), lowered), Value::str(""));
}

#[test]
fn lone_string_operand_is_guarded() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let x = s.local(SPAN, "x", TypeId::STR);
    let empty = s.empty_string(SPAN);
    let root = plus(&mut s, x, empty);

    let lowered = c.lower(&mut arena, root);

    assert_eq!(c.render(&arena, lowered), r#"(x ?? "")"#);
    let mut env = Env::new();
    env.bind(c.interner.intern("x"), Value::Null);
    assert_eq!(c.eval(&arena, &env, lowered), Value::str(""));
}

#[test]
fn arity_selects_overload() {
    let c = Compilation::new();
    let expected = [
        (2, JoinPrimitive::BinaryStr, "str.concat(v0, v1)"),
        (3, JoinPrimitive::TernaryStr, "str.concat(v0, v1, v2)"),
        (4, JoinPrimitive::QuaternaryStr, "str.concat(v0, v1, v2, v3)"),
        (
            5,
            JoinPrimitive::ArrayStr,
            "str.concat(new str[] { v0, v1, v2, v3, v4 })",
        ),
        (
            7,
            JoinPrimitive::ArrayStr,
            "str.concat(new str[] { v0, v1, v2, v3, v4, v5, v6 })",
        ),
    ];

    for (count, primitive, rendered) in expected {
        let mut arena = LowArena::new();
        let mut s = c.session(&mut arena);
        let mut env = Env::new();
        let mut tree = s.local(SPAN, "v0", TypeId::STR);
        env.bind(c.interner.intern("v0"), Value::str("0"));
        for i in 1..count {
            let name = format!("v{i}");
            let next = s.local(SPAN, &name, TypeId::STR);
            env.bind(c.interner.intern(&name), Value::str(i.to_string()));
            tree = plus(&mut s, tree, next);
        }

        let lowered = c.lower(&mut arena, tree);

        assert_eq!(c.render(&arena, lowered), rendered);
        assert_eq!(
            Compilation::called_method(&arena, lowered),
            c.members.join_method(primitive)
        );
        let digits: String = (0..count).map(|i| i.to_string()).collect();
        assert_eq!(c.eval(&arena, &env, lowered), Value::Str(digits));
    }
}

#[test]
fn four_mixed_operands_use_object_array() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let v0 = s.local(SPAN, "v0", TypeId::STR);
    let v1 = s.local(SPAN, "v1", TypeId::STR);
    let broken = s.local(SPAN, "broken", TypeId::ERROR);
    let v3 = s.local(SPAN, "v3", TypeId::STR);
    let tree = plus(&mut s, v0, v1);
    let tree = plus(&mut s, tree, broken);
    let tree = plus(&mut s, tree, v3);

    let lowered = c.lower(&mut arena, tree);

    assert_eq!(
        c.render(&arena, lowered),
        "str.concat(new object[] { v0, v1, broken, v3 })"
    );
}

#[test]
fn char_operands() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let a = s.literal(SPAN, ConstValue::Char('a'), TypeId::CHAR);
    let a = s.conversion(SPAN, a, ConversionKind::Boxing, TypeId::OBJECT);
    let b = s.string_literal(SPAN, "b");
    let ch = s.local(SPAN, "ch", TypeId::CHAR);
    let ch = s.conversion(SPAN, ch, ConversionKind::Boxing, TypeId::OBJECT);
    let tree = plus(&mut s, a, b);
    let tree = plus(&mut s, tree, ch);

    let lowered = c.lower(&mut arena, tree);

    assert_eq!(c.render(&arena, lowered), r#"str.concat("ab", ch.to_str())"#);
    let mut env = Env::new();
    env.bind(c.interner.intern("ch"), Value::Char('z'));
    assert_eq!(c.eval(&arena, &env, lowered), Value::str("abz"));
}

#[test]
fn string_plus_char() {
    // char c; "x" + c
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let x = s.string_literal(SPAN, "x");
    let ch = s.local(SPAN, "c", TypeId::CHAR);
    let ch = s.conversion(SPAN, ch, ConversionKind::Boxing, TypeId::OBJECT);
    let runtime = plus(&mut s, x, ch);
    let constant = s.literal(SPAN, ConstValue::Char('y'), TypeId::CHAR);
    let constant = s.conversion(SPAN, constant, ConversionKind::Boxing, TypeId::OBJECT);
    let folded = plus(&mut s, x, constant);

    let runtime = c.lower(&mut arena, runtime);
    let folded = c.lower(&mut arena, folded);

    assert_eq!(c.render(&arena, runtime), r#"str.concat("x", c.to_str())"#);
    assert_eq!(c.render(&arena, folded), r#""xy""#);
}

#[test]
fn concatenations_nested_in_other_expressions() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let mut s = c.session(&mut arena);
    let a = s.local(SPAN, "a", TypeId::STR);
    let b = s.local(SPAN, "b", TypeId::STR);
    let n = s.local(SPAN, "n", TypeId::INT);
    let n = s.conversion(SPAN, n, ConversionKind::Boxing, TypeId::OBJECT);
    let left = plus(&mut s, a, n);
    let right = plus(&mut s, b, a);
    let root = s.binary(SPAN, BinaryOp::StrEq, None, left, right, TypeId::BOOL);

    let lowered = c.lower(&mut arena, root);

    assert_eq!(
        c.render(&arena, lowered),
        "(str.concat(a, n.to_str()) == str.concat(b, a))"
    );
    assert!(!has_concat_operator(&arena, lowered));

    let mut env = Env::new();
    env.bind(c.interner.intern("a"), Value::str("7"));
    env.bind(c.interner.intern("b"), Value::str("77"));
    env.bind(c.interner.intern("n"), Value::Int(7));
    assert_eq!(c.eval(&arena, &env, lowered), Value::Bool(true));
}

#[test]
fn expression_lambda_keeps_operators() {
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let root = constant_chain(&c, &mut arena, c.node);

    let lowered = c.lower_with(&mut arena, root, LowerOptions::expression_lambda());

    assert_eq!(
        c.render(&arena, lowered),
        r#"(((("abc" + "def") + expr1) + "moo") + "baz")"#
    );
    let LowExpr::Binary { method, .. } = *arena.kind(lowered) else {
        panic!("expected a binary node");
    };
    assert_eq!(method, Some(c.members.get(SpecialMember::ConcatStrStr)));

    let mut env = Env::new();
    env.bind(c.interner.intern("expr1"), Value::object(Some("X")));
    assert_eq!(c.eval(&arena, &env, lowered), Value::str("abcdefXmoobaz"));
}

// -- Sessions --

#[test]
fn sessions_run_in_parallel() {
    let compilation = Compilation::new();
    let c = &compilation;

    let results: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(move || {
                    let mut arena = LowArena::new();
                    let root = constant_chain(c, &mut arena, c.node);
                    let lowered = c.lower(&mut arena, root);
                    c.render(&arena, lowered)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for rendered in results {
        assert_eq!(rendered, r#"str.concat("abcdef", expr1?.to_str(), "moobaz")"#);
    }
}

#[test]
fn tracing_init_is_idempotent() {
    init_tracing();
    init_tracing();
    // A global subscriber is installed only when `RUST_LOG` asks for one.
    assert_eq!(
        tracing::dispatcher::has_been_set(),
        std::env::var("RUST_LOG").is_ok()
    );

    // Lowering still works with events flowing to the subscriber.
    let c = Compilation::new();
    let mut arena = LowArena::new();
    let root = constant_chain(&c, &mut arena, c.node);
    let lowered = c.lower(&mut arena, root);
    assert_eq!(
        c.render(&arena, lowered),
        r#"str.concat("abcdef", expr1?.to_str(), "moobaz")"#
    );
}
