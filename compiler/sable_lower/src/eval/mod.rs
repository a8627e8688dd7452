//! Reference evaluator for lowered and unlowered trees.
//!
//! Gives trees a runtime meaning so lowering can be checked for semantic
//! preservation: a concatenation must produce the same text before and
//! after it is rewritten. Only the constructs lowering produces or consumes
//! are supported.
//!
//! Runtime model: joins treat null operands as `""`; the unary join returns
//! whatever its operand's `to_str` returns (possibly null); `to_str` on a
//! null receiver is an error.

use std::fmt;

use rustc_hash::FxHashMap;

use sable_ir::{
    BinaryOp, ConditionalAccessId, ConstValue, JoinPrimitive, LowArena, LowExpr, LowId, Name,
    SpecialMember, SpecialMembers, SpecialType, StringInterner, Symbols, TypeId, TypeKind,
    TypeParamConstraint,
};

/// A user object with a fixed `to_str` result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectValue {
    /// `None` models a `to_str` override that returns null.
    pub to_str: Option<String>,
}

/// A runtime value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Str(String),
    Char(char),
    Int(i64),
    Bool(bool),
    Object(ObjectValue),
    Array(Vec<Value>),
}

impl Value {
    pub fn str(text: impl Into<String>) -> Self {
        Value::Str(text.into())
    }

    pub fn object(to_str: Option<&str>) -> Self {
        Value::Object(ObjectValue {
            to_str: to_str.map(str::to_owned),
        })
    }

    /// What `to_str` returns on this value. `None` for null results.
    fn to_str(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Str(s) => Some(s.clone()),
            Value::Char(c) => Some(c.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Object(object) => object.to_str.clone(),
            Value::Array(items) => Some(format!("array[{}]", items.len())),
        }
    }

    /// The text this value contributes to a concatenation.
    fn concat_text(&self) -> String {
        self.to_str().unwrap_or_default()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Str(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.concat_text()),
        }
    }
}

/// Evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("local `{0}` is not bound")]
    UnboundLocal(String),
    #[error("`to_str` called on null")]
    NullReceiver,
    #[error("conditional receiver {0:?} used outside its access")]
    UnboundReceiver(ConditionalAccessId),
    #[error("method `{0}` has no runtime implementation")]
    UnsupportedMethod(String),
    #[error("no runtime value for `default({0})`")]
    UnsupportedDefault(String),
    #[error("type mismatch: {0}")]
    TypeMismatch(&'static str),
    #[error("evaluated an error node")]
    ErrorNode,
}

/// Local variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Env {
    locals: FxHashMap<Name, Value>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: Name, value: Value) {
        self.locals.insert(name, value);
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.locals.get(&name)
    }
}

/// Tree-walking evaluator over one arena.
pub struct Evaluator<'a> {
    arena: &'a LowArena,
    symbols: &'a Symbols,
    members: &'a SpecialMembers,
    interner: &'a StringInterner,
    env: &'a Env,
    /// Receivers bound by the conditional accesses being evaluated.
    receivers: FxHashMap<ConditionalAccessId, Value>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        arena: &'a LowArena,
        symbols: &'a Symbols,
        members: &'a SpecialMembers,
        interner: &'a StringInterner,
        env: &'a Env,
    ) -> Self {
        Self {
            arena,
            symbols,
            members,
            interner,
            env,
            receivers: FxHashMap::default(),
        }
    }

    pub fn eval(&mut self, id: LowId) -> Result<Value, EvalError> {
        let arena = self.arena;
        match *arena.kind(id) {
            LowExpr::Literal | LowExpr::DefaultValue => self.constant(id),
            LowExpr::Local(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnboundLocal(self.interner.lookup(name).to_owned())),
            LowExpr::Call {
                receiver,
                method,
                args,
            } => {
                if let Some(primitive) = self.members.join_primitive(method) {
                    let mut values = Vec::with_capacity(args.len());
                    for &arg in arena.get_expr_list(args) {
                        values.push(self.eval(arg)?);
                    }
                    return join(primitive, values);
                }
                let to_str = self.members.get(SpecialMember::ObjectToStr);
                if receiver.is_valid() && self.symbols.least_overridden(method) == to_str {
                    let value = self.eval(receiver)?;
                    if value == Value::Null {
                        return Err(EvalError::NullReceiver);
                    }
                    return Ok(value.to_str().map_or(Value::Null, Value::Str));
                }
                let name = self.symbols.method(method).name;
                Err(EvalError::UnsupportedMethod(
                    self.interner.lookup(name).to_owned(),
                ))
            }
            LowExpr::NullCoalesce { left, right, .. } => match self.eval(left)? {
                Value::Null => self.eval(right),
                value => Ok(value),
            },
            LowExpr::Conversion { operand, .. } | LowExpr::PassByCopy(operand) => {
                self.eval(operand)
            }
            LowExpr::ArrayCreation {
                size, initializer, ..
            } => {
                if let Some(items) = initializer {
                    let mut values = Vec::with_capacity(items.len());
                    for &item in arena.get_expr_list(items) {
                        values.push(self.eval(item)?);
                    }
                    return Ok(Value::Array(values));
                }
                match self.eval(size)? {
                    Value::Int(n) => {
                        let len = usize::try_from(n)
                            .map_err(|_| EvalError::TypeMismatch("negative array size"))?;
                        Ok(Value::Array(vec![Value::Null; len]))
                    }
                    _ => Err(EvalError::TypeMismatch("array size is not an int")),
                }
            }
            LowExpr::ConditionalAccess {
                receiver,
                when_not_null,
                id: access,
            } => {
                let value = self.eval(receiver)?;
                if value == Value::Null {
                    return Ok(Value::Null);
                }
                let outer = self.receivers.insert(access, value);
                let result = self.eval(when_not_null);
                match outer {
                    Some(outer) => self.receivers.insert(access, outer),
                    None => self.receivers.remove(&access),
                };
                result
            }
            LowExpr::ConditionalReceiver(access) => self
                .receivers
                .get(&access)
                .cloned()
                .ok_or(EvalError::UnboundReceiver(access)),
            LowExpr::Binary {
                op, left, right, ..
            } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(op, &left, &right)
            }
            LowExpr::Error => Err(EvalError::ErrorNode),
        }
    }

    fn constant(&self, id: LowId) -> Result<Value, EvalError> {
        match self.arena.constant(id) {
            Some(ConstValue::Str(name)) => Ok(Value::str(self.interner.lookup(name))),
            Some(ConstValue::Null) => Ok(Value::Null),
            Some(ConstValue::Char(c)) => Ok(Value::Char(c)),
            Some(ConstValue::Int(n)) => Ok(Value::Int(n)),
            Some(ConstValue::Bool(b)) => Ok(Value::Bool(b)),
            Some(ConstValue::Default) | None => self.default_of(self.arena.ty(id)),
        }
    }

    fn default_of(&self, ty: TypeId) -> Result<Value, EvalError> {
        match self.symbols.kind(ty) {
            TypeKind::Special(SpecialType::Char) => Ok(Value::Char('\0')),
            TypeKind::Special(SpecialType::Int) => Ok(Value::Int(0)),
            TypeKind::Special(SpecialType::Bool) => Ok(Value::Bool(false)),
            TypeKind::Special(SpecialType::Object | SpecialType::Str)
            | TypeKind::Class
            | TypeKind::Array { .. }
            | TypeKind::TypeParam(TypeParamConstraint::Class) => Ok(Value::Null),
            TypeKind::Special(SpecialType::Float)
            | TypeKind::Struct { .. }
            | TypeKind::TypeParam(_)
            | TypeKind::Error => {
                let name = self.symbols.type_name(ty);
                Err(EvalError::UnsupportedDefault(
                    self.interner.lookup(name).to_owned(),
                ))
            }
        }
    }
}

/// Evaluate the tree rooted at `root` under `env`.
pub fn evaluate(
    arena: &LowArena,
    symbols: &Symbols,
    members: &SpecialMembers,
    interner: &StringInterner,
    env: &Env,
    root: LowId,
) -> Result<Value, EvalError> {
    Evaluator::new(arena, symbols, members, interner, env).eval(root)
}

fn join(primitive: JoinPrimitive, values: Vec<Value>) -> Result<Value, EvalError> {
    match primitive {
        JoinPrimitive::Unary => {
            let mut values = values.into_iter();
            let operand = values
                .next()
                .ok_or(EvalError::TypeMismatch("unary join without operand"))?;
            Ok(match operand {
                Value::Null => Value::str(""),
                value => value.to_str().map_or(Value::Null, Value::Str),
            })
        }
        _ if primitive.is_array() => match <[Value; 1]>::try_from(values) {
            Ok([Value::Array(items)]) => Ok(Value::Str(concat_all(&items))),
            _ => Err(EvalError::TypeMismatch("array join without an array")),
        },
        _ => Ok(Value::Str(concat_all(&values))),
    }
}

fn concat_all(values: &[Value]) -> String {
    values.iter().map(Value::concat_text).collect()
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::StrConcat | BinaryOp::StrObjConcat | BinaryOp::ObjStrConcat => {
            let mut text = left.concat_text();
            text.push_str(&right.concat_text());
            Ok(Value::Str(text))
        }
        BinaryOp::IntAdd => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            _ => Err(EvalError::TypeMismatch("int addition on non-int operands")),
        },
        BinaryOp::StrEq => match (left, right) {
            (Value::Str(_) | Value::Null, Value::Str(_) | Value::Null) => {
                Ok(Value::Bool(left == right))
            }
            _ => Err(EvalError::TypeMismatch("string equality on non-string operands")),
        },
    }
}

#[cfg(test)]
mod tests;
