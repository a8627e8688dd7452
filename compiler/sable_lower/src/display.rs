//! Source-like rendering of lowered trees, for tests and trace output.
//!
//! ```text
//! str.concat("abcdef", expr1?.to_str(), "moobaz")
//! (s ?? "")
//! new object[] { a, copy(p).to_str(), "x", b?.to_str() }
//! ```

use rustc_hash::FxHashMap;

use sable_ir::{
    ConditionalAccessId, ConstValue, ConversionKind, LowArena, LowExpr, LowId, StringInterner,
    Symbols, TypeId,
};

/// Render the tree rooted at `root`.
pub fn render(
    arena: &LowArena,
    symbols: &Symbols,
    interner: &StringInterner,
    root: LowId,
) -> String {
    let mut renderer = Renderer {
        arena,
        symbols,
        interner,
        receivers: FxHashMap::default(),
    };
    renderer.render(root)
}

struct Renderer<'a> {
    arena: &'a LowArena,
    symbols: &'a Symbols,
    interner: &'a StringInterner,
    /// Rendered receivers of the conditional accesses being rendered.
    receivers: FxHashMap<ConditionalAccessId, String>,
}

impl<'a> Renderer<'a> {
    fn type_name(&self, ty: TypeId) -> &'a str {
        self.interner.lookup(self.symbols.type_name(ty))
    }

    fn list(&mut self, ids: &[LowId]) -> String {
        let parts: Vec<String> = ids.iter().map(|&id| self.render(id)).collect();
        parts.join(", ")
    }

    fn render(&mut self, id: LowId) -> String {
        if !id.is_valid() {
            return "<invalid>".to_owned();
        }
        let arena = self.arena;
        match *arena.kind(id) {
            LowExpr::Literal => self.constant(id),
            LowExpr::DefaultValue => format!("default({})", self.type_name(arena.ty(id))),
            LowExpr::Local(name) => self.interner.lookup(name).to_owned(),
            LowExpr::Call {
                receiver,
                method,
                args,
            } => {
                let (symbols, interner) = (self.symbols, self.interner);
                let sig = symbols.method(method);
                let (name, container) = (interner.lookup(sig.name), sig.container);
                let target = if receiver.is_valid() {
                    self.render(receiver)
                } else {
                    self.type_name(container).to_owned()
                };
                let args = self.list(arena.get_expr_list(args));
                format!("{target}.{name}({args})")
            }
            LowExpr::NullCoalesce { left, right, .. } => {
                format!("({} ?? {})", self.render(left), self.render(right))
            }
            LowExpr::Conversion { operand, kind } => match kind {
                ConversionKind::Identity => self.render(operand),
                ConversionKind::Boxing => format!("box({})", self.render(operand)),
                ConversionKind::ImplicitReference => format!(
                    "({}){}",
                    self.type_name(arena.ty(id)),
                    self.render(operand)
                ),
            },
            LowExpr::ArrayCreation {
                element,
                size,
                initializer,
            } => {
                let element = self.type_name(element);
                match initializer {
                    Some(items) => {
                        format!("new {element}[] {{ {} }}", self.list(arena.get_expr_list(items)))
                    }
                    None => format!("new {element}[{}]", self.render(size)),
                }
            }
            LowExpr::PassByCopy(operand) => format!("copy({})", self.render(operand)),
            LowExpr::ConditionalAccess {
                receiver,
                when_not_null,
                id: access,
            } => {
                let receiver = format!("{}?", self.render(receiver));
                self.receivers.insert(access, receiver);
                let rendered = self.render(when_not_null);
                self.receivers.remove(&access);
                rendered
            }
            LowExpr::ConditionalReceiver(access) => self
                .receivers
                .get(&access)
                .cloned()
                .unwrap_or_else(|| format!("<receiver {}>", access.raw())),
            LowExpr::Binary {
                op, left, right, ..
            } => format!(
                "({} {} {})",
                self.render(left),
                op.symbol(),
                self.render(right)
            ),
            LowExpr::Error => "<error>".to_owned(),
        }
    }

    fn constant(&self, id: LowId) -> String {
        match self.arena.constant(id) {
            Some(ConstValue::Str(name)) => format!("{:?}", self.interner.lookup(name)),
            Some(ConstValue::Null) => "null".to_owned(),
            Some(ConstValue::Char(c)) => format!("{c:?}"),
            Some(ConstValue::Int(n)) => n.to_string(),
            Some(ConstValue::Bool(b)) => b.to_string(),
            Some(ConstValue::Default) => "default".to_owned(),
            None => "<literal>".to_owned(),
        }
    }
}
