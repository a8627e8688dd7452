//! Structural checks on a lowered tree.
//!
//! Run after lowering (by default in debug builds). Violations are bugs in
//! the lowering pass or the front-end, so they panic instead of producing
//! diagnostics.

use sable_ir::{ConditionalAccessId, LowArena, LowExpr, LowId, Symbols, TypeKind};

/// Check the tree rooted at `root`.
///
/// - every reachable id and list range is in bounds
/// - every node's type is registered
/// - calls match their callee: static-ness, argument count, result type
/// - literals carry a constant
/// - concatenations are string or error typed
/// - inline arrays are typed as arrays of their element type
/// - every conditional receiver sits inside the access that binds it
///
/// # Panics
///
/// Panics on the first violation.
pub fn validate(arena: &LowArena, symbols: &Symbols, root: LowId) {
    if !root.is_valid() {
        return;
    }
    let mut validator = Validator {
        arena,
        symbols,
        open_accesses: Vec::new(),
    };
    validator.visit(root);
}

struct Validator<'a> {
    arena: &'a LowArena,
    symbols: &'a Symbols,
    /// Conditional accesses whose `when_not_null` branch is being visited.
    open_accesses: Vec<ConditionalAccessId>,
}

impl Validator<'_> {
    fn visit(&mut self, id: LowId) {
        assert!(
            self.arena.contains(id),
            "{id:?} out of bounds (arena has {} nodes)",
            self.arena.len()
        );
        assert!(
            self.arena.ty(id).index() < self.symbols.type_count(),
            "{id:?} has unregistered type {:?}",
            self.arena.ty(id)
        );

        match *self.arena.kind(id) {
            LowExpr::Literal => {
                assert!(
                    self.arena.constant(id).is_some(),
                    "literal {id:?} has no constant"
                );
            }
            LowExpr::DefaultValue | LowExpr::Local(_) | LowExpr::Error => {}
            LowExpr::Call {
                receiver,
                method,
                args,
            } => {
                assert!(
                    method.index() < self.symbols.method_count(),
                    "call {id:?} targets unknown {method:?}"
                );
                assert!(
                    self.arena.contains_range(args),
                    "call {id:?} has out-of-bounds arguments"
                );
                let sig = self.symbols.method(method);
                assert_eq!(
                    sig.is_static,
                    !receiver.is_valid(),
                    "call {id:?}: receiver does not match static-ness of {method:?}"
                );
                assert_eq!(
                    self.arena.get_expr_list(args).len(),
                    sig.params.len(),
                    "call {id:?}: argument count of {method:?}"
                );
                assert_eq!(
                    self.arena.ty(id),
                    sig.return_type,
                    "call {id:?}: result type of {method:?}"
                );
                if receiver.is_valid() {
                    self.visit(receiver);
                }
                for &arg in self.arena.get_expr_list(args) {
                    self.visit(arg);
                }
            }
            LowExpr::ArrayCreation {
                element,
                size,
                initializer,
            } => {
                if let Some(items) = initializer {
                    assert!(
                        self.arena.contains_range(items),
                        "array {id:?} has out-of-bounds initializer"
                    );
                    assert_eq!(
                        self.symbols.kind(self.arena.ty(id)),
                        TypeKind::Array { element },
                        "array {id:?} is not typed as an array of its element"
                    );
                    for &item in self.arena.get_expr_list(items) {
                        self.visit(item);
                    }
                }
                if size.is_valid() {
                    self.visit(size);
                }
            }
            LowExpr::ConditionalAccess {
                receiver,
                when_not_null,
                id: access,
            } => {
                self.visit(receiver);
                self.open_accesses.push(access);
                self.visit(when_not_null);
                self.open_accesses.pop();
            }
            LowExpr::ConditionalReceiver(access) => {
                assert!(
                    self.open_accesses.contains(&access),
                    "conditional receiver {id:?} for {access:?} outside its access"
                );
            }
            LowExpr::Binary {
                op, left, right, ..
            } => {
                if op.is_concat() {
                    let ty = self.arena.ty(id);
                    assert!(
                        ty.is_str() || ty.is_error(),
                        "concatenation {id:?} is typed {ty:?}"
                    );
                }
                self.visit(left);
                self.visit(right);
            }
            LowExpr::NullCoalesce { left, right, .. } => {
                self.visit(left);
                self.visit(right);
            }
            LowExpr::Conversion { operand, .. } | LowExpr::PassByCopy(operand) => {
                self.visit(operand);
            }
        }
    }
}
