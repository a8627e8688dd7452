//! Lowering session state.

use sable_ir::{ConditionalAccessId, LowArena, SpecialMembers, StringInterner, Symbols};

/// Options carried by a lowering session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LowerOptions {
    /// The enclosing lambda is converted to an expression tree, so every
    /// operator must stay a binary node.
    pub in_expression_lambda: bool,
    /// Run [`validate`](crate::validate) on the result of [`lower`](crate::lower).
    pub validate: bool,
}

impl LowerOptions {
    /// Options for lowering the body of an expression lambda.
    #[must_use]
    pub fn expression_lambda() -> Self {
        Self {
            in_expression_lambda: true,
            ..Self::default()
        }
    }
}

impl Default for LowerOptions {
    fn default() -> Self {
        Self {
            in_expression_lambda: false,
            validate: cfg!(debug_assertions),
        }
    }
}

/// Counters reported at the end of a lowering run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LowerStats {
    /// Concatenation operators handed to the rewriter.
    pub concat_rewrites: usize,
    /// Pairs of constants merged into one literal.
    pub constant_folds: usize,
    /// Null or empty operands dropped.
    pub operand_eliminations: usize,
    /// Join primitive calls emitted.
    pub fused_calls: usize,
    /// Null-guarded `to_str` calls emitted.
    pub null_guards: usize,
}

/// State for one lowering session.
///
/// Holds the target arena plus read-only views of the compilation's
/// registry, special-member table and interner. Sessions never share
/// mutable state, so independent sessions may run on different threads.
pub struct LowerSession<'a> {
    /// Arena being rewritten (append-only).
    pub(crate) arena: &'a mut LowArena,
    pub(crate) symbols: &'a Symbols,
    pub(crate) members: &'a SpecialMembers,
    pub(crate) interner: &'a StringInterner,
    pub(crate) options: LowerOptions,
    /// Last conditional-access id handed out, seeded past every id
    /// already in the arena.
    last_conditional_access: u32,
    pub(crate) stats: LowerStats,
}

impl<'a> LowerSession<'a> {
    pub fn new(
        arena: &'a mut LowArena,
        symbols: &'a Symbols,
        members: &'a SpecialMembers,
        interner: &'a StringInterner,
        options: LowerOptions,
    ) -> Self {
        let last_conditional_access = arena.max_conditional_access();
        Self {
            arena,
            symbols,
            members,
            interner,
            options,
            last_conditional_access,
            stats: LowerStats::default(),
        }
    }

    #[inline]
    pub fn arena(&self) -> &LowArena {
        self.arena
    }

    #[inline]
    pub fn options(&self) -> LowerOptions {
        self.options
    }

    #[inline]
    pub fn stats(&self) -> LowerStats {
        self.stats
    }

    /// A fresh id correlating a conditional access with its receiver placeholder.
    pub(crate) fn next_conditional_access_id(&mut self) -> ConditionalAccessId {
        self.last_conditional_access += 1;
        ConditionalAccessId::new(self.last_conditional_access)
    }
}
