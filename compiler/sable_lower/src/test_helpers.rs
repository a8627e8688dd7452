//! Shared fixture for unit tests.

use sable_ir::{
    LowArena, LowId, SpecialMembers, Span, StringInterner, Symbols, TypeId, TypeKind,
    TypeParamConstraint,
};

use crate::{LowerOptions, LowerSession};

pub(crate) const SPAN: Span = Span::DUMMY;

/// Core library plus a handful of user types.
pub(crate) struct Fixture {
    pub interner: StringInterner,
    pub symbols: Symbols,
    pub members: SpecialMembers,
    /// `class Node`
    pub node: TypeId,
    /// `struct Point` (mutable)
    pub point: TypeId,
    /// `readonly struct Frozen`
    pub frozen: TypeId,
    /// Unconstrained type parameter `T`.
    pub generic: TypeId,
    /// Type parameter `U: struct`.
    pub value_generic: TypeId,
}

impl Fixture {
    pub fn new() -> Self {
        let interner = StringInterner::new();
        let mut symbols = Symbols::core_library(&interner);
        let node = symbols.add_type(interner.intern("Node"), TypeKind::Class);
        let point = symbols.add_type(
            interner.intern("Point"),
            TypeKind::Struct { readonly: false },
        );
        let frozen = symbols.add_type(
            interner.intern("Frozen"),
            TypeKind::Struct { readonly: true },
        );
        let generic = symbols.add_type(
            interner.intern("T"),
            TypeKind::TypeParam(TypeParamConstraint::Unconstrained),
        );
        let value_generic = symbols.add_type(
            interner.intern("U"),
            TypeKind::TypeParam(TypeParamConstraint::Struct),
        );
        let members = SpecialMembers::resolve(&symbols, &interner)
            .unwrap_or_else(|e| panic!("core library incomplete: {e}"));

        Self {
            interner,
            symbols,
            members,
            node,
            point,
            frozen,
            generic,
            value_generic,
        }
    }

    pub fn session<'a>(&'a self, arena: &'a mut LowArena) -> LowerSession<'a> {
        self.session_with(arena, LowerOptions::default())
    }

    pub fn session_with<'a>(
        &'a self,
        arena: &'a mut LowArena,
        options: LowerOptions,
    ) -> LowerSession<'a> {
        LowerSession::new(arena, &self.symbols, &self.members, &self.interner, options)
    }

    pub fn render(&self, arena: &LowArena, id: LowId) -> String {
        crate::display::render(arena, &self.symbols, &self.interner, id)
    }
}
