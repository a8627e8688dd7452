//! Read-only type and method registry.
//!
//! [`Symbols`] is built by the front-end before lowering starts and is never
//! mutated afterwards. Lowering sessions only query it, so one registry can
//! serve any number of concurrent sessions without locking.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::special::SpecialMember;
use crate::{Name, StringInterner, TypeId};

/// Built-in types with a dedicated runtime representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecialType {
    Object,
    Str,
    Char,
    Int,
    Bool,
    Float,
}

impl SpecialType {
    /// Special value types carry their own `to_str` override.
    pub const fn is_value_type(self) -> bool {
        matches!(
            self,
            SpecialType::Char | SpecialType::Int | SpecialType::Bool | SpecialType::Float
        )
    }
}

/// Constraint on a generic type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeParamConstraint {
    /// No constraint: may be instantiated with either a value or a reference type.
    Unconstrained,
    /// Constrained to reference types.
    Class,
    /// Constrained to value types.
    Struct,
}

/// Shape of a registered type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Special(SpecialType),
    Struct { readonly: bool },
    Class,
    TypeParam(TypeParamConstraint),
    Array { element: TypeId },
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct TypeInfo {
    name: Name,
    kind: TypeKind,
}

/// Index into the method table of a [`Symbols`] registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct MethodId(u32);

impl MethodId {
    /// Placeholder for table slots that have not been resolved yet.
    pub const INVALID: MethodId = MethodId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "MethodId({})", self.0)
        } else {
            write!(f, "MethodId::INVALID")
        }
    }
}

/// Signature of a registered method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSig {
    pub name: Name,
    /// Type that declares the method.
    pub container: TypeId,
    pub is_static: bool,
    pub params: Vec<TypeId>,
    pub return_type: TypeId,
    /// The method this one overrides, if it is an override.
    pub overrides: Option<MethodId>,
}

impl MethodSig {
    /// A static method.
    pub fn static_method(
        name: Name,
        container: TypeId,
        params: Vec<TypeId>,
        return_type: TypeId,
    ) -> Self {
        Self {
            name,
            container,
            is_static: true,
            params,
            return_type,
            overrides: None,
        }
    }

    /// A parameterless instance method.
    pub fn instance(name: Name, container: TypeId, return_type: TypeId) -> Self {
        Self {
            name,
            container,
            is_static: false,
            params: Vec::new(),
            return_type,
            overrides: None,
        }
    }

    #[must_use]
    pub fn overriding(mut self, base: MethodId) -> Self {
        self.overrides = Some(base);
        self
    }
}

/// Type and method registry.
#[derive(Clone, Debug)]
pub struct Symbols {
    types: Vec<TypeInfo>,
    methods: Vec<MethodSig>,
    /// Methods grouped by declaring type, in declaration order.
    members: FxHashMap<TypeId, Vec<MethodId>>,
}

impl Symbols {
    /// Create a registry holding only the pre-registered core types.
    ///
    /// Registration order must match the `TypeId` constants.
    pub fn new(interner: &StringInterner) -> Self {
        let mut symbols = Self {
            types: Vec::with_capacity(32),
            methods: Vec::new(),
            members: FxHashMap::default(),
        };

        let core = [
            ("object", TypeKind::Special(SpecialType::Object)),
            ("str", TypeKind::Special(SpecialType::Str)),
            ("char", TypeKind::Special(SpecialType::Char)),
            ("int", TypeKind::Special(SpecialType::Int)),
            ("bool", TypeKind::Special(SpecialType::Bool)),
            ("float", TypeKind::Special(SpecialType::Float)),
            ("<error>", TypeKind::Error),
            (
                "str[]",
                TypeKind::Array {
                    element: TypeId::STR,
                },
            ),
            (
                "object[]",
                TypeKind::Array {
                    element: TypeId::OBJECT,
                },
            ),
        ];
        for (name, kind) in core {
            symbols.add_type(interner.intern(name), kind);
        }
        debug_assert_eq!(symbols.types.len(), TypeId::FIRST_USER as usize);

        symbols
    }

    /// Create a registry with the core library: the root `object.to_str`,
    /// direct `to_str` overrides on the special types, and every
    /// `str.concat` overload.
    pub fn core_library(interner: &StringInterner) -> Self {
        let mut symbols = Self::new(interner);

        let to_str = interner.intern("to_str");
        let root = symbols.add_method(MethodSig::instance(to_str, TypeId::OBJECT, TypeId::STR));
        for ty in [
            TypeId::STR,
            TypeId::CHAR,
            TypeId::INT,
            TypeId::BOOL,
            TypeId::FLOAT,
        ] {
            symbols.add_method(MethodSig::instance(to_str, ty, TypeId::STR).overriding(root));
        }

        for member in SpecialMember::ALL {
            let desc = member.descriptor();
            if desc.is_static {
                symbols.add_method(MethodSig::static_method(
                    interner.intern(desc.name),
                    desc.container,
                    desc.params.to_vec(),
                    desc.return_type,
                ));
            }
        }

        symbols
    }

    /// Register a type, returning its id.
    pub fn add_type(&mut self, name: Name, kind: TypeKind) -> TypeId {
        let index = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type table exceeded u32::MAX entries"));
        self.types.push(TypeInfo { name, kind });
        TypeId::new(index)
    }

    /// Register a method, returning its id.
    pub fn add_method(&mut self, sig: MethodSig) -> MethodId {
        let index = u32::try_from(self.methods.len())
            .unwrap_or_else(|_| panic!("method table exceeded u32::MAX entries"));
        let id = MethodId::new(index);
        self.members.entry(sig.container).or_default().push(id);
        self.methods.push(sig);
        id
    }

    #[inline]
    pub fn kind(&self, ty: TypeId) -> TypeKind {
        self.types[ty.index()].kind
    }

    #[inline]
    pub fn type_name(&self, ty: TypeId) -> Name {
        self.types[ty.index()].name
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodSig {
        &self.methods[id.index()]
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn special_type(&self, ty: TypeId) -> Option<SpecialType> {
        match self.kind(ty) {
            TypeKind::Special(special) => Some(special),
            _ => None,
        }
    }

    pub fn is_value_type(&self, ty: TypeId) -> bool {
        match self.kind(ty) {
            TypeKind::Special(special) => special.is_value_type(),
            TypeKind::Struct { .. } | TypeKind::TypeParam(TypeParamConstraint::Struct) => true,
            _ => false,
        }
    }

    pub fn is_reference_type(&self, ty: TypeId) -> bool {
        match self.kind(ty) {
            TypeKind::Special(special) => !special.is_value_type(),
            TypeKind::Class
            | TypeKind::Array { .. }
            | TypeKind::TypeParam(TypeParamConstraint::Class) => true,
            _ => false,
        }
    }

    pub fn is_readonly(&self, ty: TypeId) -> bool {
        matches!(self.kind(ty), TypeKind::Struct { readonly: true })
    }

    /// Methods named `name` declared directly on `ty` (inherited members excluded).
    pub fn members_named(&self, ty: TypeId, name: Name) -> impl Iterator<Item = MethodId> + '_ {
        self.members
            .get(&ty)
            .map_or(&[][..], Vec::as_slice)
            .iter()
            .copied()
            .filter(move |&id| self.method(id).name == name)
    }

    /// Find a method by exact signature.
    pub fn find_method(
        &self,
        container: TypeId,
        name: Name,
        is_static: bool,
        params: &[TypeId],
    ) -> Option<MethodId> {
        self.members_named(container, name).find(|&id| {
            let sig = self.method(id);
            sig.is_static == is_static && sig.params == params
        })
    }

    /// Follow the override chain back to the method that introduced the slot.
    pub fn least_overridden(&self, mut method: MethodId) -> MethodId {
        while let Some(base) = self.method(method).overrides {
            method = base;
        }
        method
    }

    /// A method declared directly on `ty` that overrides the `root` slot.
    pub fn declared_override(&self, ty: TypeId, root: MethodId) -> Option<MethodId> {
        let name = self.method(root).name;
        self.members_named(ty, name)
            .find(|&id| id != root && self.least_overridden(id) == root)
    }
}
