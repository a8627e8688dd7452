//! Enum-keyed table of the well-known members the lowering passes call.
//!
//! The front-end guarantees these members exist before lowering runs.
//! [`SpecialMembers::resolve`] looks every one of them up once per
//! compilation session; afterwards lookups are infallible and a method can
//! be classified by id instead of comparing against cached symbols.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::symbols::{MethodId, Symbols};
use crate::{StringInterner, TypeId};

/// A well-known member required by the lowering passes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpecialMember {
    /// `str.concat(object)`
    ConcatObject,
    /// `str.concat(str, str)`
    ConcatStrStr,
    /// `str.concat(str, str, str)`
    ConcatStrStrStr,
    /// `str.concat(str, str, str, str)`
    ConcatStrStrStrStr,
    /// `str.concat(object, object)`
    ConcatObjObj,
    /// `str.concat(object, object, object)`
    ConcatObjObjObj,
    /// `str.concat(str[])`
    ConcatStrArray,
    /// `str.concat(object[])`
    ConcatObjArray,
    /// `object.to_str()`, the root virtual stringification method.
    ObjectToStr,
}

/// Where a special member lives and what it looks like.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub container: TypeId,
    pub name: &'static str,
    pub is_static: bool,
    pub params: &'static [TypeId],
    pub return_type: TypeId,
}

impl SpecialMember {
    pub const COUNT: usize = 9;

    pub const ALL: [SpecialMember; Self::COUNT] = [
        SpecialMember::ConcatObject,
        SpecialMember::ConcatStrStr,
        SpecialMember::ConcatStrStrStr,
        SpecialMember::ConcatStrStrStrStr,
        SpecialMember::ConcatObjObj,
        SpecialMember::ConcatObjObjObj,
        SpecialMember::ConcatStrArray,
        SpecialMember::ConcatObjArray,
        SpecialMember::ObjectToStr,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    pub const fn descriptor(self) -> MemberDescriptor {
        const S: TypeId = TypeId::STR;
        const O: TypeId = TypeId::OBJECT;

        let (container, name, is_static, params): (TypeId, &'static str, bool, &'static [TypeId]) =
            match self {
                SpecialMember::ConcatObject => (S, "concat", true, &[O]),
                SpecialMember::ConcatStrStr => (S, "concat", true, &[S, S]),
                SpecialMember::ConcatStrStrStr => (S, "concat", true, &[S, S, S]),
                SpecialMember::ConcatStrStrStrStr => (S, "concat", true, &[S, S, S, S]),
                SpecialMember::ConcatObjObj => (S, "concat", true, &[O, O]),
                SpecialMember::ConcatObjObjObj => (S, "concat", true, &[O, O, O]),
                SpecialMember::ConcatStrArray => (S, "concat", true, &[TypeId::STR_ARRAY]),
                SpecialMember::ConcatObjArray => (S, "concat", true, &[TypeId::OBJECT_ARRAY]),
                SpecialMember::ObjectToStr => (O, "to_str", false, &[]),
            };

        MemberDescriptor {
            container,
            name,
            is_static,
            params,
            return_type: TypeId::STR,
        }
    }
}

fn core_type_label(ty: TypeId) -> &'static str {
    match ty {
        TypeId::OBJECT => "object",
        TypeId::STR => "str",
        TypeId::STR_ARRAY => "str[]",
        TypeId::OBJECT_ARRAY => "object[]",
        _ => "?",
    }
}

impl fmt::Display for SpecialMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.descriptor();
        write!(f, "{}.{}(", core_type_label(desc.container), desc.name)?;
        for (i, param) in desc.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(core_type_label(*param))?;
        }
        f.write_str(")")
    }
}

/// The join overload a fused concatenation calls.
///
/// The runtime exposes a fixed overload set: dedicated string and object
/// overloads for two and three operands, a string-only four-operand
/// overload, array forms for everything else, and the single-argument
/// object form used to stringify a lone operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JoinPrimitive {
    Unary,
    BinaryStr,
    BinaryObj,
    TernaryStr,
    TernaryObj,
    QuaternaryStr,
    ArrayStr,
    ArrayObj,
}

impl JoinPrimitive {
    pub const ALL: [JoinPrimitive; 8] = [
        JoinPrimitive::Unary,
        JoinPrimitive::BinaryStr,
        JoinPrimitive::BinaryObj,
        JoinPrimitive::TernaryStr,
        JoinPrimitive::TernaryObj,
        JoinPrimitive::QuaternaryStr,
        JoinPrimitive::ArrayStr,
        JoinPrimitive::ArrayObj,
    ];

    pub const fn member(self) -> SpecialMember {
        match self {
            JoinPrimitive::Unary => SpecialMember::ConcatObject,
            JoinPrimitive::BinaryStr => SpecialMember::ConcatStrStr,
            JoinPrimitive::BinaryObj => SpecialMember::ConcatObjObj,
            JoinPrimitive::TernaryStr => SpecialMember::ConcatStrStrStr,
            JoinPrimitive::TernaryObj => SpecialMember::ConcatObjObjObj,
            JoinPrimitive::QuaternaryStr => SpecialMember::ConcatStrStrStrStr,
            JoinPrimitive::ArrayStr => SpecialMember::ConcatStrArray,
            JoinPrimitive::ArrayObj => SpecialMember::ConcatObjArray,
        }
    }

    pub const fn from_member(member: SpecialMember) -> Option<Self> {
        match member {
            SpecialMember::ConcatObject => Some(JoinPrimitive::Unary),
            SpecialMember::ConcatStrStr => Some(JoinPrimitive::BinaryStr),
            SpecialMember::ConcatObjObj => Some(JoinPrimitive::BinaryObj),
            SpecialMember::ConcatStrStrStr => Some(JoinPrimitive::TernaryStr),
            SpecialMember::ConcatObjObjObj => Some(JoinPrimitive::TernaryObj),
            SpecialMember::ConcatStrStrStrStr => Some(JoinPrimitive::QuaternaryStr),
            SpecialMember::ConcatStrArray => Some(JoinPrimitive::ArrayStr),
            SpecialMember::ConcatObjArray => Some(JoinPrimitive::ArrayObj),
            SpecialMember::ObjectToStr => None,
        }
    }

    /// Only the unary form can produce null: it returns whatever the
    /// operand's `to_str` returns.
    pub const fn can_return_null(self) -> bool {
        matches!(self, JoinPrimitive::Unary)
    }

    /// Array forms take one inline array instead of positional operands.
    pub const fn is_array(self) -> bool {
        matches!(self, JoinPrimitive::ArrayStr | JoinPrimitive::ArrayObj)
    }
}

/// A special member the core library does not define.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("special member `{member}` is missing from the core library")]
pub struct MissingSpecialMember {
    pub member: SpecialMember,
}

/// Special members resolved against one [`Symbols`] registry.
#[derive(Clone, Debug)]
pub struct SpecialMembers {
    methods: [MethodId; SpecialMember::COUNT],
    by_method: FxHashMap<MethodId, SpecialMember>,
}

impl SpecialMembers {
    /// Resolve every special member, failing on the first one that is missing.
    pub fn resolve(
        symbols: &Symbols,
        interner: &StringInterner,
    ) -> Result<Self, MissingSpecialMember> {
        let mut methods = [MethodId::INVALID; SpecialMember::COUNT];
        let mut by_method = FxHashMap::default();

        for member in SpecialMember::ALL {
            let desc = member.descriptor();
            let id = symbols
                .find_method(
                    desc.container,
                    interner.intern(desc.name),
                    desc.is_static,
                    desc.params,
                )
                .filter(|&id| symbols.method(id).return_type == desc.return_type)
                .ok_or(MissingSpecialMember { member })?;
            methods[member.index()] = id;
            by_method.insert(id, member);
        }

        Ok(Self { methods, by_method })
    }

    /// The method implementing `member`.
    #[inline]
    pub fn get(&self, member: SpecialMember) -> MethodId {
        self.methods[member.index()]
    }

    /// Which special member `method` is, if any.
    #[inline]
    pub fn classify(&self, method: MethodId) -> Option<SpecialMember> {
        self.by_method.get(&method).copied()
    }

    /// Which join primitive `method` is, if any.
    pub fn join_primitive(&self, method: MethodId) -> Option<JoinPrimitive> {
        self.classify(method).and_then(JoinPrimitive::from_member)
    }

    #[inline]
    pub fn join_method(&self, primitive: JoinPrimitive) -> MethodId {
        self.get(primitive.member())
    }
}
