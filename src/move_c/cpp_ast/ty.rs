use serde::Serialize;
use std::fmt;
use std::fmt::Formatter;
use std::hash::{DefaultHasher, Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Copy)]
pub struct TyId(u64);

const VOID_TY_ID: u8 = 0x00;
const BOOL_TY_ID: u8 = 0x01;
const INT_TY_ID: u8 = 0x02;
const FLOAT_TY_ID: u8 = 0x03;
const CHAR_TY_ID: u8 = 0x04;
const RECORD_TY_ID: u8 = 0x10;
const POINTER_TY_ID: u8 = 0x20;
const LVALUE_REF_TY_ID: u8 = 0x21;
const RVALUE_REF_TY_ID: u8 = 0x22;
const CONST_TY_ID: u8 = 0x30;

impl TyId {
    pub fn compute_void_ty_id() -> Self {
        let mut hasher = DefaultHasher::new();
        VOID_TY_ID.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_bool_ty_id() -> Self {
        let mut hasher = DefaultHasher::new();
        BOOL_TY_ID.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_int_ty_id() -> Self {
        let mut hasher = DefaultHasher::new();
        INT_TY_ID.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_float_ty_id() -> Self {
        let mut hasher = DefaultHasher::new();
        FLOAT_TY_ID.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_char_ty_id() -> Self {
        let mut hasher = DefaultHasher::new();
        CHAR_TY_ID.hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_record_ty_id(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        (RECORD_TY_ID, name).hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_pointer_ty_id(inner: &TyId) -> Self {
        let mut hasher = DefaultHasher::new();
        (POINTER_TY_ID, inner).hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_lvalue_ref_ty_id(inner: &TyId) -> Self {
        let mut hasher = DefaultHasher::new();
        (LVALUE_REF_TY_ID, inner).hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_rvalue_ref_ty_id(inner: &TyId) -> Self {
        let mut hasher = DefaultHasher::new();
        (RVALUE_REF_TY_ID, inner).hash(&mut hasher);
        Self(hasher.finish())
    }

    pub fn compute_const_ty_id(inner: &TyId) -> Self {
        let mut hasher = DefaultHasher::new();
        (CONST_TY_ID, inner).hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl<'ty> From<&'ty CppTy<'ty>> for TyId {
    fn from(value: &'ty CppTy<'ty>) -> Self {
        match value {
            CppTy::Void(_) => Self::compute_void_ty_id(),
            CppTy::Bool(_) => Self::compute_bool_ty_id(),
            CppTy::Int(_) => Self::compute_int_ty_id(),
            CppTy::Float(_) => Self::compute_float_ty_id(),
            CppTy::Char(_) => Self::compute_char_ty_id(),
            CppTy::Record(ty) => Self::compute_record_ty_id(ty.name),
            CppTy::Pointer(ty) => Self::compute_pointer_ty_id(&TyId::from(ty.inner)),
            CppTy::LvalueRef(ty) => Self::compute_lvalue_ref_ty_id(&TyId::from(ty.inner)),
            CppTy::RvalueRef(ty) => Self::compute_rvalue_ref_ty_id(&TyId::from(ty.inner)),
            CppTy::Const(ty) => Self::compute_const_ty_id(&TyId::from(ty.inner)),
        }
    }
}

/// Constructor inventory entry of a record type.
///
/// The analyzer only distinguishes copy and move constructors; everything
/// else a record declares is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CtorKind {
    Default,
    Copy,
    Move,
    Other,
}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub enum CppTy<'ty> {
    Void(VoidTy),
    Bool(BoolTy),
    Int(IntTy),
    Float(FloatTy),
    Char(CharTy),
    Record(RecordTy<'ty>),
    Pointer(PointerTy<'ty>),
    LvalueRef(LvalueRefTy<'ty>),
    RvalueRef(RvalueRefTy<'ty>),
    Const(ConstTy<'ty>),
}

impl<'ty> CppTy<'ty> {
    /// Strips reference layers, yielding the underlying value type.
    ///
    /// `const T &` yields `const T`; const qualification survives so that
    /// [`CppTy::is_const_qualified`] can still observe it.
    pub fn non_reference(&'ty self) -> &'ty CppTy<'ty> {
        match self {
            CppTy::LvalueRef(ty) => ty.inner.non_reference(),
            CppTy::RvalueRef(ty) => ty.inner.non_reference(),
            _ => self,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, CppTy::LvalueRef(_) | CppTy::RvalueRef(_))
    }

    pub fn is_const_qualified(&self) -> bool {
        matches!(self, CppTy::Const(_))
    }

    /// The record behind this type, if it is one. Const qualification does
    /// not change what a type *is*, so it is peeled here.
    pub fn as_record(&'ty self) -> Option<&'ty RecordTy<'ty>> {
        match self {
            CppTy::Record(record) => Some(record),
            CppTy::Const(ty) => ty.inner.as_record(),
            _ => None,
        }
    }

    pub fn is_record(&'ty self) -> bool {
        self.as_record().is_some()
    }

    /// Walks the record's constructor inventory looking for a move
    /// constructor, declared or implicitly synthesized.
    pub fn has_move_constructor(&'ty self) -> bool {
        match self.as_record() {
            Some(record) => record.ctors.iter().any(|c| matches!(c, CtorKind::Move)),
            None => false,
        }
    }
}

impl fmt::Display for CppTy<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CppTy::Void(_) => write!(f, "void"),
            CppTy::Bool(_) => write!(f, "bool"),
            CppTy::Int(_) => write!(f, "int"),
            CppTy::Float(_) => write!(f, "double"),
            CppTy::Char(_) => write!(f, "char"),
            CppTy::Record(ty) => write!(f, "{}", ty.name),
            CppTy::Pointer(ty) => write!(f, "{} *", ty.inner),
            CppTy::LvalueRef(ty) => write!(f, "{} &", ty.inner),
            CppTy::RvalueRef(ty) => write!(f, "{} &&", ty.inner),
            CppTy::Const(ty) => write!(f, "const {}", ty.inner),
        }
    }
}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct VoidTy {}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct BoolTy {}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct IntTy {}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct FloatTy {}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct CharTy {}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct RecordTy<'ty> {
    pub name: &'ty str,
    pub ctors: Vec<CtorKind>,
}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct PointerTy<'ty> {
    pub inner: &'ty CppTy<'ty>,
}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct LvalueRefTy<'ty> {
    pub inner: &'ty CppTy<'ty>,
}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct RvalueRefTy<'ty> {
    pub inner: &'ty CppTy<'ty>,
}

#[derive(Debug, Clone, Serialize, Eq, Hash, PartialEq)]
pub struct ConstTy<'ty> {
    pub inner: &'ty CppTy<'ty>,
}
