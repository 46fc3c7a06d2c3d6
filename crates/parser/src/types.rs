//! Type universe used by the checker.
//!
//! Types live in a `TypeArena` and are referred to by `TyId`. Structural
//! types are not interned: two `[]int` written in different places get
//! different ids. Named types are unique per declaration.

use smallvec::SmallVec;
use std::ops::Index;

use crate::ast::{ChanDir, Id};

pub type TyId = Id<TypeKind>;

/// Guard against alias cycles (`type A = B; type B = A`).
const MAX_NAMED_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,

    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    pub const ALL: [BasicKind; 25] = [
        Self::Bool,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::String,
        Self::UnsafePointer,
        Self::UntypedBool,
        Self::UntypedInt,
        Self::UntypedRune,
        Self::UntypedFloat,
        Self::UntypedComplex,
        Self::UntypedString,
        Self::UntypedNil,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::UnsafePointer => "unsafe.Pointer",
            Self::UntypedBool => "untyped bool",
            Self::UntypedInt => "untyped int",
            Self::UntypedRune => "untyped rune",
            Self::UntypedFloat => "untyped float",
            Self::UntypedComplex => "untyped complex",
            Self::UntypedString => "untyped string",
            Self::UntypedNil => "untyped nil",
        }
    }

    #[inline]
    pub const fn is_untyped(self) -> bool {
        matches!(
            self,
            Self::UntypedBool
                | Self::UntypedInt
                | Self::UntypedRune
                | Self::UntypedFloat
                | Self::UntypedComplex
                | Self::UntypedString
                | Self::UntypedNil
        )
    }

    /// Type an untyped constant takes when nothing else constrains it.
    pub const fn default_kind(self) -> BasicKind {
        match self {
            Self::UntypedBool => Self::Bool,
            Self::UntypedInt => Self::Int,
            Self::UntypedRune => Self::Int32,
            Self::UntypedFloat => Self::Float64,
            Self::UntypedComplex => Self::Complex128,
            Self::UntypedString => Self::String,
            other => other,
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub name: String,
    /// Signature with `recv` set.
    pub sig: TyId,
    pub ptr_recv: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    pub name: String,
    pub underlying: TyId,
    pub methods: SmallVec<[MethodEntry; 4]>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: TyId,
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMethod {
    pub name: String,
    pub sig: TyId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Basic(BasicKind),
    Named(NamedType),
    Pointer(TyId),
    /// `len` is `None` when the length expression could not be evaluated.
    Array {
        len: Option<u64>,
        elem: TyId,
    },
    Slice(TyId),
    Map {
        key: TyId,
        val: TyId,
    },
    Chan {
        dir: ChanDir,
        elem: TyId,
    },
    Struct {
        fields: SmallVec<[StructField; 4]>,
    },
    Interface {
        methods: SmallVec<[InterfaceMethod; 4]>,
        embeds: SmallVec<[TyId; 2]>,
    },
    Signature {
        recv: Option<TyId>,
        params: Vec<TyId>,
        results: Vec<TyId>,
        variadic: bool,
    },
    /// Multiple results of a call.
    Tuple(Vec<TyId>),
    /// Its underlying type is the constraint, so nothing is known about the
    /// type argument beyond what the constraint says.
    TypeParam {
        name: String,
        constraint: TyId,
    },
    Invalid,
}

#[derive(Debug)]
pub struct TypeArena {
    types: Vec<TypeKind>,
    invalid: TyId,
    error: TyId,
    any: TyId,
    comparable: TyId,
}

impl Default for TypeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeArena {
    pub fn new() -> Self {
        let mut types: Vec<TypeKind> = BasicKind::ALL.iter().map(|&k| TypeKind::Basic(k)).collect();
        let mut push = |t: TypeKind| -> TyId {
            types.push(t);
            Id::from_raw(types.len() as u32 - 1)
        };

        let invalid = push(TypeKind::Invalid);
        let string = Id::from_raw(BasicKind::String.index() as u32);
        let any = push(TypeKind::Interface {
            methods: SmallVec::new(),
            embeds: SmallVec::new(),
        });

        // type error interface { Error() string }
        let error_sig = push(TypeKind::Signature {
            recv: None,
            params: Vec::new(),
            results: vec![string],
            variadic: false,
        });
        let error_iface = push(TypeKind::Interface {
            methods: smallvec::smallvec![InterfaceMethod {
                name: "Error".to_string(),
                sig: error_sig,
            }],
            embeds: SmallVec::new(),
        });
        let error = push(TypeKind::Named(NamedType {
            name: "error".to_string(),
            underlying: error_iface,
            methods: SmallVec::new(),
        }));
        if let TypeKind::Signature { recv, .. } = &mut types[error_sig.to_usize()] {
            *recv = Some(error);
        }
        let comparable = Id::from_raw(types.len() as u32);
        types.push(TypeKind::Named(NamedType {
            name: "comparable".to_string(),
            underlying: any,
            methods: SmallVec::new(),
        }));

        Self {
            types,
            invalid,
            error,
            any,
            comparable,
        }
    }

    #[inline]
    pub fn alloc(&mut self, t: TypeKind) -> TyId {
        let id = Id::from_raw(self.types.len() as u32);
        self.types.push(t);
        id
    }

    #[inline]
    pub fn get(&self, id: TyId) -> &TypeKind {
        &self.types[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: TyId) -> &mut TypeKind {
        &mut self.types[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[inline]
    pub const fn basic(&self, kind: BasicKind) -> TyId {
        Id::from_raw(kind.index() as u32)
    }

    #[inline]
    pub const fn invalid(&self) -> TyId {
        self.invalid
    }

    #[inline]
    pub const fn error_type(&self) -> TyId {
        self.error
    }

    #[inline]
    pub const fn any_type(&self) -> TyId {
        self.any
    }

    #[inline]
    pub const fn comparable_type(&self) -> TyId {
        self.comparable
    }

    #[inline]
    pub fn is_invalid(&self, id: TyId) -> bool {
        matches!(self.get(id), TypeKind::Invalid)
    }

    pub fn pointer_to(&mut self, elem: TyId) -> TyId {
        self.alloc(TypeKind::Pointer(elem))
    }

    /// Strips `Named` layers; a type parameter stands for its constraint.
    /// Alias cycles end in `Invalid`.
    pub fn underlying(&self, mut id: TyId) -> TyId {
        for _ in 0..MAX_NAMED_DEPTH {
            match self.get(id) {
                TypeKind::Named(n) => id = n.underlying,
                TypeKind::TypeParam { constraint, .. } => id = *constraint,
                _ => return id,
            }
        }
        self.invalid
    }

    /// Pointee of a pointer type, looking through `Named` layers.
    pub fn pointer_elem(&self, id: TyId) -> Option<TyId> {
        match self.get(self.underlying(id)) {
            TypeKind::Pointer(elem) => Some(*elem),
            _ => None,
        }
    }

    /// Converts untyped basic kinds to their default types.
    pub fn default_type(&self, id: TyId) -> TyId {
        match self.get(id) {
            TypeKind::Basic(k) if k.is_untyped() && *k != BasicKind::UntypedNil => {
                self.basic(k.default_kind())
            }
            _ => id,
        }
    }

    /// Go-like rendering, mainly for logs and tests.
    pub fn type_string(&self, id: TyId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id, 0);
        out
    }

    fn write_type(&self, out: &mut String, id: TyId, depth: usize) {
        if depth > MAX_NAMED_DEPTH {
            out.push_str("...");
            return;
        }
        match self.get(id) {
            TypeKind::Basic(k) => out.push_str(k.name()),
            TypeKind::Named(n) => out.push_str(&n.name),
            TypeKind::TypeParam { name, .. } => out.push_str(name),
            TypeKind::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Array { len, elem } => {
                match len {
                    Some(n) => out.push_str(&format!("[{n}]")),
                    None => out.push_str("[?]"),
                }
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Map { key, val } => {
                out.push_str("map[");
                self.write_type(out, *key, depth + 1);
                out.push(']');
                self.write_type(out, *val, depth + 1);
            }
            TypeKind::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, *elem, depth + 1);
            }
            TypeKind::Struct { fields } => {
                out.push_str("struct{");
                for (i, f) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !f.embedded {
                        out.push_str(&f.name);
                        out.push(' ');
                    }
                    self.write_type(out, f.ty, depth + 1);
                }
                out.push('}');
            }
            TypeKind::Interface { methods, embeds } => {
                if methods.is_empty() && embeds.is_empty() {
                    out.push_str("interface{}");
                    return;
                }
                out.push_str("interface{");
                let mut first = true;
                for m in methods {
                    if !first {
                        out.push_str("; ");
                    }
                    first = false;
                    out.push_str(&m.name);
                    self.write_signature(out, m.sig, depth + 1);
                }
                for &e in embeds {
                    if !first {
                        out.push_str("; ");
                    }
                    first = false;
                    self.write_type(out, e, depth + 1);
                }
                out.push('}');
            }
            TypeKind::Signature { .. } => {
                out.push_str("func");
                self.write_signature(out, id, depth + 1);
            }
            TypeKind::Tuple(elems) => {
                out.push('(');
                self.write_list(out, elems, depth + 1);
                out.push(')');
            }
            TypeKind::Invalid => out.push_str("invalid type"),
        }
    }

    fn write_signature(&self, out: &mut String, id: TyId, depth: usize) {
        let TypeKind::Signature {
            params,
            results,
            variadic,
            ..
        } = self.get(id)
        else {
            return;
        };
        out.push('(');
        for (i, &p) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if *variadic && i + 1 == params.len() {
                out.push_str("...");
                match self.get(p) {
                    TypeKind::Slice(elem) => self.write_type(out, *elem, depth),
                    _ => self.write_type(out, p, depth),
                }
            } else {
                self.write_type(out, p, depth);
            }
        }
        out.push(')');
        match results.as_slice() {
            [] => {}
            [single] => {
                out.push(' ');
                self.write_type(out, *single, depth);
            }
            many => {
                out.push_str(" (");
                self.write_list(out, many, depth);
                out.push(')');
            }
        }
    }

    fn write_list(&self, out: &mut String, ids: &[TyId], depth: usize) {
        for (i, &t) in ids.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, t, depth);
        }
    }
}

impl Index<TyId> for TypeArena {
    type Output = TypeKind;
    fn index(&self, id: TyId) -> &TypeKind {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basics_are_predeclared() {
        let arena = TypeArena::new();
        let int = arena.basic(BasicKind::Int);
        assert_eq!(arena[int], TypeKind::Basic(BasicKind::Int));
        assert_eq!(arena.type_string(int), "int");
    }

    #[test]
    fn underlying_strips_named_layers() {
        let mut arena = TypeArena::new();
        let int = arena.basic(BasicKind::Int);
        let arr = arena.alloc(TypeKind::Array {
            len: Some(4),
            elem: int,
        });
        let named = arena.alloc(TypeKind::Named(NamedType {
            name: "Quad".into(),
            underlying: arr,
            methods: SmallVec::new(),
        }));
        let ptr = arena.pointer_to(named);

        assert_eq!(arena.underlying(named), arr);
        assert_eq!(arena.pointer_elem(ptr), Some(named));
        assert_eq!(arena.type_string(ptr), "*Quad");
        assert_eq!(arena.type_string(arr), "[4]int");
    }

    #[test]
    fn error_is_a_named_interface() {
        let arena = TypeArena::new();
        let err = arena.error_type();
        let TypeKind::Interface { methods, .. } = arena.get(arena.underlying(err)) else {
            panic!("error should be an interface");
        };
        assert_eq!(methods[0].name, "Error");
        assert_eq!(arena.type_string(methods[0].sig), "func() string");
    }

    #[test]
    fn type_param_underlying_is_its_constraint() {
        let mut arena = TypeArena::new();
        let p = arena.alloc(TypeKind::TypeParam {
            name: "K".into(),
            constraint: arena.comparable_type(),
        });
        let ptr = arena.pointer_to(p);

        assert_eq!(arena.type_string(ptr), "*K");
        assert!(matches!(
            arena.get(arena.underlying(p)),
            TypeKind::Interface { .. }
        ));
    }

    #[test]
    fn untyped_constants_default() {
        let arena = TypeArena::new();
        let rune = arena.basic(BasicKind::UntypedRune);
        assert_eq!(arena.default_type(rune), arena.basic(BasicKind::Int32));
        let nil = arena.basic(BasicKind::UntypedNil);
        assert_eq!(arena.default_type(nil), nil);
    }
}
