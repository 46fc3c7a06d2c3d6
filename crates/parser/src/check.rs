//! Single-file, best-effort type checker.
//!
//! Resolves enough of Go's type system to answer "what is the type of this
//! expression" and "what does this selector select" for analysis passes.
//! Anything it cannot resolve (imported packages, unknown names) is left out
//! of `TypesInfo`; checking never fails.
//!
//! Type parameters are opaque: a `TypeParam` stands for its constraint, and
//! every instance of a generic type is the generic type itself, with no
//! substitution of type arguments.

use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use tracing::{debug, trace};

use crate::ast::*;
use crate::types::{
    BasicKind, InterfaceMethod, MethodEntry, NamedType, StructField, TyId, TypeArena, TypeKind,
};
use crate::ParsedFile;

const MAX_EMBED_DEPTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Field,
    Method,
}

/// What a selector expression `x.f` resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: SelectionKind,
    /// Field type, or the method signature including its receiver.
    pub ty: TyId,
    /// Whether reaching `f` went through a pointer.
    pub indirect: bool,
}

/// Type information for one file.
#[derive(Debug, Default)]
pub struct TypesInfo {
    pub arena: TypeArena,
    types: FxHashMap<ExprId, TyId>,
    selections: FxHashMap<ExprId, Selection>,
}

impl TypesInfo {
    #[inline]
    pub fn type_of(&self, e: ExprId) -> Option<TyId> {
        self.types.get(&e).copied()
    }

    #[inline]
    pub fn selection(&self, e: ExprId) -> Option<Selection> {
        self.selections.get(&e).copied()
    }

    #[inline]
    pub fn underlying(&self, t: TyId) -> TyId {
        self.arena.underlying(t)
    }

    #[inline]
    pub fn kind(&self, t: TyId) -> &TypeKind {
        self.arena.get(t)
    }

    pub fn type_string(&self, t: TyId) -> String {
        self.arena.type_string(t)
    }

    /// Number of expressions with a recorded type.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Type-checks `file` and returns whatever could be resolved.
#[tracing::instrument(level = "debug", skip_all, fields(decls = file.file.decls.len()))]
pub fn check_file(file: &ParsedFile) -> TypesInfo {
    let mut checker = Checker::new(file);
    checker.check_package();
    let info = checker.info;
    debug!(
        exprs = info.types.len(),
        selections = info.selections.len(),
        "type check finished"
    );
    info
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Append,
    Cap,
    Clear,
    Close,
    Complex,
    Copy,
    Delete,
    Imag,
    Len,
    Make,
    Max,
    Min,
    New,
    Panic,
    Print,
    Println,
    Real,
    Recover,
}

#[derive(Debug, Clone, Copy)]
enum Object {
    Var(TyId),
    Const(TyId),
    TypeName(TyId),
    Func(TyId),
    Builtin(Builtin),
    Package,
    Nil,
}

enum Member {
    Field(TyId),
    Method(TyId),
    InterfaceMethod { sig: TyId, recv: TyId },
}

#[derive(Default)]
struct SigParts {
    params: Vec<(Option<IdentName>, TyId)>,
    results: Vec<(Option<IdentName>, TyId)>,
    variadic: bool,
}

type Scope = FxHashMap<Symbol, Object>;

struct Checker<'a> {
    file: &'a ParsedFile,
    ast: &'a AstArena,
    info: TypesInfo,
    /// Innermost scope last; index 0 is the package scope.
    scopes: Vec<Scope>,
    const_vals: FxHashMap<Symbol, u64>,
    /// Type parameters of each generic named type, in declaration order.
    generic_params: FxHashMap<TyId, Vec<TyId>>,
}

impl<'a> Checker<'a> {
    fn new(file: &'a ParsedFile) -> Self {
        Self {
            file,
            ast: &file.arena,
            info: TypesInfo::default(),
            scopes: vec![Scope::default()],
            const_vals: FxHashMap::default(),
            generic_params: FxHashMap::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Scopes
    // -------------------------------------------------------------------------

    fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    fn pop_scope(&mut self) {
        self.take_scope();
    }

    /// Pops the innermost scope so it can be pushed again later.
    fn take_scope(&mut self) -> Scope {
        if self.scopes.len() > 1 {
            self.scopes.pop().unwrap_or_default()
        } else {
            Scope::default()
        }
    }

    fn declare(&mut self, name: IdentName, obj: Object) {
        if self.file.name(name.sym) == "_" {
            return;
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.sym, obj);
        }
    }

    fn declared_in_current(&self, sym: Symbol) -> bool {
        self.scopes.last().is_some_and(|s| s.contains_key(&sym))
    }

    fn lookup(&self, sym: Symbol) -> Option<Object> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.get(&sym).copied())
            .or_else(|| self.universe(self.file.name(sym)))
    }

    fn universe(&self, name: &str) -> Option<Object> {
        let ta = &self.info.arena;
        let basic = |k| Some(Object::TypeName(ta.basic(k)));
        match name {
            "bool" => basic(BasicKind::Bool),
            "int" => basic(BasicKind::Int),
            "int8" => basic(BasicKind::Int8),
            "int16" => basic(BasicKind::Int16),
            "int32" | "rune" => basic(BasicKind::Int32),
            "int64" => basic(BasicKind::Int64),
            "uint" => basic(BasicKind::Uint),
            "uint8" | "byte" => basic(BasicKind::Uint8),
            "uint16" => basic(BasicKind::Uint16),
            "uint32" => basic(BasicKind::Uint32),
            "uint64" => basic(BasicKind::Uint64),
            "uintptr" => basic(BasicKind::Uintptr),
            "float32" => basic(BasicKind::Float32),
            "float64" => basic(BasicKind::Float64),
            "complex64" => basic(BasicKind::Complex64),
            "complex128" => basic(BasicKind::Complex128),
            "string" => basic(BasicKind::String),
            "error" => Some(Object::TypeName(ta.error_type())),
            "any" => Some(Object::TypeName(ta.any_type())),
            "comparable" => Some(Object::TypeName(ta.comparable_type())),
            "true" | "false" => Some(Object::Const(ta.basic(BasicKind::UntypedBool))),
            "iota" => Some(Object::Const(ta.basic(BasicKind::UntypedInt))),
            "nil" => Some(Object::Nil),
            "append" => Some(Object::Builtin(Builtin::Append)),
            "cap" => Some(Object::Builtin(Builtin::Cap)),
            "clear" => Some(Object::Builtin(Builtin::Clear)),
            "close" => Some(Object::Builtin(Builtin::Close)),
            "complex" => Some(Object::Builtin(Builtin::Complex)),
            "copy" => Some(Object::Builtin(Builtin::Copy)),
            "delete" => Some(Object::Builtin(Builtin::Delete)),
            "imag" => Some(Object::Builtin(Builtin::Imag)),
            "len" => Some(Object::Builtin(Builtin::Len)),
            "make" => Some(Object::Builtin(Builtin::Make)),
            "max" => Some(Object::Builtin(Builtin::Max)),
            "min" => Some(Object::Builtin(Builtin::Min)),
            "new" => Some(Object::Builtin(Builtin::New)),
            "panic" => Some(Object::Builtin(Builtin::Panic)),
            "print" => Some(Object::Builtin(Builtin::Print)),
            "println" => Some(Object::Builtin(Builtin::Println)),
            "real" => Some(Object::Builtin(Builtin::Real)),
            "recover" => Some(Object::Builtin(Builtin::Recover)),
            _ => None,
        }
    }

    #[inline]
    fn invalid(&self) -> TyId {
        self.info.arena.invalid()
    }

    #[inline]
    fn basic(&self, kind: BasicKind) -> TyId {
        self.info.arena.basic(kind)
    }

    fn set_underlying(&mut self, named: TyId, underlying: TyId) {
        if let TypeKind::Named(n) = self.info.arena.get_mut(named) {
            n.underlying = underlying;
        }
    }

    // -------------------------------------------------------------------------
    // Package level
    // -------------------------------------------------------------------------

    fn check_package(&mut self) {
        let ast = self.ast;
        let decls = ast.top_decls(self.file.file.decls);
        let gen_decls: Vec<GenDecl> = decls
            .iter()
            .filter_map(|d| match d {
                TopLevelDecl::Decl(id) => match ast.decls[*id] {
                    Decl::Gen(g) => Some(g),
                    Decl::Bad => None,
                },
                TopLevelDecl::Func(_) => None,
            })
            .collect();

        // Imports only bind package names; their members stay unresolved.
        for gd in gen_decls.iter().filter(|g| g.kind == GenDeclKind::Import) {
            for spec in ast.specs_list(gd.specs) {
                if let Spec::Import(imp) = spec {
                    self.declare_import(imp);
                }
            }
        }

        // Types: declare every name first so declarations may refer to
        // each other in any order, then resolve.
        let mut type_specs: Vec<(TypeSpec, Option<TyId>)> = Vec::new();
        for gd in gen_decls.iter().filter(|g| g.kind == GenDeclKind::Type) {
            for spec in ast.specs_list(gd.specs) {
                let Spec::Type(ts) = *spec else { continue };
                if ts.is_alias() {
                    type_specs.push((ts, None));
                } else {
                    let named = self.new_named(ts.name);
                    self.declare(ts.name, Object::TypeName(named));
                    type_specs.push((ts, Some(named)));
                }
            }
        }
        // Two rounds so an alias may refer to an alias declared after it.
        for _ in 0..2 {
            for (ts, _) in type_specs.iter().filter(|(_, n)| n.is_none()) {
                self.push_scope();
                self.declare_type_params(ts.type_params);
                let t = self.resolve_type(ts.typ);
                self.pop_scope();
                self.declare(ts.name, Object::TypeName(t));
            }
        }
        for &(ts, named) in &type_specs {
            if let Some(named) = named {
                self.push_scope();
                let params = self.declare_type_params(ts.type_params);
                let u = self.resolve_type(ts.typ);
                self.pop_scope();
                if !params.is_empty() {
                    self.generic_params.insert(named, params);
                }
                self.set_underlying(named, u);
            }
        }
        for &(_, named) in &type_specs {
            if let Some(named) = named {
                let u = self.info.arena.underlying(named);
                self.set_underlying(named, u);
            }
        }

        // Functions and methods. Type parameters live in a scope of their
        // own that is pushed again for the body.
        let mut funcs = Vec::new();
        for d in decls {
            let TopLevelDecl::Func(fid) = *d else { continue };
            let f = ast.funcs[fid];
            self.push_scope();
            self.declare_type_params(f.type_params);
            if let Some(r) = f.recv {
                self.declare_receiver_type_params(r.typ);
            }
            let parts = self.sig_parts(f.signature);
            let (recv, sig) = match f.recv {
                Some(r) => (Some(self.declare_method(r, f.name, &parts)), None),
                None => (None, Some(self.make_signature(&parts, None))),
            };
            let type_scope = self.take_scope();
            // `init` is not declared and cannot be referred to.
            if let Some(sig) = sig.filter(|_| self.file.name(f.name.sym) != "init") {
                self.declare(f.name, Object::Func(sig));
            }
            funcs.push((f, parts, recv, type_scope));
        }

        // Package-level vars and consts.
        for gd in gen_decls
            .iter()
            .filter(|g| matches!(g.kind, GenDeclKind::Var | GenDeclKind::Const))
        {
            self.gen_decl(gd);
        }

        // Bodies.
        for (f, parts, recv, type_scope) in funcs {
            let Some(body) = f.body else { continue };
            self.scopes.push(type_scope);
            self.push_scope();
            if let Some((Some(name), ty)) = recv {
                self.declare(name, Object::Var(ty));
            }
            self.declare_sig_vars(&parts);
            self.stmt_list(body.stmts);
            self.pop_scope();
            self.pop_scope();
        }
    }

    /// Declares each type parameter in the current scope, in order, so a
    /// constraint may mention the parameters before it.
    fn declare_type_params(&mut self, tp: Option<TypeParamsId>) -> Vec<TyId> {
        let Some(tp) = tp else {
            return Vec::new();
        };
        let ast = self.ast;
        let mut out = Vec::new();
        for &d in ast.type_param_decl_ids(ast.type_params[tp].params) {
            let decl = ast.type_param_decls[d];
            let constraint = self.constraint(decl.constraint);
            for &name in ast.ident_names(decl.names) {
                let id = self.new_type_param(name, constraint);
                self.declare(name, Object::TypeName(id));
                out.push(id);
            }
        }
        out
    }

    /// `func (l *List[T]) ...` binds `T` for the method, constrained like the
    /// parameter in the same position of `List`.
    fn declare_receiver_type_params(&mut self, t: TypeId) {
        let ast = self.ast;
        let (base, args) = match ast.types[t] {
            Type::Pointer { elem, .. } | Type::Paren { typ: elem, .. } => {
                return self.declare_receiver_type_params(elem)
            }
            Type::Named {
                pkg: None,
                name,
                args,
            } => (name, args),
            _ => return,
        };
        let decl_params = match self.lookup(base.sym) {
            Some(Object::TypeName(base)) => self.generic_params.get(&base).cloned(),
            _ => None,
        }
        .unwrap_or_default();

        for (i, &arg) in ast.type_ids_list(args).iter().enumerate() {
            let Type::Named {
                pkg: None, name, ..
            } = ast.types[arg]
            else {
                continue;
            };
            let constraint = match decl_params.get(i).map(|&p| self.info.arena.get(p)) {
                Some(TypeKind::TypeParam { constraint, .. }) => *constraint,
                _ => self.info.arena.any_type(),
            };
            let id = self.new_type_param(name, constraint);
            self.declare(name, Object::TypeName(id));
        }
    }

    fn new_type_param(&mut self, name: IdentName, constraint: TyId) -> TyId {
        let name = self.file.name(name.sym).to_string();
        self.info
            .arena
            .alloc(TypeKind::TypeParam { name, constraint })
    }

    /// An interface constraint is used as is; a type set such as
    /// `~int | string` becomes an interface embedding its terms.
    fn constraint(&mut self, elem: TypeElem) -> TyId {
        let ast = self.ast;
        let terms = ast.type_terms(elem.terms);
        if let [TypeTerm::Type(t)] = terms {
            let t = self.resolve_type(*t);
            let ta = &self.info.arena;
            if matches!(ta.get(ta.underlying(t)), TypeKind::Interface { .. }) {
                return t;
            }
        }
        let embeds = terms.iter().map(|term| self.resolve_type(term.typ())).collect();
        self.info.arena.alloc(TypeKind::Interface {
            methods: SmallVec::new(),
            embeds,
        })
    }

    fn declare_import(&mut self, imp: &ImportSpec) {
        match imp.name {
            Some(ImportName::Name(name)) => self.declare(name, Object::Package),
            Some(ImportName::Dot(_) | ImportName::Blank(_)) => {}
            None => {
                let path = self.file.text(imp.path.raw).trim_matches(|c| c == '"' || c == '`');
                let last = path.rsplit('/').next().unwrap_or(path);
                // Only names already present in the file can ever be looked up.
                if let Some(sym) = self.file.interner.get(last) {
                    self.declare(
                        IdentName {
                            sym,
                            pos: imp.path.raw,
                        },
                        Object::Package,
                    );
                }
            }
        }
    }

    fn new_named(&mut self, name: IdentName) -> TyId {
        let invalid = self.invalid();
        let name = self.file.name(name.sym).to_string();
        self.info.arena.alloc(TypeKind::Named(NamedType {
            name,
            underlying: invalid,
            methods: SmallVec::new(),
        }))
    }

    /// Attaches a method to its receiver's base type. Returns the receiver
    /// variable for the body scope.
    fn declare_method(
        &mut self,
        recv: Receiver,
        name: IdentName,
        parts: &SigParts,
    ) -> (Option<IdentName>, TyId) {
        let recv_ty = self.resolve_type(recv.typ);
        let (base, ptr_recv) = match self.info.arena.get(recv_ty) {
            TypeKind::Pointer(elem) => (*elem, true),
            _ => (recv_ty, false),
        };
        let sig = self.make_signature(parts, Some(recv_ty));
        let method_name = self.file.name(name.sym).to_string();
        match self.info.arena.get_mut(base) {
            TypeKind::Named(named) => named.methods.push(MethodEntry {
                name: method_name,
                sig,
                ptr_recv,
            }),
            _ => debug!(method = %method_name, "receiver base is not a local named type"),
        }
        (recv.name, recv_ty)
    }

    fn declare_sig_vars(&mut self, parts: &SigParts) {
        for &(name, ty) in parts.params.iter().chain(&parts.results) {
            if let Some(name) = name {
                self.declare(name, Object::Var(ty));
            }
        }
    }

    // -------------------------------------------------------------------------
    // Declarations in any scope
    // -------------------------------------------------------------------------

    fn gen_decl(&mut self, gd: &GenDecl) {
        let ast = self.ast;
        let mut last_const = Vec::new();
        for spec in ast.specs_list(gd.specs) {
            match *spec {
                Spec::Value(vs) => self.value_spec(gd.kind, vs, &mut last_const),
                Spec::Type(ts) => self.local_type_spec(ts),
                Spec::Import(_) => {}
            }
        }
    }

    fn value_spec(&mut self, kind: GenDeclKind, vs: ValueSpec, last_const: &mut Vec<TyId>) {
        let ast = self.ast;
        let names = ast.ident_names(vs.names);
        let is_const = kind == GenDeclKind::Const;
        let explicit = vs.typ.map(|t| self.resolve_type(t));
        let invalid = self.invalid();

        let types = if vs.values.is_empty() {
            match explicit {
                Some(t) => vec![t; names.len()],
                // Implicit repetition of the previous const spec.
                None if is_const => last_const.clone(),
                None => vec![invalid; names.len()],
            }
        } else {
            let values = self.value_types(vs.values, names.len());
            match explicit {
                Some(t) => vec![t; names.len()],
                None => values,
            }
        };
        if is_const && !vs.values.is_empty() {
            last_const.clone_from(&types);
        }

        let values = ast.exprs_list(vs.values);
        for (i, &name) in names.iter().enumerate() {
            let ty = types.get(i).copied().unwrap_or(invalid);
            let obj = if is_const {
                if let Some(v) = values.get(i).and_then(|&e| self.const_int(e)) {
                    self.const_vals.insert(name.sym, v);
                }
                Object::Const(ty)
            } else {
                Object::Var(self.info.arena.default_type(ty))
            };
            self.declare(name, obj);
        }
    }

    fn local_type_spec(&mut self, ts: TypeSpec) {
        if ts.is_alias() {
            let t = self.resolve_type(ts.typ);
            self.declare(ts.name, Object::TypeName(t));
            return;
        }
        let named = self.new_named(ts.name);
        self.declare(ts.name, Object::TypeName(named));
        let u = self.resolve_type(ts.typ);
        self.set_underlying(named, u);
        let u = self.info.arena.underlying(named);
        self.set_underlying(named, u);
    }

    /// Types of the right-hand side of a declaration or assignment with
    /// `n` names, expanding tuples and comma-ok forms.
    fn value_types(&mut self, values: ListRef<ExprId>, n: usize) -> Vec<TyId> {
        let ast = self.ast;
        let exprs = ast.exprs_list(values);
        if let [single] = exprs {
            if n > 1 {
                let t = self.expr(*single);
                if let TypeKind::Tuple(ts) = self.info.arena.get(t) {
                    return ts.clone();
                }
                if n == 2 && self.is_comma_ok(*single) {
                    return vec![t, self.basic(BasicKind::Bool)];
                }
                return vec![t; n];
            }
        }
        exprs.iter().map(|&e| self.expr(e)).collect()
    }

    fn is_comma_ok(&self, e: ExprId) -> bool {
        match self.ast.exprs[e] {
            Expr::TypeAssert { .. } => true,
            Expr::Unary {
                op: UnaryOp::Recv, ..
            } => true,
            Expr::Index { expr, .. } => self.info.type_of(expr).is_some_and(|t| {
                matches!(self.info.arena.get(self.info.arena.underlying(t)), TypeKind::Map { .. })
            }),
            Expr::Paren { expr, .. } => self.is_comma_ok(expr),
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Types
    // -------------------------------------------------------------------------

    fn resolve_type(&mut self, t: TypeId) -> TyId {
        let ast = self.ast;
        match ast.types[t] {
            // Instances resolve to the generic type; arguments are ignored.
            Type::Named {
                pkg: Some(pkg),
                name,
                ..
            } => {
                trace!(
                    pkg = self.file.name(pkg.sym),
                    name = self.file.name(name.sym),
                    "qualified type left unresolved"
                );
                self.invalid()
            }
            Type::Named {
                pkg: None, name, ..
            } => match self.lookup(name.sym) {
                Some(Object::TypeName(id)) => id,
                _ => {
                    debug!(name = self.file.name(name.sym), "unknown type name");
                    self.invalid()
                }
            },
            Type::Pointer { elem, .. } => {
                let elem = self.resolve_type(elem);
                self.info.arena.pointer_to(elem)
            }
            Type::Array { len, elem, .. } => {
                let len = match len {
                    ArrayLen::Expr(e) => self.const_int(e),
                    ArrayLen::Ellipsis(_) => None,
                };
                let elem = self.resolve_type(elem);
                self.info.arena.alloc(TypeKind::Array { len, elem })
            }
            Type::Slice { elem, .. } => {
                let elem = self.resolve_type(elem);
                self.info.arena.alloc(TypeKind::Slice(elem))
            }
            Type::Map { key, val, .. } => {
                let key = self.resolve_type(key);
                let val = self.resolve_type(val);
                self.info.arena.alloc(TypeKind::Map { key, val })
            }
            Type::Chan { dir, elem, .. } => {
                let elem = self.resolve_type(elem);
                self.info.arena.alloc(TypeKind::Chan { dir, elem })
            }
            Type::Struct { fields, .. } => {
                let mut out: SmallVec<[StructField; 4]> = SmallVec::new();
                for &fid in ast.fields_list(fields) {
                    let f = ast.fields[fid];
                    let ty = self.resolve_type(f.typ);
                    let names = ast.ident_names(f.names);
                    if f.is_embed || names.is_empty() {
                        out.push(StructField {
                            name: self.embedded_name(f.typ),
                            ty,
                            embedded: true,
                        });
                    } else {
                        out.extend(names.iter().map(|n| StructField {
                            name: self.file.name(n.sym).to_string(),
                            ty,
                            embedded: false,
                        }));
                    }
                }
                self.info.arena.alloc(TypeKind::Struct { fields: out })
            }
            Type::Interface { elems, .. } => {
                let mut methods: SmallVec<[InterfaceMethod; 4]> = SmallVec::new();
                let mut embeds: SmallVec<[TyId; 2]> = SmallVec::new();
                for elem in ast.interface_elems(elems) {
                    match *elem {
                        InterfaceElem::Method { name, sig } => {
                            let parts = self.sig_parts(sig);
                            let sig = self.make_signature(&parts, None);
                            methods.push(InterfaceMethod {
                                name: self.file.name(name.sym).to_string(),
                                sig,
                            });
                        }
                        InterfaceElem::TypeElem(te) => {
                            for term in ast.type_terms(te.terms) {
                                embeds.push(self.resolve_type(term.typ()));
                            }
                        }
                    }
                }
                self.info
                    .arena
                    .alloc(TypeKind::Interface { methods, embeds })
            }
            Type::Func { sig, .. } => {
                let parts = self.sig_parts(sig);
                self.make_signature(&parts, None)
            }
            Type::Paren { typ, .. } => self.resolve_type(typ),
            Type::Bad(_) => self.invalid(),
        }
    }

    fn embedded_name(&self, t: TypeId) -> String {
        match self.ast.types[t] {
            Type::Named { name, .. } => self.file.name(name.sym).to_string(),
            Type::Pointer { elem, .. } | Type::Paren { typ: elem, .. } => self.embedded_name(elem),
            _ => String::new(),
        }
    }

    fn sig_parts(&mut self, sig: SignatureId) -> SigParts {
        let s = self.ast.signatures[sig];
        let (params, variadic) = self.field_list_parts(s.params);
        let results = match s.results {
            None => Vec::new(),
            Some(Results::Params(list)) => self.field_list_parts(list).0,
            Some(Results::Type(t)) => vec![(None, self.resolve_type(t))],
        };
        SigParts {
            params,
            results,
            variadic,
        }
    }

    fn field_list_parts(&mut self, list: FieldList) -> (Vec<(Option<IdentName>, TyId)>, bool) {
        let ast = self.ast;
        let mut out = Vec::new();
        let mut variadic = false;
        for &fid in ast.fields_list(list.fields) {
            let f = ast.fields[fid];
            let mut ty = self.resolve_type(f.typ);
            if f.ellipsis_pos.is_some() {
                ty = self.info.arena.alloc(TypeKind::Slice(ty));
                variadic = true;
            }
            let names = ast.ident_names(f.names);
            if names.is_empty() {
                out.push((None, ty));
            } else {
                out.extend(names.iter().map(|&n| (Some(n), ty)));
            }
        }
        (out, variadic)
    }

    fn make_signature(&mut self, parts: &SigParts, recv: Option<TyId>) -> TyId {
        self.info.arena.alloc(TypeKind::Signature {
            recv,
            params: parts.params.iter().map(|p| p.1).collect(),
            results: parts.results.iter().map(|r| r.1).collect(),
            variadic: parts.variadic,
        })
    }

    /// Evaluates integer constant expressions used as array lengths.
    fn const_int(&self, e: ExprId) -> Option<u64> {
        match self.ast.exprs[e] {
            Expr::BasicLit(BasicLit {
                kind: BasicLitKind::Int,
                raw,
            }) => parse_int_lit(self.file.text(raw)),
            Expr::Paren { expr, .. } => self.const_int(expr),
            Expr::Ident(sym) => self.const_vals.get(&sym).copied(),
            Expr::Binary {
                left, op, right, ..
            } => {
                let (l, r) = (self.const_int(left)?, self.const_int(right)?);
                match op {
                    BinaryOp::Add => l.checked_add(r),
                    BinaryOp::Sub => l.checked_sub(r),
                    BinaryOp::Mul => l.checked_mul(r),
                    BinaryOp::Div => l.checked_div(r),
                    BinaryOp::Mod => l.checked_rem(r),
                    BinaryOp::Shl => u32::try_from(r).ok().and_then(|r| l.checked_shl(r)),
                    BinaryOp::Shr => u32::try_from(r).ok().and_then(|r| l.checked_shr(r)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Resolves `e` as a type if it denotes one (`T`, `[]T`, `(*T)`).
    fn type_expr(&mut self, e: ExprId) -> Option<TyId> {
        let t = match self.ast.exprs[e] {
            Expr::Ident(sym) => match self.lookup(sym) {
                Some(Object::TypeName(t)) => t,
                _ => return None,
            },
            Expr::Type(t) => self.resolve_type(t),
            Expr::Paren { expr, .. } => self.type_expr(expr)?,
            Expr::Index { expr, .. } | Expr::Instantiate { expr, .. } => self.type_expr(expr)?,
            Expr::Unary {
                op: UnaryOp::Deref,
                expr,
                ..
            } => {
                let elem = self.type_expr(expr)?;
                self.info.arena.pointer_to(elem)
            }
            _ => return None,
        };
        self.record(e, t);
        Some(t)
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn block(&mut self, b: Block) {
        self.push_scope();
        self.stmt_list(b.stmts);
        self.pop_scope();
    }

    fn stmt_list(&mut self, stmts: ListRef<StmtId>) {
        let ast = self.ast;
        for &s in ast.stmts_list(stmts) {
            self.stmt(s);
        }
    }

    fn stmt(&mut self, s: StmtId) {
        let ast = self.ast;
        match ast.stmts[s] {
            Stmt::Simple(id) => self.simple_stmt(id),
            Stmt::Decl(d) => {
                if let Decl::Gen(gd) = ast.decls[d] {
                    self.gen_decl(&gd);
                }
            }
            Stmt::Labeled { stmt, .. } => self.stmt(stmt),
            Stmt::Go { call, .. } | Stmt::Defer { call, .. } => {
                self.expr(call);
            }
            Stmt::Return { results, .. } => self.exprs(results),
            Stmt::Branch(_) | Stmt::Bad(_) => {}
            Stmt::Block(b) => self.block(b),
            Stmt::If {
                init,
                cond,
                then_block,
                else_stmt,
                ..
            } => {
                self.push_scope();
                if let Some(init) = init {
                    self.simple_stmt(init);
                }
                self.expr(cond);
                self.block(then_block);
                if let Some(else_stmt) = else_stmt {
                    self.stmt(else_stmt);
                }
                self.pop_scope();
            }
            Stmt::For { kind, block, .. } => {
                self.push_scope();
                match kind {
                    ForKind::Infinite => {}
                    ForKind::Cond(cond) => {
                        self.expr(cond);
                    }
                    ForKind::ForClause { init, cond, post } => {
                        if let Some(init) = init {
                            self.simple_stmt(init);
                        }
                        if let Some(cond) = cond {
                            self.expr(cond);
                        }
                        if let Some(post) = post {
                            self.simple_stmt(post);
                        }
                    }
                    ForKind::Range { lhs, expr, .. } => self.range_clause(lhs, expr),
                }
                self.block(block);
                self.pop_scope();
            }
            Stmt::Switch {
                init,
                tag,
                clauses,
                ..
            } => {
                self.push_scope();
                if let Some(init) = init {
                    self.simple_stmt(init);
                }
                if let Some(tag) = tag {
                    self.expr(tag);
                }
                for &cid in ast.switch_clause_ids(clauses) {
                    let clause = ast.switch_clauses[cid];
                    self.exprs(clause.items);
                    self.push_scope();
                    self.stmt_list(clause.stmts);
                    self.pop_scope();
                }
                self.pop_scope();
            }
            Stmt::TypeSwitch {
                init,
                bind,
                x,
                clauses,
                ..
            } => {
                self.push_scope();
                if let Some(init) = init {
                    self.simple_stmt(init);
                }
                let tx = self.expr(x);
                for &cid in ast.switch_clause_ids(clauses) {
                    let clause = ast.switch_clauses[cid];
                    let items: SmallVec<[Option<TyId>; 2]> = ast
                        .exprs_list(clause.items)
                        .iter()
                        .map(|&item| self.type_expr(item))
                        .collect();
                    self.push_scope();
                    if let Some(bind) = bind {
                        let ty = match items.as_slice() {
                            [Some(t)] => *t,
                            _ => tx,
                        };
                        self.declare(bind, Object::Var(ty));
                    }
                    self.stmt_list(clause.stmts);
                    self.pop_scope();
                }
                self.pop_scope();
            }
            Stmt::Select { clauses, .. } => {
                for &cid in ast.comm_clause_ids(clauses) {
                    let clause = ast.comm_clauses[cid];
                    self.push_scope();
                    if let Some(comm) = clause.comm {
                        self.simple_stmt(comm);
                    }
                    self.stmt_list(clause.stmts);
                    self.pop_scope();
                }
            }
        }
    }

    fn simple_stmt(&mut self, id: SimpleStmtId) {
        let ast = self.ast;
        match ast.simple_stmts[id] {
            SimpleStmt::Empty(_) => {}
            SimpleStmt::Expr(e) | SimpleStmt::IncDec { expr: e, .. } => {
                self.expr(e);
            }
            SimpleStmt::Send { chan, value, .. } => {
                self.expr(chan);
                self.expr(value);
            }
            SimpleStmt::Assign { lhs, rhs, .. } => {
                self.exprs(lhs);
                self.exprs(rhs);
            }
            SimpleStmt::ShortVarDecl { names, values, .. } => {
                let names = ast.ident_names(names);
                let types = self.value_types(values, names.len());
                let invalid = self.invalid();
                for (i, &name) in names.iter().enumerate() {
                    if self.declared_in_current(name.sym) {
                        continue;
                    }
                    let ty = types.get(i).copied().unwrap_or(invalid);
                    let ty = self.info.arena.default_type(ty);
                    self.declare(name, Object::Var(ty));
                }
            }
        }
    }

    fn range_clause(&mut self, lhs: Option<RangeLhs>, x: ExprId) {
        let tx = self.expr(x);
        let ta = &self.info.arena;
        let int = ta.basic(BasicKind::Int);
        let invalid = ta.invalid();
        let mut u = ta.underlying(tx);
        if let TypeKind::Pointer(elem) = ta.get(u) {
            u = ta.underlying(*elem);
        }
        let (key, val) = match ta.get(u) {
            TypeKind::Basic(BasicKind::String | BasicKind::UntypedString) => {
                (int, ta.basic(BasicKind::Int32))
            }
            TypeKind::Basic(_) => (ta.default_type(tx), invalid),
            TypeKind::Array { elem, .. } | TypeKind::Slice(elem) => (int, *elem),
            TypeKind::Map { key, val } => (*key, *val),
            TypeKind::Chan { elem, .. } => (*elem, invalid),
            _ => (invalid, invalid),
        };
        match lhs {
            Some(RangeLhs::Def { idents, .. }) => {
                let ast = self.ast;
                for (&name, ty) in ast.ident_names(idents).iter().zip([key, val]) {
                    self.declare(name, Object::Var(ty));
                }
            }
            Some(RangeLhs::Assign { exprs, .. }) => self.exprs(exprs),
            None => {}
        }
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn exprs(&mut self, list: ListRef<ExprId>) {
        let ast = self.ast;
        for &e in ast.exprs_list(list) {
            self.expr(e);
        }
    }

    fn record(&mut self, e: ExprId, t: TyId) {
        if !self.info.arena.is_invalid(t) {
            self.info.types.insert(e, t);
        }
    }

    /// Checks `e` and returns its type, `Invalid` when unknown.
    fn expr(&mut self, e: ExprId) -> TyId {
        let t = self.expr_inner(e);
        self.record(e, t);
        t
    }

    fn expr_inner(&mut self, e: ExprId) -> TyId {
        let ast = self.ast;
        match ast.exprs[e] {
            Expr::Ident(sym) => match self.lookup(sym) {
                Some(
                    Object::Var(t) | Object::Const(t) | Object::Func(t) | Object::TypeName(t),
                ) => t,
                Some(Object::Nil) => self.basic(BasicKind::UntypedNil),
                Some(Object::Builtin(_) | Object::Package) => self.invalid(),
                None => {
                    trace!(name = self.file.name(sym), "unresolved identifier");
                    self.invalid()
                }
            },
            Expr::BasicLit(lit) => self.basic(match lit.kind {
                BasicLitKind::Int => BasicKind::UntypedInt,
                BasicLitKind::Float => BasicKind::UntypedFloat,
                BasicLitKind::Imag => BasicKind::UntypedComplex,
                BasicLitKind::Rune => BasicKind::UntypedRune,
                BasicLitKind::String => BasicKind::UntypedString,
            }),
            Expr::FuncLit { sig, body, .. } => {
                let parts = self.sig_parts(sig);
                let t = self.make_signature(&parts, None);
                self.push_scope();
                self.declare_sig_vars(&parts);
                self.stmt_list(body.stmts);
                self.pop_scope();
                t
            }
            Expr::CompositeLit { typ, lit } => {
                let mut t = self.resolve_type(typ);
                if let Type::Array {
                    len: ArrayLen::Ellipsis(_),
                    ..
                } = ast.types[typ]
                {
                    let elem = match self.info.arena.get(t) {
                        TypeKind::Array { elem, .. } => Some(*elem),
                        _ => None,
                    };
                    if let Some(elem) = elem {
                        let len = Some(lit.elements.len() as u64);
                        t = self.info.arena.alloc(TypeKind::Array { len, elem });
                    }
                }
                self.literal(lit, t);
                t
            }
            Expr::Paren { expr, .. } => self.expr(expr),
            Expr::Selector { expr: x, ident, .. } => self.selector(e, x, ident),
            Expr::Index { expr: x, index, .. } => {
                let tx = self.expr(x);
                if self.instantiates(x, tx) {
                    self.type_arg(index);
                    return tx;
                }
                self.expr(index);
                self.index_type(tx)
            }
            Expr::Instantiate { expr: x, args, .. } => {
                let tx = self.expr(x);
                for &arg in ast.exprs_list(args) {
                    self.type_arg(arg);
                }
                tx
            }
            Expr::Slice {
                expr: x,
                lo,
                hi,
                max,
                ..
            } => {
                let tx = self.expr(x);
                for bound in [lo, hi, max].into_iter().flatten() {
                    self.expr(bound);
                }
                self.slice_type(tx)
            }
            Expr::TypeAssert { expr: x, typ, .. } => {
                self.expr(x);
                match typ {
                    Some(t) => self.resolve_type(t),
                    None => self.invalid(),
                }
            }
            Expr::Call { callee, args, .. } => self.call(callee, args),
            Expr::Unary { op, expr: x, .. } => {
                let tx = self.expr(x);
                if op == UnaryOp::Addr {
                    return self.info.arena.pointer_to(tx);
                }
                let ta = &self.info.arena;
                match op {
                    UnaryOp::Deref => ta.pointer_elem(tx).unwrap_or(ta.invalid()),
                    UnaryOp::Recv => match ta.get(ta.underlying(tx)) {
                        TypeKind::Chan { elem, .. } => *elem,
                        _ => ta.invalid(),
                    },
                    UnaryOp::Add | UnaryOp::Sub | UnaryOp::Not | UnaryOp::Xor | UnaryOp::Addr => tx,
                }
            }
            Expr::Binary {
                left, op, right, ..
            } => {
                let tl = self.expr(left);
                let tr = self.expr(right);
                let ta = &self.info.arena;
                if op.is_comparison() {
                    ta.basic(BasicKind::UntypedBool)
                } else if matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
                    tl
                } else {
                    match (ta.get(tl), ta.get(tr)) {
                        (TypeKind::Basic(k), _) if k.is_untyped() && !ta.is_invalid(tr) => tr,
                        _ => tl,
                    }
                }
            }
            Expr::Type(t) => self.resolve_type(t),
            Expr::Bad(_) => self.invalid(),
        }
    }

    /// `x[A]` instantiates when `x` is a type or a function.
    fn instantiates(&self, x: ExprId, tx: TyId) -> bool {
        let names_type = match self.ast.exprs[x] {
            Expr::Ident(sym) => matches!(self.lookup(sym), Some(Object::TypeName(_))),
            _ => false,
        };
        let ta = &self.info.arena;
        names_type || matches!(ta.get(ta.underlying(tx)), TypeKind::Signature { .. })
    }

    fn type_arg(&mut self, e: ExprId) {
        if self.type_expr(e).is_none() {
            self.expr(e);
        }
    }

    fn selector(&mut self, e: ExprId, x: ExprId, ident: Symbol) -> TyId {
        if let Expr::Ident(sym) = self.ast.exprs[x] {
            match self.lookup(sym) {
                // Qualified identifier from an import.
                Some(Object::Package) => return self.invalid(),
                // Method expression `T.M`.
                Some(Object::TypeName(_)) => return self.invalid(),
                _ => {}
            }
        }

        let tx = self.expr(x);
        if self.info.arena.is_invalid(tx) {
            return self.invalid();
        }
        let file = self.file;
        let name = file.name(ident);
        let Some((member, indirect)) = self.find_member(tx, name) else {
            trace!(
                name,
                ty = %self.info.arena.type_string(tx),
                "selector not found"
            );
            return self.invalid();
        };
        let (kind, ty) = match member {
            Member::Field(t) => (SelectionKind::Field, t),
            Member::Method(sig) => (SelectionKind::Method, sig),
            Member::InterfaceMethod { sig, recv } => {
                let sig = self.with_receiver(sig, recv);
                (SelectionKind::Method, sig)
            }
        };
        self.info.selections.insert(
            e,
            Selection {
                kind,
                ty,
                indirect,
            },
        );
        ty
    }

    fn with_receiver(&mut self, sig: TyId, recv: TyId) -> TyId {
        match self.info.arena.get(sig).clone() {
            TypeKind::Signature {
                params,
                results,
                variadic,
                ..
            } => self.info.arena.alloc(TypeKind::Signature {
                recv: Some(recv),
                params,
                results,
                variadic,
            }),
            _ => sig,
        }
    }

    /// Field and method lookup, breadth-first through embedded fields,
    /// with one implicit pointer indirection.
    fn find_member(&self, t: TyId, name: &str) -> Option<(Member, bool)> {
        let ta = &self.info.arena;
        let start = match ta.get(ta.underlying(t)) {
            TypeKind::Pointer(elem) => (*elem, true),
            _ => (t, false),
        };
        let mut level: SmallVec<[(TyId, bool); 4]> = smallvec![start];
        let mut seen: SmallVec<[TyId; 8]> = SmallVec::new();

        for _ in 0..MAX_EMBED_DEPTH {
            let mut next: SmallVec<[(TyId, bool); 4]> = SmallVec::new();
            for &(ty, indirect) in &level {
                if seen.contains(&ty) {
                    continue;
                }
                seen.push(ty);

                if let TypeKind::Named(n) = ta.get(ty) {
                    if let Some(m) = n.methods.iter().find(|m| m.name == name) {
                        return Some((Member::Method(m.sig), indirect));
                    }
                }
                match ta.get(ta.underlying(ty)) {
                    TypeKind::Struct { fields } => {
                        if let Some(f) = fields.iter().find(|f| f.name == name) {
                            return Some((Member::Field(f.ty), indirect));
                        }
                        for f in fields.iter().filter(|f| f.embedded) {
                            match ta.get(f.ty) {
                                TypeKind::Pointer(elem) => next.push((*elem, true)),
                                _ => next.push((f.ty, indirect)),
                            }
                        }
                    }
                    TypeKind::Interface { .. } => {
                        if let Some(sig) = self.interface_method(ty, name, 0) {
                            return Some((Member::InterfaceMethod { sig, recv: ty }, indirect));
                        }
                    }
                    _ => {}
                }
            }
            if next.is_empty() {
                break;
            }
            level = next;
        }
        None
    }

    fn interface_method(&self, t: TyId, name: &str, depth: usize) -> Option<TyId> {
        if depth > MAX_EMBED_DEPTH {
            return None;
        }
        let ta = &self.info.arena;
        let TypeKind::Interface { methods, embeds } = ta.get(ta.underlying(t)) else {
            return None;
        };
        methods
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.sig)
            .or_else(|| {
                embeds
                    .iter()
                    .find_map(|&e| self.interface_method(e, name, depth + 1))
            })
    }

    fn index_type(&self, tx: TyId) -> TyId {
        let ta = &self.info.arena;
        let mut u = ta.underlying(tx);
        if let TypeKind::Pointer(elem) = ta.get(u) {
            let pointee = ta.underlying(*elem);
            if matches!(ta.get(pointee), TypeKind::Array { .. }) {
                u = pointee;
            }
        }
        match ta.get(u) {
            TypeKind::Array { elem, .. } | TypeKind::Slice(elem) => *elem,
            TypeKind::Map { val, .. } => *val,
            TypeKind::Basic(BasicKind::String | BasicKind::UntypedString) => {
                ta.basic(BasicKind::Uint8)
            }
            _ => ta.invalid(),
        }
    }

    fn slice_type(&mut self, tx: TyId) -> TyId {
        let ta = &self.info.arena;
        let mut u = ta.underlying(tx);
        if let TypeKind::Pointer(elem) = ta.get(u) {
            u = ta.underlying(*elem);
        }
        let array_elem = match ta.get(u) {
            TypeKind::Array { elem, .. } => *elem,
            TypeKind::Slice(_) | TypeKind::Basic(BasicKind::String) => return tx,
            TypeKind::Basic(BasicKind::UntypedString) => return ta.basic(BasicKind::String),
            _ => return ta.invalid(),
        };
        self.info.arena.alloc(TypeKind::Slice(array_elem))
    }

    fn call(&mut self, callee: ExprId, args: ListRef<ExprId>) -> TyId {
        let ast = self.ast;
        let arg_ids = ast.exprs_list(args);

        // Conversion `T(x)`.
        if let Some(t) = self.type_expr(callee) {
            self.exprs(args);
            return t;
        }

        let builtin = match ast.exprs[callee] {
            Expr::Ident(sym) => match self.lookup(sym) {
                Some(Object::Builtin(b)) => Some(b),
                _ => None,
            },
            _ => None,
        };
        if let Some(b) = builtin {
            return self.builtin_call(b, arg_ids);
        }

        let tf = self.expr(callee);
        self.exprs(args);
        let ta = &self.info.arena;
        let results = match ta.get(ta.underlying(tf)) {
            TypeKind::Signature { results, .. } => results.clone(),
            _ => return ta.invalid(),
        };
        match results.as_slice() {
            [] => self.invalid(),
            [single] => *single,
            _ => self.info.arena.alloc(TypeKind::Tuple(results)),
        }
    }

    fn builtin_call(&mut self, b: Builtin, args: &[ExprId]) -> TyId {
        let first_type = match (b, args.first()) {
            (Builtin::New | Builtin::Make, Some(&first)) => self.type_expr(first),
            _ => None,
        };
        let value_args = if first_type.is_some() {
            &args[1..]
        } else {
            args
        };
        let arg_types: SmallVec<[TyId; 4]> = value_args.iter().map(|&a| self.expr(a)).collect();
        let first_arg = arg_types.first().copied();
        let invalid = self.invalid();

        match b {
            Builtin::New => match first_type {
                Some(t) => self.info.arena.pointer_to(t),
                None => invalid,
            },
            Builtin::Make => first_type.unwrap_or(invalid),
            Builtin::Len | Builtin::Cap | Builtin::Copy => self.basic(BasicKind::Int),
            Builtin::Append => first_arg.unwrap_or(invalid),
            Builtin::Min | Builtin::Max => first_arg.unwrap_or(invalid),
            Builtin::Recover => self.info.arena.any_type(),
            Builtin::Real | Builtin::Imag => self.basic(BasicKind::Float64),
            Builtin::Complex => self.basic(BasicKind::Complex128),
            Builtin::Clear
            | Builtin::Close
            | Builtin::Delete
            | Builtin::Panic
            | Builtin::Print
            | Builtin::Println => invalid,
        }
    }

    fn literal(&mut self, lit: LiteralValue, t: TyId) {
        let ast = self.ast;
        let ta = &self.info.arena;
        let mut u = ta.underlying(t);
        // Elided `&T` in `[]*T{{...}}`.
        if let TypeKind::Pointer(elem) = ta.get(u) {
            u = ta.underlying(*elem);
        }

        match ta.get(u).clone() {
            TypeKind::Struct { fields } => {
                for (i, el) in ast.keyed_elems_list(lit.elements).iter().enumerate() {
                    let field_ty = match el.key {
                        Some(Element::Expr(k)) => {
                            let found = match ast.exprs[k] {
                                Expr::Ident(sym) => {
                                    let name = self.file.name(sym);
                                    fields.iter().find(|f| f.name == name).map(|f| f.ty)
                                }
                                _ => None,
                            };
                            if let Some(ft) = found {
                                self.record(k, ft);
                            }
                            found
                        }
                        Some(Element::Literal(_)) => None,
                        None => fields.get(i).map(|f| f.ty),
                    };
                    self.element(el.value, field_ty);
                }
            }
            TypeKind::Array { elem, .. } | TypeKind::Slice(elem) => {
                for el in ast.keyed_elems_list(lit.elements) {
                    if let Some(key) = el.key {
                        self.element(key, None);
                    }
                    self.element(el.value, Some(elem));
                }
            }
            TypeKind::Map { key, val } => {
                for el in ast.keyed_elems_list(lit.elements) {
                    if let Some(k) = el.key {
                        self.element(k, Some(key));
                    }
                    self.element(el.value, Some(val));
                }
            }
            _ => {
                for el in ast.keyed_elems_list(lit.elements) {
                    if let Some(key) = el.key {
                        self.element(key, None);
                    }
                    self.element(el.value, None);
                }
            }
        }
    }

    fn element(&mut self, el: Element, hint: Option<TyId>) {
        match el {
            Element::Expr(e) => {
                self.expr(e);
            }
            Element::Literal(lit) => {
                let t = hint.unwrap_or(self.invalid());
                self.literal(lit, t);
            }
        }
    }
}

fn parse_int_lit(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|&c| c != '_').collect();
    let (radix, body) = match digits.as_bytes() {
        [b'0', b'x' | b'X', ..] => (16, &digits[2..]),
        [b'0', b'o' | b'O', ..] => (8, &digits[2..]),
        [b'0', b'b' | b'B', ..] => (2, &digits[2..]),
        [b'0', _, ..] => (8, &digits[1..]),
        _ => (10, digits.as_str()),
    };
    u64::from_str_radix(body, radix).ok()
}
