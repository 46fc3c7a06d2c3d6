//! Recursive-descent parser for Go source files.
//!
//! The token stream comes from `Lexer` (semicolons already inserted). Errors
//! are collected as `Diag`s and parsing continues after resynchronizing at
//! the next `;` or `}`, so a partial tree is always produced.
//!
//! Nesting of expressions, types, statements and literal values is capped at
//! `MAX_NEST_LEV`. Past it the parse is abandoned with a single diagnostic.

use crate::ast::*;
use crate::error::{Diag, ParseFailure};
use crate::lexer::{Lexer, Tok};
use crate::parser_support::{expr_to_type, resolve_param_list, ParamDecl};
use crate::ParsedFile;

type Spanned<'src> = (usize, Tok<'src>, usize);

const MAX_DIAGS: usize = 64;

/// Deep enough for any hand-written Go; shallow enough for a 2 MiB thread
/// stack in unoptimized builds.
const MAX_NEST_LEV: u32 = 128;

/// Parses a Go source file.
///
/// Returns the file, or a `ParseFailure` with every lexer and parser
/// diagnostic plus the recovered partial tree.
pub fn parse_source(input: &str) -> Result<ParsedFile, ParseFailure> {
    let mut lex = Lexer::new(input);
    let toks: Vec<_> = lex.by_ref().collect();
    let mut diags = lex.take_diags();
    let comments = lex.take_comment_groups();

    let mut p = Parser::new(toks, input.len());
    let file = p.parse_file(comments);
    diags.extend(p.diags);

    let parsed = ParsedFile::new(p.arena, p.interner, file, input);
    if diags.is_empty() {
        Ok(parsed)
    } else {
        Err(ParseFailure {
            partial: Some(Box::new(parsed)),
            diags,
        })
    }
}

enum SimpleResult {
    Stmt(SimpleStmtId),
    Range {
        lhs: Option<RangeLhs>,
        range_pos: Span,
        expr: ExprId,
    },
}

struct Parser<'src> {
    toks: Vec<Spanned<'src>>,
    pos: usize,
    src_len: usize,
    arena: AstArena,
    interner: Interner,
    diags: Vec<Diag>,
    /// Below zero inside `if`/`for`/`switch` headers, where `T{` opens the
    /// block rather than a composite literal.
    expr_lev: i32,
    nest_lev: u32,
    /// Set once nesting overflowed; no further diagnostics are recorded.
    bailout: bool,
}

impl<'src> Parser<'src> {
    fn new(toks: Vec<Spanned<'src>>, src_len: usize) -> Self {
        Self {
            toks,
            pos: 0,
            src_len,
            arena: AstArena::new(),
            interner: Interner::new(),
            diags: Vec::new(),
            expr_lev: 0,
            nest_lev: 0,
            bailout: false,
        }
    }

    // -------------------------------------------------------------------------
    // Token cursor
    // -------------------------------------------------------------------------

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.toks.get(self.pos).map(|t| t.1)
    }

    #[inline]
    fn peek_nth(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn at(&self, tok: Tok<'src>) -> bool {
        self.peek() == Some(tok)
    }

    #[inline]
    fn at_eof(&self) -> bool {
        self.pos >= self.toks.len()
    }

    fn cur_span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(s, _, e)) => Span::new(s, e),
            None => Span::empty_at(self.src_len),
        }
    }

    fn prev_end(&self) -> u32 {
        match self.pos.checked_sub(1).and_then(|i| self.toks.get(i)) {
            Some(&(_, _, e)) => Span::empty_at(e).end,
            None => 0,
        }
    }

    #[inline]
    fn span_from(&self, start: u32) -> Span {
        Span {
            start,
            end: self.prev_end().max(start),
        }
    }

    fn bump(&mut self) -> Span {
        let span = self.cur_span();
        if self.pos < self.toks.len() {
            self.pos += 1;
        }
        span
    }

    fn eat(&mut self, tok: Tok<'src>) -> Option<Span> {
        if self.at(tok) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(Tok::Semi) if self.cur_span().is_empty() => "newline".to_string(),
            Some(t) => t.to_string(),
            None => "end of file".to_string(),
        }
    }

    fn error(&mut self, span: Span, message: impl Into<String>) {
        if !self.bailout && self.diags.len() < MAX_DIAGS {
            self.diags.push(Diag::parse(span, message));
        }
    }

    /// Counts one level of nesting. On overflow the cursor jumps to end of
    /// file so every open production unwinds without recursing further.
    fn enter_nest(&mut self) -> bool {
        if self.nest_lev >= MAX_NEST_LEV {
            let span = self.cur_span();
            self.error(span, "exceeded maximum nesting depth");
            self.bailout = true;
            self.pos = self.toks.len();
            return false;
        }
        self.nest_lev += 1;
        true
    }

    #[inline]
    fn leave_nest(&mut self) {
        self.nest_lev -= 1;
    }

    fn expect(&mut self, tok: Tok<'src>, what: &str) -> Span {
        if let Some(span) = self.eat(tok) {
            return span;
        }
        let found = self.describe_current();
        let span = self.cur_span();
        self.error(span, format!("expected {what}, found {found}"));
        Span::empty_at(span.start as usize)
    }

    fn expect_semi(&mut self, ctx: &str) {
        match self.peek() {
            Some(Tok::Semi) => {
                self.bump();
            }
            None | Some(Tok::RParen | Tok::RBrace) => {}
            Some(_) => {
                let found = self.describe_current();
                let span = self.cur_span();
                self.error(span, format!("expected ';' after {ctx}, found {found}"));
                self.sync_stmt();
            }
        }
    }

    fn sync_stmt(&mut self) {
        while let Some(tok) = self.peek() {
            match tok {
                Tok::Semi => {
                    self.bump();
                    return;
                }
                Tok::RBrace => return,
                _ => {
                    self.bump();
                }
            }
        }
    }

    fn ident(&mut self) -> IdentName {
        if let Some(Tok::Ident(name)) = self.peek() {
            let pos = self.bump();
            return IdentName {
                sym: self.interner.intern(name),
                pos,
            };
        }
        let found = self.describe_current();
        let span = self.cur_span();
        self.error(span, format!("expected identifier, found {found}"));
        IdentName {
            sym: self.interner.intern("_"),
            pos: Span::empty_at(span.start as usize),
        }
    }

    fn ident_list(&mut self) -> Vec<IdentName> {
        let mut names = vec![self.ident()];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.ident());
        }
        names
    }

    fn bad_expr(&mut self) -> ExprId {
        let span = self.cur_span();
        self.arena.exprs.alloc(Expr::Bad(span), span)
    }

    // -------------------------------------------------------------------------
    // File and declarations
    // -------------------------------------------------------------------------

    fn parse_file(&mut self, comments: Vec<Vec<(Span, CommentKind)>>) -> SourceFile {
        let package_pos = self.expect(Tok::KwPackage, "`package`");
        let name = self.ident();
        self.expect_semi("package clause");

        let mut decls = Vec::new();
        while !self.at_eof() {
            let before = self.pos;
            match self.peek() {
                Some(Tok::KwFunc) => decls.push(TopLevelDecl::Func(self.parse_func_decl())),
                Some(Tok::KwImport | Tok::KwConst | Tok::KwType | Tok::KwVar) => {
                    decls.push(TopLevelDecl::Decl(self.parse_gen_decl()))
                }
                Some(Tok::Semi) => {
                    self.bump();
                    continue;
                }
                _ => {
                    let found = self.describe_current();
                    let span = self.cur_span();
                    self.error(span, format!("expected declaration, found {found}"));
                    self.sync_decl();
                    continue;
                }
            }
            self.expect_semi("declaration");
            if self.pos == before {
                self.bump();
            }
        }

        let groups: Vec<CommentGroupId> = comments
            .into_iter()
            .filter_map(|group| self.alloc_comment_group(group))
            .collect();

        SourceFile {
            package_pos,
            name,
            decls: self.arena.list_top_decls(decls),
            comments: self.arena.list_comment_group_ids(groups),
        }
    }

    fn alloc_comment_group(&mut self, group: Vec<(Span, CommentKind)>) -> Option<CommentGroupId> {
        let (first, _) = *group.first()?;
        let (last, _) = *group.last()?;
        let ids: Vec<CommentId> = group
            .into_iter()
            .map(|(span, kind)| self.arena.comments.alloc(Comment { kind }, span))
            .collect();
        let comments = self.arena.list_comment_ids(ids);
        let span = Span {
            start: first.start,
            end: last.end,
        };
        Some(self.arena.comment_groups.alloc(CommentGroup { comments }, span))
    }

    fn sync_decl(&mut self) {
        self.bump();
        while let Some(tok) = self.peek() {
            if matches!(
                tok,
                Tok::KwFunc | Tok::KwImport | Tok::KwConst | Tok::KwType | Tok::KwVar
            ) {
                return;
            }
            self.bump();
        }
    }

    fn parse_gen_decl(&mut self) -> DeclId {
        let kind = match self.peek() {
            Some(Tok::KwImport) => GenDeclKind::Import,
            Some(Tok::KwConst) => GenDeclKind::Const,
            Some(Tok::KwType) => GenDeclKind::Type,
            _ => GenDeclKind::Var,
        };
        let kw_pos = self.bump();

        let mut specs = Vec::new();
        let (l_paren, r_paren) = if let Some(l_paren) = self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) && !self.at_eof() {
                let before = self.pos;
                if self.eat(Tok::Semi).is_some() {
                    continue;
                }
                specs.push(self.parse_spec(kind));
                if !self.at(Tok::RParen) {
                    self.expect_semi("specification");
                }
                if self.pos == before {
                    self.bump();
                }
            }
            let r_paren = self.expect(Tok::RParen, "`)`");
            (Some(l_paren), Some(r_paren))
        } else {
            specs.push(self.parse_spec(kind));
            (None, None)
        };

        let decl = GenDecl {
            kw_pos,
            kind,
            l_paren,
            specs: self.arena.list_specs(specs),
            r_paren,
        };
        let span = self.span_from(kw_pos.start);
        self.arena.decls.alloc(Decl::Gen(decl), span)
    }

    fn parse_spec(&mut self, kind: GenDeclKind) -> Spec {
        match kind {
            GenDeclKind::Import => {
                let name = match self.peek() {
                    Some(Tok::Dot) => Some(ImportName::Dot(self.bump())),
                    Some(Tok::Ident("_")) => Some(ImportName::Blank(self.bump())),
                    Some(Tok::Ident(_)) => Some(ImportName::Name(self.ident())),
                    _ => None,
                };
                let path = match self.peek() {
                    Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => self.bump(),
                    _ => self.expect(Tok::StringLit(""), "import path"),
                };
                Spec::Import(ImportSpec {
                    name,
                    path: StringLit { raw: path },
                })
            }
            GenDeclKind::Const | GenDeclKind::Var => {
                let names = self.ident_list();
                let typ = if self.at(Tok::Assign)
                    || self.at(Tok::Semi)
                    || self.at(Tok::RParen)
                    || self.at_eof()
                {
                    None
                } else {
                    Some(self.parse_type())
                };
                let values = if self.eat(Tok::Assign).is_some() {
                    self.parse_expr_list()
                } else {
                    ListRef::EMPTY
                };
                Spec::Value(ValueSpec {
                    names: self.arena.list_ident_names(names),
                    typ,
                    values,
                })
            }
            GenDeclKind::Type => {
                let name = self.ident();
                let type_params = if self.at_type_params() {
                    Some(self.parse_type_params())
                } else {
                    None
                };
                let assign_pos = self.eat(Tok::Assign);
                let typ = self.parse_type();
                Spec::Type(TypeSpec {
                    name,
                    type_params,
                    assign_pos,
                    typ,
                })
            }
        }
    }

    fn parse_func_decl(&mut self) -> FuncDeclId {
        let func_pos = self.bump();
        let recv = if self.at(Tok::LParen) {
            Some(self.parse_receiver())
        } else {
            None
        };
        let name = self.ident();
        let type_params = if self.at(Tok::LBrack) {
            Some(self.parse_type_params())
        } else {
            None
        };
        let signature = self.parse_signature();
        let body = if self.at(Tok::LBrace) {
            Some(self.parse_block())
        } else {
            None
        };

        let decl = FuncDecl {
            func_pos,
            recv,
            name,
            type_params,
            signature,
            body,
        };
        let span = self.span_from(func_pos.start);
        self.arena.funcs.alloc(decl, span)
    }

    fn parse_receiver(&mut self) -> Receiver {
        let l_paren = self.bump();
        let name = match (self.peek(), self.peek_nth(1)) {
            (Some(Tok::Ident(_)), Some(next))
                if !matches!(next, Tok::RParen | Tok::Dot | Tok::LBrack) =>
            {
                Some(self.ident())
            }
            _ => None,
        };
        let typ = self.parse_type();
        let r_paren = self.expect(Tok::RParen, "`)` after receiver");
        Receiver {
            l_paren,
            name,
            typ,
            r_paren,
        }
    }

    // -------------------------------------------------------------------------
    // Generics
    // -------------------------------------------------------------------------

    /// After a type name, `[` opens type parameters unless it starts an
    /// array or slice type: `type L[T any] ...` versus `type A [N]int`.
    fn at_type_params(&self) -> bool {
        if !self.at(Tok::LBrack) || !matches!(self.peek_nth(1), Some(Tok::Ident(_))) {
            return false;
        }
        matches!(
            self.peek_nth(2),
            Some(
                Tok::Comma
                    | Tok::Ident(_)
                    | Tok::Tilde
                    | Tok::LBrack
                    | Tok::LParen
                    | Tok::KwInterface
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwFunc
                    | Tok::KwStruct
            )
        )
    }

    fn parse_type_params(&mut self) -> TypeParamsId {
        let l_brack = self.bump();
        let mut params = Vec::new();
        while !self.at(Tok::RBrack) && !self.at_eof() {
            let before = self.pos;
            params.push(self.parse_type_param_decl());
            if self.eat(Tok::Comma).is_none() || self.pos == before {
                break;
            }
        }
        let r_brack = self.expect(Tok::RBrack, "`]`");
        let tp = TypeParams {
            l_brack,
            params: self.arena.list_type_param_decl_ids(params),
            r_brack,
        };
        let span = self.span_from(l_brack.start);
        self.arena.type_params.alloc(tp, span)
    }

    fn parse_type_param_decl(&mut self) -> TypeParamDeclId {
        let start = self.cur_span().start;
        let names = self.ident_list();
        let names = self.arena.list_ident_names(names);
        let constraint = self.parse_type_elem();
        let span = self.span_from(start);
        self.arena
            .type_param_decls
            .alloc(TypeParamDecl { names, constraint }, span)
    }

    fn parse_type_elem(&mut self) -> TypeElem {
        let mut terms = Vec::new();
        loop {
            let term = match self.eat(Tok::Tilde) {
                Some(tilde_pos) => TypeTerm::Tilde {
                    tilde_pos,
                    typ: self.parse_type(),
                },
                None => TypeTerm::Type(self.parse_type()),
            };
            terms.push(term);
            if self.eat(Tok::Pipe).is_none() {
                break;
            }
        }
        TypeElem {
            terms: self.arena.list_type_terms(terms),
        }
    }

    /// `[A, B]` after a type name; empty when no `[` follows.
    fn parse_type_args(&mut self) -> ListRef<TypeId> {
        if self.eat(Tok::LBrack).is_none() {
            return ListRef::EMPTY;
        }
        let mut args = Vec::new();
        while !self.at(Tok::RBrack) && !self.at_eof() {
            let before = self.pos;
            args.push(self.parse_type());
            if self.eat(Tok::Comma).is_none() || self.pos == before {
                break;
            }
        }
        self.expect(Tok::RBrack, "`]`");
        self.arena.list_type_ids(args)
    }

    /// Token after the `]` matching the `[` at `self.pos + open`.
    fn after_matching_brack(&self, open: usize) -> Option<Tok<'src>> {
        let mut depth = 0usize;
        let mut i = self.pos + open;
        loop {
            match self.toks.get(i)?.1 {
                Tok::LBrack => depth += 1,
                Tok::RBrack => {
                    depth -= 1;
                    if depth == 0 {
                        return self.toks.get(i + 1).map(|t| t.1);
                    }
                }
                Tok::Semi | Tok::LBrace | Tok::RBrace => return None,
                _ => {}
            }
            i += 1;
        }
    }

    // -------------------------------------------------------------------------
    // Signatures and types
    // -------------------------------------------------------------------------

    fn parse_signature(&mut self) -> SignatureId {
        let start = self.cur_span().start;
        let params = self.parse_params();
        let results = if self.at(Tok::LParen) {
            Some(Results::Params(self.parse_params()))
        } else if self.starts_type() {
            Some(Results::Type(self.parse_type()))
        } else {
            None
        };
        let span = self.span_from(start);
        self.arena
            .signatures
            .alloc(Signature { params, results }, span)
    }

    fn starts_type(&self) -> bool {
        match self.peek() {
            Some(
                Tok::Ident(_)
                | Tok::Star
                | Tok::LBrack
                | Tok::KwMap
                | Tok::KwChan
                | Tok::KwStruct
                | Tok::KwInterface
                | Tok::KwFunc,
            ) => true,
            Some(Tok::Arrow) => self.peek_nth(1) == Some(Tok::KwChan),
            _ => false,
        }
    }

    fn parse_params(&mut self) -> FieldList {
        let open = self.expect(Tok::LParen, "`(`");
        let mut raw = Vec::new();
        while !self.at(Tok::RParen) && !self.at_eof() {
            let before = self.pos;
            raw.push(self.parse_param_decl());
            if self.eat(Tok::Comma).is_none() || self.pos == before {
                break;
            }
        }
        let close = self.expect(Tok::RParen, "`)`");
        let fields = resolve_param_list(&mut self.arena, raw);
        FieldList {
            open,
            fields: self.arena.list_fields(fields),
            close,
        }
    }

    fn parse_param_decl(&mut self) -> ParamDecl {
        let start = self.cur_span().start;
        let (names, ellipsis_pos, typ) = match (self.peek(), self.peek_nth(1)) {
            (Some(Tok::Ident(_)), Some(Tok::Comma | Tok::RParen)) => {
                (vec![self.ident()], None, None)
            }
            (Some(Tok::Ident(_)), Some(Tok::Dot)) => (Vec::new(), None, Some(self.parse_type())),
            (Some(Tok::Ident(_)), Some(Tok::LBrack))
                if matches!(self.after_matching_brack(1), Some(Tok::Comma | Tok::RParen)) =>
            {
                (Vec::new(), None, Some(self.parse_type()))
            }
            (Some(Tok::Ident(_)), _) => {
                let name = self.ident();
                let ellipsis = self.eat(Tok::Ellipsis);
                (vec![name], ellipsis, Some(self.parse_type()))
            }
            (Some(Tok::Ellipsis), _) => {
                let ellipsis = self.bump();
                (Vec::new(), Some(ellipsis), Some(self.parse_type()))
            }
            _ => (Vec::new(), None, Some(self.parse_type())),
        };
        ParamDecl {
            names,
            ellipsis_pos,
            typ,
            span: self.span_from(start),
        }
    }

    fn parse_type(&mut self) -> TypeId {
        if !self.enter_nest() {
            let span = self.cur_span();
            return self.arena.types.alloc(Type::Bad(span), span);
        }
        let typ = self.parse_type_inner();
        self.leave_nest();
        typ
    }

    fn parse_type_inner(&mut self) -> TypeId {
        let start = self.cur_span().start;
        let typ = match self.peek() {
            Some(Tok::Ident(_)) => {
                let first = self.ident();
                let (pkg, name) =
                    if self.at(Tok::Dot) && matches!(self.peek_nth(1), Some(Tok::Ident(_))) {
                        self.bump();
                        (Some(first), self.ident())
                    } else {
                        (None, first)
                    };
                let args = self.parse_type_args();
                Type::Named { pkg, name, args }
            }
            Some(Tok::Star) => {
                let star_pos = self.bump();
                let elem = self.parse_type();
                Type::Pointer { star_pos, elem }
            }
            Some(Tok::LBrack) => {
                let l_brack = self.bump();
                if self.eat(Tok::RBrack).is_some() {
                    let elem = self.parse_type();
                    Type::Slice { l_brack, elem }
                } else {
                    let len = if let Some(e) = self.eat(Tok::Ellipsis) {
                        ArrayLen::Ellipsis(e)
                    } else {
                        let outer = std::mem::replace(&mut self.expr_lev, 0);
                        let len = self.parse_expr();
                        self.expr_lev = outer;
                        ArrayLen::Expr(len)
                    };
                    self.expect(Tok::RBrack, "`]`");
                    let elem = self.parse_type();
                    Type::Array { l_brack, len, elem }
                }
            }
            Some(Tok::KwMap) => {
                let map_pos = self.bump();
                self.expect(Tok::LBrack, "`[`");
                let key = self.parse_type();
                self.expect(Tok::RBrack, "`]`");
                let val = self.parse_type();
                Type::Map { map_pos, key, val }
            }
            Some(Tok::KwChan) => {
                let chan_pos = self.bump();
                let dir = if self.eat(Tok::Arrow).is_some() {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type();
                Type::Chan {
                    dir,
                    chan_pos,
                    elem,
                }
            }
            Some(Tok::Arrow) => {
                self.bump();
                let chan_pos = self.expect(Tok::KwChan, "`chan`");
                let elem = self.parse_type();
                Type::Chan {
                    dir: ChanDir::Recv,
                    chan_pos,
                    elem,
                }
            }
            Some(Tok::KwStruct) => self.parse_struct_type(),
            Some(Tok::KwInterface) => self.parse_interface_type(),
            Some(Tok::KwFunc) => {
                let func_pos = self.bump();
                let sig = self.parse_signature();
                Type::Func { func_pos, sig }
            }
            Some(Tok::LParen) => {
                let l_paren = self.bump();
                let typ = self.parse_type();
                self.expect(Tok::RParen, "`)`");
                Type::Paren { l_paren, typ }
            }
            _ => {
                let found = self.describe_current();
                let span = self.cur_span();
                self.error(span, format!("expected type, found {found}"));
                Type::Bad(span)
            }
        };
        let span = self.span_from(start);
        self.arena.types.alloc(typ, span)
    }

    fn parse_struct_type(&mut self) -> Type {
        let struct_pos = self.bump();
        self.expect(Tok::LBrace, "`{`");
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            if self.eat(Tok::Semi).is_some() {
                continue;
            }
            fields.push(self.parse_struct_field());
            if !self.at(Tok::RBrace) {
                self.expect_semi("struct field");
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(Tok::RBrace, "`}`");
        Type::Struct {
            struct_pos,
            fields: self.arena.list_fields(fields),
        }
    }

    fn parse_struct_field(&mut self) -> FieldId {
        let start = self.cur_span().start;
        let embedded = match (self.peek(), self.peek_nth(1)) {
            (Some(Tok::Star), _) => true,
            (Some(Tok::Ident(_)), Some(Tok::LBrack)) => matches!(
                self.after_matching_brack(1),
                None | Some(Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_))
            ),
            (Some(Tok::Ident(_)), next) => matches!(
                next,
                None | Some(
                    Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_) | Tok::Dot
                )
            ),
            _ => false,
        };
        let (names, typ) = if embedded {
            (ListRef::EMPTY, self.parse_type())
        } else {
            let names = self.ident_list();
            let names = self.arena.list_ident_names(names);
            (names, self.parse_type())
        };
        let tag = match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => Some(StringLit { raw: self.bump() }),
            _ => None,
        };
        let field = Field {
            names,
            ellipsis_pos: None,
            typ,
            tag,
            is_embed: embedded,
        };
        let span = self.span_from(start);
        self.arena.fields.alloc(field, span)
    }

    fn parse_interface_type(&mut self) -> Type {
        let interface_pos = self.bump();
        self.expect(Tok::LBrace, "`{`");
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            if self.eat(Tok::Semi).is_some() {
                continue;
            }
            if matches!(self.peek(), Some(Tok::Ident(_))) && self.peek_nth(1) == Some(Tok::LParen)
            {
                let name = self.ident();
                let sig = self.parse_signature();
                elems.push(InterfaceElem::Method { name, sig });
            } else {
                elems.push(InterfaceElem::TypeElem(self.parse_type_elem()));
            }
            if !self.at(Tok::RBrace) {
                self.expect_semi("interface element");
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.expect(Tok::RBrace, "`}`");
        Type::Interface {
            interface_pos,
            elems: self.arena.list_interface_elems(elems),
        }
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn parse_block(&mut self) -> Block {
        let l_brace = self.expect(Tok::LBrace, "`{`");
        let outer = std::mem::replace(&mut self.expr_lev, 0);
        let stmts = self.parse_stmt_list();
        self.expr_lev = outer;
        let r_brace = self.expect(Tok::RBrace, "`}`");
        Block {
            l_brace,
            stmts,
            r_brace,
        }
    }

    fn at_stmt_list_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Tok::RBrace | Tok::KwCase | Tok::KwDefault)
        )
    }

    fn parse_stmt_list(&mut self) -> ListRef<StmtId> {
        let mut stmts = Vec::new();
        while !self.at_stmt_list_end() {
            let before = self.pos;
            if self.eat(Tok::Semi).is_some() {
                continue;
            }
            stmts.push(self.parse_stmt());
            if !self.at_stmt_list_end() {
                self.expect_semi("statement");
            }
            if self.pos == before {
                self.bump();
            }
        }
        self.arena.list_stmts(stmts)
    }

    fn parse_stmt(&mut self) -> StmtId {
        if !self.enter_nest() {
            let span = self.cur_span();
            return self.arena.stmts.alloc(Stmt::Bad(span), span);
        }
        let stmt = self.parse_stmt_inner();
        self.leave_nest();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> StmtId {
        let start = self.cur_span().start;
        let stmt = match self.peek() {
            Some(Tok::KwVar | Tok::KwConst | Tok::KwType) => Stmt::Decl(self.parse_gen_decl()),
            Some(Tok::LBrace) => Stmt::Block(self.parse_block()),
            Some(Tok::KwReturn) => {
                let return_pos = self.bump();
                let results = if self.at(Tok::Semi) || self.at_stmt_list_end() {
                    ListRef::EMPTY
                } else {
                    self.parse_expr_list()
                };
                Stmt::Return {
                    return_pos,
                    results,
                }
            }
            Some(Tok::KwIf) => self.parse_if(),
            Some(Tok::KwFor) => self.parse_for(),
            Some(Tok::KwSwitch) => self.parse_switch(),
            Some(Tok::KwSelect) => self.parse_select(),
            Some(Tok::KwGo) => {
                let go_pos = self.bump();
                let call = self.parse_expr();
                Stmt::Go { go_pos, call }
            }
            Some(Tok::KwDefer) => {
                let defer_pos = self.bump();
                let call = self.parse_expr();
                Stmt::Defer { defer_pos, call }
            }
            Some(Tok::KwBreak) => {
                let break_pos = self.bump();
                let label = self.optional_label();
                Stmt::Branch(BranchStmt::Break { break_pos, label })
            }
            Some(Tok::KwContinue) => {
                let cont_pos = self.bump();
                let label = self.optional_label();
                Stmt::Branch(BranchStmt::Continue { cont_pos, label })
            }
            Some(Tok::KwGoto) => {
                let goto_pos = self.bump();
                let label = self.ident();
                Stmt::Branch(BranchStmt::Goto { goto_pos, label })
            }
            Some(Tok::KwFallthrough) => Stmt::Branch(BranchStmt::Fallthrough {
                fall_pos: self.bump(),
            }),
            Some(Tok::Ident(_)) if self.peek_nth(1) == Some(Tok::Colon) => {
                let label = self.ident();
                let colon_pos = self.bump();
                let stmt = if self.at_stmt_list_end() || self.at(Tok::Semi) {
                    let span = Span::empty_at(colon_pos.end as usize);
                    let empty = self.arena.simple_stmts.alloc(SimpleStmt::Empty(span), span);
                    self.arena.stmts.alloc(Stmt::Simple(empty), span)
                } else {
                    self.parse_stmt()
                };
                Stmt::Labeled {
                    label,
                    colon_pos,
                    stmt,
                }
            }
            _ => match self.parse_simple_stmt(false) {
                SimpleResult::Stmt(id) => Stmt::Simple(id),
                SimpleResult::Range { range_pos, .. } => {
                    self.error(range_pos, "unexpected `range` outside of a for clause");
                    Stmt::Bad(range_pos)
                }
            },
        };
        let span = self.span_from(start);
        self.arena.stmts.alloc(stmt, span)
    }

    fn optional_label(&mut self) -> Option<IdentName> {
        match self.peek() {
            Some(Tok::Ident(_)) => Some(self.ident()),
            _ => None,
        }
    }

    fn parse_simple_stmt(&mut self, range_ok: bool) -> SimpleResult {
        let start = self.cur_span().start;
        if range_ok {
            if let Some(range_pos) = self.eat(Tok::KwRange) {
                let expr = self.parse_expr();
                return SimpleResult::Range {
                    lhs: None,
                    range_pos,
                    expr,
                };
            }
        }

        let lhs = self.parse_expr_vec();
        let first = lhs[0];
        let stmt = match self.peek() {
            Some(Tok::Define) => {
                let op_pos = self.bump();
                let names = self.exprs_to_idents(&lhs);
                if range_ok {
                    if let Some(range_pos) = self.eat(Tok::KwRange) {
                        let expr = self.parse_expr();
                        return SimpleResult::Range {
                            lhs: Some(RangeLhs::Def {
                                idents: names,
                                op_pos,
                            }),
                            range_pos,
                            expr,
                        };
                    }
                }
                let values = self.parse_expr_list();
                SimpleStmt::ShortVarDecl {
                    names,
                    op_pos,
                    values,
                }
            }
            Some(tok) if assign_op(tok).is_some() => {
                let op = assign_op(tok).unwrap_or(AssignOp::Assign);
                let op_pos = self.bump();
                let lhs = self.arena.list_exprs(lhs);
                if range_ok && op == AssignOp::Assign {
                    if let Some(range_pos) = self.eat(Tok::KwRange) {
                        let expr = self.parse_expr();
                        return SimpleResult::Range {
                            lhs: Some(RangeLhs::Assign { exprs: lhs, op_pos }),
                            range_pos,
                            expr,
                        };
                    }
                }
                let rhs = self.parse_expr_list();
                SimpleStmt::Assign {
                    lhs,
                    op,
                    op_pos,
                    rhs,
                }
            }
            Some(tok @ (Tok::Inc | Tok::Dec)) => {
                let op = if tok == Tok::Inc {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                let op_pos = self.bump();
                SimpleStmt::IncDec {
                    expr: first,
                    op,
                    op_pos,
                }
            }
            Some(Tok::Arrow) => {
                let op_pos = self.bump();
                let value = self.parse_expr();
                SimpleStmt::Send {
                    chan: first,
                    op_pos,
                    value,
                }
            }
            _ => {
                if lhs.len() > 1 {
                    let span = self.cur_span();
                    self.error(span, "expected `:=` or `=` after expression list");
                }
                SimpleStmt::Expr(first)
            }
        };
        let span = self.span_from(start);
        SimpleResult::Stmt(self.arena.simple_stmts.alloc(stmt, span))
    }

    fn parse_simple_stmt_id(&mut self) -> SimpleStmtId {
        match self.parse_simple_stmt(false) {
            SimpleResult::Stmt(id) => id,
            SimpleResult::Range { range_pos, .. } => {
                let empty = self
                    .arena
                    .simple_stmts
                    .alloc(SimpleStmt::Empty(range_pos), range_pos);
                self.error(range_pos, "unexpected `range`");
                empty
            }
        }
    }

    fn exprs_to_idents(&mut self, exprs: &[ExprId]) -> ListRef<IdentName> {
        let mut names = Vec::with_capacity(exprs.len());
        for &e in exprs {
            let span = self.arena.exprs.span(e);
            match self.arena.exprs[e] {
                Expr::Ident(sym) => names.push(IdentName { sym, pos: span }),
                _ => self.error(span, "non-name on left side of `:=`"),
            }
        }
        self.arena.list_ident_names(names)
    }

    fn simple_to_expr(&mut self, id: SimpleStmtId) -> ExprId {
        match self.arena.simple_stmts[id] {
            SimpleStmt::Expr(e) => e,
            _ => {
                let span = self.arena.simple_stmts.span(id);
                self.error(span, "expected expression, found statement");
                self.arena.exprs.alloc(Expr::Bad(span), span)
            }
        }
    }

    fn parse_if(&mut self) -> Stmt {
        let if_pos = self.bump();
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let mut init = None;
        let cond = if self.at(Tok::LBrace) {
            let span = self.cur_span();
            self.error(span, "missing condition in if statement");
            self.bad_expr()
        } else if self.eat(Tok::Semi).is_some() {
            self.parse_expr()
        } else {
            let s = self.parse_simple_stmt_id();
            if self.eat(Tok::Semi).is_some() {
                init = Some(s);
                if self.at(Tok::LBrace) {
                    let span = self.cur_span();
                    self.error(span, "missing condition in if statement");
                    self.bad_expr()
                } else {
                    self.parse_expr()
                }
            } else {
                self.simple_to_expr(s)
            }
        };
        self.expr_lev = outer;

        let then_block = self.parse_block();
        let else_stmt = if self.eat(Tok::KwElse).is_some() {
            match self.peek() {
                Some(Tok::KwIf) => Some(self.parse_stmt()),
                Some(Tok::LBrace) => {
                    let block = self.parse_block();
                    Some(self.arena.stmts.alloc(Stmt::Block(block), block.span()))
                }
                _ => {
                    let span = self.cur_span();
                    self.error(span, "expected `if` or block after `else`");
                    None
                }
            }
        } else {
            None
        };

        Stmt::If {
            if_pos,
            init,
            cond,
            then_block,
            else_stmt,
        }
    }

    fn parse_for(&mut self) -> Stmt {
        let for_pos = self.bump();
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let kind = if self.at(Tok::LBrace) {
            ForKind::Infinite
        } else {
            let first = if self.at(Tok::Semi) {
                None
            } else {
                Some(self.parse_simple_stmt(true))
            };
            match first {
                Some(SimpleResult::Range {
                    lhs,
                    range_pos,
                    expr,
                }) => ForKind::Range {
                    lhs,
                    range_pos,
                    expr,
                },
                Some(SimpleResult::Stmt(s)) if !self.at(Tok::Semi) => {
                    ForKind::Cond(self.simple_to_expr(s))
                }
                first => {
                    let init = match first {
                        Some(SimpleResult::Stmt(s)) => Some(s),
                        _ => None,
                    };
                    self.expect(Tok::Semi, "`;`");
                    let cond = if self.at(Tok::Semi) {
                        None
                    } else {
                        Some(self.parse_expr())
                    };
                    self.expect(Tok::Semi, "`;`");
                    let post = if self.at(Tok::LBrace) {
                        None
                    } else {
                        Some(self.parse_simple_stmt_id())
                    };
                    ForKind::ForClause { init, cond, post }
                }
            }
        };
        self.expr_lev = outer;
        let block = self.parse_block();
        Stmt::For {
            for_pos,
            kind,
            block,
        }
    }

    fn parse_switch(&mut self) -> Stmt {
        let switch_pos = self.bump();
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let mut init = None;
        let mut tag = None;
        if !self.at(Tok::LBrace) {
            if !self.at(Tok::Semi) {
                tag = Some(self.parse_simple_stmt_id());
            }
            if self.eat(Tok::Semi).is_some() {
                init = tag.take();
                if !self.at(Tok::LBrace) {
                    tag = Some(self.parse_simple_stmt_id());
                }
            }
        }
        self.expr_lev = outer;

        let guard = tag.and_then(|s| self.type_switch_guard(s));

        self.expect(Tok::LBrace, "`{`");
        let mut clauses = Vec::new();
        while matches!(self.peek(), Some(Tok::KwCase | Tok::KwDefault)) {
            clauses.push(self.parse_case_clause());
        }
        self.expect(Tok::RBrace, "`}`");
        let clauses = self.arena.list_switch_clause_ids(clauses);

        match guard {
            Some((bind, x)) => Stmt::TypeSwitch {
                switch_pos,
                init,
                bind,
                x,
                clauses,
            },
            None => Stmt::Switch {
                switch_pos,
                init,
                tag: tag.map(|s| self.simple_to_expr(s)),
                clauses,
            },
        }
    }

    /// Recognizes `x.(type)` and `v := x.(type)`.
    fn type_switch_guard(&self, id: SimpleStmtId) -> Option<(Option<IdentName>, ExprId)> {
        let type_switch_operand = |e: ExprId| match self.arena.exprs[e] {
            Expr::TypeAssert {
                expr, typ: None, ..
            } => Some(expr),
            _ => None,
        };
        match self.arena.simple_stmts[id] {
            SimpleStmt::Expr(e) => type_switch_operand(e).map(|x| (None, x)),
            SimpleStmt::ShortVarDecl { names, values, .. } => {
                let (&[name], &[value]) = (
                    self.arena.ident_names(names),
                    self.arena.exprs_list(values),
                ) else {
                    return None;
                };
                type_switch_operand(value).map(|x| (Some(name), x))
            }
            _ => None,
        }
    }

    fn parse_case_clause(&mut self) -> SwitchClauseId {
        let start = self.cur_span().start;
        let (case_pos, is_default, items) = if self.at(Tok::KwDefault) {
            (self.bump(), true, ListRef::EMPTY)
        } else {
            let case_pos = self.expect(Tok::KwCase, "`case`");
            (case_pos, false, self.parse_expr_list())
        };
        let colon_pos = self.expect(Tok::Colon, "`:`");
        let stmts = self.parse_stmt_list();
        let clause = SwitchClause {
            case_pos,
            is_default,
            items,
            colon_pos,
            stmts,
        };
        let span = self.span_from(start);
        self.arena.switch_clauses.alloc(clause, span)
    }

    fn parse_select(&mut self) -> Stmt {
        let select_pos = self.bump();
        self.expect(Tok::LBrace, "`{`");
        let mut clauses = Vec::new();
        while matches!(self.peek(), Some(Tok::KwCase | Tok::KwDefault)) {
            let start = self.cur_span().start;
            let (case_pos, comm) = if self.at(Tok::KwDefault) {
                (self.bump(), None)
            } else {
                let case_pos = self.bump();
                (case_pos, Some(self.parse_simple_stmt_id()))
            };
            let colon_pos = self.expect(Tok::Colon, "`:`");
            let stmts = self.parse_stmt_list();
            let clause = CommClause {
                case_pos,
                comm,
                colon_pos,
                stmts,
            };
            let span = self.span_from(start);
            clauses.push(self.arena.comm_clauses.alloc(clause, span));
        }
        self.expect(Tok::RBrace, "`}`");
        Stmt::Select {
            select_pos,
            clauses: self.arena.list_comm_clause_ids(clauses),
        }
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn parse_expr_vec(&mut self) -> Vec<ExprId> {
        let mut exprs = vec![self.parse_expr()];
        while self.eat(Tok::Comma).is_some() {
            exprs.push(self.parse_expr());
        }
        exprs
    }

    fn parse_expr_list(&mut self) -> ListRef<ExprId> {
        let exprs = self.parse_expr_vec();
        self.arena.list_exprs(exprs)
    }

    fn parse_expr(&mut self) -> ExprId {
        self.parse_binary(1)
    }

    fn parse_binary(&mut self, min_prec: u8) -> ExprId {
        let start = self.cur_span().start;
        let mut left = self.parse_unary();
        while let Some(op) = self.peek().and_then(binary_op) {
            if op.precedence() < min_prec {
                break;
            }
            let op_pos = self.bump();
            let right = self.parse_binary(op.precedence() + 1);
            let span = self.span_from(start);
            left = self.arena.exprs.alloc(
                Expr::Binary {
                    left,
                    op,
                    op_pos,
                    right,
                },
                span,
            );
        }
        left
    }

    fn parse_unary(&mut self) -> ExprId {
        if !self.enter_nest() {
            return self.bad_expr();
        }
        let x = self.parse_unary_inner();
        self.leave_nest();
        x
    }

    fn parse_unary_inner(&mut self) -> ExprId {
        let start = self.cur_span().start;
        let op = match self.peek() {
            Some(Tok::Plus) => UnaryOp::Add,
            Some(Tok::Minus) => UnaryOp::Sub,
            Some(Tok::Bang) => UnaryOp::Not,
            Some(Tok::Caret) => UnaryOp::Xor,
            Some(Tok::Star) => UnaryOp::Deref,
            Some(Tok::Amp) => UnaryOp::Addr,
            Some(Tok::Arrow) if self.peek_nth(1) != Some(Tok::KwChan) => UnaryOp::Recv,
            _ => return self.parse_primary(),
        };
        let op_pos = self.bump();
        let expr = self.parse_unary();
        let span = self.span_from(start);
        self.arena
            .exprs
            .alloc(Expr::Unary { op, op_pos, expr }, span)
    }

    fn parse_primary(&mut self) -> ExprId {
        let start = self.cur_span().start;
        let mut x = self.parse_operand();
        loop {
            let expr = match self.peek() {
                Some(Tok::Dot) => {
                    let dot_pos = self.bump();
                    match self.peek() {
                        Some(Tok::Ident(_)) => {
                            let name = self.ident();
                            Expr::Selector {
                                expr: x,
                                dot_pos,
                                ident: name.sym,
                                ident_pos: name.pos,
                            }
                        }
                        Some(Tok::LParen) => {
                            self.bump();
                            let typ = if self.eat(Tok::KwType).is_some() {
                                None
                            } else {
                                Some(self.parse_type())
                            };
                            let r_paren = self.expect(Tok::RParen, "`)`");
                            Expr::TypeAssert {
                                expr: x,
                                dot_pos,
                                typ,
                                r_paren,
                            }
                        }
                        _ => {
                            let found = self.describe_current();
                            let span = self.cur_span();
                            self.error(span, format!("expected selector, found {found}"));
                            break;
                        }
                    }
                }
                Some(Tok::LBrack) => {
                    let l_brack = self.bump();
                    let outer = std::mem::replace(&mut self.expr_lev, 0);
                    let lo = if self.at(Tok::Colon) {
                        None
                    } else {
                        Some(self.parse_expr())
                    };
                    let expr = match (self.eat(Tok::Colon), lo) {
                        (Some(_), lo) => {
                            let hi = if self.at(Tok::Colon) || self.at(Tok::RBrack) {
                                None
                            } else {
                                Some(self.parse_expr())
                            };
                            let max = if self.eat(Tok::Colon).is_some() {
                                Some(self.parse_expr())
                            } else {
                                None
                            };
                            let r_brack = self.expect(Tok::RBrack, "`]`");
                            Expr::Slice {
                                expr: x,
                                l_brack,
                                lo,
                                hi,
                                max,
                                r_brack,
                            }
                        }
                        (None, Some(first)) if self.at(Tok::Comma) => {
                            let mut args = vec![first];
                            while self.eat(Tok::Comma).is_some() && !self.at(Tok::RBrack) {
                                args.push(self.parse_expr());
                            }
                            let r_brack = self.expect(Tok::RBrack, "`]`");
                            Expr::Instantiate {
                                expr: x,
                                l_brack,
                                args: self.arena.list_exprs(args),
                                r_brack,
                            }
                        }
                        (None, Some(index)) => {
                            let r_brack = self.expect(Tok::RBrack, "`]`");
                            Expr::Index {
                                expr: x,
                                l_brack,
                                index,
                                r_brack,
                            }
                        }
                        (None, None) => {
                            let r_brack = self.expect(Tok::RBrack, "`]`");
                            let index = self.bad_expr();
                            Expr::Index {
                                expr: x,
                                l_brack,
                                index,
                                r_brack,
                            }
                        }
                    };
                    self.expr_lev = outer;
                    expr
                }
                Some(Tok::LParen) => {
                    let l_paren = self.bump();
                    let outer = std::mem::replace(&mut self.expr_lev, 0);
                    let mut args = Vec::new();
                    let mut ellipsis = None;
                    while !self.at(Tok::RParen) && !self.at_eof() {
                        let before = self.pos;
                        args.push(self.parse_expr());
                        if let Some(e) = self.eat(Tok::Ellipsis) {
                            ellipsis = Some(e);
                        }
                        if self.eat(Tok::Comma).is_none() || self.pos == before {
                            break;
                        }
                    }
                    self.expr_lev = outer;
                    let r_paren = self.expect(Tok::RParen, "`)`");
                    Expr::Call {
                        callee: x,
                        l_paren,
                        args: self.arena.list_exprs(args),
                        ellipsis,
                        r_paren,
                    }
                }
                Some(Tok::LBrace) if self.opens_composite_lit(x) => {
                    let Some(typ) = expr_to_type(&mut self.arena, x) else {
                        break;
                    };
                    let lit = self.parse_literal_value();
                    Expr::CompositeLit { typ, lit }
                }
                _ => break,
            };
            let span = self.span_from(start);
            x = self.arena.exprs.alloc(expr, span);
        }
        x
    }

    /// `T{` starts a composite literal unless we are in a control clause
    /// header and `T` is a bare type name. `T[A]{` counts as a type name.
    fn opens_composite_lit(&self, x: ExprId) -> bool {
        let plain_name = |e: ExprId| match self.arena.exprs[e] {
            Expr::Ident(_) => true,
            Expr::Selector { expr, .. } => matches!(self.arena.exprs[expr], Expr::Ident(_)),
            _ => false,
        };
        let is_type_name = match self.arena.exprs[x] {
            Expr::Index { expr, .. } | Expr::Instantiate { expr, .. } => plain_name(expr),
            _ => plain_name(x),
        };
        let is_literal_type = is_type_name
            || match self.arena.exprs[x] {
                Expr::Type(t) => matches!(
                    self.arena.types[t],
                    Type::Array { .. } | Type::Slice { .. } | Type::Map { .. } | Type::Struct { .. }
                ),
                _ => false,
            };
        is_literal_type && (self.expr_lev >= 0 || !is_type_name)
    }

    fn parse_operand(&mut self) -> ExprId {
        let start = self.cur_span().start;
        let expr = match self.peek() {
            Some(Tok::Ident(_)) => Expr::Ident(self.ident().sym),
            Some(Tok::IntLit(_)) => self.basic_lit(BasicLitKind::Int),
            Some(Tok::FloatLit(_)) => self.basic_lit(BasicLitKind::Float),
            Some(Tok::ImagLit(_)) => self.basic_lit(BasicLitKind::Imag),
            Some(Tok::RuneLit(_)) => self.basic_lit(BasicLitKind::Rune),
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => self.basic_lit(BasicLitKind::String),
            Some(Tok::LParen) => {
                let l_paren = self.bump();
                let outer = std::mem::replace(&mut self.expr_lev, 0);
                let expr = self.parse_expr();
                self.expr_lev = outer;
                let r_paren = self.expect(Tok::RParen, "`)`");
                Expr::Paren {
                    l_paren,
                    expr,
                    r_paren,
                }
            }
            Some(Tok::KwFunc) => {
                let func_pos = self.bump();
                let sig = self.parse_signature();
                if self.at(Tok::LBrace) {
                    let body = self.parse_block();
                    Expr::FuncLit {
                        func_pos,
                        sig,
                        body,
                    }
                } else {
                    let span = self.span_from(start);
                    Expr::Type(self.arena.types.alloc(Type::Func { func_pos, sig }, span))
                }
            }
            Some(Tok::LBrack | Tok::KwMap | Tok::KwChan | Tok::KwStruct | Tok::KwInterface) => {
                Expr::Type(self.parse_type())
            }
            Some(Tok::Arrow) => Expr::Type(self.parse_type()),
            _ => {
                let found = self.describe_current();
                let span = self.cur_span();
                self.error(span, format!("expected expression, found {found}"));
                Expr::Bad(span)
            }
        };
        let span = self.span_from(start);
        self.arena.exprs.alloc(expr, span)
    }

    fn basic_lit(&mut self, kind: BasicLitKind) -> Expr {
        Expr::BasicLit(BasicLit {
            kind,
            raw: self.bump(),
        })
    }

    fn parse_literal_value(&mut self) -> LiteralValue {
        let l_brace = self.expect(Tok::LBrace, "`{`");
        let outer = std::mem::replace(&mut self.expr_lev, 0);
        let mut elements = Vec::new();
        while !self.at(Tok::RBrace) && !self.at_eof() {
            let before = self.pos;
            let first = self.parse_element();
            let element = if self.eat(Tok::Colon).is_some() {
                KeyedElement {
                    key: Some(first),
                    value: self.parse_element(),
                }
            } else {
                KeyedElement {
                    key: None,
                    value: first,
                }
            };
            elements.push(element);
            if self.eat(Tok::Comma).is_none() || self.pos == before {
                break;
            }
        }
        self.expr_lev = outer;
        let r_brace = self.expect(Tok::RBrace, "`}`");
        LiteralValue {
            l_brace,
            elements: self.arena.list_keyed_elems(elements),
            r_brace,
        }
    }

    fn parse_element(&mut self) -> Element {
        if !self.enter_nest() {
            return Element::Expr(self.bad_expr());
        }
        let element = if self.at(Tok::LBrace) {
            Element::Literal(self.parse_literal_value())
        } else {
            Element::Expr(self.parse_expr())
        };
        self.leave_nest();
        element
    }
}

fn binary_op(tok: Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::LOr => BinaryOp::LOr,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::Amp => BinaryOp::And,
        Tok::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

fn assign_op(tok: Tok<'_>) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> ParsedFile {
        match parse_source(src) {
            Ok(f) => f,
            Err(fail) => panic!("expected parse ok, got {:#?}", fail.diags),
        }
    }

    fn body_stmts(f: &ParsedFile) -> Vec<StmtId> {
        let decls = f.arena.top_decls(f.file.decls);
        let TopLevelDecl::Func(id) = decls[decls.len() - 1] else {
            panic!("last decl is not a func");
        };
        let body = f.arena.funcs[id].body.expect("body");
        f.arena.stmts_list(body.stmts).to_vec()
    }

    #[test]
    fn parenthesized_deref_selector_shape() {
        let f = parse("package p\nfunc f() { (*k).field = 5 }\n");
        let stmts = body_stmts(&f);
        let Stmt::Simple(s) = f.arena.stmts[stmts[0]] else {
            panic!("not simple");
        };
        let SimpleStmt::Assign { lhs, .. } = f.arena.simple_stmts[s] else {
            panic!("not assign");
        };
        let sel = f.arena.exprs_list(lhs)[0];
        let Expr::Selector { expr: x, ident, .. } = f.arena.exprs[sel] else {
            panic!("not selector");
        };
        assert_eq!(f.name(ident), "field");
        assert_eq!(f.expr_text(sel), "(*k).field");
        let Expr::Paren { expr: inner, .. } = f.arena.exprs[x] else {
            panic!("not paren");
        };
        assert!(matches!(
            f.arena.exprs[inner],
            Expr::Unary {
                op: UnaryOp::Deref,
                ..
            }
        ));
    }

    #[test]
    fn composite_literal_not_taken_in_if_header() {
        let f = parse("package p\nfunc f() { if x == y { return } }\n");
        let stmts = body_stmts(&f);
        assert!(matches!(f.arena.stmts[stmts[0]], Stmt::If { .. }));
    }

    #[test]
    fn type_switch_is_recognized() {
        let f = parse(
            "package p\nfunc f(x any) {\n\tswitch v := x.(type) {\n\tcase int:\n\t\t_ = v\n\tdefault:\n\t}\n}\n",
        );
        let stmts = body_stmts(&f);
        let Stmt::TypeSwitch { bind, clauses, .. } = f.arena.stmts[stmts[0]] else {
            panic!("not a type switch");
        };
        assert_eq!(bind.map(|b| f.name(b.sym)), Some("v"));
        assert_eq!(clauses.len(), 2);
    }

    #[test]
    fn func_decl_span_covers_body() {
        let src = "package p\n\nfunc f() {\n\t// c\n}\n";
        let f = parse(src);
        let TopLevelDecl::Func(id) = f.arena.top_decls(f.file.decls)[0] else {
            panic!("not a func");
        };
        let span = f.arena.funcs.span(id);
        assert_eq!(f.text(span), "func f() {\n\t// c\n}");
        assert_eq!(f.arena.comment_group_ids(f.file.comments).len(), 1);
    }

    fn nested_parens(depth: usize) -> String {
        format!("package p\nvar x = {}1{}\n", "(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn deep_nesting_is_rejected_without_overflow() {
        let err = parse_source(&nested_parens(1000)).expect_err("should fail");
        assert_eq!(err.diags.len(), 1);
        assert_eq!(err.diags[0].message, "exceeded maximum nesting depth");
        assert!(err.partial.is_some());
    }

    #[test]
    fn moderate_nesting_parses() {
        parse(&nested_parens(100));
        parse(&format!("package p\nfunc f() {}{}\n", "{".repeat(60), "}".repeat(60)));
    }

    #[test]
    fn deep_types_blocks_and_literals_are_rejected() {
        let deep_type = format!("package p\nvar x {}int\n", "[]".repeat(1000));
        let deep_block = format!("package p\nfunc f() {}{}\n", "{".repeat(1000), "}".repeat(1000));
        let deep_lit = format!("package p\nvar x = T{}{}\n", "{".repeat(1000), "}".repeat(1000));
        for src in [deep_type, deep_block, deep_lit] {
            let err = parse_source(&src).expect_err("should fail");
            assert_eq!(err.diags[0].message, "exceeded maximum nesting depth");
        }
    }

    #[test]
    fn generic_function_and_method_shapes() {
        let f = parse(
            "package p\ntype List[T any] struct{ next *List[T] }\nfunc (l *List[T]) Len() int { return 0 }\nfunc Map[K comparable, V any](m map[K]V) []V { return nil }\n",
        );
        let decls = f.arena.top_decls(f.file.decls);
        let TopLevelDecl::Decl(list) = decls[0] else {
            panic!("not a decl");
        };
        let Decl::Gen(g) = f.arena.decls[list] else {
            panic!("bad decl");
        };
        let Spec::Type(spec) = f.arena.specs_list(g.specs)[0] else {
            panic!("not a type spec");
        };
        let tp = spec.type_params.expect("type params");
        assert_eq!(f.arena.type_params[tp].params.len(), 1);

        let TopLevelDecl::Func(method) = decls[1] else {
            panic!("not a func");
        };
        assert!(f.arena.funcs[method].type_params.is_none());

        let TopLevelDecl::Func(map_fn) = decls[2] else {
            panic!("not a func");
        };
        let tp = f.arena.funcs[map_fn].type_params.expect("type params");
        let decls = f.arena.type_param_decl_ids(f.arena.type_params[tp].params);
        let names: Vec<&str> = decls
            .iter()
            .flat_map(|&d| f.arena.ident_names(f.arena.type_param_decls[d].names))
            .map(|n| f.name(n.sym))
            .collect();
        assert_eq!(names, vec!["K", "V"]);
    }

    #[test]
    fn array_type_spec_is_not_type_params() {
        let f = parse("package p\nconst N = 4\ntype A [N]int\ntype S []int\n");
        let decls = f.arena.top_decls(f.file.decls);
        for &d in &decls[1..] {
            let TopLevelDecl::Decl(id) = d else {
                panic!("not a decl");
            };
            let Decl::Gen(g) = f.arena.decls[id] else {
                panic!("bad decl");
            };
            let Spec::Type(spec) = f.arena.specs_list(g.specs)[0] else {
                panic!("not a type spec");
            };
            assert!(spec.type_params.is_none());
        }
    }

    #[test]
    fn multi_argument_instantiation() {
        let f = parse("package p\nfunc f() { _ = Pair[int, string]{} ; g[int, bool](1) }\n");
        let stmts = body_stmts(&f);
        let Stmt::Simple(s) = f.arena.stmts[stmts[0]] else {
            panic!("not simple");
        };
        let SimpleStmt::Assign { rhs, .. } = f.arena.simple_stmts[s] else {
            panic!("not assign");
        };
        let Expr::CompositeLit { typ, .. } = f.arena.exprs[f.arena.exprs_list(rhs)[0]] else {
            panic!("not a composite literal");
        };
        let Type::Named { args, .. } = f.arena.types[typ] else {
            panic!("not named");
        };
        assert_eq!(args.len(), 2);

        let Stmt::Simple(s) = f.arena.stmts[stmts[1]] else {
            panic!("not simple");
        };
        let SimpleStmt::Expr(call) = f.arena.simple_stmts[s] else {
            panic!("not expr");
        };
        let Expr::Call { callee, .. } = f.arena.exprs[call] else {
            panic!("not call");
        };
        assert!(matches!(f.arena.exprs[callee], Expr::Instantiate { .. }));
    }

    #[test]
    fn reports_missing_brace() {
        let err = parse_source("package p\nfunc f() {\n").expect_err("should fail");
        assert!(!err.diags.is_empty());
        assert!(err.partial.is_some());
    }
}
