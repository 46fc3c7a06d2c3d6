use crate::ast::{CommentKind, Span};
use crate::error::{Diag, LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

// =============================================================================
// 1. Callbacks
// =============================================================================

#[inline(always)]
fn first_newline_offset(s: &str) -> Option<usize> {
    memchr::memchr2(b'\n', b'\r', s.as_bytes())
}

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr::memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

fn unterminated_string(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

/// Classifies a number literal matched by the `Number` patterns.
fn number_token(slice: &str) -> Result<Tok<'_>, LexErrorKind> {
    let bytes = slice.as_bytes();
    if bytes.ends_with(b"__") || bytes.last() == Some(&b'_') {
        return Err(LexErrorKind::InvalidNumber);
    }
    if bytes.last() == Some(&b'i') {
        return Ok(Tok::ImagLit(slice));
    }

    let is_prefixed = bytes.len() > 1
        && bytes[0] == b'0'
        && matches!(bytes[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B');
    if is_prefixed {
        if bytes.len() == 2 {
            return Err(LexErrorKind::InvalidNumber);
        }
        let digits = &bytes[2..];
        let ok = match bytes[1] {
            b'o' | b'O' => digits.iter().all(|b| matches!(b, b'0'..=b'7' | b'_')),
            b'b' | b'B' => digits.iter().all(|b| matches!(b, b'0' | b'1' | b'_')),
            _ => true,
        };
        return if ok {
            Ok(Tok::IntLit(slice))
        } else {
            Err(LexErrorKind::InvalidNumber)
        };
    }

    if bytes.iter().any(|b| matches!(b, b'.' | b'e' | b'E')) {
        Ok(Tok::FloatLit(slice))
    } else {
        Ok(Tok::IntLit(slice))
    }
}

// =============================================================================
// 2. Raw tokens (logos DFA)
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\f]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i?")]
    #[regex(r"0[xX][0-9a-fA-F_]+i?")]
    #[regex(r"0[oObB][0-9_]+i?")]
    Number,

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#)] String,
    #[regex(r#""([^"\\\n\r]|\\.)*"#, unterminated_string)] UnterminatedString,
    #[regex(r"'([^'\\\n\r]|\\.)+'")] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    /// A newline after one of these tokens becomes a `;`.
    #[inline]
    const fn can_insert_semicolon(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Number
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::KwBreak
                | Self::KwContinue
                | Self::KwFallthrough
                | Self::KwReturn
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBrack
                | Self::RBrace
        )
    }

    #[rustfmt::skip]
    fn to_token(self, slice: &str) -> Tok<'_> {
        match self {
            Self::Ident => Tok::Ident(slice),
            Self::Rune => Tok::RuneLit(slice),
            Self::String => Tok::StringLit(slice),
            Self::RawString => Tok::RawStringLit(slice),

            Self::KwBreak => Tok::KwBreak, Self::KwCase => Tok::KwCase,
            Self::KwChan => Tok::KwChan, Self::KwConst => Tok::KwConst,
            Self::KwContinue => Tok::KwContinue, Self::KwDefault => Tok::KwDefault,
            Self::KwDefer => Tok::KwDefer, Self::KwElse => Tok::KwElse,
            Self::KwFallthrough => Tok::KwFallthrough, Self::KwFor => Tok::KwFor,
            Self::KwFunc => Tok::KwFunc, Self::KwGo => Tok::KwGo,
            Self::KwGoto => Tok::KwGoto, Self::KwIf => Tok::KwIf,
            Self::KwImport => Tok::KwImport, Self::KwInterface => Tok::KwInterface,
            Self::KwMap => Tok::KwMap, Self::KwPackage => Tok::KwPackage,
            Self::KwRange => Tok::KwRange, Self::KwReturn => Tok::KwReturn,
            Self::KwSelect => Tok::KwSelect, Self::KwStruct => Tok::KwStruct,
            Self::KwSwitch => Tok::KwSwitch, Self::KwType => Tok::KwType,
            Self::KwVar => Tok::KwVar,

            Self::Ellipsis => Tok::Ellipsis, Self::ShlAssign => Tok::ShlAssign,
            Self::ShrAssign => Tok::ShrAssign, Self::AndNotAssign => Tok::AndNotAssign,
            Self::AddAssign => Tok::AddAssign, Self::SubAssign => Tok::SubAssign,
            Self::MulAssign => Tok::MulAssign, Self::DivAssign => Tok::DivAssign,
            Self::ModAssign => Tok::ModAssign, Self::AndAssign => Tok::AndAssign,
            Self::OrAssign => Tok::OrAssign, Self::XorAssign => Tok::XorAssign,
            Self::Shl => Tok::Shl, Self::Shr => Tok::Shr, Self::AndNot => Tok::AndNot,
            Self::LAnd => Tok::LAnd, Self::LOr => Tok::LOr,
            Self::EqEq => Tok::EqEq, Self::NotEq => Tok::NotEq,
            Self::Le => Tok::Le, Self::Ge => Tok::Ge,
            Self::Inc => Tok::Inc, Self::Dec => Tok::Dec,
            Self::Define => Tok::Define, Self::Arrow => Tok::Arrow, Self::Assign => Tok::Assign,
            Self::Plus => Tok::Plus, Self::Minus => Tok::Minus, Self::Star => Tok::Star,
            Self::Slash => Tok::Slash, Self::Percent => Tok::Percent,
            Self::Amp => Tok::Amp, Self::Pipe => Tok::Pipe, Self::Caret => Tok::Caret,
            Self::Tilde => Tok::Tilde, Self::Bang => Tok::Bang,
            Self::Lt => Tok::Lt, Self::Gt => Tok::Gt,

            Self::LParen => Tok::LParen, Self::RParen => Tok::RParen,
            Self::LBrack => Tok::LBrack, Self::RBrack => Tok::RBrack,
            Self::LBrace => Tok::LBrace, Self::RBrace => Tok::RBrace,
            Self::Comma => Tok::Comma, Self::Semi => Tok::Semi,
            Self::Colon => Tok::Colon, Self::Dot => Tok::Dot,

            // Trivia, numbers and errors are handled by the wrapper.
            Self::Bom
            | Self::Newline
            | Self::LineComment
            | Self::BlockComment
            | Self::Number
            | Self::UnterminatedString
            | Self::Error => Tok::Error,
        }
    }
}

// =============================================================================
// 3. Public tokens (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl<'input> std::fmt::Display for Tok<'input> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

// =============================================================================
// 4. Lexer wrapper: semicolon insertion, comment capture, diagnostics
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    comments: Vec<(Span, CommentKind)>,
    /// Index into `comments` of the first comment of each group.
    group_starts: Vec<usize>,
    /// The current group trails a token on the same line.
    group_trailing: bool,
    tok_since_comment: bool,
    last_tok_end: Option<usize>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::with_capacity(16),
            comments: Vec::new(),
            group_starts: Vec::new(),
            group_trailing: false,
            tok_since_comment: true,
            last_tok_end: None,
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    /// Comments seen so far, in source order.
    pub fn take_comments(&mut self) -> Vec<(Span, CommentKind)> {
        self.group_starts.clear();
        std::mem::take(&mut self.comments)
    }

    /// Comments seen so far, split into groups. A group ends at a token or
    /// a blank line; a group trailing a token ends with its line.
    pub fn take_comment_groups(&mut self) -> Vec<Vec<(Span, CommentKind)>> {
        let starts = std::mem::take(&mut self.group_starts);
        let mut comments = std::mem::take(&mut self.comments);
        let mut groups = Vec::with_capacity(starts.len());
        for &start in starts.iter().rev() {
            groups.push(comments.split_off(start));
        }
        groups.reverse();
        groups
    }

    fn newlines_between(&self, from: usize, to: usize) -> usize {
        self.logos
            .source()
            .as_bytes()
            .get(from..to)
            .map_or(0, |b| memchr::memchr_iter(b'\n', b).count())
    }

    fn push_comment(&mut self, span: Span, kind: CommentKind) {
        let start = span.start as usize;
        let joins_group = match self.comments.last() {
            Some(&(prev, _)) if !self.tok_since_comment => {
                let allowed = usize::from(!self.group_trailing);
                self.newlines_between(prev.end as usize, start) <= allowed
            }
            _ => false,
        };
        if !joins_group {
            self.group_trailing = self.tok_since_comment
                && self
                    .last_tok_end
                    .is_some_and(|end| self.newlines_between(end, start) == 0);
            self.group_starts.push(self.comments.len());
        }
        self.comments.push((span, kind));
        self.tok_since_comment = false;
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.emit_semi_at(self.src_len);
        }
    }

    fn handle_lex_error(&mut self, kind: LexErrorKind) -> (usize, Tok<'src>, usize) {
        let span = self.logos.span();
        if kind == LexErrorKind::UnterminatedComment {
            self.push_comment(Span::from_range(span.clone()), CommentKind::Block);
        }
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        (span.start, Tok::Error, span.end)
    }

    /// `None` means the raw token produced nothing (trivia).
    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        match raw {
            RawTok::Bom if span.start == 0 => None,
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start);
                }
                None
            }
            RawTok::LineComment => {
                self.push_comment(Span::from_range(span), CommentKind::Line);
                None
            }
            RawTok::BlockComment => {
                // A block comment spanning lines acts like a newline.
                if self.last_can_insert_semi {
                    if let Some(off) = first_newline_offset(slice) {
                        self.last_can_insert_semi = false;
                        self.emit_semi_at(span.start + off);
                    }
                }
                self.push_comment(Span::from_range(span), CommentKind::Block);
                None
            }
            RawTok::Bom | RawTok::Error => {
                self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
                self.last_can_insert_semi = false;
                Some((span.start, Tok::Error, span.end))
            }
            RawTok::Number => match number_token(slice) {
                Ok(tok) => {
                    self.last_can_insert_semi = true;
                    Some((span.start, tok, span.end))
                }
                Err(kind) => {
                    self.push_lex_diag(kind, span.clone());
                    self.last_can_insert_semi = false;
                    Some((span.start, Tok::Error, span.end))
                }
            },
            _ => {
                self.last_can_insert_semi = raw.can_insert_semicolon();
                Some((span.start, raw.to_token(slice), span.end))
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            let item = match self.logos.next() {
                // Don't return yet: a pending ';' may still be queued.
                None => {
                    self.handle_eof();
                    continue;
                }
                Some(Err(kind)) => self.handle_lex_error(kind),
                Some(Ok(raw)) => match self.handle_raw_token(raw) {
                    Some(item) => item,
                    None => continue,
                },
            };
            // Inserted semicolons never reach here; they do not end a
            // comment group.
            self.tok_since_comment = true;
            self.last_tok_end = Some(item.2);
            return Some(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<Tok<'_>> {
        Lexer::new(input).map(|(_, t, _)| t).collect()
    }

    #[test]
    fn classifies_numbers() {
        assert_eq!(
            toks("1 1.5 .5 1e3 0x1F 0o17 0b101 2i"),
            vec![
                Tok::IntLit("1"),
                Tok::FloatLit("1.5"),
                Tok::FloatLit(".5"),
                Tok::FloatLit("1e3"),
                Tok::IntLit("0x1F"),
                Tok::IntLit("0o17"),
                Tok::IntLit("0b101"),
                Tok::ImagLit("2i"),
                Tok::Semi,
            ]
        );
    }

    #[test]
    fn rejects_bad_octal_digits() {
        let mut lx = Lexer::new("0o19");
        let out: Vec<_> = lx.by_ref().map(|(_, t, _)| t).collect();
        assert_eq!(out, vec![Tok::Error]);
        assert_eq!(lx.take_diags().len(), 1);
    }

    #[test]
    fn captures_comments_with_spans() {
        let src = "x // one\n/* two */ y";
        let mut lx = Lexer::new(src);
        let _: Vec<_> = lx.by_ref().collect();
        let comments = lx.take_comments();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0], (Span::new(2, 8), CommentKind::Line));
        assert_eq!(comments[1], (Span::new(9, 18), CommentKind::Block));
    }

    fn group_texts(src: &str) -> Vec<Vec<&str>> {
        let mut lx = Lexer::new(src);
        let _: Vec<_> = lx.by_ref().collect();
        lx.take_comment_groups()
            .into_iter()
            .map(|g| g.iter().map(|(s, _)| &src[s.start as usize..s.end as usize]).collect())
            .collect()
    }

    #[test]
    fn adjacent_comments_form_one_group() {
        assert_eq!(group_texts("// a\n// b\nx"), vec![vec!["// a", "// b"]]);
    }

    #[test]
    fn blank_line_and_tokens_split_groups() {
        assert_eq!(
            group_texts("// a\n\n// b\nx /* c */ y // d\n"),
            vec![vec!["// a"], vec!["// b"], vec!["/* c */"], vec!["// d"]]
        );
    }

    #[test]
    fn trailing_comment_ends_with_its_line() {
        assert_eq!(
            group_texts("x // a\n// b\n// c\ny"),
            vec![vec!["// a"], vec!["// b", "// c"]]
        );
        assert_eq!(
            group_texts("x /* a */ /* b */\ny"),
            vec![vec!["/* a */", "/* b */"]]
        );
    }

    #[test]
    fn unterminated_string_is_reported() {
        let mut lx = Lexer::new("\"abc\nx");
        let _: Vec<_> = lx.by_ref().collect();
        let diags = lx.take_diags();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "unterminated string");
    }
}
