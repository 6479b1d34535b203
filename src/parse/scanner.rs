//! Tolerant scanner for the top-level declaration forms the rule cares about.
//!
//! This is not a JavaScript parser. It lexes one file — strings, template
//! literals, regex literals, comments, identifiers, punctuation — and then
//! recognizes exactly three statement shapes at brace depth zero:
//!
//!   * `import ...` declarations (side-effect, bindings, `import type`),
//!   * `import X = ...` / `export import X = ...` (TS import-equals),
//!   * `const/let/var x = require("...")...` with a static string argument.
//!
//! Everything else is opaque. Callers that need to know whether two imports
//! can be reordered check that the text between them contains nothing but
//! recognized import statements, comments, and whitespace.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Str,
    Num,
    Punct,
    Template,
    Regex,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
    line_start: usize,
    line_end: usize,
    /// Cooked value for string tokens.
    value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub start: usize,
    pub end: usize,
    pub line_start: usize,
    pub line_end: usize,
}

/// One statically-analyzable `require("...")` initializer inside a variable
/// statement. `start`/`end` cover the call expression itself, not any member
/// or call chain hanging off it.
#[derive(Debug, Clone)]
pub struct RequireInit {
    pub specifier: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub enum ImportForm {
    Import {
        specifier: String,
        type_only: bool,
        has_bindings: bool,
    },
    ImportEquals {
        /// Set for the external form `import X = require("spec")`.
        specifier: Option<String>,
        /// Raw module-reference text for the object form `import X = A.B.C`.
        object_text: Option<String>,
        type_only: bool,
        exported: bool,
    },
    Require {
        requires: Vec<RequireInit>,
        /// Single declarator, identifier or object-pattern target, and an
        /// initializer that is exactly the require call.
        plain: bool,
    },
}

#[derive(Debug, Clone)]
pub struct ImportStmt {
    /// Byte range of the statement proper (no trailing comment or newline).
    pub start: usize,
    pub end: usize,
    pub form: ImportForm,
}

impl ImportStmt {
    /// Whether reorder fixes may move other imports across this statement.
    pub fn is_reorderable(&self) -> bool {
        match &self.form {
            ImportForm::Import { has_bindings, .. } => *has_bindings,
            ImportForm::ImportEquals { specifier, .. } => specifier.is_some(),
            ImportForm::Require { plain, .. } => *plain,
        }
    }
}

#[derive(Debug, Default)]
pub struct ScanResult {
    /// Recognized import-ish statements, in source order.
    pub statements: Vec<ImportStmt>,
    /// Every comment in the file, in source order.
    pub comments: Vec<Comment>,
}

pub fn scan(src: &str) -> ScanResult {
    let mut lexer = Lexer::new(src);
    lexer.run();
    let statements = Parser {
        src,
        toks: &lexer.tokens,
        stmts: Vec::new(),
    }
    .run();
    ScanResult {
        statements,
        comments: lexer.comments,
    }
}

// ---------------------------------------------------------------- lexing

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'/' => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => self.line_comment(),
                    Some(b'*') => self.block_comment(),
                    _ => self.regex_or_div(),
                },
                b'\'' | b'"' => self.string(b),
                b'`' => self.template(),
                b'0'..=b'9' => self.number(),
                _ if is_ident_start(b) => self.ident(),
                _ => {
                    self.push_token(TokenKind::Punct, self.pos, self.pos + 1, None);
                    self.pos += 1;
                }
            }
        }
    }

    fn push_token(&mut self, kind: TokenKind, start: usize, end: usize, value: Option<String>) {
        let line_start = self.line;
        let line_end = self.line + count_newlines(&self.bytes[start..end]);
        self.tokens.push(Token {
            kind,
            start,
            end,
            line_start,
            line_end,
            value,
        });
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
        self.comments.push(Comment {
            start,
            end: self.pos,
            line_start: self.line,
            line_end: self.line,
        });
    }

    fn block_comment(&mut self) {
        let start = self.pos;
        let line_start = self.line;
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
            } else if self.bytes[self.pos] == b'*' && self.bytes.get(self.pos + 1) == Some(&b'/') {
                self.pos += 2;
                break;
            }
            self.pos += 1;
        }
        self.comments.push(Comment {
            start,
            end: self.pos.min(self.bytes.len()),
            line_start,
            line_end: self.line,
        });
    }

    fn string(&mut self, quote: u8) {
        let start = self.pos;
        let line_start = self.line;
        self.pos += 1;
        let content_start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'\\' {
                if self.bytes.get(self.pos + 1) == Some(&b'\n') {
                    self.line += 1;
                }
                self.pos = (self.pos + 2).min(self.bytes.len());
            } else if b == quote {
                break;
            } else if b == b'\n' {
                // Unterminated; recover at end of line.
                break;
            } else {
                self.pos += 1;
            }
        }
        let content_end = self.pos.min(self.bytes.len());
        if self.bytes.get(self.pos) == Some(&quote) {
            self.pos += 1;
        }
        let value = unescape(&self.src[content_start..content_end]);
        let end = self.pos;
        self.tokens.push(Token {
            kind: TokenKind::Str,
            start,
            end,
            line_start,
            line_end: self.line,
            value: Some(value),
        });
    }

    /// Template literal, including `${...}` substitutions. Substitution
    /// contents never produce tokens (they are expression-position, so no
    /// top-level declaration can live there), but comments inside them are
    /// still recorded.
    fn template(&mut self) {
        let start = self.pos;
        let line_start = self.line;
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos = (self.pos + 2).min(self.bytes.len()),
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'`' => {
                    self.pos += 1;
                    break;
                }
                b'$' if self.bytes.get(self.pos + 1) == Some(&b'{') => {
                    self.pos += 2;
                    self.substitution();
                }
                _ => self.pos += 1,
            }
        }
        let end = self.pos.min(self.bytes.len());
        self.tokens.push(Token {
            kind: TokenKind::Template,
            start,
            end,
            line_start,
            line_end: self.line,
            value: None,
        });
    }

    /// Consume a `${...}` substitution body up to its matching `}`.
    fn substitution(&mut self) {
        let mut depth = 1usize;
        while self.pos < self.bytes.len() && depth > 0 {
            match self.bytes[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'{' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'}' => {
                    depth -= 1;
                    self.pos += 1;
                }
                b'\'' | b'"' => {
                    let quote = self.bytes[self.pos];
                    let save = self.tokens.len();
                    self.string(quote);
                    self.tokens.truncate(save);
                }
                b'`' => {
                    let save = self.tokens.len();
                    self.template();
                    self.tokens.truncate(save);
                }
                b'/' => match self.bytes.get(self.pos + 1) {
                    Some(b'/') => self.line_comment(),
                    Some(b'*') => self.block_comment(),
                    _ => self.pos += 1,
                },
                _ => self.pos += 1,
            }
        }
    }

    fn number(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.push_token(TokenKind::Num, start, self.pos, None);
    }

    fn ident(&mut self) {
        let start = self.pos;
        while self.pos < self.bytes.len() && is_ident_continue(self.bytes[self.pos]) {
            self.pos += 1;
        }
        self.push_token(TokenKind::Ident, start, self.pos, None);
    }

    fn regex_or_div(&mut self) {
        if self.regex_allowed() {
            if let Some(end) = self.try_scan_regex() {
                self.push_token(TokenKind::Regex, self.pos, end, None);
                self.pos = end;
                return;
            }
        }
        self.push_token(TokenKind::Punct, self.pos, self.pos + 1, None);
        self.pos += 1;
    }

    /// A `/` starts a regex when the previous token cannot end an expression.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(t) => match t.kind {
                TokenKind::Num | TokenKind::Str | TokenKind::Template | TokenKind::Regex => false,
                TokenKind::Ident => matches!(
                    &self.src[t.start..t.end],
                    "return" | "typeof" | "instanceof" | "in" | "of" | "new" | "delete"
                        | "void" | "do" | "else" | "case" | "yield" | "await" | "throw"
                ),
                TokenKind::Punct => !matches!(self.bytes[t.start], b')' | b']' | b'}'),
            },
        }
    }

    fn try_scan_regex(&self) -> Option<usize> {
        let mut i = self.pos + 1;
        let mut in_class = false;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 1,
                b'\n' => return None,
                b'[' => in_class = true,
                b']' => in_class = false,
                b'/' if !in_class => {
                    i += 1;
                    while i < self.bytes.len() && is_ident_continue(self.bytes[i]) {
                        i += 1;
                    }
                    return Some(i);
                }
                _ => {}
            }
            i += 1;
        }
        None
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Cook a string literal body. Unknown escapes pass the escaped character
/// through, matching JS semantics for non-special escapes.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => break,
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('\n') => {} // line continuation
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(ch) => out.push(ch),
                    None => out.push_str(&hex),
                }
            }
            Some('u') => {
                let mut rest = chars.clone();
                if rest.next() == Some('{') {
                    let body: String = rest.by_ref().take_while(|&ch| ch != '}').collect();
                    match u32::from_str_radix(&body, 16).ok().and_then(char::from_u32) {
                        Some(ch) => {
                            out.push(ch);
                            // skip "{body}"
                            for _ in 0..body.len() + 2 {
                                chars.next();
                            }
                        }
                        None => out.push('u'),
                    }
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                        Some(ch) => out.push(ch),
                        None => out.push_str(&hex),
                    }
                }
            }
            Some(other) => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------- parsing

struct Parser<'a> {
    src: &'a str,
    toks: &'a [Token],
    stmts: Vec<ImportStmt>,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Vec<ImportStmt> {
        let mut i = 0;
        let mut depth: i32 = 0;
        while i < self.toks.len() {
            if depth == 0 {
                match self.ident_at(i) {
                    Some("import") if !self.prev_is_dot(i) => {
                        if let Some(next) = self.parse_import(i, i, false) {
                            i = next;
                            continue;
                        }
                    }
                    Some("export") if self.ident_at(i + 1) == Some("import") => {
                        if let Some(next) = self.parse_import(i, i + 1, true) {
                            i = next;
                            continue;
                        }
                    }
                    // `export const x = require(...)` hangs off the export
                    // declaration, not the module body; it never registers.
                    Some("export")
                        if matches!(
                            self.ident_at(i + 1),
                            Some("const") | Some("let") | Some("var")
                        ) =>
                    {
                        i += 2;
                        continue;
                    }
                    Some("const") | Some("let") | Some("var") => {
                        i = self.parse_var(i);
                        continue;
                    }
                    _ => {}
                }
            }
            depth += depth_delta(&self.toks[i], self.src);
            if depth < 0 {
                depth = 0;
            }
            i += 1;
        }
        self.stmts
    }

    fn ident_at(&self, i: usize) -> Option<&'a str> {
        let t = self.toks.get(i)?;
        (t.kind == TokenKind::Ident).then(|| &self.src[t.start..t.end])
    }

    fn punct_at(&self, i: usize) -> Option<u8> {
        let t = self.toks.get(i)?;
        (t.kind == TokenKind::Punct).then(|| self.src.as_bytes()[t.start])
    }

    fn str_at(&self, i: usize) -> Option<&str> {
        let t = self.toks.get(i)?;
        if t.kind == TokenKind::Str {
            t.value.as_deref()
        } else {
            None
        }
    }

    fn prev_is_dot(&self, i: usize) -> bool {
        i > 0 && self.punct_at(i - 1) == Some(b'.')
    }

    /// Skip a balanced (), [], or {} group starting at `i` (an opener).
    /// Returns the index just past the matching closer, or `toks.len()`.
    fn skip_balanced(&self, i: usize) -> usize {
        let mut depth = 0i32;
        let mut j = i;
        while j < self.toks.len() {
            match self.punct_at(j) {
                Some(b'(') | Some(b'[') | Some(b'{') => depth += 1,
                Some(b')') | Some(b']') | Some(b'}') => {
                    depth -= 1;
                    if depth <= 0 {
                        return j + 1;
                    }
                }
                _ => {}
            }
            j += 1;
        }
        j
    }

    /// True when a statement/declarator may end before token `j` by
    /// automatic semicolon insertion.
    fn asi_break_before(&self, j: usize) -> bool {
        if j == 0 || j >= self.toks.len() {
            return true;
        }
        let prev = &self.toks[j - 1];
        let next = &self.toks[j];
        next.line_start > prev.line_end
            && ends_expression(prev, self.src)
            && !continues_expression(next, self.src)
    }

    /// Consume expression tokens from `j` until a `;` or `,` at local depth
    /// zero, an ASI break, or end of input. Returns the index of the first
    /// unconsumed token.
    fn consume_expr(&self, mut j: usize, stop_at_comma: bool) -> usize {
        let mut depth = 0i32;
        while j < self.toks.len() {
            if depth == 0 {
                match self.punct_at(j) {
                    Some(b';') => return j,
                    Some(b',') if stop_at_comma => return j,
                    Some(b')') | Some(b']') | Some(b'}') => return j,
                    _ => {}
                }
                if j > 0 && self.asi_break_before(j) {
                    return j;
                }
            }
            match self.punct_at(j) {
                Some(b'(') | Some(b'[') | Some(b'{') => depth += 1,
                Some(b')') | Some(b']') | Some(b'}') => depth -= 1,
                _ => {}
            }
            j += 1;
        }
        j
    }

    /// Parse an import declaration. `start_idx` is the first token of the
    /// statement (the `export` keyword for `export import`), `import_idx`
    /// the `import` token. Returns the index after the statement, or None
    /// if this is not a declaration (dynamic import, `import.meta`, or a
    /// shape we do not recognize).
    fn parse_import(&mut self, start_idx: usize, import_idx: usize, exported: bool) -> Option<usize> {
        let mut j = import_idx + 1;
        match self.punct_at(j) {
            Some(b'(') | Some(b'.') => return None,
            _ => {}
        }
        self.toks.get(j)?;

        let mut type_only = false;
        if self.ident_at(j) == Some("type") {
            let marks_type = match self.toks.get(j + 1) {
                Some(t) if t.kind == TokenKind::Ident => self.ident_at(j + 1) != Some("from"),
                Some(t) if t.kind == TokenKind::Punct => {
                    matches!(self.src.as_bytes()[t.start], b'{' | b'*')
                }
                _ => false,
            };
            if marks_type {
                type_only = true;
                j += 1;
            }
        }

        let start = self.toks[start_idx].start;

        // Side-effect import: `import "spec"`.
        if let Some(spec) = self.str_at(j) {
            if exported {
                return None;
            }
            let specifier = spec.to_string();
            let next = self.finish_statement(j + 1);
            self.push_stmt(start, next, ImportForm::Import {
                specifier,
                type_only,
                has_bindings: false,
            });
            return Some(next);
        }

        // TS import-equals: `import X = ...`.
        if self.toks.get(j).map(|t| t.kind) == Some(TokenKind::Ident)
            && self.punct_at(j + 1) == Some(b'=')
        {
            let j2 = j + 2;
            if self.ident_at(j2) == Some("require")
                && self.punct_at(j2 + 1) == Some(b'(')
                && self.str_at(j2 + 2).is_some()
                && self.punct_at(j2 + 3) == Some(b')')
            {
                let specifier = self.str_at(j2 + 2).map(str::to_string);
                let next = self.finish_statement(j2 + 4);
                self.push_stmt(start, next, ImportForm::ImportEquals {
                    specifier,
                    object_text: None,
                    type_only,
                    exported,
                });
                return Some(next);
            }
            // Object form: `import X = A.B.C`.
            let after = self.consume_expr(j2, false);
            if after == j2 {
                return None;
            }
            let object_text = self.src[self.toks[j2].start..self.toks[after - 1].end].to_string();
            let next = self.finish_statement(after);
            self.push_stmt(start, next, ImportForm::ImportEquals {
                specifier: None,
                object_text: Some(object_text),
                type_only,
                exported,
            });
            return Some(next);
        }

        if exported {
            return None;
        }

        // Bindings: consume until `from` at local depth zero, then the specifier.
        let mut depth = 0i32;
        let mut k = j;
        let from_idx = loop {
            let t = self.toks.get(k)?;
            if depth == 0 {
                if t.kind == TokenKind::Ident && &self.src[t.start..t.end] == "from" {
                    break k;
                }
                if t.kind == TokenKind::Punct && self.src.as_bytes()[t.start] == b';' {
                    return None;
                }
            }
            if t.kind == TokenKind::Punct {
                match self.src.as_bytes()[t.start] {
                    b'(' | b'[' | b'{' => depth += 1,
                    b')' | b']' | b'}' => depth -= 1,
                    _ => {}
                }
            }
            k += 1;
        };
        let specifier = self.str_at(from_idx + 1)?.to_string();
        let next = self.finish_statement(from_idx + 2);
        self.push_stmt(start, next, ImportForm::Import {
            specifier,
            type_only,
            has_bindings: true,
        });
        Some(next)
    }

    /// Consume an optional import-assertion clause and a trailing `;`
    /// starting at `j`; returns the index after the statement.
    fn finish_statement(&mut self, mut j: usize) -> usize {
        if matches!(self.ident_at(j), Some("assert") | Some("with"))
            && self.punct_at(j + 1) == Some(b'{')
        {
            j = self.skip_balanced(j + 1);
        }
        if self.punct_at(j) == Some(b';') {
            j + 1
        } else {
            j
        }
    }

    fn push_stmt(&mut self, start: usize, next: usize, form: ImportForm) {
        let end = if next > 0 && next <= self.toks.len() {
            self.toks[next - 1].end
        } else {
            start
        };
        self.stmts.push(ImportStmt { start, end, form });
    }

    /// Parse a `const`/`let`/`var` statement, recording static require
    /// initializers. Returns the index after the statement.
    fn parse_var(&mut self, i: usize) -> usize {
        let start = self.toks[i].start;
        let mut j = i + 1;
        let mut requires: Vec<RequireInit> = Vec::new();
        let mut declarators = 0usize;
        let mut first_pattern_simple = false;
        let mut first_init_plain = false;

        loop {
            // Binding pattern.
            let pattern_simple = match (self.ident_at(j), self.punct_at(j)) {
                (Some(_), _) => {
                    j += 1;
                    true
                }
                (_, Some(b'{')) => {
                    j = self.skip_balanced(j);
                    true
                }
                (_, Some(b'[')) => {
                    j = self.skip_balanced(j);
                    false
                }
                _ => break,
            };
            declarators += 1;
            if declarators == 1 {
                first_pattern_simple = pattern_simple;
            }

            // TS type annotation.
            if self.punct_at(j) == Some(b':') {
                j = self.consume_type_annotation(j + 1);
            }

            // Initializer.
            if self.punct_at(j) == Some(b'=') {
                j += 1;
                if self.ident_at(j) == Some("require")
                    && self.punct_at(j + 1) == Some(b'(')
                    && self.str_at(j + 2).is_some()
                    && self.punct_at(j + 3) == Some(b')')
                {
                    let call_start = self.toks[j].start;
                    let call_end = self.toks[j + 3].end;
                    let specifier = self.str_at(j + 2).unwrap_or_default().to_string();
                    let mut k = j + 4;
                    let mut chained = false;
                    loop {
                        if self.punct_at(k) == Some(b'.')
                            && self.toks.get(k + 1).map(|t| t.kind) == Some(TokenKind::Ident)
                        {
                            chained = true;
                            k += 2;
                        } else if matches!(self.punct_at(k), Some(b'(') | Some(b'[')) {
                            chained = true;
                            k = self.skip_balanced(k);
                        } else {
                            break;
                        }
                    }
                    let at_end = k >= self.toks.len()
                        || matches!(self.punct_at(k), Some(b',') | Some(b';'))
                        || self.asi_break_before(k);
                    if at_end {
                        requires.push(RequireInit {
                            specifier,
                            start: call_start,
                            end: call_end,
                        });
                        if declarators == 1 {
                            first_init_plain = !chained;
                        }
                        j = k;
                    } else {
                        // The require call feeds a larger expression; its
                        // parent is not the declarator, so it never registers.
                        j = self.consume_expr(k, true);
                    }
                } else {
                    j = self.consume_expr(j, true);
                }
            }

            if self.punct_at(j) == Some(b',') {
                j += 1;
                continue;
            }
            break;
        }

        let next = if self.punct_at(j) == Some(b';') { j + 1 } else { j };
        if !requires.is_empty() {
            let plain = declarators == 1
                && requires.len() == 1
                && first_pattern_simple
                && first_init_plain;
            let end = if next > 0 {
                self.toks[(next - 1).min(self.toks.len() - 1)].end
            } else {
                start
            };
            self.stmts.push(ImportStmt {
                start,
                end,
                form: ImportForm::Require { requires, plain },
            });
        }
        next.max(i + 1)
    }

    /// Consume a type annotation after `:` until `=`, `,`, `;`, or an ASI
    /// break at depth zero, tracking `<...>` generics.
    fn consume_type_annotation(&self, mut j: usize) -> usize {
        let mut depth = 0i32;
        let mut angle = 0i32;
        while j < self.toks.len() {
            if depth == 0 && angle == 0 {
                match self.punct_at(j) {
                    Some(b'=') | Some(b',') | Some(b';') => return j,
                    Some(b')') | Some(b']') | Some(b'}') => return j,
                    _ => {}
                }
                if self.asi_break_before(j) {
                    return j;
                }
            }
            match self.punct_at(j) {
                Some(b'(') | Some(b'[') | Some(b'{') => depth += 1,
                Some(b')') | Some(b']') | Some(b'}') => depth -= 1,
                Some(b'<') => angle += 1,
                Some(b'>') => angle = (angle - 1).max(0),
                _ => {}
            }
            j += 1;
        }
        j
    }
}

fn depth_delta(t: &Token, src: &str) -> i32 {
    if t.kind != TokenKind::Punct {
        return 0;
    }
    match src.as_bytes()[t.start] {
        b'(' | b'[' | b'{' => 1,
        b')' | b']' | b'}' => -1,
        _ => 0,
    }
}

fn ends_expression(t: &Token, src: &str) -> bool {
    match t.kind {
        TokenKind::Num | TokenKind::Str | TokenKind::Template | TokenKind::Regex => true,
        TokenKind::Ident => !matches!(
            &src[t.start..t.end],
            "return" | "typeof" | "instanceof" | "in" | "of" | "new" | "delete" | "void"
                | "case" | "yield" | "throw"
        ),
        TokenKind::Punct => matches!(src.as_bytes()[t.start], b')' | b']' | b'}'),
    }
}

fn continues_expression(t: &Token, src: &str) -> bool {
    match t.kind {
        TokenKind::Punct => matches!(
            src.as_bytes()[t.start],
            b'.' | b'(' | b'[' | b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'<' | b'>'
                | b'&' | b'|' | b'^' | b'?' | b':' | b',' | b'!' | b'~'
        ),
        TokenKind::Template => true,
        _ => false,
    }
}
