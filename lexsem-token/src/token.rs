use lexsem_core::{Location, Position};
use serde::Serialize;

pub trait IntoToken {
    fn into_token(self, location: Location, start: Position) -> Token;
}

/// Raw token kinds, named after the host language's tokenizer so the
/// reports read the same way.
#[derive(Debug, Clone, Serialize, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Op,
    Comment,
    /// End of a logical line.
    Newline,
    /// Line break that does not end a logical line (blank lines, comment
    /// lines, breaks inside brackets).
    Nl,
    Indent,
    Dedent,
    EndMarker,
    Error,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Op => "OP",
            TokenKind::Comment => "COMMENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndMarker => "ENDMARKER",
            TokenKind::Error => "ERRORTOKEN",
        }
    }

    /// Whitespace, indentation and end markers never reach the classifier.
    pub fn is_layout(self) -> bool {
        matches!(
            self,
            TokenKind::Newline
                | TokenKind::Nl
                | TokenKind::Indent
                | TokenKind::Dedent
                | TokenKind::EndMarker
        )
    }

    /// Tokens the parser never looks at.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Nl)
    }

    pub fn coarse_kind(self) -> Option<CoarseKind> {
        let kind = match self {
            TokenKind::Name => CoarseKind::Name,
            TokenKind::Number => CoarseKind::Number,
            TokenKind::String => CoarseKind::String,
            TokenKind::Op => CoarseKind::Operator,
            TokenKind::Error => CoarseKind::Error,
            TokenKind::Comment => CoarseKind::Other,
            _ if self.is_layout() => return None,
            _ => CoarseKind::Other,
        };
        Some(kind)
    }
}

impl IntoToken for TokenKind {
    fn into_token(self, location: Location, start: Position) -> Token {
        Token {
            kind: self,
            location,
            start,
        }
    }
}

#[derive(Debug, Clone, Serialize, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoarseKind {
    Name,
    String,
    Number,
    Operator,
    Error,
    Other,
}

impl std::fmt::Display for CoarseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CoarseKind::Name => "NAME",
            CoarseKind::String => "STRING",
            CoarseKind::Number => "NUMBER",
            CoarseKind::Operator => "OP",
            CoarseKind::Error => "ERRORTOKEN",
            CoarseKind::Other => "OTHER",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: Location,
    pub start: Position,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn line(&self) -> usize {
        self.start.line
    }

    pub fn text<'src>(&self, content: &'src str) -> &'src str {
        &content[self.location.to_range()]
    }

    pub fn is_op(&self, content: &str, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text(content) == op
    }

    pub fn is_keyword(&self, content: &str, keyword: &str) -> bool {
        self.kind == TokenKind::Name && self.text(content) == keyword
    }
}

/// A lexical unit as handed to the classifier: layout tokens already
/// removed, text owned.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PrimitiveToken {
    pub text: String,
    pub coarse_kind: CoarseKind,
    pub line: usize,
    pub column: usize,
}

impl PrimitiveToken {
    pub fn new(text: impl Into<String>, coarse_kind: CoarseKind, line: usize, column: usize) -> Self {
        Self {
            text: text.into(),
            coarse_kind,
            line,
            column,
        }
    }

    pub fn from_token(token: &Token, content: &str) -> Option<Self> {
        let coarse_kind = token.kind.coarse_kind()?;
        Some(Self::new(
            token.text(content),
            coarse_kind,
            token.start.line,
            token.start.column,
        ))
    }
}

/// Cursor over the significant tokens of a source file.
#[derive(Debug)]
pub struct Tokens {
    pub inner: Vec<Token>,
    pub index: usize,
    pub eof: Token,
}

impl Tokens {
    pub fn new(tokens: Vec<Token>, content: &str) -> Self {
        let end = content.len();
        let last_line = tokens.last().map(|token| token.start).unwrap_or_default();
        let eof = TokenKind::EndMarker.into_token((end, end).into(), last_line);

        Self {
            inner: tokens.into_iter().filter(|t| !t.kind.is_trivia()).collect(),
            index: 0,
            eof,
        }
    }

    pub fn next_token(&mut self) -> Token {
        match self.inner.get(self.index).copied() {
            Some(token) => {
                self.index += 1;
                token
            }
            None => self.eof,
        }
    }

    pub fn consume(&mut self) {
        self.index += 1;
    }

    pub fn peek(&self) -> Token {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> Token {
        self.inner.get(self.index + n).copied().unwrap_or(self.eof)
    }

    pub fn consume_newlines(&mut self) {
        while matches!(
            self.inner.get(self.index),
            Some(Token {
                kind: TokenKind::Newline,
                ..
            })
        ) {
            self.index += 1;
        }
    }
}
