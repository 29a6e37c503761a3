use std::collections::VecDeque;

use lexsem_core::LineIndex;

use crate::error::{Error, Result};
use crate::token::{IntoToken, PrimitiveToken, Token, TokenKind};

const TAB_SIZE: usize = 8;

// longest first, so `**=` wins over `**` and `*`
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "**", "//", "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=",
    "%=", "&=", "|=", "^=", "@=", "->", ":=", "<<", ">>", "+", "-", "*", "/", "%", "@", "&", "|",
    "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ";", ".", "=",
];

const STRING_PREFIXES: &[&str] = &["r", "u", "f", "b", "br", "rb", "fr", "rf"];

pub struct Lexer<'lex> {
    content: &'lex str,
    line_index: LineIndex,
    pos: usize,
    indents: Vec<usize>,
    paren_depth: usize,
    at_line_start: bool,
    line_has_content: bool,
    pending: VecDeque<Token>,
    finished: bool,
}

impl<'lex> Lexer<'lex> {
    pub fn new(content: &'lex str) -> Self {
        Self {
            content,
            line_index: LineIndex::new(content),
            pos: 0,
            indents: vec![0],
            paren_depth: 0,
            at_line_start: true,
            line_has_content: false,
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.pending.pop_front() {
            return Ok(Some(token));
        }

        if self.finished {
            return Ok(None);
        }

        if self.at_line_start && self.paren_depth == 0 {
            self.at_line_start = false;
            if let Some(indent) = self.lex_indentation()? {
                return Ok(Some(indent));
            }
            if let Some(dedent) = self.pending.pop_front() {
                return Ok(Some(dedent));
            }
        }

        self.skip_whitespace();

        let start = self.pos;
        let Some(curr) = self.peek_char() else {
            return self.eof();
        };
        let next = self.peek_char_at(1);

        let token = match (curr, next) {
            ('#', _) => self.lex_comment(start),
            ('\n' | '\r', _) => self.lex_line_break(start),
            ('0'..='9', _) | ('.', Some('0'..='9')) => self.lex_number(start),
            ('"' | '\'', _) => self.lex_string(start)?,
            _ if curr.is_alphabetic() || curr == '_' => self.lex_name_or_string(start)?,
            _ => self.lex_operator(start),
        };

        if !matches!(
            token.kind,
            TokenKind::Newline | TokenKind::Nl | TokenKind::Comment
        ) {
            self.line_has_content = true;
        }

        Ok(Some(token))
    }

    fn peek_char(&self) -> Option<char> {
        self.content[self.pos..].chars().next()
    }

    fn peek_char_at(&self, n: usize) -> Option<char> {
        self.content[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn make_token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        let position = self.line_index.position(self.content, start);
        kind.into_token((start, end).into(), position)
    }

    fn line_at(&self, byte_offset: usize) -> usize {
        self.line_index.position(self.content, byte_offset).line
    }

    fn eof(&mut self) -> Result<Option<Token>> {
        if self.paren_depth > 0 {
            return Err(Error::UnclosedBracket {
                line: self.line_at(self.pos),
            });
        }

        let end = self.content.len();
        if self.line_has_content {
            self.line_has_content = false;
            let newline = self.make_token(TokenKind::Newline, end, end);
            self.pending.push_back(newline);
        }

        while self.indents.len() > 1 {
            self.indents.pop();
            let dedent = self.make_token(TokenKind::Dedent, end, end);
            self.pending.push_back(dedent);
        }

        let end_marker = self.make_token(TokenKind::EndMarker, end, end);
        self.pending.push_back(end_marker);
        self.finished = true;

        Ok(self.pending.pop_front())
    }

    fn lex_indentation(&mut self) -> Result<Option<Token>> {
        let start = self.pos;
        let mut width = 0;

        while let Some(ch) = self.peek_char() {
            match ch {
                ' ' => width += 1,
                '\t' => width = (width / TAB_SIZE + 1) * TAB_SIZE,
                '\x0c' => width = 0,
                _ => break,
            }
            self.pos += 1;
        }

        // blank and comment-only lines do not affect indentation
        if let None | Some('#' | '\n' | '\r') = self.peek_char() {
            return Ok(None);
        }

        let current = self.indents.last().copied().unwrap_or_default();
        if width > current {
            self.indents.push(width);
            return Ok(Some(self.make_token(TokenKind::Indent, start, self.pos)));
        }

        while width < self.indents.last().copied().unwrap_or_default() {
            self.indents.pop();
            let dedent = self.make_token(TokenKind::Dedent, self.pos, self.pos);
            self.pending.push_back(dedent);
        }

        if width != self.indents.last().copied().unwrap_or_default() {
            return Err(Error::InconsistentDedent {
                line: self.line_at(start),
            });
        }

        Ok(None)
    }

    fn skip_whitespace(&mut self) {
        loop {
            match (self.peek_char(), self.peek_char_at(1)) {
                (Some(' ' | '\t' | '\x0c'), _) => self.pos += 1,
                (Some('\\'), Some('\n')) => self.pos += 2,
                (Some('\\'), Some('\r')) => {
                    self.pos += 2;
                    if self.peek_char() == Some('\n') {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_comment(&mut self, start: usize) -> Token {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.bump();
        }
        self.make_token(TokenKind::Comment, start, self.pos)
    }

    fn lex_line_break(&mut self, start: usize) -> Token {
        if self.bump() == Some('\r') && self.peek_char() == Some('\n') {
            self.bump();
        }

        let kind = match self.paren_depth > 0 || !self.line_has_content {
            true => TokenKind::Nl,
            false => TokenKind::Newline,
        };

        if self.paren_depth == 0 {
            self.at_line_start = true;
            self.line_has_content = false;
        }

        self.make_token(kind, start, self.pos)
    }

    fn eat_digits(&mut self) {
        while let Some('0'..='9' | '_') = self.peek_char() {
            self.pos += 1;
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        let first = self.bump();

        if first == Some('0') && matches!(self.peek_char(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            self.pos += 1;
            while let Some(c) = self.peek_char() {
                if !c.is_ascii_hexdigit() && c != '_' {
                    break;
                }
                self.pos += 1;
            }
            return self.make_token(TokenKind::Number, start, self.pos);
        }

        self.eat_digits();
        if first != Some('.') && self.peek_char() == Some('.') {
            self.pos += 1;
            self.eat_digits();
        }

        if let Some('e' | 'E') = self.peek_char() {
            let digit_at = match self.peek_char_at(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if let Some('0'..='9') = self.peek_char_at(digit_at) {
                self.pos += digit_at;
                self.eat_digits();
            }
        }

        if let Some('j' | 'J') = self.peek_char() {
            self.pos += 1;
        }

        self.make_token(TokenKind::Number, start, self.pos)
    }

    fn lex_name_or_string(&mut self, start: usize) -> Result<Token> {
        while let Some(ch) = self.peek_char() {
            if !ch.is_alphanumeric() && ch != '_' {
                break;
            }
            self.bump();
        }

        let name = &self.content[start..self.pos];
        let is_prefix = STRING_PREFIXES.contains(&name.to_ascii_lowercase().as_str());
        if is_prefix && matches!(self.peek_char(), Some('"' | '\'')) {
            return self.lex_string(start);
        }

        Ok(self.make_token(TokenKind::Name, start, self.pos))
    }

    /// Lexes a string literal whose opening quote is at the current position;
    /// `start` points at the first prefix character, if any.
    fn lex_string(&mut self, start: usize) -> Result<Token> {
        let Some(quote) = self.bump() else {
            return Ok(self.make_token(TokenKind::Error, start, self.pos));
        };
        let quote_end = self.pos;

        let triple = self.peek_char() == Some(quote) && self.peek_char_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        loop {
            match self.bump() {
                None if triple => {
                    return Err(Error::UnterminatedString {
                        line: self.line_at(start),
                    });
                }
                None | Some('\n' | '\r') if !triple => {
                    // single quoted strings cannot span lines; report the
                    // opening quote and resume right after it
                    self.pos = quote_end;
                    return Ok(self.make_token(TokenKind::Error, start, quote_end));
                }
                Some('\\') => _ = self.bump(),
                Some(ch) if ch == quote => {
                    if !triple {
                        break;
                    }
                    if self.peek_char() == Some(quote) && self.peek_char_at(1) == Some(quote) {
                        self.pos += 2;
                        break;
                    }
                }
                _ => {}
            }
        }

        Ok(self.make_token(TokenKind::String, start, self.pos))
    }

    fn lex_operator(&mut self, start: usize) -> Token {
        let rest = &self.content[self.pos..];

        let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) else {
            self.bump();
            return self.make_token(TokenKind::Error, start, self.pos);
        };

        self.pos += op.len();
        match *op {
            "(" | "[" | "{" => self.paren_depth += 1,
            ")" | "]" | "}" => self.paren_depth = self.paren_depth.saturating_sub(1),
            _ => {}
        }

        self.make_token(TokenKind::Op, start, self.pos)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(error) => {
                self.finished = true;
                self.pending.clear();
                Some(Err(error))
            }
        }
    }
}

/// Every token of `content`, layout included.
pub fn tokenize(content: &str) -> Result<Vec<Token>> {
    Lexer::new(content).collect()
}

/// The tokens handed to the classifier: whitespace, indentation and end
/// markers removed.
pub fn primitive_tokens(content: &str) -> Result<Vec<PrimitiveToken>> {
    Lexer::new(content)
        .filter_map(|token| {
            token
                .map(|token| PrimitiveToken::from_token(&token, content))
                .transpose()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(content: &str) -> String {
        tokenize(content)
            .unwrap()
            .iter()
            .map(|token| format!("{} {:?}", token.kind.name(), token.text(content)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_indentation() {
        let content = "def f(a):\n    if a:\n        return 1\n    return 2\n";
        insta::assert_snapshot!(render(content), @r#"
        NAME "def"
        NAME "f"
        OP "("
        NAME "a"
        OP ")"
        OP ":"
        NEWLINE "\n"
        INDENT "    "
        NAME "if"
        NAME "a"
        OP ":"
        NEWLINE "\n"
        INDENT "        "
        NAME "return"
        NUMBER "1"
        NEWLINE "\n"
        DEDENT ""
        NAME "return"
        NUMBER "2"
        NEWLINE "\n"
        DEDENT ""
        ENDMARKER ""
        "#);
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let content = "x = 1  # one\n\n   # indented comment\ny = x\n";
        insta::assert_snapshot!(render(content), @r##"
        NAME "x"
        OP "="
        NUMBER "1"
        COMMENT "# one"
        NEWLINE "\n"
        NL "\n"
        COMMENT "# indented comment"
        NL "\n"
        NAME "y"
        OP "="
        NAME "x"
        NEWLINE "\n"
        ENDMARKER ""
        "##);
    }

    #[test]
    fn test_brackets_join_lines() {
        let content = "total = (1 +\n         2)";
        insta::assert_snapshot!(render(content), @r#"
        NAME "total"
        OP "="
        OP "("
        NUMBER "1"
        OP "+"
        NL "\n"
        NUMBER "2"
        OP ")"
        NEWLINE ""
        ENDMARKER ""
        "#);
    }

    #[test]
    fn test_operators_longest_match() {
        let content = "a **= b // c != d <= e ... f";
        let ops = tokenize(content)
            .unwrap()
            .into_iter()
            .filter(|token| token.kind == TokenKind::Op)
            .map(|token| token.text(content))
            .collect::<Vec<_>>();
        assert_eq!(ops, ["**=", "//", "!=", "<=", "..."]);
    }

    #[test]
    fn test_numbers() {
        let content = "1 2.5 .5 1e10 3.1e-2 0xff 1_000 2j";
        let numbers = tokenize(content)
            .unwrap()
            .into_iter()
            .filter(|token| token.kind == TokenKind::Number)
            .map(|token| token.text(content))
            .collect::<Vec<_>>();
        assert_eq!(
            numbers,
            ["1", "2.5", ".5", "1e10", "3.1e-2", "0xff", "1_000", "2j"]
        );
    }

    #[test]
    fn test_strings_with_prefixes() {
        let content = r#"f"{x}" rb'\x00' 'it\'s' """multi
line""" name"#;
        let tokens = tokenize(content).unwrap();
        let kinds = tokens
            .iter()
            .map(|token| (token.kind, token.text(content)))
            .take(5)
            .collect::<Vec<_>>();

        assert_eq!(
            kinds,
            [
                (TokenKind::String, r#"f"{x}""#),
                (TokenKind::String, r"rb'\x00'"),
                (TokenKind::String, r"'it\'s'"),
                (TokenKind::String, "\"\"\"multi\nline\"\"\""),
                (TokenKind::Name, "name"),
            ]
        );
        assert_eq!(tokens[4].line(), 2);
    }

    #[test]
    fn test_unterminated_single_quoted_string() {
        let content = "x = \"oops\n";
        insta::assert_snapshot!(render(content), @r#"
        NAME "x"
        OP "="
        ERRORTOKEN "\""
        NAME "oops"
        NEWLINE "\n"
        ENDMARKER ""
        "#);
    }

    #[test]
    fn test_unterminated_triple_quoted_string() {
        let content = "x = '''never closed\n";
        let result = tokenize(content);
        assert_eq!(result, Err(Error::UnterminatedString { line: 1 }));
    }

    #[test]
    fn test_invalid_characters() {
        let content = "a ? b $";
        let errors = tokenize(content)
            .unwrap()
            .into_iter()
            .filter(|token| token.kind == TokenKind::Error)
            .map(|token| token.text(content))
            .collect::<Vec<_>>();
        assert_eq!(errors, ["?", "$"]);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let content = "if x:\n        a = 1\n    b = 2\n";
        let result = tokenize(content);
        assert_eq!(result, Err(Error::InconsistentDedent { line: 3 }));
    }

    #[test]
    fn test_unclosed_bracket() {
        let content = "print(1,\n";
        let result = tokenize(content);
        assert_eq!(result, Err(Error::UnclosedBracket { line: 2 }));
    }

    #[test]
    fn test_carriage_return_only_line_endings() {
        let content = "x = 1\ry = 2\r";
        let lines = primitive_tokens(content)
            .unwrap()
            .into_iter()
            .map(|t| (t.text, t.line))
            .collect::<Vec<_>>();

        insta::assert_debug_snapshot!(lines, @r#"
        [
            (
                "x",
                1,
            ),
            (
                "=",
                1,
            ),
            (
                "1",
                1,
            ),
            (
                "y",
                2,
            ),
            (
                "=",
                2,
            ),
            (
                "2",
                2,
            ),
        ]
        "#);
    }

    #[test]
    fn test_primitive_tokens_skip_layout() {
        let content = "if x:\n    y = 1\n";
        let tokens = primitive_tokens(content).unwrap();
        let texts = tokens.iter().map(|t| t.text.as_str()).collect::<Vec<_>>();

        assert_eq!(texts, ["if", "x", ":", "y", "=", "1"]);
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[3].column, 4);
    }
}
