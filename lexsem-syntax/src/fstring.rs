use crate::literals::unescape;

/// One segment of a formatted string body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece<'src> {
    Literal(String),
    Field {
        expression: &'src str,
        conversion: Option<char>,
        format_spec: Option<Vec<Piece<'src>>>,
    },
}

/// Splits the body of an f-string into literal text and replacement fields.
/// Embedded expressions are returned as source text for the parser.
pub fn split_fstring(body: &str, raw: bool) -> Result<Vec<Piece<'_>>, String> {
    let mut scanner = Scanner { body, pos: 0, raw };
    let pieces = scanner.pieces(false)?;
    Ok(pieces)
}

struct Scanner<'src> {
    body: &'src str,
    pos: usize,
    raw: bool,
}

impl<'src> Scanner<'src> {
    fn peek(&self) -> Option<char> {
        self.body[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.body[self.pos..].chars().nth(n)
    }

    fn flush(&self, literal: &mut String, pieces: &mut Vec<Piece<'src>>) {
        if literal.is_empty() {
            return;
        }
        let text = std::mem::take(literal);
        let text = match self.raw {
            true => text,
            false => unescape(&text),
        };
        pieces.push(Piece::Literal(text));
    }

    fn pieces(&mut self, in_format_spec: bool) -> Result<Vec<Piece<'src>>, String> {
        let mut pieces = vec![];
        let mut literal = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '{' if self.peek_at(1) == Some('{') => {
                    literal.push('{');
                    self.pos += 2;
                }
                '}' if in_format_spec => break,
                '}' if self.peek_at(1) == Some('}') => {
                    literal.push('}');
                    self.pos += 2;
                }
                '}' => return Err("f-string: single '}' is not allowed".into()),
                '{' => {
                    self.flush(&mut literal, &mut pieces);
                    self.pos += 1;
                    pieces.push(self.field()?);
                }
                _ => {
                    literal.push(ch);
                    self.pos += ch.len_utf8();
                }
            }
        }

        self.flush(&mut literal, &mut pieces);
        Ok(pieces)
    }

    fn field(&mut self) -> Result<Piece<'src>, String> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quote = None;

        loop {
            let Some(ch) = self.peek() else {
                return Err("f-string: expecting '}'".into());
            };

            if let Some(open) = quote {
                if ch == open {
                    quote = None;
                }
                self.pos += ch.len_utf8();
                continue;
            }

            match ch {
                '\'' | '"' => quote = Some(ch),
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' if depth > 0 => depth -= 1,
                '}' | ':' if depth == 0 => break,
                '!' if depth == 0 && self.peek_at(1) != Some('=') => break,
                _ => {}
            }
            self.pos += ch.len_utf8();
        }

        let expression = &self.body[start..self.pos];
        if expression.trim().is_empty() {
            return Err("f-string: empty expression not allowed".into());
        }

        let mut conversion = None;
        if self.peek() == Some('!') {
            self.pos += 1;
            match self.peek() {
                Some(ch @ ('s' | 'r' | 'a')) => {
                    conversion = Some(ch);
                    self.pos += 1;
                }
                _ => return Err("f-string: invalid conversion character".into()),
            }
        }

        let mut format_spec = None;
        if self.peek() == Some(':') {
            self.pos += 1;
            format_spec = Some(self.pieces(true)?);
        }

        if self.peek() != Some('}') {
            return Err("f-string: expecting '}'".into());
        }
        self.pos += 1;

        Ok(Piece::Field {
            expression,
            conversion,
            format_spec,
        })
    }
}
