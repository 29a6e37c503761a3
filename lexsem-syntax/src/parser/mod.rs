use lexsem_core::LineIndex;
use lexsem_token::{Token, TokenKind, Tokens, tokenize};

use crate::ast::*;
use crate::error::{Result, SyntaxError};

#[cfg(test)]
mod tests;

/// Reserved words that can never be used as identifiers.
pub const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue",
    "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if", "import",
    "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while",
    "with", "yield",
];

const UNSUPPORTED: &[&str] = &[
    "assert", "async", "await", "class", "del", "from", "global", "import", "lambda", "nonlocal",
    "with", "yield",
];

/// Parses a whole source file.
pub fn parse(content: &str) -> Result<Module> {
    Parser::new(content)?.parse()
}

pub struct Parser<'src> {
    pub(crate) content: &'src str,
    pub(crate) line_index: LineIndex,
    pub(crate) tokens: Tokens,
    /// Added to every line; non zero for expressions embedded in f-strings.
    pub(crate) line_offset: usize,
}

impl<'src> Parser<'src> {
    pub fn new(content: &'src str) -> Result<Self> {
        let line_index = LineIndex::new(content);
        let tokens = tokenize(content)
            .map_err(|error| SyntaxError::from_lexer(error, content, &line_index))?;

        Ok(Self {
            content,
            tokens: Tokens::new(tokens, content),
            line_index,
            line_offset: 0,
        })
    }

    pub fn parse(mut self) -> Result<Module> {
        let mut body = vec![];

        loop {
            self.tokens.consume_newlines();
            let token = self.tokens.peek();
            match token.kind() {
                TokenKind::EndMarker => break,
                TokenKind::Indent => return Err(self.error_at(token, "unexpected indent")),
                _ => body.extend(self.parse_statement()?),
            }
        }

        Ok(Module { body })
    }

    pub(crate) fn text(&self, token: Token) -> &'src str {
        token.text(self.content)
    }

    pub(crate) fn line_of(&self, token: Token) -> usize {
        token.line() + self.line_offset
    }

    pub(crate) fn at_op(&self, op: &str) -> bool {
        self.tokens.peek().is_op(self.content, op)
    }

    pub(crate) fn at_keyword(&self, keyword: &str) -> bool {
        self.tokens.peek().is_keyword(self.content, keyword)
    }

    pub(crate) fn eat_op(&mut self, op: &str) -> bool {
        let found = self.at_op(op);
        if found {
            self.tokens.consume();
        }
        found
    }

    pub(crate) fn eat_keyword(&mut self, keyword: &str) -> bool {
        let found = self.at_keyword(keyword);
        if found {
            self.tokens.consume();
        }
        found
    }

    pub(crate) fn expect_op(&mut self, op: &str) -> Result<Token> {
        let token = self.tokens.peek();
        match token.is_op(self.content, op) {
            true => Ok(self.tokens.next_token()),
            false => Err(self.unexpected(token, &format!("expected '{op}'"))),
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: &str) -> Result<Token> {
        let token = self.tokens.peek();
        match token.is_keyword(self.content, keyword) {
            true => Ok(self.tokens.next_token()),
            false => Err(self.unexpected(token, &format!("expected '{keyword}'"))),
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String> {
        let token = self.tokens.peek();
        let text = self.text(token);
        match token.kind() == TokenKind::Name && !RESERVED.contains(&text) {
            true => {
                self.tokens.consume();
                Ok(text.to_string())
            }
            false => Err(self.unexpected(token, "expected an identifier")),
        }
    }

    fn expect_newline(&mut self) -> Result<()> {
        let token = self.tokens.peek();
        match token.kind() {
            TokenKind::Newline => {
                self.tokens.consume();
                Ok(())
            }
            TokenKind::EndMarker | TokenKind::Dedent => Ok(()),
            _ => Err(self.unexpected(token, "expected end of statement")),
        }
    }

    /// True when the current token cannot start an expression, so that an
    /// optional value such as the one of `return` is absent.
    pub(crate) fn at_expression_end(&self) -> bool {
        let token = self.tokens.peek();
        match token.kind() {
            TokenKind::Newline | TokenKind::EndMarker | TokenKind::Dedent => true,
            TokenKind::Op => matches!(
                self.text(token),
                ")" | "]" | "}" | ";" | ":" | "=" | "," | "->"
            ) || BinOperator::from_augmented(self.text(token)).is_some(),
            TokenKind::Name => matches!(self.text(token), "else" | "for" | "in" | "from"),
            _ => false,
        }
    }

    pub(crate) fn error_at(&self, token: Token, message: &str) -> SyntaxError {
        let line = token.line();
        SyntaxError::new(
            line + self.line_offset,
            token.start.column + 1,
            self.line_index.line_text(self.content, line),
            message,
        )
    }

    /// Error for a token that does not fit the grammar at this point.
    pub(crate) fn unexpected(&self, token: Token, expected: &str) -> SyntaxError {
        let text = self.text(token);
        match token.kind() {
            TokenKind::Error if text.ends_with(['"', '\'']) => {
                self.error_at(token, "unterminated string literal")
            }
            TokenKind::Error => self.error_at(token, &format!("invalid character '{text}'")),
            TokenKind::Indent => self.error_at(token, "unexpected indent"),
            TokenKind::EndMarker => {
                self.error_at(token, &format!("unexpected end of file, {expected}"))
            }
            TokenKind::Newline => self.error_at(token, &format!("invalid syntax, {expected}")),
            _ => self.error_at(token, &format!("invalid syntax at '{text}', {expected}")),
        }
    }

    fn parse_statement(&mut self) -> Result<Vec<Stmt>> {
        let token = self.tokens.peek();
        if token.kind() != TokenKind::Name {
            return self.parse_simple_statements();
        }

        let stmt = match self.text(token) {
            "def" => self.parse_function_def()?,
            "if" => self.parse_if()?,
            "while" => self.parse_while()?,
            "for" => self.parse_for()?,
            "try" => self.parse_try()?,
            _ => return self.parse_simple_statements(),
        };

        Ok(vec![stmt])
    }

    /// One or more small statements separated by `;` on a single line.
    fn parse_simple_statements(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = vec![self.parse_small_statement()?];

        while self.eat_op(";") {
            if self.tokens.peek().kind() == TokenKind::Newline {
                break;
            }
            stmts.push(self.parse_small_statement()?);
        }

        self.expect_newline()?;
        Ok(stmts)
    }

    fn parse_small_statement(&mut self) -> Result<Stmt> {
        let token = self.tokens.peek();
        let line = self.line_of(token);

        if token.kind() == TokenKind::Name {
            let keyword = self.text(token);
            match keyword {
                "pass" => {
                    self.tokens.consume();
                    return Ok(Stmt::Pass { line });
                }
                "break" => {
                    self.tokens.consume();
                    return Ok(Stmt::Break { line });
                }
                "continue" => {
                    self.tokens.consume();
                    return Ok(Stmt::Continue { line });
                }
                "return" => {
                    self.tokens.consume();
                    let value = match self.at_expression_end() {
                        true => None,
                        false => Some(self.parse_expression_list()?),
                    };
                    return Ok(Stmt::Return(Return { value, line }));
                }
                "raise" => {
                    self.tokens.consume();
                    let exc = match self.at_expression_end() {
                        true => None,
                        false => Some(self.parse_expression()?),
                    };
                    let cause = match exc.is_some() && self.eat_keyword("from") {
                        true => Some(self.parse_expression()?),
                        false => None,
                    };
                    return Ok(Stmt::Raise(Raise { exc, cause, line }));
                }
                _ if UNSUPPORTED.contains(&keyword) => {
                    return Err(self.error_at(token, &format!("unsupported statement '{keyword}'")));
                }
                _ => {}
            }
        }

        self.parse_expression_statement(token)
    }

    fn parse_expression_statement(&mut self, start: Token) -> Result<Stmt> {
        let line = self.line_of(start);
        let first = self.parse_expression_list()?;

        let token = self.tokens.peek();
        if token.kind() == TokenKind::Op {
            if let Some(op) = BinOperator::from_augmented(self.text(token)) {
                self.tokens.consume();
                let target = match first {
                    Expr::Name(_) | Expr::Attribute(_) | Expr::Subscript(_) => {
                        self.into_target(first, start)?
                    }
                    _ => return Err(self.error_at(start, "illegal target for augmented assignment")),
                };
                let value = self.parse_expression_list()?;
                return Ok(Stmt::AugAssign(AugAssign {
                    target,
                    op,
                    value,
                    line,
                }));
            }
        }

        if !self.at_op("=") {
            return Ok(Stmt::Expr(ExprStmt { value: first, line }));
        }

        let mut targets = vec![self.into_target(first, start)?];
        let mut value = None;
        while self.eat_op("=") {
            let next_start = self.tokens.peek();
            let expr = self.parse_expression_list()?;
            if let Some(previous) = value.replace((expr, next_start)) {
                let (previous, previous_start) = previous;
                targets.push(self.into_target(previous, previous_start)?);
            }
        }

        let Some((value, _)) = value else {
            return Err(self.unexpected(self.tokens.peek(), "expected an expression"));
        };

        Ok(Stmt::Assign(Assign {
            targets,
            value,
            line,
        }))
    }

    /// Turns an expression on the left of `=` into an assignment target.
    pub(crate) fn into_target(&self, expr: Expr, start: Token) -> Result<Expr> {
        let target = match expr {
            Expr::Name(name) => Expr::Name(Name {
                ctx: ExprContext::Store,
                ..name
            }),
            Expr::Attribute(attribute) => Expr::Attribute(Attribute {
                ctx: ExprContext::Store,
                ..attribute
            }),
            Expr::Subscript(subscript) => Expr::Subscript(Subscript {
                ctx: ExprContext::Store,
                ..subscript
            }),
            Expr::Starred(starred) => Expr::Starred(Starred {
                value: Box::new(self.into_target(*starred.value, start)?),
                ctx: ExprContext::Store,
                line: starred.line,
            }),
            Expr::Tuple(sequence) => Expr::Tuple(self.sequence_target(sequence, start)?),
            Expr::List(sequence) => Expr::List(self.sequence_target(sequence, start)?),
            other => {
                let kind = crate::node::Node::Expr(&other).kind_name();
                return Err(self.error_at(start, &format!("cannot assign to {kind}")));
            }
        };

        Ok(target)
    }

    fn sequence_target(&self, sequence: Sequence, start: Token) -> Result<Sequence> {
        let elts = sequence
            .elts
            .into_iter()
            .map(|elt| self.into_target(elt, start))
            .collect::<Result<Vec<_>>>()?;

        Ok(Sequence {
            elts,
            ctx: ExprContext::Store,
            line: sequence.line,
        })
    }

    /// Statements after a `:`; either an indented block or a single line.
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect_op(":")?;

        if self.tokens.peek().kind() != TokenKind::Newline {
            return self.parse_simple_statements();
        }
        self.tokens.consume();

        let token = self.tokens.peek();
        if token.kind() != TokenKind::Indent {
            return Err(self.error_at(token, "expected an indented block"));
        }
        self.tokens.consume();

        let mut body = vec![];
        loop {
            self.tokens.consume_newlines();
            match self.tokens.peek().kind() {
                TokenKind::Dedent => {
                    self.tokens.consume();
                    break;
                }
                TokenKind::EndMarker => break,
                _ => body.extend(self.parse_statement()?),
            }
        }

        Ok(body)
    }

    fn parse_function_def(&mut self) -> Result<Stmt> {
        let keyword = self.expect_keyword("def")?;
        let name = self.expect_identifier()?;

        self.expect_op("(")?;
        let mut params: Vec<Param> = vec![];
        while !self.at_op(")") {
            let token = self.tokens.peek();
            if self.at_op("*") || self.at_op("**") || self.at_op("/") {
                return Err(self.error_at(token, "unsupported parameter kind"));
            }

            let param = self.expect_identifier()?;
            if params.iter().any(|existing| existing.name == param) {
                return Err(self.error_at(
                    token,
                    &format!("duplicate argument '{param}' in function definition"),
                ));
            }
            if self.eat_op(":") {
                // annotations carry no meaning for the analyses
                self.parse_expression()?;
            }

            let default = match self.eat_op("=") {
                true => Some(self.parse_expression()?),
                false => None,
            };
            if default.is_none() && params.iter().any(|existing| existing.default.is_some()) {
                return Err(self.error_at(
                    token,
                    "parameter without a default follows parameter with a default",
                ));
            }

            params.push(Param {
                name: param,
                default,
                line: self.line_of(token),
            });

            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(")")?;

        let returns = match self.eat_op("->") {
            true => Some(self.parse_expression()?),
            false => None,
        };
        let body = self.parse_block()?;

        Ok(Stmt::FunctionDef(FunctionDef {
            name,
            params,
            returns,
            body,
            line: self.line_of(keyword),
        }))
    }

    /// Parses `if` and, recursively, each `elif` as a nested `If` in
    /// `orelse`.
    fn parse_if(&mut self) -> Result<Stmt> {
        let keyword = self.tokens.next_token();
        let test = self.parse_expression()?;
        let body = self.parse_block()?;

        let orelse = if self.at_keyword("elif") {
            vec![self.parse_if()?]
        } else {
            self.parse_else()?
        };

        Ok(Stmt::If(If {
            test,
            body,
            orelse,
            line: self.line_of(keyword),
        }))
    }

    fn parse_else(&mut self) -> Result<Vec<Stmt>> {
        match self.eat_keyword("else") {
            true => self.parse_block(),
            false => Ok(vec![]),
        }
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        let keyword = self.expect_keyword("while")?;
        let test = self.parse_expression()?;
        let body = self.parse_block()?;
        let orelse = self.parse_else()?;

        Ok(Stmt::While(While {
            test,
            body,
            orelse,
            line: self.line_of(keyword),
        }))
    }

    fn parse_for(&mut self) -> Result<Stmt> {
        let keyword = self.expect_keyword("for")?;
        let start = self.tokens.peek();
        let target = self.parse_target_list()?;
        let target = self.into_target(target, start)?;
        self.expect_keyword("in")?;
        let iter = self.parse_expression_list()?;
        let body = self.parse_block()?;
        let orelse = self.parse_else()?;

        Ok(Stmt::For(For {
            target,
            iter,
            body,
            orelse,
            line: self.line_of(keyword),
        }))
    }

    fn parse_try(&mut self) -> Result<Stmt> {
        let keyword = self.expect_keyword("try")?;
        let body = self.parse_block()?;

        let mut handlers = vec![];
        while self.at_keyword("except") {
            let except = self.tokens.next_token();
            let kind = match self.at_op(":") {
                true => None,
                false => Some(self.parse_expression()?),
            };
            let name = match kind.is_some() && self.eat_keyword("as") {
                true => Some(self.expect_identifier()?),
                false => None,
            };
            let body = self.parse_block()?;

            handlers.push(ExceptHandler {
                kind,
                name,
                body,
                line: self.line_of(except),
            });
        }

        let orelse = match handlers.is_empty() {
            true => vec![],
            false => self.parse_else()?,
        };
        let finalbody = match self.eat_keyword("finally") {
            true => self.parse_block()?,
            false => vec![],
        };

        if handlers.is_empty() && finalbody.is_empty() {
            let token = self.tokens.peek();
            return Err(self.unexpected(token, "expected 'except' or 'finally' block"));
        }

        Ok(Stmt::Try(Try {
            body,
            handlers,
            orelse,
            finalbody,
            line: self.line_of(keyword),
        }))
    }
}
