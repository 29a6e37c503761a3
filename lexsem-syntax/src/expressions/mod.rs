use lexsem_token::{Token, TokenKind};

use crate::ast::*;
use crate::error::Result;
use crate::fstring::{Piece, split_fstring};
use crate::literals::{number_value, split_string, string_value};
use crate::parser::{Parser, RESERVED};

#[cfg(test)]
mod tests;

pub mod precedences {
    pub const INITIAL: u8 = 0;
    pub const BITWISE_OR: u8 = 1;
    pub const BITWISE_XOR: u8 = 2;
    pub const BITWISE_AND: u8 = 3;
    pub const SHIFT: u8 = 4;
    pub const SUM: u8 = 5;
    pub const PRODUCT: u8 = 6;
    pub const POWER: u8 = 7;
}

fn get_precedence(op: BinOperator) -> u8 {
    match op {
        BinOperator::Pow => precedences::POWER,
        BinOperator::Mult
        | BinOperator::MatMult
        | BinOperator::Div
        | BinOperator::FloorDiv
        | BinOperator::Mod => precedences::PRODUCT,
        BinOperator::Add | BinOperator::Sub => precedences::SUM,
        BinOperator::LShift | BinOperator::RShift => precedences::SHIFT,
        BinOperator::BitAnd => precedences::BITWISE_AND,
        BinOperator::BitXor => precedences::BITWISE_XOR,
        BinOperator::BitOr => precedences::BITWISE_OR,
    }
}

impl Parser<'_> {
    /// A single expression, or a tuple when several are separated by commas.
    pub(crate) fn parse_expression_list(&mut self) -> Result<Expr> {
        let first = self.parse_star_or_expression()?;
        if !self.at_op(",") {
            return Ok(first);
        }

        let line = first.line();
        let mut elts = vec![first];
        while self.eat_op(",") {
            if self.at_expression_end() {
                break;
            }
            elts.push(self.parse_star_or_expression()?);
        }

        Ok(Expr::Tuple(Sequence {
            elts,
            ctx: ExprContext::Load,
            line,
        }))
    }

    /// Loop targets stop before comparisons so that `in` is left alone.
    pub(crate) fn parse_target_list(&mut self) -> Result<Expr> {
        let first = self.parse_target_item()?;
        if !self.at_op(",") {
            return Ok(first);
        }

        let line = first.line();
        let mut elts = vec![first];
        while self.eat_op(",") {
            if self.at_keyword("in") {
                break;
            }
            elts.push(self.parse_target_item()?);
        }

        Ok(Expr::Tuple(Sequence {
            elts,
            ctx: ExprContext::Load,
            line,
        }))
    }

    fn parse_target_item(&mut self) -> Result<Expr> {
        match self.at_op("*") {
            true => self.parse_starred(),
            false => self.parse_binary(precedences::INITIAL),
        }
    }

    fn parse_star_or_expression(&mut self) -> Result<Expr> {
        match self.at_op("*") {
            true => self.parse_starred(),
            false => self.parse_expression(),
        }
    }

    fn parse_starred(&mut self) -> Result<Expr> {
        let star = self.expect_op("*")?;
        let value = self.parse_binary(precedences::INITIAL)?;

        Ok(Expr::Starred(Starred {
            value: Box::new(value),
            ctx: ExprContext::Load,
            line: self.line_of(star),
        }))
    }

    /// A full expression, conditional expressions included.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        if self.at_keyword("lambda") {
            let token = self.tokens.peek();
            return Err(self.error_at(token, "unsupported expression 'lambda'"));
        }

        let body = self.parse_or()?;
        if !self.eat_keyword("if") {
            return Ok(body);
        }

        let test = self.parse_or()?;
        self.expect_keyword("else")?;
        let orelse = self.parse_expression()?;

        Ok(Expr::IfExp(IfExp {
            line: body.line(),
            test: Box::new(test),
            body: Box::new(body),
            orelse: Box::new(orelse),
        }))
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let first = self.parse_and()?;
        if !self.at_keyword("or") {
            return Ok(first);
        }

        let line = first.line();
        let mut values = vec![first];
        while self.eat_keyword("or") {
            values.push(self.parse_and()?);
        }

        Ok(Expr::BoolOp(BoolOp {
            op: BoolOperator::Or,
            values,
            line,
        }))
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let first = self.parse_not()?;
        if !self.at_keyword("and") {
            return Ok(first);
        }

        let line = first.line();
        let mut values = vec![first];
        while self.eat_keyword("and") {
            values.push(self.parse_not()?);
        }

        Ok(Expr::BoolOp(BoolOp {
            op: BoolOperator::And,
            values,
            line,
        }))
    }

    fn parse_not(&mut self) -> Result<Expr> {
        if !self.at_keyword("not") {
            return self.parse_comparison();
        }

        let keyword = self.tokens.next_token();
        let operand = self.parse_not()?;

        Ok(Expr::UnaryOp(UnaryOp {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
            line: self.line_of(keyword),
        }))
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let left = self.parse_binary(precedences::INITIAL)?;

        let mut ops = vec![];
        let mut comparators = vec![];
        while let Some(op) = self.comparison_operator() {
            ops.push(op);
            comparators.push(self.parse_binary(precedences::INITIAL)?);
        }

        if ops.is_empty() {
            return Ok(left);
        }

        Ok(Expr::Compare(Compare {
            line: left.line(),
            left: Box::new(left),
            ops,
            comparators,
        }))
    }

    /// Consumes a comparison operator, including the two word forms
    /// `not in` and `is not`.
    fn comparison_operator(&mut self) -> Option<CmpOperator> {
        let token = self.tokens.peek();
        let op = match (token.kind(), self.text(token)) {
            (TokenKind::Op, symbol) => CmpOperator::from_symbol(symbol)?,
            (TokenKind::Name, "in") => CmpOperator::In,
            (TokenKind::Name, "is") => match self.tokens.peek_nth(1).is_keyword(self.content, "not") {
                true => {
                    self.tokens.consume();
                    CmpOperator::IsNot
                }
                false => CmpOperator::Is,
            },
            (TokenKind::Name, "not") if self.tokens.peek_nth(1).is_keyword(self.content, "in") => {
                self.tokens.consume();
                CmpOperator::NotIn
            }
            _ => return None,
        };

        self.tokens.consume();
        Some(op)
    }

    pub(crate) fn parse_binary(&mut self, precedence: u8) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;

        loop {
            let token = self.tokens.peek();
            if token.kind() != TokenKind::Op {
                break;
            }
            let Some(op) = BinOperator::from_symbol(self.text(token)) else {
                break;
            };

            let op_precedence = get_precedence(op);
            if precedence >= op_precedence {
                break;
            }

            self.tokens.consume();
            let rhs = self.parse_binary(op_precedence)?;
            lhs = Expr::BinOp(BinOp {
                line: lhs.line(),
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            });
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let token = self.tokens.peek();
        let op = match token.kind() {
            TokenKind::Op => match self.text(token) {
                "-" => UnaryOperator::USub,
                "+" => UnaryOperator::UAdd,
                "~" => UnaryOperator::Invert,
                _ => return self.parse_power(),
            },
            _ => return self.parse_power(),
        };

        self.tokens.consume();
        let operand = self.parse_unary()?;

        Ok(Expr::UnaryOp(UnaryOp {
            op,
            operand: Box::new(operand),
            line: self.line_of(token),
        }))
    }

    /// `**` binds tighter than a unary operator on its left and is right
    /// associative.
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if !self.eat_op("**") {
            return Ok(base);
        }

        let exponent = self.parse_unary()?;
        Ok(Expr::BinOp(BinOp {
            line: base.line(),
            left: Box::new(base),
            op: BinOperator::Pow,
            right: Box::new(exponent),
        }))
    }

    /// An atom followed by any number of calls, subscripts and attribute
    /// accesses.
    fn parse_primary(&mut self) -> Result<Expr> {
        let mut expr = self.parse_atom()?;

        loop {
            if self.eat_op("(") {
                expr = self.parse_call(expr)?;
            } else if self.eat_op("[") {
                let slice = self.parse_subscript()?;
                self.expect_op("]")?;
                expr = Expr::Subscript(Subscript {
                    line: expr.line(),
                    value: Box::new(expr),
                    slice: Box::new(slice),
                    ctx: ExprContext::Load,
                });
            } else if self.eat_op(".") {
                let attr = self.expect_identifier()?;
                expr = Expr::Attribute(Attribute {
                    line: expr.line(),
                    value: Box::new(expr),
                    attr,
                    ctx: ExprContext::Load,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_call(&mut self, func: Expr) -> Result<Expr> {
        let mut args = vec![];
        let mut keywords: Vec<Keyword> = vec![];

        while !self.at_op(")") {
            let token = self.tokens.peek();
            let line = self.line_of(token);

            if self.at_op("*") {
                args.push(self.parse_starred()?);
            } else if self.eat_op("**") {
                keywords.push(Keyword {
                    arg: None,
                    value: self.parse_expression()?,
                    line,
                });
            } else if token.kind() == TokenKind::Name
                && self.tokens.peek_nth(1).is_op(self.content, "=")
            {
                let arg = self.expect_identifier()?;
                self.expect_op("=")?;
                if keywords.iter().any(|keyword| keyword.arg.as_deref() == Some(arg.as_str())) {
                    return Err(self.error_at(token, &format!("keyword argument repeated: {arg}")));
                }
                keywords.push(Keyword {
                    arg: Some(arg),
                    value: self.parse_expression()?,
                    line,
                });
            } else {
                if !keywords.is_empty() {
                    return Err(self.error_at(token, "positional argument follows keyword argument"));
                }
                args.push(self.parse_expression()?);
            }

            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(")")?;

        Ok(Expr::Call(Call {
            line: func.line(),
            func: Box::new(func),
            args,
            keywords,
        }))
    }

    fn parse_subscript(&mut self) -> Result<Expr> {
        let first = self.parse_slice_item()?;
        if !self.at_op(",") {
            return Ok(first);
        }

        let line = first.line();
        let mut elts = vec![first];
        while self.eat_op(",") {
            if self.at_op("]") {
                break;
            }
            elts.push(self.parse_slice_item()?);
        }

        Ok(Expr::Tuple(Sequence {
            elts,
            ctx: ExprContext::Load,
            line,
        }))
    }

    fn parse_slice_item(&mut self) -> Result<Expr> {
        let line = self.line_of(self.tokens.peek());

        let lower = match self.at_op(":") {
            true => None,
            false => Some(self.parse_expression()?),
        };
        if !self.eat_op(":") {
            if let Some(lower) = lower {
                return Ok(lower);
            }
        }

        let upper = self.parse_slice_bound()?;
        let step = match self.eat_op(":") {
            true => self.parse_slice_bound()?,
            false => None,
        };

        Ok(Expr::Slice(Slice {
            lower: lower.map(Box::new),
            upper,
            step,
            line,
        }))
    }

    fn parse_slice_bound(&mut self) -> Result<Option<Box<Expr>>> {
        match self.at_op(":") || self.at_op("]") || self.at_op(",") {
            true => Ok(None),
            false => Ok(Some(Box::new(self.parse_expression()?))),
        }
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let token = self.tokens.peek();
        let line = self.line_of(token);
        let text = self.text(token);

        let value = match (token.kind(), text) {
            (TokenKind::Op, "(") => return self.parse_parenthesized(),
            (TokenKind::Op, "[") => {
                self.tokens.consume();
                let elts = self.parse_elements("]")?;
                return Ok(Expr::List(Sequence {
                    elts,
                    ctx: ExprContext::Load,
                    line,
                }));
            }
            (TokenKind::Op, "{") => return self.parse_dict(),
            (TokenKind::Op, "...") => ConstantValue::Ellipsis,
            (TokenKind::Name, "True") => ConstantValue::Bool(true),
            (TokenKind::Name, "False") => ConstantValue::Bool(false),
            (TokenKind::Name, "None") => ConstantValue::None,
            (TokenKind::Name, id) if !RESERVED.contains(&id) => {
                self.tokens.consume();
                return Ok(Expr::Name(Name {
                    id: id.to_string(),
                    ctx: ExprContext::Load,
                    line,
                }));
            }
            (TokenKind::Number, _) => {
                number_value(text).map_err(|message| self.error_at(token, &message))?
            }
            (TokenKind::String, _) => return self.parse_strings(),
            _ => return Err(self.unexpected(token, "expected an expression")),
        };

        self.tokens.consume();
        Ok(Expr::Constant(Constant { value, line }))
    }

    fn parse_parenthesized(&mut self) -> Result<Expr> {
        let open = self.expect_op("(")?;
        let line = self.line_of(open);

        if self.eat_op(")") {
            return Ok(Expr::Tuple(Sequence {
                elts: vec![],
                ctx: ExprContext::Load,
                line,
            }));
        }

        let first = self.parse_star_or_expression()?;
        if self.eat_op(")") {
            return match first {
                Expr::Starred(_) => Err(self.error_at(open, "cannot use starred expression here")),
                expr => Ok(expr),
            };
        }

        self.expect_op(",")?;
        let mut elts = vec![first];
        elts.extend(self.parse_elements(")")?);

        Ok(Expr::Tuple(Sequence {
            elts,
            ctx: ExprContext::Load,
            line,
        }))
    }

    /// Comma separated elements up to and including `close`. A trailing
    /// comma is allowed.
    fn parse_elements(&mut self, close: &str) -> Result<Vec<Expr>> {
        let mut elts = vec![];
        while !self.at_op(close) {
            elts.push(self.parse_star_or_expression()?);
            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op(close)?;
        Ok(elts)
    }

    fn parse_dict(&mut self) -> Result<Expr> {
        let open = self.expect_op("{")?;
        let mut keys = vec![];
        let mut values = vec![];

        while !self.at_op("}") {
            keys.push(self.parse_expression()?);
            if !self.at_op(":") {
                let token = self.tokens.peek();
                return Err(self.error_at(token, "set literals are not supported"));
            }
            self.tokens.consume();
            values.push(self.parse_expression()?);

            if !self.eat_op(",") {
                break;
            }
        }
        self.expect_op("}")?;

        Ok(Expr::Dict(Dict {
            keys,
            values,
            line: self.line_of(open),
        }))
    }

    /// Adjacent string tokens form a single literal. Any formatted part
    /// turns the whole literal into a `JoinedStr`.
    fn parse_strings(&mut self) -> Result<Expr> {
        let line = self.line_of(self.tokens.peek());
        let mut parts = vec![];
        let mut formatted = false;
        let mut bytes = None;

        while self.tokens.peek().kind() == TokenKind::String {
            let token = self.tokens.next_token();
            let Some(string) = split_string(self.text(token)) else {
                return Err(self.error_at(token, "invalid string literal"));
            };

            if bytes.replace(string.bytes).is_some_and(|previous| previous != string.bytes) {
                return Err(self.error_at(token, "cannot mix bytes and nonbytes literals"));
            }

            if string.formatted {
                formatted = true;
                let pieces = split_fstring(string.body, string.raw)
                    .map_err(|message| self.error_at(token, &message))?;
                parts.extend(self.fstring_values(pieces, token)?);
            } else {
                parts.push(Expr::Constant(Constant {
                    value: string_value(string),
                    line,
                }));
            }
        }

        let mut values: Vec<Expr> = vec![];
        for part in parts {
            if let (Some(Expr::Constant(last)), Expr::Constant(next)) = (values.last_mut(), &part) {
                match (&mut last.value, &next.value) {
                    (ConstantValue::Str(joined), ConstantValue::Str(text))
                    | (ConstantValue::Bytes(joined), ConstantValue::Bytes(text)) => {
                        joined.push_str(text);
                        continue;
                    }
                    _ => {}
                }
            }
            values.push(part);
        }

        if !formatted {
            if let [value] = values.as_slice() {
                return Ok(value.clone());
            }
        }

        values.retain(|value| {
            !matches!(value, Expr::Constant(Constant { value: ConstantValue::Str(text), .. }) if text.is_empty())
        });
        Ok(Expr::JoinedStr(JoinedStr { values, line }))
    }

    fn fstring_values(&self, pieces: Vec<Piece<'_>>, token: Token) -> Result<Vec<Expr>> {
        let line = self.line_of(token);

        pieces
            .into_iter()
            .map(|piece| match piece {
                Piece::Literal(text) => Ok(Expr::Constant(Constant {
                    value: ConstantValue::Str(text),
                    line,
                })),
                Piece::Field {
                    expression,
                    conversion,
                    format_spec,
                } => {
                    let value = self.parse_embedded(expression, token)?;
                    let format_spec = match format_spec {
                        Some(spec) => Some(Box::new(Expr::JoinedStr(JoinedStr {
                            values: self.fstring_values(spec, token)?,
                            line,
                        }))),
                        None => None,
                    };

                    Ok(Expr::FormattedValue(FormattedValue {
                        value: Box::new(value),
                        conversion,
                        format_spec,
                        line,
                    }))
                }
            })
            .collect()
    }

    /// Parses the expression of an f-string replacement field, reported on
    /// the line of the string token.
    fn parse_embedded(&self, source: &str, token: Token) -> Result<Expr> {
        let wrapped = format!("({source})");
        let embedded_error = |message: &str| self.error_at(token, &format!("f-string: {message}"));

        let mut parser = Parser::new(&wrapped).map_err(|error| embedded_error(&error.message))?;
        parser.line_offset = self.line_of(token) - 1;

        let expr = parser
            .parse_expression_list()
            .map_err(|error| embedded_error(&error.message))?;

        let rest = parser.tokens.peek();
        match rest.kind() {
            TokenKind::Newline | TokenKind::EndMarker => Ok(expr),
            _ => Err(embedded_error("invalid syntax")),
        }
    }
}
