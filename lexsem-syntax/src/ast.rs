use serde::Serialize;

use crate::node::Node;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum ExprContext {
    Load,
    Store,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl BinOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinOperator::Add,
            "-" => BinOperator::Sub,
            "*" => BinOperator::Mult,
            "@" => BinOperator::MatMult,
            "/" => BinOperator::Div,
            "//" => BinOperator::FloorDiv,
            "%" => BinOperator::Mod,
            "**" => BinOperator::Pow,
            "<<" => BinOperator::LShift,
            ">>" => BinOperator::RShift,
            "|" => BinOperator::BitOr,
            "^" => BinOperator::BitXor,
            "&" => BinOperator::BitAnd,
            _ => return None,
        };
        Some(op)
    }

    /// Operator of an augmented assignment such as `+=`.
    pub fn from_augmented(symbol: &str) -> Option<Self> {
        symbol.strip_suffix('=').and_then(Self::from_symbol)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOperator::Add => "+",
            BinOperator::Sub => "-",
            BinOperator::Mult => "*",
            BinOperator::MatMult => "@",
            BinOperator::Div => "/",
            BinOperator::FloorDiv => "//",
            BinOperator::Mod => "%",
            BinOperator::Pow => "**",
            BinOperator::LShift => "<<",
            BinOperator::RShift => ">>",
            BinOperator::BitOr => "|",
            BinOperator::BitXor => "^",
            BinOperator::BitAnd => "&",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinOperator::Add
                | BinOperator::Sub
                | BinOperator::Mult
                | BinOperator::Div
                | BinOperator::Pow
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    UAdd,
    USub,
    Invert,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum BoolOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum CmpOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl CmpOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "==" => CmpOperator::Eq,
            "!=" => CmpOperator::NotEq,
            "<" => CmpOperator::Lt,
            "<=" => CmpOperator::LtE,
            ">" => CmpOperator::Gt,
            ">=" => CmpOperator::GtE,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum ConstantValue {
    None,
    Bool(bool),
    Int(i128),
    /// Integer literal too wide for `i128`, kept as its decimal, hex,
    /// octal or binary source digits.
    BigInt(String),
    Float(f64),
    Complex(f64),
    Str(String),
    Bytes(String),
    Ellipsis,
}

impl ConstantValue {
    /// Name of the runtime type the literal evaluates to.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConstantValue::None => "NoneType",
            ConstantValue::Bool(_) => "bool",
            ConstantValue::Int(_) | ConstantValue::BigInt(_) => "int",
            ConstantValue::Float(_) => "float",
            ConstantValue::Complex(_) => "complex",
            ConstantValue::Str(_) => "str",
            ConstantValue::Bytes(_) => "bytes",
            ConstantValue::Ellipsis => "ellipsis",
        }
    }

    /// `bool` counts as numeric: it is a subtype of `int` at runtime.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ConstantValue::Bool(_)
                | ConstantValue::Int(_)
                | ConstantValue::BigInt(_)
                | ConstantValue::Float(_)
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn accept<'ast, V>(&'ast self, visitor: &mut V)
    where
        V: Visitor<'ast>,
    {
        visitor.visit_module(self);
    }

    pub fn as_node(&self) -> Node<'_> {
        Node::Module(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Expr,
    pub line: usize,
}

impl Assign {
    /// Identifiers assigned directly, as in `name = value`. Tuple,
    /// attribute and subscript targets are left out.
    pub fn simple_targets(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().filter_map(|target| match target {
            Expr::Name(name) => Some(name.id.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AugAssign {
    pub target: Expr,
    pub op: BinOperator,
    pub value: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct If {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct For {
    pub target: Expr,
    pub iter: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct While {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExceptHandler {
    pub kind: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Try {
    pub body: Vec<Stmt>,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Vec<Stmt>,
    pub finalbody: Vec<Stmt>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Raise {
    pub exc: Option<Expr>,
    pub cause: Option<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExprStmt {
    pub value: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    Assign(Assign),
    AugAssign(AugAssign),
    If(If),
    For(For),
    While(While),
    Try(Try),
    Return(Return),
    Raise(Raise),
    Break { line: usize },
    Continue { line: usize },
    Pass { line: usize },
    Expr(ExprStmt),
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::FunctionDef(def) => def.line,
            Stmt::Assign(assign) => assign.line,
            Stmt::AugAssign(assign) => assign.line,
            Stmt::If(if_stmt) => if_stmt.line,
            Stmt::For(for_loop) => for_loop.line,
            Stmt::While(while_loop) => while_loop.line,
            Stmt::Try(try_stmt) => try_stmt.line,
            Stmt::Return(ret) => ret.line,
            Stmt::Raise(raise) => raise.line,
            Stmt::Break { line } | Stmt::Continue { line } | Stmt::Pass { line } => *line,
            Stmt::Expr(expr) => expr.line,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Stmt::Pass { .. })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoolOp {
    pub op: BoolOperator,
    pub values: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub op: BinOperator,
    pub right: Box<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UnaryOp {
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct IfExp {
    pub test: Box<Expr>,
    pub body: Box<Expr>,
    pub orelse: Box<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Compare {
    pub left: Box<Expr>,
    pub ops: Vec<CmpOperator>,
    pub comparators: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Keyword {
    /// `None` for `**mapping` arguments.
    pub arg: Option<String>,
    pub value: Expr,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub keywords: Vec<Keyword>,
    pub line: usize,
}

impl Call {
    /// The callee's identifier when it is called by plain name.
    pub fn callee_name(&self) -> Option<&str> {
        match self.func.as_ref() {
            Expr::Name(name) => Some(&name.id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Starred {
    pub value: Box<Expr>,
    pub ctx: ExprContext,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Attribute {
    pub value: Box<Expr>,
    pub attr: String,
    pub ctx: ExprContext,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Subscript {
    pub value: Box<Expr>,
    pub slice: Box<Expr>,
    pub ctx: ExprContext,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Slice {
    pub lower: Option<Box<Expr>>,
    pub upper: Option<Box<Expr>>,
    pub step: Option<Box<Expr>>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Name {
    pub id: String,
    pub ctx: ExprContext,
    pub line: usize,
}

impl Name {
    pub fn is_load(&self) -> bool {
        self.ctx == ExprContext::Load
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Constant {
    pub value: ConstantValue,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JoinedStr {
    pub values: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormattedValue {
    pub value: Box<Expr>,
    pub conversion: Option<char>,
    pub format_spec: Option<Box<Expr>>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Sequence {
    pub elts: Vec<Expr>,
    pub ctx: ExprContext,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Dict {
    pub keys: Vec<Expr>,
    pub values: Vec<Expr>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum Expr {
    BoolOp(BoolOp),
    BinOp(BinOp),
    UnaryOp(UnaryOp),
    IfExp(IfExp),
    Compare(Compare),
    Call(Call),
    Starred(Starred),
    Attribute(Attribute),
    Subscript(Subscript),
    Slice(Slice),
    Name(Name),
    Constant(Constant),
    JoinedStr(JoinedStr),
    FormattedValue(FormattedValue),
    List(Sequence),
    Tuple(Sequence),
    Dict(Dict),
}

impl Expr {
    pub fn line(&self) -> usize {
        match self {
            Expr::BoolOp(op) => op.line,
            Expr::BinOp(op) => op.line,
            Expr::UnaryOp(op) => op.line,
            Expr::IfExp(if_exp) => if_exp.line,
            Expr::Compare(compare) => compare.line,
            Expr::Call(call) => call.line,
            Expr::Starred(starred) => starred.line,
            Expr::Attribute(attribute) => attribute.line,
            Expr::Subscript(subscript) => subscript.line,
            Expr::Slice(slice) => slice.line,
            Expr::Name(name) => name.line,
            Expr::Constant(constant) => constant.line,
            Expr::JoinedStr(joined) => joined.line,
            Expr::FormattedValue(value) => value.line,
            Expr::List(list) => list.line,
            Expr::Tuple(tuple) => tuple.line,
            Expr::Dict(dict) => dict.line,
        }
    }

    pub fn as_constant(&self) -> Option<&ConstantValue> {
        match self {
            Expr::Constant(constant) => Some(&constant.value),
            _ => None,
        }
    }
}

/// Tree traversal with overridable hooks. Every default implementation
/// visits the node's children in source order, so an implementor only
/// overrides the hooks it cares about and calls [`walk`] to keep going.
pub trait Visitor<'ast>: Sized {
    fn visit_module(&mut self, module: &'ast Module) {
        walk(self, Node::Module(module));
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk(self, Node::Stmt(stmt));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk(self, Node::Expr(expr));
    }

    fn visit_param(&mut self, param: &'ast Param) {
        walk(self, Node::Param(param));
    }

    fn visit_except_handler(&mut self, handler: &'ast ExceptHandler) {
        walk(self, Node::ExceptHandler(handler));
    }

    fn visit_keyword(&mut self, keyword: &'ast Keyword) {
        walk(self, Node::Keyword(keyword));
    }
}

/// Visits every child of `node`.
pub fn walk<'ast, V>(visitor: &mut V, node: Node<'ast>)
where
    V: Visitor<'ast>,
{
    for child in node.children() {
        child.accept(visitor);
    }
}
