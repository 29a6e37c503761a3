use std::collections::VecDeque;

use crate::ast::{ExceptHandler, Expr, Keyword, Module, Param, Stmt, Visitor};

/// Borrowed view over any node of the tree, giving every variant the same
/// shape: a line, a kind name and an ordered list of children.
#[derive(Debug, Clone, Copy)]
pub enum Node<'ast> {
    Module(&'ast Module),
    Stmt(&'ast Stmt),
    Expr(&'ast Expr),
    Param(&'ast Param),
    ExceptHandler(&'ast ExceptHandler),
    Keyword(&'ast Keyword),
}

impl<'ast> Node<'ast> {
    /// 1-based source line. The module starts at line 1.
    pub fn line(&self) -> usize {
        match self {
            Node::Module(_) => 1,
            Node::Stmt(stmt) => stmt.line(),
            Node::Expr(expr) => expr.line(),
            Node::Param(param) => param.line,
            Node::ExceptHandler(handler) => handler.line,
            Node::Keyword(keyword) => keyword.line,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Module(_) => "Module",
            Node::Param(_) => "Param",
            Node::ExceptHandler(_) => "ExceptHandler",
            Node::Keyword(_) => "Keyword",
            Node::Stmt(stmt) => match stmt {
                Stmt::FunctionDef(_) => "FunctionDef",
                Stmt::Assign(_) => "Assign",
                Stmt::AugAssign(_) => "AugAssign",
                Stmt::If(_) => "If",
                Stmt::For(_) => "For",
                Stmt::While(_) => "While",
                Stmt::Try(_) => "Try",
                Stmt::Return(_) => "Return",
                Stmt::Raise(_) => "Raise",
                Stmt::Break { .. } => "Break",
                Stmt::Continue { .. } => "Continue",
                Stmt::Pass { .. } => "Pass",
                Stmt::Expr(_) => "Expr",
            },
            Node::Expr(expr) => match expr {
                Expr::BoolOp(_) => "BoolOp",
                Expr::BinOp(_) => "BinOp",
                Expr::UnaryOp(_) => "UnaryOp",
                Expr::IfExp(_) => "IfExp",
                Expr::Compare(_) => "Compare",
                Expr::Call(_) => "Call",
                Expr::Starred(_) => "Starred",
                Expr::Attribute(_) => "Attribute",
                Expr::Subscript(_) => "Subscript",
                Expr::Slice(_) => "Slice",
                Expr::Name(_) => "Name",
                Expr::Constant(_) => "Constant",
                Expr::JoinedStr(_) => "JoinedStr",
                Expr::FormattedValue(_) => "FormattedValue",
                Expr::List(_) => "List",
                Expr::Tuple(_) => "Tuple",
                Expr::Dict(_) => "Dict",
            },
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<Node<'ast>> {
        let mut children = Vec::new();
        match *self {
            Node::Module(module) => push_body(&mut children, &module.body),
            Node::Param(param) => push_optional(&mut children, param.default.as_ref()),
            Node::Keyword(keyword) => children.push(Node::Expr(&keyword.value)),
            Node::ExceptHandler(handler) => {
                push_optional(&mut children, handler.kind.as_ref());
                push_body(&mut children, &handler.body);
            }
            Node::Stmt(stmt) => stmt_children(&mut children, stmt),
            Node::Expr(expr) => expr_children(&mut children, expr),
        }
        children
    }

    /// Dispatches to the visitor hook matching this node.
    pub fn accept<V>(self, visitor: &mut V)
    where
        V: Visitor<'ast>,
    {
        match self {
            Node::Module(module) => visitor.visit_module(module),
            Node::Stmt(stmt) => visitor.visit_stmt(stmt),
            Node::Expr(expr) => visitor.visit_expr(expr),
            Node::Param(param) => visitor.visit_param(param),
            Node::ExceptHandler(handler) => visitor.visit_except_handler(handler),
            Node::Keyword(keyword) => visitor.visit_keyword(keyword),
        }
    }
}

fn push_body<'ast>(children: &mut Vec<Node<'ast>>, body: &'ast [Stmt]) {
    children.extend(body.iter().map(Node::Stmt));
}

fn push_exprs<'ast>(children: &mut Vec<Node<'ast>>, exprs: &'ast [Expr]) {
    children.extend(exprs.iter().map(Node::Expr));
}

fn push_optional<'ast>(children: &mut Vec<Node<'ast>>, expr: Option<&'ast Expr>) {
    if let Some(expr) = expr {
        children.push(Node::Expr(expr));
    }
}

fn stmt_children<'ast>(children: &mut Vec<Node<'ast>>, stmt: &'ast Stmt) {
    match stmt {
        Stmt::FunctionDef(def) => {
            children.extend(def.params.iter().map(Node::Param));
            push_body(children, &def.body);
            push_optional(children, def.returns.as_ref());
        }
        Stmt::Assign(assign) => {
            push_exprs(children, &assign.targets);
            children.push(Node::Expr(&assign.value));
        }
        Stmt::AugAssign(assign) => {
            children.push(Node::Expr(&assign.target));
            children.push(Node::Expr(&assign.value));
        }
        Stmt::If(if_stmt) => {
            children.push(Node::Expr(&if_stmt.test));
            push_body(children, &if_stmt.body);
            push_body(children, &if_stmt.orelse);
        }
        Stmt::For(for_loop) => {
            children.push(Node::Expr(&for_loop.target));
            children.push(Node::Expr(&for_loop.iter));
            push_body(children, &for_loop.body);
            push_body(children, &for_loop.orelse);
        }
        Stmt::While(while_loop) => {
            children.push(Node::Expr(&while_loop.test));
            push_body(children, &while_loop.body);
            push_body(children, &while_loop.orelse);
        }
        Stmt::Try(try_stmt) => {
            push_body(children, &try_stmt.body);
            children.extend(try_stmt.handlers.iter().map(Node::ExceptHandler));
            push_body(children, &try_stmt.orelse);
            push_body(children, &try_stmt.finalbody);
        }
        Stmt::Return(ret) => push_optional(children, ret.value.as_ref()),
        Stmt::Raise(raise) => {
            push_optional(children, raise.exc.as_ref());
            push_optional(children, raise.cause.as_ref());
        }
        Stmt::Expr(expr) => children.push(Node::Expr(&expr.value)),
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Pass { .. } => {}
    }
}

fn expr_children<'ast>(children: &mut Vec<Node<'ast>>, expr: &'ast Expr) {
    match expr {
        Expr::BoolOp(op) => push_exprs(children, &op.values),
        Expr::BinOp(op) => {
            children.push(Node::Expr(&op.left));
            children.push(Node::Expr(&op.right));
        }
        Expr::UnaryOp(op) => children.push(Node::Expr(&op.operand)),
        Expr::IfExp(if_exp) => {
            children.push(Node::Expr(&if_exp.test));
            children.push(Node::Expr(&if_exp.body));
            children.push(Node::Expr(&if_exp.orelse));
        }
        Expr::Compare(compare) => {
            children.push(Node::Expr(&compare.left));
            push_exprs(children, &compare.comparators);
        }
        Expr::Call(call) => {
            children.push(Node::Expr(&call.func));
            push_exprs(children, &call.args);
            children.extend(call.keywords.iter().map(Node::Keyword));
        }
        Expr::Starred(starred) => children.push(Node::Expr(&starred.value)),
        Expr::Attribute(attribute) => children.push(Node::Expr(&attribute.value)),
        Expr::Subscript(subscript) => {
            children.push(Node::Expr(&subscript.value));
            children.push(Node::Expr(&subscript.slice));
        }
        Expr::Slice(slice) => {
            for bound in [&slice.lower, &slice.upper, &slice.step] {
                push_optional(children, bound.as_deref());
            }
        }
        Expr::JoinedStr(joined) => push_exprs(children, &joined.values),
        Expr::FormattedValue(value) => {
            children.push(Node::Expr(&value.value));
            push_optional(children, value.format_spec.as_deref());
        }
        Expr::List(sequence) | Expr::Tuple(sequence) => push_exprs(children, &sequence.elts),
        Expr::Dict(dict) => {
            push_exprs(children, &dict.keys);
            push_exprs(children, &dict.values);
        }
        Expr::Name(_) | Expr::Constant(_) => {}
    }
}

/// Breadth-first iterator over a node and all of its descendants, the
/// root included.
pub struct Walk<'ast> {
    queue: VecDeque<Node<'ast>>,
}

impl<'ast> Iterator for Walk<'ast> {
    type Item = Node<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children());
        Some(node)
    }
}

pub fn walk_breadth_first(root: Node<'_>) -> Walk<'_> {
    Walk {
        queue: VecDeque::from([root]),
    }
}
