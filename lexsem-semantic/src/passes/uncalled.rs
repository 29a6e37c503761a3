use std::collections::{BTreeSet, HashSet};

use lexsem_syntax::{Expr, Module, Node, Stmt, Visitor, walk};

#[derive(Debug, Default)]
struct CallCollector<'ast> {
    defined: BTreeSet<&'ast str>,
    called: HashSet<&'ast str>,
}

impl<'ast> Visitor<'ast> for CallCollector<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if let Stmt::FunctionDef(def) = stmt {
            self.defined.insert(&def.name);
        }
        walk(self, Node::Stmt(stmt));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Expr::Call(call) = expr {
            self.called.extend(call.callee_name());
        }
        walk(self, Node::Expr(expr));
    }
}

/// Functions that are defined but never called by plain name. Method style
/// calls such as `obj.run()` do not count as a call of `run`.
pub fn find_uncalled_functions(module: &Module) -> BTreeSet<String> {
    let mut collector = CallCollector::default();
    module.accept(&mut collector);

    collector
        .defined
        .into_iter()
        .filter(|name| !collector.called.contains(name))
        .map(String::from)
        .collect()
}
