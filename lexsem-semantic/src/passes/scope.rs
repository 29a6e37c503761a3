use std::collections::HashSet;

use lexsem_core::Finding;
use lexsem_syntax::{Expr, FunctionDef, Module, Node, Stmt, Visitor, walk, walk_breadth_first};

use crate::builtins::Builtins;
use crate::diagnostics::Diagnostics;

struct ScopeChecker<'b> {
    builtins: &'b Builtins,
    diagnostics: Diagnostics,
}

impl ScopeChecker<'_> {
    /// Locals are the parameters plus every plain assignment target found
    /// anywhere below the definition, nested functions included.
    fn check_function(&mut self, def: &FunctionDef, root: Node<'_>) {
        let mut locals: HashSet<&str> = def.params.iter().map(|param| param.name.as_str()).collect();
        for node in walk_breadth_first(root) {
            if let Node::Stmt(Stmt::Assign(assign)) = node {
                locals.extend(assign.simple_targets());
            }
        }

        for node in walk_breadth_first(root) {
            let Node::Expr(Expr::Name(name)) = node else {
                continue;
            };

            let known = locals.contains(name.id.as_str()) || self.builtins.contains(&name.id);
            if name.is_load() && !known {
                self.diagnostics.push(
                    name.line,
                    format!(
                        "Variable '{}' used out of scope in function '{}' (line {})",
                        name.id, def.name, name.line
                    ),
                );
            }
        }
    }
}

impl<'ast> Visitor<'ast> for ScopeChecker<'_> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if let Stmt::FunctionDef(def) = stmt {
            self.check_function(def, Node::Stmt(stmt));
        }
        walk(self, Node::Stmt(stmt));
    }
}

/// Reads of names that are neither local to the enclosing function nor
/// built in. Each definition is checked on its own, so a nested function
/// is reported once for itself and once as part of its parent. Module
/// level globals read inside a function are reported as well.
pub fn find_scope_violations(module: &Module, builtins: &Builtins) -> Vec<Finding> {
    let mut checker = ScopeChecker {
        builtins,
        diagnostics: Diagnostics::default(),
    };
    module.accept(&mut checker);
    checker.diagnostics.items()
}
