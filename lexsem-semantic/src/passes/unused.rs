use std::collections::{BTreeSet, HashSet};

use lexsem_syntax::{Expr, Module, Node, Stmt, Visitor, walk};

#[derive(Debug, Default)]
struct AssignmentCollector<'ast> {
    assigned: BTreeSet<&'ast str>,
    loaded: HashSet<&'ast str>,
}

impl<'ast> Visitor<'ast> for AssignmentCollector<'ast> {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if let Stmt::Assign(assign) = stmt {
            self.assigned.extend(assign.simple_targets());
        }
        walk(self, Node::Stmt(stmt));
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Expr::Name(name) = expr {
            if name.is_load() {
                self.loaded.insert(&name.id);
            }
        }
        walk(self, Node::Expr(expr));
    }
}

/// Names bound by a plain `name = value` assignment that are never read
/// anywhere in the module. Scopes are not told apart: a read in any
/// function counts as a use of every binding with that name.
pub fn find_unused_assignments(module: &Module) -> BTreeSet<String> {
    let mut collector = AssignmentCollector::default();
    module.accept(&mut collector);

    collector
        .assigned
        .into_iter()
        .filter(|name| !collector.loaded.contains(name))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use lexsem_syntax::parse;

    use super::*;

    fn unused(source: &str) -> Vec<String> {
        find_unused_assignments(&parse(source).unwrap()).into_iter().collect()
    }

    #[test]
    fn test_unread_assignment() {
        assert_eq!(unused("a = 1\nb = 2\nprint(a)\n"), vec!["b"]);
    }

    #[test]
    fn test_only_direct_targets_count() {
        let source = "x, y = 1, 2\nobj.attr = 3\nitems[0] = 4\nz += 1\n";
        assert!(unused(source).is_empty());
    }

    #[test]
    fn test_reads_are_whole_program() {
        let source = "def f():\n    total = 1\n\ndef g():\n    return total\n";
        assert!(unused(source).is_empty());
    }

    #[test]
    fn test_read_inside_fstring() {
        assert!(unused("rate = 2\nprint(f\"{rate:.2f}\")\n").is_empty());
    }

    #[test]
    fn test_chained_assignment() {
        assert_eq!(unused("a = b = 0\nprint(b)\n"), vec!["a"]);
    }
}
