use lexsem_core::Finding;
use lexsem_syntax::{Module, Node, Stmt, Visitor, walk};

use crate::diagnostics::Diagnostics;

#[derive(Debug, Default)]
struct EmptyBlockFinder {
    diagnostics: Diagnostics,
}

impl EmptyBlockFinder {
    fn check_body(&mut self, kind: &str, body: &[Stmt], line: usize) {
        if body.iter().all(Stmt::is_pass) {
            self.diagnostics
                .push(line, format!("Empty {kind} block on line {line}"));
        }
    }
}

impl<'ast> Visitor<'ast> for EmptyBlockFinder {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::If(if_stmt) => self.check_body("if", &if_stmt.body, if_stmt.line),
            Stmt::While(while_loop) => self.check_body("while", &while_loop.body, while_loop.line),
            Stmt::For(for_loop) => self.check_body("for", &for_loop.body, for_loop.line),
            _ => {}
        }
        walk(self, Node::Stmt(stmt));
    }
}

/// `if`, `while` and `for` statements whose body does nothing. A body made
/// only of `pass` counts as empty; `else` branches are not checked.
pub fn find_empty_control_blocks(module: &Module) -> Vec<Finding> {
    let mut finder = EmptyBlockFinder::default();
    module.accept(&mut finder);
    finder.diagnostics.items()
}

#[cfg(test)]
mod tests {
    use lexsem_syntax::parse;

    use super::*;

    fn messages(source: &str) -> Vec<String> {
        find_empty_control_blocks(&parse(source).unwrap())
            .into_iter()
            .map(|finding| finding.message)
            .collect()
    }

    #[test]
    fn test_pass_only_if() {
        let source = "x = 1\n\nif True:\n    pass\n";
        assert_eq!(messages(source), vec!["Empty if block on line 3"]);
    }

    #[test]
    fn test_loops() {
        let source = "while x:\n    pass\n    pass\nfor i in y: pass\nfor j in z:\n    print(j)\n";
        assert_eq!(
            messages(source),
            vec!["Empty while block on line 1", "Empty for block on line 4"]
        );
    }

    #[test]
    fn test_else_branches_are_not_checked() {
        let source = "if x:\n    y = 1\nelse:\n    pass\n";
        assert!(messages(source).is_empty());
    }

    #[test]
    fn test_elif_is_a_nested_if() {
        let source = "if x:\n    y = 1\nelif z:\n    pass\n";
        assert_eq!(messages(source), vec!["Empty if block on line 3"]);
    }

    #[test]
    fn test_nested_in_functions() {
        let source = "def f():\n    for i in range(3):\n        if i:\n            pass\n";
        assert_eq!(messages(source), vec!["Empty if block on line 3"]);
    }
}
