use lexsem_core::Finding;
use lexsem_syntax::{BinOp, Compare, Expr, Module, Node, Visitor, walk};

use crate::diagnostics::Diagnostics;

#[derive(Debug, Default)]
struct TypeChecker {
    diagnostics: Diagnostics,
}

impl TypeChecker {
    fn check_arithmetic(&mut self, op: &BinOp) {
        if !op.op.is_arithmetic() {
            return;
        }

        let (Some(left), Some(right)) = (op.left.as_constant(), op.right.as_constant()) else {
            return;
        };

        if !left.is_numeric() || !right.is_numeric() {
            self.diagnostics.push(
                op.line,
                format!(
                    "Arithmetic operation between incompatible types: {} and {} on line {}",
                    left.type_name(),
                    right.type_name(),
                    op.line
                ),
            );
        }
    }

    /// Every comparator is checked against the leftmost operand, not
    /// against its neighbour in the chain.
    fn check_comparison(&mut self, compare: &Compare) {
        let Some(left) = compare.left.as_constant() else {
            return;
        };

        for comparator in &compare.comparators {
            let Some(right) = comparator.as_constant() else {
                continue;
            };

            if left.type_name() != right.type_name() {
                self.diagnostics.push(
                    compare.line,
                    format!(
                        "Comparison between different types: {} and {} on line {}",
                        left.type_name(),
                        right.type_name(),
                        compare.line
                    ),
                );
            }
        }
    }
}

impl<'ast> Visitor<'ast> for TypeChecker {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::BinOp(op) => self.check_arithmetic(op),
            Expr::Compare(compare) => self.check_comparison(compare),
            _ => {}
        }
        walk(self, Node::Expr(expr));
    }
}

/// Arithmetic and comparisons between literal operands of incompatible
/// runtime types. Operands that are not literals are never checked.
pub fn find_type_errors(module: &Module) -> Vec<Finding> {
    let mut checker = TypeChecker::default();
    module.accept(&mut checker);
    checker.diagnostics.items()
}
