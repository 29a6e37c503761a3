use crate::ast::{Expr, Stmt};
use crate::node::Node;

/// Human readable label shared by the tree printer and the graph exporters.
/// Nodes without a dedicated label fall back to their kind name.
pub fn label(node: Node<'_>) -> String {
    match node {
        Node::Stmt(Stmt::FunctionDef(def)) => format!("Function: {} (line {})", def.name, def.line),
        Node::Stmt(Stmt::Assign(assign)) => {
            let targets: Vec<_> = assign.simple_targets().collect();
            format!("Assignment: {} (line {})", targets.join(", "), assign.line)
        }
        Node::Stmt(Stmt::If(if_stmt)) => format!("If (line {})", if_stmt.line),
        Node::Stmt(Stmt::For(for_loop)) => format!("For (line {})", for_loop.line),
        Node::Stmt(Stmt::While(while_loop)) => format!("While (line {})", while_loop.line),
        Node::Stmt(Stmt::Return(ret)) => format!("Return (line {})", ret.line),
        Node::Stmt(Stmt::Break { line }) => format!("Break (line {line})"),
        Node::Stmt(Stmt::Continue { line }) => format!("Continue (line {line})"),
        Node::Expr(Expr::Call(call)) => match call.callee_name() {
            Some(name) => format!("Call: {name} (line {})", call.line),
            None => node.kind_name().to_string(),
        },
        _ => node.kind_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::walk_breadth_first;
    use crate::parse;

    fn labels(source: &str) -> Vec<String> {
        let module = parse(source).unwrap();
        walk_breadth_first(module.as_node()).map(label).collect()
    }

    #[test]
    fn test_statement_labels() {
        let source = r#"def calc(a, b):
    total = a + b
    for i in range(3):
        if i:
            break
        continue
    while total:
        total, other = 1, 2
    return total
"#;
        let labels = labels(source);
        let labels: Vec<_> = labels.iter().filter(|label| label.contains("line")).collect();

        insta::assert_debug_snapshot!(labels, @r#"
        [
            "Function: calc (line 1)",
            "Assignment: total (line 2)",
            "For (line 3)",
            "While (line 7)",
            "Return (line 9)",
            "Call: range (line 3)",
            "If (line 4)",
            "Continue (line 6)",
            "Assignment:  (line 8)",
            "Break (line 5)",
        ]
        "#);
    }

    #[test]
    fn test_fallback_labels() {
        let labels = labels("obj.method(1)\nx = y = 2\n");
        assert_eq!(
            labels,
            vec![
                "Module",
                "Expr",
                "Assignment: x, y (line 2)",
                "Call",
                "Name",
                "Name",
                "Constant",
                "Attribute",
                "Constant",
                "Name",
            ]
        );
    }
}
