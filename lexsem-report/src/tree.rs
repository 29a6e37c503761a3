use lexsem_syntax::{Expr, Module, Node, Stmt, label};

const INDENT: &str = "  ";

/// Outline of the definitions, assignments, control structures and calls
/// of a module. Nodes outside those kinds are transparent: their children
/// are printed at the same depth.
pub fn semantic_tree(module: &Module) -> String {
    let mut printer = TreePrinter::default();
    printer.print_all(module.as_node().children(), 0);
    printer.lines.join("\n")
}

#[derive(Debug, Default)]
struct TreePrinter {
    lines: Vec<String>,
}

impl TreePrinter {
    fn line(&mut self, depth: usize, text: &str) {
        self.lines.push(format!("{}{text}", INDENT.repeat(depth)));
    }

    fn print_all<'ast>(&mut self, nodes: impl IntoIterator<Item = Node<'ast>>, depth: usize) {
        for node in nodes {
            self.print(node, depth);
        }
    }

    fn print(&mut self, node: Node<'_>, depth: usize) {
        match node {
            Node::Stmt(Stmt::FunctionDef(_) | Stmt::For(_) | Stmt::While(_)) => {
                self.line(depth, &label(node));
                self.print_all(node.children(), depth + 1);
            }
            Node::Stmt(Stmt::Assign(_)) => self.line(depth, &label(node)),
            Node::Stmt(Stmt::If(if_stmt)) => {
                self.line(depth, &label(node));
                self.print(Node::Expr(&if_stmt.test), depth + 1);
                self.print_all(if_stmt.body.iter().map(Node::Stmt), depth + 1);
                if !if_stmt.orelse.is_empty() {
                    self.line(depth, &format!("else (line {})", if_stmt.line));
                    self.print_all(if_stmt.orelse.iter().map(Node::Stmt), depth + 2);
                }
            }
            Node::Expr(Expr::Call(call)) => {
                if call.callee_name().is_some() {
                    self.line(depth, &label(node));
                }
            }
            _ => self.print_all(node.children(), depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use lexsem_syntax::parse;

    use super::*;

    #[test]
    fn test_semantic_tree() {
        let source = r#"def calc(rate):
    total = rate * 2
    if total > 10:
        print(total)
    else:
        total = 0
    return total

for i in range(3):
    calc(i)
while False:
    obj.method()
"#;
        let module = parse(source).unwrap();

        insta::assert_snapshot!(semantic_tree(&module), @r"
        Function: calc (line 1)
          Assignment: total (line 2)
          If (line 3)
            Call: print (line 4)
          else (line 3)
              Assignment: total (line 6)
        For (line 9)
          Call: range (line 9)
          Call: calc (line 10)
        While (line 11)
        ");
    }

    #[test]
    fn test_calls_are_leaves() {
        let module = parse("print(int(input('n')))\n").unwrap();
        assert_eq!(semantic_tree(&module), "Call: print (line 1)");
    }

    #[test]
    fn test_empty_module() {
        let module = parse("").unwrap();
        assert_eq!(semantic_tree(&module), "");
    }
}
