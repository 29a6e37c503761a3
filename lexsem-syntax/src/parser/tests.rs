use crate::ast::*;
use crate::label::label;
use crate::node::{Node, walk_breadth_first};
use crate::parser::parse;

/// One line per statement, indented by nesting depth.
fn outline(source: &str) -> String {
    fn write_body(out: &mut Vec<String>, body: &[Stmt], depth: usize) {
        for stmt in body {
            let node = Node::Stmt(stmt);
            out.push(format!("{}{} @{}", "  ".repeat(depth), node.kind_name(), node.line()));
            match stmt {
                Stmt::FunctionDef(def) => write_body(out, &def.body, depth + 1),
                Stmt::If(if_stmt) => {
                    write_body(out, &if_stmt.body, depth + 1);
                    write_else(out, &if_stmt.orelse, depth);
                }
                Stmt::For(for_loop) => {
                    write_body(out, &for_loop.body, depth + 1);
                    write_else(out, &for_loop.orelse, depth);
                }
                Stmt::While(while_loop) => {
                    write_body(out, &while_loop.body, depth + 1);
                    write_else(out, &while_loop.orelse, depth);
                }
                Stmt::Try(try_stmt) => {
                    write_body(out, &try_stmt.body, depth + 1);
                    for handler in &try_stmt.handlers {
                        out.push(format!("{}except @{}", "  ".repeat(depth), handler.line));
                        write_body(out, &handler.body, depth + 1);
                    }
                    write_else(out, &try_stmt.orelse, depth);
                    if !try_stmt.finalbody.is_empty() {
                        out.push(format!("{}finally", "  ".repeat(depth)));
                        write_body(out, &try_stmt.finalbody, depth + 1);
                    }
                }
                _ => {}
            }
        }
    }

    fn write_else(out: &mut Vec<String>, orelse: &[Stmt], depth: usize) {
        if !orelse.is_empty() {
            out.push(format!("{}else", "  ".repeat(depth)));
            write_body(out, orelse, depth + 1);
        }
    }

    let module = parse(source).unwrap();
    let mut out = vec![];
    write_body(&mut out, &module.body, 0);
    out.join("\n")
}

#[test]
fn test_function_definition() {
    let source = r#"def calcular(capital, taxa=0.5, *, ) -> float:
    return capital * taxa
"#;
    assert!(parse(source).is_err());

    let source = r#"def calcular(capital: float, taxa=0.5) -> float:
    juros = capital * taxa
    return juros
"#;
    let module = parse(source).unwrap();
    let Stmt::FunctionDef(def) = &module.body[0] else {
        panic!("expected a function definition");
    };

    assert_eq!(def.name, "calcular");
    assert_eq!(def.params.len(), 2);
    assert_eq!(def.params[1].name, "taxa");
    assert!(def.params[1].default.is_some());
    assert!(def.returns.is_some());
    assert_eq!(def.body.len(), 2);
}

#[test]
fn test_nested_blocks() {
    let source = r#"
def main():
    try:
        valor = float(input("Valor: "))
    except ValueError as error:
        print(error)
        return
    else:
        pass
    finally:
        print("fim")

    while True:
        if valor > 10:
            break
        elif valor > 5:
            continue
        else:
            valor += 1
    else:
        pass

    for i, item in enumerate([1, 2]):
        pass

main()
"#;

    insta::assert_snapshot!(outline(source), @r"
    FunctionDef @2
      Try @3
        Assign @4
      except @5
        Expr @6
        Return @7
      else
        Pass @9
      finally
        Expr @11
      While @13
        If @14
          Break @15
        else
          If @16
            Continue @17
          else
            AugAssign @19
      else
        Pass @21
      For @23
        Pass @24
    Expr @26
    ");
}

#[test]
fn test_simple_statements_on_one_line() {
    let module = parse("if x: a = 1; b = 2\nwhile y: pass\n").unwrap();
    let Stmt::If(if_stmt) = &module.body[0] else {
        panic!("expected an if statement");
    };
    assert_eq!(if_stmt.body.len(), 2);
    assert!(matches!(&module.body[1], Stmt::While(w) if w.body[0].is_pass()));
}

#[test]
fn test_assignment_targets() {
    let module = parse("a = b = 1\nx, (y, *z) = 1, 2\nobj.attr[0] = 3\n").unwrap();

    let Stmt::Assign(chained) = &module.body[0] else {
        panic!("expected an assignment");
    };
    assert_eq!(chained.simple_targets().collect::<Vec<_>>(), vec!["a", "b"]);

    let stores: Vec<_> = walk_breadth_first(module.as_node())
        .filter_map(|node| match node {
            Node::Expr(Expr::Name(name)) if !name.is_load() => Some(name.id.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(stores, vec!["a", "b", "x", "y", "z"]);

    let Stmt::Assign(tuple) = &module.body[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(tuple.simple_targets().count(), 0);
    assert_eq!(label(Node::Stmt(&module.body[1])), "Assignment:  (line 2)");
}

#[test]
fn test_for_target_is_stored() {
    let module = parse("for k in keys:\n    print(k)\n").unwrap();
    let Stmt::For(for_loop) = &module.body[0] else {
        panic!("expected a for loop");
    };
    assert!(matches!(&for_loop.target, Expr::Name(name) if name.ctx == ExprContext::Store));
    assert!(matches!(&for_loop.iter, Expr::Name(name) if name.is_load()));
}

#[test]
fn test_syntax_errors() {
    let error = parse("x = (1 +\n").unwrap_err();
    assert_eq!(error.line, 2);
    assert_eq!(error.message, "unclosed bracket");

    let error = parse("if x:\nprint(x)\n").unwrap_err();
    assert_eq!(error.line, 2);
    assert_eq!(error.message, "expected an indented block");
    assert_eq!(error.text, "print(x)");

    let error = parse("x = 1\n  y = 2\n").unwrap_err();
    assert_eq!(error.message, "unexpected indent");

    let error = parse("if x:\n        a = 1\n    b = 2\n").unwrap_err();
    assert_eq!(error.line, 3);

    let error = parse("print('open)\n").unwrap_err();
    assert_eq!(error.message, "unterminated string literal");
    assert_eq!(error.column, 7);

    let error = parse("1 = x\n").unwrap_err();
    assert_eq!(error.message, "cannot assign to Constant");

    let error = parse("import os\n").unwrap_err();
    assert_eq!(error.message, "unsupported statement 'import'");

    let error = parse("try:\n    pass\nx = 1\n").unwrap_err();
    assert_eq!(error.line, 3);
}

#[test]
fn test_oversized_integer_literal() {
    let module = parse("big = 100000000000000000000000000000000000000000\nmask = 0x1_0000_0000_0000_0000_0000_0000_0000_0000\n").unwrap();
    let values: Vec<_> = module
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Assign(assign) => assign.value.as_constant().cloned(),
            _ => None,
        })
        .collect();

    assert_eq!(
        values,
        vec![
            ConstantValue::BigInt("100000000000000000000000000000000000000000".into()),
            ConstantValue::BigInt("0x100000000000000000000000000000000".into()),
        ]
    );
    assert!(values.iter().all(|value| value.type_name() == "int" && value.is_numeric()));
}

#[test]
fn test_empty_source() {
    assert_eq!(parse("").unwrap(), Module::default());
    assert_eq!(parse("\n# only a comment\n\n").unwrap(), Module::default());
}
