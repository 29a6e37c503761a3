use crate::ast::*;
use crate::parse;

fn parse_expr(source: &str) -> Expr {
    let module = parse(source).unwrap();
    match module.body.into_iter().next() {
        Some(Stmt::Expr(stmt)) => stmt.value,
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn render(expr: &Expr) -> String {
    let join = |exprs: &[Expr]| exprs.iter().map(render).collect::<Vec<_>>().join(" ");
    match expr {
        Expr::BoolOp(op) => format!("({:?} {})", op.op, join(&op.values)),
        Expr::BinOp(op) => format!("({} {} {})", op.op.symbol(), render(&op.left), render(&op.right)),
        Expr::UnaryOp(op) => format!("({:?} {})", op.op, render(&op.operand)),
        Expr::IfExp(if_exp) => format!(
            "(if {} {} {})",
            render(&if_exp.test),
            render(&if_exp.body),
            render(&if_exp.orelse)
        ),
        Expr::Compare(compare) => {
            let ops: Vec<_> = compare.ops.iter().map(|op| format!("{op:?}")).collect();
            format!(
                "(cmp {} [{}] {})",
                render(&compare.left),
                ops.join(" "),
                join(&compare.comparators)
            )
        }
        Expr::Call(call) => {
            let keywords: Vec<_> = call
                .keywords
                .iter()
                .map(|kw| format!("{}={}", kw.arg.as_deref().unwrap_or("**"), render(&kw.value)))
                .collect();
            format!("(call {} [{}] [{}])", render(&call.func), join(&call.args), keywords.join(" "))
        }
        Expr::Starred(starred) => format!("*{}", render(&starred.value)),
        Expr::Attribute(attribute) => format!("{}.{}", render(&attribute.value), attribute.attr),
        Expr::Subscript(subscript) => format!("{}[{}]", render(&subscript.value), render(&subscript.slice)),
        Expr::Slice(slice) => {
            let bound = |bound: &Option<Box<Expr>>| bound.as_deref().map(render).unwrap_or_default();
            format!("{}:{}:{}", bound(&slice.lower), bound(&slice.upper), bound(&slice.step))
        }
        Expr::Name(name) => name.id.clone(),
        Expr::Constant(constant) => format!("{:?}", constant.value),
        Expr::JoinedStr(joined) => format!("(fstr {})", join(&joined.values)),
        Expr::FormattedValue(value) => match &value.format_spec {
            Some(spec) => format!("{{{} : {}}}", render(&value.value), render(spec)),
            None => format!("{{{}}}", render(&value.value)),
        },
        Expr::List(list) => format!("[{}]", join(&list.elts)),
        Expr::Tuple(tuple) => format!("(tuple {})", join(&tuple.elts)),
        Expr::Dict(dict) => format!("{{dict {} | {}}}", join(&dict.keys), join(&dict.values)),
    }
}

fn rendered(source: &str) -> String {
    render(&parse_expr(source))
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(rendered("a + b * c - d"), "(- (+ a (* b c)) d)");
    assert_eq!(rendered("(a + b) * c"), "(* (+ a b) c)");
    assert_eq!(rendered("a // b % c"), "(% (// a b) c)");
    assert_eq!(rendered("a | b ^ c & d << 1"), "(| a (^ b (& c (<< d Int(1)))))");
}

#[test]
fn test_power_and_unary() {
    assert_eq!(rendered("-2 ** 2"), "(USub (** Int(2) Int(2)))");
    assert_eq!(rendered("2 ** 3 ** 2"), "(** Int(2) (** Int(3) Int(2)))");
    assert_eq!(rendered("2 ** -1"), "(** Int(2) (USub Int(1)))");
    assert_eq!(rendered("~x + +y"), "(+ (Invert x) (UAdd y))");
}

#[test]
fn test_boolean_operators() {
    assert_eq!(rendered("a or b and not c"), "(Or a (And b (Not c)))");
    assert_eq!(rendered("a and b and c"), "(And a b c)");
    assert_eq!(rendered("not a == b"), "(Not (cmp a [Eq] b))");
}

#[test]
fn test_comparisons() {
    assert_eq!(rendered("a < b <= c"), "(cmp a [Lt LtE] b c)");
    assert_eq!(rendered("x not in items"), "(cmp x [NotIn] items)");
    assert_eq!(rendered("x is not None"), "(cmp x [IsNot] None)");
    assert_eq!(rendered("x in y is z"), "(cmp x [In Is] y z)");
    assert_eq!(rendered("a + 1 != b"), "(cmp (+ a Int(1)) [NotEq] b)");
}

#[test]
fn test_conditional_expression() {
    assert_eq!(rendered("a if b else c if d else e"), "(if b a (if d c e))");
}

#[test]
fn test_calls_and_trailers() {
    assert_eq!(
        rendered("print(x, *rest, sep=' ', **opts)"),
        r#"(call print [x *rest] [sep=Str(" ") **=opts])"#
    );
    assert_eq!(rendered("obj.items()[0].name"), "(call obj.items [] [])[Int(0)].name");
    assert_eq!(rendered("seq[1:]"), "seq[Int(1)::]");
    assert_eq!(rendered("seq[::2, i]"), "seq[(tuple ::Int(2) i)]");
}

#[test]
fn test_collections() {
    assert_eq!(rendered("[1, 2,]"), "[Int(1) Int(2)]");
    assert_eq!(rendered("()"), "(tuple )");
    assert_eq!(rendered("(1,)"), "(tuple Int(1))");
    assert_eq!(rendered("{'a': 1, b: [c]}"), r#"{dict Str("a") b | Int(1) [c]}"#);
    assert_eq!(rendered("{}"), "{dict  | }");
    assert_eq!(rendered("..."), "Ellipsis");
}

#[test]
fn test_literals() {
    assert_eq!(rendered("3.5"), "Float(3.5)");
    assert_eq!(rendered("True"), "Bool(true)");
    assert_eq!(rendered("'a' \"b\""), r#"Str("ab")"#);
    assert_eq!(rendered(r"b'\x41'"), r#"Bytes("A")"#);
    assert_eq!(rendered(r"r'\n'"), r#"Str("\\n")"#);
}

#[test]
fn test_formatted_strings() {
    assert_eq!(
        rendered(r#"f"Total: {total:.2f}!""#),
        r#"(fstr Str("Total: ") {total : (fstr Str(".2f"))} Str("!"))"#
    );
    assert_eq!(rendered(r#"f"{a + b}" "tail""#), r#"(fstr {(+ a b)} Str("tail"))"#);
    assert_eq!(rendered(r#"f"{{literal}}""#), r#"(fstr Str("{literal}"))"#);
}

#[test]
fn test_formatted_string_names_keep_line() {
    let module = parse("x = 1\nprint(f\"{x}\")\n").unwrap();
    let Stmt::Expr(stmt) = &module.body[1] else {
        panic!("expected an expression statement");
    };
    let Expr::Call(call) = &stmt.value else {
        panic!("expected a call");
    };
    let Expr::JoinedStr(joined) = &call.args[0] else {
        panic!("expected an f-string");
    };
    let Expr::FormattedValue(value) = &joined.values[0] else {
        panic!("expected a replacement field");
    };
    assert_eq!(value.value.line(), 2);
}

#[test]
fn test_invalid_expressions() {
    for source in ["1 +\n", "f(a=1, 2)\n", "{1, 2}\n", "lambda: 1\n", "f\"{}\"\n", "b'a' 'b'\n", "x = $\n"] {
        assert!(parse(source).is_err(), "{source:?} should not parse");
    }
}
