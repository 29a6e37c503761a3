use lexsem_token::{Token, TokenKind};

/// Renders one line per source line, each token written as a parenthesized
/// tag: `(NAME)`, `(STRING, '...')`, `(NUMBER, n)`, `(op)`.
pub fn compact_listing(tokens: &[Token], content: &str) -> String {
    let mut lines: Vec<String> = vec![];
    let mut current: Option<usize> = None;

    for token in tokens.iter().filter(|token| !token.kind().is_layout()) {
        if current != Some(token.line()) {
            lines.push(String::new());
            current = Some(token.line());
        }

        if let Some(line) = lines.last_mut() {
            line.push_str(&compact_token(token, content));
        }
    }

    lines.join("\n")
}

fn compact_token(token: &Token, content: &str) -> String {
    let text = token.text(content);
    match token.kind() {
        TokenKind::Name => format!("({})", text.to_uppercase()),
        TokenKind::String => format!("(STRING, {})", python_repr(text)),
        TokenKind::Number => format!("(NUMBER, {text})"),
        TokenKind::Op => format!("({text})"),
        TokenKind::Error => format!("(ERRORTOKEN, {})", python_repr(text)),
        kind => format!("({})", kind.name()),
    }
}

/// Quotes `text` the way the host language's `repr` does for strings.
pub fn python_repr(text: &str) -> String {
    let quote = match text.contains('\'') && !text.contains('"') {
        true => '"',
        false => '\'',
    };

    let mut repr = String::with_capacity(text.len() + 2);
    repr.push(quote);
    for c in text.chars() {
        match c {
            '\\' => repr.push_str("\\\\"),
            '\n' => repr.push_str("\\n"),
            '\r' => repr.push_str("\\r"),
            '\t' => repr.push_str("\\t"),
            c if c == quote => {
                repr.push('\\');
                repr.push(c);
            }
            c if c.is_control() && (c as u32) < 0x100 => {
                repr.push_str(&format!("\\x{:02x}", c as u32));
            }
            c => repr.push(c),
        }
    }
    repr.push(quote);
    repr
}

#[cfg(test)]
mod tests {
    use lexsem_token::tokenize;

    use super::*;

    fn listing(content: &str) -> String {
        let tokens = tokenize(content).unwrap();
        compact_listing(&tokens, content)
    }

    #[test]
    fn test_repr_quoting() {
        assert_eq!(python_repr(r#""x""#), r#"'"x"'"#);
        assert_eq!(python_repr("'x'"), r#""'x'""#);
        assert_eq!(python_repr(r#"'it"s'"#), r#"'\'it"s\''"#);
        assert_eq!(python_repr(r#""a\nb""#), r#"'"a\\nb"'"#);
        assert_eq!(python_repr("$"), "'$'");
    }

    #[test]
    fn test_compact_listing() {
        let content = r#"def calc(rate):
    total = rate * 1.5  # scaled
    print("Total:", total)
"#;
        insta::assert_snapshot!(listing(content), @r#"
        (DEF)(CALC)(()(RATE)())(:)
        (TOTAL)(=)(RATE)(*)(NUMBER, 1.5)(COMMENT)
        (PRINT)(()(STRING, '"Total:"')(,)(TOTAL)())
        "#);
    }

    #[test]
    fn test_error_tokens() {
        assert_eq!(listing("x = $\n"), "(X)(=)(ERRORTOKEN, '$')");
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let content = "# header\n\nx = 1\n";
        assert_eq!(listing(content), "(COMMENT)\n(X)(=)(NUMBER, 1)");
    }
}
