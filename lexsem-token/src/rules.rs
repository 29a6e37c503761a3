use regex::Regex;

use crate::error::{Error, Result};

/// Declaration of a classification rule. `example` is a text the rule is
/// meant to classify; it is used to validate the table ordering.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec<'a> {
    pub name: &'a str,
    pub pattern: &'a str,
    pub example: &'a str,
}

impl<'a> RuleSpec<'a> {
    pub const fn new(name: &'a str, pattern: &'a str, example: &'a str) -> Self {
        Self {
            name,
            pattern,
            example,
        }
    }
}

/// Standard rule order. Multi-character operators come before their
/// single-character prefixes and `not in` before `not` and `in`;
/// [`RuleTable::new`] rejects any table that breaks this.
pub const STANDARD_RULES: &[RuleSpec<'static>] = &[
    RuleSpec::new("FSTRING", r#"f"(?:[^"\\]|\\.)*"|f'(?:[^'\\]|\\.)*'"#, r#"f"{x}""#),
    RuleSpec::new("STRING", r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#, r#""x""#),
    RuleSpec::new("DEF", r"\bdef\b", "def"),
    RuleSpec::new("RETURN", r"\breturn\b", "return"),
    RuleSpec::new("WHILE", r"\bwhile\b", "while"),
    RuleSpec::new("TRUE", r"\bTrue\b", "True"),
    RuleSpec::new("TRY", r"\btry\b", "try"),
    RuleSpec::new("EXCEPT", r"\bexcept\b", "except"),
    RuleSpec::new("IF", r"\bif\b", "if"),
    RuleSpec::new("ELSE", r"\belse\b", "else"),
    RuleSpec::new("ELIF", r"\belif\b", "elif"),
    RuleSpec::new("BREAK", r"\bbreak\b", "break"),
    RuleSpec::new("CONTINUE", r"\bcontinue\b", "continue"),
    RuleSpec::new("RAISE", r"\braise\b", "raise"),
    RuleSpec::new("PRINT", r"\bprint\b", "print"),
    RuleSpec::new("INPUT", r"\binput\b", "input"),
    RuleSpec::new("NOTINLIST", r"not\s+in", "not in"),
    RuleSpec::new("NOT", r"\bnot\b", "not"),
    RuleSpec::new("IN", r"\bin\b", "in"),
    RuleSpec::new("AS", r"\bas\b", "as"),
    RuleSpec::new("OR", r"\bor\b", "or"),
    RuleSpec::new("EQEQUAL", r"==", "=="),
    RuleSpec::new("NOTEQUAL", r"!=", "!="),
    RuleSpec::new("LESSEQUAL", r"<=", "<="),
    RuleSpec::new("GREATEREQUAL", r">=", ">="),
    RuleSpec::new("EQUAL", r"=", "="),
    RuleSpec::new("LESS", r"<", "<"),
    RuleSpec::new("GREATER", r">", ">"),
    RuleSpec::new("PLUS", r"\+", "+"),
    RuleSpec::new("MINUS", r"-", "-"),
    RuleSpec::new("DOUBLESTAR", r"\*\*", "**"),
    RuleSpec::new("STAR", r"\*", "*"),
    RuleSpec::new("SLASH", r"/", "/"),
    RuleSpec::new("COLON", r":", ":"),
    RuleSpec::new("COMMA", r",", ","),
    RuleSpec::new("LSQB", r"\[", "["),
    RuleSpec::new("RSQB", r"\]", "]"),
    RuleSpec::new("LPAR", r"\(", "("),
    RuleSpec::new("RPAR", r"\)", ")"),
    RuleSpec::new("NUMBER", r"\b\d+(\.\d+)?\b", "42"),
    RuleSpec::new("IDENT", r"\b[_a-zA-Z][_a-zA-Z0-9]*\b", "name"),
    RuleSpec::new("NEWLINE", r"\n", "\n"),
    RuleSpec::new("SKIP", r"[ \t]+", " "),
    RuleSpec::new("COMMENT", r"#.*", "# comment"),
];

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: Regex,
    pub example: String,
}

impl Rule {
    /// Whether the pattern matches the whole of `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Ordered list of classification rules. The first rule matching a token's
/// whole text names its category.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new<'a>(specs: impl IntoIterator<Item = RuleSpec<'a>>) -> Result<Self> {
        let mut rules: Vec<Rule> = vec![];

        for spec in specs {
            if rules.iter().any(|rule| rule.name == spec.name) {
                return Err(Error::DuplicateRule {
                    name: spec.name.into(),
                });
            }

            let pattern = Regex::new(&format!("^(?:{})$", spec.pattern)).map_err(|error| {
                Error::InvalidPattern {
                    name: spec.name.into(),
                    message: error.to_string(),
                }
            })?;

            let rule = Rule {
                name: spec.name.into(),
                pattern,
                example: spec.example.into(),
            };

            if !rule.matches(&rule.example) {
                return Err(Error::InvalidExample {
                    name: rule.name,
                    example: rule.example,
                });
            }

            rules.push(rule);
        }

        check_ordering(&rules)?;
        Ok(Self { rules })
    }

    pub fn standard() -> Result<Self> {
        Self::new(STANDARD_RULES.iter().copied())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name == name)
    }

    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches(text))
    }
}

/// Rejects a rule that can never fire for its own example because an
/// earlier rule already claims it. Anchored patterns cannot tell `=` from
/// `==` or `not` from `not in` apart by matching, so those pairs are also
/// checked through their examples.
fn check_ordering(rules: &[Rule]) -> Result<()> {
    for (index, later) in rules.iter().enumerate() {
        for earlier in &rules[..index] {
            if earlier.matches(&later.example) || must_precede(&later.example, &earlier.example) {
                return Err(Error::MisorderedRule {
                    earlier: later.name.clone(),
                    later: earlier.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// `longer` has to be tried before `shorter` when it is a symbol that
/// `shorter` is a strict prefix of (`==` and `=`), or a compound keyword
/// that `shorter` is one of the words of (`not in` and `in`).
fn must_precede(longer: &str, shorter: &str) -> bool {
    if longer == shorter || shorter.is_empty() {
        return false;
    }

    if longer.contains(char::is_whitespace) {
        return longer.split_whitespace().any(|word| word == shorter);
    }

    let symbolic = !longer.chars().all(|c| c.is_alphanumeric() || c == '_');
    symbolic && longer.starts_with(shorter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = RuleTable::standard().unwrap();
        assert_eq!(table.len(), STANDARD_RULES.len());
    }

    #[test]
    fn test_standard_table_ordering() {
        let table = RuleTable::standard().unwrap();
        let before = |a: &str, b: &str| table.position(a).unwrap() < table.position(b).unwrap();

        assert!(before("EQEQUAL", "EQUAL"));
        assert!(before("NOTEQUAL", "EQUAL"));
        assert!(before("LESSEQUAL", "LESS"));
        assert!(before("GREATEREQUAL", "GREATER"));
        assert!(before("DOUBLESTAR", "STAR"));
        assert!(before("NOTINLIST", "NOT"));
        assert!(before("NOTINLIST", "IN"));
    }

    #[test]
    fn test_single_char_operator_before_its_extension_is_rejected() {
        let specs = [
            RuleSpec::new("EQUAL", "=", "="),
            RuleSpec::new("EQEQUAL", "==", "=="),
        ];

        let error = RuleTable::new(specs).unwrap_err();
        assert_eq!(
            error,
            Error::MisorderedRule {
                earlier: "EQEQUAL".into(),
                later: "EQUAL".into(),
            }
        );
    }

    #[test]
    fn test_keyword_before_compound_is_rejected() {
        let specs = [
            RuleSpec::new("IN", r"\bin\b", "in"),
            RuleSpec::new("NOTINLIST", r"not\s+in", "not in"),
        ];

        let error = RuleTable::new(specs).unwrap_err();
        assert_eq!(
            error,
            Error::MisorderedRule {
                earlier: "NOTINLIST".into(),
                later: "IN".into(),
            }
        );
    }

    #[test]
    fn test_shadowed_rule_is_rejected() {
        let specs = [
            RuleSpec::new("IDENT", r"\b[_a-zA-Z][_a-zA-Z0-9]*\b", "name"),
            RuleSpec::new("DEF", r"\bdef\b", "def"),
        ];

        let error = RuleTable::new(specs).unwrap_err();
        assert_eq!(
            error,
            Error::MisorderedRule {
                earlier: "DEF".into(),
                later: "IDENT".into(),
            }
        );
    }

    #[test]
    fn test_keyword_before_identifier_is_fine() {
        let specs = [
            RuleSpec::new("DEF", r"\bdef\b", "def"),
            RuleSpec::new("IDENT", r"\b[_a-zA-Z][_a-zA-Z0-9]*\b", "name"),
        ];

        let table = RuleTable::new(specs).unwrap();
        assert_eq!(table.first_match("def").map(|rule| rule.name.as_str()), Some("DEF"));
        assert_eq!(table.first_match("define").map(|rule| rule.name.as_str()), Some("IDENT"));
    }

    #[test]
    fn test_keywords_that_contain_each_other_are_fine() {
        // `if` is part of `elif` but keywords only ever match whole words
        let specs = [
            RuleSpec::new("IF", r"\bif\b", "if"),
            RuleSpec::new("ELIF", r"\belif\b", "elif"),
        ];
        assert!(RuleTable::new(specs).is_ok());
    }

    #[test]
    fn test_invalid_rules() {
        let bad_pattern = [RuleSpec::new("BROKEN", "(", "(")];
        assert!(matches!(
            RuleTable::new(bad_pattern),
            Err(Error::InvalidPattern { .. })
        ));

        let bad_example = [RuleSpec::new("PLUS", r"\+", "-")];
        assert!(matches!(
            RuleTable::new(bad_example),
            Err(Error::InvalidExample { .. })
        ));

        let duplicated = [
            RuleSpec::new("PLUS", r"\+", "+"),
            RuleSpec::new("PLUS", r"\+", "+"),
        ];
        assert!(matches!(
            RuleTable::new(duplicated),
            Err(Error::DuplicateRule { .. })
        ));
    }

    #[test]
    fn test_patterns_match_whole_text() {
        let table = RuleTable::standard().unwrap();
        let number = &table.rules()[table.position("NUMBER").unwrap()];

        assert!(number.matches("3.14"));
        assert!(!number.matches("3.14abc"));
        assert!(!number.matches("x3"));
    }
}
