use serde::Serialize;

use crate::error::Result;
use crate::rules::RuleTable;
use crate::token::{CoarseKind, PrimitiveToken};

/// NAME tokens described as keywords rather than identifiers.
pub const KEYWORDS: &[&str] = &[
    "def", "return", "if", "else", "elif", "while", "try", "except", "raise", "continue", "break",
    "as", "print", "input", "float", "int",
];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ClassifiedToken {
    pub text: String,
    pub coarse_kind: CoarseKind,
    pub line: usize,
    pub category: Option<String>,
    pub description: &'static str,
}

pub fn describe(coarse_kind: CoarseKind, text: &str) -> &'static str {
    match coarse_kind {
        CoarseKind::Name if KEYWORDS.contains(&text) => "keyword",
        CoarseKind::Name => "identifier",
        CoarseKind::String => "string literal",
        CoarseKind::Number => "numeric literal",
        CoarseKind::Operator => "operator or delimiter",
        CoarseKind::Error => "invalid or special character",
        CoarseKind::Other => "other",
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    rules: RuleTable,
}

impl Classifier {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn standard() -> Result<Self> {
        Ok(Self::new(RuleTable::standard()?))
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn category(&self, text: &str) -> Option<&str> {
        self.rules.first_match(text).map(|rule| rule.name.as_str())
    }

    pub fn classify_token(&self, token: &PrimitiveToken) -> ClassifiedToken {
        ClassifiedToken {
            text: token.text.clone(),
            coarse_kind: token.coarse_kind,
            line: token.line,
            category: self.category(&token.text).map(str::to_string),
            description: describe(token.coarse_kind, &token.text),
        }
    }

    pub fn classify(&self, tokens: &[PrimitiveToken]) -> Vec<ClassifiedToken> {
        tokens
            .iter()
            .map(|token| self.classify_token(token))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::primitive_tokens;

    fn classifier() -> Classifier {
        Classifier::standard().unwrap()
    }

    fn op(text: &str) -> PrimitiveToken {
        PrimitiveToken::new(text, CoarseKind::Operator, 1, 0)
    }

    #[test]
    fn test_compound_keyword_wins() {
        let classified = classifier().classify_token(&op("not in"));
        assert_eq!(classified.category.as_deref(), Some("NOTINLIST"));
    }

    #[test]
    fn test_equality_is_not_assignment() {
        let classifier = classifier();
        assert_eq!(classifier.category("=="), Some("EQEQUAL"));
        assert_eq!(classifier.category("="), Some("EQUAL"));
        assert_eq!(classifier.category("**"), Some("DOUBLESTAR"));
        assert_eq!(classifier.category("*"), Some("STAR"));
        assert_eq!(classifier.category(">="), Some("GREATEREQUAL"));
    }

    #[test]
    fn test_unmatched_token_has_no_category() {
        let classifier = classifier();
        let token = PrimitiveToken::new("%", CoarseKind::Operator, 3, 2);
        let classified = classifier.classify_token(&token);

        assert_eq!(classified.category, None);
        assert_eq!(classified.description, "operator or delimiter");
        assert_eq!(classified.line, 3);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(describe(CoarseKind::Name, "def"), "keyword");
        assert_eq!(describe(CoarseKind::Name, "float"), "keyword");
        assert_eq!(describe(CoarseKind::Name, "True"), "identifier");
        assert_eq!(describe(CoarseKind::Name, "capital"), "identifier");
        assert_eq!(describe(CoarseKind::String, "'x'"), "string literal");
        assert_eq!(describe(CoarseKind::Number, "1"), "numeric literal");
        assert_eq!(describe(CoarseKind::Error, "$"), "invalid or special character");
        assert_eq!(describe(CoarseKind::Other, "# note"), "other");
    }

    #[test]
    fn test_classify_assignment_from_input() {
        let content = r#"capital = float(input("x"))"#;
        let tokens = primitive_tokens(content).unwrap();
        let classified = classifier()
            .classify(&tokens)
            .into_iter()
            .map(|t| (t.text, t.category.unwrap_or_default(), t.description))
            .collect::<Vec<_>>();

        insta::assert_debug_snapshot!(classified, @r#"
        [
            (
                "capital",
                "IDENT",
                "identifier",
            ),
            (
                "=",
                "EQUAL",
                "operator or delimiter",
            ),
            (
                "float",
                "IDENT",
                "keyword",
            ),
            (
                "(",
                "LPAR",
                "operator or delimiter",
            ),
            (
                "input",
                "INPUT",
                "keyword",
            ),
            (
                "(",
                "LPAR",
                "operator or delimiter",
            ),
            (
                "\"x\"",
                "STRING",
                "string literal",
            ),
            (
                ")",
                "RPAR",
                "operator or delimiter",
            ),
            (
                ")",
                "RPAR",
                "operator or delimiter",
            ),
        ]
        "#);
    }

    #[test]
    fn test_fstrings_and_comments() {
        let content = "print(f\"{total:.2f}\")  # done\n";
        let tokens = primitive_tokens(content).unwrap();
        let classified = classifier().classify(&tokens);

        assert_eq!(classified[0].category.as_deref(), Some("PRINT"));
        assert_eq!(classified[2].category.as_deref(), Some("FSTRING"));
        assert_eq!(classified[4].category.as_deref(), Some("COMMENT"));
        assert_eq!(classified[4].coarse_kind, CoarseKind::Other);
        assert_eq!(classified[4].description, "other");
    }

    #[test]
    fn test_classification_is_idempotent() {
        let content = "if x not in [1, 2]:\n    raise ValueError('bad')\n";
        let tokens = primitive_tokens(content).unwrap();
        let classifier = classifier();

        assert_eq!(classifier.classify(&tokens), classifier.classify(&tokens));
    }
}
