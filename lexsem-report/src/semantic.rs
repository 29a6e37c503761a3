use std::collections::BTreeSet;

use lexsem_core::Finding;
use lexsem_semantic::SemanticReport;

use crate::error::Result;

/// Plain text rendering of a [`SemanticReport`]: one section per pass,
/// either its findings or a sentence stating nothing was found.
pub fn render_report(report: &SemanticReport) -> String {
    let mut lines = vec![];

    names_section(
        &mut lines,
        "Variables assigned but never used",
        &report.unused_variables,
        "No variables assigned without use.",
    );
    names_section(
        &mut lines,
        "Functions defined but never called",
        &report.uncalled_functions,
        "All defined functions were called.",
    );
    findings_section(
        &mut lines,
        "Type and operation errors",
        &report.type_errors,
        "No type or operation errors found.",
    );
    findings_section(
        &mut lines,
        "Scope errors",
        &report.scope_errors,
        "No scope errors found.",
    );
    findings_section(
        &mut lines,
        "Control flow warnings",
        &report.flow_warnings,
        "No control flow problems found.",
    );

    lines.join("\n")
}

pub fn render_report_json(report: &SemanticReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn names_section(lines: &mut Vec<String>, title: &str, names: &BTreeSet<String>, empty: &str) {
    match names.is_empty() {
        true => lines.push(empty.into()),
        false => {
            let names: Vec<_> = names.iter().map(String::as_str).collect();
            lines.push(format!("{title}: {}", names.join(", ")));
        }
    }
}

fn findings_section(lines: &mut Vec<String>, title: &str, findings: &[Finding], empty: &str) {
    if findings.is_empty() {
        lines.push(empty.into());
        return;
    }
    lines.push(format!("{title}:"));
    lines.extend(findings.iter().map(|finding| format!("  - {finding}")));
}

#[cfg(test)]
mod tests {
    use lexsem_semantic::SemanticAnalyzer;

    use super::*;

    #[test]
    fn test_clean_report() {
        let report = SemanticReport::default();
        insta::assert_snapshot!(render_report(&report), @r"
        No variables assigned without use.
        All defined functions were called.
        No type or operation errors found.
        No scope errors found.
        No control flow problems found.
        ");
    }

    #[test]
    fn test_report_with_findings() {
        let source = r#"def unused_helper():
    pass

spare = 1 + "x"
while spare:
    pass
"#;
        let report = SemanticAnalyzer::default().analyze_source(source).unwrap();

        insta::assert_snapshot!(render_report(&report), @r"
        No variables assigned without use.
        Functions defined but never called: unused_helper
        Type and operation errors:
          - Arithmetic operation between incompatible types: int and str on line 4
        No scope errors found.
        Control flow warnings:
          - Empty while block on line 5
        ");
    }

    #[test]
    fn test_json_report() {
        let mut report = SemanticReport::default();
        report.unused_variables.insert("total".into());
        report.scope_errors.push(Finding::new(3, "out of scope"));

        let json: serde_json::Value = serde_json::from_str(&render_report_json(&report).unwrap()).unwrap();
        assert_eq!(json["unused_variables"], serde_json::json!(["total"]));
        assert_eq!(json["scope_errors"][0]["line"], 3);
        assert_eq!(json["flow_warnings"], serde_json::json!([]));
    }
}
