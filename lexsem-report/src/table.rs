use lexsem_core::TableFormat;
use lexsem_token::ClassifiedToken;
use serde::Serialize;

use crate::error::Result;

const HEADERS: [&str; 5] = ["Name", "Token", "Type", "Description", "Line"];

/// One row of the classified token table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRow {
    pub name: String,
    pub token: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub line: usize,
}

impl From<&ClassifiedToken> for TokenRow {
    fn from(token: &ClassifiedToken) -> Self {
        Self {
            name: token.category.clone().unwrap_or_else(|| "-".into()),
            token: token.text.clone(),
            kind: token.coarse_kind.to_string(),
            description: token.description.into(),
            line: token.line,
        }
    }
}

impl TokenRow {
    fn cells(&self) -> [String; 5] {
        [
            self.name.clone(),
            self.token.clone(),
            self.kind.clone(),
            self.description.clone(),
            self.line.to_string(),
        ]
    }
}

pub fn token_rows(tokens: &[ClassifiedToken]) -> Vec<TokenRow> {
    tokens.iter().map(TokenRow::from).collect()
}

pub fn render_table(rows: &[TokenRow], format: TableFormat) -> Result<String> {
    let table = match format {
        TableFormat::Plain => render_plain(rows),
        TableFormat::Markdown => render_markdown(rows),
        TableFormat::Csv => render_csv(rows),
        TableFormat::Json => serde_json::to_string_pretty(rows)?,
    };
    Ok(table)
}

fn plain_line(cells: &[String; 5]) -> String {
    let line = format!(
        "{:<20} {:<40} {:<20} {:<40} {:<5}",
        cells[0], cells[1], cells[2], cells[3], cells[4]
    );
    line.trim_end().to_string()
}

fn render_plain(rows: &[TokenRow]) -> String {
    let mut lines = vec![
        plain_line(&HEADERS.map(String::from)),
        "-".repeat(125),
    ];
    lines.extend(rows.iter().map(|row| plain_line(&row.cells())));
    lines.join("\n")
}

fn render_markdown(rows: &[TokenRow]) -> String {
    let escape = |cell: &str| cell.replace('|', "\\|").replace('\n', "\\n");
    let line = |cells: &[String]| {
        let cells: Vec<_> = cells.iter().map(|cell| escape(cell)).collect();
        format!("| {} |", cells.join(" | "))
    };

    let mut lines = vec![
        line(&HEADERS.map(String::from)),
        format!("|{}", " --- |".repeat(HEADERS.len())),
    ];
    lines.extend(rows.iter().map(|row| line(&row.cells())));
    lines.join("\n")
}

fn csv_field(field: &str) -> String {
    match field.contains([',', '"', '\n', '\r']) {
        true => format!("\"{}\"", field.replace('"', "\"\"")),
        false => field.to_string(),
    }
}

fn render_csv(rows: &[TokenRow]) -> String {
    let mut csv = HEADERS.join(",");
    for row in rows {
        let fields: Vec<_> = row.cells().iter().map(|cell| csv_field(cell)).collect();
        csv.push('\n');
        csv.push_str(&fields.join(","));
    }
    csv
}
