use std::fmt;

/// Indentation-aware text sink used to lay out DOT documents.
#[derive(Debug)]
pub struct DotWriter {
    output: String,
    indent_level: usize,
    indent_str: &'static str,
    at_line_start: bool,
}

impl Default for DotWriter {
    fn default() -> Self {
        Self::new("  ")
    }
}

impl DotWriter {
    pub fn new(indent_str: &'static str) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_str,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.output.push('\n');
                self.at_line_start = true;
                continue;
            }
            if self.at_line_start {
                for _ in 0..self.indent_level {
                    self.output.push_str(self.indent_str);
                }
                self.at_line_start = false;
            }
            self.output.push(c);
        }
    }

    pub fn writeln(&mut self, s: &str) {
        self.write(s);
        self.write("\n");
    }

    /// Writes `header {`, the body produced by `f` one level deeper, then `}`.
    pub fn block<F: FnOnce(&mut Self)>(&mut self, header: &str, f: F) {
        self.write(header);
        self.writeln(" {");
        self.indent();
        f(self);
        self.dedent();
        self.writeln("}");
    }

    pub fn finish(self) -> String {
        self.output
    }
}

impl fmt::Write for DotWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s);
        Ok(())
    }
}

/// Quotes a DOT identifier or label.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

pub type NodeId = usize;

/// A directed graph of labeled nodes, numbered in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotGraph {
    name: String,
    node_shape: Option<&'static str>,
    nodes: Vec<String>,
    edges: Vec<(NodeId, NodeId)>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_node_shape(mut self, shape: &'static str) -> Self {
        self.node_shape = Some(shape);
        self
    }

    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        self.nodes.push(label.into());
        self.nodes.len() - 1
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.edges.push((from, to));
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub fn render(&self) -> String {
        let mut writer = DotWriter::default();
        writer.block(&format!("digraph {}", quote(&self.name)), |writer| {
            if let Some(shape) = self.node_shape {
                writer.writeln(&format!("node [shape={shape}];"));
            }
            for (id, label) in self.nodes.iter().enumerate() {
                writer.writeln(&format!("n{id} [label={}];", quote(label)));
            }
            for (from, to) in &self.edges {
                writer.writeln(&format!("n{from} -> n{to};"));
            }
        });
        writer.finish()
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
