use lexsem_core::Finding;

/// Accumulates the findings of a single pass in the order they are found.
#[derive(Debug, Default)]
pub struct Diagnostics(Vec<Finding>);

impl Diagnostics {
    pub fn items(self) -> Vec<Finding> {
        self.0
    }

    pub fn push(&mut self, line: usize, message: impl Into<String>) {
        self.0.push(Finding::new(line, message));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
