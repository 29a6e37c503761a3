use std::collections::BTreeSet;

use lexsem_core::Finding;
use lexsem_syntax::Module;
use serde::Serialize;
use tracing::debug;

use crate::builtins::Builtins;
use crate::error::{Error, Result};
use crate::passes::{
    find_empty_control_blocks, find_scope_violations, find_type_errors, find_uncalled_functions,
    find_unused_assignments,
};

/// Everything the analyzer found in one module. Every collection is
/// advisory; none of them stops further processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SemanticReport {
    pub unused_variables: BTreeSet<String>,
    pub uncalled_functions: BTreeSet<String>,
    pub type_errors: Vec<Finding>,
    pub scope_errors: Vec<Finding>,
    pub flow_warnings: Vec<Finding>,
}

impl SemanticReport {
    pub fn is_clean(&self) -> bool {
        self.unused_variables.is_empty()
            && self.uncalled_functions.is_empty()
            && self.type_errors.is_empty()
            && self.scope_errors.is_empty()
            && self.flow_warnings.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.unused_variables.len()
            + self.uncalled_functions.len()
            + self.type_errors.len()
            + self.scope_errors.len()
            + self.flow_warnings.len()
    }
}

/// Runs the five semantic passes over a syntax tree.
#[derive(Debug, Clone, Default)]
pub struct SemanticAnalyzer {
    builtins: Builtins,
}

impl SemanticAnalyzer {
    pub fn new(builtins: Builtins) -> Self {
        Self { builtins }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Fails with [`Error::MissingTree`] when there is nothing to analyze.
    pub fn analyze(&self, module: Option<&Module>) -> Result<SemanticReport> {
        let module = module.ok_or(Error::MissingTree)?;
        Ok(self.analyze_module(module))
    }

    /// Parses `source` first; a file that does not parse is never
    /// analyzed.
    pub fn analyze_source(&self, source: &str) -> Result<SemanticReport> {
        let module = lexsem_syntax::parse(source)?;
        Ok(self.analyze_module(&module))
    }

    pub fn analyze_module(&self, module: &Module) -> SemanticReport {
        let unused_variables = find_unused_assignments(module);
        debug!(count = unused_variables.len(), "unused variables");

        let uncalled_functions = find_uncalled_functions(module);
        debug!(count = uncalled_functions.len(), "uncalled functions");

        let type_errors = find_type_errors(module);
        debug!(count = type_errors.len(), "type errors");

        let scope_errors = find_scope_violations(module, &self.builtins);
        debug!(count = scope_errors.len(), "scope errors");

        let flow_warnings = find_empty_control_blocks(module);
        debug!(count = flow_warnings.len(), "control flow warnings");

        SemanticReport {
            unused_variables,
            uncalled_functions,
            type_errors,
            scope_errors,
            flow_warnings,
        }
    }
}
