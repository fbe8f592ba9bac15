//! User-facing rendering of a failed resolution.

use std::fmt;

use serde::Serialize;

use crate::error::ResolutionError;

/// Every error from one failed resolution, in pass order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiagnosticReport {
    pub family: String,
    pub errors: Vec<ResolutionError>,
}

impl DiagnosticReport {
    pub fn new(family: impl Into<String>, errors: Vec<ResolutionError>) -> Self {
        Self {
            family: family.into(),
            errors,
        }
    }

    /// Number of errors of each code, in first-seen order.
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for err in &self.errors {
            match counts.iter_mut().find(|(code, _)| *code == err.code()) {
                Some((_, n)) => *n += 1,
                None => counts.push((err.code(), 1)),
            }
        }
        counts
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Resolution failed ({}) ===", self.family)?;
        let summary: Vec<String> = self
            .counts()
            .iter()
            .map(|(code, n)| format!("{code}: {n}"))
            .collect();
        writeln!(f, "Errors: {} | {}", self.errors.len(), summary.join(" | "))?;
        writeln!(f, "--- Diagnostics ---")?;
        for err in &self.errors {
            writeln!(f, "[{}] {}", err.code(), err)?;
        }
        Ok(())
    }
}
