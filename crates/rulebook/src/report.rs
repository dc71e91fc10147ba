//! Aggregated outcome of one validation call

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use rulebook_core::ErrorRecord;

/// Errors of a validation call, flat and grouped by field.
///
/// Both halves are `None` when nothing failed. Otherwise `errors` lists every
/// error by field declaration order, then rule order, and `fields` groups
/// the same errors under their field path in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Option<Vec<ErrorRecord>>,
    fields: Option<IndexMap<String, Vec<ErrorRecord>>>,
}

impl ValidationReport {
    /// Flatten per-task results into a report
    pub fn aggregate<I>(results: I) -> Self
    where
        I: IntoIterator<Item = Vec<ErrorRecord>>,
    {
        let errors: Vec<ErrorRecord> = results.into_iter().flatten().collect();
        if errors.is_empty() {
            return Self::default();
        }

        let mut fields: IndexMap<String, Vec<ErrorRecord>> = IndexMap::new();
        for error in &errors {
            fields.entry(error.field.clone()).or_default().push(error.clone());
        }

        Self {
            errors: Some(errors),
            fields: Some(fields),
        }
    }

    /// Whether no rule failed
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    /// All errors, or `None` when valid
    pub fn errors(&self) -> Option<&[ErrorRecord]> {
        self.errors.as_deref()
    }

    /// Errors grouped by field path, or `None` when valid
    pub fn fields(&self) -> Option<&IndexMap<String, Vec<ErrorRecord>>> {
        self.fields.as_ref()
    }

    /// Errors for one field path
    pub fn field(&self, field: &str) -> Option<&[ErrorRecord]> {
        self.fields.as_ref()?.get(field).map(Vec::as_slice)
    }

    /// Number of errors
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Vec::len)
    }

    /// Split into `(errors, fields)`
    pub fn into_parts(
        self,
    ) -> (
        Option<Vec<ErrorRecord>>,
        Option<IndexMap<String, Vec<ErrorRecord>>>,
    ) {
        (self.errors, self.fields)
    }

    /// `Ok(())` when valid, otherwise the flat error list
    ///
    /// # Errors
    ///
    /// Every error the call produced.
    pub fn into_result(self) -> std::result::Result<(), Vec<ErrorRecord>> {
        match self.errors {
            None => Ok(()),
            Some(errors) => Err(errors),
        }
    }
}
