//! Per-field categorical encoder — bidirectional label ⇄ code mapping with
//! append-only vocabulary growth.

use std::collections::HashMap;

use forecast_core::error::{ForecastError, ForecastResult};

/// Maps category labels to dense zero-based integer codes and back.
///
/// Codes are assigned in first-seen order and are stable for the lifetime
/// of the encoder: growth only appends, existing codes are never reassigned
/// or removed. One encoder is created per categorical field and lives for
/// the process run.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    field: String,
    labels: Vec<String>,
    codes: HashMap<String, usize>,
}

impl CategoryEncoder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            labels: Vec::new(),
            codes: HashMap::new(),
        }
    }

    /// Name of the categorical field this encoder serves.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Reset the vocabulary and assign codes `0..k-1` in first-occurrence
    /// order over the input sequence. Empty input yields an empty vocabulary.
    pub fn fit<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.labels.clear();
        self.codes.clear();
        for label in labels {
            let label = label.as_ref();
            if !self.codes.contains_key(label) {
                self.codes.insert(label.to_string(), self.labels.len());
                self.labels.push(label.to_string());
            }
        }
    }

    /// Return the code for `label`, registering it at the next unused code
    /// if it has not been seen before. Idempotent: repeated calls with the
    /// same label return the same code without further growth.
    ///
    /// This is the mechanism by which prediction tolerates category values
    /// outside the training data.
    pub fn ensure(&mut self, label: &str) -> usize {
        if let Some(&code) = self.codes.get(label) {
            return code;
        }
        let code = self.labels.len();
        self.codes.insert(label.to_string(), code);
        self.labels.push(label.to_string());
        tracing::debug!(field = %self.field, label = label, code = code, "Vocabulary grown");
        code
    }

    /// Look up the code for a registered label. Callers seeing values that
    /// may be unregistered must call [`ensure`](Self::ensure) first.
    pub fn encode(&self, label: &str) -> ForecastResult<usize> {
        self.codes
            .get(label)
            .copied()
            .ok_or_else(|| ForecastError::UnknownCategory {
                field: self.field.clone(),
                label: label.to_string(),
            })
    }

    /// Look up the label for a code.
    pub fn decode(&self, code: usize) -> ForecastResult<&str> {
        self.labels
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| ForecastError::UnknownCode {
                field: self.field.clone(),
                code,
            })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Registered labels in code order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
