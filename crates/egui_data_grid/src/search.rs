use crate::record::Record;

/// Case-insensitive substring search over records.
///
/// Search is a linear scan: every query change costs `records × keys` string
/// comparisons, which is fine for a few hundred rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Fields to look at. Empty means every field of the record.
    keys: Vec<String>,

    /// The search box prompt. Some hosts bind the box text directly, so a query equal
    /// to the prompt must behave like an empty one.
    placeholder: String,
}

impl SearchFilter {
    pub fn new(keys: Vec<String>, placeholder: impl Into<String>) -> Self {
        Self {
            keys,
            placeholder: placeholder.into(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Lowercased, trimmed needle; `None` when the query matches everything.
    pub fn normalize(&self, query: &str) -> Option<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || needle == self.placeholder.trim().to_lowercase() {
            None
        } else {
            Some(needle)
        }
    }

    /// Does the record contain the (already normalized) needle in any searched field?
    pub fn matches(&self, record: &Record, needle: &str) -> bool {
        if self.keys.is_empty() {
            record
                .values()
                .any(|value| value.to_string().to_lowercase().contains(needle))
        } else {
            self.keys
                .iter()
                .any(|key| record.text(key).to_lowercase().contains(needle))
        }
    }

    /// Indices of the matching records, in dataset order.
    pub fn filter(&self, records: &[Record], query: &str) -> Vec<usize> {
        profiling::function_scope!();
        match self.normalize(query) {
            None => (0..records.len()).collect(),
            Some(needle) => records
                .iter()
                .enumerate()
                .filter(|(_, record)| self.matches(record, &needle))
                .map(|(i, _)| i)
                .collect(),
        }
    }
}
