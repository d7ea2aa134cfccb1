use crate::types::RowNumber;

/// One tokenized data row: its 1-based position in the batch and its ordered fields.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Row {
    pub number: RowNumber,
    fields: Vec<String>
}

impl Row {
    pub fn new(number: RowNumber, fields: Vec<String>) -> Self {
        Self { number, fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed field at `index`, or an empty string when the row is shorter.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(|field| field.trim()).unwrap_or("")
    }

    /// Field at `index` exactly as tokenized.
    pub fn raw(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}
