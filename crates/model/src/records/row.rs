use crate::core::value::FieldValue;

/// One row returned by the source query, columns kept in cursor order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowData {
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        RowData { field_values }
    }

    /// Looks up a column by its exact name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|f| f.name == field)
    }
}
