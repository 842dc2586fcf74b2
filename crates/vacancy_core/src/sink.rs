use crate::record::VacancyRecord;

/// Ordered, append-only collection of records from every source and session
/// of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSink {
    records: Vec<VacancyRecord>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: VacancyRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = VacancyRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[VacancyRecord] {
        &self.records
    }

    /// Pretty-printed JSON array in append order. Non-ASCII text is written
    /// as-is. The sink is left untouched.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}
