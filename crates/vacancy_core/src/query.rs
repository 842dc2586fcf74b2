use crate::record::VacancyRecord;

/// Flattened view of a record for listing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacancySummary {
    pub name: String,
    pub link: String,
    pub salary_min: u64,
    pub employer: Option<String>,
}

/// Reads a document written by [`crate::ResultSink::export_json`].
pub fn load_export(json: &str) -> Result<Vec<VacancyRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Records whose minimum salary is strictly greater than `threshold`.
/// Records without a minimum are ignored; currencies are not converted.
pub fn salary_above(records: &[VacancyRecord], threshold: u64) -> Vec<VacancySummary> {
    records
        .iter()
        .filter_map(|record| {
            let min = record.salary.min()?;
            (min > threshold).then(|| VacancySummary {
                name: record.vacancy.name.clone(),
                link: record.vacancy.link.clone(),
                salary_min: min,
                employer: record.employer.name.clone(),
            })
        })
        .collect()
}
