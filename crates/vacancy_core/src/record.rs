use serde::{Deserialize, Serialize};

/// Title and link of one advertised position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyLink {
    pub name: String,
    pub link: String,
}

/// Employer of a vacancy. Both fields are `None` when the listing does not
/// name an employer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Employer {
    pub name: Option<String>,
    pub link: Option<String>,
}

/// Normalized compensation. Bounds are never inverted: when both are present,
/// `min <= max`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawSalary")]
pub struct Salary {
    min: Option<u64>,
    max: Option<u64>,
    currency: Option<String>,
}

#[derive(Deserialize)]
struct RawSalary {
    min: Option<u64>,
    max: Option<u64>,
    currency: Option<String>,
}

impl From<RawSalary> for Salary {
    fn from(raw: RawSalary) -> Self {
        Salary::new(raw.min, raw.max, raw.currency)
    }
}

impl Salary {
    /// Builds a salary, swapping inverted bounds and dropping an empty currency.
    pub fn new(min: Option<u64>, max: Option<u64>, currency: Option<String>) -> Self {
        let (min, max) = match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
            bounds => bounds,
        };
        let currency = currency
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { min, max, currency }
    }

    /// Salary not disclosed by the listing.
    pub fn undisclosed() -> Self {
        Self::default()
    }

    pub fn min(&self) -> Option<u64> {
        self.min
    }

    pub fn max(&self) -> Option<u64> {
        self.max
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    pub fn is_disclosed(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// One normalized job advertisement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyRecord {
    pub vacancy: VacancyLink,
    pub salary: Salary,
    pub employer: Employer,
    /// Main URL of the site the record was scraped from.
    pub source: String,
}

impl VacancyRecord {
    pub fn new(
        vacancy: VacancyLink,
        salary: Salary,
        employer: Employer,
        source: impl Into<String>,
    ) -> Self {
        Self {
            vacancy,
            salary,
            employer,
            source: source.into(),
        }
    }
}
