//! Vacancy core: records, salary parsing, pagination state and the result sink.
//!
//! Everything here is pure; fetching and HTML parsing live in `vacancy_engine`.
mod query;
mod record;
mod salary;
mod session;
mod sink;

pub use query::{load_export, salary_above, VacancySummary};
pub use record::{Employer, Salary, VacancyLink, VacancyRecord};
pub use salary::{normalize_fragment, SalaryParseMiss, SalaryPattern};
pub use session::{
    MaxPages, PageIndex, SearchSession, SessionError, SessionProgress, SessionState,
};
pub use sink::ResultSink;
