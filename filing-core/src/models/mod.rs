mod classification;
mod filing_draft;
mod filing_status;
mod filing_update;
mod review;
mod step_data;
mod suggestion;
mod tax_comparison;

pub use classification::{Classification, ItrType, Regime};
pub use filing_draft::{FilingDraft, FilingId};
pub use filing_status::FilingStatus;
pub use filing_update::FilingUpdate;
pub use review::ReviewSummary;
pub use step_data::{DeductionData, IncomeData, PersonalInfo, STANDARD_DEDUCTION};
pub use suggestion::{Priority, SuggestionEntry};
pub use tax_comparison::{RegimeResult, TaxComparison};
