use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{
    DeductionData, FilingStatus, IncomeData, ItrType, PersonalInfo, Regime, TaxComparison,
};

/// Opaque identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilingId(pub String);

impl FilingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilingId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The wizard's working copy of a filing.
///
/// Step sub-records stay `None` until their step has been confirmed by the
/// service at least once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingDraft {
    pub id: FilingId,
    pub financial_year: String,
    pub assessment_year: String,
    pub itr_type: ItrType,

    #[serde(default)]
    pub regime: Regime,
    #[serde(default)]
    pub status: FilingStatus,

    #[serde(default)]
    pub personal_info: Option<PersonalInfo>,
    #[serde(default)]
    pub income_data: Option<IncomeData>,
    #[serde(default)]
    pub deduction_data: Option<DeductionData>,
    #[serde(default)]
    pub tds_paid: Decimal,
    #[serde(default)]
    pub tax_computation: Option<TaxComparison>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Accepts RFC 3339 timestamps as well as offset-less ones, which are read
/// as UTC. SQLite-backed services drop the offset.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(stamp.with_timezone(&Utc)));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
}

impl FilingDraft {
    /// The computation for whichever regime the draft currently carries.
    pub fn chosen_result(&self) -> Option<&super::RegimeResult> {
        self.tax_computation
            .as_ref()
            .map(|tc| tc.result_for(self.regime))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_freshly_created_filing() {
        let draft: FilingDraft = serde_json::from_value(json!({
            "id": "3f9c2a10-8d4e-4b57-9b8e-0c1d2e3f4a5b",
            "user_id": "u-1",
            "financial_year": "2025-2026",
            "assessment_year": "2026-2027",
            "itr_type": "ITR-1",
            "status": "draft",
            "regime": "new",
            "personal_info": null,
            "income_data": null,
            "deduction_data": null,
            "tax_computation": null,
            "total_income": 0.0,
            "tax_payable": 0.0,
            "tds_paid": 0.0,
            "refund": 0.0,
            "created_at": "2025-07-01T10:00:00Z",
            "updated_at": "2025-07-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(draft.id.as_str(), "3f9c2a10-8d4e-4b57-9b8e-0c1d2e3f4a5b");
        assert_eq!(draft.status, FilingStatus::Draft);
        assert_eq!(draft.regime, Regime::New);
        assert!(draft.personal_info.is_none());
        assert!(draft.tax_computation.is_none());
        assert!(draft.chosen_result().is_none());
        assert!(draft.created_at.is_some());
    }

    #[test]
    fn reads_offsetless_timestamps_as_utc() {
        let draft: FilingDraft = serde_json::from_value(json!({
            "id": "f-1",
            "financial_year": "2025-2026",
            "assessment_year": "2026-2027",
            "itr_type": "ITR-1",
            "status": "in_progress",
            "created_at": "2026-04-01T10:00:00.123456",
            "updated_at": "2026-04-01 10:05:00",
        }))
        .unwrap();

        let created = draft.created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2026-04-01T10:00:00.123456+00:00");
        assert_eq!(
            draft.updated_at.unwrap().to_rfc3339(),
            "2026-04-01T10:05:00+00:00"
        );
    }

    #[test]
    fn null_or_missing_timestamps_stay_empty() {
        let draft: FilingDraft = serde_json::from_value(json!({
            "id": "f-1",
            "financial_year": "2025-2026",
            "assessment_year": "2026-2027",
            "itr_type": "ITR-1",
            "created_at": null,
        }))
        .unwrap();

        assert!(draft.created_at.is_none());
        assert!(draft.updated_at.is_none());
    }

    #[test]
    fn rejects_garbage_timestamps() {
        let result = serde_json::from_value::<FilingDraft>(json!({
            "id": "f-1",
            "financial_year": "2025-2026",
            "assessment_year": "2026-2027",
            "itr_type": "ITR-1",
            "created_at": "yesterday",
        }));

        assert!(result.is_err());
    }
}
