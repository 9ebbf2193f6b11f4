use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductionData, FilingDraft, FilingStatus, IncomeData, PersonalInfo, Regime};

/// Partial update of a filing.
///
/// Only the keys that are `Some` are sent; the service leaves every omitted
/// key untouched, and [`FilingUpdate::apply_to`] mirrors that locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_data: Option<IncomeData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduction_data: Option<DeductionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<Regime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tds_paid: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FilingStatus>,
}

impl FilingUpdate {
    pub fn personal(
        info: PersonalInfo,
        status: FilingStatus,
    ) -> Self {
        Self {
            personal_info: Some(info),
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn income(data: IncomeData) -> Self {
        Self {
            income_data: Some(data),
            ..Default::default()
        }
    }

    pub fn deductions(
        data: DeductionData,
        tds_paid: Decimal,
    ) -> Self {
        Self {
            deduction_data: Some(data),
            tds_paid: Some(tds_paid),
            ..Default::default()
        }
    }

    pub fn regime(regime: Regime) -> Self {
        Self {
            regime: Some(regime),
            ..Default::default()
        }
    }

    pub fn status(status: FilingStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge the provided keys into `draft`, leaving every other field as is.
    ///
    /// A status that would move the draft backwards is ignored.
    pub fn apply_to(
        &self,
        draft: &mut FilingDraft,
    ) {
        if let Some(info) = &self.personal_info {
            draft.personal_info = Some(info.clone());
        }
        if let Some(data) = &self.income_data {
            draft.income_data = Some(data.clone());
        }
        if let Some(data) = &self.deduction_data {
            draft.deduction_data = Some(data.clone());
        }
        if let Some(regime) = self.regime {
            draft.regime = regime;
        }
        if let Some(tds) = self.tds_paid {
            draft.tds_paid = tds;
        }
        if let Some(status) = self.status {
            if draft.status.can_transition_to(status) {
                draft.status = status;
            }
        }
    }
}
