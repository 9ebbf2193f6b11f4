//! Scripted in-memory filing service shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use filing_core::{
    Classification, FilingDraft, FilingId, FilingService, FilingStatus, FilingUpdate, Priority,
    Regime, RegimeResult, ServiceError, SuggestionEntry, TaxComparison,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Notify;

/// Holds `update` calls until released, announcing each one as it arrives.
pub struct UpdateGate {
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct ScriptedService {
    pub draft: Mutex<Option<FilingDraft>>,
    pub updates: Mutex<Vec<FilingUpdate>>,
    pub recommended: Mutex<Option<Regime>>,
    pub suggestions: Mutex<Vec<SuggestionEntry>>,
    pub fail_create: AtomicBool,
    pub fail_updates: AtomicBool,
    pub fail_regime_updates: AtomicBool,
    pub fail_compute: AtomicBool,
    pub fail_suggestions: AtomicBool,
    pub gate: Mutex<Option<Arc<UpdateGate>>>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn recommending(regime: Regime) -> Arc<Self> {
        let service = Self::default();
        *service.recommended.lock().unwrap() = Some(regime);
        Arc::new(service)
    }

    pub fn server_draft(&self) -> FilingDraft {
        self.draft.lock().unwrap().clone().expect("draft was never created")
    }

    pub fn recorded_updates(&self) -> Vec<FilingUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn set(
        flag: &AtomicBool,
        on: bool,
    ) {
        flag.store(on, Ordering::SeqCst);
    }

    pub fn install_gate(&self) -> Arc<UpdateGate> {
        let gate = Arc::new(UpdateGate {
            entered: Notify::new(),
            release: Notify::new(),
        });
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    fn rejected(detail: &str) -> ServiceError {
        ServiceError::Rejected {
            status: 500,
            detail: detail.to_string(),
        }
    }

    fn comparison(&self) -> TaxComparison {
        let draft = self.server_draft();
        let gross = draft
            .income_data
            .as_ref()
            .map(|i| i.gross_total())
            .unwrap_or_default();
        let recommended = self.recommended.lock().unwrap().unwrap_or(Regime::New);
        let old_tax = dec!(117000);
        let new_tax = dec!(71500);
        TaxComparison {
            old_regime: regime_result(gross, dec!(225000), old_tax, draft.tds_paid),
            new_regime: regime_result(gross, dec!(75000), new_tax, draft.tds_paid),
            recommended,
            savings: old_tax - new_tax,
        }
    }
}

pub fn regime_result(
    gross: Decimal,
    deductions: Decimal,
    total_tax: Decimal,
    tds: Decimal,
) -> RegimeResult {
    RegimeResult {
        gross_total_income: gross,
        total_deductions: deductions,
        taxable_income: (gross - deductions).max(Decimal::ZERO),
        tax_on_income: total_tax,
        surcharge: Decimal::ZERO,
        cess: Decimal::ZERO,
        total_tax,
        tds_paid: tds,
        refund_or_due: tds - total_tax,
    }
}

pub fn suggestion(
    title: &str,
    priority: Priority,
) -> SuggestionEntry {
    SuggestionEntry {
        category: "deduction".to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        potential_saving: dec!(15600),
        priority,
    }
}

#[async_trait]
impl FilingService for ScriptedService {
    async fn create(
        &self,
        classification: &Classification,
    ) -> Result<FilingDraft, ServiceError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Self::rejected("cannot create filing"));
        }
        let draft = FilingDraft {
            id: FilingId::new("filing-1"),
            financial_year: classification.financial_year.clone(),
            assessment_year: classification.assessment_year.clone(),
            itr_type: classification.itr_type,
            regime: classification.regime,
            status: FilingStatus::Draft,
            personal_info: None,
            income_data: None,
            deduction_data: None,
            tds_paid: Decimal::ZERO,
            tax_computation: None,
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        *self.draft.lock().unwrap() = Some(draft.clone());
        Ok(draft)
    }

    async fn get(
        &self,
        id: &FilingId,
    ) -> Result<FilingDraft, ServiceError> {
        self.draft
            .lock()
            .unwrap()
            .clone()
            .filter(|d| &d.id == id)
            .ok_or(ServiceError::NotFound)
    }

    async fn update(
        &self,
        id: &FilingId,
        update: &FilingUpdate,
    ) -> Result<FilingDraft, ServiceError> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let regime_only = update.regime.is_some()
            && FilingUpdate {
                regime: None,
                ..update.clone()
            }
            .is_empty();
        if self.fail_updates.load(Ordering::SeqCst)
            || (regime_only && self.fail_regime_updates.load(Ordering::SeqCst))
        {
            return Err(Self::rejected("update refused"));
        }

        let mut guard = self.draft.lock().unwrap();
        let draft = guard
            .as_mut()
            .filter(|d| &d.id == id)
            .ok_or(ServiceError::NotFound)?;
        update.apply_to(draft);
        // The backend overwrites status with whatever it is sent.
        if let Some(status) = update.status {
            draft.status = status;
        }
        draft.updated_at = Some(Utc::now());
        self.updates.lock().unwrap().push(update.clone());
        Ok(draft.clone())
    }

    async fn compute(
        &self,
        id: &FilingId,
    ) -> Result<TaxComparison, ServiceError> {
        if self.fail_compute.load(Ordering::SeqCst) {
            return Err(Self::rejected("tax engine unavailable"));
        }
        self.get(id).await?;
        let comparison = self.comparison();
        if let Some(draft) = self.draft.lock().unwrap().as_mut() {
            draft.tax_computation = Some(comparison.clone());
            draft.status = FilingStatus::Calculated;
        }
        Ok(comparison)
    }

    async fn suggestions(
        &self,
        id: &FilingId,
    ) -> Result<Vec<SuggestionEntry>, ServiceError> {
        if self.fail_suggestions.load(Ordering::SeqCst) {
            return Err(Self::rejected("suggestions unavailable"));
        }
        self.get(id).await?;
        Ok(self.suggestions.lock().unwrap().clone())
    }
}
