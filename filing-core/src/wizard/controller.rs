use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SubFlow, WizardError, WizardStep};
use crate::collect::{self, StagedInput};
use crate::models::{
    Classification, FilingDraft, FilingStatus, FilingUpdate, Regime, ReviewSummary,
    SuggestionEntry, TaxComparison,
};
use crate::service::{FilingService, ServiceError};

/// The controller's position and the draft it is editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: WizardStep,
    pub draft: FilingDraft,
}

/// Progress of an arrival-triggered remote call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubFlowState<T> {
    #[default]
    Idle,
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> SubFlowState<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SubFlowState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SubFlowState::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SubFlowState::Failed(_))
    }
}

/// Outcome of a successful [`WizardController::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advanced {
    pub step: WizardStep,
    /// Work the caller should now drive on the new step.
    pub sub_flow: Option<SubFlow>,
}

struct RegimeSync {
    regime: Regime,
    handle: JoinHandle<Result<FilingDraft, ServiceError>>,
}

/// Drives one filing draft through the wizard.
///
/// A controller only exists once the service has created its draft, so
/// every step operates on a real filing. Commands take `&mut self`; wrap the
/// controller in a [`SharedWizard`](super::SharedWizard) when events arrive
/// from more than one task.
pub struct WizardController {
    service: Arc<dyn FilingService>,
    state: WizardState,
    staged: StagedInput,
    computation: SubFlowState<TaxComparison>,
    suggestions: SubFlowState<Vec<SuggestionEntry>>,
    regime_sync: Option<RegimeSync>,
    soft_errors: Vec<WizardError>,
    submitted: bool,
}

impl WizardController {
    /// Creates the filing draft and positions the wizard on its first step.
    pub async fn initialize(
        service: Arc<dyn FilingService>,
        classification: &Classification,
    ) -> Result<Self, WizardError> {
        debug!(
            financial_year = %classification.financial_year,
            regime = classification.regime.as_str(),
            "creating filing draft"
        );
        let draft = service
            .create(classification)
            .await
            .map_err(|source| WizardError::Initialization { source })?;
        info!(filing = %draft.id, "filing draft created");

        Ok(Self {
            service,
            state: WizardState {
                step: WizardStep::PersonalDetails,
                draft,
            },
            staged: StagedInput::new(),
            computation: SubFlowState::Idle,
            suggestions: SubFlowState::Idle,
            regime_sync: None,
            soft_errors: Vec::new(),
            submitted: false,
        })
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> WizardStep {
        self.state.step
    }

    pub fn draft(&self) -> &FilingDraft {
        &self.state.draft
    }

    pub fn staged(&self) -> &StagedInput {
        &self.staged
    }

    /// Stages one field value for the current step.
    pub fn stage(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.staged.set(name, value);
    }

    pub fn computation(&self) -> &SubFlowState<TaxComparison> {
        &self.computation
    }

    pub fn suggestions(&self) -> &SubFlowState<Vec<SuggestionEntry>> {
        &self.suggestions
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Soft failures recorded so far, oldest first.
    pub fn soft_errors(&self) -> &[WizardError] {
        &self.soft_errors
    }

    pub fn take_soft_errors(&mut self) -> Vec<WizardError> {
        std::mem::take(&mut self.soft_errors)
    }

    /// Moves to the next step.
    ///
    /// Input steps collect the staged values and persist them first; the
    /// step only changes once the service confirms the update. Leaving Tax
    /// Calculation requires a stored computation.
    ///
    /// Entering Tax Calculation or Optimization only marks that sub-flow
    /// pending. When the returned [`Advanced::sub_flow`] is set the caller
    /// must await [`compute_tax`](Self::compute_tax) or
    /// [`fetch_suggestions`](Self::fetch_suggestions) to resolve it.
    pub async fn advance(&mut self) -> Result<Advanced, WizardError> {
        self.ensure_open()?;
        let from = self.state.step;
        let to = from.next().ok_or(WizardError::AtFinalStep)?;

        if from == WizardStep::TaxCalculation && self.computation.ready().is_none() {
            return Err(WizardError::ComputationUnresolved);
        }

        if let Some(update) = self.collect_update(from) {
            self.persist(from, update).await?;
        }

        self.enter(to);
        if let Some(flow) = to.sub_flow() {
            match flow {
                SubFlow::Computation => self.computation = SubFlowState::Pending,
                SubFlow::Suggestions => self.suggestions = SubFlowState::Pending,
            }
        }
        info!(filing = %self.state.draft.id, from = %from, to = %to, "wizard advanced");

        Ok(Advanced {
            step: to,
            sub_flow: to.sub_flow(),
        })
    }

    /// Moves back one step without persisting anything.
    ///
    /// The confirmed values of the step being re-entered are staged again so
    /// advancing without edits resends the same data.
    pub fn retreat(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_open()?;
        let from = self.state.step;
        let to = from.previous().ok_or(WizardError::AtFirstStep)?;

        self.enter(to);
        info!(filing = %self.state.draft.id, from = %from, to = %to, "wizard retreated");
        Ok(to)
    }

    /// Requests the regime comparison for the draft.
    ///
    /// On success the comparison is stored, the draft adopts the recommended
    /// regime, and the regime is saved in the background. A failed save is
    /// recorded in [`soft_errors`](Self::soft_errors) once it settles.
    pub async fn compute_tax(&mut self) -> Result<TaxComparison, WizardError> {
        self.ensure_open()?;
        self.expect_step(WizardStep::TaxCalculation, "tax computation")?;

        self.computation = SubFlowState::Pending;
        debug!(filing = %self.state.draft.id, "requesting tax computation");
        let comparison = match self.service.compute(&self.state.draft.id).await {
            Ok(comparison) => comparison,
            Err(source) => {
                warn!(filing = %self.state.draft.id, "tax computation failed: {}", source);
                self.computation = SubFlowState::Failed(source.to_string());
                return Err(WizardError::Computation { source });
            }
        };

        let recommended = comparison.recommended;
        info!(
            filing = %self.state.draft.id,
            recommended = recommended.as_str(),
            savings = %comparison.savings,
            "tax computation stored"
        );
        self.state.draft.tax_computation = Some(comparison.clone());
        self.state.draft.regime = recommended;
        self.computation = SubFlowState::Ready(comparison.clone());

        self.settle_background().await;
        self.spawn_regime_sync(recommended);

        Ok(comparison)
    }

    /// Runs the computation again after a failure.
    pub async fn retry_computation(&mut self) -> Result<TaxComparison, WizardError> {
        self.ensure_open()?;
        self.expect_step(WizardStep::TaxCalculation, "tax computation")?;
        if let SubFlowState::Ready(comparison) = &self.computation {
            return Ok(comparison.clone());
        }
        self.compute_tax().await
    }

    /// Loads optimization suggestions in the order the service returns them.
    pub async fn fetch_suggestions(&mut self) -> Result<Vec<SuggestionEntry>, WizardError> {
        self.ensure_open()?;
        self.expect_step(WizardStep::Optimization, "suggestions")?;

        self.suggestions = SubFlowState::Pending;
        debug!(filing = %self.state.draft.id, "requesting suggestions");
        match self.service.suggestions(&self.state.draft.id).await {
            Ok(entries) => {
                debug!(filing = %self.state.draft.id, count = entries.len(), "suggestions loaded");
                self.suggestions = SubFlowState::Ready(entries.clone());
                Ok(entries)
            }
            Err(source) => {
                warn!(filing = %self.state.draft.id, "suggestions unavailable: {}", source);
                self.suggestions = SubFlowState::Failed(source.to_string());
                Err(WizardError::Suggestion { source })
            }
        }
    }

    /// Marks the filing submitted. Safe to repeat after a failure.
    pub async fn submit(&mut self) -> Result<&FilingDraft, WizardError> {
        self.ensure_open()?;
        if self.state.step != WizardStep::ReviewSubmit {
            return Err(WizardError::NotAtReview(self.state.step));
        }

        self.settle_background().await;
        let update = FilingUpdate::status(FilingStatus::Submitted);
        debug!(filing = %self.state.draft.id, "submitting filing");
        let confirmed = self
            .service
            .update(&self.state.draft.id, &update)
            .await
            .map_err(|source| WizardError::Submission { source })?;

        update.apply_to(&mut self.state.draft);
        self.reconcile(&confirmed);
        self.submitted = true;
        info!(filing = %self.state.draft.id, "filing submitted");
        Ok(&self.state.draft)
    }

    pub fn review_summary(&self) -> ReviewSummary {
        ReviewSummary::from_draft(&self.state.draft)
    }

    /// Waits for the background regime save, if one is outstanding.
    pub async fn settle_background(&mut self) {
        let Some(sync) = self.regime_sync.take() else {
            return;
        };
        let outcome = sync.handle.await.unwrap_or_else(|e| {
            Err(ServiceError::Transport(format!("regime sync task ended: {e}")))
        });
        match outcome {
            Ok(_) => {
                debug!(filing = %self.state.draft.id, regime = sync.regime.as_str(), "regime saved")
            }
            Err(source) => {
                warn!(
                    filing = %self.state.draft.id,
                    regime = sync.regime.as_str(),
                    "could not save recommended regime: {}",
                    source
                );
                self.soft_errors.push(WizardError::RegimeSync {
                    regime: sync.regime,
                    source,
                });
            }
        }
    }

    fn spawn_regime_sync(
        &mut self,
        regime: Regime,
    ) {
        let service = Arc::clone(&self.service);
        let id = self.state.draft.id.clone();
        debug!(filing = %id, regime = regime.as_str(), "saving recommended regime");
        let handle =
            tokio::spawn(async move { service.update(&id, &FilingUpdate::regime(regime)).await });
        self.regime_sync = Some(RegimeSync { regime, handle });
    }

    fn collect_update(
        &self,
        step: WizardStep,
    ) -> Option<FilingUpdate> {
        match step {
            WizardStep::PersonalDetails => {
                let info = collect::collect_personal_info(&self.staged);
                // Only the first completion moves the filing out of Draft.
                Some(if self.state.draft.status == FilingStatus::Draft {
                    FilingUpdate::personal(info, FilingStatus::InProgress)
                } else {
                    FilingUpdate {
                        personal_info: Some(info),
                        ..FilingUpdate::default()
                    }
                })
            }
            WizardStep::IncomeSources => Some(FilingUpdate::income(collect::collect_income_data(
                &self.staged,
            ))),
            WizardStep::Deductions => {
                let payload = collect::collect_deductions(&self.staged);
                Some(FilingUpdate::deductions(
                    payload.deduction_data,
                    payload.tds_paid,
                ))
            }
            WizardStep::TaxCalculation
            | WizardStep::Optimization
            | WizardStep::ReviewSubmit => None,
        }
    }

    async fn persist(
        &mut self,
        step: WizardStep,
        update: FilingUpdate,
    ) -> Result<(), WizardError> {
        self.settle_background().await;
        debug!(filing = %self.state.draft.id, step = %step, "persisting step data");
        let confirmed = self
            .service
            .update(&self.state.draft.id, &update)
            .await
            .map_err(|source| {
                warn!(filing = %self.state.draft.id, step = %step, "step not saved: {}", source);
                WizardError::Persistence { step, source }
            })?;

        update.apply_to(&mut self.state.draft);
        self.reconcile(&confirmed);
        Ok(())
    }

    /// Adopts the server's timestamp, and its status when that is not a step
    /// backwards from the local one.
    fn reconcile(
        &mut self,
        confirmed: &FilingDraft,
    ) {
        let draft = &mut self.state.draft;
        if draft.status.can_transition_to(confirmed.status) {
            draft.status = confirmed.status;
        }
        draft.updated_at = confirmed.updated_at;
    }

    fn enter(
        &mut self,
        step: WizardStep,
    ) {
        self.state.step = step;
        self.staged.clear();
        self.staged.prefill_from(step, &self.state.draft);
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        if self.submitted {
            Err(WizardError::AlreadySubmitted)
        } else {
            Ok(())
        }
    }

    fn expect_step(
        &self,
        expected: WizardStep,
        operation: &'static str,
    ) -> Result<(), WizardError> {
        if self.state.step == expected {
            Ok(())
        } else {
            Err(WizardError::WrongStep {
                operation,
                expected,
                actual: self.state.step,
            })
        }
    }
}
