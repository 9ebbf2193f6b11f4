use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::{Advanced, WizardController, WizardError, WizardStep};

/// A controller shared between the tasks that dispatch user events.
///
/// Navigation commands never queue: while one is outstanding, another
/// returns [`WizardError::Busy`] without touching the draft.
#[derive(Clone)]
pub struct SharedWizard {
    inner: Arc<Mutex<WizardController>>,
}

impl SharedWizard {
    pub fn new(controller: WizardController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn try_advance(&self) -> Result<Advanced, WizardError> {
        let mut controller = self.try_claim()?;
        controller.advance().await
    }

    pub fn try_retreat(&self) -> Result<WizardStep, WizardError> {
        let mut controller = self.try_claim()?;
        controller.retreat()
    }

    /// Waits for exclusive access, for commands other than navigation.
    pub async fn lock(&self) -> MutexGuard<'_, WizardController> {
        self.inner.lock().await
    }

    fn try_claim(&self) -> Result<MutexGuard<'_, WizardController>, WizardError> {
        self.inner.try_lock().map_err(|_| {
            debug!("navigation ignored while another command is in flight");
            WizardError::Busy
        })
    }
}
