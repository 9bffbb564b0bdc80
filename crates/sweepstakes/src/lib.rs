use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Position in the two-step configuration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Form,
    Review,
}

impl WizardStep {
    /// 1-based step number, for step trackers.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::Form => 1,
            WizardStep::Review => 2,
        }
    }

    fn advanced(self) -> Self {
        // Forward clamp: Review is the last step.
        WizardStep::Review
    }

    fn retreated(self) -> Self {
        // Backward clamp: Form is the first step.
        WizardStep::Form
    }
}

/// Accumulated sweepstakes configuration. Every field starts unset; edits
/// merge field-wise via [`SweepstakesConfig::merge`], so a partial update
/// never wipes values entered on another visit to the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepstakesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_price: Option<f64>,
    /// Prize pool shares and protocol fee, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_prize: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_prize: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_fee: Option<f64>,
}

impl SweepstakesConfig {
    /// Additive merge: fields set in `patch` overwrite, unset fields are
    /// left untouched.
    pub fn merge(&mut self, patch: SweepstakesConfig) {
        if patch.start_date.is_some() {
            self.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if patch.draw_date.is_some() {
            self.draw_date = patch.draw_date;
        }
        if patch.ticket_price.is_some() {
            self.ticket_price = patch.ticket_price;
        }
        if patch.main_prize.is_some() {
            self.main_prize = patch.main_prize;
        }
        if patch.secondary_prize.is_some() {
            self.secondary_prize = patch.secondary_prize;
        }
        if patch.protocol_fee.is_some() {
            self.protocol_fee = patch.protocol_fee;
        }
    }
}

/// Confirmation side effect, injected by the caller (the site shows a
/// toast here). The wizard does not validate `config` before notifying;
/// field validation belongs to the form layer in front of it.
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    async fn sweepstakes_configured(&self, config: &SweepstakesConfig);
}

/// Default notifier: a structured log line.
pub struct LogNotifier;

#[async_trait]
impl ConfirmationNotifier for LogNotifier {
    async fn sweepstakes_configured(&self, config: &SweepstakesConfig) {
        info!(?config, "sweepstakes configured");
    }
}

/// Two-step configuration wizard with a modal lifecycle around it.
///
/// An explicitly owned state object: construct one, hand it to whatever
/// drives the modal. Closing the modal resets the step but keeps the
/// accumulated data, so a user can resume or review what they entered.
pub struct ConfigWizard<N: ConfirmationNotifier> {
    step: WizardStep,
    data: SweepstakesConfig,
    is_modal_open: bool,
    notifier: N,
}

impl<N: ConfirmationNotifier> ConfigWizard<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            step: WizardStep::Form,
            data: SweepstakesConfig::default(),
            is_modal_open: false,
            notifier,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn data(&self) -> &SweepstakesConfig {
        &self.data
    }

    pub fn is_modal_open(&self) -> bool {
        self.is_modal_open
    }

    /// Opens the modal. Step and data are untouched, so a prior session
    /// resumes where it left off.
    pub fn open(&mut self) {
        self.is_modal_open = true;
    }

    /// Closes the modal and rewinds to the form step. Data is kept.
    pub fn close(&mut self) {
        self.is_modal_open = false;
        self.step = WizardStep::Form;
    }

    pub fn next(&mut self) {
        self.step = self.step.advanced();
        debug!(step = self.step.number(), "wizard advanced");
    }

    pub fn back(&mut self) {
        self.step = self.step.retreated();
        debug!(step = self.step.number(), "wizard went back");
    }

    pub fn update(&mut self, patch: SweepstakesConfig) {
        self.data.merge(patch);
    }

    /// Terminal action of the review step: fires the confirmation
    /// notification once, then closes the modal.
    pub async fn confirm(&mut self) {
        self.notifier.sweepstakes_configured(&self.data).await;
        self.close();
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
