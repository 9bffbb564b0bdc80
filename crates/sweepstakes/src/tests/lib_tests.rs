use std::sync::Arc;

use tokio::sync::Mutex;

use super::*;

struct RecordingNotifier {
    configured: Arc<Mutex<Vec<SweepstakesConfig>>>,
}

impl RecordingNotifier {
    fn new() -> (Self, Arc<Mutex<Vec<SweepstakesConfig>>>) {
        let configured = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                configured: Arc::clone(&configured),
            },
            configured,
        )
    }
}

#[async_trait]
impl ConfirmationNotifier for RecordingNotifier {
    async fn sweepstakes_configured(&self, config: &SweepstakesConfig) {
        self.configured.lock().await.push(config.clone());
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn starts_closed_on_form_with_empty_data() {
    let wizard = ConfigWizard::new(LogNotifier);
    assert!(!wizard.is_modal_open());
    assert_eq!(wizard.step(), WizardStep::Form);
    assert_eq!(*wizard.data(), SweepstakesConfig::default());
}

#[test]
fn next_and_back_clamp_at_the_ends() {
    let mut wizard = ConfigWizard::new(LogNotifier);

    wizard.back();
    assert_eq!(wizard.step(), WizardStep::Form);

    wizard.next();
    assert_eq!(wizard.step(), WizardStep::Review);

    wizard.next();
    assert_eq!(wizard.step(), WizardStep::Review);

    wizard.back();
    assert_eq!(wizard.step(), WizardStep::Form);
}

#[test]
fn update_merges_additively() {
    // Scenario: price entered first, a prize share added later.
    let mut wizard = ConfigWizard::new(LogNotifier);
    wizard.update(SweepstakesConfig {
        ticket_price: Some(5.0),
        ..SweepstakesConfig::default()
    });
    wizard.update(SweepstakesConfig {
        main_prize: Some(50.0),
        ..SweepstakesConfig::default()
    });

    assert_eq!(wizard.data().ticket_price, Some(5.0));
    assert_eq!(wizard.data().main_prize, Some(50.0));
}

#[test]
fn update_overwrites_only_given_fields() {
    let mut wizard = ConfigWizard::new(LogNotifier);
    wizard.update(SweepstakesConfig {
        start_date: Some(date(2025, 4, 1)),
        end_date: Some(date(2025, 4, 30)),
        ..SweepstakesConfig::default()
    });
    wizard.update(SweepstakesConfig {
        end_date: Some(date(2025, 5, 15)),
        ..SweepstakesConfig::default()
    });

    assert_eq!(wizard.data().start_date, Some(date(2025, 4, 1)));
    assert_eq!(wizard.data().end_date, Some(date(2025, 5, 15)));
}

#[test]
fn close_resets_step_but_keeps_data() {
    let mut wizard = ConfigWizard::new(LogNotifier);
    wizard.open();
    wizard.update(SweepstakesConfig {
        ticket_price: Some(2.5),
        ..SweepstakesConfig::default()
    });
    wizard.next();

    wizard.close();
    assert!(!wizard.is_modal_open());
    assert_eq!(wizard.step(), WizardStep::Form);
    assert_eq!(wizard.data().ticket_price, Some(2.5));
}

#[test]
fn reopen_resumes_prior_data() {
    let mut wizard = ConfigWizard::new(LogNotifier);
    wizard.open();
    wizard.update(SweepstakesConfig {
        protocol_fee: Some(5.0),
        ..SweepstakesConfig::default()
    });
    wizard.close();

    wizard.open();
    assert!(wizard.is_modal_open());
    assert_eq!(wizard.step(), WizardStep::Form);
    assert_eq!(wizard.data().protocol_fee, Some(5.0));
}

#[tokio::test]
async fn confirm_notifies_once_then_closes() {
    let (notifier, configured) = RecordingNotifier::new();
    let mut wizard = ConfigWizard::new(notifier);

    wizard.open();
    wizard.update(SweepstakesConfig {
        ticket_price: Some(5.0),
        main_prize: Some(50.0),
        ..SweepstakesConfig::default()
    });
    wizard.next();
    wizard.confirm().await;

    let configured = configured.lock().await;
    assert_eq!(configured.len(), 1);
    assert_eq!(configured[0].ticket_price, Some(5.0));
    assert!(!wizard.is_modal_open());
    assert_eq!(wizard.step(), WizardStep::Form);
}

#[tokio::test]
async fn confirm_does_not_validate_incomplete_data() {
    // Validation is the form layer's job; an empty config still confirms.
    let (notifier, configured) = RecordingNotifier::new();
    let mut wizard = ConfigWizard::new(notifier);

    wizard.open();
    wizard.next();
    wizard.confirm().await;

    assert_eq!(configured.lock().await.len(), 1);
    assert_eq!(configured.lock().await[0], SweepstakesConfig::default());
}
