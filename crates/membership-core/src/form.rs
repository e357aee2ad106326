//! Submission lifecycle for one membership form.
//!
//! A form moves `Idle → Validating → Submitting → Submitted`. Validation
//! failures drop it straight back to `Idle`; a failed send does too, without
//! counting as a submission. `Submitted` is final until `reset`, which is
//! what a page reload does.
//!
//! Two independent guards stop duplicate submissions: a form that is already
//! `Submitting` refuses new attempts (the disabled submit button), and the
//! shared `SubmissionSession` refuses any attempt within the cooldown of the
//! last accepted one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{fields, ApplicationForm};
use crate::session::{generate_csrf_token, Clock, SubmissionSession, SystemClock};
use crate::submit::{Ack, SubmitError, Submitter};
use crate::validation::{sanitize_form, validate_on, ValidationReport};

/// Label shown on the submit control while a submission is in flight
pub const SUBMITTING_LABEL: &str = "Submitting...";

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Validating,
    Submitting,
    Submitted,
}

impl FormState {
    /// Whether the submit control is enabled in this state
    pub fn accepts_input(&self) -> bool {
        matches!(self, FormState::Idle)
    }

    /// Whether the confirmation panel replaces the form
    pub fn shows_confirmation(&self) -> bool {
        matches!(self, FormState::Submitted)
    }
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("{0}")]
    Rejected(ValidationReport),

    #[error("Please wait before submitting another application.")]
    RateLimited { retry_after: Duration },

    #[error("A submission is already in progress.")]
    InProgress,

    #[error("This application has already been submitted.")]
    AlreadySubmitted,

    #[error("Submission failed: {0}")]
    Submit(#[from] SubmitError),
}

impl SubmissionError {
    /// Validation report, when the attempt failed validation
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            SubmissionError::Rejected(report) => Some(report),
            _ => None,
        }
    }
}

/// An accepted application.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The sanitized field set that was handed to the submitter
    pub application: ApplicationForm,
    pub ack: Ack,
}

/// One membership form, bound to its page session and a submitter.
pub struct MembershipForm<S, C = SystemClock> {
    session: Arc<SubmissionSession>,
    submitter: S,
    clock: C,
    state: Mutex<FormState>,
    csrf_token: Mutex<String>,
}

impl<S: Submitter> MembershipForm<S> {
    pub fn new(session: Arc<SubmissionSession>, submitter: S) -> Self {
        Self::with_clock(session, submitter, SystemClock)
    }
}

impl<S: Submitter, C: Clock> MembershipForm<S, C> {
    pub fn with_clock(session: Arc<SubmissionSession>, submitter: S, clock: C) -> Self {
        Self {
            session,
            submitter,
            clock,
            state: Mutex::new(FormState::Idle),
            csrf_token: Mutex::new(generate_csrf_token()),
        }
    }

    pub fn state(&self) -> FormState {
        *self.lock_state()
    }

    pub fn session(&self) -> &Arc<SubmissionSession> {
        &self.session
    }

    pub fn csrf_token(&self) -> String {
        self.csrf_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate without submitting, using the form's clock for the age check
    pub fn validate(&self, application: &ApplicationForm) -> ValidationReport {
        validate_on(application, self.clock.today())
    }

    /// Back to `Idle` with a fresh token. The session's cooldown still applies.
    pub fn reset(&self) {
        *self.lock_state() = FormState::Idle;
        *self
            .csrf_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = generate_csrf_token();
        debug!("Membership form reset");
    }

    /// Run one submission attempt.
    ///
    /// On success the sanitized application, with the form's CSRF token
    /// attached, has been handed to the submitter and the session records
    /// the attempt time. The session slot is reserved before the send
    /// starts, so other forms of the session are limited while it runs.
    pub async fn submit(&self, application: &ApplicationForm) -> Result<Submission, SubmissionError> {
        let attempted_at = self.clock.now();

        let (payload, reservation) = {
            let mut state = self.lock_state();

            if *state == FormState::Submitting {
                debug!("Submission already in progress");
                return Err(SubmissionError::InProgress);
            }

            if let Some(retry_after) = self.session.remaining_cooldown(attempted_at) {
                warn!(retry_after_ms = retry_after.as_millis() as u64, "Submission rate limited");
                return Err(SubmissionError::RateLimited { retry_after });
            }

            if *state == FormState::Submitted {
                return Err(SubmissionError::AlreadySubmitted);
            }

            *state = FormState::Validating;
            let report = validate_on(application, self.clock.today());
            if !report.is_ok() {
                *state = FormState::Idle;
                debug!(errors = report.errors().len(), focus = ?report.focus(), "Application rejected");
                return Err(SubmissionError::Rejected(report));
            }

            let reservation = match self.session.try_begin(attempted_at) {
                Ok(reservation) => reservation,
                Err(retry_after) => {
                    *state = FormState::Idle;
                    warn!(retry_after_ms = retry_after.as_millis() as u64, "Submission rate limited");
                    return Err(SubmissionError::RateLimited { retry_after });
                }
            };

            *state = FormState::Submitting;
            let mut payload = sanitize_form(application);
            payload.insert(fields::CSRF_TOKEN, self.csrf_token());
            (payload, reservation)
        };

        match self.submitter.submit(&payload).await {
            Ok(ack) => {
                reservation.commit();
                *self.lock_state() = FormState::Submitted;
                info!(reference = %ack.reference, "Membership application accepted");
                Ok(Submission {
                    application: payload,
                    ack,
                })
            }
            Err(e) => {
                drop(reservation);
                *self.lock_state() = FormState::Idle;
                warn!(error = %e, "Membership application could not be sent");
                Err(SubmissionError::Submit(e))
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
