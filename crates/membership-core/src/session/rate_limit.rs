use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Minimum time between accepted submissions, in milliseconds.
pub const DEFAULT_COOLDOWN_MS: u64 = 30_000;

/// Submission state shared by every form of one page session.
///
/// Holds the time of the last accepted submission, starting at the Unix
/// epoch so the first attempt is never limited. Only an accepted submission
/// moves it forward; rejected or failed attempts leave it untouched.
///
/// A send in flight holds a `Reservation` for its attempt time, which every
/// other form of the session sees as if it had already been accepted.
#[derive(Debug)]
pub struct SubmissionSession {
    state: Mutex<SessionState>,
    cooldown: Duration,
}

#[derive(Debug)]
struct SessionState {
    last_submission: DateTime<Utc>,
    pending: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Time the cooldown is measured from
    fn limited_since(&self) -> DateTime<Utc> {
        self.pending.unwrap_or(self.last_submission)
    }
}

impl Default for SubmissionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionSession {
    pub fn new() -> Self {
        Self::with_cooldown(std::time::Duration::from_millis(DEFAULT_COOLDOWN_MS))
    }

    pub fn with_cooldown(cooldown: std::time::Duration) -> Self {
        Self {
            state: Mutex::new(SessionState {
                last_submission: DateTime::<Utc>::UNIX_EPOCH,
                pending: None,
            }),
            cooldown: Duration::from_std(cooldown).unwrap_or(Duration::MAX),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn last_submission_time(&self) -> DateTime<Utc> {
        self.lock().last_submission
    }

    /// Whether a send is currently holding a reservation
    pub fn has_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    /// Time left before another submission is allowed at `now`, if any
    pub fn remaining_cooldown(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let since = self.lock().limited_since();
        self.remaining_since(since, now)
    }

    pub fn is_cooling_down(&self, now: DateTime<Utc>) -> bool {
        self.remaining_cooldown(now).is_some()
    }

    /// Claim the submission slot for an attempt made at `now`.
    ///
    /// The check and the claim happen under one lock, so of two forms
    /// attempting at once only one gets the slot. Fails with the time left
    /// when the session is cooling down or another send holds a reservation
    /// made within the cooldown.
    pub fn try_begin(&self, now: DateTime<Utc>) -> Result<Reservation<'_>, std::time::Duration> {
        let mut state = self.lock();
        if let Some(remaining) = self.remaining_since(state.limited_since(), now) {
            return Err(remaining);
        }
        state.pending = Some(now);
        debug!(at = %now, "Submission slot reserved");
        Ok(Reservation {
            session: self,
            at: now,
            committed: false,
        })
    }

    /// Record an accepted submission made at `at`
    pub fn record(&self, at: DateTime<Utc>) {
        self.lock().last_submission = at;
    }

    fn remaining_since(
        &self,
        since: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<std::time::Duration> {
        let elapsed = now - since;
        if elapsed >= self.cooldown {
            return None;
        }
        // A clock that went backwards never waits longer than one cooldown
        let remaining = (self.cooldown - elapsed).min(self.cooldown);
        debug!(remaining_ms = remaining.num_milliseconds(), "Submission still cooling down");
        Some(remaining.to_std().unwrap_or_default())
    }

    fn finish(&self, at: DateTime<Utc>, accepted: bool) {
        let mut state = self.lock();
        // A later reservation may have replaced this one; leave it in place
        if state.pending == Some(at) {
            state.pending = None;
        }
        if accepted {
            state.last_submission = at;
        } else {
            debug!(at = %at, "Submission slot released");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Claim on a session's submission slot, held while a send is in flight.
///
/// `commit` records the attempt as accepted. Dropping the reservation
/// without committing (a failed send, or a cancelled one) releases the slot.
#[must_use = "dropping a reservation releases the submission slot"]
#[derive(Debug)]
pub struct Reservation<'a> {
    session: &'a SubmissionSession,
    at: DateTime<Utc>,
    committed: bool,
}

impl Reservation<'_> {
    /// Attempt time the reservation was made for
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn commit(mut self) {
        self.committed = true;
        self.session.finish(self.at, true);
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.session.finish(self.at, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn test_fresh_session_allows_first_submission() {
        let session = SubmissionSession::new();
        assert_eq!(session.last_submission_time(), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(session.remaining_cooldown(at(0)), None);
    }

    #[test]
    fn test_cooldown_after_record() {
        let session = SubmissionSession::new();
        session.record(at(0));

        assert_eq!(
            session.remaining_cooldown(at(10)),
            Some(std::time::Duration::from_secs(20))
        );
        assert!(session.is_cooling_down(at(29)));
        assert!(!session.is_cooling_down(at(30)));
        assert!(!session.is_cooling_down(at(120)));
    }

    #[test]
    fn test_clock_going_backwards_waits_one_cooldown() {
        let session = SubmissionSession::new();
        session.record(at(100));
        assert_eq!(
            session.remaining_cooldown(at(0)),
            Some(std::time::Duration::from_secs(30))
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = SubmissionSession::new();
        let b = SubmissionSession::new();
        a.record(at(0));
        assert!(a.is_cooling_down(at(5)));
        assert!(!b.is_cooling_down(at(5)));
    }

    #[test]
    fn test_custom_cooldown() {
        let session = SubmissionSession::with_cooldown(std::time::Duration::from_secs(5));
        session.record(at(0));
        assert!(session.is_cooling_down(at(4)));
        assert!(!session.is_cooling_down(at(5)));
        assert_eq!(session.cooldown(), Duration::seconds(5));
    }

    #[test]
    fn test_reservation_blocks_other_attempts_until_released() {
        let session = SubmissionSession::new();
        let reservation = session.try_begin(at(0)).expect("slot free");
        assert!(session.has_pending());

        // A second form attempting during the send is limited by the pending attempt
        assert_eq!(
            session.try_begin(at(1)).expect_err("slot taken"),
            std::time::Duration::from_secs(29)
        );
        assert!(session.is_cooling_down(at(1)));

        drop(reservation);
        assert!(!session.has_pending());
        assert_eq!(session.last_submission_time(), DateTime::<Utc>::UNIX_EPOCH);
        assert!(session.try_begin(at(2)).is_ok());
    }

    #[test]
    fn test_committed_reservation_records_attempt_time() {
        let session = SubmissionSession::new();
        let reservation = session.try_begin(at(0)).expect("slot free");
        assert_eq!(reservation.at(), at(0));
        reservation.commit();

        assert!(!session.has_pending());
        assert_eq!(session.last_submission_time(), at(0));
        assert_eq!(
            session.try_begin(at(10)).expect_err("cooling down"),
            std::time::Duration::from_secs(20)
        );
        assert!(session.try_begin(at(30)).is_ok());
    }

    #[test]
    fn test_stale_release_keeps_newer_reservation() {
        let session = SubmissionSession::new();
        let slow = session.try_begin(at(0)).expect("slot free");
        let newer = session.try_begin(at(40)).expect("cooldown passed");

        drop(slow);
        assert!(session.has_pending());
        assert!(session.try_begin(at(41)).is_err());

        newer.commit();
        assert_eq!(session.last_submission_time(), at(40));
    }
}
