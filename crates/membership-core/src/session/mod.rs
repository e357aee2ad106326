//! Per-session submission state.
//!
//! This module provides:
//! - `SubmissionSession`: the time of the last accepted submission and the
//!   cooldown enforced between accepted submissions (30 seconds by default)
//! - `Clock`: the source of "now", swappable for a `ManualClock` in tests
//! - `generate_csrf_token`: the token each form instance carries
//!
//! Nothing here is persisted; a session lives as long as the page does.

pub mod clock;
pub mod csrf;
pub mod rate_limit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use csrf::{generate_csrf_token, is_csrf_token};
pub use rate_limit::{Reservation, SubmissionSession, DEFAULT_COOLDOWN_MS};
