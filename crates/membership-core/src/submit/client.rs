use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ApplicationForm;

use super::SubmitError;

/// Receipt for an application the recipient accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub recipient: String,
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

/// Receives sanitized applications once they pass validation.
///
/// Called at most once per accepted submission attempt.
pub trait Submitter: Send + Sync {
    fn submit(
        &self,
        application: &ApplicationForm,
    ) -> impl Future<Output = Result<Ack, SubmitError>> + Send;
}

impl<T: Submitter> Submitter for Arc<T> {
    fn submit(
        &self,
        application: &ApplicationForm,
    ) -> impl Future<Output = Result<Ack, SubmitError>> + Send {
        (**self).submit(application)
    }
}
