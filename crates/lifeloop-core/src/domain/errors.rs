//! Reminder errors.
//!
//! None of these abort the save of the record that triggered a
//! reconciliation. The engine collects them into its report as warnings.

use thiserror::Error;

use super::ids::DeliveryId;
use crate::ports::{DeliveryError, SourceError};

/// Warning raised while converging reminders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    /// A reminder was due to be armed but notifications are not permitted.
    #[error("notifications are not authorized; reminder {0} left unscheduled")]
    AuthorizationDenied(DeliveryId),

    /// The delivery adapter refused a schedule or cancel call. Not retried;
    /// the next reconciliation of the subject tries again.
    #[error("delivery adapter failed for {id}: {source}")]
    Delivery {
        id: DeliveryId,
        #[source]
        source: DeliveryError,
    },

    /// Slot status could not be read from the store.
    #[error("could not read slot status: {0}")]
    Source(#[from] SourceError),
}
