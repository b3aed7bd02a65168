//! Subject lifecycle events observed from the persistence layer.

use serde::{Deserialize, Serialize};

use super::ids::SubjectKey;
use super::subject::ReminderSubject;

/// A create/update or delete of a reminder subject.
///
/// Creates and updates carry the full record; deletes carry only the key,
/// since the record no longer exists.
/// A slot record's key names its calendar day, so deleting another day's
/// record can be told apart from deleting today's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SubjectEvent {
    Upserted { subject: ReminderSubject },
    Deleted { key: SubjectKey },
}

impl SubjectEvent {
    pub fn upserted(subject: impl Into<ReminderSubject>) -> Self {
        SubjectEvent::Upserted {
            subject: subject.into(),
        }
    }

    pub fn deleted(key: SubjectKey) -> Self {
        SubjectEvent::Deleted { key }
    }

    pub fn key(&self) -> SubjectKey {
        match self {
            SubjectEvent::Upserted { subject } => subject.key(),
            SubjectEvent::Deleted { key } => *key,
        }
    }
}
