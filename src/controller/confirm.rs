//! Two-step delete: a record is first marked as pending and only a matching
//! confirmation releases it to the destructive call.

use serde::{Deserialize, Serialize};

/// Session key of the pending deletion.
pub const PENDING_DELETE_KEY: &str = "pending_delete";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelete {
    /// Resource collection, e.g. `leads` or `users`.
    pub resource: String,
    pub id: String,
    /// Human readable name shown in the confirmation dialog.
    pub label: String,
}

/// Answer submitted from the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pending: Option<PendingDelete>,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the confirmation from the stored candidate, if any.
    pub fn from_pending(pending: Option<PendingDelete>) -> Self {
        Self { pending }
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    pub fn into_pending(self) -> Option<PendingDelete> {
        self.pending
    }

    /// Marks a record for deletion, replacing any earlier candidate.
    pub fn request(
        &mut self,
        resource: impl Into<String>,
        id: impl Into<String>,
        label: impl Into<String>,
    ) -> &PendingDelete {
        self.pending.insert(PendingDelete {
            resource: resource.into(),
            id: id.into(),
            label: label.into(),
        })
    }

    /// Drops the candidate without deleting anything.
    pub fn cancel(&mut self) -> Option<PendingDelete> {
        self.pending.take()
    }

    /// Releases the candidate when it matches `resource` and `id`. Any
    /// mismatch discards the candidate.
    pub fn confirm(&mut self, resource: &str, id: &str) -> Option<PendingDelete> {
        self.pending
            .take()
            .filter(|pending| pending.resource == resource && pending.id == id)
    }

    /// Applies the dialog answer.
    pub fn decide(&mut self, decision: Decision, resource: &str, id: &str) -> Option<PendingDelete> {
        match decision {
            Decision::Confirm => self.confirm(resource, id),
            Decision::Cancel => {
                self.cancel();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_releases_matching_candidate_once() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.request("leads", "l1", "Asha");

        let released = confirmation.confirm("leads", "l1");

        assert_eq!(released.map(|p| p.id), Some("l1".to_string()));
        assert!(confirmation.confirm("leads", "l1").is_none());
    }

    #[test]
    fn mismatched_id_discards_candidate() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.request("leads", "l1", "Asha");

        assert!(confirmation.confirm("leads", "l2").is_none());
        assert!(confirmation.pending().is_none());
    }

    #[test]
    fn resource_must_match() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.request("users", "1", "Ravi");
        assert!(confirmation.confirm("leads", "1").is_none());
    }

    #[test]
    fn cancel_decision_never_releases() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.request("users", "u1", "Ravi");

        assert!(confirmation.decide(Decision::Cancel, "users", "u1").is_none());
        assert!(confirmation.pending().is_none());
    }

    #[test]
    fn new_request_replaces_previous() {
        let mut confirmation = DeleteConfirmation::new();
        confirmation.request("users", "u1", "Ravi");
        confirmation.request("users", "u2", "Mira");
        assert_eq!(confirmation.pending().map(|p| p.id.as_str()), Some("u2"));
    }
}
