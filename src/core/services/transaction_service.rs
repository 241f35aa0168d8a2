//! Validated CRUD helpers on top of [`LedgerManager`].

use crate::core::ledger_manager::{LedgerManager, MutationReport};
use crate::ledger::{Transaction, TransactionDraft, TransactionPatch};

use super::{ServiceError, ServiceResult};

/// Entry-form rules in front of the ledger: drafts and patches are checked
/// before the manager sees them, and unknown ids become errors.
pub struct TransactionService;

impl TransactionService {
    /// Validates `draft` and records it.
    pub fn add(
        manager: &mut LedgerManager,
        draft: TransactionDraft,
    ) -> ServiceResult<MutationReport<Transaction>> {
        let draft = Self::normalized(draft);
        draft.validate()?;
        Ok(manager.add_transaction(draft))
    }

    /// Applies `patch` to the transaction `id` if the merged record still
    /// passes validation.
    pub fn update(
        manager: &mut LedgerManager,
        id: &str,
        patch: &TransactionPatch,
    ) -> ServiceResult<MutationReport<Transaction>> {
        if patch.is_empty() {
            return Err(ServiceError::Invalid("Nothing to update".into()));
        }
        let mut candidate = manager
            .transaction(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        patch.apply(&mut candidate);
        TransactionDraft::from(candidate).validate()?;

        let report = manager.update_transaction(id, patch);
        Self::require(id, report)
    }

    /// Removes the transaction `id`, returning the removed record.
    pub fn remove(
        manager: &mut LedgerManager,
        id: &str,
    ) -> ServiceResult<MutationReport<Transaction>> {
        if manager.transaction(id).is_none() {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        let report = manager.delete_transaction(id);
        Self::require(id, report)
    }

    fn normalized(mut draft: TransactionDraft) -> TransactionDraft {
        draft.category = draft.category.trim().to_string();
        draft.description = draft.description.trim().to_string();
        draft
    }

    fn require(
        id: &str,
        report: MutationReport<Option<Transaction>>,
    ) -> ServiceResult<MutationReport<Transaction>> {
        let MutationReport { value, persisted } = report;
        let value = value.ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        Ok(MutationReport { value, persisted })
    }
}
