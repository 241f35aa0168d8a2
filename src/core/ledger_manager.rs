use std::sync::Arc;

use crate::errors::BookError;
use crate::ledger::{
    default_categories, generate_transaction_id, Category, Transaction, TransactionDraft,
    TransactionPatch,
};
use crate::storage::{KeyValueStore, StoredValue, CATEGORIES_KEY, TRANSACTIONS_KEY};

/// Immutable view of the ledger at one point in time. Cloning is cheap and a
/// held snapshot is never changed by later mutations.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub transactions: Arc<Vec<Transaction>>,
    pub categories: Arc<Vec<Category>>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Outcome of a ledger mutation: the operation's value plus whether the new
/// list reached the store. The in-memory ledger is updated either way.
#[must_use]
#[derive(Debug)]
pub struct MutationReport<T> {
    pub value: T,
    pub persisted: Result<(), BookError>,
}

impl<T> MutationReport<T> {
    pub fn is_persisted(&self) -> bool {
        self.persisted.is_ok()
    }

    pub fn persist_error(&self) -> Option<&BookError> {
        self.persisted.as_ref().err()
    }

    pub fn into_result(self) -> Result<T, BookError> {
        self.persisted.map(|()| self.value)
    }
}

type Observer = Box<dyn FnMut(&Snapshot) + Send>;

/// Owns the transaction list and category catalog and is the only place the
/// list is mutated. Every mutation writes the full list through to the store.
pub struct LedgerManager {
    transactions: Arc<Vec<Transaction>>,
    categories: Arc<Vec<Category>>,
    transactions_entry: StoredValue<Vec<Transaction>>,
    categories_entry: StoredValue<Vec<Category>>,
    store: Arc<dyn KeyValueStore>,
    observers: Vec<Observer>,
}

impl LedgerManager {
    /// Reads both entries from `store`, seeding defaults for missing or
    /// unreadable ones.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let transactions_entry = StoredValue::new(Arc::clone(&store), TRANSACTIONS_KEY);
        let categories_entry = StoredValue::new(Arc::clone(&store), CATEGORIES_KEY);
        let mut manager = Self {
            transactions: Arc::default(),
            categories: Arc::default(),
            transactions_entry,
            categories_entry,
            store,
            observers: Vec::new(),
        };
        manager.read_entries();
        manager
    }

    /// Re-reads the store, e.g. after it was cleared outside the ledger.
    /// Observers receive the reloaded snapshot.
    pub fn reload(&mut self) {
        self.read_entries();
        self.notify();
    }

    fn read_entries(&mut self) {
        self.transactions = Arc::new(self.transactions_entry.load(Vec::new()));
        self.categories = Arc::new(self.categories_entry.load_or_else(default_categories));
        tracing::debug!(
            transactions = self.transactions.len(),
            categories = self.categories.len(),
            "ledger loaded"
        );
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            transactions: Arc::clone(&self.transactions),
            categories: Arc::clone(&self.categories),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Resolves a transaction category label against the catalog.
    pub fn category_for(&self, label: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.icon == label)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|category| category.matches_label(label))
            })
    }

    /// Registers a callback invoked with every new snapshot.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Assigns a fresh id and puts the record at the front of the list. The
    /// draft is stored as given.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> MutationReport<Transaction> {
        let id = self.unused_id();
        let txn = draft.into_transaction(id);
        Arc::make_mut(&mut self.transactions).insert(0, txn.clone());
        tracing::info!(id = %txn.id, kind = %txn.kind, amount = txn.amount, "transaction added");
        let persisted = self.commit();
        MutationReport {
            value: txn,
            persisted,
        }
    }

    /// Removes the matching record. An unknown id leaves the list as it was.
    pub fn delete_transaction(&mut self, id: &str) -> MutationReport<Option<Transaction>> {
        let position = self.position_of(id);
        let removed = position.map(|index| Arc::make_mut(&mut self.transactions).remove(index));
        match &removed {
            Some(_) => tracing::info!(id, "transaction deleted"),
            None => tracing::debug!(id, "delete ignored, no such transaction"),
        }
        let persisted = self.commit();
        MutationReport {
            value: removed,
            persisted,
        }
    }

    /// Merges `patch` into the matching record and returns the updated copy.
    /// An unknown id leaves the list as it was.
    pub fn update_transaction(
        &mut self,
        id: &str,
        patch: &TransactionPatch,
    ) -> MutationReport<Option<Transaction>> {
        let updated = self.position_of(id).map(|index| {
            let txn = &mut Arc::make_mut(&mut self.transactions)[index];
            patch.apply(txn);
            txn.clone()
        });
        match &updated {
            Some(_) => tracing::info!(id, "transaction updated"),
            None => tracing::debug!(id, "update ignored, no such transaction"),
        }
        let persisted = self.commit();
        MutationReport {
            value: updated,
            persisted,
        }
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    fn unused_id(&self) -> String {
        loop {
            let candidate = generate_transaction_id();
            if self.transaction(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Publishes the new list to observers, then writes it to the store.
    fn commit(&mut self) -> Result<(), BookError> {
        self.notify();
        self.transactions_entry.save(&self.transactions)
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for observer in &mut self.observers {
            observer(&snapshot);
        }
    }
}
