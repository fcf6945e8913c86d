//! Bookkeeping for optimistic updates.
//!
//! A client applies a change locally before the server confirms it. The
//! ledger keeps the pre-change snapshot under the request ID so the change
//! can be rolled back if the server rejects it. Finished entries stay until
//! [`MutationLedger::prune`] drops them.

use std::collections::HashMap;

use uuid::Uuid;

use docvault_core::error::AppError;

/// Lifecycle of one optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
    /// Applied locally, waiting for the server.
    Pending,
    /// Confirmed by the server.
    Committed,
    /// Rejected; the snapshot was handed back.
    RolledBack,
}

/// Invalid ledger transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// `begin` was called twice with the same request ID.
    #[error("Mutation {0} is already recorded")]
    Duplicate(Uuid),
    /// No mutation with this request ID.
    #[error("Mutation {0} is not recorded")]
    Unknown(Uuid),
    /// The mutation already reached a terminal state.
    #[error("Mutation {id} is already {state:?}")]
    Finalized {
        /// Request ID.
        id: Uuid,
        /// Terminal state it is in.
        state: MutationState,
    },
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unknown(_) => AppError::not_found(err.to_string()),
            LedgerError::Duplicate(_) | LedgerError::Finalized { .. } => {
                AppError::conflict(err.to_string())
            }
        }
    }
}

#[derive(Debug)]
struct Entry<T> {
    state: MutationState,
    snapshot: Option<T>,
}

/// Snapshots of optimistic mutations keyed by request ID.
#[derive(Debug)]
pub struct MutationLedger<T> {
    entries: HashMap<Uuid, Entry<T>>,
}

impl<T> Default for MutationLedger<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> MutationLedger<T> {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pending mutation and the state it replaced.
    pub fn begin(&mut self, id: Uuid, snapshot: T) -> Result<(), LedgerError> {
        if self.entries.contains_key(&id) {
            return Err(LedgerError::Duplicate(id));
        }
        self.entries.insert(
            id,
            Entry {
                state: MutationState::Pending,
                snapshot: Some(snapshot),
            },
        );
        Ok(())
    }

    /// Mark a pending mutation confirmed and drop its snapshot.
    pub fn commit(&mut self, id: Uuid) -> Result<(), LedgerError> {
        let entry = self.pending_entry(id)?;
        entry.state = MutationState::Committed;
        entry.snapshot = None;
        Ok(())
    }

    /// Mark a pending mutation rejected and return the snapshot to restore.
    pub fn rollback(&mut self, id: Uuid) -> Result<T, LedgerError> {
        let entry = self.pending_entry(id)?;
        let snapshot = entry.snapshot.take().ok_or(LedgerError::Unknown(id))?;
        entry.state = MutationState::RolledBack;
        Ok(snapshot)
    }

    /// Current state of a mutation.
    pub fn state(&self, id: Uuid) -> Option<MutationState> {
        self.entries.get(&id).map(|e| e.state)
    }

    /// Number of mutations still waiting for the server.
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.state == MutationState::Pending)
            .count()
    }

    /// Drop committed and rolled-back entries, returning how many were removed.
    ///
    /// Their request IDs become unknown again.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.state == MutationState::Pending);
        before - self.entries.len()
    }

    fn pending_entry(&mut self, id: Uuid) -> Result<&mut Entry<T>, LedgerError> {
        let entry = self.entries.get_mut(&id).ok_or(LedgerError::Unknown(id))?;
        if entry.state != MutationState::Pending {
            return Err(LedgerError::Finalized {
                id,
                state: entry.state,
            });
        }
        Ok(entry)
    }
}
