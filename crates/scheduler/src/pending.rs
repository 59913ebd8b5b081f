use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::error;

use crate::error::ScheduleError;
use crate::operation::BackgroundOperation;

/// One pending operation and the identity the caller gave it.
struct PendingEntry<I, O> {
    identity: I,
    operation: O,
}

/// Operations still awaiting completion, in insertion order.
///
/// The set only shrinks once scanning starts. Scan order is insertion
/// order minus entries already harvested.
pub struct PendingSet<I, O> {
    entries: Vec<PendingEntry<I, O>>,
    identities: HashSet<I>,
}

impl<I, O> PendingSet<I, O>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            identities: HashSet::new(),
        }
    }

    /// Build a set from `(identity, operation)` pairs.
    ///
    /// Fails on the first duplicate identity; the partially built set is
    /// dropped, so nothing gets scheduled.
    pub fn from_operations(
        operations: impl IntoIterator<Item = (I, O)>,
    ) -> Result<Self, ScheduleError> {
        let mut set = Self::new();
        for (identity, operation) in operations {
            set.insert(identity, operation)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, identity: I, operation: O) -> Result<(), ScheduleError> {
        if !self.identities.insert(identity.clone()) {
            return Err(ScheduleError::DuplicateIdentity {
                identity: format!("{identity:?}"),
            });
        }
        self.entries.push(PendingEntry {
            identity,
            operation,
        });
        Ok(())
    }

    /// One non-blocking pass over every remaining entry.
    ///
    /// Ready entries are extracted, removed, and returned in scan order.
    /// Entries that are not ready stay in place for the next pass.
    pub fn scan_once(&mut self) -> Result<Vec<(I, O::Output)>, ScheduleError> {
        let mut harvested = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if !self.entries[i].operation.is_ready() {
                i += 1;
                continue;
            }
            // `remove` keeps the residual order stable.
            let mut entry = self.entries.remove(i);
            let value = entry.operation.take_result().map_err(|source| {
                error!(identity = ?entry.identity, error = %source, "operation contract violated");
                ScheduleError::Misuse {
                    identity: format!("{:?}", entry.identity),
                    source,
                }
            })?;
            self.identities.remove(&entry.identity);
            harvested.push((entry.identity, value));
        }
        Ok(harvested)
    }

    /// Identities still pending, in scan order.
    pub fn residual(&self) -> Vec<I> {
        self.entries.iter().map(|e| e.identity.clone()).collect()
    }

    /// Drop every remaining operation and return their identities.
    pub(crate) fn abandon(&mut self) -> Vec<I> {
        self.identities.clear();
        self.entries.drain(..).map(|e| e.identity).collect()
    }

    pub fn contains(&self, identity: &I) -> bool {
        self.identities.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I, O> Default for PendingSet<I, O>
where
    I: Eq + Hash + Clone + Debug,
    O: BackgroundOperation,
{
    fn default() -> Self {
        Self::new()
    }
}
