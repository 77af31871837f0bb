use alloc::{collections::BTreeMap, vec::Vec};

use crate::agreement::{Agreement, AgreementId, Status};

/// Keyed agreement storage.
///
/// Reads of unknown ids return the default record; absence is not a failure.
pub trait AgreementStore {
    fn get(&self, id: &AgreementId) -> Agreement;

    /// Status only. Backends where evidence is expensive to load should override this.
    fn status(&self, id: &AgreementId) -> Status {
        self.get(id).status
    }

    /// Only mutator. Called at most once per id, after every check has passed.
    fn set(&mut self, id: AgreementId, status: Status, evidence: Vec<u8>);
}

/// Ordered in-memory store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<AgreementId, Agreement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ids that reached a terminal status.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AgreementStore for MemoryStore {
    fn get(&self, id: &AgreementId) -> Agreement {
        self.records.get(id).cloned().unwrap_or_default()
    }

    fn status(&self, id: &AgreementId) -> Status {
        self.records
            .get(id)
            .map(|record| record.status)
            .unwrap_or_default()
    }

    fn set(&mut self, id: AgreementId, status: Status, evidence: Vec<u8>) {
        self.records.insert(id, Agreement::new(status, evidence));
    }
}
