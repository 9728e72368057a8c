//! In-memory record store for controller tests.

use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::Record;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Default)]
pub struct FakeStore {
    /// (collection, id, record as JSON) in insertion order.
    records: Mutex<Vec<(&'static str, String, Value)>>,
    next_id: Mutex<u64>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<VecDeque<StoreError>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next call (of any kind) fails with `error`.
    pub fn fail_next(&self, error: StoreError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Calls made so far, e.g. `"PUT produtos/id-1"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<R> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|(c, i, _)| *c == R::COLLECTION && i == id)
            .map(|(_, _, v)| serde_json::from_value(v.clone()).unwrap())
    }

    /// Inserts a record directly, bypassing call tracking.
    pub fn seed<R: Record>(&self, draft: R::Draft) -> R {
        let id = self.allocate_id();
        let record = R::from_draft(id.clone(), draft);
        self.records.lock().unwrap().push((
            R::COLLECTION,
            id,
            serde_json::to_value(&record).unwrap(),
        ));
        record
    }

    fn allocate_id(&self) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("id-{}", next)
    }

    fn begin(&self, call: String) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn not_found<R: Record>(id: &str) -> StoreError {
        StoreError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        }
    }
}

impl RecordStore for FakeStore {
    async fn list<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.begin(format!("GET {}", R::COLLECTION))?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _, _)| *c == R::COLLECTION)
            .map(|(_, _, v)| serde_json::from_value(v.clone()).unwrap())
            .collect())
    }

    async fn create<R: Record>(&self, draft: &R::Draft) -> Result<R, StoreError> {
        self.begin(format!("POST {}", R::COLLECTION))?;
        Ok(self.seed::<R>(draft.clone()))
    }

    async fn update<R: Record>(&self, id: &str, draft: &R::Draft) -> Result<R, StoreError> {
        self.begin(format!("PUT {}/{}", R::COLLECTION, id))?;
        let mut records = self.records.lock().unwrap();
        let entry = records
            .iter_mut()
            .find(|(c, i, _)| *c == R::COLLECTION && i == id)
            .ok_or_else(|| Self::not_found::<R>(id))?;

        let record = R::from_draft(id.to_string(), draft.clone());
        entry.2 = serde_json::to_value(&record).unwrap();
        Ok(record)
    }

    async fn delete<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        self.begin(format!("DELETE {}/{}", R::COLLECTION, id))?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|(c, i, _)| !(*c == R::COLLECTION && i == id));
        if records.len() == before {
            return Err(Self::not_found::<R>(id));
        }
        Ok(())
    }
}
