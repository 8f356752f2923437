//! In-memory remarks store used by tests.

use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use super::{RemarkRecord, RemarksMap, RemarksStore};
use crate::{drive::memory::timestamp, error::FileledgeError};

#[derive(Debug, Default)]
pub struct MemoryRemarks {
    rows: Mutex<Vec<RemarkRecord>>,
    reads: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryRemarks {
    /// Sets the remark of `file_id` directly, bypassing any cache.
    pub fn insert(&self, file_id: &str, remarks: &str) {
        let record = RemarkRecord {
            file_id: file_id.to_string(),
            file_name: file_id.to_string(),
            file_type: "text/plain".to_string(),
            parent_folder_id: String::new(),
            folder_path: String::new(),
            remarks: remarks.to_string(),
            last_modified: timestamp(),
            file_url: String::new(),
        };
        self.write(&record);
    }

    fn write(&self, record: &RemarkRecord) {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|row| row.file_id == record.file_id) {
            Some(row) => *row = record.clone(),
            None => rows.push(record.clone()),
        }
    }

    pub fn rows(&self) -> Vec<RemarkRecord> {
        self.rows.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), FileledgeError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(FileledgeError::IO(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "remarks store unreachable",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemarksStore for MemoryRemarks {
    async fn get_all(&self) -> Result<RemarksMap, FileledgeError> {
        self.check()?;
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|row| (row.file_id.clone(), row.remarks.clone()))
            .collect())
    }

    async fn upsert(&self, record: &RemarkRecord) -> Result<(), FileledgeError> {
        self.check()?;
        self.write(record);
        Ok(())
    }
}
