//! Canonical storage for the certificate being edited
//!
//! The store performs no validation and applies no lock policy; it only
//! holds the current record and tells subscribers when it was replaced.

use tokio::sync::watch;

use crate::CertificateRecord;

/// Holds one [`CertificateRecord`] and broadcasts every replacement
#[derive(Debug)]
pub struct FormStore {
    tx: watch::Sender<CertificateRecord>,
}

impl FormStore {
    pub fn new(initial: CertificateRecord) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// A copy of the current record
    pub fn get(&self) -> CertificateRecord {
        self.tx.borrow().clone()
    }

    /// Replace the whole record; subscribers see the new value
    pub fn set(&self, record: CertificateRecord) {
        self.tx.send_replace(record);
    }

    /// Receive every future replacement (live preview)
    pub fn subscribe(&self) -> watch::Receiver<CertificateRecord> {
        self.tx.subscribe()
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new(CertificateRecord::default())
    }
}
