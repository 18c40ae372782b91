//! Contact Directory - the in-memory cache of the tabular backend
//!
//! Wholesale-replaced on each refresh cycle. Lookups and the swap share a
//! single `RwLock`; the replacement indices are built off-lock so readers
//! never observe a half-written table.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::model::{Contact, RawContactRecord};

#[derive(Default)]
struct Indices {
    by_id: HashMap<u64, Arc<Contact>>,
    by_phone: HashMap<String, Arc<Contact>>,
}

/// Read-mostly contact cache keyed by id and phone
#[derive(Clone, Default)]
pub struct ContactDirectory {
    inner: Arc<RwLock<Indices>>,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_id(&self, id: u64) -> Option<Arc<Contact>> {
        self.inner.read().by_id.get(&id).cloned()
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<Arc<Contact>> {
        self.inner.read().by_phone.get(phone).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All contacts ordered by id descending, for the listing commands.
    pub fn all_by_id_desc(&self) -> Vec<Arc<Contact>> {
        let mut contacts: Vec<_> = self.inner.read().by_id.values().cloned().collect();
        contacts.sort_by(|a, b| b.id.cmp(&a.id));
        contacts
    }

    /// Atomic bulk replace. Invalid rows are skipped and logged, never
    /// fatal for the batch. Returns (inserted, skipped).
    pub fn replace_all(&self, records: Vec<RawContactRecord>) -> (usize, usize) {
        let mut next = Indices::default();
        let mut skipped = 0usize;

        for record in records {
            match record.into_contact() {
                Ok(contact) => {
                    let contact = Arc::new(contact);
                    let id = contact.id;
                    // A displaced record must leave both indices, or a stale
                    // phone/id key would resolve to a contact the other
                    // index no longer knows.
                    if let Some(displaced) = next.by_id.insert(id, contact.clone()) {
                        warn!(id, "Duplicate contact id in refresh batch, keeping last");
                        next.by_phone.remove(&displaced.phone);
                    }
                    if let Some(displaced) = next.by_phone.insert(contact.phone.clone(), contact) {
                        if displaced.id != id {
                            warn!(phone = %displaced.phone, "Duplicate phone in refresh batch, keeping last");
                            next.by_id.remove(&displaced.id);
                        }
                    }
                }
                Err(reason) => {
                    skipped += 1;
                    warn!(reason, "Skipping invalid contact record");
                }
            }
        }

        let inserted = next.by_id.len();
        *self.inner.write() = next;
        (inserted, skipped)
    }

    /// Update one contact's note. The touched entry is re-created so
    /// concurrent readers holding the old `Arc` are unaffected.
    pub fn update_note(&self, id: u64, text: &str) -> bool {
        let mut inner = self.inner.write();
        let Some(existing) = inner.by_id.get(&id) else {
            return false;
        };
        let mut updated = Contact::clone(existing);
        updated.note = Some(text.to_string());
        let updated = Arc::new(updated);
        inner.by_phone.insert(updated.phone.clone(), updated.clone());
        inner.by_id.insert(id, updated);
        true
    }
}
