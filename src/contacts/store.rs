//! Contact persistence.
//!
//! # Responsibilities
//! - Define the record store contract the contact views consume
//! - Provide a concurrent in-memory implementation
//!
//! # Design Decisions
//! - Ids are assigned monotonically from 1 and never reused
//! - Search is a case-insensitive substring match on first or last name
//! - Listings are ordered by id

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: u64,
    pub first: String,
    pub last: String,
    pub phone: String,
    pub email: String,
}

/// Editable fields of a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub first: String,
    pub last: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("contact {0} not found")]
    NotFound(u64),
}

pub trait ContactStore: Send + Sync {
    fn list(&self, filter: Option<&str>) -> Vec<Contact>;
    fn get(&self, id: u64) -> Result<Contact, StoreError>;
    fn create(&self, fields: ContactFields) -> Contact;
    fn update(&self, id: u64, fields: ContactFields) -> Result<Contact, StoreError>;
    fn delete(&self, id: u64) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contacts: DashMap<u64, Contact>,
    last_id: AtomicU64,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContactStore for MemoryContactStore {
    fn list(&self, filter: Option<&str>) -> Vec<Contact> {
        let needle = filter.map(str::to_lowercase);
        let mut contacts: Vec<Contact> = self
            .contacts
            .iter()
            .filter(|entry| match &needle {
                Some(needle) => {
                    entry.first.to_lowercase().contains(needle)
                        || entry.last.to_lowercase().contains(needle)
                }
                None => true,
            })
            .map(|entry| entry.value().clone())
            .collect();
        contacts.sort_by_key(|contact| contact.id);
        contacts
    }

    fn get(&self, id: u64) -> Result<Contact, StoreError> {
        self.contacts
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn create(&self, fields: ContactFields) -> Contact {
        let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
        let contact = Contact {
            id,
            first: fields.first,
            last: fields.last,
            phone: fields.phone,
            email: fields.email,
        };
        self.contacts.insert(id, contact.clone());
        tracing::debug!(contact_id = id, "Contact created");
        contact
    }

    fn update(&self, id: u64, fields: ContactFields) -> Result<Contact, StoreError> {
        let mut entry = self.contacts.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.first = fields.first;
        entry.last = fields.last;
        entry.phone = fields.phone;
        entry.email = fields.email;
        Ok(entry.value().clone())
    }

    fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.contacts
            .remove(&id)
            .map(|_| tracing::debug!(contact_id = id, "Contact deleted"))
            .ok_or(StoreError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(first: &str, last: &str) -> ContactFields {
        ContactFields {
            first: first.into(),
            last: last.into(),
            phone: "555-0100".into(),
            email: format!("{}@example.com", first.to_lowercase()),
        }
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let store = MemoryContactStore::new();
        let a = store.create(fields("Ada", "Lovelace"));
        let b = store.create(fields("Alan", "Turing"));
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.get(2).unwrap().last, "Turing");
    }

    #[test]
    fn test_list_filters_by_name() {
        let store = MemoryContactStore::new();
        store.create(fields("Ada", "Lovelace"));
        store.create(fields("Alan", "Turing"));
        store.create(fields("Grace", "Hopper"));

        let names = |filter| {
            store
                .list(filter)
                .into_iter()
                .map(|c| c.first)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(None), vec!["Ada", "Alan", "Grace"]);
        assert_eq!(names(Some("a")), vec!["Ada", "Alan", "Grace"]);
        assert_eq!(names(Some("TUR")), vec!["Alan"]);
        assert_eq!(names(Some("hop")), vec!["Grace"]);
        assert!(names(Some("zzz")).is_empty());
    }

    #[test]
    fn test_update_and_delete() {
        let store = MemoryContactStore::new();
        let contact = store.create(fields("Ada", "Lovelace"));

        let updated = store.update(contact.id, fields("Ada", "King")).unwrap();
        assert_eq!(updated.last, "King");
        assert_eq!(store.get(contact.id).unwrap(), updated);

        store.delete(contact.id).unwrap();
        assert_eq!(store.get(contact.id), Err(StoreError::NotFound(1)));
        assert_eq!(store.delete(contact.id), Err(StoreError::NotFound(1)));
        assert_eq!(
            store.update(9, fields("X", "Y")),
            Err(StoreError::NotFound(9))
        );
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryContactStore::new();
        let first = store.create(fields("Ada", "Lovelace"));
        store.delete(first.id).unwrap();
        assert_eq!(store.create(fields("Alan", "Turing")).id, 2);
    }
}
