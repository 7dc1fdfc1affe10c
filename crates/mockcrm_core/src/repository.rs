//! In-memory contact repository.

use crate::contact::Contact;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered contact store.
///
/// The repository maintains:
/// - All contacts in insertion order
/// - An id index for point lookups
///
/// It has no update or delete operations. Synchronization is the owner's
/// job; see [`CrmService`](crate::CrmService).
#[derive(Debug, Default)]
pub struct ContactRepository {
    /// Contacts in insertion order.
    contacts: Vec<Arc<Contact>>,
    /// Contact id -> position in `contacts`.
    positions: HashMap<String, usize>,
}

impl ContactRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a contact to the end of the sequence.
    pub fn append(&mut self, contact: Contact) -> Arc<Contact> {
        debug_assert!(
            !self.positions.contains_key(&contact.id),
            "duplicate contact id {}",
            contact.id
        );
        let contact = Arc::new(contact);
        self.positions
            .insert(contact.id.clone(), self.contacts.len());
        self.contacts.push(Arc::clone(&contact));
        contact
    }

    /// Looks up a contact by id.
    pub fn get(&self, id: &str) -> Option<Arc<Contact>> {
        self.positions
            .get(id)
            .and_then(|&pos| self.contacts.get(pos))
            .cloned()
    }

    /// Returns the current contents in insertion order.
    ///
    /// The returned vector shares the stored records but not the sequence,
    /// so later appends do not show up in it.
    pub fn snapshot(&self) -> Vec<Arc<Contact>> {
        self.contacts.clone()
    }

    /// Returns the number of contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Returns true if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
