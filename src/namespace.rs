//! Recyclable per-prefix name allocation.
//!
//! Each [`NamespaceIndexer`] owns one prefix (e.g. `"pedestrian"`) and hands
//! out names of the form `prefix_index`. Released indices go back on a free
//! list and are preferred for the next allocation, so long-running sessions
//! that repeatedly spawn and clear obstacles do not grow their name space
//! without bound.

use std::collections::HashSet;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("invalid namespace prefix {prefix:?}: must be non-empty and contain only ASCII letters, digits and underscores")]
    InvalidPrefix { prefix: String },
}

/// Opaque receipt for an allocated name, redeemed via
/// [`NamespaceIndexer::release`]. There is no public constructor: the only
/// way to obtain a handle is to allocate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameHandle {
    prefix: String,
    index: u64,
}

impl NameHandle {
    /// The prefix this handle was allocated under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The full name the handle stands for.
    pub fn name(&self) -> String {
        format!("{}_{}", self.prefix, self.index)
    }
}

#[derive(Debug)]
pub struct NamespaceIndexer {
    prefix: String,
    next_index: u64,
    free_list: Vec<u64>,
    active: HashSet<u64>,
}

impl NamespaceIndexer {
    pub fn new(prefix: &str) -> Result<Self, AllocationError> {
        let valid = !prefix.is_empty()
            && prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(AllocationError::InvalidPrefix {
                prefix: prefix.to_string(),
            });
        }
        Ok(Self {
            prefix: prefix.to_string(),
            next_index: 0,
            free_list: Vec::new(),
            active: HashSet::new(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Hands out a unique name within the prefix. Recycled indices are
    /// reused first; otherwise the monotonic counter advances.
    pub fn allocate(&mut self) -> (String, NameHandle) {
        let index = self.free_list.pop().unwrap_or_else(|| {
            let index = self.next_index;
            self.next_index += 1;
            index
        });
        self.active.insert(index);
        let handle = NameHandle {
            prefix: self.prefix.clone(),
            index,
        };
        (handle.name(), handle)
    }

    /// Returns the handle's slot to the free list, making the index eligible
    /// for immediate reuse. Releasing a handle that is not active (already
    /// released, or cloned and redeemed twice) is a no-op.
    pub fn release(&mut self, handle: NameHandle) {
        if self.active.remove(&handle.index) {
            self.free_list.push(handle.index);
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
