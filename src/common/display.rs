use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use super::ImagePayload;

/// Opaque handle Presentation uses to show the submitted image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayReference {
    id: Uuid,
    url: String,
    content_type: String,
}

impl DisplayReference {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

impl fmt::Display for DisplayReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Owns one live entry in a [`DisplayRegistry`]. Dropping the lease revokes it.
#[derive(Debug)]
pub struct DisplayLease {
    reference: DisplayReference,
    registry: Arc<DisplayRegistry>,
}

impl DisplayLease {
    pub fn reference(&self) -> &DisplayReference {
        &self.reference
    }

    pub fn release(self) {
        tracing::debug!("Releasing display reference {}", self.reference);
    }
}

impl Drop for DisplayLease {
    fn drop(&mut self) {
        self.registry.revoke(self.reference.id);
    }
}

/// Issues and revokes display references, like an object-URL table.
#[derive(Debug)]
pub struct DisplayRegistry {
    scheme: String,
    entries: Mutex<HashMap<Uuid, ImagePayload>>,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl DisplayRegistry {
    pub fn new(scheme: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            scheme: scheme.into(),
            entries: Mutex::new(HashMap::new()),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        })
    }

    pub fn acquire(self: &Arc<Self>, payload: &ImagePayload) -> DisplayLease {
        let id = Uuid::new_v4();
        let reference = DisplayReference {
            id,
            url: format!("{}:{}", self.scheme, id),
            content_type: payload.content_type().to_string(),
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, payload.clone());
        self.acquired.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Acquired display reference {}", reference);

        DisplayLease {
            reference,
            registry: Arc::clone(self),
        }
    }

    /// Returns the payload behind a live reference; revoked references resolve to nothing.
    pub fn resolve(&self, reference: &DisplayReference) -> Option<ImagePayload> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&reference.id)
            .cloned()
    }

    pub fn is_live(&self, reference: &DisplayReference) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&reference.id)
    }

    pub fn live_count(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    fn revoke(&self, id: Uuid) {
        let removed = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        match removed {
            Some(_) => {
                self.released.fetch_add(1, Ordering::SeqCst);
            }
            None => tracing::warn!("Display reference {} was already revoked", id),
        }
    }
}
