//! Network client collaborator boundary
//!
//! The store never builds, calls or tears down a client. It only keeps a
//! shared reference to one a caller installed, and reports through the
//! return value of `configure` when the transport must rebuild it.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A network client built by the transport layer
pub trait HttpClient: Send + Sync {
    /// Short name used in diagnostics (typically the implementation name)
    fn name(&self) -> &str;
}

/// Shared reference to an installed [`HttpClient`]
///
/// Cloning shares the same client; parent and child stores hold the same
/// instance rather than copies.
#[derive(Clone)]
pub struct ClientHandle(Arc<dyn HttpClient>);

impl ClientHandle {
    pub fn new<C: HttpClient + 'static>(client: C) -> Self {
        Self(Arc::new(client))
    }

    pub fn from_arc(client: Arc<dyn HttpClient>) -> Self {
        Self(client)
    }

    /// Access the client
    #[must_use]
    pub fn client(&self) -> &Arc<dyn HttpClient> {
        &self.0
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Whether both handles refer to the same client instance
    #[must_use]
    pub fn ptr_eq(&self, other: &ClientHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ClientHandle> for Value {
    fn from(handle: ClientHandle) -> Self {
        Value::handle(handle)
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClientHandle").field(&self.name()).finish()
    }
}
