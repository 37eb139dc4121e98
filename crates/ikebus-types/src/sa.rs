//! Opaque security-association handles.

use std::sync::Arc;

/// What the bus needs to know about an SA owned elsewhere.
///
/// Implemented by the SA manager's session type. The bus only identifies
/// and displays SAs; it never drives their lifecycle.
pub trait SecurityAssociation: Send + Sync + 'static {
    /// Unique identifier assigned by the SA manager.
    fn unique_id(&self) -> u32;

    /// Name of the connection the SA belongs to.
    fn name(&self) -> &str;
}

/// Shared reference to an SA, attached to events.
///
/// Two handles are equal when they refer to the same underlying object.
#[derive(Clone)]
pub struct SaHandle(Arc<dyn SecurityAssociation>);

impl SaHandle {
    /// Wraps a shared SA reference.
    pub fn new(sa: Arc<dyn SecurityAssociation>) -> Self {
        Self(sa)
    }

    /// Unique identifier of the SA.
    pub fn unique_id(&self) -> u32 {
        self.0.unique_id()
    }

    /// Connection name of the SA.
    pub fn name(&self) -> &str {
        self.0.name()
    }
}

impl<T: SecurityAssociation> From<Arc<T>> for SaHandle {
    fn from(sa: Arc<T>) -> Self {
        Self(sa)
    }
}

impl PartialEq for SaHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SaHandle {}

impl std::fmt::Display for SaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.0.name(), self.0.unique_id())
    }
}

impl std::fmt::Debug for SaHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaHandle")
            .field("name", &self.0.name())
            .field("unique_id", &self.0.unique_id())
            .finish()
    }
}

/// A named SA record for callers that have no richer session type, and
/// for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSa {
    /// Unique identifier.
    pub unique_id: u32,
    /// Connection name.
    pub name: String,
}

impl NamedSa {
    /// Creates a handle to a new named SA record.
    pub fn handle(name: impl Into<String>, unique_id: u32) -> SaHandle {
        SaHandle::from(Arc::new(Self {
            unique_id,
            name: name.into(),
        }))
    }
}

impl SecurityAssociation for NamedSa {
    fn unique_id(&self) -> u32 {
        self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_identity() {
        let a = NamedSa::handle("home", 1);
        let same = a.clone();
        let lookalike = NamedSa::handle("home", 1);
        assert_eq!(a, same);
        assert_ne!(a, lookalike);
    }

    #[test]
    fn displays_name_and_id() {
        assert_eq!(NamedSa::handle("office", 7).to_string(), "office[7]");
    }
}
