//! Error types for the bus.

/// Errors returned by bus registration operations.
///
/// Emission never fails; only operations that would extend a torn-down
/// bus report an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// The bus has been torn down.
    #[error("bus is torn down")]
    Closed,
}
