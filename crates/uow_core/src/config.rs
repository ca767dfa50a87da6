//! Unit-of-work configuration.

/// Configuration for a [`crate::UnitOfWork`].
#[derive(Debug, Clone, Default)]
pub struct UnitOfWorkConfig {
    /// Whether a scope-owned transaction is restarted automatically after
    /// commit or rollback, keeping the scope transaction-ready without a
    /// new `start()`.
    pub implicit_transactions: bool,
}

impl UnitOfWorkConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether implicit transactions are enabled.
    #[must_use]
    pub const fn implicit_transactions(mut self, value: bool) -> Self {
        self.implicit_transactions = value;
        self
    }
}
