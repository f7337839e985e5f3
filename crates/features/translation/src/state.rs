use std::fmt::Debug;

/// Whether the host application finished installation.
///
/// Dynamic resources and cache events are only used once it has.
pub trait ApplicationState: Send + Sync + Debug {
    fn is_installed(&self) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct StaticApplicationState(pub bool);

impl ApplicationState for StaticApplicationState {
    fn is_installed(&self) -> bool {
        self.0
    }
}

impl Default for StaticApplicationState {
    fn default() -> Self {
        Self(true)
    }
}

/// Strategy last applied to the translator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StrategyState {
    #[default]
    Unapplied,
    Applied(String),
}

impl StrategyState {
    /// Whether `name` is the strategy already applied.
    #[must_use]
    pub fn is_applied(&self, name: &str) -> bool {
        matches!(self, Self::Applied(applied) if applied == name)
    }
}
