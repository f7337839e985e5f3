use super::{
    DefaultTranslationStrategy, StaticTranslationStrategy, StrategyProvider, TranslationStrategy,
};
use crate::error::TranslationError;
use parking_lot::RwLock;
use rosetta_domain::config::TranslatorConfig;
use std::sync::Arc;
use tracing::info;

/// Provider over a fixed list of strategies, the first one active initially.
#[derive(Debug)]
pub struct TranslationStrategyProvider {
    strategies: Vec<Arc<dyn TranslationStrategy>>,
    selected: RwLock<Arc<dyn TranslationStrategy>>,
}

impl TranslationStrategyProvider {
    /// # Errors
    /// Returns [`TranslationError::InvalidConfiguration`] when `strategies` is empty.
    pub fn new(strategies: Vec<Arc<dyn TranslationStrategy>>) -> Result<Self, TranslationError> {
        let first = strategies.first().cloned().ok_or_else(|| {
            TranslationError::InvalidConfiguration {
                message: "at least one translation strategy is required".into(),
                context: None,
            }
        })?;
        Ok(Self { strategies, selected: RwLock::new(first) })
    }

    /// The default strategy over `config.locales`, then one static strategy per
    /// entry of `config.strategies`. `config.strategy` selects the active one.
    ///
    /// # Errors
    /// Returns [`TranslationError::InvalidConfiguration`] for a malformed static
    /// strategy and [`TranslationError::UnknownStrategy`] for an unknown selection.
    pub fn from_config(config: &TranslatorConfig) -> Result<Self, TranslationError> {
        let mut strategies: Vec<Arc<dyn TranslationStrategy>> =
            vec![Arc::new(DefaultTranslationStrategy::new(config.locales.iter().cloned()))];
        for (name, parents) in &config.strategies {
            strategies.push(Arc::new(StaticTranslationStrategy::from_parents(name.clone(), parents)?));
        }
        let provider = Self::new(strategies)?;
        if let Some(name) = &config.strategy {
            provider.set_strategy_by_name(name)?;
        }
        Ok(provider)
    }
}

impl StrategyProvider for TranslationStrategyProvider {
    fn strategy(&self) -> Arc<dyn TranslationStrategy> {
        self.selected.read().clone()
    }

    fn strategies(&self) -> Vec<Arc<dyn TranslationStrategy>> {
        self.strategies.clone()
    }

    fn set_strategy(&self, strategy: Arc<dyn TranslationStrategy>) {
        info!(strategy = strategy.name(), "Translation strategy selected");
        *self.selected.write() = strategy;
    }
}
