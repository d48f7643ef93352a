//! Capability registry of extraction engines

use crate::engines::{self, ExtractionEngine};
use crate::fetcher::PageFetcher;
use docsift_domain::ExtractionStrategy;
use std::sync::Arc;
use tracing::{debug, info};

/// Engines available to the extractor, in registry order
///
/// Built once from the compiled-in engines and an allowlist. The order is the
/// order fallback engines are tried in.
#[derive(Clone)]
pub struct EngineRegistry {
    engines: Vec<Arc<dyn ExtractionEngine>>,
}

impl EngineRegistry {
    /// Every compiled-in engine, fetching through `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self::with_enabled(fetcher, &ExtractionStrategy::ENGINES)
    }

    /// Compiled-in engines that also appear in `enabled`
    pub fn with_enabled(fetcher: Arc<dyn PageFetcher>, enabled: &[ExtractionStrategy]) -> Self {
        let mut engines = Vec::new();
        for strategy in ExtractionStrategy::ENGINES {
            if !enabled.contains(&strategy) {
                debug!("Extraction engine {} disabled by configuration", strategy);
                continue;
            }
            match engines::build(strategy, fetcher.clone()) {
                Some(engine) => engines.push(engine),
                None => debug!("Extraction engine {} not compiled in", strategy),
            }
        }

        let registry = Self { engines };
        info!(
            "Extraction engines available: {:?}",
            registry.available_strategies()
        );
        registry
    }

    /// Registry over explicitly constructed engines, kept in the given order
    pub fn from_engines(engines: Vec<Arc<dyn ExtractionEngine>>) -> Self {
        Self { engines }
    }

    /// Strategies in registry order
    pub fn available_strategies(&self) -> Vec<ExtractionStrategy> {
        self.engines.iter().map(|e| e.strategy()).collect()
    }

    /// Whether `strategy` can be used
    pub fn is_available(&self, strategy: ExtractionStrategy) -> bool {
        self.get(strategy).is_some()
    }

    /// Engine implementing `strategy`
    pub fn get(&self, strategy: ExtractionStrategy) -> Option<&Arc<dyn ExtractionEngine>> {
        self.engines.iter().find(|e| e.strategy() == strategy)
    }

    /// Engines in registry order
    pub fn engines(&self) -> &[Arc<dyn ExtractionEngine>] {
        &self.engines
    }

    /// Whether no engine is available
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
