//! Builder for composing connectors with middleware layers.
//!
//! Layers form an onion around the raw connector. The builder stores them
//! outermost first (last added = outermost) and applies them in reverse in
//! [`ConnectorBuilder::build`], so `[Cache, Custom]` yields
//! `Cache(Custom(Raw))`.

use std::sync::Arc;

use serde_json::json;
use slotwise_core::{Middleware, SlotwiseConnector, wrap_layers};
use slotwise_types::CacheConfig;

use crate::cache::CacheMiddleware;

const CACHE_LAYER: &str = "CachingMiddleware";

/// Generic middleware builder for composing a connector with layered wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn SlotwiseConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn SlotwiseConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the response cache.
    ///
    /// The cache sits outermost so hits never reach inner layers. An existing
    /// cache layer is replaced.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self.layers
            .insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Names and configuration of the current layers, outermost first,
    /// followed by the raw connector.
    #[must_use]
    pub fn describe(&self) -> Vec<serde_json::Value> {
        self.layers
            .iter()
            .map(|l| json!({ "name": l.name(), "config": l.config_json() }))
            .chain(std::iter::once(
                json!({ "name": "RawConnector", "config": { "name": self.raw.name() } }),
            ))
            .collect()
    }

    /// Build the wrapped connector.
    #[must_use]
    pub fn build(self) -> Arc<dyn SlotwiseConnector> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            connector = self.raw.name(),
            layers = self.layers.len(),
            "building connector stack"
        );
        wrap_layers(self.raw, self.layers)
    }
}
