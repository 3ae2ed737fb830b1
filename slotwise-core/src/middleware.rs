//! Middleware trait for wrapping `SlotwiseConnector` implementations.

use std::sync::Arc;

use crate::connector::SlotwiseConnector;

/// Trait implemented by connector middleware layers.
///
/// A middleware consumes an inner `SlotwiseConnector` and returns a wrapped
/// connector that augments its behavior (e.g., response caching).
pub trait Middleware: Send + Sync {
    /// Apply this middleware to wrap an inner connector and return the wrapped connector.
    fn apply(self: Box<Self>, inner: Arc<dyn SlotwiseConnector>) -> Arc<dyn SlotwiseConnector>;

    /// Human-readable middleware name for introspection/logging.
    fn name(&self) -> &'static str;

    /// Opaque configuration snapshot for serialization/inspection.
    fn config_json(&self) -> serde_json::Value;
}

/// Wrap `raw` in `layers`, given outermost first.
///
/// Layers are applied innermost to outermost, so the result is
/// `layers[0](layers[1](..(raw)))`.
pub fn wrap_layers(
    raw: Arc<dyn SlotwiseConnector>,
    layers: Vec<Box<dyn Middleware>>,
) -> Arc<dyn SlotwiseConnector> {
    layers
        .into_iter()
        .rev()
        .fold(raw, |inner, layer| layer.apply(inner))
}
