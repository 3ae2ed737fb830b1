use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use slotwise_core::connector::ConnectorKey;
use slotwise_core::{
    Capability, JoinPolicy, PipelineConfig, RankConfig, ScoringMode, SlotwiseConfig,
    SlotwiseConnector, SlotwiseError,
};

use crate::util::collapse_errors;

/// Orchestrator that routes each capability across registered providers and
/// runs the scoring pipeline over what they return.
pub struct Slotwise {
    pub(crate) connectors: Vec<Arc<dyn SlotwiseConnector>>,
    pub(crate) cfg: SlotwiseConfig,
    pub(crate) priority: HashMap<Capability, Vec<ConnectorKey>>,
}

/// Builder for constructing a `Slotwise` orchestrator with custom configuration.
pub struct SlotwiseBuilder {
    connectors: Vec<Arc<dyn SlotwiseConnector>>,
    cfg: SlotwiseConfig,
    priority: HashMap<Capability, Vec<ConnectorKey>>,
}

impl Default for SlotwiseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotwiseBuilder {
    /// Create a new builder with default configuration: cheapness scoring,
    /// bucket-mean join, no ranking and a 15 s provider timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: SlotwiseConfig::default(),
            priority: HashMap::new(),
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order decides fallback order for capabilities without an
    /// explicit priority. Duplicates are not removed.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn SlotwiseConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set preferred providers for a capability, highest priority first.
    ///
    /// Unlisted connectors that serve the capability are still tried after
    /// the listed ones.
    #[must_use]
    pub fn prefer_for(
        mut self,
        capability: Capability,
        connectors_desc: &[Arc<dyn SlotwiseConnector>],
    ) -> Self {
        let keys: Vec<ConnectorKey> = connectors_desc.iter().map(|c| c.key()).collect();
        self.priority.insert(capability, keys);
        self
    }

    /// Replace the pipeline configuration.
    #[must_use]
    pub fn pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.cfg.pipeline = pipeline;
        self
    }

    /// Select how series are joined on the half-hour timeline.
    #[must_use]
    pub const fn join_policy(mut self, join: JoinPolicy) -> Self {
        self.cfg.pipeline.join = join;
        self
    }

    /// Select the scoring mode.
    #[must_use]
    pub const fn scoring(mut self, mode: ScoringMode) -> Self {
        self.cfg.pipeline.scoring = mode;
        self
    }

    /// Enable top-K ranking of the scored rows.
    #[must_use]
    pub fn ranking(mut self, rank: RankConfig) -> Self {
        self.cfg.pipeline.ranking = Some(rank);
        self
    }

    /// Set the per-provider request timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Bound the whole fetch phase of a run.
    ///
    /// When exceeded, `run` returns a `RequestTimeout` error.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Build the `Slotwise` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered, the provider
    /// timeout is zero, or the pipeline configuration is invalid.
    pub fn build(mut self) -> Result<Slotwise, SlotwiseError> {
        if self.connectors.is_empty() {
            return Err(SlotwiseError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        if self.cfg.provider_timeout.is_zero() {
            return Err(SlotwiseError::InvalidArg(
                "provider timeout must be positive".to_string(),
            ));
        }
        self.cfg.pipeline.validate()?;

        // Drop unknown keys and duplicates from priority lists.
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        for keys in self.priority.values_mut() {
            let mut seen: HashSet<&'static str> = HashSet::new();
            keys.retain(|k| known.contains(k.as_str()) && seen.insert(k.as_str()));
        }

        Ok(Slotwise {
            connectors: self.connectors,
            cfg: self.cfg,
            priority: self.priority,
        })
    }
}

/// Attach the connector name to errors that do not already carry provenance.
pub fn tag_err(connector: &str, e: SlotwiseError) -> SlotwiseError {
    match e {
        e @ (SlotwiseError::NotFound { .. }
        | SlotwiseError::ProviderTimeout { .. }
        | SlotwiseError::Connector { .. }
        | SlotwiseError::RequestTimeout { .. }
        | SlotwiseError::AllProvidersTimedOut { .. }
        | SlotwiseError::AllProvidersFailed(_)) => e,
        other => SlotwiseError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Run `fut` under an optional deadline, mapping expiry to `RequestTimeout`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, SlotwiseError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| SlotwiseError::request_timeout("request")),
        None => Ok(fut.await),
    }
}

impl Slotwise {
    /// Start building a new `Slotwise` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use slotwise::{Capability, Slotwise};
    ///
    /// let octopus = OctopusConnector::cached()?.build();
    /// let elexon = Arc::new(ElexonConnector::new_default()?);
    ///
    /// let slotwise = Slotwise::builder()
    ///     .with_connector(octopus)
    ///     .with_connector(elexon.clone())
    ///     .prefer_for(Capability::SystemPrices, &[elexon])
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> SlotwiseBuilder {
        SlotwiseBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &SlotwiseConfig {
        &self.cfg
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "slotwise::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, SlotwiseError>
    where
        Fut: core::future::Future<Output = Result<T, SlotwiseError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(SlotwiseError::provider_timeout(connector_name, capability)))
    }

    /// Registered connectors in priority order for `capability`.
    pub(crate) fn ordered(&self, capability: Capability) -> Vec<Arc<dyn SlotwiseConnector>> {
        let mut out: Vec<(usize, Arc<dyn SlotwiseConnector>)> =
            self.connectors.iter().cloned().enumerate().collect();
        if let Some(pref) = self.priority.get(&capability) {
            let pos: HashMap<_, _> = pref
                .iter()
                .enumerate()
                .map(|(i, n)| (n.as_str(), i))
                .collect();
            out.sort_by_key(|(orig_i, c)| {
                (pos.get(c.name()).copied().unwrap_or(usize::MAX), *orig_i)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }

    /// Try providers for `capability` in priority order until one succeeds.
    ///
    /// Each attempt is bounded by the provider timeout. An empty answer is a
    /// success. When every provider fails the errors are collapsed: all
    /// timeouts become `AllProvidersTimedOut`, all not-found become
    /// `NotFound(not_found)`, anything else `AllProvidersFailed`.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "slotwise::core::fetch_single",
            skip(self, call),
            fields(capability = %capability),
        )
    )]
    pub(crate) async fn fetch_single<T, F, Fut>(
        &self,
        capability: Capability,
        not_found: String,
        call: F,
    ) -> Result<T, SlotwiseError>
    where
        T: Send,
        F: Fn(Arc<dyn SlotwiseConnector>) -> Option<Fut> + Send,
        Fut: core::future::Future<Output = Result<T, SlotwiseError>> + Send,
    {
        let mut attempted_any = false;
        let mut errors: Vec<SlotwiseError> = Vec::new();

        for c in self.ordered(capability) {
            let Some(fut) = call(Arc::clone(&c)) else {
                continue;
            };
            attempted_any = true;
            match Self::provider_call_with_timeout(
                c.name(),
                capability.as_str(),
                self.cfg.provider_timeout,
                fut,
            )
            .await
            {
                Ok(v) => return Ok(v),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(connector = c.name(), error = %e, "provider failed");
                    errors.push(tag_err(c.name(), e));
                }
            }
        }

        Err(collapse_errors(
            capability,
            attempted_any,
            errors,
            Some(not_found),
        ))
    }
}
