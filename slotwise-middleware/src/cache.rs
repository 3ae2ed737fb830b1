use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;

use slotwise_core::connector::{SystemPriceProvider, TariffProvider, WeatherProvider};
use slotwise_core::{
    SlotwiseConnector, SlotwiseError, SystemPrice, SystemPriceSource, TariffRate, TariffRequest,
    TimeWindow, WeatherRequest, WeatherSample,
};
use slotwise_types::{CacheConfig, Capability};

/// Weather requests keyed by the exact bit pattern of their coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WeatherKey {
    lat_bits: u64,
    lon_bits: u64,
    window: TimeWindow,
}

impl From<&WeatherRequest> for WeatherKey {
    fn from(req: &WeatherRequest) -> Self {
        Self {
            lat_bits: req.coordinates.latitude().to_bits(),
            lon_bits: req.coordinates.longitude().to_bits(),
            window: req.window,
        }
    }
}

type SystemKey = (NaiveDate, SystemPriceSource);

/// Declarative wrapper that applies caching when building a connector stack.
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

fn ttl_ms(cfg: &CacheConfig, cap: Capability) -> u64 {
    cfg.ttl_for(cap)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl slotwise_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SlotwiseConnector>) -> Arc<dyn SlotwiseConnector> {
        let Self { cfg } = *self;
        Arc::new(CachingConnector::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "capacity": self.cfg.capacity,
            "tariff_rates_ttl_ms": ttl_ms(&self.cfg, Capability::TariffRates),
            "system_prices_ttl_ms": ttl_ms(&self.cfg, Capability::SystemPrices),
            "weather_forecast_ttl_ms": ttl_ms(&self.cfg, Capability::WeatherForecast),
        })
    }
}

// Per-capability typed stores; `None` means disabled (TTL=0).
struct Stores {
    tariff: Option<Cache<TariffRequest, Arc<Vec<TariffRate>>>>,
    system: Option<Cache<SystemKey, Arc<Vec<SystemPrice>>>>,
    weather: Option<Cache<WeatherKey, Arc<Vec<WeatherSample>>>>,
}

/// Connector wrapper that memoizes successful provider answers.
pub struct CachingConnector {
    inner: Arc<dyn SlotwiseConnector>,
    stores: Stores,
}

impl CachingConnector {
    fn maybe_store<K, V>(cfg: &CacheConfig, cap: Capability) -> Option<Cache<K, V>>
    where
        K: std::hash::Hash + Eq + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        let ttl = cfg.ttl_for(cap)?;
        Some(
            Cache::builder()
                .max_capacity(cfg.capacity.max(1))
                .time_to_live(ttl)
                .build(),
        )
    }

    #[must_use]
    pub fn new(inner: Arc<dyn SlotwiseConnector>, cfg: &CacheConfig) -> Self {
        let stores = Stores {
            tariff: Self::maybe_store(cfg, Capability::TariffRates),
            system: Self::maybe_store(cfg, Capability::SystemPrices),
            weather: Self::maybe_store(cfg, Capability::WeatherForecast),
        };
        Self { inner, stores }
    }
}

/// Serve `key` from `store`, falling back to `fetch` and caching only `Ok`.
async fn cached<K, T, F, Fut>(
    store: Option<&Cache<K, Arc<Vec<T>>>>,
    key: K,
    fetch: F,
) -> Result<Vec<T>, SlotwiseError>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, SlotwiseError>>,
{
    let Some(store) = store else {
        return fetch().await;
    };
    if let Some(hit) = store.get(&key).await {
        #[cfg(feature = "tracing")]
        tracing::trace!(entries = hit.len(), "cache hit");
        return Ok((*hit).clone());
    }
    let value = fetch().await?;
    store.insert(key, Arc::new(value.clone())).await;
    Ok(value)
}

impl SlotwiseConnector for CachingConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    slotwise_core::slotwise_connector_accessors!(inner);
}

#[async_trait]
impl TariffProvider for CachingConnector {
    async fn tariff_rates(&self, req: &TariffRequest) -> Result<Vec<TariffRate>, SlotwiseError> {
        let inner = self
            .inner
            .as_tariff_provider()
            .ok_or_else(|| SlotwiseError::unsupported(Capability::TariffRates.as_str()))?;
        cached(self.stores.tariff.as_ref(), req.clone(), || {
            inner.tariff_rates(req)
        })
        .await
    }
}

#[async_trait]
impl SystemPriceProvider for CachingConnector {
    async fn system_prices(&self, date: NaiveDate) -> Result<Vec<SystemPrice>, SlotwiseError> {
        let inner = self
            .inner
            .as_system_price_provider()
            .ok_or_else(|| SlotwiseError::unsupported(Capability::SystemPrices.as_str()))?;
        cached(self.stores.system.as_ref(), (date, inner.source()), || {
            inner.system_prices(date)
        })
        .await
    }

    fn source(&self) -> SystemPriceSource {
        self.inner
            .as_system_price_provider()
            .map(|p| p.source())
            .unwrap_or_default()
    }
}

#[async_trait]
impl WeatherProvider for CachingConnector {
    async fn weather(&self, req: &WeatherRequest) -> Result<Vec<WeatherSample>, SlotwiseError> {
        let inner = self
            .inner
            .as_weather_provider()
            .ok_or_else(|| SlotwiseError::unsupported(Capability::WeatherForecast.as_str()))?;
        cached(self.stores.weather.as_ref(), WeatherKey::from(req), || {
            inner.weather(req)
        })
        .await
    }
}
