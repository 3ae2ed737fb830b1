use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use slotwise_core::connector::{
    SlotwiseConnector, SystemPriceProvider, TariffProvider, WeatherProvider,
};
use slotwise_core::{
    Capability, SlotwiseError, SystemPrice, TariffRate, TariffRequest, WeatherRequest,
    WeatherSample,
};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(SlotwiseError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

impl<T> MockBehavior<T> {
    async fn resolve(self) -> Result<T, SlotwiseError> {
        match self {
            Self::Return(v) => Ok(v),
            Self::Fail(e) => Err(e),
            Self::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[derive(Default)]
struct InternalState {
    tariff: Option<MockBehavior<Vec<TariffRate>>>,
    system_by_date: HashMap<NaiveDate, MockBehavior<Vec<SystemPrice>>>,
    system_default: Option<MockBehavior<Vec<SystemPrice>>>,
    weather: Option<MockBehavior<Vec<WeatherSample>>>,
    calls: HashMap<Capability, usize>,
    system_dates: Vec<NaiveDate>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `tariff_rates` calls.
    pub async fn set_tariff_behavior(&self, behavior: MockBehavior<Vec<TariffRate>>) {
        self.state.lock().await.tariff = Some(behavior);
    }

    /// Set the behavior for `system_prices` on one settlement date.
    pub async fn set_system_price_behavior(
        &self,
        date: NaiveDate,
        behavior: MockBehavior<Vec<SystemPrice>>,
    ) {
        self.state
            .lock()
            .await
            .system_by_date
            .insert(date, behavior);
    }

    /// Set the behavior for `system_prices` on dates without a specific rule.
    pub async fn set_default_system_price_behavior(&self, behavior: MockBehavior<Vec<SystemPrice>>) {
        self.state.lock().await.system_default = Some(behavior);
    }

    /// Set the behavior for `weather` calls.
    pub async fn set_weather_behavior(&self, behavior: MockBehavior<Vec<WeatherSample>>) {
        self.state.lock().await.weather = Some(behavior);
    }

    /// Number of calls received for `cap`.
    pub async fn calls(&self, cap: Capability) -> usize {
        self.state
            .lock()
            .await
            .calls
            .get(&cap)
            .copied()
            .unwrap_or(0)
    }

    /// Settlement dates requested so far, in call order.
    pub async fn system_price_dates(&self) -> Vec<NaiveDate> {
        self.state.lock().await.system_dates.clone()
    }

    /// Clear all configured behaviors and call logs.
    pub async fn clear_all_behaviors(&self) {
        *self.state.lock().await = InternalState::default();
    }
}

/// A connector that defers all behavior to an external controller.
///
/// Capabilities without a configured behavior return an empty vector.
pub struct DynamicMockConnector {
    name: &'static str,
    capabilities: Vec<Capability>,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a dynamic mock advertising every capability, and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn SlotwiseConnector>, DynamicMockController) {
        Self::new_with_capabilities(
            name,
            &[
                Capability::TariffRates,
                Capability::SystemPrices,
                Capability::WeatherForecast,
            ],
        )
    }

    /// Create a dynamic mock advertising only `capabilities`, and its controller.
    #[must_use]
    pub fn new_with_capabilities(
        name: &'static str,
        capabilities: &[Capability],
    ) -> (Arc<dyn SlotwiseConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self {
            name,
            capabilities: capabilities.to_vec(),
            state,
        });
        (me as Arc<dyn SlotwiseConnector>, controller)
    }

    async fn record(&self, cap: Capability) {
        *self.state.lock().await.calls.entry(cap).or_insert(0) += 1;
    }
}

#[async_trait]
impl SlotwiseConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_tariff_provider(&self) -> Option<&dyn TariffProvider> {
        self.capabilities
            .contains(&Capability::TariffRates)
            .then_some(self as &dyn TariffProvider)
    }

    fn as_system_price_provider(&self) -> Option<&dyn SystemPriceProvider> {
        self.capabilities
            .contains(&Capability::SystemPrices)
            .then_some(self as &dyn SystemPriceProvider)
    }

    fn as_weather_provider(&self) -> Option<&dyn WeatherProvider> {
        self.capabilities
            .contains(&Capability::WeatherForecast)
            .then_some(self as &dyn WeatherProvider)
    }
}

#[async_trait]
impl TariffProvider for DynamicMockConnector {
    async fn tariff_rates(&self, _req: &TariffRequest) -> Result<Vec<TariffRate>, SlotwiseError> {
        self.record(Capability::TariffRates).await;
        // Snapshot the behavior without holding the lock across await points
        let behavior = self.state.lock().await.tariff.clone();
        behavior.unwrap_or(MockBehavior::Return(Vec::new())).resolve().await
    }
}

#[async_trait]
impl SystemPriceProvider for DynamicMockConnector {
    async fn system_prices(&self, date: NaiveDate) -> Result<Vec<SystemPrice>, SlotwiseError> {
        self.record(Capability::SystemPrices).await;
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.system_dates.push(date);
            guard
                .system_by_date
                .get(&date)
                .or(guard.system_default.as_ref())
                .cloned()
        };
        behavior.unwrap_or(MockBehavior::Return(Vec::new())).resolve().await
    }
}

#[async_trait]
impl WeatherProvider for DynamicMockConnector {
    async fn weather(&self, _req: &WeatherRequest) -> Result<Vec<WeatherSample>, SlotwiseError> {
        self.record(Capability::WeatherForecast).await;
        let behavior = self.state.lock().await.weather.clone();
        behavior.unwrap_or(MockBehavior::Return(Vec::new())).resolve().await
    }
}
