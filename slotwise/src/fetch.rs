use std::sync::Arc;

use chrono::NaiveDate;
use slotwise_core::{
    Capability, SlotwiseConnector, SlotwiseError, SystemPrice, TariffRate, TariffRequest,
    TimeWindow, WeatherRequest, WeatherSample,
};

use crate::Slotwise;
use crate::util::collapse_errors;

/// Build the per-connector call closure for `fetch_single`.
///
/// Yields `None` for connectors lacking the capability so they are skipped
/// without counting as an attempt. Listed `clone` captures are cloned per call.
macro_rules! provider_call {
    ($accessor:ident, $capability:expr, |$p:ident| $call:expr $(, clone: $($v:ident),+)?) => {
        move |c: Arc<dyn SlotwiseConnector>| {
            c.$accessor()?;
            $($( let $v = $v.clone(); )+)?
            Some(async move {
                match c.$accessor() {
                    Some($p) => $call.await,
                    None => Err(SlotwiseError::connector(
                        c.name(),
                        format!("missing {} capability during call", $capability),
                    )),
                }
            })
        }
    };
}

/// System prices gathered across the settlement dates of a window.
#[derive(Debug, Default)]
pub(crate) struct SystemPriceFetch {
    pub prices: Vec<SystemPrice>,
    /// One entry per settlement date that failed.
    pub failures: Vec<(NaiveDate, SlotwiseError)>,
}

impl Slotwise {
    /// Fetch tariff unit rates, falling back across providers.
    ///
    /// # Errors
    /// Returns an error if no eligible provider succeeds or none support the capability.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "slotwise::fetch",
            skip(self, req),
            fields(tariff = %req.tariff_code()),
        )
    )]
    pub async fn tariff_rates(&self, req: &TariffRequest) -> Result<Vec<TariffRate>, SlotwiseError> {
        let cap = Capability::TariffRates;
        let not_found = format!("tariff {}", req.tariff_code());
        let req = req.clone();
        self.fetch_single(
            cap,
            not_found,
            provider_call!(as_tariff_provider, cap, |p| p.tariff_rates(&req), clone: req),
        )
        .await
    }

    /// Fetch system prices for one settlement date, falling back across providers.
    ///
    /// # Errors
    /// Returns an error if no eligible provider succeeds or none support the capability.
    pub async fn system_prices_for(&self, date: NaiveDate) -> Result<Vec<SystemPrice>, SlotwiseError> {
        let cap = Capability::SystemPrices;
        self.fetch_single(
            cap,
            format!("system prices for {date}"),
            provider_call!(as_system_price_provider, cap, |p| p.system_prices(date)),
        )
        .await
    }

    /// Fetch hourly weather samples, falling back across providers.
    ///
    /// # Errors
    /// Returns an error if no eligible provider succeeds or none support the capability.
    pub async fn weather(&self, req: &WeatherRequest) -> Result<Vec<WeatherSample>, SlotwiseError> {
        let cap = Capability::WeatherForecast;
        let req = req.clone();
        self.fetch_single(
            cap,
            "weather forecast".to_string(),
            provider_call!(as_weather_provider, cap, |p| p.weather(&req), clone: req),
        )
        .await
    }

    /// Fetch every settlement date touched by `window` concurrently.
    ///
    /// A failing date is recorded and the others are kept. Only when every
    /// date fails is the collapsed error returned. Prices are sorted by start
    /// with duplicates across dates removed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "slotwise::fetch", skip(self, window))
    )]
    pub(crate) async fn system_prices_across(
        &self,
        window: &TimeWindow,
    ) -> Result<SystemPriceFetch, SlotwiseError> {
        let dates = window.settlement_dates();
        let tasks = dates.iter().map(|d| {
            let date = *d;
            async move { (date, self.system_prices_for(date).await) }
        });
        let results = futures::future::join_all(tasks).await;

        let mut out = SystemPriceFetch::default();
        for (date, res) in results {
            match res {
                Ok(mut prices) => out.prices.append(&mut prices),
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%date, error = %e, "system prices unavailable for date");
                    out.failures.push((date, e));
                }
            }
        }

        if !dates.is_empty() && out.failures.len() == dates.len() {
            return Err(collapse_errors(
                Capability::SystemPrices,
                true,
                out.failures.into_iter().map(|(_, e)| e).collect(),
                Some(format!(
                    "system prices for {} to {}",
                    window.start(),
                    window.end()
                )),
            ));
        }

        out.prices.sort_by_key(|p| p.start);
        out.prices.dedup_by_key(|p| p.start);
        Ok(out)
    }
}
