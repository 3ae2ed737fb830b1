use slotwise_core::{
    Capability, Coordinates, GspRegion, PipelineInputs, ScoreReport, SlotwiseError,
    TariffRequest, TimeWindow, WeatherRequest, compute,
};

use crate::Slotwise;
use crate::core::with_request_deadline;

/// Parameters of one scoring run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    /// Tariff and window to score.
    pub tariff: TariffRequest,
    /// Forecast location; weather is skipped when absent.
    pub location: Option<Coordinates>,
}

impl RunRequest {
    /// Build a request for `product_code` in `region` over `window`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the product code is empty.
    pub fn new(
        product_code: impl AsRef<str>,
        region: GspRegion,
        window: TimeWindow,
    ) -> Result<Self, SlotwiseError> {
        Ok(Self {
            tariff: TariffRequest::new(product_code, region, window)?,
            location: None,
        })
    }

    /// Attach a forecast location.
    #[must_use]
    pub const fn at(mut self, location: Coordinates) -> Self {
        self.location = Some(location);
        self
    }

    /// Window being scored.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.tariff.window
    }
}

impl Slotwise {
    /// Fetch every input the configured scoring mode needs and score the window.
    ///
    /// Fetches run concurrently. Tariff failure aborts the run. System prices
    /// are fetched per settlement date: failed dates become report warnings
    /// unless all of them fail. Weather failure is a warning and leaves the
    /// preference score on its neutral defaults. Empty upstream data is not an
    /// error; it is reported through [`ScoreReport::status`].
    ///
    /// # Errors
    /// Returns the tariff error, the collapsed system-price error when no date
    /// could be fetched, or `RequestTimeout` when the fetch phase exceeds the
    /// configured deadline.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "slotwise::run",
            skip(self, req),
            fields(
                tariff = %req.tariff.tariff_code(),
                mode = self.cfg.pipeline.scoring.name(),
            ),
        )
    )]
    pub async fn run(&self, req: &RunRequest) -> Result<ScoreReport, SlotwiseError> {
        let window = req.window();
        let needs = self.cfg.pipeline.scoring.capabilities();
        let wants = |cap: Capability| needs.contains(&cap);

        let tariff_fut = self.tariff_rates(&req.tariff);
        let system_fut = async {
            if wants(Capability::SystemPrices) {
                self.system_prices_across(&window).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let weather_fut = async {
            match req.location {
                Some(coordinates) if wants(Capability::WeatherForecast) => Some(
                    self.weather(&WeatherRequest {
                        coordinates,
                        window,
                    })
                    .await,
                ),
                _ => None,
            }
        };

        let (tariff, system, weather) = with_request_deadline(
            self.cfg.request_timeout,
            async { tokio::join!(tariff_fut, system_fut, weather_fut) },
        )
        .await
        .map_err(|_| SlotwiseError::request_timeout("run"))?;

        let mut warnings: Vec<SlotwiseError> = Vec::new();
        let mut inputs = PipelineInputs::new().with_tariff(&tariff?);

        if let Some(fetch) = system? {
            inputs = inputs.with_system_prices(&fetch.prices);
            warnings.extend(fetch.failures.into_iter().map(|(_, e)| e));
        }

        match weather {
            Some(Ok(samples)) => inputs = inputs.with_weather(&samples),
            Some(Err(e)) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "weather unavailable; using neutral defaults");
                warnings.push(e);
            }
            None => {}
        }

        let mut report = compute(window, &inputs, &self.cfg.pipeline);
        report.warnings = warnings;

        #[cfg(feature = "tracing")]
        tracing::info!(
            rows = report.rows.len(),
            warnings = report.warnings.len(),
            ready = report.is_ready(),
            "run complete"
        );
        Ok(report)
    }
}
