//! Response shapes of the standard-unit-rates endpoint.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use slotwise_core::TariffRate;

#[derive(Debug, Deserialize)]
pub(crate) struct RatePage {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<WireRate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRate {
    pub valid_from: DateTime<Utc>,
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
    pub value_inc_vat: f64,
    #[serde(default)]
    pub value_exc_vat: Option<f64>,
}

impl From<WireRate> for TariffRate {
    fn from(w: WireRate) -> Self {
        Self {
            valid_from: w.valid_from,
            valid_to: w.valid_to,
            value_inc_vat: w.value_inc_vat,
            value_exc_vat: w.value_exc_vat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_open_ended_rate_and_last_page() {
        let body = r#"{
            "count": 1,
            "next": null,
            "previous": null,
            "results": [{
                "value_exc_vat": 20.0,
                "value_inc_vat": 21.0,
                "valid_from": "2024-03-01T00:00:00Z",
                "valid_to": null,
                "payment_method": null
            }]
        }"#;
        let page: RatePage = serde_json::from_str(body).unwrap();
        assert!(page.next.is_none());
        let rate = TariffRate::from(page.results.into_iter().next().unwrap());
        assert_eq!(rate.value_inc_vat, 21.0);
        assert_eq!(rate.valid_to, None);
    }
}
