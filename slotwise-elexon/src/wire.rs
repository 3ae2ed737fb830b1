//! Response shapes of the Insights balancing endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use slotwise_core::SystemPrice;

/// £/MWh to p/kWh.
pub(crate) const GBP_PER_MWH_TO_P_PER_KWH: f64 = 0.1;

// `data` may be absent or null when nothing is published for the date.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default = "Option::default")]
    data: Option<Vec<T>>,
}

impl<T> Envelope<T> {
    pub fn into_rows(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SettlementRow {
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,
    #[serde(default)]
    pub settlement_period: Option<u8>,
    pub system_sell_price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarketIndexRow {
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub settlement_date: Option<NaiveDate>,
    #[serde(default)]
    pub settlement_period: Option<u8>,
    pub price: f64,
}

impl From<SettlementRow> for SystemPrice {
    fn from(r: SettlementRow) -> Self {
        Self {
            start: r.start_time,
            settlement_date: r.settlement_date,
            settlement_period: r.settlement_period,
            price_p_per_kwh: r.system_sell_price * GBP_PER_MWH_TO_P_PER_KWH,
        }
    }
}

impl From<MarketIndexRow> for SystemPrice {
    fn from(r: MarketIndexRow) -> Self {
        Self {
            start: r.start_time,
            settlement_date: r.settlement_date,
            settlement_period: r.settlement_period,
            price_p_per_kwh: r.price * GBP_PER_MWH_TO_P_PER_KWH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settlement_price_converts_to_pence_per_kwh() {
        let body = r#"{"data":[{
            "settlementDate":"2024-03-01",
            "settlementPeriod":3,
            "startTime":"2024-03-01T01:00:00Z",
            "createdDateTime":"2024-03-01T02:00:00Z",
            "systemSellPrice":85.5,
            "systemBuyPrice":85.5
        }]}"#;
        let env: Envelope<SettlementRow> = serde_json::from_str(body).unwrap();
        let p = SystemPrice::from(env.into_rows().remove(0));
        assert!((p.price_p_per_kwh - 8.55).abs() < 1e-9);
        assert_eq!(p.settlement_period, Some(3));
    }

    #[test]
    fn missing_or_null_data_is_empty() {
        let env: Envelope<MarketIndexRow> = serde_json::from_str("{}").unwrap();
        assert!(env.into_rows().is_empty());
        let env: Envelope<MarketIndexRow> = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(env.into_rows().is_empty());
    }
}
