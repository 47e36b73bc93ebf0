use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::NaiveDate;

use super::{DATE_FORMAT, PriceSnapshot, RecordStore};
use crate::fuel::Fuel;

/// [`RecordStore`] backed by a DynamoDB table.
///
/// Every attribute is string-typed on the wire: `id` is a string-encoded
/// integer, `date` is `DD/MM/YYYY`, and each price column is a string
/// decimal. Scans page through the whole table; there is no server-side
/// ordering or filtering at this scale.
pub struct DynamoStore {
    client: aws_sdk_dynamodb::Client,
    table: String,
}

impl DynamoStore {
    /// Creates a store using the ambient AWS configuration (env vars,
    /// instance profile, etc.) already loaded by `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig, table: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_dynamodb::Client::new(config),
            table: table.into(),
        }
    }
}

#[async_trait::async_trait]
impl RecordStore for DynamoStore {
    async fn scan(&self) -> Result<Vec<PriceSnapshot>> {
        let mut snapshots = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let resp = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .with_context(|| format!("DynamoDB scan failed for table '{}'", self.table))?;

            for item in resp.items() {
                snapshots.push(from_item(item)?);
            }

            start_key = resp.last_evaluated_key().cloned();
            if start_key.is_none() {
                break;
            }
        }

        Ok(snapshots)
    }

    async fn insert(&self, snapshot: &PriceSnapshot) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(snapshot)))
            .send()
            .await
            .with_context(|| {
                format!(
                    "DynamoDB put_item failed for table '{}', id {}",
                    self.table, snapshot.id
                )
            })?;

        Ok(())
    }
}

/// Reads a string-typed attribute, returning `None` when the attribute is
/// absent or not stored as a DynamoDB string.
fn string_attr<'a>(item: &'a HashMap<String, AttributeValue>, key: &str) -> Option<&'a str> {
    item.get(key).and_then(|value| value.as_s().ok()).map(String::as_str)
}

fn from_item(item: &HashMap<String, AttributeValue>) -> Result<PriceSnapshot> {
    let id = string_attr(item, "id")
        .ok_or_else(|| anyhow!("stored record is missing the 'id' attribute"))?;
    let id: u64 = id
        .parse()
        .with_context(|| format!("stored record has a non-integer id '{id}'"))?;

    let date = string_attr(item, "date")
        .ok_or_else(|| anyhow!("stored record {id} is missing the 'date' attribute"))?;
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .with_context(|| format!("stored record {id} has an unparseable date '{date}'"))?;

    let mut snapshot = PriceSnapshot::new(id, date);
    for fuel in Fuel::TRACKED {
        if let Some(raw) = string_attr(item, fuel.column()) {
            let price: f64 = raw.parse().with_context(|| {
                format!("stored record {id} has a non-numeric '{}' value", fuel.column())
            })?;
            snapshot.set_price(fuel, price);
        }
    }

    Ok(snapshot)
}

fn to_item(snapshot: &PriceSnapshot) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert("id".to_string(), AttributeValue::S(snapshot.id.to_string()));
    item.insert(
        "date".to_string(),
        AttributeValue::S(snapshot.date.format(DATE_FORMAT).to_string()),
    );

    for fuel in Fuel::TRACKED {
        if let Some(price) = snapshot.price(fuel) {
            item.insert(
                fuel.column().to_string(),
                AttributeValue::S(decimal_string(price)),
            );
        }
    }

    item
}

/// String-decimal encoding used by the original table: integral values keep
/// a trailing `.0` (`"1650.0"`, not `"1650"`).
fn decimal_string(value: f64) -> String {
    if value == value.trunc() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> PriceSnapshot {
        let mut snap = PriceSnapshot::new(6, NaiveDate::from_ymd_opt(2023, 6, 5).unwrap());
        snap.set_price(Fuel::U91, 1650.0);
        snap.set_price(Fuel::U95, 1725.5);
        snap.set_price(Fuel::U98, 1800.25);
        snap.set_price(Fuel::Diesel, 1890.4);
        snap
    }

    #[test]
    fn test_item_round_trip() {
        let snapshot = sample_snapshot();
        let restored = from_item(&to_item(&snapshot)).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_wire_encoding_is_all_strings() {
        let item = to_item(&sample_snapshot());

        assert_eq!(item["id"], AttributeValue::S("6".to_string()));
        assert_eq!(item["date"], AttributeValue::S("05/06/2023".to_string()));
        assert_eq!(item["u91"], AttributeValue::S("1650.0".to_string()));
        assert_eq!(item["u98"], AttributeValue::S("1800.25".to_string()));
    }

    #[test]
    fn test_missing_fuel_column_round_trips_as_none() {
        let mut snapshot = PriceSnapshot::new(0, NaiveDate::from_ymd_opt(2023, 6, 5).unwrap());
        snapshot.set_price(Fuel::U98, 1650.0);

        let item = to_item(&snapshot);
        assert!(!item.contains_key("diesel"));

        let restored = from_item(&item).unwrap();
        assert_eq!(restored.price(Fuel::Diesel), None);
        assert_eq!(restored.price(Fuel::U98), Some(1650.0));
    }

    #[test]
    fn test_malformed_items_are_errors() {
        let mut item = to_item(&sample_snapshot());
        item.insert("id".to_string(), AttributeValue::S("six".to_string()));
        assert!(from_item(&item).is_err());

        let mut item = to_item(&sample_snapshot());
        item.remove("date");
        assert!(from_item(&item).is_err());

        let mut item = to_item(&sample_snapshot());
        item.insert("u98".to_string(), AttributeValue::S("N/A".to_string()));
        assert!(from_item(&item).is_err());
    }
}
