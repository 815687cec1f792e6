//! Deterministic cache keys for cached lookups and attempt counters

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::FarmlandSnapshot;

pub const CROP_ADVICE_PREFIX: &str = "crop_advice:";
pub const WEATHER_PREFIX: &str = "weather:";
pub const LOGIN_ATTEMPTS_PREFIX: &str = "login_attempts:";

/// Serialize with object keys in sorted order.
///
/// Going through `serde_json::Value` sorts every map, so two values that
/// differ only in field order produce the same text.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&value)
}

/// Key for an AI crop recommendation.
///
/// Only soil and climate take part, so farmlands with identical conditions
/// share one entry.
pub fn crop_advice_key(snapshot: &FarmlandSnapshot) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(&normalized(snapshot))?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(format!("{}{}", CROP_ADVICE_PREFIX, to_hex(&digest)))
}

/// Key for current weather; the city is used verbatim
pub fn weather_key(city: &str) -> String {
    format!("{}{}", WEATHER_PREFIX, city)
}

/// Key for the failed login counter of an identity
pub fn login_attempts_key(identity: &str) -> String {
    format!("{}{}", LOGIN_ATTEMPTS_PREFIX, identity)
}

// 6.50 and 6.5 must hash the same
fn normalized(snapshot: &FarmlandSnapshot) -> FarmlandSnapshot {
    let mut snapshot = snapshot.clone();
    let soil = &mut snapshot.soil_properties;
    soil.ph = soil.ph.normalize();
    soil.organic_matter = soil.organic_matter.normalize();
    soil.nutrients.nitrogen = soil.nutrients.nitrogen.normalize();
    soil.nutrients.phosphorus = soil.nutrients.phosphorus.normalize();
    soil.nutrients.potassium = soil.nutrients.potassium.normalize();

    let climate = &mut snapshot.climate;
    climate.avg_temperature = climate.avg_temperature.map(|v| v.normalize());
    climate.rainfall = climate.rainfall.map(|v| v.normalize());
    climate.humidity = climate.humidity.map(|v| v.normalize());
    snapshot
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FarmlandClimate, Nutrients, SoilProperties};
    use crate::types::SoilType;
    use rust_decimal::Decimal;

    fn snapshot(ph: Decimal) -> FarmlandSnapshot {
        FarmlandSnapshot {
            soil_properties: SoilProperties {
                soil_type: SoilType::Silty,
                ph,
                organic_matter: Decimal::from(2),
                nutrients: Nutrients::default(),
            },
            climate: FarmlandClimate {
                avg_temperature: Some(Decimal::from(18)),
                rainfall: None,
                humidity: Some(Decimal::from(70)),
            },
        }
    }

    #[test]
    fn equal_snapshots_share_a_key() {
        let a = crop_advice_key(&snapshot(Decimal::new(65, 1))).unwrap();
        let b = crop_advice_key(&snapshot(Decimal::new(650, 2))).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(CROP_ADVICE_PREFIX));
        assert_eq!(a.len(), CROP_ADVICE_PREFIX.len() + 64);
    }

    #[test]
    fn different_snapshots_get_different_keys() {
        let a = crop_advice_key(&snapshot(Decimal::new(65, 1))).unwrap();
        let b = crop_advice_key(&snapshot(Decimal::new(66, 1))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let value = serde_json::json!({"b": 1, "a": {"d": 2, "c": 3}});
        assert_eq!(canonical_json(&value).unwrap(), r#"{"a":{"c":3,"d":2},"b":1}"#);
    }

    #[test]
    fn weather_key_keeps_city_verbatim() {
        assert_eq!(weather_key("New Delhi"), "weather:New Delhi");
        assert_ne!(weather_key("pune"), weather_key("Pune"));
    }
}
