//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// GPS position of a farmland, stored as `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "GeoJsonPoint", try_from = "GeoJsonPoint")]
pub struct GeoPoint {
    pub longitude: Decimal,
    pub latitude: Decimal,
}

impl GeoPoint {
    pub fn new(longitude: Decimal, latitude: Decimal) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

/// Wire representation of a location: `{ "type": "Point", "coordinates": [lon, lat] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJsonPoint {
    #[serde(rename = "type", default = "GeoJsonPoint::point_kind")]
    pub kind: String,
    pub coordinates: Vec<Decimal>,
}

impl GeoJsonPoint {
    fn point_kind() -> String {
        "Point".to_string()
    }
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: Self::point_kind(),
            coordinates: vec![point.longitude, point.latitude],
        }
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = &'static str;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        crate::validation::validate_coordinates(&value.coordinates)
    }
}

/// Soil classes a farmland or crop can be described with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SoilType {
    Sandy,
    Clay,
    Loamy,
    Silty,
    Peaty,
}

impl SoilType {
    pub const ALL: [SoilType; 5] = [
        SoilType::Sandy,
        SoilType::Clay,
        SoilType::Loamy,
        SoilType::Silty,
        SoilType::Peaty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "sandy",
            SoilType::Clay => "clay",
            SoilType::Loamy => "loamy",
            SoilType::Silty => "silty",
            SoilType::Peaty => "peaty",
        }
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoilType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoilType::ALL
            .into_iter()
            .find(|soil| soil.as_str() == s)
            .ok_or("Invalid soil type. Choose from: sandy, clay, loamy, silty, peaty.")
    }
}

impl TryFrom<String> for SoilType {
    type Error = &'static str;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Plain `{ success, message }` body used by endpoints that return no payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
