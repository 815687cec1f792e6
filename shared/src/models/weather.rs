//! Weather data models
//!
//! Mirrors the subset of the OpenWeatherMap current-weather payload the
//! platform reads, so responses can be cached and returned as-is.

use serde::{Deserialize, Serialize};

/// Current weather for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
    pub wind: Wind,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub pressure: Option<i32>,
    #[serde(default)]
    pub humidity: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<i32>,
}

impl WeatherResponse {
    /// Description of the primary weather condition, if the provider sent one
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|w| w.description.as_str())
    }
}
