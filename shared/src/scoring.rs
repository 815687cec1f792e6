//! Crop scoring engine
//!
//! Each crop in the catalog is scored against a farmland snapshot by six
//! independent criteria. A satisfied criterion adds its fixed weight; the
//! total is not normalized, so 100 is only reachable when the farmland
//! reports every climate reading the crop asks for.
//!
//! | Criterion   | Weight | Satisfied when                                         |
//! |-------------|--------|--------------------------------------------------------|
//! | Soil type   | 40     | farmland soil type equals the crop's ideal soil type   |
//! | pH          | 20     | farmland pH lies in the crop's inclusive pH range      |
//! | Temperature | 15     | average temperature within every bound the crop sets   |
//! | Rainfall    | 10     | crop has no requirement, or farmland rainfall ≥ it     |
//! | Humidity    | 10     | crop has no requirement, or farmland humidity ≥ it     |
//! | Nutrients   | 5      | N, P and K each meet the crop's parsed minimum         |
//!
//! A farmland reading that is absent never satisfies a requirement the crop
//! actually sets.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    parse_requirement, Crop, FarmlandClimate, FarmlandSnapshot, NutrientRequirement, Nutrients,
    TemperatureRange,
};

pub const SOIL_TYPE_WEIGHT: u32 = 40;
pub const PH_WEIGHT: u32 = 20;
pub const TEMPERATURE_WEIGHT: u32 = 15;
pub const RAINFALL_WEIGHT: u32 = 10;
pub const HUMIDITY_WEIGHT: u32 = 10;
pub const NUTRIENT_WEIGHT: u32 = 5;

/// Which criteria a crop satisfied for a given farmland
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaMatch {
    pub soil_type: bool,
    pub ph: bool,
    pub temperature: bool,
    pub rainfall: bool,
    pub humidity: bool,
    pub nutrients: bool,
}

impl CriteriaMatch {
    pub fn score(&self) -> u32 {
        [
            (self.soil_type, SOIL_TYPE_WEIGHT),
            (self.ph, PH_WEIGHT),
            (self.temperature, TEMPERATURE_WEIGHT),
            (self.rainfall, RAINFALL_WEIGHT),
            (self.humidity, HUMIDITY_WEIGHT),
            (self.nutrients, NUTRIENT_WEIGHT),
        ]
        .into_iter()
        .filter(|(matched, _)| *matched)
        .map(|(_, weight)| weight)
        .sum()
    }
}

/// A crop together with its score for one farmland
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCrop {
    pub crop: Crop,
    pub score: u32,
}

/// Evaluate every criterion for one crop
pub fn evaluate(crop: &Crop, farmland: &FarmlandSnapshot) -> CriteriaMatch {
    let soil = &farmland.soil_properties;
    let climate = &farmland.climate;

    CriteriaMatch {
        soil_type: crop.ideal_soil_type == soil.soil_type,
        ph: crop.ideal_ph_range.contains(soil.ph),
        temperature: temperature_fits(&crop.climate.ideal_temperature, climate),
        rainfall: meets_minimum(crop.climate.rainfall, climate.rainfall),
        humidity: meets_minimum(crop.climate.humidity, climate.humidity),
        nutrients: nutrients_sufficient(&crop.nutrient_requirement, &soil.nutrients),
    }
}

/// Total score of one crop for a farmland
pub fn score_crop(crop: &Crop, farmland: &FarmlandSnapshot) -> u32 {
    evaluate(crop, farmland).score()
}

/// Score the whole catalog and order it best match first.
///
/// The sort is stable, so crops with equal scores keep their catalog order.
pub fn rank_crops<I>(catalog: I, farmland: &FarmlandSnapshot) -> Vec<ScoredCrop>
where
    I: IntoIterator<Item = Crop>,
{
    let mut scored: Vec<ScoredCrop> = catalog
        .into_iter()
        .map(|crop| {
            let score = score_crop(&crop, farmland);
            ScoredCrop { crop, score }
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

fn temperature_fits(range: &TemperatureRange, climate: &FarmlandClimate) -> bool {
    let above_min = match range.min {
        None => true,
        Some(min) => climate.avg_temperature.is_some_and(|t| t >= min),
    };
    let below_max = match range.max {
        None => true,
        Some(max) => climate.avg_temperature.is_some_and(|t| t <= max),
    };
    above_min && below_max
}

fn meets_minimum(required: Option<Decimal>, actual: Option<Decimal>) -> bool {
    match required {
        None => true,
        Some(required) => actual.is_some_and(|value| value >= required),
    }
}

fn nutrients_sufficient(required: &NutrientRequirement, available: &Nutrients) -> bool {
    [
        (&required.nitrogen, available.nitrogen),
        (&required.phosphorus, available.phosphorus),
        (&required.potassium, available.potassium),
    ]
    .into_iter()
    .all(|(raw, have)| parse_requirement(raw).is_some_and(|min| Decimal::from(min) <= have))
}
