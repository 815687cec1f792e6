//! Crop scoring integration tests
//!
//! Ranks small catalogs against farmland snapshots and checks the ordering
//! and weight rules of the scoring engine.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    rank_crops, score_crop, Crop, CropClimate, FarmlandClimate, FarmlandSnapshot,
    NutrientRequirement, Nutrients, PhRange, SoilProperties, SoilType, TemperatureRange,
};
use uuid::Uuid;

fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

fn crop(name: &str, soil_type: SoilType, ph_min: i64, ph_max: i64) -> Crop {
    Crop {
        id: Uuid::new_v4(),
        name: name.to_string(),
        ideal_soil_type: soil_type,
        ideal_ph_range: PhRange {
            min: dec(ph_min),
            max: dec(ph_max),
        },
        water_requirement: "moderate".to_string(),
        nutrient_requirement: NutrientRequirement {
            nitrogen: "40".to_string(),
            phosphorus: "20 kg/ha".to_string(),
            potassium: "20".to_string(),
        },
        climate: CropClimate {
            ideal_temperature: TemperatureRange {
                min: Some(dec(20)),
                max: Some(dec(30)),
            },
            rainfall: Some(dec(600)),
            humidity: Some(dec(50)),
        },
    }
}

fn farmland(soil_type: SoilType, ph: i64) -> FarmlandSnapshot {
    FarmlandSnapshot {
        soil_properties: SoilProperties {
            soil_type,
            ph: dec(ph),
            organic_matter: dec(3),
            nutrients: Nutrients {
                nitrogen: dec(50),
                phosphorus: dec(30),
                potassium: dec(25),
            },
        },
        climate: FarmlandClimate {
            avg_temperature: Some(dec(25)),
            rainfall: Some(dec(800)),
            humidity: Some(dec(60)),
        },
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_perfect_match_scores_100() {
    let wheat = crop("Wheat", SoilType::Loamy, 6, 7);
    assert_eq!(score_crop(&wheat, &farmland(SoilType::Loamy, 6)), 100);
}

#[test]
fn test_best_match_ranks_first() {
    let catalog = vec![
        crop("Rice", SoilType::Clay, 5, 6),
        crop("Wheat", SoilType::Loamy, 6, 7),
        crop("Millet", SoilType::Sandy, 8, 9),
    ];

    let ranked = rank_crops(catalog, &farmland(SoilType::Loamy, 7));
    let names: Vec<&str> = ranked.iter().map(|c| c.crop.name.as_str()).collect();

    assert_eq!(names[0], "Wheat");
    assert_eq!(ranked[0].score, 100);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_ties_keep_catalog_order() {
    let catalog = vec![
        crop("Barley", SoilType::Clay, 1, 2),
        crop("Oats", SoilType::Clay, 1, 2),
        crop("Rye", SoilType::Clay, 1, 2),
    ];

    let ranked = rank_crops(catalog, &farmland(SoilType::Loamy, 7));
    let names: Vec<&str> = ranked.iter().map(|c| c.crop.name.as_str()).collect();
    assert_eq!(names, ["Barley", "Oats", "Rye"]);
}

#[test]
fn test_missing_farmland_climate_never_meets_requirements() {
    let wheat = crop("Wheat", SoilType::Loamy, 6, 7);
    let mut snapshot = farmland(SoilType::Loamy, 6);
    snapshot.climate = FarmlandClimate::default();

    // soil 40 + pH 20 + nutrients 5
    assert_eq!(score_crop(&wheat, &snapshot), 65);
}

#[test]
fn test_crop_without_climate_requirements_accepts_any_climate() {
    let mut wheat = crop("Wheat", SoilType::Loamy, 6, 7);
    wheat.climate = CropClimate::default();
    let mut snapshot = farmland(SoilType::Loamy, 6);
    snapshot.climate = FarmlandClimate::default();

    assert_eq!(score_crop(&wheat, &snapshot), 100);
}

#[test]
fn test_unparseable_nutrient_requirement_fails_nutrient_criterion() {
    let mut wheat = crop("Wheat", SoilType::Loamy, 6, 7);
    wheat.nutrient_requirement.nitrogen = "high".to_string();

    assert_eq!(score_crop(&wheat, &farmland(SoilType::Loamy, 6)), 95);
}

#[test]
fn test_empty_catalog_ranks_nothing() {
    assert!(rank_crops(Vec::new(), &farmland(SoilType::Loamy, 6)).is_empty());
}

#[test]
fn test_each_unmet_criterion_costs_exactly_its_weight() {
    type Breaker = fn(&mut Crop, &mut FarmlandSnapshot);
    let cases: [(&str, u32, Breaker); 9] = [
        ("soil type differs", 40, |_, land| {
            land.soil_properties.soil_type = SoilType::Sandy;
        }),
        ("pH above range", 20, |_, land| land.soil_properties.ph = dec(8)),
        ("pH below range", 20, |_, land| land.soil_properties.ph = dec(5)),
        ("temperature above max", 15, |_, land| {
            land.climate.avg_temperature = Some(dec(35));
        }),
        ("temperature below min", 15, |_, land| {
            land.climate.avg_temperature = Some(dec(15));
        }),
        ("rainfall below requirement", 10, |_, land| {
            land.climate.rainfall = Some(dec(500));
        }),
        ("humidity below requirement", 10, |_, land| {
            land.climate.humidity = Some(dec(40));
        }),
        ("nitrogen short", 5, |_, land| {
            land.soil_properties.nutrients.nitrogen = dec(30);
        }),
        ("potassium requirement raised", 5, |crop, _| {
            crop.nutrient_requirement.potassium = "30".to_string();
        }),
    ];

    for (name, weight, break_criterion) in cases {
        let mut wheat = crop("Wheat", SoilType::Loamy, 6, 7);
        let mut snapshot = farmland(SoilType::Loamy, 6);
        assert_eq!(score_crop(&wheat, &snapshot), 100, "{}: baseline", name);

        break_criterion(&mut wheat, &mut snapshot);
        assert_eq!(score_crop(&wheat, &snapshot), 100 - weight, "{}", name);
    }
}

#[test]
fn test_climate_bounds_are_inclusive() {
    let wheat = crop("Wheat", SoilType::Loamy, 6, 7);
    let mut snapshot = farmland(SoilType::Loamy, 7);
    snapshot.climate = FarmlandClimate {
        avg_temperature: Some(dec(30)),
        rainfall: Some(dec(600)),
        humidity: Some(dec(50)),
    };

    assert_eq!(score_crop(&wheat, &snapshot), 100);
}

// ============================================================================
// Property Tests
// ============================================================================

fn soil_type_strategy() -> impl Strategy<Value = SoilType> {
    prop::sample::select(SoilType::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_score_is_one_of_the_weight_sums(
        crop_soil in soil_type_strategy(),
        land_soil in soil_type_strategy(),
        ph in 0i64..=14,
    ) {
        let score = score_crop(&crop("Any", crop_soil, 5, 8), &farmland(land_soil, ph));
        prop_assert!(score <= 100);
        prop_assert_eq!(score % 5, 0);
    }

    #[test]
    fn prop_ranking_is_deterministic(
        soils in prop::collection::vec(soil_type_strategy(), 0..8),
        land_soil in soil_type_strategy(),
        ph in 0i64..=14,
    ) {
        let catalog: Vec<Crop> = soils
            .iter()
            .enumerate()
            .map(|(i, soil)| crop(&format!("crop-{}", i), *soil, 5, 8))
            .collect();
        let snapshot = farmland(land_soil, ph);

        let first = rank_crops(catalog.clone(), &snapshot);
        let second = rank_crops(catalog, &snapshot);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_matching_soil_type_adds_its_weight(
        soil in soil_type_strategy(),
        ph in 0i64..=14,
    ) {
        let other = SoilType::ALL.into_iter().find(|s| *s != soil).unwrap();
        let snapshot = farmland(soil, ph);

        let matching = score_crop(&crop("A", soil, 5, 8), &snapshot);
        let mismatching = score_crop(&crop("B", other, 5, 8), &snapshot);
        prop_assert_eq!(matching, mismatching + 40);
    }
}
