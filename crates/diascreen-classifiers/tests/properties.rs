//! Property tests for the threshold policy and model output range

use diascreen_classifiers::{decide, ModelArtifact, ScreeningService, ScreeningThreshold};
use diascreen_core::{RiskLabel, FEATURE_COLUMNS};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn label_is_high_iff_probability_reaches_threshold(p in 0.0f64..=1.0, t in 0.0f64..=1.0) {
        let result = decide(p, ScreeningThreshold::new(t).unwrap());
        let high = result.label == RiskLabel::HighRisk;
        prop_assert_eq!(high, p >= t);
        if high {
            prop_assert!(result.probability >= result.threshold_used);
        }
        prop_assert!((0.0..=1.0).contains(&result.probability));
    }

    #[test]
    fn scores_just_below_threshold_stay_low_risk(t in 0.001f64..=1.0, gap in 1e-9f64..0.0005) {
        let p = (t - gap).max(0.0);
        let result = decide(p, ScreeningThreshold::new(t).unwrap());
        prop_assert_eq!(result.label, RiskLabel::LowRisk);
    }

    #[test]
    fn forest_probability_stays_in_unit_interval(
        leaves in proptest::collection::vec(0.0f64..=1.0, 4),
        split in 15.0f64..45.0,
        age in 1.0f64..119.0,
        height in 0.6f64..2.4,
        weight in 21.0f64..299.0,
        t in 0.0f64..=1.0,
    ) {
        let artifact = json!({
            "kind": "forest",
            "features": FEATURE_COLUMNS,
            "categories": {
                "gender": ["Female", "Male", "Other"],
                "smoking_history": ["current", "ever", "former", "never", "not current"]
            },
            "trees": [
                { "nodes": [
                    { "feature": 3, "threshold": split, "left": 1, "right": 2 },
                    { "value": leaves[0] },
                    { "value": leaves[1] }
                ]},
                { "nodes": [
                    { "feature": 0, "threshold": 50.0, "left": 1, "right": 2 },
                    { "value": leaves[2] },
                    { "value": leaves[3] }
                ]}
            ]
        });
        let classifier = ModelArtifact::decode(&serde_json::to_vec(&artifact).unwrap()).unwrap();
        let service = ScreeningService::new(classifier, ScreeningThreshold::new(t).unwrap());

        let body = json!({
            "age": age,
            "gender": "Other",
            "height": height,
            "weight": weight,
            "smoking_history": "ever",
            "hypertension": "No",
            "heart_disease": "Yes"
        });

        let result = service.screen_raw(&body).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.probability));
        if result.label == RiskLabel::HighRisk {
            prop_assert!(result.probability >= result.threshold_used);
        }

        let again = service.screen_raw(&body).unwrap();
        prop_assert_eq!(result, again);
    }
}
