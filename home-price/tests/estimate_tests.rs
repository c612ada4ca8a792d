mod common;

use std::cell::{Cell, RefCell};

use home_price::{
    encode, estimate, get_estimated_price, ArtifactPaths, Artifacts, ColumnSchema, EstimateRequest,
    EstimatorError, LocationMatch, Regressor,
};
use ndarray::{Array1, ArrayView2};
use rand::Rng;

/// Regressor that records every batch it receives.
struct RecordingModel {
    width: usize,
    output: f64,
    calls: Cell<usize>,
    last_rows: RefCell<Vec<Vec<f64>>>,
}

impl RecordingModel {
    fn new(width: usize, output: f64) -> Self {
        Self {
            width,
            output,
            calls: Cell::new(0),
            last_rows: RefCell::new(Vec::new()),
        }
    }
}

impl Regressor for RecordingModel {
    fn n_features(&self) -> usize {
        self.width
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        self.calls.set(self.calls.get() + 1);
        *self.last_rows.borrow_mut() = rows.outer_iter().map(|r| r.to_vec()).collect();
        Array1::from_elem(rows.nrows(), self.output)
    }
}

fn schema() -> ColumnSchema {
    ColumnSchema::new(
        ["total_sqft", "bath", "bhk", "1st phase jp nagar", "indira nagar"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .unwrap()
}

fn loaded() -> Artifacts {
    let dir = common::artifacts_dir();
    Artifacts::load(&ArtifactPaths::in_dir(
        dir.path(),
        "columns.json",
        "banglore_home_prices_model.json",
    ))
    .unwrap()
}

#[test]
fn known_location_feeds_one_hot_row_to_model() {
    let artifacts = Artifacts::from_parts(schema(), RecordingModel::new(5, 91.2345)).unwrap();
    let result = estimate(&artifacts, &EstimateRequest::new("Indira Nagar", 1000.0, 2, 2)).unwrap();

    assert_eq!(result.price, 91.23);
    assert_eq!(result.location, LocationMatch::Known { index: 4 });
    assert_eq!(artifacts.model().calls.get(), 1);
    assert_eq!(
        *artifacts.model().last_rows.borrow(),
        vec![vec![1000.0, 2.0, 2.0, 0.0, 1.0]]
    );
}

#[test]
fn unknown_location_still_predicts() {
    let artifacts = Artifacts::from_parts(schema(), RecordingModel::new(5, 50.0)).unwrap();
    let result = estimate(&artifacts, &EstimateRequest::new("Nonexistent Place", 1000.0, 2, 2)).unwrap();

    assert_eq!(result.location, LocationMatch::Unknown);
    assert_eq!(
        *artifacts.model().last_rows.borrow(),
        vec![vec![1000.0, 2.0, 2.0, 0.0, 0.0]]
    );
}

#[test]
fn zero_area_never_reaches_the_model() {
    let artifacts = Artifacts::from_parts(schema(), RecordingModel::new(5, 1.0)).unwrap();
    let err = estimate(&artifacts, &EstimateRequest::new("indira nagar", 0.0, 2, 2)).unwrap_err();

    assert!(matches!(err, EstimatorError::InvalidInput(_)));
    assert!(!err.is_fatal());
    assert_eq!(artifacts.model().calls.get(), 0);
}

#[test]
fn non_finite_output_is_a_prediction_error() {
    let artifacts = Artifacts::from_parts(schema(), RecordingModel::new(5, f64::NAN)).unwrap();
    let err = estimate(&artifacts, &EstimateRequest::new("indira nagar", 900.0, 1, 1)).unwrap_err();
    assert!(matches!(err, EstimatorError::Prediction(_)));
}

#[test]
fn linear_model_scenario() {
    let artifacts = loaded();
    // 0.05 * 1000 + 3 * 2 + 2 * 2 + 40 - 12.34
    let price = get_estimated_price(&artifacts, "Indira Nagar", 1000.0, 2, 2).unwrap();
    assert_eq!(price, 87.66);

    let fallback = get_estimated_price(&artifacts, "Nonexistent Place", 1000.0, 2, 2).unwrap();
    assert_eq!(fallback, 47.66);
}

#[test]
fn half_cent_model_output_rounds_to_even() {
    let artifacts = Artifacts::from_parts(schema(), RecordingModel::new(5, 12.125)).unwrap();
    let price = get_estimated_price(&artifacts, "indira nagar", 1000.0, 2, 2).unwrap();
    assert_eq!(price, 12.12);
}

#[test]
fn zero_room_counts_still_reach_the_model() {
    let artifacts = Artifacts::from_parts(schema(), RecordingModel::new(5, 33.0)).unwrap();
    let price = get_estimated_price(&artifacts, "indira nagar", 1000.0, 0, 2).unwrap();

    assert_eq!(price, 33.0);
    assert_eq!(artifacts.model().calls.get(), 1);
    assert_eq!(
        *artifacts.model().last_rows.borrow(),
        vec![vec![1000.0, 2.0, 0.0, 0.0, 1.0]]
    );
}

#[test]
fn prices_always_have_at_most_two_decimals() {
    let artifacts = loaded();
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let sqft = rng.gen_range(500.0..10_000.0);
        let price = get_estimated_price(&artifacts, "1st phase jp nagar", sqft, 3, 2).unwrap();
        let cents = price * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6, "{price} not rounded");
    }
}

#[test]
fn encoded_vectors_match_schema_layout() {
    let schema = schema();
    let names = ["Indira Nagar", "1ST PHASE JP NAGAR", "whitefield", "bath", ""];
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let location = names[rng.gen_range(0..names.len())];
        let sqft = rng.gen_range(500.0..10_000.0);
        let bhk = rng.gen_range(1..=5);
        let bath = rng.gen_range(1..=5);

        let (x, matched) = encode(&schema, location, sqft, bhk, bath);
        assert_eq!(x.len(), schema.len());
        assert_eq!(x[0], sqft);
        assert_eq!(x[1], f64::from(bath));
        assert_eq!(x[2], f64::from(bhk));

        let hot: Vec<usize> = (3..x.len()).filter(|&i| x[i] == 1.0).collect();
        let zeros = (3..x.len()).filter(|&i| x[i] == 0.0).count();
        assert_eq!(hot.len() + zeros, x.len() - 3);
        match matched {
            LocationMatch::Known { index } => {
                assert_eq!(hot, vec![index]);
                assert_eq!(schema.columns()[index], location.to_lowercase());
            }
            LocationMatch::Unknown => assert!(hot.is_empty()),
        }
    }
}
