//! Feature encoding and price prediction.

use log::{debug, warn};
use ndarray::{Array1, Axis};

use crate::artifacts::{Artifacts, ColumnSchema};
use crate::error::{EstimatorError, Result};
use crate::model::Regressor;

/// One row of model input, laid out like the column schema.
pub type FeatureVector = Array1<f64>;

/// Whether the requested location matched a schema column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationMatch {
    /// The location's indicator at this schema index was set.
    Known { index: usize },
    /// No column matched; only the numeric features drive the estimate.
    Unknown,
}

impl LocationMatch {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }
}

/// A single estimate request as entered by the user.
#[derive(Clone, Debug, PartialEq)]
pub struct EstimateRequest {
    pub location: String,
    /// Area in square feet; `None` when the field was left empty.
    pub sqft: Option<f64>,
    pub bhk: u32,
    pub bath: u32,
}

impl EstimateRequest {
    pub fn new(location: impl Into<String>, sqft: f64, bhk: u32, bath: u32) -> Self {
        Self {
            location: location.into(),
            sqft: Some(sqft),
            bhk,
            bath,
        }
    }

    /// Reject requests that must never reach the model and return the area.
    /// Room counts are passed through as given.
    pub fn validate(&self) -> Result<f64> {
        let sqft = match self.sqft {
            Some(sqft) if sqft.is_finite() && sqft > 0.0 => sqft,
            _ => {
                return Err(EstimatorError::InvalidInput(
                    "Please enter a valid area in square feet.".to_string(),
                ))
            }
        };
        Ok(sqft)
    }
}

/// A price in Lakhs plus how the location was interpreted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Estimate {
    pub price: f64,
    pub location: LocationMatch,
}

/// Build the feature vector for one request.
///
/// Slots 0..3 hold area, bath and bhk. At most one location indicator is
/// set; an unrecognised location leaves all of them at zero.
pub fn encode(
    schema: &ColumnSchema,
    location: &str,
    sqft: f64,
    bhk: u32,
    bath: u32,
) -> (FeatureVector, LocationMatch) {
    let mut x = Array1::<f64>::zeros(schema.len());
    x[0] = sqft;
    x[1] = f64::from(bath);
    x[2] = f64::from(bhk);

    let matched = match schema.location_index(location) {
        Some(index) => {
            x[index] = 1.0;
            LocationMatch::Known { index }
        }
        None => {
            warn!("location {location:?} not in schema, estimating from numeric features only");
            LocationMatch::Unknown
        }
    };
    (x, matched)
}

/// Round to two decimal places; exact half-cent ties go to the even cent.
pub fn round_price(raw: f64) -> f64 {
    (raw * 100.0).round_ties_even() / 100.0
}

/// Validate, encode and predict a single request.
pub fn estimate<M: Regressor>(artifacts: &Artifacts<M>, request: &EstimateRequest) -> Result<Estimate> {
    let sqft = request.validate()?;
    let (x, location) = encode(
        artifacts.schema(),
        &request.location,
        sqft,
        request.bhk,
        request.bath,
    );
    debug!("feature vector: {x}");

    let rows = x.insert_axis(Axis(0));
    let out = artifacts.model().predict(rows.view());
    let raw = out
        .get(0)
        .copied()
        .ok_or_else(|| EstimatorError::Prediction("model returned no output".to_string()))?;
    if !raw.is_finite() {
        return Err(EstimatorError::Prediction(format!("model returned {raw}")));
    }

    Ok(Estimate {
        price: round_price(raw),
        location,
    })
}

/// Price-only form of [`estimate`].
pub fn get_estimated_price<M: Regressor>(
    artifacts: &Artifacts<M>,
    location: &str,
    sqft: f64,
    bhk: u32,
    bath: u32,
) -> Result<f64> {
    estimate(artifacts, &EstimateRequest::new(location, sqft, bhk, bath)).map(|e| e.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn schema() -> ColumnSchema {
        ColumnSchema::new(
            ["total_sqft", "bath", "bhk", "1st phase jp nagar", "indira nagar"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn known_location_sets_its_indicator() {
        let (x, m) = encode(&schema(), "Indira Nagar", 1000.0, 2, 2);
        assert_eq!(x, array![1000.0, 2.0, 2.0, 0.0, 1.0]);
        assert_eq!(m, LocationMatch::Known { index: 4 });
    }

    #[test]
    fn unknown_location_leaves_indicators_zero() {
        let (x, m) = encode(&schema(), "Nonexistent Place", 1000.0, 2, 2);
        assert_eq!(x, array![1000.0, 2.0, 2.0, 0.0, 0.0]);
        assert!(!m.is_known());
    }

    #[test]
    fn bath_and_bhk_keep_column_order() {
        let (x, _) = encode(&schema(), "indira nagar", 1200.0, 3, 1);
        assert_eq!(x[1], 1.0);
        assert_eq!(x[2], 3.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_price(83.86570258311222), 83.87);
        assert_eq!(round_price(-1.234), -1.23);
        assert_eq!(round_price(42.0), 42.0);
    }

    #[test]
    fn half_cent_ties_round_to_even() {
        assert_eq!(round_price(12.125), 12.12);
        assert_eq!(round_price(0.125), 0.12);
        assert_eq!(round_price(0.375), 0.38);
        assert_eq!(round_price(-2.625), -2.62);
    }

    #[test]
    fn zero_area_is_invalid() {
        assert!(EstimateRequest::new("x", 0.0, 2, 2).validate().is_err());
        assert!(EstimateRequest::new("x", f64::NAN, 2, 2).validate().is_err());
        let empty = EstimateRequest {
            sqft: None,
            ..EstimateRequest::new("x", 1.0, 2, 2)
        };
        assert!(empty.validate().is_err());
        assert_eq!(EstimateRequest::new("x", 750.0, 1, 1).validate().unwrap(), 750.0);
    }

    #[test]
    fn room_counts_are_not_validated() {
        assert_eq!(EstimateRequest::new("x", 750.0, 0, 0).validate().unwrap(), 750.0);
        assert_eq!(EstimateRequest::new("x", 750.0, 9, 12).validate().unwrap(), 750.0);
    }
}
