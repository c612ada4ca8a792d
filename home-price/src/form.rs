//! Input rules and result formatting for the estimate form.

use crate::config::FormConfig;
use crate::encoder::EstimateRequest;
use crate::error::{EstimatorError, Result};

/// Check a request against the form's bounds. Runs before the request is
/// handed to the estimator, which applies its own area check.
pub fn check_bounds(form: &FormConfig, request: &EstimateRequest) -> Result<()> {
    if let Some(sqft) = request.sqft {
        if sqft.is_finite() && sqft > 0.0 && !(form.min_sqft..=form.max_sqft).contains(&sqft) {
            return Err(EstimatorError::InvalidInput(format!(
                "area must be between {} and {} square feet",
                form.min_sqft, form.max_sqft
            )));
        }
    }
    for (name, value) in [("BHK", request.bhk), ("bathrooms", request.bath)] {
        if !(1..=form.max_rooms).contains(&value) {
            return Err(EstimatorError::InvalidInput(format!(
                "{name} must be between 1 and {}",
                form.max_rooms
            )));
        }
    }
    Ok(())
}

/// Format a price as `₹ 1,234.56 Lakh`.
pub fn format_price(price: f64) -> String {
    format!("₹ {} Lakh", group_thousands(price))
}

/// Two decimals with comma separators between thousands.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && fixed != "0.00" {
        grouped.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push('.');
    grouped.push_str(frac_part);
    grouped
}
