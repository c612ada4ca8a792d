use super::{load_artifacts, CompactModel};
use home_price::{estimate, Artifacts, EstimateRequest, EstimatorError, LocationMatch};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;

/// Schema file name expected next to the compact model.
pub const COLUMNS_FILE: &str = "columns.json";
/// Compact model file name written by the `pack` binary.
pub const COMPACT_MODEL_FILE: &str = "banglore_home_prices_model.hpm";

pub const ESTIMATE_OK: c_int = 0;
pub const ESTIMATE_UNKNOWN_LOCATION: c_int = 1;
pub const ESTIMATE_NULL_ARGUMENT: c_int = -1;
pub const ESTIMATE_INVALID_INPUT: c_int = -2;
pub const ESTIMATE_FAILED: c_int = -3;

pub struct Estimator {
    artifacts: Artifacts<CompactModel>,
}

/// Load `columns.json` and the compact model from `dir`. Returns null on
/// any failure.
#[no_mangle]
pub extern "C" fn estimator_load(dir: *const c_char) -> *mut Estimator {
    if dir.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(dir) };
    let dir = PathBuf::from(c_str.to_string_lossy().into_owned());
    match load_artifacts(&dir, COLUMNS_FILE, COMPACT_MODEL_FILE) {
        Ok(artifacts) => Box::into_raw(Box::new(Estimator { artifacts })),
        Err(e) => {
            log::error!("{e}");
            std::ptr::null_mut()
        }
    }
}

#[no_mangle]
pub extern "C" fn estimator_free(estimator: *mut Estimator) {
    if !estimator.is_null() {
        unsafe {
            drop(Box::from_raw(estimator));
        }
    }
}

/// Estimate a price into `out_price`. Returns `ESTIMATE_OK`, or
/// `ESTIMATE_UNKNOWN_LOCATION` when the price was computed without a
/// location indicator. Negative values are failures and leave `out_price`
/// untouched: `ESTIMATE_INVALID_INPUT` means the area was not a positive
/// number. Room counts are passed to the model unchecked.
#[no_mangle]
pub extern "C" fn estimator_estimate(
    estimator: *const Estimator,
    location: *const c_char,
    sqft: f64,
    bhk: u32,
    bath: u32,
    out_price: *mut f64,
) -> c_int {
    if estimator.is_null() || location.is_null() || out_price.is_null() {
        return ESTIMATE_NULL_ARGUMENT;
    }
    let estimator = unsafe { &*estimator };
    let location = unsafe { CStr::from_ptr(location) }.to_string_lossy();
    let request = EstimateRequest::new(location, sqft, bhk, bath);
    match estimate(&estimator.artifacts, &request) {
        Ok(result) => {
            unsafe {
                *out_price = result.price;
            }
            match result.location {
                LocationMatch::Known { .. } => ESTIMATE_OK,
                LocationMatch::Unknown => ESTIMATE_UNKNOWN_LOCATION,
            }
        }
        Err(EstimatorError::InvalidInput(_)) => ESTIMATE_INVALID_INPUT,
        Err(e) => {
            log::error!("{e}");
            ESTIMATE_FAILED
        }
    }
}

#[no_mangle]
pub extern "C" fn estimator_location_count(estimator: *const Estimator) -> usize {
    if estimator.is_null() {
        return 0;
    }
    unsafe { &*estimator }.artifacts.locations().len()
}

/// Name of the location at `index`, to be released with [`string_free`].
/// Null when out of range.
#[no_mangle]
pub extern "C" fn estimator_location_name(estimator: *const Estimator, index: usize) -> *mut c_char {
    if estimator.is_null() {
        return std::ptr::null_mut();
    }
    let estimator = unsafe { &*estimator };
    match estimator.artifacts.locations().get(index) {
        Some(name) => CString::new(name.as_str())
            .map(CString::into_raw)
            .unwrap_or(std::ptr::null_mut()),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            drop(CString::from_raw(ptr));
        }
    }
}
