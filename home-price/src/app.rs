//! The estimate form as a text session: a request goes in, the message the
//! user should see comes out.

use std::io::{self, BufRead, Write};

use log::error;

use crate::artifacts::Artifacts;
use crate::config::EstimatorConfig;
use crate::encoder::{estimate, Estimate, EstimateRequest, LocationMatch};
use crate::error::{EstimatorError, Result};
use crate::form::{check_bounds, format_price};
use crate::model::{LinearRegression, Regressor};

/// Application serving estimates from loaded artifacts.
pub struct EstimateApp<M = LinearRegression> {
    artifacts: Artifacts<M>,
    config: EstimatorConfig,
}

impl EstimateApp<LinearRegression> {
    /// Load the artifacts named by `config`. Failing here is fatal.
    pub fn load(config: EstimatorConfig) -> Result<Self> {
        let artifacts = Artifacts::load(&config.artifact_paths())?;
        Ok(Self::new(artifacts, config))
    }
}

impl<M: Regressor> EstimateApp<M> {
    pub fn new(artifacts: Artifacts<M>, config: EstimatorConfig) -> Self {
        Self { artifacts, config }
    }

    pub fn artifacts(&self) -> &Artifacts<M> {
        &self.artifacts
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Apply the form bounds, then estimate.
    pub fn submit(&self, request: &EstimateRequest) -> Result<Estimate> {
        check_bounds(&self.config.form, request)?;
        estimate(&self.artifacts, request).map_err(|e| {
            if !matches!(e, EstimatorError::InvalidInput(_)) {
                error!("prediction failed: {e}");
            }
            e
        })
    }

    /// Run the interactive prompt loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut out: W) -> io::Result<()> {
        let form = &self.config.form;
        writeln!(out, "Bangalore Home Price Predictor")?;
        writeln!(out, "==============================")?;
        writeln!(out, "Estimate the value of your property in Indian Lakhs.")?;
        writeln!(out, "Commands: 'quit' to exit, '!locations' to list known locations")?;
        writeln!(out)?;

        let mut lines = input.lines();
        let default_location = self.artifacts.locations().first().cloned().unwrap_or_default();

        loop {
            let Some(location) = prompt(&mut lines, &mut out, "Location", &default_location)? else {
                break;
            };
            match location.to_lowercase().as_str() {
                "quit" => break,
                "!locations" => {
                    self.show_locations(&mut out)?;
                    continue;
                }
                _ => {}
            }

            let Some(sqft) = prompt(&mut lines, &mut out, "Area (square feet)", &form.default_sqft.to_string())?
            else {
                break;
            };
            let Some(bhk) = prompt(&mut lines, &mut out, "BHK", &form.default_bhk.to_string())? else {
                break;
            };
            let Some(bath) = prompt(&mut lines, &mut out, "Bathrooms", &form.default_bath.to_string())? else {
                break;
            };

            let (Ok(bhk), Ok(bath)) = (bhk.parse::<u32>(), bath.parse::<u32>()) else {
                writeln!(out, "BHK and bathrooms must be whole numbers.\n")?;
                continue;
            };
            let request = EstimateRequest {
                location,
                sqft: sqft.parse::<f64>().ok(),
                bhk,
                bath,
            };
            let result = self.submit(&request);
            writeln!(out, "{}\n", render(&request, &result))?;
        }
        writeln!(out, "Goodbye!")?;
        Ok(())
    }

    fn show_locations<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\nKnown locations ({}):", self.artifacts.locations().len())?;
        for location in self.artifacts.locations() {
            writeln!(out, "  {location}")?;
        }
        writeln!(out)
    }
}

/// The message shown to the user for one submitted request.
pub fn render(request: &EstimateRequest, result: &Result<Estimate>) -> String {
    match result {
        Ok(estimate) => {
            let mut msg = format_price(estimate.price);
            if estimate.location == LocationMatch::Unknown {
                msg.push_str(&format!(
                    "\n(location '{}' not recognised; estimate uses area and room counts only)",
                    request.location
                ));
            }
            msg
        }
        Err(EstimatorError::InvalidInput(msg)) => msg.clone(),
        Err(e) => format!("Prediction failed. An internal error occurred. Error: {e}"),
    }
}

/// Ask for one field. Empty input takes `default`; `None` means input closed.
fn prompt<I, W>(lines: &mut I, out: &mut W, label: &str, default: &str) -> io::Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
    W: Write,
{
    write!(out, "{label} [{default}]: ")?;
    out.flush()?;
    let Some(line) = lines.next() else {
        return Ok(None);
    };
    let line = line?;
    let value = line.trim();
    Ok(Some(if value.is_empty() { default } else { value }.to_string()))
}
