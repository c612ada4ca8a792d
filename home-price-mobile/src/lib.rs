use bytemuck::{Pod, Zeroable};
use home_price::artifacts::ensure_exists;
use home_price::{Artifacts, ColumnSchema, EstimatorError, LinearRegression, Regressor, Result};
use log::info;
use memmap2::MmapOptions;
use ndarray::{Array1, ArrayView2};
use std::{fs::File, io::Write, path::Path};

pub mod ffi;
pub use ffi::*;

/// File magic for the compact model encoding.
pub const MAGIC: [u8; 4] = *b"HPM1";

/// Fixed-size prefix of a compact model file. Multi-byte fields are stored
/// little-endian.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct Header {
    magic: [u8; 4],
    n_features: u32,
    intercept_bits: u64,
}

const HEADER_LEN: usize = std::mem::size_of::<Header>();

/// Linear model stored as a flat little-endian buffer so it can be mapped
/// straight from disk on devices.
#[derive(Clone, Debug, PartialEq)]
pub struct CompactModel {
    model: LinearRegression,
}

impl CompactModel {
    pub fn from_model(model: LinearRegression) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let coef = self.model.coef();
        let header = Header {
            magic: MAGIC,
            n_features: (coef.len() as u32).to_le(),
            intercept_bits: self.model.intercept().to_bits().to_le(),
        };
        let mut buf = Vec::with_capacity(HEADER_LEN + coef.len() * 8);
        buf.extend_from_slice(bytemuck::bytes_of(&header));
        for c in coef.iter() {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        buf
    }

    /// Decode a buffer produced by [`CompactModel::to_bytes`]. `path` is
    /// only used for error messages.
    pub fn from_bytes(buf: &[u8], path: &Path) -> Result<Self> {
        if buf.len() < HEADER_LEN {
            return Err(EstimatorError::load(path, "truncated header"));
        }
        let header: Header = bytemuck::pod_read_unaligned(&buf[..HEADER_LEN]);
        if header.magic != MAGIC {
            return Err(EstimatorError::load(path, "not a compact model file"));
        }
        let n = u32::from_le(header.n_features) as usize;
        let body = &buf[HEADER_LEN..];
        if body.len() != n * 8 {
            return Err(EstimatorError::load(
                path,
                format!("expected {} coefficient bytes, found {}", n * 8, body.len()),
            ));
        }
        let coef: Array1<f64> = body
            .chunks_exact(8)
            .map(|chunk| f64::from_bits(u64::from_le(bytemuck::pod_read_unaligned(chunk))))
            .collect();
        let intercept = f64::from_bits(u64::from_le(header.intercept_bits));
        let model = LinearRegression::new(coef, intercept);
        if !model.is_finite() {
            return Err(EstimatorError::load(path, "model contains non-finite weights"));
        }
        Ok(Self::from_model(model))
    }

    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let mut f = File::create(path)?;
        f.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        ensure_exists(path)?;
        let bytes = std::fs::read(path).map_err(|e| EstimatorError::load(path, e))?;
        Self::from_bytes(&bytes, path)
    }

    pub fn load_mmap(path: &Path) -> Result<Self> {
        ensure_exists(path)?;
        let file = File::open(path).map_err(|e| EstimatorError::load(path, e))?;
        // The mapping is only read while decoding and dropped before returning.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|e| EstimatorError::load(path, e))?;
        Self::from_bytes(&mmap[..], path)
    }
}

impl Regressor for CompactModel {
    fn n_features(&self) -> usize {
        self.model.n_features()
    }

    fn predict(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        self.model.predict(rows)
    }
}

/// Load a schema plus compact model from `dir`, falling back to a plain
/// read when the file cannot be mapped.
pub fn load_artifacts(dir: &Path, columns_file: &str, model_file: &str) -> Result<Artifacts<CompactModel>> {
    let columns_path = dir.join(columns_file);
    let model_path = dir.join(model_file);
    ensure_exists(&columns_path)?;
    ensure_exists(&model_path)?;

    let schema = ColumnSchema::load(&columns_path)?;
    let model = CompactModel::load_mmap(&model_path).or_else(|_| CompactModel::load(&model_path))?;
    let artifacts = Artifacts::from_parts(schema, model)?;
    info!(
        "loaded compact model from {} ({} locations)",
        model_path.display(),
        artifacts.locations().len()
    );
    Ok(artifacts)
}
