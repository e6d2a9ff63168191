use crate::region::BoundingBox;
use crate::util::sha256_hex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// `dim * dim` coordinates as `[lat, lon]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMatrix {
    pub dim: usize,
    pub points: Vec<[f64; 2]>,
}

impl CoordinateMatrix {
    pub fn generate<R: Rng>(bbox: &BoundingBox, dim: usize, rng: &mut R) -> Self {
        let started = Instant::now();
        let points = (0..dim * dim)
            .map(|_| {
                [
                    rng.gen_range(bbox.lat_min..=bbox.lat_max),
                    rng.gen_range(bbox.long_min..=bbox.long_max),
                ]
            })
            .collect();
        debug!("{dim}x{dim} matrix generated in {:?}", started.elapsed());
        Self { dim, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// String-encoded list carried in the `matrix` field of a job request.
    pub fn to_wire(&self) -> String {
        serde_json::to_string(&self.points).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn fingerprint(&self) -> String {
        sha256_hex(self.to_wire().as_bytes())
    }
}

/// Where each iteration's matrix comes from.
#[derive(Debug, Clone)]
pub enum MatrixSource {
    /// New matrix every iteration.
    Fresh,
    /// Supplied by the caller and reused verbatim.
    Fixed(CoordinateMatrix),
    /// Generated on first use, then reused.
    ReuseIfConstant(Option<CoordinateMatrix>),
}

impl MatrixSource {
    pub fn for_run(constant: bool, provided: Option<CoordinateMatrix>) -> Self {
        match (provided, constant) {
            (Some(m), _) => MatrixSource::Fixed(m),
            (None, true) => MatrixSource::ReuseIfConstant(None),
            (None, false) => MatrixSource::Fresh,
        }
    }

    /// Returns the matrix for the next iteration and whether it was freshly generated.
    pub fn next<R: Rng>(
        &mut self,
        bbox: &BoundingBox,
        dim: usize,
        rng: &mut R,
    ) -> (CoordinateMatrix, bool) {
        match self {
            MatrixSource::Fresh => (CoordinateMatrix::generate(bbox, dim, rng), true),
            MatrixSource::Fixed(m) => (m.clone(), false),
            MatrixSource::ReuseIfConstant(Some(m)) => (m.clone(), false),
            MatrixSource::ReuseIfConstant(slot) => {
                let m = CoordinateMatrix::generate(bbox, dim, rng);
                *slot = Some(m.clone());
                (m, true)
            }
        }
    }
}
