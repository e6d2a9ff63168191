use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rectangular lat/long region random coordinates are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub long_min: f64,
    pub long_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl BoundingBox {
    pub const FINLAND: BoundingBox = BoundingBox {
        long_min: 20.54,     // Swedish/Norwegian/Finnish border
        long_max: 31.5867,   // Ilomantsi
        lat_min: 59.807983,  // Hanko
        lat_max: 70.092283,  // Nuorgam
    };

    pub const GERMANY: BoundingBox = BoundingBox {
        long_min: 5.8666667, // Isenbruch
        long_max: 15.033333, // Deschka
        lat_min: 47.270108,  // Haldenwanger Eck
        lat_max: 54.9,       // Aventoft
    };

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat)
            && (self.long_min..=self.long_max).contains(&lon)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.long_min, self.long_max, self.lat_min, self.lat_max]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(anyhow!("bounding box has non-finite bounds: {self:?}"));
        }
        if self.lat_min > self.lat_max || self.long_min > self.long_max {
            return Err(anyhow!("bounding box min exceeds max: {self:?}"));
        }
        if self.lat_min < -90.0 || self.lat_max > 90.0 {
            return Err(anyhow!("latitude outside [-90, 90]: {self:?}"));
        }
        if self.long_min < -180.0 || self.long_max > 180.0 {
            return Err(anyhow!("longitude outside [-180, 180]: {self:?}"));
        }
        Ok(())
    }
}

/// Country name -> bounding box. Names are stored lowercase.
#[derive(Debug, Clone)]
pub struct RegionTable {
    boxes: BTreeMap<String, BoundingBox>,
}

impl Default for RegionTable {
    fn default() -> Self {
        let mut boxes = BTreeMap::new();
        boxes.insert("finland".to_string(), BoundingBox::FINLAND);
        boxes.insert("germany".to_string(), BoundingBox::GERMANY);
        Self { boxes }
    }
}

impl RegionTable {
    /// Built-in regions with `extra` layered on top.
    pub fn with_overrides(extra: &BTreeMap<String, BoundingBox>) -> Self {
        let mut table = Self::default();
        for (name, bbox) in extra {
            table.boxes.insert(name.to_ascii_lowercase(), *bbox);
        }
        table
    }

    pub fn lookup(&self, country: &str) -> Result<BoundingBox> {
        self.boxes
            .get(&country.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| {
                anyhow!(
                    "unknown country '{country}', must be one of: {}",
                    self.names().join(", ")
                )
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.boxes.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_boxes_are_valid() {
        BoundingBox::FINLAND.validate().unwrap();
        BoundingBox::GERMANY.validate().unwrap();
    }

    #[test]
    fn lookup_ignores_case() {
        let table = RegionTable::default();
        assert_eq!(table.lookup("Finland").unwrap(), BoundingBox::FINLAND);
        let err = table.lookup("atlantis").unwrap_err().to_string();
        assert!(err.contains("finland, germany"));
    }
}
