//! Melt-temperature lookup per material.

use crate::eos::{EosRegistry, MaterialEos};
use crate::error::{DepositionError, DepositionResult};
use crate::material::Material;
use crate::math_utils::{interp1, is_strictly_increasing};
use serde::{Deserialize, Serialize};

/// Melt curve of one material: temperature (K) at which the solid melts, by density (g/cm³).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeltTable {
    pub material: Material,
    pub densities: Vec<f64>,
    pub temperatures_k: Vec<f64>,
}

impl MeltTable {
    pub fn from_eos(eos: &MaterialEos) -> Self {
        Self {
            material: eos.material,
            densities: eos.melt.densities.clone(),
            temperatures_k: eos.melt.temperatures_k.clone(),
        }
    }

    pub fn from_arrays(
        material: Material,
        densities: Vec<f64>,
        temperatures_k: Vec<f64>,
    ) -> DepositionResult<Self> {
        if densities.len() < 2 || densities.len() != temperatures_k.len() {
            return Err(DepositionError::lookup(format!(
                "{} melt curve needs 2 or more points, got {} densities, {} temperatures",
                material,
                densities.len(),
                temperatures_k.len()
            )));
        }
        if !is_strictly_increasing(&densities) {
            return Err(DepositionError::lookup(format!(
                "{} melt curve densities are not strictly increasing",
                material
            )));
        }
        Ok(Self { material, densities, temperatures_k })
    }

    /// Melt curve of `material` from the process-wide EOS registry.
    pub fn for_material(material: Material) -> DepositionResult<Self> {
        let eos = EosRegistry::global()?.get(material)?;
        Ok(Self::from_eos(eos))
    }

    pub fn melt_temperature_k(&self, density: f64) -> DepositionResult<f64> {
        interp1(&self.densities, &self.temperatures_k, density).ok_or_else(|| {
            DepositionError::lookup(format!(
                "{} density {} is outside the melt curve",
                self.material, density
            ))
        })
    }

    pub fn density_range(&self) -> (f64, f64) {
        (
            self.densities.first().copied().unwrap_or(f64::NAN),
            self.densities.last().copied().unwrap_or(f64::NAN),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lookup_from_arrays() {
        let melt = MeltTable::from_arrays(
            Material::Iron,
            vec![6.0, 8.0, 10.0],
            vec![1500.0, 1800.0, 2600.0],
        )
        .unwrap();
        assert_abs_diff_eq!(melt.melt_temperature_k(7.0).unwrap(), 1650.0, epsilon = 1e-9);
        assert_abs_diff_eq!(melt.melt_temperature_k(9.5).unwrap(), 2400.0, epsilon = 1e-9);
        assert_eq!(melt.density_range(), (6.0, 10.0));
        assert!(melt.melt_temperature_k(11.0).unwrap_err().is_table_lookup());
    }

    #[test]
    fn test_invalid_arrays() {
        assert!(MeltTable::from_arrays(Material::Ice, vec![1.0], vec![273.0]).is_err());
        assert!(MeltTable::from_arrays(Material::Ice, vec![1.0, 2.0], vec![273.0]).is_err());
        assert!(
            MeltTable::from_arrays(Material::Ice, vec![2.0, 1.0], vec![273.0, 300.0]).is_err()
        );
    }

    #[test]
    fn test_serializes_arrays() {
        let melt =
            MeltTable::from_arrays(Material::Ice, vec![0.9, 1.2], vec![273.0, 260.0]).unwrap();
        let json = serde_json::to_string(&melt).unwrap();
        assert!(json.contains("\"Ice\""));
        let back: MeltTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, melt);
    }
}
