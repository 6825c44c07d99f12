// src/heating.rs - Temperature rise of a target cell from a deposited energy density

use crate::constants::{J_PER_G_TO_MJ_PER_KG, PERG_CM3_TO_J_CM3};
use crate::eos::MaterialEos;
use crate::error::{DepositionError, DepositionResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellPhase {
    Solid,
    Molten,
}

/// State of a porous cell after the deposited energy has been added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatedState {
    pub bulk_density_g_cc: f64,
    pub added_energy_mj_kg: f64,
    pub specific_energy_mj_kg: f64,
    pub temperature_k: f64,
    pub melt_temperature_k: f64,
    pub phase: CellPhase,
}

impl HeatedState {
    pub fn is_molten(&self) -> bool {
        self.phase == CellPhase::Molten
    }
}

/// Specific energy (MJ/kg) carried by an energy density (Perg/cm³) at `density` (g/cm³).
pub fn specific_energy_mj_kg(energy_density_perg_cm3: f64, density_g_cc: f64) -> f64 {
    energy_density_perg_cm3 * PERG_CM3_TO_J_CM3 * J_PER_G_TO_MJ_PER_KG / density_g_cc
}

/// Heat a cell of `eos.material` at porosity `porosity` from `initial_temperature_k`.
///
/// The cell has bulk density `ρs (1 − φ)`; its final temperature is found by
/// inverting the EOS energy at that density.
pub fn heated_state(
    eos: &MaterialEos,
    porosity: f64,
    energy_density_perg_cm3: f64,
    initial_temperature_k: f64,
) -> DepositionResult<HeatedState> {
    if !(0.0..1.0).contains(&porosity) {
        return Err(DepositionError::invalid(format!(
            "porosity must be in [0, 1), got {}",
            porosity
        )));
    }
    if !(energy_density_perg_cm3 >= 0.0) || !energy_density_perg_cm3.is_finite() {
        return Err(DepositionError::invalid(format!(
            "energy density must be finite and non-negative, got {}",
            energy_density_perg_cm3
        )));
    }

    let bulk_density = eos.material.solid_density_g_cc() * (1.0 - porosity);
    let added = specific_energy_mj_kg(energy_density_perg_cm3, bulk_density);
    let initial = eos.state(bulk_density, initial_temperature_k)?;
    let total = initial.energy_mj_kg + added;

    let temperature_k = eos.temperature_from_energy(bulk_density, total)?;
    let melt_temperature_k = eos.melt_temperature(bulk_density)?;
    let phase = if temperature_k >= melt_temperature_k {
        CellPhase::Molten
    } else {
        CellPhase::Solid
    };

    Ok(HeatedState {
        bulk_density_g_cc: bulk_density,
        added_energy_mj_kg: added,
        specific_energy_mj_kg: total,
        temperature_k,
        melt_temperature_k,
        phase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use approx::assert_abs_diff_eq;

    // E = 1e-3 T on a density axis around solid ice, melt at 273 K
    const ICE_TABLE: &str = "\
# cold curve
2 0.5 1.0 0.0 0.0 0.0 0.0
# eos
2 3
0.5 1.0
100.0 1000.0 10000.0
0.0 0.0 0.0 0.0 0.0 0.0
0.1 0.1 1.0 1.0 10.0 10.0
1.0 1.0 1.0 1.0 1.0 1.0
0.0 0.0 0.0 0.0 0.0 0.0
# charge state
2 100.0 10000.0 0.0 1.0
# melt
2 0.5 1.0 273.0 273.0
";

    fn ice() -> MaterialEos {
        MaterialEos::from_sesame_str(Material::Ice, ICE_TABLE).unwrap()
    }

    #[test]
    fn test_unit_conversion() {
        // 1 Perg/cm³ in 1 g/cm³ is 1e8 J/g = 1e5 MJ/kg
        assert_abs_diff_eq!(specific_energy_mj_kg(1.0, 1.0), 1.0e5, epsilon = 1e-9);
        assert_abs_diff_eq!(specific_energy_mj_kg(2.0e-5, 0.5), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_heating_melts_ice() {
        let eos = ice();
        // 1 MJ/kg added at 0.917 g/cm³
        let energy = 0.917e-5;
        let state = heated_state(&eos, 0.0, energy, 200.0).unwrap();
        assert_abs_diff_eq!(state.bulk_density_g_cc, 0.917, epsilon = 1e-12);
        assert_abs_diff_eq!(state.added_energy_mj_kg, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(state.temperature_k, 1200.0, epsilon = 1e-6);
        assert!(state.is_molten());
    }

    #[test]
    fn test_small_deposit_stays_solid() {
        let eos = ice();
        let state = heated_state(&eos, 0.0, 0.0, 200.0).unwrap();
        assert_abs_diff_eq!(state.temperature_k, 200.0, epsilon = 1e-6);
        assert_eq!(state.phase, CellPhase::Solid);
    }

    #[test]
    fn test_porosity_lowers_bulk_density_and_raises_specific_energy() {
        let eos = ice();
        let dense = heated_state(&eos, 0.0, 1.0e-6, 150.0).unwrap();
        let porous = heated_state(&eos, 0.3, 1.0e-6, 150.0).unwrap();
        assert_abs_diff_eq!(porous.bulk_density_g_cc, 0.917 * 0.7, epsilon = 1e-12);
        assert!(porous.added_energy_mj_kg > dense.added_energy_mj_kg);
        assert!(porous.temperature_k > dense.temperature_k);
    }

    #[test]
    fn test_invalid_inputs() {
        let eos = ice();
        assert!(heated_state(&eos, 1.0, 1.0e-6, 150.0).unwrap_err().is_invalid_input());
        assert!(heated_state(&eos, 0.1, -1.0, 150.0).unwrap_err().is_invalid_input());
        assert!(heated_state(&eos, 0.1, f64::NAN, 150.0).unwrap_err().is_invalid_input());
        // too hot for the table
        assert!(heated_state(&eos, 0.1, 1.0, 150.0).unwrap_err().is_table_lookup());
    }
}
