//! Material EOS tables and their lookups.
//!
//! Units: density g/cm³, temperature K, pressure GPa, specific energy MJ/kg,
//! sound speed squared (km/s)², entropy MJ/(kg·K).

use crate::eos::sesame::{SectionKind, SesameSections};
use crate::error::{DepositionError, DepositionResult};
use crate::material::Material;
use crate::math_utils::{bilinear, bracket, interp1, inverse_lerp, is_strictly_increasing, lerp};

/// Pressure and energy of the material at zero temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct ColdCurve {
    pub densities: Vec<f64>,
    pub pressures_gpa: Vec<f64>,
    pub energies_mj_kg: Vec<f64>,
}

/// Full EOS on a density x temperature grid, density varying fastest.
#[derive(Clone, Debug, PartialEq)]
pub struct EosGrid {
    pub densities: Vec<f64>,
    pub temperatures_k: Vec<f64>,
    pub pressures_gpa: Vec<f64>,
    pub energies_mj_kg: Vec<f64>,
    pub sound_speed_sq: Vec<f64>,
    pub entropies: Vec<f64>,
}

/// Mean ionization as a function of temperature.
#[derive(Clone, Debug, PartialEq)]
pub struct ChargeStateCurve {
    pub temperatures_k: Vec<f64>,
    pub mean_charge: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeltCurve {
    pub densities: Vec<f64>,
    pub temperatures_k: Vec<f64>,
}

/// Thermodynamic state interpolated from the EOS grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermoState {
    pub pressure_gpa: f64,
    pub energy_mj_kg: f64,
    pub sound_speed_sq: f64,
    pub entropy: f64,
}

impl ThermoState {
    /// Sound speed in km/s, zero where the tabulated square is negative
    pub fn sound_speed_km_s(&self) -> f64 {
        self.sound_speed_sq.max(0.0).sqrt()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialEos {
    pub material: Material,
    pub cold: ColdCurve,
    pub grid: EosGrid,
    pub charge_state: ChargeStateCurve,
    pub melt: MeltCurve,
}

fn check_axis(name: &str, axis: &[f64]) -> DepositionResult<()> {
    if !is_strictly_increasing(axis) {
        return Err(DepositionError::lookup(format!(
            "{} axis is not strictly increasing",
            name
        )));
    }
    Ok(())
}

impl MaterialEos {
    /// Build a material table from the text of a Sesame-style file.
    pub fn from_sesame_str(material: Material, text: &str) -> DepositionResult<Self> {
        let context = format!("{} EOS", material);
        let sections = SesameSections::parse(text).map_err(|e| e.in_context(&context))?;
        Self::from_sections(material, &sections).map_err(|e| e.in_context(&context))
    }

    fn from_sections(material: Material, sections: &SesameSections) -> DepositionResult<Self> {
        let mut reader = sections.reader(SectionKind::ColdCurve);
        let n = reader.count(2)?;
        let cold = ColdCurve {
            densities: reader.take(n)?,
            pressures_gpa: reader.take(n)?,
            energies_mj_kg: reader.take(n)?,
        };
        reader.finish()?;
        check_axis("cold curve density", &cold.densities)?;

        let mut reader = sections.reader(SectionKind::Eos);
        let n_rho = reader.count(2)?;
        let n_t = reader.count(2)?;
        let cells = n_rho.checked_mul(n_t).ok_or_else(|| {
            DepositionError::lookup(format!("EOS grid of {} x {} cells is too large", n_rho, n_t))
        })?;
        let grid = EosGrid {
            densities: reader.take(n_rho)?,
            temperatures_k: reader.take(n_t)?,
            pressures_gpa: reader.take(cells)?,
            energies_mj_kg: reader.take(cells)?,
            sound_speed_sq: reader.take(cells)?,
            entropies: reader.take(cells)?,
        };
        reader.finish()?;
        check_axis("EOS density", &grid.densities)?;
        check_axis("EOS temperature", &grid.temperatures_k)?;

        let mut reader = sections.reader(SectionKind::ChargeState);
        let n = reader.count(2)?;
        let charge_state = ChargeStateCurve {
            temperatures_k: reader.take(n)?,
            mean_charge: reader.take(n)?,
        };
        reader.finish()?;
        check_axis("charge state temperature", &charge_state.temperatures_k)?;

        let mut reader = sections.reader(SectionKind::Melt);
        let n = reader.count(2)?;
        let melt = MeltCurve {
            densities: reader.take(n)?,
            temperatures_k: reader.take(n)?,
        };
        reader.finish()?;
        check_axis("melt density", &melt.densities)?;

        Ok(Self { material, cold, grid, charge_state, melt })
    }

    fn out_of_table(&self, what: &str, value: f64, axis: &[f64]) -> DepositionError {
        DepositionError::lookup(format!(
            "{} {} {} is outside the tabulated range [{}, {}]",
            self.material,
            what,
            value,
            axis.first().copied().unwrap_or(f64::NAN),
            axis.last().copied().unwrap_or(f64::NAN)
        ))
    }

    /// Interpolated state at density `rho` (g/cm³) and temperature `t` (K).
    pub fn state(&self, rho: f64, t: f64) -> DepositionResult<ThermoState> {
        let g = &self.grid;
        let at = |values: &[f64]| bilinear(&g.densities, &g.temperatures_k, values, rho, t);

        match (
            at(&g.pressures_gpa),
            at(&g.energies_mj_kg),
            at(&g.sound_speed_sq),
            at(&g.entropies),
        ) {
            (Some(pressure_gpa), Some(energy_mj_kg), Some(sound_speed_sq), Some(entropy)) => {
                Ok(ThermoState { pressure_gpa, energy_mj_kg, sound_speed_sq, entropy })
            }
            _ => {
                if bracket(&g.densities, rho).is_none() {
                    Err(self.out_of_table("density", rho, &g.densities))
                } else {
                    Err(self.out_of_table("temperature", t, &g.temperatures_k))
                }
            }
        }
    }

    /// Temperature (K) at which the specific energy at density `rho` equals `energy_mj_kg`.
    ///
    /// Energy must increase with temperature along the interpolated column.
    pub fn temperature_from_energy(&self, rho: f64, energy_mj_kg: f64) -> DepositionResult<f64> {
        let g = &self.grid;
        let i = bracket(&g.densities, rho)
            .ok_or_else(|| self.out_of_table("density", rho, &g.densities))?;
        let n_rho = g.densities.len();
        let tx = inverse_lerp(g.densities[i], g.densities[i + 1], rho);

        let column: Vec<f64> = (0..g.temperatures_k.len())
            .map(|j| lerp(g.energies_mj_kg[j * n_rho + i], g.energies_mj_kg[j * n_rho + i + 1], tx))
            .collect();
        if !is_strictly_increasing(&column) {
            return Err(DepositionError::lookup(format!(
                "{} energy is not monotone in temperature at density {}",
                self.material, rho
            )));
        }

        interp1(&column, &g.temperatures_k, energy_mj_kg)
            .ok_or_else(|| self.out_of_table("specific energy", energy_mj_kg, &column))
    }

    pub fn cold_pressure(&self, rho: f64) -> DepositionResult<f64> {
        interp1(&self.cold.densities, &self.cold.pressures_gpa, rho)
            .ok_or_else(|| self.out_of_table("cold curve density", rho, &self.cold.densities))
    }

    pub fn cold_energy(&self, rho: f64) -> DepositionResult<f64> {
        interp1(&self.cold.densities, &self.cold.energies_mj_kg, rho)
            .ok_or_else(|| self.out_of_table("cold curve density", rho, &self.cold.densities))
    }

    pub fn charge_state(&self, t: f64) -> DepositionResult<f64> {
        let curve = &self.charge_state;
        interp1(&curve.temperatures_k, &curve.mean_charge, t)
            .ok_or_else(|| self.out_of_table("charge state temperature", t, &curve.temperatures_k))
    }

    pub fn melt_temperature(&self, rho: f64) -> DepositionResult<f64> {
        interp1(&self.melt.densities, &self.melt.temperatures_k, rho)
            .ok_or_else(|| self.out_of_table("melt curve density", rho, &self.melt.densities))
    }
}
