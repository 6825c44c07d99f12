// src/material.rs - Target materials and source temperature classes

use crate::constants::{
    FORSTERITE_DENSITY_G_CC, ICE_DENSITY_G_CC, IRON_DENSITY_G_CC, SIO2_DENSITY_G_CC,
};
use crate::error::DepositionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    SiO2,
    Forsterite,
    Ice,
    Iron,
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::SiO2,
        Material::Forsterite,
        Material::Ice,
        Material::Iron,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::SiO2 => "SiO2",
            Material::Forsterite => "Forsterite",
            Material::Ice => "Ice",
            Material::Iron => "Iron",
        }
    }

    /// Nominal solid density in g/cm³; the EOS tables are computed at this density.
    pub fn solid_density_g_cc(&self) -> f64 {
        match self {
            Material::SiO2 => SIO2_DENSITY_G_CC,
            Material::Forsterite => FORSTERITE_DENSITY_G_CC,
            Material::Ice => ICE_DENSITY_G_CC,
            Material::Iron => IRON_DENSITY_G_CC,
        }
    }

    /// File name of the Sesame-style EOS table for this material
    pub fn eos_file_name(&self) -> String {
        format!("{}.ses", self.as_str())
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = DepositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SiO2" => Ok(Material::SiO2),
            "Forsterite" => Ok(Material::Forsterite),
            "Ice" => Ok(Material::Ice),
            "Iron" => Ok(Material::Iron),
            other => Err(DepositionError::invalid(format!(
                "unknown material '{}', expected one of SiO2, Forsterite, Ice, Iron",
                other
            ))),
        }
    }
}

/// Blackbody temperature class of the source spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceClass {
    #[serde(rename = "1keV")]
    OneKev,
    #[serde(rename = "2keV")]
    TwoKev,
}

impl SourceClass {
    pub const ALL: [SourceClass; 2] = [SourceClass::OneKev, SourceClass::TwoKev];

    pub fn kev(&self) -> f64 {
        match self {
            SourceClass::OneKev => 1.0,
            SourceClass::TwoKev => 2.0,
        }
    }
}

impl fmt::Display for SourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} keV", self.kev())
    }
}

impl TryFrom<f64> for SourceClass {
    type Error = DepositionError;

    fn try_from(kev: f64) -> Result<Self, Self::Error> {
        if kev == 1.0 {
            Ok(SourceClass::OneKev)
        } else if kev == 2.0 {
            Ok(SourceClass::TwoKev)
        } else {
            Err(DepositionError::invalid(format!(
                "unknown source temperature class {}, expected 1.0 or 2.0",
                kev
            )))
        }
    }
}
