//! Source spectrum response tables.
//!
//! Each (material, source class) pair carries a set of fitted response
//! coefficients describing how an incident blackbody spectrum deposits
//! energy with depth. The coefficients ship as embedded JSON and are parsed
//! once into a process-wide read-only registry.

use crate::error::{DepositionError, DepositionResult};
use crate::material::{Material, SourceClass};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded response coefficients for every supported material and source class
const RESPONSE_TABLES_JSON: &str = include_str!("response_tables.json");

static RESPONSE_REGISTRY: Lazy<Result<ResponseRegistry, String>> = Lazy::new(|| {
    ResponseRegistry::from_json_str(RESPONSE_TABLES_JSON).map_err(|e| e.to_string())
});

/// Point at which the response curves are evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponsePoint {
    /// Source duration in shakes
    pub tsrc_sh: f64,
    /// log10 of the angle-scaled fluence (kt/m²)
    pub log_fluence: f64,
    pub porosity: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResponseTable {
    pub material: Material,
    pub source_class: SourceClass,
    pub angle: [f64; 12],
    pub x: [f64; 13],
    pub y: [f64; 6],
    pub ex: [f64; 9],
    pub square: [f64; 7],
    pub b: [f64; 10],
    pub cutoff: [f64; 10],
    pub scale: [f64; 20],
    /// When set the cutoff roll-off rate is itself a fitted function
    /// instead of the fixed default.
    #[serde(default)]
    pub floating_cutoff_rate: bool,
}

impl ResponseTable {
    /// Fluence scale factor for the angle of incidence.
    pub fn angle_scale(&self, cos_angle: f64, log_fluence: f64, tsrc_sh: f64) -> f64 {
        let p = &self.angle;
        let (x, y, z) = (cos_angle, log_fluence, tsrc_sh);
        let x2 = x * x;
        let y2 = y * y;
        let y3 = y2 * y;

        p[0] + p[1] * x + p[2] * x2 + p[3] * y + p[4] * y2 + p[5] * y2 * x2 + p[6] * y3
            + p[7] * y3 * x2
            + p[8] * z
            + p[9] * z * z
            + p[10] * x2 * z * z
            + p[11] * z * x2
    }

    /// Horizontal radius (cm) of the near-surface half-ellipse.
    pub fn half_width(&self, at: ResponsePoint) -> f64 {
        let p = &self.x;
        let (x, y, z) = (at.tsrc_sh, at.log_fluence, at.porosity);
        let y2 = y * y;
        let y3 = y2 * y;

        let base = 10f64.powf(
            p[0] + p[1] * x + p[2] * y + p[3] * y2 + p[4] * y2 * x + p[5] * y3 + p[6] * y3 * x * x,
        );
        let porosity_term = (p[8] * x * x + p[9] * x) * (z - p[10]);
        let fluence_term = -(p[11] * x * x) * (y - p[12]).powi(2);
        base * (1.0 + p[7] * porosity_term.exp() * fluence_term.exp())
    }

    /// Height scale of the half-ellipse.
    pub fn height(&self, at: ResponsePoint) -> f64 {
        let p = &self.y;
        let (x, y) = (at.tsrc_sh, at.log_fluence);
        let x3 = x * x * x;
        let y2 = y * y;

        10f64.powf(p[0] + p[1] * y + p[2] * y * x3 + p[3] * y2 + p[4] * y2 * x3 + p[5] * y2 * y)
    }

    /// Tail fraction controlling the decay rate beyond the ellipse.
    pub fn tail_fraction(&self, at: ResponsePoint) -> f64 {
        let p = &self.ex;
        let (x, y) = (at.tsrc_sh, at.log_fluence);
        let x2 = x * x;
        let x3 = x2 * x;
        let y3 = y * y * y;

        10f64.powf(
            p[0] + p[1] * x + p[2] * x2 + p[3] * x3 + p[4] * y + p[5] * y * y + p[6] * y3 * x
                + p[7] * y3 * x2
                + p[8] * y3 * x3,
        )
    }

    /// Plateau height beneath the half-ellipse.
    pub fn plateau(&self, at: ResponsePoint) -> f64 {
        let p = &self.square;
        let (x, y) = (at.tsrc_sh, at.log_fluence);
        let x2 = x * x;
        let y2 = y * y;

        (p[0] + p[1] * x2 + p[2] * y + p[3] * y * x2 + p[4] * y2 + p[5] * y2 * x2 + p[6] * y2 * y)
            .abs()
    }

    /// Constant height of the shock region.
    pub fn shock_floor(&self, at: ResponsePoint) -> f64 {
        let p = &self.b;
        let (x, y, z) = (at.tsrc_sh, at.log_fluence, at.porosity);
        let y2 = y * y;
        let z3 = z * z * z;

        10f64.powf(p[0] + p[1] * x + p[2] * x * x + p[3] * y + p[4] * y * x + p[5] * y2 * y)
            * (1.0 + p[6] * z + p[7] * y2 * z3 + p[8] * y2 * y * z3 + p[9] * x * z)
    }

    /// Depth (cm) where the shock energy density drops sharply.
    pub fn cutoff_depth(&self, at: ResponsePoint) -> f64 {
        let p = &self.cutoff;
        let (x, y, z) = (at.tsrc_sh, at.log_fluence, at.porosity);

        10f64.powf(p[0] + p[1] * x + p[2] * y + p[3] * y * x + p[4] * y * x * x + p[5] * y * y)
            * (1.0 + p[6] * z + p[7] * z * z * z + p[8] * y * y * z + p[9] * x * z)
    }

    /// Logistic roll-off rate (1/cm) at the cutoff depth.
    pub fn cutoff_rate(&self, at: ResponsePoint, default_rate: f64) -> f64 {
        if !self.floating_cutoff_rate {
            return default_rate;
        }

        let (x, y, z) = (at.tsrc_sh, at.log_fluence, at.porosity);
        let y2 = y * y;
        let y3 = y2 * y;

        10f64.powf(
            -0.1017 - 0.3407 * y + 0.03137 * y * x - 0.003059 * y * x * x
                + 0.0001539 * y * x * x * x
                + 0.05632 * y2
                + 0.009446 * y3,
        ) * (1.0 - 0.0988 * z + 0.7562 * y2 * z + 0.1621 * y3 * z)
    }

    /// Overall deposition amplitude in jerk/cm³.
    pub fn amplitude(&self, at: ResponsePoint) -> f64 {
        let p = &self.scale;
        let (x, y, z) = (at.tsrc_sh, at.log_fluence, at.porosity);
        let x2 = x * x;
        let y2 = y * y;
        let y3 = y2 * y;
        let z2 = z * z;
        let z3 = z2 * z;

        let fluence_part = p[0] + p[1] * x2 * x + p[2] * y + p[3] * y * x + p[4] * y * x2
            + p[5] * y2
            + p[6] * y2 * x
            + p[7] * y2 * x2
            + p[8] * y3
            + p[9] * y3 * x
            + p[10] * y3 * x2
            + p[11] * y2 * y2;
        let porosity_part = 1.0 + p[12] * z + p[13] * y2 * z + p[14] * x * z;
        let coupling_part =
            1.0 + p[15] * z3 + p[16] * y * z + p[17] * y2 * z2 + p[18] * y2 * z3 + p[19] * x * z2;

        (fluence_part * porosity_part * coupling_part).abs()
    }
}

#[derive(Deserialize)]
struct ResponseTableFile {
    tables: Vec<ResponseTable>,
}

/// Read-only lookup of response tables keyed by material and source class.
#[derive(Clone, Debug)]
pub struct ResponseRegistry {
    tables: HashMap<(Material, SourceClass), ResponseTable>,
}

impl ResponseRegistry {
    /// Parse a registry from JSON; every material must be present for every source class.
    pub fn from_json_str(json_str: &str) -> DepositionResult<Self> {
        let file: ResponseTableFile = serde_json::from_str(json_str)
            .map_err(|e| DepositionError::lookup(format!("malformed response tables: {}", e)))?;

        let mut tables = HashMap::new();
        for table in file.tables {
            let key = (table.material, table.source_class);
            if tables.insert(key, table).is_some() {
                return Err(DepositionError::lookup(format!(
                    "duplicate response table for {} at {}",
                    key.0, key.1
                )));
            }
        }

        for material in Material::ALL {
            for class in SourceClass::ALL {
                if !tables.contains_key(&(material, class)) {
                    return Err(DepositionError::lookup(format!(
                        "missing response table for {} at {}",
                        material, class
                    )));
                }
            }
        }

        Ok(Self { tables })
    }

    /// The process-wide registry parsed from the embedded tables.
    pub fn global() -> DepositionResult<&'static ResponseRegistry> {
        RESPONSE_REGISTRY
            .as_ref()
            .map_err(|message| DepositionError::lookup(message.clone()))
    }

    pub fn get(&self, material: Material, class: SourceClass) -> DepositionResult<&ResponseTable> {
        self.tables.get(&(material, class)).ok_or_else(|| {
            DepositionError::lookup(format!("no response table for {} at {}", material, class))
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
