//! Angle- and depth-dependent energy deposition.
//!
//! The deposition profile along depth has two regions. Near the surface a
//! half-ellipse of width `2 * half_width` sits on a plateau; beyond it a
//! hyperbolic tail decays onto a shock floor that rolls off at the cutoff
//! depth. Porosity compacts the depth axis and dilutes the energy density by
//! the solid fraction.

use crate::constants::{
    DEFAULT_CUTOFF_RATE_PER_CM, JERK_TO_PERG, MIN_LOG_SCALED_FLUENCE, MIN_SCALED_FLUENCE,
    NS_TO_SHAKE,
};
use crate::error::{DepositionError, DepositionResult};
use crate::material::{Material, SourceClass};
use crate::math_utils::{expit, half_ellipse};
use crate::spectrum::{ResponsePoint, ResponseRegistry, ResponseTable};
use serde::{Deserialize, Serialize};

/// What happens at and beyond the cutoff depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepthPolicy {
    /// Smooth logistic roll-off centred on the cutoff depth.
    #[default]
    Logistic,
    /// Hard zero at and beyond the cutoff depth.
    Truncate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub depth_policy: DepthPolicy,
    /// Roll-off rate (1/cm) for tables without a fitted rate
    pub cutoff_rate_per_cm: f64,
    /// Use the fitted roll-off rate where a table carries one. When off, every
    /// table rolls off at `cutoff_rate_per_cm`.
    pub fitted_cutoff_rates: bool,
    pub debug: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            depth_policy: DepthPolicy::Logistic,
            cutoff_rate_per_cm: DEFAULT_CUTOFF_RATE_PER_CM,
            fitted_cutoff_rates: true,
            debug: false,
        }
    }
}

impl EvaluatorConfig {
    pub fn from_json_str(json_str: &str) -> DepositionResult<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DepositionResult<()> {
        if !(self.cutoff_rate_per_cm > 0.0) || self.cutoff_rate_per_cm.is_infinite() {
            return Err(DepositionError::invalid(format!(
                "cutoff rate {} /cm must be positive and finite",
                self.cutoff_rate_per_cm
            )));
        }
        Ok(())
    }
}

/// One evaluation of the deposition function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepositionRequest {
    /// Depth below the surface, cm
    pub depth_cm: f64,
    pub material: Material,
    pub source_class: SourceClass,
    /// Cosine of the angle between the incoming radiation and the surface normal
    pub cos_angle: f64,
    /// Fluence, kt/m²
    pub fluence_kt_m2: f64,
    /// Source duration, ns
    pub duration_ns: f64,
    /// Void fraction in (0, 1)
    pub porosity: f64,
}

impl DepositionRequest {
    /// Check the caller-supplied parameters. Depth is checked separately at lookup.
    pub fn validate(&self) -> DepositionResult<()> {
        validate_porosity(self.porosity)?;
        validate_source(self.cos_angle, self.fluence_kt_m2, self.duration_ns)
    }
}

fn validate_porosity(porosity: f64) -> DepositionResult<()> {
    if !(porosity > 0.0 && porosity < 1.0) {
        return Err(DepositionError::invalid(format!(
            "porosity {} must lie in the open interval (0, 1)",
            porosity
        )));
    }
    Ok(())
}

fn validate_source(cos_angle: f64, fluence_kt_m2: f64, duration_ns: f64) -> DepositionResult<()> {
    if !(0.0..=1.0).contains(&cos_angle) {
        return Err(DepositionError::invalid(format!(
            "cosine of incidence angle {} must lie in [0, 1]",
            cos_angle
        )));
    }
    if !(fluence_kt_m2 > 0.0) || fluence_kt_m2.is_infinite() {
        return Err(DepositionError::invalid(format!(
            "fluence {} kt/m² must be positive and finite",
            fluence_kt_m2
        )));
    }
    if !(duration_ns > 0.0) || duration_ns.is_infinite() {
        return Err(DepositionError::invalid(format!(
            "source duration {} ns must be positive and finite",
            duration_ns
        )));
    }
    Ok(())
}

fn validate_depth(depth_cm: f64) -> DepositionResult<()> {
    if !(depth_cm >= 0.0) {
        return Err(DepositionError::lookup(format!(
            "depth {} cm is outside the tabulated range [0, inf)",
            depth_cm
        )));
    }
    Ok(())
}

/// The deposition shape resolved for one material, source and incidence.
///
/// All fields are in the compacted (solid) depth frame except where noted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepositionProfile {
    /// Overall amplitude, jerk/cm³
    pub amplitude: f64,
    pub half_width_cm: f64,
    pub height: f64,
    pub tail_offset_cm: f64,
    pub tail_amplitude: f64,
    pub floor: f64,
    pub cutoff_cm: f64,
    pub cutoff_rate_per_cm: f64,
    /// 1 - porosity
    pub solid_fraction: f64,
    /// Linear scale applied when the angle-scaled fluence is below the fitted range
    pub edge_scale: f64,
    pub policy: DepthPolicy,
}

impl DepositionProfile {
    /// A profile that deposits nothing at any depth
    pub fn vanishing(solid_fraction: f64, policy: DepthPolicy) -> Self {
        Self {
            amplitude: 0.0,
            half_width_cm: 0.0,
            height: 0.0,
            tail_offset_cm: 0.0,
            tail_amplitude: 0.0,
            floor: 0.0,
            cutoff_cm: 0.0,
            cutoff_rate_per_cm: 0.0,
            solid_fraction,
            edge_scale: 0.0,
            policy,
        }
    }

    fn from_table(
        table: &ResponseTable,
        at: ResponsePoint,
        edge_scale: f64,
        config: &EvaluatorConfig,
    ) -> Self {
        let half_width_cm = table.half_width(at);
        let tail_fraction = table.tail_fraction(at);
        let plateau = table.plateau(at);
        let mut floor = table.shock_floor(at);

        let tail_offset_cm = (1.0 - tail_fraction) * 2.0 * half_width_cm;
        let mut tail_amplitude = (plateau - floor) * (2.0 * half_width_cm - tail_offset_cm);
        // the tail may never rise above the plateau
        if plateau - floor < 0.0 {
            tail_amplitude = 0.0;
            floor = plateau;
        }

        Self {
            amplitude: table.amplitude(at),
            half_width_cm,
            height: table.height(at),
            tail_offset_cm,
            tail_amplitude,
            floor,
            cutoff_cm: table.cutoff_depth(at),
            cutoff_rate_per_cm: if config.fitted_cutoff_rates {
                table.cutoff_rate(at, config.cutoff_rate_per_cm)
            } else {
                config.cutoff_rate_per_cm
            },
            solid_fraction: 1.0 - at.porosity,
            edge_scale,
            policy: config.depth_policy,
        }
    }

    pub fn is_vanishing(&self) -> bool {
        self.amplitude == 0.0 || self.edge_scale == 0.0
    }

    /// Cutoff depth measured in the porous target, cm
    pub fn cutoff_depth_cm(&self) -> f64 {
        self.cutoff_cm / self.solid_fraction
    }

    /// Depth where the near-surface half-ellipse ends, measured in the porous target, cm
    pub fn ellipse_depth_cm(&self) -> f64 {
        2.0 * self.half_width_cm / self.solid_fraction
    }

    /// Profile shape in jerk/cm³ per unit amplitude at compacted depth `d`.
    fn shape(&self, d: f64) -> f64 {
        let width = 2.0 * self.half_width_cm;
        if d < width {
            half_ellipse(d / self.half_width_cm - 1.0) * self.height
                + (self.tail_amplitude / (width - self.tail_offset_cm) + self.floor)
        } else {
            let roll_off = expit((self.cutoff_cm - d) * self.cutoff_rate_per_cm.abs());
            (self.tail_amplitude / (d - self.tail_offset_cm) + self.floor) * roll_off
        }
    }

    /// Energy density in Perg/cm³ at `depth_cm` below the surface of the porous target.
    pub fn energy_density(&self, depth_cm: f64) -> DepositionResult<f64> {
        validate_depth(depth_cm)?;
        if self.is_vanishing() {
            return Ok(0.0);
        }

        let d = depth_cm * self.solid_fraction;
        if self.policy == DepthPolicy::Truncate && d >= self.cutoff_cm {
            return Ok(0.0);
        }

        let value = JERK_TO_PERG * (self.shape(d) * self.amplitude) * self.solid_fraction
            * self.edge_scale;
        if !value.is_finite() {
            return Err(DepositionError::lookup(format!(
                "response tables produced a non-finite energy density at depth {} cm",
                depth_cm
            )));
        }
        Ok(value.max(0.0))
    }
}

/// Evaluates the deposition function against a set of response tables.
///
/// The evaluator only borrows the tables, so one registry can serve any
/// number of evaluators across threads.
#[derive(Clone, Debug)]
pub struct DepositionEvaluator<'a> {
    tables: &'a ResponseRegistry,
    pub config: EvaluatorConfig,
}

impl DepositionEvaluator<'static> {
    /// Evaluator over the embedded tables with the default configuration
    pub fn standard() -> DepositionResult<Self> {
        Ok(Self::new(ResponseRegistry::global()?, EvaluatorConfig::default()))
    }

    pub fn with_config(config: EvaluatorConfig) -> DepositionResult<Self> {
        config.validate()?;
        Ok(Self::new(ResponseRegistry::global()?, config))
    }
}

impl<'a> DepositionEvaluator<'a> {
    /// Build an evaluator without checking `config`; see [`EvaluatorConfig::validate`].
    pub fn new(tables: &'a ResponseRegistry, config: EvaluatorConfig) -> Self {
        Self { tables, config }
    }

    /// Resolve the depth profile for one source and incidence.
    pub fn profile(
        &self,
        material: Material,
        source_class: SourceClass,
        cos_angle: f64,
        fluence_kt_m2: f64,
        duration_ns: f64,
        porosity: f64,
    ) -> DepositionResult<DepositionProfile> {
        validate_porosity(porosity)?;
        self.resolve(material, source_class, cos_angle, fluence_kt_m2, duration_ns, porosity)
    }

    /// Profile of the fully dense material, the porosity -> 0 limit.
    pub fn solid_profile(
        &self,
        material: Material,
        source_class: SourceClass,
        cos_angle: f64,
        fluence_kt_m2: f64,
        duration_ns: f64,
    ) -> DepositionResult<DepositionProfile> {
        self.resolve(material, source_class, cos_angle, fluence_kt_m2, duration_ns, 0.0)
    }

    fn resolve(
        &self,
        material: Material,
        source_class: SourceClass,
        cos_angle: f64,
        fluence_kt_m2: f64,
        duration_ns: f64,
        porosity: f64,
    ) -> DepositionResult<DepositionProfile> {
        validate_source(cos_angle, fluence_kt_m2, duration_ns)?;
        let table = self.tables.get(material, source_class)?;
        let policy = self.config.depth_policy;

        // grazing incidence presents no projected area to the source
        if cos_angle == 0.0 {
            return Ok(DepositionProfile::vanishing(1.0 - porosity, policy));
        }

        let tsrc_sh = duration_ns * NS_TO_SHAKE;
        let scaled_fluence =
            fluence_kt_m2 * table.angle_scale(cos_angle, fluence_kt_m2.log10(), tsrc_sh);
        if !(scaled_fluence > 0.0) {
            return Ok(DepositionProfile::vanishing(1.0 - porosity, policy));
        }

        let (log_fluence, edge_scale) = if scaled_fluence < MIN_SCALED_FLUENCE {
            (MIN_LOG_SCALED_FLUENCE, scaled_fluence / MIN_SCALED_FLUENCE)
        } else {
            (scaled_fluence.log10(), 1.0)
        };

        let at = ResponsePoint { tsrc_sh, log_fluence, porosity };
        let profile = DepositionProfile::from_table(table, at, edge_scale, &self.config);

        if self.config.debug {
            println!(
                "🔬 {} @ {}: cos={:.3} F={:.3e} kt/m² t={:.1} ns φ={:.2} \
                 -> width {:.3e} cm, cutoff {:.3e} cm, amplitude {:.3e}",
                material,
                source_class,
                cos_angle,
                fluence_kt_m2,
                duration_ns,
                porosity,
                profile.ellipse_depth_cm(),
                profile.cutoff_depth_cm(),
                profile.amplitude
            );
        }

        Ok(profile)
    }

    /// Energy density in Perg/cm³ for a single request.
    pub fn evaluate(&self, request: &DepositionRequest) -> DepositionResult<f64> {
        request.validate()?;
        validate_depth(request.depth_cm)?;
        self.profile(
            request.material,
            request.source_class,
            request.cos_angle,
            request.fluence_kt_m2,
            request.duration_ns,
            request.porosity,
        )?
        .energy_density(request.depth_cm)
    }

    /// Energy density at each of `depths_cm` for one source and incidence.
    pub fn depth_series(
        &self,
        request: &DepositionRequest,
        depths_cm: &[f64],
    ) -> DepositionResult<Vec<f64>> {
        request.validate()?;
        let profile = self.profile(
            request.material,
            request.source_class,
            request.cos_angle,
            request.fluence_kt_m2,
            request.duration_ns,
            request.porosity,
        )?;
        depths_cm.iter().map(|&depth| profile.energy_density(depth)).collect()
    }
}

/// Energy density (Perg/cm³) deposited at `depth_cm` below the surface.
///
/// * `material` - one of `SiO2`, `Forsterite`, `Ice`, `Iron`
/// * `source_class` - blackbody temperature, `1.0` or `2.0` keV
/// * `cos_angle` - cosine of the angle of incidence, in [0, 1]
/// * `fluence_kt_m2` - fluence in kt/m²
/// * `duration_ns` - source duration in ns
/// * `porosity` - void fraction in (0, 1)
///
/// Uses the embedded response tables and the default depth policy.
pub fn edep(
    depth_cm: f64,
    material: &str,
    source_class: f64,
    cos_angle: f64,
    fluence_kt_m2: f64,
    duration_ns: f64,
    porosity: f64,
) -> DepositionResult<f64> {
    let request = DepositionRequest {
        depth_cm,
        material: material.parse()?,
        source_class: SourceClass::try_from(source_class)?,
        cos_angle,
        fluence_kt_m2,
        duration_ns,
        porosity,
    };
    DepositionEvaluator::standard()?.evaluate(&request)
}
