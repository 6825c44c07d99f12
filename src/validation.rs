//! Total energy deposited in a spherical asteroid by a burst above its surface.
//!
//! The asteroid of radius `R` sits at the origin of the meridian plane and the
//! burst at height `H` above the sub-burst point, on the +y axis. A surface point
//! at polar angle θ sees the burst along a slant line of length `L(θ)`; the
//! cosine between the surface normal and that line is the incidence cosine.
//! The deposition is integrated over the visible cap twice, once as a sum over
//! spherical-shell zones and once with nested Simpson quadrature.

use crate::constants::{
    CM3_PER_M3, CM_PER_M, DEPTH_SEARCH_FLOOR_PERG_CM3, DEPTH_SEARCH_GROWTH,
    DEPTH_SEARCH_MAX_STEPS, JERK_TO_PERG, KT_TO_JERK, SPEED_OF_LIGHT_M_PER_NS,
    ZONE_CUTOFF_PERG_CM3,
};
use crate::deposition::{DepositionEvaluator, DepositionProfile, EvaluatorConfig};
use crate::error::{DepositionError, DepositionResult};
use crate::material::{Material, SourceClass};
use crate::math_utils::try_simpson;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fs;
use std::path::Path;

/// Perg in one kiloton
const PERG_PER_KT: f64 = KT_TO_JERK * JERK_TO_PERG;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub material: Material,
    pub source_class: SourceClass,
    pub source_duration_ns: f64,
    pub target_radius_m: f64,
    pub height_of_burst_m: f64,
    pub yield_kt: f64,
    pub porosity: f64,
    /// Angular bins across the visible cap; zones are centred on the odd bins
    pub angle_bins: usize,
    pub depth_resolution_cm: f64,
    pub quadrature_theta_panels: usize,
    pub quadrature_depth_panels: usize,
    pub debug: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            material: Material::SiO2,
            source_class: SourceClass::TwoKev,
            source_duration_ns: 50.0,
            target_radius_m: 400.0,
            height_of_burst_m: 10.0,
            yield_kt: 1000.0,
            porosity: 0.21,
            angle_bins: 200,
            depth_resolution_cm: 5.0e-5,
            quadrature_theta_panels: 64,
            quadrature_depth_panels: 1000,
            debug: false,
        }
    }
}

impl ValidationConfig {
    pub fn from_json_str(json_str: &str) -> DepositionResult<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file; missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> DepositionResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> DepositionResult<()> {
        let positive = [
            ("target radius", self.target_radius_m),
            ("height of burst", self.height_of_burst_m),
            ("yield", self.yield_kt),
            ("source duration", self.source_duration_ns),
            ("depth resolution", self.depth_resolution_cm),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || value.is_infinite() {
                return Err(DepositionError::invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if self.angle_bins < 2 {
            return Err(DepositionError::invalid(format!(
                "need at least 2 angle bins, got {}",
                self.angle_bins
            )));
        }
        if self.quadrature_theta_panels == 0 || self.quadrature_depth_panels == 0 {
            return Err(DepositionError::invalid("quadrature panel counts must be non-zero"));
        }
        Ok(())
    }
}

/// Burst-target geometry in the meridian plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstGeometry {
    pub radius_m: f64,
    pub height_m: f64,
    pub yield_kt: f64,
}

impl BurstGeometry {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            radius_m: config.target_radius_m,
            height_m: config.height_of_burst_m,
            yield_kt: config.yield_kt,
        }
    }

    fn burst(&self) -> DVec2 {
        DVec2::new(0.0, self.radius_m + self.height_m)
    }

    /// Unit surface normal at polar angle `theta`.
    fn normal(theta: f64) -> DVec2 {
        DVec2::new(theta.sin(), theta.cos())
    }

    /// Polar half-angle of the cap that can see the burst
    pub fn visible_half_angle(&self) -> f64 {
        (self.radius_m / (self.radius_m + self.height_m)).acos()
    }

    /// Energy (kt) radiated into the solid angle subtended by the asteroid.
    pub fn intercepted_energy_kt(&self) -> f64 {
        let alpha_max = (self.radius_m / (self.radius_m + self.height_m)).asin();
        0.5 * self.yield_kt * (1.0 - alpha_max.cos())
    }

    /// Distance (m) from the burst to the surface point at `theta`.
    pub fn slant_length_m(&self, theta: f64) -> f64 {
        (self.burst() - self.radius_m * Self::normal(theta)).length()
    }

    /// Cosine between the surface normal at `theta` and the line to the burst.
    pub fn incidence_cosine(&self, theta: f64) -> f64 {
        let surface = self.radius_m * Self::normal(theta);
        let to_burst = (self.burst() - surface).normalize_or_zero();
        Self::normal(theta).dot(to_burst).clamp(0.0, 1.0)
    }

    /// Fluence (kt/m²) arriving at the surface point at `theta`.
    pub fn fluence_kt_m2(&self, theta: f64) -> f64 {
        let length = self.slant_length_m(theta);
        self.yield_kt * self.incidence_cosine(theta) / (4.0 * PI * length * length)
    }

    /// On-axis fluence (kt/m²) at the sub-burst point
    pub fn axis_fluence_kt_m2(&self) -> f64 {
        self.yield_kt / (4.0 * PI * self.height_m * self.height_m)
    }
}

/// Integrated deposition for one validation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationReport {
    pub material: Material,
    pub source_class: SourceClass,
    pub intercepted_energy_kt: f64,
    pub zone_centered_energy_kt: f64,
    pub quadrature_energy_kt: f64,
    pub deposition_depth_cm: f64,
    /// Quadrature energy over intercepted energy
    pub coupling_fraction: f64,
    /// Relative difference between the two integration methods
    pub method_difference: f64,
}

/// Integrates the deposition function over the visible cap of a spherical target.
pub struct DepositionIntegrator<'a> {
    evaluator: DepositionEvaluator<'a>,
    config: ValidationConfig,
    geometry: BurstGeometry,
}

impl DepositionIntegrator<'static> {
    pub fn standard(config: ValidationConfig) -> DepositionResult<Self> {
        let evaluator = DepositionEvaluator::with_config(EvaluatorConfig::default())?;
        Self::new(evaluator, config)
    }
}

impl<'a> DepositionIntegrator<'a> {
    pub fn new(
        evaluator: DepositionEvaluator<'a>,
        config: ValidationConfig,
    ) -> DepositionResult<Self> {
        config.validate()?;
        let geometry = BurstGeometry::from_config(&config);
        Ok(Self { evaluator, config, geometry })
    }

    pub fn geometry(&self) -> &BurstGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    fn profile_at(
        &self,
        cos_angle: f64,
        fluence_kt_m2: f64,
        duration_ns: f64,
    ) -> DepositionResult<DepositionProfile> {
        let c = &self.config;
        if cos_angle <= 0.0 || fluence_kt_m2 <= 0.0 {
            let policy = self.evaluator.config.depth_policy;
            return Ok(DepositionProfile::vanishing(1.0 - c.porosity, policy));
        }
        self.evaluator.profile(
            c.material,
            c.source_class,
            cos_angle,
            fluence_kt_m2,
            duration_ns,
            c.porosity,
        )
    }

    /// Depth (cm) below which the on-axis deposition is negligible.
    pub fn find_deposition_depth(&self) -> DepositionResult<f64> {
        let profile = self.profile_at(
            1.0,
            self.geometry.axis_fluence_kt_m2(),
            self.config.source_duration_ns,
        )?;

        let mut depth = self.config.depth_resolution_cm;
        for _ in 0..DEPTH_SEARCH_MAX_STEPS {
            depth *= DEPTH_SEARCH_GROWTH;
            if profile.energy_density(depth)? <= DEPTH_SEARCH_FLOOR_PERG_CM3 {
                return Ok(depth);
            }
        }
        Err(DepositionError::Integration(format!(
            "on-axis deposition still above {:e} Perg/cm³ at {:e} cm after {} steps",
            DEPTH_SEARCH_FLOOR_PERG_CM3, depth, DEPTH_SEARCH_MAX_STEPS
        )))
    }

    /// Sum of energy density times zone volume over spherical-shell zones, kt.
    ///
    /// Each angular zone spans two bins and is evaluated at its centre, with the
    /// source lengthened by the light-travel spread across the zone. Depth zones
    /// of width `2 * depth_resolution` are summed until the deposition drops below
    /// the zone cutoff.
    pub fn zone_centered_energy_kt(&self, deposition_depth_cm: f64) -> DepositionResult<f64> {
        let c = &self.config;
        let g = &self.geometry;
        let theta_max = g.visible_half_angle();
        let bins = c.angle_bins as f64;
        let res = c.depth_resolution_cm;
        let radius_cm = g.radius_m * CM_PER_M;

        let mut total_perg = 0.0;
        for t in (1..c.angle_bins).step_by(2) {
            let theta = theta_max * t as f64 / bins;
            let theta0 = theta_max * (t - 1) as f64 / bins;
            let theta1 = theta_max * (t + 1) as f64 / bins;

            let spread_ns = (g.slant_length_m(theta1) - g.slant_length_m(theta0)).abs()
                / SPEED_OF_LIGHT_M_PER_NS;
            let beta = g.incidence_cosine(theta);
            let fluence = g.fluence_kt_m2(theta);
            let solid_angle_band = theta0.cos() - theta1.cos();
            let profile = self.profile_at(beta, fluence, c.source_duration_ns + spread_ns)?;

            let mut reached_cutoff = false;
            let mut k = 0usize;
            loop {
                let depth = res * (1 + 2 * k) as f64;
                if depth >= deposition_depth_cm {
                    break;
                }
                let de = profile.energy_density(depth)?;
                if de < ZONE_CUTOFF_PERG_CM3 {
                    reached_cutoff = true;
                    break;
                }
                let outer = radius_cm - (depth - res);
                let inner = radius_cm - (depth + res);
                let volume_cm3 =
                    2.0 * PI * (outer.powi(3) - inner.powi(3)) * solid_angle_band / 3.0;
                total_perg += de * volume_cm3;
                k += 1;
            }

            if !reached_cutoff {
                return Err(DepositionError::Integration(format!(
                    "deposition depth {:e} cm is not deep enough at θ = {:.4} rad",
                    deposition_depth_cm, theta
                )));
            }
            if c.debug && (t / 2) % 10 == 0 {
                println!(
                    "  zone bin {}/{}: β={:.4} F={:.3e} kt/m² running total {:.4} kt",
                    t,
                    c.angle_bins,
                    beta,
                    fluence,
                    total_perg / PERG_PER_KT
                );
            }
        }

        Ok(total_perg / PERG_PER_KT)
    }

    /// Simpson quadrature of the deposited energy over the cap and depth, kt.
    pub fn quadrature_energy_kt(&self, deposition_depth_cm: f64) -> DepositionResult<f64> {
        let c = &self.config;
        let g = &self.geometry;
        let theta_max = g.visible_half_angle();
        let r_outer = g.radius_m;
        let r_inner = r_outer - deposition_depth_cm / CM_PER_M;

        let total_perg = try_simpson(
            |theta| -> DepositionResult<f64> {
                let profile = self.profile_at(
                    g.incidence_cosine(theta),
                    g.fluence_kt_m2(theta),
                    c.source_duration_ns,
                )?;
                if profile.is_vanishing() {
                    return Ok(0.0);
                }
                let along_radius = try_simpson(
                    |r| -> DepositionResult<f64> {
                        let depth_cm = (r_outer - r).max(0.0) * CM_PER_M;
                        Ok(profile.energy_density(depth_cm)? * CM3_PER_M3 * 2.0 * PI * r * r)
                    },
                    r_inner,
                    r_outer,
                    c.quadrature_depth_panels,
                )?;
                Ok(along_radius * theta.sin())
            },
            0.0,
            theta_max,
            c.quadrature_theta_panels,
        )?;

        Ok(total_perg / PERG_PER_KT)
    }

    /// Run the depth search and both integrations.
    pub fn run(&self) -> DepositionResult<ValidationReport> {
        let c = &self.config;
        let intercepted = self.geometry.intercepted_energy_kt();
        if c.debug {
            println!(
                "☄️  {} @ {}: R={} m, HOB={} m, Y={} kt, φ={}",
                c.material,
                c.source_class,
                c.target_radius_m,
                c.height_of_burst_m,
                c.yield_kt,
                c.porosity
            );
            println!("  Energy intercepted by asteroid: {:.4} kt", intercepted);
        }

        let depth = self.find_deposition_depth()?;
        if c.debug {
            println!("  Deposition depth on axis: {:.4e} cm", depth);
            println!(
                "  Starting quadrature ({} x {} panels)",
                c.quadrature_theta_panels, c.quadrature_depth_panels
            );
        }

        let quadrature = self.quadrature_energy_kt(depth)?;
        if c.debug {
            println!("  Integrated deposited energy: {:.4} kt", quadrature);
        }

        let zone = self.zone_centered_energy_kt(depth)?;
        if c.debug {
            println!("  Zone-centered deposited energy: {:.4} kt", zone);
        }

        Ok(ValidationReport {
            material: c.material,
            source_class: c.source_class,
            intercepted_energy_kt: intercepted,
            zone_centered_energy_kt: zone,
            quadrature_energy_kt: quadrature,
            deposition_depth_cm: depth,
            coupling_fraction: quadrature / intercepted,
            method_difference: (zone - quadrature).abs() / quadrature.abs().max(f64::MIN_POSITIVE),
        })
    }
}
