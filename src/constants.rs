// Internal units are gram-cm-shake: 1 shake = 1e-8 s = 10 ns.
pub const NS_TO_SHAKE: f64 = 0.1;

// 1 jerk = 1e16 erg = 10 Perg
pub const JERK_TO_PERG: f64 = 10.0;
pub const KT_TO_JERK: f64 = 4184.0;
pub const KT_PER_M2_TO_JERK_PER_CM2: f64 = 0.4184;

/// Perg/cm³ -> J/cm³
pub const PERG_CM3_TO_J_CM3: f64 = 1.0e8;
/// J/g -> MJ/kg
pub const J_PER_G_TO_MJ_PER_KG: f64 = 1.0e-3;

pub const CM_PER_M: f64 = 100.0;
pub const CM3_PER_M3: f64 = 1.0e6;

pub const SPEED_OF_LIGHT_M_PER_NS: f64 = 0.299792458;

// Response model limits
pub const MIN_SCALED_FLUENCE: f64 = 1.0e-4;
pub const MIN_LOG_SCALED_FLUENCE: f64 = -4.0;
/// Logistic roll-off rate (1/cm) at the shock cutoff depth.
pub const DEFAULT_CUTOFF_RATE_PER_CM: f64 = 1.0e4;

// Nominal solid densities, g/cm³
pub const SIO2_DENSITY_G_CC: f64 = 2.65;
pub const FORSTERITE_DENSITY_G_CC: f64 = 3.27;
pub const ICE_DENSITY_G_CC: f64 = 0.917;
pub const IRON_DENSITY_G_CC: f64 = 7.874;

// Validation integration thresholds
pub const DEPTH_SEARCH_FLOOR_PERG_CM3: f64 = 1.0e-80;
pub const ZONE_CUTOFF_PERG_CM3: f64 = 1.0e-10;
pub const DEPTH_SEARCH_GROWTH: f64 = 1.5;
pub const DEPTH_SEARCH_MAX_STEPS: usize = 400;
