// Integrated deposition over a spherical asteroid, checked against the intercepted energy
// and between the two integration methods.

use approx::assert_relative_eq;
use asteroid_edep_rust::validation::{BurstGeometry, DepositionIntegrator, ValidationConfig};
use asteroid_edep_rust::{assert_deviation, DepositionError, Material};
use more_asserts::{assert_gt, assert_lt};

fn coarse_config() -> ValidationConfig {
    ValidationConfig {
        angle_bins: 80,
        depth_resolution_cm: 1.0e-4,
        quadrature_theta_panels: 64,
        quadrature_depth_panels: 400,
        ..ValidationConfig::default()
    }
}

#[test]
fn test_reference_problem_energy_budget() {
    println!("☄️ Testing energy budget of the reference burst");
    let integrator = DepositionIntegrator::standard(coarse_config()).unwrap();
    let report = integrator.run().unwrap();

    println!("   Intercepted:    {:.4} kt", report.intercepted_energy_kt);
    println!("   Quadrature:     {:.4} kt", report.quadrature_energy_kt);
    println!("   Zone-centered:  {:.4} kt", report.zone_centered_energy_kt);
    println!("   Depth:          {:.4e} cm", report.deposition_depth_cm);

    assert_relative_eq!(report.intercepted_energy_kt, 390.24390243902434, max_relative = 1e-12);
    assert_relative_eq!(report.deposition_depth_cm, 1.122274146401882, max_relative = 1e-9);
    assert_relative_eq!(report.quadrature_energy_kt, 74.24045121634346, max_relative = 1e-3);
    assert_relative_eq!(report.zone_centered_energy_kt, 72.0418454972847, max_relative = 2e-3);

    assert_lt!(report.coupling_fraction, 1.0);
    assert_gt!(report.coupling_fraction, 0.0);
    assert_deviation!(
        report.zone_centered_energy_kt,
        report.quadrature_energy_kt,
        5.0,
        "zone sum and quadrature should agree"
    );
    println!("   ✅ Deposited energy stays below the intercepted energy");
}

#[test]
fn test_every_material_deposits_less_than_intercepted() {
    for material in Material::ALL {
        let config = ValidationConfig {
            material,
            angle_bins: 20,
            depth_resolution_cm: 5.0e-4,
            quadrature_theta_panels: 16,
            quadrature_depth_panels: 200,
            ..ValidationConfig::default()
        };
        let integrator = DepositionIntegrator::standard(config).unwrap();
        let depth = integrator.find_deposition_depth().unwrap();
        let deposited = integrator.quadrature_energy_kt(depth).unwrap();
        let intercepted = integrator.geometry().intercepted_energy_kt();
        println!("   {}: {:.3} of {:.3} kt", material, deposited, intercepted);
        assert_gt!(deposited, 0.0);
        assert_lt!(deposited, intercepted);
    }
}

#[test]
fn test_shallow_depth_is_an_integration_error() {
    let integrator = DepositionIntegrator::standard(coarse_config()).unwrap();
    let err = integrator.zone_centered_energy_kt(5.0e-4).unwrap_err();
    assert!(matches!(err, DepositionError::Integration(_)));
    assert!(err.to_string().contains("not deep enough"));
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let config = ValidationConfig { height_of_burst_m: 0.0, ..ValidationConfig::default() };
    assert!(DepositionIntegrator::standard(config).is_err());

    let config = ValidationConfig { angle_bins: 1, ..ValidationConfig::default() };
    let err = DepositionIntegrator::standard(config).err().unwrap();
    assert!(err.is_invalid_input());
}

#[test]
fn test_geometry_of_a_distant_burst() {
    let geometry = BurstGeometry { radius_m: 100.0, height_m: 1.0e6, yield_kt: 50.0 };
    // a distant burst sees almost a hemisphere and intercepts about Y R² / 4D²
    let theta_max = geometry.visible_half_angle();
    assert_lt!(theta_max, std::f64::consts::FRAC_PI_2);
    assert_gt!(theta_max, 1.5);

    let distance = 100.0 + 1.0e6;
    let expected = 50.0 * 0.25 * (100.0 / distance) * (100.0 / distance);
    assert_relative_eq!(geometry.intercepted_energy_kt(), expected, max_relative = 1e-3);
}
