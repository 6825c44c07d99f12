use approx::{assert_abs_diff_eq, assert_relative_eq};
use asteroid_edep_rust::eos::EosRegistry;
use asteroid_edep_rust::heating::{heated_state, specific_energy_mj_kg, CellPhase};
use asteroid_edep_rust::melt::MeltTable;
use asteroid_edep_rust::{DepositionEvaluator, DepositionRequest, Material, SourceClass};
use more_asserts::{assert_gt, assert_lt};
use std::path::PathBuf;

// Fixture tables: E = cv T + e_cold(ρ), P = K (ρ/ρs - 1) + Γ ρ cv T,
// Tmelt = Tm0 (ρ/ρs)², on density axes spanning 0.3 to 1.5 times solid density.

fn table_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/eos")
}

fn registry() -> EosRegistry {
    EosRegistry::load_dir(table_dir()).unwrap()
}

#[test]
fn test_loads_every_material() {
    let registry = registry();
    assert_eq!(registry.len(), Material::ALL.len());
    for material in Material::ALL {
        let eos = registry.get(material).unwrap();
        assert_eq!(eos.material, material);
        assert_eq!(eos.grid.densities.len(), 7);
        assert_eq!(eos.grid.temperatures_k.len(), 9);
        assert_eq!(eos.grid.energies_mj_kg.len(), 63);
        assert_relative_eq!(
            eos.grid.densities[4],
            material.solid_density_g_cc(),
            max_relative = 1e-12
        );
    }
}

#[test]
fn test_state_at_solid_density() {
    let registry = registry();
    let sio2 = registry.get(Material::SiO2).unwrap();
    let state = sio2.state(2.65, 300.0).unwrap();
    assert_relative_eq!(state.energy_mj_kg, 0.3, max_relative = 1e-9);
    assert_relative_eq!(state.pressure_gpa, 0.7 * 2.65 * 0.3, max_relative = 1e-9);
    assert_gt!(state.sound_speed_km_s(), 0.0);

    // halfway between tabulated temperatures, energy is linear in T
    let state = sio2.state(2.65, 750.0).unwrap();
    assert_relative_eq!(state.energy_mj_kg, 0.75, max_relative = 1e-9);
}

#[test]
fn test_fixed_width_fields_with_negative_values() {
    let registry = registry();
    let iron = registry.get(Material::Iron).unwrap();
    // cold pressure is negative below solid density and fills the separating blank
    assert_relative_eq!(iron.cold.pressures_gpa[0], -116.2, max_relative = 1e-12);
    let low = iron.cold.densities[0];
    assert_relative_eq!(iron.cold_pressure(low).unwrap(), -116.2, max_relative = 1e-9);
    assert_abs_diff_eq!(iron.cold_pressure(7.874).unwrap(), 0.0, epsilon = 1e-12);
    assert_lt!(iron.state(3.937, 100.0).unwrap().pressure_gpa, 0.0);
}

#[test]
fn test_fortran_exponents_are_read() {
    let registry = registry();
    let forsterite = registry.get(Material::Forsterite).unwrap();
    assert_relative_eq!(forsterite.cold.densities[0], 0.981, max_relative = 1e-9);
    assert_abs_diff_eq!(forsterite.cold_pressure(3.27).unwrap(), 0.0, epsilon = 1e-9);
}

#[test]
fn test_temperature_from_energy_round_trip() {
    let registry = registry();
    for material in Material::ALL {
        let eos = registry.get(material).unwrap();
        let rho = 0.9 * material.solid_density_g_cc();
        for t in [150.0, 420.0, 3000.0, 42000.0] {
            let e = eos.state(rho, t).unwrap().energy_mj_kg;
            let back = eos.temperature_from_energy(rho, e).unwrap();
            assert_relative_eq!(back, t, max_relative = 1e-9);
        }
    }
}

#[test]
fn test_queries_outside_the_table() {
    let registry = registry();
    let ice = registry.get(Material::Ice).unwrap();
    assert!(ice.state(0.1, 300.0).unwrap_err().is_table_lookup());
    assert!(ice.state(0.917, 50.0).unwrap_err().is_table_lookup());
    assert!(ice.state(0.917, 2.0e5).unwrap_err().is_table_lookup());
    assert!(ice.temperature_from_energy(0.917, 1.0e6).unwrap_err().is_table_lookup());
    assert!(ice.melt_temperature(5.0).unwrap_err().is_table_lookup());
}

#[test]
fn test_charge_state_curve() {
    let registry = registry();
    let sio2 = registry.get(Material::SiO2).unwrap();
    assert_abs_diff_eq!(sio2.charge_state(1.0e3).unwrap(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(sio2.charge_state(5.5e4).unwrap(), 1.75, epsilon = 1e-9);
    assert!(sio2.charge_state(10.0).is_err());
}

#[test]
fn test_missing_directory_names_the_file() {
    let err = EosRegistry::load_dir(table_dir().join("missing")).unwrap_err();
    assert!(err.is_table_lookup());
    assert!(err.to_string().contains("SiO2.ses"));
}

#[test]
fn test_registry_requires_every_material() {
    let registry = registry();
    let only_ice = vec![registry.get(Material::Ice).unwrap().clone()];
    let err = EosRegistry::from_tables(only_ice).unwrap_err();
    assert!(err.is_table_lookup());

    let mut doubled: Vec<_> = Material::ALL
        .iter()
        .map(|m| registry.get(*m).unwrap().clone())
        .collect();
    doubled.push(registry.get(Material::Iron).unwrap().clone());
    assert!(EosRegistry::from_tables(doubled).is_err());
}

#[test]
fn test_global_registry_and_melt_lookup() {
    let global = EosRegistry::init_global(table_dir()).unwrap();
    assert_eq!(global.len(), 4);
    assert!(EosRegistry::global().is_ok());

    let ice = MeltTable::for_material(Material::Ice).unwrap();
    assert_eq!(ice.densities.len(), 7);
    assert_relative_eq!(ice.melt_temperature_k(0.917).unwrap(), 273.15, max_relative = 1e-9);

    let iron = MeltTable::for_material(Material::Iron).unwrap();
    let (low, high) = iron.density_range();
    assert_lt!(low, 7.874);
    assert_gt!(high, 7.874);
    assert_relative_eq!(iron.melt_temperature_k(7.874).unwrap(), 1811.0, max_relative = 1e-9);
}

#[test]
fn test_deposited_energy_heats_porous_ice() {
    let registry = registry();
    let ice = registry.get(Material::Ice).unwrap();
    let evaluator = DepositionEvaluator::standard().unwrap();
    let request = DepositionRequest {
        depth_cm: 1.0,
        material: Material::Ice,
        source_class: SourceClass::TwoKev,
        cos_angle: 1.0,
        fluence_kt_m2: 1.0e-3,
        duration_ns: 50.0,
        porosity: 0.3,
    };
    let deposited = evaluator.evaluate(&request).unwrap();
    assert_relative_eq!(deposited, 5.362e-6, max_relative = 1e-3);

    let state = heated_state(ice, request.porosity, deposited, 100.0).unwrap();
    assert_relative_eq!(state.bulk_density_g_cc, 0.917 * 0.7, max_relative = 1e-12);
    assert_relative_eq!(
        state.added_energy_mj_kg,
        specific_energy_mj_kg(deposited, state.bulk_density_g_cc),
        max_relative = 1e-12
    );
    // specific heat of the fixture is 2e-3 MJ/(kg K)
    assert_relative_eq!(
        state.temperature_k,
        100.0 + state.added_energy_mj_kg / 2.0e-3,
        max_relative = 1e-6
    );
    assert_eq!(state.phase, CellPhase::Molten);
}
