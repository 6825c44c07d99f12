//! Integrates the deposited energy over a spherical asteroid below a burst
//! and compares it with the energy the asteroid intercepts.
//!
//! Usage: `calc_edep [config.json]`. Without arguments the reference
//! configuration is used; a JSON file may override any of its fields.

use asteroid_edep_rust::validation::{DepositionIntegrator, ValidationConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => ValidationConfig::from_json_file(&path)?,
        None => ValidationConfig { debug: true, ..ValidationConfig::default() },
    };

    println!("☄️  Asteroid Energy Deposition Check");
    println!("{}", "=".repeat(60));
    println!("📊 Configuration:");
    println!(
        "   - Material: {} ({} source, {} ns)",
        config.material, config.source_class, config.source_duration_ns
    );
    println!(
        "   - Radius {} m, height of burst {} m, yield {} kt",
        config.target_radius_m, config.height_of_burst_m, config.yield_kt
    );
    println!("   - Porosity {}", config.porosity);
    println!(
        "   - {} angle bins, depth resolution {:e} cm",
        config.angle_bins, config.depth_resolution_cm
    );
    println!();

    let integrator = DepositionIntegrator::standard(config)?;
    let report = integrator.run()?;

    println!();
    println!("📈 Results:");
    println!("   Energy intercepted by asteroid:  {:.4} kt", report.intercepted_energy_kt);
    println!("   Integrated deposited energy:     {:.4} kt", report.quadrature_energy_kt);
    println!("   Zone-centered deposited energy:  {:.4} kt", report.zone_centered_energy_kt);
    println!("   Coupling fraction:               {:.2}%", report.coupling_fraction * 100.0);
    println!("   Method difference:               {:.2}%", report.method_difference * 100.0);
    if report.coupling_fraction < 1.0 {
        println!("✅ Deposited energy is below the intercepted energy");
    } else {
        println!("❌ Deposited energy exceeds the intercepted energy");
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
