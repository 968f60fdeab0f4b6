//! Profiling tool to identify performance bottlenecks

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use voxel_landscape::config::GenParams;
use voxel_landscape::generator::Generator;
use voxel_landscape::logging::init_logging;

fn main() {
    init_logging(false);

    let params = GenParams {
        seed: Some(1337),
        basins: Some(2),
        ridges: Some(1),
        margins: Some(2),
        ..GenParams::new(256, 256, 20_000)
    };

    println!("=== Performance Profiling ===");
    println!(
        "Map size: {}x{} ({} cells), {} years in steps of {}",
        params.width,
        params.height,
        params.width * params.height,
        params.years,
        params.delta_years
    );
    println!();

    let mut generator = match Generator::new(params) {
        Ok(generator) => generator,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let mut phases: Vec<(&str, Duration)> = Vec::new();

    let start = Instant::now();
    generator.setup_map();
    phases.push(("Setup map", start.elapsed()));

    let start = Instant::now();
    generator.split_map();
    generator.set_properties();
    phases.push(("Plate partition", start.elapsed()));

    let start = Instant::now();
    generator.set_height();
    phases.push(("Base heights", start.elapsed()));

    let start = Instant::now();
    if let Err(err) = generator.generate_elements() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
    phases.push(("Element siting", start.elapsed()));

    // Step every element by hand so each kind gets its own timer.
    let mut per_kind: BTreeMap<String, (Duration, u64)> = BTreeMap::new();
    let years = generator.params.years;
    let delta = generator.params.delta_years as u64;
    let start = Instant::now();
    while generator.current_year < years {
        for element in &mut generator.elements {
            let step = Instant::now();
            element.advance(&mut generator.grid, delta);
            let entry = per_kind.entry(element.kind().to_string()).or_default();
            entry.0 += step.elapsed();
            entry.1 += 1;
        }
        generator.current_year += delta;
    }
    phases.push(("Simulation", start.elapsed()));

    for (name, time) in &phases {
        println!("{}: {:?}", name, time);
    }

    println!("\nPer element kind:");
    for (kind, (time, steps)) in &per_kind {
        let mean = *time / (*steps).max(1) as u32;
        println!("  {:<18} {:>6} steps, total {:?}, mean {:?}", kind, steps, time, mean);
    }

    // Summary
    let total: Duration = phases.iter().map(|(_, t)| *t).sum();
    println!("\n=== Summary ===");
    for (name, time) in &phases {
        println!(
            "{:<16} {:>8.2}% ({:?})",
            name,
            100.0 * time.as_secs_f64() / total.as_secs_f64().max(f64::EPSILON),
            time
        );
    }
    println!("─────────────────────────────────");
    println!("Total:           {:?}", total);
    println!(
        "Max height: {}, voxels: {}",
        generator.grid.max_height(),
        generator.grid.voxel_count()
    );
}
