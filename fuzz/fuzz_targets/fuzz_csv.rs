#![no_main]

use libfuzzer_sys::fuzz_target;

use afforestation_impact::io::load_repository_from_csv_bytes;
use afforestation_impact::Projector;

// Split the input on the first NUL into growth and species tables.
fuzz_target!(|data: &[u8]| {
    let split = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (growth, species) = data.split_at(split);
    let species = species.get(1..).unwrap_or(&[]);

    if let Ok(repo) = load_repository_from_csv_bytes(growth, species) {
        let projector = Projector::new(&repo);
        for id in projector.species_ids() {
            if let Ok(result) = projector.project(&id, 50, 100, None) {
                assert!(result.total_co2_tons().is_finite() || result.points.is_empty());
            }
        }
    }
});
