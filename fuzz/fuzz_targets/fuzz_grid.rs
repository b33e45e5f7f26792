#![no_main]

use libfuzzer_sys::fuzz_target;

use afforestation_impact::io::RasterGrid;

fn sample_corners(grid: &RasterGrid) {
    let _ = grid.sample(0.0, 0.0);
    let _ = grid.sample(-90.0, 180.0);
    let _ = grid.sample(90.0, -180.0);
}

fuzz_target!(|data: &[u8]| {
    if let Ok(grid) = RasterGrid::from_geotiff(std::io::Cursor::new(data)) {
        sample_corners(&grid);
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(grid) = RasterGrid::parse_ascii(text) {
            sample_corners(&grid);
        }
    }
});
