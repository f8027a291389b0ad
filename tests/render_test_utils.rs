use map_maker::location::markers_from_locations;
use map_maker::{Location, Shape};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

pub fn initialize_logger_once() {
    INIT_LOGGER.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub mod shared {
    use super::*;

    pub const EPSILON: f64 = 1e-9;

    #[allow(dead_code)]
    pub fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPSILON
    }

    /// A handful of US cities, lat/long in degrees.
    #[allow(dead_code)]
    pub fn us_cities() -> Vec<Location> {
        vec![
            Location::new("Seattle", 47.61, -122.33),
            Location::new("Miami", 25.76, -80.19),
            Location::new("Chicago", 41.88, -87.63),
            Location::new("Boston", 42.36, -71.06),
            Location::new("San Diego", 32.72, -117.16),
        ]
    }

    #[allow(dead_code)]
    pub fn markers(records: &[(&str, f64, f64)]) -> Vec<Shape> {
        initialize_logger_once();
        let locations: Vec<Location> = records
            .iter()
            .map(|(name, lat, long)| Location::new(*name, *lat, *long))
            .collect();
        markers_from_locations(&locations)
    }
}
