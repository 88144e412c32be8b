/// Geographic rectangle currently rendered by the map, in degrees.
///
/// Longitudes are taken as the renderer reports them, which means they may
/// be "unwrapped" (e.g. `west = 170, east = 200` when the view straddles the
/// antimeridian, or a span wider than 360 when zoomed far out).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Closed containment test for a point given as latitude/longitude.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if !(latitude >= self.south && latitude <= self.north) {
            return false;
        }
        self.contains_longitude(longitude)
    }

    fn contains_longitude(&self, longitude: f64) -> bool {
        if !longitude.is_finite() {
            return false;
        }
        let span = self.east - self.west;
        if span >= 360.0 {
            return true;
        }
        if span < 0.0 {
            // Wrapped pair as reported by some renderers: west > east.
            return longitude >= self.west || longitude <= self.east;
        }
        // Shift the point into [west, west + 360) before comparing.
        let shifted = self.west + (longitude - self.west).rem_euclid(360.0);
        shifted <= self.east
    }
}
