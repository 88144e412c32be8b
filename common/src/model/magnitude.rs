/// Color classification of an event's magnitude.
///
/// Buckets follow the usual USGS classes; anything below 3 (or without a
/// magnitude at all) is drawn with the map library's default marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MagnitudeBucket {
    Micro,
    Minor,
    Light,
    Moderate,
    Strong,
    Major,
    Great,
}

impl MagnitudeBucket {
    pub fn classify(magnitude: Option<f64>) -> Self {
        let Some(mag) = magnitude.filter(|m| !m.is_nan()) else {
            return MagnitudeBucket::Micro;
        };
        if mag >= 8.0 {
            MagnitudeBucket::Great
        } else if mag >= 7.0 {
            MagnitudeBucket::Major
        } else if mag >= 6.0 {
            MagnitudeBucket::Strong
        } else if mag >= 5.0 {
            MagnitudeBucket::Moderate
        } else if mag >= 4.0 {
            MagnitudeBucket::Light
        } else if mag >= 3.0 {
            MagnitudeBucket::Minor
        } else {
            MagnitudeBucket::Micro
        }
    }

    /// CSS color handed to the marker constructor.
    pub fn color(self) -> &'static str {
        match self {
            MagnitudeBucket::Micro => "#3FB1CE",
            MagnitudeBucket::Minor => "#8BC34A",
            MagnitudeBucket::Light => "#FFEB3B",
            MagnitudeBucket::Moderate => "#FFA000",
            MagnitudeBucket::Strong => "#F4511E",
            MagnitudeBucket::Major => "#D50000",
            MagnitudeBucket::Great => "#6A1B9A",
        }
    }
}
