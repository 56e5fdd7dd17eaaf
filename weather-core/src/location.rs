/// Coordinate pair delivered by a location source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Why a location source could not produce a fix.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFailure {
    PermissionDenied,
    Unavailable,
    Other(String),
}

impl LocationFailure {
    pub fn message(&self) -> String {
        match self {
            LocationFailure::PermissionDenied => "Location permission required".to_string(),
            LocationFailure::Unavailable => "Unable to get current location. Please ensure \
                                            location services are enabled and try again."
                .to_string(),
            LocationFailure::Other(cause) => format!("Error getting location: {cause}"),
        }
    }
}

impl std::fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
