//! Settings-backed location collaborator.
//!
//! The CLI has no GPS radio; the `[location]` block of `settings.toml`
//! stands in for the platform services through the same narrow traits: a
//! fixed coordinate plays the GPS fix, a `denied` switch plays the
//! permission refusal, and a `[[location.places]]` table answers
//! reverse/forward lookups.

use crate::location::{
    AuthorizationStatus, Coordinate, Geocoder, LocationError, LocationProvider, Placemark,
};
use crate::model::config::{LocationSettings, PlaceEntry};

pub struct SettingsLocationProvider {
    settings: LocationSettings,
    authorization: AuthorizationStatus,
}

impl SettingsLocationProvider {
    pub fn new(settings: LocationSettings) -> Self {
        let authorization = if settings.denied {
            AuthorizationStatus::Denied
        } else {
            AuthorizationStatus::NotDetermined
        };
        SettingsLocationProvider {
            settings,
            authorization,
        }
    }

    fn configured_position(&self) -> Option<Coordinate> {
        match (self.settings.latitude, self.settings.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

impl LocationProvider for SettingsLocationProvider {
    fn authorization(&self) -> AuthorizationStatus {
        self.authorization
    }

    fn request_authorization(&mut self) -> AuthorizationStatus {
        // A configured coordinate is the user saying yes.
        if self.authorization == AuthorizationStatus::NotDetermined {
            self.authorization = if self.configured_position().is_some() {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
        }
        self.authorization
    }

    fn current_position(&mut self) -> Result<Coordinate, LocationError> {
        self.configured_position()
            .ok_or(LocationError::PositionUnavailable)
    }
}

pub struct SettingsGeocoder {
    places: Vec<PlaceEntry>,
}

impl SettingsGeocoder {
    pub fn new(settings: &LocationSettings) -> Self {
        SettingsGeocoder {
            places: settings.places.clone(),
        }
    }
}

impl Geocoder for SettingsGeocoder {
    /// Nearest configured place wins.
    fn reverse(&self, position: Coordinate) -> Result<Placemark, LocationError> {
        self.places
            .iter()
            .min_by(|a, b| {
                distance_sq(a, position)
                    .partial_cmp(&distance_sq(b, position))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(placemark_of)
            .ok_or(LocationError::NoPlaceFound {
                latitude: position.latitude,
                longitude: position.longitude,
            })
    }

    fn forward(&self, query: &str) -> Result<Coordinate, LocationError> {
        let query = query.trim().to_lowercase();
        self.places
            .iter()
            .find(|p| {
                p.locality
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase() == query)
                    || placemark_of(p)
                        .display_name()
                        .is_some_and(|n| n.to_lowercase() == query)
            })
            .map(|p| Coordinate {
                latitude: p.latitude,
                longitude: p.longitude,
            })
            .ok_or_else(|| LocationError::UnknownPlace(query))
    }
}

fn placemark_of(place: &PlaceEntry) -> Placemark {
    Placemark {
        locality: place.locality.clone(),
        administrative_area: place.administrative_area.clone(),
        country: place.country.clone(),
    }
}

fn distance_sq(place: &PlaceEntry, position: Coordinate) -> f64 {
    let dlat = place.latitude - position.latitude;
    let dlon = place.longitude - position.longitude;
    dlat * dlat + dlon * dlon
}
