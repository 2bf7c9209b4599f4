pub mod settings_provider;

/// Fixed user-visible string for a refused location request. There is no
/// programmatic retry; the user has to change system settings.
pub const DENIED_MESSAGE: &str =
    "Location access is denied. Allow location access in settings and try again.";

/// Permission state reported by the platform location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Authorized,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Components of a reverse-geocoded place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placemark {
    pub locality: Option<String>,
    pub administrative_area: Option<String>,
    pub country: Option<String>,
}

impl Placemark {
    /// Human-readable place name: "City, State", falling back to
    /// "City, Country", "State, Country", then the bare country. `None`
    /// when no component is known.
    pub fn display_name(&self) -> Option<String> {
        match (
            self.locality.as_deref(),
            self.administrative_area.as_deref(),
            self.country.as_deref(),
        ) {
            (Some(city), Some(state), _) => Some(format!("{}, {}", city, state)),
            (Some(city), None, Some(country)) => Some(format!("{}, {}", city, country)),
            (None, Some(state), Some(country)) => Some(format!("{}, {}", state, country)),
            (None, None, Some(country)) => Some(country.to_string()),
            (Some(city), None, None) => Some(city.to_string()),
            (None, Some(state), None) => Some(state.to_string()),
            (None, None, None) => None,
        }
    }
}

/// Error type for location and geocoding operations
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("no position available")]
    PositionUnavailable,
    #[error("no place found for {latitude}, {longitude}")]
    NoPlaceFound { latitude: f64, longitude: f64 },
    #[error("unknown place: {0}")]
    UnknownPlace(String),
}

/// Narrow interface over the platform GPS/permission services.
pub trait LocationProvider {
    fn authorization(&self) -> AuthorizationStatus;
    /// Ask the user for permission; returns the resulting status.
    fn request_authorization(&mut self) -> AuthorizationStatus;
    fn current_position(&mut self) -> Result<Coordinate, LocationError>;
}

/// Narrow interface over the platform geocoding service.
pub trait Geocoder {
    /// Coordinate → place components.
    fn reverse(&self, position: Coordinate) -> Result<Placemark, LocationError>;
    /// Place name → coordinate.
    fn forward(&self, query: &str) -> Result<Coordinate, LocationError>;
}

/// Where a location request currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationState {
    Unrequested,
    AwaitingAuthorization,
    Fetching,
    Denied,
    Resolved,
}

/// Final outcome of a location request.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    /// Authorization granted, position fetched and resolved to a place
    /// name.
    Granted { position: Coordinate, place: String },
    /// The user has refused access; callers show [`DENIED_MESSAGE`].
    Denied,
    /// Fetch or geocoding failed; the location stays unset and the user
    /// may retry.
    Failed(String),
}

/// Authorization-gated position fetch plus reverse geocoding.
///
/// One `request_location` call drives the whole flow and returns the
/// outcome; `state` is observable for frontends that render progress.
pub struct LocationService<P, G> {
    provider: P,
    geocoder: G,
    state: LocationState,
}

impl<P: LocationProvider, G: Geocoder> LocationService<P, G> {
    pub fn new(provider: P, geocoder: G) -> Self {
        LocationService {
            provider,
            geocoder,
            state: LocationState::Unrequested,
        }
    }

    pub fn state(&self) -> LocationState {
        self.state
    }

    /// Run the request flow: check (or request) authorization, fetch the
    /// position, reverse-geocode it to a display name.
    pub fn request_location(&mut self) -> LocationOutcome {
        match self.provider.authorization() {
            AuthorizationStatus::Authorized => self.fetch(),
            AuthorizationStatus::Denied => {
                self.state = LocationState::Denied;
                LocationOutcome::Denied
            }
            AuthorizationStatus::NotDetermined => {
                self.state = LocationState::AwaitingAuthorization;
                match self.provider.request_authorization() {
                    AuthorizationStatus::Authorized => self.fetch(),
                    _ => {
                        self.state = LocationState::Denied;
                        LocationOutcome::Denied
                    }
                }
            }
        }
    }

    fn fetch(&mut self) -> LocationOutcome {
        self.state = LocationState::Fetching;
        let position = match self.provider.current_position() {
            Ok(p) => p,
            Err(e) => {
                log::warn!("location fetch failed: {}", e);
                self.state = LocationState::Unrequested;
                return LocationOutcome::Failed(e.to_string());
            }
        };
        let place = match self.geocoder.reverse(position) {
            Ok(placemark) => placemark.display_name(),
            Err(e) => {
                log::warn!("reverse geocoding failed: {}", e);
                self.state = LocationState::Unrequested;
                return LocationOutcome::Failed(e.to_string());
            }
        };
        match place {
            Some(place) => {
                self.state = LocationState::Resolved;
                LocationOutcome::Granted { position, place }
            }
            None => {
                let e = LocationError::NoPlaceFound {
                    latitude: position.latitude,
                    longitude: position.longitude,
                };
                log::warn!("reverse geocoding failed: {}", e);
                self.state = LocationState::Unrequested;
                LocationOutcome::Failed(e.to_string())
            }
        }
    }
}
