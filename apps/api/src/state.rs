use custodia_application::{AuthenticationService, PersonService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub person_service: PersonService,
    pub authentication_service: AuthenticationService,
}
