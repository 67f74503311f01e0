mod database;
mod state_builder;

pub use state_builder::{build_app_state, build_authentication_service};
