mod challenge;
mod components;
mod home;
mod login;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use challenge::ChallengeView;
pub use components::LoadingSpinner;
pub use home::HomeView;
pub use login::LoginView;
pub use state::{ViewError, ViewState, view_state_from_resource};
