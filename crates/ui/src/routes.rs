use dioxus::prelude::*;
use dioxus_router::Routable;

use crate::views::{ChallengeView, HomeView, LoginView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/", LoginView)] Login {},
    #[route("/home", HomeView)] Home {},
    #[route("/challenge/:id", ChallengeView)] Challenge { id: String },
}
