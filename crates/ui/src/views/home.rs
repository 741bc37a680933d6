use dioxus::prelude::*;
use dioxus_router::use_navigator;
use log::warn;

use crate::app::use_session_state;
use crate::context::AppContext;
use crate::gate::RequireAuth;
use crate::routes::Route;
use crate::views::{LoadingSpinner, ViewError, ViewState, view_state_from_resource};
use crate::vm::{ChallengeCardVm, map_catalog_cards};

#[derive(Clone, Debug, PartialEq)]
struct HomeData {
    greeting: String,
    total_score: u32,
    cards: Vec<ChallengeCardVm>,
}

#[component]
pub fn HomeView() -> Element {
    rsx! {
        RequireAuth {
            HomeContent {}
        }
    }
}

#[component]
fn HomeContent() -> Element {
    let ctx = use_context::<AppContext>();
    let session_state = use_session_state();

    let resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let ctx = ctx.clone();
            // Reading the signal here re-fetches whenever the identity
            // changes; no caching beyond that.
            let identity = session_state.read().identity.clone();
            async move {
                let Some(identity) = identity else {
                    return Err(ViewError::Unknown);
                };
                let profile = ctx
                    .profiles()
                    .profile_for(&identity)
                    .await
                    .map_err(|err| {
                        warn!("profile fetch failed: {err}");
                        ViewError::Unknown
                    })?
                    .ok_or(ViewError::Unknown)?;
                let entries = ctx
                    .catalog()
                    .catalog_for(profile.total_score())
                    .await
                    .map_err(|err| {
                        warn!("catalog fetch failed: {err}");
                        ViewError::Unknown
                    })?;

                Ok::<_, ViewError>(HomeData {
                    greeting: profile.name().to_string(),
                    total_score: profile.total_score(),
                    cards: map_catalog_cards(&entries),
                })
            }
        })
    };
    let state = view_state_from_resource(resource);

    let on_logout = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            ctx.session().logout();
            let mut session_state = session_state;
            session_state.set(ctx.session().state());
        })
    };

    rsx! {
        div { class: "page",
            header { class: "page-header",
                h1 { "Trilhas Disponíveis" }
                button { class: "secondary", onclick: move |_| on_logout.call(()), "Sair" }
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    LoadingSpinner {}
                },
                ViewState::Error(err) => rsx! {
                    p { class: "view-error", "{err.message()}" }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "greeting",
                        "Olá, {data.greeting}! Pontuação total: "
                        strong { "{data.total_score}" }
                    }
                    div { class: "card-grid",
                        for card in data.cards {
                            ChallengeCard { card }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn ChallengeCard(card: ChallengeCardVm) -> Element {
    let navigator = use_navigator();
    let card_id = card.id;

    rsx! {
        div {
            class: if card.navigable { "card" } else { "card locked" },
            h2 { "{card.title}" }
            p { "{card.description}" }
            if let Some(label) = card.status_label.as_deref() {
                span { class: "card-status", "{label}" }
            }
            if card.navigable {
                button {
                    class: "primary",
                    onclick: move |_| {
                        navigator.push(Route::Challenge {
                            id: card_id.to_string(),
                        });
                    },
                    "Iniciar desafio"
                }
            }
        }
    }
}
