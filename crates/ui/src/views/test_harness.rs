use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use quiz_core::model::{ChallengeId, UserId};
use quiz_core::time::fixed_clock;
use services::{AppServices, SessionState};
use storage::auth::{Identity, MockAuthProvider};
use storage::repository::Storage;
use uuid::Uuid;

use crate::context::{AppContext, build_app_context};
use crate::gate::RequireAuth;
use crate::views::{ChallengeView, HomeView, LoginView};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Login,
    Home,
    Challenge(ChallengeId),
    /// `RequireAuth` around a marker div, for gate behavior tests.
    Gate,
}

#[derive(Props, Clone)]
pub struct ViewHarnessProps {
    ctx: AppContext,
    session: SessionState,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.ctx.clone());
    let session_signal = use_signal(|| props.session.clone());
    use_context_provider(|| session_signal);
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Challenge(id) => rsx! { ChallengeView { id: id.to_string() } },
        ViewKind::Gate => rsx! {
            RequireAuth {
                div { class: "protected-marker", "conteúdo protegido" }
            }
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

#[must_use]
pub fn test_identity() -> Identity {
    Identity::new(UserId::new(Uuid::new_v4()), "ana@example.com")
}

#[must_use]
pub fn resolving_session() -> SessionState {
    SessionState {
        identity: None,
        resolving: true,
    }
}

#[must_use]
pub fn signed_out_session() -> SessionState {
    SessionState {
        identity: None,
        resolving: false,
    }
}

#[must_use]
pub fn authenticated_session(identity: Identity) -> SessionState {
    SessionState {
        identity: Some(identity),
        resolving: false,
    }
}

pub fn setup_view_harness(view: ViewKind, session: SessionState, storage: Storage) -> ViewHarness {
    let auth = MockAuthProvider::new();
    let services = AppServices::new(fixed_clock(), &storage, Arc::new(auth));
    let ctx = build_app_context(services);

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps { ctx, session, view },
    );

    ViewHarness { dom, storage }
}
