use dioxus::prelude::*;
use dioxus_router::Router;
use services::SessionState;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();

    // One session-state signal for the whole tree. The listener task
    // resolves any existing session, then follows provider pushes for
    // the app's lifetime.
    let session_state = use_signal(|| ctx.session().state());
    use_context_provider(|| session_state);

    use_future(move || {
        let session = ctx.session();
        let mut session_state = session_state;
        async move {
            session.init().await;
            session_state.set(session.state());

            let mut rx = session.subscribe();
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                session_state.set(state);
            }
        }
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title. Per-route titles render in the page body.
        document::Title { "LibrasQuiz" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Algo deu errado" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}

/// Views read the live session state provided by [`App`]; tests provide
/// their own primed signal.
#[must_use]
pub fn use_session_state() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}
