use dioxus::prelude::*;
use dioxus_router::use_navigator;
use services::SessionState;

use crate::app::use_session_state;
use crate::routes::Route;
use crate::views::LoadingSpinner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateDecision {
    /// Session resolution pending: block, render nothing protected.
    Blocked,
    /// Resolved without an identity: send the user to the entry screen.
    Redirect,
    Allow,
}

pub(crate) fn gate_decision(state: &SessionState) -> GateDecision {
    if state.resolving {
        GateDecision::Blocked
    } else if state.is_authenticated() {
        GateDecision::Allow
    } else {
        GateDecision::Redirect
    }
}

/// Wraps protected screens. While the session resolves nothing renders
/// but a spinner; once resolved, unauthenticated users are redirected to
/// the entry screen with history replacement so Back cannot re-enter.
#[component]
pub fn RequireAuth(children: Element) -> Element {
    let session_state = use_session_state();
    let navigator = use_navigator();
    let state = session_state.read().clone();

    match gate_decision(&state) {
        GateDecision::Blocked => rsx! {
            LoadingSpinner {}
        },
        GateDecision::Redirect => {
            navigator.replace(Route::Login {});
            rsx! {
                LoadingSpinner {}
            }
        }
        GateDecision::Allow => rsx! {
            {children}
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(identity: bool, resolving: bool) -> SessionState {
        use quiz_core::model::UserId;
        use storage::auth::Identity;
        use uuid::Uuid;

        SessionState {
            identity: identity
                .then(|| Identity::new(UserId::new(Uuid::new_v4()), "ana@example.com")),
            resolving,
        }
    }

    #[test]
    fn resolving_blocks_regardless_of_identity() {
        assert_eq!(gate_decision(&state(false, true)), GateDecision::Blocked);
        assert_eq!(gate_decision(&state(true, true)), GateDecision::Blocked);
    }

    #[test]
    fn resolved_state_decides_between_allow_and_redirect() {
        assert_eq!(gate_decision(&state(true, false)), GateDecision::Allow);
        assert_eq!(gate_decision(&state(false, false)), GateDecision::Redirect);
    }
}
