use dioxus::prelude::*;

/// Full-screen blocking spinner, used while session resolution or a
/// screen's data is pending.
#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div { class: "spinner-overlay",
            div { class: "spinner" }
        }
    }
}
