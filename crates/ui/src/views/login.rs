use dioxus::prelude::*;
use dioxus_router::use_navigator;
use log::warn;

use services::profile_service::display_name_from_email;

use crate::app::use_session_state;
use crate::context::AppContext;
use crate::routes::Route;

const SIGN_IN_ERROR: &str = "Credenciais inválidas. Verifique e tente novamente.";
const SIGN_UP_ERROR: &str = "Erro ao cadastrar. Verifique os dados e tente novamente.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthTab {
    Login,
    Register,
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let session_state = use_session_state();
    let navigator = use_navigator();

    let email = use_signal(String::new);
    let password = use_signal(String::new);
    let mut tab = use_signal(|| AuthTab::Login);
    let error_message = use_signal(|| None::<&'static str>);

    let on_sign_in = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            let ctx = ctx.clone();
            let mut session_state = session_state;
            let mut error_message = error_message;
            spawn(async move {
                error_message.set(None);
                match ctx.session().auth().sign_in(&email(), &password()).await {
                    Ok(identity) => {
                        ctx.session().login(identity);
                        session_state.set(ctx.session().state());
                        navigator.push(Route::Home {});
                    }
                    Err(err) => {
                        // One generic message for every rejection.
                        warn!("sign-in failed: {err}");
                        error_message.set(Some(SIGN_IN_ERROR));
                    }
                }
            });
        })
    };

    let on_sign_up = {
        let ctx = ctx.clone();
        use_callback(move |()| {
            let ctx = ctx.clone();
            let mut session_state = session_state;
            let mut error_message = error_message;
            spawn(async move {
                error_message.set(None);
                match ctx.session().auth().sign_up(&email(), &password()).await {
                    Ok(identity) => {
                        let name = display_name_from_email(identity.email()).to_string();
                        if let Err(err) = ctx
                            .profiles()
                            .create_profile(identity.user_id(), &name)
                            .await
                        {
                            warn!("initial profile insert failed: {err}");
                        }
                        ctx.session().login(identity);
                        session_state.set(ctx.session().state());
                        navigator.push(Route::Home {});
                    }
                    Err(err) => {
                        warn!("sign-up failed: {err}");
                        error_message.set(Some(SIGN_UP_ERROR));
                    }
                }
            });
        })
    };

    let current_tab = tab();

    rsx! {
        div { class: "auth-page",
            div { class: "auth-panel",
                div { class: "auth-intro",
                    h2 { "Bem-vindo ao LibrasQuiz!" }
                    p { "Aprenda Libras de forma interativa com quizzes e trilhas de conhecimento." }
                }

                div { class: "auth-form",
                    h2 { "Acesse sua conta" }

                    div { class: "auth-tabs",
                        button {
                            class: if current_tab == AuthTab::Login { "tab active" } else { "tab" },
                            onclick: move |_| {
                                tab.set(AuthTab::Login);
                                let mut error_message = error_message;
                                error_message.set(None);
                            },
                            "Login"
                        }
                        button {
                            class: if current_tab == AuthTab::Register { "tab active" } else { "tab" },
                            onclick: move |_| {
                                tab.set(AuthTab::Register);
                                let mut error_message = error_message;
                                error_message.set(None);
                            },
                            "Cadastro"
                        }
                    }

                    if let Some(message) = error_message() {
                        div { class: "auth-error", "{message}" }
                    }

                    AuthFields { email, password }

                    match current_tab {
                        AuthTab::Login => rsx! {
                            button {
                                class: "primary",
                                onclick: move |_| on_sign_in.call(()),
                                "Entrar"
                            }
                        },
                        AuthTab::Register => rsx! {
                            button {
                                class: "primary",
                                onclick: move |_| on_sign_up.call(()),
                                "Cadastrar"
                            }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn AuthFields(mut email: Signal<String>, mut password: Signal<String>) -> Element {
    rsx! {
        input {
            r#type: "email",
            placeholder: "Email",
            value: "{email}",
            oninput: move |evt| email.set(evt.value()),
        }
        input {
            r#type: "password",
            placeholder: "Senha",
            value: "{password}",
            oninput: move |evt| password.set(evt.value()),
        }
    }
}
