use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::use_navigator;
use log::{debug, warn};

use quiz_core::model::{ChallengeId, Profile};
use services::QuizError;

use crate::app::use_session_state;
use crate::context::AppContext;
use crate::gate::RequireAuth;
use crate::routes::Route;
use crate::views::{LoadingSpinner, ViewError, ViewState, view_state_from_resource};
use crate::vm::{OptionVm, PromptVm, QuizVm, RunSnapshot, SummaryVm};

/// How long the correctness highlight stays on screen with input frozen.
const FEEDBACK_WINDOW_MS: u64 = 1000;

#[component]
pub fn ChallengeView(id: String) -> Element {
    rsx! {
        RequireAuth {
            ChallengeContent { id }
        }
    }
}

#[component]
fn ChallengeContent(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let session_state = use_session_state();
    let navigator = use_navigator();
    let challenge_id = id.parse::<ChallengeId>().ok();

    let mut vm = use_signal(|| None::<QuizVm>);
    let mut feedback_timer = use_signal(|| None::<Task>);
    let mut profile = use_signal(|| None::<Profile>);

    // Questions and title load independently; the first question can be
    // on screen while the header still says it is loading.
    let questions_resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let challenges = ctx.challenges();
            let mut vm = vm;
            async move {
                let Some(challenge_id) = challenge_id else {
                    return Err(ViewError::Unknown);
                };
                match challenges.start(challenge_id).await {
                    Ok(engine) => {
                        vm.set(Some(QuizVm::new(engine)));
                        Ok(())
                    }
                    Err(QuizError::NoQuestions) => Err(ViewError::EmptyChallenge),
                    Err(err) => {
                        warn!("question fetch failed: {err}");
                        Err(ViewError::Unknown)
                    }
                }
            }
        })
    };

    let _title_resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let challenges = ctx.challenges();
            let mut vm = vm;
            async move {
                let Some(challenge_id) = challenge_id else {
                    return;
                };
                match challenges.load_title(challenge_id).await {
                    Ok(title) => {
                        if let Some(vm) = vm.write().as_mut() {
                            vm.set_title(title);
                        }
                    }
                    // The header keeps its loading label; nothing else
                    // depends on the title being present.
                    Err(err) => warn!("title fetch failed: {err}"),
                }
            }
        })
    };

    let _profile_resource = {
        let ctx = ctx.clone();
        use_resource(move || {
            let profiles = ctx.profiles();
            let identity = session_state.read().identity.clone();
            let mut profile = profile;
            async move {
                let Some(identity) = identity else { return };
                match profiles.profile_for(&identity).await {
                    Ok(found) => profile.set(found),
                    Err(err) => warn!("profile fetch failed: {err}"),
                }
            }
        })
    };

    // Selecting an option resolves it immediately, then freezes input
    // for the feedback window. The timer task advances the run and, on
    // the final question, fires the guarded save. Replacing the task
    // handle cancels any stale window.
    let on_select = {
        let ctx = ctx.clone();
        use_callback(move |option: String| {
            {
                let mut guard = vm.write();
                let Some(vm_value) = guard.as_mut() else {
                    return;
                };
                if !vm_value.is_answering() {
                    return;
                }
                vm_value.choose(&option);
            }

            let challenges = ctx.challenges();
            let task = spawn(async move {
                tokio::time::sleep(Duration::from_millis(FEEDBACK_WINDOW_MS)).await;

                let finished = {
                    let mut guard = vm.write();
                    let Some(vm_value) = guard.as_mut() else {
                        return;
                    };
                    vm_value.advance()
                };
                if !finished {
                    return;
                }

                let ticket = vm.write().as_mut().and_then(QuizVm::take_save_ticket);
                let Some(outcome) = ticket else { return };
                let Some(challenge_id) = challenge_id else {
                    return;
                };
                let Some(profile_value) = profile.read().clone() else {
                    warn!("skipping progress save: profile unavailable");
                    return;
                };
                match challenges
                    .save_result(&profile_value, challenge_id, &outcome)
                    .await
                {
                    Ok(report) => debug!("progress save: {report:?}"),
                    // Abandoned for this visit; the latch stays closed.
                    Err(err) => warn!("progress save abandoned: {err}"),
                }
            });
            if let Some(previous) = feedback_timer.write().replace(task) {
                previous.cancel();
            }
        })
    };

    // A feedback window must not outlive the screen it belongs to.
    use_drop(move || {
        if let Some(task) = feedback_timer.write().take() {
            task.cancel();
        }
    });

    let on_retake = use_callback(move |()| {
        if let Some(vm_value) = vm.write().as_mut() {
            vm_value.retake();
        }
    });

    let state = view_state_from_resource(questions_resource);
    let snapshot = vm.read().as_ref().map(|vm| vm.snapshot("Carregando..."));

    match (snapshot, state) {
        (Some(RunSnapshot::Summary(summary)), _) => rsx! {
            SummaryScreen { summary, on_retake }
        },
        (Some(RunSnapshot::Question(question)), _) => {
            let kind_label = match &question.prompt {
                PromptVm::Image(_) => "Imagem",
                PromptVm::Word(_) => "Letra",
            };
            rsx! {
                div { class: "challenge-page",
                    button {
                        class: "secondary back-button",
                        onclick: move |_| {
                            navigator.push(Route::Home {});
                        },
                        "Voltar"
                    }

                    h1 { class: "challenge-title", "{question.title}" }

                    div { class: "progress-track",
                        div { class: "progress-fill", style: "width: {question.progress_width}" }
                    }

                    h2 { "Pergunta {question.question_number} de {question.total_questions}" }
                    p { class: "running-score",
                        "Pontuação atual: "
                        strong { "{question.score}" }
                    }
                    p { class: "question-kind", em { "Tipo de pergunta: {kind_label}" } }

                    match &question.prompt {
                        PromptVm::Image(src) => rsx! {
                            img { class: "prompt-image", src: "{src}", alt: "Imagem da pergunta" }
                        },
                        PromptVm::Word(word) => rsx! {
                            div { class: "prompt-word", "{word}" }
                        },
                    }

                    div { class: "option-grid",
                        for option in question.options.clone() {
                            OptionButton { option, on_select }
                        }
                    }

                    if let Some(correct) = question.feedback {
                        div { class: "feedback",
                            if correct {
                                span { class: "feedback-correct", "Resposta correta!" }
                            } else {
                                span { class: "feedback-wrong", "Resposta errada!" }
                            }
                        }
                    }
                }
            }
        }
        (None, ViewState::Error(err)) => rsx! {
            div { class: "challenge-page",
                p { class: "view-error", "{err.message()}" }
                button {
                    class: "primary",
                    onclick: move |_| {
                        navigator.push(Route::Home {});
                    },
                    "Voltar ao início"
                }
            }
        },
        (None, _) => rsx! {
            LoadingSpinner {}
        },
    }
}

#[component]
fn OptionButton(option: OptionVm, on_select: Callback<String>) -> Element {
    let value = option.value.clone();
    rsx! {
        button {
            class: "{option.class}",
            onclick: move |_| on_select.call(value.clone()),
            if option.is_image {
                img { class: "option-image", src: "{option.value}", alt: "Opção de resposta" }
            } else {
                span { class: "option-word", "{option.value}" }
            }
        }
    }
}

#[component]
fn SummaryScreen(summary: SummaryVm, on_retake: Callback<()>) -> Element {
    let navigator = use_navigator();

    rsx! {
        div { class: "summary-page",
            h2 { "Desafio Concluído!" }

            p { class: "summary-line",
                "Você acertou "
                strong { "{summary.score}" }
                " de "
                strong { "{summary.total_questions}" }
                " perguntas ("
                strong { "{summary.percentage}%" }
                " de aproveitamento)."
            }

            if summary.passed {
                div { class: "banner passed",
                    "Parabéns! Você foi aprovado e pode prosseguir para o próximo desafio."
                }
            } else {
                div { class: "banner failed",
                    "Você não atingiu a pontuação mínima de 70%. Tente novamente para desbloquear o próximo desafio."
                }
            }

            div { class: "summary-actions",
                button {
                    class: "secondary",
                    onclick: move |_| {
                        navigator.push(Route::Home {});
                    },
                    "Voltar ao início"
                }
                button {
                    class: "primary",
                    onclick: move |_| on_retake.call(()),
                    "Refazer desafio"
                }
            }
        }
    }
}
