use quiz_core::model::{Challenge, ChallengeId, Profile, Question, QuestionId};
use storage::repository::{InMemoryRepository, Storage};
use uuid::Uuid;

use super::test_harness::{
    ViewKind, authenticated_session, resolving_session, setup_view_harness, signed_out_session,
    test_identity,
};

fn seed_challenge(
    repo: &InMemoryRepository,
    title: &str,
    required_score: u32,
    question_count: usize,
) -> ChallengeId {
    let id = ChallengeId::new(Uuid::new_v4());
    repo.insert_challenge(Challenge::new(id, title, "", required_score, false).unwrap());
    for i in 0..question_count {
        repo.insert_question(
            Question::new(
                QuestionId::new(Uuid::new_v4()),
                id,
                format!("Q{i}"),
                None,
                vec![format!("/letra-a/q{i}.png"), "/letra-a/z.png".to_string()],
            )
            .unwrap(),
        );
    }
    id
}

#[tokio::test(flavor = "current_thread")]
async fn login_view_smoke_renders_both_tabs() {
    let mut harness = setup_view_harness(
        ViewKind::Login,
        signed_out_session(),
        Storage::in_memory(),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Acesse sua conta"), "missing heading in {html}");
    assert!(html.contains("Login"), "missing login tab in {html}");
    assert!(html.contains("Cadastro"), "missing register tab in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn gate_blocks_protected_content_while_resolving() {
    let mut harness = setup_view_harness(
        ViewKind::Gate,
        resolving_session(),
        Storage::in_memory(),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("spinner"), "missing spinner in {html}");
    assert!(
        !html.contains("protected-marker"),
        "protected content leaked through the gate: {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn gate_renders_children_once_authenticated() {
    let mut harness = setup_view_harness(
        ViewKind::Gate,
        authenticated_session(test_identity()),
        Storage::in_memory(),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("protected-marker"),
        "missing protected content in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_catalog_with_lock_labels() {
    let repo = InMemoryRepository::new();
    seed_challenge(&repo, "Letra A", 0, 2);
    seed_challenge(&repo, "Letra B", 100, 2);

    let identity = test_identity();
    repo.insert_profile_row(Profile::new(identity.user_id(), "Ana", 30).unwrap());

    let mut harness = setup_view_harness(
        ViewKind::Home,
        authenticated_session(identity),
        Storage::from_in_memory(repo),
    );
    harness.rebuild();
    for _ in 0..3 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(html.contains("Trilhas Disponíveis"), "missing heading in {html}");
    assert!(html.contains("Olá, Ana!"), "missing greeting in {html}");
    assert!(html.contains("Letra A"), "missing open challenge in {html}");
    assert!(
        html.contains("Bloqueado: requer 100 pontos"),
        "missing lock label in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn challenge_view_smoke_renders_the_first_question() {
    let repo = InMemoryRepository::new();
    let challenge_id = seed_challenge(&repo, "Letra A", 0, 3);

    let identity = test_identity();
    repo.insert_profile_row(Profile::new(identity.user_id(), "Ana", 0).unwrap());

    let mut harness = setup_view_harness(
        ViewKind::Challenge(challenge_id),
        authenticated_session(identity),
        Storage::from_in_memory(repo),
    );
    harness.rebuild();
    for _ in 0..3 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(
        html.contains("Pergunta 1 de 3"),
        "missing question counter in {html}"
    );
    assert!(
        html.contains("Pontuação atual"),
        "missing running score in {html}"
    );
    assert!(html.contains("Letra A"), "missing title in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn challenge_view_smoke_surfaces_an_empty_challenge() {
    let repo = InMemoryRepository::new();
    let challenge_id = seed_challenge(&repo, "Letra Vazia", 0, 0);

    let identity = test_identity();
    repo.insert_profile_row(Profile::new(identity.user_id(), "Ana", 0).unwrap());

    let mut harness = setup_view_harness(
        ViewKind::Challenge(challenge_id),
        authenticated_session(identity),
        Storage::from_in_memory(repo),
    );
    harness.rebuild();
    for _ in 0..3 {
        harness.drive_async().await;
    }

    let html = harness.render();
    assert!(
        html.contains("Este desafio ainda não tem perguntas."),
        "missing empty-challenge message in {html}"
    );
    assert!(html.contains("Voltar ao início"), "missing back action in {html}");
}
