use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::Clock;
use quiz_core::model::{Challenge, ChallengeId, Profile, Question, QuestionId};
use quiz_core::slug::asset_path;
use services::AppServices;
use storage::auth::{AuthProvider, MockAuthProvider};
use storage::repository::{InMemoryRepository, Storage};
use storage::rest::{RestBackend, RestConfig};
use ui::{App, build_app_context};
use uuid::Uuid;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingBackendConfig,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingBackendConfig => write!(
                f,
                "no backend configured: set QUIZ_BACKEND_URL and QUIZ_ANON_KEY, pass \
                 --backend-url/--anon-key, or run with --in-memory"
            ),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--backend-url <url>] [--anon-key <key>]");
    eprintln!("  cargo run -p app -- --in-memory   # offline demo with seeded data");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BACKEND_URL, QUIZ_ANON_KEY   backend connection");
    eprintln!("  RUST_LOG                          log filter (e.g. info)");
    eprintln!();
    eprintln!("The in-memory demo signs in with demo@librasquiz.app / libras123.");
}

enum Backend {
    Rest(RestConfig),
    InMemory,
}

struct Args {
    backend: Backend,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut backend_url = std::env::var("QUIZ_BACKEND_URL").ok();
        let mut anon_key = std::env::var("QUIZ_ANON_KEY").ok();
        let mut in_memory = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--backend-url" => backend_url = Some(require_value(args, "--backend-url")?),
                "--anon-key" => anon_key = Some(require_value(args, "--anon-key")?),
                "--in-memory" => in_memory = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if in_memory {
            return Ok(Self {
                backend: Backend::InMemory,
            });
        }

        match (backend_url, anon_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Ok(Self {
                    backend: Backend::Rest(RestConfig::new(url, key)),
                })
            }
            _ => Err(ArgsError::MissingBackendConfig),
        }
    }
}

/// Offline fixture: two playable letter challenges, one placeholder, and
/// a demo account.
fn seed_demo_backend() -> (Storage, Arc<dyn AuthProvider>) {
    let repo = InMemoryRepository::new();

    let letters = |title: &str, required: u32, words: &[&str]| {
        let id = ChallengeId::new(Uuid::new_v4());
        repo.insert_challenge(
            Challenge::new(id, title, "Reconheça os sinais de cada letra.", required, false)
                .expect("valid seed challenge"),
        );
        for &word in words {
            let mut options = vec![asset_path(title, word)];
            for &decoy in words.iter().filter(|&&w| w != word).take(3) {
                options.push(asset_path(title, decoy));
            }
            options.sort();
            repo.insert_question(
                Question::new(QuestionId::new(Uuid::new_v4()), id, word, None, options)
                    .expect("valid seed question"),
            );
        }
    };

    letters("Letra A", 0, &["A", "B", "C", "D", "E", "F"]);
    letters("Letra B", 100, &["G", "H", "I", "J", "K", "L"]);

    // Placeholder entry: visible in the catalog but not playable yet.
    repo.insert_challenge(
        Challenge::new(
            ChallengeId::new(Uuid::new_v4()),
            "Saudações",
            "Sinais do dia a dia.",
            200,
            false,
        )
        .expect("valid seed challenge"),
    );

    let auth = MockAuthProvider::new();
    let identity = auth.register("demo@librasquiz.app", "libras123");
    repo.insert_profile_row(
        Profile::new(identity.user_id(), "demo", 0).expect("valid seed profile"),
    );

    (Storage::from_in_memory(repo), Arc::new(auth))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let (storage, auth) = match args.backend {
        Backend::Rest(config) => {
            log::info!("using hosted backend at {}", config.base_url);
            let backend = RestBackend::connect(config)?;
            let auth = backend.auth_provider();
            (backend.storage, auth)
        }
        Backend::InMemory => {
            log::info!("using in-memory demo backend");
            seed_demo_backend()
        }
    };

    let services = AppServices::new(Clock::default_clock(), &storage, auth);
    let context = build_app_context(services);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("LibrasQuiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
