//! Selah CLI binary: serve the meditation API or run one request inline.
//!
//! Subcommands: `serve` (HTTP server), `meditate` (one reference in,
//! envelope JSON on stdout; exits non-zero on a failure envelope).

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use selah::{handle_meditation, Envelope, MeditationModel, OpenAiModel};

#[derive(Parser, Debug)]
#[command(name = "selah")]
#[command(about = "Selah — structured verse meditations from the command line")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (POST /api/meditation)
    Serve {
        /// Listen address (default: SELAH_ADDR or 127.0.0.1:8080)
        #[arg(long, value_name = "ADDR")]
        addr: Option<String>,
    },
    /// Run one meditation request and print the envelope JSON
    Meditate {
        /// Verse reference, e.g. "시편 23편 1절" or "막 10:27"
        reference: String,

        /// Pretty-print the envelope (default: compact, one line)
        #[arg(long)]
        pretty: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_meditate(reference: &str, pretty: bool) -> i32 {
    let model = OpenAiModel::from_env();
    let model_ref = model.as_ref().map(|m| m as &dyn MeditationModel);

    let body = serde_json::json!({ "verseInput": reference }).to_string();
    let envelope = handle_meditation(model_ref, &body).await;

    let rendered = if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(error) => {
            eprintln!("failed to render envelope: {}", error);
            return 1;
        }
    }

    match envelope {
        Envelope::Success(_) => 0,
        Envelope::Failure(_) => 1,
    }
}

#[tokio::main]
async fn main() {
    // Fill the environment before anything reads OPENAI_API_KEY.
    if let Err(error) = env_config::load() {
        eprintln!("config load failed: {}", error);
    }
    init_tracing();

    let args = Args::parse();
    match args.cmd {
        Command::Serve { addr } => {
            if let Err(error) = serve::run_serve(addr.as_deref()).await {
                warn!(%error, "server exited with error");
                std::process::exit(1);
            }
        }
        Command::Meditate { reference, pretty } => {
            std::process::exit(run_meditate(&reference, pretty).await);
        }
    }
}
