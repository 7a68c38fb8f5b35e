// src/bin/graphlens-cli.rs
use clap::Parser;
use graphlens::client::AnalyzeClient;
use graphlens::render::render_state;
use graphlens::session::{AnalysisState, Session};
use graphlens::upload::ImageUpload;
use std::path::PathBuf;
use std::process::ExitCode;

/// Send a graph image to a graphlens server and print its equation.
#[derive(Parser, Debug)]
#[command(name = "graphlens-cli", version, about)]
struct Cli {
    /// Image of a mathematical graph (PNG, JPG, GIF, WebP)
    image: PathBuf,

    /// Base URL of the analysis server
    #[arg(long, env = "GRAPHLENS_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let cli = Cli::parse();

    let mut session = Session::new();

    let upload = match ImageUpload::from_path(&cli.image).await {
        Ok(upload) => upload,
        Err(e) => {
            eprintln!("❌ Could not read {}: {}", cli.image.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if upload.is_none() {
        eprintln!("⚠️  {} is not an image; nothing to analyze.", cli.image.display());
        print!("{}", render_state(session.state()));
        return ExitCode::FAILURE;
    }

    let client = AnalyzeClient::new(cli.server);
    let submitted = client
        .submit_with_progress(&mut session, upload, |state| println!("{}", render_state(state)))
        .await;
    if let Err(e) = submitted {
        eprintln!("❌ {}", e);
        return ExitCode::FAILURE;
    }

    print!("{}", render_state(session.state()));
    match session.state() {
        AnalysisState::Result { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
