use clap::Parser;
use dotenvy::dotenv;
use evidence_intake::config::IntakeConfig;
use evidence_intake::intake::session::{IntakeSession, StagedRows};
use evidence_intake::intake::{FileCandidate, IntakeDecision, IntakePolicy};
use evidence_intake::services::notification::TracingNotifier;
use evidence_intake::utils::format::format_file_size;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Checks local files against the evidence intake rules before upload
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Override the maximum file size in bytes
    #[arg(long)]
    max_size: Option<u64>,

    /// Override the allowed extensions (comma separated)
    #[arg(long, value_delimiter = ',')]
    allow: Option<Vec<String>>,
}

fn main() -> ExitCode {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_check=info,evidence_intake=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = IntakeConfig::from_env();
    let policy = IntakePolicy::new(
        args.max_size.unwrap_or(config.max_file_size),
        args.allow.unwrap_or(config.allowed_extensions),
    );

    let mut candidates = Vec::with_capacity(args.files.len());
    let mut unreadable = 0;
    for path in &args.files {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                candidates.push(FileCandidate::new(name, meta.len()));
            }
            Ok(_) => {
                error!("❌ {} is not a regular file", path.display());
                unreadable += 1;
            }
            Err(e) => {
                error!("❌ Cannot read {}: {}", path.display(), e);
                unreadable += 1;
            }
        }
    }

    let mut session = IntakeSession::new(policy, StagedRows::default(), TracingNotifier);
    let decisions = session.submit_batch(candidates);

    for decision in &decisions {
        match decision {
            IntakeDecision::Accepted { candidate, .. } => println!(
                "ACCEPT  {}  ({})",
                candidate.name,
                format_file_size(candidate.size_bytes)
            ),
            IntakeDecision::Rejected { candidate, reason } => println!(
                "REJECT  {}  ({})  {:?}",
                candidate.name,
                format_file_size(candidate.size_bytes),
                reason
            ),
        }
    }

    let list = session.list();
    info!(
        "✅ {} of {} files ready for upload ({})",
        list.len(),
        args.files.len(),
        format_file_size(list.total_bytes())
    );

    if list.len() == decisions.len() && unreadable == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
