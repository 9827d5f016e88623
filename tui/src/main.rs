mod app;
mod components;
mod event;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use qa_client::{ApiClient, ClientConfig};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Terminal client for a PDF question-answering backend.
#[derive(Debug, Parser)]
#[command(name = "pdf-qa", version, about)]
struct Args {
    /// Base URL of the backend API [default: $PDF_QA_API_URL or http://localhost:8000/api]
    #[arg(long)]
    api_url: Option<String>,

    /// Where log output goes; the terminal is taken by the UI
    #[arg(long, default_value = "pdf-qa.log")]
    log_file: PathBuf,

    /// PDF to upload right away
    pdf: Option<PathBuf>,
}

fn init_logging(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log_file)?;

    let config = args
        .api_url
        .map(ClientConfig::new)
        .unwrap_or_else(ClientConfig::from_env);
    log::info!("Starting pdf-qa against {}", config.base_url());

    let backend = Arc::new(ApiClient::new(config));
    app::run(backend, args.pdf).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_local_backend() {
        let args = Args::try_parse_from(["pdf-qa"]).unwrap();
        assert!(args.api_url.is_none());
        assert!(args.pdf.is_none());
        assert_eq!(args.log_file, PathBuf::from("pdf-qa.log"));
    }

    #[test]
    fn args_accept_url_and_initial_pdf() {
        let args =
            Args::try_parse_from(["pdf-qa", "--api-url", "http://qa.internal/api", "doc.pdf"])
                .unwrap();
        assert_eq!(args.api_url.as_deref(), Some("http://qa.internal/api"));
        assert_eq!(args.pdf, Some(PathBuf::from("doc.pdf")));
    }
}
