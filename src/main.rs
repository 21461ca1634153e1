use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use resume_matcher::client::{AnalyzeError, AnalyzerClient};
use resume_matcher::config::Config;
use resume_matcher::console::{render, Console};
use resume_matcher::orchestrator::Orchestrator;
use resume_matcher::types::{AnalysisMode, ResumeFile, SubmissionInput};

#[derive(Debug, Parser)]
#[command(about = "Check how well a resume matches a job description")]
struct Args {
    /// Resume to analyze (PDF, DOC or DOCX). If omitted, the interactive console starts
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Job description text
    #[arg(long, conflicts_with = "job_file")]
    job_description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    job_file: Option<PathBuf>,

    /// Analysis type
    #[arg(long, value_enum, default_value_t = AnalysisMode::Basic)]
    mode: AnalysisMode,

    /// Save the report as JSON into --out-dir
    #[arg(long, default_value_t = false)]
    export: bool,

    /// Output directory for exported reports
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Run the interactive console
    #[arg(long, default_value_t = false)]
    interactive: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // logging
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter_layer).init();

    let config = Config::load()?;
    tracing::info!("Using analysis service at {}", config.base_url);
    let client = AnalyzerClient::new(config)?;

    let Some(resume_path) = args.resume.as_ref().filter(|_| !args.interactive) else {
        tracing::info!("Interactive mode: you'll be prompted for a resume, a job description and an analysis type");
        Console::new(client).run(&args.out_dir).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let job_description = match (&args.job_description, &args.job_file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {}", path.display()))?,
        (None, None) => String::new(),
    };

    let input = match ResumeFile::from_path(resume_path)
        .await
        .and_then(|file| SubmissionInput::new(Some(file), job_description, args.mode))
    {
        Ok(input) => input,
        Err(e) => {
            render::display_analyze_error(&AnalyzeError::from(e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let orchestrator = Orchestrator::new(client);
    let export_dir = args.export.then_some(args.out_dir.as_path());
    match orchestrator.run(&input, export_dir).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            render::display_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
