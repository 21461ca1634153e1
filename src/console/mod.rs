use std::future::Future;
use std::path::Path;
use std::pin::pin;

use anyhow::Result;
use colored::*;
use tokio::select;

use crate::client::{AnalyzeError, AnalyzerClient};
use crate::orchestrator::Orchestrator;
use crate::types::{AnalysisMode, ResumeFile, SubmissionInput};

mod input;
pub mod render;

use input::InputReader;

/// Interactive console standing in for the upload form
pub struct Console {
    orchestrator: Orchestrator<AnalyzerClient>,
}

enum Step<T> {
    Value(T),
    Retry,
    Quit,
}

/// Resolves on Ctrl+C. If the handler cannot be installed it never resolves.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Drive `work` to completion unless `interrupt` resolves first.
async fn unless_interrupted<T>(
    interrupt: impl Future<Output = ()>,
    work: impl Future<Output = T>,
) -> Option<T> {
    select! {
        _ = interrupt => None,
        out = work => Some(out),
    }
}

impl Console {
    pub fn new(client: AnalyzerClient) -> Self {
        Self {
            orchestrator: Orchestrator::new(client),
        }
    }

    /// Prompt for a résumé, a job description and a mode, analyze, and offer
    /// an export into `out_dir`. Repeats until the user quits. Ctrl+C ends the
    /// session at any stage, including while a request is in flight.
    pub async fn run(&self, out_dir: &Path) -> Result<()> {
        render::display_welcome();
        let mut reader = InputReader::new();
        // One listener for the whole session so no press is lost between stages.
        let mut interrupt = pin!(interrupted());

        loop {
            let Some(step) =
                unless_interrupted(interrupt.as_mut(), Self::collect_submission(&mut reader)).await
            else {
                render::display_goodbye();
                break;
            };
            let submission = match step? {
                Step::Value(submission) => submission,
                Step::Retry => continue,
                Step::Quit => {
                    render::display_goodbye();
                    break;
                }
            };

            let analyzed = unless_interrupted(
                interrupt.as_mut(),
                self.analyze_and_offer_export(&mut reader, &submission, out_dir),
            )
            .await;
            match analyzed {
                Some(result) => result?,
                None => {
                    println!("\n{}", "⚠️ Request cancelled by user".bright_yellow());
                    render::display_goodbye();
                    break;
                }
            }
        }

        Ok(())
    }

    async fn analyze_and_offer_export(
        &self,
        reader: &mut InputReader,
        submission: &SubmissionInput,
        out_dir: &Path,
    ) -> Result<()> {
        let mut outcome = match self.orchestrator.analyze(submission).await {
            Ok(outcome) => outcome,
            Err(e) => {
                render::display_error(&e);
                return Ok(());
            }
        };

        let answer = reader.prompt("💾 Download report as JSON? [y/N] ").await?;
        if answer.as_deref().is_some_and(input::is_yes) {
            if let Err(e) = self.orchestrator.export(&mut outcome, out_dir).await {
                render::display_error(&e);
            }
        }
        println!("{}", "ℹ️  Starting a new analysis. Type '/quit' to exit.".blue());
        Ok(())
    }

    async fn collect_submission(reader: &mut InputReader) -> Result<Step<SubmissionInput>> {
        let Some(path) = reader.prompt("📎 Resume file (PDF, DOC or DOCX): ").await? else {
            return Ok(Step::Quit);
        };
        if input::is_quit_command(&path) {
            return Ok(Step::Quit);
        }
        let file = if path.is_empty() {
            None
        } else {
            match ResumeFile::from_path(Path::new(&path)).await {
                Ok(file) => {
                    render::display_selected_file(&file);
                    Some(file)
                }
                Err(e) => {
                    render::display_analyze_error(&AnalyzeError::from(e));
                    return Ok(Step::Retry);
                }
            }
        };

        let job_description = reader
            .prompt_block("📋 Job description (finish with an empty line):")
            .await?;
        if input::is_quit_command(&job_description) {
            return Ok(Step::Quit);
        }

        println!(
            "{}",
            "🔀 Analysis type: [1] basic (fast keyword matching)  [2] ai (advanced AI-powered insights)".blue()
        );
        let mode_raw = reader.prompt("Type: ").await?.unwrap_or_default();
        let mode = match mode_raw.to_lowercase().as_str() {
            "" | "1" | "basic" => AnalysisMode::Basic,
            "2" | "ai" => AnalysisMode::AiAssisted,
            other => {
                println!(
                    "{} {}",
                    "⚠️ Unknown type, defaulting to 'basic':".bright_yellow(),
                    other
                );
                AnalysisMode::Basic
            }
        };

        match SubmissionInput::new(file, job_description, mode) {
            Ok(input) => Ok(Step::Value(input)),
            Err(e) => {
                render::display_analyze_error(&AnalyzeError::from(e));
                Ok(Step::Retry)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;

    use crate::client::Analyzer;

    /// Accepts the submission and never answers.
    struct StalledAnalyzer;

    #[async_trait]
    impl Analyzer for StalledAnalyzer {
        async fn submit(&self, _input: &SubmissionInput) -> Result<JsonValue, AnalyzeError> {
            std::future::pending().await
        }
    }

    fn submission() -> SubmissionInput {
        let file = ResumeFile::new("cv.pdf", b"%PDF-1.4".to_vec()).unwrap();
        SubmissionInput::new(Some(file), "Platform engineer", AnalysisMode::AiAssisted).unwrap()
    }

    #[tokio::test]
    async fn interrupt_abandons_a_stalled_analysis() {
        let orchestrator = Orchestrator::new(StalledAnalyzer);
        let input = submission();

        let result = unless_interrupted(async {}, orchestrator.analyze(&input)).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn shared_interrupt_is_polled_across_stages() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut interrupt = pin!(async move {
            let _ = rx.await;
        });

        let first = unless_interrupted(interrupt.as_mut(), async { 1 }).await;
        assert_eq!(first, Some(1));

        // Signal arrives between stages; the next stage still sees it.
        tx.send(()).unwrap();
        let orchestrator = Orchestrator::new(StalledAnalyzer);
        let input = submission();
        let second = unless_interrupted(interrupt.as_mut(), orchestrator.analyze(&input)).await;
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn work_finishing_first_is_returned() {
        let out = unless_interrupted(std::future::pending(), async { 42 }).await;
        assert_eq!(out, Some(42));
    }
}
