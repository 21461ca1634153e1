use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use resume_matcher::client::{AnalyzeError, Analyzer};
use resume_matcher::export::ExportDocument;
use resume_matcher::orchestrator::Orchestrator;
use resume_matcher::types::{AnalysisMode, ResumeFile, SubmissionInput};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
struct StubAnalyzer {
    calls: Arc<AtomicUsize>,
    response: Result<JsonValue, String>,
}

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn submit(&self, _input: &SubmissionInput) -> Result<JsonValue, AnalyzeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().map_err(|message| AnalyzeError::ServerError {
            status: Some(422),
            message,
        })
    }
}

fn submission() -> SubmissionInput {
    let file = ResumeFile::new("jane_doe.docx", b"PK docx bytes".to_vec()).unwrap();
    SubmissionInput::new(Some(file), "Data engineer with Spark", AnalysisMode::Basic).unwrap()
}

#[tokio::test]
async fn run_submits_once_normalizes_and_exports() {
    let calls = Arc::new(AtomicUsize::new(0));
    let stub = StubAnalyzer {
        calls: calls.clone(),
        response: Ok(json!({
            "success": true,
            "filename": "jane_doe.docx",
            "analysis_type": "basic",
            "result": {
                "final_score": 58.2,
                "matched_skills": ["Spark"],
                "suggestions": ["Add Airflow experience"]
            }
        })),
    };
    let out = tempfile::tempdir().unwrap();

    let outcome = Orchestrator::new(stub).run(&submission(), Some(out.path())).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.report.match_score, 58);
    assert_eq!(outcome.report.recommendations, vec!["Add Airflow experience"]);

    let path = outcome.export_path.expect("export path");
    let doc: ExportDocument = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(doc.filename, "jane_doe.docx");
    assert_eq!(doc.analysis_type, "basic");
    assert_eq!(doc.report(), outcome.report);
}

#[tokio::test]
async fn missing_envelope_metadata_falls_back_to_submission() {
    let stub = StubAnalyzer {
        calls: Arc::new(AtomicUsize::new(0)),
        response: Ok(json!({"match_score": 91})),
    };

    let outcome = Orchestrator::new(stub).run(&submission(), None).await.unwrap();

    assert_eq!(outcome.filename, "jane_doe.docx");
    assert_eq!(outcome.analysis_type, "basic");
    assert_eq!(outcome.report.match_score, 91);
    assert!(outcome.export_path.is_none());
}

#[tokio::test]
async fn submit_failure_is_surfaced_without_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let stub = StubAnalyzer {
        calls: calls.clone(),
        response: Err("Unsupported document".to_string()),
    };

    let err = Orchestrator::new(stub).run(&submission(), None).await.unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let analyze_error = err.downcast_ref::<AnalyzeError>().expect("AnalyzeError");
    assert!(analyze_error.user_message().contains("Unsupported document"));
}
