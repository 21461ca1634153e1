use resume_matcher::client::{AnalyzeError, Analyzer, AnalyzerClient};
use resume_matcher::config::Config;
use resume_matcher::normalizer::normalize;
use resume_matcher::types::{AnalysisMode, ApplicationRecommendation, ResumeFile, SubmissionInput};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_regex, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches a multipart text part by name and exact value.
struct FormField {
    name: &'static str,
    value: &'static str,
}

impl Match for FormField {
    fn matches(&self, request: &Request) -> bool {
        let body = String::from_utf8_lossy(&request.body);
        let needle = format!("name=\"{}\"\r\n\r\n{}\r\n", self.name, self.value);
        body.contains(&needle)
    }
}

/// Matches when no multipart part carries the given name.
struct NoFormField(&'static str);

impl Match for NoFormField {
    fn matches(&self, request: &Request) -> bool {
        let body = String::from_utf8_lossy(&request.body);
        !body.contains(&format!("name=\"{}\"", self.0))
    }
}

fn submission(mode: AnalysisMode) -> SubmissionInput {
    let file = ResumeFile::new("cv.pdf", b"%PDF-1.4 plain test resume".to_vec()).unwrap();
    SubmissionInput::new(Some(file), "Senior Rust engineer, Tokio, Kubernetes", mode).unwrap()
}

fn client_for(server: &MockServer) -> AnalyzerClient {
    AnalyzerClient::new(Config::default().with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn basic_mode_posts_once_to_analyze_with_marker() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"resume\""))
        .and(body_string_contains("filename=\"cv.pdf\""))
        .and(body_string_contains("name=\"job_description\""))
        .and(body_string_contains("Senior Rust engineer"))
        .and(FormField { name: "analysis_type", value: "basic" })
        .and(NoFormField("model"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "filename": "cv.pdf",
            "analysis_type": "basic",
            "result": {
                "match_percentage": 67.8,
                "matched_skills": ["Rust", "Tokio"],
                "missing_skills": ["Kubernetes"],
                "insights": ["Strong async experience", "Missing cluster operations"]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/analyze-ai"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let raw = client_for(&server).submit(&submission(AnalysisMode::Basic)).await.unwrap();
    let report = normalize(&raw);

    assert_eq!(report.match_score, 68);
    assert_eq!(report.matched_skills, vec!["Rust", "Tokio"]);
    assert_eq!(report.strengths, vec!["Strong async experience"]);
    assert_eq!(report.gaps, vec!["Missing cluster operations"]);
}

#[tokio::test]
async fn ai_mode_posts_once_to_analyze_ai_with_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze-ai"))
        .and(FormField { name: "model", value: "llama-free" })
        .and(NoFormField("analysis_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "filename": "cv.pdf",
            "analysis_type": "ai",
            "result": {
                "analysis": {
                    "match_score": 88,
                    "matched_requirements": ["Rust"],
                    "missing_requirements": ["Kubernetes"],
                    "recommendations": ["Highlight the scheduler rewrite"],
                    "overall_assessment": "Strong fit",
                    "application_recommendation": "APPLY"
                },
                "match_score": 40
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let raw = client_for(&server).submit(&submission(AnalysisMode::AiAssisted)).await.unwrap();
    let report = normalize(&raw);

    assert_eq!(report.match_score, 88);
    assert_eq!(report.missing_skills, vec!["Kubernetes"]);
    assert_eq!(report.recommendations, vec!["Highlight the scheduler rewrite"]);
    assert_eq!(report.application_recommendation, Some(ApplicationRecommendation::Apply));
}

#[tokio::test]
async fn error_detail_is_surfaced_as_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"detail": "Could not extract text from resume"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).submit(&submission(AnalysisMode::Basic)).await.unwrap_err();
    match err {
        AnalyzeError::ServerError { status, message } => {
            assert_eq!(status, Some(400));
            assert_eq!(message, "Could not extract text from resume");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failure_without_detail_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).submit(&submission(AnalysisMode::Basic)).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::Status { status: 503 }));
    assert!(err.is_network_error());
}

#[tokio::test]
async fn success_false_envelope_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "detail": "Quota exceeded"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server).submit(&submission(AnalysisMode::Basic)).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::ServerError { status: None, ref message } if message == "Quota exceeded"));
}

#[tokio::test]
async fn non_json_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).submit(&submission(AnalysisMode::Basic)).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::ParseError { .. }));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Bind and release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client =
        AnalyzerClient::new(Config::default().with_base_url(format!("http://127.0.0.1:{port}"))).unwrap();

    let err = client.submit(&submission(AnalysisMode::Basic)).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::NetworkError { .. }));
}
