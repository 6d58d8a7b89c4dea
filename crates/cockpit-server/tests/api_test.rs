//! HTTP round trips against a server backed by a scripted gateway.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use cockpit_core::config::CockpitConfig;
use cockpit_core::gateway::{GatewayError, GenerationGateway, Operation, ResearchResult};
use cockpit_core::models::{ReferenceImage, SourceCitation};
use cockpit_core::state::{AppState, AppStateInner};
use cockpit_server::{start_server_with_state, ServerConfig};

/// Holds research until released.
#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

#[derive(Default)]
struct ScriptedGateway {
    calls: Mutex<Vec<Operation>>,
    fail_research: bool,
    research_gate: Option<Gate>,
}

impl ScriptedGateway {
    fn record(&self, operation: Operation) {
        self.calls.lock().unwrap().push(operation);
    }

    fn count(&self, operation: Operation) -> usize {
        self.calls.lock().unwrap().iter().filter(|op| **op == operation).count()
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGateway {
    async fn research(&self, topic: &str) -> Result<ResearchResult, GatewayError> {
        if let Some(gate) = &self.research_gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        self.record(Operation::Research);
        if self.fail_research {
            return Err(GatewayError::new(
                Operation::Research,
                Operation::Research.failure_message(),
            ));
        }
        Ok(ResearchResult {
            text: format!("Recherche: {}", topic),
            citations: vec![SourceCitation::new("https://quelle.example/", "Quelle")],
        })
    }

    async fn outline(
        &self,
        _topic: &str,
        _research: &str,
        _citations: &[SourceCitation],
        internal_links: &[String],
    ) -> Result<String, GatewayError> {
        self.record(Operation::Outline);
        Ok(format!("Gliederung mit {} Links", internal_links.len()))
    }

    async fn content_part(
        &self,
        _topic: &str,
        _outline: &str,
        _previous_content: &str,
        part: u8,
    ) -> Result<String, GatewayError> {
        self.record(Operation::ContentPart);
        Ok(format!("<p>Teil {}</p>", part))
    }

    async fn revise(&self, _content: &str, feedback: &str) -> Result<String, GatewayError> {
        self.record(Operation::Revise);
        Ok(format!("Überarbeitet: {}", feedback))
    }

    async fn production_package(&self, content: &str) -> Result<String, GatewayError> {
        self.record(Operation::ProductionPackage);
        Ok(format!("<html>{}</html>", content))
    }

    async fn generate_image(
        &self,
        _prompt: &str,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GatewayError> {
        self.record(Operation::GenerateImage);
        Ok(match reference {
            Some(r) => format!("ref:{}", r.mime_type),
            None => "aW1hZ2U=".to_string(),
        })
    }
}

async fn spawn(gateway: Arc<ScriptedGateway>) -> SocketAddr {
    let state: AppState = Arc::new(AppStateInner::with_gateway(CockpitConfig::default(), gateway));
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    start_server_with_state(config, state)
        .await
        .expect("Failed to start server")
}

async fn post(client: &reqwest::Client, url: String, body: Value) -> (u16, Value) {
    let response = client.post(url).json(&body).send().await.expect("request failed");
    let status = response.status().as_u16();
    (status, response.json().await.expect("json body"))
}

#[tokio::test]
async fn test_health() {
    let addr = spawn(Arc::new(ScriptedGateway::default())).await;
    let body: Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["server"], "cockpit-server");
}

#[tokio::test]
async fn test_raw_research_and_validation() {
    let addr = spawn(Arc::new(ScriptedGateway::default())).await;
    let client = reqwest::Client::new();

    let (status, body) = post(&client, format!("http://{}/api/research", addr), json!({ "topic": "Hundetraining" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["text"], "Recherche: Hundetraining");
    assert_eq!(body["sources"][0]["uri"], "https://quelle.example/");

    let (status, body) = post(&client, format!("http://{}/api/research", addr), json!({ "topic": "  " })).await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());

    let (status, _) = post(
        &client,
        format!("http://{}/api/content", addr),
        json!({ "topic": "t", "outline": "o", "part": 4 }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = post(&client, format!("http://{}/api/production-html", addr), json!({ "content": "ABC" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["html"], "<html>ABC</html>");
}

#[tokio::test]
async fn test_raw_research_failure_is_bad_gateway() {
    let gateway = Arc::new(ScriptedGateway {
        fail_research: true,
        ..Default::default()
    });
    let addr = spawn(gateway).await;
    let client = reqwest::Client::new();

    let (status, body) = post(&client, format!("http://{}/api/research", addr), json!({ "topic": "Hundetraining" })).await;
    assert_eq!(status, 502);
    assert_eq!(body["error"], Operation::Research.failure_message());
}

#[tokio::test]
async fn test_session_full_run() {
    let gateway = Arc::new(ScriptedGateway::default());
    let addr = spawn(gateway.clone()).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/sessions", addr);

    let (status, body) = post(&client, base.clone(), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["wizard"]["step"], "TOPIC_INPUT");
    let id = body["session"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(&client, format!("{}/{}/start", base, id), json!({ "topic": "Hundetraining" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["step"], "RESEARCH");
    assert_eq!(body["draft"], "Recherche: Hundetraining");
    assert_eq!(body["busy"], false);

    // Start again is not allowed once the run is underway.
    let (status, _) = post(&client, format!("{}/{}/start", base, id), json!({ "topic": "x" })).await;
    assert_eq!(status, 400);

    let mut step = body["step"].as_str().unwrap().to_string();
    while step != "COMPLETED" {
        let (status, body) = post(&client, format!("{}/{}/accept", base, id), json!({})).await;
        assert_eq!(status, 200);
        step = body["step"].as_str().unwrap().to_string();
        if step == "COMPLETED" {
            assert_eq!(body["finalArticle"], "<p>Teil 1</p><p>Teil 2</p><p>Teil 3</p>");
            assert_eq!(
                body["productionArtifact"],
                "<html><p>Teil 1</p><p>Teil 2</p><p>Teil 3</p></html>"
            );
            assert_eq!(body["artifacts"]["outline"], "Gliederung mit 9 Links");
        }
    }
    assert_eq!(gateway.count(Operation::ProductionPackage), 1);

    let (status, body) = post(&client, format!("{}/{}/reset", base, id), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["step"], "TOPIC_INPUT");
    assert_eq!(body["topic"], "");
    assert!(body["productionArtifact"].is_null());
}

#[tokio::test]
async fn test_session_revision_via_feedback() {
    let addr = spawn(Arc::new(ScriptedGateway::default())).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/sessions", addr);

    let (_, body) = post(&client, base.clone(), json!({})).await;
    let id = body["session"]["id"].as_str().unwrap().to_string();
    post(&client, format!("{}/{}/start", base, id), json!({ "topic": "Hundetraining" })).await;

    let (status, body) = post(&client, format!("{}/{}/editing", base, id), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(body["mode"], "EDITING");

    let response = client
        .put(format!("{}/{}/feedback", base, id))
        .json(&json!({ "feedback": "kürzer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["feedback"], "kürzer");

    let (status, _) = post(&client, format!("{}/{}/feedback", base, id), json!({ "feedback": " " })).await;
    assert_eq!(status, 400);

    let (status, body) = post(&client, format!("{}/{}/feedback", base, id), json!({ "feedback": "kürzer" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["draft"], "Überarbeitet: kürzer");
    assert_eq!(body["mode"], "VIEWING");
    assert_eq!(body["step"], "RESEARCH");
}

#[tokio::test]
async fn test_failed_research_records_error_then_retry() {
    let gateway = Arc::new(ScriptedGateway {
        fail_research: true,
        ..Default::default()
    });
    let addr = spawn(gateway.clone()).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/sessions", addr);

    let (_, body) = post(&client, base.clone(), json!({})).await;
    let id = body["session"]["id"].as_str().unwrap().to_string();

    let (status, body) = post(&client, format!("{}/{}/start", base, id), json!({ "topic": "Hundetraining" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["step"], "RESEARCH");
    assert!(body["draft"].is_null());
    assert_eq!(body["error"], Operation::Research.failure_message());

    let (status, _) = post(&client, format!("{}/{}/retry", base, id), json!({})).await;
    assert_eq!(status, 200);
    assert_eq!(gateway.count(Operation::Research), 2);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let addr = spawn(Arc::new(ScriptedGateway::default())).await;
    let client = reqwest::Client::new();

    let (status, body) = post(&client, format!("http://{}/api/sessions/nope/accept", addr), json!({})).await;
    assert_eq!(status, 404);
    assert!(body["error"].as_str().unwrap().contains("nope"));

    let response = client
        .delete(format!("http://{}/api/sessions/nope", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn test_image_panel() {
    let addr = spawn(Arc::new(ScriptedGateway::default())).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/sessions", addr);

    let filters: Value = reqwest::get(format!("http://{}/api/image-filters", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(filters["filters"].as_array().unwrap().len(), 11);

    let (_, body) = post(&client, base.clone(), json!({})).await;
    let id = body["session"]["id"].as_str().unwrap().to_string();

    let (status, _) = post(&client, format!("{}/{}/image", base, id), json!({ "prompt": "" })).await;
    assert_eq!(status, 400);

    let (status, body) = post(&client, format!("{}/{}/image", base, id), json!({ "prompt": "Hund im Park" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["image"], "aW1hZ2U=");
    assert_eq!(body["dataUrl"], "data:image/png;base64,aW1hZ2U=");
    assert_eq!(body["filename"], "Hund_im_Park.png");

    let (status, body) = post(&client, format!("{}/{}/image/filter", base, id), json!({ "name": "Cinematic" })).await;
    assert_eq!(status, 200);
    assert!(body["prompt"].as_str().unwrap().starts_with("Hund im Park, cinematic look"));

    let (status, _) = post(&client, format!("{}/{}/image/filter", base, id), json!({ "name": "Unbekannt" })).await;
    assert_eq!(status, 400);

    let (status, body) = post(
        &client,
        format!("{}/{}/image", base, id),
        json!({ "prompt": "Hund", "referenceImage": "data:image/webp;base64,UklGRg==" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["image"], "ref:image/webp");

    // The wizard is untouched by image work.
    let session: Value = reqwest::get(format!("{}/{}", base, id)).await.unwrap().json().await.unwrap();
    assert_eq!(session["wizard"]["step"], "TOPIC_INPUT");
    assert_eq!(session["image"]["prompt"], "Hund");
}

#[tokio::test]
async fn test_intents_during_a_running_request_conflict() {
    let gateway = Arc::new(ScriptedGateway {
        research_gate: Some(Gate::default()),
        ..Default::default()
    });
    let addr = spawn(gateway.clone()).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/sessions", addr);

    let (_, body) = post(&client, base.clone(), json!({})).await;
    let id = body["session"]["id"].as_str().unwrap().to_string();

    let start = tokio::spawn({
        let client = client.clone();
        let url = format!("{}/{}/start", base, id);
        async move { post(&client, url, json!({ "topic": "Hundetraining" })).await }
    });
    let gate = gateway.research_gate.as_ref().unwrap();
    gate.entered.notified().await;

    let session: Value = reqwest::get(format!("{}/{}", base, id)).await.unwrap().json().await.unwrap();
    assert_eq!(session["wizard"]["busy"], true);

    let (status, body) = post(&client, format!("{}/{}/accept", base, id), json!({})).await;
    assert_eq!(status, 409);
    assert!(body["error"].is_string());

    let (status, _) = post(&client, format!("{}/{}/retry", base, id), json!({})).await;
    assert_eq!(status, 409);

    let response = client
        .put(format!("{}/{}/feedback", base, id))
        .json(&json!({ "feedback": "kürzer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 409);

    gate.release.notify_one();
    let (status, body) = start.await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body["busy"], false);
    assert_eq!(body["draft"], "Recherche: Hundetraining");
    assert_eq!(gateway.count(Operation::Research), 1);
}

#[tokio::test]
async fn test_rejected_image_request_leaves_panel_unchanged() {
    let gateway = Arc::new(ScriptedGateway::default());
    let addr = spawn(gateway.clone()).await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/sessions", addr);

    let (_, body) = post(&client, base.clone(), json!({})).await;
    let id = body["session"]["id"].as_str().unwrap().to_string();

    let (status, _) = post(&client, format!("{}/{}/image", base, id), json!({ "prompt": "Hund im Park" })).await;
    assert_eq!(status, 200);

    let (status, _) = post(
        &client,
        format!("{}/{}/image", base, id),
        json!({ "prompt": "Katze", "referenceImage": "%%%" }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = post(&client, format!("{}/{}/image", base, id), json!({ "prompt": "  " })).await;
    assert_eq!(status, 400);

    let panel: Value = reqwest::get(format!("{}/{}/image", base, id)).await.unwrap().json().await.unwrap();
    assert_eq!(panel["prompt"], "Hund im Park");
    assert_eq!(panel["image"], "aW1hZ2U=");
    assert_eq!(gateway.count(Operation::GenerateImage), 1);
}

#[tokio::test]
async fn test_non_api_paths_are_not_served() {
    let addr = spawn(Arc::new(ScriptedGateway::default())).await;
    let response = reqwest::get(format!("http://{}/index.html", addr)).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
