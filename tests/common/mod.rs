#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use intake::config::{Config, PhotoMode};
use intake::photos::{self, PhotoStore};
use intake::sinks::{SinkError, SubmissionSink};
use intake::state::AppState;
use intake::submission::Submission;

/// Sink double that records what it was asked to deliver.
#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<Submission>>,
    pub fail: bool,
    pub unconfigured: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    pub fn last(&self) -> Submission {
        self.delivered.lock().unwrap().last().cloned().expect("nothing delivered")
    }
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    fn id(&self) -> &str {
        "recording"
    }

    fn not_configured(&self) -> Option<&str> {
        self.unconfigured
            .then_some("Email service is not configured. Please contact us directly.")
    }

    async fn send(&self, submission: &Submission) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::from("provider down"));
        }
        self.delivered.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub sink: Arc<RecordingSink>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST JSON to the contact endpoint, return (body, status).
    pub async fn submit(&self, data: &Value) -> (Value, StatusCode) {
        self.submit_from(None, data).await
    }

    /// Same as `submit`, with an `X-Forwarded-For` header.
    pub async fn submit_from(&self, ip: Option<&str>, data: &Value) -> (Value, StatusCode) {
        let mut req = self.client.post(self.url("/submit-contact")).json(data);
        if let Some(ip) = ip {
            req = req.header("x-forwarded-for", ip);
        }
        let resp = req.send().await.expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST a multipart body to the photo endpoint, return (body, status).
    pub async fn upload(&self, form: reqwest::multipart::Form) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/upload-photos"))
            .multipart(form)
            .send()
            .await
            .expect("upload request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn photo(name: &str, mime: &str, size: usize) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(vec![0xAB; size])
        .file_name(name.to_string())
        .mime_str(mime)
        .unwrap()
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.host = "127.0.0.1".parse().unwrap();
    config.port = 0;
    config.log_level = "warn".to_string();
    config.photos.mode = PhotoMode::Inline;
    config
}

/// Spawn the app with a recording sink and the default test config.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), RecordingSink::default()).await
}

pub async fn spawn_app_with(config: Config, sink: RecordingSink) -> TestApp {
    let store: Arc<dyn PhotoStore> = photos::build(&config.photos);
    let sink = Arc::new(sink);
    let state = Arc::new(AppState::new(config, sink.clone(), store));
    let app = intake::build_app(state);

    let addr = serve(app).await;

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client, sink }
}

/// Bind a router to a random local port and serve it in the background.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    addr
}
