//! Shared helpers for behavioral specs: a `jt` command builder and a
//! scripted Jenkins served by an axum router on a local port.

#![allow(dead_code)]

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use predicates::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Start building a `jt` invocation with fast, isolated settings
pub fn jt() -> Jt {
    Jt::new()
}

pub struct Jt {
    cmd: Command,
}

impl Jt {
    #[allow(deprecated)]
    fn new() -> Self {
        let mut cmd = Command::cargo_bin("jt").unwrap();
        cmd.env_remove("JENKINS_URL")
            .env_remove("JT_WAIT_TIMEOUT")
            .env_remove("JT_LOG")
            .env_remove("RUST_LOG")
            .env("JT_POLL_INTERVAL_MS", "10")
            .env("JT_LOG_INTERVAL_MS", "10")
            .env("JT_STREAM_GRACE_MS", "1000")
            .env("JT_HTTP_TIMEOUT_MS", "5000")
            .timeout(std::time::Duration::from_secs(30));
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and require exit status 0
    pub fn passes(mut self) -> Outcome {
        Outcome(self.cmd.assert().success())
    }

    /// Run and require exit status 1
    pub fn fails(mut self) -> Outcome {
        Outcome(self.cmd.assert().code(1))
    }
}

pub struct Outcome(Assert);

impl Outcome {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(expected)))
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self(self.0.stdout(predicate::str::contains(unexpected).not()))
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self(self.0.stderr(predicate::str::contains(expected)))
    }
}

// =============================================================================
// Scripted Jenkins
// =============================================================================

/// One request the fake server received
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
}

impl Reply {
    pub fn json(body: impl Into<String>) -> Self {
        Self::status(200)
            .header("Content-Type", "application/json")
            .body(body)
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Routes keyed by method and path (query ignored); anything else is a 404
#[derive(Default)]
pub struct FakeJenkins {
    routes: HashMap<(String, String), Reply>,
    jobs: Vec<String>,
}

impl FakeJenkins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, method: &str, path: &str, reply: Reply) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), reply);
        self
    }

    /// A job with its detail and trigger endpoints
    pub fn job(mut self, name: &str, next_build: u64, params: &[&str]) -> Self {
        self.jobs.push(name.to_string());
        let definitions: Vec<String> = params
            .iter()
            .map(|p| format!(r#"{{"name":"{}","defaultParameterValue":{{"value":""}}}}"#, p))
            .collect();
        let detail = format!(
            r#"{{"name":"{}","buildable":true,"nextBuildNumber":{},"property":[{{"parameterDefinitions":[{}]}}]}}"#,
            name,
            next_build,
            definitions.join(",")
        );
        let endpoint = if params.is_empty() { "build" } else { "buildWithParameters" };
        self.route("GET", &format!("/job/{}/api/json", name), Reply::json(detail))
            .route(
                "POST",
                &format!("/job/{}/{}", name, endpoint),
                Reply::status(201).header("Location", "http://jenkins/queue/item/1/"),
            )
    }

    /// A job the server reports as not buildable
    pub fn disabled(self, name: &str) -> Self {
        self.route(
            "GET",
            &format!("/job/{}/api/json", name),
            Reply::json(format!(
                r#"{{"name":"{}","buildable":false,"nextBuildNumber":1,"property":[]}}"#,
                name
            )),
        )
    }

    /// Status document for one build; `result` of `None` means still running
    pub fn build(self, name: &str, number: u64, result: Option<&str>) -> Self {
        let body = match result {
            Some(result) => format!(
                r#"{{"number":{},"building":false,"result":"{}"}}"#,
                number, result
            ),
            None => format!(r#"{{"number":{},"building":true,"result":null}}"#, number),
        };
        self.route("GET", &format!("/job/{}/{}/api/json", name, number), Reply::json(body))
    }

    /// Complete console text for one build
    pub fn console(self, name: &str, number: u64, text: &str, more: bool) -> Self {
        let mut reply = Reply::status(200)
            .header("Content-Type", "text/plain")
            .header("X-Text-Size", &text.len().to_string())
            .body(text);
        if more {
            reply = reply.header("X-More-Data", "true");
        }
        self.route(
            "GET",
            &format!("/job/{}/{}/logText/progressiveText", name, number),
            reply,
        )
    }

    /// Serve on a random local port until the test process exits
    pub fn start(self) -> Server {
        let jobs: Vec<String> = self
            .jobs
            .iter()
            .map(|j| format!(r#"{{"name":"{}","color":"blue"}}"#, j))
            .collect();
        let this = self.route(
            "GET",
            "/api/json",
            Reply::json(format!(r#"{{"jobs":[{}]}}"#, jobs.join(","))),
        );

        let received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(dispatch).with_state(Routes {
            table: Arc::new(this.routes),
            received: Arc::clone(&received),
        });

        // Bound here so the port is live before the binary starts
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Server { url, received }
    }
}

pub struct Server {
    pub url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Server {
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.received()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[derive(Clone)]
struct Routes {
    table: Arc<HashMap<(String, String), Reply>>,
    received: Arc<Mutex<Vec<Received>>>,
}

/// Answer from the route table (query ignored) and record the request
async fn dispatch(State(routes): State<Routes>, method: Method, uri: Uri, body: Bytes) -> Response {
    let key = (method.to_string(), uri.path().to_string());
    let reply = routes
        .table
        .get(&key)
        .cloned()
        .unwrap_or_else(|| Reply::status(404));
    routes.received.lock().unwrap().push(Received {
        method: key.0,
        path: key.1,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let status = StatusCode::from_u16(reply.status).unwrap();
    let mut response = (status, reply.body).into_response();
    for (name, value) in &reply.headers {
        response.headers_mut().insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    response
}
