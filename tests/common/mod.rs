//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use kuwo_proxy::{config::ProxyConfig, HttpServer, Shutdown, Upstream};
use tokio::net::TcpListener;
use url::Url;

/// Hostname tests use for the audio host; resolved to the mock.
pub const AUDIO_HOST: &str = "music.kuwo.cn";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.uri.query().unwrap_or("").as_bytes())
            .into_owned()
            .collect()
    }
}

/// Every request the mock upstream received, in order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Recorder {
    pub fn all(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single(&self) -> Recorded {
        let all = self.all();
        assert_eq!(all.len(), 1, "expected exactly one upstream request");
        all[0].clone()
    }
}

async fn mock_handler(State(recorder): State<Recorder>, request: Request) -> Response {
    let (parts, _) = request.into_parts();
    recorder.requests.lock().unwrap().push(Recorded {
        method: parts.method.clone(),
        uri: parts.uri.clone(),
        headers: parts.headers.clone(),
    });

    let query = parts.uri.query().unwrap_or("");
    let builder = Response::builder();
    let response = match parts.uri.path() {
        "/song.mp3" => {
            let builder = builder
                .header("content-type", "audio/mpeg")
                .header("accept-ranges", "bytes")
                .header("server", "sycdn.kuwo.cn")
                .header("set-cookie", "track=1")
                .header("x-upstream-secret", "hidden");
            if parts.headers.contains_key("range") {
                builder
                    .status(StatusCode::PARTIAL_CONTENT)
                    .header("content-range", "bytes 0-3/10")
                    .body(Body::from("ID3\u{3}"))
            } else {
                builder.status(StatusCode::OK).body(Body::from("ID3\u{3}fake!!"))
            }
        }
        "/api/music" if query.contains("type=typed") => builder
            .header("content-type", "application/json")
            .header("cache-control", "max-age=60")
            .body(Body::from(r#"{"code":200,"typed":true}"#)),
        "/api/music" => builder
            .header("set-cookie", "session=1")
            .header("server", "nginx")
            .body(Body::from(r#"{"code":200,"data":[]}"#)),
        _ => builder
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("gone")),
    };
    response.unwrap()
}

/// Start a mock upstream serving both audio and API paths.
pub async fn start_mock_upstream() -> (SocketAddr, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .fallback(mock_handler)
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, recorder)
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Upstream whose API base is the mock and whose audio host resolves to it.
pub fn mock_upstream(addr: SocketAddr) -> Upstream {
    let client = reqwest::Client::builder()
        .no_proxy()
        .resolve(AUDIO_HOST, SocketAddr::from(([127, 0, 0, 1], 0)))
        .build()
        .unwrap();
    let api_base = Url::parse(&format!("http://{addr}/api/music")).unwrap();
    Upstream::new(client, api_base, Duration::from_secs(5))
}

/// Start the proxy in front of `upstream`.
pub async fn start_proxy(upstream: Upstream) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::with_upstream(ProxyConfig::default(), upstream);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client for talking to the proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// `target` parameter value pointing at the mock's audio path.
pub fn audio_target(mock: SocketAddr, path: &str) -> String {
    let raw = format!("https://{AUDIO_HOST}:{}{path}", mock.port());
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
