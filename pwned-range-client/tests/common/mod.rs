//! hyper-backed stub standing in for the range API.

#![allow(dead_code)]

use std::convert::Infallible;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::{Frame, Incoming};
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub enum Reply {
    /// Answer every request with this status and body.
    Respond { status: u16, body: String },
    /// Send a 200 with the first part of a body, then drop the connection.
    Truncated { partial: String },
    /// Record the request, then never answer.
    Hang,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Reply::Respond { status: 200, body: body.into() }
    }

    pub fn status(status: u16) -> Self {
        Reply::Respond { status, body: String::new() }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::default();

        let recorded = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let reply = reply.clone();
                let recorded = Arc::clone(&recorded);
                let service = service_fn(move |req: Request<Incoming>| {
                    let reply = reply.clone();
                    let recorded = Arc::clone(&recorded);
                    async move { Ok::<_, Infallible>(respond(req, reply, &recorded).await) }
                });
                tokio::spawn(async move {
                    // Truncated replies end the connection with an error on purpose.
                    let _ = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await;
                });
            }
        });

        Self { base_url: format!("http://{addr}/"), requests, task }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A base URL on which nothing is listening.
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

type StubBody = UnsyncBoxBody<Bytes, io::Error>;

fn full(body: impl Into<Bytes>) -> StubBody {
    Full::new(body.into()).map_err(|never| match never {}).boxed_unsync()
}

async fn respond(
    req: Request<Incoming>,
    reply: Reply,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Response<StubBody> {
    let headers = req
        .headers()
        .iter()
        .map(|(name, value)| {
            (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string())
        })
        .collect();
    recorded.lock().unwrap().push(RecordedRequest {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        headers,
    });

    let (status, body) = match reply {
        Reply::Respond { status, body } => (status, full(body)),
        Reply::Truncated { partial } => {
            // The failure is delayed so the head and first chunk are flushed
            // before hyper aborts the connection.
            let frames = futures::stream::iter([Ok(Frame::data(Bytes::from(partial)))]).chain(
                futures::stream::once(async {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, "stub dropped the body"))
                }),
            );
            (200, StreamBody::new(frames).boxed_unsync())
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(300)).await;
            (503, full(Bytes::new()))
        }
    };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(body)
        .unwrap()
}
