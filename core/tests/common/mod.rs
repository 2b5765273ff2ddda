//! Shared helpers for the core integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use pastebin_core::{HttpRequest, HttpResponse, Transport, TransportError};

/// Transport double: returns queued responses in order and keeps every
/// request it was handed.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Default)]
struct Recorded {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .responses
            .push_back(HttpResponse::new(status, body));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request);
        inner
            .responses
            .pop_front()
            .ok_or_else(|| TransportError::new("no canned response left"))
    }
}

/// Decode a multipart request body with `multer`.
pub fn decode_form(request: &HttpRequest) -> BTreeMap<String, String> {
    let content_type = request.header("content-type").expect("content-type header");
    let boundary = multer::parse_boundary(content_type).expect("multipart boundary");
    let body = request.body.clone();

    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    rt.block_on(async move {
        let stream = futures_util::stream::once(async move {
            Ok::<_, std::io::Error>(bytes::Bytes::from(body))
        });
        let mut multipart = multer::Multipart::new(stream, boundary);
        let mut fields = BTreeMap::new();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap().to_string();
            fields.insert(name, field.text().await.unwrap());
        }
        fields
    })
}

/// Start the mock API on a random port; returns its base URL.
pub fn spawn_mock_server(db: mock_server::Db) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, db).await
        })
        .unwrap();
    });

    format!("http://{addr}/api/")
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
