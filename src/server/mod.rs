use anyhow::{anyhow, Result};
use serde_json::json;
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{error, info, warn};
use url::Url;

use crate::transcribe::TranscriptPipeline;

const DOWNLOAD_PATH: &str = "/download";
const HEALTH_PATH: &str = "/health";

/// A parsed incoming request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Download {
        url: Option<String>,
        lang: Option<String>,
    },
    Health,
    MethodNotAllowed,
    NotFound,
}

impl Route {
    /// Resolve a method and request target (path plus query) to a route
    pub fn parse(method: &Method, target: &str) -> Self {
        // Request targets are relative; give them a base so the query can be parsed
        let Ok(parsed) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
            return Route::NotFound;
        };

        let path = parsed.path().trim_end_matches('/');
        let known = path == DOWNLOAD_PATH || path == HEALTH_PATH;

        if known && *method != Method::Get {
            return Route::MethodNotAllowed;
        }

        match path {
            DOWNLOAD_PATH => {
                let mut url = None;
                let mut lang = None;
                for (key, value) in parsed.query_pairs() {
                    match key.as_ref() {
                        "url" => url = Some(value.into_owned()),
                        "lang" | "language" => lang = Some(value.into_owned()),
                        _ => {}
                    }
                }
                Route::Download { url, lang }
            }
            HEALTH_PATH => Route::Health,
            _ => Route::NotFound,
        }
    }
}

/// Status code and JSON body for a route
pub async fn dispatch(route: Route, pipeline: &TranscriptPipeline) -> (u16, String) {
    match route {
        Route::Download { url: Some(url), lang } => {
            match pipeline.fetch_transcript(&url, lang.as_deref()).await {
                Ok(response) => match serde_json::to_string(&response) {
                    Ok(body) => (200, body),
                    Err(e) => detail(500, &format!("An error occurred: {}", e)),
                },
                Err(e) => {
                    if e.status_code() == 500 {
                        error!(%url, error = %e, "caption request failed");
                    }
                    detail(e.status_code(), &e.detail())
                }
            }
        }
        Route::Download { url: None, .. } => detail(422, "Missing query parameter: url"),
        Route::Health => (
            200,
            json!({
                "status": "ok",
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            })
            .to_string(),
        ),
        Route::MethodNotAllowed => detail(405, "Method Not Allowed"),
        Route::NotFound => detail(404, "Not Found"),
    }
}

fn detail(status: u16, message: &str) -> (u16, String) {
    (status, json!({ "detail": message }).to_string())
}

/// Serve `GET /download/?url=...` until interrupted
pub async fn serve(pipeline: Arc<TranscriptPipeline>, addr: &str) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow!("Failed to start server on {}: {}", addr, e))?;
    let server = Arc::new(server);

    info!("Caption API listening on http://{}{}/", addr, DOWNLOAD_PATH);

    loop {
        let receiver = server.clone();
        let next = tokio::task::spawn_blocking(move || receiver.recv());

        let request = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down caption API");
                server.unblock();
                break;
            }
            received = next => match received? {
                Ok(request) => request,
                Err(e) => {
                    warn!("Caption API receive error: {}", e);
                    continue;
                }
            },
        };

        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            handle_request(request, &pipeline).await;
        });
    }

    Ok(())
}

async fn handle_request(request: Request, pipeline: &TranscriptPipeline) {
    let route = Route::parse(request.method(), request.url());
    tracing::debug!(method = %request.method(), url = %request.url(), ?route, "request");

    let (status, body) = dispatch(route, pipeline).await;
    respond(request, status, body);
}

fn respond(request: Request, status: u16, body: String) {
    let mut response = Response::from_string(body).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
        response.add_header(header);
    }

    if let Err(e) = request.respond(response) {
        warn!("Failed to write response: {}", e);
    }
}
