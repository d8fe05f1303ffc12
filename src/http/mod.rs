//! HTTP surface.
//!
//! Thin plumbing over the coordinator: hyper http1, one spawned task per
//! connection, JSON bodies. Routes mirror the service operations plus the
//! usual health and metrics endpoints.
//!
//! ```text
//! POST   /api/pokemon/{name}        fetch-or-serve, 201
//! GET    /api/pokemons              list all
//! GET    /api/pokemon/{name}        lookup by name
//! DELETE /api/pokemon/id/{id}       delete by upstream id
//! DELETE /api/pokemon/name/{name}   delete by name
//! DELETE /api/pokemon/type/{type}   delete every record with that type
//! GET    /healthz /livez /readyz    liveness
//! GET    /metrics                   prometheus exposition
//! ```

use std::borrow::Cow;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::service::PokemonService;

/// Bind `addr` and serve requests against `service` until the process exits.
pub async fn serve(addr: SocketAddr, service: Arc<PokemonService>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let service = Arc::clone(&service);

        tokio::spawn(async move {
            let handler = service_fn(move |req| handle(req, Arc::clone(&service)));
            if let Err(e) = http1::Builder::new().serve_connection(io, handler).await {
                error!("connection error: {}", e);
            }
        });
    }
}

async fn handle(
    req: Request<Incoming>,
    service: Arc<PokemonService>,
) -> std::result::Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let segments = split_path(&path);
    let segments: Vec<&str> = segments.iter().map(Cow::as_ref).collect();

    let response = match (method.as_str(), segments.as_slice()) {
        ("POST", ["api", "pokemon", name]) => match service.ensure(name).await {
            Ok(record) => json_response(StatusCode::CREATED, &record),
            Err(e) => error_response(&e),
        },
        ("GET", ["api", "pokemons"]) => match service.list_all().await {
            Ok(records) => json_response(StatusCode::OK, &records),
            Err(e) => error_response(&e),
        },
        ("GET", ["api", "pokemon", name]) => match service.get_by_name(name).await {
            Ok(Some(record)) => json_response(StatusCode::OK, &record),
            Ok(None) => not_found("Pokemon not found"),
            Err(e) => error_response(&e),
        },
        ("DELETE", ["api", "pokemon", "id", id]) => match id.parse::<i64>() {
            Ok(id) => match service.delete_by_id(id).await {
                Ok(true) => deleted_response(),
                Ok(false) => not_found("Pokemon not found"),
                Err(e) => error_response(&e),
            },
            Err(_) => json_response_value(
                StatusCode::BAD_REQUEST,
                json!({"error": "id must be an integer"}),
            ),
        },
        ("DELETE", ["api", "pokemon", "name", name]) => {
            match service.delete_by_name(name).await {
                Ok(true) => deleted_response(),
                Ok(false) => not_found("Pokemon not found"),
                Err(e) => error_response(&e),
            }
        }
        ("DELETE", ["api", "pokemon", "type", type_name]) => {
            match service.delete_by_type(type_name).await {
                Ok(true) => deleted_response(),
                Ok(false) => not_found("No Pokemon found with the specified type"),
                Err(e) => error_response(&e),
            }
        }
        ("GET", ["healthz"]) | ("GET", ["livez"]) | ("GET", ["readyz"]) => {
            text_response(StatusCode::OK, "ok")
        }
        ("GET", ["metrics"]) => metrics_response(),
        _ => not_found("not found"),
    };

    Ok(response)
}

/// Split a request path into percent-decoded, non-empty segments.
fn split_path(path: &str) -> Vec<Cow<'_, str>> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::decode(s).unwrap_or(Cow::Borrowed(s)))
        .collect()
}

/// Map a service error onto a response status.
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::ProviderNotFound { .. } => StatusCode::NOT_FOUND,
        Error::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
        Error::Persistence(_) | Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(bytes)))
            .unwrap(),
        Err(e) => error_response(&Error::Internal(format!("response encoding: {}", e))),
    }
}

fn json_response_value(status: StatusCode, value: serde_json::Value) -> Response<Full<Bytes>> {
    json_response(status, &value)
}

fn error_response(err: &Error) -> Response<Full<Bytes>> {
    json_response_value(status_for(err), json!({"error": err.to_string()}))
}

fn not_found(message: &str) -> Response<Full<Bytes>> {
    json_response_value(StatusCode::NOT_FOUND, json!({"message": message}))
}

fn deleted_response() -> Response<Full<Bytes>> {
    json_response_value(StatusCode::OK, json!({"message": "Pokemon deleted successfully"}))
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn metrics_response() -> Response<Full<Bytes>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return error_response(&Error::Internal(format!("metrics encoding: {}", e)));
    }

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", encoder.format_type())
        .body(Full::new(Bytes::from(buffer)))
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        let segs = split_path("/api/pokemon/pikachu");
        assert_eq!(segs, vec!["api", "pokemon", "pikachu"]);

        assert!(split_path("/").is_empty());
        assert_eq!(split_path("//api//pokemons/"), vec!["api", "pokemons"]);
    }

    #[test]
    fn test_split_path_decodes_segments() {
        let segs = split_path("/api/pokemon/mr%20mime");
        assert_eq!(segs, vec!["api", "pokemon", "mr mime"]);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&Error::ProviderNotFound {
                name: "x".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&Error::ProviderUnavailable("down".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::Persistence("oops".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_body_shape() {
        let response = error_response(&Error::ProviderUnavailable("down".to_string()));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }
}
