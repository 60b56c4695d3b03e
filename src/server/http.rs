//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one spawned task per connection and a
//! `match (method, path)` dispatch. Header and body extraction happens here
//! so the route handlers work on plain values.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::auth::SessionManager;
use crate::config::Args;
use crate::routes;
use crate::store::{EphemeralStore, PersistentStore};
use crate::types::{Result, WicketError};

/// Maximum accepted JSON body size
const MAX_BODY_BYTES: usize = 10_240;

/// Shared application state: configuration, the two store adapters and the
/// session manager built over them. Adapters are injected at startup; their
/// lifecycle is owned by `main`, not by process-wide globals.
pub struct AppState {
    pub args: Args,
    pub db: Arc<dyn PersistentStore>,
    pub kv: Arc<dyn EphemeralStore>,
    pub auth: SessionManager,
}

impl AppState {
    pub fn new(args: Args, db: Arc<dyn PersistentStore>, kv: Arc<dyn EphemeralStore>) -> Self {
        let auth = SessionManager::new(Arc::clone(&db), Arc::clone(&kv));
        Self { args, db, kv, auth }
    }

    /// State over in-memory stores, for handler tests
    #[cfg(test)]
    pub fn for_tests(
        db: Arc<crate::store::memory::MemoryUsers>,
        kv: Arc<crate::store::memory::MemorySessions>,
    ) -> Self {
        use clap::Parser;
        let args = Args::try_parse_from(["wicket"]).expect("default args");
        Self::new(args, db, kv)
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen()).await?;

    info!("Wicket listening on {}", state.args.listen());

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

fn header<'r>(req: &'r Request<Incoming>, name: &str) -> Option<&'r str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

async fn read_body(req: Request<Incoming>) -> Result<Bytes> {
    let bytes = req
        .collect()
        .await
        .map_err(|e| WicketError::Http(format!("Failed to read body: {}", e)))?
        .to_bytes();

    if bytes.len() > MAX_BODY_BYTES {
        return Err(WicketError::Http("Request body too large".into()));
    }

    Ok(bytes)
}

async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    let response = match (method, path.as_str()) {
        (Method::GET, "/status") => routes::handle_status(&state).await,

        (Method::GET, "/stats") => routes::handle_stats(&state).await,

        (Method::POST, "/users") => match read_body(req).await {
            Ok(body) => routes::handle_create_user(&state, &body).await,
            Err(e) => routes::error_response(&e),
        },

        (Method::GET, "/connect") => {
            let authorization = header(&req, "authorization");
            routes::handle_connect(&state, authorization).await
        }

        (Method::GET, "/disconnect") => {
            let token = header(&req, "x-token");
            routes::handle_disconnect(&state, token).await
        }

        (Method::GET, "/users/me") => {
            let token = header(&req, "x-token");
            routes::handle_me(&state, token).await
        }

        (Method::OPTIONS, _) => routes::preflight_response(),

        _ => routes::not_found_response(&path),
    };

    Ok(response)
}
