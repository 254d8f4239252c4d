//! In-process HTTP client over the in-memory backend.
//!
//! Every call spins up a fresh Actix system and service so synchronous BDD
//! steps can drive requests; state persists in the shared [`MemoryBackend`].

use actix_web::cookie::Cookie;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use looma_backend::Trace;
use looma_backend::domain::TRACE_ID_HEADER;
use looma_backend::inbound::http::configure_api;
use looma_backend::test_support::MemoryBackend;
use serde_json::Value;

/// Outcome of one request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl Reply {
    /// Session cookie issued by the response, if any.
    pub fn cookie(&self) -> Option<Cookie<'static>> {
        self.set_cookie
            .as_deref()
            .and_then(|raw| Cookie::parse(raw.to_owned()).ok())
    }
}

/// Run `future` to completion on a throwaway Actix system.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    actix_rt::System::new().block_on(future)
}

/// Send one JSON request through the `/api` scope.
pub fn send(
    backend: &MemoryBackend,
    method: Method,
    path: &str,
    cookie: Option<Cookie<'static>>,
    payload: Option<Value>,
) -> Reply {
    let data = backend.data();
    block_on(async move {
        let app = test::init_service(
            App::new()
                .app_data(data)
                .wrap(Trace)
                .service(web::scope("/api").configure(configure_api)),
        )
        .await;
        let mut request = test::TestRequest::default().method(method).uri(path);
        if let Some(cookie) = cookie {
            request = request.cookie(cookie);
        }
        if let Some(payload) = payload {
            request = request.set_json(payload);
        }
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let header_text = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let trace_id = header_text(TRACE_ID_HEADER);
        let set_cookie = header_text(header::SET_COOKIE.as_str());
        let bytes = test::read_body(response).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Reply {
            status,
            trace_id,
            set_cookie,
            body,
        }
    })
}
