//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use rstest::fixture;

use crate::test_support::MemoryBackend;

pub type TestHarness = MemoryBackend;

/// Fresh in-memory backend with a clock pinned to 2025-01-01.
#[fixture]
pub fn harness() -> TestHarness {
    MemoryBackend::new()
}

/// App exposing every `/api` route over the harness state.
pub fn api_app(
    harness: &TestHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(harness.data())
        .service(web::scope("/api").configure(super::configure_api))
}
