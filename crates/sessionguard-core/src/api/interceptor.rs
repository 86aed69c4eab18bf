use reqwest::header::HeaderMap;
use reqwest::StatusCode;

/// Hook that sees every outgoing request and every response status.
pub trait Interceptor: Send + Sync {
    fn before_send(&self, _headers: &mut HeaderMap) {}

    fn on_response(&self, _status: StatusCode) {}
}
