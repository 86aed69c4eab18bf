//! API client for the user-administration backend.
//!
//! Every request is built by `execute`, which runs the registered
//! interceptors around the HTTP call and maps failed statuses to `ApiError`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::models::{LoginRequest, Page, ProfileUpdate, RegistrationRequest, TokenResponse, User};
use crate::session::SessionGuard;

use super::{ApiError, Interceptor};

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the backend.
/// Clone is cheap - reqwest::Client and the interceptors are reference counted.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    interceptors: Vec<Arc<dyn Interceptor>>,
    initial_backoff: Duration,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot have paths appended: {}", base_url);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            interceptors: Vec::new(),
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
        })
    }

    /// Override the first 429 backoff delay; later retries double it
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Register a hook that runs around every request, in registration order
    pub fn register_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.register_interceptor(interceptor);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot have paths appended"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request through the interceptors, retrying on 429 with
    /// exponential backoff. Non-success statuses become `ApiError`.
    async fn execute<F>(&self, method: Method, url: Url, build: F) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let mut headers = HeaderMap::new();
            for interceptor in &self.interceptors {
                interceptor.before_send(&mut headers);
            }

            let request = build(self.client.request(method.clone(), url.clone()).headers(headers));
            let response = request
                .send()
                .await
                .map_err(ApiError::from)
                .with_context(|| format!("Failed to send {} request to {}", method, url))?;

            let status = response.status();
            for interceptor in &self.interceptors {
                interceptor.on_response(status);
            }

            if status.is_success() {
                debug!(method = %method, url = %url, status = status.as_u16(), "Request succeeded");
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RATE_LIMIT_RETRIES {
                retries += 1;
                warn!(url = %url, retry = retries, backoff_ms = backoff.as_millis() as u64, "Rate limited, backing off");
                tokio::time::sleep(backoff).await;
                backoff *= 2; // Exponential backoff
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body).into());
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let url = response.url().clone();
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let response = self.execute(Method::GET, url, |r| r).await?;
        Self::parse(response).await
    }

    async fn send_json<T, B>(&self, method: Method, segments: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let response = self.execute(method, url, |r| r.json(body)).await?;
        Self::parse(response).await
    }

    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        self.execute(Method::DELETE, url, |r| r).await?;
        Ok(())
    }

    /// Reject input the backend would reject, without sending a request
    fn ensure_valid(errors: Vec<String>) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(errors).into())
        }
    }

    // ===== Authentication =====

    /// Exchange credentials for a token. Nothing is stored.
    pub async fn login(&self, email: &str, senha: &str) -> Result<TokenResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            senha: senha.to_string(),
        };
        self.send_json(Method::POST, &["api", "auth", "login"], &body)
            .await
            .context("Login failed")
    }

    /// Log in and persist the resulting session through the guard
    pub async fn login_and_store(&self, guard: &SessionGuard, email: &str, senha: &str) -> Result<User> {
        let session = self.login(email, senha).await?;
        guard
            .store_session(&session)
            .context("Failed to store session after login")?;
        info!(
            email = email,
            role = session.usuario.tipo.as_deref().unwrap_or("-"),
            "Logged in"
        );
        Ok(session.usuario)
    }

    /// Register a new client account
    pub async fn register(&self, request: &RegistrationRequest) -> Result<User> {
        Self::ensure_valid(request.validation_errors())?;
        self.send_json(Method::POST, &["api", "auth", "registro"], request)
            .await
            .context("Registration failed")
    }

    /// Update the caller's own profile
    pub async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<User> {
        Self::ensure_valid(update.validation_errors())?;
        let id = id.to_string();
        self.send_json(Method::PUT, &["api", "usuarios", &id], update)
            .await
            .context("Profile update failed")
    }

    // ===== Admins (SUPERADMIN only) =====

    pub async fn list_admins(&self) -> Result<Vec<User>> {
        self.get(&["api", "usuarios", "admin"]).await
    }

    pub async fn create_admin(&self, request: &RegistrationRequest) -> Result<User> {
        Self::ensure_valid(request.validation_errors())?;
        self.send_json(Method::POST, &["api", "usuarios", "admin"], request)
            .await
            .context("Failed to create admin")
    }

    pub async fn update_admin(&self, id: i64, update: &ProfileUpdate) -> Result<User> {
        Self::ensure_valid(update.validation_errors())?;
        let id = id.to_string();
        self.send_json(Method::PUT, &["api", "usuarios", "admin", &id], update)
            .await
            .with_context(|| format!("Failed to update admin {}", id))
    }

    pub async fn delete_admin(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        self.delete(&["api", "usuarios", "admin", &id])
            .await
            .with_context(|| format!("Failed to delete admin {}", id))
    }

    // ===== Clients (ADMIN and SUPERADMIN) =====

    pub async fn list_clients(&self) -> Result<Vec<User>> {
        self.get(&["api", "usuarios", "clientes"]).await
    }

    /// One page of clients; `page` is zero-based
    pub async fn list_clients_page(&self, page: u32, size: u32) -> Result<Page<User>> {
        let url = self.endpoint(&["api", "usuarios", "clientes", "paginado"])?;
        let response = self
            .execute(Method::GET, url, |r| r.query(&[("page", page), ("size", size)]))
            .await?;
        Self::parse(response).await
    }

    /// Client accounts whose name contains `nome`
    pub async fn search_clients(&self, nome: &str) -> Result<Vec<User>> {
        let url = self.endpoint(&["api", "usuarios", "clientes", "busca"])?;
        let response = self
            .execute(Method::GET, url, |r| r.query(&[("nome", nome)]))
            .await?;
        Self::parse(response).await
    }

    /// Look up a client by email; `None` when the backend has no match
    pub async fn find_client_by_email(&self, email: &str) -> Result<Option<User>> {
        let url = self.endpoint(&["api", "usuarios", "clientes", "email", email])?;
        match self.execute(Method::GET, url, |r| r).await {
            Ok(response) => Ok(Some(Self::parse(response).await?)),
            Err(e) if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn create_client(&self, request: &RegistrationRequest) -> Result<User> {
        Self::ensure_valid(request.validation_errors())?;
        self.send_json(Method::POST, &["api", "usuarios", "clientes"], request)
            .await
            .context("Failed to create client")
    }

    pub async fn update_client(&self, id: i64, update: &ProfileUpdate) -> Result<User> {
        Self::ensure_valid(update.validation_errors())?;
        let id = id.to_string();
        self.send_json(Method::PUT, &["api", "usuarios", "clientes", &id], update)
            .await
            .with_context(|| format!("Failed to update client {}", id))
    }

    pub async fn delete_client(&self, id: i64) -> Result<()> {
        let id = id.to_string();
        self.delete(&["api", "usuarios", "clientes", &id])
            .await
            .with_context(|| format!("Failed to delete client {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{NavigationTarget, RecordingNavigator};
    use crate::storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Harness {
        storage: Arc<MemoryStorage>,
        navigator: Arc<RecordingNavigator>,
        guard: Arc<SessionGuard>,
        client: ApiClient,
    }

    fn harness(server: &MockServer) -> Harness {
        let storage = Arc::new(MemoryStorage::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let guard = Arc::new(SessionGuard::new(storage.clone(), navigator.clone()));
        let client = ApiClient::new(&server.uri())
            .expect("Failed to build test client")
            .with_interceptor(guard.clone());
        Harness {
            storage,
            navigator,
            guard,
            client,
        }
    }

    fn api_error(err: &anyhow::Error) -> &ApiError {
        err.downcast_ref::<ApiError>().expect("expected an ApiError")
    }

    #[tokio::test]
    async fn test_bearer_header_attached_to_every_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.storage.set(TOKEN_KEY, "abc").unwrap();

        assert!(h.client.list_clients().await.unwrap().is_empty());
        assert!(h.client.list_admins().await.unwrap().is_empty());

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 2);
        for request in &received {
            assert_eq!(
                request.headers.get("authorization").unwrap(),
                "Bearer abc"
            );
        }
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/clientes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.client.list_clients().await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert!(!received[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_unauthorized_response_logs_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/admin"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.storage.set(TOKEN_KEY, "stale").unwrap();
        h.storage.set(USER_KEY, r#"{"tipo":"ADMIN"}"#).unwrap();

        let err = h.client.list_admins().await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::Unauthorized));

        assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(h.storage.get(USER_KEY).unwrap(), None);
        assert!(!h.guard.is_authenticated());
        assert_eq!(h.navigator.last(), Some(NavigationTarget::login_after_logout()));
    }

    #[tokio::test]
    async fn test_forbidden_response_keeps_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "status": 403,
                "error": "Acesso negado",
                "message": "Somente SUPERADMIN"
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.storage.set(TOKEN_KEY, "abc").unwrap();

        let err = h.client.list_admins().await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::AccessDenied(m) if m == "Somente SUPERADMIN"));
        assert!(h.guard.is_authenticated());
        assert!(h.navigator.history().is_empty());
    }

    #[tokio::test]
    async fn test_login_and_store() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "ana@example.com", "senha": "segredo1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "jwt-token",
                "tipo": "Bearer",
                "usuario": {"id": 3, "nome": "Ana", "email": "ana@example.com", "tipo": "ADMIN"}
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        let user = h
            .client
            .login_and_store(&h.guard, "ana@example.com", "segredo1")
            .await
            .unwrap();

        assert_eq!(user.id, Some(3));
        assert_eq!(h.guard.token().as_deref(), Some("jwt-token"));
        assert!(h.guard.has_role("ADMIN"));
        assert_eq!(h.guard.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_register_validation_skips_request() {
        let server = MockServer::start().await;
        let h = harness(&server);

        let request = RegistrationRequest {
            nome: "Al".to_string(),
            email: "not-an-email".to_string(),
            senha: "123".to_string(),
            ..Default::default()
        };
        let err = h.client.register(&request).await.unwrap_err();
        match api_error(&err) {
            ApiError::Validation { details, .. } => assert_eq!(details.len(), 3),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_sends_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/registro"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 10, "nome": "Bruno Lima", "email": "bruno@example.com", "tipo": "CLIENTE"
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        let request = RegistrationRequest {
            nome: "Bruno Lima".to_string(),
            email: "bruno@example.com".to_string(),
            senha: "segredo1".to_string(),
            ..Default::default()
        };
        let user = h.client.register(&request).await.unwrap();
        assert!(user.has_role("CLIENTE"));
        // Registration does not log the new account in
        assert!(!h.guard.is_authenticated());
    }

    #[tokio::test]
    async fn test_find_client_by_email_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/clientes/email/ghost@example.com"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let h = harness(&server);
        let found = h.client.find_client_by_email("ghost@example.com").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_search_clients_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/clientes/busca"))
            .and(query_param("nome", "Ana"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nome": "Ana Souza", "tipo": "CLIENTE"},
                {"id": 2, "nome": "Mariana", "tipo": "CLIENTE"}
            ])))
            .mount(&server)
            .await;

        let h = harness(&server);
        let clients = h.client.search_clients("Ana").await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[1].nome.as_deref(), Some("Mariana"));
    }

    #[tokio::test]
    async fn test_update_profile_and_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/usuarios/5"))
            .and(body_json(json!({"telefone": "11988887777"})))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "status": 500, "error": "Erro interno", "message": "Falha inesperada"
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        let update = ProfileUpdate {
            telefone: Some("11988887777".to_string()),
            ..Default::default()
        };
        let err = h.client.update_profile(5, &update).await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::ServerError(m) if m == "Falha inesperada"));
    }

    // ========================================================================
    // Admin and client management
    // ========================================================================

    fn new_account(nome: &str, email: &str) -> RegistrationRequest {
        RegistrationRequest {
            nome: nome.to_string(),
            email: email.to_string(),
            senha: "segredo1".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_admin() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/usuarios/admin"))
            .and(body_json(json!({
                "nome": "Carla Dias", "email": "carla@example.com", "senha": "segredo1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 21, "nome": "Carla Dias", "email": "carla@example.com", "tipo": "ADMIN"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server);
        let admin = h
            .client
            .create_admin(&new_account("Carla Dias", "carla@example.com"))
            .await
            .unwrap();
        assert_eq!(admin.id, Some(21));
        assert!(admin.is_admin());
    }

    #[tokio::test]
    async fn test_create_client_validation_skips_request() {
        let server = MockServer::start().await;
        let h = harness(&server);

        let err = h
            .client
            .create_client(&new_account("Jo", "jo@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(api_error(&err), ApiError::Validation { details, .. } if details.len() == 1));

        let err = h
            .client
            .create_admin(&new_account("Joana", "joana"))
            .await
            .unwrap_err();
        assert!(matches!(api_error(&err), ApiError::Validation { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_admin_and_client() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/usuarios/admin/21"))
            .and(body_json(json!({"nome": "Carla Ramos"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 21, "nome": "Carla Ramos", "tipo": "ADMIN"
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/usuarios/clientes/8"))
            .and(body_json(json!({"email": "novo@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 8, "email": "novo@example.com", "tipo": "CLIENTE"
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        let rename = ProfileUpdate {
            nome: Some("Carla Ramos".to_string()),
            ..Default::default()
        };
        let admin = h.client.update_admin(21, &rename).await.unwrap();
        assert_eq!(admin.nome.as_deref(), Some("Carla Ramos"));

        let new_email = ProfileUpdate {
            email: Some("novo@example.com".to_string()),
            ..Default::default()
        };
        let client = h.client.update_client(8, &new_email).await.unwrap();
        assert_eq!(client.email.as_deref(), Some("novo@example.com"));

        let bad = ProfileUpdate {
            senha: Some("123".to_string()),
            ..Default::default()
        };
        let err = h.client.update_client(8, &bad).await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::Validation { .. }));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_admin_and_client() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/usuarios/admin/21"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/usuarios/clientes/8"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "status": 404, "message": "Cliente não encontrado"
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        h.client.delete_admin(21).await.unwrap();

        let err = h.client.delete_client(8).await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_clients_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/clientes/paginado"))
            .and(query_param("page", "1"))
            .and(query_param("size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    {"id": 3, "nome": "Ana Souza", "tipo": "CLIENTE"},
                    {"id": 4, "nome": "Bruno Lima", "tipo": "CLIENTE"}
                ],
                "totalElements": 5,
                "totalPages": 3,
                "number": 1,
                "size": 2
            })))
            .mount(&server)
            .await;

        let h = harness(&server);
        let page = h.client.list_clients_page(1, 2).await.unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_elements, 5);
        assert!(page.has_next());
    }

    // ========================================================================
    // Retry and transport errors
    // ========================================================================

    #[derive(Default)]
    struct StatusLog(std::sync::Mutex<Vec<StatusCode>>);

    impl Interceptor for StatusLog {
        fn on_response(&self, status: StatusCode) {
            self.0.lock().unwrap().push(status);
        }
    }

    #[tokio::test]
    async fn test_rate_limited_request_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/clientes"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/usuarios/clientes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "nome": "Ana Souza", "tipo": "CLIENTE"}
            ])))
            .mount(&server)
            .await;

        let log = Arc::new(StatusLog::default());
        let client = ApiClient::new(&server.uri())
            .unwrap()
            .with_initial_backoff(Duration::from_millis(10))
            .with_interceptor(log.clone());

        let clients = client.list_clients().await.unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(
            *log.0.lock().unwrap(),
            vec![StatusCode::TOO_MANY_REQUESTS, StatusCode::OK]
        );
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        // Nothing listens on port 1
        let client = ApiClient::new("http://127.0.0.1:1").unwrap();
        let err = client.list_admins().await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::Network(_)));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("http://localhost:8080/app/").unwrap();
        let url = client.endpoint(&["api", "auth", "login"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/app/api/auth/login");

        let client = ApiClient::new("http://localhost:8080").unwrap();
        let url = client.endpoint(&["api", "usuarios", "clientes", "email", "a b@x.com"]).unwrap();
        assert_eq!(url.path(), "/api/usuarios/clientes/email/a%20b@x.com");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("mailto:someone@example.com").is_err());
    }
}
