//! HTTP client for the Makeup Now REST backend.
//!
//! One [`ApiClient`] per process. Every request carries
//! `Authorization: Bearer <token>` as a default header when a token is
//! present; login and register are issued through the same client before a
//! token exists, so the header is simply absent then. All response bodies
//! pass through the tolerant normalizer in [`normalize`] before the typed
//! decode, because the backend sometimes delivers JSON wrapped in strings
//! or concatenated values.

pub mod error;
pub mod normalize;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

pub use error::ClientError;

use crate::models::{
    Booking, BookingRequest, Category, LoginRequest, LoginResponse, MakeupService,
    PasswordUpdate, PaymentStatusUpdate, ProfileUpdate, ProviderPaymentConfirm, RegisterRequest,
    ScheduleRequest, ScheduleSlot, ServiceRequest, User,
};
use normalize::{normalize, Normalized};

/// Typed client for the booking platform's REST API.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Build a client for `base_url`, attaching `token` to every request
    /// when one is given.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let value: HeaderValue = format!("Bearer {token}")
                .parse()
                .map_err(|_| ClientError::InvalidToken)?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Check status, extract the backend's error message on failure, then
    /// run the body through the normalizer and decode it as `T`.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::from_response(status, &text));
        }

        // The transport already parsed nothing: keep the raw text around as
        // a JSON string so the normalizer sees the same shapes the screens
        // used to receive.
        let raw = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        match normalize(raw) {
            Normalized::Data(value) => serde_json::from_value(value).map_err(|err| {
                warn!(error = %err, "response decoded but did not match the expected shape");
                ClientError::MalformedResponse
            }),
            Normalized::Unparseable(_) => Err(ClientError::MalformedResponse),
        }
    }

    /// Check status and discard the body; used for endpoints whose response
    /// content the screens never read.
    async fn expect_ok(response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(ClientError::from_response(status, &text))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn post_no_content<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ClientError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::expect_ok(response).await
    }

    async fn put_no_content(&self, path: &str) -> Result<(), ClientError> {
        let response = self.client.put(self.url(path)).send().await?;
        Self::expect_ok(response).await
    }

    async fn delete_no_content(&self, path: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.url(path)).send().await?;
        Self::expect_ok(response).await
    }

    // -------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.post_json("/users/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        self.post_no_content("/users/register", request).await
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.get_json("/users/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ClientError> {
        self.put_json("/users/update", update).await
    }

    pub async fn update_password(&self, update: &PasswordUpdate) -> Result<(), ClientError> {
        let response = self
            .client
            .put(self.url("/users/update-password"))
            .json(update)
            .send()
            .await?;
        Self::expect_ok(response).await
    }

    pub async fn admin_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_json("/admin/users").await
    }

    // -------------------------------------------------------------------
    // Bookings and payments
    // -------------------------------------------------------------------

    pub async fn customer_bookings(&self, customer_id: i64) -> Result<Vec<Booking>, ClientError> {
        self.get_json(&format!("/bookings/customer/{customer_id}")).await
    }

    pub async fn provider_bookings(&self, provider_id: i64) -> Result<Vec<Booking>, ClientError> {
        self.get_json(&format!("/bookings/provider/{provider_id}")).await
    }

    pub async fn create_booking(&self, request: &BookingRequest) -> Result<Booking, ClientError> {
        self.post_json("/bookings", request).await
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<(), ClientError> {
        self.put_no_content(&format!("/bookings/{booking_id}/cancel")).await
    }

    pub async fn update_payment_status(
        &self,
        update: &PaymentStatusUpdate,
    ) -> Result<(), ClientError> {
        self.post_no_content("/payments/update-status", update).await
    }

    pub async fn confirm_provider_payment(
        &self,
        confirm: &ProviderPaymentConfirm,
    ) -> Result<(), ClientError> {
        self.post_no_content("/payments/confirm/provider", confirm).await
    }

    // -------------------------------------------------------------------
    // Reviews
    // -------------------------------------------------------------------

    pub async fn delete_review(&self, review_id: i64) -> Result<(), ClientError> {
        self.delete_no_content(&format!("/reviews/{review_id}")).await
    }

    // -------------------------------------------------------------------
    // Services, categories, schedules
    // -------------------------------------------------------------------

    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get_json("/categories").await
    }

    pub async fn provider_services(
        &self,
        provider_id: i64,
    ) -> Result<Vec<MakeupService>, ClientError> {
        self.get_json(&format!("/makeup-services/provider/{provider_id}")).await
    }

    pub async fn create_service(
        &self,
        request: &ServiceRequest,
    ) -> Result<MakeupService, ClientError> {
        self.post_json("/makeup-services", request).await
    }

    pub async fn delete_service(&self, service_id: i64) -> Result<(), ClientError> {
        self.delete_no_content(&format!("/makeup-services/{service_id}")).await
    }

    pub async fn provider_schedules(
        &self,
        provider_id: i64,
    ) -> Result<Vec<ScheduleSlot>, ClientError> {
        self.get_json(&format!("/schedules/provider/{provider_id}")).await
    }

    pub async fn create_schedule(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleSlot, ClientError> {
        self.post_json("/schedules", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{filter_by_status, BookingStatus};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve canned responses on a local port. Each route is a (needle,
    /// status, body) triple matched against the request line.
    async fn spawn_stub(routes: Vec<(&'static str, u16, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();
                    let line = request.lines().next().unwrap_or("").to_string();
                    let (status, body) = routes
                        .iter()
                        .find(|(needle, _, _)| line.contains(needle))
                        .map(|(_, status, body)| (*status, body.clone()))
                        .unwrap_or((404, r#"{"message":"not found"}"#.to_string()));
                    let reason = if status < 400 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(base_url, Some("test-token"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn booking_list_tolerates_string_wrapped_payload() {
        tokio_test::block_on(async {
            // The backend returns the array *as a JSON string*, the way the
            // screens used to receive it.
            let inner = serde_json::json!([{"id": 1, "status": "CONFIRMED"}]).to_string();
            let body = serde_json::to_string(&inner).unwrap();
            let base = spawn_stub(vec![("/bookings/customer/1", 200, body)]).await;

            let bookings = client(&base).customer_bookings(1).await.unwrap();
            assert_eq!(bookings.len(), 1);
            assert_eq!(bookings[0].id, 1);

            let confirmed = filter_by_status(&bookings, &BookingStatus::from_filter("Confirmé"));
            assert_eq!(confirmed.len(), 1);

            let cancelled = filter_by_status(&bookings, &BookingStatus::from_filter("Annulé"));
            assert!(cancelled.is_empty());
        });
    }

    #[test]
    fn booking_list_tolerates_concatenated_arrays() {
        tokio_test::block_on(async {
            let body = r#"[{"id":1,"status":"CONFIRMED"}][{"id":2,"status":"CANCELLED"}]"#;
            let base = spawn_stub(vec![("/bookings/provider/3", 200, body.to_string())]).await;

            let bookings = client(&base).provider_bookings(3).await.unwrap();
            assert_eq!(bookings.len(), 1);
            assert_eq!(bookings[0].id, 1);
        });
    }

    #[test]
    fn cancel_rejection_surfaces_the_backend_message() {
        tokio_test::block_on(async {
            let base = spawn_stub(vec![(
                "/bookings/7/cancel",
                409,
                r#"{"message":"already cancelled"}"#.to_string(),
            )])
            .await;

            let err = client(&base).cancel_booking(7).await.unwrap_err();
            assert!(err.to_string().contains("already cancelled"));
        });
    }

    #[test]
    fn cancel_then_refetch_reflects_backend_state() {
        tokio_test::block_on(async {
            let base = spawn_stub(vec![
                ("/bookings/7/cancel", 200, String::new()),
                (
                    "/bookings/customer/1",
                    200,
                    r#"[{"id":8,"status":"CONFIRMED"}]"#.to_string(),
                ),
            ])
            .await;

            let api = client(&base);
            api.cancel_booking(7).await.unwrap();
            let refreshed = api.customer_bookings(1).await.unwrap();
            assert_eq!(refreshed.iter().map(|b| b.id).collect::<Vec<_>>(), vec![8]);
        });
    }

    #[test]
    fn unauthorized_maps_to_a_dedicated_error() {
        tokio_test::block_on(async {
            let base = spawn_stub(vec![("/users/me", 401, String::new())]).await;
            let err = client(&base).current_user().await.unwrap_err();
            assert!(matches!(err, ClientError::Unauthorized));
        });
    }

    #[test]
    fn unreadable_body_is_reported_not_panicked() {
        tokio_test::block_on(async {
            let base = spawn_stub(vec![(
                "/bookings/customer/1",
                200,
                "definitely not json".to_string(),
            )])
            .await;
            let err = client(&base).customer_bookings(1).await.unwrap_err();
            assert!(matches!(err, ClientError::MalformedResponse));
        });
    }

    #[test]
    fn empty_list_decodes_to_an_empty_vec() {
        tokio_test::block_on(async {
            let base = spawn_stub(vec![("/schedules/provider/2", 200, "[]".to_string())]).await;
            let slots = client(&base).provider_schedules(2).await.unwrap();
            assert!(slots.is_empty());
        });
    }
}
