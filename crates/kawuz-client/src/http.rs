//! # HTTP Store API
//!
//! [`StoreApi`] over `reqwest`.
//!
//! ## Session Cookie
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ambient Credential                                 │
//! │                                                                         │
//! │  POST /auth/login ──► 200 + Set-Cookie: auth_token=...; HttpOnly       │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                   reqwest cookie jar (in memory)                        │
//! │                              │                                          │
//! │     every later request ◄────┘  Cookie: auth_token=...                 │
//! │                                                                         │
//! │  POST /auth/logout ──► Set-Cookie: auth_token=; Max-Age=0  (jar drops) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client never reads the token; the jar owns it. No retries.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use kawuz_core::types::{
    Credentials, OrderLine, Product, ProductDraft, ProductId, Registration, ServerMessage,
    Session,
};

use crate::api::StoreApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// REST client bound to one backend.
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    client: Client,
    base: Url,
}

impl HttpStoreApi {
    /// Builds a client with its own cookie jar.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpStoreApi {
            client,
            base: config.base_url()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let response = check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn text(response: Response) -> ClientResult<String> {
        let response = check(response).await?;
        Ok(response.text().await?)
    }
}

/// Passes 2xx through; turns anything else into a [`ClientError`] carrying
/// the server's message.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), body = %body, "Request rejected");
    Err(ClientError::from_status(status.as_u16(), server_message(&body)))
}

/// `{"message": "..."}` bodies yield the message; anything else is used as
/// plain text.
fn server_message(body: &str) -> String {
    match serde_json::from_str::<ServerMessage>(body) {
        Ok(ServerMessage {
            message: Some(message),
        }) => message,
        _ => body.trim().to_string(),
    }
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    async fn me(&self) -> ClientResult<Session> {
        debug!("GET auth/me");
        let response = self.client.get(self.endpoint("auth/me")?).send().await?;
        Self::json(response).await
    }

    async fn login(&self, credentials: &Credentials) -> ClientResult<Session> {
        debug!(username = %credentials.username, "POST auth/login");
        let response = self
            .client
            .post(self.endpoint("auth/login")?)
            .json(credentials)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn logout(&self) -> ClientResult<()> {
        debug!("POST auth/logout");
        let response = self.client.post(self.endpoint("auth/logout")?).send().await?;
        check(response).await?;
        Ok(())
    }

    async fn register(&self, registration: &Registration) -> ClientResult<String> {
        debug!(username = %registration.username, "POST auth/register");
        let response = self
            .client
            .post(self.endpoint("auth/register")?)
            .json(registration)
            .send()
            .await?;
        let body = Self::text(response).await?;
        Ok(server_message(&body))
    }

    async fn list_products(&self) -> ClientResult<Vec<Product>> {
        debug!("GET products");
        let response = self.client.get(self.endpoint("products")?).send().await?;
        Self::json(response).await
    }

    async fn search_products(&self, keyword: &str) -> ClientResult<Vec<Product>> {
        debug!(keyword, "GET product/search");
        let response = self
            .client
            .get(self.endpoint("product/search")?)
            .query(&[("keyword", keyword)])
            .send()
            .await?;
        Self::json(response).await
    }

    async fn top_products(&self) -> ClientResult<Vec<Product>> {
        debug!("GET products/top10");
        let response = self.client.get(self.endpoint("products/top10")?).send().await?;
        Self::json(response).await
    }

    async fn product(&self, id: ProductId) -> ClientResult<Product> {
        debug!(%id, "GET product");
        let response = self
            .client
            .get(self.endpoint(&format!("product/{}", id))?)
            .send()
            .await?;
        Self::json(response).await.map_err(|e| match e {
            ClientError::NotFound(_) => ClientError::NotFound(format!("Product {} not found", id)),
            other => other,
        })
    }

    async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        debug!(name = %draft.name, "POST product");
        let response = self
            .client
            .post(self.endpoint("product")?)
            .json(draft)
            .send()
            .await?;
        Self::json(response).await
    }

    async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ClientResult<String> {
        debug!(%id, "PUT product");
        let response = self
            .client
            .put(self.endpoint(&format!("product/{}", id))?)
            .json(draft)
            .send()
            .await?;
        Self::text(response).await
    }

    async fn delete_product(&self, id: ProductId) -> ClientResult<String> {
        debug!(%id, "DELETE product");
        let response = self
            .client
            .delete(self.endpoint(&format!("product/{}", id))?)
            .send()
            .await?;
        Self::text(response).await
    }

    async fn create_order(&self, lines: &[OrderLine]) -> ClientResult<String> {
        debug!(lines = lines.len(), "POST order/create");
        let response = self
            .client
            .post(self.endpoint("order/create")?)
            .json(lines)
            .send()
            .await?;
        Self::text(response).await
    }

    fn pdf_url(&self, id: ProductId) -> ClientResult<Url> {
        self.endpoint(&format!("product/{}/pdf", id))
    }
}

// =============================================================================
// Tests (in-process axum backend)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    const TOKEN: &str = "auth_token=t0k3n";

    fn has_cookie(headers: &HeaderMap) -> bool {
        headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains(TOKEN))
    }

    fn product_json(id: i64) -> Value {
        json!({
            "id": id,
            "name": format!("Coffee {}", id),
            "price": 10.5,
            "description": "Medium roast",
            "stockQuantity": 4
        })
    }

    async fn login(Json(body): Json<Value>) -> impl IntoResponse {
        if body["username"] == "ola" && body["password"] == "secret" {
            (
                StatusCode::OK,
                [(header::SET_COOKIE, format!("{}; Path=/; HttpOnly", TOKEN))],
                Json(json!({"message": "Zalogowano!", "username": "ola", "isAdmin": true})),
            )
                .into_response()
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"message": "Błąd: Zły login lub hasło"})),
            )
                .into_response()
        }
    }

    async fn logout() -> impl IntoResponse {
        (
            [(header::SET_COOKIE, "auth_token=; Path=/; Max-Age=0")],
            Json(json!({"message": "Wylogowano"})),
        )
    }

    async fn me(headers: HeaderMap) -> impl IntoResponse {
        if has_cookie(&headers) {
            Json(json!({"username": "ola", "isAdmin": true})).into_response()
        } else {
            StatusCode::UNAUTHORIZED.into_response()
        }
    }

    async fn register(Json(body): Json<Value>) -> impl IntoResponse {
        if body["username"] == "ola" {
            (StatusCode::BAD_REQUEST, Json(json!({"message": "Login zajęty!"})))
        } else {
            (StatusCode::OK, Json(json!({"message": "Rejestracja udana!"})))
        }
    }

    async fn products() -> Json<Value> {
        Json(json!([product_json(1), product_json(2)]))
    }

    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        let keyword = params.get("keyword").cloned().unwrap_or_default();
        Json(json!([{"id": 3, "name": keyword, "price": 1}]))
    }

    async fn top10() -> Json<Value> {
        Json(json!([{"id": 1, "name": "Best", "price": 2.5, "sales": 40}]))
    }

    async fn product(Path(id): Path<i64>) -> impl IntoResponse {
        if id == 1 {
            Json(product_json(1)).into_response()
        } else {
            StatusCode::NOT_FOUND.into_response()
        }
    }

    async fn delete_product(Path(id): Path<i64>) -> impl IntoResponse {
        if id == 1 {
            (StatusCode::OK, "Deleted")
        } else {
            (StatusCode::NOT_FOUND, "Product not found")
        }
    }

    async fn order(headers: HeaderMap, Json(lines): Json<Vec<Value>>) -> impl IntoResponse {
        if !has_cookie(&headers) {
            return (StatusCode::UNAUTHORIZED, String::new());
        }
        if lines.iter().any(|l| l["productId"] == 99) {
            return (
                StatusCode::BAD_REQUEST,
                "Nie ma wystarczającej liczby produktu: Kenya".to_string(),
            );
        }
        (StatusCode::OK, "Zamówienie zostało złożone!".to_string())
    }

    async fn spawn_backend() -> HttpStoreApi {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/me", get(me))
            .route("/api/auth/register", post(register))
            .route("/api/products", get(products))
            .route("/api/products/top10", get(top10))
            .route("/api/product/search", get(search))
            .route("/api/product/{id}", get(product).delete(delete_product))
            .route("/api/order/create", post(order));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = ClientConfig::default();
        config.api.base_url = format!("http://{}/api", addr);
        HttpStoreApi::new(&config).unwrap()
    }

    fn creds(password: &str) -> Credentials {
        Credentials {
            username: "ola".to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_me_without_cookie_is_unauthorized() {
        let api = spawn_backend().await;
        let err = api.me().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_cookie_round_trip() {
        let api = spawn_backend().await;

        let session = api.login(&creds("secret")).await.unwrap();
        assert_eq!(session.username, "ola");
        assert!(session.is_admin);

        let me = api.me().await.unwrap();
        assert_eq!(me, session);

        api.logout().await.unwrap();
        assert!(api.me().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_bad_login_keeps_server_message() {
        let api = spawn_backend().await;
        let err = api.login(&creds("wrong")).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Błąd: Zły login lub hasło");
    }

    #[tokio::test]
    async fn test_register_messages() {
        let api = spawn_backend().await;

        let taken = Registration {
            username: "ola".into(),
            password: "x".into(),
            email: "ola@example.com".into(),
        };
        let err = api.register(&taken).await.unwrap_err();
        assert_eq!(err.user_message(), "Login zajęty!");

        let fresh = Registration {
            username: "ewa".into(),
            ..taken
        };
        assert_eq!(api.register(&fresh).await.unwrap(), "Rejestracja udana!");
    }

    #[tokio::test]
    async fn test_product_reads() {
        let api = spawn_backend().await;

        let all = api.list_products().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].price.minor(), 1050);

        let found = api.search_products("kenya aa").await.unwrap();
        assert_eq!(found[0].name, "kenya aa");

        let top = api.top_products().await.unwrap();
        assert_eq!(top[0].sales, Some(40));

        assert_eq!(api.product(ProductId(1)).await.unwrap().stock_quantity, 4);
        assert!(matches!(
            api.product(ProductId(2)).await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_texts() {
        let api = spawn_backend().await;
        assert_eq!(api.delete_product(ProductId(1)).await.unwrap(), "Deleted");
        let err = api.delete_product(ProductId(5)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(ref m) if m == "Product not found"));
    }

    #[tokio::test]
    async fn test_order_sends_cookie_and_reports_stock_errors() {
        let api = spawn_backend().await;
        let lines = [OrderLine {
            product_id: ProductId(1),
            quantity: 1,
        }];

        assert!(api.create_order(&lines).await.unwrap_err().is_unauthorized());

        api.login(&creds("secret")).await.unwrap();
        assert_eq!(
            api.create_order(&lines).await.unwrap(),
            "Zamówienie zostało złożone!"
        );

        let short = [OrderLine {
            product_id: ProductId(99),
            quantity: 1,
        }];
        let err = api.create_order(&short).await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 400, .. }));
        assert_eq!(err.user_message(), "Nie ma wystarczającej liczby produktu: Kenya");
    }

    #[tokio::test]
    async fn test_network_failure() {
        let mut config = ClientConfig::default();
        config.api.base_url = "http://127.0.0.1:9/api".to_string();
        config.api.connect_timeout_secs = 1;
        let api = HttpStoreApi::new(&config).unwrap();
        assert!(api.list_products().await.unwrap_err().is_network());
    }

    #[test]
    fn test_pdf_url() {
        let api = HttpStoreApi::new(&ClientConfig::default()).unwrap();
        assert_eq!(
            api.pdf_url(ProductId(7)).unwrap().as_str(),
            "http://localhost:8080/api/product/7/pdf"
        );
    }

    #[test]
    fn test_server_message() {
        assert_eq!(server_message(r#"{"message":"Wylogowano"}"#), "Wylogowano");
        assert_eq!(server_message(" Deleted "), "Deleted");
        assert_eq!(server_message(""), "");
    }
}
