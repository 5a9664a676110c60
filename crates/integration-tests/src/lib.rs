//! Integration tests for Recipe Book.
//!
//! # Running Tests
//!
//! ```bash
//! # Stub-server tests (no external services)
//! cargo test -p recipe-book-integration-tests
//!
//! # Live API tests
//! RECIPE_API_BASE_URL=http://localhost:8080 cargo test -p recipe-book-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `http_api` - The reqwest client, store, and session against a local stub
//! - `live_api` - Read-only checks against a running recipe API
//!
//! The stub serves the recipe API's routes over real HTTP, backed by a
//! [`FakeRecipeApi`] so tests can seed data, inject failures, and count
//! requests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use recipe_book_client::{
    ApiError, ClientConfig, ConfigError, FakeRecipeApi, HttpRecipeApi, RecipeApi,
};
use recipe_book_core::{
    CategoryId, Credentials, Ingredient, Instruction, Recipe, RecipeId, Registration, UserId,
};
use secrecy::SecretString;
use serde::Deserialize;
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A recipe API served on a random local port.
pub struct StubServer {
    pub api: Arc<FakeRecipeApi>,
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Serve `api` until the returned server is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(api: FakeRecipeApi) -> std::io::Result<Self> {
        let api = Arc::new(api);
        let (addr, task) = serve(router(Arc::clone(&api))).await?;
        Ok(Self { api, addr, task })
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the address does not form a valid URL.
    pub fn config(&self) -> Result<ClientConfig, ConfigError> {
        ClientConfig::new(&self.base_url())
    }

    /// HTTP client pointing at this server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the client cannot be built.
    pub fn client(&self) -> Result<HttpRecipeApi, ApiError> {
        let config = self
            .config()
            .map_err(|e| ApiError::Unreachable(e.to_string()))?;
        HttpRecipeApi::new(&config)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Serve `router` on a random local port.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn serve(router: Router) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, task))
}

/// A local address nothing listens on.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn closed_address() -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    listener.local_addr()
}

/// Routes of the recipe API, answered by `api`.
pub fn router(api: Arc<FakeRecipeApi>) -> Router {
    Router::new()
        .route("/api/category", get(list_categories))
        .route("/api/recipe", get(list_recipes).post(create_recipe))
        .route("/api/recipe/{id}", get(get_recipe))
        .route("/api/recipe/edit", post(update_recipe))
        .route("/api/recipe/delete/{id}", post(delete_recipe))
        .route("/api/user/login", post(login))
        .route("/api/user/sighin", post(register))
        .with_state(api)
}

// =============================================================================
// Fixtures
// =============================================================================

/// A complete recipe owned by `owner`.
#[must_use]
pub fn recipe(id: i32, name: &str, owner: i32) -> Recipe {
    let mut r = Recipe::draft(name, UserId::new(owner), CategoryId::new(1));
    r.id = RecipeId::new(id);
    r.duration = 20;
    r.ingredients = vec![Ingredient::new("Water", 2.0, "cups")];
    r.instructions = vec![Instruction::new("Boil")];
    r
}

/// Soup (ID 1, owner 5) and Cake (ID 2, owner 7).
#[must_use]
pub fn soup_and_cake() -> Vec<Recipe> {
    vec![recipe(1, "Soup", 5), recipe(2, "Cake", 7)]
}

// =============================================================================
// Handlers
// =============================================================================

type Api = State<Arc<FakeRecipeApi>>;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginBody {
    user_name: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RegisterBody {
    user_name: String,
    name: String,
    password: String,
    phone: String,
    email: String,
    tz: String,
}

fn reply<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(ApiError::Api { status, message }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message,
        )
            .into_response(),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response(),
    }
}

async fn list_categories(State(api): Api) -> Response {
    reply(api.list_categories().await)
}

async fn list_recipes(State(api): Api) -> Response {
    reply(api.list_recipes().await)
}

async fn get_recipe(State(api): Api, Path(id): Path<RecipeId>) -> Response {
    reply(api.get_recipe(id).await)
}

async fn create_recipe(State(api): Api, Json(draft): Json<Recipe>) -> Response {
    reply(api.create_recipe(&draft).await)
}

async fn update_recipe(State(api): Api, Json(recipe): Json<Recipe>) -> Response {
    reply(api.update_recipe(&recipe).await)
}

async fn delete_recipe(State(api): Api, Path(id): Path<RecipeId>) -> Response {
    reply(api.delete_recipe(id).await.map(|()| true))
}

async fn login(State(api): Api, Json(body): Json<LoginBody>) -> Response {
    let credentials = Credentials::new(body.user_name, SecretString::from(body.password));
    reply(api.login(&credentials).await)
}

async fn register(State(api): Api, Json(body): Json<RegisterBody>) -> Response {
    let registration = Registration {
        user_name: body.user_name,
        name: body.name,
        password: SecretString::from(body.password),
        phone: body.phone,
        email: body.email,
        tz: body.tz,
    };
    reply(api.register(&registration).await)
}
