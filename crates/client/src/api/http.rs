//! `reqwest` implementation of [`RecipeApi`].

use async_trait::async_trait;
use recipe_book_core::{Category, Credentials, Recipe, RecipeId, Registration, User};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, RecipeApi};
use crate::config::ClientConfig;

/// Recipe API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRecipeApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpRecipeApi {
    /// Create a new recipe API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.clone(),
        })
    }

    /// Root URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        read_json(response).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        read_list(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_list("api/category").await
    }

    #[instrument(skip(self))]
    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.get_list("api/recipe").await
    }

    #[instrument(skip(self), fields(recipe_id = %id))]
    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, ApiError> {
        self.get_json(&format!("api/recipe/{id}")).await
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_recipe(&self, draft: &Recipe) -> Result<Recipe, ApiError> {
        self.post_json("api/recipe", draft).await
    }

    #[instrument(skip(self, recipe), fields(recipe_id = %recipe.id))]
    async fn update_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        self.post_json("api/recipe/edit", recipe).await
    }

    #[instrument(skip(self), fields(recipe_id = %id))]
    async fn delete_recipe(&self, id: RecipeId) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint(&format!("api/recipe/delete/{id}"))?)
            .send()
            .await?;
        let status = response.status();

        // Body is an acknowledgement with no contract; only the status matters
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(rejected(status, message));
        }

        Ok(())
    }

    #[instrument(skip(self, credentials), fields(user_name = %credentials.user_name))]
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        self.post_json("api/user/login", credentials).await
    }

    #[instrument(skip(self, registration), fields(user_name = %registration.user_name))]
    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        self.post_json("api/user/sighin", registration).await
    }
}

// =============================================================================
// Response Handling
// =============================================================================

/// Read the body as text first for better error diagnostics.
async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(rejected(status, text));
    }

    Ok(text)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = read_body(response).await?;
    decode(&text)
}

/// Lists tolerate an empty or `null` body, both meaning "no items".
async fn read_list<T: DeserializeOwned>(response: reqwest::Response) -> Result<Vec<T>, ApiError> {
    let text = read_body(response).await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let items: Option<Vec<T>> = decode(&text)?;
    let items = items.unwrap_or_default();
    debug!(count = items.len(), "Decoded list response");
    Ok(items)
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse recipe API response"
        );
        ApiError::Parse(e.to_string())
    })
}

fn rejected(status: reqwest::StatusCode, message: String) -> ApiError {
    tracing::warn!(
        status = %status,
        body = %message.chars().take(500).collect::<String>(),
        "Recipe API returned non-success status"
    );
    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_join_under_base_path() {
        let config = ClientConfig::new("https://recipes.example.com/app").unwrap();
        let api = HttpRecipeApi::new(&config).unwrap();
        assert_eq!(api.base_url().as_str(), "https://recipes.example.com/app/");
        assert_eq!(
            api.endpoint("api/recipe/delete/4").unwrap().as_str(),
            "https://recipes.example.com/app/api/recipe/delete/4"
        );
    }

    #[test]
    fn test_decode_reports_parse_errors() {
        let result: Result<Recipe, _> = decode("{\"Id\": \"x\"");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
