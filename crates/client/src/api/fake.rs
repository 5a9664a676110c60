//! In-memory recipe API for testing.
//!
//! Behaves like the real server (assigns IDs, rejects duplicate names,
//! checks login credentials) and records every call so tests can assert
//! which requests were made, or that none were.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use recipe_book_core::{
    Category, Credentials, Recipe, RecipeId, Registration, User, UserId, find_duplicate,
};
use secrecy::ExposeSecret;

use super::{ApiError, RecipeApi};

/// Kind of request, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOp {
    ListCategories,
    ListRecipes,
    GetRecipe,
    CreateRecipe,
    UpdateRecipe,
    DeleteRecipe,
    Login,
    Register,
}

/// A recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListCategories,
    ListRecipes,
    GetRecipe(RecipeId),
    CreateRecipe { name: String },
    UpdateRecipe(RecipeId),
    DeleteRecipe(RecipeId),
    Login { user_name: String },
    Register { user_name: String },
}

impl ApiCall {
    #[must_use]
    pub const fn op(&self) -> ApiOp {
        match self {
            Self::ListCategories => ApiOp::ListCategories,
            Self::ListRecipes => ApiOp::ListRecipes,
            Self::GetRecipe(_) => ApiOp::GetRecipe,
            Self::CreateRecipe { .. } => ApiOp::CreateRecipe,
            Self::UpdateRecipe(_) => ApiOp::UpdateRecipe,
            Self::DeleteRecipe(_) => ApiOp::DeleteRecipe,
            Self::Login { .. } => ApiOp::Login,
            Self::Register { .. } => ApiOp::Register,
        }
    }
}

/// How an injected failure presents itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The request never reaches the server.
    Unreachable,
    /// The server answers with this status and body.
    Status(u16, String),
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Self::Unreachable => ApiError::Unreachable("connection refused".to_string()),
            Self::Status(status, message) => ApiError::Api {
                status: *status,
                message: message.clone(),
            },
        }
    }
}

#[derive(Debug, Default)]
struct FakeServer {
    categories: Vec<Category>,
    recipes: Vec<Recipe>,
    accounts: Vec<(User, String)>,
    next_recipe_id: i32,
    next_user_id: i32,
    failing: Vec<(ApiOp, Failure)>,
    calls: Vec<ApiCall>,
}

/// A fake recipe API for testing.
#[derive(Debug, Default)]
pub struct FakeRecipeApi {
    server: Mutex<FakeServer>,
}

impl FakeRecipeApi {
    /// Create an empty fake server.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the server's recipe list.
    #[must_use]
    pub fn with_recipes(self, recipes: Vec<Recipe>) -> Self {
        self.set_recipes(recipes);
        self
    }

    /// Seed the server's category list.
    #[must_use]
    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.lock().categories = categories;
        self
    }

    /// Register an account that can log in with `password`.
    #[must_use]
    pub fn with_account(self, user: User, password: &str) -> Self {
        {
            let mut server = self.lock();
            server.next_user_id = server.next_user_id.max(user.id.as_i32());
            server.accounts.push((user, password.to_string()));
        }
        self
    }

    /// Replace the server-side recipes without going through the API.
    pub fn set_recipes(&self, recipes: Vec<Recipe>) {
        let mut server = self.lock();
        let max_id = recipes.iter().map(|r| r.id.as_i32()).max().unwrap_or(0);
        server.next_recipe_id = server.next_recipe_id.max(max_id);
        server.recipes = recipes;
    }

    /// Server-side recipes as they currently stand.
    #[must_use]
    pub fn server_recipes(&self) -> Vec<Recipe> {
        self.lock().recipes.clone()
    }

    /// Make every request of kind `op` fail until [`Self::recover`] is called.
    pub fn fail(&self, op: ApiOp, failure: Failure) {
        let mut server = self.lock();
        server.failing.retain(|(o, _)| *o != op);
        server.failing.push((op, failure));
    }

    /// Stop failing requests of kind `op`.
    pub fn recover(&self, op: ApiOp) {
        self.lock().failing.retain(|(o, _)| *o != op);
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of requests of kind `op` received so far.
    #[must_use]
    pub fn call_count(&self, op: ApiOp) -> usize {
        self.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    fn lock(&self) -> MutexGuard<'_, FakeServer> {
        self.server.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `call` and return the server, or the injected failure.
    fn receive(&self, call: ApiCall) -> Result<MutexGuard<'_, FakeServer>, ApiError> {
        let mut server = self.lock();
        let op = call.op();
        server.calls.push(call);
        if let Some((_, failure)) = server.failing.iter().find(|(o, _)| *o == op) {
            return Err(failure.to_error());
        }
        Ok(server)
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

fn bad_request(message: &str) -> ApiError {
    ApiError::Api {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl RecipeApi for FakeRecipeApi {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        Ok(self.receive(ApiCall::ListCategories)?.categories.clone())
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        Ok(self.receive(ApiCall::ListRecipes)?.recipes.clone())
    }

    async fn get_recipe(&self, id: RecipeId) -> Result<Recipe, ApiError> {
        let server = self.receive(ApiCall::GetRecipe(id))?;
        server
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found("Recipe"))
    }

    async fn create_recipe(&self, draft: &Recipe) -> Result<Recipe, ApiError> {
        let mut server = self.receive(ApiCall::CreateRecipe {
            name: draft.name.clone(),
        })?;
        if find_duplicate(&server.recipes, &draft.name, None).is_some() {
            return Err(bad_request("Recipe Name already exists"));
        }
        server.next_recipe_id += 1;
        let mut created = draft.clone();
        created.id = RecipeId::new(server.next_recipe_id);
        server.recipes.push(created.clone());
        Ok(created)
    }

    async fn update_recipe(&self, recipe: &Recipe) -> Result<Recipe, ApiError> {
        let mut server = self.receive(ApiCall::UpdateRecipe(recipe.id))?;
        if find_duplicate(&server.recipes, &recipe.name, Some(recipe.id)).is_some() {
            return Err(bad_request("Recipe Name already exists"));
        }
        let slot = server
            .recipes
            .iter_mut()
            .find(|r| r.id == recipe.id)
            .ok_or_else(|| not_found("Recipe"))?;
        *slot = recipe.clone();
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<(), ApiError> {
        let mut server = self.receive(ApiCall::DeleteRecipe(id))?;
        let before = server.recipes.len();
        server.recipes.retain(|r| r.id != id);
        if server.recipes.len() == before {
            return Err(not_found("Recipe"));
        }
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let server = self.receive(ApiCall::Login {
            user_name: credentials.user_name.clone(),
        })?;
        let (user, password) = server
            .accounts
            .iter()
            .find(|(u, _)| u.user_name == credentials.user_name)
            .ok_or_else(|| not_found("User"))?;
        if password != credentials.password.expose_secret() {
            return Err(bad_request("Wrong password"));
        }
        Ok(user.clone())
    }

    async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let mut server = self.receive(ApiCall::Register {
            user_name: registration.user_name.clone(),
        })?;
        let accounts = &server.accounts;
        if accounts.iter().any(|(u, _)| u.user_name == registration.user_name) {
            return Err(bad_request("UserName already exists"));
        }
        if accounts.iter().any(|(u, _)| u.email == registration.email) {
            return Err(bad_request("Email already exists"));
        }
        if accounts.iter().any(|(u, _)| u.tz == registration.tz) {
            return Err(bad_request("Tz already exists"));
        }

        server.next_user_id += 1;
        let user = User {
            id: UserId::new(server.next_user_id),
            user_name: registration.user_name.clone(),
            name: registration.name.clone(),
            email: registration.email.clone(),
            phone: registration.phone.clone(),
            tz: registration.tz.clone(),
        };
        server
            .accounts
            .push((user.clone(), registration.password.expose_secret().to_string()));
        Ok(user)
    }
}
