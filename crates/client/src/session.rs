//! The signed-in user.
//!
//! The server has no tokens; logging in simply returns the user record, which
//! the session keeps until logout. The guest user (ID 0) stands in otherwise.

use std::sync::Arc;

use recipe_book_core::{
    Credentials, Registration, RegistrationField, User, UserId,
    validation::validate_registration,
};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, RecipeApi};
use crate::error::SessionError;

/// Current user, shared with subscribers through a watch channel.
#[derive(Debug)]
pub struct Session {
    api: Arc<dyn RecipeApi>,
    user: watch::Sender<User>,
}

impl Session {
    /// A session holding the guest user.
    #[must_use]
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self {
            api,
            user: watch::Sender::new(User::guest()),
        }
    }

    /// Log in and keep the returned user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::MissingCredentials` for an empty user name or
    /// password, `InvalidCredentials` for a wrong password, `UserNotFound`
    /// for an unknown user, or `Api` for any other failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, user_name: &str, password: SecretString) -> Result<User, SessionError> {
        let user_name = user_name.trim();
        if user_name.is_empty() || password.expose_secret().is_empty() {
            return Err(SessionError::MissingCredentials);
        }

        let credentials = Credentials::new(user_name, password);
        let user = self.api.login(&credentials).await.map_err(login_error)?;

        info!(user_id = %user.id, "Logged in");
        self.user.send_replace(user.clone());
        Ok(user)
    }

    /// Register a new account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Validation` before any request if the form is
    /// invalid, `Conflict` if the server reports a taken field, or `Api` for
    /// any other failure.
    #[instrument(skip(self, registration), fields(user_name = %registration.user_name))]
    pub async fn register(&self, registration: &Registration) -> Result<User, SessionError> {
        validate_registration(registration).map_err(SessionError::Validation)?;

        let user = self
            .api
            .register(registration)
            .await
            .map_err(registration_error)?;

        info!(user_id = %user.id, "Registered");
        self.user.send_replace(user.clone());
        Ok(user)
    }

    /// Return to the guest user.
    pub fn logout(&self) {
        let previous = self.user.send_replace(User::guest());
        if !previous.is_guest() {
            info!(user_id = %previous.id, "Logged out");
        }
    }

    #[must_use]
    pub fn current_user(&self) -> User {
        self.user.borrow().clone()
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user.borrow().id
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.user.borrow().is_guest()
    }

    /// Receiver notified on login and logout.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<User> {
        self.user.subscribe()
    }
}

fn login_error(error: ApiError) -> SessionError {
    match error.status() {
        Some(400) => SessionError::InvalidCredentials,
        Some(404) => SessionError::UserNotFound,
        _ => SessionError::Api(error),
    }
}

fn registration_error(error: ApiError) -> SessionError {
    if error.status() == Some(400)
        && let Some(field) = error.body().and_then(RegistrationField::from_error_body)
    {
        warn!(%field, "Registration conflict");
        return SessionError::Conflict(field);
    }
    SessionError::Api(error)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use recipe_book_core::RegistrationViolation;

    use super::*;
    use crate::api::{ApiCall, ApiOp, FakeRecipeApi, Failure};

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_owned())
    }

    fn dana() -> User {
        User {
            id: UserId::new(7),
            user_name: "dana".to_string(),
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            phone: "0501234567".to_string(),
            tz: "123456789".to_string(),
        }
    }

    fn registration(user_name: &str, email: &str, tz: &str) -> Registration {
        Registration {
            user_name: user_name.to_string(),
            name: "Noa".to_string(),
            password: secret("s3cret!"),
            phone: "0527654321".to_string(),
            email: email.to_string(),
            tz: tz.to_string(),
        }
    }

    fn session(api: &Arc<FakeRecipeApi>) -> Session {
        Session::new(api.clone())
    }

    #[tokio::test]
    async fn test_starts_as_guest() {
        let session = session(&Arc::new(FakeRecipeApi::new()));
        assert!(!session.is_authenticated());
        assert_eq!(session.user_id(), UserId::GUEST);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let api = Arc::new(FakeRecipeApi::new().with_account(dana(), "pa55word"));
        let session = session(&api);
        let mut rx = session.subscribe();

        let user = session.login(" dana ", secret("pa55word")).await.unwrap();
        assert_eq!(user, dana());
        assert_eq!(
            api.calls(),
            vec![ApiCall::Login {
                user_name: "dana".to_string()
            }]
        );
        assert!(session.is_authenticated());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().id, UserId::new(7));

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.current_user().is_guest());
    }

    #[tokio::test]
    async fn test_login_errors() {
        let api = Arc::new(FakeRecipeApi::new().with_account(dana(), "pa55word"));
        let session = session(&api);

        assert!(matches!(
            session.login("dana", secret("nope")).await,
            Err(SessionError::InvalidCredentials)
        ));
        assert!(matches!(
            session.login("ghost", secret("pa55word")).await,
            Err(SessionError::UserNotFound)
        ));

        api.fail(ApiOp::Login, Failure::Status(500, "oops".into()));
        assert!(matches!(
            session.login("dana", secret("pa55word")).await,
            Err(SessionError::Api(_))
        ));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let api = Arc::new(FakeRecipeApi::new());
        let session = session(&api);
        assert!(matches!(
            session.login("  ", secret("x")).await,
            Err(SessionError::MissingCredentials)
        ));
        assert!(matches!(
            session.login("dana", secret("")).await,
            Err(SessionError::MissingCredentials)
        ));
        assert_eq!(api.call_count(ApiOp::Login), 0);
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let api = Arc::new(FakeRecipeApi::new().with_account(dana(), "pa55word"));
        let session = session(&api);

        let user = session
            .register(&registration("noa", "noa@example.com", "987654321"))
            .await
            .unwrap();
        assert_eq!(user.id, UserId::new(8));
        assert_eq!(session.current_user().user_name, "noa");
        assert_eq!(
            api.calls(),
            vec![ApiCall::Register {
                user_name: "noa".to_string()
            }]
        );

        // The new account can log in afterwards
        session.logout();
        session.login("noa", secret("s3cret!")).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_conflicts_name_the_field() {
        let api = Arc::new(FakeRecipeApi::new().with_account(dana(), "pa55word"));
        let session = session(&api);

        let cases = [
            (registration("dana", "x@example.com", "111111111"), RegistrationField::UserName),
            (registration("x", "dana@example.com", "111111111"), RegistrationField::Email),
            (registration("x", "x@example.com", "123456789"), RegistrationField::NationalId),
        ];
        for (form, field) in cases {
            let err = session.register(&form).await.unwrap_err();
            assert!(matches!(err, SessionError::Conflict(f) if f == field), "{err}");
        }
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_validates_before_sending() {
        let api = Arc::new(FakeRecipeApi::new());
        let session = session(&api);

        let mut form = registration("noa", "not-an-email", "123");
        form.password = secret("abc");
        let err = session.register(&form).await.unwrap_err();

        let SessionError::Validation(violations) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert!(violations.contains(&RegistrationViolation::PasswordTooShort));
        assert!(violations.contains(&RegistrationViolation::InvalidNationalId));
        assert_eq!(api.call_count(ApiOp::Register), 0);
    }

    #[tokio::test]
    async fn test_register_other_400_stays_api_error() {
        let api = Arc::new(FakeRecipeApi::new());
        api.fail(ApiOp::Register, Failure::Status(400, "Bad request".into()));
        let session = session(&api);

        let err = session
            .register(&registration("noa", "noa@example.com", "987654321"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Api(_)));
    }
}
