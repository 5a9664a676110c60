//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! rb-cli register -u dana -n "Dana" -e dana@example.com --phone 0501234567 --tz 123456789 -p s3cret!
//! rb-cli login -u dana -p s3cret!
//! ```

use recipe_book_core::{PasswordStrength, Registration, User};
use secrecy::SecretString;
use tracing::{info, warn};

use super::{CliError, Context};

/// Registration details as given on the command line.
pub struct RegistrationForm {
    pub user_name: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub tz: String,
    pub password: String,
}

/// Log in, keeping the user in the session for the rest of the command.
pub async fn sign_in(ctx: &Context, user_name: &str, password: String) -> Result<User, CliError> {
    let user = ctx
        .session
        .login(user_name, SecretString::from(password))
        .await?;
    info!(user_id = %user.id, "Signed in as {}", user.name);
    Ok(user)
}

/// Create an account and sign in as it.
pub async fn register(ctx: &Context, form: RegistrationForm) -> Result<(), CliError> {
    let strength = PasswordStrength::of(&form.password);
    if strength < PasswordStrength::Medium {
        warn!(%strength, "Weak password");
    }

    let registration = Registration {
        user_name: form.user_name,
        name: form.name,
        password: SecretString::from(form.password),
        phone: form.phone,
        email: form.email,
        tz: form.tz,
    };

    let user = ctx.session.register(&registration).await?;
    info!(user_id = %user.id, "Registered {}", user.user_name);
    whoami(ctx);
    Ok(())
}

/// Print the signed-in user.
#[allow(clippy::print_stdout)]
pub fn whoami(ctx: &Context) {
    let user = ctx.session.current_user();
    if user.is_guest() {
        println!("Not signed in");
        return;
    }
    println!("{} ({})", user.name, user.user_name);
    println!("  ID:    {}", user.id);
    println!("  Email: {}", user.email);
    println!("  Phone: {}", user.phone);
}
