//! Recipe Book CLI - Browse and manage recipes from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List categories
//! rb-cli categories
//!
//! # List quick dairy recipes
//! rb-cli list --category 1 --max-duration 30
//!
//! # Show one recipe
//! rb-cli show 12
//!
//! # Add a recipe from a JSON file (logs in first)
//! RECIPE_PASSWORD=... rb-cli add --file soup.json -u dana
//!
//! # Delete one of your recipes
//! rb-cli delete 12 -u dana -p secret
//! ```
//!
//! # Commands
//!
//! - `categories` - List recipe categories
//! - `list` - List recipes, optionally filtered
//! - `show` - Show one recipe in full
//! - `add` / `edit` / `delete` - Modify your own recipes
//! - `register` / `login` - Account management
//!
//! # Environment Variables
//!
//! - `RECIPE_API_BASE_URL` - Root URL of the recipe API
//! - `RECIPE_PASSWORD` - Password used when `--password` is omitted
//! - `RECIPE_LOG_FORMAT` - `json` for structured log output
//! - `RUST_LOG` - Log filter (default: `recipe_book_client=info,rb_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use recipe_book_core::{CategoryId, RecipeFilter, RecipeId, UserId};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

const DEFAULT_LOG_FILTER: &str = "recipe_book_client=info,rb_cli=info";

#[derive(Parser)]
#[command(name = "rb-cli")]
#[command(author, version, about = "Recipe Book CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recipe categories
    Categories,
    /// List recipes
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show a recipe in full
    Show {
        /// Recipe ID
        id: RecipeId,
    },
    /// Create a recipe from a JSON file
    Add {
        /// Recipe JSON in the API's wire format
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Update one of your recipes from a JSON file
    Edit {
        /// Recipe JSON in the API's wire format, including its `Id`
        #[arg(short, long)]
        file: PathBuf,

        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Delete one of your recipes
    Delete {
        /// Recipe ID
        id: RecipeId,

        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Create an account
    Register {
        #[arg(short, long)]
        user_name: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// National ID number
        #[arg(long)]
        tz: String,

        #[arg(short, long, env = "RECIPE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Check credentials
    Login {
        #[command(flatten)]
        auth: AuthArgs,
    },
}

#[derive(Args)]
struct AuthArgs {
    /// Account user name
    #[arg(short, long)]
    user_name: String,

    /// Account password
    #[arg(short, long, env = "RECIPE_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
struct FilterArgs {
    /// Text to find in the name or description
    #[arg(short, long)]
    search: Option<String>,

    /// Category ID
    #[arg(short, long)]
    category: Option<CategoryId>,

    /// Longest acceptable duration in minutes
    #[arg(long)]
    max_duration: Option<u32>,

    /// Difficulty, as the API stores it ("1", "2", "3")
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Only recipes owned by this user ID
    #[arg(long)]
    user: Option<UserId>,
}

impl From<FilterArgs> for RecipeFilter {
    fn from(args: FilterArgs) -> Self {
        Self {
            search: args.search,
            category: args.category,
            max_duration: args.max_duration,
            difficulty: args.difficulty,
            owner: args.user,
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads RECIPE_PASSWORD
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let json = std::env::var("RECIPE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let ctx = commands::Context::connect().await?;

    let result = match cli.command {
        Commands::Categories => {
            commands::recipes::categories(&ctx);
            Ok(())
        }
        Commands::List { filter } => commands::recipes::list(&ctx, &filter.into()).await,
        Commands::Show { id } => commands::recipes::show(&ctx, id).await,
        Commands::Add { file, auth } => {
            commands::auth::sign_in(&ctx, &auth.user_name, auth.password).await?;
            commands::recipes::add(&ctx, &file).await
        }
        Commands::Edit { file, auth } => {
            commands::auth::sign_in(&ctx, &auth.user_name, auth.password).await?;
            commands::recipes::edit(&ctx, &file).await
        }
        Commands::Delete { id, auth } => {
            commands::auth::sign_in(&ctx, &auth.user_name, auth.password).await?;
            commands::recipes::delete(&ctx, id).await
        }
        Commands::Register {
            user_name,
            name,
            email,
            phone,
            tz,
            password,
        } => {
            let form = commands::auth::RegistrationForm {
                user_name,
                name,
                email,
                phone,
                tz,
                password,
            };
            commands::auth::register(&ctx, form).await
        }
        Commands::Login { auth } => {
            commands::auth::sign_in(&ctx, &auth.user_name, auth.password).await?;
            commands::auth::whoami(&ctx);
            Ok(())
        }
    };

    ctx.close();
    result
}
