//! Courtyard CLI - Residential association console.
//!
//! # Usage
//!
//! ```bash
//! # Members table, second page, inactive members only
//! cy-cli members list --status Inactive --page 2
//!
//! # A member profile
//! cy-cli members show <member-id> --tab documents
//!
//! # ID-card studio
//! cy-cli id-cards list
//! cy-cli id-cards issue <member-id>
//!
//! # Dashboard
//! cy-cli dashboard
//!
//! # Check operator credentials
//! COURTYARD_OPERATOR_PASSWORD=... cy-cli --operator office@example.com login
//! ```
//!
//! # Commands
//!
//! - `members` - List, show, create and delete members
//! - `id-cards` - Studio grid, pending cards and card issuance
//! - `dashboard` - Counts, revenue, ID-card split and recent members
//! - `login` - Sign in and report the session

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use courtyard_admin::ConsoleConfig;
use courtyard_admin::components::list_engine::{IdCardFilter, SortKey, SortOrder};
use courtyard_admin::services::ProfileTab;
use courtyard_core::{MemberId, MemberStatus, MemberType};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::members::{CreateOptions, ListOptions};
use commands::{CliError, Credentials};

#[derive(Parser)]
#[command(name = "cy-cli")]
#[command(author, version, about = "Courtyard residential association console")]
struct Cli {
    /// Operator email to sign in as (password from `COURTYARD_OPERATOR_PASSWORD`)
    #[arg(long, global = true, env = "COURTYARD_OPERATOR_EMAIL")]
    operator: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage members
    Members {
        #[command(subcommand)]
        action: MembersAction,
    },
    /// ID-card studio
    IdCards {
        #[command(subcommand)]
        action: IdCardsAction,
    },
    /// Show the dashboard
    Dashboard,
    /// Sign in and show the session
    Login,
}

#[derive(clap::Args)]
struct ListArgs {
    /// Case-insensitive search over name, email and member number
    #[arg(short, long)]
    search: Option<String>,

    /// Only members with this status (`Active`, `Inactive`)
    #[arg(long)]
    status: Option<MemberStatus>,

    /// ID-card filter (`all`, `created`, `not_created`)
    #[arg(long, default_value = "all")]
    id_card: IdCardFilter,

    /// Sort column (`name`, `status`, `created_at`, `id_card_created`)
    #[arg(long)]
    sort: Option<SortKey>,

    /// Sort direction (`asc`, `desc`); defaults to the column's own default
    #[arg(long)]
    order: Option<SortOrder>,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Rows per page (10, 25, 50 or 100)
    #[arg(long)]
    page_size: Option<usize>,
}

impl From<ListArgs> for ListOptions {
    fn from(args: ListArgs) -> Self {
        Self {
            search: args.search,
            status: args.status,
            id_card: args.id_card,
            sort: args.sort,
            order: args.order,
            page: args.page,
            page_size: args.page_size,
        }
    }
}

#[derive(Subcommand)]
enum MembersAction {
    /// List one page of the members table
    List(ListArgs),
    /// Show a member profile
    Show {
        id: MemberId,

        /// Profile tab (`overview`, `payments`, `documents`)
        #[arg(short, long, default_value = "overview")]
        tab: ProfileTab,
    },
    /// Create a member
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        phone: Option<String>,

        /// Dialing code, e.g. `+91`
        #[arg(long)]
        country_code: Option<String>,

        #[arg(short, long)]
        unit: String,

        #[arg(short, long)]
        building: String,

        /// `Owner` or `Tenant`
        #[arg(short = 't', long = "type", default_value = "Owner")]
        member_type: MemberType,

        /// `Active` or `Inactive`
        #[arg(long, default_value = "Active")]
        status: MemberStatus,
    },
    /// Delete a member with its vehicles, payments, access logs and documents
    Delete { id: MemberId },
}

#[derive(Subcommand)]
enum IdCardsAction {
    /// Members with an issued card
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Show this member's card
        #[arg(long)]
        select: Option<MemberId>,
    },
    /// Members still waiting for a card
    Pending,
    /// Mark a member's card as issued
    Issue { id: MemberId },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "courtyard_admin=info,courtyard_cli=info".into());

    // JSON for log shipping, plain text for a terminal
    let is_json = std::env::var("COURTYARD_LOG_JSON").is_ok();
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(|| {
        tracing_subscriber::fmt::layer()
            .without_time()
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    // Flags backed by env vars read the .env file too
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Configuration first: Sentry must be up before the subscriber
    let config = ConsoleConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(CliError::from(e)),
    };

    if let Err(e) = result {
        e.report();
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &ConsoleConfig) -> Result<(), CliError> {
    let credentials = cli.operator.as_deref().map(Credentials::from_env).transpose()?;
    let connection = commands::connect(config, credentials.as_ref()).await?;
    let console = &connection.console;

    let result = match cli.command {
        Commands::Members { action } => match action {
            MembersAction::List(args) => commands::members::list(console, &args.into()).await,
            MembersAction::Show { id, tab } => commands::members::show(console, id, tab).await,
            MembersAction::Create {
                name,
                email,
                phone,
                country_code,
                unit,
                building,
                member_type,
                status,
            } => {
                let options = CreateOptions {
                    name,
                    email,
                    phone,
                    country_code,
                    unit,
                    building,
                    member_type,
                    status,
                };
                commands::members::create(console, options).await
            }
            MembersAction::Delete { id } => commands::members::delete(console, id).await,
        },
        Commands::IdCards { action } => match action {
            IdCardsAction::List { list, select } => {
                commands::id_cards::list(console, &list.into(), select).await
            }
            IdCardsAction::Pending => commands::id_cards::pending(console).await,
            IdCardsAction::Issue { id } => commands::id_cards::issue(console, id).await,
        },
        Commands::Dashboard => commands::dashboard::show(console).await,
        Commands::Login => commands::login::show(&connection),
    };

    connection.close().await;
    result
}
