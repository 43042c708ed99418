//! Chatbot CLI
//!
//! Command-line client for the chatbot backend:
//! - Sign in / sign up / sign out
//! - Show profile and billing usage
//! - List, create and chat in threads
//! - Export usage as CSV

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatbot::api::{ApiClient, Endpoints, MessageKind, ReqwestTransport, SignInRequest, SignUpRequest};
use chatbot::auth::{decode_claims, validate_at, Route};
use chatbot::config::{generate_default_config, Config, LoggingConfig};
use chatbot::controllers::billing::{format_total, DateRange, DetailState, DimensionKind};
use chatbot::controllers::profile::{or_not_provided, website_label};
use chatbot::controllers::{AuthState, BillingState, ChatState, Flow, Phase, ProfileState};
use chatbot::export::{file_name, usage_csv};
use chatbot::session::{FileTokenStore, Session};

type Client = ApiClient<ReqwestTransport>;

#[derive(Parser)]
#[command(name = "chatbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the chatbot service")]
#[command(long_about = "Sign in, browse your profile and billing usage, and chat with the assistant.\nThe sign-in token is kept between runs until you sign out or it expires.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./chatbot.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Signin {
        #[arg(short, long)]
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account and organization
    Signup {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
        #[arg(long)]
        legal_company_name: String,
        #[arg(long, default_value = "")]
        company_url: String,
        #[arg(long, default_value = "")]
        company_description: String,
    },

    /// Forget the stored token
    Signout,

    /// Show whether a valid token is held
    Status,

    /// Show the profile of the signed-in user
    Profile,

    /// List chat threads
    Threads,

    /// Create a chat thread
    NewThread {
        /// Thread name (default: "New Chat")
        #[arg(short, long, default_value = "")]
        name: String,
        /// Used as context for the assistant
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Show the messages of a thread
    Show {
        thread_id: String,
    },

    /// Send one message to a thread and print the reply
    Send {
        thread_id: String,
        /// Message text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Chat interactively in a thread
    Chat {
        thread_id: String,
    },

    /// Show usage for the current billing period
    Usage,

    /// Show daily usage of one dimension
    UsageDetail {
        dimension: String,
        /// First day (YYYY-MM-DD, default: period start)
        #[arg(long)]
        start: Option<String>,
        /// Last day, inclusive (YYYY-MM-DD, default: period end)
        #[arg(long)]
        end: Option<String>,
    },

    /// Export usage for the current billing period as CSV
    Export {
        /// Output path, `-` for stdout (default: usage-report-<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    init_logging(&config.logging);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let session = Session::new(FileTokenStore::new(config.token_path()));
    let transport = ReqwestTransport::new(config.api.request_timeout_secs)
        .context("Failed to build HTTP client")?;
    let client = ApiClient::new(transport, Endpoints::new(&config.api.base_url), session);
    tracing::debug!(base_url = %client.endpoints().base(), "client ready");

    let format = cli.format;
    match cli.command {
        Commands::Signin { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let mut auth = AuthState::default();
            let flow = auth
                .submit_sign_in(&client, &SignInRequest { email, password })
                .await;
            settle(&auth.phase, flow)?;
            println!("Signed in.");
        }

        Commands::Signup {
            name,
            email,
            password,
            legal_company_name,
            company_url,
            company_description,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let request = SignUpRequest {
                name,
                email,
                password,
                company_description,
                company_url,
                legal_company_name,
            };
            let mut auth = AuthState::default();
            let flow = auth.submit_sign_up(&client, &request).await;
            settle(&auth.phase, flow)?;
            println!("Account created, signed in.");
        }

        Commands::Signout => {
            client.session().sign_out()?;
            println!("Signed out.");
        }

        Commands::Status => print_status(&client, format)?,

        Commands::Profile => {
            let mut state = ProfileState::default();
            let flow = state.load(&client).await;
            settle(&state.phase, flow)?;

            if let Some(profile) = state.profile {
                if format == OutputFormat::Json {
                    print_json(&profile)?;
                } else {
                    let website = if profile.org_url.is_empty() {
                        or_not_provided("").to_string()
                    } else {
                        website_label(&profile.org_url)
                    };
                    let rows = [
                        ("Name", profile.name.as_str()),
                        ("Email", profile.email.as_str()),
                        ("Organization", or_not_provided(&profile.org_name)),
                        ("Role", or_not_provided(&profile.role_type)),
                        ("Plan", or_not_provided(&profile.plan_name)),
                        ("Website", website.as_str()),
                        ("Description", or_not_provided(&profile.org_description)),
                    ];
                    for (label, value) in rows {
                        println!("{:<14} {}", label, value);
                    }
                }
            }
        }

        Commands::Threads => {
            let mut chat = ChatState::default();
            let flow = chat.load_threads(&client).await;
            settle(&chat.phase, flow)?;

            if format == OutputFormat::Json {
                print_json(&chat.threads)?;
            } else if chat.threads.is_empty() {
                println!("No threads yet. Create one with `chatbot new-thread`.");
            } else {
                println!("{:<38} | {:<30} | {}", "ID", "Name", "Updated");
                println!("{}", "-".repeat(90));
                for thread in &chat.threads {
                    let updated = thread
                        .updated_at
                        .or(thread.created_at)
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!("{:<38} | {:<30} | {}", thread.id, thread.name, updated);
                }
            }
        }

        Commands::NewThread { name, description } => {
            let mut chat = ChatState::default();
            let flow = chat.create_thread(&client, &name, &description).await;
            settle(&chat.phase, flow)?;

            let id = chat.selected.clone().unwrap_or_default();
            if format == OutputFormat::Json {
                print_json(&serde_json::json!({ "threadId": id }))?;
            } else {
                println!("Created thread {}", id);
            }
        }

        Commands::Show { thread_id } => {
            let mut chat = ChatState::default();
            let flow = chat.select_thread(&client, &thread_id).await;
            settle(&chat.phase, flow)?;

            if format == OutputFormat::Json {
                print_json(&chat.messages)?;
            } else {
                println!("# {}", chat.thread_name);
                print_messages(&chat);
            }
        }

        Commands::Send { thread_id, message } => {
            let mut chat = ChatState::default();
            let flow = chat.select_thread(&client, &thread_id).await;
            settle(&chat.phase, flow)?;

            let flow = chat.send(&client, &message.join(" ")).await;
            settle(&chat.phase, flow)?;

            if let Some(reply) = chat.messages.last().filter(|m| m.kind == MessageKind::Response) {
                if format == OutputFormat::Json {
                    print_json(reply)?;
                } else {
                    println!("{}", reply.content);
                }
            }
        }

        Commands::Chat { thread_id } => run_chat(&client, &thread_id).await?,

        Commands::Usage => {
            let mut billing = BillingState::default();
            let flow = billing.load(&client).await;
            settle(&billing.phase, flow)?;

            let summary = billing.summary.unwrap_or_default();
            if format == OutputFormat::Json {
                print_json(&summary)?;
            } else if summary.usage.is_empty() {
                println!("No usage recorded for this period");
            } else {
                if let (Some(start), Some(end)) = (summary.start_time, summary.end_time) {
                    println!(
                        "Billing period: {} - {}",
                        start.format("%b %-d, %Y"),
                        end.format("%b %-d, %Y")
                    );
                    println!();
                }
                println!("{:<40} | {:<10} | {:>14}", "Dimension", "Kind", "Total");
                println!("{}", "-".repeat(70));
                for record in &summary.usage {
                    println!(
                        "{:<40} | {:<10} | {:>14}",
                        record.dimension,
                        DimensionKind::classify(&record.dimension).label(),
                        format_total(record.total)
                    );
                }
            }
        }

        Commands::UsageDetail {
            dimension,
            start,
            end,
        } => {
            let range = match (start, end) {
                (Some(start), Some(end)) => DateRange::parse(&start, &end)?,
                (start, end) => {
                    let mut billing = BillingState::default();
                    let flow = billing.load(&client).await;
                    settle(&billing.phase, flow)?;

                    let period = billing.open_detail(&dimension, Utc::now().date_naive()).range;
                    DateRange::parse(
                        &start.unwrap_or_else(|| period.start_input()),
                        &end.unwrap_or_else(|| period.end_input()),
                    )?
                }
            };

            let mut detail = DetailState::new(&dimension, range);
            let flow = detail.load(&client).await;
            settle(&detail.phase, flow)?;

            if format == OutputFormat::Json {
                print_json(&detail.records)?;
            } else {
                print_detail(&detail);
            }
        }

        Commands::Export { output } => {
            let mut billing = BillingState::default();
            let flow = billing.load(&client).await;
            settle(&billing.phase, flow)?;

            let summary = billing.summary.unwrap_or_default();
            let csv = usage_csv(&summary)?;

            match output {
                Some(path) if path.as_os_str() == "-" => print!("{}", csv),
                output => {
                    let path = output.unwrap_or_else(|| {
                        PathBuf::from(file_name(&summary, Utc::now().date_naive()))
                    });
                    std::fs::write(&path, csv)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Exported {} records to {:?}", summary.usage.len(), path);
                }
            }
        }

        // Written before the client is built
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("chatbot={}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Turn a controller outcome into a CLI error
fn settle(phase: &Phase, flow: Flow) -> anyhow::Result<()> {
    let Some(message) = phase.error() else {
        return Ok(());
    };

    if flow.redirect() == Some(Route::SignIn) {
        bail!("{}\nYou are signed out. Run `chatbot signin` to sign in again.", message);
    }
    bail!("{}", message)
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_status(client: &Client, format: OutputFormat) -> anyhow::Result<()> {
    let token = client.session().token();
    let claims = token.as_deref().map(decode_claims).transpose().ok().flatten();
    let validity = token.as_deref().map(|t| validate_at(t, Utc::now()));

    let signed_in = matches!(validity, Some(Ok(_)));
    let email = claims.as_ref().and_then(|c| c.string_claim("email"));
    let expires_at = claims.as_ref().and_then(|c| c.expires_at());

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "signedIn": signed_in,
            "email": email,
            "expiresAt": expires_at,
            "apiBaseUrl": client.endpoints().base(),
        }));
    }

    println!("Chatbot CLI v{}", env!("CARGO_PKG_VERSION"));
    println!("API: {}", client.endpoints().base());
    println!();
    match validity {
        None => println!("Not signed in"),
        Some(Ok(_)) => {
            println!("Signed in{}", email.map(|e| format!(" as {}", e)).unwrap_or_default());
            if let Some(exp) = expires_at {
                println!("Token expires: {}", exp.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        Some(Err(e)) => println!("Stored token is not usable: {}", e),
    }
    Ok(())
}

fn print_messages(chat: &ChatState) {
    if chat.messages.is_empty() {
        println!("(no messages)");
        return;
    }
    for message in &chat.messages {
        let speaker = match message.kind {
            MessageKind::Query => "You",
            MessageKind::Response => "Assistant",
        };
        println!();
        println!("{} [{}]", speaker, message.created_at.format("%H:%M"));
        println!("{}", message.content);
    }
}

fn print_detail(detail: &DetailState) {
    println!(
        "{} ({}) {} - {}",
        detail.dimension,
        detail.kind().label(),
        detail.range.start_input(),
        detail.range.end_input()
    );
    println!();

    let points = detail.chart_points();
    if points.is_empty() {
        println!("No usage data available for the selected period");
        return;
    }

    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    for point in &points {
        let width = if max > 0.0 {
            ((point.value / max) * 40.0).round() as usize
        } else {
            0
        };
        println!(
            "{:<8} {:>14} {}",
            point.label,
            format_total(point.value),
            "#".repeat(width)
        );
    }
}

async fn run_chat(client: &Client, thread_id: &str) -> anyhow::Result<()> {
    let mut chat = ChatState::default();
    let flow = chat.select_thread(client, thread_id).await;
    settle(&chat.phase, flow)?;

    println!("# {}", chat.thread_name);
    print_messages(&chat);
    println!();
    println!("Type a message and press Enter. /quit to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" => break,
            "" => continue,
            _ => {}
        }

        let before = chat.messages.len();
        let flow = chat.send(client, &line).await;
        if let Err(e) = settle(&chat.phase, flow) {
            eprintln!("{}", e);
            if flow.redirect().is_some() {
                return Err(e);
            }
            continue;
        }

        if let Some(reply) = chat.messages[before..]
            .iter()
            .find(|m| m.kind == MessageKind::Response)
        {
            println!();
            println!("{}", reply.content);
            println!();
        }
    }

    Ok(())
}
