use crate::domain::{ApiEndpoints, ApiRequest};
use crate::frameworks::config;
use crate::interface_adapters::clients::ReqwestTransport;
use crate::interface_adapters::notifier::ConsoleNotifier;
use crate::interface_adapters::storage::FileSessionStore;
use crate::use_cases::Gateway;
use clap::{Parser, Subcommand};
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "Authenticated client for the Un Fruto para Cristo API")]
#[command(version)]
struct Cli {
    /// API base URL (defaults to $API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Session file (defaults to $SESSION_FILE or ~/.fruto/session.json)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the role of the stored session
    Whoami,
    /// Call a protected endpoint, renewing the session when needed
    Request {
        /// HTTP method
        method: String,
        /// Path under the API base, or an absolute URL
        path: String,
        /// JSON body
        #[arg(short, long)]
        data: Option<String>,
        /// Extra header as "Name: value"; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() -> ExitCode {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    let api_url = cli.api_url.unwrap_or_else(config::api_url);
    let endpoints = match ApiEndpoints::new(&api_url) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::error!(%api_url, error = %e, "invalid API base url");
            eprintln!("invalid API url {api_url}: {e}");
            return ExitCode::from(2);
        }
    };

    let transport = match ReqwestTransport::new(config::request_timeout()) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!(error = %e, "failed to build http client");
            return ExitCode::FAILURE;
        }
    };

    let session_file = cli.session_file.unwrap_or_else(config::session_file);
    tracing::debug!(base = endpoints.base(), session_file = %session_file.display(), "gateway configured.");

    let gateway = Gateway::new(
        endpoints,
        Arc::new(transport),
        Arc::new(FileSessionStore::new(session_file)),
        Arc::new(ConsoleNotifier),
    )
    .await;

    match cli.command {
        Command::Login { username, password } => login(&gateway, &username, &password).await,
        Command::Logout => logout(&gateway).await,
        Command::Whoami => whoami(&gateway).await,
        Command::Request {
            method,
            path,
            data,
            headers,
        } => request(&gateway, &method, &path, data, &headers).await,
    }
}

async fn login(gateway: &Gateway, username: &str, password: &str) -> ExitCode {
    match gateway.login(username, password).await {
        Ok(session) => {
            println!(
                "Logged in as {} (start at {})",
                session.role,
                session.role.landing_route()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn logout(gateway: &Gateway) -> ExitCode {
    if gateway.logout().await.revoked {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    ExitCode::SUCCESS
}

async fn whoami(gateway: &Gateway) -> ExitCode {
    match gateway.session().await {
        Some(session) => {
            println!("role: {}", session.role);
            println!("home: {}", session.role.landing_route());
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("Not logged in.");
            ExitCode::FAILURE
        }
    }
}

async fn request(
    gateway: &Gateway,
    method: &str,
    path: &str,
    data: Option<String>,
    headers: &[String],
) -> ExitCode {
    let request = match build_request(gateway, method, path, data, headers) {
        Ok(request) => request,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    match gateway.fetch(request).await {
        Ok(response) => {
            eprintln!("{}", response.status);
            println!("{}", response.text());
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn build_request(
    gateway: &Gateway,
    method: &str,
    path: &str,
    data: Option<String>,
    headers: &[String],
) -> Result<ApiRequest, String> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid method: {method}"))?;
    let mut request = ApiRequest::new(method, gateway.endpoints().resource(path));

    for raw in headers {
        let (name, value) = parse_header(raw)?;
        request = request.with_header(name, value);
    }

    if let Some(data) = data {
        serde_json::from_str::<serde_json::Value>(&data)
            .map_err(|e| format!("--data is not valid JSON: {e}"))?;
        if !request.headers.contains_key(CONTENT_TYPE) {
            request = request.with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        request = request.with_body(data);
    }

    Ok(request)
}

fn parse_header(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("header must look like \"Name: value\": {raw}"))?;
    let name = HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| format!("invalid header name in {raw}: {e}"))?;
    let value = HeaderValue::from_str(value.trim())
        .map_err(|e| format!("invalid header value in {raw}: {e}"))?;
    Ok((name, value))
}
