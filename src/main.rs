//! legal-search: ask a legal question-answering backend from the terminal
//!
//! Usage:
//!   legal-search                 - Start an interactive session
//!   legal-search ask <question>  - Ask one question and print the answer
//!   legal-search health          - Probe the backend health endpoint
//!   legal-search serve           - Run the /api/answer proxy
//!   legal-search check           - Diagnose the backend connection

mod app;
mod backend;
mod check;
mod commands;
mod config;
mod proxy;
mod ui;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use app::{Effect, Message, Session};
use backend::{BackendClient, SearchRequest};
use check::CheckBody;
use clap::{Parser, Subcommand};
use commands::Command;
use config::Config;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ui::render;
use ui::theme::DarkTheme;

#[derive(Parser, Debug)]
#[clap(name = "legal-search", version, about = "AI-powered search for US immigration law")]
struct Cli {
    #[clap(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Ask one question and print the answer
    Ask {
        /// The question, e.g. "What documents are needed for naturalization?"
        #[clap(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Let the backend generate the answer with its LLM
        #[clap(long, default_value = "false")]
        llm: bool,

        /// Attempts before giving up (defaults to API_RETRY_ATTEMPTS)
        #[clap(long)]
        retries: Option<u32>,
    },
    /// Start an interactive session (default)
    Session,
    /// Check whether the backend is reachable
    Health,
    /// Serve POST /api/answer and forward it to PYTHON_BACKEND_URL
    Serve {
        /// Bind host (defaults to HOST)
        #[clap(long)]
        host: Option<String>,

        /// Bind port (defaults to PORT)
        #[clap(long)]
        port: Option<u16>,
    },
    /// Send a sample question and print the raw exchange
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(CliCommand::Session);

    init_logging(match command {
        CliCommand::Serve { .. } => "info",
        _ => "warn",
    });

    let mut config = Config::from_env();
    tracing::debug!("Resolved configuration: {:?}", config);

    match command {
        CliCommand::Ask {
            question,
            llm,
            retries,
        } => {
            let mut client = BackendClient::new(&config).context("Failed to create HTTP client")?;
            if let Some(attempts) = retries {
                client = client.with_retry_policy(config.retry.with_max_attempts(attempts));
            }
            ask_once(&client, &question.join(" "), llm).await
        }
        CliCommand::Session => {
            let client = BackendClient::new(&config).context("Failed to create HTTP client")?;
            run_session(&client).await?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Health => {
            let client = BackendClient::new(&config).context("Failed to create HTTP client")?;
            if client.health_check().await {
                println!("Backend at {} is healthy", config.api_url);
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Backend at {} is not reachable", config.api_url);
                Ok(ExitCode::FAILURE)
            }
        }
        CliCommand::Serve { host, port } => {
            if let Some(host) = host {
                config.proxy_host = host;
            }
            if let Some(port) = port {
                config.proxy_port = port;
            }
            proxy::start_server(&config)
                .await
                .map_err(|e| anyhow::anyhow!("Answer proxy failed: {}", e))?;
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Check => connection_check(&config).await,
    }
}

fn init_logging(default_level: &str) {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .try_init();
}

/// Run one search through a fresh session and print the outcome
async fn ask_once(client: &BackendClient, question: &str, use_llm: bool) -> anyhow::Result<ExitCode> {
    let mut session = Session::new();
    session.update(Message::ToggleLlm(use_llm));
    session.update(Message::PromptChanged(question.to_string()));

    let effect = session.update(Message::Submit);
    if effect == Effect::None {
        anyhow::bail!("Question must not be empty");
    }
    perform(client, &mut session, effect).await;

    print!("{}", render::render(&session));
    println!("\n{}", DarkTheme::muted().apply_to(render::DISCLAIMER));

    Ok(if session.error().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Carry out a session effect and feed the outcome back in
async fn perform(client: &BackendClient, session: &mut Session, effect: Effect) {
    if let Effect::Search {
        request_id,
        request,
    } = effect
    {
        let message = match search(client, &request).await {
            Ok(response) => Message::SearchCompleted {
                request_id,
                response,
            },
            Err(error) => Message::SearchFailed { request_id, error },
        };
        session.update(message);
    }
}

async fn search(client: &BackendClient, request: &SearchRequest) -> Result<backend::SearchResponse, String> {
    client.search_with_retry(request).await.map_err(|e| {
        tracing::debug!(status = ?e.status(), "Search failed: {}", e);
        e.to_string()
    })
}

async fn run_session(client: &BackendClient) -> anyhow::Result<()> {
    let mut session = Session::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", DarkTheme::heading().apply_to("Legal Search AI"));
    println!("AI-powered search for US Immigration Law. Type /help for commands.");
    println!("{}\n", DarkTheme::muted().apply_to(render::DISCLAIMER));

    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match Command::parse(&line) {
            Command::Ask { question } if question.is_empty() => continue,
            Command::Ask { question } => {
                session.update(Message::PromptChanged(question));
                submit(client, &mut session).await;
            }
            Command::Example { index } => {
                session.update(Message::ExampleSelected(index));
                println!("{}", DarkTheme::muted().apply_to(session.prompt()));
                submit(client, &mut session).await;
            }
            Command::Examples => print!("{}", render::render_examples()),
            Command::Health => {
                if client.health_check().await {
                    println!("Backend is healthy");
                } else {
                    println!("{}", DarkTheme::error().apply_to("Backend is not reachable"));
                }
            }
            Command::Llm { enabled } => {
                session.update(Message::ToggleLlm(enabled));
                println!("LLM answers {}", if session.use_llm() { "on" } else { "off" });
            }
            Command::Clear => {
                session.update(Message::Clear);
                println!("Cleared");
            }
            Command::Help => println!("{}", Command::help_text()),
            Command::Quit => break,
            Command::Invalid { message } => println!("{}", DarkTheme::error().apply_to(message)),
        }
    }

    Ok(())
}

async fn submit(client: &BackendClient, session: &mut Session) {
    let effect = session.update(Message::Submit);
    print!("{}", render::render(session));
    perform(client, session, effect).await;
    println!("{}", render::render(session));
}

async fn connection_check(config: &Config) -> anyhow::Result<ExitCode> {
    println!("Testing backend connection to: {}", config.api_url);
    println!("First request may take 30-60 seconds if the backend is sleeping...");

    let report = match check::run(config, check::CHECK_TIMEOUT).await {
        Ok(report) => report,
        Err(e) => {
            let headline = if e.is_timeout() {
                "Request timed out"
            } else {
                "Connection failed"
            };
            println!("{}: {}", DarkTheme::error().apply_to(headline), e);
            println!("\nTroubleshooting:");
            for (i, hint) in check::troubleshooting(&e).iter().enumerate() {
                println!("  {}. {}", i + 1, hint);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("POST {}", report.url);
    println!("Status Code: {}", report.status);
    println!("Headers:");
    for (name, value) in &report.headers {
        println!("  {}: {}", name, value);
    }

    match &report.body {
        CheckBody::Json(value) => {
            let pretty = serde_json::to_string_pretty(value).context("Failed to format response")?;
            println!("Response data:\n{}", pretty);
        }
        CheckBody::Raw(text) => {
            println!("{}", DarkTheme::error().apply_to("Failed to parse JSON response"));
            println!("Raw response: {}", text);
            if report.status == 200 {
                println!("Backend responded but with non-JSON content");
            }
        }
    }

    if let Some(preview) = report.answer_preview() {
        println!("\nBackend is working correctly!");
        println!("Answer preview: {}...", preview);
    }

    Ok(if report.is_healthy() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
