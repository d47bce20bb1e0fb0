use crate::{
    core::{Banner, Credentials, JokeGenerator},
    services::key_probe::OpenAiKeyProbe,
    web::{shutdown_signal, AppState, Server},
    AppConfig, SourceKind,
};
use anyhow::{anyhow, Context};
use clap::{Arg, ArgMatches, Command};
use std::env;
use tracing::{error, info};

fn build_command() -> Command {
    Command::new("joke-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Get a random joke from your chosen category")
        .subcommand_required(true)
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("SOURCE")
                .help("Joke source: local or remote (or set JOKE_SOURCE)")
                .global(true),
        )
        .arg(
            Arg::new("openai-key")
                .short('k')
                .long("openai-key")
                .value_name("KEY")
                .help("OpenAI API key (or set OPENAI_API_KEY env var)")
                .global(true),
        )
        .arg(
            Arg::new("humor-key")
                .long("humor-key")
                .value_name("KEY")
                .help("Humor API key for the remote source (or set HUMOR_API_KEY env var)")
                .global(true),
        )
        .arg(
            Arg::new("humor-base-url")
                .long("humor-base-url")
                .value_name("URL")
                .help("Humor API base URL (or set HUMOR_API_BASE_URL)")
                .global(true),
        )
        .arg(
            Arg::new("openai-base-url")
                .long("openai-base-url")
                .value_name("URL")
                .help("OpenAI base URL used for the key check (or set OPENAI_BASE_URL)")
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Outbound request timeout in seconds (default: HTTP client default)")
                .global(true),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the joke form in the browser")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Address to bind (or set JOKE_AGENT_HOST)"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Port to bind (or set JOKE_AGENT_PORT)"),
                ),
        )
        .subcommand(
            Command::new("joke").about("Print one joke and exit").arg(
                Arg::new("category")
                    .help("Joke category (programming, animal, food, or any for remote)")
                    .required(true)
                    .index(1),
            ),
        )
}

/// Layer CLI flags over the environment-derived configuration
fn resolve_config(matches: &ArgMatches) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_env()?;

    if let Some(source) = matches.get_one::<String>("source") {
        config = config.with_source(source.parse::<SourceKind>()?);
    }
    if let Some(url) = matches.get_one::<String>("humor-base-url") {
        config = config.with_humor_base_url(url.as_str());
    }
    if let Some(url) = matches.get_one::<String>("openai-base-url") {
        config = config.with_openai_base_url(url.as_str());
    }
    if let Some(timeout) = matches.get_one::<String>("timeout") {
        let secs: u64 = timeout.parse().context("Invalid --timeout")?;
        config = config.with_timeout_secs(Some(secs));
    }

    Ok(config)
}

fn resolve_credentials(matches: &ArgMatches) -> Credentials {
    let mut credentials = Credentials::new();
    if let Some(key) = matches
        .get_one::<String>("openai-key")
        .cloned()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
    {
        credentials.set_openai_api_key(key);
    }
    if let Some(key) = matches
        .get_one::<String>("humor-key")
        .cloned()
        .or_else(|| env::var("HUMOR_API_KEY").ok())
    {
        credentials.set_humor_api_key(key);
    }
    credentials
}

/// CLI entry point for the joke-agent tool
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = build_command().get_matches();
    let mut config = resolve_config(&matches)?;
    let credentials = resolve_credentials(&matches);
    // Before the server or any request starts.
    credentials.export_openai_api_key();

    match matches.subcommand() {
        Some(("serve", sub)) => {
            if let Some(host) = sub.get_one::<String>("host") {
                config = config.with_host(host.as_str());
            }
            if let Some(port) = sub.get_one::<String>("port") {
                config = config.with_port(port.parse().context("Invalid --port")?);
            }
            serve(config, credentials).await
        }
        Some(("joke", sub)) => {
            let category = sub
                .get_one::<String>("category")
                .ok_or_else(|| anyhow!("A category is required"))?;
            tell_joke(config, credentials, category).await
        }
        _ => Err(anyhow!("Unknown command")),
    }
}

async fn serve(config: AppConfig, mut credentials: Credentials) -> anyhow::Result<()> {
    let state = AppState::new(config.clone());
    if credentials.openai_api_key().is_some() && state.generator.gate().requires_probe() {
        credentials.verify_openai_key(state.probe.as_ref()).await;
    }

    let state = state.with_credentials(credentials);
    Server::with_state(config, state)
        .run_with_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn tell_joke(
    config: AppConfig,
    mut credentials: Credentials,
    category: &str,
) -> anyhow::Result<()> {
    let generator = JokeGenerator::new(config.clone());
    let gate = generator.gate();

    if gate.requires_probe() && credentials.openai_api_key().is_some() {
        let probe = OpenAiKeyProbe::new(config.openai_base_url.clone());
        credentials.verify_openai_key(&probe).await;
    }

    info!("Generating a {} joke (source: {})", category, config.source);
    let generation = generator.trigger(&credentials, category).await;

    for notice in &generation.notices {
        match notice.banner {
            Banner::Success => println!("\n😂 {}", notice.message),
            Banner::Warning => eprintln!("⚠️  {}", notice.message),
            Banner::Error => eprintln!("❌ {}", notice.message),
        }
    }

    if generation.is_success() {
        Ok(())
    } else {
        error!("No joke generated for '{}'", category);
        Err(anyhow!("joke generation did not succeed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() {
        build_command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let matches = build_command()
            .try_get_matches_from([
                "joke-agent",
                "joke",
                "food",
                "--source",
                "remote",
                "--humor-base-url",
                "http://localhost:9999",
                "--timeout",
                "3",
            ])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.source, SourceKind::Remote);
        assert_eq!(config.humor_base_url, "http://localhost:9999");
        assert_eq!(config.timeout_secs, Some(3));
    }

    #[test]
    fn test_key_flags_populate_credentials() {
        let matches = build_command()
            .try_get_matches_from([
                "joke-agent",
                "--openai-key",
                "sk-flag",
                "--humor-key",
                "humor-flag",
                "joke",
                "animal",
            ])
            .unwrap();
        let credentials = resolve_credentials(&matches);
        assert_eq!(credentials.openai_api_key(), Some("sk-flag"));
        assert_eq!(credentials.humor_api_key(), Some("humor-flag"));
    }
}
