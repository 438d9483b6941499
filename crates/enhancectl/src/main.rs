use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use enhance_core::client::GroqClient;
use enhance_core::enhance::Enhancer;
use enhance_core::error::EnhanceError;
use enhance_core::settings::{key_looks_valid, Settings};
use std::io::{BufRead, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "enhancectl", version, about = "Prompt enhancement client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Prompt text; read from stdin when omitted
    text: Option<String>,

    #[arg(long, default_value = "./enhancer.toml")]
    settings: PathBuf,

    #[arg(long)]
    model: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_requests: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    window_secs: Option<u64>,

    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the stored API key
    Key {
        #[command(subcommand)]
        command: KeyCommands,
    },
}

#[derive(Subcommand, Debug)]
enum KeyCommands {
    /// Validate and store a key in the settings file
    Set { value: String },
    /// Print the stored key, redacted
    Show,
    /// Remove the stored key
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.settings)?;

    if let Some(Commands::Key { command }) = &cli.command {
        return handle_key(command, &mut settings, &cli.settings);
    }

    if let Some(model) = &cli.model {
        settings.model = model.clone();
    }
    if let Some(n) = cli.max_requests {
        settings.max_requests = n;
    }
    if let Some(secs) = cli.window_secs {
        settings.window_secs = secs;
    }
    if let Some(secs) = cli.timeout_secs {
        settings.timeout_secs = secs;
    }
    // a zero quota or window makes the limiter degenerate
    anyhow::ensure!(
        settings.max_requests > 0,
        "max_requests must be positive (settings file: {})",
        cli.settings.display()
    );
    anyhow::ensure!(
        settings.window_secs > 0,
        "window_secs must be positive (settings file: {})",
        cli.settings.display()
    );

    let api_key = match settings.resolve_api_key() {
        Some(key) => key,
        None => match prompt_for_key(&mut settings, &cli.settings)? {
            Some(key) => key,
            None => {
                eprintln!("{}", EnhanceError::MissingCredential.user_message());
                std::process::exit(1);
            }
        },
    };

    let text = match &cli.text {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            buf
        }
    };

    let backend = GroqClient::new(
        &settings.base_url,
        api_key,
        &settings.model,
        Duration::from_secs(settings.timeout_secs),
    )
    .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    let mut enhancer = Enhancer::new(
        Arc::new(backend),
        settings.max_requests,
        Duration::from_secs(settings.window_secs),
    );

    match enhancer.enhance(&text).await {
        Ok(enhanced) => {
            println!("{enhanced}");
            Ok(())
        }
        Err(err) => {
            // full detail stays in the log; the user gets the safe line
            error!(%err, "enhancement failed");
            eprintln!("{}", err.user_message());
            std::process::exit(1);
        }
    }
}

fn handle_key(command: &KeyCommands, settings: &mut Settings, path: &PathBuf) -> Result<()> {
    match command {
        KeyCommands::Set { value } => {
            if !key_looks_valid(value) {
                anyhow::bail!("key does not look like a Groq API key (expected gsk_ prefix)");
            }
            settings.api_key = Some(value.clone());
            settings.save(path)?;
            println!("key stored in {}", path.display());
        }
        KeyCommands::Show => match &settings.api_key {
            Some(key) => println!("{}", redact(key)),
            None => println!("(not set)"),
        },
        KeyCommands::Clear => {
            settings.api_key = None;
            settings.save(path)?;
            println!("key cleared");
        }
    }
    Ok(())
}

/// Interactive recovery for a missing key. Only possible on a terminal;
/// piped invocations get `None` and fail with `MissingCredential`.
fn prompt_for_key(settings: &mut Settings, path: &PathBuf) -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }
    eprint!("Groq API key (gsk_...): ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let key = line.trim().to_string();
    if key.is_empty() {
        return Ok(None);
    }
    if !key_looks_valid(&key) {
        anyhow::bail!("key does not look like a Groq API key (expected gsk_ prefix)");
    }
    settings.api_key = Some(key.clone());
    settings.save(path)?;
    info!(path = %path.display(), "api key stored");
    Ok(Some(key))
}

fn redact(key: &str) -> String {
    if key.chars().count() <= 8 {
        return "****".into();
    }
    let head: String = key.chars().take(8).collect();
    format!("{head}****")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_prefix_only() {
        assert_eq!(redact("gsk_testkey_0123456789ab"), "gsk_test****");
        assert_eq!(redact("short"), "****");
    }

    #[test]
    fn redact_handles_multibyte_keys() {
        // passes key_looks_valid (gsk_ prefix, 20 bytes) but a char
        // straddles byte 8
        let key = "gsk_éééééééé";
        assert!(enhance_core::settings::key_looks_valid(key));
        assert_eq!(redact(key), "gsk_éééé****");
    }
}
