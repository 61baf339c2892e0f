use anyhow::Context;
use city_core::{Agent, Config, ProviderId, database};
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "city", version, about = "Ask about weather, time and travel for eight world cities")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ask a single question, e.g. `city ask "weather in Tokyo"`.
    Ask {
        /// The question; several words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Print the answer as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Ask questions interactively until `exit`.
    Chat,

    /// List the cities the database knows about.
    Cities {
        /// Print the table as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configure credentials for a web fallback provider.
    Configure {
        /// Provider short name, e.g. "gemini" or "brave".
        provider: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Ask { question, json } => {
                let agent = Agent::from_config(&Config::load()?);
                let answer = agent.answer(&question.join(" ")).await;

                if json {
                    println!("{}", serde_json::to_string_pretty(&answer)?);
                } else {
                    println!("{answer}");
                }
            }
            Command::Chat => chat(Agent::from_config(&Config::load()?)).await?,
            Command::Cities { json } => print_cities(json)?,
            Command::Configure { provider } => configure(&provider)?,
        }

        Ok(())
    }
}

async fn chat(agent: Agent) -> anyhow::Result<()> {
    println!("{}", city_core::agent::help_text());
    if !agent.has_fallback() {
        println!("\n(web search is off; run `city configure gemini` to enable it)");
    }
    println!();

    loop {
        let question = match Text::new("You:").prompt() {
            Ok(q) => q,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read question"),
        };

        if matches!(question.trim().to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        println!("\n{}\n", agent.answer(&question).await);
    }

    Ok(())
}

fn print_cities(json: bool) -> anyhow::Result<()> {
    let cities = database::all();

    if json {
        println!("{}", serde_json::to_string_pretty(cities)?);
        return Ok(());
    }

    for c in cities {
        println!("• {}, {} ({}) | {} | {}", c.name, c.country, c.country_code, c.timezone, c.currency);
    }

    Ok(())
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    // Environment overrides stay out of the file.
    let (mut config, path) = Config::load_for_edit()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.trim().to_string());

    let is_default = config.default_provider_id().ok() == Some(id);
    if !is_default {
        let make_default = Confirm::new(&format!("Use {id} as the default fallback?"))
            .with_default(true)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save_to(&path)?;
    println!("Saved {id} credentials to {}", path.display());

    Ok(())
}
