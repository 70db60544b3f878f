//! Initiative - command line host for the encounter engine.

use clap::{Parser, Subcommand};
use initiative_domain::{EncounterId, GroupId};
use initiative_engine::infrastructure::config::EngineConfig;
use initiative_engine::App;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Encounter tracker storage and history engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an encounter under a fresh id and print it.
    New,
    /// Print the full encounter document (provisioned if unknown).
    Show { id: EncounterId },
    /// Print what players may see of an encounter.
    View { id: EncounterId },
    /// Advance to the next round and save.
    Advance { id: EncounterId },
    /// Add a group with one default creature and save.
    AddGroup { id: EncounterId },
    /// Add a default creature to an existing group and save.
    AddCreature { id: EncounterId, group_id: String },
    /// Remove a stored encounter.
    Delete { id: EncounterId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "initiative_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");
    let app = App::from_config(&config).await?;

    match cli.command {
        Command::New => {
            let session = app.create_session().await?;
            println!("{}", serde_json::to_string_pretty(session.encounter())?);
            session.close();
        }
        Command::Show { id } => {
            let session = app.open_session(&id).await?;
            println!("{}", serde_json::to_string_pretty(session.encounter())?);
            session.close();
        }
        Command::View { id } => {
            let session = app.open_session(&id).await?;
            println!("{}", serde_json::to_string_pretty(&session.restricted_view())?);
            session.close();
        }
        Command::Advance { id } => {
            let mut session = app.open_session(&id).await?;
            session.advance_round()?;
            // A CLI process exits before any debounce window would close.
            session.flush().await?;
            println!("{}", serde_json::to_string_pretty(session.encounter())?);
            session.close();
        }
        Command::AddGroup { id } => {
            let mut session = app.open_session(&id).await?;
            session.edit(&app.add_group_edit())?;
            session.flush().await?;
            println!("{}", serde_json::to_string_pretty(session.encounter())?);
            session.close();
        }
        Command::AddCreature { id, group_id } => {
            let mut session = app.open_session(&id).await?;
            session.edit(&app.add_creature_edit(GroupId::new(group_id)?))?;
            session.flush().await?;
            println!("{}", serde_json::to_string_pretty(session.encounter())?);
            session.close();
        }
        Command::Delete { id } => {
            app.delete(&id).await?;
        }
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides, then fall back to the working directory.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}
