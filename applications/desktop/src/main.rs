/// High Tide desktop integration host
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tide_core::MediaSessionState;
use tide_desktop::{DesktopConfig, PlatformIntegration, PlayerCommand};
use tide_secrets::{CredentialStore, SessionSnapshot};
use tide_system::{parse_tidal_link, ProtocolRegistrar, StartupRegistrar};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tide-desktop")]
#[command(about = "High Tide platform integration", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change stored login credentials
    Credentials {
        #[command(subcommand)]
        action: CredentialAction,
    },
    /// Launch at login
    Autostart {
        #[command(subcommand)]
        action: Toggle,
    },
    /// tidal:// link handler
    Protocol {
        #[command(subcommand)]
        action: ProtocolAction,
    },
    /// Resolve a TIDAL link
    Open {
        /// tidal:// or https://tidal.com link
        uri: String,
    },
    /// Run the tray icon and media controls until Quit
    Tray,
}

#[derive(Subcommand)]
enum CredentialAction {
    /// Show whether credentials are stored
    Status,
    /// Store a token set
    Save {
        #[arg(long, default_value = "Bearer")]
        token_type: String,
        #[arg(long, env = "TIDE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
        #[arg(long, env = "TIDE_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: String,
        /// Access token expiry, e.g. 2026-01-01T00:00:00Z
        #[arg(long, default_value = "")]
        expiry_time: String,
    },
    /// Forget stored credentials
    Clear,
}

#[derive(Subcommand)]
enum Toggle {
    Status,
    Enable,
    Disable,
}

#[derive(Subcommand)]
enum ProtocolAction {
    Status,
    Register,
    Unregister,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tide_desktop=info,tide_secrets=info,tide_media_controls=info,tide_tray=info,tide_system=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = DesktopConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Credentials { action } => credentials(&config, action),
        Commands::Autostart { action } => autostart(&config, action)?,
        Commands::Protocol { action } => protocol(&config, action)?,
        Commands::Open { uri } => {
            let link = parse_tidal_link(&uri)?;
            println!("{} {}", link.kind.as_str(), link.id);
        }
        Commands::Tray => run_tray(config)?,
    }

    Ok(())
}

fn credentials(config: &DesktopConfig, action: CredentialAction) {
    let session = match &action {
        CredentialAction::Save {
            token_type,
            access_token,
            refresh_token,
            expiry_time,
        } => SessionSnapshot {
            token_type: token_type.clone(),
            access_token: access_token.clone(),
            refresh_token: refresh_token.clone(),
            expiry_time: expiry_time.clone(),
        },
        _ => SessionSnapshot::default(),
    };

    let mut store = CredentialStore::with_key(Arc::new(session), &config.credentials.target);

    match action {
        CredentialAction::Status => {
            println!("Backend: {}", store.backend_kind());
            if store.has_credentials() {
                println!("Logged in");
                match store.expires_at() {
                    Some(expiry) => println!("Access token expires: {}", expiry.to_rfc3339()),
                    None => println!("Access token expiry unknown"),
                }
            } else {
                println!("Not logged in");
            }
        }
        CredentialAction::Save { .. } => {
            if store.save() {
                println!("Credentials saved");
            } else {
                println!("Credentials kept for this session only (backend refused the write)");
            }
        }
        CredentialAction::Clear => {
            store.clear();
            println!("Credentials cleared");
        }
    }
}

fn autostart(config: &DesktopConfig, action: Toggle) -> anyhow::Result<()> {
    let startup = StartupRegistrar::new(config.launch_target()?);

    match action {
        Toggle::Status => println!(
            "Autostart {}",
            if startup.is_enabled() { "enabled" } else { "disabled" }
        ),
        Toggle::Enable => report(startup.set_enabled(true), "Autostart enabled")?,
        Toggle::Disable => report(startup.set_enabled(false), "Autostart disabled")?,
    }
    Ok(())
}

fn protocol(config: &DesktopConfig, action: ProtocolAction) -> anyhow::Result<()> {
    let registrar = ProtocolRegistrar::new(config.launch_target()?);

    match action {
        ProtocolAction::Status => {
            if registrar.is_enabled() {
                println!("{}:// handler registered", registrar.scheme());
            } else {
                println!("{}:// handler not registered", registrar.scheme());
            }
        }
        ProtocolAction::Register => {
            report(registrar.set_enabled(true), "Protocol handler registered")?;
        }
        ProtocolAction::Unregister => {
            report(registrar.set_enabled(false), "Protocol handler unregistered")?;
        }
    }
    Ok(())
}

fn report(ok: bool, message: &str) -> anyhow::Result<()> {
    if ok {
        println!("{message}");
        Ok(())
    } else {
        anyhow::bail!("Operation failed, see log for details")
    }
}

/// Stand-in player: toggles a demo track in response to tray and media keys.
fn run_tray(config: DesktopConfig) -> anyhow::Result<()> {
    let mut integration = PlatformIntegration::new(config, Arc::new(SessionSnapshot::default()))?;
    integration.activate();

    if !integration.tray().is_running() && !integration.media().is_initialized() {
        anyhow::bail!("No tray or media surface available on this platform");
    }

    let mut state = MediaSessionState::playing("High Tide", "Idle").paused();
    integration.on_playback_changed(&state);

    let commands = integration.commands().clone();
    for command in commands.iter() {
        tracing::info!(?command, "Player command");
        match command {
            PlayerCommand::Quit => break,
            PlayerCommand::Play => state.is_playing = true,
            PlayerCommand::Pause | PlayerCommand::Stop => state.is_playing = false,
            PlayerCommand::PlayPause => state.is_playing = !state.is_playing,
            PlayerCommand::Next | PlayerCommand::Previous | PlayerCommand::ShowWindow => continue,
        }
        integration.on_playback_changed(&state);
    }

    integration.shutdown();
    Ok(())
}
