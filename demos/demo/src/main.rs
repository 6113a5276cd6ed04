use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy_wschat::chat::ClientProfile;
use bevy_wschat::chat_bevy::ThemeSpec;
use bevy_wschat::{ChatPlugin, ChatPluginConfig, ChatTheme};
use clap::Parser;

/// Windowed chat client
#[derive(Parser, Debug)]
#[command(name = "wschat", version)]
struct Args {
    /// Page origin the chat endpoint is derived from
    #[arg(long, default_value = "http://localhost:8080")]
    origin: String,

    /// Client flavor: full, plain or newest-first
    #[arg(long, default_value = "full")]
    profile: ClientProfile,

    /// JSON profile file, takes precedence over --profile
    #[arg(long)]
    profile_file: Option<PathBuf>,

    /// JSON theme overrides (CSS-like colors)
    #[arg(long)]
    theme_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let profile = match &args.profile_file {
        Some(path) => ClientProfile::from_json_file(path)?,
        None => args.profile.clone(),
    };

    let theme = match &args.theme_file {
        Some(path) => load_theme(path)?,
        None => ChatTheme::default(),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: format!("wschat - {}", args.origin),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ChatPlugin::new(
            ChatPluginConfig::new(args.origin)
                .with_profile(profile)
                .with_theme(theme),
        ))
        .add_systems(Startup, setup)
        .run();

    Ok(())
}

fn load_theme(path: &Path) -> anyhow::Result<ChatTheme> {
    let content = fs::read_to_string(path)?;
    let spec: ThemeSpec = serde_json::from_str(&content)?;
    Ok(ChatTheme::from_spec(&spec))
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
