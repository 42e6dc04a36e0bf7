use clap::Parser;
use log::{debug, info};
use playlist_to_channel::{
    Config, DizqueTv, Plex, SyncError, SyncEvent, SyncOutcome, sync_playlist_to_channel,
};
use std::process;

/// Copy all items from a Plex playlist to a dizqueTV channel.
///
/// The channel is refreshed on every run: all existing programs are removed
/// and the playlist's items are added again in order. Connection settings are
/// read from DIZQUETV_URL, PLEX_URL and PLEX_TOKEN.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Name of Plex playlist to convert to a channel
    playlist_name: String,

    /// DizqueTV channel to add playlist to (creates a new channel if omitted)
    #[arg(short = 'c', long = "channel_number", num_args = 0..=1)]
    channel_number: Option<u32>,
}

/// Handles progress events and prints formatted output to stdout
fn handle_sync_event(event: SyncEvent) {
    match event {
        SyncEvent::PlaylistFound { title, item_count } => {
            info!("Playlist '{}' has {} item(s)", title, item_count);
        }
        SyncEvent::CreatingChannel { name, number } => {
            println!("Creating '{}' channel on dizqueTV...", name);
            debug!("New channel number: {}", number);
        }
        SyncEvent::AddingProgram { title } => {
            println!("Adding {}...", title);
        }
        SyncEvent::SkippedItem { title, media_type } => {
            debug!("Skipping '{}': {:?} items cannot be scheduled", title, media_type);
        }
        SyncEvent::ReplacingPrograms {
            number,
            program_count,
        } => {
            info!(
                "Replacing programs of channel #{} with {} program(s)",
                number, program_count
            );
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<SyncOutcome, SyncError> {
    let dizquetv = DizqueTv::new(&config.dizquetv_url);
    let plex = Plex::connect(&config.plex_url, &config.plex_token)?;

    sync_playlist_to_channel(
        &plex,
        &dizquetv,
        &cli.playlist_name,
        cli.channel_number,
        handle_sync_event,
    )
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::from_env();
    debug!(
        "Using dizqueTV at {} and Plex at {}",
        config.dizquetv_url, config.plex_url
    );

    match run(&cli, &config) {
        Ok(SyncOutcome::PlaylistNotFound { name }) => {
            println!("Could not find {} playlist.", name);
        }
        Ok(SyncOutcome::NothingToSync { playlist }) => {
            println!(
                "Nothing in '{}' can be scheduled on dizqueTV, no channel was created.",
                playlist
            );
        }
        Ok(SyncOutcome::Synced {
            channel_number,
            channel_name,
            program_count,
            ..
        }) => {
            println!(
                "Channel #{} '{}' now holds {} program(s).",
                channel_number, channel_name, program_count
            );
        }
        Err(SyncError::ChannelNotFound(number)) => {
            eprintln!("Could not find channel #{}", number);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("\nError during sync: {}", e);
            process::exit(1);
        }
    }
}
