//! playlist_to_channel - Mirror a Plex playlist into a dizqueTV channel
//!
//! This library provides small blocking clients for Plex and dizqueTV and the
//! sync flow that copies every schedulable item of a Plex playlist onto a
//! dizqueTV channel, replacing whatever the channel played before.

mod config;
mod dizquetv;
mod plex;
mod sync;

#[cfg(test)]
mod test_support;

pub use config::{Config, DIZQUETV_URL_VAR, PLEX_TOKEN_VAR, PLEX_URL_VAR};
pub use dizquetv::{
    Channel, ChannelService, DizqueTv, DizqueTvError, Program, program_from_plex_item,
};
pub use plex::{
    Media, MediaPart, MediaServer, MediaType, Playlist, PlaylistItem, Plex, PlexError,
    PlexServer, ServerInfo,
};
pub use sync::{ChannelTarget, ProgramBatch, next_channel_number, replace_programs};

use log::debug;
use thiserror::Error;

/// Progress event emitted during a sync
///
/// These events allow library users to report progress as they see fit.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The playlist was found and its items fetched
    PlaylistFound { title: String, item_count: usize },

    /// A new channel is about to be created
    CreatingChannel { name: String, number: u32 },

    /// A converted program was added to the upload list
    AddingProgram { title: String },

    /// An item could not be converted and was left out
    SkippedItem { title: String, media_type: MediaType },

    /// The channel's programs are about to be replaced
    ReplacingPrograms { number: u32, program_count: usize },
}

/// How a sync run ended when no error occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No playlist carries the requested title; nothing was touched
    PlaylistNotFound { name: String },

    /// No item converted and there was no channel to clear; nothing was
    /// created or touched
    NothingToSync { playlist: String },

    /// The channel now holds exactly the converted playlist items
    Synced {
        channel_number: u32,
        channel_name: String,
        program_count: usize,
        created: bool,
    },
}

/// Top-level error type for sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    /// The requested channel number does not exist
    #[error("Could not find channel #{0}")]
    ChannelNotFound(u32),

    /// Error while talking to Plex
    #[error("Plex error: {0}")]
    Plex(#[from] PlexError),

    /// Error while talking to dizqueTV
    #[error("dizqueTV error: {0}")]
    DizqueTv(#[from] DizqueTvError),
}

/// Replaces the programs of a dizqueTV channel with the items of a Plex playlist
///
/// The playlist is looked up by exact title. With `channel_number`, that
/// channel must exist; without it, a channel named after the playlist is
/// created under the next free number as soon as the first item converts.
/// Items that cannot be converted are skipped. Once every item has been
/// processed the channel is cleared and repopulated in playlist order.
///
/// Progress events are emitted through the provided callback.
///
/// # Arguments
///
/// * `media` - The media server to read the playlist from
/// * `channels` - The channel service to write to
/// * `playlist_name` - Exact title of the playlist
/// * `channel_number` - Existing channel to replace, or `None` to create one
/// * `progress_callback` - Closure called with progress events
///
/// # Examples
///
/// ```no_run
/// use playlist_to_channel::{sync_playlist_to_channel, Config, DizqueTv, Plex};
///
/// let config = Config::from_env();
/// let plex = Plex::connect(&config.plex_url, &config.plex_token).unwrap();
/// let dizquetv = DizqueTv::new(&config.dizquetv_url);
///
/// let outcome = sync_playlist_to_channel(&plex, &dizquetv, "Cartoons", None, |event| {
///     println!("{:?}", event);
/// })
/// .unwrap();
/// ```
pub fn sync_playlist_to_channel<M, C, F>(
    media: &M,
    channels: &C,
    playlist_name: &str,
    channel_number: Option<u32>,
    mut progress_callback: F,
) -> Result<SyncOutcome, SyncError>
where
    M: MediaServer + ?Sized,
    C: ChannelService + ?Sized,
    F: FnMut(SyncEvent),
{
    let Some(playlist) = media.get_playlist(playlist_name)? else {
        return Ok(SyncOutcome::PlaylistNotFound {
            name: playlist_name.to_string(),
        });
    };

    let target = sync::resolve_channel(channels, channel_number)?.ok_or_else(|| {
        // Only a supplied number can fail to resolve
        SyncError::ChannelNotFound(channel_number.unwrap_or_default())
    })?;
    debug!("Resolved target channel: {}", channel_label(&target));

    let items = media.playlist_items(&playlist)?;
    progress_callback(SyncEvent::PlaylistFound {
        title: playlist.title.clone(),
        item_count: items.len(),
    });

    let mut batch = ProgramBatch::new(target, &playlist.title);
    for item in &items {
        match channels.convert_plex_item_to_program(item, media.server_info()) {
            Some(program) => batch.push(program, channels, &mut progress_callback)?,
            None => progress_callback(SyncEvent::SkippedItem {
                title: item.title.clone(),
                media_type: item.media_type,
            }),
        }
    }

    let created = batch.created();
    let Some((channel, programs)) = batch.finish() else {
        return Ok(SyncOutcome::NothingToSync {
            playlist: playlist.title,
        });
    };

    progress_callback(SyncEvent::ReplacingPrograms {
        number: channel.number,
        program_count: programs.len(),
    });
    replace_programs(channels, &channel, &programs)?;

    Ok(SyncOutcome::Synced {
        channel_number: channel.number,
        channel_name: channel.name,
        program_count: programs.len(),
        created,
    })
}

fn channel_label(target: &ChannelTarget) -> String {
    match target {
        ChannelTarget::Existing(channel) => format!("#{} '{}'", channel.number, channel.name),
        ChannelTarget::New { number } => format!("new channel #{}", number),
    }
}
