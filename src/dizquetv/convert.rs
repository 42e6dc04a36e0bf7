//! Plex item to dizqueTV program conversion

use super::Program;
use crate::plex::{MediaType, PlaylistItem, ServerInfo};

/// Converts a Plex playlist item into a dizqueTV program.
///
/// Only episodes and movies can be scheduled. Returns `None` for any other
/// media type, and for items without a playable media part or a known
/// runtime.
///
/// # Arguments
///
/// * `item` - The playlist item to convert
/// * `server` - The Plex server the item lives on, used as the program's
///   server key and to build artwork URLs
pub fn program_from_plex_item(item: &PlaylistItem, server: &ServerInfo) -> Option<Program> {
    let program_type = match item.media_type {
        MediaType::Episode => "episode",
        MediaType::Movie => "movie",
        _ => return None,
    };

    let media = item.media.first()?;
    let part = media.parts.first()?;
    let duration = item.duration.or(media.duration).filter(|d| *d > 0)?;

    let artwork = |path: &Option<String>| path.as_deref().map(|p| server.url(p, true));

    let mut program = Program {
        title: item.title.clone(),
        program_type: program_type.to_string(),
        duration,
        key: Some(item.key.clone()),
        rating_key: Some(item.rating_key.clone()),
        server: Some(server.name.clone()),
        server_key: Some(server.name.clone()),
        summary: item.summary.clone(),
        date: item.originally_available_at.clone(),
        year: item.year,
        plex_file: Some(part.key.clone()),
        file: part.file.clone(),
        rating: item.content_rating.clone(),
        ..Default::default()
    };

    if item.media_type == MediaType::Episode {
        program.icon = artwork(&item.grandparent_thumb);
        program.show_title = item.grandparent_title.clone();
        program.season = item.parent_index;
        program.episode = item.index;
        program.episode_icon = artwork(&item.thumb);
        program.season_icon = artwork(&item.parent_thumb);
        program.show_icon = artwork(&item.grandparent_thumb);
    } else {
        program.icon = artwork(&item.thumb);
    }

    Some(program)
}
