//! Plex media server access
//!
//! This module provides the data structures for Plex playlists and their items,
//! a blocking HTTP client for the small part of the Plex API the tool needs,
//! and the `MediaServer` trait used by the sync flow.
mod client;
mod plex_types;

pub use client::PlexServer;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while talking to a Plex server.
#[derive(Debug, Error)]
pub enum PlexError {
    /// The HTTP client could not be constructed
    #[error("Failed to set up HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    /// The request could not be sent or no response was received
    #[error("Request to {url} failed: {source}")]
    RequestFailed { url: String, source: reqwest::Error },

    /// The server rejected the access token
    #[error("Plex rejected the access token for {url} (HTTP 401)")]
    Unauthorized { url: String },

    /// The server answered with a non-success status
    #[error("Plex returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not the expected JSON
    #[error("Failed to parse Plex response from {url}: {source}")]
    ParseFailed { url: String, source: reqwest::Error },
}

/// Identity and location of the Plex server a run is connected to.
///
/// Conversion into dizqueTV programs needs this to name the source server
/// and to build absolute, token-bearing artwork URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    /// The server's friendly name, which dizqueTV uses as server key
    pub name: String,
    /// Unique machine identifier reported by the server
    pub machine_identifier: String,
    /// Base URL without trailing slash
    pub base_url: String,
    /// Access token used for every request
    pub token: String,
}

impl ServerInfo {
    /// Builds an absolute URL for a server-relative path such as a thumb key.
    pub fn url(&self, path: &str, include_token: bool) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if include_token {
            let separator = if path.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str("X-Plex-Token=");
            url.push_str(&self.token);
        }
        url
    }
}

/// A playlist as listed by `/playlists`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique key of the playlist, addresses its items
    pub rating_key: String,
    /// Playlist title, used for exact-match lookup
    pub title: String,
}

/// Kind of media a playlist item refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Episode,
    Track,
    Clip,
    Photo,
    #[serde(other)]
    Other,
}

/// A single entry of a playlist.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub rating_key: String,
    /// Server-relative metadata path, e.g. `/library/metadata/101`
    pub key: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    pub summary: Option<String>,
    /// Runtime in milliseconds
    pub duration: Option<u64>,
    pub year: Option<i32>,
    /// Release or air date as `YYYY-MM-DD`
    pub originally_available_at: Option<String>,
    pub content_rating: Option<String>,
    pub thumb: Option<String>,
    pub parent_thumb: Option<String>,
    pub grandparent_thumb: Option<String>,
    /// Show title for episodes
    pub grandparent_title: Option<String>,
    /// Season number for episodes
    pub parent_index: Option<u32>,
    /// Episode number for episodes
    pub index: Option<u32>,
    #[serde(rename = "Media", default)]
    pub media: Vec<Media>,
}

/// One encoding of a media item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Media {
    pub duration: Option<u64>,
    #[serde(rename = "Part", default)]
    pub parts: Vec<MediaPart>,
}

/// A file backing a media encoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaPart {
    /// Server-relative streaming path, e.g. `/library/parts/55/file.mkv`
    pub key: String,
    /// Path of the file on the server's disk
    pub file: Option<String>,
}

/// Trait for media servers that playlists can be read from.
///
/// `Plex` is the production implementation; the sync flow only depends on
/// this trait.
pub trait MediaServer {
    /// Identity of the connected server.
    fn server_info(&self) -> &ServerInfo;

    /// Lists every playlist visible to the authenticated connection.
    fn get_playlists(&self) -> Result<Vec<Playlist>, PlexError>;

    /// Returns the ordered items of a playlist.
    fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<PlaylistItem>, PlexError>;

    /// Finds the first playlist whose title is exactly `name`.
    ///
    /// Matching is case-sensitive and never partial.
    fn get_playlist(&self, name: &str) -> Result<Option<Playlist>, PlexError> {
        Ok(self
            .get_playlists()?
            .into_iter()
            .find(|playlist| playlist.title == name))
    }
}

/// Convenience facade over a Plex server connection.
pub struct Plex {
    server: PlexServer,
}

impl Plex {
    /// Connects and authenticates to the server at `url` using `token`.
    pub fn connect(url: &str, token: &str) -> Result<Self, PlexError> {
        Ok(Self {
            server: PlexServer::connect(url, token)?,
        })
    }
}

impl MediaServer for Plex {
    fn server_info(&self) -> &ServerInfo {
        self.server.info()
    }

    fn get_playlists(&self) -> Result<Vec<Playlist>, PlexError> {
        self.server.playlists()
    }

    fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<PlaylistItem>, PlexError> {
        self.server.playlist_items(playlist)
    }
}
