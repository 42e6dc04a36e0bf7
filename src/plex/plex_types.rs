//! Plex API response envelopes for deserialization.
//!
//! Every Plex JSON response wraps its payload in a `MediaContainer` object.
use serde::Deserialize;

/// The top-level envelope of a Plex JSON response.
#[derive(Debug, Deserialize)]
pub(super) struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

/// Server identity returned by `GET /`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlexIdentity {
    pub friendly_name: String,
    pub machine_identifier: String,
    pub version: Option<String>,
}

/// A (possibly paged) list of metadata entries.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlexMetadataPage<M> {
    /// Total number of entries across all pages, present when paging
    pub total_size: Option<usize>,
    /// Absent entirely when the container is empty
    #[serde(rename = "Metadata", default = "Vec::new")]
    pub metadata: Vec<M>,
}
