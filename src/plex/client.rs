//! Blocking Plex HTTP client.
use super::plex_types::{PlexIdentity, PlexMetadataPage, PlexResponse};
use super::{Playlist, PlaylistItem, PlexError, ServerInfo};
use crate::config::normalize_url;
use log::{debug, trace};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Number of entries requested per page when listing metadata
const PAGE_SIZE: usize = 100;

/// Product name announced to the server
const PRODUCT_NAME: &str = "playlist_to_channel";

/// An authenticated connection to a Plex server.
///
/// Constructing one performs a request against the server root, so a bad URL
/// or token fails here rather than on first use.
pub struct PlexServer {
    client: Client,
    info: ServerInfo,
}

impl PlexServer {
    /// Connects to the server at `base_url` and reads its identity.
    pub fn connect(base_url: &str, token: &str) -> Result<Self, PlexError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-plex-product", HeaderValue::from_static(PRODUCT_NAME));
        headers.insert(
            "x-plex-client-identifier",
            HeaderValue::from_static(PRODUCT_NAME),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(PlexError::ClientSetup)?;

        let mut server = Self {
            client,
            info: ServerInfo {
                name: String::new(),
                machine_identifier: String::new(),
                base_url: normalize_url(base_url),
                token: token.to_string(),
            },
        };

        let identity: PlexResponse<PlexIdentity> = server.get("/", &[])?;
        let identity = identity.media_container;
        debug!(
            "Connected to Plex server '{}' ({}), version {}",
            identity.friendly_name,
            identity.machine_identifier,
            identity.version.as_deref().unwrap_or("unknown")
        );

        server.info.name = identity.friendly_name;
        server.info.machine_identifier = identity.machine_identifier;

        Ok(server)
    }

    /// Identity of the connected server
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Lists all playlists in server order.
    pub fn playlists(&self) -> Result<Vec<Playlist>, PlexError> {
        self.fetch_all("/playlists")
    }

    /// Lists the items of `playlist` in playlist order.
    pub fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<PlaylistItem>, PlexError> {
        self.fetch_all(&format!("/playlists/{}/items", playlist.rating_key))
    }

    /// Fetches every entry of a metadata listing, following pages until the
    /// reported total is reached.
    fn fetch_all<M>(&self, path: &str) -> Result<Vec<M>, PlexError>
    where
        M: DeserializeOwned,
    {
        let mut entries: Vec<M> = Vec::new();

        loop {
            let query = [
                ("X-Plex-Container-Start", entries.len().to_string()),
                ("X-Plex-Container-Size", PAGE_SIZE.to_string()),
            ];
            let page: PlexResponse<PlexMetadataPage<M>> = self.get(path, &query)?;
            let page = page.media_container;

            let fetched = page.metadata.len();
            entries.extend(page.metadata);

            let total = page.total_size.unwrap_or(entries.len());
            trace!("{}: {} of {} entries fetched", path, entries.len(), total);

            if fetched == 0 || entries.len() >= total {
                break;
            }
        }

        Ok(entries)
    }

    /// Performs an authenticated GET and decodes the JSON body.
    fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, PlexError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.info.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Plex-Token", &self.info.token)
            .query(query)
            .send()
            .map_err(|e| PlexError::RequestFailed {
                url: url.clone(),
                source: e,
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(PlexError::Unauthorized { url });
        }
        if !status.is_success() {
            return Err(PlexError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .map_err(|e| PlexError::ParseFailed { url, source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const IDENTITY: &str = r#"{"MediaContainer": {"friendlyName": "Living Room", "machineIdentifier": "abc123", "version": "1.40.0"}}"#;

    fn mock_identity(server: &mut Server) -> mockito::Mock {
        server
            .mock("GET", "/")
            .match_header("x-plex-token", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(IDENTITY)
            .create()
    }

    #[test]
    fn test_connect_reads_server_identity() {
        let mut server = Server::new();
        let identity = mock_identity(&mut server);

        let plex = PlexServer::connect(&format!("{}/", server.url()), "secret").unwrap();

        identity.assert();
        assert_eq!(plex.info().name, "Living Room");
        assert_eq!(plex.info().machine_identifier, "abc123");
        assert_eq!(plex.info().base_url, server.url());
    }

    #[test]
    fn test_connect_with_bad_token_is_unauthorized() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/").with_status(401).create();

        let result = PlexServer::connect(&server.url(), "wrong");
        assert!(matches!(result, Err(PlexError::Unauthorized { .. })));
    }

    #[test]
    fn test_playlists_lists_all_entries() {
        let mut server = Server::new();
        let _identity = mock_identity(&mut server);
        let listing = server
            .mock("GET", "/playlists")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("X-Plex-Container-Start".into(), "0".into()),
                Matcher::UrlEncoded("X-Plex-Container-Size".into(), "100".into()),
            ]))
            .match_header("x-plex-token", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"MediaContainer": {"size": 2, "totalSize": 2, "Metadata": [
                    {"ratingKey": "10", "key": "/playlists/10/items", "title": "Cartoons", "playlistType": "video", "leafCount": 3},
                    {"ratingKey": "11", "key": "/playlists/11/items", "title": "Road Trip", "playlistType": "audio", "smart": true}
                ]}}"#,
            )
            .create();

        let plex = PlexServer::connect(&server.url(), "secret").unwrap();
        let playlists = plex.playlists().unwrap();

        listing.assert();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].title, "Cartoons");
        assert_eq!(playlists[1].rating_key, "11");
    }

    #[test]
    fn test_empty_container_yields_no_playlists() {
        let mut server = Server::new();
        let _identity = mock_identity(&mut server);
        let _mock = server
            .mock("GET", "/playlists")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"MediaContainer": {"size": 0}}"#)
            .create();

        let plex = PlexServer::connect(&server.url(), "secret").unwrap();
        assert!(plex.playlists().unwrap().is_empty());
    }

    #[test]
    fn test_playlist_items_follow_pages() {
        let mut server = Server::new();
        let _identity = mock_identity(&mut server);
        let first = server
            .mock("GET", "/playlists/10/items")
            .match_query(Matcher::UrlEncoded(
                "X-Plex-Container-Start".into(),
                "0".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"MediaContainer": {"size": 2, "totalSize": 3, "Metadata": [
                    {"ratingKey": "1", "key": "/library/metadata/1", "type": "episode", "title": "One"},
                    {"ratingKey": "2", "key": "/library/metadata/2", "type": "movie", "title": "Two"}
                ]}}"#,
            )
            .create();
        let second = server
            .mock("GET", "/playlists/10/items")
            .match_query(Matcher::UrlEncoded(
                "X-Plex-Container-Start".into(),
                "2".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"MediaContainer": {"size": 1, "totalSize": 3, "Metadata": [
                    {"ratingKey": "3", "key": "/library/metadata/3", "type": "track", "title": "Three"}
                ]}}"#,
            )
            .create();

        let plex = PlexServer::connect(&server.url(), "secret").unwrap();
        let playlist = Playlist {
            rating_key: "10".to_string(),
            title: "Cartoons".to_string(),
        };
        let items = plex.playlist_items(&playlist).unwrap();

        first.assert();
        second.assert();
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_server_error_is_reported_with_status() {
        let mut server = Server::new();
        let _identity = mock_identity(&mut server);
        let _mock = server
            .mock("GET", "/playlists")
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let plex = PlexServer::connect(&server.url(), "secret").unwrap();
        match plex.playlists() {
            Err(PlexError::HttpStatus { status, .. }) => assert_eq!(status, 500),
            other => panic!("unexpected result: {:?}", other.map(|p| p.len())),
        }
    }
}
