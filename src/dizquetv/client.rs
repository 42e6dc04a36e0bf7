//! Blocking dizqueTV HTTP client

use super::{Channel, ChannelService, DizqueTvError, Program};
use crate::config::normalize_url;
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Client for the dizqueTV web API.
pub struct DizqueTv {
    client: Client,
    base_url: String,
}

impl DizqueTv {
    /// Creates a client for the dizqueTV instance at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_url(base_url),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and rejects non-success statuses.
    fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, DizqueTvError> {
        let response = request.send().map_err(|e| DizqueTvError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DizqueTvError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    fn parse<T>(url: &str, response: Response) -> Result<T, DizqueTvError>
    where
        T: DeserializeOwned,
    {
        response.json().map_err(|e| DizqueTvError::ParseFailed {
            url: url.to_string(),
            source: e,
        })
    }

    /// Stores the full channel document, replacing what the service holds.
    fn update_channel(&self, channel: &Channel) -> Result<(), DizqueTvError> {
        let url = self.url("/api/channel");
        debug!(
            "POST {} (channel #{}, {} programs)",
            url,
            channel.number,
            channel.programs.len()
        );
        self.send(&url, self.client.post(&url).json(channel))?;
        Ok(())
    }
}

impl ChannelService for DizqueTv {
    fn channel_numbers(&self) -> Result<Vec<u32>, DizqueTvError> {
        let url = self.url("/api/channelNumbers");
        debug!("GET {}", url);
        let response = self.send(&url, self.client.get(&url))?;
        Self::parse(&url, response)
    }

    fn get_channel(&self, number: u32) -> Result<Option<Channel>, DizqueTvError> {
        let url = self.url(&format!("/api/channel/{}", number));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DizqueTvError::RequestFailed {
                url: url.clone(),
                source: e,
            })?;

        // The service answers unknown channels with 404
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(DizqueTvError::HttpStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        Self::parse(&url, response).map(Some)
    }

    fn add_channel(
        &self,
        programs: Vec<Program>,
        name: &str,
        number: u32,
    ) -> Result<Channel, DizqueTvError> {
        let channel = Channel::with_defaults(number, name, programs, &self.base_url);

        let url = self.url("/api/channel");
        debug!("PUT {} (channel #{} '{}')", url, number, name);
        self.send(&url, self.client.put(&url).json(&channel))?;

        // Read back what the service stored
        self.get_channel(number)?
            .ok_or(DizqueTvError::ChannelMissing(number))
    }

    fn delete_all_programs(&self, channel: &Channel) -> Result<(), DizqueTvError> {
        let mut cleared = channel.clone();
        cleared.programs.clear();
        cleared.recompute_duration();
        self.update_channel(&cleared)
    }

    fn add_programs_to_channels(
        &self,
        programs: &[Program],
        channels: &[&Channel],
    ) -> Result<(), DizqueTvError> {
        for channel in channels {
            // Start from the stored state, not the caller's possibly stale copy
            let mut current = self
                .get_channel(channel.number)?
                .ok_or(DizqueTvError::ChannelMissing(channel.number))?;

            current.programs.extend_from_slice(programs);
            current.recompute_duration();
            self.update_channel(&current)?;
        }

        Ok(())
    }
}
