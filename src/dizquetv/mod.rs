//! dizqueTV channel management.
//!
//! This module provides the channel and program structures of the dizqueTV
//! API, the conversion of Plex items into programs, a blocking HTTP client,
//! and the `ChannelService` trait used by the sync flow.
mod channel;
mod client;
mod convert;

pub use channel::{Channel, Program};
pub use client::DizqueTv;
pub use convert::program_from_plex_item;

use crate::plex::{PlaylistItem, ServerInfo};
use thiserror::Error;

/// Errors that can occur while talking to dizqueTV.
#[derive(Debug, Error)]
pub enum DizqueTvError {
    /// The request could not be sent or no response was received
    #[error("Request to {url} failed: {source}")]
    RequestFailed { url: String, source: reqwest::Error },

    /// The service answered with a non-success status
    #[error("dizqueTV returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not the expected JSON
    #[error("Failed to parse dizqueTV response from {url}: {source}")]
    ParseFailed { url: String, source: reqwest::Error },

    /// A channel the client relied on does not exist
    #[error("Channel #{0} does not exist on dizqueTV")]
    ChannelMissing(u32),

    /// Every channel number above the highest existing one is taken
    #[error("No channel number is left for a new dizqueTV channel")]
    NoFreeChannelNumber,
}

/// Trait for channel services that programs can be scheduled on.
///
/// `DizqueTv` is the production implementation; the sync flow only depends
/// on this trait.
pub trait ChannelService {
    /// Lists the numbers of all existing channels.
    fn channel_numbers(&self) -> Result<Vec<u32>, DizqueTvError>;

    /// Fetches a channel by number, `None` if there is no such channel.
    fn get_channel(&self, number: u32) -> Result<Option<Channel>, DizqueTvError>;

    /// Creates a channel holding `programs` and returns it as stored.
    fn add_channel(
        &self,
        programs: Vec<Program>,
        name: &str,
        number: u32,
    ) -> Result<Channel, DizqueTvError>;

    /// Removes every program from `channel`.
    ///
    /// Returns `Ok` only once the service has confirmed the change.
    fn delete_all_programs(&self, channel: &Channel) -> Result<(), DizqueTvError>;

    /// Appends `programs`, in order, to each of `channels`.
    fn add_programs_to_channels(
        &self,
        programs: &[Program],
        channels: &[&Channel],
    ) -> Result<(), DizqueTvError>;

    /// Converts a Plex item into a program, `None` if it cannot be scheduled.
    fn convert_plex_item_to_program(
        &self,
        item: &PlaylistItem,
        server: &ServerInfo,
    ) -> Option<Program> {
        program_from_plex_item(item, server)
    }
}
