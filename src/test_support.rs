//! In-memory media server and channel service used by the sync tests

use crate::dizquetv::{Channel, ChannelService, DizqueTvError, Program};
use crate::plex::{
    Media, MediaPart, MediaServer, MediaType, Playlist, PlaylistItem, PlexError, ServerInfo,
};
use serde_json::Map;
use std::cell::RefCell;
use std::collections::BTreeMap;

pub(crate) fn program(title: &str, duration: u64) -> Program {
    Program {
        title: title.to_string(),
        program_type: "movie".to_string(),
        duration,
        ..Default::default()
    }
}

fn item(title: &str, media_type: MediaType) -> PlaylistItem {
    let key = format!("/library/metadata/{}", title.to_lowercase().replace(' ', "-"));
    PlaylistItem {
        rating_key: title.to_string(),
        key: key.clone(),
        media_type,
        title: title.to_string(),
        summary: None,
        duration: Some(60_000),
        year: None,
        originally_available_at: None,
        content_rating: None,
        thumb: Some(format!("{}/thumb", key)),
        parent_thumb: None,
        grandparent_thumb: None,
        grandparent_title: Some("Space Cadets".to_string()),
        parent_index: Some(1),
        index: Some(1),
        media: vec![Media {
            duration: Some(60_000),
            parts: vec![MediaPart {
                key: format!("/library/parts/{}/file.mkv", title),
                file: None,
            }],
        }],
    }
}

/// A playlist item that converts into a program
pub(crate) fn episode(title: &str) -> PlaylistItem {
    item(title, MediaType::Episode)
}

/// A playlist item that cannot be scheduled
pub(crate) fn track(title: &str) -> PlaylistItem {
    item(title, MediaType::Track)
}

pub(crate) struct FakeMediaServer {
    info: ServerInfo,
    playlists: Vec<(Playlist, Vec<PlaylistItem>)>,
}

impl FakeMediaServer {
    pub(crate) fn new() -> Self {
        Self {
            info: ServerInfo {
                name: "Fake Plex".to_string(),
                machine_identifier: "fake".to_string(),
                base_url: "http://plex.test:32400".to_string(),
                token: "token".to_string(),
            },
            playlists: Vec::new(),
        }
    }

    pub(crate) fn with_playlist(mut self, title: &str, items: Vec<PlaylistItem>) -> Self {
        let rating_key = (self.playlists.len() + 1).to_string();
        let playlist = Playlist {
            rating_key,
            title: title.to_string(),
        };
        self.playlists.push((playlist, items));
        self
    }
}

impl MediaServer for FakeMediaServer {
    fn server_info(&self) -> &ServerInfo {
        &self.info
    }

    fn get_playlists(&self) -> Result<Vec<Playlist>, PlexError> {
        Ok(self.playlists.iter().map(|(p, _)| p.clone()).collect())
    }

    fn playlist_items(&self, playlist: &Playlist) -> Result<Vec<PlaylistItem>, PlexError> {
        Ok(self
            .playlists
            .iter()
            .find(|(p, _)| p.rating_key == playlist.rating_key)
            .map(|(_, items)| items.clone())
            .unwrap_or_default())
    }
}

/// A change made to the fake channel service
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mutation {
    Created {
        number: u32,
        name: String,
        titles: Vec<String>,
    },
    Cleared {
        number: u32,
    },
    Added {
        number: u32,
        titles: Vec<String>,
    },
}

pub(crate) struct FakeChannelService {
    channels: RefCell<BTreeMap<u32, Channel>>,
    mutations: RefCell<Vec<Mutation>>,
    fail_clear: bool,
}

fn titles_of(programs: &[Program]) -> Vec<String> {
    programs.iter().map(|p| p.title.clone()).collect()
}

impl FakeChannelService {
    pub(crate) fn with_channels(numbers: &[u32]) -> Self {
        let channels = numbers
            .iter()
            .map(|&number| {
                let channel = Channel {
                    number,
                    name: format!("Channel {}", number),
                    programs: Vec::new(),
                    duration: 0,
                    settings: Map::new(),
                };
                (number, channel)
            })
            .collect();

        Self {
            channels: RefCell::new(channels),
            mutations: RefCell::new(Vec::new()),
            fail_clear: false,
        }
    }

    /// Makes every `delete_all_programs` call fail
    pub(crate) fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    /// Puts programs on a channel without recording a mutation
    pub(crate) fn seed_programs(&self, number: u32, titles: &[&str]) {
        if let Some(channel) = self.channels.borrow_mut().get_mut(&number) {
            channel.programs = titles.iter().map(|t| program(t, 1000)).collect();
            channel.recompute_duration();
        }
    }

    pub(crate) fn titles(&self, number: u32) -> Vec<String> {
        self.channels
            .borrow()
            .get(&number)
            .map(|c| titles_of(&c.programs))
            .unwrap_or_default()
    }

    pub(crate) fn channel(&self, number: u32) -> Option<Channel> {
        self.channels.borrow().get(&number).cloned()
    }

    pub(crate) fn mutations(&self) -> Vec<Mutation> {
        self.mutations.borrow().clone()
    }
}

impl ChannelService for FakeChannelService {
    fn channel_numbers(&self) -> Result<Vec<u32>, DizqueTvError> {
        Ok(self.channels.borrow().keys().copied().collect())
    }

    fn get_channel(&self, number: u32) -> Result<Option<Channel>, DizqueTvError> {
        Ok(self.channel(number))
    }

    fn add_channel(
        &self,
        programs: Vec<Program>,
        name: &str,
        number: u32,
    ) -> Result<Channel, DizqueTvError> {
        let mut channel = Channel {
            number,
            name: name.to_string(),
            programs,
            duration: 0,
            settings: Map::new(),
        };
        channel.recompute_duration();

        self.mutations.borrow_mut().push(Mutation::Created {
            number,
            name: name.to_string(),
            titles: titles_of(&channel.programs),
        });
        self.channels.borrow_mut().insert(number, channel.clone());
        Ok(channel)
    }

    fn delete_all_programs(&self, channel: &Channel) -> Result<(), DizqueTvError> {
        if self.fail_clear {
            return Err(DizqueTvError::HttpStatus {
                url: "http://dizquetv.test/api/channel".to_string(),
                status: 500,
            });
        }

        let mut channels = self.channels.borrow_mut();
        let stored = channels
            .get_mut(&channel.number)
            .ok_or(DizqueTvError::ChannelMissing(channel.number))?;
        stored.programs.clear();
        stored.recompute_duration();

        self.mutations.borrow_mut().push(Mutation::Cleared {
            number: channel.number,
        });
        Ok(())
    }

    fn add_programs_to_channels(
        &self,
        programs: &[Program],
        channels: &[&Channel],
    ) -> Result<(), DizqueTvError> {
        let mut stored_channels = self.channels.borrow_mut();
        for channel in channels {
            let stored = stored_channels
                .get_mut(&channel.number)
                .ok_or(DizqueTvError::ChannelMissing(channel.number))?;
            stored.programs.extend_from_slice(programs);
            stored.recompute_duration();

            self.mutations.borrow_mut().push(Mutation::Added {
                number: channel.number,
                titles: titles_of(programs),
            });
        }
        Ok(())
    }
}
