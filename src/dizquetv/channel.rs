//! dizqueTV channel and program representations
//!
//! Only the fields the tool reads or writes are typed. Everything else the
//! service stores on a channel or program is kept in a flattened map so that
//! updates send it back untouched.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// A numbered dizqueTV channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique channel number
    pub number: u32,
    /// Display name
    pub name: String,
    /// Programs in playback order
    #[serde(default)]
    pub programs: Vec<Program>,
    /// Sum of all program durations in milliseconds
    #[serde(default)]
    pub duration: u64,
    /// All remaining channel settings (icon, filler, watermark, ...)
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl Channel {
    /// Builds a new channel with dizqueTV's default settings.
    ///
    /// `dizquetv_url` is used for the default icon and offline picture, which
    /// the service serves itself.
    pub fn with_defaults(
        number: u32,
        name: &str,
        programs: Vec<Program>,
        dizquetv_url: &str,
    ) -> Self {
        let settings = [
            ("icon", json!(format!("{}/images/dizquetv.png", dizquetv_url))),
            ("iconWidth", json!(120)),
            ("iconDuration", json!(60)),
            ("iconPosition", json!("2")),
            (
                "startTime",
                json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            ("groupTitle", json!("dizqueTV")),
            ("disableFillerOverlay", json!(true)),
            ("offlineMode", json!("pic")),
            (
                "offlinePicture",
                json!(format!("{}/images/generic-offline-screen.png", dizquetv_url)),
            ),
            ("offlineSoundtrack", json!("")),
            ("fillerCollections", json!([])),
            ("fillerRepeatCooldown", json!(1_800_000)),
            ("fallback", json!([])),
            ("stealth", json!(false)),
            ("guideMinimumDurationSeconds", json!(300)),
            ("transcoding", json!({ "targetResolution": "" })),
            (
                "watermark",
                json!({
                    "enabled": false,
                    "position": "bottom-right",
                    "width": 10,
                    "verticalMargin": 0,
                    "horizontalMargin": 0,
                    "duration": 0,
                    "fixedSize": false,
                    "animated": false,
                    "url": ""
                }),
            ),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect();

        let mut channel = Self {
            number,
            name: name.to_string(),
            programs,
            duration: 0,
            settings,
        };
        channel.recompute_duration();
        channel
    }

    /// Sets `duration` to the sum of the program durations.
    pub fn recompute_duration(&mut self) {
        self.duration = self.programs.iter().map(|program| program.duration).sum();
    }
}

/// A dizqueTV program, the service's representation of a playable item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default)]
    pub title: String,
    /// `episode` or `movie` for Plex-backed programs
    #[serde(rename = "type", default)]
    pub program_type: String,
    /// Runtime in milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_key: Option<String>,
    /// Name of the Plex server as registered in dizqueTV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Streaming path of the media part on the Plex server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plex_file: Option<String>,
    /// Path of the media file on the Plex server's disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_icon: Option<String>,
    /// Fields of non-Plex programs (flex, redirects) and anything newer
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
