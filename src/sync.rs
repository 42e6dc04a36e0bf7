//! Channel resolution and program batching
//!
//! These are the building blocks of a playlist sync: deciding which channel
//! the playlist goes to, collecting converted programs (creating the channel
//! lazily on the first one), and finally replacing the channel's programs.

use crate::SyncEvent;
use crate::dizquetv::{Channel, ChannelService, DizqueTvError, Program};

/// The channel a playlist is synced into, as resolved before conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelTarget {
    /// A channel that already exists on the service
    Existing(Channel),
    /// A channel that will be created under this number once there is
    /// something to put on it
    New { number: u32 },
}

/// Computes the number for a new channel: one past the highest existing
/// number, or 1 when there are no channels yet.
///
/// Returns `None` when the highest number in use is `u32::MAX`.
pub fn next_channel_number(existing: &[u32]) -> Option<u32> {
    match existing.iter().max() {
        Some(highest) => highest.checked_add(1),
        None => Some(1),
    }
}

/// Resolves the target channel.
///
/// With a number, the channel must already exist; `Ok(None)` reports that it
/// does not. Without a number, a fresh number is reserved but nothing is
/// created yet.
pub(crate) fn resolve_channel<C>(
    service: &C,
    channel_number: Option<u32>,
) -> Result<Option<ChannelTarget>, DizqueTvError>
where
    C: ChannelService + ?Sized,
{
    match channel_number {
        Some(number) => Ok(service.get_channel(number)?.map(ChannelTarget::Existing)),
        None => {
            let numbers = service.channel_numbers()?;
            let number =
                next_channel_number(&numbers).ok_or(DizqueTvError::NoFreeChannelNumber)?;
            Ok(Some(ChannelTarget::New { number }))
        }
    }
}

/// Accumulates the programs for one sync run.
///
/// A batch for a new channel creates that channel, seeded with the first
/// program, as soon as the first program is pushed. Every program, the seed
/// included, is also kept for the final bulk upload.
#[derive(Debug)]
pub struct ProgramBatch {
    channel: Option<Channel>,
    number: u32,
    name: String,
    created: bool,
    programs: Vec<Program>,
}

impl ProgramBatch {
    /// Starts a batch for `target`; `name` is used if the channel is created.
    pub fn new(target: ChannelTarget, name: &str) -> Self {
        let (channel, number) = match target {
            ChannelTarget::Existing(channel) => {
                let number = channel.number;
                (Some(channel), number)
            }
            ChannelTarget::New { number } => (None, number),
        };

        Self {
            channel,
            number,
            name: name.to_string(),
            created: false,
            programs: Vec::new(),
        }
    }

    /// Adds a converted program, creating the channel first if needed.
    pub fn push<C, F>(
        &mut self,
        program: Program,
        service: &C,
        progress: &mut F,
    ) -> Result<(), DizqueTvError>
    where
        C: ChannelService + ?Sized,
        F: FnMut(SyncEvent),
    {
        if self.channel.is_none() {
            progress(SyncEvent::CreatingChannel {
                name: self.name.clone(),
                number: self.number,
            });
            let channel = service.add_channel(vec![program.clone()], &self.name, self.number)?;
            self.channel = Some(channel);
            self.created = true;
        }

        progress(SyncEvent::AddingProgram {
            title: program.title.clone(),
        });
        self.programs.push(program);

        Ok(())
    }

    /// Whether this batch created its channel
    pub fn created(&self) -> bool {
        self.created
    }

    /// Finishes the batch, yielding the channel and its new program list.
    ///
    /// Returns `None` when the channel did not exist and nothing was pushed,
    /// so it was never created.
    pub fn finish(self) -> Option<(Channel, Vec<Program>)> {
        let programs = self.programs;
        self.channel.map(|channel| (channel, programs))
    }
}

/// Replaces the programs of `channel` with `programs`.
///
/// The channel is cleared first; the new programs are only uploaded once the
/// clear has been confirmed.
pub fn replace_programs<C>(
    service: &C,
    channel: &Channel,
    programs: &[Program],
) -> Result<(), DizqueTvError>
where
    C: ChannelService + ?Sized,
{
    service.delete_all_programs(channel)?;
    service.add_programs_to_channels(programs, &[channel])
}
