//! Sound effects and background music.
//!
//! Asset paths are fixed and relative to the page. A missing or blocked file
//! never interrupts play; the sink reports the error and the session drops it.

use crate::error::AudioError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Tap,
    Success,
    Failure,
    Reward,
    Dig,
    Whoosh,
}

impl SoundCue {
    pub fn path(self) -> &'static str {
        match self {
            SoundCue::Tap => "sounds/tap.mp3",
            SoundCue::Success => "sounds/success.mp3",
            SoundCue::Failure => "sounds/failure.mp3",
            SoundCue::Reward => "sounds/reward.mp3",
            SoundCue::Dig => "sounds/dig.mp3",
            SoundCue::Whoosh => "sounds/whoosh.mp3",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicTrack {
    Lobby,
    Playful,
}

impl MusicTrack {
    pub fn path(self) -> &'static str {
        match self {
            MusicTrack::Lobby => "music/lobby.mp3",
            MusicTrack::Playful => "music/playful.mp3",
        }
    }
}

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    fn start_music(&mut self, track: MusicTrack) -> Result<(), AudioError>;
    fn stop_music(&mut self);
}

/// Silent sink for native builds and tests. Remembers what was asked of it.
#[derive(Debug, Default)]
pub struct NullAudio {
    pub played: Vec<SoundCue>,
    pub music: Option<MusicTrack>,
}

impl AudioSink for NullAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.played.push(cue);
        Ok(())
    }

    fn start_music(&mut self, track: MusicTrack) -> Result<(), AudioError> {
        self.music = Some(track);
        Ok(())
    }

    fn stop_music(&mut self) {
        self.music = None;
    }
}
