use std::io::{self, Write};

/// Sound effects a tick can trigger.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SoundCue {
    Eat,
    Bonus,
    BonusSpawn,
    Collision,
}

/// Fire-and-forget audio output. Playback problems are the sink's to swallow.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Rings the terminal bell for the cues worth interrupting the player for.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: SoundCue) {
        if matches!(cue, SoundCue::Collision | SoundCue::BonusSpawn) {
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07").and_then(|()| stdout.flush());
        }
    }
}
