//! Single-slot audio playback.
//!
//! At most one letter's clip plays at a time. Starting a clip for another
//! letter stops the current one first, and every way out of the letter
//! view goes through [`AudioController::stop`].

use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::error::{LetterError, Result};
use crate::model::letter::Letter;

/// Something that can start playing a clip.
pub trait Player {
    fn start(&mut self, source: &str) -> Result<Box<dyn Playback>>;
}

/// A clip that is playing or has played.
pub trait Playback {
    /// Stop and rewind. Safe to call more than once.
    fn stop(&mut self);

    /// Whether the clip reached its natural end.
    fn is_finished(&mut self) -> bool;
}

/// Plays clips by spawning an external program, one process per clip.
///
/// `{source}` in `args` is replaced with the clip location; when no
/// argument contains it, the location is appended.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command_args(&self, source: &str) -> Vec<String> {
        let mut substituted = false;
        let mut args: Vec<String> = self
            .args
            .iter()
            .map(|a| {
                if a.contains("{source}") {
                    substituted = true;
                    a.replace("{source}", source)
                } else {
                    a.clone()
                }
            })
            .collect();
        if !substituted {
            args.push(source.to_string());
        }
        args
    }
}

impl Default for CommandPlayer {
    fn default() -> Self {
        Self::new(
            "mpv",
            vec![
                "--no-video".to_string(),
                "--really-quiet".to_string(),
                "{source}".to_string(),
            ],
        )
    }
}

impl Player for CommandPlayer {
    fn start(&mut self, source: &str) -> Result<Box<dyn Playback>> {
        let child = Command::new(&self.program)
            .args(self.command_args(source))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| LetterError::Playback(format!("{}: {e}", self.program)))?;
        debug!(program = %self.program, pid = child.id(), "Player started");
        Ok(Box::new(ChildPlayback { child: Some(child) }))
    }
}

struct ChildPlayback {
    child: Option<Child>,
}

impl Playback for ChildPlayback {
    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // The process may already be gone; either way it is reaped.
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn is_finished(&mut self) -> bool {
        match self.child.as_mut() {
            None => true,
            Some(child) => match child.try_wait() {
                Ok(Some(_)) => {
                    self.child = None;
                    true
                }
                Ok(None) => false,
                Err(e) => {
                    debug!(error = %e, "Lost track of player process");
                    self.child = None;
                    true
                }
            },
        }
    }
}

impl Drop for ChildPlayback {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The playback slot.
pub struct AudioController {
    player: Box<dyn Player>,
    active: Option<(String, Box<dyn Playback>)>,
}

impl AudioController {
    pub fn new(player: impl Player + 'static) -> Self {
        Self {
            player: Box::new(player),
            active: None,
        }
    }

    /// Play `letter`'s clip, or stop it if it is the one playing.
    pub fn toggle(&mut self, letter: &Letter) {
        let Some(source) = letter.audio.as_deref() else {
            return;
        };
        if self.active_id() == Some(letter.id.as_str()) {
            self.stop();
            return;
        }
        self.stop();
        match self.player.start(source) {
            Ok(handle) => {
                debug!(letter = %letter.id, "Playing");
                self.active = Some((letter.id.clone(), handle));
            }
            Err(e) => debug!(letter = %letter.id, error = %e, "Playback failed"),
        }
    }

    /// Stop whatever is playing and empty the slot.
    pub fn stop(&mut self) {
        if let Some((id, mut handle)) = self.active.take() {
            handle.stop();
            debug!(letter = %id, "Stopped");
        }
    }

    /// Empty the slot if the clip ended on its own.
    /// Returns `true` when that happened.
    pub fn poll(&mut self) -> bool {
        let finished = match self.active.as_mut() {
            Some((_, handle)) => handle.is_finished(),
            None => false,
        };
        if finished {
            self.active = None;
        }
        finished
    }

    /// Id of the letter whose clip is playing.
    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// What happened to the fake clips, shared with the test.
    #[derive(Debug, Default)]
    pub struct Journal {
        pub started: Vec<String>,
        pub stopped: Vec<String>,
        pub finished: Vec<String>,
    }

    /// In-process player: fails for sources starting with `bad:`, and ends
    /// a clip once its source is listed in `Journal::finished`.
    #[derive(Clone, Default)]
    pub struct FakePlayer {
        pub journal: Rc<RefCell<Journal>>,
    }

    struct FakePlayback {
        source: String,
        journal: Rc<RefCell<Journal>>,
    }

    impl Player for FakePlayer {
        fn start(&mut self, source: &str) -> Result<Box<dyn Playback>> {
            if source.starts_with("bad:") {
                return Err(LetterError::Playback("unsupported format".into()));
            }
            self.journal.borrow_mut().started.push(source.to_string());
            Ok(Box::new(FakePlayback {
                source: source.to_string(),
                journal: self.journal.clone(),
            }))
        }
    }

    impl Playback for FakePlayback {
        fn stop(&mut self) {
            self.journal.borrow_mut().stopped.push(self.source.clone());
        }

        fn is_finished(&mut self) -> bool {
            self.journal.borrow().finished.contains(&self.source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakePlayer;
    use super::*;

    fn letter(id: &str, audio: Option<&str>) -> Letter {
        Letter {
            id: id.to_string(),
            number: 1,
            tag: String::new(),
            text: "hi".to_string(),
            audio: audio.map(str::to_string),
        }
    }

    #[test]
    fn test_switching_letters_stops_previous() {
        let player = FakePlayer::default();
        let journal = player.journal.clone();
        let mut audio = AudioController::new(player);
        let a = letter("a", Some("a.mp3"));
        let b = letter("b", Some("b.mp3"));

        audio.toggle(&b);
        assert_eq!(audio.active_id(), Some("b"));
        audio.toggle(&a);
        assert_eq!(audio.active_id(), Some("a"));
        assert_eq!(journal.borrow().stopped, vec!["b.mp3"]);

        audio.toggle(&a);
        assert_eq!(audio.active_id(), None);
        assert_eq!(journal.borrow().stopped, vec!["b.mp3", "a.mp3"]);
    }

    #[test]
    fn test_letter_without_audio_is_ignored() {
        let player = FakePlayer::default();
        let journal = player.journal.clone();
        let mut audio = AudioController::new(player);
        audio.toggle(&letter("a", Some("a.mp3")));
        audio.toggle(&letter("silent", None));
        assert_eq!(audio.active_id(), Some("a"));
        assert_eq!(journal.borrow().started.len(), 1);
    }

    #[test]
    fn test_failed_start_leaves_slot_empty() {
        let mut audio = AudioController::new(FakePlayer::default());
        audio.toggle(&letter("a", Some("a.mp3")));
        audio.toggle(&letter("b", Some("bad:b.ogg")));
        assert!(!audio.is_playing());
    }

    #[test]
    fn test_natural_end_clears_slot() {
        let player = FakePlayer::default();
        let journal = player.journal.clone();
        let mut audio = AudioController::new(player);
        audio.toggle(&letter("a", Some("a.mp3")));
        assert!(!audio.poll());
        journal.borrow_mut().finished.push("a.mp3".to_string());
        assert!(audio.poll());
        assert_eq!(audio.active_id(), None);
    }

    #[test]
    fn test_drop_stops_playback() {
        let player = FakePlayer::default();
        let journal = player.journal.clone();
        {
            let mut audio = AudioController::new(player);
            audio.toggle(&letter("a", Some("a.mp3")));
        }
        assert_eq!(journal.borrow().stopped, vec!["a.mp3"]);
    }

    #[test]
    fn test_command_args_substitute_source() {
        let player = CommandPlayer::default();
        assert_eq!(
            player.command_args("https://x/y.mp3"),
            vec!["--no-video", "--really-quiet", "https://x/y.mp3"]
        );
        let bare = CommandPlayer::new("afplay", vec![]);
        assert_eq!(bare.command_args("clip.m4a"), vec!["clip.m4a"]);
    }

    #[test]
    fn test_missing_program_is_a_playback_error() {
        let mut player = CommandPlayer::new("letterdesk-no-such-player", vec![]);
        assert!(matches!(
            player.start("x.mp3"),
            Err(LetterError::Playback(_))
        ));
    }
}
