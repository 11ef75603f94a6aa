//! Audio output
//!
//! The simulation only knows about the [`AudioSink`] trait: start/stop the
//! background loop and fire one-shot cues. Sinks must swallow their own
//! failures; nothing here can block a mode transition.
//!
//! On wasm32 [`WebAudio`] synthesises everything with Web Audio
//! oscillators, no sound files needed.

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A point was scored
    Score,
    /// A side won the match
    Win,
}

/// Fire-and-forget audio triggers used by the simulation
pub trait AudioSink {
    /// Start (or resume) the background loop
    fn start_loop(&mut self);
    /// Stop the background loop
    fn stop_loop(&mut self);
    /// Play a one-shot cue
    fn play_once(&mut self, cue: Cue);
}

/// Sink that plays nothing (native builds, headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn start_loop(&mut self) {
        log::trace!("audio: start loop");
    }

    fn stop_loop(&mut self) {
        log::trace!("audio: stop loop");
    }

    fn play_once(&mut self, cue: Cue) {
        log::trace!("audio: play {:?}", cue);
    }
}

/// Records every call, for asserting side effects in tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingAudio {
    pub events: Vec<AudioEvent>,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AudioEvent {
    StartLoop,
    StopLoop,
    Play(Cue),
}

#[cfg(test)]
impl AudioSink for RecordingAudio {
    fn start_loop(&mut self) {
        self.events.push(AudioEvent::StartLoop);
    }

    fn stop_loop(&mut self) {
        self.events.push(AudioEvent::StopLoop);
    }

    fn play_once(&mut self, cue: Cue) {
        self.events.push(AudioEvent::Play(cue));
    }
}

/// Notes of the background arpeggio (A minor, Hz)
pub const LOOP_NOTES: [f32; 4] = [220.0, 261.63, 329.63, 261.63];
/// Seconds per arpeggio note
pub const LOOP_NOTE_LEN: f64 = 0.45;
/// How far ahead of the audio clock notes are queued
pub const LOOP_LOOKAHEAD: f64 = 2.0;

/// A loop note to queue at `start` (audio clock seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopNote {
    pub freq: f32,
    pub start: f64,
}

/// Rolling schedule for the background loop
///
/// The host tops it up every frame, so the loop plays for as long as the
/// match does.
#[derive(Debug, Clone)]
pub struct LoopSchedule {
    next_note: usize,
    next_time: f64,
}

impl LoopSchedule {
    pub fn new(start: f64) -> Self {
        Self {
            next_note: 0,
            next_time: start,
        }
    }

    /// Notes needed to keep the queue `LOOP_LOOKAHEAD` seconds ahead of `now`
    pub fn due(&mut self, now: f64) -> Vec<LoopNote> {
        // Frames stalled (hidden tab): restart from now rather than catching up
        if self.next_time < now {
            self.next_time = now;
        }
        let mut notes = Vec::new();
        while self.next_time < now + LOOP_LOOKAHEAD {
            notes.push(LoopNote {
                freq: LOOP_NOTES[self.next_note % LOOP_NOTES.len()],
                start: self.next_time,
            });
            self.next_note = (self.next_note + 1) % LOOP_NOTES.len();
            self.next_time += LOOP_NOTE_LEN;
        }
        notes
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::VecDeque;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, Cue, LOOP_NOTE_LEN, LoopSchedule};
    use crate::settings::Settings;

    /// A running background loop
    struct MusicLoop {
        /// Bus the loop voices are routed through
        bus: GainNode,
        /// Queued voices with their end times, oldest first
        voices: VecDeque<(OscillatorNode, f64)>,
        schedule: LoopSchedule,
    }

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        master_volume: f32,
        music_volume: f32,
        sfx_volume: f32,
        muted: bool,
        music: Option<MusicLoop>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                music_volume: 0.6,
                sfx_volume: 1.0,
                muted: false,
                music: None,
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.music_volume = settings.music_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.set_muted(settings.muted);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if let Some(music) = &self.music {
                music.bus.gain().set_value(self.music_level());
            }
        }

        /// Resume audio context (required after a user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Keep the background loop queued; call once per frame
        pub fn pump(&mut self) {
            let (Some(ctx), Some(music)) = (&self.ctx, &mut self.music) else {
                return;
            };
            let now = ctx.current_time();

            while music.voices.front().is_some_and(|(_, end)| *end < now) {
                music.voices.pop_front();
            }

            for note in music.schedule.due(now) {
                let Some((osc, gain)) =
                    Self::create_osc(ctx, &music.bus, note.freq, OscillatorType::Triangle)
                else {
                    log::warn!("Failed to queue loop note");
                    return;
                };
                let t = note.start;
                let end = t + LOOP_NOTE_LEN;
                gain.gain().set_value_at_time(0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + LOOP_NOTE_LEN * 0.9)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(end).ok();
                music.voices.push_back((osc, end));
            }
        }

        fn sfx_level(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn music_level(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.music_volume
            }
        }

        /// Create an oscillator routed through its own gain node into `dest`
        fn create_osc(
            ctx: &AudioContext,
            dest: &web_sys::AudioNode,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(dest).ok()?;

            Some((osc, gain))
        }

        /// Score - quick two-note blip
        fn play_score(ctx: &AudioContext, vol: f32) {
            let dest = ctx.destination();
            for (i, freq) in [520.0, 780.0].iter().enumerate() {
                let Some((osc, gain)) = Self::create_osc(ctx, &dest, *freq, OscillatorType::Square)
                else {
                    return;
                };
                let t = ctx.current_time() + i as f64 * 0.07;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }

        /// Win - rising fanfare
        fn play_win(ctx: &AudioContext, vol: f32) {
            let dest = ctx.destination();
            for (i, freq) in [523.25, 659.25, 783.99, 1046.5].iter().enumerate() {
                let Some((osc, gain)) =
                    Self::create_osc(ctx, &dest, *freq, OscillatorType::Triangle)
                else {
                    return;
                };
                let t = ctx.current_time() + i as f64 * 0.12;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.5)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.6).ok();
            }
        }
    }

    impl AudioSink for WebAudio {
        fn start_loop(&mut self) {
            if self.music.is_some() {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let Some(bus) = ctx.create_gain().ok() else { return };
            bus.gain().set_value(self.music_level());
            if bus.connect_with_audio_node(&ctx.destination()).is_err() {
                log::warn!("Failed to connect music bus");
                return;
            }

            let schedule = LoopSchedule::new(ctx.current_time());
            self.music = Some(MusicLoop {
                bus,
                voices: VecDeque::new(),
                schedule,
            });
            self.pump();
        }

        fn stop_loop(&mut self) {
            if let Some(music) = self.music.take() {
                for (osc, _) in music.voices {
                    osc.stop().ok();
                }
                let _ = music.bus.disconnect();
            }
        }

        fn play_once(&mut self, cue: Cue) {
            let vol = self.sfx_level();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            match cue {
                Cue::Score => Self::play_score(ctx, vol),
                Cue::Win => Self::play_win(ctx, vol),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_schedule_fills_lookahead() {
        let mut schedule = LoopSchedule::new(0.0);
        let notes = schedule.due(0.0);
        let expected = (LOOP_LOOKAHEAD / LOOP_NOTE_LEN).ceil() as usize;
        assert_eq!(notes.len(), expected);
        assert_eq!(notes[0], LoopNote { freq: LOOP_NOTES[0], start: 0.0 });
        assert!(notes.last().unwrap().start < LOOP_LOOKAHEAD);

        // Nothing new until the clock moves
        assert!(schedule.due(0.0).is_empty());
    }

    #[test]
    fn test_loop_schedule_runs_past_long_matches() {
        let mut schedule = LoopSchedule::new(0.0);
        let mut last_start = -1.0;
        let mut count = 0usize;
        // Ten minutes of 60 fps frames
        for frame in 0..36_000 {
            let now = frame as f64 / 60.0;
            for note in schedule.due(now) {
                assert!(note.start > last_start);
                assert_eq!(note.freq, LOOP_NOTES[count % LOOP_NOTES.len()]);
                last_start = note.start;
                count += 1;
            }
        }
        assert!(last_start > 600.0);
        assert!(last_start < 600.0 + LOOP_LOOKAHEAD);
    }

    #[test]
    fn test_loop_schedule_resyncs_after_stall() {
        let mut schedule = LoopSchedule::new(0.0);
        schedule.due(0.0);
        let notes = schedule.due(30.0);
        assert_eq!(notes.first().map(|n| n.start), Some(30.0));
        assert!(notes.iter().all(|n| n.start < 30.0 + LOOP_LOOKAHEAD));
    }
}
