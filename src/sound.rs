//! Deck sound system: short synthesized beeps, nothing embedded.
//!
//! Compiled out entirely unless the `sound` cargo feature is on. Even then
//! every failure is soft: no output device means silence, never an error.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beep {
    Navigate,
    Unlock,
    Error,
    Boot,
}

/// Fire-and-forget on a background thread. `muted` is the persisted
/// preference; the caller reads it so this module stays stateless.
pub fn play(beep: Beep, muted: bool) {
    if muted {
        return;
    }
    backend::spawn(beep);
}

#[cfg(feature = "sound")]
mod backend {
    use super::Beep;
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, Sink};
    use std::time::Duration;

    fn tones(beep: Beep) -> &'static [(f32, u64)] {
        // (frequency Hz, duration ms)
        match beep {
            Beep::Navigate => &[(880.0, 25)],
            Beep::Unlock => &[(660.0, 60), (880.0, 60), (1100.0, 90)],
            Beep::Error => &[(220.0, 120)],
            Beep::Boot => &[(440.0, 80), (660.0, 80)],
        }
    }

    pub fn spawn(beep: Beep) {
        std::thread::spawn(move || {
            let _ = play_tones(tones(beep));
        });
    }

    fn play_tones(tones: &[(f32, u64)]) -> anyhow::Result<()> {
        // Keep _stream alive for the full duration — dropping it stops audio.
        let (_stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        for &(freq, ms) in tones {
            let src = SineWave::new(freq)
                .take_duration(Duration::from_millis(ms))
                .amplify(0.15);
            sink.append(src);
        }
        sink.sleep_until_end();
        Ok(())
    }
}

#[cfg(not(feature = "sound"))]
mod backend {
    use super::Beep;

    pub fn spawn(_beep: Beep) {}
}
