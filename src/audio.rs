//! Queued PCM playback.
//!
//! [`AudioDevice`] sits in front of a platform [`VoiceSink`] (an XAudio2 source
//! voice, a waveOut queue, ...). Callers hand it fixed-size buffers of signed
//! 8-bit mono samples once per frame and watch [`AudioDevice::buffers_queued`]
//! to decide whether to produce another one.

use crate::config::AudioConfig;
use crate::error::{Error, Result};
use tracing::{debug, trace};

/// Platform voice that plays unsigned 8-bit mono PCM.
pub trait VoiceSink {
    /// Queue one buffer. The data is copied before this returns.
    fn submit(&mut self, pcm: &[u8]) -> Result<()>;
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn buffers_queued(&self) -> u32;
    fn set_volume(&mut self, volume: f32);
    fn volume(&self) -> f32;
}

pub struct AudioDevice<V> {
    voice: V,
    config: AudioConfig,
    started: bool,
    scratch: Vec<u8>,
}

impl<V: VoiceSink> AudioDevice<V> {
    pub fn new(voice: V, config: AudioConfig) -> Self {
        Self {
            voice,
            scratch: Vec::with_capacity(config.buffer_len),
            config,
            started: false,
        }
    }

    /// Queue a buffer of signed samples; the voice is started on the first submit.
    ///
    /// An empty buffer is ignored. A buffer whose length differs from the
    /// configured `buffer_len` is rejected before anything reaches the voice.
    pub fn submit(&mut self, samples: &[u8]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }
        let expected = self.config.buffer_len;
        if expected != 0 && samples.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "audio buffer must be {expected} bytes, got {}",
                samples.len()
            )));
        }

        self.scratch.clear();
        self.scratch.extend(samples.iter().map(|&s| s | 0x80));
        self.voice.submit(&self.scratch)?;
        trace!(len = samples.len(), "audio buffer queued");

        if !self.started {
            self.voice.start()?;
            self.started = true;
            debug!("audio voice started");
        }
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        if self.started {
            self.voice.stop()?;
            self.started = false;
            debug!("audio voice stopped");
        }
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn buffers_queued(&self) -> u32 {
        self.voice.buffers_queued()
    }

    /// `true` once the queue holds `max_queued` buffers or more.
    pub fn is_saturated(&self) -> bool {
        self.buffers_queued() >= self.config.max_queued
    }

    pub fn volume(&self) -> f32 {
        self.voice.volume()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.voice.set_volume(volume.clamp(0.0, 1.0));
    }

    /// Stop playback and hand the voice back.
    pub fn close(mut self) -> Result<V> {
        self.stop()?;
        Ok(self.voice)
    }
}
