//! Live scan loop
//!
//! The loop is driven by the platform's display callback. Every fired tick
//! samples the current camera frame into a reused buffer, submits it to the
//! [`Decoder`], and either reschedules or stops on the first successful
//! read. There is never more than one decode outstanding; a display frame
//! that arrives while one is in flight is dropped.
//!
//! Cancellation is generation based. `start` and `stop` bump the
//! generation, and a tick (or a late decode result) carrying an older
//! generation is discarded before it can deliver anything.

/// Decode capability and still-image submission
pub mod decode;
/// Cancellable tick scheduling
pub mod scheduler;

pub use decode::{DecodeOutcome, Decoder, RqrrDecoder, decode_once};
pub use scheduler::{TickHandle, TickScheduler};

use crate::models::Frame;
use crate::utils::memory_pool::{AllocationStats, FramePool};
use tracing::{debug, trace, warn};

/// Anything that can hand the loop its latest frame
pub trait FrameSource {
    /// The latest frame, or `None` when no fresh frame is ready
    fn poll_frame(&mut self) -> Option<Frame<'_>>;
}

/// Loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not scheduling work
    Stopped,
    /// A tick is pending
    Scheduled,
    /// A frame has been submitted and its result is outstanding
    Sampling,
}

/// What a display frame did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No tick was due
    Idle,
    /// The tick belonged to a cancelled run and was dropped
    Stale,
    /// A decode is still outstanding; this display frame was skipped
    Coalesced,
    /// No usable frame yet (none ready, or fewer pixels than its size
    /// claims); rescheduled
    NoFrame,
    /// The frame held no symbol; rescheduled
    NoCode,
    /// A symbol was read; the loop is now stopped
    Decoded(String),
}

/// A frame taken by [`ScanLoop::begin_tick`], waiting for its decode result
#[derive(Debug)]
pub enum Sample<'a> {
    /// Submit `frame` and report back with `handle`
    Ready {
        /// Ticket to pass to [`ScanLoop::finish_tick`]
        handle: TickHandle,
        /// Copy of the camera frame at native resolution
        frame: Frame<'a>,
    },
    /// Nothing to decode on this display frame
    Skipped(TickOutcome),
}

/// Cooperative per-frame scan loop
#[derive(Debug)]
pub struct ScanLoop {
    state: LoopState,
    generation: u64,
    scheduler: TickScheduler,
    pool: FramePool,
}

impl ScanLoop {
    /// Stopped loop with a default-sized frame buffer
    pub fn new() -> Self {
        Self::with_pool(FramePool::new())
    }

    /// Stopped loop reusing `pool` for frame samples
    pub fn with_pool(pool: FramePool) -> Self {
        Self {
            state: LoopState::Stopped,
            generation: 0,
            scheduler: TickScheduler::new(),
            pool,
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Current generation token
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the loop is scheduling work
    pub fn is_running(&self) -> bool {
        self.state != LoopState::Stopped
    }

    /// Frame buffer reuse counters for the current run
    pub fn buffer_stats(&self) -> &AllocationStats {
        self.pool.stats()
    }

    /// Begin a fresh run. Any previous run is cancelled and the frame
    /// buffer is reset.
    pub fn start(&mut self) {
        self.generation += 1;
        self.scheduler.cancel_all();
        self.pool.clear();
        self.state = LoopState::Scheduled;
        self.scheduler.schedule(self.generation);
        debug!(generation = self.generation, "scan loop started");
    }

    /// Cancel the pending tick and any outstanding decode. Idempotent.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.generation += 1;
        self.scheduler.cancel_all();
        self.state = LoopState::Stopped;
        debug!(generation = self.generation, "scan loop stopped");
    }

    /// Run one display frame synchronously: sample, decode, settle.
    pub fn on_display_frame<S, D>(&mut self, source: &mut S, decoder: &mut D) -> TickOutcome
    where
        S: FrameSource + ?Sized,
        D: Decoder + ?Sized,
    {
        let (handle, outcome) = match self.begin_tick(source) {
            Sample::Ready { handle, frame } => (handle, decoder.decode(frame)),
            Sample::Skipped(outcome) => return outcome,
        };
        self.finish_tick(handle, outcome)
    }

    /// First half of a tick: take the due tick and sample a frame.
    ///
    /// Platforms that decode off the display callback call this, submit
    /// the frame, and later hand the answer to [`finish_tick`](Self::finish_tick).
    pub fn begin_tick<S>(&mut self, source: &mut S) -> Sample<'_>
    where
        S: FrameSource + ?Sized,
    {
        if self.state == LoopState::Sampling {
            trace!("display frame dropped, decode outstanding");
            return Sample::Skipped(TickOutcome::Coalesced);
        }
        let Some(handle) = self.scheduler.take_due() else {
            return Sample::Skipped(TickOutcome::Idle);
        };
        if handle.generation() != self.generation || self.state != LoopState::Scheduled {
            trace!(tick = handle.id(), "stale tick dropped");
            return Sample::Skipped(TickOutcome::Stale);
        }

        let Some(frame) = source.poll_frame() else {
            self.scheduler.schedule(self.generation);
            return Sample::Skipped(TickOutcome::NoFrame);
        };
        let (width, height, len) = (frame.width, frame.height, frame.rgba.len());
        match self.pool.fill_from(frame) {
            Some(frame) => {
                self.state = LoopState::Sampling;
                Sample::Ready { handle, frame }
            }
            None => {
                warn!(width, height, len, "short frame dropped");
                self.scheduler.schedule(self.generation);
                Sample::Skipped(TickOutcome::NoFrame)
            }
        }
    }

    /// Second half of a tick: act on the decoder's answer.
    ///
    /// Results for a run that has since been stopped or restarted are
    /// dropped and reported as [`TickOutcome::Stale`].
    pub fn finish_tick(&mut self, handle: TickHandle, outcome: DecodeOutcome) -> TickOutcome {
        if handle.generation() != self.generation || self.state != LoopState::Sampling {
            trace!(tick = handle.id(), "late decode result dropped");
            return TickOutcome::Stale;
        }
        match outcome {
            DecodeOutcome::Decoded(text) => {
                self.state = LoopState::Stopped;
                debug!(tick = handle.id(), "code decoded, loop stopped");
                TickOutcome::Decoded(text)
            }
            DecodeOutcome::NoCode => {
                self.state = LoopState::Scheduled;
                self.scheduler.schedule(self.generation);
                TickOutcome::NoCode
            }
        }
    }
}

impl Default for ScanLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for crate::models::PixelBuffer {
    fn poll_frame(&mut self) -> Option<Frame<'_>> {
        Some(self.as_frame())
    }
}
