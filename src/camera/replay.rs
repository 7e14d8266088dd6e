//! Replay media backend
//!
//! Serves prerecorded frames as if they came from a camera. The CLI uses it
//! to run the live-scan pipeline over a directory of images, and tests use
//! it to observe track lifecycles through [`TrackProbe`]s.

use super::backend::{Constraint, MediaBackend, MediaStream, TrackError, VideoTrack};
use super::session::{DenialReason, DeviceCapabilities, Facing};
use crate::error::Result;
use crate::models::{Frame, PixelBuffer};
use crate::tools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

/// How the simulated permission prompt is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessPolicy {
    /// Access granted
    #[default]
    Grant,
    /// The user refuses
    Refuse,
    /// The platform has no camera API
    Unavailable,
}

#[derive(Debug, Default)]
struct TrackStatus {
    live: bool,
    torch: bool,
    zoom: Option<f64>,
}

/// Observer handle on one opened track, kept by the backend
#[derive(Debug, Clone)]
pub struct TrackProbe {
    facing: Facing,
    status: Rc<RefCell<TrackStatus>>,
}

impl TrackProbe {
    /// Facing direction the track was opened for
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the track has not been stopped
    pub fn is_live(&self) -> bool {
        self.status.borrow().live
    }

    /// Last torch state applied
    pub fn torch(&self) -> bool {
        self.status.borrow().torch
    }

    /// Last zoom level applied
    pub fn zoom(&self) -> Option<f64> {
        self.status.borrow().zoom
    }
}

/// [`MediaBackend`] that replays in-memory frames
#[derive(Debug, Default)]
pub struct ReplayBackend {
    feeds: HashMap<Facing, Rc<[PixelBuffer]>>,
    policy: AccessPolicy,
    capabilities: DeviceCapabilities,
    warmup_polls: usize,
    probes: Vec<TrackProbe>,
}

impl ReplayBackend {
    /// Backend with no feeds, granting access, offering no torch or zoom
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every image under `dir` as the feed for `facing`
    pub fn from_dir<P: AsRef<Path>>(dir: P, facing: Facing, max_dim: Option<u32>) -> Result<Self> {
        let frames = tools::collect_images(dir.as_ref())
            .iter()
            .map(|path| tools::load_rgba(path, max_dim))
            .collect::<Result<Vec<_>>>()?;
        debug!(frames = frames.len(), %facing, "loaded replay feed");
        Ok(Self::new().with_frames(facing, frames))
    }

    /// Frames served, in a loop, by the camera facing `facing`
    pub fn with_frames(mut self, facing: Facing, frames: Vec<PixelBuffer>) -> Self {
        self.feeds.insert(facing, frames.into());
        self
    }

    /// Answer to the permission prompt
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Capabilities every opened track reports
    pub fn with_capabilities(mut self, capabilities: DeviceCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Number of polls a new track answers with "no frame yet"
    pub fn with_warmup(mut self, polls: usize) -> Self {
        self.warmup_polls = polls;
        self
    }

    /// Change the prompt answer for later requests
    pub fn set_policy(&mut self, policy: AccessPolicy) {
        self.policy = policy;
    }

    /// One probe per track ever opened, oldest first
    pub fn probes(&self) -> &[TrackProbe] {
        &self.probes
    }

    /// Tracks opened and not yet stopped
    pub fn live_tracks(&self) -> usize {
        self.probes.iter().filter(|p| p.is_live()).count()
    }

    fn feed_for(&self, facing: Facing) -> Option<Rc<[PixelBuffer]>> {
        // Like a browser honoring a non-exact facing constraint, fall back to
        // whichever camera exists.
        self.feeds
            .get(&facing)
            .or_else(|| self.feeds.get(&facing.toggled()))
            .cloned()
    }
}

impl MediaBackend for ReplayBackend {
    fn open(&mut self, facing: Facing) -> std::result::Result<MediaStream, DenialReason> {
        match self.policy {
            AccessPolicy::Grant => {}
            AccessPolicy::Refuse => return Err(DenialReason::Refused),
            AccessPolicy::Unavailable => return Err(DenialReason::Unavailable),
        }
        let frames = self.feed_for(facing).ok_or(DenialReason::Unavailable)?;

        let status = Rc::new(RefCell::new(TrackStatus {
            live: true,
            ..TrackStatus::default()
        }));
        self.probes.push(TrackProbe {
            facing,
            status: Rc::clone(&status),
        });

        let track = ReplayTrack {
            label: format!("replay {facing} camera"),
            frames,
            cursor: 0,
            warmup: self.warmup_polls,
            capabilities: self.capabilities,
            status,
        };
        Ok(MediaStream::new(vec![Box::new(track)]))
    }
}

struct ReplayTrack {
    label: String,
    frames: Rc<[PixelBuffer]>,
    cursor: usize,
    warmup: usize,
    capabilities: DeviceCapabilities,
    status: Rc<RefCell<TrackStatus>>,
}

impl VideoTrack for ReplayTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    fn apply(&mut self, constraint: Constraint) -> std::result::Result<(), TrackError> {
        if !self.is_live() {
            return Err(TrackError("track ended".into()));
        }
        let mut status = self.status.borrow_mut();
        match constraint {
            Constraint::Torch(on) if self.capabilities.torch_supported => status.torch = on,
            Constraint::Zoom(level) if self.capabilities.zoom_range.is_some() => {
                status.zoom = Some(level)
            }
            other => return Err(TrackError(format!("{other:?} not supported"))),
        }
        Ok(())
    }

    fn poll_frame(&mut self) -> Option<Frame<'_>> {
        if !self.is_live() || self.frames.is_empty() {
            return None;
        }
        if self.warmup > 0 {
            self.warmup -= 1;
            return None;
        }
        let idx = self.cursor % self.frames.len();
        self.cursor += 1;
        Some(self.frames[idx].as_frame())
    }

    fn is_live(&self) -> bool {
        self.status.borrow().live
    }

    fn stop(&mut self) {
        let mut status = self.status.borrow_mut();
        status.live = false;
        status.torch = false;
    }
}
