//! Camera device management
//!
//! [`CameraDevice`] owns at most one media stream at a time. It negotiates
//! access through a [`MediaBackend`], probes capabilities once per stream,
//! applies torch and zoom constraints, and guarantees that switching
//! cameras never leaves a stale track running.

/// Platform media traits
pub mod backend;
/// Prerecorded-frame backend
pub mod replay;
/// Session state and capability types
pub mod session;

pub use backend::{Constraint, MediaBackend, MediaStream, TrackError, VideoTrack};
pub use replay::{AccessPolicy, ReplayBackend, TrackProbe};
pub use session::{
    Capability, ControlOutcome, DenialReason, DeviceCapabilities, Facing, SessionState, ZoomRange,
};

use crate::models::Frame;
use crate::scan::FrameSource;
use tracing::{debug, info, warn};

/// Exclusive owner of the active capture stream
pub struct CameraDevice<B: MediaBackend> {
    backend: B,
    state: SessionState,
    stream: Option<MediaStream>,
    facing: Facing,
    torch_on: bool,
    zoom: Option<f64>,
}

impl<B: MediaBackend> CameraDevice<B> {
    /// Device with no session, defaulting to the rear camera
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: SessionState::Unrequested,
            stream: None,
            facing: Facing::default(),
            torch_on: false,
            zoom: None,
        }
    }

    /// Current session state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Facing direction of the current (or last requested) session
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Platform backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable platform backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Request a stream from the camera facing `facing`.
    ///
    /// Any stream already held is released first. Failure is recorded as
    /// [`SessionState::Denied`], never returned as an error.
    pub fn request_stream(&mut self, facing: Facing) -> &SessionState {
        if self.stream.is_some() {
            self.release();
        }
        self.facing = facing;
        self.state = SessionState::Requesting;
        debug!(%facing, "requesting camera stream");

        self.state = match self.backend.open(facing) {
            Ok(mut stream) => {
                // Probe once; later queries read the stored value.
                let probed = stream
                    .video_track()
                    .map(|t| (t.capabilities(), t.label().to_string()));
                match probed {
                    Some((capabilities, label)) => {
                        info!(
                            %facing,
                            device = %label,
                            torch = capabilities.torch_supported,
                            zoom = capabilities.zoom_range.is_some(),
                            "camera stream granted"
                        );
                        self.stream = Some(stream);
                        SessionState::Granted(capabilities)
                    }
                    None => {
                        stream.stop_all();
                        warn!(%facing, "camera stream has no video track");
                        SessionState::Denied(DenialReason::Unavailable)
                    }
                }
            }
            Err(reason) => {
                warn!(%facing, %reason, "camera stream denied");
                SessionState::Denied(reason)
            }
        };
        &self.state
    }

    /// Capabilities of the granted session
    pub fn capabilities(&self) -> Option<DeviceCapabilities> {
        match &self.state {
            SessionState::Granted(caps) => Some(*caps),
            _ => None,
        }
    }

    /// Whether the torch is currently on
    pub fn torch_on(&self) -> bool {
        self.torch_on
    }

    /// Zoom level last applied (already clamped)
    pub fn zoom(&self) -> Option<f64> {
        self.zoom
    }

    /// Turn the torch on or off
    pub fn set_torch(&mut self, on: bool) -> ControlOutcome {
        if !self.capabilities().is_some_and(|c| c.torch_supported) {
            return ControlOutcome::Unsupported(Capability::Torch);
        }
        match self.apply(Constraint::Torch(on)) {
            ControlOutcome::Applied => {
                self.torch_on = on;
                ControlOutcome::Applied
            }
            other => other,
        }
    }

    /// Set the zoom level, clamped into the device range
    pub fn set_zoom(&mut self, level: f64) -> ControlOutcome {
        let Some(range) = self.capabilities().and_then(|c| c.zoom_range) else {
            return ControlOutcome::Unsupported(Capability::Zoom);
        };
        let clamped = range.clamp(level);
        match self.apply(Constraint::Zoom(clamped)) {
            ControlOutcome::Applied => {
                self.zoom = Some(clamped);
                ControlOutcome::Applied
            }
            other => other,
        }
    }

    fn apply(&mut self, constraint: Constraint) -> ControlOutcome {
        let Some(track) = self.stream.as_mut().and_then(|s| s.video_track_mut()) else {
            return ControlOutcome::Failed("no active track".into());
        };
        match track.apply(constraint) {
            Ok(()) => {
                debug!(?constraint, "constraint applied");
                ControlOutcome::Applied
            }
            Err(err) => {
                warn!(?constraint, error = %err, "constraint failed");
                ControlOutcome::Failed(err.to_string())
            }
        }
    }

    /// Stop every track and return to `Unrequested`. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop_all();
            debug!(facing = %self.facing, "camera stream released");
        }
        self.state = SessionState::Unrequested;
        self.torch_on = false;
        self.zoom = None;
    }

    /// Tear down the current stream, then request one facing `facing`
    pub fn switch_facing(&mut self, facing: Facing) -> &SessionState {
        self.release();
        self.request_stream(facing)
    }

    /// Live tracks attached to the current session
    pub fn live_tracks(&self) -> usize {
        self.stream.as_ref().map_or(0, |s| s.live_tracks())
    }
}

impl<B: MediaBackend> FrameSource for CameraDevice<B> {
    fn poll_frame(&mut self) -> Option<Frame<'_>> {
        self.stream.as_mut()?.video_track_mut()?.poll_frame()
    }
}

impl<B: MediaBackend> Drop for CameraDevice<B> {
    fn drop(&mut self) {
        self.release();
    }
}
