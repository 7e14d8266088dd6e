use super::session::{DenialReason, DeviceCapabilities, Facing};
use crate::models::Frame;
use thiserror::Error;

/// A constraint applied to a live video track
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Torch on or off
    Torch(bool),
    /// Zoom level, already clamped to the device range
    Zoom(f64),
}

/// The track refused a constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("constraint rejected: {0}")]
pub struct TrackError(pub String);

/// One platform media track
pub trait VideoTrack {
    /// Human readable device label
    fn label(&self) -> &str;

    /// Raw capability probe. Called once, right after the stream is opened.
    fn capabilities(&self) -> DeviceCapabilities;

    /// Apply a constraint
    fn apply(&mut self, constraint: Constraint) -> Result<(), TrackError>;

    /// The most recent frame, or `None` if no fresh frame is ready yet
    fn poll_frame(&mut self) -> Option<Frame<'_>>;

    /// Whether the track is still producing
    fn is_live(&self) -> bool;

    /// Stop the track and release the device. Must be idempotent.
    fn stop(&mut self);
}

/// Platform media API
pub trait MediaBackend {
    /// Ask for a stream from the camera facing `facing`.
    ///
    /// May block until the user answers the permission prompt.
    fn open(&mut self, facing: Facing) -> Result<MediaStream, DenialReason>;
}

/// The set of tracks returned by one successful [`MediaBackend::open`]
pub struct MediaStream {
    tracks: Vec<Box<dyn VideoTrack>>,
}

impl MediaStream {
    /// Wrap the opened tracks; the first one is treated as the video track
    pub fn new(tracks: Vec<Box<dyn VideoTrack>>) -> Self {
        Self { tracks }
    }

    /// The primary video track
    pub fn video_track(&self) -> Option<&dyn VideoTrack> {
        self.tracks.first().map(|t| t.as_ref())
    }

    /// Mutable access to the primary video track
    pub fn video_track_mut(&mut self) -> Option<&mut (dyn VideoTrack + 'static)> {
        self.tracks.first_mut().map(|t| t.as_mut())
    }

    /// Tracks still producing
    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.is_live()).count()
    }

    /// Stop every track in the stream
    pub fn stop_all(&mut self) {
        for track in &mut self.tracks {
            track.stop();
        }
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("tracks", &self.tracks.len())
            .field("live", &self.live_tracks())
            .finish()
    }
}
