//! Scan controller
//!
//! Ties the camera, the scan loop and the classifier into the state machine
//! the scanner screen runs:
//!
//! ```text
//! Idle --start--> Scanning --decode--> Paused(result) --rescan--> Scanning
//!                    \___________________ stop ___________________/--> Stopped
//! ```

use crate::camera::{CameraDevice, Capability, ControlOutcome, Facing, MediaBackend, SessionState};
use crate::error::{Error, Result};
use crate::models::{Action, DecodedResult, PixelBuffer};
use crate::scan::{DecodeOutcome, Decoder, ScanLoop, TickOutcome, decode_once};
use chrono::Utc;
use tracing::{debug, info, warn};

/// User-visible scan state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing started, or the last start was denied
    Idle,
    /// Camera live, loop sampling
    Scanning,
    /// A code was read; the loop is stopped, the camera stays open
    Paused(DecodedResult),
    /// Loop stopped and camera released
    Stopped,
}

/// Scanner state machine over a camera backend and a decoder
pub struct Controller<B: MediaBackend, D: Decoder> {
    camera: CameraDevice<B>,
    scan: ScanLoop,
    decoder: D,
    state: ScanState,
    facing: Facing,
}

impl<B: MediaBackend, D: Decoder> Controller<B, D> {
    /// Idle controller
    pub fn new(backend: B, decoder: D) -> Self {
        Self::with_loop(backend, decoder, ScanLoop::new())
    }

    /// Idle controller driving a preconfigured scan loop
    pub fn with_loop(backend: B, decoder: D, scan: ScanLoop) -> Self {
        Self {
            camera: CameraDevice::new(backend),
            scan,
            decoder,
            state: ScanState::Idle,
            facing: Facing::default(),
        }
    }

    /// Current scan state
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// Session state of the camera
    pub fn session(&self) -> &SessionState {
        self.camera.state()
    }

    /// The camera device
    pub fn camera(&self) -> &CameraDevice<B> {
        &self.camera
    }

    /// The scan loop
    pub fn scan_loop(&self) -> &ScanLoop {
        &self.scan
    }

    /// Facing direction used by the next request
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Request the camera facing `facing` and start scanning.
    ///
    /// A denial leaves the controller `Idle`; the reason stays visible
    /// through [`session`](Self::session).
    pub fn start(&mut self, facing: Facing) -> Result<()> {
        self.scan.stop();
        self.facing = facing;
        self.open_and_scan()
    }

    fn open_and_scan(&mut self) -> Result<()> {
        match self.camera.request_stream(self.facing) {
            SessionState::Granted(_) => {
                self.scan.start();
                self.state = ScanState::Scanning;
                info!(facing = %self.facing, "scanning");
                Ok(())
            }
            SessionState::Denied(reason) => {
                let reason = reason.clone();
                self.state = ScanState::Idle;
                Err(Error::PermissionDenied(reason))
            }
            SessionState::Unrequested | SessionState::Requesting => {
                self.state = ScanState::Idle;
                Err(Error::InvalidState("camera request did not settle"))
            }
        }
    }

    /// Run one display frame. Returns the result when this frame produced one.
    pub fn pump(&mut self) -> Option<&DecodedResult> {
        if self.state != ScanState::Scanning {
            return None;
        }
        match self.scan.on_display_frame(&mut self.camera, &mut self.decoder) {
            TickOutcome::Decoded(text) => {
                let result = DecodedResult::new(text, Utc::now());
                info!(action = result.action().as_str(), "code scanned");
                self.state = ScanState::Paused(result);
                self.result()
            }
            _ => None,
        }
    }

    /// Result being shown, while paused
    pub fn result(&self) -> Option<&DecodedResult> {
        match &self.state {
            ScanState::Paused(result) => Some(result),
            _ => None,
        }
    }

    /// Follow-up to offer for the paused result
    pub fn recommended_action(&self) -> Option<Action> {
        self.result().map(DecodedResult::action)
    }

    /// Drop the result and resume scanning on the open session
    pub fn rescan(&mut self) -> Result<()> {
        if !matches!(self.state, ScanState::Paused(_)) {
            return Err(Error::InvalidState("rescan requires a paused scan"));
        }
        if !self.camera.state().is_granted() {
            return Err(Error::InvalidState("no camera session to resume"));
        }
        self.scan.start();
        self.state = ScanState::Scanning;
        debug!("rescanning");
        Ok(())
    }

    /// Flip between the user and environment cameras.
    ///
    /// While scanning the old session is torn down, the new one requested
    /// and the loop restarted. While paused the device is switched but the
    /// result stays on screen. Otherwise only the preference changes.
    pub fn switch_facing(&mut self) -> Result<Facing> {
        self.facing = self.facing.toggled();
        match self.state {
            ScanState::Scanning => {
                self.scan.stop();
                self.camera.release();
                self.open_and_scan()?;
            }
            ScanState::Paused(_) => {
                if let SessionState::Denied(reason) = self.camera.switch_facing(self.facing) {
                    let reason = reason.clone();
                    warn!(facing = %self.facing, "switch while paused was denied");
                    return Err(Error::PermissionDenied(reason));
                }
            }
            ScanState::Idle | ScanState::Stopped => {}
        }
        Ok(self.facing)
    }

    /// Turn the torch on or off
    pub fn set_torch(&mut self, on: bool) -> Result<()> {
        control_result(self.camera.set_torch(on))
    }

    /// Invert the torch. Returns the new torch state.
    pub fn toggle_torch(&mut self) -> Result<bool> {
        let on = !self.camera.torch_on();
        self.set_torch(on)?;
        Ok(on)
    }

    /// Set the zoom level. Returns the level actually applied.
    pub fn set_zoom(&mut self, level: f64) -> Result<f64> {
        control_result(self.camera.set_zoom(level))?;
        self.camera
            .zoom()
            .ok_or(Error::UnsupportedCapability(Capability::Zoom))
    }

    /// Decode a still image. Scan and session state are left untouched.
    pub fn decode_image(&mut self, image: &PixelBuffer) -> Result<DecodedResult> {
        match decode_once(image, &mut self.decoder) {
            DecodeOutcome::Decoded(text) => Ok(DecodedResult::new(text, Utc::now())),
            DecodeOutcome::NoCode => Err(Error::NoCodeFound),
        }
    }

    /// Stop the loop and release the camera
    pub fn stop(&mut self) {
        self.scan.stop();
        self.camera.release();
        if self.state != ScanState::Stopped {
            debug!("scanner stopped");
        }
        self.state = ScanState::Stopped;
    }
}

fn control_result(outcome: ControlOutcome) -> Result<()> {
    match outcome {
        ControlOutcome::Applied => Ok(()),
        ControlOutcome::Unsupported(capability) => Err(Error::UnsupportedCapability(capability)),
        ControlOutcome::Failed(message) => Err(Error::ControlFailed(message)),
    }
}
