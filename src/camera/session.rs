use std::fmt;
use std::str::FromStr;

/// Which physical camera a session targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    /// Front camera
    User,
    /// Rear camera
    #[default]
    Environment,
}

impl Facing {
    /// The other camera
    pub fn toggled(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }

    /// Platform name of the facing mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::User => "user",
            Facing::Environment => "environment",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(Facing::User),
            "environment" | "rear" | "back" => Ok(Facing::Environment),
            other => Err(format!("unknown facing direction '{other}'")),
        }
    }
}

/// Inclusive zoom bounds reported by the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    min: f64,
    max: f64,
}

impl ZoomRange {
    /// Build a range; bounds are swapped if given in the wrong order
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Lower bound
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a requested level into the range. NaN maps to the minimum.
    pub fn clamp(&self, level: f64) -> f64 {
        if level.is_nan() {
            return self.min;
        }
        level.clamp(self.min, self.max)
    }
}

/// What the active device offers, probed once when the stream is acquired
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceCapabilities {
    /// Torch (flash) can be toggled
    pub torch_supported: bool,
    /// Optical/digital zoom bounds, if zoom is offered
    pub zoom_range: Option<ZoomRange>,
}

/// Why a stream request ended in `Denied`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    /// The platform has no capture capability
    Unavailable,
    /// The user or platform refused access
    Refused,
    /// The device could not be opened
    Failed(String),
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::Unavailable => f.write_str("camera not available on this platform"),
            DenialReason::Refused => f.write_str("camera permission refused"),
            DenialReason::Failed(msg) => write!(f, "camera failed to start: {msg}"),
        }
    }
}

/// Lifecycle of the single capture session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No stream requested, or the previous one was released
    Unrequested,
    /// Waiting for the platform to answer
    Requesting,
    /// Stream live
    Granted(DeviceCapabilities),
    /// Request failed; terminal until the user retries
    Denied(DenialReason),
}

impl SessionState {
    /// True while a stream is attached
    pub fn is_granted(&self) -> bool {
        matches!(self, SessionState::Granted(_))
    }
}

/// Device controls that may be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Flashlight
    Torch,
    /// Zoom
    Zoom,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Torch => f.write_str("flash"),
            Capability::Zoom => f.write_str("zoom"),
        }
    }
}

/// Result of a torch or zoom request
#[derive(Debug, Clone, PartialEq)]
pub enum ControlOutcome {
    /// The constraint is now in effect
    Applied,
    /// The device does not offer this control; nothing changed
    Unsupported(Capability),
    /// The device offers it but rejected the change
    Failed(String),
}
