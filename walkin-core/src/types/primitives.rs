use serde::{Deserialize, Serialize};

/// Identity of one simulated person contending for the resource.
pub type ActorId = usize;

/// Whether the resource advertises its lock state ("vacant" / "occupied").
///
/// Set once per run before any actor starts and only read afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalingMode {
    /// No markings on the door
    #[default]
    Off,
    /// The door shows whether it is locked
    On,
}

impl SignalingMode {
    pub fn is_on(self) -> bool {
        self == SignalingMode::On
    }
}

impl From<bool> for SignalingMode {
    fn from(on: bool) -> Self {
        if on { SignalingMode::On } else { SignalingMode::Off }
    }
}

impl std::fmt::Display for SignalingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalingMode::Off => write!(f, "OFF"),
            SignalingMode::On => write!(f, "ON"),
        }
    }
}

/// What happened to a failed acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailedAttempt {
    /// The door read unlocked while someone was inside
    WalkIn,
    /// The door read locked; an ordinary contested failure
    Locked,
}
