use cubescape_common::CameraMode;
use std::fmt;
use std::str::FromStr;

/// A discrete command produced by any input source (keyboard, script, ...).
///
/// The state machine consumes events, never raw input. This keeps key
/// bindings out of the transition logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Advance to the next scene, wrapping around.
    NextScene,
    /// Go back to the previous scene, wrapping around.
    PrevScene,
    /// Jump to scene `n`. Out-of-range values are ignored.
    SelectScene(usize),
    /// Switch camera strategy.
    SelectCamera(CameraMode),
    /// Next entry of the rate-cap table, wrapping around.
    RaiseRateCap,
    /// Previous entry of the rate-cap table, wrapping around.
    LowerRateCap,
    /// End the run loop.
    Quit,
}

/// Errors from parsing the textual event form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEventError {
    #[error("unknown event `{0}`")]
    Unknown(String),
    #[error("invalid scene number `{0}`")]
    InvalidScene(String),
    #[error("unknown camera mode `{0}`")]
    UnknownCamera(String),
}

impl FromStr for InputEvent {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(n) = s.strip_prefix("scene:") {
            return n
                .parse()
                .map(Self::SelectScene)
                .map_err(|_| ParseEventError::InvalidScene(n.to_string()));
        }
        if let Some(mode) = s.strip_prefix("camera:") {
            return CameraMode::from_short_name(mode)
                .map(Self::SelectCamera)
                .ok_or_else(|| ParseEventError::UnknownCamera(mode.to_string()));
        }
        match s {
            "next" => Ok(Self::NextScene),
            "prev" => Ok(Self::PrevScene),
            "raise" => Ok(Self::RaiseRateCap),
            "lower" => Ok(Self::LowerRateCap),
            "quit" => Ok(Self::Quit),
            other => Err(ParseEventError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextScene => f.write_str("next"),
            Self::PrevScene => f.write_str("prev"),
            Self::SelectScene(n) => write!(f, "scene:{n}"),
            Self::SelectCamera(mode) => write!(f, "camera:{}", mode.short_name()),
            Self::RaiseRateCap => f.write_str("raise"),
            Self::LowerRateCap => f.write_str("lower"),
            Self::Quit => f.write_str("quit"),
        }
    }
}

/// Parse a comma-separated script such as `next,next,camera:orbit,quit`.
///
/// An empty item (`next,,quit`) is an idle tick with no event, so scripts can
/// space events out over time.
pub fn parse_script(script: &str) -> Result<Vec<Option<InputEvent>>, ParseEventError> {
    script
        .split(',')
        .map(|item| {
            let item = item.trim();
            if item.is_empty() {
                Ok(None)
            } else {
                item.parse().map(Some)
            }
        })
        .collect()
}
