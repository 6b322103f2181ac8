use formats::OptionsError;
use layers::{ColorParseError, SurfaceError};

/// Why the geometry never arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request failed or returned a non-success status.
    Fetch(String),
    /// The body was not a usable geometry document.
    Decode(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Fetch(msg) => write!(f, "geometry fetch failed: {msg}"),
            LoadError::Decode(msg) => write!(f, "geometry could not be decoded: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetError {
    Load(LoadError),
    InvalidOptions(OptionsError),
    InvalidColor(ColorParseError),
    Surface(SurfaceError),
    Disposed,
}

impl std::fmt::Display for WidgetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WidgetError::Load(e) => write!(f, "{e}"),
            WidgetError::InvalidOptions(e) => write!(f, "{e}"),
            WidgetError::InvalidColor(e) => write!(f, "invalid color setting: {e}"),
            WidgetError::Surface(e) => write!(f, "{e}"),
            WidgetError::Disposed => write!(f, "widget has been disposed"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WidgetError::Load(e) => Some(e),
            WidgetError::InvalidOptions(e) => Some(e),
            WidgetError::InvalidColor(e) => Some(e),
            WidgetError::Surface(e) => Some(e),
            WidgetError::Disposed => None,
        }
    }
}

impl From<LoadError> for WidgetError {
    fn from(e: LoadError) -> Self {
        WidgetError::Load(e)
    }
}

impl From<SurfaceError> for WidgetError {
    fn from(e: SurfaceError) -> Self {
        WidgetError::Surface(e)
    }
}

impl From<ColorParseError> for WidgetError {
    fn from(e: ColorParseError) -> Self {
        WidgetError::InvalidColor(e)
    }
}

impl From<OptionsError> for WidgetError {
    fn from(e: OptionsError) -> Self {
        WidgetError::InvalidOptions(e)
    }
}
