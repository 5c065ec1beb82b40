/// Convenience result type used across tableau.
pub type TableauResult<T> = Result<T, TableauError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TableauError {
    /// Scene wiring or precondition violation (duplicate playback, dangling visual reference).
    #[error("scene error: {0}")]
    Scene(String),

    /// Geometry that cannot answer the requested query.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Failure reported by a playback facility while playing a step.
    #[error("playback error: {0}")]
    Playback(String),

    /// Invalid configuration values.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies, IO or entity code.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TableauError {
    /// Build a [`TableauError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`TableauError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`TableauError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`TableauError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TableauError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Short class name used in abort diagnostics.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Scene(_) => "SceneError",
            Self::Geometry(_) => "GeometryError",
            Self::Playback(_) => "PlaybackError",
            Self::Config(_) => "ConfigError",
            Self::Serde(_) => "SerdeError",
            Self::Other(_) => "Error",
        }
    }
}

impl From<serde_json::Error> for TableauError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
