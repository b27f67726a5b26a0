//! Errors at the application boundary.
//!
//! The gesture and morph cores are total; only window creation, files and
//! user-supplied configuration can fail.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("window error: {0}")]
    Window(String),

    #[error("config {}: {source}", path.display())]
    ConfigIo {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {}: {source}", path.display())]
    ConfigParse {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("replay {}: {source}", path.display())]
    Replay {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid color {0:?}, expected #rrggbb")]
    Color(String),

    #[error("unknown template {name:?}, expected one of: {known}")]
    UnknownTemplate { name: String, known: String },
}
