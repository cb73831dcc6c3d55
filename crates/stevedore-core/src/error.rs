use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Image substitution ──
    #[error("container '{container}' references image '{image}', which no image step produced")]
    MissingImageMapping { container: String, image: String },

    #[error("container '{container}' has no string `image` field")]
    MissingImageField { container: String },
}
