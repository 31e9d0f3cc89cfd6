use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    SettingsParse(#[from] toml::de::Error),

    #[error("Settings encode error: {0}")]
    SettingsEncode(#[from] toml::ser::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Scan task failed: {0}")]
    ScanTask(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
