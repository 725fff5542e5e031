//! Session cookie settings.
//!
//! The identity service issues the session cookie; this service only has to
//! verify it, so it needs the same signing key and cookie attributes. Debug
//! builds tolerate missing pieces with a warning. Release builds refuse to
//! start with a weak or missing key unless ephemeral keys are explicitly
//! allowed.

use std::io;
use std::path::{Path, PathBuf};

use actix_web::cookie::{Key, SameSite};
use cap_std::{ambient_authority, fs::Dir};
use tracing::warn;
use zeroize::Zeroize;

use crate::config::RoadwatchSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
/// Shortest master key `Key::derive_from` accepts.
const DERIVABLE_KEY_MIN_LEN: usize = 32;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Session-related configuration values before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub key_file: PathBuf,
    pub allow_ephemeral: bool,
    /// Defaults to `true`.
    pub cookie_secure: Option<bool>,
    pub same_site: Option<String>,
}

impl From<&RoadwatchSettings> for SessionOptions {
    fn from(settings: &RoadwatchSettings) -> Self {
        Self {
            key_file: settings.session_key_file(),
            allow_ephemeral: settings.session_allow_ephemeral,
            cookie_secure: settings.session_cookie_secure,
            same_site: settings.session_same_site.clone(),
        }
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("invalid value for session_same_site='{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
}

/// Validate `options` for the given build mode.
///
/// # Examples
///
/// ```rust
/// use std::path::PathBuf;
///
/// use roadwatch::inbound::http::session_config::{BuildMode, SessionOptions, session_settings};
///
/// let options = SessionOptions {
///     key_file: PathBuf::from("/nonexistent/session_key"),
///     allow_ephemeral: true,
///     cookie_secure: None,
///     same_site: Some("Strict".to_owned()),
/// };
/// let settings = session_settings(&options, BuildMode::Release).expect("ephemeral key allowed");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = options.cookie_secure.unwrap_or(true);
    let same_site = same_site(options.same_site.as_deref(), mode, cookie_secure)?;
    let key = session_key(&options.key_file, mode, options.allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };
    let Some(value) = value else {
        return Ok(fallback);
    };
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => match mode {
            BuildMode::Debug => {
                warn!("session_same_site=None without a secure cookie; browsers may drop it");
                Ok(SameSite::None)
            }
            BuildMode::Release => Err(SessionConfigError::InsecureSameSiteNone),
        },
        _ => match mode {
            BuildMode::Debug => {
                warn!(value, "invalid session_same_site; using default");
                Ok(fallback)
            }
            BuildMode::Release => Err(SessionConfigError::InvalidSameSite {
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            }),
        },
    }
}

fn session_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match read_key_file(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < DERIVABLE_KEY_MIN_LEN {
                bytes.zeroize();
                warn!(
                    path = %path.display(),
                    length,
                    min_len = DERIVABLE_KEY_MIN_LEN,
                    "session key too short to derive from; using temporary key (dev only)"
                );
                return Ok(Key::generate());
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn read_key_file(path: &Path) -> io::Result<Vec<u8>> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "session key path must name a file")
    })?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read(Path::new(file_name))
}
