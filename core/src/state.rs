//! Saving and restoring a client between runs.
//!
//! # Design
//! `ClientState` is the on-disk JSON record: every configuration field
//! except the password and the transport. All fields default when missing,
//! and a missing developer key falls back to the built-in one on restore.
//! Restoring goes through the regular options, so a tampered record cannot
//! smuggle a malformed URL or key into a `Client`.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::{Client, DEFAULT_BASE_URL};
use crate::error::Result;
use crate::options::{set_base_url, set_dev_key, set_session_key, set_username, ClientOption};
use crate::types::{Expiration, Visibility};

/// File name used under the home directory by `default_state_path`.
pub const STATE_FILE_NAME: &str = ".pastebin";

/// Persisted client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientState {
    pub url: String,
    pub devkey: String,
    pub session_key: String,
    pub username: String,
    pub expire: Expiration,
    pub visibility: Visibility,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            url: DEFAULT_BASE_URL.to_string(),
            devkey: String::new(),
            session_key: String::new(),
            username: String::new(),
            expire: Expiration::default(),
            visibility: Visibility::default(),
        }
    }
}

impl ClientState {
    pub fn from_client(client: &Client) -> Self {
        Self {
            url: client.base_url().to_string(),
            devkey: client.dev_key().to_string(),
            session_key: client.session_key().to_string(),
            username: client.username().to_string(),
            expire: client.expiration(),
            visibility: client.visibility(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let state = serde_json::from_reader(BufReader::new(file))?;
        Ok(state)
    }

    /// Write the record, creating or truncating `path`. On Unix the file is
    /// created readable by the owner only, since it holds a session key.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut open = OpenOptions::new();
        open.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            open.mode(0o600);
        }
        let mut writer = BufWriter::new(open.open(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Build a client from this record, then apply `extra` with update
    /// semantics.
    pub fn into_client(self, extra: impl IntoIterator<Item = ClientOption>) -> Result<Client> {
        let mut options = vec![set_base_url(&self.url), set_username(&self.username)];
        if self.devkey.is_empty() {
            debug!("saved state has no developer key, using the built-in default");
        } else {
            options.push(set_dev_key(&self.devkey));
        }
        if !self.session_key.is_empty() {
            options.push(set_session_key(&self.session_key));
        }

        let mut client = Client::new(options)?;
        client.expiration = self.expire;
        client.visibility = self.visibility;
        client.update(extra)?;
        Ok(client)
    }
}

impl Client {
    /// Persist this client's configuration to `path`. The password is never
    /// written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        ClientState::from_client(self).save(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "client state saved");
        Ok(())
    }

    /// Restore a client saved with `save`, using the default transport.
    pub fn restore(path: impl AsRef<Path>) -> Result<Client> {
        Self::restore_with(path, [])
    }

    /// Restore a client, then apply `options` on top (a test transport, an
    /// expiration override for this run, and so on).
    pub fn restore_with(
        path: impl AsRef<Path>,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<Client> {
        let client = ClientState::load(path.as_ref())?.into_client(options)?;
        debug!(path = %path.as_ref().display(), "client state restored");
        Ok(client)
    }
}

/// `~/.pastebin`, or `None` when the home directory is unknown.
pub fn default_state_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STATE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::DEFAULT_DEV_KEY;
    use crate::error::{ApiError, ConfigError};
    use crate::options::{set_expiration, set_password, set_visibility};

    const SESSION: &str = "a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4";

    #[test]
    fn save_then_restore_keeps_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let original = Client::new([
            set_base_url("http://localhost:3000/api/"),
            set_session_key(SESSION),
            set_username("alice"),
            set_password("hunter2"),
            set_expiration("1W"),
            set_visibility("private"),
        ])
        .unwrap();

        original.save(&path).unwrap();
        let restored = Client::restore(&path).unwrap();

        assert_eq!(restored.base_url(), original.base_url());
        assert_eq!(restored.dev_key(), original.dev_key());
        assert_eq!(restored.session_key(), SESSION);
        assert_eq!(restored.username(), "alice");
        assert_eq!(restored.expiration(), Expiration::OneWeek);
        assert_eq!(restored.visibility(), Visibility::Private);
        assert!(!restored.has_password());
    }

    #[test]
    fn password_never_reaches_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        Client::new([set_username("alice"), set_password("hunter2")])
            .unwrap()
            .save(&path)
            .unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("hunter2"));
        assert!(!raw.contains("password"));
    }

    #[test]
    fn empty_dev_key_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"url":"https://pastebin.com/api/","devkey":"","session_key":"","username":"bob","expire":"1D"}"#,
        )
        .unwrap();
        let restored = Client::restore(&path).unwrap();
        assert_eq!(restored.dev_key(), DEFAULT_DEV_KEY);
        assert_eq!(restored.username(), "bob");
        assert_eq!(restored.expiration(), Expiration::OneDay);
        assert_eq!(restored.visibility(), Visibility::Unlisted);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{}").unwrap();
        let restored = Client::restore(&path).unwrap();
        assert_eq!(restored.base_url(), DEFAULT_BASE_URL);
        assert_eq!(restored.dev_key(), DEFAULT_DEV_KEY);
        assert_eq!(restored.session_key(), "");
        assert_eq!(restored.expiration(), Expiration::TenMinutes);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Client::restore(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
    }

    #[test]
    fn malformed_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(Client::restore(&path), Err(ApiError::Serialization(_))));
    }

    #[test]
    fn unknown_expiration_in_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"expire":"3Y"}"#).unwrap();
        assert!(matches!(Client::restore(&path), Err(ApiError::Serialization(_))));
    }

    #[test]
    fn malformed_session_key_in_record_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"session_key":"Bad API request, invalid login"}"#).unwrap();
        let err = Client::restore(&path).unwrap_err();
        assert!(matches!(err, ApiError::Config(ConfigError::InvalidSessionKey)));
    }

    #[test]
    fn restore_with_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        Client::new([set_expiration("1Y")]).unwrap().save(&path).unwrap();
        let restored = Client::restore_with(&path, [set_expiration("1H")]).unwrap();
        assert_eq!(restored.expiration(), Expiration::OneHour);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        Client::new([]).unwrap().save(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn default_path_ends_with_state_file_name() {
        if let Some(path) = default_state_path() {
            assert!(path.ends_with(STATE_FILE_NAME));
        }
    }
}
