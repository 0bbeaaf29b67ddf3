//! File-backed token cache.
//!
//! The session file holds one JSON object with the id and refresh tokens of
//! the last sign-in. It is read once when the cache opens; afterwards the
//! in-process copy answers reads and every change is written through.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::atomic_io::{remove_if_present, write_atomic};
use crate::domain::ports::{CachedTokens, TokenCache};

/// The session file cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session file {path} is unusable: {message}")]
pub struct SessionFileError {
    /// Configured session file.
    pub path: Utf8PathBuf,
    /// Underlying failure.
    pub message: String,
}

impl SessionFileError {
    fn new(path: &Utf8Path, message: impl Into<String>) -> Self {
        Self {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionFileRef<'a> {
    id_token: &'a str,
    refresh_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFileDto {
    id_token: String,
    refresh_token: String,
}

/// Token cache persisted to a single file.
pub struct FileTokenCache {
    dir: Dir,
    path: Utf8PathBuf,
    file_name: String,
    tokens: Mutex<Option<CachedTokens>>,
}

impl FileTokenCache {
    /// Open the cache at `path`, creating its directory when needed.
    ///
    /// A missing file means no stored session. An unreadable or corrupt file
    /// is logged and treated the same way; the next sign-in replaces it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionFileError`] when `path` does not name a file or its
    /// directory cannot be created or opened.
    pub fn open(path: &Utf8Path) -> Result<Self, SessionFileError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| SessionFileError::new(path, "path must name a file"))?
            .to_owned();
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|error| SessionFileError::new(path, error.to_string()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| SessionFileError::new(path, error.to_string()))?;

        let tokens = read_session(&dir, &file_name, path);
        debug!(%path, restored = tokens.is_some(), "session file opened");
        Ok(Self {
            dir,
            path: path.to_path_buf(),
            file_name,
            tokens: Mutex::new(tokens),
        })
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn tokens(&self) -> MutexGuard<'_, Option<CachedTokens>> {
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, tokens: &CachedTokens) -> io::Result<()> {
        let contents = serde_json::to_vec(&SessionFileRef {
            id_token: &tokens.id_token,
            refresh_token: &tokens.refresh_token,
        })
        .map_err(io::Error::other)?;
        write_atomic(&self.dir, &self.file_name, &Zeroizing::new(contents))
    }
}

impl TokenCache for FileTokenCache {
    fn load(&self) -> Option<CachedTokens> {
        self.tokens().clone()
    }

    fn store(&self, tokens: CachedTokens) {
        let mut current = self.tokens();
        if let Err(error) = self.write(&tokens) {
            warn!(path = %self.path, %error, "session file not written; session lasts until exit");
        }
        *current = Some(tokens);
    }

    fn clear(&self) {
        let mut current = self.tokens();
        if current.take().is_none() {
            return;
        }
        if let Err(error) = remove_if_present(&self.dir, &self.file_name) {
            warn!(path = %self.path, %error, "session file not removed");
        }
    }

    fn has_token(&self) -> bool {
        self.tokens().is_some()
    }
}

fn read_session(dir: &Dir, file_name: &str, path: &Utf8Path) -> Option<CachedTokens> {
    let contents = match dir.read(file_name) {
        Ok(contents) => Zeroizing::new(contents),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return None,
        Err(error) => {
            warn!(%path, %error, "session file unreadable; starting signed out");
            return None;
        }
    };
    match serde_json::from_slice::<SessionFileDto>(&contents) {
        Ok(stored) => Some(CachedTokens::new(stored.id_token, stored.refresh_token)),
        Err(error) => {
            warn!(%path, %error, "session file corrupt; starting signed out");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    fn session_path(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join("state").join("session.json"))
            .expect("utf-8 temp path")
    }

    #[rstest]
    fn stored_sessions_survive_reopening(temp_dir: TempDir) {
        let path = session_path(&temp_dir);
        let cache = FileTokenCache::open(&path).expect("cache opens");
        assert_eq!(cache.load(), None);

        cache.store(CachedTokens::new("id-1", "refresh-1"));
        drop(cache);

        let reopened = FileTokenCache::open(&path).expect("cache reopens");
        assert!(reopened.has_token());
        assert_eq!(reopened.load(), Some(CachedTokens::new("id-1", "refresh-1")));
    }

    #[rstest]
    fn clearing_removes_the_file(temp_dir: TempDir) {
        let path = session_path(&temp_dir);
        let cache = FileTokenCache::open(&path).expect("cache opens");
        cache.store(CachedTokens::new("id-1", "refresh-1"));
        assert!(path.exists());

        cache.clear();
        assert!(!path.exists());
        assert!(!cache.has_token());
        assert_eq!(
            FileTokenCache::open(&path).expect("cache reopens").load(),
            None
        );
    }

    #[rstest]
    fn corrupt_files_read_as_signed_out(temp_dir: TempDir) {
        let path = session_path(&temp_dir);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, b"{ not json").expect("seed corrupt file");

        let cache = FileTokenCache::open(&path).expect("cache opens");
        assert!(!cache.has_token());

        cache.store(CachedTokens::new("id-2", "refresh-2"));
        let written = std::fs::read_to_string(&path).expect("file rewritten");
        assert_eq!(written, r#"{"idToken":"id-2","refreshToken":"refresh-2"}"#);
    }

    #[rstest]
    fn paths_must_name_a_file() {
        let error = FileTokenCache::open(Utf8Path::new("/")).err().expect("rejected");
        assert_eq!(error.path, Utf8PathBuf::from("/"));
    }
}
