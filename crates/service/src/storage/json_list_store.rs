use std::{
    io,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    sync::Arc,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs,
    sync::{RwLock, RwLockWriteGuard},
};

use crate::errors::ServiceError;

/// Generic JSON file-backed ordered list store.
///
/// Keeps a `Vec<T>` in memory and persists the whole sequence as a
/// pretty-printed JSON array on every committed change. Writers are
/// serialized by the inner lock, so read-modify-write cycles never interleave.
pub struct JsonListStore<T> {
    inner: RwLock<Vec<T>>,
    file_path: PathBuf,
}

/// Exclusive access to a working copy of the list.
///
/// Changes become visible (in memory and on disk) only through [`commit`];
/// dropping the writer discards them.
///
/// [`commit`]: ListWriter::commit
pub struct ListWriter<'a, T> {
    guard: RwLockWriteGuard<'a, Vec<T>>,
    working: Vec<T>,
    file_path: &'a Path,
}

impl<T> JsonListStore<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync,
{
    /// Initialize the store from a path. Creates the file with an empty array if missing;
    /// any other read failure is reported and leaves the file alone.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                ServiceError::Storage(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let items: Vec<T> = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::Storage(format!("{} is not a JSON array of records: {e}", file_path.display()))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let empty: Vec<T> = Vec::new();
                write_json(&file_path, &empty[..]).await?;
                empty
            }
            Err(e) => {
                return Err(ServiceError::Storage(format!("cannot read {}: {e}", file_path.display())));
            }
        };

        Ok(Arc::new(Self { inner: RwLock::new(items), file_path }))
    }

    /// Snapshot of all entries in order.
    pub async fn list(&self) -> Vec<T> {
        self.inner.read().await.clone()
    }

    /// Take the write lock and hand out a working copy of the list.
    pub async fn write(&self) -> ListWriter<'_, T> {
        let guard = self.inner.write().await;
        let working = guard.clone();
        ListWriter { guard, working, file_path: &self.file_path }
    }

    /// Apply a mutation to the list and persist it; nothing changes if `f` fails.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, ServiceError>,
    {
        let mut writer = self.write().await;
        let out = f(&mut *writer)?;
        writer.commit().await?;
        Ok(out)
    }
}

impl<'a, T: Serialize> ListWriter<'a, T> {
    /// Persist the working copy, then publish it to readers.
    pub async fn commit(self) -> Result<(), ServiceError> {
        let ListWriter { mut guard, working, file_path } = self;
        write_json(file_path, &working[..]).await?;
        *guard = working;
        Ok(())
    }
}

impl<T> Deref for ListWriter<'_, T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.working
    }
}

impl<T> DerefMut for ListWriter<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.working
    }
}

async fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<(), ServiceError> {
    let data = serde_json::to_vec_pretty(items).map_err(|e| ServiceError::Storage(e.to_string()))?;
    fs::write(path, data).await.map_err(|e| ServiceError::Storage(e.to_string()))
}
