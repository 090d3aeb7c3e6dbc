/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! In-memory entity lists with optional write-through to a JSON cache file.

use connector::{EntityId, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read cache {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse cache {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write cache {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A single file holding a whole entity list as a JSON array.
#[derive(Debug, Clone)]
pub struct JsonCache {
    path: PathBuf,
}

impl JsonCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when nothing has been cached yet.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<Vec<T>>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save<T: Serialize>(&self, entities: &[T]) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let contents = serde_json::to_string(entities)?;
        fs::write(&self.path, contents).map_err(write_err)
    }
}

/// Ordered list of one entity type. Every mutation is written through to the
/// cache when one is attached.
#[derive(Debug)]
pub struct EntityStore<R> {
    entities: Vec<R>,
    cache: Option<JsonCache>,
    from_cache: bool,
}

impl<R> Default for EntityStore<R> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            cache: None,
            from_cache: false,
        }
    }
}

impl<R: Resource> EntityStore<R> {
    /// Attaches the cache and takes its contents, if any, as the current list.
    pub fn open(cache: JsonCache) -> Result<Self, StoreError> {
        let cached = cache.load::<R>()?;
        let from_cache = cached.is_some();

        if from_cache {
            debug!(path = %cache.path().display(), "loaded entities from cache");
        }

        Ok(Self {
            entities: cached.unwrap_or_default(),
            cache: Some(cache),
            from_cache,
        })
    }

    /// Whether the current list came from the cache rather than the server.
    pub fn is_cached(&self) -> bool {
        self.from_cache
    }

    pub fn entities(&self) -> &[R] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&R> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    /// Replaces the whole list, e.g. after fetching it from the server.
    pub fn load(&mut self, entities: Vec<R>) -> Result<(), StoreError> {
        self.entities = entities;
        self.from_cache = false;
        self.persist()
    }

    /// Newly created entities are listed first.
    pub fn insert_front(&mut self, entity: R) -> Result<(), StoreError> {
        self.entities.insert(0, entity);
        self.persist()
    }

    /// Returns `false` when no entity has the same id.
    pub fn replace(&mut self, entity: R) -> Result<bool, StoreError> {
        let Some(slot) = self.entities.iter_mut().find(|e| e.id() == entity.id()) else {
            return Ok(false);
        };

        *slot = entity;
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: EntityId) -> Result<Option<R>, StoreError> {
        let Some(index) = self.entities.iter().position(|e| e.id() == id) else {
            return Ok(None);
        };

        let removed = self.entities.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    fn persist(&self) -> Result<(), StoreError> {
        match &self.cache {
            Some(cache) => cache.save(&self.entities),
            None => Ok(()),
        }
    }
}
