//! Filesystem-backed catalog: entity and thread fixtures plus config.

use crate::config::HeraldConfig;
use crate::error::{FsError, Result};
use herald_core::{
    CatalogLookup, ChangeEvent, Channel, CoreError, Entity, EntityRef, FeedEntry, Include,
    RenderingProfile, Thread, describe_event,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use slug::slugify;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;
use walkdir::WalkDir;

/// Directory name for herald configuration.
const HERALD_DIR: &str = ".herald";
/// Configuration file name.
const CONFIG_FILE: &str = "config.yml";
/// Entities directory, one subdirectory per entity type.
const ENTITIES_DIR: &str = "catalog/entities";
/// Threads directory.
const THREADS_DIR: &str = "catalog/threads";
/// Extension of every fixture file.
const FIXTURE_EXT: &str = "yml";

/// A catalog of entities and threads stored as YAML files.
#[derive(Debug)]
pub struct Catalog {
    /// Root path of the catalog.
    root: PathBuf,
    /// Catalog configuration.
    config: HeraldConfig,
}

impl Catalog {
    /// Initialize a new catalog with default configuration.
    ///
    /// # Errors
    /// Returns error if the catalog already exists or IO fails.
    pub fn init(path: impl AsRef<Path>) -> Result<Self> {
        Self::init_with(path, HeraldConfig::default())
    }

    /// Initialize a new catalog with the given configuration.
    ///
    /// # Errors
    /// Returns error if the catalog already exists or IO fails.
    pub fn init_with(path: impl AsRef<Path>, config: HeraldConfig) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let herald_dir = root.join(HERALD_DIR);

        if herald_dir.exists() {
            return Err(FsError::CatalogExists(root));
        }

        fs::create_dir_all(&herald_dir)?;
        fs::create_dir_all(root.join(ENTITIES_DIR))?;
        fs::create_dir_all(root.join(THREADS_DIR))?;
        write_yaml(&herald_dir.join(CONFIG_FILE), &config)?;

        info!(path = %root.display(), "Initialized catalog");

        Ok(Self { root, config })
    }

    /// Open an existing catalog at the given path.
    ///
    /// # Errors
    /// Returns error if the catalog doesn't exist or config is invalid.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        let config_path = root.join(HERALD_DIR).join(CONFIG_FILE);

        if !config_path.exists() {
            return Err(FsError::CatalogNotFound(root));
        }

        let config: HeraldConfig = read_yaml(&config_path)?;

        debug!(path = %root.display(), name = ?config.catalog.name, "Opened catalog");

        Ok(Self { root, config })
    }

    /// Get the catalog root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &HeraldConfig {
        &self.config
    }

    /// Rendering profile for `channel`, or the configured default channel.
    #[must_use]
    pub fn profile(&self, channel: Option<Channel>) -> Box<dyn RenderingProfile> {
        channel
            .unwrap_or(self.config.publisher.channel)
            .profile(&self.config.server.base_url)
    }

    fn entity_type_dir(&self, entity_type: &str) -> PathBuf {
        self.root.join(ENTITIES_DIR).join(entity_type)
    }

    fn entity_path(&self, entity: &Entity, fqn: &str) -> PathBuf {
        self.entity_type_dir(&entity.entity_type)
            .join(format!("{}-{}.{FIXTURE_EXT}", slugify(fqn), entity.id))
    }

    fn thread_path(&self, id: Uuid) -> PathBuf {
        self.root.join(THREADS_DIR).join(format!("{id}.{FIXTURE_EXT}"))
    }

    /// Store an entity, replacing any previous version.
    ///
    /// Files are named `{slug}-{id}.yml`, so fqns that slugify alike never
    /// share a file. Older files for the same id (after a rename) or the
    /// same fqn (after a re-creation) are removed.
    ///
    /// # Errors
    /// Returns error if the entity has no fqn or IO fails.
    pub fn put_entity(&self, entity: &Entity) -> Result<PathBuf> {
        let fqn = entity.fqn().ok_or_else(|| FsError::MissingFqn {
            entity_type: entity.entity_type.clone(),
            name: entity.name.clone(),
        })?;

        let path = self.entity_path(entity, fqn);
        let slug = slugify(fqn);
        for stale in self.fixture_paths(&entity.entity_type)? {
            if stale == path {
                continue;
            }
            let Some((stale_slug, stale_id)) = fixture_key(&stale) else {
                continue;
            };
            let replaces = stale_id == entity.id
                || (stale_slug == slug
                    && read_yaml::<Entity>(&stale).is_ok_and(|old| old.fqn() == Some(fqn)));
            if replaces {
                debug!(path = %stale.display(), "Removing previous entity version");
                fs::remove_file(&stale)?;
            }
        }

        fs::create_dir_all(self.entity_type_dir(&entity.entity_type))?;
        write_yaml(&path, entity)?;

        debug!(entity_type = %entity.entity_type, fqn, "Stored entity");
        Ok(path)
    }

    /// Store a thread, replacing any previous version.
    ///
    /// # Errors
    /// Returns error if IO fails.
    pub fn put_thread(&self, thread: &Thread) -> Result<PathBuf> {
        let path = self.thread_path(thread.id);
        fs::create_dir_all(self.root.join(THREADS_DIR))?;
        write_yaml(&path, thread)?;

        debug!(thread_id = %thread.id, "Stored thread");
        Ok(path)
    }

    /// Entity fixture files of a type, sorted by path.
    fn fixture_paths(&self, entity_type: &str) -> Result<Vec<PathBuf>> {
        let dir = self.entity_type_dir(entity_type);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            let is_fixture = entry
                .path()
                .extension()
                .is_some_and(|ext| ext == FIXTURE_EXT);
            if entry.file_type().is_file() && is_fixture {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Read the fixtures accepted by `select`, skipping unreadable files.
    fn read_entities(
        &self,
        entity_type: &str,
        select: impl Fn(&Path) -> bool,
    ) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        for path in self.fixture_paths(entity_type)? {
            if !select(&path) {
                continue;
            }
            match read_yaml::<Entity>(&path) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Failed to read entity, skipping");
                }
            }
        }
        Ok(entities)
    }

    /// List all entities of a type, sorted by fqn.
    ///
    /// # Errors
    /// Returns error if the entity directory cannot be walked.
    pub fn list_entities(&self, entity_type: &str) -> Result<Vec<Entity>> {
        let mut entities = self.read_entities(entity_type, |_| true)?;
        entities.sort_by(|a, b| a.fqn().cmp(&b.fqn()));
        Ok(entities)
    }

    /// Fetch an entity by id or fqn, honouring the deletion policy.
    ///
    /// # Errors
    /// `CoreError::EntityNotFound` (wrapped) when nothing matches.
    pub fn get_entity(
        &self,
        entity_type: &str,
        reference: &EntityRef,
        include: Include,
    ) -> Result<Entity> {
        let candidates = match reference {
            EntityRef::Fqn(fqn) => {
                let slug = slugify(fqn);
                self.read_entities(entity_type, |path| {
                    fixture_key(path).is_some_and(|(key, _)| key == slug)
                })?
                .into_iter()
                .filter(|entity| entity.fqn() == Some(fqn.as_str()))
                .collect::<Vec<_>>()
            }
            EntityRef::Id(id) => self
                .read_entities(entity_type, |path| {
                    fixture_key(path).is_some_and(|(_, key)| key == *id)
                })?
                .into_iter()
                .filter(|entity| entity.id == *id)
                .collect(),
        };

        candidates
            .into_iter()
            .find(|entity| include.admits(entity.deleted))
            .ok_or_else(|| {
                FsError::Core(CoreError::EntityNotFound {
                    entity_type: entity_type.to_string(),
                    reference: reference.to_string(),
                })
            })
    }

    /// Fetch a thread by id.
    ///
    /// # Errors
    /// `CoreError::ThreadNotFound` (wrapped) when the thread is missing.
    pub fn get_thread(&self, id: Uuid) -> Result<Thread> {
        let path = self.thread_path(id);
        if !path.exists() {
            return Err(FsError::Core(CoreError::ThreadNotFound(id.to_string())));
        }
        read_yaml(&path)
    }
}

impl CatalogLookup for Catalog {
    fn entity(
        &self,
        entity_type: &str,
        reference: &EntityRef,
        include: Include,
    ) -> herald_core::Result<Entity> {
        Ok(self.get_entity(entity_type, reference, include)?)
    }

    fn thread(&self, event: &ChangeEvent) -> herald_core::Result<Thread> {
        Ok(self.get_thread(event.entity_id)?)
    }

    fn feed_for_event(
        &self,
        profile: &dyn RenderingProfile,
        event: &ChangeEvent,
    ) -> herald_core::Result<Vec<FeedEntry>> {
        if event.fqn().is_some() {
            return Ok(describe_event(profile, event));
        }

        let reference = EntityRef::Id(event.entity_id);
        match self.get_entity(&event.entity_type, &reference, Include::All) {
            Ok(entity) => {
                let fqn = entity.fqn().unwrap_or(&entity.name);
                Ok(describe_event(profile, &event.clone().with_fqn(fqn)))
            }
            Err(FsError::Core(err)) if err.is_not_found() => {
                debug!(event_id = %event.id, error = %err, "Event subject not in catalog");
                Ok(describe_event(profile, event))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Length of a hyphenated uuid.
const ID_LEN: usize = 36;

/// Split a `{slug}-{id}.yml` fixture path into its slug and id.
fn fixture_key(path: &Path) -> Option<(&str, Uuid)> {
    let stem = path.file_stem()?.to_str()?;
    let split = stem.len().checked_sub(ID_LEN + 1)?;
    let slug = stem.get(..split)?;
    let id = stem.get(split + 1..)?.parse().ok()?;
    (stem.get(split..=split)? == "-").then_some((slug, id))
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    fs::write(path, serde_yaml::to_string(value)?)?;
    Ok(())
}
