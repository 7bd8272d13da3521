//! Saving and restoring the player pose and placed blocks.
//!
//! Only the actor's position and yaw and the placed blocks persist. Velocity
//! and knockback are never written; loading clears them and leaves the actor
//! airborne until the next tick finds ground.
//!
//! A document looks like:
//!
//! ```json
//! {"player":{"position":[0.0,1.5,2.0],"rotation":0.25},
//!  "blocks":[{"x":0.0,"y":1.0,"z":0.0,"type":"dirt"}]}
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::{DVec3, IVec3};
use hashbrown::{HashMap, HashSet};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::BlockKind;
use crate::numeric::round_to_grid;
use crate::world::GameWorld;
use crate::SAVE_KEY;

/// Errors raised while saving or loading.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The backing store failed.
    #[error("save storage failed: {0}")]
    Io(#[from] io::Error),
    /// The document is not valid JSON for [`SaveData`].
    #[error("malformed save document: {0}")]
    Json(#[from] serde_json::Error),
    /// Nothing has been saved under the key.
    #[error("no save data found under `{0}`")]
    Missing(String),
    /// The document parsed but holds unusable values.
    #[error("invalid save data: {0}")]
    Invalid(String),
}

/// Persisted player pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Feet position.
    pub position: [f64; 3],
    /// Yaw in radians.
    pub rotation: f64,
}

/// Persisted block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Centre X.
    pub x: f64,
    /// Centre Y.
    pub y: f64,
    /// Centre Z.
    pub z: f64,
    /// Material.
    #[serde(rename = "type", default)]
    pub kind: BlockKind,
}

/// A complete save document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    /// Player pose.
    pub player: PlayerRecord,
    /// Placed blocks.
    #[serde(default)]
    pub blocks: Vec<BlockRecord>,
}

/// Validated contents of a [`SaveData`], ready to apply.
#[derive(Clone, Debug, PartialEq)]
pub struct Restore {
    /// Feet position.
    pub position: DVec3,
    /// Yaw in radians.
    pub yaw: f64,
    /// Blocks by cell.
    pub blocks: Vec<(IVec3, BlockKind)>,
}

impl SaveData {
    /// Records the world's persistent state.
    #[must_use]
    pub fn capture(world: &GameWorld) -> Self {
        let actor = world.actor();
        Self {
            player: PlayerRecord {
                position: actor.position.to_array(),
                rotation: actor.yaw,
            },
            blocks: world
                .blocks()
                .map(|block| {
                    let centre = block.center();
                    BlockRecord {
                        x: centre.x,
                        y: centre.y,
                        z: centre.z,
                        kind: block.kind,
                    }
                })
                .collect(),
        }
    }

    /// Parses a document.
    ///
    /// # Errors
    /// Returns [`SaveError::Json`] when the text is not a save document.
    pub fn from_json(text: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialises the document.
    ///
    /// # Errors
    /// Returns [`SaveError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks every value and converts the document for applying.
    ///
    /// # Errors
    /// Returns [`SaveError::Invalid`] for non-finite values, block
    /// coordinates off the grid range, or two blocks in one cell.
    pub fn validate(&self) -> Result<Restore, SaveError> {
        let position = DVec3::from_array(self.player.position);
        if !position.is_finite() || !self.player.rotation.is_finite() {
            return Err(SaveError::Invalid("player pose is not finite".to_owned()));
        }

        let mut seen = HashSet::with_capacity(self.blocks.len());
        let mut blocks = Vec::with_capacity(self.blocks.len());
        for (index, record) in self.blocks.iter().enumerate() {
            let cell = match (
                round_to_grid(record.x),
                round_to_grid(record.y),
                round_to_grid(record.z),
            ) {
                (Some(x), Some(y), Some(z)) => IVec3::new(x, y, z),
                _ => {
                    return Err(SaveError::Invalid(format!(
                        "block {index} has a non-finite position"
                    )))
                }
            };
            if !seen.insert(cell) {
                return Err(SaveError::Invalid(format!(
                    "block {index} repeats cell {cell}"
                )));
            }
            blocks.push((cell, record.kind));
        }

        Ok(Restore {
            position,
            yaw: self.player.rotation,
            blocks,
        })
    }
}

/// Key/value storage for save documents.
#[cfg_attr(test, mockall::automock)]
pub trait SaveStore {
    /// Reads the document under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    /// Returns [`SaveError::Io`] when the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;

    /// Stores `document` under `key`, replacing any previous one.
    ///
    /// # Errors
    /// Returns [`SaveError::Io`] when the store cannot be written.
    fn write(&mut self, key: &str, document: &str) -> Result<(), SaveError>;
}

/// Store keeping one `<key>.json` file per key in a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`; the directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the documents.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, document: &str) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), document)?;
        Ok(())
    }
}

/// Store held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, document: &str) -> Result<(), SaveError> {
        self.slots.insert(key.to_owned(), document.to_owned());
        Ok(())
    }
}

/// Saves the world's persistent state under [`SAVE_KEY`].
///
/// # Errors
/// Propagates serialisation and store failures.
pub fn save_world(world: &GameWorld, store: &mut dyn SaveStore) -> Result<(), SaveError> {
    let document = SaveData::capture(world).to_json()?;
    store.write(SAVE_KEY, &document).inspect_err(|err| {
        warn!("failed to save game: {err}");
    })?;
    info!("game saved ({} blocks)", world.block_count());
    Ok(())
}

/// Loads the document under [`SAVE_KEY`] into `world`.
///
/// The document is parsed and validated in full first; on any error the
/// world is left untouched.
///
/// # Errors
/// Returns [`SaveError::Missing`] if nothing was saved, otherwise any read,
/// parse or validation failure.
pub fn load_world(world: &mut GameWorld, store: &dyn SaveStore) -> Result<(), SaveError> {
    let restore = store
        .read(SAVE_KEY)
        .and_then(|text| text.ok_or_else(|| SaveError::Missing(SAVE_KEY.to_owned())))
        .and_then(|text| SaveData::from_json(&text))
        .and_then(|data| data.validate())
        .inspect_err(|err| warn!("failed to load game: {err}"))?;
    world.restore(restore.position, restore.yaw, &restore.blocks);
    info!("game loaded ({} blocks)", restore.blocks.len());
    Ok(())
}
