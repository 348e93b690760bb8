//! Loose object persistence
//!
//! Layout under the workspace root:
//!
//! ```text
//! <root>/<dir_name>/objects/<hash[0..2]>/<hash[2..]>   zlib-compressed framed object
//! <root>/<dir_name>/refs/
//! <root>/<dir_name>/HEAD
//! ```

use crate::config::StoreConfig;
use crate::error::{FrameError, StorageError};
use crate::object::frame::{parse_frame_with_id, parse_header, MAX_HEADER_LEN};
use crate::object::hasher::hash_framed;
use crate::object::{FramedObject, ObjectKind};
use crate::store::{ObjectStore, ObjectSummary, PutOutcome};
use crate::types::ObjectId;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument, trace, warn};
use walkdir::WalkDir;

/// Initial contents of HEAD in a fresh store
const DEFAULT_HEAD: &str = "ref: refs/main\n";

/// Filesystem-backed loose object store
///
/// An explicit handle carrying the workspace root; every operation goes
/// through it, so several stores can coexist in one process.
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    root: PathBuf,
    config: StoreConfig,
}

impl LooseObjectStore {
    /// Create a store rooted at the given workspace with default settings
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_config(root, StoreConfig::default())
    }

    pub fn with_config<P: AsRef<Path>>(root: P, config: StoreConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    /// Workspace root this store lives under
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// `<root>/<dir_name>`
    pub fn store_dir(&self) -> PathBuf {
        self.root.join(&self.config.dir_name)
    }

    /// `<root>/<dir_name>/objects`
    pub fn objects_dir(&self) -> PathBuf {
        self.store_dir().join("objects")
    }

    /// Storage path for an object: the first two hex characters name the
    /// fan-out directory, the remaining 62 name the file.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.objects_dir().join(id.prefix()).join(id.suffix())
    }

    /// Whether `init_layout` has been run (the objects directory exists)
    pub fn is_initialized(&self) -> bool {
        self.objects_dir().is_dir()
    }

    /// Ensure the store directories exist
    ///
    /// Idempotent. HEAD is only written when missing, so re-running never
    /// resets an existing ref.
    #[instrument(skip(self), fields(store = %self.store_dir().display()))]
    pub fn init_layout(&self) -> Result<(), StorageError> {
        let store_dir = self.store_dir();
        for dir in [self.objects_dir(), store_dir.join("refs")] {
            fs::create_dir_all(&dir).map_err(|e| StorageError::io("create directory", &dir, e))?;
        }

        let head = store_dir.join("HEAD");
        if !head.exists() {
            fs::write(&head, DEFAULT_HEAD).map_err(|e| StorageError::io("write", &head, e))?;
            debug!("Wrote initial HEAD");
        }

        Ok(())
    }

    /// Read only the header of a stored object
    ///
    /// Decompresses just far enough to find the NUL separator.
    pub fn read_header(&self, id: &ObjectId) -> Result<ObjectSummary, StorageError> {
        let path = self.object_path(id);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::ObjectNotFound(*id))
            }
            Err(e) => return Err(StorageError::io("open object", &path, e)),
        };

        let decoder = ZlibDecoder::new(BufReader::new(file));
        let mut reader = BufReader::new(decoder.take(MAX_HEADER_LEN as u64 + 1));
        let mut header = Vec::with_capacity(MAX_HEADER_LEN + 1);
        reader
            .read_until(0, &mut header)
            .map_err(|e| corrupt(id, format!("decompression failed: {}", e)))?;

        if header.pop() != Some(0) {
            return Err(corrupt(id, FrameError::MissingNul.to_string()));
        }
        let parsed = parse_header(&header).map_err(|e| corrupt(id, e.to_string()))?;

        Ok(ObjectSummary {
            id: *id,
            kind: parsed.kind,
            size: parsed.size,
        })
    }

    /// Enumerate stored objects, optionally filtered by kind, sorted by hash
    ///
    /// Best-effort: anything in the objects directory that is not a readable
    /// object at `<2 hex>/<62 hex>` is skipped with a warning rather than
    /// failing the whole listing. A store that was never initialized lists as
    /// empty.
    #[instrument(skip(self))]
    pub fn list(&self, filter: Option<ObjectKind>) -> Result<Vec<ObjectSummary>, StorageError> {
        let objects_dir = self.objects_dir();
        if !objects_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut objects = Vec::new();
        let walker = WalkDir::new(&objects_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry in objects directory");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(id) = id_from_path(entry.path()) else {
                trace!(path = %entry.path().display(), "Skipping non-object file");
                continue;
            };

            match self.read_header(&id) {
                Ok(summary) => {
                    if filter.map_or(true, |kind| kind == summary.kind) {
                        objects.push(summary);
                    }
                }
                Err(e) => warn!(id = %id, error = %e, "Skipping unreadable object"),
            }
        }

        objects.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(count = objects.len(), "Listed objects");
        Ok(objects)
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut encoder = ZlibEncoder::new(
            Vec::with_capacity(data.len() / 2 + 16),
            Compression::new(self.config.compression_level),
        );
        encoder.write_all(data)?;
        encoder.finish()
    }
}

impl ObjectStore for LooseObjectStore {
    /// Compress and write an object
    ///
    /// Bytes go to a temporary file in the fan-out directory that is then
    /// renamed into place, so the final path only ever holds a complete object.
    #[instrument(level = "debug", skip_all, fields(id = %object.id()))]
    fn put(&self, object: &FramedObject) -> Result<PutOutcome, StorageError> {
        let id = object.id();
        let path = self.object_path(&id);

        if self.config.skip_existing && path.is_file() {
            trace!("Object already stored");
            return Ok(PutOutcome::AlreadyPresent);
        }

        let dir = self.objects_dir().join(id.prefix());
        fs::create_dir_all(&dir).map_err(|e| StorageError::io("create directory", &dir, e))?;

        let compressed = self
            .compress(object.framed_bytes())
            .map_err(|e| StorageError::io("compress object for", &path, e))?;

        let mut temp = NamedTempFile::new_in(&dir)
            .map_err(|e| StorageError::io("create temporary file in", &dir, e))?;
        temp.write_all(&compressed)
            .map_err(|e| StorageError::io("write", temp.path(), e))?;
        set_readable(temp.as_file(), temp.path())?;
        temp.persist(&path)
            .map_err(|e| StorageError::io("move object into", &path, e.error))?;

        debug!(
            kind = %object.kind(),
            size = object.size(),
            compressed = compressed.len(),
            "Wrote object"
        );
        Ok(PutOutcome::Written)
    }

    fn get(&self, id: &ObjectId) -> Result<FramedObject, StorageError> {
        let path = self.object_path(id);

        let compressed = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::ObjectNotFound(*id))
            }
            Err(e) => return Err(StorageError::io("read object", &path, e)),
        };

        // A truncated stream can decode without error; the frame's size check
        // and the digest check below catch the missing bytes.
        let mut framed = Vec::with_capacity(compressed.len() * 2);
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut framed)
            .map_err(|e| corrupt(id, format!("decompression failed: {}", e)))?;

        if self.config.verify_on_read {
            let actual = hash_framed(&framed);
            if actual != *id {
                return Err(corrupt(id, format!("content hashes to {}", actual)));
            }
        }

        parse_frame_with_id(framed, *id).map_err(|e| corrupt(id, e.to_string()))
    }

    fn contains(&self, id: &ObjectId) -> Result<bool, StorageError> {
        Ok(self.object_path(id).is_file())
    }
}

fn corrupt(id: &ObjectId, reason: String) -> StorageError {
    StorageError::CorruptObject { id: *id, reason }
}

/// Reassemble an object id from `<objects>/<2 hex>/<62 hex>`
fn id_from_path(path: &Path) -> Option<ObjectId> {
    let file = path.file_name()?.to_str()?;
    let dir = path.parent()?.file_name()?.to_str()?;
    if dir.len() != 2 {
        return None;
    }
    format!("{}{}", dir, file).parse().ok()
}

#[cfg(unix)]
fn set_readable(file: &fs::File, path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
        .map_err(|e| StorageError::io("set permissions on", path, e))
}

#[cfg(not(unix))]
fn set_readable(_file: &fs::File, _path: &Path) -> Result<(), StorageError> {
    Ok(())
}
