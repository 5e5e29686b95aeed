use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use seedapi_types::{DescriptorSet, GeneratedData};

use crate::error::{CacheError, CacheResult};
use crate::fingerprint::Fingerprint;

/// A fingerprint together with the data generated for it.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheRecord {
    pub fingerprint: Fingerprint,
    pub data: GeneratedData,
}

/// Decides whether generation can be skipped, and persists its results.
///
/// The cache owns a single directory. A record exists when both the data
/// file and the fingerprint file are present.
#[derive(Clone, Debug)]
pub struct RegenerationCache {
    dir: PathBuf,
}

impl RegenerationCache {
    pub const DATA_FILE: &'static str = "generated.json";
    pub const FINGERPRINT_FILE: &'static str = "fingerprint";

    /// Cache rooted at `dir`. The directory is created on first commit.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The per-user cache directory (`<cache dir>/seedapi`), falling back to
    /// `./.seedapi` on platforms without one.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|d| d.join("seedapi"))
            .unwrap_or_else(|| PathBuf::from(".seedapi"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn data_path(&self) -> PathBuf {
        self.dir.join(Self::DATA_FILE)
    }

    pub fn fingerprint_path(&self) -> PathBuf {
        self.dir.join(Self::FINGERPRINT_FILE)
    }

    /// Fingerprint of the given descriptor set.
    pub fn fingerprint(descriptors: &DescriptorSet) -> CacheResult<Fingerprint> {
        Fingerprint::of(descriptors)
    }

    /// The fingerprint of the last commit, if any.
    pub fn stored_fingerprint(&self) -> CacheResult<Option<Fingerprint>> {
        match read_optional(&self.fingerprint_path())? {
            Some(text) => Ok(Some(Fingerprint::from_stored(&text))),
            None => Ok(None),
        }
    }

    /// Whether generation must run for `fingerprint`.
    ///
    /// `force` always wins. Otherwise generation runs unless a complete
    /// record with the same fingerprint is on disk.
    pub fn should_generate(&self, fingerprint: &Fingerprint, force: bool) -> CacheResult<bool> {
        if force {
            debug!("regeneration forced");
            return Ok(true);
        }
        let Some(stored) = self.stored_fingerprint()? else {
            debug!(dir = %self.dir.display(), "no previous fingerprint");
            return Ok(true);
        };
        if !self.data_path().exists() {
            debug!(path = %self.data_path().display(), "fingerprint present but data file missing");
            return Ok(true);
        }
        let changed = stored != *fingerprint;
        debug!(stored = stored.short(), current = fingerprint.short(), changed, "compared fingerprints");
        Ok(changed)
    }

    /// Persist `data` as the result of generating for `fingerprint`.
    ///
    /// Overwrites any previous record. The old fingerprint is removed before
    /// the new data lands and the new fingerprint is written last, so an
    /// interrupted commit leaves no fingerprint and forces regeneration.
    pub fn commit(&self, fingerprint: &Fingerprint, data: &GeneratedData) -> CacheResult<()> {
        self.write_data(data)?;
        self.write_atomic(Self::FINGERPRINT_FILE, format!("{fingerprint}\n").as_bytes())?;
        info!(
            dir = %self.dir.display(),
            fingerprint = fingerprint.short(),
            resources = data.len(),
            "committed generated data"
        );
        Ok(())
    }

    /// The data of the last commit, or `None` if nothing was committed.
    pub fn load(&self) -> CacheResult<Option<GeneratedData>> {
        let path = self.data_path();
        match read_optional(&path)? {
            Some(text) => parse_data(&path, &text).map(Some),
            None => Ok(None),
        }
    }

    /// The full last record, if both of its files are present.
    pub fn record(&self) -> CacheResult<Option<CacheRecord>> {
        let Some(fingerprint) = self.stored_fingerprint()? else {
            return Ok(None);
        };
        Ok(self.load()?.map(|data| CacheRecord { fingerprint, data }))
    }

    /// Read a generated-data file from an arbitrary path.
    pub fn load_from(path: &Path) -> CacheResult<GeneratedData> {
        let text = fs::read_to_string(path).map_err(|source| CacheError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_data(path, &text)
    }

    /// First half of a commit: drop the fingerprint, then replace the data.
    fn write_data(&self, data: &GeneratedData) -> CacheResult<()> {
        fs::create_dir_all(&self.dir)?;
        let json = data
            .to_json_pretty()
            .map_err(|e| CacheError::Serialization(e.to_string()))?;
        match fs::remove_file(self.fingerprint_path()) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.write_atomic(Self::DATA_FILE, json.as_bytes())
    }

    fn write_atomic(&self, name: &str, contents: &[u8]) -> CacheResult<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.dir.join(name)).map_err(|e| CacheError::Io(e.error))?;
        Ok(())
    }
}

fn read_optional(path: &Path) -> CacheResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CacheError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_data(path: &Path, text: &str) -> CacheResult<GeneratedData> {
    GeneratedData::from_json(text).map_err(|source| CacheError::InvalidData {
        path: path.to_path_buf(),
        source,
    })
}
