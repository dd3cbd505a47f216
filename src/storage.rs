use crate::address_book::{AddressBook, Record};
use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const DATA_FILE: &str = "addressbook.json";
const SNAPSHOT_VERSION: u32 = 1;
// Maximum allowed size for the snapshot file (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    contacts: Vec<&'a Record>,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    #[serde(default)]
    contacts: Vec<Record>,
}

/// Serializes the whole book into a snapshot blob
pub fn to_snapshot(book: &AddressBook) -> Result<Vec<u8>> {
    let snapshot = SnapshotRef { version: SNAPSHOT_VERSION, contacts: book.records().collect() };
    serde_json::to_vec_pretty(&snapshot).context("Failed to serialize address book")
}

/// Rebuilds a book from a blob produced by [`to_snapshot`]
pub fn from_snapshot(bytes: &[u8]) -> Result<AddressBook> {
    let snapshot: Snapshot =
        serde_json::from_slice(bytes).map_err(|e| anyhow!("Failed to parse address book: {}", e))?;
    check_version(snapshot.version)?;

    let mut book = AddressBook::new();
    for record in snapshot.contacts {
        let name = record.name().value().to_string();
        if book.add_record(record).is_some() {
            return Err(anyhow!("Address book lists contact '{}' more than once", name));
        }
    }
    Ok(book)
}

fn check_version(version: u32) -> Result<()> {
    if version > SNAPSHOT_VERSION {
        return Err(anyhow!(
            "Address book was written by a newer version (format {}, supported {})",
            version,
            SNAPSHOT_VERSION
        ));
    }
    Ok(())
}

/// Loads and saves the address book snapshot file
#[derive(Debug, Clone)]
pub struct StateManager {
    path: PathBuf,
}

impl StateManager {
    pub fn new(config: &Config) -> Result<Self> {
        match &config.storage.data_file {
            Some(path) => Ok(Self::with_path(path)),
            None => Ok(Self::with_path(default_data_path()?)),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot. A missing file gives an empty book.
    pub fn load(&self) -> Result<AddressBook> {
        if !self.path.exists() {
            log::info!("No address book at {}, starting empty", self.path.display());
            return Ok(AddressBook::new());
        }

        let metadata = fs::metadata(&self.path)?;
        if metadata.len() > MAX_FILE_SIZE {
            return Err(anyhow!("File size exceeds security limits"));
        }

        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        File::open(&self.path)
            .and_then(|mut file| file.read_to_end(&mut bytes))
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let book = from_snapshot(&bytes)
            .with_context(|| format!("Invalid address book {}", self.path.display()))?;
        log::info!("Loaded {} contacts from {}", book.len(), self.path.display());
        Ok(book)
    }

    /// Writes the snapshot to a sibling temp file and renames it over the
    /// target, so a failed save leaves the previous snapshot in place.
    pub fn save(&self, book: &AddressBook) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        if let Err(e) = write_snapshot(&tmp_path, book) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.context(format!("Failed to write {}", self.path.display())));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }
        log::info!("Saved {} contacts to {}", book.len(), self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name =
            self.path.file_name().map(|name| name.to_os_string()).unwrap_or_else(|| DATA_FILE.into());
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

fn write_snapshot(path: &Path, book: &AddressBook) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let snapshot = SnapshotRef { version: SNAPSHOT_VERSION, contacts: book.records().collect() };
    serde_json::to_writer_pretty(&mut writer, &snapshot).context("Failed to serialize address book")?;
    writer.flush().context("Failed to flush address book")?;
    writer.get_ref().sync_all().context("Failed to sync address book")?;
    Ok(())
}

fn default_data_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "contactbook", "contactbook")
        .context("Failed to determine data directory")?;
    Ok(proj_dirs.data_dir().join(DATA_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_book() -> AddressBook {
        let mut alice = Record::new("Alice");
        alice.add_phone("1112223333").unwrap();
        alice.add_phone("4445556666").unwrap();
        alice.add_phone("1112223333").unwrap();
        alice.set_birthday("29.02.2000").unwrap();
        let mut bob = Record::new("Bob");
        bob.add_phone("5551234567").unwrap();
        [alice, bob, Record::new("Carol")].into_iter().collect()
    }

    #[test]
    fn test_snapshot_round_trip() -> Result<()> {
        let book = sample_book();
        let restored = from_snapshot(&to_snapshot(&book)?)?;
        assert_eq!(restored, book);
        Ok(())
    }

    #[test]
    fn test_snapshot_format() -> Result<()> {
        let mut book = AddressBook::new();
        let mut alice = Record::new("Alice");
        alice.add_phone("1112223333").unwrap();
        alice.set_birthday("15.06.1990").unwrap();
        book.add_record(alice);

        let value: serde_json::Value = serde_json::from_slice(&to_snapshot(&book)?)?;
        assert_eq!(
            value,
            serde_json::json!({
                "version": 1,
                "contacts": [
                    {"name": "Alice", "phones": ["1112223333"], "birthday": "15.06.1990"}
                ]
            })
        );
        Ok(())
    }

    #[test]
    fn test_snapshot_with_invalid_phone_is_rejected() {
        let blob = br#"{"version": 1, "contacts": [{"name": "Alice", "phones": ["12"]}]}"#;
        let err = from_snapshot(blob).unwrap_err();
        assert!(err.to_string().contains("invalid phone '12'"), "{}", err);
    }

    #[test]
    fn test_snapshot_from_newer_version_is_rejected() {
        let blob = br#"{"version": 2, "contacts": []}"#;
        assert!(from_snapshot(blob).is_err());
    }

    #[test]
    fn test_snapshot_with_duplicate_names_is_rejected() {
        let blob = br#"{"version": 1, "contacts": [
            {"name": "Alice", "phones": ["1112223333"]},
            {"name": "Alice", "phones": []}
        ]}"#;
        let err = from_snapshot(blob).unwrap_err();
        assert!(err.to_string().contains("'Alice' more than once"), "{}", err);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failure_is_reported() {
        // /dev/full accepts the open and fails every write with ENOSPC
        let err = write_snapshot(Path::new("/dev/full"), &sample_book()).unwrap_err();
        assert!(format!("{:#}", err).contains("address book"), "{:#}", err);
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join(DATA_FILE);
        let manager = StateManager::with_path(&path);
        manager.save(&sample_book())?;

        // A directory in the temp file's place makes the next write fail
        fs::create_dir(manager.tmp_path())?;
        assert!(manager.save(&AddressBook::new()).is_err());
        assert_eq!(manager.load()?, sample_book());
        Ok(())
    }

    #[test]
    fn test_save_leaves_no_temp_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let manager = StateManager::with_path(temp_dir.path().join(DATA_FILE));
        manager.save(&sample_book())?;
        assert!(!manager.tmp_path().exists());
        Ok(())
    }

    #[test]
    fn test_missing_file_loads_empty_book() -> Result<()> {
        let temp_dir = tempdir()?;
        let manager = StateManager::with_path(temp_dir.path().join("absent.json"));
        assert!(manager.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let temp_dir = tempdir()?;
        let manager = StateManager::with_path(temp_dir.path().join("nested").join(DATA_FILE));

        let book = sample_book();
        manager.save(&book)?;
        assert_eq!(manager.load()?, book);

        // Saving again truncates the previous content
        manager.save(&AddressBook::new())?;
        assert!(manager.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_configured_data_file_is_used() -> Result<()> {
        let mut config = Config::default();
        config.storage.data_file = Some(PathBuf::from("/tmp/contactbook-test.json"));
        let manager = StateManager::new(&config)?;
        assert_eq!(manager.path(), Path::new("/tmp/contactbook-test.json"));
        Ok(())
    }
}
