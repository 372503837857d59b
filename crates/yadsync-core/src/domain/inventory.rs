//! File records and inventories
//!
//! An [`Inventory`] is a name → [`FileRecord`] snapshot of one side (local
//! folder or remote root) taken during a single cycle. Inventories are
//! rebuilt from scratch every cycle, so deletions and renames are detected
//! purely by absence.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// FileName
// ============================================================================

/// A validated basename (no path separators, not `.` or `..`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileName(String);

impl FileName {
    /// Create a new FileName
    ///
    /// # Errors
    /// Returns error if the name is empty, is a relative component, or
    /// contains `/`, `\` or NUL.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.is_empty() || name == "." || name == ".." {
            return Err(DomainError::InvalidFileName(name));
        }

        if name.contains(['/', '\\', '\0']) {
            return Err(DomainError::InvalidFileName(name));
        }

        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FileName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FileName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FileName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<FileName> for String {
    fn from(name: FileName) -> Self {
        name.0
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// FileRecord
// ============================================================================

/// One file as seen on either side during a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Basename of the file
    pub name: FileName,
    /// Size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Creates a new FileRecord
    pub fn new(name: FileName, size: u64) -> Self {
        Self { name, size }
    }
}

// ============================================================================
// Inventory
// ============================================================================

/// Name-keyed snapshot of the files on one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    files: BTreeMap<FileName, FileRecord>,
}

impl Inventory {
    /// Creates an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any previous record with the same name
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        self.files.insert(record.name.clone(), record)
    }

    /// Looks up a record by name
    pub fn get(&self, name: &FileName) -> Option<&FileRecord> {
        self.files.get(name)
    }

    /// Returns true if a file with this name is present
    pub fn contains(&self, name: &FileName) -> bool {
        self.files.contains_key(name)
    }

    /// Number of files in the inventory
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the inventory holds no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterates over the file names in sorted order
    pub fn names(&self) -> btree_map::Keys<'_, FileName, FileRecord> {
        self.files.keys()
    }

    /// Iterates over the records in name order
    pub fn records(&self) -> btree_map::Values<'_, FileName, FileRecord> {
        self.files.values()
    }

    /// Sum of all file sizes in bytes
    pub fn total_bytes(&self) -> u64 {
        self.files.values().map(|r| r.size).sum()
    }
}

impl FromIterator<FileRecord> for Inventory {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for record in iter {
            inventory.insert(record);
        }
        inventory
    }
}

impl Extend<FileRecord> for Inventory {
    fn extend<I: IntoIterator<Item = FileRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}
