//! Typed ID wrappers for type safety across twitchmedia.
//!
//! File records are keyed by the integer uid assigned by the file index, so
//! these wrap `i64` rather than UUIDs. The newtypes keep a processed-file id
//! from being passed where a file uid is expected.

use serde::{Deserialize, Serialize};

/// Uid of a file record in the file index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(i64);

impl FileId {
    /// Raw integer value, as stored in the database.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for FileId {
    fn from(uid: i64) -> Self {
        Self(uid)
    }
}

impl From<FileId> for i64 {
    fn from(id: FileId) -> Self {
        id.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FileId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Id of a processed (derived) file, such as a resized preview thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessedFileId(i64);

impl ProcessedFileId {
    /// Raw integer value, as stored in the database.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ProcessedFileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProcessedFileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_roundtrip() {
        let id = FileId::from(17);
        assert_eq!(id.get(), 17);
        assert_eq!(i64::from(id), 17);
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn test_file_id_parse() {
        assert_eq!(" 5 ".parse::<FileId>().unwrap(), FileId::from(5));
        assert!("abc".parse::<FileId>().is_err());
    }

    #[test]
    fn test_file_id_serializes_as_number() {
        let json = serde_json::to_string(&FileId::from(3)).unwrap();
        assert_eq!(json, "3");
        let back: FileId = serde_json::from_str("3").unwrap();
        assert_eq!(back, FileId::from(3));
    }
}
