//! On-disk transcript storage.
//!
//! Transcripts live as pretty-printed JSON arrays, one file per conversation,
//! in a single flat directory.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::{from_reader, to_writer_pretty};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::observability::{STORE_ERRORS, STORE_LOADS, STORE_SAVES};
use crate::types::{Message, Transcript};
use crate::utils::time::conversation_stamp;

/// Extension carried by every saved transcript.
pub const TRANSCRIPT_EXTENSION: &str = ".json";

/// A directory of saved transcripts.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    /// Creates a store rooted at `dir`.  The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `transcript` and returns the path written.
    ///
    /// Without a name, one is generated from the current local time as
    /// `conversation_YYYYMMDD_HHMMSS`.  `.json` is appended unless already
    /// present, and an existing file of the same name is overwritten.
    pub fn save(&self, transcript: &[Message], name: Option<&str>) -> Result<PathBuf> {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => default_name(now()),
        };
        let path = self.dir.join(with_extension(name));
        self.write(transcript, &path).inspect_err(|_| STORE_ERRORS.click())?;
        STORE_SAVES.click();
        Ok(path)
    }

    /// Loads the transcript called `name`.
    ///
    /// A bare file name is looked up inside the store directory; anything with
    /// a directory component is used as given.
    pub fn load(&self, name: &str) -> Result<Transcript> {
        let path = self.resolve(name);
        let transcript = self.read(&path).inspect_err(|_| STORE_ERRORS.click())?;
        STORE_LOADS.click();
        Ok(transcript)
    }

    /// Lists saved transcript file names in lexicographic order.
    ///
    /// A store whose directory does not exist yet is empty.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(Error::io(
                    format!("failed to read {}", self.dir.display()),
                    err,
                ));
            }
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|err| Error::io(format!("failed to read {}", self.dir.display()), err))?;
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(TRANSCRIPT_EXTENSION) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Maps a user-supplied name onto a path.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        let bare = path
            .parent()
            .map(|parent| parent.as_os_str().is_empty())
            .unwrap_or(true);
        if bare && !path.is_absolute() {
            self.dir.join(path)
        } else {
            path.to_path_buf()
        }
    }

    fn write(&self, transcript: &[Message], path: &Path) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| Error::io(format!("failed to create {}", self.dir.display()), err))?;
        let file = File::create(path)
            .map_err(|err| Error::io(format!("failed to create {}", path.display()), err))?;
        let mut writer = BufWriter::new(file);
        to_writer_pretty(&mut writer, transcript).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })?;
        writer
            .flush()
            .map_err(|err| Error::io(format!("failed to write {}", path.display()), err))
    }

    fn read(&self, path: &Path) -> Result<Transcript> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(Error::not_found(
                    format!("File {} not found", path.display()),
                    None,
                ));
            }
            Err(err) => {
                return Err(Error::io(format!("failed to open {}", path.display()), err));
            }
        };
        from_reader(BufReader::new(file)).map_err(|err| {
            Error::serialization(
                format!("File {} is not a valid transcript", path.display()),
                Some(Box::new(err)),
            )
        })
    }
}

/// The generated name for a transcript saved at `at`.
pub fn default_name(at: OffsetDateTime) -> String {
    format!("conversation_{}", conversation_stamp(at))
}

fn with_extension(name: String) -> String {
    if name.ends_with(TRANSCRIPT_EXTENSION) {
        name
    } else {
        format!("{name}{TRANSCRIPT_EXTENSION}")
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Transcript {
        vec![
            Message::user("What is 2 + 2?"),
            Message::assistant("4"),
            Message::user("And in base 3?"),
            Message::assistant("11"),
        ]
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("convo_hist"));

        let path = store.save(&sample(), Some("math")).unwrap();
        assert_eq!(path, dir.path().join("convo_hist").join("math.json"));
        assert_eq!(store.load("math.json").unwrap(), sample());
    }

    #[test]
    fn round_trip_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        let transcript = vec![Message::user("¿Qué tal?"), Message::assistant("Très bien ✓")];

        store.save(&transcript, Some("intl.json")).unwrap();
        let raw = fs::read_to_string(dir.path().join("intl.json")).unwrap();
        assert!(raw.contains("Très bien ✓"));
        assert_eq!(store.load("intl.json").unwrap(), transcript);
    }

    #[test]
    fn saved_file_is_indented_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        store.save(&[Message::user("hi")], Some("tiny")).unwrap();
        let raw = fs::read_to_string(dir.path().join("tiny.json")).unwrap();
        assert_eq!(raw, "[\n  {\n    \"role\": \"user\",\n    \"content\": \"hi\"\n  }\n]");
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        store.save(&sample(), Some("same")).unwrap();
        store.save(&[Message::user("short")], Some("same.json")).unwrap();
        assert_eq!(store.load("same.json").unwrap(), vec![Message::user("short")]);
        assert_eq!(store.list().unwrap(), vec!["same.json".to_string()]);
    }

    #[test]
    fn save_without_name_uses_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        let path = store.save(&sample(), None).unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(name.starts_with("conversation_"));
        assert!(name.ends_with(".json"));
        let stamp = &name["conversation_".len()..name.len() - ".json".len()];
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(
            stamp
                .chars()
                .enumerate()
                .all(|(i, c)| if i == 8 { c == '_' } else { c.is_ascii_digit() })
        );
    }

    #[test]
    fn blank_name_is_treated_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        let path = store.save(&sample(), Some("   ")).unwrap();
        assert!(
            path.file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("conversation_")
        );
    }

    #[test]
    fn default_name_format() {
        assert_eq!(
            default_name(datetime!(2025-02-07 09:05:03 UTC)),
            "conversation_20250207_090503"
        );
    }

    #[test]
    fn list_is_sorted_regardless_of_save_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        for name in ["charlie", "alpha", "bravo"] {
            store.save(&sample(), Some(name)).unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "not a transcript").unwrap();

        assert_eq!(
            store.list().unwrap(),
            vec![
                "alpha.json".to_string(),
                "bravo.json".to_string(),
                "charlie.json".to_string()
            ]
        );
    }

    #[test]
    fn list_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("never-created"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        let err = store.load("missing.json").unwrap_err();
        assert!(err.is_not_found());
        let path = dir.path().join("missing.json");
        assert_eq!(
            err.to_string(),
            format!("Not found: File {} not found", path.display())
        );
    }

    #[test]
    fn load_invalid_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        fs::write(dir.path().join("broken.json"), "{ definitely not").unwrap();
        fs::write(
            dir.path().join("wrong-role.json"),
            r#"[{"role": "system", "content": "x"}]"#,
        )
        .unwrap();

        assert!(store.load("broken.json").unwrap_err().is_serialization());
        assert!(store.load("wrong-role.json").unwrap_err().is_serialization());
    }

    #[test]
    fn load_path_with_directory_bypasses_store() {
        let dir = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        let store = TranscriptStore::new(dir.path());
        TranscriptStore::new(elsewhere.path())
            .save(&sample(), Some("outside"))
            .unwrap();

        let path = elsewhere.path().join("outside.json");
        assert_eq!(store.resolve(path.to_str().unwrap()), path);
        assert_eq!(store.load(path.to_str().unwrap()).unwrap(), sample());
    }

    #[test]
    fn resolve_bare_and_relative_names() {
        let store = TranscriptStore::new("convo_hist");
        assert_eq!(
            store.resolve("chat.json"),
            PathBuf::from("convo_hist/chat.json")
        );
        assert_eq!(
            store.resolve("other/chat.json"),
            PathBuf::from("other/chat.json")
        );
    }
}
