/*
 * The File Set Store: an insertion-ordered collection of `FileRecord`s keyed
 * by canonical path, plus the designation of the compilation entry point
 * ("main") and the file shown in the editor ("active").
 *
 * The store never compiles anything itself. Callers that `put` a record are
 * responsible for running the compiler on it afterwards. Records are kept in
 * a `Vec` because a playground holds a handful of files and the order is what
 * the editor tab list and the serialized wire form follow.
 */
use crate::core::file_record::FileRecord;
use crate::core::naming::{APP_FILE, MAIN_FILE, SETUP_FILE, TSCONFIG_FILENAME};
use crate::core::templates;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStoreError {
    FileNotFound(String),
    AlreadyExists(String),
}

impl std::fmt::Display for FileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStoreError::FileNotFound(path) => write!(f, "File not found: {path}"),
            FileStoreError::AlreadyExists(path) => write!(f, "File already exists: {path}"),
        }
    }
}

impl std::error::Error for FileStoreError {}

pub type Result<T> = std::result::Result<T, FileStoreError>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileStore {
    records: Vec<FileRecord>,
    main_file: String,
    active_file: String,
}

impl FileStore {
    pub fn new() -> Self {
        FileStore::default()
    }

    /*
     * Builds the default project used when no wire-form state is loaded: the
     * compiler config, the visible welcome application, and the two hidden
     * generated files. The setup file still holds its raw template here; the
     * generation step fills in the stylesheet URL once versions are known.
     */
    pub fn bootstrap() -> Self {
        log::debug!("FileStore: Bootstrapping default project files.");
        let mut store = FileStore::new();
        store.put(TSCONFIG_FILENAME, templates::TSCONFIG_TEMPLATE, true);
        store.put(APP_FILE, templates::WELCOME_TEMPLATE, false);
        store.put(SETUP_FILE, templates::SETUP_TEMPLATE, true);
        store.put(MAIN_FILE, templates::MAIN_TEMPLATE, true);
        store.main_file = MAIN_FILE.to_string();
        store.active_file = APP_FILE.to_string();
        store
    }

    /*
     * Inserts a fresh record or replaces the one at `path` in place, keeping
     * its position. A replaced record loses its compiled artifact.
     */
    pub fn put(&mut self, path: &str, content: &str, hidden: bool) -> &mut FileRecord {
        let record = FileRecord::new(path, content, hidden);
        let index = match self.position(path) {
            Some(index) => {
                log::trace!("FileStore: Replacing '{path}'.");
                self.records[index] = record;
                index
            }
            None => {
                log::trace!("FileStore: Inserting '{path}'.");
                self.records.push(record);
                self.records.len() - 1
            }
        };
        &mut self.records[index]
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.records.iter().find(|record| record.path == path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FileRecord> {
        self.records.iter_mut().find(|record| record.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.position(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FileRecord> {
        self.records.iter_mut()
    }

    pub fn visible_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter().filter(|record| !record.hidden)
    }

    pub fn paths(&self) -> Vec<String> {
        self.records.iter().map(|record| record.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    pub fn active_file(&self) -> &str {
        &self.active_file
    }

    pub fn set_main(&mut self, path: &str) -> Result<()> {
        if !self.contains(path) {
            return Err(FileStoreError::FileNotFound(path.to_string()));
        }
        log::debug!("FileStore: Main file is now '{path}'.");
        self.main_file = path.to_string();
        Ok(())
    }

    pub fn set_active(&mut self, path: &str) -> Result<()> {
        if !self.contains(path) {
            return Err(FileStoreError::FileNotFound(path.to_string()));
        }
        log::debug!("FileStore: Active file is now '{path}'.");
        self.active_file = path.to_string();
        Ok(())
    }

    // Returns false when no record exists at `path`.
    pub fn mark_hidden(&mut self, path: &str) -> bool {
        match self.get_mut(path) {
            Some(record) => {
                record.hidden = true;
                true
            }
            None => false,
        }
    }

    /*
     * Removes the record at `path`. When the removed file was active, the
     * first remaining visible file (or the main file) becomes active.
     */
    pub fn remove(&mut self, path: &str) -> Result<FileRecord> {
        let index = self
            .position(path)
            .ok_or_else(|| FileStoreError::FileNotFound(path.to_string()))?;
        let removed = self.records.remove(index);
        if self.active_file == path {
            let next_active = match self.visible_files().next() {
                Some(record) => record.path.clone(),
                None => self.main_file.clone(),
            };
            self.active_file = next_active;
        }
        log::debug!("FileStore: Removed '{path}'.");
        Ok(removed)
    }

    /*
     * Moves a record to a new path, keeping its position in the store and
     * carrying the main/active designations along with it.
     */
    pub fn rename(&mut self, old_path: &str, new_path: &str) -> Result<()> {
        if old_path == new_path {
            return Ok(());
        }
        if self.contains(new_path) {
            return Err(FileStoreError::AlreadyExists(new_path.to_string()));
        }
        let record = self
            .get_mut(old_path)
            .ok_or_else(|| FileStoreError::FileNotFound(old_path.to_string()))?;
        record.path = new_path.to_string();
        record.compiled = None;
        if self.main_file == old_path {
            self.main_file = new_path.to_string();
        }
        if self.active_file == old_path {
            self.active_file = new_path.to_string();
        }
        log::debug!("FileStore: Renamed '{old_path}' to '{new_path}'.");
        Ok(())
    }

    fn position(&self, path: &str) -> Option<usize> {
        self.records.iter().position(|record| record.path == path)
    }
}
