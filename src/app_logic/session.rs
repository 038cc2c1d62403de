/*
 * `PlaygroundSession` is the context object for one playground instance. It
 * owns the File Set Store and the Version Registry, wires the setup-file
 * generator to the component library's version, and implements the two
 * directions of the URL fragment protocol:
 *
 * - `serialize` projects files and versions into a shareable fragment.
 * - `deserialize` validates a fragment completely, then merges it into the
 *   current state, regenerates derived files and recompiles everything.
 *
 * Mutations only mark the session dirty. The host calls `commit` once a batch
 * of changes has settled; that is the single place a fragment is written, so
 * the written URL always reflects a setup file that matches the registered
 * version.
 */
use crate::app_logic::location::LocationOperations;
use crate::app_logic::notifications::Notification;
use crate::core::cdn::{COMPONENT_LIBRARY, CdnUrlOperations};
use crate::core::compiler::CompilerOperations;
use crate::core::config::PlaygroundOptions;
use crate::core::file_record::{FileLanguage, FileRecord};
use crate::core::file_store::{FileStore, FileStoreError};
use crate::core::generation::SetupFileGenerator;
use crate::core::import_map::ImportMap;
use crate::core::naming::{self, APP_FILE, IMPORT_MAP_FILENAME, MAIN_FILE, SETUP_FILE};
use crate::core::templates;
use crate::core::versions::VersionRegistry;
use crate::core::wire::{self, LoadError, WireState};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    FileNotFound(String),
    AlreadyExists(String),
    ProtectedFile(String),
    InvalidFileName(String),
}

impl From<FileStoreError> for SessionError {
    fn from(err: FileStoreError) -> Self {
        match err {
            FileStoreError::FileNotFound(path) => SessionError::FileNotFound(path),
            FileStoreError::AlreadyExists(path) => SessionError::AlreadyExists(path),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::FileNotFound(path) => write!(f, "File not found: {path}"),
            SessionError::AlreadyExists(path) => write!(f, "File already exists: {path}"),
            SessionError::ProtectedFile(path) => {
                write!(f, "{path} is managed by the playground and cannot be changed")
            }
            SessionError::InvalidFileName(name) => write!(f, "Invalid file name: '{name}'"),
        }
    }
}

impl std::error::Error for SessionError {}

pub type Result<T> = std::result::Result<T, SessionError>;

/*
 * One editor action on the file set, as issued by a host. Names are given
 * the way a user types them and are canonicalized before use.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    Add(String),
    Write { name: String, content: String },
    Rename { from: String, to: String },
    Delete(String),
    Activate(String),
}

pub struct PlaygroundSession {
    files: FileStore,
    versions: VersionRegistry,
    options: PlaygroundOptions,
    compiler: Arc<dyn CompilerOperations>,
    cdn: Arc<dyn CdnUrlOperations>,
    location: Arc<dyn LocationOperations>,
    notifications: VecDeque<Notification>,
    dirty: bool,
    last_committed: Option<String>,
}

impl PlaygroundSession {
    /*
     * Bootstraps the default project, seeds the registry from the options,
     * subscribes the setup-file generator (which runs immediately), compiles
     * the project, loads whatever the location fragment holds and commits
     * the resulting state back to the location.
     */
    pub fn new(
        options: PlaygroundOptions,
        compiler: Arc<dyn CompilerOperations>,
        cdn: Arc<dyn CdnUrlOperations>,
        location: Arc<dyn LocationOperations>,
    ) -> Self {
        log::debug!("PlaygroundSession: Creating session with options {options:?}");
        let mut files = FileStore::bootstrap();
        let mut versions = VersionRegistry::new(&options.versions);
        let generator = SetupFileGenerator::new(Arc::clone(&cdn), Arc::clone(&compiler));
        versions.subscribe(COMPONENT_LIBRARY, Box::new(generator), &mut files);
        for record in files.iter_mut() {
            if !record.is_compiled_current() {
                compiler.compile(record);
            }
        }

        let mut session = PlaygroundSession {
            files,
            versions,
            options,
            compiler,
            cdn,
            location,
            notifications: VecDeque::new(),
            dirty: true,
            last_committed: None,
        };

        let fragment = session.location.read_fragment();
        session.deserialize(&fragment);
        session.commit();
        session
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn versions(&self) -> &VersionRegistry {
        &self.versions
    }

    pub fn options(&self) -> &PlaygroundOptions {
        &self.options
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    pub fn serialize(&self) -> String {
        wire::encode_state(
            self.files
                .iter()
                .map(|record| (record.path.as_str(), record.content.as_str())),
            self.versions.entries(),
        )
    }

    /*
     * Loads a fragment, reporting failure as an error notification instead
     * of returning it. A failed load leaves files and versions untouched.
     */
    pub fn deserialize(&mut self, fragment: &str) {
        if let Err(e) = self.load_fragment(fragment) {
            log::error!("PlaygroundSession: {e}");
            self.notifications.push_back(Notification::error(e.to_string()));
        }
    }

    /*
     * Returns `Ok(false)` when the fragment is empty and there was nothing to
     * load. Every fallible step happens in `wire::decode_fragment`, before
     * the first mutation.
     */
    pub fn load_fragment(&mut self, fragment: &str) -> std::result::Result<bool, LoadError> {
        log::trace!("PlaygroundSession: Loading fragment of {} chars.", fragment.len());
        match wire::decode_fragment(fragment)? {
            Some(state) => {
                self.apply_wire_state(state);
                Ok(true)
            }
            None => {
                log::debug!("PlaygroundSession: Empty fragment, keeping current state.");
                Ok(false)
            }
        }
    }

    fn apply_wire_state(&mut self, state: WireState) {
        self.versions.merge_quietly(
            state
                .versions
                .iter()
                .map(|(package, version)| (package.as_str(), version.as_str())),
        );

        for (name, content) in &state.files {
            let path = naming::canonicalize(name);
            self.files.put(&path, content, false);
        }
        if !self.files.contains(MAIN_FILE) {
            self.files.put(MAIN_FILE, templates::MAIN_TEMPLATE, true);
        }
        self.files.mark_hidden(MAIN_FILE);
        self.files.mark_hidden(SETUP_FILE);

        // Derived files always win over whatever the wire form carried.
        self.versions.republish(&mut self.files);
        self.compile_all();

        if let Err(e) = self.files.set_main(MAIN_FILE) {
            log::error!("PlaygroundSession: Could not designate main file: {e}");
        }
        if let Err(e) = self.files.set_active(APP_FILE) {
            log::warn!("PlaygroundSession: Could not activate {APP_FILE}: {e}");
            self.notifications.push_back(Notification::warning(format!(
                "The loaded playground has no {}",
                naming::display_name(APP_FILE)
            )));
        }

        self.dirty = true;
        log::debug!(
            "PlaygroundSession: Loaded {} files; store now holds {}.",
            state.files.len(),
            self.files.len()
        );
    }

    /*
     * Writes the current fragment to the location if anything changed since
     * the last commit. Returns the fragment that was written.
     */
    pub fn commit(&mut self) -> Option<String> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        let fragment = self.serialize();
        if self.last_committed.as_deref() == Some(fragment.as_str()) {
            log::trace!("PlaygroundSession: State unchanged since last commit.");
            return None;
        }
        self.location.replace_fragment(&fragment);
        self.last_committed = Some(fragment.clone());
        log::debug!("PlaygroundSession: Committed fragment ({} chars).", fragment.len());
        Some(fragment)
    }

    pub fn set_version(&mut self, package: &str, version: &str) -> bool {
        let changed = self.versions.set(package, version, &mut self.files);
        if changed {
            self.dirty = true;
        }
        changed
    }

    /*
     * Inserts or replaces a file under the canonical form of `name` and
     * compiles it. Returns the canonical path.
     */
    pub fn put_file(&mut self, name: &str, content: &str, hidden: bool) -> String {
        let path = naming::canonicalize(name);
        let record = self.files.put(&path, content, hidden);
        self.compiler.compile(record);
        self.dirty = true;
        path
    }

    // Editor edit of an existing file; keeps its visibility.
    pub fn update_file(&mut self, path: &str, content: &str) -> Result<()> {
        let hidden = self
            .files
            .get(path)
            .map(|record| record.hidden)
            .ok_or_else(|| SessionError::FileNotFound(path.to_string()))?;
        let record = self.files.put(path, content, hidden);
        self.compiler.compile(record);
        self.dirty = true;
        Ok(())
    }

    /*
     * Creates a new visible file and makes it active. Component files start
     * from the new-file template, everything else starts empty.
     */
    pub fn add_file(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidFileName(name.to_string()));
        }
        let path = naming::canonicalize(name);
        if self.files.contains(&path) {
            return Err(SessionError::AlreadyExists(path));
        }
        let content = match FileLanguage::from_path(&path) {
            FileLanguage::Vue => templates::NEW_FILE_TEMPLATE,
            _ => "",
        };
        self.put_file(&path, content, false);
        self.files.set_active(&path)?;
        log::debug!("PlaygroundSession: Added file '{path}'.");
        Ok(path)
    }

    pub fn delete_file(&mut self, path: &str) -> Result<FileRecord> {
        self.ensure_not_protected(path)?;
        let removed = self.files.remove(path)?;
        self.dirty = true;
        Ok(removed)
    }

    pub fn rename_file(&mut self, old_path: &str, new_name: &str) -> Result<String> {
        self.ensure_not_protected(old_path)?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(SessionError::InvalidFileName(new_name.to_string()));
        }
        let new_path = naming::canonicalize(new_name);
        self.files.rename(old_path, &new_path)?;
        if let Some(record) = self.files.get_mut(&new_path) {
            self.compiler.compile(record);
        }
        self.dirty = true;
        Ok(new_path)
    }

    // Active file is editor state only and is not part of the fragment.
    pub fn set_active(&mut self, path: &str) -> Result<()> {
        self.files.set_active(path)?;
        Ok(())
    }

    pub fn apply_action(&mut self, action: &FileAction) -> Result<()> {
        log::debug!("PlaygroundSession: Applying {action:?}");
        match action {
            FileAction::Add(name) => {
                self.add_file(name)?;
            }
            FileAction::Write { name, content } => {
                let path = naming::canonicalize(name.trim());
                if self.files.contains(&path) {
                    self.update_file(&path, content)?;
                } else {
                    self.put_file(&path, content, false);
                }
            }
            FileAction::Rename { from, to } => {
                self.rename_file(&naming::canonicalize(from.trim()), to)?;
            }
            FileAction::Delete(name) => {
                self.delete_file(&naming::canonicalize(name.trim()))?;
            }
            FileAction::Activate(name) => {
                self.set_active(&naming::canonicalize(name.trim()))?;
            }
        }
        Ok(())
    }

    /*
     * Applies an action, reporting failure as an error notification the
     * same way a failed load is reported. Returns whether it succeeded.
     */
    pub fn perform(&mut self, action: &FileAction) -> bool {
        match self.apply_action(action) {
            Ok(()) => true,
            Err(e) => {
                log::error!("PlaygroundSession: {e}");
                self.notifications.push_back(Notification::error(e.to_string()));
                false
            }
        }
    }

    /*
     * The import map the preview resolves modules with: builtin entries for
     * the registered versions, overridden by a valid `import-map.json`.
     */
    pub fn import_map(&self) -> ImportMap {
        let builtin =
            ImportMap::builtin(&self.versions, self.cdn.as_ref(), self.options.production_mode);
        let Some(record) = self.files.get(IMPORT_MAP_FILENAME) else {
            return builtin;
        };
        match ImportMap::parse(&record.content) {
            Ok(user) => builtin.merged_with(user),
            Err(e) => {
                log::warn!("PlaygroundSession: Ignoring invalid {IMPORT_MAP_FILENAME}: {e}");
                builtin
            }
        }
    }

    fn compile_all(&mut self) {
        for record in self.files.iter_mut() {
            self.compiler.compile(record);
        }
    }

    fn ensure_not_protected(&self, path: &str) -> Result<()> {
        if path == self.files.main_file() || path == SETUP_FILE {
            return Err(SessionError::ProtectedFile(path.to_string()));
        }
        Ok(())
    }
}
