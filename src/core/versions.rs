/*
 * The Version Registry: a mapping from npm package name to the version
 * specifier the playground loads it at. Observers subscribe to a single
 * package key and are called synchronously whenever that key's value
 * changes, and once immediately on subscription, so anything derived from
 * a version is produced at startup even if the version never changes.
 *
 * Observers receive the File Set Store mutably because the only thing a
 * version change derives is file content. The registry and the store are
 * separate fields of the session, so this borrow never conflicts.
 */
use crate::core::cdn::{COMPONENT_LIBRARY, DEFAULT_VERSION};
use crate::core::file_store::FileStore;
use std::collections::BTreeMap;

pub const FRAMEWORK_PACKAGE: &str = "vue";
pub const TYPESCRIPT_PACKAGE: &str = "typescript";
pub const DEFAULT_FRAMEWORK_VERSION: &str = "3.3.11";

pub trait VersionObserver: Send {
    fn on_version_changed(&mut self, package: &str, version: &str, files: &mut FileStore);
}

struct Subscription {
    package: String,
    observer: Box<dyn VersionObserver>,
}

pub fn default_versions() -> BTreeMap<String, String> {
    BTreeMap::from([
        (COMPONENT_LIBRARY.to_string(), DEFAULT_VERSION.to_string()),
        (FRAMEWORK_PACKAGE.to_string(), DEFAULT_FRAMEWORK_VERSION.to_string()),
        (TYPESCRIPT_PACKAGE.to_string(), DEFAULT_VERSION.to_string()),
    ])
}

pub struct VersionRegistry {
    versions: BTreeMap<String, String>,
    subscriptions: Vec<Subscription>,
}

impl VersionRegistry {
    /*
     * Seeds the registry with the built-in defaults and applies `overrides`
     * on top, last write wins per key.
     */
    pub fn new(overrides: &BTreeMap<String, String>) -> Self {
        let mut versions = default_versions();
        for (package, version) in overrides {
            versions.insert(package.clone(), version.clone());
        }
        log::debug!("VersionRegistry: Initialized with {versions:?}");
        VersionRegistry {
            versions,
            subscriptions: Vec::new(),
        }
    }

    pub fn get(&self, package: &str) -> Option<&str> {
        self.versions.get(package).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.versions
    }

    pub fn subscribe(
        &mut self,
        package: &str,
        mut observer: Box<dyn VersionObserver>,
        files: &mut FileStore,
    ) {
        match self.versions.get(package) {
            Some(version) => observer.on_version_changed(package, version, files),
            None => log::warn!(
                "VersionRegistry: Subscribed to '{package}' which has no version; nothing derived yet."
            ),
        }
        self.subscriptions.push(Subscription {
            package: package.to_string(),
            observer,
        });
    }

    /*
     * Overwrites the version of `package`. Observers of that key run only
     * when the stored value actually changes. Returns whether it changed.
     */
    pub fn set(&mut self, package: &str, version: &str, files: &mut FileStore) -> bool {
        if self.get(package) == Some(version) {
            log::trace!("VersionRegistry: '{package}' already at '{version}', nothing to do.");
            return false;
        }
        log::debug!("VersionRegistry: Setting '{package}' to '{version}'.");
        self.versions.insert(package.to_string(), version.to_string());
        self.notify(package, files);
        true
    }

    /*
     * Overwrites entries without notifying anyone and returns the keys whose
     * value changed. Used while rehydrating, where observers are republished
     * once after all files are in place.
     */
    pub fn merge_quietly<'a>(
        &mut self,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Vec<String> {
        let mut changed = Vec::new();
        for (package, version) in entries {
            if self.get(package) != Some(version) {
                self.versions.insert(package.to_string(), version.to_string());
                changed.push(package.to_string());
            }
        }
        if !changed.is_empty() {
            log::debug!("VersionRegistry: Merged changes for {changed:?}.");
        }
        changed
    }

    // Runs every observer once against the current values.
    pub fn republish(&mut self, files: &mut FileStore) {
        for subscription in self.subscriptions.iter_mut() {
            if let Some(version) = self.versions.get(&subscription.package) {
                subscription
                    .observer
                    .on_version_changed(&subscription.package, version, files);
            }
        }
    }

    fn notify(&mut self, package: &str, files: &mut FileStore) {
        let Some(version) = self.versions.get(package) else {
            return;
        };
        for subscription in self
            .subscriptions
            .iter_mut()
            .filter(|subscription| subscription.package == package)
        {
            subscription.observer.on_version_changed(package, version, files);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingObserver {
        calls: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl VersionObserver for RecordingObserver {
        fn on_version_changed(&mut self, package: &str, version: &str, files: &mut FileStore) {
            self.calls
                .lock()
                .unwrap()
                .push((package.to_string(), version.to_string()));
            files.put("src/version.txt", version, true);
        }
    }

    fn recording_observer() -> (Box<dyn VersionObserver>, Arc<Mutex<Vec<(String, String)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let observer = RecordingObserver {
            calls: Arc::clone(&calls),
        };
        (Box::new(observer), calls)
    }

    #[test]
    fn test_new_applies_defaults_then_overrides() {
        let overrides = BTreeMap::from([
            ("vue".to_string(), "3.4.0".to_string()),
            ("pinia".to_string(), "2.1.0".to_string()),
        ]);
        let registry = VersionRegistry::new(&overrides);

        assert_eq!(registry.get("vue"), Some("3.4.0"));
        assert_eq!(registry.get("pinia"), Some("2.1.0"));
        assert_eq!(registry.get(COMPONENT_LIBRARY), Some("latest"));
        assert_eq!(registry.get("typescript"), Some("latest"));
    }

    #[test]
    fn test_subscribe_notifies_immediately() {
        let mut registry = VersionRegistry::new(&BTreeMap::new());
        let mut files = FileStore::new();
        let (observer, calls) = recording_observer();

        registry.subscribe(COMPONENT_LIBRARY, observer, &mut files);

        assert_eq!(
            *calls.lock().unwrap(),
            vec![(COMPONENT_LIBRARY.to_string(), "latest".to_string())]
        );
        assert_eq!(files.get("src/version.txt").unwrap().content, "latest");
    }

    #[test]
    fn test_set_notifies_only_matching_key_and_only_on_change() {
        // Arrange
        let mut registry = VersionRegistry::new(&BTreeMap::new());
        let mut files = FileStore::new();
        let (observer, calls) = recording_observer();
        registry.subscribe(COMPONENT_LIBRARY, observer, &mut files);
        calls.lock().unwrap().clear();

        // Act
        assert!(registry.set("vue", "3.4.0", &mut files));
        assert!(!registry.set(COMPONENT_LIBRARY, "latest", &mut files));
        assert!(registry.set(COMPONENT_LIBRARY, "1.2.3", &mut files));

        // Assert
        assert_eq!(
            *calls.lock().unwrap(),
            vec![(COMPONENT_LIBRARY.to_string(), "1.2.3".to_string())]
        );
        assert_eq!(files.get("src/version.txt").unwrap().content, "1.2.3");
    }

    #[test]
    fn test_merge_quietly_reports_changes_without_notifying() {
        let mut registry = VersionRegistry::new(&BTreeMap::new());
        let mut files = FileStore::new();
        let (observer, calls) = recording_observer();
        registry.subscribe(COMPONENT_LIBRARY, observer, &mut files);
        calls.lock().unwrap().clear();

        let changed = registry.merge_quietly([("vue", "3.2.0"), (COMPONENT_LIBRARY, "latest")]);

        assert_eq!(changed, vec!["vue".to_string()]);
        assert_eq!(registry.get("vue"), Some("3.2.0"));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_republish_runs_every_observer_once() {
        let mut registry = VersionRegistry::new(&BTreeMap::new());
        let mut files = FileStore::new();
        let (first, first_calls) = recording_observer();
        let (second, second_calls) = recording_observer();
        registry.subscribe(COMPONENT_LIBRARY, first, &mut files);
        registry.subscribe("vue", second, &mut files);
        first_calls.lock().unwrap().clear();
        second_calls.lock().unwrap().clear();

        registry.republish(&mut files);

        assert_eq!(first_calls.lock().unwrap().len(), 1);
        assert_eq!(
            *second_calls.lock().unwrap(),
            vec![("vue".to_string(), DEFAULT_FRAMEWORK_VERSION.to_string())]
        );
    }

    #[test]
    fn test_subscribe_to_missing_package_defers_until_set() {
        let mut registry = VersionRegistry::new(&BTreeMap::new());
        let mut files = FileStore::new();
        let (observer, calls) = recording_observer();

        registry.subscribe("pinia", observer, &mut files);
        assert!(calls.lock().unwrap().is_empty());

        registry.set("pinia", "2.1.0", &mut files);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}
