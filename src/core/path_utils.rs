/*
 * This module provides utility functions for locating the application's
 * local configuration directory, where user settings such as the preferred
 * CDN are kept between runs.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the application's local configuration directory, creating it if
 * necessary. The path is derived without an organization qualifier, placing
 * it directly under the user's local application data directory (for
 * example `~/.config/<app_name>` on Linux).
 *
 * Returns `None` if the platform has no suitable location or the directory
 * could not be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!(
        "PathUtils: Attempting to get base app config local dir for '{}'",
        app_name
    );
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {:?}: {}",
                    config_path,
                    e
                );
                return None;
            }
            log::debug!(
                "PathUtils: Created base app config directory: {:?}",
                config_path
            );
        }
        Some(config_path.to_path_buf())
    })
}
