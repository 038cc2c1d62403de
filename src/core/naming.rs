/*
 * Maps user-supplied or stored file names to the canonical path a file is
 * stored and compiled under. Everything lives in the `src/` namespace except
 * the two project configuration files, which stay at the root.
 */

pub const IMPORT_MAP_FILENAME: &str = "import-map.json";
pub const TSCONFIG_FILENAME: &str = "tsconfig.json";
pub const SOURCE_PREFIX: &str = "src/";

pub const APP_FILE: &str = "src/App.vue";
pub const MAIN_FILE: &str = "src/main.vue";
pub const SETUP_FILE: &str = "src/setup.js";

pub fn is_reserved_config_file(name: &str) -> bool {
    name == IMPORT_MAP_FILENAME || name == TSCONFIG_FILENAME
}

/*
 * Pure and total: every input has a canonical form, and the canonical form
 * of a canonical path is itself.
 */
pub fn canonicalize(name: &str) -> String {
    if is_reserved_config_file(name) || name.starts_with(SOURCE_PREFIX) {
        return name.to_string();
    }
    format!("{SOURCE_PREFIX}{name}")
}

// Name shown in the editor tab list.
pub fn display_name(path: &str) -> &str {
    path.strip_prefix(SOURCE_PREFIX).unwrap_or(path)
}
