/*
 * Builds the import map the preview sandbox resolves bare module specifiers
 * with. The builtin map points the framework runtime, its server renderer
 * and the component library at the configured CDN; a user-authored
 * `import-map.json` is merged on top, its entries winning.
 */
use crate::core::cdn::{COMPONENT_LIBRARY, CdnUrlOperations};
use crate::core::versions::{FRAMEWORK_PACKAGE, VersionRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportMap {
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scopes: BTreeMap<String, BTreeMap<String, String>>,
}

impl ImportMap {
    pub fn builtin(
        versions: &VersionRegistry,
        cdn: &dyn CdnUrlOperations,
        production_mode: bool,
    ) -> Self {
        let framework_version = versions.get(FRAMEWORK_PACKAGE).unwrap_or_default();
        let suffix = if production_mode { ".prod.js" } else { ".js" };
        let mut imports = BTreeMap::new();
        imports.insert(
            FRAMEWORK_PACKAGE.to_string(),
            cdn.url_for(
                "@vue/runtime-dom",
                &format!("dist/runtime-dom.esm-browser{suffix}"),
                framework_version,
            ),
        );
        imports.insert(
            "vue/server-renderer".to_string(),
            cdn.url_for(
                "@vue/server-renderer",
                &format!("dist/server-renderer.esm-browser{suffix}"),
                framework_version,
            ),
        );
        imports.insert(
            COMPONENT_LIBRARY.to_string(),
            cdn.url_for(
                COMPONENT_LIBRARY,
                "index.esm.js",
                versions.get(COMPONENT_LIBRARY).unwrap_or_default(),
            ),
        );
        ImportMap {
            imports,
            scopes: BTreeMap::new(),
        }
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn merged_with(mut self, user: ImportMap) -> Self {
        self.imports.extend(user.imports);
        for (scope, entries) in user.scopes {
            self.scopes.entry(scope).or_default().extend(entries);
        }
        self
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
