/*
 * Resolves package asset URLs against one of a fixed set of public npm CDNs.
 * URL building is a pure string operation; fetching anything from those URLs
 * happens outside this crate. The module also understands the jsdelivr
 * package index response so callers can offer a list of selectable versions.
 */
use serde::Deserialize;
use std::cmp::Ordering;

pub const DEFAULT_CDN: &str = "unpkg";
pub const DEFAULT_VERSION: &str = "latest";
pub const COMPONENT_LIBRARY: &str = "cdx-component";
pub const MIN_COMPONENT_VERSION: &str = "0.0.7";

const CDN_TEMPLATES: &[(&str, &str)] = &[
    ("unpkg", "https://unpkg.com/{pkg}@{version}/{path}"),
    ("jsdelivr", "https://fastly.jsdelivr.net/npm/{pkg}@{version}/{path}"),
    ("elemecdn", "https://npm.elemecdn.com/{pkg}@{version}/{path}"),
];

const VERSIONS_INDEX_URL: &str = "https://data.jsdelivr.com/v1/package/npm/";

pub trait CdnUrlOperations: Send + Sync {
    fn url_for(&self, pkg: &str, asset_path: &str, version: &str) -> String;
}

pub fn cdn_names() -> impl Iterator<Item = &'static str> {
    CDN_TEMPLATES.iter().map(|(name, _)| *name)
}

pub fn is_known_cdn(name: &str) -> bool {
    cdn_names().any(|known| known == name)
}

/*
 * Template-based resolver. An unknown provider name falls back to the
 * default provider rather than failing, so a stale persisted setting never
 * breaks URL generation.
 */
#[derive(Debug, Clone)]
pub struct TemplateCdn {
    name: String,
    template: &'static str,
}

impl TemplateCdn {
    pub fn new(name: &str) -> Self {
        let found = CDN_TEMPLATES.iter().find(|(known, _)| *known == name);
        let (name, template) = match found {
            Some((known, template)) => (*known, *template),
            None => {
                log::warn!("TemplateCdn: Unknown CDN '{name}', falling back to '{DEFAULT_CDN}'.");
                CDN_TEMPLATES[0]
            }
        };
        TemplateCdn {
            name: name.to_string(),
            template,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TemplateCdn {
    fn default() -> Self {
        Self::new(DEFAULT_CDN)
    }
}

impl CdnUrlOperations for TemplateCdn {
    fn url_for(&self, pkg: &str, asset_path: &str, version: &str) -> String {
        let version = if version.trim().is_empty() {
            DEFAULT_VERSION
        } else {
            version
        };
        self.template
            .replacen("{pkg}", pkg, 1)
            .replacen("{version}", version, 1)
            .replacen("{path}", asset_path, 1)
    }
}

pub fn versions_index_url(pkg: &str) -> String {
    format!("{VERSIONS_INDEX_URL}{pkg}")
}

#[derive(Debug, Deserialize)]
struct PackageIndex {
    #[serde(default)]
    versions: Vec<String>,
}

pub fn parse_versions_index(body: &str) -> serde_json::Result<Vec<String>> {
    let index: PackageIndex = serde_json::from_str(body)?;
    Ok(index.versions)
}

/*
 * Component library releases older than `MIN_COMPONENT_VERSION` do not ship
 * the theme stylesheet, so they are not offered. Pre-release suffixes are
 * ignored for the comparison.
 */
pub fn selectable_component_versions(versions: Vec<String>) -> Vec<String> {
    versions
        .into_iter()
        .filter(|version| {
            let base = version.split('-').next().unwrap_or(version.as_str());
            compare_dotted(base, MIN_COMPONENT_VERSION) != Ordering::Less
        })
        .collect()
}

// Numeric comparison of dotted version strings; non-numeric parts count as 0.
fn compare_dotted(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| -> Vec<u64> { s.split('.').map(|p| p.parse().unwrap_or(0)).collect() };
    let (left, right) = (parse(a), parse(b));
    let len = left.len().max(right.len());
    for i in 0..len {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}
