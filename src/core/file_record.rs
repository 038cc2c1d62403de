/*
 * Defines the in-memory representation of one playground file. The content
 * is authoritative; the compiled artifact is derived by the external compiler
 * and can always be regenerated from the content.
 */
use crate::core::checksum_utils;

/*
 * Output of one compilation run. `source_checksum` identifies the content the
 * artifact was produced from.
 */
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledOutput {
    pub js: String,
    pub css: String,
    pub ssr: String,
    pub errors: Vec<String>,
    pub source_checksum: String,
}

impl CompiledOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: String,
    pub content: String,
    pub hidden: bool,
    pub compiled: Option<CompiledOutput>,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, content: impl Into<String>, hidden: bool) -> Self {
        FileRecord {
            path: path.into(),
            content: content.into(),
            hidden,
            compiled: None,
        }
    }

    pub fn language(&self) -> FileLanguage {
        FileLanguage::from_path(&self.path)
    }

    pub fn content_checksum(&self) -> String {
        checksum_utils::calculate_sha256_checksum(&self.content)
    }

    /*
     * True when a compiled artifact exists and was produced from the current
     * content.
     */
    pub fn is_compiled_current(&self) -> bool {
        match &self.compiled {
            Some(output) => output.source_checksum == self.content_checksum(),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLanguage {
    Vue,
    JavaScript,
    TypeScript,
    Css,
    Json,
    Other,
}

impl FileLanguage {
    pub fn from_path(path: &str) -> Self {
        let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match extension {
            "vue" => FileLanguage::Vue,
            "js" | "mjs" | "jsx" => FileLanguage::JavaScript,
            "ts" | "mts" | "tsx" => FileLanguage::TypeScript,
            "css" => FileLanguage::Css,
            "json" => FileLanguage::Json,
            _ => FileLanguage::Other,
        }
    }
}
