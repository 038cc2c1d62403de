/*
 * The compiler seam. The in-browser SFC compiler is an external collaborator;
 * the session only needs something that turns a `FileRecord`'s content into
 * its `compiled` artifact. `PassthroughCompiler` is the reference
 * implementation used by the headless driver: it moves script and style
 * blocks into the artifact verbatim and validates JSON files.
 */
use crate::core::file_record::{CompiledOutput, FileLanguage, FileRecord};

pub trait CompilerOperations: Send + Sync {
    fn compile(&self, file: &mut FileRecord);
}

#[derive(Debug, Default)]
pub struct PassthroughCompiler;

impl PassthroughCompiler {
    pub fn new() -> Self {
        PassthroughCompiler
    }

    // Concatenated inner text of every `<tag ...>...</tag>` block.
    fn extract_blocks(source: &str, tag: &str) -> String {
        let open = format!("<{tag}");
        let close = format!("</{tag}>");
        let mut blocks = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find(&open) {
            let after_open = &rest[start..];
            // `<scripts>` or `<style-x>` is a different element.
            let boundary = after_open[open.len()..].chars().next();
            if !matches!(boundary, Some(c) if c == '>' || c.is_whitespace()) {
                rest = &after_open[open.len()..];
                continue;
            }
            let Some(header_end) = after_open.find('>') else {
                break;
            };
            let body = &after_open[header_end + 1..];
            let Some(end) = body.find(&close) else {
                break;
            };
            blocks.push(body[..end].trim());
            rest = &body[end + close.len()..];
        }
        blocks.join("\n")
    }
}

impl CompilerOperations for PassthroughCompiler {
    fn compile(&self, file: &mut FileRecord) {
        let mut output = CompiledOutput {
            source_checksum: file.content_checksum(),
            ..Default::default()
        };
        match file.language() {
            FileLanguage::Vue => {
                output.js = Self::extract_blocks(&file.content, "script");
                output.css = Self::extract_blocks(&file.content, "style");
            }
            FileLanguage::JavaScript | FileLanguage::TypeScript => {
                output.js = file.content.clone();
            }
            FileLanguage::Css => {
                output.css = file.content.clone();
            }
            FileLanguage::Json => {
                if let Err(e) = serde_json::from_str::<serde_json::Value>(&file.content) {
                    output.errors.push(format!("{}: {e}", file.path));
                }
            }
            FileLanguage::Other => {}
        }
        if output.has_errors() {
            log::warn!(
                "PassthroughCompiler: '{}' compiled with errors: {:?}",
                file.path,
                output.errors
            );
        } else {
            log::trace!("PassthroughCompiler: Compiled '{}'.", file.path);
        }
        file.compiled = Some(output);
    }
}
