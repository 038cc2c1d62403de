/*
 * Regenerates the hidden setup script whenever the component library
 * version changes. The script template's `$STYLE` placeholder is replaced
 * with the library's theme stylesheet URL for the new version, the result is
 * put back into the store and compiled straight away, so the store never
 * holds a setup script that disagrees with the registered version.
 */
use crate::core::cdn::CdnUrlOperations;
use crate::core::compiler::CompilerOperations;
use crate::core::file_store::FileStore;
use crate::core::naming::SETUP_FILE;
use crate::core::templates;
use crate::core::versions::VersionObserver;
use std::sync::Arc;

pub const THEME_STYLESHEET_PATH: &str = "theme/index.css";

pub struct SetupFileGenerator {
    cdn: Arc<dyn CdnUrlOperations>,
    compiler: Arc<dyn CompilerOperations>,
}

impl SetupFileGenerator {
    pub fn new(cdn: Arc<dyn CdnUrlOperations>, compiler: Arc<dyn CompilerOperations>) -> Self {
        SetupFileGenerator { cdn, compiler }
    }
}

impl VersionObserver for SetupFileGenerator {
    fn on_version_changed(&mut self, package: &str, version: &str, files: &mut FileStore) {
        let stylesheet_url = self.cdn.url_for(package, THEME_STYLESHEET_PATH, version);
        log::debug!("SetupFileGenerator: Regenerating {SETUP_FILE} with stylesheet {stylesheet_url}");
        let record = files.put(SETUP_FILE, &templates::render_setup(&stylesheet_url), true);
        self.compiler.compile(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cdn::{COMPONENT_LIBRARY, TemplateCdn};
    use crate::core::compiler::PassthroughCompiler;

    #[test]
    fn test_generator_writes_hidden_compiled_setup_file() {
        let mut generator = SetupFileGenerator::new(
            Arc::new(TemplateCdn::default()),
            Arc::new(PassthroughCompiler::new()),
        );
        let mut files = FileStore::bootstrap();

        generator.on_version_changed(COMPONENT_LIBRARY, "1.2.3", &mut files);

        let setup = files.get(SETUP_FILE).unwrap();
        assert!(setup.hidden);
        assert!(
            setup
                .content
                .contains("https://unpkg.com/cdx-component@1.2.3/theme/index.css")
        );
        assert!(!setup.content.contains(templates::STYLE_PLACEHOLDER));
        assert!(setup.is_compiled_current());
    }
}
