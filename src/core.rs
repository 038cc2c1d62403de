/*
 * This module consolidates the platform-agnostic core of the playground: the
 * fragment codec and wire form, file naming, the File Set Store and Version
 * Registry, the setup-file generator, and the seams to the external compiler
 * and CDN (`CompilerOperations`, `CdnUrlOperations`). Configuration and its
 * persistence (`ConfigManagerOperations`) live here as well.
 */
pub mod cdn;
pub mod checksum_utils;
pub mod codec;
pub mod compiler;
pub mod config;
pub mod file_record;
pub mod file_store;
pub mod generation;
pub mod import_map;
pub mod naming;
pub mod path_utils;
pub mod templates;
pub mod versions;
pub mod wire;

pub use cdn::TemplateCdn;
pub use compiler::PassthroughCompiler;
pub use config::{ConfigManagerOperations, CoreConfigManager, OutputMode, PlaygroundOptions};
