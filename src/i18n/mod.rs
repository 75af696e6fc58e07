//! Internationalization (i18n) module.
//!
//! - `registry`: the fixed supported-language set, built at startup
//! - `language`: validated language code type
//! - `table`: nested key→string mapping for one language
//! - `store`: per-language fetch + session cache with fallback policy
//! - `resolver`: initial language detection (preference → path → locale → default)

mod language;
mod registry;
mod resolver;
mod store;
mod table;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use resolver::{resolve, BrowserEnv};
pub use store::{translation_path, TranslationStore};
pub use table::TranslationTable;
