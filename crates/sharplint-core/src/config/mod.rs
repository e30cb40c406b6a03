//! Configuration system for sharplint
//!
//! - JSON/JSONC (`.sharplintrc.json`, `sharplint.json`) and TOML
//!   (`.sharplintrc.toml`) configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "linter": {
//!     "enabled": true,
//!     "rules": {
//!       "SA1012": "warn",
//!       "SA1407": "off"
//!     }
//!   },
//!   "fix": { "maxPasses": 10 },
//!   "files": {
//!     "include": ["**/*.cs"],
//!     "exclude": ["**/obj/**", "**/bin/**"]
//!   }
//! }
//! ```

mod loader;
mod sharplint_config;

pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
pub use sharplint_config::{
    DEFAULT_INCLUDE, DEFAULT_MAX_PASSES, FilesConfiguration, FixConfiguration,
    LinterConfiguration, RuleSeverity, SharplintConfig,
};
