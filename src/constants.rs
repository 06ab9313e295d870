//! Global constants used throughout the Strata codebase.
//!
//! File names, directory names and default values that several modules need
//! to agree on live here so the layout of a Strata project is defined in one
//! place.

/// Suffix carried by every template file, stripped when writing output.
pub const TEMPLATE_SUFFIX: &str = ".tpl";

/// Full extension of a template file (`<name>.yml.tpl`).
pub const TEMPLATE_EXTENSION: &str = ".yml.tpl";

/// Marker directory that identifies a project root.
pub const PROJECT_MARKER_DIR: &str = "strata";

/// Optional project configuration file at the project root.
pub const PROJECT_CONFIG_FILE: &str = ".strata.yml";

/// Subdirectory of a search root holding reusable blocks.
///
/// Checked before the root itself when locating a template.
pub const BLOCKS_DIR: &str = "blocks";

/// Subdirectory holding environment files.
pub const VARS_DIR: &str = "vars";

/// Build workspace under the project marker directory.
pub const BUILD_DIR: &str = "build";

/// Subdirectory of the user root holding scaffolds.
pub const SCAFFOLDS_DIR: &str = "scaffolds";

/// User configuration file inside the user root.
pub const USER_CONFIG_FILE: &str = "config.yml";

/// Default user root directory name under the home directory.
pub const USER_ROOT_DIR: &str = ".strata";

/// Environment variable overriding the user root location.
pub const HOME_ENV_VAR: &str = "STRATA_HOME";

/// Profile used when neither the CLI nor the project configuration names one.
pub const DEFAULT_PROFILE: &str = "dev";

/// Project-level env files layered when `.strata.yml` does not list any.
pub const DEFAULT_ENV_FILES: &[&str] = &["base.env", "docker.env"];

/// Profiles defined when `.strata.yml` does not list any.
pub const DEFAULT_PROFILES: &[&str] = &["dev", "qa", "prod"];

/// Name of the Tera filter used to re-indent included content.
pub const REINDENT_FILTER: &str = "reindent";
