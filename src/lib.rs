//! Strata - compose docker-compose stacks from reusable template blocks
//!
//! Strata turns a stack template with include directives into one rendered
//! YAML file. Blocks are looked up in the stack's directory, the project's
//! `strata/` directory and the user library, converted to Tera templates in a
//! build workspace and rendered against a context merged from env files.
//!
//! # Template Syntax
//!
//! ```yaml
//! services:
//!   # @include postgres
//!   # @include nginx
//!   # @vars
//!   # service_name: proxy
//!   # ports:
//!   # - "80:80"
//!   # - "443:443"
//! ```
//!
//! Each directive is replaced by the block it names, indented to the column
//! of the directive. The `@vars` block binds variables visible only inside
//! that include; everything else comes from the env layers.
//!
//! # Project Layout
//!
//! ```text
//! project/
//! ├── .strata.yml          optional project configuration
//! ├── stack.yml.tpl        stack template → stack.yml
//! └── strata/
//!     ├── blocks/          project blocks
//!     ├── vars/            base.env, docker.env, dev.env, ...
//!     └── build/           build workspace (recreated on every build)
//! ```
//!
//! # Modules
//!
//! - [`cli`] - command-line interface (`build`, `init`, `setup`, `uninstall`)
//! - [`compose`] - include crawling, conversion and the build pipeline
//! - [`config`] - `.strata.yml` and the user `config.yml`
//! - [`constants`] - file and directory names shared across modules
//! - [`core`] - error types and user-facing error reporting
//! - [`env`] - env file parsing and layering
//! - [`scaffold`] - project creation from scaffolds
//! - [`setup`] - user library installation and removal
//! - [`templating`] - Tera rendering of the build workspace
//! - [`utils`] - filesystem helpers

pub mod cli;
pub mod compose;
pub mod config;
pub mod constants;
pub mod core;
pub mod env;
pub mod scaffold;
pub mod setup;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
