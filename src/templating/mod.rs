//! Rendering of converted templates.
//!
//! The composition stage writes Tera templates into the build workspace;
//! this module turns the converted entry template plus the merged environment
//! into the final document.
//!
//! - [`renderer`] - [`StackRenderer`], a Tera instance over one workspace
//! - [`filters`] - the `reindent` filter emitted around every include

pub mod filters;
pub mod renderer;

pub use renderer::StackRenderer;
