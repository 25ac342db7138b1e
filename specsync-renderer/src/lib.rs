//! # specsync-renderer
//!
//! Turns ordered records into frontmatter documents and renders the Tera
//! templates used for branch names, commit messages and pull requests.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde_yaml::Mapping;
//! use specsync_core::{config::Templates, Envelope};
//! use specsync_renderer::{FrontmatterRenderer, MessageContext, MessageEngine, MessageKind};
//!
//! fn preview(record: &Mapping) {
//!     let doc = FrontmatterRenderer::new(Envelope::Closed).render(record);
//!     if let Ok(doc) = doc {
//!         print!("{doc}");
//!     }
//!     if let Ok(engine) = MessageEngine::new(&Templates::default()) {
//!         let ctx = MessageContext::new("2024-01-01--00-00-00");
//!         if let Ok(title) = engine.render(MessageKind::PrTitle, &ctx) {
//!             println!("{title}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod frontmatter;

pub use context::{format_timestamp, MessageContext};
pub use engine::{MessageEngine, MessageKind};
pub use error::RenderError;
pub use frontmatter::FrontmatterRenderer;
