//! # pagegen-renderer
//!
//! Flat `{name}` placeholder substitution for pagegen templates.
//!
//! ## Usage
//!
//! ```rust
//! use pagegen_core::{AttributeMap, AttributeName, Template};
//! use pagegen_renderer::TemplateEngine;
//!
//! let engine = TemplateEngine::new(Template::from("<p>{a}</p>{b}"));
//! let mut attrs = AttributeMap::new();
//! attrs.insert(AttributeName::from("a"), "X".to_string());
//! attrs.insert(AttributeName::from("b"), "Y".to_string());
//! assert_eq!(engine.render(&attrs), "<p>X</p>Y");
//! ```

pub mod engine;

pub use engine::{substitute, substitute_sequential, TemplateEngine};
