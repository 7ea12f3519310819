//! provdoc: normalize hand-written provider reference documentation.
//!
//! Pages mix prose, argument bullets, nested object blocks, footer links
//! and example sections with inconsistent headings. This crate recovers a
//! documentation model from them, rewrites them into a canonical markdown
//! shape and assembles multi-language code examples from the output of an
//! external converter.
//!
//! ```no_run
//! use provdoc::{Config, Pipeline};
//!
//! let pipeline = Pipeline::new(Config::default())?;
//! let doc = pipeline.normalize("# Resource: aws_thing\n", "aws_thing", None);
//! println!("{}", doc.markdown);
//! # Ok::<(), provdoc::error::ConfigError>(())
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod logger;
pub mod model;
pub mod naming;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use config::Config;
pub use convert::{CommandConverter, Conversion, Converter};
pub use model::{ArgumentDocs, Diagnostic, EntityDocs, NormalizedDoc};
pub use pipeline::Pipeline;
