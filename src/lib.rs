//! # confschema
//!
//! Synthesize a [JSON Schema](https://json-schema.org/) (2020-12) document
//! describing configuration files, from configuration-property metadata.
//!
//! ## Features
//!
//! - Merges metadata fragments from many sources (properties, groups, hints, ignore lists)
//! - Maps primitive, temporal, identifier, collection, map and enum type tokens to schema shapes
//! - Expands composite types through a pluggable [`introspect::TypeIntrospector`]
//! - Breaks cyclic type graphs and shares repeated types under `$defs`
//! - Drops removed (error-severity deprecated) properties entirely
//! - CLI tool `confmeta2schema` for batch generation
//!
//! ## Example (Programmatic Usage)
//!
//! ```
//! use confschema::config::SchemaConfig;
//! use confschema::metadata::{merge, parse_fragment};
//! use confschema::synth::SchemaBuilder;
//!
//! let fragment = parse_fragment(
//!     "inline",
//!     r#"{"properties": [
//!         {"name": "server.port", "type": "java.lang.Integer", "defaultValue": 8080},
//!         {"name": "server.address", "type": "java.net.InetAddress"}
//!     ]}"#,
//! )
//! .unwrap();
//! let catalogue = merge(vec![fragment]);
//!
//! let config = SchemaConfig::default();
//! let synthesis = SchemaBuilder::new(&config).build(&catalogue, &["server"]);
//!
//! let server = &synthesis.document.properties["server"];
//! assert!(server.properties.as_ref().unwrap().contains_key("port"));
//! println!("{}", synthesis.document.to_json_pretty().unwrap());
//! ```
//!
//! ## Example (CLI)
//!
//! ```bash
//! confmeta2schema META-INF/spring-configuration-metadata.json -o schema.json --include server
//! ```
//!
//! ## Crate Layout
//!
//! - [`schema`]: Output schema model (`SchemaNode`, `SchemaDocument`)
//! - [`metadata`]: Input metadata model and the merge loader
//! - [`synth`]: Type resolution, tree building, definition sharing
//! - [`introspect`]: Type introspection and member refinement capabilities
//! - [`config`]: Synthesis options, loadable from TOML
//! - [`common`]: Helpers for names, type tokens and traversal
//! - [`sources`]: Reading metadata from files and URLs
//!
//! The CLI binary is enabled with the `cli` feature.
pub mod common;
pub mod config;
pub mod error;
pub mod introspect;
pub mod metadata;
pub mod schema;
pub mod sources;
pub mod synth;

pub use config::SchemaConfig;
pub use error::{Error, Result};
pub use schema::{SchemaDocument, SchemaNode};
pub use synth::{SchemaBuilder, Synthesis};
