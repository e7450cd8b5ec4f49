//! Shellbox - reproducible containerized shell environments
//!
//! Shellbox turns a declarative YAML file into a rebuildable container
//! image and a set of named scripts that run inside it. The image tag is
//! derived from the configuration's content, so any edit yields a new tag
//! and stale environments are rebuilt automatically.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use shellbox::{Client, WrapperGenerator};
//!
//! let client = Client::new(Path::new("shellbox.yaml")).unwrap();
//! client.run(&["hello".to_string()]).unwrap();
//! ```

pub mod cli;
pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod name;
pub mod provider;
pub mod tag;
pub mod wrapper;

pub use client::{init_project, BuildOutcome, Client};
pub use command::{bind, resolve, shell_quote, Invocation};
pub use config::{Config, CONFIG_FILE_NAME};
pub use error::{Result, ShellboxError};
pub use name::normalize_name;
pub use provider::{new_provider, ContainerProvider, ImageInfo, ImageRecord};
pub use tag::derive_tag;
pub use wrapper::WrapperGenerator;

/// Version reported by `shellbox version` and the in-container dispatcher.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
