#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod paths;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use ir::{Course, EdgeKey, Prerequisite};
pub use layout::{Layout, Position, compute_layout};
pub use parser::{CatalogueError, parse_catalogue};
pub use paths::find_prerequisite_paths;
