use crate::config::{LayoutConfig, load_config};
use crate::ir::{Course, EdgeKey};
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_catalogue;
use crate::paths::find_prerequisite_paths_with_depth;
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::collections::BTreeSet;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

#[derive(Parser, Debug)]
#[command(name = "coursemap", version, about = "Lay out a course prerequisite catalogue")]
pub struct Args {
    /// Catalogue JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Layout JSON output. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Course whose prerequisite paths are highlighted
    #[arg(short = 's', long = "select")]
    pub select: Option<String>,

    /// Log verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let courses = parse_catalogue(&input)?;
    tracing::info!(courses = courses.len(), "catalogue loaded");

    let layout = compute_layout(&courses, &config.layout);
    let selected = args.select.as_deref().filter(|id| !id.is_empty());
    let highlighted = highlighted_paths(selected, &courses, &config.layout);
    if let Some(id) = selected {
        if !layout.positions.contains_key(id) {
            tracing::warn!(course = id, "selected course is not in the catalogue");
        }
    }

    let dump = LayoutDump::from_layout(&layout, selected, &highlighted);
    write_layout_dump(args.output.as_deref(), &dump)?;
    Ok(())
}

/// Highlighted keys use the same depth cap as the layout, so every key has a
/// matching rendered edge.
fn highlighted_paths(selected: Option<&str>, courses: &[Course], config: &LayoutConfig) -> BTreeSet<EdgeKey> {
    match selected {
        Some(id) => find_prerequisite_paths_with_depth(id, courses, config.max_prerequisite_depth),
        None => BTreeSet::new(),
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn verbosity_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn setup_logging(verbosity: u8) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(verbosity_filter(verbosity));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_debug_flag() {
        let args = Args::parse_from(["coursemap", "-i", "cat.json", "-s", "CS101", "-dd"]);
        assert_eq!(args.input.as_deref(), Some(Path::new("cat.json")));
        assert_eq!(args.select.as_deref(), Some("CS101"));
        assert_eq!(args.debug, 2);
        assert_eq!(verbosity_filter(args.debug), LevelFilter::DEBUG);
    }

    #[test]
    fn highlighted_paths_follow_layout_depth_cap() {
        use crate::ir::Prerequisite;

        let courses = vec![
            Course::new("A"),
            Course::new("B").with_prerequisite(Prerequisite::and(vec![Prerequisite::and(vec![
                Prerequisite::leaf("A"),
            ])])),
        ];
        let shallow = LayoutConfig {
            max_prerequisite_depth: 1,
            ..LayoutConfig::default()
        };
        assert!(compute_layout(&courses, &shallow).edges.is_empty());
        assert!(highlighted_paths(Some("B"), &courses, &shallow).is_empty());

        let full = LayoutConfig::default();
        let keys: Vec<String> = highlighted_paths(Some("B"), &courses, &full)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(keys, vec!["A-B"]);
        assert!(highlighted_paths(None, &courses, &full).is_empty());
    }

    #[test]
    fn verbosity_saturates_at_trace() {
        assert_eq!(verbosity_filter(0), LevelFilter::WARN);
        assert_eq!(verbosity_filter(9), LevelFilter::TRACE);
    }
}
