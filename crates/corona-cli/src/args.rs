//! Command-line argument definitions for the Corona CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, text measurement and logging verbosity.

use std::{rc::Rc, str::FromStr};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use corona::text::{CosmicMeasure, MonospaceMeasure, TextMeasure};

/// How label sizes are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Measure {
    /// Fixed advance per character; independent of installed fonts
    #[default]
    Monospace,
    /// Shape text against system fonts
    Cosmic,
}

impl Measure {
    /// Returns the text measure implementing this choice.
    pub fn text_measure(self) -> Rc<dyn TextMeasure> {
        match self {
            Self::Monospace => Rc::new(MonospaceMeasure::default()),
            Self::Cosmic => Rc::new(CosmicMeasure),
        }
    }
}

/// Command-line arguments for the Corona radial layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input scenario file (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Text measurement backend
    #[arg(long, value_enum, default_value_t = Measure::Monospace)]
    pub measure: Measure,
}

impl Args {
    /// Log level requested on the command line.
    ///
    /// Unknown names fall back to [`LevelFilter::Warn`]; the second value
    /// reports whether the fallback was used so the caller can say so once
    /// a logger exists.
    pub fn level_filter(&self) -> (LevelFilter, bool) {
        match LevelFilter::from_str(&self.log_level) {
            Ok(level) => (level, false),
            Err(_) => (LevelFilter::Warn, true),
        }
    }
}
