//! CLI logic for the Corona radial layout tool.
//!
//! Reads a component tree from TOML, lays it out and writes the resulting
//! frame as JSON.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Measure};

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
};

use log::{debug, info};

use corona::{CoronaError, DiagramBuilder, model::Component};

/// Run the Corona CLI application
///
/// This function reads the scenario file, lays it out and writes the frame
/// to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CoronaError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed scenario files
/// - Component trees that cannot be mapped to layers
pub fn run(args: &Args) -> Result<(), CoronaError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing scenario"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let scenario = parse_scenario(&source)?;
    debug!(label = scenario.label(), children = scenario.children().len(); "Scenario parsed");

    let builder = DiagramBuilder::new(app_config).with_measure(args.measure.text_measure());
    let mut diagram = builder.build(&scenario)?;
    let frame = diagram.frame()?;

    let mut writer = BufWriter::new(File::create(&args.output)?);
    serde_json::to_writer_pretty(&mut writer, &frame).map_err(io::Error::from)?;
    writer.flush()?;

    info!(output_file = args.output, leaves = frame.leaves().len(); "Layout exported successfully");

    Ok(())
}

/// Parses a component tree from TOML source.
fn parse_scenario(source: &str) -> Result<Component, CoronaError> {
    toml::from_str(source)
        .map_err(|err| CoronaError::new_input_error(err.message(), err.span(), source))
}

#[cfg(test)]
mod tests {
    use corona::model::ComponentKind;

    use super::*;

    #[test]
    fn test_parse_scenario() {
        let source = r#"
            kind = "scenario"
            label = "http"

            [[children]]
            kind = "sender"
            label = "HttpSender"
            properties = [{ key = "method", value = "GET" }]
        "#;
        let scenario = parse_scenario(source).unwrap();
        assert_eq!(scenario.kind(), ComponentKind::Scenario);
        assert_eq!(scenario.children()[0].properties()[0].value(), "GET");
    }

    #[test]
    fn test_parse_scenario_error_keeps_span() {
        let source = "kind = \"planet\"\nlabel = \"x\"\n";
        let Err(CoronaError::Input { span, src, .. }) = parse_scenario(source) else {
            panic!("expected an input error");
        };
        assert_eq!(src, source);
        let span = span.expect("span");
        assert!(source[span].contains("planet"));
    }
}
