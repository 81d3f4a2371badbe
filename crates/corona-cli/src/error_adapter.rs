//! Error adapter for converting CoronaError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Malformed input
//! files are rendered with a snippet pointing at the offending location.

use std::{fmt, ops::Range};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use corona::CoronaError;

/// Adapter for [`CoronaError::Input`], which carries source text.
pub struct InputAdapter<'a> {
    message: &'a str,
    span: Option<&'a Range<usize>>,
    src: &'a str,
}

impl<'a> InputAdapter<'a> {
    /// Create a new input adapter.
    pub fn new(message: &'a str, span: Option<&'a Range<usize>>, src: &'a str) -> Self {
        Self { message, span, src }
    }
}

impl fmt::Debug for InputAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputAdapter")
            .field("message", &self.message)
            .field("span", &self.span)
            .finish()
    }
}

impl fmt::Display for InputAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message.trim_end())
    }
}

impl std::error::Error for InputAdapter<'_> {}

impl MietteDiagnostic for InputAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("corona::input"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "scenario files describe one component with `kind`, `label` and optional `children`",
        ))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), span_to_miette(span));
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for [`CoronaError`] variants without source text.
pub struct ErrorAdapter<'a>(pub &'a CoronaError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CoronaError::Io(_) => "corona::io",
            CoronaError::Input { .. } => "corona::input",
            CoronaError::Geometry(_) => "corona::geometry",
            CoronaError::Config(_) => "corona::config",
            CoronaError::UnknownItem(_) | CoronaError::NotAGroup(_) => "corona::tree",
            CoronaError::UnroutableKind { .. } | CoronaError::IdenticalLayers(_) => {
                "corona::layers"
            }
            CoronaError::Layout(_) => "corona::layout",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CoronaError::UnroutableKind { .. } | CoronaError::IdenticalLayers(_) => Some(Box::new(
                "all children of a component must share one kind, different from the parent's",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// An input error with source location information.
    Input(InputAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Input(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Input(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Input(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Input(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Input(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: &Range<usize>) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.len())
}

/// Convert a [`CoronaError`] into a list of reportable errors.
pub fn to_reportables(err: &CoronaError) -> Vec<Reportable<'_>> {
    match err {
        CoronaError::Input { message, span, src } => {
            vec![Reportable::Input(InputAdapter::new(message, span.as_ref(), src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use corona::model::ComponentKind;

    use super::*;

    #[test]
    fn test_input_error_has_label() {
        let err = CoronaError::new_input_error("unknown variant `planet`\n", Some(7..15), "kind = \"planet\"");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Input(d) => {
                assert_eq!(d.to_string(), "unknown variant `planet`");
                let labels: Vec<_> = d.labels().unwrap().collect();
                assert_eq!(labels.len(), 1);
                assert_eq!(labels[0].offset(), 7);
                assert_eq!(labels[0].len(), 8);
            }
            Reportable::Error(_) => panic!("Expected Input"),
        }
    }

    #[test]
    fn test_input_error_without_span() {
        let err = CoronaError::new_input_error("bad", None, "");
        let reportables = to_reportables(&err);
        assert!(reportables[0].labels().is_none());
    }

    #[test]
    fn test_non_input_error() {
        let err = CoronaError::Layout("layout error".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Layout error: layout error");
                assert_eq!(e.code().unwrap().to_string(), "corona::layout");
            }
            Reportable::Input(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_layer_errors_carry_help() {
        let err = CoronaError::UnroutableKind {
            kind: ComponentKind::Validator,
            inner: ComponentKind::Reporter,
            outer: ComponentKind::Destination,
        };
        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "corona::layers");
        assert!(reportables[0].help().is_some());
        assert!(reportables[0].to_string().contains("validator"));
    }

    #[test]
    fn test_config_error_code() {
        let err = CoronaError::Config("bad".to_string());
        let reportables = to_reportables(&err);
        assert_eq!(reportables[0].code().unwrap().to_string(), "corona::config");
        assert!(reportables[0].source_code().is_none());
    }
}
