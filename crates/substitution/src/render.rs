//! Text-in, text-out substitution.
//!
//! Templates that cannot be parsed are not an error here: they come back
//! verbatim, exactly like a template rendered against an empty scope.

use serde_json::Value;

use crate::{
    ConfigMapping,
    engine::{SubstitutionOptions, substitute_with_report},
    report::SubstitutionReport,
};

/// Why a rendered document looks the way it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The mapping was empty; the input was returned without parsing.
    EmptyMapping,
    /// The input was not valid JSON and was returned verbatim.
    Unparseable,
    /// The template was walked and re-serialized.
    Substituted(SubstitutionReport),
}

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub output: String,
    pub outcome: RenderOutcome,
}

impl Rendered {
    fn verbatim(raw: &str, outcome: RenderOutcome) -> Self {
        Self {
            output: raw.to_string(),
            outcome,
        }
    }

    pub fn report(&self) -> Option<&SubstitutionReport> {
        match &self.outcome {
            RenderOutcome::Substituted(report) => Some(report),
            _ => None,
        }
    }
}

/// Substitute placeholders in a textual template and pretty-print the result.
pub fn substitute_str(raw: &str, lookup: &ConfigMapping) -> String {
    render(raw, lookup, &SubstitutionOptions::default()).output
}

/// Parse, substitute and pretty-print, keeping the report.
pub fn render(raw: &str, lookup: &ConfigMapping, options: &SubstitutionOptions) -> Rendered {
    if lookup.is_empty() {
        return Rendered::verbatim(raw, RenderOutcome::EmptyMapping);
    }
    let Ok(template) = serde_json::from_str::<Value>(raw) else {
        return Rendered::verbatim(raw, RenderOutcome::Unparseable);
    };
    let (output, report) = substitute_with_report(template, lookup, options);
    match serde_json::to_string_pretty(&output) {
        Ok(output) => Rendered {
            output,
            outcome: RenderOutcome::Substituted(report),
        },
        // A `Value` always has string keys, so this is unreachable in practice.
        Err(_) => Rendered::verbatim(raw, RenderOutcome::Unparseable),
    }
}
