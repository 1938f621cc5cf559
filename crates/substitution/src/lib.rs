//! Placeholder substitution for JSON templates.
//!
//! A template is any JSON document. String leaves that start with the sigil
//! (`$` by default) are placeholders: the rest of the string is a reference
//! key looked up verbatim in a flat [`ConfigMapping`]. Resolved placeholders
//! become plain strings; everything else passes through untouched, in the
//! original key and element order.
//!
//! The engine is a pure function of its inputs. It performs no I/O, keeps
//! no state between calls and never logs; callers that want diagnostics
//! read the [`SubstitutionReport`].

pub mod engine;
pub mod placeholder;
pub mod render;
pub mod report;

use std::collections::HashMap;

pub use {
    engine::{SubstitutionOptions, substitute, substitute_with_report},
    placeholder::reference_key,
    render::{RenderOutcome, Rendered, render, substitute_str},
    report::{Outcome, Substitution, SubstitutionReport},
};

/// Flat configuration snapshot for one application/environment scope.
pub type ConfigMapping = HashMap<String, String>;
