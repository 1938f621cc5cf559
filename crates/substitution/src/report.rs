use serde::Serialize;

/// What happened at a single placeholder site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Resolved,
    Unresolved,
}

/// A placeholder encountered during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// Colon-joined object keys from the root down to the placeholder's
    /// property. Array positions are never part of the path.
    pub path: String,
    /// Reference key with the sigil stripped.
    pub reference: String,
    pub outcome: Outcome,
}

/// Per-call record of every placeholder site, in document (pre-order) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubstitutionReport {
    pub sites: Vec<Substitution>,
    /// Deepest container nesting visited; the root container counts as 1.
    pub max_depth: usize,
}

impl SubstitutionReport {
    pub fn resolved(&self) -> impl Iterator<Item = &Substitution> {
        self.sites
            .iter()
            .filter(|s| s.outcome == Outcome::Resolved)
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &Substitution> {
        self.sites
            .iter()
            .filter(|s| s.outcome == Outcome::Unresolved)
    }

    /// True when no placeholder was left behind.
    pub fn is_complete(&self) -> bool {
        self.unresolved().next().is_none()
    }

    pub(crate) fn record(&mut self, path: &str, reference: &str, outcome: Outcome) {
        self.sites.push(Substitution {
            path: path.to_string(),
            reference: reference.to_string(),
            outcome,
        });
    }
}
