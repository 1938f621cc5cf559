use {
    serde::{Deserialize, Serialize},
    serde_json::{Value, map},
};

use crate::{
    ConfigMapping,
    placeholder::{DEFAULT_SIGIL, reference_key},
    report::{Outcome, SubstitutionReport},
};

/// Tunables for a substitution pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstitutionOptions {
    /// Leading character that marks a string leaf as a placeholder.
    pub sigil: char,
    /// Separator used when joining object keys into a reported path.
    pub path_separator: String,
}

impl Default for SubstitutionOptions {
    fn default() -> Self {
        Self {
            sigil: DEFAULT_SIGIL,
            path_separator: ":".into(),
        }
    }
}

/// Replace every resolvable placeholder in `template` with its value from
/// `lookup`.
///
/// An empty `lookup` returns the template as-is without walking it.
pub fn substitute(template: Value, lookup: &ConfigMapping) -> Value {
    substitute_with_report(template, lookup, &SubstitutionOptions::default()).0
}

/// Like [`substitute`], also returning a report of every placeholder site.
///
/// Lookups are always by the bare reference key. The hierarchical path is
/// computed for the report only.
pub fn substitute_with_report(
    mut template: Value,
    lookup: &ConfigMapping,
    options: &SubstitutionOptions,
) -> (Value, SubstitutionReport) {
    let mut report = SubstitutionReport::default();
    if lookup.is_empty() {
        return (template, report);
    }
    Walker {
        lookup,
        options,
        report: &mut report,
        path: String::new(),
    }
    .walk(&mut template);
    (template, report)
}

// ── Traversal ────────────────────────────────────────────────────────────────

/// A container being iterated. `path_len` is the length of the shared path
/// buffer at this container; children truncate back to it before extending.
enum Frame<'a> {
    Object {
        entries: map::IterMut<'a>,
        path_len: usize,
    },
    Array {
        items: std::slice::IterMut<'a, Value>,
        path_len: usize,
    },
}

struct Walker<'w> {
    lookup: &'w ConfigMapping,
    options: &'w SubstitutionOptions,
    report: &'w mut SubstitutionReport,
    path: String,
}

impl Walker<'_> {
    /// Depth-first pre-order walk on a heap stack, so nesting depth costs
    /// heap rather than native stack.
    fn walk(&mut self, root: &mut Value) {
        let mut stack = Vec::new();
        self.visit(root, &mut stack);

        while let Some(frame) = stack.last_mut() {
            let next = match frame {
                Frame::Object { entries, path_len } => entries.next().map(|(key, child)| {
                    self.path.truncate(*path_len);
                    if !self.path.is_empty() {
                        self.path.push_str(&self.options.path_separator);
                    }
                    self.path.push_str(key);
                    child
                }),
                // Array elements inherit the parent path unchanged.
                Frame::Array { items, path_len } => items.next().map(|child| {
                    self.path.truncate(*path_len);
                    child
                }),
            };
            match next {
                Some(child) => self.visit(child, &mut stack),
                None => {
                    stack.pop();
                },
            }
        }
    }

    fn visit<'a>(&mut self, node: &'a mut Value, stack: &mut Vec<Frame<'a>>) {
        let path_len = self.path.len();
        match node {
            Value::Object(entries) => {
                stack.push(Frame::Object {
                    entries: entries.iter_mut(),
                    path_len,
                });
                self.report.max_depth = self.report.max_depth.max(stack.len());
            },
            Value::Array(items) => {
                stack.push(Frame::Array {
                    items: items.iter_mut(),
                    path_len,
                });
                self.report.max_depth = self.report.max_depth.max(stack.len());
            },
            Value::String(text) => self.resolve(text),
            Value::Null | Value::Bool(_) | Value::Number(_) => {},
        }
    }

    fn resolve(&mut self, text: &mut String) {
        let Some(reference) = reference_key(text, self.options.sigil) else {
            return;
        };
        let lookup = self.lookup;
        match lookup.get(reference) {
            Some(value) => {
                self.report.record(&self.path, reference, Outcome::Resolved);
                *text = value.clone();
            },
            None => self.report.record(&self.path, reference, Outcome::Unresolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn mapping(pairs: &[(&str, &str)]) -> ConfigMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn replaces_nested_placeholder() {
        let template = json!({"db": {"host": "$DbHost", "port": 5432}});
        let out = substitute(template, &mapping(&[("DbHost", "prod.db.local")]));
        assert_eq!(out, json!({"db": {"host": "prod.db.local", "port": 5432}}));
    }

    #[test]
    fn array_elements_resolve_by_bare_key() {
        let template = json!({"items": ["$A", "$B"]});
        let out = substitute(template, &mapping(&[("A", "one")]));
        assert_eq!(out, json!({"items": ["one", "$B"]}));
    }

    #[test]
    fn empty_mapping_skips_traversal() {
        let template = json!({"a": "$A", "b": [1, "$B"]});
        let (out, report) = substitute_with_report(
            template.clone(),
            &ConfigMapping::new(),
            &SubstitutionOptions::default(),
        );
        assert_eq!(out, template);
        assert!(report.sites.is_empty());
        assert_eq!(report.max_depth, 0);
    }

    #[test]
    fn path_qualified_keys_are_never_consulted() {
        let template = json!({"db": {"host": "$Host"}});
        let lookup = mapping(&[("db:Host", "qualified"), ("db:host", "qualified")]);
        let (out, report) =
            substitute_with_report(template.clone(), &lookup, &SubstitutionOptions::default());
        assert_eq!(out, template);
        assert_eq!(report.sites[0].path, "db:host");
        assert_eq!(report.sites[0].reference, "Host");
        assert_eq!(report.sites[0].outcome, Outcome::Unresolved);
    }

    #[test]
    fn replacement_is_always_a_string() {
        let template = json!({"port": "$Port", "enabled": "$Enabled"});
        let out = substitute(template, &mapping(&[("Port", "5432"), ("Enabled", "true")]));
        assert_eq!(out["port"], json!("5432"));
        assert_eq!(out["enabled"], json!("true"));
    }

    #[test]
    fn non_string_scalars_pass_through() {
        let template = json!({"n": 1.5, "b": false, "z": null, "s": "plain", "neg": -3});
        let out = substitute(template.clone(), &mapping(&[("s", "x")]));
        assert_eq!(out, template);
    }

    #[test]
    fn root_scalar_placeholder_is_eligible() {
        let out = substitute(json!("$Root"), &mapping(&[("Root", "value")]));
        assert_eq!(out, json!("value"));
    }

    #[test]
    fn replaced_values_are_not_rescanned() {
        let lookup = mapping(&[("A", "$B"), ("B", "final")]);
        let out = substitute(json!({"k": "$A"}), &lookup);
        assert_eq!(out, json!({"k": "$B"}));
    }

    #[test]
    fn report_paths_follow_object_keys_only() {
        let template = json!({
            "servers": [
                {"url": "$PrimaryUrl"},
                {"url": "$SecondaryUrl"}
            ],
            "top": "$Top",
            "deep": {"er": {"est": ["$Leaf"]}}
        });
        let lookup = mapping(&[("PrimaryUrl", "a"), ("Top", "t")]);
        let (_, report) = substitute_with_report(template, &lookup, &SubstitutionOptions::default());

        let seen: Vec<(&str, &str, Outcome)> = report
            .sites
            .iter()
            .map(|s| (s.path.as_str(), s.reference.as_str(), s.outcome))
            .collect();
        assert_eq!(seen, [
            ("servers:url", "PrimaryUrl", Outcome::Resolved),
            ("servers:url", "SecondaryUrl", Outcome::Unresolved),
            ("top", "Top", Outcome::Resolved),
            ("deep:er:est", "Leaf", Outcome::Unresolved),
        ]);
        assert_eq!(report.max_depth, 4);
    }

    #[test]
    fn custom_sigil_and_separator() {
        let options = SubstitutionOptions {
            sigil: '@',
            path_separator: ".".into(),
        };
        let template = json!({"a": {"b": "@Key", "c": "$Key"}});
        let (out, report) =
            substitute_with_report(template, &mapping(&[("Key", "v")]), &options);
        assert_eq!(out, json!({"a": {"b": "v", "c": "$Key"}}));
        assert_eq!(report.sites.len(), 1);
        assert_eq!(report.sites[0].path, "a.b");
    }

    #[test]
    fn preserves_key_order() {
        let template = json!({"zeta": "$Z", "alpha": 1, "mid": {"y": 2, "x": "$X"}});
        let out = substitute(template, &mapping(&[("Z", "z"), ("X", "x")]));
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        let inner: Vec<&String> = out["mid"].as_object().unwrap().keys().collect();
        assert_eq!(inner, ["y", "x"]);
    }
}
