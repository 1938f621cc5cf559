//! Substitution for a named scope: resolve the scope's configuration from a
//! store, then render the caller's template against it.
//!
//! This is the layer that logs. The engine underneath stays silent and
//! reports back; unresolved placeholders and empty scopes are surfaced here
//! as warnings, never as errors.

use {
    configsmith_config::SubstitutionConfig,
    configsmith_store::{ConfigLookup, Scope},
    configsmith_substitution::{
        RenderOutcome, Rendered, SubstitutionOptions, SubstitutionReport, render,
        substitute_with_report,
    },
    serde_json::Value,
    tracing::{debug, warn},
};

/// Content type of a rendered document.
pub const CONTENT_TYPE: &str = "application/json";

pub struct SubstitutionService<L> {
    lookup: L,
    config: SubstitutionConfig,
    options: SubstitutionOptions,
}

impl<L: ConfigLookup> SubstitutionService<L> {
    pub fn new(lookup: L, config: SubstitutionConfig) -> Self {
        let options = config.to_options();
        Self {
            lookup,
            config,
            options,
        }
    }

    /// Render `template` against the configuration of `app`/`env`.
    ///
    /// Unknown scopes and malformed templates return the template unchanged.
    pub fn substitute(&self, app: &str, env: &str, template: &str) -> String {
        self.render(app, env, template).output
    }

    /// Like [`Self::substitute`], keeping the outcome for the caller.
    pub fn render(&self, app: &str, env: &str, template: &str) -> Rendered {
        let scope = Scope::new(app, env);
        let mapping = self.lookup.resolve(app, env);
        let rendered = render(template, &mapping, &self.options);
        match &rendered.outcome {
            RenderOutcome::EmptyMapping => {
                warn!(%scope, "no configuration for scope, returning template unchanged");
            },
            RenderOutcome::Unparseable => {
                debug!(
                    %scope,
                    bytes = template.len(),
                    "template is not valid JSON, returning it unchanged"
                );
            },
            RenderOutcome::Substituted(report) => self.log_report(&scope, report),
        }
        rendered
    }

    /// Substitute into an already parsed document.
    pub fn substitute_value(&self, app: &str, env: &str, template: Value) -> Value {
        let scope = Scope::new(app, env);
        let mapping = self.lookup.resolve(app, env);
        if mapping.is_empty() {
            warn!(%scope, "no configuration for scope, returning template unchanged");
            return template;
        }
        let (output, report) = substitute_with_report(template, &mapping, &self.options);
        self.log_report(&scope, &report);
        output
    }

    fn log_report(&self, scope: &Scope, report: &SubstitutionReport) {
        if self.config.warn_unresolved {
            for site in report.unresolved() {
                warn!(
                    %scope,
                    path = %site.path,
                    reference = %site.reference,
                    "unresolved placeholder"
                );
            }
        }
        debug!(
            %scope,
            resolved = report.resolved().count(),
            unresolved = report.unresolved().count(),
            depth = report.max_depth,
            "substituted template"
        );
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        configsmith_store::{ConfigStore, FileConfigStore, MemoryConfigStore},
        serde_json::json,
        std::sync::Arc,
    };

    fn store() -> MemoryConfigStore {
        let store = MemoryConfigStore::new();
        store.create_app("billing").unwrap();
        store.create_env("billing", "prod").unwrap();
        store.create_env("billing", "dev").unwrap();
        store
            .upsert_item("billing", "prod", "DbHost", "prod.db.local")
            .unwrap();
        store
            .upsert_item("billing", "dev", "DbHost", "localhost")
            .unwrap();
        store
    }

    fn service() -> SubstitutionService<MemoryConfigStore> {
        SubstitutionService::new(store(), SubstitutionConfig::default())
    }

    #[test]
    fn scope_selects_values() {
        let service = service();
        let template = r#"{"db": {"host": "$DbHost", "port": 5432}}"#;

        let prod: Value =
            serde_json::from_str(&service.substitute("billing", "prod", template)).unwrap();
        assert_eq!(prod, json!({"db": {"host": "prod.db.local", "port": 5432}}));

        let dev: Value =
            serde_json::from_str(&service.substitute("billing", "dev", template)).unwrap();
        assert_eq!(dev["db"]["host"], "localhost");
    }

    #[test]
    fn unknown_scope_returns_template_verbatim() {
        let template = "{ \"db\":  \"$DbHost\" }";
        let rendered = service().render("billing", "staging", template);
        assert_eq!(rendered.output, template);
        assert_eq!(rendered.outcome, RenderOutcome::EmptyMapping);
    }

    #[test]
    fn malformed_template_returns_verbatim() {
        let rendered = service().render("billing", "prod", "{not json");
        assert_eq!(rendered.output, "{not json");
        assert_eq!(rendered.outcome, RenderOutcome::Unparseable);
    }

    #[test]
    fn report_lists_unresolved() {
        let rendered = service().render("billing", "prod", r#"{"a": "$DbHost", "b": "$Nope"}"#);
        let report = rendered.report().unwrap();
        assert!(!report.is_complete());
        assert_eq!(report.unresolved().next().unwrap().path, "b");
    }

    #[test]
    fn value_api_matches_text_api() {
        let service = service();
        let template = json!({"list": ["$DbHost", {"x": "$DbHost"}], "n": 1});
        let from_value = service.substitute_value("billing", "prod", template.clone());
        let from_text: Value = serde_json::from_str(&service.substitute(
            "billing",
            "prod",
            &template.to_string(),
        ))
        .unwrap();
        assert_eq!(from_value, from_text);
        assert_eq!(from_value["list"][1]["x"], "prod.db.local");
    }

    #[test]
    fn configured_sigil_is_used() {
        let config = SubstitutionConfig {
            sigil: '%',
            ..Default::default()
        };
        let service = SubstitutionService::new(store(), config);
        let template = json!({"a": "%DbHost", "b": "$DbHost"});
        let out = service.substitute_value("billing", "prod", template);
        assert_eq!(out, json!({"a": "prod.db.local", "b": "$DbHost"}));
    }

    #[test]
    fn works_over_shared_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileConfigStore::open(dir.path().join("store.json")).unwrap());
        store.create_app("a").unwrap();
        store.create_env("a", "e").unwrap();
        store.upsert_item("a", "e", "K", "v").unwrap();

        let service = SubstitutionService::new(Arc::clone(&store), SubstitutionConfig::default());
        assert_eq!(service.substitute_value("a", "e", json!("$K")), json!("v"));

        store.upsert_item("a", "e", "K", "w").unwrap();
        assert_eq!(service.substitute_value("a", "e", json!("$K")), json!("w"));
    }
}
