//! Fixed, ordered registry of the built-in rules

use sharplint_core::config::SharplintConfig;
use sharplint_core::{Rule, RuleMetadata, RuleSet};

use crate::builtin;

/// Registry of every rule sharplint ships, in evaluation order
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Registry holding the built-in rules
    pub fn builtin() -> Self {
        let rules = builtin::all_rules();
        tracing::debug!("Registered {} built-in rules", rules.len());
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, rule_id: &str) -> bool {
        self.rules.iter().any(|rule| rule.id() == rule_id)
    }

    /// Metadata of every rule, for listings
    pub fn metadata(&self) -> impl Iterator<Item = &RuleMetadata> + '_ {
        self.rules.iter().map(|rule| rule.metadata())
    }

    /// Whether the rule can fix what it reports
    pub fn is_fixable(&self, rule_id: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.id() == rule_id && rule.fixer().is_some())
    }

    /// Build the active rule set for `config`
    ///
    /// A configured severity overrides the rule's default and `off` removes
    /// the rule; unconfigured rules follow their `enabled_by_default` flag.
    /// A disabled linter yields an empty set.
    pub fn into_rule_set(self, config: &SharplintConfig) -> RuleSet {
        let mut rule_set = RuleSet::new();
        if !config.linter_enabled() {
            tracing::info!("Linter disabled by configuration");
            return rule_set;
        }

        if let Some(configured) = config.linter.as_ref().and_then(|l| l.rules.as_ref()) {
            for rule_id in configured.keys() {
                if !self.contains(rule_id) {
                    tracing::warn!("Unknown rule '{}' in configuration", rule_id);
                }
            }
        }

        for rule in self.rules {
            let severity = match config.rule_severity(rule.id()) {
                Some(configured) => configured.to_severity(),
                None if rule.metadata().enabled_by_default => {
                    Some(rule.metadata().default_severity)
                }
                None => None,
            };
            match severity {
                Some(severity) => rule_set.push_with_severity(rule, severity),
                None => tracing::debug!("Rule {} disabled", rule.id()),
            }
        }
        rule_set
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Active built-in rules for `config`
pub fn rule_set(config: &SharplintConfig) -> RuleSet {
    RuleRegistry::builtin().into_rule_set(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharplint_core::Severity;

    #[test]
    fn test_builtin_order_is_fixed() {
        let ids: Vec<&str> = RuleRegistry::builtin().metadata().map(|m| m.id).collect();
        assert_eq!(ids, vec!["SA1012", "SA1407", "SA1408", "SA1506", "SA1508", "SA1517"]);
    }

    #[test]
    fn test_metadata_is_complete() {
        for metadata in RuleRegistry::builtin().metadata() {
            assert!(!metadata.title.is_empty());
            assert!(!metadata.description.is_empty());
            assert!(metadata.help_link.ends_with(&format!("{}.html", metadata.id)));
        }
    }

    #[test]
    fn test_every_rule_is_fixable() {
        let registry = RuleRegistry::builtin();
        let ids: Vec<&str> = registry.metadata().map(|m| m.id).collect();
        assert!(ids.iter().all(|id| registry.is_fixable(id)));
        assert!(!registry.is_fixable("SA9999"));
    }

    #[test]
    fn test_configured_severities() {
        let config = SharplintConfig::from_json_str(
            r#"{ "linter": { "rules": { "SA1012": "off", "SA1508": "error" } } }"#,
        )
        .unwrap();
        let rules = rule_set(&config);
        assert_eq!(rules.len(), 5);
        assert!(rules.get("SA1012").is_none());
        assert_eq!(rules.severity("SA1508"), Some(Severity::Error));
        assert_eq!(rules.severity("SA1517"), Some(Severity::Warning));
    }

    #[test]
    fn test_disabled_linter() {
        let config =
            SharplintConfig::from_json_str(r#"{ "linter": { "enabled": false } }"#).unwrap();
        assert!(rule_set(&config).is_empty());
    }
}
