//! Rule and fixer interfaces
//!
//! A [`Rule`] is a pure evaluator over one tree version: given a
//! [`TokenContext`] it returns [`Violation`]s and never mutates the tree.
//! Rules that can repair what they report expose a [`Fixer`].

use std::fmt;

use serde::Serialize;

use crate::autofix::{Fix, FixCapability};
use crate::context::TokenContext;
use crate::diagnostics::{Severity, Violation, merge_violations};
use crate::executor::CancellationToken;
use crate::result::Result;

/// Categories for organizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Whitespace around tokens
    Spacing,
    /// Line and blank-line structure
    Layout,
    /// Code that is easy to misread
    Maintainability,
}

impl RuleCategory {
    /// Return the kebab-case slug used for filtering and output
    pub fn slug(&self) -> &'static str {
        match self {
            RuleCategory::Spacing => "spacing",
            RuleCategory::Layout => "layout",
            RuleCategory::Maintainability => "maintainability",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "spacing" => Some(RuleCategory::Spacing),
            "layout" => Some(RuleCategory::Layout),
            "maintainability" => Some(RuleCategory::Maintainability),
            _ => None,
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl Serialize for RuleCategory {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.slug())
    }
}

/// Metadata associated with a rule, used for reporting only
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMetadata {
    /// Unique identifier (`SA1012`)
    pub id: &'static str,
    /// Short title
    pub title: &'static str,
    /// Detailed description of what the rule checks
    pub description: &'static str,
    pub category: RuleCategory,
    /// Severity used when the configuration does not override it
    pub default_severity: Severity,
    pub enabled_by_default: bool,
    /// Documentation URL
    pub help_link: &'static str,
}

/// A style rule
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    /// Evaluate the rule on one tree
    ///
    /// Violations carry the rule's default severity.
    fn check(&self, ctx: &TokenContext) -> Vec<Violation>;

    /// Fix capability, `None` for report-only rules
    fn fixer(&self) -> Option<&dyn Fixer> {
        None
    }

    fn id(&self) -> &'static str {
        self.metadata().id
    }
}

/// Turns a violation into a corrected tree
pub trait Fixer: Send + Sync {
    fn capability(&self) -> FixCapability;

    /// Title shown for the fix
    fn title(&self) -> &'static str;

    /// Build a fix for `violation` in the tree of `ctx`
    ///
    /// Returns `None` to decline, e.g. when the violation no longer matches
    /// the tree. Declining is never an error.
    fn fix(&self, ctx: &TokenContext, violation: &Violation) -> Option<Fix>;
}

struct ConfiguredRule {
    rule: Box<dyn Rule>,
    severity: Severity,
}

/// Ordered set of active rules with their effective severities
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<ConfiguredRule>,
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.rules
                    .iter()
                    .map(|configured| (configured.rule.id(), configured.severity)),
            )
            .finish()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule at its default severity
    pub fn push(&mut self, rule: Box<dyn Rule>) {
        let severity = rule.metadata().default_severity;
        self.push_with_severity(rule, severity);
    }

    pub fn push_with_severity(&mut self, rule: Box<dyn Rule>, severity: Severity) {
        self.rules.push(ConfiguredRule { rule, severity });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> + '_ {
        self.rules.iter().map(|configured| configured.rule.as_ref())
    }

    pub fn get(&self, rule_id: &str) -> Option<&dyn Rule> {
        self.iter().find(|rule| rule.id() == rule_id)
    }

    pub fn severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules
            .iter()
            .find(|configured| configured.rule.id() == rule_id)
            .map(|configured| configured.severity)
    }

    pub fn fixer(&self, rule_id: &str) -> Option<&dyn Fixer> {
        self.get(rule_id).and_then(|rule| rule.fixer())
    }

    pub fn is_fixable(&self, rule_id: &str) -> bool {
        self.fixer(rule_id).is_some()
    }

    /// Run one rule and apply its effective severity
    pub fn check_rule(&self, index: usize, ctx: &TokenContext) -> Vec<Violation> {
        let Some(configured) = self.rules.get(index) else {
            return Vec::new();
        };
        let span = tracing::debug_span!("rule", id = configured.rule.id());
        let _guard = span.enter();
        let violations: Vec<Violation> = configured
            .rule
            .check(ctx)
            .into_iter()
            .map(|violation| violation.with_severity(configured.severity))
            .collect();
        tracing::debug!("{} violations", violations.len());
        violations
    }

    /// Run every rule in order and merge the results
    ///
    /// `cancel` is checked before each rule.
    pub fn check_all(
        &self,
        ctx: &TokenContext,
        cancel: &CancellationToken,
    ) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for index in 0..self.rules.len() {
            cancel.check()?;
            violations.extend(self.check_rule(index, ctx));
        }
        Ok(merge_violations(violations))
    }
}
