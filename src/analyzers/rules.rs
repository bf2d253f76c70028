//! Penalty tables.
//!
//! Every analyzer reduces a page to a facts struct and evaluates it against a
//! fixed table of rules. A rule either fires at most once or once per
//! offending item (up to a cap); each firing subtracts the rule's penalty from
//! 100 and emits one issue. Issues come out in table order.

use crate::models::{Category, Issue, Severity};

pub enum Check<F> {
    Once(fn(&F) -> Option<String>),
    Each {
        check: fn(&F) -> Vec<String>,
        cap: usize,
    },
}

pub struct Rule<F> {
    pub code: &'static str,
    pub severity: Severity,
    pub penalty: u8,
    pub check: Check<F>,
}

impl<F> Rule<F> {
    pub const fn once(
        code: &'static str,
        severity: Severity,
        penalty: u8,
        check: fn(&F) -> Option<String>,
    ) -> Self {
        Self {
            code,
            severity,
            penalty,
            check: Check::Once(check),
        }
    }

    pub const fn each(
        code: &'static str,
        severity: Severity,
        penalty: u8,
        cap: usize,
        check: fn(&F) -> Vec<String>,
    ) -> Self {
        Self {
            code,
            severity,
            penalty,
            check: Check::Each { check, cap },
        }
    }

    fn findings(&self, facts: &F) -> Vec<String> {
        match &self.check {
            Check::Once(check) => check(facts).into_iter().collect(),
            Check::Each { check, cap } => {
                let mut messages = check(facts);
                messages.truncate(*cap);
                messages
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub score: u8,
    pub issues: Vec<Issue>,
}

impl Outcome {
    /// Adds a bonus without exceeding 100
    pub fn with_bonus(mut self, bonus: u8) -> Self {
        self.score = self.score.saturating_add(bonus).min(100);
        self
    }
}

pub fn evaluate<F>(category: Category, facts: &F, rules: &[Rule<F>]) -> Outcome {
    let mut deducted: u32 = 0;
    let mut issues = Vec::new();

    for rule in rules {
        for message in rule.findings(facts) {
            deducted += u32::from(rule.penalty);
            issues.push(Issue {
                category,
                code: rule.code.to_string(),
                severity: rule.severity,
                message,
            });
        }
    }

    Outcome {
        score: 100u32.saturating_sub(deducted) as u8,
        issues,
    }
}

/// Helper for `Once` checks: `Some(message)` when `condition` holds
pub fn flag(condition: bool, message: impl FnOnce() -> String) -> Option<String> {
    condition.then(message)
}
