//! # Replacement Rules Module
//!
//! Regole di sostituzione letterale per semplificare il linguaggio dei template.
//!
//! ## Semantica:
//! - Ogni regola è una coppia (testo cercato, testo sostitutivo)
//! - Le regole vengono applicate in sequenza, sull'intero testo
//! - Ogni regola sostituisce tutte le occorrenze non sovrapposte
//! - Una regola successiva vede l'output delle regole precedenti
//!
//! ## Ordine delle regole:
//! L'ordine determina il risultato. Una regola generica ("tracking") posta prima
//! di una specifica ("Dietary tracking") consuma il testo che la regola specifica
//! avrebbe dovuto trovare. Per questo la tabella di default è ordinata dalla
//! regola più specifica alla più generica, e `RuleSet::conflicts()` segnala:
//! - `Shadowed`: una regola che non può più corrispondere come scritta
//! - `Reintroduced`: un testo sostitutivo che contiene un testo cercato,
//!   rompendo l'idempotenza di una seconda esecuzione

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A literal (non-regex) substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRule {
    pub search: String,
    pub replacement: String,
}

impl ReplacementRule {
    pub fn new(search: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            replacement: replacement.into(),
        }
    }
}

/// Ordering problem between two rules of a [`RuleSet`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleConflict {
    /// `later.search` contains `earlier.search`, so `later` no longer matches
    /// the text it was written for.
    Shadowed { earlier: usize, later: usize },
    /// The replacement of `rule` contains the search text of `matched`; a second
    /// pass would rewrite it again.
    Reintroduced { rule: usize, matched: usize },
}

/// Ordered list of replacement rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<ReplacementRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<ReplacementRule>) -> Self {
        Self { rules }
    }

    /// Build a rule set from `(search, replacement)` pairs, keeping their order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(search, replacement)| ReplacementRule::new(search, replacement))
                .collect(),
        )
    }

    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order. Returns the input borrowed when nothing matched.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(text);
        for rule in &self.rules {
            if current.contains(rule.search.as_str()) {
                current = Cow::Owned(current.replace(rule.search.as_str(), &rule.replacement));
            }
        }
        current
    }

    /// Every ordering hazard in this rule set, in rule order.
    pub fn conflicts(&self) -> Vec<RuleConflict> {
        let mut conflicts = Vec::new();

        for (later, rule) in self.rules.iter().enumerate() {
            for (earlier, previous) in self.rules[..later].iter().enumerate() {
                if rule.search.contains(previous.search.as_str()) {
                    conflicts.push(RuleConflict::Shadowed { earlier, later });
                }
            }
        }

        for (index, rule) in self.rules.iter().enumerate() {
            for (matched, other) in self.rules.iter().enumerate() {
                if rule.replacement.contains(other.search.as_str()) {
                    conflicts.push(RuleConflict::Reintroduced {
                        rule: index,
                        matched,
                    });
                }
            }
        }

        conflicts
    }

    /// Human readable description of a conflict, naming the rules involved.
    pub fn describe(&self, conflict: &RuleConflict) -> String {
        match *conflict {
            RuleConflict::Shadowed { earlier, later } => format!(
                "rule {:?} is shadowed by earlier rule {:?}",
                self.rules[later].search, self.rules[earlier].search
            ),
            RuleConflict::Reintroduced { rule, matched } => format!(
                "replacement {:?} reintroduces search text {:?}",
                self.rules[rule].replacement, self.rules[matched].search
            ),
        }
    }
}

/// Wording pass for the dashboard pages, most specific rule first.
const EASE_LANGUAGE_RULES: &[(&str, &str)] = &[
    ("response rates", "reply pace"),
    ("response rate", "reply pace"),
    ("track responses", "see responses"),
    ("Open tracking", "Open updates"),
    ("Click tracking", "Click updates"),
    ("Delivery status tracking", "Delivery status updates"),
    ("Dietary tracking", "Dietary details"),
    ("Allergen tracking", "Allergy details"),
    ("Purchase tracking", "Gift updates"),
    ("Live capacity tracking", "Live table count"),
    ("arrival tracking", "arrival updates"),
    ("tracking", "updates"),
    ("Generate checklist", "Create checklist"),
    ("Generating...", "Creating..."),
    ("Generate milestone checklist?", "Create milestone checklist?"),
    ("Generate", "Create"),
    (
        "intelligent grouping, permissions, and import/export",
        "smart grouping, access rules, and easy import/export",
    ),
    ("Multi-event permission leakage", "Multi-event privacy mixups"),
    ("Event permissions", "Event access"),
    ("permissions", "access rules"),
    ("prevent leakage", "keep event details private"),
    ("conversion", "engagement"),
    ("KPI", "snapshot"),
    ("CTR", "click rate"),
];

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_pairs(EASE_LANGUAGE_RULES.iter().copied())
    }
}
