//! Answer selection store.
//!
//! Holds the participant's in-progress choices for one attempt. Pure data:
//! no I/O, and no operation fails. Unknown question or option ids can only
//! come from rendering bugs upstream, so they are ignored.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{OptionId, Question, QuestionId, SelectArity};

/// The participant's choice for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "options", rename_all = "lowercase")]
pub enum Selection {
    Single(OptionId),
    Multi(BTreeSet<OptionId>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::Single(_) => false,
            Selection::Multi(set) => set.is_empty(),
        }
    }

    pub fn contains(&self, id: OptionId) -> bool {
        match self {
            Selection::Single(chosen) => *chosen == id,
            Selection::Multi(set) => set.contains(&id),
        }
    }

    /// Chosen option ids in ascending order.
    pub fn option_ids(&self) -> Vec<OptionId> {
        match self {
            Selection::Single(id) => vec![*id],
            Selection::Multi(set) => set.iter().copied().collect(),
        }
    }
}

/// Wire form of one question's choice: a single id or a list of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    One(OptionId),
    Many(Vec<OptionId>),
}

/// One `{questionId, optionId | optionId[]}` pair of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: QuestionId,
    #[serde(rename = "optionId")]
    pub choice: Choice,
}

#[derive(Debug, Clone)]
struct Slot {
    id: QuestionId,
    arity: SelectArity,
    options: BTreeSet<OptionId>,
}

/// In-progress selections for every question of an attempt.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    /// Question structure in ordinal order.
    slots: Vec<Slot>,
    selections: BTreeMap<QuestionId, Selection>,
}

impl SelectionStore {
    /// Create an empty store for `questions`, which must already be in
    /// ordinal order.
    pub fn new(questions: &[Question]) -> Self {
        let slots = questions
            .iter()
            .map(|q| Slot {
                id: q.id,
                arity: q.arity,
                options: q.options.iter().map(|o| o.id).collect(),
            })
            .collect();
        Self {
            slots,
            selections: BTreeMap::new(),
        }
    }

    /// Rebuild a store from submitted answers (e.g. a saved answer file).
    /// Entries that do not fit the question structure are ignored.
    pub fn from_entries(questions: &[Question], entries: &[SubmittedAnswer]) -> Self {
        let mut store = Self::new(questions);
        for entry in entries {
            match &entry.choice {
                Choice::One(option) => store.select(entry.question_id, *option),
                Choice::Many(options) => {
                    let single = store
                        .slots
                        .iter()
                        .any(|s| s.id == entry.question_id && s.arity == SelectArity::Single);
                    if single && options.len() > 1 {
                        tracing::debug!(
                            "question {} is single-select, {} options given, keeping the last",
                            entry.question_id,
                            options.len()
                        );
                    }
                    for option in options {
                        store.select(entry.question_id, *option);
                    }
                }
            }
        }
        store
    }

    fn slot(&self, question: QuestionId, option: OptionId) -> Option<&Slot> {
        let slot = self.slots.iter().find(|s| s.id == question);
        match slot {
            Some(s) if s.options.contains(&option) => Some(s),
            Some(_) => {
                tracing::debug!("ignoring unknown option {option} for question {question}");
                None
            }
            None => {
                tracing::debug!("ignoring selection for unknown question {question}");
                None
            }
        }
    }

    /// Record or replace the chosen option.
    ///
    /// On a multi-select question this adds the option to the set.
    pub fn select(&mut self, question: QuestionId, option: OptionId) {
        let Some(arity) = self.slot(question, option).map(|s| s.arity) else {
            return;
        };
        match arity {
            SelectArity::Single => {
                self.selections.insert(question, Selection::Single(option));
            }
            SelectArity::Multi => {
                let entry = self
                    .selections
                    .entry(question)
                    .or_insert_with(|| Selection::Multi(BTreeSet::new()));
                if let Selection::Multi(set) = entry {
                    set.insert(option);
                }
            }
        }
    }

    /// Add or remove an option.
    ///
    /// On a single-select question this selects the option, or clears the
    /// selection when that option is already chosen. Removing the last option
    /// of a multi-select question leaves it unanswered.
    pub fn toggle(&mut self, question: QuestionId, option: OptionId) {
        let Some(arity) = self.slot(question, option).map(|s| s.arity) else {
            return;
        };
        match arity {
            SelectArity::Single => {
                if self.selections.get(&question) == Some(&Selection::Single(option)) {
                    self.selections.remove(&question);
                } else {
                    self.selections.insert(question, Selection::Single(option));
                }
            }
            SelectArity::Multi => {
                let entry = self
                    .selections
                    .entry(question)
                    .or_insert_with(|| Selection::Multi(BTreeSet::new()));
                let emptied = match entry {
                    Selection::Multi(set) => {
                        if !set.remove(&option) {
                            set.insert(option);
                        }
                        set.is_empty()
                    }
                    Selection::Single(_) => false,
                };
                if emptied {
                    self.selections.remove(&question);
                }
            }
        }
    }

    pub fn clear(&mut self, question: QuestionId) {
        self.selections.remove(&question);
    }

    pub fn get(&self, question: QuestionId) -> Option<&Selection> {
        self.selections.get(&question).filter(|s| !s.is_empty())
    }

    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.get(question).is_some()
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|s| self.is_answered(s.id)).count()
    }

    /// Unanswered questions in ordinal order.
    pub fn unanswered(&self) -> Vec<QuestionId> {
        self.slots
            .iter()
            .filter(|s| !self.is_answered(s.id))
            .map(|s| s.id)
            .collect()
    }

    /// True iff every question has a non-empty selection.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| self.is_answered(s.id))
    }

    pub fn question_count(&self) -> usize {
        self.slots.len()
    }

    /// The selections as submission pairs, in question ordinal order.
    pub fn entries(&self) -> Vec<SubmittedAnswer> {
        self.slots
            .iter()
            .filter_map(|slot| {
                let selection = self.get(slot.id)?;
                let choice = match selection {
                    Selection::Single(id) => Choice::One(*id),
                    Selection::Multi(set) => Choice::Many(set.iter().copied().collect()),
                };
                Some(SubmittedAnswer {
                    question_id: slot.id,
                    choice,
                })
            })
            .collect()
    }
}
