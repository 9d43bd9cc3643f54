//! Navigation controller.
//!
//! A small state machine over the question index: `Viewing(i)` for each
//! question and a terminal `Completed`. Purely interaction-driven, no timers.
//! The controller is the only writer of the attempt's selections.

use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::model::{OptionId, Question};
use crate::selection::SelectionStore;

/// Where the participant is in the question sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavState {
    Viewing(usize),
    Completed,
}

/// Progress snapshot for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-based position of the current question.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
}

#[derive(Debug, Clone)]
pub struct NavigationController {
    questions: Vec<Question>,
    store: SelectionStore,
    state: NavState,
}

impl NavigationController {
    /// Start at the first question. An empty question set yields
    /// [`NavigationError::NoContent`].
    pub fn new(mut questions: Vec<Question>) -> Result<Self, NavigationError> {
        if questions.is_empty() {
            return Err(NavigationError::NoContent);
        }
        questions.sort_by_key(|q| (q.position, q.id));
        let store = SelectionStore::new(&questions);
        Ok(Self {
            questions,
            store,
            state: NavState::Viewing(0),
        })
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == NavState::Completed
    }

    /// Cursor index; the last question once completed.
    pub fn index(&self) -> usize {
        match self.state {
            NavState::Viewing(i) => i,
            NavState::Completed => self.last_index(),
        }
    }

    fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    /// The question being viewed, `None` once completed.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            NavState::Viewing(i) => self.questions.get(i),
            NavState::Completed => None,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn selections(&self) -> &SelectionStore {
        &self.store
    }

    pub fn progress(&self) -> Progress {
        Progress {
            position: self.index() + 1,
            total: self.questions.len(),
            answered: self.store.answered_count(),
        }
    }

    /// Select `option` on the current question.
    pub fn select(&mut self, option: OptionId) {
        if let Some(id) = self.current_question().map(|q| q.id) {
            self.store.select(id, option);
        }
    }

    /// Toggle `option` on the current question.
    pub fn toggle(&mut self, option: OptionId) {
        if let Some(id) = self.current_question().map(|q| q.id) {
            self.store.toggle(id, option);
        }
    }

    /// Whether [`next`](Self::next) would move.
    pub fn can_advance(&self) -> bool {
        match self.state {
            NavState::Viewing(i) => {
                i + 1 < self.questions.len() && self.store.is_answered(self.questions[i].id)
            }
            NavState::Completed => false,
        }
    }

    /// Move to the next question. A no-op on the last question or while the
    /// current question is unanswered; returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        if let NavState::Viewing(i) = self.state {
            self.state = NavState::Viewing(i + 1);
        }
        true
    }

    /// Move back one question; returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        match self.state {
            NavState::Viewing(i) if i > 0 => {
                self.state = NavState::Viewing(i - 1);
                true
            }
            _ => false,
        }
    }

    /// The finishing action. Allowed only on the last question with every
    /// question answered, multi-select questions included.
    pub fn finish(&mut self) -> Result<(), NavigationError> {
        let NavState::Viewing(i) = self.state else {
            return Err(NavigationError::AlreadyCompleted);
        };
        if i != self.last_index() {
            return Err(NavigationError::NotOnLastQuestion {
                position: i + 1,
                total: self.questions.len(),
            });
        }
        let unanswered = self.store.unanswered();
        if !unanswered.is_empty() {
            return Err(NavigationError::Incomplete { unanswered });
        }
        self.state = NavState::Completed;
        tracing::info!(questions = self.questions.len(), "attempt completed");
        Ok(())
    }

    /// Leave `Completed` and return to the last question so answers can be
    /// amended before submission.
    pub fn reopen(&mut self) {
        if self.is_completed() {
            self.state = NavState::Viewing(self.last_index());
        }
    }
}
