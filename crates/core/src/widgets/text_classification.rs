//! Multi-question text classification widget.

use crate::widgets::{Change, TaskWidget, WidgetError, WidgetResult};
use lp_protocol::classification_models::{ClassificationResult, Question};
use lp_protocol::view_models::{TextClassificationView, WidgetView};
use std::collections::BTreeMap;

pub struct TextClassificationWidget {
    questions: Vec<Question>,
    current: usize,
    /// Selected option per question id.
    answers: BTreeMap<u32, String>,
    submitted: bool,
}

impl TextClassificationWidget {
    pub fn new(questions: Vec<Question>) -> WidgetResult<Self> {
        if questions.is_empty() {
            return Err(WidgetError::InvalidConfig(
                "text classification needs at least one question".to_string(),
            ));
        }
        Ok(Self {
            questions,
            current: 0,
            answers: BTreeMap::new(),
            submitted: false,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.current]
    }

    pub fn answers(&self) -> &BTreeMap<u32, String> {
        &self.answers
    }

    /// Record (or replace) the answer to the current question.
    pub fn select_option(&mut self, option: &str) -> WidgetResult<Change> {
        let question = &self.questions[self.current];
        if !question.options.iter().any(|o| o == option) {
            return Err(WidgetError::UnknownOption {
                question_id: question.id,
                option: option.to_string(),
            });
        }

        let previous = self.answers.insert(question.id, option.to_string());
        if previous.as_deref() == Some(option) {
            return Ok(Change::None);
        }
        Ok(Change::State)
    }

    pub fn previous_question(&mut self) -> Change {
        if self.current == 0 {
            return Change::None;
        }
        self.current -= 1;
        Change::View
    }

    pub fn next_question(&mut self) -> Change {
        if self.current + 1 >= self.questions.len() {
            return Change::None;
        }
        self.current += 1;
        Change::View
    }

    pub fn jump_to(&mut self, index: usize) -> WidgetResult<Change> {
        if index >= self.questions.len() {
            return Err(WidgetError::QuestionOutOfRange {
                index,
                count: self.questions.len(),
            });
        }
        if index == self.current {
            return Ok(Change::None);
        }
        self.current = index;
        Ok(Change::View)
    }

    pub fn submit(&mut self) -> WidgetResult<ClassificationResult> {
        if self.submitted {
            return Err(WidgetError::AlreadySubmitted);
        }
        if !self.can_submit() {
            return Err(WidgetError::NotEligible);
        }
        self.submitted = true;
        Ok(ClassificationResult {
            selected_options: self.answers.clone(),
        })
    }

    fn answered_count(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.contains_key(&q.id))
            .count()
    }
}

impl TaskWidget for TextClassificationWidget {
    fn progress(&self) -> f64 {
        self.answered_count() as f64 / self.questions.len() as f64 * 100.0
    }

    fn can_submit(&self) -> bool {
        self.answered_count() == self.questions.len()
    }

    fn is_submitted(&self) -> bool {
        self.submitted
    }

    fn view(&self) -> WidgetView {
        let question = self.current_question();
        WidgetView::TextClassification(TextClassificationView {
            question_index: self.current,
            question_count: self.questions.len(),
            question: question.clone(),
            selected: self.answers.get(&question.id).cloned(),
            answered: self
                .questions
                .iter()
                .map(|q| self.answers.contains_key(&q.id))
                .collect(),
        })
    }
}
