use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::{Result, bail};

use crate::ui::cli::drivers::PromptDriver;

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Bool(bool),
    Number(f64),
    Skip,
}

/// Replays canned answers in order and records every prompt title.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedDriver {
    pub fn new<I: IntoIterator<Item = Answer>>(answers: I) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.answers.borrow().len()
    }

    fn next(&self, title: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(title.to_string());
        match self.answers.borrow_mut().pop_front() {
            Some(a) => Ok(a),
            None => bail!("no scripted answer left for \"{title}\""),
        }
    }
}

impl PromptDriver for ScriptedDriver {
    fn ask_bool(&self, title: &str, _help: &str, default: bool) -> Result<bool> {
        match self.next(title)? {
            Answer::Bool(b) => Ok(b),
            Answer::Skip => Ok(default),
            other => bail!("expected a yes/no answer for \"{title}\", got {other:?}"),
        }
    }

    fn ask_f64(&self, title: &str, _help: &str, _min: Option<f64>, _max: Option<f64>) -> Result<f64> {
        match self.next(title)? {
            Answer::Number(v) => Ok(v),
            other => bail!("expected a number for \"{title}\", got {other:?}"),
        }
    }

    fn ask_optional_f64(&self, title: &str, _help: &str) -> Result<Option<f64>> {
        match self.next(title)? {
            Answer::Number(v) => Ok(Some(v)),
            Answer::Skip => Ok(None),
            other => bail!("expected a number or skip for \"{title}\", got {other:?}"),
        }
    }
}
