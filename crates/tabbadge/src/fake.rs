// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory stand-ins for the host capabilities, for tests of code that
//! takes a [`BadgeSink`] or a [`TabQuery`].

use std::cell::{Cell, RefCell};

use crate::host::{BadgeSink, Tab, TabFilter, TabQuery};
use crate::{Error, Result};

/// Records every label written to it.
#[derive(Debug, Default)]
pub struct RecordingBadge {
    texts: RefCell<Vec<String>>,
}

impl RecordingBadge {
    /// All labels in the order they were set.
    pub fn texts(&self) -> Vec<String> {
        self.texts.borrow().clone()
    }

    /// What the badge currently shows, `None` if it was never set.
    pub fn current(&self) -> Option<String> {
        self.texts.borrow().last().cloned()
    }
}

impl BadgeSink for RecordingBadge {
    fn set_text(&self, text: &str) {
        self.texts.borrow_mut().push(text.to_owned());
    }
}

/// Answers every query with the same tabs, or the same error.
#[derive(Debug)]
pub struct FixedTabs {
    answer: Result<Vec<Tab>>,
    queries: Cell<usize>,
    filters: RefCell<Vec<TabFilter>>,
}

impl FixedTabs {
    pub fn new(tabs: impl IntoIterator<Item = Tab>) -> Self {
        FixedTabs::with_answer(Ok(tabs.into_iter().collect()))
    }

    pub fn failing(err: Error) -> Self {
        FixedTabs::with_answer(Err(err))
    }

    fn with_answer(answer: Result<Vec<Tab>>) -> Self {
        FixedTabs {
            answer,
            queries: Cell::new(0),
            filters: RefCell::new(Vec::new()),
        }
    }

    /// Number of queries issued so far.
    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    /// Filters of every query issued so far.
    pub fn filters(&self) -> Vec<TabFilter> {
        self.filters.borrow().clone()
    }
}

impl TabQuery for FixedTabs {
    async fn query(&self, filter: &TabFilter) -> Result<Vec<Tab>> {
        self.queries.set(self.queries.get() + 1);
        self.filters.borrow_mut().push(*filter);

        self.answer.clone()
    }
}
