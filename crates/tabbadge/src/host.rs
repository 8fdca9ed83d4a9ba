// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capabilities the helpers need from the host browser.
//!
//! The real bindings live in [`chrome`](crate::chrome), in-memory doubles in
//! [`fake`](crate::fake).

use crate::Result;

/// Filter passed to [`TabQuery::query`]. Fields left as `None` are not sent
/// to the host, which then matches any value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabFilter {
    pub active: Option<bool>,
    pub current_window: Option<bool>,
}

impl TabFilter {
    /// `{ active: true, currentWindow: true }`
    pub const fn active_in_current_window() -> Self {
        TabFilter {
            active: Some(true),
            current_window: Some(true),
        }
    }
}

/// A tab record as returned by the host. Only the fields this crate reads
/// are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tab {
    pub id: Option<i32>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub active: bool,
}

impl Tab {
    pub fn with_url(url: impl Into<String>) -> Self {
        Tab {
            url: Some(url.into()),
            active: true,
            ..Tab::default()
        }
    }
}

/// Sink for the toolbar badge label.
pub trait BadgeSink {
    /// Display `text` on the badge. Fire-and-forget: host failures are not
    /// reported back. An empty string clears the badge.
    fn set_text(&self, text: &str);
}

impl<B: BadgeSink + ?Sized> BadgeSink for &B {
    fn set_text(&self, text: &str) {
        (**self).set_text(text)
    }
}

/// Source of tab records.
#[allow(async_fn_in_trait)]
pub trait TabQuery {
    /// Resolve once with every tab matching `filter`, in host order.
    async fn query(&self, filter: &TabFilter) -> Result<Vec<Tab>>;
}

impl<Q: TabQuery> TabQuery for &Q {
    async fn query(&self, filter: &TabFilter) -> Result<Vec<Tab>> {
        (**self).query(filter).await
    }
}
