// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # tabbadge
//!
//! Two helpers for browser extensions compiled to WebAssembly:
//!
//! * [`set_badge_text`] puts a label on the extension's toolbar icon,
//! * [`active_tab_url`] resolves with the URL of the focused tab.
//!
//! Both take the host API as a capability ([`BadgeSink`], [`TabQuery`]) so
//! they can run against the real `chrome.*` bindings in [`chrome`] or the
//! doubles in [`fake`]:
//!
//! ```rust
//! use tabbadge::fake::{FixedTabs, RecordingBadge};
//! use tabbadge::{active_tab_url, set_badge_text, Tab};
//!
//! let badge = RecordingBadge::default();
//! set_badge_text(&badge, "ON");
//! assert_eq!(badge.current().as_deref(), Some("ON"));
//!
//! let tabs = FixedTabs::new([Tab::with_url("https://example.com")]);
//! let url = futures::executor::block_on(active_tab_url(&tabs));
//! assert_eq!(url.as_deref(), Ok("https://example.com"));
//! ```
//!
//! From JavaScript the same functions are available as `setBadgeText` and
//! `getTabUrl`, see [`js`].

mod badge;
mod error;
mod host;
mod tabs;

pub mod chrome;
pub mod fake;
pub mod js;

pub use badge::set_badge_text;
pub use error::{Error, Result};
pub use host::{BadgeSink, Tab, TabFilter, TabQuery};
pub use tabs::active_tab_url;
