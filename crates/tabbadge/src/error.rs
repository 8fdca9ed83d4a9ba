// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Everything that can go wrong talking to the host browser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The query for the active tab of the current window came back empty,
    /// e.g. when the focused window is a devtools window.
    #[error("no active tab in the current window")]
    NoActiveTab,
    /// The active tab was found, but the host did not expose its URL. Hosts
    /// omit it when the extension lacks the `tabs` or `activeTab` permission.
    #[error("active tab has no URL")]
    MissingUrl,
    /// A `chrome.*` namespace is missing from the global scope.
    #[error("`{0}` is not available in this context")]
    Unavailable(&'static str),
    /// The host threw, rejected, or set `chrome.runtime.lastError`.
    #[error("host error: {0}")]
    Host(String),
}

impl Error {
    pub(crate) fn from_js(value: JsValue) -> Self {
        let message = match value.dyn_ref::<js_sys::Error>() {
            Some(err) => String::from(err.message()),
            None => js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
                .or_else(|| value.as_string())
                .unwrap_or_else(|| format!("{value:?}")),
        };

        Error::Host(message)
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> JsValue {
        js_sys::Error::new(&err.to_string()).into()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::NoActiveTab.to_string(),
            "no active tab in the current window"
        );
        assert_eq!(
            Error::Unavailable("chrome.tabs").to_string(),
            "`chrome.tabs` is not available in this context"
        );
        assert_eq!(
            Error::Host("boom".into()).to_string(),
            "host error: boom"
        );
    }
}
