// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bindings to the `chrome.*` extension API.

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::host::{BadgeSink, Tab, TabFilter, TabQuery};
use crate::{Error, Result};

#[wasm_bindgen]
extern "C" {
    /// `chrome.action` or `chrome.browserAction`
    #[derive(Debug, Clone)]
    type ActionApi;

    #[wasm_bindgen(method, catch, js_name = setBadgeText)]
    fn set_badge_text(this: &ActionApi, details: &Object) -> Result<JsValue, JsValue>;

    /// `chrome.tabs`
    #[derive(Debug, Clone)]
    type TabsApi;

    #[wasm_bindgen(method, catch)]
    fn query(this: &TabsApi, info: &Object, callback: &Function) -> Result<JsValue, JsValue>;
}

/// Walk `globalThis.<path>`, stopping at the first missing key.
fn lookup(path: &[&str]) -> Option<JsValue> {
    let mut value = JsValue::from(js_sys::global());

    for key in path {
        value = Reflect::get(&value, &JsValue::from_str(key)).ok()?;

        if value.is_undefined() || value.is_null() {
            return None;
        }
    }

    Some(value)
}

fn last_error() -> Option<JsValue> {
    lookup(&["chrome", "runtime", "lastError"])
}

fn set(target: &Object, key: &str, value: JsValue) {
    // Plain objects are always extensible, this can't fail.
    let _ = Reflect::set(target, &JsValue::from_str(key), &value);
}

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

/// Toolbar badge of the extension.
///
/// Uses `chrome.action` on Manifest V3 hosts and falls back to the older
/// `chrome.browserAction`.
#[derive(Debug, Clone)]
pub struct ChromeBadge {
    api: ActionApi,
}

impl ChromeBadge {
    pub fn connect() -> Result<Self> {
        let api = lookup(&["chrome", "action"])
            .or_else(|| lookup(&["chrome", "browserAction"]))
            .ok_or(Error::Unavailable("chrome.action"))?;

        Ok(ChromeBadge {
            api: api.unchecked_into(),
        })
    }
}

impl BadgeSink for ChromeBadge {
    fn set_text(&self, text: &str) {
        let details = Object::new();

        set(&details, "text", JsValue::from_str(text));

        match self.api.set_badge_text(&details) {
            Ok(ret) => {
                // Manifest V3 returns a promise, V2 returns nothing.
                if let Ok(promise) = ret.dyn_into::<Promise>() {
                    spawn_local(async move {
                        if let Err(err) = JsFuture::from(promise).await {
                            log::warn!("setBadgeText rejected: {}", Error::from_js(err));
                        }
                    });
                }
            }
            Err(err) => log::warn!("setBadgeText failed: {}", Error::from_js(err)),
        }
    }
}

/// `chrome.tabs`, queried through the callback form so that it works on both
/// manifest versions.
#[derive(Debug, Clone)]
pub struct ChromeTabs {
    api: TabsApi,
}

impl ChromeTabs {
    pub fn connect() -> Result<Self> {
        let api = lookup(&["chrome", "tabs"]).ok_or(Error::Unavailable("chrome.tabs"))?;

        Ok(ChromeTabs {
            api: api.unchecked_into(),
        })
    }
}

impl TabQuery for ChromeTabs {
    async fn query(&self, filter: &TabFilter) -> Result<Vec<Tab>> {
        let info = Object::new();

        if let Some(active) = filter.active {
            set(&info, "active", JsValue::from_bool(active));
        }
        if let Some(current_window) = filter.current_window {
            set(&info, "currentWindow", JsValue::from_bool(current_window));
        }

        let api = &self.api;
        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            let on_throw = reject.clone();
            let callback = Closure::once_into_js(move |tabs: JsValue| {
                // lastError is only meaningful inside the callback
                let _ = match last_error() {
                    Some(err) => reject.call1(&JsValue::UNDEFINED, &err),
                    None => resolve.call1(&JsValue::UNDEFINED, &tabs),
                };
            });

            if let Err(err) = api.query(&info, callback.unchecked_ref()) {
                let _ = on_throw.call1(&JsValue::UNDEFINED, &err);
            }
        });

        let tabs = JsFuture::from(promise).await.map_err(Error::from_js)?;

        // `Array.from` throws on these
        if tabs.is_undefined() || tabs.is_null() {
            return Ok(Vec::new());
        }

        Ok(Array::from(&tabs).iter().map(|tab| decode_tab(&tab)).collect())
    }
}

fn decode_tab(tab: &JsValue) -> Tab {
    Tab {
        id: get(tab, "id").as_f64().map(|id| id as i32),
        url: get(tab, "url").as_string(),
        title: get(tab, "title").as_string(),
        active: get(tab, "active").as_bool().unwrap_or(false),
    }
}
