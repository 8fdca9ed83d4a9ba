// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Functions exported to JavaScript.

use wasm_bindgen::prelude::*;

use crate::chrome::{ChromeBadge, ChromeTabs};

/// Entry point called by the generated `app.js` and `options.js` stubs.
#[wasm_bindgen]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::debug!("tabbadge {} started", env!("CARGO_PKG_VERSION"));
}

/// `setBadgeText(text)`, throws if no badge API is reachable.
#[wasm_bindgen(js_name = setBadgeText)]
pub fn set_badge_text(text: &str) -> Result<(), JsValue> {
    let badge = ChromeBadge::connect()?;

    crate::set_badge_text(&badge, text);

    Ok(())
}

/// `getTabUrl(): Promise<string>`, rejects with an `Error` when there is no
/// active tab or its URL is hidden from the extension.
#[wasm_bindgen(js_name = getTabUrl)]
pub async fn get_tab_url() -> Result<String, JsValue> {
    let tabs = ChromeTabs::connect()?;

    Ok(crate::active_tab_url(&tabs).await?)
}
