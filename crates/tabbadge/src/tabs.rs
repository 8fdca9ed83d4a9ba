// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::host::{TabFilter, TabQuery};
use crate::{Error, Result};

/// URL of the active tab in the current window.
///
/// Issues exactly one query and consults only the first tab returned. There
/// is no retry, timeout or caching: every call asks the host again.
pub async fn active_tab_url<Q>(tabs: &Q) -> Result<String>
where
    Q: TabQuery,
{
    let found = tabs.query(&TabFilter::active_in_current_window()).await?;

    log::debug!("active tab query returned {} tab(s)", found.len());

    let tab = found.into_iter().next().ok_or(Error::NoActiveTab)?;

    tab.url.ok_or(Error::MissingUrl)
}
