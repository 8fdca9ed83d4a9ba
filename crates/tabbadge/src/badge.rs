// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::host::BadgeSink;

/// Set the toolbar badge label, replacing whatever was there before.
pub fn set_badge_text<B>(badge: &B, text: &str)
where
    B: BadgeSink + ?Sized,
{
    log::debug!("setting badge text to {text:?}");

    badge.set_text(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::RecordingBadge;

    #[test]
    fn one_call_per_invocation() {
        let badge = RecordingBadge::default();

        set_badge_text(&badge, "42");

        assert_eq!(badge.texts(), ["42"]);
    }

    #[test]
    fn text_is_passed_through_verbatim() {
        let badge = RecordingBadge::default();

        set_badge_text(&badge, "  ünï ");
        set_badge_text(&badge, "");

        assert_eq!(badge.texts(), ["  ünï ", ""]);
        assert_eq!(badge.current(), Some(String::new()));
    }

    #[test]
    fn works_through_trait_objects() {
        let badge = RecordingBadge::default();
        let sink: &dyn BadgeSink = &badge;

        set_badge_text(sink, "on");

        assert_eq!(badge.texts(), ["on"]);
    }
}
