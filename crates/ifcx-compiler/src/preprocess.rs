// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text and name rewriting ahead of parsing
//!
//! Layer files address objects by hyphenated UUIDs, which are not valid
//! script identifiers. They are rewritten to `ID` + 32 hex digits before the
//! JSON is parsed, so every path, ref and key in the document agrees.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

/// Prefix of rewritten UUID tokens
pub const UUID_PREFIX: &str = "ID";

// A standard-form UUID not glued to further hex digits
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(^|[^0-9A-Fa-f])([0-9A-Fa-f]{8})-([0-9A-Fa-f]{4})-([0-9A-Fa-f]{4})-([0-9A-Fa-f]{4})-([0-9A-Fa-f]{12})([^0-9A-Fa-f]|$)",
    )
    .expect("UUID pattern is valid")
});

/// Rewrite every standard-form UUID into an identifier-safe token
///
/// Hex case is preserved. Text without UUIDs is returned unchanged and
/// unallocated, which also makes the rewrite idempotent.
pub fn normalize_uuids(text: &str) -> Cow<'_, str> {
    if !UUID.is_match(text) {
        return Cow::Borrowed(text);
    }

    // The boundary groups consume one character on each side, so adjacent
    // UUIDs separated by a single character need a second pass.
    let mut output = replace_pass(text);
    while UUID.is_match(&output) {
        output = replace_pass(&output);
    }
    Cow::Owned(output)
}

fn replace_pass(text: &str) -> String {
    UUID.replace_all(text, |caps: &Captures<'_>| {
        format!(
            "{}{}{}{}{}{}{}{}",
            &caps[1], UUID_PREFIX, &caps[2], &caps[3], &caps[4], &caps[5], &caps[6], &caps[7]
        )
    })
    .into_owned()
}

/// Make a name usable as a component identifier (`::` and `-` become `_`)
pub fn format_name(name: &str) -> String {
    name.replace("::", "_").replace('-', "_")
}

/// Make a name human readable (`_` becomes a space)
pub fn clean_name(name: &str) -> String {
    name.replace('_', " ")
}
