// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute translation
//!
//! - [`descriptor`] - static name table choosing an emission strategy
//! - [`format`] - JSON values to script literals
//! - [`relationship`] - reference extraction for relationship attributes
//! - [`translate`] - the per-object translator tying them together

pub mod descriptor;
pub mod format;
pub mod relationship;
pub mod translate;

pub use descriptor::{classify_attribute, AttributeKind, RULES};
pub use format::{format_float, format_value, format_vector};
pub use relationship::{extract_refs, RelationshipRef};
pub use translate::{AttributeTranslator, SiblingIndex, TranslateContext, TranslatedAttributes};
