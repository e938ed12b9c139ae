//! Locating the bundled declarations directory.
//!
//! The directory moved around upstream over time, so it is guessed from the
//! position of well-known lib files rather than hardcoded. A directory that
//! holds any of [`ANCHOR_FILES`] is a candidate; exactly one is required.

use std::collections::BTreeSet;

use crate::error::{GenError, GenResult};

/// File names only found in the bundled declarations directory.
pub const ANCHOR_FILES: [&str; 3] = ["lib.d.ts", "lib.dom.d.ts", "lib.esnext.d.ts"];

/// Fixtures live here and carry their own copies of the anchors.
const IGNORED_PREFIX: &str = "tests/";

pub fn find_dts_dir<S: AsRef<str>>(paths: &[S]) -> GenResult<String> {
    let mut candidates = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();
        if path.starts_with(IGNORED_PREFIX) {
            continue;
        }

        let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));
        if ANCHOR_FILES.contains(&file) {
            candidates.insert(dir);
        }
    }

    let mut iter = candidates.iter();
    match (iter.next(), iter.next()) {
        (Some(dir), None) => Ok(dir.to_string()),
        _ => Err(GenError::format(format!(
            "failed to determine dts folder (candidates: {})",
            candidates.iter().copied().collect::<Vec<_>>().join(", ")
        ))),
    }
}
