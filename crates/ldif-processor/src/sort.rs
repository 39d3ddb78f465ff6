//! Parent-before-child ordering.

use std::borrow::Borrow;
use tracing::debug;

use crate::entry::Entry;
use crate::Result;

/// Orders entries by ascending DN depth so every parent precedes its descendants.
///
/// The sort is stable: entries of equal depth keep their input order. No tree is built, so
/// entries whose parents are absent are still placed by depth alone.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the signature uniform with the other stages.
#[allow(clippy::unnecessary_wraps)]
pub fn sort_hierarchically<E: Borrow<Entry>>(entries: &[E]) -> Result<Vec<&Entry>> {
    let mut sorted: Vec<&Entry> = entries.iter().map(Borrow::<Entry>::borrow).collect();
    sorted.sort_by_key(|entry| entry.dn().depth());
    debug!(entries = sorted.len(), "sorted LDIF entries by depth");
    Ok(sorted)
}
