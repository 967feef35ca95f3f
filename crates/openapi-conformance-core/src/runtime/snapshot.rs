// crates/openapi-conformance-core/src/runtime/snapshot.rs
// ============================================================================
// Module: Discovery Snapshot
// Description: Collects published documents into a discovery result.
// Purpose: Capture the current discovery state for offline inspection.
// Dependencies: tracing, crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! A snapshot lists every published group-version, keeps the ones accepted by
//! an optional [`GroupFilter`], and fetches each document once. A
//! group-version that disappears between listing and fetching is skipped with
//! a warning; any transport failure aborts the snapshot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing::info;
use tracing::warn;

use crate::core::DiscoveryResult;
use crate::interfaces::DiscoveryError;
use crate::interfaces::DiscoverySource;
use crate::runtime::scenario::GroupFilter;

// ============================================================================
// SECTION: Snapshot
// ============================================================================

/// Fetches the documents of every listed group-version accepted by `filter`.
///
/// Passing `None` captures every listed group-version.
///
/// # Errors
///
/// Returns [`DiscoveryError::Transport`] when listing or any fetch fails for a
/// reason other than the group-version having been withdrawn.
pub async fn collect_snapshot<S>(
    source: &S,
    filter: Option<&GroupFilter>,
) -> Result<DiscoveryResult, DiscoveryError>
where
    S: DiscoverySource + ?Sized,
{
    let listed = source.list_group_versions().await?;
    let selected = match filter {
        Some(filter) => filter.select(&listed),
        None => listed,
    };
    let mut result = DiscoveryResult::new();
    for group_version in selected {
        match source.fetch_document(&group_version).await {
            Ok(document) => {
                result.insert(group_version, document);
            }
            Err(DiscoveryError::NotFound(_)) => {
                warn!(group_version = %group_version, "listed group-version withdrawn before fetch");
            }
            Err(err) => return Err(err),
        }
    }
    info!(documents = result.len(), "discovery snapshot collected");
    Ok(result)
}
