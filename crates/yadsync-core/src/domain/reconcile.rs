//! Reconciliation of a local and a remote inventory
//!
//! Size is the only change signal. A file whose content changed but whose
//! length did not is considered unchanged.

use super::actions::ActionSet;
use super::inventory::Inventory;

/// Computes the uploads and deletes that make `remote` mirror `local`
///
/// - uploads: names present locally that are missing remotely or whose
///   sizes differ
/// - deletes: names present remotely but not locally
///
/// Both inventories must come from the same cycle.
pub fn reconcile(local: &Inventory, remote: &Inventory) -> ActionSet {
    let uploads = local
        .records()
        .filter(|record| match remote.get(&record.name) {
            Some(existing) => existing.size != record.size,
            None => true,
        })
        .map(|record| record.name.clone())
        .collect();

    let deletes = remote
        .names()
        .filter(|name| !local.contains(name))
        .cloned()
        .collect();

    ActionSet { uploads, deletes }
}
