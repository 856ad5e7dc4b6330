// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Mirror maintenance for cross-record reference lists.
//!
//! Records own their outgoing id lists; whenever such a list changes, the
//! reverse side of every added or removed reference must be rewritten too.
//! [`RefDelta`] computes which counterparts to touch and the drivers here
//! apply the writes one by one. Counterpart updates are best-effort: a
//! missing or unwritable record is logged and skipped, never bubbled up to
//! the caller, so the owning write always stands.

use tracing::warn;

use crate::model::{Place, Service};
use crate::store::{FolderStore, StoreError};


/// Set difference between an old and a new reference list, with the owner's
/// own id filtered out of both sides so records never self-reference.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RefDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl RefDelta {
    pub fn between(owner_id: &str, old: &[String], new: &[String]) -> Self {
        let added = new
            .iter()
            .filter(|id| id.as_str() != owner_id && !old.contains(id))
            .cloned()
            .collect();
        let removed = old
            .iter()
            .filter(|id| id.as_str() != owner_id && !new.contains(id))
            .cloned()
            .collect();
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// One direction of a mirror: how to read and rewrite the reference list on
/// the counterpart side. `load` returning `Ok(None)` means the counterpart
/// is missing or ineligible and is skipped with a warning.
pub trait MirrorSide {
    const SIDE: &'static str;

    fn load(&self, id: &str) -> Result<Option<Vec<String>>, StoreError>;
    fn save(&self, id: &str, refs: Vec<String>) -> Result<(), StoreError>;
}

/// Applies a delta against the counterpart side: every added counterpart
/// gains `owner_id` in its list, every removed one loses it. Writes are
/// skipped when the list already matches, so replaying a delta converges.
pub fn sync_mirrors<S: MirrorSide>(side: &S, owner_id: &str, delta: &RefDelta) {
    for id in &delta.added {
        apply(side, id, |refs| {
            if refs.iter().any(|r| r == owner_id) {
                false
            } else {
                refs.push(owner_id.to_owned());
                true
            }
        });
    }
    for id in &delta.removed {
        apply(side, id, |refs| {
            let before = refs.len();
            refs.retain(|r| r != owner_id);
            refs.len() != before
        });
    }
}

fn apply<S: MirrorSide>(side: &S, id: &str, mutate: impl FnOnce(&mut Vec<String>) -> bool) {
    let mut refs = match side.load(id) {
        Ok(Some(refs)) => refs,
        Ok(None) => {
            warn!(side = S::SIDE, id, "mirror counterpart missing, skipped");
            return;
        }
        Err(error) => {
            warn!(side = S::SIDE, id, %error, "mirror read failed, skipped");
            return;
        }
    };
    if !mutate(&mut refs) {
        return;
    }
    if let Err(error) = side.save(id, refs) {
        warn!(side = S::SIDE, id, %error, "mirror write failed, skipped");
    }
}

/// Re-drives the symmetric nearby mirror across the whole collection:
/// dangling ids are pruned from each list and missing back-links restored.
/// Used by the admin repair endpoint after a crashed or partial fan-out.
/// Returns the number of records rewritten.
pub fn repair_place_mirrors(store: &FolderStore) -> Result<usize, StoreError> {
    let places = store.list::<Place>()?;
    let ids: Vec<String> = places.iter().map(|p| p.id.clone()).collect();

    // Desired state: keep existing links to live places, then close the
    // symmetry by adding the reverse of every surviving link.
    let mut desired: std::collections::BTreeMap<String, Vec<String>> = places
        .iter()
        .map(|p| {
            let refs = p
                .nearby_place_ids
                .iter()
                .filter(|id| *id != &p.id && ids.contains(id))
                .cloned()
                .collect();
            (p.id.clone(), refs)
        })
        .collect();
    let snapshot: Vec<(String, Vec<String>)> = desired
        .iter()
        .map(|(id, refs)| (id.clone(), refs.clone()))
        .collect();
    for (owner, refs) in snapshot {
        for target in refs {
            if let Some(back) = desired.get_mut(&target) {
                if !back.contains(&owner) {
                    back.push(owner.clone());
                }
            }
        }
    }

    let mut updated = 0;
    for mut place in places {
        let Some(refs) = desired.remove(&place.id) else {
            continue;
        };
        if place.nearby_place_ids == refs {
            continue;
        }
        place.nearby_place_ids = refs;
        place.updated_at = chrono::Utc::now();
        store.put(&place)?;
        updated += 1;
    }
    Ok(updated)
}

/// Rebuilds every guide service's `route_ids` from the owning side
/// (`Route::guide_ids`). Returns the number of services rewritten.
pub fn repair_guide_mirrors(store: &FolderStore) -> Result<usize, StoreError> {
    let routes = store.list::<crate::model::Route>()?;
    let mut updated = 0;
    for mut service in store.list::<Service>()? {
        if !service.is_guide() {
            continue;
        }
        let expected: Vec<String> = routes
            .iter()
            .filter(|r| r.guide_ids.iter().any(|id| id == &service.id))
            .map(|r| r.id.clone())
            .collect();
        let mut refs = service.route_ids.clone();
        refs.retain(|id| expected.contains(id));
        for id in &expected {
            if !refs.contains(id) {
                refs.push(id.clone());
            }
        }
        if refs == service.route_ids {
            continue;
        }
        service.route_ids = refs;
        service.updated_at = chrono::Utc::now();
        store.put(&service)?;
        updated += 1;
    }
    Ok(updated)
}

/// Symmetric nearby-places mirror: both sides are `Place::nearby_place_ids`.
pub struct PlaceNearby<'a> {
    pub store: &'a FolderStore,
}

impl MirrorSide for PlaceNearby<'_> {
    const SIDE: &'static str = "place.nearbyPlaceIds";

    fn load(&self, id: &str) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self
            .store
            .get::<Place>(id)?
            .map(|place| place.nearby_place_ids))
    }

    fn save(&self, id: &str, refs: Vec<String>) -> Result<(), StoreError> {
        let Some(mut place) = self.store.get::<Place>(id)? else {
            return Ok(());
        };
        place.nearby_place_ids = refs;
        place.updated_at = chrono::Utc::now();
        self.store.put(&place)
    }
}

/// Asymmetric guide mirror: `Route::guide_ids` reflects into the
/// `route_ids` of services, but only services in the guide category are
/// eligible counterparts.
pub struct GuideRoutes<'a> {
    pub store: &'a FolderStore,
}

impl MirrorSide for GuideRoutes<'_> {
    const SIDE: &'static str = "service.routeIds";

    fn load(&self, id: &str) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self
            .store
            .get::<Service>(id)?
            .filter(Service::is_guide)
            .map(|service| service.route_ids))
    }

    fn save(&self, id: &str, refs: Vec<String>) -> Result<(), StoreError> {
        let Some(mut service) = self.store.get::<Service>(id)? else {
            return Ok(());
        };
        service.route_ids = refs;
        service.updated_at = chrono::Utc::now();
        self.store.put(&service)
    }
}
