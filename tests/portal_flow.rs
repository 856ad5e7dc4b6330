// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Cross-module scenario: an admin curates filters, content and relations,
//! and the denormalized state stays consistent throughout.

use serde_json::json;
use tempfile::TempDir;

use tropa::filters::{AddGroupInput, FilterFamily, FilterService, RemoveValueInput, ReplaceValueInput};
use tropa::model::{Place, ReviewEntity, ReviewStatus, Route, Service, GUIDE_CATEGORY};
use tropa::ops;
use tropa::store::FolderStore;

fn open_store() -> (TempDir, FolderStore) {
    let dir = TempDir::new().unwrap();
    let store = FolderStore::open(dir.path()).unwrap();
    (dir, store)
}

#[test]
fn curating_a_region_keeps_every_mirror_consistent() {
    let (_dir, store) = open_store();

    // Seed three places linked through the symmetric nearby mirror.
    let dombay = ops::places::create_place(
        &store,
        ops::places::PlaceInput {
            title: Some("Домбай".to_owned()),
            directions: Some(vec!["Домбай".to_owned()]),
            seasons: Some(vec!["зима".to_owned(), "лето".to_owned()]),
            ..ops::places::PlaceInput::default()
        },
    )
    .unwrap();
    let arkhyz = ops::places::create_place(
        &store,
        ops::places::PlaceInput {
            title: Some("Архыз".to_owned()),
            directions: Some(vec!["Архыз".to_owned()]),
            nearby_place_ids: Some(vec![dombay.id.clone()]),
            ..ops::places::PlaceInput::default()
        },
    )
    .unwrap();

    let dombay_after: Place = store.get(&dombay.id).unwrap().unwrap();
    assert_eq!(dombay_after.nearby_place_ids, vec![arkhyz.id.clone()]);

    // Rename a direction; both the config and the records move together.
    let filters = FilterService::new(&store, FilterFamily::Places);
    filters
        .replace_value(ReplaceValueInput {
            group: "directions".to_owned(),
            old_value: "Архыз".to_owned(),
            new_value: "Архыз (курорт)".to_owned(),
        })
        .unwrap();
    let arkhyz_after: Place = store.get(&arkhyz.id).unwrap().unwrap();
    assert_eq!(arkhyz_after.directions, vec!["Архыз (курорт)"]);

    // An extra group participates in the same machinery.
    filters
        .add_extra_group(AddGroupInput {
            label: Some("Тип отдыха".to_owned()),
            values: Some(vec![json!("активный")]),
            ..AddGroupInput::default()
        })
        .unwrap();
    ops::places::update_place(
        &store,
        &dombay.id,
        ops::places::PlaceInput {
            custom_filters: Some(
                [("tip_otdyha".to_owned(), vec!["активный".to_owned()])]
                    .into_iter()
                    .collect(),
            ),
            ..ops::places::PlaceInput::default()
        },
    )
    .unwrap();
    filters
        .remove_value(RemoveValueInput {
            group: "tip_otdyha".to_owned(),
            value: "активный".to_owned(),
        })
        .unwrap();
    let dombay_after: Place = store.get(&dombay.id).unwrap().unwrap();
    assert!(dombay_after.custom_filters.is_empty());

    // Attach a guide through a route; the service mirrors the route id.
    let guide = ops::services::create_service(
        &store,
        ops::services::ServiceInput {
            title: Some("Горный гид".to_owned()),
            category: Some(GUIDE_CATEGORY.to_owned()),
            ..ops::services::ServiceInput::default()
        },
    )
    .unwrap();
    let route = ops::routes::create_route(
        &store,
        ops::routes::RouteInput {
            title: Some("Домбайская тропа".to_owned()),
            season: Some(Some("Лето".to_owned())),
            place_ids: Some(vec![dombay.id.clone()]),
            guide_ids: Some(vec![guide.id.clone()]),
            ..ops::routes::RouteInput::default()
        },
    )
    .unwrap();
    let guide_after: Service = store.get(&guide.id).unwrap().unwrap();
    assert_eq!(guide_after.route_ids, vec![route.id.clone()]);

    // Route filter removal clears the scalar on the record.
    FilterService::new(&store, FilterFamily::Routes)
        .remove_value(RemoveValueInput {
            group: "seasons".to_owned(),
            value: "Лето".to_owned(),
        })
        .unwrap();
    let route_after: Route = store.get(&route.id).unwrap().unwrap();
    assert_eq!(route_after.season, None);

    // Approve a review; the place rollup follows.
    let review = ops::reviews::create_review(
        &store,
        ops::reviews::ReviewInput {
            entity_type: ReviewEntity::Place,
            entity_id: dombay.id.clone(),
            author_name: "Мария".to_owned(),
            author_avatar: None,
            rating: 5,
            text: "Незабываемо".to_owned(),
            user_id: None,
        },
    )
    .unwrap();
    ops::reviews::set_review_status(&store, &review.id, ReviewStatus::Approved).unwrap();
    let dombay_after: Place = store.get(&dombay.id).unwrap().unwrap();
    assert_eq!(dombay_after.rating, 5.0);
    assert_eq!(dombay_after.reviews_count, 1);

    // Deleting the route detaches it from the guide.
    ops::routes::delete_route(&store, &route.id).unwrap();
    let guide_after: Service = store.get(&guide.id).unwrap().unwrap();
    assert!(guide_after.route_ids.is_empty());

    // Deleting a place cleans the symmetric mirror too.
    ops::places::delete_place(&store, &arkhyz.id).unwrap();
    let dombay_after: Place = store.get(&dombay.id).unwrap().unwrap();
    assert!(dombay_after.nearby_place_ids.is_empty());
}
