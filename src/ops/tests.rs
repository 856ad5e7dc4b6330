// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use serde_json::json;
use tempfile::TempDir;

use crate::model::{Place, ReviewEntity, ReviewStatus, Role, Route, Service, User, GUIDE_CATEGORY};
use crate::store::FolderStore;

use super::public::{FavoriteKind, ViewTarget};
use super::*;

fn open_store() -> (TempDir, FolderStore) {
    let dir = TempDir::new().unwrap();
    let store = FolderStore::open(dir.path()).unwrap();
    (dir, store)
}

fn make_place(store: &FolderStore, title: &str) -> Place {
    places::create_place(
        store,
        places::PlaceInput {
            title: Some(title.to_owned()),
            ..places::PlaceInput::default()
        },
    )
    .unwrap()
}

fn make_guide(store: &FolderStore, title: &str) -> Service {
    let service = services::create_service(
        store,
        services::ServiceInput {
            title: Some(title.to_owned()),
            category: Some(GUIDE_CATEGORY.to_owned()),
            ..services::ServiceInput::default()
        },
    )
    .unwrap();
    assert!(service.is_guide());
    service
}

fn make_user(store: &FolderStore, id: &str, role: Role) -> User {
    let now = chrono::Utc::now();
    let user = User {
        id: id.to_owned(),
        login: format!("user-{id}"),
        email: None,
        name: None,
        avatar: None,
        role,
        is_banned: false,
        favorite_place_ids: Vec::new(),
        favorite_route_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    store.put(&user).unwrap();
    user
}

#[test]
fn slug_is_transliterated_with_suffix() {
    let (_dir, store) = open_store();
    let place = make_place(&store, "Домбай");
    assert!(place.slug.starts_with("dombay-"));
    assert!(looks_like_id(&place.id));
}

#[test]
fn place_lookup_falls_back_to_slug() {
    let (_dir, store) = open_store();
    let created = make_place(&store, "Софийские водопады");
    let by_slug = places::get_place(&store, &created.slug).unwrap();
    assert_eq!(by_slug.id, created.id);
    let by_id = places::get_place(&store, &created.id).unwrap();
    assert_eq!(by_id.slug, created.slug);
}

#[test]
fn nearby_mirror_holds_through_update_and_delete() {
    let (_dir, store) = open_store();
    let a = make_place(&store, "А");
    let b = make_place(&store, "Б");
    let c = make_place(&store, "В");

    places::update_place(
        &store,
        &a.id,
        places::PlaceInput {
            nearby_place_ids: Some(vec![b.id.clone(), c.id.clone(), a.id.clone()]),
            ..places::PlaceInput::default()
        },
    )
    .unwrap();

    // Self-reference dropped, both counterparts gained the back-link.
    let a2: Place = store.get(&a.id).unwrap().unwrap();
    assert_eq!(a2.nearby_place_ids, vec![b.id.clone(), c.id.clone()]);
    let b2: Place = store.get(&b.id).unwrap().unwrap();
    assert_eq!(b2.nearby_place_ids, vec![a.id.clone()]);

    places::delete_place(&store, &a.id).unwrap();
    let b3: Place = store.get(&b.id).unwrap().unwrap();
    let c3: Place = store.get(&c.id).unwrap().unwrap();
    assert!(b3.nearby_place_ids.is_empty());
    assert!(c3.nearby_place_ids.is_empty());
}

#[test]
fn route_guide_mirror_only_attaches_guides() {
    let (_dir, store) = open_store();
    let guide = make_guide(&store, "Иван");
    let rental = services::create_service(
        &store,
        services::ServiceInput {
            title: Some("Прокат".to_owned()),
            category: Some("Прокат".to_owned()),
            ..services::ServiceInput::default()
        },
    )
    .unwrap();

    let route = routes::create_route(
        &store,
        routes::RouteInput {
            title: Some("К Софийским озёрам".to_owned()),
            guide_ids: Some(vec![guide.id.clone(), rental.id.clone()]),
            ..routes::RouteInput::default()
        },
    )
    .unwrap();

    let guide2: Service = store.get(&guide.id).unwrap().unwrap();
    let rental2: Service = store.get(&rental.id).unwrap().unwrap();
    assert_eq!(guide2.route_ids, vec![route.id.clone()]);
    assert!(rental2.route_ids.is_empty());

    routes::delete_route(&store, &route.id).unwrap();
    let guide3: Service = store.get(&guide.id).unwrap().unwrap();
    assert!(guide3.route_ids.is_empty());
}

#[test]
fn leaving_guide_category_detaches_routes() {
    let (_dir, store) = open_store();
    let guide = make_guide(&store, "Пётр");
    let route = routes::create_route(
        &store,
        routes::RouteInput {
            title: Some("Тебердинская тропа".to_owned()),
            guide_ids: Some(vec![guide.id.clone()]),
            ..routes::RouteInput::default()
        },
    )
    .unwrap();

    services::update_service(
        &store,
        &guide.id,
        services::ServiceInput {
            category: Some("Трансфер".to_owned()),
            ..services::ServiceInput::default()
        },
    )
    .unwrap();

    let service: Service = store.get(&guide.id).unwrap().unwrap();
    assert!(service.route_ids.is_empty());
    let route2: Route = store.get(&route.id).unwrap().unwrap();
    assert!(route2.guide_ids.is_empty());
}

#[test]
fn approving_reviews_rolls_up_the_rating() {
    let (_dir, store) = open_store();
    let place = make_place(&store, "Бадукские озёра");

    let mut ids = Vec::new();
    for rating in [5, 4] {
        let review = reviews::create_review(
            &store,
            reviews::ReviewInput {
                entity_type: ReviewEntity::Place,
                entity_id: place.id.clone(),
                author_name: "Гость".to_owned(),
                author_avatar: None,
                rating,
                text: "Очень красиво".to_owned(),
                user_id: None,
            },
        )
        .unwrap();
        assert_eq!(review.status, ReviewStatus::Pending);
        ids.push(review.id);
    }

    // Pending reviews do not count.
    let before: Place = store.get(&place.id).unwrap().unwrap();
    assert_eq!(before.reviews_count, 0);

    for id in &ids {
        reviews::set_review_status(&store, id, ReviewStatus::Approved).unwrap();
    }
    let after: Place = store.get(&place.id).unwrap().unwrap();
    assert_eq!(after.reviews_count, 2);
    assert_eq!(after.rating, 4.5);

    reviews::delete_review(&store, &ids[0]).unwrap();
    let final_state: Place = store.get(&place.id).unwrap().unwrap();
    assert_eq!(final_state.reviews_count, 1);
    assert_eq!(final_state.rating, 4.0);
}

#[test]
fn review_rating_rounds_to_one_decimal() {
    let (_dir, store) = open_store();
    let place = make_place(&store, "Шоана");
    for rating in [5, 4, 4] {
        let review = reviews::create_review(
            &store,
            reviews::ReviewInput {
                entity_type: ReviewEntity::Place,
                entity_id: place.id.clone(),
                author_name: "Гость".to_owned(),
                author_avatar: None,
                rating,
                text: "Отлично".to_owned(),
                user_id: None,
            },
        )
        .unwrap();
        reviews::set_review_status(&store, &review.id, ReviewStatus::Approved).unwrap();
    }
    let place: Place = store.get(&place.id).unwrap().unwrap();
    // 13 / 3 = 4.333..., rounded to one decimal.
    assert_eq!(place.rating, 4.3);
}

#[test]
fn review_for_missing_entity_is_rejected() {
    let (_dir, store) = open_store();
    let err = reviews::create_review(
        &store,
        reviews::ReviewInput {
            entity_type: ReviewEntity::Place,
            entity_id: "0".repeat(32),
            author_name: "Гость".to_owned(),
            author_avatar: None,
            rating: 5,
            text: "x".to_owned(),
            user_id: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, crate::error::ApiError::NotFound(_)));
}

#[test]
fn reviews_on_routes_skip_the_rollup() {
    let (_dir, store) = open_store();
    let route = routes::create_route(
        &store,
        routes::RouteInput {
            title: Some("Алибек".to_owned()),
            ..routes::RouteInput::default()
        },
    )
    .unwrap();
    let review = reviews::create_review(
        &store,
        reviews::ReviewInput {
            entity_type: ReviewEntity::Route,
            entity_id: route.id.clone(),
            author_name: "Гость".to_owned(),
            author_avatar: None,
            rating: 5,
            text: "Супер".to_owned(),
            user_id: None,
        },
    )
    .unwrap();
    reviews::set_review_status(&store, &review.id, ReviewStatus::Approved).unwrap();

    // The route record is untouched by the rollup.
    let after: Route = store.get(&route.id).unwrap().unwrap();
    assert_eq!(after.updated_at, route.updated_at);
}

#[test]
fn role_changes_are_superadmin_only() {
    let (_dir, store) = open_store();
    let user = make_user(&store, &new_id(), Role::User);

    let err = users::update_role(&store, Role::Admin, &user.id, Role::Admin).unwrap_err();
    assert!(matches!(err, crate::error::ApiError::Forbidden(_)));

    let updated = users::update_role(&store, Role::SuperAdmin, &user.id, Role::Admin).unwrap();
    assert_eq!(updated.role, Role::Admin);
}

#[test]
fn admins_cannot_be_banned() {
    let (_dir, store) = open_store();
    let admin = make_user(&store, &new_id(), Role::Admin);
    let err = users::set_banned(&store, &admin.id, true).unwrap_err();
    assert!(matches!(err, crate::error::ApiError::Forbidden(_)));

    let user = make_user(&store, &new_id(), Role::User);
    let banned = users::set_banned(&store, &user.id, true).unwrap();
    assert!(banned.is_banned);
}

#[test]
fn admin_sees_only_regular_accounts() {
    let (_dir, store) = open_store();
    make_user(&store, &new_id(), Role::User);
    make_user(&store, &new_id(), Role::Admin);

    let as_admin = users::list_users(&store, Role::Admin, &users::UserListQuery::default()).unwrap();
    assert_eq!(as_admin.items.len(), 1);
    let as_super =
        users::list_users(&store, Role::SuperAdmin, &users::UserListQuery::default()).unwrap();
    assert_eq!(as_super.items.len(), 2);
}

#[test]
fn views_are_counted_once_per_visitor() {
    let (_dir, store) = open_store();
    let place = make_place(&store, "Медовые водопады");

    assert!(public::track_view(&store, ViewTarget::Place, &place.id, "v1"));
    assert!(!public::track_view(&store, ViewTarget::Place, &place.id, "v1"));
    assert!(public::track_view(&store, ViewTarget::Place, &place.id, "v2"));

    let after: Place = store.get(&place.id).unwrap().unwrap();
    assert_eq!(after.unique_views_count, 2);
}

#[test]
fn favorites_round_trip() {
    let (_dir, store) = open_store();
    let user = make_user(&store, &new_id(), Role::User);
    let place = make_place(&store, "Аманауз");

    public::add_favorite(&store, &user.id, FavoriteKind::Place, &place.id).unwrap();
    // Adding twice stays a single entry.
    public::add_favorite(&store, &user.id, FavoriteKind::Place, &place.id).unwrap();

    let favorites = public::list_favorites(&store, &user.id).unwrap();
    assert_eq!(favorites.places.len(), 1);
    assert!(favorites.routes.is_empty());

    public::remove_favorite(&store, &user.id, FavoriteKind::Place, &place.id).unwrap();
    let favorites = public::list_favorites(&store, &user.id).unwrap();
    assert!(favorites.places.is_empty());
}

#[test]
fn favorite_of_missing_place_is_not_found() {
    let (_dir, store) = open_store();
    let user = make_user(&store, &new_id(), Role::User);
    let err =
        public::add_favorite(&store, &user.id, FavoriteKind::Place, &"0".repeat(32)).unwrap_err();
    assert!(matches!(err, crate::error::ApiError::NotFound(_)));
}

#[test]
fn pagination_reports_totals() {
    let (_dir, store) = open_store();
    for i in 0..5 {
        make_place(&store, &format!("Место {i}"));
    }
    let page = places::list_places(
        &store,
        &places::PlaceListQuery {
            page: Some(2),
            limit: Some(2),
            ..places::PlaceListQuery::default()
        },
        false,
    )
    .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.pages, 3);
}

#[test]
fn site_section_merges_over_defaults() {
    let (_dir, store) = open_store();
    let merged = site::update_site_section(
        &store,
        "region",
        json!({"tagline": "Новый слоган"}),
    )
    .unwrap();
    assert_eq!(merged["tagline"], "Новый слоган");
    // Defaults survive a partial save.
    assert_eq!(merged["name"], "Карачаево-Черкесия");

    let err = site::update_site_section(&store, "region", json!([1, 2])).unwrap_err();
    assert!(matches!(err, crate::error::ApiError::Validation(_)));
    let err = site::get_site_section(&store, "unknown").unwrap_err();
    assert!(matches!(err, crate::error::ApiError::NotFound(_)));
}

#[test]
fn stats_count_collections_and_pending_reviews() {
    let (_dir, store) = open_store();
    let place = make_place(&store, "Клухор");
    reviews::create_review(
        &store,
        reviews::ReviewInput {
            entity_type: ReviewEntity::Place,
            entity_id: place.id.clone(),
            author_name: "Гость".to_owned(),
            author_avatar: None,
            rating: 4,
            text: "Хорошо".to_owned(),
            user_id: None,
        },
    )
    .unwrap();
    public::track_view(&store, ViewTarget::Place, &place.id, "v1");

    let stats = stats::collect_stats(&store).unwrap();
    assert_eq!(stats.places, 1);
    assert_eq!(stats.pending_reviews, 1);
    assert_eq!(stats.total_views, 1);
}

#[test]
fn huge_page_numbers_return_an_empty_page() {
    let (_dir, store) = open_store();
    make_place(&store, "Архыз");

    // page * limit must not wrap even at the u32 ceiling.
    let page = places::list_places(
        &store,
        &places::PlaceListQuery {
            page: Some(u32::MAX),
            limit: Some(100),
            ..places::PlaceListQuery::default()
        },
        false,
    )
    .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.page, u32::MAX);
}

#[test]
fn renaming_regenerates_the_slug() {
    let (_dir, store) = open_store();
    let place = make_place(&store, "Домбай");
    assert!(place.slug.starts_with("dombay-"));

    // An update that leaves the title alone keeps the slug.
    let same = places::update_place(
        &store,
        &place.id,
        places::PlaceInput {
            location: Some("Карачаевский район".to_owned()),
            ..places::PlaceInput::default()
        },
    )
    .unwrap();
    assert_eq!(same.slug, place.slug);

    let renamed = places::update_place(
        &store,
        &place.id,
        places::PlaceInput {
            title: Some("Архыз".to_owned()),
            ..places::PlaceInput::default()
        },
    )
    .unwrap();
    assert!(renamed.slug.starts_with("arhyz-"));
    assert_ne!(renamed.slug, place.slug);
}

#[test]
fn reassigning_guides_moves_only_the_changed_links() {
    let (_dir, store) = open_store();
    let g1 = make_guide(&store, "Иван");
    let g2 = make_guide(&store, "Мария");
    let g3 = make_guide(&store, "Олег");

    let route = routes::create_route(
        &store,
        routes::RouteInput {
            title: Some("Мухинское ущелье".to_owned()),
            guide_ids: Some(vec![g1.id.clone(), g2.id.clone()]),
            ..routes::RouteInput::default()
        },
    )
    .unwrap();

    routes::update_route(
        &store,
        &route.id,
        routes::RouteInput {
            guide_ids: Some(vec![g2.id.clone(), g3.id.clone()]),
            ..routes::RouteInput::default()
        },
    )
    .unwrap();

    let g1_after: Service = store.get(&g1.id).unwrap().unwrap();
    let g2_after: Service = store.get(&g2.id).unwrap().unwrap();
    let g3_after: Service = store.get(&g3.id).unwrap().unwrap();
    assert!(g1_after.route_ids.is_empty());
    assert_eq!(g2_after.route_ids, vec![route.id.clone()]);
    assert_eq!(g3_after.route_ids, vec![route.id.clone()]);
}
