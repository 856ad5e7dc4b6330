// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use crate::error::ApiError;
use crate::model::{Place, Route};
use crate::store::FolderStore;

use super::*;

fn open_store() -> (TempDir, FolderStore) {
    let dir = TempDir::new().unwrap();
    let store = FolderStore::open(dir.path()).unwrap();
    (dir, store)
}

fn place(id: &str, directions: &[&str]) -> Place {
    let mut place = Place::new(id.to_owned(), format!("Место {id}"), format!("mesto-{id}"));
    place.directions = directions.iter().map(|d| (*d).to_owned()).collect();
    place
}

fn route(id: &str, season: Option<&str>) -> Route {
    let mut route = Route::new(id.to_owned(), format!("Маршрут {id}"), format!("marshrut-{id}"));
    route.season = season.map(str::to_owned);
    route
}

#[test]
fn config_is_created_with_defaults_on_first_read() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let config = service.get_config().unwrap();
    assert_eq!(
        config.fixed_groups["directions"],
        vec!["Архыз", "Домбай", "Джылы-Суу", "Медовые водопады"]
    );
    assert!(config.extra_groups.is_empty());

    // The lazy read persisted the document.
    assert_eq!(store.count::<FilterConfig>().unwrap(), 1);
}

#[test]
fn families_do_not_share_configs() {
    let (_dir, store) = open_store();
    FilterService::new(&store, FilterFamily::Places)
        .get_config()
        .unwrap();
    let routes = FilterService::new(&store, FilterFamily::Routes)
        .get_config()
        .unwrap();

    assert!(routes.fixed_groups.contains_key("transport"));
    assert!(!routes.fixed_groups.contains_key("directions"));
    assert_eq!(store.count::<FilterConfig>().unwrap(), 2);
}

#[test]
fn add_extra_group_derives_key_from_label() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let config = service
        .add_extra_group(AddGroupInput {
            label: Some("Тип отдыха".to_owned()),
            values: Some(vec![json!("активный"), json!(42), json!("  ")]),
            ..AddGroupInput::default()
        })
        .unwrap();

    let group = config.extra_group("tip_otdyha").unwrap();
    assert_eq!(group.label, "Тип отдыха");
    assert_eq!(group.values, vec!["активный"]);
    assert_eq!(group.icon_type, IconType::Library);
}

#[test]
fn add_extra_group_rejects_fixed_key_collision() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let err = service
        .add_extra_group(AddGroupInput {
            label: Some("Сезоны".to_owned()),
            key: Some("seasons".to_owned()),
            ..AddGroupInput::default()
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[test]
fn add_extra_group_rejects_duplicate_key() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let input = || AddGroupInput {
        label: Some("Тип отдыха".to_owned()),
        ..AddGroupInput::default()
    };
    service.add_extra_group(input()).unwrap();
    let err = service.add_extra_group(input()).unwrap_err();
    assert!(matches!(err, ApiError::Conflict(_)));
}

#[rstest]
#[case(None, IconType::Library)]
#[case(Some("https://cdn.example/icon.svg"), IconType::Upload)]
#[case(Some("/uploads/icon.png"), IconType::Upload)]
#[case(Some("mountain"), IconType::Library)]
fn icon_type_is_inferred_from_icon_shape(
    #[case] icon: Option<&str>,
    #[case] expected: IconType,
) {
    assert_eq!(infer_icon_type(icon), expected);
}

#[test]
fn replace_value_renames_in_config_and_cascades_into_places() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);
    service.get_config().unwrap();

    store.put(&place("a", &["Архыз"])).unwrap();
    store.put(&place("b", &["Архыз", "Домбай"])).unwrap();
    store.put(&place("c", &["Домбай"])).unwrap();

    let config = service
        .replace_value(ReplaceValueInput {
            group: "directions".to_owned(),
            old_value: "Архыз".to_owned(),
            new_value: "Архыз (новый)".to_owned(),
        })
        .unwrap();

    // Position in the list is preserved.
    assert_eq!(config.fixed_groups["directions"][0], "Архыз (новый)");

    let a: Place = store.get("a").unwrap().unwrap();
    let b: Place = store.get("b").unwrap().unwrap();
    let c: Place = store.get("c").unwrap().unwrap();
    assert_eq!(a.directions, vec!["Архыз (новый)"]);
    assert_eq!(b.directions, vec!["Архыз (новый)", "Домбай"]);
    assert_eq!(c.directions, vec!["Домбай"]);
}

#[test]
fn replace_value_is_idempotent_for_records() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);
    service.get_config().unwrap();
    store.put(&place("a", &["зима"])).unwrap();

    service
        .replace_value(ReplaceValueInput {
            group: "seasons".to_owned(),
            old_value: "зима".to_owned(),
            new_value: "высокий сезон".to_owned(),
        })
        .unwrap();
    let first: Place = store.get("a").unwrap().unwrap();

    // The renamed value is no longer in the config, so a second identical
    // request fails fast without touching records.
    let err = service
        .replace_value(ReplaceValueInput {
            group: "seasons".to_owned(),
            old_value: "зима".to_owned(),
            new_value: "высокий сезон".to_owned(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let second: Place = store.get("a").unwrap().unwrap();
    assert_eq!(first.updated_at, second.updated_at);
}

#[test]
fn replace_value_on_route_scalar_matches_and_sets() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Routes);
    service.get_config().unwrap();

    store.put(&route("r1", Some("Зима"))).unwrap();
    store.put(&route("r2", Some("Лето"))).unwrap();

    service
        .replace_value(ReplaceValueInput {
            group: "seasons".to_owned(),
            old_value: "Зима".to_owned(),
            new_value: "Межсезонье".to_owned(),
        })
        .unwrap();

    let r1: Route = store.get("r1").unwrap().unwrap();
    let r2: Route = store.get("r2").unwrap().unwrap();
    assert_eq!(r1.season.as_deref(), Some("Межсезонье"));
    assert_eq!(r2.season.as_deref(), Some("Лето"));
}

#[test]
fn remove_value_on_route_scalar_clears_the_field() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Routes);
    service.get_config().unwrap();
    store.put(&route("r1", Some("Осень"))).unwrap();

    service
        .remove_value(RemoveValueInput {
            group: "seasons".to_owned(),
            value: "Осень".to_owned(),
        })
        .unwrap();

    let r1: Route = store.get("r1").unwrap().unwrap();
    assert_eq!(r1.season, None);
}

#[test]
fn remove_value_tolerates_missing_fixed_value() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    // Not listed in the config: the removal silently converges.
    let config = service
        .remove_value(RemoveValueInput {
            group: "directions".to_owned(),
            value: "Эльбрус".to_owned(),
        })
        .unwrap();
    assert_eq!(config.fixed_groups["directions"].len(), 4);
}

#[test]
fn remove_value_requires_extra_group_to_exist() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let err = service
        .remove_value(RemoveValueInput {
            group: "net_takoy".to_owned(),
            value: "x".to_owned(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn remove_value_drops_emptied_custom_key_from_records() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);
    service
        .add_extra_group(AddGroupInput {
            label: Some("Тип отдыха".to_owned()),
            values: Some(vec![json!("активный"), json!("спокойный")]),
            ..AddGroupInput::default()
        })
        .unwrap();

    let mut tagged = place("a", &[]);
    tagged
        .custom_filters
        .insert("tip_otdyha".to_owned(), vec!["активный".to_owned()]);
    store.put(&tagged).unwrap();
    let mut both = place("b", &[]);
    both.custom_filters.insert(
        "tip_otdyha".to_owned(),
        vec!["активный".to_owned(), "спокойный".to_owned()],
    );
    store.put(&both).unwrap();

    service
        .remove_value(RemoveValueInput {
            group: "tip_otdyha".to_owned(),
            value: "активный".to_owned(),
        })
        .unwrap();

    let a: Place = store.get("a").unwrap().unwrap();
    let b: Place = store.get("b").unwrap().unwrap();
    assert!(!a.custom_filters.contains_key("tip_otdyha"));
    assert_eq!(b.custom_filters["tip_otdyha"], vec!["спокойный"]);
}

#[test]
fn remove_fixed_group_hides_without_touching_records() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);
    service.get_config().unwrap();
    store.put(&place("a", &["Архыз"])).unwrap();

    let config = service.remove_group("directions").unwrap();
    assert!(config.hidden_fixed_groups.contains(&"directions".to_owned()));
    assert!(config.fixed_groups["directions"].is_empty());

    // Records keep their field values; only the config is suppressed.
    let a: Place = store.get("a").unwrap().unwrap();
    assert_eq!(a.directions, vec!["Архыз"]);
}

#[test]
fn remove_extra_group_cascades_key_deletion() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);
    service
        .add_extra_group(AddGroupInput {
            label: Some("Сложность троп".to_owned()),
            ..AddGroupInput::default()
        })
        .unwrap();

    let mut tagged = place("a", &[]);
    tagged
        .custom_filters
        .insert("slozhnost_trop".to_owned(), vec!["лёгкая".to_owned()]);
    tagged
        .custom_filters
        .insert("other".to_owned(), vec!["x".to_owned()]);
    store.put(&tagged).unwrap();

    let config = service.remove_group("slozhnost_trop").unwrap();
    assert!(config.extra_group("slozhnost_trop").is_none());

    let a: Place = store.get("a").unwrap().unwrap();
    assert!(!a.custom_filters.contains_key("slozhnost_trop"));
    assert_eq!(a.custom_filters["other"], vec!["x"]);
}

#[test]
fn update_meta_distinguishes_absent_from_null() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    service
        .update_group_meta(
            serde_json::from_value(json!({
                "key": "directions",
                "label": "Направления",
                "icon": "compass"
            }))
            .unwrap(),
        )
        .unwrap();

    // Absent label: untouched. Explicit null icon: cleared.
    let config = service
        .update_group_meta(
            serde_json::from_value(json!({
                "key": "directions",
                "icon": null
            }))
            .unwrap(),
        )
        .unwrap();

    let meta = &config.fixed_group_meta["directions"];
    assert_eq!(meta.label.as_deref(), Some("Направления"));
    assert_eq!(meta.icon, None);
}

#[test]
fn update_meta_on_unknown_extra_group_is_not_found() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let err = service
        .update_group_meta(serde_json::from_value(json!({"key": "nope", "label": "x"})).unwrap())
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn replace_config_fully_replaces_fixed_lists() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let config = service
        .replace_config(
            serde_json::from_value(json!({
                "fixedGroups": {
                    "directions": ["Архыз", 7, null, "  "],
                    "seasons": ["лето"]
                }
            }))
            .unwrap(),
        )
        .unwrap();

    assert_eq!(config.fixed_groups["directions"], vec!["Архыз"]);
    assert_eq!(config.fixed_groups["seasons"], vec!["лето"]);
    // Keys absent from the payload clear to empty.
    assert!(config.fixed_groups["objectTypes"].is_empty());
}

#[test]
fn replace_config_rejects_extra_group_shadowing_fixed_key() {
    let (_dir, store) = open_store();
    let service = FilterService::new(&store, FilterFamily::Places);

    let err = service
        .replace_config(
            serde_json::from_value(json!({
                "extraGroups": [{"key": "seasons", "label": "Сезоны"}]
            }))
            .unwrap(),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}
