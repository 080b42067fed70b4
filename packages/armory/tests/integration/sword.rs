use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;

use armory::entity::{sword, sword_material};
use armory::repository::sword::ENRICH_CHUNK;

use crate::common::{ADMIN_PASSWORD, TestApp, routes};

async fn material_ids_of(app: &TestApp, sword_id: i32) -> Vec<i32> {
    let mut ids: Vec<i32> = sword_material::Entity::find()
        .filter(sword_material::Column::SwordId.eq(sword_id))
        .all(&app.db)
        .await
        .expect("DB query failed")
        .into_iter()
        .map(|row| row.material_id)
        .collect();
    ids.sort_unstable();
    ids
}

mod sword_creation {
    use super::*;

    #[tokio::test]
    async fn applies_defaults_for_omitted_fields() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;

        let res = app
            .post(
                routes::SWORDS,
                &json!({ "name": "Test", "category_id": category_id }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["name"], "Test");
        assert_eq!(res.body["category_id"], category_id);
        assert_eq!(res.body["in_stock"], 0);
        assert_eq!(res.body["is_battle_ready"], false);
        assert!(res.body["origin_id"].is_null());
        assert!(res.body["price"].is_null());
        assert!(res.body["created_at"].is_string());
    }

    #[tokio::test]
    async fn does_not_require_admin_password() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;

        let res = app
            .post(
                routes::SWORDS,
                &json!({ "name": "Open", "category_id": category_id, "adminPassword": "wrong" }),
            )
            .await;

        assert_eq!(res.status, 201);
    }

    #[tokio::test]
    async fn requires_name_and_category() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;

        let res = app.post(routes::SWORDS, &json!({ "name": "Test" })).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Name and category are required");

        let res = app
            .post(routes::SWORDS, &json!({ "category_id": category_id }))
            .await;
        assert_eq!(res.status, 400);

        let count = sword::Entity::find().count(&app.db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn stores_distinct_material_associations() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let steel = app.create_material("Steel").await;
        let bronze = app.create_material("Bronze").await;

        let id = app
            .create_sword(json!({
                "name": "Mixed",
                "category_id": category_id,
                "material_ids": [steel, bronze, steel],
            }))
            .await;

        let mut expected = vec![steel, bronze];
        expected.sort_unstable();
        assert_eq!(material_ids_of(&app, id).await, expected);
    }

    #[tokio::test]
    async fn invalid_material_id_rolls_back_everything() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let steel = app.create_material("Steel").await;

        let res = app
            .post(
                routes::SWORDS,
                &json!({
                    "name": "Broken",
                    "category_id": category_id,
                    "material_ids": [steel, 9999],
                }),
            )
            .await;

        assert_eq!(res.status, 500, "{}", res.text);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        assert_eq!(sword::Entity::find().count(&app.db).await.unwrap(), 0);
        assert_eq!(
            sword_material::Entity::find().count(&app.db).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app.post_raw(routes::SWORDS, "{\"name\": ").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod sword_reads {
    use super::*;

    #[tokio::test]
    async fn get_returns_enriched_aggregate() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let origin_id = app.create_origin("Japanese").await;
        let tamahagane = app.create_material("Tamahagane").await;
        let folded = app.create_material("Folded Steel").await;

        let id = app
            .create_sword(json!({
                "name": "Bushido Katana",
                "category_id": category_id,
                "origin_id": origin_id,
                "length": 73.5,
                "price": 899.99,
                "material_ids": [tamahagane, folded],
            }))
            .await;

        let res = app.get(&routes::sword(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["name"], "Bushido Katana");
        assert_eq!(res.body["category_name"], "Katana");
        assert_eq!(res.body["origin_name"], "Japanese");
        assert_eq!(res.body["length"], 73.5);

        let materials = res.body["materials"].as_array().unwrap();
        let names: Vec<&str> = materials
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Folded Steel", "Tamahagane"]);
    }

    #[tokio::test]
    async fn get_is_idempotent() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let material_id = app.create_material("Steel").await;
        let id = app
            .create_sword(json!({
                "name": "Stable",
                "category_id": category_id,
                "material_ids": [material_id],
            }))
            .await;

        let first = app.get(&routes::sword(id)).await;
        let second = app.get(&routes::sword(id)).await;

        assert_eq!(first.status, 200);
        assert_eq!(first.body, second.body);
    }

    #[tokio::test]
    async fn missing_sword_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::sword(424242)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(res.body["message"], "Sword not found");
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get("/api/swords/abc").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn list_is_ordered_by_name_and_optionally_detailed() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Longsword").await;
        let steel = app.create_material("Steel").await;
        let zweihander = app
            .create_sword(json!({ "name": "Zweihander", "category_id": category_id }))
            .await;
        let arming = app
            .create_sword(json!({
                "name": "Arming Sword",
                "category_id": category_id,
                "material_ids": [steel],
            }))
            .await;

        let res = app.get(routes::SWORDS).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![arming, zweihander]);
        assert!(res.body[0].get("category_name").is_none());

        let res = app.get(&format!("{}?details=true", routes::SWORDS)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![arming, zweihander]);
        assert_eq!(res.body[0]["category_name"], "Longsword");
        assert_eq!(res.body[0]["materials"][0]["name"], "Steel");
        assert!(res.body[1]["origin_name"].is_null());
        assert_eq!(res.body[1]["materials"], json!([]));
    }

    #[tokio::test]
    async fn search_matches_case_insensitive_substring() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let katana = app
            .create_sword(json!({ "name": "Bushido Katana", "category_id": category_id }))
            .await;
        app.create_sword(json!({ "name": "Duelist Rapier", "category_id": category_id }))
            .await;
        let percent = app
            .create_sword(json!({ "name": "100% Steel", "category_id": category_id }))
            .await;

        let res = app
            .get(&format!("{}?term=KATA", routes::SWORDS_SEARCH))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![katana]);

        let res = app
            .get(&format!("{}?term=%25", routes::SWORDS_SEARCH))
            .await;
        assert_eq!(res.ids(), vec![percent]);
    }

    #[tokio::test]
    async fn search_matches_non_ascii_names_typed_as_stored() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Rapier").await;
        let epee = app
            .create_sword(json!({ "name": "Épée de Combat", "category_id": category_id }))
            .await;

        let res = app
            .get(&format!("{}?term=%C3%89p%C3%A9e", routes::SWORDS_SEARCH))
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![epee]);

        let res = app
            .get(&format!("{}?term=COMBAT", routes::SWORDS_SEARCH))
            .await;
        assert_eq!(res.ids(), vec![epee]);
    }

    #[tokio::test]
    async fn detailed_list_spans_more_than_one_enrichment_chunk() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let steel = app.create_material("Steel").await;

        let now = chrono::Utc::now();
        let total = ENRICH_CHUNK + 3;
        let rows = (0..total).map(|i| sword::ActiveModel {
            name: Set(format!("Blade {i:04}")),
            category_id: Set(category_id),
            is_battle_ready: Set(false),
            in_stock: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        });
        sword::Entity::insert_many(rows)
            .exec_without_returning(&app.db)
            .await
            .expect("bulk insert swords");

        let last = sword::Entity::find()
            .filter(sword::Column::Name.eq(format!("Blade {:04}", total - 1)))
            .one(&app.db)
            .await
            .unwrap()
            .expect("last sword");
        sword_material::Entity::insert(sword_material::ActiveModel {
            sword_id: Set(last.id),
            material_id: Set(steel),
        })
        .exec_without_returning(&app.db)
        .await
        .expect("link material");

        let res = app.get(&format!("{}?details=true", routes::SWORDS)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let swords = res.body.as_array().unwrap();
        assert_eq!(swords.len(), total);
        assert!(swords.iter().all(|s| s["category_name"] == "Katana"));
        assert_eq!(swords[total - 1]["id"], last.id);
        assert_eq!(swords[total - 1]["materials"][0]["name"], "Steel");
        assert_eq!(swords[0]["materials"], json!([]));
    }

    #[tokio::test]
    async fn search_requires_term() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::SWORDS_SEARCH).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Search term is required");

        let res = app
            .get(&format!("{}?term=%20%20", routes::SWORDS_SEARCH))
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn filters_by_category_and_material() {
        let app = TestApp::spawn().await;
        let katana = app.create_category("Katana").await;
        let rapier = app.create_category("Rapier").await;
        let steel = app.create_material("Steel").await;
        let bronze = app.create_material("Bronze").await;

        let a = app
            .create_sword(json!({ "name": "A", "category_id": katana, "material_ids": [steel] }))
            .await;
        let b = app
            .create_sword(json!({
                "name": "B",
                "category_id": rapier,
                "material_ids": [steel, bronze],
            }))
            .await;

        assert_eq!(app.get(&routes::swords_by_category(katana)).await.ids(), vec![a]);
        assert_eq!(app.get(&routes::swords_by_category(rapier)).await.ids(), vec![b]);
        assert_eq!(app.get(&routes::swords_by_material(steel)).await.ids(), vec![a, b]);
        assert_eq!(app.get(&routes::swords_by_material(bronze)).await.ids(), vec![b]);
        assert!(app.get(&routes::swords_by_material(9999)).await.ids().is_empty());
    }
}

mod sword_update {
    use super::*;

    #[tokio::test]
    async fn partial_update_touches_only_given_fields() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let origin_id = app.create_origin("Japanese").await;
        let id = app
            .create_sword(json!({
                "name": "Bushido Katana",
                "category_id": category_id,
                "origin_id": origin_id,
                "length": 73.5,
                "weight": 1.2,
                "is_battle_ready": true,
                "in_stock": 5,
                "price": 899.99,
                "description": "Hand-forged",
            }))
            .await;
        let before = app.get(&routes::sword(id)).await.body;

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let res = app
            .put(
                &routes::sword(id),
                &json!({ "price": 950.0, "adminPassword": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["price"], 950.0);

        let after = app.get(&routes::sword(id)).await.body;
        let before_map = before.as_object().unwrap();
        let after_map = after.as_object().unwrap();
        for (key, value) in before_map {
            if key == "price" || key == "updated_at" {
                continue;
            }
            assert_eq!(&after_map[key], value, "field {key} changed");
        }

        let before_ts: chrono::DateTime<chrono::Utc> =
            before["updated_at"].as_str().unwrap().parse().unwrap();
        let after_ts: chrono::DateTime<chrono::Utc> =
            after["updated_at"].as_str().unwrap().parse().unwrap();
        assert!(after_ts > before_ts);
    }

    #[tokio::test]
    async fn explicit_null_clears_nullable_field() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let origin_id = app.create_origin("Japanese").await;
        let id = app
            .create_sword(json!({
                "name": "Clearable",
                "category_id": category_id,
                "origin_id": origin_id,
                "price": 10.0,
            }))
            .await;

        let res = app
            .put(
                &routes::sword(id),
                &json!({ "origin_id": null, "adminPassword": ADMIN_PASSWORD }),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["origin_id"].is_null());
        assert_eq!(res.body["price"], 10.0);
    }

    #[tokio::test]
    async fn material_ids_replace_clear_or_keep_associations() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let steel = app.create_material("Steel").await;
        let bronze = app.create_material("Bronze").await;
        let carbon = app.create_material("Carbon Steel").await;
        let id = app
            .create_sword(json!({
                "name": "Replaceable",
                "category_id": category_id,
                "material_ids": [steel, bronze],
            }))
            .await;

        // Absent: untouched.
        let res = app
            .put(
                &routes::sword(id),
                &json!({ "in_stock": 4, "adminPassword": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(res.status, 200);
        let mut expected = vec![steel, bronze];
        expected.sort_unstable();
        assert_eq!(material_ids_of(&app, id).await, expected);

        // New set: exactly that set, duplicates dropped.
        let res = app
            .put(
                &routes::sword(id),
                &json!({ "material_ids": [carbon, carbon, steel], "adminPassword": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(res.status, 200);
        let mut expected = vec![carbon, steel];
        expected.sort_unstable();
        assert_eq!(material_ids_of(&app, id).await, expected);

        // Empty: cleared.
        let res = app
            .put(
                &routes::sword(id),
                &json!({ "material_ids": [], "adminPassword": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(res.status, 200);
        assert!(material_ids_of(&app, id).await.is_empty());
    }

    #[tokio::test]
    async fn failed_material_replace_keeps_previous_state() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let steel = app.create_material("Steel").await;
        let id = app
            .create_sword(json!({
                "name": "Original",
                "category_id": category_id,
                "material_ids": [steel],
            }))
            .await;

        let res = app
            .put(
                &routes::sword(id),
                &json!({
                    "name": "Renamed",
                    "material_ids": [9999],
                    "adminPassword": ADMIN_PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, 500);

        let current = app.get(&routes::sword(id)).await;
        assert_eq!(current.body["name"], "Original");
        assert_eq!(material_ids_of(&app, id).await, vec![steel]);
    }

    #[tokio::test]
    async fn update_of_missing_sword_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .put(
                &routes::sword(9999),
                &json!({ "price": 1.0, "adminPassword": ADMIN_PASSWORD }),
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn update_requires_admin_password() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let id = app
            .create_sword(json!({ "name": "Guarded", "category_id": category_id, "price": 5.0 }))
            .await;

        let res = app.put(&routes::sword(id), &json!({ "price": 1.0 })).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "ADMIN_PASSWORD_REQUIRED");

        let res = app
            .put(
                &routes::sword(id),
                &json!({ "price": 1.0, "adminPassword": "nope" }),
            )
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "INVALID_ADMIN_PASSWORD");

        let current = app.get(&routes::sword(id)).await;
        assert_eq!(current.body["price"], 5.0);
    }

    #[tokio::test]
    async fn invalid_id_is_rejected_before_the_gate() {
        let app = TestApp::spawn().await;

        let res = app.put("/api/swords/abc", &json!({ "price": 1.0 })).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod sword_deletion {
    use super::*;

    #[tokio::test]
    async fn delete_removes_sword_and_associations() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let steel = app.create_material("Steel").await;
        let id = app
            .create_sword(json!({
                "name": "Doomed",
                "category_id": category_id,
                "material_ids": [steel],
            }))
            .await;

        let res = app.admin_delete(&routes::sword(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Sword deleted successfully");

        assert_eq!(app.get(&routes::sword(id)).await.status, 404);
        assert_eq!(
            sword_material::Entity::find().count(&app.db).await.unwrap(),
            0
        );

        let res = app.admin_delete(&routes::sword(id)).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn delete_without_password_touches_nothing() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("Katana").await;
        let id = app
            .create_sword(json!({ "name": "Kept", "category_id": category_id }))
            .await;

        let res = app.delete_without_body(&routes::sword(id)).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "ADMIN_PASSWORD_REQUIRED");

        let res = app
            .delete(&routes::sword(id), &json!({ "adminPassword": "wrong" }))
            .await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "INVALID_ADMIN_PASSWORD");

        assert_eq!(app.get(&routes::sword(id)).await.status, 200);
    }
}
