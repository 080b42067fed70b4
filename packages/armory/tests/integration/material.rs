use serde_json::json;

use crate::common::{ADMIN_PASSWORD, TestApp, routes};

#[tokio::test]
async fn crud_round_trip() {
    let app = TestApp::spawn().await;

    let res = app
        .post(
            routes::MATERIALS,
            &json!({
                "name": "Damascus Steel",
                "description": "Pattern welded",
                "adminPassword": ADMIN_PASSWORD,
            }),
        )
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    let id = res.id();

    let res = app.get(&routes::material(id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["description"], "Pattern welded");
    assert_eq!(res.body["swordCount"], 0);

    let res = app
        .put(
            &routes::material(id),
            &json!({ "name": "Wootz Steel", "adminPassword": ADMIN_PASSWORD }),
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "Wootz Steel");
    assert!(res.body["description"].is_null());

    let res = app.admin_delete(&routes::material(id)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["message"], "Material deleted successfully");
    assert_eq!(app.get(&routes::material(id)).await.status, 404);
}

#[tokio::test]
async fn delete_is_refused_while_in_use() {
    let app = TestApp::spawn().await;
    let category_id = app.create_category("Katana").await;
    let steel = app.create_material("Steel").await;
    let sword_id = app
        .create_sword(json!({
            "name": "User",
            "category_id": category_id,
            "material_ids": [steel],
        }))
        .await;

    let res = app.get(&routes::material(steel)).await;
    assert_eq!(res.body["swordCount"], 1);

    let res = app.admin_delete(&routes::material(steel)).await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "CONFLICT");
    assert_eq!(
        res.body["message"],
        "Cannot delete material that is used in existing swords"
    );

    app.put(
        &routes::sword(sword_id),
        &json!({ "material_ids": [], "adminPassword": ADMIN_PASSWORD }),
    )
    .await;

    let res = app.admin_delete(&routes::material(steel)).await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn delete_requires_admin_password() {
    let app = TestApp::spawn().await;
    let id = app.create_material("Bronze").await;

    let res = app.delete_without_body(&routes::material(id)).await;
    assert_eq!(res.status, 403);

    assert_eq!(app.get(&routes::material(id)).await.status, 200);
}
