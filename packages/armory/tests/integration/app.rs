use crate::common::{TestApp, routes};

#[tokio::test]
async fn root_serves_welcome_banner() {
    let app = TestApp::spawn().await;

    let res = app.get("/").await;

    assert_eq!(res.status, 200);
    assert!(res.text.contains("Welcome"));
}

#[tokio::test]
async fn openapi_document_lists_catalog_paths() {
    let app = TestApp::spawn().await;

    let res = app.get("/api-docs/openapi.json").await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().expect("paths object");
    assert!(paths.keys().any(|p| p.starts_with("/api/swords")));
    assert!(paths.contains_key("/api/swords/search"));
    assert!(paths.keys().any(|p| p.starts_with("/api/origins")));
}

#[tokio::test]
async fn sample_catalog_seeds_once() {
    let app = TestApp::spawn().await;

    armory::seed::seed_sample_catalog(&app.db)
        .await
        .expect("seeding failed");
    armory::seed::seed_sample_catalog(&app.db)
        .await
        .expect("second seeding failed");

    assert_eq!(app.get(routes::CATEGORIES).await.ids().len(), 5);
    assert_eq!(app.get(routes::MATERIALS).await.ids().len(), 6);
    assert_eq!(app.get(routes::ORIGINS).await.ids().len(), 5);

    let res = app
        .get(&format!("{}?details=true", routes::SWORDS))
        .await;
    let swords = res.body.as_array().expect("array");
    assert_eq!(swords.len(), 3);

    let katana = swords
        .iter()
        .find(|s| s["name"] == "Bushido Katana")
        .expect("katana seeded");
    assert_eq!(katana["category_name"], "Katana");
    assert_eq!(katana["origin_name"], "Japanese");
    let materials: Vec<&str> = katana["materials"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(materials, vec!["Folded Steel", "Tamahagane"]);
}
