mod common;

use serde_json::json;

#[tokio::test]
async fn registering_same_name_twice_keeps_one_student() {
    let server = common::start("catchupd-students-dup").await;

    for _ in 0..2 {
        let resp = server.post_json("/students", json!({ "name": "Ana" })).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.json(), json!({ "message": "Student added" }));
    }
    server.post_json("/students", json!({ "name": "Bo" })).await;

    let listed = server.get("/students").await;
    assert_eq!(listed.status, 200);
    let students = listed.json();
    let names: Vec<_> = students
        .as_array()
        .expect("student array")
        .iter()
        .map(|s| s["name"].as_str().expect("name").to_string())
        .collect();
    assert_eq!(names, vec!["Ana", "Bo"]);
    assert!(students[0]["id"].as_i64().is_some());
}

#[tokio::test]
async fn missing_name_is_rejected() {
    let server = common::start("catchupd-students-missing").await;
    let resp = server.post_json("/students", json!({})).await;
    assert!(resp.status >= 400 && resp.status < 500, "status {}", resp.status);
    assert!(server.store.list_students().expect("list").is_empty());
}

#[tokio::test]
async fn dashboard_and_health_are_served() {
    let server = common::start("catchupd-dashboard").await;

    let page = server.get("/").await;
    assert_eq!(page.status, 200);
    assert!(page
        .header("content-type")
        .unwrap_or_default()
        .starts_with("text/html"));
    assert!(page.body.contains("Catch-up Tracker"));
    assert!(!page.body.contains("{{CURRENT_MONTH}}"));

    let health = server.get("/health").await;
    assert_eq!(health.status, 200);
    assert_eq!(health.json()["version"], env!("CARGO_PKG_VERSION"));
}
