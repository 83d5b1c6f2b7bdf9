mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_then_get_returns_submitted_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = common::create(&server, &common::student_payload("S100")).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Student created successfully");
    assert_eq!(body["data"]["student_id"], "S100");
    assert_eq!(body["data"]["email"], Value::Null);
    assert_eq!(body["data"]["address"], Value::Null);

    let res = server.client.get(server.url("/api/students/S100")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body["data"],
        json!({
            "student_id": "S100",
            "name": "Asha Rao",
            "date_of_birth": "2010-04-12",
            "guardian_name": "Meera Rao",
            "ph_no": 9876543210u64,
            "email": null,
            "address": null
        })
    );

    Ok(())
}

#[tokio::test]
async fn create_keeps_optional_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut payload = common::student_payload("S101");
    payload["email"] = json!("asha@example.com");
    payload["address"] = json!("12 MG Road, Pune");
    let res = common::create(&server, &payload).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = server
        .client
        .get(server.url("/api/students/S101"))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(body["data"]["email"], "asha@example.com");
    assert_eq!(body["data"]["address"], "12 MG Road, Pune");

    Ok(())
}

#[tokio::test]
async fn duplicate_student_id_conflicts() -> Result<()> {
    let server = common::spawn_server().await?;

    let first = common::create(&server, &common::student_payload("S102")).await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = common::create(&server, &common::student_payload("S102")).await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(second.json::<Value>().await?, json!({ "error": "Student ID already exists" }));
    assert_eq!(server.store.len(), 1);

    Ok(())
}

#[tokio::test]
async fn missing_guardian_name_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut payload = common::student_payload("S103");
    payload.as_object_mut().unwrap().remove("guardian_name");
    let res = common::create(&server, &payload).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "All fields are required" }));
    assert!(server.store.is_empty());

    Ok(())
}

#[tokio::test]
async fn zero_phone_number_is_treated_as_missing() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut payload = common::student_payload("S104");
    payload["ph_no"] = json!(0);
    let res = common::create(&server, &payload).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "All fields are required");

    Ok(())
}

#[tokio::test]
async fn string_phone_number_is_invalid_type() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut payload = common::student_payload("S105");
    payload["ph_no"] = json!("123");
    let res = common::create(&server, &payload).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid data types" }));
    assert!(server.store.is_empty());

    Ok(())
}

#[tokio::test]
async fn non_string_email_is_invalid_type() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut payload = common::student_payload("S106");
    payload["email"] = json!(42);
    let res = common::create(&server, &payload).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "Invalid data types");

    Ok(())
}

#[tokio::test]
async fn malformed_body_is_bad_request() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/students"))
        .header("content-type", "application/json")
        .body("{\"student_id\": ")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid JSON body" }));

    Ok(())
}

#[tokio::test]
async fn non_object_body_reports_missing_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = common::create(&server, &json!(["S107"])).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "All fields are required");

    Ok(())
}

#[tokio::test]
async fn fractional_and_large_phone_numbers_are_accepted() -> Result<()> {
    let server = common::spawn_server().await?;

    for (id, ph_no) in [("S108", json!(12.5)), ("S109", json!(18446744073709551615u64))] {
        let mut payload = common::student_payload(id);
        payload["ph_no"] = ph_no.clone();
        let res = common::create(&server, &payload).await?;
        assert_eq!(res.status(), StatusCode::CREATED, "ph_no {} rejected", ph_no);

        let body = server
            .client
            .get(server.url(&format!("/api/students/{}", id)))
            .send()
            .await?
            .json::<Value>()
            .await?;
        assert_eq!(body["data"]["ph_no"], ph_no);
    }
    assert_eq!(server.store.len(), 2);

    Ok(())
}

#[tokio::test]
async fn body_without_json_content_type_reports_missing_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/students"))
        .header("content-type", "text/plain")
        .body(common::student_payload("S110").to_string())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "All fields are required" }));
    assert!(server.store.is_empty());

    Ok(())
}

#[tokio::test]
async fn form_body_fails_type_check() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/students"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("student_id=S111&name=Asha&date_of_birth=2010-04-12&guardian_name=Meera&ph_no=123")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({ "error": "Invalid data types" }));

    Ok(())
}
