mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn company_crud_round_trip() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.login().await?;

    let (status, created) = app
        .post(
            "/api/companies",
            &token,
            json!({ "name": "Acme", "domain": "acme.test", "description": "Anvils", "website": "https://acme.test" }),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["domain"], "acme.test");
    assert_eq!(created["description"], "Anvils");
    let uri = format!("/api/companies/{}", created["id"]);

    let (status, fetched) = app.get(&uri, &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    // full replace: omitted optional fields are cleared
    let (status, updated) = app.put(&uri, &token, json!({ "name": "Acme Corp" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Acme Corp");
    assert_eq!(updated["domain"], serde_json::Value::Null);
    assert_eq!(updated["id"], created["id"]);

    let (status, _) = app.delete(&uri, &token).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, value) = app.get(&uri, &token).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "error": "Company not found" }));
    Ok(())
}

#[tokio::test]
async fn name_is_required() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.login().await?;

    let (status, value) = app.post("/api/companies", &token, json!({ "domain": "x.test" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({ "error": "name is required" }));

    let (status, _) = app.put("/api/companies/1", &token, json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn deleting_company_clears_lead_reference() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.login().await?;
    let company_id = app.company(&token, "Initech").await?;
    let lead = app.lead(&token, "Peter", Some(company_id), "contacted").await?;

    let (status, _) = app.delete(&format!("/api/companies/{}", company_id), &token).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, survivor) = app.get(&format!("/api/leads/{}", lead["id"]), &token).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(survivor["name"], "Peter");
    assert_eq!(survivor["company_id"], serde_json::Value::Null);
    assert_eq!(survivor["company"], serde_json::Value::Null);
    Ok(())
}

#[tokio::test]
async fn update_of_missing_company_is_404() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.login().await?;

    let (status, value) = app.put("/api/companies/31337", &token, json!({ "name": "Nobody" })).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value, json!({ "error": "Company not found" }));

    let (status, value) = app.get("/api/companies/x1", &token).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value, json!({ "error": "Invalid company id" }));
    Ok(())
}
