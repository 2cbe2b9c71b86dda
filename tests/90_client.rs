mod common;

use anyhow::Result;

use common::TestServer;
use leadblocks_api::client::{ApiClient, ClientError, CompanyDraft, LeadDraft, ListOptions, RequestState};
use leadblocks_api::database::models::lead::LeadStatus;

#[tokio::test]
async fn client_drives_a_live_server() -> Result<()> {
    let server = TestServer::spawn().await?;
    let mut client = ApiClient::new(&server.base_url)?;

    let health = client.health().await?;
    assert_eq!(health.status, "ok");

    // protected calls fail until we log in
    let err = client.list_leads(&ListOptions::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Unauthorized");

    let login = client.login("admin@leadblocks.com", "Pass12@rd!").await?;
    assert_eq!(login.user.full_name, "Laura");
    assert_eq!(client.whoami().await?.email, "admin@leadblocks.com");

    let company = client
        .create_company(&CompanyDraft {
            name: "Acme".into(),
            domain: Some("acme.test".into()),
            ..Default::default()
        })
        .await?;

    let lead = client
        .create_lead(&LeadDraft {
            name: "Ada".into(),
            email: "ada@acme.test".into(),
            company_id: Some(company.id),
            status: Some(LeadStatus::Proposal),
        })
        .await?;
    assert_eq!(lead.company.as_ref().map(|c| c.id), Some(company.id));

    let page = client
        .list_leads(&ListOptions {
            status: Some(LeadStatus::Proposal),
            ..Default::default()
        })
        .await?;
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].id, lead.id);

    client.delete_lead(lead.id).await?;
    let err = client.delete_lead(lead.id).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "Lead not found");
    Ok(())
}

#[tokio::test]
async fn client_surfaces_validation_errors_verbatim() -> Result<()> {
    let server = TestServer::spawn().await?;
    let mut client = ApiClient::new(&server.base_url)?;
    client.login("admin@leadblocks.com", "Pass12@rd!").await?;

    let err = client
        .create_lead(&LeadDraft {
            name: "Ada".into(),
            email: "ada@acme.test".into(),
            company_id: Some(404),
            status: Some(LeadStatus::Active),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid companyId");

    let err = client
        .list_companies(&ListOptions {
            page_size: Some(1000),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid pagination parameters");
    Ok(())
}

#[tokio::test]
async fn overlapping_lists_keep_only_the_newest_result() -> Result<()> {
    let server = TestServer::spawn().await?;
    let mut client = ApiClient::new(&server.base_url)?;
    client.login("admin@leadblocks.com", "Pass12@rd!").await?;

    for (name, status) in [("Ada", LeadStatus::Active), ("Grace", LeadStatus::Lost), ("Linus", LeadStatus::Active)] {
        client
            .create_lead(&LeadDraft {
                name: name.into(),
                email: format!("{}@leads.test", name.to_lowercase()),
                company_id: None,
                status: Some(status),
            })
            .await?;
    }

    let mut leads = RequestState::new();
    let older = leads.begin();
    let newer = leads.begin();

    let all = ListOptions::default();
    let lost = ListOptions {
        status: Some(LeadStatus::Lost),
        ..Default::default()
    };
    let (older_result, newer_result) = tokio::join!(client.list_leads(&all), client.list_leads(&lost));

    // the newer request lands first, the older one afterwards
    assert!(leads.finish(newer, newer_result));
    assert!(!leads.finish(older, older_result));

    assert!(!leads.loading());
    assert_eq!(leads.error(), None);
    let page = leads.data().expect("newest page kept");
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].name, "Grace");
    Ok(())
}

#[tokio::test]
async fn request_state_surfaces_server_errors() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = ApiClient::new(&server.base_url)?;

    let mut companies = RequestState::new();
    let err = companies
        .run(client.list_companies(&ListOptions::default()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(companies.error(), Some("Unauthorized"));
    assert!(companies.data().is_none());
    Ok(())
}
