use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::utils::{company_line, output_success, output_value, page_text};
use crate::cli::CliContext;
use crate::client::{CompanyDraft, ListOptions, RequestState};

#[derive(Args)]
pub struct CompanyFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub domain: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub website: Option<String>,
}

impl From<CompanyFields> for CompanyDraft {
    fn from(fields: CompanyFields) -> Self {
        Self {
            name: fields.name,
            domain: fields.domain,
            description: fields.description,
            website: fields.website,
        }
    }
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    #[command(about = "List companies, newest first")]
    List {
        #[arg(long, help = "Page number (1-based)")]
        page: Option<u32>,
        #[arg(long, help = "Rows per page (max 100)")]
        page_size: Option<u32>,
    },

    #[command(about = "Show one company")]
    Get {
        #[arg(help = "Company ID")]
        id: i64,
    },

    #[command(about = "Create a company")]
    Create {
        #[command(flatten)]
        fields: CompanyFields,
    },

    #[command(about = "Replace a company; omitted optional fields are cleared")]
    Update {
        #[arg(help = "Company ID")]
        id: i64,
        #[command(flatten)]
        fields: CompanyFields,
    },

    #[command(about = "Delete a company; its leads keep existing without a company")]
    Delete {
        #[arg(help = "Company ID")]
        id: i64,
    },
}

pub async fn handle(cmd: CompanyCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let client = ctx.authed_client()?;

    match cmd {
        CompanyCommands::List { page, page_size } => {
            let options = ListOptions {
                page,
                page_size,
                status: None,
            };
            let mut companies = RequestState::new();
            let page = companies.run(client.list_companies(&options)).await?;
            output_value(&ctx.output, page, |p| page_text(p, company_line))
        }
        CompanyCommands::Get { id } => {
            let company = client.get_company(id).await?;
            output_value(&ctx.output, &company, company_line)
        }
        CompanyCommands::Create { fields } => {
            let company = client.create_company(&fields.into()).await?;
            output_success(
                &ctx.output,
                &format!("Created company {}", company.id),
                Some(json!({ "company": company })),
            )
        }
        CompanyCommands::Update { id, fields } => {
            let company = client.update_company(id, &fields.into()).await?;
            output_success(
                &ctx.output,
                &format!("Updated company {}", company.id),
                Some(json!({ "company": company })),
            )
        }
        CompanyCommands::Delete { id } => {
            client.delete_company(id).await?;
            output_success(&ctx.output, &format!("Deleted company {}", id), None)
        }
    }
}
