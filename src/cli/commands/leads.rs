use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{lead_line, output_success, output_value, page_text};
use crate::cli::CliContext;
use crate::client::{LeadDraft, ListOptions, RequestState};
use crate::database::models::lead::LeadStatus;

#[derive(Subcommand)]
pub enum LeadCommands {
    #[command(about = "List leads, newest first")]
    List {
        #[arg(long, help = "Page number (1-based)")]
        page: Option<u32>,
        #[arg(long, help = "Rows per page (max 100)")]
        page_size: Option<u32>,
        #[arg(long, help = "Only leads with this status")]
        status: Option<LeadStatus>,
    },

    #[command(about = "Show one lead with its company")]
    Get {
        #[arg(help = "Lead ID")]
        id: i64,
    },

    #[command(about = "Create a lead")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, help = "Company ID (omit for no company)")]
        company_id: Option<i64>,
        #[arg(long, default_value = "active")]
        status: LeadStatus,
    },

    #[command(about = "Replace a lead")]
    Update {
        #[arg(help = "Lead ID")]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, help = "Company ID (omitting it clears the company)")]
        company_id: Option<i64>,
        #[arg(long, help = "New status (omit to keep the current one)")]
        status: Option<LeadStatus>,
    },

    #[command(about = "Delete a lead")]
    Delete {
        #[arg(help = "Lead ID")]
        id: i64,
    },
}

pub async fn handle(cmd: LeadCommands, ctx: &CliContext) -> anyhow::Result<()> {
    let client = ctx.authed_client()?;

    match cmd {
        LeadCommands::List { page, page_size, status } => {
            let options = ListOptions { page, page_size, status };
            let mut leads = RequestState::new();
            let page = leads.run(client.list_leads(&options)).await?;
            output_value(&ctx.output, page, |p| page_text(p, lead_line))
        }
        LeadCommands::Get { id } => {
            let lead = client.get_lead(id).await?;
            output_value(&ctx.output, &lead, lead_line)
        }
        LeadCommands::Create { name, email, company_id, status } => {
            let draft = LeadDraft {
                name,
                email,
                company_id,
                status: Some(status),
            };
            let lead = client.create_lead(&draft).await?;
            output_success(
                &ctx.output,
                &format!("Created lead {}", lead.id),
                Some(json!({ "lead": lead })),
            )
        }
        LeadCommands::Update { id, name, email, company_id, status } => {
            let draft = LeadDraft {
                name,
                email,
                company_id,
                status,
            };
            let lead = client.update_lead(id, &draft).await?;
            output_success(
                &ctx.output,
                &format!("Updated lead {}", lead.id),
                Some(json!({ "lead": lead })),
            )
        }
        LeadCommands::Delete { id } => {
            client.delete_lead(id).await?;
            output_success(&ctx.output, &format!("Deleted lead {}", id), None)
        }
    }
}
