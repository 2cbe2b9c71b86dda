use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::database::models::company::Company;
use crate::database::models::lead::Lead;
use crate::filter::Page;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, status: Option<u16>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = status {
                response["status"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print `value` as JSON, or hand it to `text` for the human format
pub fn output_value<T: Serialize>(
    output_format: &OutputFormat,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{}", text(value)),
    }
    Ok(())
}

pub fn lead_line(lead: &Lead) -> String {
    let company = lead
        .company
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("-");
    format!(
        "{:>5}  {:<24}  {:<30}  {:<12}  {}",
        lead.id, lead.name, lead.email, lead.status, company
    )
}

pub fn company_line(company: &Company) -> String {
    format!(
        "{:>5}  {:<24}  {:<24}  {}",
        company.id,
        company.name,
        company.domain.as_deref().unwrap_or("-"),
        company.website.as_deref().unwrap_or("-")
    )
}

/// Rows followed by a `page x of y (n total)` footer
pub fn page_text<T>(page: &Page<T>, line: impl Fn(&T) -> String) -> String {
    let mut out: Vec<String> = page.data.iter().map(line).collect();
    if out.is_empty() {
        out.push("No results".to_string());
    }
    out.push(format!(
        "page {} of {} ({} total)",
        page.pagination.page, page.pagination.total_pages, page.pagination.total
    ));
    out.join("\n")
}
