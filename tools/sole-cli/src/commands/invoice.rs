//! Invoice number command.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use sole_commerce::invoice::{
    format_display_date, format_invoice_number, from_unix_millis, parse_timestamp,
};

use super::InvoiceArgs;
use crate::context::Context;

/// Run the invoice command.
pub async fn run(args: InvoiceArgs, ctx: &Context) -> Result<()> {
    let ts = parse_input(&args.timestamp)?;
    let invoice = format_invoice_number(ts);
    let date = format_display_date(ts);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "timestamp": ts,
            "invoice": invoice,
            "date": date,
        }));
        return Ok(());
    }

    ctx.output.kv("invoice", &invoice);
    ctx.output.kv("date", &date);
    Ok(())
}

/// Accept an API timestamp or Unix milliseconds.
fn parse_input(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed
            .parse::<i64>()
            .ok()
            .and_then(from_unix_millis)
            .ok_or_else(|| anyhow!("Timestamp out of range: {}", trimmed));
    }
    Ok(parse_timestamp(trimmed)?)
}
