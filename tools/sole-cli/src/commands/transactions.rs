//! Transaction listing command.

use anyhow::{bail, Result};
use serde_json::json;

use super::{load_error, TransactionsArgs};
use crate::context::Context;
use crate::output::truncate;

const WIDTHS: [usize; 5] = [12, 16, 14, 10, 20];

/// Run the transactions command.
pub async fn run(args: TransactionsArgs, ctx: &Context) -> Result<()> {
    if args.page == 0 {
        bail!("Pages start at 1");
    }

    let api = ctx.transaction_api().await?;
    let spinner = ctx.output.spinner("Fetching transactions...");
    let result = api.list(args.page).await;
    spinner.finish_and_clear();
    let page = result.map_err(load_error)?;

    if ctx.output.is_json() {
        let rows: Vec<_> = page
            .transactions
            .iter()
            .map(|t| {
                json!({
                    "id": t.id,
                    "invoice": t.invoice_number(),
                    "created_at": t.created_at,
                    "date": t.display_date(),
                    "total": t.total.to_f64(),
                    "discount": t.discount.to_f64(),
                    "payment_method": t.payment_method,
                    "customer_name": t.customer_name,
                })
            })
            .collect();
        ctx.output.json(&json!({
            "transactions": rows,
            "page": page.page,
            "last_page": page.last_page,
        }));
        return Ok(());
    }

    if page.transactions.is_empty() {
        ctx.output.info("No transactions on this page");
        return Ok(());
    }

    ctx.output.header("Transactions");
    ctx.output
        .table_header(&["INVOICE", "DATE", "TOTAL", "PAYMENT", "CUSTOMER"], &WIDTHS);
    for t in &page.transactions {
        ctx.output.table_row(
            &[
                &t.invoice_number(),
                &t.display_date(),
                &t.total.display(),
                &t.payment_method,
                &truncate(t.customer_name.as_deref().unwrap_or("-"), WIDTHS[4]),
            ],
            &WIDTHS,
        );
    }

    ctx.output
        .info(&format!("Page {} of {}", page.page, page.last_page));
    if page.has_more() {
        ctx.output.debug(&format!(
            "Next: sole transactions --page {}",
            page.page + 1
        ));
    }
    Ok(())
}
