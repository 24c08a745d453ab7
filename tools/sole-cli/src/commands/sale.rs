//! Sale command: ring up units and submit the transaction.

use anyhow::{anyhow, bail, Result};
use dialoguer::Confirm;
use serde_json::json;
use sole_commerce::cart::OverrideRejection;
use sole_commerce::catalog::resolve_scanned_code;
use sole_commerce::checkout::{Customer, SaleForm};
use sole_data::{Register, SubmitError};

use super::{load_units, SaleArgs};
use crate::context::Context;
use crate::output::truncate;

/// Run the sale command.
pub async fn run(args: SaleArgs, ctx: &Context) -> Result<()> {
    let units = load_units(ctx, None, None, args.refresh).await?;
    let register = Register::new(ctx.transaction_api().await?);

    for text in &args.units {
        let unit = resolve_scanned_code(&units, text)
            .ok_or_else(|| anyhow!("No unit matches '{}'", text.trim()))?;
        register.cart().add_unit(unit)?;
        ctx.output.debug(&format!("Added {}", unit.unit_code));
    }

    let cart = register.cart().snapshot();
    let subtotal = cart.subtotal()?;

    let mut form = SaleForm {
        customer: Customer {
            name: args.customer_name,
            phone: args.customer_phone,
            email: args.customer_email,
        },
        payment_method: Some(args.payment),
        card_type: args.card_type,
        notes: args.notes.unwrap_or_default(),
        new_total: args
            .total
            .unwrap_or_else(|| subtotal.to_input_string()),
    };

    let outcome = form.totals(&cart)?;
    match outcome.rejection {
        None => {}
        Some(rejection @ OverrideRejection::ExceedsSubtotal { .. }) => {
            ctx.output
                .warn(&format!("{}; charging the subtotal instead", rejection));
            form.new_total = outcome.override_input.unwrap_or_default();
        }
        Some(rejection) => bail!(rejection),
    }

    if !ctx.output.is_json() {
        ctx.output.header("Sale");
        for item in &cart.items {
            ctx.output.table_row(
                &[
                    &truncate(item.unit.unit_code.as_str(), 14),
                    &truncate(&item.unit.label(), 32),
                    &item.unit_price().display(),
                ],
                &[14, 32, 14],
            );
        }
        ctx.output.totals(&outcome.totals);
    }

    if args.dry_run {
        let payload = form.prepare(&cart)?;
        if ctx.output.is_json() {
            ctx.output.json(&payload);
        } else {
            ctx.output.info("Dry run - payload not submitted:");
            ctx.output.json(&payload);
        }
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Charge {}?", outcome.totals.total.display()))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Sale cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Submitting sale...");
    let result = register.checkout(&mut form).await;
    spinner.finish_and_clear();

    match result {
        Ok(receipt) => {
            if ctx.output.is_json() {
                ctx.output.json(&json!({
                    "success": true,
                    "message": receipt.message,
                    "total": outcome.totals.total.to_f64(),
                    "discount": outcome.totals.discount.to_f64(),
                }));
            } else {
                ctx.output.success(
                    receipt
                        .message
                        .as_deref()
                        .unwrap_or("Transaction recorded"),
                );
            }
            Ok(())
        }
        Err(SubmitError::Unauthenticated) => {
            bail!("Not authenticated. Run `sole session set-token <TOKEN>` first.")
        }
        Err(e) => Err(e.into()),
    }
}
