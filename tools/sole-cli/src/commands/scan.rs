//! Scan resolution command.

use anyhow::{bail, Result};
use sole_commerce::catalog::resolve_scanned_code;

use super::{load_units, ScanArgs};
use crate::context::Context;
use crate::output::stock_badge;

/// Run the scan command.
pub async fn run(args: ScanArgs, ctx: &Context) -> Result<()> {
    let units = load_units(ctx, None, None, args.refresh).await?;

    let Some(unit) = resolve_scanned_code(&units, &args.text) else {
        bail!("No unit matches '{}'", args.text.trim());
    };

    if ctx.output.is_json() {
        ctx.output.json(unit);
        return Ok(());
    }

    ctx.output.header(&unit.label());
    ctx.output.kv("code", unit.unit_code.as_str());
    ctx.output.kv("product", &unit.product_name);
    ctx.output.kv("price", &unit.selling_price.display());
    if let Some(discount) = unit.discount_price {
        ctx.output.kv("discount price", &discount.display());
    }
    ctx.output.kv("stock", &stock_badge(unit.stock));
    if !unit.is_sellable() {
        ctx.output.warn("This unit cannot be sold right now");
    }
    Ok(())
}
