//! Catalog browsing command.

use anyhow::{bail, Result};
use serde_json::json;
use sole_commerce::search::{filter_catalog, paginate, CatalogFilter, ALL_BRANDS};

use super::{load_units, CatalogArgs};
use crate::context::Context;
use crate::output::{stock_badge, truncate};

const WIDTHS: [usize; 6] = [14, 12, 18, 6, 14, 8];

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    if args.page == 0 {
        bail!("Pages start at 1");
    }
    let page_size = args.page_size.unwrap_or(ctx.config.catalog.page_size);
    if page_size == 0 {
        bail!("Page size must be at least 1");
    }

    let units = load_units(
        ctx,
        args.search.as_deref(),
        args.size.as_deref(),
        args.refresh,
    )
    .await?;

    let filter = CatalogFilter::new()
        .with_brand(args.brand.as_str())
        .with_search(args.search.unwrap_or_default())
        .with_size(args.size.unwrap_or_default());
    let filtered = filter_catalog(&units, &filter);
    let page = paginate(&filtered.units, args.page, page_size);

    ctx.output.debug(&format!(
        "{} of {} units match {:?}",
        filtered.units.len(),
        units.len(),
        filter
    ));

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "units": page.items,
            "pagination": page.pagination,
            "brand_stock": filtered.brand_stock,
        }));
        return Ok(());
    }

    if filtered.is_empty() {
        ctx.output.info("No units match the current filters");
        return Ok(());
    }

    ctx.output.header("Catalog");
    ctx.output.table_header(
        &["CODE", "BRAND", "MODEL", "SIZE", "PRICE", "STOCK"],
        &WIDTHS,
    );
    for unit in page.items {
        let price = match unit.discount_price {
            Some(discount) => format!("{}*", discount.display()),
            None => unit.selling_price.display(),
        };
        ctx.output.table_row(
            &[
                &truncate(unit.unit_code.as_str(), WIDTHS[0]),
                &truncate(&unit.brand, WIDTHS[1]),
                &truncate(&unit.model, WIDTHS[2]),
                &unit.size,
                &price,
                &stock_badge(unit.stock),
            ],
            &WIDTHS,
        );
    }

    let pagination = page.pagination;
    ctx.output.info(&format!(
        "Showing {}-{} of {} (page {}/{})",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total,
        pagination.page,
        pagination.total_pages
    ));

    if filter.brand == ALL_BRANDS {
        ctx.output.header("Stock by brand");
        for (brand, stock) in &filtered.brand_stock {
            ctx.output.list_item(&format!("{}: {}", brand, stock));
        }
    }

    Ok(())
}
