use anyhow::anyhow;
use comfy_table::{Cell, CellAlignment, Table};

use gstbill_client::api::ProductsApi;
use gstbill_core::ProductId;
use gstbill_core::formatters::format_currency;
use gstbill_products::{Product, ProductPayload};

use super::{Context, ListArgs, ProductArgs, ProductFields, active_label, list_params, or_dash};

pub async fn list(ctx: &mut Context, args: ListArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let store = &mut ctx.stores.products;
    store.fetch(&list_params(args)).await?;

    if store.products().is_empty() {
        println!("No products found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "HSN/SAC", "Unit", "GST %", "Price", "Status"]);
    for p in store.products() {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(&p.name),
            Cell::new(&p.hsn_sac),
            Cell::new(&p.unit),
            Cell::new(p.gst_rate.normalize()).set_alignment(CellAlignment::Right),
            Cell::new(format_currency(Some(p.price))).set_alignment(CellAlignment::Right),
            Cell::new(active_label(p.is_active)),
        ]);
    }
    println!("Products\n{table}");
    if let Some(page) = store.page() {
        println!(
            "Page {} of {} ({} products)",
            page.page,
            page.total_pages.max(1),
            page.total
        );
    }
    Ok(())
}

pub async fn show(ctx: &mut Context, id: ProductId) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let product = ProductsApi::new(ctx.client.clone()).get(id).await?;
    print_product(&product);
    Ok(())
}

pub async fn add(ctx: &mut Context, args: ProductArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let payload = ProductPayload {
        name: args.name,
        description: args.description,
        hsn_sac: args.hsn,
        unit: args.unit,
        gst_rate: args.gst_rate,
        price: args.price,
    };
    let product = ctx.stores.products.create(&payload).await?;
    println!("Added product: {} ({})", product.name, product.id);
    Ok(())
}

pub async fn update(ctx: &mut Context, id: ProductId, fields: ProductFields) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let mut current = ProductsApi::new(ctx.client.clone()).get(id).await?;
    if let Some(unit) = fields.unit {
        current.unit = unit.to_string();
    }
    let base = ProductPayload::from_product(&current)
        .map_err(|e| anyhow!("{e}; pass --unit to choose one"))?;

    let payload = ProductPayload {
        name: fields.name.unwrap_or(base.name),
        description: fields.description.or(base.description),
        hsn_sac: fields.hsn.unwrap_or(base.hsn_sac),
        unit: base.unit,
        gst_rate: fields.gst_rate.unwrap_or(base.gst_rate),
        price: fields.price.unwrap_or(base.price),
    };

    let product = ctx.stores.products.update(id, &payload).await?;
    println!("Updated product: {}", product.name);
    Ok(())
}

pub async fn set_status(ctx: &mut Context, id: ProductId, is_active: bool) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let product = ctx.stores.products.set_status(id, is_active).await?;
    println!("{}: {}", product.name, active_label(product.is_active));
    Ok(())
}

fn print_product(p: &Product) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), p.id.to_string()]);
    table.add_row(vec!["Name".to_string(), p.name.clone()]);
    table.add_row(vec![
        "Description".to_string(),
        or_dash(p.description.as_deref()).to_string(),
    ]);
    table.add_row(vec!["HSN/SAC".to_string(), p.hsn_sac.clone()]);
    table.add_row(vec!["Unit".to_string(), p.unit.clone()]);
    table.add_row(vec!["GST rate".to_string(), format!("{}%", p.gst_rate.normalize())]);
    table.add_row(vec!["Price".to_string(), format_currency(Some(p.price))]);
    table.add_row(vec!["Status".to_string(), active_label(p.is_active).to_string()]);
    println!("{table}");
}
