use std::path::PathBuf;

use anyhow::{Context as _, bail};
use comfy_table::{Cell, CellAlignment, Table};
use dialoguer::Confirm;
use rust_decimal::Decimal;

use gstbill_client::api::{InvoiceFilter, ProductsApi};
use gstbill_core::formatters::{format_currency, format_gstin, today};
use gstbill_core::states::state_name;
use gstbill_core::{CustomerId, InvoiceId, InvoiceItemId};
use gstbill_invoicing::{
    Invoice, InvoiceItem, InvoiceItemPayload, InvoicePayload, InvoicePreview, SupplyKind,
    TaxComponent,
};

use super::{Context, CreateInvoiceArgs, ItemArgs, QuoteArgs, StatusArg, or_dash};

fn money(amount: Decimal) -> Cell {
    Cell::new(format_currency(Some(amount))).set_alignment(CellAlignment::Right)
}

pub async fn list(
    ctx: &mut Context,
    status: Option<StatusArg>,
    customer: Option<CustomerId>,
) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let filter = InvoiceFilter {
        status: status.map(Into::into),
        customer_id: customer,
    };
    let store = &mut ctx.stores.invoices;
    store.fetch_all(&filter).await?;

    if store.invoices().is_empty() {
        println!("No invoices found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Number", "Date", "Customer", "Status", "Total"]);
    for inv in store.invoices() {
        table.add_row(vec![
            Cell::new(inv.id),
            Cell::new(inv.label()),
            Cell::new(inv.invoice_date.format("%d %b %Y")),
            Cell::new(or_dash(inv.customer_name.as_deref())),
            Cell::new(inv.status),
            money(inv.grand_total),
        ]);
    }
    println!("Invoices\n{table}");
    println!(
        "{} draft, {} final",
        store.drafts().count(),
        store.finals().count()
    );
    Ok(())
}

pub async fn show(ctx: &mut Context, id: InvoiceId) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let invoice = ctx.stores.invoices.fetch(id).await?;
    print_invoice(&invoice);
    Ok(())
}

pub async fn create(ctx: &mut Context, args: CreateInvoiceArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let mut payload = InvoicePayload::new(args.customer, args.date.unwrap_or_else(today));
    payload.place_of_supply = args.place_of_supply;
    payload.notes = args.notes;

    let invoice = ctx.stores.invoices.create(&payload).await?;
    println!("Created {} ({})", invoice.label(), invoice.id);
    println!("Add lines with `gstbill invoices add-item {}`", invoice.id);
    Ok(())
}

pub async fn add_item(ctx: &mut Context, id: InvoiceId, args: ItemArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    ctx.stores.invoices.fetch(id).await?;
    let item = build_item(ctx, None, args).await?;
    let invoice = ctx.stores.invoices.add_item(id, &item).await?;
    println!("Added \"{}\" to {}", item.description, invoice.label());
    print_invoice(&invoice);
    Ok(())
}

pub async fn update_item(
    ctx: &mut Context,
    id: InvoiceId,
    item_id: InvoiceItemId,
    args: ItemArgs,
) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let invoice = ctx.stores.invoices.fetch(id).await?;
    let existing = invoice
        .item(item_id)
        .with_context(|| format!("invoice {} has no line {item_id}", invoice.label()))?;
    let item = build_item(ctx, Some(payload_from_item(existing)), args).await?;
    let invoice = ctx.stores.invoices.update_item(id, item_id, &item).await?;
    println!("Updated line on {}", invoice.label());
    print_invoice(&invoice);
    Ok(())
}

pub async fn remove_item(
    ctx: &mut Context,
    id: InvoiceId,
    item_id: InvoiceItemId,
) -> anyhow::Result<()> {
    ctx.require_session().await?;
    ctx.stores.invoices.fetch(id).await?;
    let invoice = ctx.stores.invoices.remove_item(id, item_id).await?;
    println!("Removed line from {}", invoice.label());
    Ok(())
}

pub async fn calculate(ctx: &mut Context, id: InvoiceId) -> anyhow::Result<()> {
    ctx.require_session().await?;
    ctx.stores.invoices.fetch(id).await?;
    let calc = ctx.stores.invoices.calculate_tax(id).await?;

    let mut table = Table::new();
    table.set_header(vec!["Component", "Amount"]);
    table.add_row(vec![Cell::new("Taxable value"), money(calc.taxable_amount)]);
    if calc.is_inter_state {
        table.add_row(vec![Cell::new("IGST"), money(calc.igst_amount)]);
    } else {
        table.add_row(vec![Cell::new("CGST"), money(calc.cgst_amount)]);
        table.add_row(vec![Cell::new("SGST"), money(calc.sgst_amount)]);
    }
    table.add_row(vec![Cell::new("Total tax"), money(calc.total_tax)]);
    if let Some(invoice) = ctx.stores.invoices.current() {
        table.add_row(vec![Cell::new("Grand total"), money(invoice.grand_total)]);
    }
    println!("{table}");
    Ok(())
}

pub async fn finalize(ctx: &mut Context, id: InvoiceId, yes: bool) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let invoice = ctx.stores.invoices.fetch(id).await?;
    invoice.check_finalizable()?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Finalize {} for {}? A final invoice can no longer be edited",
                invoice.label(),
                format_currency(Some(invoice.grand_total))
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    let invoice = ctx.stores.invoices.finalize(id).await?;
    println!("Finalized {}", invoice.label());
    Ok(())
}

pub async fn preview(ctx: &mut Context, id: InvoiceId) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let preview = ctx.stores.invoices.fetch_preview(id).await?;
    print_preview(preview);
    Ok(())
}

pub async fn pdf(ctx: &mut Context, id: InvoiceId, out: Option<PathBuf>) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let doc = ctx.stores.invoices.download_pdf(id).await?;

    let path = match out {
        Some(path) if path.is_dir() => path.join(&doc.filename),
        Some(path) => path,
        None => PathBuf::from(&doc.filename),
    };
    std::fs::write(&path, &doc.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved {} ({} bytes)", path.display(), doc.bytes.len());
    Ok(())
}

pub fn quote(args: QuoteArgs) -> anyhow::Result<()> {
    let supply = if args.inter_state {
        SupplyKind::InterState
    } else {
        SupplyKind::IntraState
    };
    let line = gstbill_invoicing::compute_line(
        args.quantity,
        args.price,
        args.discount,
        args.gst_rate,
        supply,
    );

    let mut table = Table::new();
    table.set_header(vec!["Component", "Amount"]);
    table.add_row(vec![Cell::new("Taxable value"), money(line.taxable_value)]);
    if supply.is_inter_state() {
        table.add_row(vec![
            Cell::new(format!("IGST @ {}%", args.gst_rate.normalize())),
            money(line.igst),
        ]);
    } else {
        let half = (args.gst_rate / Decimal::TWO).normalize();
        table.add_row(vec![Cell::new(format!("CGST @ {half}%")), money(line.cgst)]);
        table.add_row(vec![Cell::new(format!("SGST @ {half}%")), money(line.sgst)]);
    }
    table.add_row(vec![Cell::new("Line total"), money(line.total())]);
    println!("{table}");
    Ok(())
}

/// Line payload from CLI flags, layered over `base` (the line being edited)
/// and, when `--product` is given, the product's master data.
async fn build_item(
    ctx: &Context,
    base: Option<InvoiceItemPayload>,
    args: ItemArgs,
) -> anyhow::Result<InvoiceItemPayload> {
    let mut item = base.unwrap_or_else(|| InvoiceItemPayload {
        product_id: None,
        description: String::new(),
        hsn_sac: None,
        quantity: Decimal::ONE,
        unit: None,
        unit_price: Decimal::ZERO,
        discount: Decimal::ZERO,
        gst_rate: Decimal::ZERO,
    });

    if let Some(product_id) = args.product {
        let product = ProductsApi::new(ctx.client.clone())
            .get(product_id)
            .await
            .context("failed to load product")?;
        if !product.is_active {
            bail!("product {} is inactive", product.name);
        }
        item.product_id = Some(product.id);
        item.description = product.name;
        item.hsn_sac = Some(product.hsn_sac);
        item.unit = Some(product.unit);
        item.unit_price = product.price;
        item.gst_rate = product.gst_rate;
    } else if item.description.is_empty() && args.description.is_none() {
        bail!("pass --product or --description");
    }

    if let Some(description) = args.description {
        item.description = description;
    }
    if args.hsn.is_some() {
        item.hsn_sac = args.hsn;
    }
    if let Some(quantity) = args.quantity {
        item.quantity = quantity;
    }
    if args.unit.is_some() {
        item.unit = args.unit;
    }
    if let Some(price) = args.price {
        item.unit_price = price;
    }
    if let Some(discount) = args.discount {
        item.discount = discount;
    }
    if let Some(rate) = args.gst_rate {
        item.gst_rate = rate;
    }
    Ok(item)
}

fn payload_from_item(item: &InvoiceItem) -> InvoiceItemPayload {
    InvoiceItemPayload {
        product_id: item.product_id,
        description: item.description.clone(),
        hsn_sac: item.hsn_sac.clone(),
        quantity: item.quantity,
        unit: item.unit.clone(),
        unit_price: item.unit_price,
        discount: item.discount,
        gst_rate: item.gst_rate,
    }
}

fn place_label(code: Option<&str>) -> String {
    match code {
        Some(code) => match state_name(code) {
            Some(name) => format!("{name} ({code})"),
            None => code.to_string(),
        },
        None => "-".to_string(),
    }
}

fn print_invoice(invoice: &Invoice) {
    println!(
        "{}  [{}]  {}",
        invoice.label(),
        invoice.status,
        invoice.invoice_date.format("%d %b %Y")
    );
    println!("Customer: {}", or_dash(invoice.customer_name.as_deref()));
    println!(
        "Place of supply: {}",
        place_label(invoice.place_of_supply.as_deref())
    );

    if invoice.items.is_empty() {
        println!("No line items yet.");
    } else {
        let mut table = Table::new();
        table.set_header(vec![
            "Line", "Description", "HSN/SAC", "Qty", "Rate", "GST %", "Taxable", "Tax", "Total",
        ]);
        for item in &invoice.items {
            let tax = item.cgst_amount + item.sgst_amount + item.igst_amount;
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(&item.description),
                Cell::new(or_dash(item.hsn_sac.as_deref())),
                Cell::new(format!(
                    "{} {}",
                    item.quantity.normalize(),
                    item.unit.as_deref().unwrap_or_default()
                )),
                money(item.unit_price),
                Cell::new(item.gst_rate.normalize()),
                money(item.taxable_value),
                money(tax),
                money(item.total),
            ]);
        }
        println!("{table}");
    }

    let mut totals = Table::new();
    totals.add_row(vec![Cell::new("Subtotal"), money(invoice.subtotal)]);
    if invoice.igst_amount.is_zero() {
        totals.add_row(vec![Cell::new("CGST"), money(invoice.cgst_amount)]);
        totals.add_row(vec![Cell::new("SGST"), money(invoice.sgst_amount)]);
    } else {
        totals.add_row(vec![Cell::new("IGST"), money(invoice.igst_amount)]);
    }
    totals.add_row(vec![Cell::new("Grand total"), money(invoice.grand_total)]);
    println!("{totals}");
    if let Some(notes) = invoice.notes.as_deref().filter(|n| !n.is_empty()) {
        println!("Notes: {notes}");
    }
}

fn tax_label(name: &str, component: &TaxComponent) -> String {
    match component.rate {
        Some(rate) => format!("{name} @ {}%", rate.normalize()),
        None => name.to_string(),
    }
}

fn print_preview(preview: &InvoicePreview) {
    println!("TAX INVOICE");
    println!(
        "Invoice: {}    Date: {}    Status: {}",
        or_dash(preview.invoice_number.as_deref()),
        preview.invoice_date.format("%d %b %Y"),
        preview.status
    );

    let mut parties = Table::new();
    parties.set_header(vec!["", "Seller", "Buyer"]);
    parties.add_row(vec![
        "Name".to_string(),
        preview.seller.name.clone(),
        preview.buyer.name.clone(),
    ]);
    parties.add_row(vec![
        "GSTIN".to_string(),
        format_gstin(preview.seller.gstin.as_deref()),
        format_gstin(preview.buyer.gstin.as_deref()),
    ]);
    parties.add_row(vec![
        "Address".to_string(),
        or_dash(preview.seller.address.as_deref()).to_string(),
        or_dash(preview.buyer.address.as_deref()).to_string(),
    ]);
    parties.add_row(vec![
        "State".to_string(),
        place_label(preview.seller.state_code.as_deref()),
        place_label(preview.buyer.state_code.as_deref()),
    ]);
    println!("{parties}");
    println!(
        "Place of supply: {}",
        place_label(preview.place_of_supply.as_deref())
    );

    let mut items = Table::new();
    items.set_header(vec![
        "#", "Description", "HSN/SAC", "Qty", "Rate", "Taxable", "GST %", "Total",
    ]);
    for (idx, item) in preview.items.iter().enumerate() {
        items.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&item.description),
            Cell::new(or_dash(item.hsn_sac.as_deref())),
            Cell::new(format!(
                "{} {}",
                item.quantity.normalize(),
                item.unit.as_deref().unwrap_or_default()
            )),
            money(item.unit_price),
            money(item.taxable_value),
            Cell::new(item.gst_rate.normalize()),
            money(item.total),
        ]);
    }
    println!("{items}");

    let taxes = preview.tax_breakdown();
    let mut totals = Table::new();
    totals.add_row(vec![Cell::new("Taxable amount"), money(preview.taxable_amount)]);
    if taxes.is_inter_state() {
        totals.add_row(vec![Cell::new(tax_label("IGST", &taxes.igst)), money(taxes.igst.amount)]);
    } else {
        totals.add_row(vec![Cell::new(tax_label("CGST", &taxes.cgst)), money(taxes.cgst.amount)]);
        totals.add_row(vec![Cell::new(tax_label("SGST", &taxes.sgst)), money(taxes.sgst.amount)]);
    }
    totals.add_row(vec![Cell::new("Total tax"), money(preview.total_tax)]);
    totals.add_row(vec![Cell::new("Grand total"), money(preview.grand_total)]);
    println!("{totals}");
    println!("Amount in words: {}", preview.amount_in_words());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_label_names_known_states() {
        assert_eq!(place_label(Some("27")), "Maharashtra (27)");
        assert_eq!(place_label(Some("00")), "00");
        assert_eq!(place_label(None), "-");
    }

    #[test]
    fn tax_label_omits_mixed_rates() {
        let single = TaxComponent {
            rate: Some(Decimal::new(90, 1)),
            amount: Decimal::new(900, 2),
        };
        assert_eq!(tax_label("CGST", &single), "CGST @ 9%");
        let mixed = TaxComponent {
            rate: None,
            amount: Decimal::ONE,
        };
        assert_eq!(tax_label("CGST", &mixed), "CGST");
    }
}
