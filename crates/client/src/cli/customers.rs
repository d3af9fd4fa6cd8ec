use comfy_table::{Cell, Table};

use gstbill_client::api::CustomersApi;
use gstbill_core::CustomerId;
use gstbill_core::formatters::format_gstin;
use gstbill_parties::{Customer, CustomerPayload, CustomerType};

use super::{Context, CustomerArgs, CustomerDetails, ListArgs, active_label, list_params, or_dash};

pub async fn list(ctx: &mut Context, args: ListArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let store = &mut ctx.stores.customers;
    store.fetch(&list_params(args)).await?;

    if store.customers().is_empty() {
        println!("No customers found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "GSTIN", "State", "Status"]);
    for c in store.customers() {
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.name),
            Cell::new(c.customer_type),
            Cell::new(format_gstin(c.gstin.as_deref())),
            Cell::new(or_dash(c.state_code())),
            Cell::new(active_label(c.is_active)),
        ]);
    }
    println!("Customers\n{table}");
    println!(
        "{} business, {} consumer",
        store.business().count(),
        store.consumers().count()
    );
    Ok(())
}

pub async fn show(ctx: &mut Context, id: CustomerId) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let customer = CustomersApi::new(ctx.client.clone()).get(id).await?;
    print_customer(&customer);
    Ok(())
}

pub async fn add(ctx: &mut Context, args: CustomerArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let payload = apply(CustomerPayload::new(args.name, args.customer_type), args.details);
    let customer = ctx.stores.customers.create(&payload).await?;
    println!("Added customer: {} ({})", customer.name, customer.id);
    Ok(())
}

pub async fn update(
    ctx: &mut Context,
    id: CustomerId,
    name: Option<String>,
    customer_type: Option<CustomerType>,
    details: CustomerDetails,
) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let current = CustomersApi::new(ctx.client.clone()).get(id).await?;
    let mut payload = apply(CustomerPayload::from_customer(&current), details);
    if let Some(name) = name {
        payload.name = name;
    }
    if let Some(customer_type) = customer_type {
        payload.customer_type = customer_type;
    }

    let customer = ctx.stores.customers.update(id, &payload).await?;
    println!("Updated customer: {}", customer.name);
    Ok(())
}

pub async fn set_status(ctx: &mut Context, id: CustomerId, is_active: bool) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let customer = ctx.stores.customers.set_status(id, is_active).await?;
    println!("{}: {}", customer.name, active_label(customer.is_active));
    Ok(())
}

fn apply(mut payload: CustomerPayload, details: CustomerDetails) -> CustomerPayload {
    let set = |slot: &mut Option<String>, value: Option<String>| {
        if value.is_some() {
            *slot = value;
        }
    };
    set(&mut payload.gstin, details.gstin);
    set(&mut payload.email, details.email);
    set(&mut payload.phone, details.phone);
    set(&mut payload.billing_address, details.address);
    set(&mut payload.state, details.state);
    set(&mut payload.state_code, details.state_code);
    set(&mut payload.pincode, details.pincode);
    payload
}

fn print_customer(c: &Customer) {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["ID".to_string(), c.id.to_string()]);
    table.add_row(vec!["Name".to_string(), c.name.clone()]);
    table.add_row(vec!["Type".to_string(), c.customer_type.to_string()]);
    table.add_row(vec!["GSTIN".to_string(), format_gstin(c.gstin.as_deref())]);
    table.add_row(vec!["Email".to_string(), or_dash(c.email.as_deref()).to_string()]);
    table.add_row(vec!["Phone".to_string(), or_dash(c.phone.as_deref()).to_string()]);
    table.add_row(vec![
        "Address".to_string(),
        or_dash(c.billing_address.as_deref()).to_string(),
    ]);
    table.add_row(vec!["State".to_string(), or_dash(c.state.as_deref()).to_string()]);
    table.add_row(vec!["State code".to_string(), or_dash(c.state_code()).to_string()]);
    table.add_row(vec!["Pincode".to_string(), or_dash(c.pincode.as_deref()).to_string()]);
    table.add_row(vec!["Status".to_string(), active_label(c.is_active).to_string()]);
    println!("{table}");
}
