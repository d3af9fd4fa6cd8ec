use comfy_table::Table;

use gstbill_core::formatters::format_gstin;
use gstbill_parties::{Company, CompanyPayload};

use super::{CompanyArgs, Context, or_dash};

pub async fn show(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.require_session().await?;
    match ctx.stores.company.fetch().await? {
        Some(company) => print_company(company),
        None => println!("No company profile yet. Create one with `gstbill company save`."),
    }
    Ok(())
}

pub async fn save(ctx: &mut Context, args: CompanyArgs) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let base = match ctx.stores.company.fetch().await? {
        Some(company) => CompanyPayload::from_company(company),
        None => CompanyPayload::default(),
    };
    let creating = !ctx.stores.company.is_setup();

    let payload = apply(base, args);
    let company = ctx.stores.company.save(&payload).await?;
    if creating {
        println!("Company profile created for {}", company.display_name());
    } else {
        println!("Company profile updated for {}", company.display_name());
    }
    print_company(&company);
    Ok(())
}

fn apply(mut payload: CompanyPayload, args: CompanyArgs) -> CompanyPayload {
    let set = |slot: &mut Option<String>, value: Option<String>| {
        if value.is_some() {
            *slot = value;
        }
    };
    if let Some(name) = args.legal_name {
        payload.legal_name = name;
    }
    if let Some(gstin) = args.gstin {
        payload.gstin = gstin;
    }
    set(&mut payload.trade_name, args.trade_name);
    set(&mut payload.pan, args.pan);
    set(&mut payload.address, args.address);
    set(&mut payload.city, args.city);
    set(&mut payload.state, args.state);
    set(&mut payload.state_code, args.state_code);
    set(&mut payload.pincode, args.pincode);
    set(&mut payload.phone, args.phone);
    set(&mut payload.email, args.email);
    set(&mut payload.bank_name, args.bank_name);
    set(&mut payload.bank_account_number, args.bank_account_number);
    set(&mut payload.bank_ifsc, args.bank_ifsc);
    payload
}

fn print_company(company: &Company) {
    let state = match (company.state.as_deref(), company.state_code()) {
        (Some(name), Some(code)) => format!("{name} ({code})"),
        (None, Some(code)) => format!("{} ({code})", company.state_name().unwrap_or("-")),
        (Some(name), None) => name.to_string(),
        (None, None) => "-".to_string(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Legal name", company.legal_name.as_str()]);
    table.add_row(vec!["Trade name", or_dash(company.trade_name.as_deref())]);
    table.add_row(vec!["GSTIN".to_string(), format_gstin(company.gstin.as_deref())]);
    table.add_row(vec!["PAN", or_dash(company.pan.as_deref())]);
    table.add_row(vec!["Address", or_dash(company.address.as_deref())]);
    table.add_row(vec!["City", or_dash(company.city.as_deref())]);
    table.add_row(vec!["State".to_string(), state]);
    table.add_row(vec!["Pincode", or_dash(company.pincode.as_deref())]);
    table.add_row(vec!["Phone", or_dash(company.phone.as_deref())]);
    table.add_row(vec!["Email", or_dash(company.email.as_deref())]);
    table.add_row(vec!["Bank", or_dash(company.bank_name.as_deref())]);
    table.add_row(vec!["Account", or_dash(company.bank_account_number.as_deref())]);
    table.add_row(vec!["IFSC", or_dash(company.bank_ifsc.as_deref())]);
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_fields_not_given() {
        let base = CompanyPayload {
            legal_name: "Acme Traders".into(),
            gstin: "27AAPFU0939F1ZV".into(),
            city: Some("Pune".into()),
            ..CompanyPayload::default()
        };
        let args = CompanyArgs {
            phone: Some("9876543210".into()),
            ..CompanyArgs::default()
        };
        let out = apply(base, args);
        assert_eq!(out.legal_name, "Acme Traders");
        assert_eq!(out.city.as_deref(), Some("Pune"));
        assert_eq!(out.phone.as_deref(), Some("9876543210"));
    }
}
