use anyhow::Context as _;
use chrono::Utc;
use comfy_table::Table;
use dialoguer::{Input, Password};

use gstbill_auth::{Credentials, RegisterRequest};

use super::{Context, or_dash};

pub async fn login(ctx: &mut Context, email: Option<String>) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = Password::new().with_prompt("Password").interact()?;

    ctx.stores
        .auth
        .login(&Credentials::new(email, password))
        .await
        .map_err(|e| anyhow::anyhow!(auth_failure(&ctx.stores.auth, e)))?;

    let name = ctx
        .stores
        .auth
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    println!("Logged in as {name}");
    Ok(())
}

pub async fn register(
    ctx: &mut Context,
    email: String,
    full_name: Option<String>,
) -> anyhow::Result<()> {
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let request = RegisterRequest {
        email,
        password,
        full_name,
    };
    let user = ctx
        .stores
        .auth
        .register(&request)
        .await
        .map_err(|e| anyhow::anyhow!(auth_failure(&ctx.stores.auth, e)))?;
    println!("Registered {}. Log in with `gstbill auth login`.", user.email);
    Ok(())
}

pub async fn logout(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.stores.auth.logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(ctx: &mut Context) -> anyhow::Result<()> {
    ctx.require_session().await?;
    let user = ctx
        .stores
        .auth
        .fetch_current_user()
        .await
        .context("failed to load the current user")?;

    let mut table = Table::new();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Name", user.display_name()]);
    table.add_row(vec!["Email", user.email.as_str()]);
    table.add_row(vec!["Full name", or_dash(user.full_name.as_deref())]);
    table.add_row(vec!["Admin", if user.is_superuser { "yes" } else { "no" }]);
    table.add_row(vec![
        "Token",
        if ctx.stores.auth.check_token_validity(Utc::now()) {
            "valid"
        } else {
            "expired"
        },
    ]);
    println!("{table}");
    Ok(())
}

/// The store already reduced the failure to what the user should read.
fn auth_failure(store: &gstbill_client::stores::AuthStore, err: gstbill_client::ClientError) -> String {
    store
        .status()
        .error()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}
