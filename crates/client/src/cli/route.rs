use gstbill_client::router::{Navigation, Route, guard};

use super::Context;

/// Resolve `path` the way the browser app would for the current session.
pub fn run(ctx: &Context, path: &str) -> anyhow::Result<()> {
    let authenticated = ctx.stores.auth.is_authenticated();
    match guard(path, authenticated) {
        Navigation::Proceed(route) => {
            println!("{} -> {}", path, route.name());
            println!("Title: {}", route.document_title());
        }
        Navigation::Redirect(to) => {
            let target = Route::parse(&to);
            println!("{path} redirects to {to} ({})", target.name());
            println!("Title: {}", target.document_title());
        }
    }
    Ok(())
}
