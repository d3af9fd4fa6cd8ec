#[cfg(not(target_arch = "wasm32"))]
mod cli;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() {
    use clap::Parser;
    use cli::{
        AuthCommands, Cli, Commands, CompanyCommands, CustomersCommands, InvoicesCommands,
        ProductsCommands,
    };

    gstbill_observability::init();
    let cli = Cli::parse();

    let mut ctx = match cli::Context::open(cli.api_url, cli.session_file) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Auth { command } => match command {
            AuthCommands::Login { email } => cli::auth::login(&mut ctx, email).await,
            AuthCommands::Register { email, full_name } => {
                cli::auth::register(&mut ctx, email, full_name).await
            }
            AuthCommands::Logout => cli::auth::logout(&mut ctx).await,
            AuthCommands::Whoami => cli::auth::whoami(&mut ctx).await,
        },
        Commands::Company { command } => match command {
            CompanyCommands::Show => cli::company::show(&mut ctx).await,
            CompanyCommands::Save(args) => cli::company::save(&mut ctx, args).await,
        },
        Commands::Products { command } => match command {
            ProductsCommands::List(args) => cli::products::list(&mut ctx, args).await,
            ProductsCommands::Show { id } => cli::products::show(&mut ctx, id).await,
            ProductsCommands::Add(args) => cli::products::add(&mut ctx, args).await,
            ProductsCommands::Update { id, fields } => {
                cli::products::update(&mut ctx, id, fields).await
            }
            ProductsCommands::Activate { id } => cli::products::set_status(&mut ctx, id, true).await,
            ProductsCommands::Deactivate { id } => {
                cli::products::set_status(&mut ctx, id, false).await
            }
        },
        Commands::Customers { command } => match command {
            CustomersCommands::List(args) => cli::customers::list(&mut ctx, args).await,
            CustomersCommands::Show { id } => cli::customers::show(&mut ctx, id).await,
            CustomersCommands::Add(args) => cli::customers::add(&mut ctx, args).await,
            CustomersCommands::Update {
                id,
                name,
                customer_type,
                details,
            } => cli::customers::update(&mut ctx, id, name, customer_type, details).await,
            CustomersCommands::Activate { id } => {
                cli::customers::set_status(&mut ctx, id, true).await
            }
            CustomersCommands::Deactivate { id } => {
                cli::customers::set_status(&mut ctx, id, false).await
            }
        },
        Commands::Invoices { command } => match command {
            InvoicesCommands::List { status, customer } => {
                cli::invoices::list(&mut ctx, status, customer).await
            }
            InvoicesCommands::Show { id } => cli::invoices::show(&mut ctx, id).await,
            InvoicesCommands::Create(args) => cli::invoices::create(&mut ctx, args).await,
            InvoicesCommands::AddItem { id, item } => {
                cli::invoices::add_item(&mut ctx, id, item).await
            }
            InvoicesCommands::UpdateItem { id, item_id, item } => {
                cli::invoices::update_item(&mut ctx, id, item_id, item).await
            }
            InvoicesCommands::RemoveItem { id, item_id } => {
                cli::invoices::remove_item(&mut ctx, id, item_id).await
            }
            InvoicesCommands::Calculate { id } => cli::invoices::calculate(&mut ctx, id).await,
            InvoicesCommands::Finalize { id, yes } => {
                cli::invoices::finalize(&mut ctx, id, yes).await
            }
            InvoicesCommands::Preview { id } => cli::invoices::preview(&mut ctx, id).await,
            InvoicesCommands::Pdf { id, out } => cli::invoices::pdf(&mut ctx, id, out).await,
            InvoicesCommands::Quote(args) => cli::invoices::quote(args),
        },
        Commands::Route { path } => cli::route::run(&ctx, &path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
