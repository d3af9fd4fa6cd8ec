pub mod auth;
pub mod company;
pub mod customers;
pub mod invoices;
pub mod products;
pub mod route;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, bail};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use gstbill_client::storage::FileStorage;
use gstbill_client::{ApiClient, ClientConfig, Stores, TracingNotifier};
use gstbill_core::{CustomerId, InvoiceId, InvoiceItemId, ProductId};
use gstbill_invoicing::InvoiceStatus;
use gstbill_parties::CustomerType;
use gstbill_products::Unit;

#[derive(Parser)]
#[command(name = "gstbill", about = "GST billing client: company, masters and invoices.")]
pub struct Cli {
    /// Backend API base URL (overrides GSTBILL_API_BASE_URL)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,
    /// Session file (default: <data dir>/gstbill/session.json)
    #[arg(long = "session-file", global = true)]
    pub session_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in, register, and inspect the session.
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Company and GSTIN setup.
    Company {
        #[command(subcommand)]
        command: CompanyCommands,
    },
    /// Product master.
    Products {
        #[command(subcommand)]
        command: ProductsCommands,
    },
    /// Customer master.
    Customers {
        #[command(subcommand)]
        command: CustomersCommands,
    },
    /// Draft, finalize and print invoices.
    Invoices {
        #[command(subcommand)]
        command: InvoicesCommands,
    },
    /// Show where the app would take you for PATH.
    Route {
        /// Path with optional query, e.g. /invoices?status=DRAFT
        path: String,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Log in and store the session.
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long = "full-name")]
        full_name: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    /// Show the company profile.
    Show,
    /// Create the company profile, or update it with the given fields.
    Save(CompanyArgs),
}

#[derive(Args, Default)]
pub struct CompanyArgs {
    #[arg(long = "legal-name")]
    pub legal_name: Option<String>,
    #[arg(long = "trade-name")]
    pub trade_name: Option<String>,
    #[arg(long)]
    pub gstin: Option<String>,
    #[arg(long)]
    pub pan: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long = "state-code")]
    pub state_code: Option<String>,
    #[arg(long)]
    pub pincode: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long = "bank-name")]
    pub bank_name: Option<String>,
    #[arg(long = "bank-account")]
    pub bank_account_number: Option<String>,
    #[arg(long = "bank-ifsc")]
    pub bank_ifsc: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by name
    #[arg(long)]
    pub search: Option<String>,
    /// Include inactive records
    #[arg(long)]
    pub all: bool,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long = "page-size")]
    pub page_size: Option<u32>,
}

#[derive(Subcommand)]
pub enum ProductsCommands {
    /// List products.
    List(ListArgs),
    /// Show one product.
    Show { id: ProductId },
    /// Add a product.
    Add(ProductArgs),
    /// Change fields of a product.
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Restore a deactivated product.
    Activate { id: ProductId },
    /// Deactivate (soft delete) a product.
    Deactivate { id: ProductId },
}

#[derive(Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub hsn: String,
    /// Unit code (NOS, PCS, KGS, ...)
    #[arg(long, default_value = "NOS")]
    pub unit: Unit,
    /// GST rate in percent (0, 0.25, 3, 5, 12, 18, 28)
    #[arg(long = "gst-rate")]
    pub gst_rate: Decimal,
    #[arg(long)]
    pub price: Decimal,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub hsn: Option<String>,
    #[arg(long)]
    pub unit: Option<Unit>,
    #[arg(long = "gst-rate")]
    pub gst_rate: Option<Decimal>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Subcommand)]
pub enum CustomersCommands {
    /// List customers.
    List(ListArgs),
    /// Show one customer.
    Show { id: CustomerId },
    /// Add a customer.
    Add(CustomerArgs),
    /// Change fields of a customer.
    Update {
        id: CustomerId,
        #[arg(long)]
        name: Option<String>,
        /// B2B or B2C
        #[arg(long = "type")]
        customer_type: Option<CustomerType>,
        #[command(flatten)]
        details: CustomerDetails,
    },
    /// Restore a deactivated customer.
    Activate { id: CustomerId },
    /// Deactivate (soft delete) a customer.
    Deactivate { id: CustomerId },
}

#[derive(Args)]
pub struct CustomerArgs {
    #[arg(long)]
    pub name: String,
    /// B2B or B2C
    #[arg(long = "type", default_value = "B2B")]
    pub customer_type: CustomerType,
    #[command(flatten)]
    pub details: CustomerDetails,
}

#[derive(Args)]
pub struct CustomerDetails {
    #[arg(long)]
    pub gstin: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long = "state-code")]
    pub state_code: Option<String>,
    #[arg(long)]
    pub pincode: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Draft,
    Final,
}

impl From<StatusArg> for InvoiceStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Draft => InvoiceStatus::Draft,
            StatusArg::Final => InvoiceStatus::Final,
        }
    }
}

#[derive(Subcommand)]
pub enum InvoicesCommands {
    /// List invoices.
    List {
        #[arg(long)]
        status: Option<StatusArg>,
        #[arg(long)]
        customer: Option<CustomerId>,
    },
    /// Show an invoice with its lines and totals.
    Show { id: InvoiceId },
    /// Start a draft invoice.
    Create(CreateInvoiceArgs),
    /// Add a line to a draft.
    AddItem {
        id: InvoiceId,
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Change a line of a draft.
    UpdateItem {
        id: InvoiceId,
        item_id: InvoiceItemId,
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Remove a line from a draft.
    RemoveItem { id: InvoiceId, item_id: InvoiceItemId },
    /// Have the backend compute GST for a draft.
    Calculate { id: InvoiceId },
    /// Finalize a draft. This cannot be undone.
    Finalize {
        id: InvoiceId,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Print the document preview.
    Preview { id: InvoiceId },
    /// Download the invoice PDF.
    Pdf {
        id: InvoiceId,
        /// Output file or directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Compute one line locally, without the backend.
    Quote(QuoteArgs),
}

#[derive(Args)]
pub struct CreateInvoiceArgs {
    #[arg(long)]
    pub customer: CustomerId,
    /// Invoice date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Two-digit state code of the place of supply
    #[arg(long = "place-of-supply")]
    pub place_of_supply: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct ItemArgs {
    /// Prefill description, HSN/SAC, unit, rate and price from a product
    #[arg(long)]
    pub product: Option<ProductId>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub hsn: Option<String>,
    #[arg(long)]
    pub quantity: Option<Decimal>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub price: Option<Decimal>,
    #[arg(long)]
    pub discount: Option<Decimal>,
    #[arg(long = "gst-rate")]
    pub gst_rate: Option<Decimal>,
}

#[derive(Args)]
pub struct QuoteArgs {
    #[arg(long)]
    pub quantity: Decimal,
    #[arg(long)]
    pub price: Decimal,
    #[arg(long = "gst-rate")]
    pub gst_rate: Decimal,
    #[arg(long, default_value = "0")]
    pub discount: Decimal,
    /// Supply to another state (IGST instead of CGST + SGST)
    #[arg(long = "inter-state")]
    pub inter_state: bool,
}

/// Everything a command needs: the shared client and the stores on top of it.
pub struct Context {
    pub client: ApiClient,
    pub stores: Stores,
}

impl Context {
    pub fn open(api_url: Option<String>, session_file: Option<PathBuf>) -> anyhow::Result<Self> {
        let mut config = ClientConfig::from_env();
        if let Some(url) = api_url {
            config = config.with_base_url(url);
        }

        let path = match session_file {
            Some(path) => path,
            None => FileStorage::default_path().context("could not determine a data directory")?,
        };
        let storage = FileStorage::open(&path)
            .with_context(|| format!("failed to open session file {}", path.display()))?;
        tracing::debug!(base_url = %config.api_base_url, session = %path.display(), "client configured");

        let client = ApiClient::new(config, Arc::new(storage), Arc::new(TracingNotifier))?;
        let stores = Stores::new(&client);
        Ok(Self { client, stores })
    }

    /// Fail unless there is a usable session; an expired access token is
    /// refreshed first.
    pub async fn require_session(&mut self) -> anyhow::Result<()> {
        let auth = &mut self.stores.auth;
        if !auth.is_authenticated() {
            bail!("not logged in; run `gstbill auth login` first");
        }
        if !auth.check_token_validity(Utc::now()) {
            auth.refresh_access_token()
                .await
                .context("session expired; log in again")?;
        }
        Ok(())
    }
}

pub(crate) fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub(crate) fn active_label(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

pub(crate) fn list_params(args: ListArgs) -> gstbill_client::api::ListParams {
    gstbill_client::api::ListParams {
        search: args.search,
        is_active: (!args.all).then_some(true),
        page: args.page,
        page_size: args.page_size,
    }
}
