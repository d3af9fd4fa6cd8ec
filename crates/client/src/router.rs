//! Route table and the authentication gate in front of it.

use gstbill_core::InvoiceId;

pub const APP_TITLE: &str = "GST Billing";
pub const LOGIN_PATH: &str = paths::LOGIN;
pub const HOME_PATH: &str = paths::INVOICES;

/// Route patterns as the browser router declares them (`:id` is a segment
/// parameter).
pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const DASHBOARD: &str = "/";
    pub const COMPANY: &str = "/company";
    pub const PRODUCTS: &str = "/products";
    pub const CUSTOMERS: &str = "/customers";
    pub const INVOICES: &str = "/invoices";
    pub const INVOICE_CREATE: &str = "/invoices/create";
    pub const INVOICE_EDIT: &str = "/invoices/:id/edit";
    pub const INVOICE_PREVIEW: &str = "/invoices/:id/preview";

    pub const ALL: [&str; 10] = [
        LOGIN,
        REGISTER,
        DASHBOARD,
        COMPANY,
        PRODUCTS,
        CUSTOMERS,
        INVOICES,
        INVOICE_CREATE,
        INVOICE_EDIT,
        INVOICE_PREVIEW,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    /// `/`, which only redirects to the invoice list.
    Dashboard,
    CompanySetup,
    Products,
    Customers,
    Invoices,
    InvoiceCreate,
    InvoiceEdit(InvoiceId),
    InvoicePreview(InvoiceId),
    NotFound(String),
}

impl Route {
    /// Resolve a path (query string and trailing slash ignored).
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Dashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["company"] => Route::CompanySetup,
            ["products"] => Route::Products,
            ["customers"] => Route::Customers,
            ["invoices"] => Route::Invoices,
            ["invoices", "create"] => Route::InvoiceCreate,
            ["invoices", id, "edit"] => id
                .parse()
                .map(Route::InvoiceEdit)
                .unwrap_or_else(|_| Route::NotFound(path.to_string())),
            ["invoices", id, "preview"] => id
                .parse()
                .map(Route::InvoicePreview)
                .unwrap_or_else(|_| Route::NotFound(path.to_string())),
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => paths::REGISTER.to_string(),
            Route::Dashboard => paths::DASHBOARD.to_string(),
            Route::CompanySetup => paths::COMPANY.to_string(),
            Route::Products => paths::PRODUCTS.to_string(),
            Route::Customers => paths::CUSTOMERS.to_string(),
            Route::Invoices => paths::INVOICES.to_string(),
            Route::InvoiceCreate => paths::INVOICE_CREATE.to_string(),
            Route::InvoiceEdit(id) => format!("/invoices/{id}/edit"),
            Route::InvoicePreview(id) => format!("/invoices/{id}/preview"),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::Register => "register",
            Route::Dashboard => "dashboard",
            Route::CompanySetup => "company-setup",
            Route::Products => "products",
            Route::Customers => "customers",
            Route::Invoices => "invoices",
            Route::InvoiceCreate => "invoice-create",
            Route::InvoiceEdit(_) => "invoice-edit",
            Route::InvoicePreview(_) => "invoice-preview",
            Route::NotFound(_) => "not-found",
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            Route::Login => Some("Login"),
            Route::Register => Some("Register"),
            Route::Dashboard => None,
            Route::CompanySetup => Some("Company & GSTIN Setup"),
            Route::Products => Some("Product Master"),
            Route::Customers => Some("Customer Master"),
            Route::Invoices => Some("Invoices"),
            Route::InvoiceCreate => Some("Create Invoice"),
            Route::InvoiceEdit(_) => Some("Edit Invoice"),
            Route::InvoicePreview(_) => Some("Invoice Preview"),
            Route::NotFound(_) => Some("Page Not Found"),
        }
    }

    /// `"<title> | GST Billing"`, or just the app name for untitled routes.
    pub fn document_title(&self) -> String {
        match self.title() {
            Some(title) => format!("{title} | {APP_TITLE}"),
            None => APP_TITLE.to_string(),
        }
    }

    /// Reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register | Route::NotFound(_))
    }

    /// Static redirect attached to the route itself.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Route::Dashboard => Some(Route::Invoices),
            _ => None,
        }
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed(Route),
    /// Go here instead (path with query).
    Redirect(String),
}

/// Decide what happens when navigating to `target` (path plus optional
/// query).
///
/// - Without a session, any non-public route goes to
///   `/login?redirect=<target>`.
/// - With a session, the login and register pages forward to the `redirect`
///   query parameter when it is a local path, else to the invoice list.
/// - `/` forwards to the invoice list.
pub fn guard(target: &str, authenticated: bool) -> Navigation {
    let route = Route::parse(target);

    if !route.is_public() && !authenticated {
        return Navigation::Redirect(login_redirect(target));
    }

    if authenticated && matches!(route, Route::Login | Route::Register) {
        return Navigation::Redirect(post_login_target(target));
    }

    match route.redirect() {
        Some(next) => Navigation::Redirect(next.path()),
        None => Navigation::Proceed(route),
    }
}

/// `/login?redirect=<encoded target>`.
pub fn login_redirect(target: &str) -> String {
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(target))
}

/// Where to go after logging in, read from the `redirect` query parameter of
/// the login URL. Anything that is not a local absolute path is ignored.
pub fn post_login_target(login_url: &str) -> String {
    query_param(login_url, "redirect")
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .filter(|path| !matches!(Route::parse(path), Route::Login | Route::Register))
        .unwrap_or_else(|| HOME_PATH.to_string())
}

fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key != name {
            return None;
        }
        let value = value.replace('+', " ");
        urlencoding::decode(&value).ok().map(|v| v.into_owned())
    })
}
