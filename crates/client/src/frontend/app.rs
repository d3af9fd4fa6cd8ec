//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use gstbill_auth::{Credentials, RegisterRequest};
use gstbill_core::formatters::{format_currency, format_gstin};
use gstbill_core::{DomainError, InvoiceId, InvoiceItemId};
use gstbill_invoicing::{Invoice, InvoiceItemPayload};

use crate::api::{
    AuthApi, CompanyApi, CustomersApi, InvoiceFilter, InvoicesApi, ListParams, ProductsApi,
};
use crate::forms::{DraftForm, ItemForm};
use crate::router::{self as gate, Navigation, paths};
use crate::stores::{
    AuthStore, CompanyStore, CustomersStore, InvoicesStore, ProductsStore, Status,
};
use crate::{ApiClient, ClientError};

/// Shared by every page.
#[derive(Clone)]
struct AppContext {
    client: ApiClient,
    authenticated: RwSignal<bool>,
}

impl AppContext {
    /// A session store loaded from browser storage.
    fn auth_store(&self) -> AuthStore {
        let mut store = AuthStore::new(
            AuthApi::new(self.client.clone()),
            self.client.storage().clone(),
        );
        store.init();
        store
    }
}

#[component]
pub fn App(client: ApiClient) -> impl IntoView {
    let ctx = AppContext {
        client,
        authenticated: create_rw_signal(false),
    };
    ctx.authenticated.set(ctx.auth_store().is_authenticated());
    provide_context(ctx);

    view! {
        <Router>
            <Routes>
                <Route path=paths::LOGIN view=LoginPage/>
                <Route path=paths::REGISTER view=RegisterPage/>
                <Route path=paths::DASHBOARD view=HomePage/>
                <Route path=paths::INVOICES view=InvoicesPage/>
                <Route path=paths::INVOICE_CREATE view=InvoiceCreatePage/>
                <Route path=paths::INVOICE_EDIT view=InvoiceEditPage/>
                <Route path=paths::INVOICE_PREVIEW view=InvoicePreviewPage/>
                <Route path=paths::PRODUCTS view=ProductsPage/>
                <Route path=paths::CUSTOMERS view=CustomersPage/>
                <Route path=paths::COMPANY view=CompanyPage/>
                <Route path="/*any" view=NotFoundPage/>
            </Routes>
        </Router>
    }
}

/// Path plus query, the form the route gate works on.
fn target_of(path: String, search: String) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        path
    } else {
        format!("{path}?{search}")
    }
}

/// Renders `children` only when the route gate lets the navigation through;
/// otherwise navigates to where the gate points.
/// The store's recorded message, else the error itself.
fn failure(status: &Status, err: &ClientError) -> String {
    status
        .error()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

#[component]
fn Guarded(children: ChildrenFn) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let location = use_location();
    let navigate = use_navigate();

    let decision = create_memo(move |_| {
        let target = target_of(location.pathname.get(), location.search.get());
        gate::guard(&target, ctx.authenticated.get())
    });

    create_effect(move |_| match decision.get() {
        Navigation::Proceed(route) => document().set_title(&route.document_title()),
        Navigation::Redirect(to) => navigate(&to, Default::default()),
    });

    move || matches!(decision.get(), Navigation::Proceed(_)).then(|| children())
}

#[component]
fn Shell(title: &'static str, children: Children) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let navigate = use_navigate();

    let logout = move |_| {
        let ctx = ctx.clone();
        let navigate = navigate.clone();
        spawn_local(async move {
            ctx.auth_store().logout().await;
            ctx.authenticated.set(false);
            navigate(gate::LOGIN_PATH, Default::default());
        });
    };

    view! {
        <div class="app">
            <header>
                <h1>{gate::APP_TITLE}</h1>
                <nav>
                    <A href=paths::INVOICES>"Invoices"</A>
                    <A href=paths::PRODUCTS>"Products"</A>
                    <A href=paths::CUSTOMERS>"Customers"</A>
                    <A href=paths::COMPANY>"Company"</A>
                    <button on:click=logout>"Logout"</button>
                </nav>
            </header>
            <main>
                <h2>{title}</h2>
                {children()}
            </main>
        </div>
    }
}

#[component]
fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let navigate = use_navigate();
    let location = use_location();
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }
        submitting.set(true);
        let ctx = ctx.clone();
        let navigate = navigate.clone();
        let target = target_of(
            location.pathname.get_untracked(),
            location.search.get_untracked(),
        );
        let credentials = Credentials::new(email.get(), password.get());

        spawn_local(async move {
            let mut store = ctx.auth_store();
            match store.login(&credentials).await {
                Ok(_) => {
                    error.set(None);
                    ctx.authenticated.set(true);
                    navigate(&gate::post_login_target(&target), Default::default());
                }
                Err(err) => error.set(Some(failure(store.status(), &err))),
            }
            submitting.set(false);
        });
    };

    view! {
        <Guarded>
            <div class="login">
                <h1>{gate::APP_TITLE}</h1>
                <form on:submit=submit>
                    <label for="email">"Email"</label>
                    <input
                        type="email"
                        id="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label for="password">"Password"</label>
                    <input
                        type="password"
                        id="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
                    <button type="submit" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Logging in..." } else { "Login" }}
                    </button>
                </form>
                <A href=paths::REGISTER>"Create an account"</A>
            </div>
        </Guarded>
    }
}

#[component]
fn RegisterPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let navigate = use_navigate();
    let full_name = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }
        submitting.set(true);
        let ctx = ctx.clone();
        let navigate = navigate.clone();
        let name = full_name.get();
        let request = RegisterRequest {
            email: email.get().trim().to_string(),
            password: password.get(),
            full_name: (!name.trim().is_empty()).then(|| name.trim().to_string()),
        };

        spawn_local(async move {
            let mut store = ctx.auth_store();
            match store.register(&request).await {
                Ok(_) => {
                    error.set(None);
                    navigate(gate::LOGIN_PATH, Default::default());
                }
                Err(err) => error.set(Some(failure(store.status(), &err))),
            }
            submitting.set(false);
        });
    };

    view! {
        <Guarded>
            <div class="login">
                <h1>{gate::APP_TITLE}</h1>
                <form on:submit=submit>
                    <label for="full_name">"Full name"</label>
                    <input
                        type="text"
                        id="full_name"
                        prop:value=move || full_name.get()
                        on:input=move |ev| full_name.set(event_target_value(&ev))
                    />
                    <label for="email">"Email"</label>
                    <input
                        type="email"
                        id="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label for="password">"Password"</label>
                    <input
                        type="password"
                        id="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
                    <button type="submit" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Registering..." } else { "Register" }}
                    </button>
                </form>
                <A href=paths::LOGIN>"Already registered? Log in"</A>
            </div>
        </Guarded>
    }
}

/// Only ever seen briefly: the gate sends `/` on to the invoice list.
#[component]
fn HomePage() -> impl IntoView {
    view! {
        <Guarded>
            <p>"Loading..."</p>
        </Guarded>
    }
}

#[component]
fn InvoicesPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let invoices = create_local_resource(
        || (),
        move |_| {
            let client = ctx.client.clone();
            async move {
                let mut store = InvoicesStore::new(InvoicesApi::new(client));
                store
                    .fetch_all(&InvoiceFilter::default())
                    .await
                    .map(|()| store.invoices().to_vec())
                    .map_err(|e| e.to_string())
            }
        },
    );

    view! {
        <Guarded>
            <Shell title="Invoices">
                <A href=paths::INVOICE_CREATE>"New invoice"</A>
                {move || invoices.get().map(|result| match result {
                    Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                    Ok(items) if items.is_empty() => view! { <p>"No invoices yet."</p> }.into_view(),
                    Ok(items) => view! {
                        <table>
                            <thead>
                                <tr>
                                    <th>"Number"</th>
                                    <th>"Date"</th>
                                    <th>"Customer"</th>
                                    <th>"Status"</th>
                                    <th>"Total"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                {items.iter().map(|inv| view! {
                                    <tr>
                                        <td>{inv.label()}</td>
                                        <td>{inv.invoice_date.format("%d %b %Y").to_string()}</td>
                                        <td>{inv.customer_name.clone().unwrap_or_default()}</td>
                                        <td>{inv.status.as_str()}</td>
                                        <td>{format_currency(Some(inv.grand_total))}</td>
                                        <td>
                                            {inv.is_editable().then(|| view! {
                                                <A href=gate::Route::InvoiceEdit(inv.id).path()>"Edit"</A>
                                            })}
                                            <A href=gate::Route::InvoicePreview(inv.id).path()>"Preview"</A>
                                        </td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view(),
                })}
            </Shell>
        </Guarded>
    }
}

#[component]
fn InvoiceCreatePage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let navigate = use_navigate();
    let form = create_rw_signal(DraftForm {
        invoice_date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        ..Default::default()
    });
    let error = create_rw_signal(None::<String>);
    let submitting = create_rw_signal(false);

    let client = ctx.client.clone();
    let customers = create_local_resource(
        || (),
        move |_| {
            let client = client.clone();
            async move {
                let mut store = CustomersStore::new(CustomersApi::new(client));
                store
                    .fetch(&ListParams::default())
                    .await
                    .map(|()| store.active().cloned().collect::<Vec<_>>())
                    .map_err(|e| e.to_string())
            }
        },
    );

    // Picking a customer proposes their state as the place of supply.
    let pick_customer = move |ev: ev::Event| {
        let id = event_target_value(&ev);
        let state = customers.with(|loaded| {
            loaded
                .as_ref()
                .and_then(|r| r.as_ref().ok())
                .and_then(|list| list.iter().find(|c| c.id.to_string() == id))
                .and_then(|c| c.state_code().map(str::to_string))
        });
        form.update(|f| {
            f.customer_id = id;
            if let Some(code) = state {
                f.place_of_supply = code;
            }
        });
    };

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get() {
            return;
        }
        let payload = match form.get_untracked().to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                error.set(Some(err.to_string()));
                return;
            }
        };
        submitting.set(true);
        let client = ctx.client.clone();
        let navigate = navigate.clone();

        spawn_local(async move {
            let mut store = InvoicesStore::new(InvoicesApi::new(client));
            match store.create(&payload).await {
                Ok(invoice) => {
                    error.set(None);
                    navigate(&gate::Route::InvoiceEdit(invoice.id).path(), Default::default());
                }
                Err(err) => error.set(Some(failure(store.status(), &err))),
            }
            submitting.set(false);
        });
    };

    view! {
        <Guarded>
            <Shell title="Create Invoice">
                <form on:submit=submit>
                    <label for="customer">"Customer"</label>
                    {move || customers.get().map(|result| match result {
                        Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                        Ok(list) => view! {
                            <select id="customer" on:change=pick_customer>
                                <option value="">"Select a customer"</option>
                                {list.into_iter().map(|c| view! {
                                    <option value=c.id.to_string()>{c.name}</option>
                                }).collect_view()}
                            </select>
                        }.into_view(),
                    })}
                    <label for="invoice_date">"Invoice date"</label>
                    <input
                        type="date"
                        id="invoice_date"
                        prop:value=move || form.with(|f| f.invoice_date.clone())
                        on:input=move |ev| form.update(|f| f.invoice_date = event_target_value(&ev))
                    />
                    <label for="place_of_supply">"Place of supply (state code)"</label>
                    <input
                        type="text"
                        id="place_of_supply"
                        maxlength="2"
                        prop:value=move || form.with(|f| f.place_of_supply.clone())
                        on:input=move |ev| form.update(|f| f.place_of_supply = event_target_value(&ev))
                    />
                    <label for="notes">"Notes"</label>
                    <textarea
                        id="notes"
                        prop:value=move || form.with(|f| f.notes.clone())
                        on:input=move |ev| form.update(|f| f.notes = event_target_value(&ev))
                    ></textarea>
                    {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
                    <button type="submit" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Creating..." } else { "Create draft" }}
                    </button>
                </form>
            </Shell>
        </Guarded>
    }
}

/// What the edit page asks of the invoice store.
#[derive(Debug, Clone)]
enum EditAction {
    Load,
    AddItem(InvoiceItemPayload),
    RemoveItem(InvoiceItemId),
    CalculateTax,
    Finalize,
}

/// Run one edit against a fresh store. The invoice is loaded first so the
/// store's draft checks see its real status.
async fn apply_edit(client: ApiClient, id: InvoiceId, action: EditAction) -> Result<Invoice, String> {
    let mut store = InvoicesStore::new(InvoicesApi::new(client));
    let result = async {
        let loaded = store.fetch(id).await?;
        match action {
            EditAction::Load => Ok(loaded),
            EditAction::AddItem(item) => store.add_item(id, &item).await,
            EditAction::RemoveItem(item_id) => store.remove_item(id, item_id).await,
            EditAction::CalculateTax => {
                store.calculate_tax(id).await?;
                store
                    .current()
                    .cloned()
                    .ok_or_else(|| ClientError::Domain(DomainError::not_found()))
            }
            EditAction::Finalize => store.finalize(id).await,
        }
    }
    .await;
    result.map_err(|err| failure(store.status(), &err))
}

#[component]
fn InvoiceEditPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let params = use_params_map();
    let invoice = create_rw_signal(None::<Invoice>);
    let item = create_rw_signal(ItemForm::default());
    let error = create_rw_signal(None::<String>);
    let busy = create_rw_signal(false);

    let invoice_id = create_memo(move |_| {
        params.with(|p| p.get("id").and_then(|id| id.parse::<InvoiceId>().ok()))
    });

    let run = {
        let client = ctx.client.clone();
        move |action: EditAction| {
            let Some(id) = invoice_id.get_untracked() else {
                error.set(Some("Invalid invoice id".into()));
                return;
            };
            let client = client.clone();
            let added = matches!(action, EditAction::AddItem(_));
            busy.set(true);
            spawn_local(async move {
                match apply_edit(client, id, action).await {
                    Ok(updated) => {
                        invoice.set(Some(updated));
                        error.set(None);
                        if added {
                            item.set(ItemForm::default());
                        }
                    }
                    Err(message) => error.set(Some(message)),
                }
                busy.set(false);
            });
        }
    };

    let load = run.clone();
    // Reload whenever the route parameter changes.
    create_effect(move |_| {
        invoice_id.get();
        load(EditAction::Load);
    });

    let add = {
        let run = run.clone();
        move |ev: ev::SubmitEvent| {
            ev.prevent_default();
            match item.get_untracked().to_payload() {
                Ok(payload) => run(EditAction::AddItem(payload)),
                Err(err) => error.set(Some(err.to_string())),
            }
        }
    };
    let calculate = {
        let run = run.clone();
        move |_| run(EditAction::CalculateTax)
    };
    let finalize = {
        let run = run.clone();
        move |_| run(EditAction::Finalize)
    };

    let lines = move || {
        let run = run.clone();
        invoice.get().map(|inv| {
            let editable = inv.is_editable();
            view! {
                <p>{inv.label()} " - " {inv.status.as_str()}</p>
                <table>
                    <thead>
                        <tr>
                            <th>"Description"</th>
                            <th>"HSN/SAC"</th>
                            <th>"Qty"</th>
                            <th>"Rate"</th>
                            <th>"GST %"</th>
                            <th>"Total"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        {inv.items.iter().map(|line| {
                            let run = run.clone();
                            let item_id = line.id;
                            view! {
                                <tr>
                                    <td>{line.description.clone()}</td>
                                    <td>{line.hsn_sac.clone().unwrap_or_default()}</td>
                                    <td>{line.quantity.normalize().to_string()}</td>
                                    <td>{format_currency(Some(line.unit_price))}</td>
                                    <td>{line.gst_rate.normalize().to_string()}</td>
                                    <td>{format_currency(Some(line.total))}</td>
                                    <td>
                                        {editable.then(|| view! {
                                            <button
                                                disabled=move || busy.get()
                                                on:click=move |_| run(EditAction::RemoveItem(item_id))
                                            >
                                                "Remove"
                                            </button>
                                        })}
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
                <table class="totals">
                    <tr><td>"Subtotal"</td><td>{format_currency(Some(inv.subtotal))}</td></tr>
                    <tr><td>"CGST"</td><td>{format_currency(Some(inv.cgst_amount))}</td></tr>
                    <tr><td>"SGST"</td><td>{format_currency(Some(inv.sgst_amount))}</td></tr>
                    <tr><td>"IGST"</td><td>{format_currency(Some(inv.igst_amount))}</td></tr>
                    <tr><td>"Grand total"</td><td>{format_currency(Some(inv.grand_total))}</td></tr>
                </table>
                <A href=gate::Route::InvoicePreview(inv.id).path()>"Preview"</A>
            }
            .into_view()
        })
    };

    let editable = move || invoice.with(|inv| inv.as_ref().is_some_and(Invoice::is_editable));

    view! {
        <Guarded>
            <Shell title="Edit Invoice">
                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
                {lines}
                <Show when=editable>
                    <form on:submit=add.clone()>
                        <h3>"Add item"</h3>
                        <label for="description">"Description"</label>
                        <input
                            type="text"
                            id="description"
                            prop:value=move || item.with(|f| f.description.clone())
                            on:input=move |ev| item.update(|f| f.description = event_target_value(&ev))
                        />
                        <label for="hsn_sac">"HSN/SAC"</label>
                        <input
                            type="text"
                            id="hsn_sac"
                            prop:value=move || item.with(|f| f.hsn_sac.clone())
                            on:input=move |ev| item.update(|f| f.hsn_sac = event_target_value(&ev))
                        />
                        <label for="quantity">"Quantity"</label>
                        <input
                            type="text"
                            id="quantity"
                            prop:value=move || item.with(|f| f.quantity.clone())
                            on:input=move |ev| item.update(|f| f.quantity = event_target_value(&ev))
                        />
                        <label for="unit">"Unit"</label>
                        <input
                            type="text"
                            id="unit"
                            prop:value=move || item.with(|f| f.unit.clone())
                            on:input=move |ev| item.update(|f| f.unit = event_target_value(&ev))
                        />
                        <label for="unit_price">"Unit price"</label>
                        <input
                            type="text"
                            id="unit_price"
                            prop:value=move || item.with(|f| f.unit_price.clone())
                            on:input=move |ev| item.update(|f| f.unit_price = event_target_value(&ev))
                        />
                        <label for="discount">"Discount"</label>
                        <input
                            type="text"
                            id="discount"
                            prop:value=move || item.with(|f| f.discount.clone())
                            on:input=move |ev| item.update(|f| f.discount = event_target_value(&ev))
                        />
                        <label for="gst_rate">"GST %"</label>
                        <input
                            type="text"
                            id="gst_rate"
                            prop:value=move || item.with(|f| f.gst_rate.clone())
                            on:input=move |ev| item.update(|f| f.gst_rate = event_target_value(&ev))
                        />
                        <button type="submit" disabled=move || busy.get()>"Add item"</button>
                    </form>
                    <div class="actions">
                        <button disabled=move || busy.get() on:click=calculate.clone()>"Calculate tax"</button>
                        <button disabled=move || busy.get() on:click=finalize.clone()>"Finalize"</button>
                    </div>
                </Show>
            </Shell>
        </Guarded>
    }
}

#[component]
fn InvoicePreviewPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let params = use_params_map();
    let invoice_id = move || {
        params
            .get()
            .get("id")
            .and_then(|id| id.parse::<InvoiceId>().ok())
    };

    let preview = create_local_resource(invoice_id, move |id| {
        let client = ctx.client.clone();
        async move {
            let id = id.ok_or_else(|| "Invalid invoice id".to_string())?;
            let mut store = InvoicesStore::new(InvoicesApi::new(client));
            store
                .fetch_preview(id)
                .await
                .cloned()
                .map_err(|e| e.to_string())
        }
    });

    view! {
        <Guarded>
            <Shell title="Invoice Preview">
                {move || preview.get().map(|result| match result {
                    Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                    Ok(doc) => {
                        let taxes = doc.tax_breakdown();
                        let tax_rows = if taxes.is_inter_state() {
                            view! {
                                <tr><td>"IGST"</td><td>{format_currency(Some(taxes.igst.amount))}</td></tr>
                            }.into_view()
                        } else {
                            view! {
                                <tr><td>"CGST"</td><td>{format_currency(Some(taxes.cgst.amount))}</td></tr>
                                <tr><td>"SGST"</td><td>{format_currency(Some(taxes.sgst.amount))}</td></tr>
                            }.into_view()
                        };
                        view! {
                            <div class="invoice-preview">
                                <p>
                                    "Invoice " {doc.invoice_number.clone().unwrap_or_default()}
                                    " dated " {doc.invoice_date.format("%d %b %Y").to_string()}
                                </p>
                                <div class="parties">
                                    <div>
                                        <h3>"Seller"</h3>
                                        <p>{doc.seller.name.clone()}</p>
                                        <p>"GSTIN: " {format_gstin(doc.seller.gstin.as_deref())}</p>
                                    </div>
                                    <div>
                                        <h3>"Buyer"</h3>
                                        <p>{doc.buyer.name.clone()}</p>
                                        <p>"GSTIN: " {format_gstin(doc.buyer.gstin.as_deref())}</p>
                                    </div>
                                </div>
                                <table>
                                    <thead>
                                        <tr>
                                            <th>"Description"</th>
                                            <th>"HSN/SAC"</th>
                                            <th>"Qty"</th>
                                            <th>"Rate"</th>
                                            <th>"GST %"</th>
                                            <th>"Total"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {doc.items.iter().map(|item| view! {
                                            <tr>
                                                <td>{item.description.clone()}</td>
                                                <td>{item.hsn_sac.clone().unwrap_or_default()}</td>
                                                <td>{item.quantity.normalize().to_string()}</td>
                                                <td>{format_currency(Some(item.unit_price))}</td>
                                                <td>{item.gst_rate.normalize().to_string()}</td>
                                                <td>{format_currency(Some(item.total))}</td>
                                            </tr>
                                        }).collect_view()}
                                    </tbody>
                                </table>
                                <table class="totals">
                                    <tr><td>"Taxable amount"</td><td>{format_currency(Some(doc.taxable_amount))}</td></tr>
                                    {tax_rows}
                                    <tr><td>"Grand total"</td><td>{format_currency(Some(doc.grand_total))}</td></tr>
                                </table>
                                <p class="in-words">{doc.amount_in_words()}</p>
                            </div>
                        }.into_view()
                    }
                })}
            </Shell>
        </Guarded>
    }
}

#[component]
fn ProductsPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let products = create_local_resource(
        || (),
        move |_| {
            let client = ctx.client.clone();
            async move {
                let mut store = ProductsStore::new(ProductsApi::new(client));
                store
                    .fetch(&ListParams::default())
                    .await
                    .map(|()| store.products().to_vec())
                    .map_err(|e| e.to_string())
            }
        },
    );

    view! {
        <Guarded>
            <Shell title="Product Master">
                {move || products.get().map(|result| match result {
                    Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                    Ok(items) => view! {
                        <table>
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"HSN/SAC"</th>
                                    <th>"Unit"</th>
                                    <th>"GST %"</th>
                                    <th>"Price"</th>
                                    <th>"Status"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {items.iter().map(|p| view! {
                                    <tr>
                                        <td>{p.name.clone()}</td>
                                        <td>{p.hsn_sac.clone()}</td>
                                        <td>{p.unit.clone()}</td>
                                        <td>{p.gst_rate.normalize().to_string()}</td>
                                        <td>{format_currency(Some(p.price))}</td>
                                        <td>{if p.is_active { "Active" } else { "Inactive" }}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view(),
                })}
            </Shell>
        </Guarded>
    }
}

#[component]
fn CustomersPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let customers = create_local_resource(
        || (),
        move |_| {
            let client = ctx.client.clone();
            async move {
                let mut store = CustomersStore::new(CustomersApi::new(client));
                store
                    .fetch(&ListParams::default())
                    .await
                    .map(|()| store.customers().to_vec())
                    .map_err(|e| e.to_string())
            }
        },
    );

    view! {
        <Guarded>
            <Shell title="Customer Master">
                {move || customers.get().map(|result| match result {
                    Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                    Ok(items) => view! {
                        <table>
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Type"</th>
                                    <th>"GSTIN"</th>
                                    <th>"State"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {items.iter().map(|c| view! {
                                    <tr>
                                        <td>{c.name.clone()}</td>
                                        <td>{c.customer_type.as_str()}</td>
                                        <td>{format_gstin(c.gstin.as_deref())}</td>
                                        <td>{c.state.clone().unwrap_or_default()}</td>
                                    </tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    }.into_view(),
                })}
            </Shell>
        </Guarded>
    }
}

#[component]
fn CompanyPage() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let company = create_local_resource(
        || (),
        move |_| {
            let client = ctx.client.clone();
            async move {
                let mut store = CompanyStore::new(CompanyApi::new(client));
                store
                    .fetch()
                    .await
                    .map(|c| c.cloned())
                    .map_err(|e| e.to_string())
            }
        },
    );

    view! {
        <Guarded>
            <Shell title="Company & GSTIN Setup">
                {move || company.get().map(|result| match result {
                    Err(e) => view! { <p class="error">{e}</p> }.into_view(),
                    Ok(None) => view! {
                        <p>"No company profile yet. Set one up to start invoicing."</p>
                    }.into_view(),
                    Ok(Some(c)) => view! {
                        <dl>
                            <dt>"Legal name"</dt><dd>{c.legal_name.clone()}</dd>
                            <dt>"GSTIN"</dt><dd>{format_gstin(c.gstin.as_deref())}</dd>
                            <dt>"State"</dt><dd>{c.state_name().unwrap_or("-")}</dd>
                            <dt>"Address"</dt><dd>{c.address.clone().unwrap_or_default()}</dd>
                        </dl>
                    }.into_view(),
                })}
            </Shell>
        </Guarded>
    }
}

#[component]
fn NotFoundPage() -> impl IntoView {
    create_effect(|_| document().set_title(&gate::Route::NotFound(String::new()).document_title()));
    view! {
        <div class="not-found">
            <h1>"Page Not Found"</h1>
            <A href=gate::HOME_PATH>"Back to invoices"</A>
        </div>
    }
}
