//! Lease lifecycle.

use serde_json::json;

use crate::controllers::{date_or_today, id_param};
use crate::dispatch::{AppContext, HandlerResult};
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;

pub fn index(app: &AppContext, _: &RequestContext, _: &PathParams) -> HandlerResult {
    Ok(Outcome::view("leases/index", json!({ "leases": app.store.leases() })))
}

pub fn show(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let lease = app.store.lease(id_param(params, "id")?)?;
    let shop = app.store.shop(lease.shop_id)?;
    let invoices: Vec<_> = app
        .store
        .invoices()
        .into_iter()
        .filter(|i| i.lease_id == lease.id)
        .collect();
    Ok(Outcome::view(
        "leases/show",
        json!({ "lease": lease, "shop": shop, "invoices": invoices }),
    ))
}

pub fn activate(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let (lease, invoice) = app.store.activate_lease(id_param(params, "id")?, &app.terms)?;
    if let Some(invoice) = &invoice {
        tracing::info!(lease = lease.id, invoice = invoice.id, "Lease activated");
    }
    Ok(Outcome::redirect(format!("/leases/{}", lease.id)))
}

/// End an active lease; `as_of` defaults to today.
pub fn terminate(app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult {
    let as_of = date_or_today(request.field("as_of"), "as_of")?;
    let lease = app.store.terminate_lease(id_param(params, "id")?, as_of)?;
    Ok(Outcome::redirect(format!("/leases/{}", lease.id)))
}

pub fn expire(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let as_of = date_or_today(request.field("as_of"), "as_of")?;
    let expired = app.store.expire_leases(as_of);
    Ok(Outcome::Json(json!({
        "as_of": as_of,
        "expired": expired.iter().map(|l| l.id).collect::<Vec<_>>(),
    })))
}
