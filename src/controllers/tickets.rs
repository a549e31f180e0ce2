//! Maintenance tickets.

use serde_json::json;

use crate::controllers::{id_param, parse_field};
use crate::dispatch::{AppContext, HandlerResult};
use crate::http::error::AppError;
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::maintenance::NewTicket;
use crate::store::models::{TicketPriority, TicketStatus};

pub fn index(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let status = request
        .query("status")
        .map(|s| s.parse::<TicketStatus>().map_err(AppError::BadRequest))
        .transpose()?;

    let tickets: Vec<_> = app
        .store
        .tickets()
        .into_iter()
        .filter(|t| status.map_or(true, |st| t.status == st))
        .collect();
    Ok(Outcome::view("tickets/index", json!({ "tickets": tickets })))
}

pub fn show(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let ticket = app.store.ticket(id_param(params, "id")?)?;
    let shop = app.store.shop(ticket.shop_id)?;
    Ok(Outcome::view("tickets/show", json!({ "ticket": ticket, "shop": shop })))
}

pub fn store(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let priority = match request.field("priority") {
        Some(p) => p.parse::<TicketPriority>().map_err(AppError::BadRequest)?,
        None => TicketPriority::Normal,
    };
    let ticket = app.store.open_ticket(NewTicket {
        shop_id: parse_field(request, "shop_id")?,
        title: request.require("title")?.to_string(),
        description: request.field("description").unwrap_or_default().to_string(),
        priority,
    })?;
    Ok(Outcome::Created(json!(ticket)))
}

pub fn update(app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult {
    let status = request
        .require("status")?
        .parse::<TicketStatus>()
        .map_err(AppError::BadRequest)?;
    let ticket = app.store.move_ticket(id_param(params, "id")?, status)?;
    Ok(Outcome::Json(json!(ticket)))
}
