//! Tenant applications.

use serde_json::json;

use crate::controllers::{date_or_today, id_param};
use crate::dispatch::{AppContext, HandlerResult};
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::leasing::NewApplication;

pub fn index(app: &AppContext, _: &RequestContext, _: &PathParams) -> HandlerResult {
    Ok(Outcome::view(
        "applications/index",
        json!({ "applications": app.store.applications() }),
    ))
}

pub fn show(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let application = app.store.application(id_param(params, "id")?)?;
    let shop = app.store.shop(application.shop_id)?;
    Ok(Outcome::view(
        "applications/show",
        json!({ "application": application, "shop": shop }),
    ))
}

/// Apply for the shop in `{id}`.
pub fn store(app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult {
    let shop_id = id_param(params, "id")?;
    let details = NewApplication {
        applicant: request.require("applicant")?.to_string(),
        email: request.require("email")?.to_string(),
        business: request.field("business").unwrap_or_default().to_string(),
    };

    let application = app.store.submit_application(shop_id, details)?;
    Ok(Outcome::redirect(format!("/applications/{}", application.id)))
}

/// Approve and draft the lease; `start_date` defaults to today.
pub fn approve(app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult {
    let id = id_param(params, "id")?;
    let start = date_or_today(request.field("start_date"), "start_date")?;
    let lease = app.store.approve_application(id, start, &app.terms)?;
    Ok(Outcome::redirect(format!("/leases/{}", lease.id)))
}

pub fn reject(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let application = app.store.reject_application(id_param(params, "id")?)?;
    Ok(Outcome::redirect(format!("/applications/{}", application.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::tests::{app, params};
    use crate::http::error::AppError;
    use crate::store::models::{LeaseStatus, ShopStatus};

    fn apply(app: &AppContext, shop: &str) -> HandlerResult {
        let request = RequestContext::new("POST", format!("/shops/{shop}/applications"))
            .with_field("applicant", "Dana Reyes")
            .with_field("email", "dana@example.com")
            .with_field("business", "Tea house");
        store(app, &request, &params(&[("id", shop)]))
    }

    #[test]
    fn test_store_redirects_to_application() {
        let app = app();
        assert_eq!(apply(&app, "1").unwrap(), Outcome::redirect("/applications/1"));
        assert_eq!(app.store.shop(1).unwrap().status, ShopStatus::Reserved);
    }

    #[test]
    fn test_store_requires_applicant() {
        let app = app();
        let request = RequestContext::new("POST", "/shops/1/applications").with_field("email", "x@y.z");
        let err = store(&app, &request, &params(&[("id", "1")])).unwrap_err();
        assert_eq!(err, AppError::BadRequest("missing field `applicant`".into()));
    }

    #[test]
    fn test_second_application_conflicts() {
        let app = app();
        apply(&app, "2").unwrap();
        assert!(matches!(apply(&app, "2").unwrap_err(), AppError::Conflict(_)));
    }

    #[test]
    fn test_approve_creates_draft_lease() {
        let app = app();
        apply(&app, "1").unwrap();
        let request = RequestContext::new("POST", "/applications/1/approve")
            .with_field("start_date", "2024-04-01");

        let outcome = approve(&app, &request, &params(&[("id", "1")])).unwrap();
        assert_eq!(outcome, Outcome::redirect("/leases/1"));

        let lease = app.store.lease(1).unwrap();
        assert_eq!(lease.status, LeaseStatus::Draft);
        assert_eq!(lease.tenant, "Dana Reyes");
        assert_eq!(lease.monthly_rent_cents, 250_000);

        // Decided applications stay decided.
        let err = reject(&app, &request, &params(&[("id", "1")])).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
