//! Invoicing and payments.

use serde_json::json;

use crate::controllers::{id_param, parse_field};
use crate::dispatch::{AppContext, HandlerResult};
use crate::http::error::AppError;
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::models::{InvoiceStatus, Period};

/// Invoices, optionally filtered by `?status=`.
pub fn index(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let status = request
        .query("status")
        .map(|s| s.parse::<InvoiceStatus>().map_err(AppError::BadRequest))
        .transpose()?;

    let invoices: Vec<_> = app
        .store
        .invoices()
        .into_iter()
        .filter(|i| status.map_or(true, |st| i.status == st))
        .collect();
    Ok(Outcome::view("invoices/index", json!({ "invoices": invoices })))
}

pub fn show(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let invoice = app.store.invoice(id_param(params, "id")?)?;
    let payments = app.store.payments_for(invoice.id);
    Ok(Outcome::view(
        "invoices/show",
        json!({ "invoice": invoice, "payments": payments }),
    ))
}

/// Bill every active lease for the `period` field (`YYYY-MM`).
pub fn generate(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let period: Period = request
        .require("period")?
        .parse()
        .map_err(AppError::BadRequest)?;

    let created = app.store.generate_invoices(period, &app.terms);
    Ok(Outcome::Json(json!({
        "period": period,
        "created": created.len(),
        "invoices": created.iter().map(|i| i.id).collect::<Vec<_>>(),
    })))
}

/// Record a full payment (`amount_cents`, `method`).
pub fn pay(app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult {
    let id = id_param(params, "id")?;
    let amount: i64 = parse_field(request, "amount_cents")?;
    let method = request.require("method")?;

    let (invoice, payment) = app.store.record_payment(id, amount, method)?;
    tracing::info!(invoice = invoice.id, payment = payment.id, "Payment recorded");
    Ok(Outcome::redirect(format!("/invoices/{}", invoice.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::tests::{app, params};
    use crate::store::leasing::NewApplication;
    use chrono::NaiveDate;

    fn active_lease(app: &AppContext, shop_id: u64) {
        let application = app
            .store
            .submit_application(
                shop_id,
                NewApplication {
                    applicant: "Kim".into(),
                    email: "kim@example.com".into(),
                    business: "Optician".into(),
                },
            )
            .unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let lease = app
            .store
            .approve_application(application.id, start, &app.terms)
            .unwrap();
        app.store.activate_lease(lease.id, &app.terms).unwrap();
    }

    fn generate_for(app: &AppContext, period: &str) -> HandlerResult {
        let request = RequestContext::new("POST", "/invoices/generate").with_field("period", period);
        generate(app, &request, &PathParams::default())
    }

    #[test]
    fn test_generate_counts_new_invoices() {
        let app = app();
        active_lease(&app, 1);
        active_lease(&app, 2);

        let Outcome::Json(body) = generate_for(&app, "2024-02").unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(body["period"], "2024-02");
        assert_eq!(body["created"], 2);

        let Outcome::Json(body) = generate_for(&app, "2024-02").unwrap() else {
            panic!("expected JSON");
        };
        assert_eq!(body["created"], 0);
    }

    #[test]
    fn test_generate_rejects_bad_period() {
        let err = generate_for(&app(), "Feb 2024").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_pay_and_filter() {
        let app = app();
        active_lease(&app, 1);

        let request = RequestContext::new("POST", "/invoices/1/pay")
            .with_field("amount_cents", "250000")
            .with_field("method", "bank_transfer");
        let outcome = pay(&app, &request, &params(&[("id", "1")])).unwrap();
        assert_eq!(outcome, Outcome::redirect("/invoices/1"));

        let request = RequestContext::new("GET", "/invoices").with_query("status=paid");
        let Outcome::View { data, .. } = index(&app, &request, &PathParams::default()).unwrap() else {
            panic!("expected a view");
        };
        assert_eq!(data["invoices"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_pay_rejects_non_numeric_amount() {
        let app = app();
        active_lease(&app, 1);
        let request = RequestContext::new("POST", "/invoices/1/pay")
            .with_field("amount_cents", "lots")
            .with_field("method", "cash");
        let err = pay(&app, &request, &params(&[("id", "1")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
