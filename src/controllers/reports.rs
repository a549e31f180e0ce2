//! Occupancy, receivables and audit reports.

use serde_json::json;

use crate::controllers::date_or_today;
use crate::dispatch::{AppContext, HandlerResult};
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::models::{InvoiceStatus, ShopStatus};

pub fn occupancy(app: &AppContext, _: &RequestContext, _: &PathParams) -> HandlerResult {
    let shops = app.store.shops();
    let count = |status: ShopStatus| shops.iter().filter(|s| s.status == status).count();

    let total = shops.len();
    let leased = count(ShopStatus::Leased);
    let leased_area: u64 = shops
        .iter()
        .filter(|s| s.status == ShopStatus::Leased)
        .map(|s| u64::from(s.area_sqm))
        .sum();
    let total_area: u64 = shops.iter().map(|s| u64::from(s.area_sqm)).sum();

    Ok(Outcome::view(
        "reports/occupancy",
        json!({
            "total": total,
            "leased": leased,
            "reserved": count(ShopStatus::Reserved),
            "available": count(ShopStatus::Available),
            "occupancy_rate": ratio(leased as u64, total as u64),
            "area_occupancy_rate": ratio(leased_area, total_area),
        }),
    ))
}

/// Unpaid totals as of `?as_of=` (default today).
pub fn receivables(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let as_of = date_or_today(request.query("as_of"), "as_of")?;
    let unpaid: Vec<_> = app
        .store
        .invoices()
        .into_iter()
        .filter(|i| i.status == InvoiceStatus::Unpaid)
        .collect();
    let overdue: Vec<_> = unpaid.iter().filter(|i| i.due_date < as_of).collect();

    Ok(Outcome::view(
        "reports/receivables",
        json!({
            "as_of": as_of,
            "outstanding_cents": unpaid.iter().map(|i| i.amount_cents).sum::<i64>(),
            "overdue_cents": overdue.iter().map(|i| i.amount_cents).sum::<i64>(),
            "overdue": overdue,
        }),
    ))
}

pub fn audit(app: &AppContext, _: &RequestContext, _: &PathParams) -> HandlerResult {
    Ok(Outcome::view("reports/audit", json!({ "entries": app.store.audit_log() })))
}

/// Rounded to four places; zero when there is nothing to divide by.
fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::tests::app;
    use crate::store::leasing::NewApplication;
    use chrono::NaiveDate;

    fn lease_shop_one(app: &AppContext) {
        let application = app
            .store
            .submit_application(
                1,
                NewApplication {
                    applicant: "Lee".into(),
                    email: "lee@example.com".into(),
                    business: "Cafe".into(),
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

    fn data(outcome: Outcome) -> serde_json::Value {
        match outcome {
            Outcome::View { data, .. } => data,
            other => panic!("expected a view, got {other:?}"),
        }
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(1, 3), 0.3333);
        assert_eq!(ratio(2, 2), 1.0);
    }

    #[test]
    fn test_occupancy() {
        let app = app();
        lease_shop_one(&app);
        let d = data(occupancy(&app, &RequestContext::new("GET", "/reports/occupancy"), &PathParams::default()).unwrap());
        assert_eq!(d["total"], 2);
        assert_eq!(d["leased"], 1);
        assert_eq!(d["occupancy_rate"], 0.5);
    }

    #[test]
    fn test_receivables_overdue_split() {
        let app = app();
        lease_shop_one(&app);

        let before_due = RequestContext::new("GET", "/reports/receivables").with_query("as_of=2024-01-05");
        let d = data(receivables(&app, &before_due, &PathParams::default()).unwrap());
        assert_eq!(d["outstanding_cents"], 250_000);
        assert_eq!(d["overdue_cents"], 0);

        let after_due = RequestContext::new("GET", "/reports/receivables").with_query("as_of=2024-01-11");
        let d = data(receivables(&app, &after_due, &PathParams::default()).unwrap());
        assert_eq!(d["overdue_cents"], 250_000);
        assert_eq!(d["overdue"][0]["period"], "2024-01");
    }

    #[test]
    fn test_audit_lists_transitions() {
        let app = app();
        lease_shop_one(&app);
        let d = data(audit(&app, &RequestContext::new("GET", "/reports/audit"), &PathParams::default()).unwrap());
        let actions: Vec<&str> = d["entries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["action"].as_str().unwrap())
            .collect();
        assert_eq!(
            actions,
            ["application.submitted", "application.approved", "invoice.issued", "lease.activated"]
        );
    }
}
