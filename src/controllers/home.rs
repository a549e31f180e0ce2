//! Dashboard.

use serde_json::json;

use crate::dispatch::{AppContext, HandlerResult};
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::models::{ApplicationStatus, InvoiceStatus, LeaseStatus, ShopStatus, TicketStatus};

pub fn index(app: &AppContext, _: &RequestContext, _: &PathParams) -> HandlerResult {
    let store = &app.store;
    let shops = store.shops();

    Ok(Outcome::view(
        "home/index",
        json!({
            "shops": {
                "total": shops.len(),
                "available": shops.iter().filter(|s| s.status == ShopStatus::Available).count(),
            },
            "pending_applications": store
                .applications()
                .iter()
                .filter(|a| a.status == ApplicationStatus::Pending)
                .count(),
            "active_leases": store
                .leases()
                .iter()
                .filter(|l| l.status == LeaseStatus::Active)
                .count(),
            "unpaid_invoices": store
                .invoices()
                .iter()
                .filter(|i| i.status == InvoiceStatus::Unpaid)
                .count(),
            "open_tickets": store
                .tickets()
                .iter()
                .filter(|t| t.status != TicketStatus::Closed)
                .count(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::tests::app;

    #[test]
    fn test_dashboard_counts() {
        let outcome = index(&app(), &RequestContext::new("GET", "/"), &PathParams::default()).unwrap();
        let Outcome::View { name, data } = outcome else {
            panic!("expected a view");
        };
        assert_eq!(name, "home/index");
        assert_eq!(data["shops"]["total"], 2);
        assert_eq!(data["shops"]["available"], 2);
        assert_eq!(data["open_tickets"], 0);
    }
}
