//! Route handlers.
//!
//! Each controller module exposes plain functions with the `Handler`
//! signature; `registry()` binds them to their `Target.operation` names.

pub mod applications;
pub mod home;
pub mod invoices;
pub mod leases;
pub mod reports;
pub mod shops;
pub mod tickets;

use std::str::FromStr;

use chrono::{NaiveDate, Utc};

use crate::dispatch::HandlerRegistry;
use crate::http::error::AppError;
use crate::http::request::RequestContext;
use crate::routing::PathParams;

/// Every handler the route table may reference.
pub fn registry() -> HandlerRegistry {
    HandlerRegistry::new()
        .with("HomeController", "index", home::index)
        .with("ShopController", "index", shops::index)
        .with("ShopController", "available", shops::available)
        .with("ShopController", "show", shops::show)
        .with("ApplicationController", "index", applications::index)
        .with("ApplicationController", "show", applications::show)
        .with("ApplicationController", "store", applications::store)
        .with("ApplicationController", "approve", applications::approve)
        .with("ApplicationController", "reject", applications::reject)
        .with("LeaseController", "index", leases::index)
        .with("LeaseController", "show", leases::show)
        .with("LeaseController", "activate", leases::activate)
        .with("LeaseController", "terminate", leases::terminate)
        .with("LeaseController", "expire", leases::expire)
        .with("InvoiceController", "index", invoices::index)
        .with("InvoiceController", "show", invoices::show)
        .with("InvoiceController", "generate", invoices::generate)
        .with("InvoiceController", "pay", invoices::pay)
        .with("TicketController", "index", tickets::index)
        .with("TicketController", "show", tickets::show)
        .with("TicketController", "store", tickets::store)
        .with("TicketController", "update", tickets::update)
        .with("ReportController", "occupancy", reports::occupancy)
        .with("ReportController", "receivables", reports::receivables)
        .with("ReportController", "audit", reports::audit)
}

/// Numeric id from a path placeholder.
fn id_param(params: &PathParams, name: &str) -> Result<u64, AppError> {
    let raw = params
        .get(name)
        .ok_or_else(|| AppError::BadRequest(format!("missing path parameter `{name}`")))?;
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("`{raw}` is not a valid {name}")))
}

/// Parse a required body field.
fn parse_field<T: FromStr>(request: &RequestContext, name: &str) -> Result<T, AppError> {
    let raw = request.require(name)?;
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid `{name}`: `{raw}`")))
}

/// Date from a body field or query parameter, defaulting to today.
fn date_or_today(value: Option<&str>, name: &str) -> Result<NaiveDate, AppError> {
    match value {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("invalid `{name}`: `{raw}` (expected YYYY-MM-DD)"))),
        None => Ok(Utc::now().date_naive()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{InvoiceConfig, SeedConfig, ShopSeed};
    use crate::dispatch::AppContext;
    use crate::routing::RouteTable;
    use crate::store::Store;

    pub(crate) fn app() -> AppContext {
        let seed = SeedConfig {
            shops: vec![
                ShopSeed {
                    code: "G-01".into(),
                    name: "Corner Unit".into(),
                    floor: 0,
                    area_sqm: 42,
                    monthly_rent_cents: 250_000,
                },
                ShopSeed {
                    code: "1-05".into(),
                    name: "Atrium Kiosk".into(),
                    floor: 1,
                    area_sqm: 12,
                    monthly_rent_cents: 80_000,
                },
            ],
        };
        AppContext::new(Store::from_seed(&seed), InvoiceConfig::default())
    }

    pub(crate) fn params(pairs: &[(&str, &str)]) -> PathParams {
        pairs
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_id_param() {
        assert_eq!(id_param(&params(&[("id", "42")]), "id").unwrap(), 42);
        assert!(matches!(
            id_param(&params(&[("id", "abc")]), "id").unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(id_param(&params(&[]), "id").is_err());
    }

    #[test]
    fn test_date_or_today() {
        assert_eq!(
            date_or_today(Some("2024-02-29"), "start_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(date_or_today(Some("29/02/2024"), "start_date").is_err());
        assert!(date_or_today(None, "start_date").is_ok());
    }

    #[test]
    fn test_shipped_routes_resolve_against_registry() {
        let text = std::fs::read_to_string(
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/shopfront.toml"),
        )
        .unwrap();
        let config = crate::config::parse_config(&text).unwrap();
        let table = RouteTable::from_pairs(
            config
                .routes
                .iter()
                .map(|r| (r.route.as_str(), r.handler.as_str())),
        )
        .unwrap();
        assert!(crate::dispatch::Dispatcher::new(table, registry(), app()).is_ok());
    }
}
