//! Shop catalog.

use serde_json::json;

use crate::controllers::id_param;
use crate::dispatch::{AppContext, HandlerResult};
use crate::http::error::AppError;
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::models::ShopStatus;

/// Catalog, optionally filtered by `?status=` and `?floor=`.
pub fn index(app: &AppContext, request: &RequestContext, _: &PathParams) -> HandlerResult {
    let status = request
        .query("status")
        .map(|s| s.parse::<ShopStatus>().map_err(AppError::BadRequest))
        .transpose()?;
    let floor = request
        .query("floor")
        .map(|f| {
            f.parse::<i32>()
                .map_err(|_| AppError::BadRequest(format!("`{f}` is not a floor number")))
        })
        .transpose()?;

    let shops: Vec<_> = app
        .store
        .shops()
        .into_iter()
        .filter(|s| status.map_or(true, |st| s.status == st))
        .filter(|s| floor.map_or(true, |fl| s.floor == fl))
        .collect();

    Ok(Outcome::view("shops/index", json!({ "shops": shops })))
}

pub fn available(app: &AppContext, _: &RequestContext, _: &PathParams) -> HandlerResult {
    let shops: Vec<_> = app
        .store
        .shops()
        .into_iter()
        .filter(|s| s.status == ShopStatus::Available)
        .collect();
    Ok(Outcome::view("shops/available", json!({ "shops": shops })))
}

pub fn show(app: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
    let shop = app.store.shop(id_param(params, "id")?)?;
    let tickets: Vec<_> = app
        .store
        .tickets()
        .into_iter()
        .filter(|t| t.shop_id == shop.id)
        .collect();
    Ok(Outcome::view("shops/show", json!({ "shop": shop, "tickets": tickets })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::tests::{app, params};

    fn view_data(outcome: Outcome) -> serde_json::Value {
        match outcome {
            Outcome::View { data, .. } => data,
            other => panic!("expected a view, got {other:?}"),
        }
    }

    #[test]
    fn test_index_filters() {
        let app = app();
        let request = RequestContext::new("GET", "/shops").with_query("floor=1");
        let data = view_data(index(&app, &request, &PathParams::default()).unwrap());
        assert_eq!(data["shops"].as_array().unwrap().len(), 1);
        assert_eq!(data["shops"][0]["code"], "1-05");

        let request = RequestContext::new("GET", "/shops").with_query("status=leased");
        let data = view_data(index(&app, &request, &PathParams::default()).unwrap());
        assert!(data["shops"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_index_rejects_bad_filter() {
        let request = RequestContext::new("GET", "/shops").with_query("status=haunted");
        let err = index(&app(), &request, &PathParams::default()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_show() {
        let app = app();
        let request = RequestContext::new("GET", "/shops/1");
        let data = view_data(show(&app, &request, &params(&[("id", "1")])).unwrap());
        assert_eq!(data["shop"]["name"], "Corner Unit");
        assert_eq!(data["shop"]["status"], "available");

        let err = show(&app, &request, &params(&[("id", "9")])).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = show(&app, &request, &params(&[("id", "one")])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
