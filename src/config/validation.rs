//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, due day within a month)
//! - Check every route key, pattern and handler ref
//! - Detect duplicate routes and duplicate seed shops
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Handler refs are checked for shape only; whether a handler exists is
//!   decided when the dispatcher is built

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;
use crate::routing::{Route, RoutePattern, RouteTableError};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("app.base_path `{0}` must be empty or start with `/` and not end with `/`")]
    InvalidBasePath(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("invoices.due_day {0} must be between 1 and 28")]
    DueDayOutOfRange(u32),

    #[error("invoices.lease_term_months must be greater than zero")]
    ZeroLeaseTerm,

    #[error("no routes configured")]
    NoRoutes,

    #[error("routes[{index}]: {source}")]
    Route {
        index: usize,
        #[source]
        source: RouteTableError,
    },

    #[error("seed shop code `{0}` is used more than once")]
    DuplicateShopCode(String),

    #[error("seed shop `{0}` must have a positive rent")]
    InvalidRent(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if !is_valid_base_path(&config.app.base_path) {
        errors.push(ValidationError::InvalidBasePath(config.app.base_path.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if !(1..=28).contains(&config.invoices.due_day) {
        errors.push(ValidationError::DueDayOutOfRange(config.invoices.due_day));
    }
    if config.invoices.lease_term_months == 0 {
        errors.push(ValidationError::ZeroLeaseTerm);
    }

    validate_routes(config, &mut errors);
    validate_seed(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
        return;
    }

    let mut seen = HashSet::new();
    for (index, entry) in config.routes.iter().enumerate() {
        let route = match Route::parse(&entry.route, &entry.handler) {
            Ok(route) => route,
            Err(source) => {
                errors.push(ValidationError::Route { index, source });
                continue;
            }
        };

        if let Err(e) = RoutePattern::compile(&route.method, &route.pattern) {
            errors.push(ValidationError::Route {
                index,
                source: e.into(),
            });
            continue;
        }

        let key = route.key();
        if !seen.insert(key.clone()) {
            errors.push(ValidationError::Route {
                index,
                source: RouteTableError::DuplicateRoute { key },
            });
        }
    }
}

fn validate_seed(config: &AppConfig, errors: &mut Vec<ValidationError>) {
    let mut codes = HashSet::new();
    for shop in &config.seed.shops {
        if !codes.insert(shop.code.as_str()) {
            errors.push(ValidationError::DuplicateShopCode(shop.code.clone()));
        }
        if shop.monthly_rent_cents <= 0 {
            errors.push(ValidationError::InvalidRent(shop.code.clone()));
        }
    }
}

fn is_valid_base_path(base: &str) -> bool {
    base.is_empty()
        || (base.starts_with('/')
            && !base.ends_with('/')
            && !base.contains("//")
            && !base.contains(['?', '#', ' ']))
}
