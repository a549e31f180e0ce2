//! Tenant applications and the lease lifecycle.
//!
//! ```text
//! Application: Pending ──approve──▶ Approved (creates Draft lease)
//!                     └──reject───▶ Rejected (shop back to Available)
//!
//! Lease: Draft ──activate──▶ Active ──terminate──▶ Terminated
//!                               └────end date────▶ Expired
//! ```

use chrono::{Months, NaiveDate, Utc};

use crate::config::InvoiceConfig;
use crate::store::models::{
    Application, ApplicationStatus, Invoice, InvoiceStatus, Lease, LeaseStatus, Period, ShopStatus,
};
use crate::store::{get, next, sorted, Store, StoreError};

/// Details collected from an applicant.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub applicant: String,
    pub email: String,
    pub business: String,
}

impl Store {
    pub fn application(&self, id: u64) -> Result<Application, StoreError> {
        get(&self.inner.applications, "application", id)
    }

    pub fn applications(&self) -> Vec<Application> {
        sorted(&self.inner.applications)
    }

    pub fn lease(&self, id: u64) -> Result<Lease, StoreError> {
        get(&self.inner.leases, "lease", id)
    }

    pub fn leases(&self) -> Vec<Lease> {
        sorted(&self.inner.leases)
    }

    /// Submit an application; the shop is reserved while it is pending.
    pub fn submit_application(
        &self,
        shop_id: u64,
        details: NewApplication,
    ) -> Result<Application, StoreError> {
        if details.applicant.trim().is_empty() {
            return Err(StoreError::Invalid("applicant is required".into()));
        }
        if !details.email.contains('@') {
            return Err(StoreError::Invalid(format!(
                "`{}` is not an email address",
                details.email
            )));
        }

        {
            let mut shop = self
                .inner
                .shops
                .get_mut(&shop_id)
                .ok_or(StoreError::NotFound { kind: "shop", id: shop_id })?;
            if shop.status != ShopStatus::Available {
                return Err(StoreError::Conflict(format!(
                    "shop {} is not available",
                    shop.code
                )));
            }
            shop.status = ShopStatus::Reserved;
        }

        let application = Application {
            id: next(&self.inner.ids.application),
            shop_id,
            applicant: details.applicant,
            email: details.email,
            business: details.business,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
        };
        self.inner
            .applications
            .insert(application.id, application.clone());
        self.record("application.submitted", format!("application {}", application.id));
        Ok(application)
    }

    /// Approve a pending application and draft a lease starting on `start`.
    pub fn approve_application(
        &self,
        id: u64,
        start: NaiveDate,
        terms: &InvoiceConfig,
    ) -> Result<Lease, StoreError> {
        // Everything fallible runs before the application leaves Pending.
        let pending = self.application(id)?;
        let shop = self.shop(pending.shop_id)?;
        let end_date = start
            .checked_add_months(Months::new(terms.lease_term_months))
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| StoreError::Invalid(format!("lease starting {start} has no valid end")))?;

        let application = self.transition_application(id, ApplicationStatus::Approved)?;

        let lease = Lease {
            id: next(&self.inner.ids.lease),
            shop_id: shop.id,
            application_id: Some(application.id),
            tenant: application.applicant,
            start_date: start,
            end_date,
            monthly_rent_cents: shop.monthly_rent_cents,
            deposit_cents: shop.monthly_rent_cents * i64::from(terms.deposit_months),
            status: LeaseStatus::Draft,
        };
        self.inner.leases.insert(lease.id, lease.clone());
        self.record("application.approved", format!("application {id} → lease {}", lease.id));
        Ok(lease)
    }

    /// Reject a pending application and release the shop.
    pub fn reject_application(&self, id: u64) -> Result<Application, StoreError> {
        let application = self.transition_application(id, ApplicationStatus::Rejected)?;
        self.set_shop_status(application.shop_id, ShopStatus::Available)?;
        self.record("application.rejected", format!("application {id}"));
        Ok(application)
    }

    fn transition_application(
        &self,
        id: u64,
        to: ApplicationStatus,
    ) -> Result<Application, StoreError> {
        let mut application = self
            .inner
            .applications
            .get_mut(&id)
            .ok_or(StoreError::NotFound { kind: "application", id })?;
        if application.status != ApplicationStatus::Pending {
            return Err(StoreError::Conflict(format!(
                "application {id} was already decided"
            )));
        }
        application.status = to;
        Ok(application.clone())
    }

    /// Activate a draft lease: the shop becomes leased and the first month is invoiced.
    pub fn activate_lease(
        &self,
        id: u64,
        terms: &InvoiceConfig,
    ) -> Result<(Lease, Option<Invoice>), StoreError> {
        let lease = {
            let mut lease = self
                .inner
                .leases
                .get_mut(&id)
                .ok_or(StoreError::NotFound { kind: "lease", id })?;
            if lease.status != LeaseStatus::Draft {
                return Err(StoreError::Conflict(format!(
                    "lease {id} is {:?}, only draft leases can be activated",
                    lease.status
                )));
            }
            lease.status = LeaseStatus::Active;
            lease.clone()
        };

        self.set_shop_status(lease.shop_id, ShopStatus::Leased)?;
        let invoice = self.invoice_once(&lease, Period::containing(lease.start_date), terms.due_day);
        self.record("lease.activated", format!("lease {id}"));
        Ok((lease, invoice))
    }

    /// End an active lease early. Unpaid invoices for later months are voided.
    pub fn terminate_lease(&self, id: u64, as_of: NaiveDate) -> Result<Lease, StoreError> {
        let lease = self.end_lease(id, LeaseStatus::Terminated)?;
        let cutoff = Period::containing(as_of);

        let to_void: Vec<u64> = self
            .inner
            .invoices
            .iter()
            .filter(|inv| {
                inv.lease_id == id && inv.status == InvoiceStatus::Unpaid && inv.period > cutoff
            })
            .map(|inv| inv.id)
            .collect();
        for invoice_id in &to_void {
            if let Some(mut inv) = self.inner.invoices.get_mut(invoice_id) {
                inv.status = InvoiceStatus::Void;
            }
        }

        self.record(
            "lease.terminated",
            format!("lease {id} ({} invoices voided)", to_void.len()),
        );
        Ok(lease)
    }

    /// Expire every active lease whose end date is before `as_of`.
    pub fn expire_leases(&self, as_of: NaiveDate) -> Vec<Lease> {
        let due: Vec<u64> = self
            .inner
            .leases
            .iter()
            .filter(|l| l.status == LeaseStatus::Active && l.end_date < as_of)
            .map(|l| l.id)
            .collect();

        let mut expired = Vec::new();
        for id in due {
            // A concurrent termination wins; skip it.
            if let Ok(lease) = self.end_lease(id, LeaseStatus::Expired) {
                self.record("lease.expired", format!("lease {id}"));
                expired.push(lease);
            }
        }
        expired
    }

    fn end_lease(&self, id: u64, to: LeaseStatus) -> Result<Lease, StoreError> {
        let lease = {
            let mut lease = self
                .inner
                .leases
                .get_mut(&id)
                .ok_or(StoreError::NotFound { kind: "lease", id })?;
            if lease.status != LeaseStatus::Active {
                return Err(StoreError::Conflict(format!("lease {id} is not active")));
            }
            lease.status = to;
            lease.clone()
        };
        self.set_shop_status(lease.shop_id, ShopStatus::Available)?;
        Ok(lease)
    }
}
