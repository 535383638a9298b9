//! In-memory store
//!
//! Implements every repository interface over process-local tables. Tables
//! are read-mostly `RwLock`ed maps; the lock primitive is a registry of
//! per-key async mutexes with an acquisition timeout, so a stuck holder
//! surfaces as a store error instead of a hung request. Row timestamps are
//! stamped here, the way a database default would.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use shared::models::{
    AvailabilityRule, AvailabilityRuleCreate, AvailabilityRuleUpdate, Booking, Payment,
    PricingRule, PricingRuleCreate, PricingRuleUpdate, Resource, ResourceCreate, ResourceUpdate,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;
use validator::Validate;

use super::repository::{
    AvailabilityRuleRepository, BookingRepository, PaymentRepository, PricingRuleRepository,
    RepoError, RepoResult, ResourceRepository,
};
use crate::config::Config;

pub struct MemoryStore {
    resources: RwLock<HashMap<Uuid, Resource>>,
    availability_rules: RwLock<HashMap<Uuid, AvailabilityRule>>,
    pricing_rules: RwLock<HashMap<Uuid, PricingRule>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
    payments: RwLock<HashMap<Uuid, Payment>>,
    resource_locks: DashMap<Uuid, Arc<Mutex<()>>>,
    row_locks: DashMap<Uuid, Arc<Mutex<()>>>,
    lock_timeout: Duration,
}

impl MemoryStore {
    pub fn new(config: &Config) -> Self {
        Self::with_lock_timeout(Duration::from_millis(config.lock_timeout_ms))
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
            availability_rules: RwLock::new(HashMap::new()),
            pricing_rules: RwLock::new(HashMap::new()),
            bookings: RwLock::new(HashMap::new()),
            payments: RwLock::new(HashMap::new()),
            resource_locks: DashMap::new(),
            row_locks: DashMap::new(),
            lock_timeout,
        }
    }

    async fn acquire(
        registry: &DashMap<Uuid, Arc<Mutex<()>>>,
        key: Uuid,
        timeout: Duration,
        what: &str,
    ) -> RepoResult<OwnedMutexGuard<()>> {
        let cell = {
            let entry = registry
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };
        tokio::time::timeout(timeout, cell.lock_owned())
            .await
            .map_err(|_| RepoError::Database(format!("{what} lock timeout for {key}")))
    }
}

/// Stable result order regardless of map iteration: oldest row first
fn by_age<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    rows.sort_by_key(key);
}

#[async_trait]
impl ResourceRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Resource>> {
        Ok(self.resources.read().get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Resource>> {
        let mut rows: Vec<Resource> = self
            .resources
            .read()
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        by_age(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn create(&self, owner_id: Uuid, data: ResourceCreate) -> RepoResult<Resource> {
        data.validate()
            .map_err(|e| RepoError::Validation(e.to_string()))?;
        let now = Utc::now();
        let resource = Resource {
            id: Uuid::new_v4(),
            owner_id,
            name: data.name,
            description: data.description,
            capacity: data.capacity,
            booking_type: data.booking_type,
            is_active: true,
            max_bookings_per_day: data.max_bookings_per_day,
            max_bookings_per_customer: data.max_bookings_per_customer,
            created_at: now,
            updated_at: now,
        };
        self.resources.write().insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn update(&self, id: Uuid, owner_id: Uuid, data: ResourceUpdate) -> RepoResult<Resource> {
        let mut table = self.resources.write();
        let resource = table
            .get_mut(&id)
            .filter(|r| r.owner_id == owner_id)
            .ok_or_else(|| RepoError::NotFound(format!("resource {id}")))?;
        if let Some(name) = data.name {
            resource.name = name;
        }
        if let Some(description) = data.description {
            resource.description = Some(description);
        }
        if let Some(capacity) = data.capacity {
            resource.capacity = Some(capacity);
        }
        if let Some(booking_type) = data.booking_type {
            resource.booking_type = booking_type;
        }
        if let Some(is_active) = data.is_active {
            resource.is_active = is_active;
        }
        if let Some(cap) = data.max_bookings_per_day {
            resource.max_bookings_per_day = Some(cap);
        }
        if let Some(cap) = data.max_bookings_per_customer {
            resource.max_bookings_per_customer = Some(cap);
        }
        resource.updated_at = Utc::now();
        Ok(resource.clone())
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool> {
        let mut table = self.resources.write();
        match table.get(&id) {
            Some(r) if r.owner_id == owner_id => {
                table.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl AvailabilityRuleRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<AvailabilityRule>> {
        Ok(self.availability_rules.read().get(&id).cloned())
    }

    async fn find_by_resource(&self, resource_id: Uuid) -> RepoResult<Vec<AvailabilityRule>> {
        let mut rows: Vec<AvailabilityRule> = self
            .availability_rules
            .read()
            .values()
            .filter(|r| r.resource_id == resource_id)
            .cloned()
            .collect();
        by_age(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn find_by_resource_and_owner(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
    ) -> RepoResult<Vec<AvailabilityRule>> {
        let mut rows: Vec<AvailabilityRule> = self
            .availability_rules
            .read()
            .values()
            .filter(|r| r.resource_id == resource_id && r.owner_id == owner_id)
            .cloned()
            .collect();
        by_age(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn create(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
        data: AvailabilityRuleCreate,
    ) -> RepoResult<AvailabilityRule> {
        data.check_invariants().map_err(RepoError::Validation)?;
        let now = Utc::now();
        let rule = AvailabilityRule {
            id: Uuid::new_v4(),
            resource_id,
            owner_id,
            kind: data.kind,
            day_of_week: data.day_of_week,
            specific_date: data.specific_date,
            start_time: data.start_time,
            end_time: data.end_time,
            is_available: data.is_available.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.availability_rules
            .write()
            .insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: AvailabilityRuleUpdate,
    ) -> RepoResult<AvailabilityRule> {
        let mut table = self.availability_rules.write();
        let rule = table
            .get_mut(&id)
            .filter(|r| r.owner_id == owner_id)
            .ok_or_else(|| RepoError::NotFound(format!("availability rule {id}")))?;
        let start = data.start_time.unwrap_or(rule.start_time);
        let end = data.end_time.unwrap_or(rule.end_time);
        if start >= end {
            return Err(RepoError::Validation(
                "start_time must be before end_time".into(),
            ));
        }
        rule.start_time = start;
        rule.end_time = end;
        if let Some(flag) = data.is_available {
            rule.is_available = flag;
        }
        rule.updated_at = Utc::now();
        Ok(rule.clone())
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool> {
        let mut table = self.availability_rules.write();
        match table.get(&id) {
            Some(r) if r.owner_id == owner_id => {
                table.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl PricingRuleRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<PricingRule>> {
        Ok(self.pricing_rules.read().get(&id).cloned())
    }

    async fn find_active_for_resource(&self, resource_id: Uuid) -> RepoResult<Vec<PricingRule>> {
        let mut rows: Vec<PricingRule> = self
            .pricing_rules
            .read()
            .values()
            .filter(|r| r.resource_id == resource_id && r.is_active)
            .cloned()
            .collect();
        by_age(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn find_by_resource_and_owner(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
    ) -> RepoResult<Vec<PricingRule>> {
        let mut rows: Vec<PricingRule> = self
            .pricing_rules
            .read()
            .values()
            .filter(|r| r.resource_id == resource_id && r.owner_id == owner_id)
            .cloned()
            .collect();
        by_age(&mut rows, |r| (r.created_at, r.id));
        Ok(rows)
    }

    async fn create(
        &self,
        resource_id: Uuid,
        owner_id: Uuid,
        data: PricingRuleCreate,
    ) -> RepoResult<PricingRule> {
        data.check_invariants().map_err(RepoError::Validation)?;
        let now = Utc::now();
        let rule = PricingRule {
            id: Uuid::new_v4(),
            resource_id,
            owner_id,
            duration_type: data.duration_type,
            base_price: data.base_price,
            min_duration: data.min_duration,
            max_duration: data.max_duration,
            applicable_days: data.applicable_days,
            start_time_of_day: data.start_time_of_day,
            end_time_of_day: data.end_time_of_day,
            is_active: true,
            description: data.description,
            created_at: now,
            updated_at: now,
        };
        self.pricing_rules.write().insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        data: PricingRuleUpdate,
    ) -> RepoResult<PricingRule> {
        let mut table = self.pricing_rules.write();
        let rule = table
            .get_mut(&id)
            .filter(|r| r.owner_id == owner_id)
            .ok_or_else(|| RepoError::NotFound(format!("pricing rule {id}")))?;
        if let Some(base_price) = data.base_price {
            if base_price <= rust_decimal::Decimal::ZERO {
                return Err(RepoError::Validation("base_price must be positive".into()));
            }
            rule.base_price = base_price;
        }
        if let Some(duration_type) = data.duration_type {
            rule.duration_type = duration_type;
        }
        if let Some(min) = data.min_duration {
            rule.min_duration = Some(min);
        }
        if let Some(max) = data.max_duration {
            rule.max_duration = Some(max);
        }
        if let Some(days) = data.applicable_days {
            rule.applicable_days = Some(days);
        }
        if let Some(from) = data.start_time_of_day {
            rule.start_time_of_day = Some(from);
        }
        if let Some(until) = data.end_time_of_day {
            rule.end_time_of_day = Some(until);
        }
        if let Some(is_active) = data.is_active {
            rule.is_active = is_active;
        }
        if let Some(description) = data.description {
            rule.description = Some(description);
        }
        rule.updated_at = Utc::now();
        Ok(rule.clone())
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> RepoResult<bool> {
        let mut table = self.pricing_rules.write();
        match table.get(&id) {
            Some(r) if r.owner_id == owner_id => {
                table.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        Ok(self.bookings.read().get(&id).cloned())
    }

    async fn find_by_customer(&self, customer_id: Uuid) -> RepoResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .read()
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect();
        by_age(&mut rows, |b| (b.created_at, b.id));
        Ok(rows)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .read()
            .values()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect();
        by_age(&mut rows, |b| (b.created_at, b.id));
        Ok(rows)
    }

    async fn find_active_overlapping(
        &self,
        resource_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> RepoResult<Vec<Booking>> {
        let mut rows: Vec<Booking> = self
            .bookings
            .read()
            .values()
            .filter(|b| b.resource_id == resource_id && b.status.is_active())
            .filter(|b| Some(b.id) != exclude)
            .filter(|b| b.start_time < end && b.end_time > start)
            .cloned()
            .collect();
        rows.sort_by_key(|b| (b.start_time, b.id));
        Ok(rows)
    }

    async fn count_active_on_day(&self, resource_id: Uuid, day: NaiveDate) -> RepoResult<u32> {
        let count = self
            .bookings
            .read()
            .values()
            .filter(|b| b.resource_id == resource_id && b.status.is_active())
            .filter(|b| b.start_time.date_naive() == day)
            .count();
        Ok(count as u32)
    }

    async fn count_active_for_customer(
        &self,
        resource_id: Uuid,
        customer_id: Uuid,
    ) -> RepoResult<u32> {
        let count = self
            .bookings
            .read()
            .values()
            .filter(|b| b.resource_id == resource_id && b.status.is_active())
            .filter(|b| b.customer_id == customer_id)
            .count();
        Ok(count as u32)
    }

    async fn insert(&self, booking: Booking) -> RepoResult<Booking> {
        let mut table = self.bookings.write();
        if table.contains_key(&booking.id) {
            return Err(RepoError::Duplicate(format!("booking {}", booking.id)));
        }
        table.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn save(&self, booking: Booking) -> RepoResult<Booking> {
        let mut table = self.bookings.write();
        if !table.contains_key(&booking.id) {
            return Err(RepoError::NotFound(format!("booking {}", booking.id)));
        }
        table.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.bookings.write().remove(&id).is_some())
    }

    async fn lock_resource(&self, resource_id: Uuid) -> RepoResult<OwnedMutexGuard<()>> {
        Self::acquire(
            &self.resource_locks,
            resource_id,
            self.lock_timeout,
            "resource",
        )
        .await
    }

    async fn lock_row(&self, booking_id: Uuid) -> RepoResult<OwnedMutexGuard<()>> {
        Self::acquire(&self.row_locks, booking_id, self.lock_timeout, "booking").await
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn find_by_booking(&self, booking_id: Uuid) -> RepoResult<Option<Payment>> {
        Ok(self
            .payments
            .read()
            .values()
            .find(|p| p.booking_id == booking_id)
            .cloned())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> RepoResult<Option<Payment>> {
        Ok(self
            .payments
            .read()
            .values()
            .find(|p| p.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    async fn insert(&self, payment: Payment) -> RepoResult<Payment> {
        let mut table = self.payments.write();
        if table.values().any(|p| p.booking_id == payment.booking_id) {
            return Err(RepoError::Duplicate(format!(
                "payment for booking {}",
                payment.booking_id
            )));
        }
        table.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn save(&self, payment: Payment) -> RepoResult<Payment> {
        let mut table = self.payments.write();
        if !table.contains_key(&payment.id) {
            return Err(RepoError::NotFound(format!("payment {}", payment.id)));
        }
        table.insert(payment.id, payment.clone());
        Ok(payment)
    }
}
