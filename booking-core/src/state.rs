//! Service composition
//!
//! Wires the store into the engine services once at process start. Handles
//! are `Arc`-backed and cheap to clone into request handlers.

use std::sync::Arc;

use crate::availability::AvailabilityService;
use crate::bookings::BookingManager;
use crate::clock::Clock;
use crate::config::Config;
use crate::db::MemoryStore;
use crate::db::repository::{
    AvailabilityRuleRepository, BookingRepository, PaymentRepository, PricingRuleRepository,
    ResourceRepository,
};
use crate::payments::{MockGateway, PaymentProcessor};
use crate::pricing::PricingResolver;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub availability: AvailabilityService,
    pub manager: BookingManager,
    pub payments: PaymentProcessor,
    /// The backing store; tests and embedders reach the per-entity
    /// repository traits through it
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new(&config));
        Self::with_store(config, clock, store)
    }

    pub fn with_store(config: Config, clock: Arc<dyn Clock>, store: Arc<MemoryStore>) -> Self {
        let resources: Arc<dyn ResourceRepository> = store.clone();
        let availability_rules: Arc<dyn AvailabilityRuleRepository> = store.clone();
        let pricing_rules: Arc<dyn PricingRuleRepository> = store.clone();
        let bookings: Arc<dyn BookingRepository> = store.clone();
        let payments: Arc<dyn PaymentRepository> = store.clone();

        let pricing = PricingResolver::new(pricing_rules);
        let availability = AvailabilityService::new(
            resources.clone(),
            availability_rules,
            bookings.clone(),
            &config,
        );
        let manager = BookingManager::new(resources, bookings.clone(), pricing, clock.clone());
        let payment_processor =
            PaymentProcessor::new(bookings, payments, MockGateway, clock);

        Self {
            config,
            availability,
            manager,
            payments: payment_processor,
            store,
        }
    }
}
