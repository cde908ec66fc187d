//! Storage collaborators for packs, orders and computed breakdowns.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{Order, OrderPacks};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("pack of size {0} already exists")]
    DuplicatePack(u32),

    #[error("pack of size {0} not found")]
    PackNotFound(u32),

    #[error("order {0} not found")]
    OrderNotFound(Uuid),

    #[error("no pack breakdown saved for order {0}")]
    OrderPacksNotFound(Uuid),

    #[error("order {0} already exists")]
    DuplicateOrder(Uuid),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Source of the configured pack sizes.
pub trait PackStore: Send + Sync {
    fn add_pack(&self, size: u32) -> Result<(), StoreError>;

    fn remove_pack(&self, size: u32) -> Result<(), StoreError>;

    /// Configured sizes in no particular order. May be empty.
    fn available_pack_sizes(&self) -> Result<Vec<u32>, StoreError>;
}

/// Source and sink for orders and their pack breakdowns.
pub trait OrderStore: Send + Sync {
    fn add_order(&self, order: Order) -> Result<(), StoreError>;

    fn order_quantity(&self, order_id: Uuid) -> Result<u32, StoreError>;

    /// Stores the breakdown for an order, replacing any earlier one.
    fn save_order_packs(&self, packs: &OrderPacks) -> Result<(), StoreError>;

    fn order_packs(&self, order_id: Uuid) -> Result<OrderPacks, StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    packs: BTreeSet<u32>,
    orders: HashMap<Uuid, u32>,
    order_packs: HashMap<Uuid, OrderPacks>,
}

/// In-process store backing both traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `sizes`. Duplicates collapse.
    pub fn with_packs(sizes: impl IntoIterator<Item = u32>) -> Self {
        let store = Self::new();
        store.tables.write().packs.extend(sizes);
        store
    }
}

impl PackStore for MemoryStore {
    fn add_pack(&self, size: u32) -> Result<(), StoreError> {
        if !self.tables.write().packs.insert(size) {
            return Err(StoreError::DuplicatePack(size));
        }
        Ok(())
    }

    fn remove_pack(&self, size: u32) -> Result<(), StoreError> {
        if !self.tables.write().packs.remove(&size) {
            return Err(StoreError::PackNotFound(size));
        }
        Ok(())
    }

    fn available_pack_sizes(&self) -> Result<Vec<u32>, StoreError> {
        Ok(self.tables.read().packs.iter().copied().collect())
    }
}

impl OrderStore for MemoryStore {
    fn add_order(&self, order: Order) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.orders.contains_key(&order.id) {
            return Err(StoreError::DuplicateOrder(order.id));
        }
        tables.orders.insert(order.id, order.quantity);
        Ok(())
    }

    fn order_quantity(&self, order_id: Uuid) -> Result<u32, StoreError> {
        self.tables
            .read()
            .orders
            .get(&order_id)
            .copied()
            .ok_or(StoreError::OrderNotFound(order_id))
    }

    fn save_order_packs(&self, packs: &OrderPacks) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.orders.contains_key(&packs.order_id) {
            return Err(StoreError::OrderNotFound(packs.order_id));
        }
        tables.order_packs.insert(packs.order_id, packs.clone());
        Ok(())
    }

    fn order_packs(&self, order_id: Uuid) -> Result<OrderPacks, StoreError> {
        let tables = self.tables.read();
        if !tables.orders.contains_key(&order_id) {
            return Err(StoreError::OrderNotFound(order_id));
        }
        tables
            .order_packs
            .get(&order_id)
            .cloned()
            .ok_or(StoreError::OrderPacksNotFound(order_id))
    }
}
