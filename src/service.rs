//! Order workflow: reads orders and pack sizes from the store, runs the
//! solver, and persists the resulting breakdown.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::solver::{SolveError, Solver};
use crate::store::{OrderStore, PackStore};
use crate::types::{Order, OrderPacks, PackSizes};

pub const DEFAULT_MAX_QUANTITY: u32 = 1_000_000;

/// Store handle usable for both packs and orders.
pub trait Store: PackStore + OrderStore {}

impl<T: PackStore + OrderStore> Store for T {}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn Store>,
    max_quantity: u32,
}

impl OrderService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }

    /// Caps accepted order quantities, since solving cost grows with them.
    pub fn with_max_quantity(mut self, max_quantity: u32) -> Self {
        self.max_quantity = max_quantity;
        self
    }

    pub fn add_pack(&self, size: u32) -> Result<()> {
        if size == 0 {
            return Err(SolveError::ZeroPackSize.into());
        }
        self.store.add_pack(size)?;
        tracing::info!(size, "pack added");
        Ok(())
    }

    pub fn remove_pack(&self, size: u32) -> Result<()> {
        self.store.remove_pack(size)?;
        tracing::info!(size, "pack removed");
        Ok(())
    }

    /// Configured pack sizes, ascending.
    pub fn pack_sizes(&self) -> Result<Vec<u32>> {
        let mut sizes = self.store.available_pack_sizes()?;
        sizes.sort_unstable();
        Ok(sizes)
    }

    pub fn create_order(&self, quantity: u32) -> Result<Order> {
        if quantity == 0 {
            return Err(SolveError::ZeroQuantity.into());
        }
        if quantity > self.max_quantity {
            return Err(Error::QuantityAboveLimit {
                quantity,
                max: self.max_quantity,
            });
        }
        let order = Order {
            id: Uuid::new_v4(),
            quantity,
        };
        self.store.add_order(order)?;
        tracing::info!(order_id = %order.id, quantity, "order created");
        Ok(order)
    }

    /// Solves and persists the pack breakdown for a stored order.
    pub fn calculate_order_packs(&self, order_id: Uuid) -> Result<OrderPacks> {
        let quantity = self.store.order_quantity(order_id)?;
        let sizes = PackSizes::new(self.store.available_pack_sizes()?)?;
        tracing::debug!(%order_id, quantity, sizes = ?sizes.as_slice(), "calculating packs");

        let arrangement = Solver::new(sizes).solve(quantity)?;
        let packs = OrderPacks {
            order_id,
            quantity,
            arrangement,
        };
        self.store.save_order_packs(&packs)?;

        tracing::info!(
            %order_id,
            quantity,
            packs = %packs.arrangement,
            total_items = packs.arrangement.total_items(),
            "order packs saved"
        );
        Ok(packs)
    }

    /// Creates an order and immediately computes its breakdown.
    pub fn place_order(&self, quantity: u32) -> Result<OrderPacks> {
        let order = self.create_order(quantity)?;
        self.calculate_order_packs(order.id)
    }

    pub fn order_packs(&self, order_id: Uuid) -> Result<OrderPacks> {
        Ok(self.store.order_packs(order_id)?)
    }
}
