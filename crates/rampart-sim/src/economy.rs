//! Currency and tower purchases.

use hecs::{Entity, World};

use rampart_core::config::TowerCatalog;
use rampart_core::enums::TowerKind;
use rampart_core::error::BuildError;
use rampart_core::types::Vec2;

use crate::world_setup;

#[derive(Debug, Clone)]
pub struct Economy {
    pub currency: u32,
    pub catalog: TowerCatalog,
}

impl Economy {
    pub fn new(currency: u32, catalog: TowerCatalog) -> Self {
        Self { currency, catalog }
    }

    /// Cost of `kind` if this level offers it.
    pub fn cost_of(&self, kind: TowerKind) -> Option<u32> {
        self.catalog.get(kind).map(|spec| spec.cost)
    }

    pub fn can_afford(&self, kind: TowerKind) -> bool {
        self.check(kind).is_ok()
    }

    /// Deduct the cost and place a tower. A refused build changes nothing.
    pub fn build(
        &mut self,
        world: &mut World,
        kind: TowerKind,
        position: Vec2,
        node: Option<usize>,
    ) -> Result<Entity, BuildError> {
        let cost = self.check(kind)?;
        let spec = *self.catalog.get(kind).ok_or(BuildError::UnknownKind(kind))?;

        self.currency -= cost;
        let entity = world_setup::spawn_tower(world, &spec, position, node);
        tracing::info!(?kind, cost, currency = self.currency, "tower built");
        Ok(entity)
    }

    pub fn earn(&mut self, amount: u32) {
        self.currency = self.currency.saturating_add(amount);
    }

    fn check(&self, kind: TowerKind) -> Result<u32, BuildError> {
        let cost = self.cost_of(kind).ok_or(BuildError::UnknownKind(kind))?;
        if self.currency < cost {
            return Err(BuildError::InsufficientFunds {
                cost,
                have: self.currency,
            });
        }
        Ok(cost)
    }
}
