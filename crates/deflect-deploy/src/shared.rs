// crates/deflect-deploy/src/shared.rs
//
// SharedEngine: the deployed engine behind a single-writer lock.
//
// Every mutating engine call takes the write lock for the whole operation,
// so no two stake/withdraw/claim/purchase calls interleave. Reports take the
// read lock.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use deflect_economics::{InMemoryLedger, ManualClock, RewardDistributionEngine};

/// Engine type driven by the deployment tool.
pub type Engine = RewardDistributionEngine<InMemoryLedger, ManualClock>;

#[derive(Clone)]
pub struct SharedEngine {
    engine: Arc<RwLock<Engine>>,
    /// Handle on the engine's clock; moving it is visible to the engine.
    clock: ManualClock,
}

impl SharedEngine {
    pub fn new(engine: Engine, clock: ManualClock) -> Self {
        Self {
            engine: Arc::new(RwLock::new(engine)),
            clock,
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Engine> {
        self.engine.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Engine> {
        self.engine.write().await
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }
}
