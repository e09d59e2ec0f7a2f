// crates/deflect-core/src/lib.rs
//
// deflect-core: Identity types, error taxonomy, and collaborator traits for
// the Deflect multi-reward staking pools.
//
// This is the leaf crate that the rest of the workspace depends on. It owns
// no pool state; it only defines the vocabulary shared by the reward engine
// (deflect-economics) and the deployment driver (deflect-deploy).

pub mod error;
pub mod identity;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use deflect_core::Address;`

// Identity types
pub use identity::{Address, AssetId, PoolId, Timestamp};

// Error type
pub use error::DeflectError;

// Traits
pub use traits::{AssetLedger, Clock};
