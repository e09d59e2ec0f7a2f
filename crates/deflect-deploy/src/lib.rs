// crates/deflect-deploy/src/lib.rs
//
// deflect-deploy: loads a deployment plan, applies it to a reward engine
// backed by the in-memory ledger, replays scripted staker actions, and
// reports pool and staker state.

pub mod config;
pub mod deploy;
pub mod output;
pub mod report;
pub mod shared;
pub mod simulate;

pub use config::DeploymentPlan;
pub use deploy::deploy;
pub use shared::SharedEngine;
