// crates/deflect-economics/tests/reward_scenarios.rs
//
// End-to-end reward distribution scenarios against the in-memory ledger.
//
// Each test drives a RewardDistributionEngine through the public API only:
// admin setup, staking, clock advances, claims, and boost purchases. Reward
// amounts are compared with a small tolerance because every division in the
// accrual math truncates.

use deflect_core::error::DeflectError;
use deflect_core::identity::{Address, AssetId};
use deflect_core::traits::AssetLedger;
use deflect_economics::{
    EngineConfig, FeeSchedule, InMemoryLedger, ManualClock, PoolStatus, RewardDistributionEngine,
};

type Engine = RewardDistributionEngine<InMemoryLedger, ManualClock>;

const ETHER: u128 = 1_000_000_000_000_000_000;
const START: u64 = 1_700_000_000;
/// Rounding slack for reward comparisons, in base units.
const DUST: u128 = 1_000_000;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn admin() -> Address {
    Address::from_low_u64_be(1)
}

fn alice() -> Address {
    Address::from_low_u64_be(10)
}

fn bob() -> Address {
    Address::from_low_u64_be(11)
}

fn carol() -> Address {
    Address::from_low_u64_be(12)
}

fn stake_token() -> AssetId {
    Address::repeat_byte(0x51)
}

fn reward_token() -> AssetId {
    Address::repeat_byte(0x52)
}

fn second_reward_token() -> AssetId {
    Address::repeat_byte(0x53)
}

fn boost_token() -> AssetId {
    Address::repeat_byte(0x60)
}

fn governance_token() -> AssetId {
    Address::repeat_byte(0x61)
}

fn treasury() -> Address {
    Address::from_low_u64_be(101)
}

fn dev_fund() -> Address {
    Address::from_low_u64_be(102)
}

fn custody() -> Address {
    Address::from_low_u64_be(100)
}

/// Engine with one reward pool (id 0), every staker holding 1000 staking
/// tokens and 10000 boost tokens, and the admin holding reward tokens.
fn setup() -> (Engine, ManualClock) {
    let clock = ManualClock::new(START);
    let mut ledger = InMemoryLedger::new();
    for staker in [alice(), bob(), carol()] {
        ledger.mint(&stake_token(), &staker, 1_000 * ETHER).unwrap();
        ledger.mint(&boost_token(), &staker, 10_000 * ETHER).unwrap();
    }
    ledger.mint(&reward_token(), &admin(), 100_000 * ETHER).unwrap();
    ledger
        .mint(&second_reward_token(), &admin(), 100_000 * ETHER)
        .unwrap();

    let config = EngineConfig {
        staking_asset: stake_token(),
        staking_decimals: 18,
        admin: admin(),
        custody: custody(),
        treasury: treasury(),
        dev_fund: dev_fund(),
        fees: FeeSchedule::default(),
        lock_duration: 0,
    };
    let mut engine = RewardDistributionEngine::new(config, ledger, clock.clone()).unwrap();
    engine.add_reward_pool(&admin(), reward_token()).unwrap();
    (engine, clock)
}

/// Move `amount` of `asset` from the admin into custody.
fn fund(engine: &mut Engine, asset: AssetId, amount: u128) {
    engine
        .ledger_mut()
        .transfer(&asset, &admin(), &custody(), amount)
        .unwrap();
}

fn fund_and_start(engine: &mut Engine, amount: u128, duration: u64) {
    fund(engine, reward_token(), amount);
    engine
        .start_reward_pool(&admin(), 0, amount, duration)
        .unwrap();
}

fn assert_within(actual: u128, expected: u128, tolerance: u128, label: &str) {
    let diff = actual.abs_diff(expected);
    assert!(
        diff <= tolerance,
        "{}: expected {} +/- {}, got {} (off by {})",
        label,
        expected,
        tolerance,
        actual,
        diff
    );
}

fn assert_supply_consistent(engine: &Engine) {
    let principal: u128 = engine.stakers().map(|(_, a)| a.principal).sum();
    let boosted: u128 = engine.stakers().map(|(_, a)| a.boosted_weight).sum();
    assert_eq!(principal, engine.total_supply(), "total supply drifted");
    assert_eq!(
        boosted,
        engine.boosted_total_supply(),
        "boosted total supply drifted"
    );
}

// ---------------------------------------------------------------------------
// Proportional accrual
// ---------------------------------------------------------------------------

#[test]
fn test_rewards_split_by_stake_share() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 75 * ETHER).unwrap();
    engine.stake(&bob(), 25 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(1_000);
    assert_within(
        engine.earned(&alice(), 0).unwrap(),
        1_875 * ETHER / 10,
        DUST,
        "alice after a quarter",
    );
    assert_within(
        engine.earned(&bob(), 0).unwrap(),
        625 * ETHER / 10,
        DUST,
        "bob after a quarter",
    );
    assert_eq!(engine.pool_status(0).unwrap(), PoolStatus::Active);
}

#[test]
fn test_full_window_pays_out_total() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 7 * ETHER).unwrap();
    engine.stake(&bob(), 13 * ETHER).unwrap();
    engine.stake(&carol(), 29 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(1_333);
    engine.stake(&alice(), 11 * ETHER).unwrap();
    clock.advance(1_111);
    engine.withdraw(&carol(), 9 * ETHER).unwrap();
    clock.advance(10_000);

    assert_eq!(engine.pool_status(0).unwrap(), PoolStatus::Finished);
    let mut paid = 0;
    for staker in [alice(), bob(), carol()] {
        paid += engine.claim(&staker, 0).unwrap();
    }
    assert!(paid <= 1_000 * ETHER, "paid out more than funded: {}", paid);
    assert_within(paid, 1_000 * ETHER, DUST, "sum of claims");
    assert_within(engine.pool(0).unwrap().reserved, 0, DUST, "reserved after claims");
}

#[test]
fn test_earned_never_decreases_and_keeps_ratio() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 30 * ETHER).unwrap();
    engine.stake(&bob(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    let mut last = 0;
    for _ in 0..10 {
        clock.advance(397);
        let a = engine.earned(&alice(), 0).unwrap();
        let b = engine.earned(&bob(), 0).unwrap();
        assert!(a >= last, "earned went down: {} -> {}", last, a);
        assert_within(a, 3 * b, DUST, "3:1 ratio");
        last = a;
    }
}

#[test]
fn test_zero_supply_window_is_not_paid() {
    let (mut engine, clock) = setup();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(1_000);
    engine.stake(&alice(), 10 * ETHER).unwrap();
    clock.advance(3_000);

    assert_within(
        engine.earned(&alice(), 0).unwrap(),
        750 * ETHER,
        DUST,
        "alice after joining late",
    );
    // A later stake cannot claim the skipped quarter either.
    engine.stake(&bob(), 10 * ETHER).unwrap();
    clock.advance(1_000);
    assert_eq!(engine.earned(&bob(), 0).unwrap(), 0);
}

#[test]
fn test_late_joiner_only_earns_from_join() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(2_000);
    engine.stake(&bob(), 10 * ETHER).unwrap();
    clock.advance(2_000);

    assert_within(engine.earned(&alice(), 0).unwrap(), 750 * ETHER, DUST, "alice");
    assert_within(engine.earned(&bob(), 0).unwrap(), 250 * ETHER, DUST, "bob");
}

#[test]
fn test_restart_folds_in_remaining_rewards() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(1_000);
    fund(&mut engine, reward_token(), 500 * ETHER);
    let plan = engine
        .start_reward_pool(&admin(), 0, 500 * ETHER, 4_000)
        .unwrap();
    assert_eq!(plan.carried_over, 750 * ETHER);
    assert_eq!(plan.total_to_distribute, 1_250 * ETHER);
    assert_eq!(engine.pool(0).unwrap().period_finish, START + 5_000);

    clock.advance(4_000);
    assert_within(
        engine.earned(&alice(), 0).unwrap(),
        1_500 * ETHER,
        DUST,
        "alice across both windows",
    );
}

#[test]
fn test_restart_needs_custody_to_cover_unclaimed() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);
    clock.advance(4_000);

    // 1000 emitted and unclaimed; a second 1000 needs 2000 in custody.
    fund(&mut engine, reward_token(), 999 * ETHER);
    let err = engine
        .start_reward_pool(&admin(), 0, 1_000 * ETHER, 4_000)
        .unwrap_err();
    assert!(matches!(err, DeflectError::InsufficientRewardBalance { .. }));

    fund(&mut engine, reward_token(), ETHER);
    engine
        .start_reward_pool(&admin(), 0, 1_000 * ETHER, 4_000)
        .unwrap();
    assert_eq!(engine.pool_status(0).unwrap(), PoolStatus::Active);
}

#[test]
fn test_finished_pool_restarts_in_place() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);
    clock.advance(5_000);
    assert_eq!(engine.pool_status(0).unwrap(), PoolStatus::Finished);

    assert_eq!(
        engine.add_reward_pool(&admin(), reward_token()),
        Err(DeflectError::DuplicatePool(reward_token()))
    );
    assert_eq!(engine.pool_length(), 1);

    fund(&mut engine, reward_token(), 500 * ETHER);
    engine
        .start_reward_pool(&admin(), 0, 500 * ETHER, 1_000)
        .unwrap();
    assert_eq!(engine.pool_status(0).unwrap(), PoolStatus::Active);
    clock.advance(1_000);
    assert_within(engine.earned(&alice(), 0).unwrap(), 1_500 * ETHER, DUST, "restarted pool");
}

#[test]
fn test_multiple_pools_accrue_independently() {
    let (mut engine, clock) = setup();
    engine
        .add_reward_pool(&admin(), second_reward_token())
        .unwrap();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(2_000);
    fund(&mut engine, second_reward_token(), 300 * ETHER);
    engine
        .start_reward_pool(&admin(), 1, 300 * ETHER, 1_000)
        .unwrap();
    clock.advance(2_000);

    let claimed = engine.claim_all(&alice()).unwrap();
    assert_eq!(claimed.len(), 2);
    assert_within(claimed[0].1, 1_000 * ETHER, DUST, "pool 0");
    assert_within(claimed[1].1, 300 * ETHER, DUST, "pool 1");
    assert_eq!(
        engine
            .ledger()
            .balance_of(&second_reward_token(), &alice()),
        claimed[1].1
    );
    assert!(engine.claim_all(&alice()).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[test]
fn test_fee_on_transfer_stake_credits_received_amount() {
    let (mut engine, _) = setup();
    engine
        .ledger_mut()
        .set_transfer_fee(&stake_token(), 1_000)
        .unwrap();

    let credited = engine.stake(&alice(), 100 * ETHER).unwrap();
    assert_eq!(credited, 90 * ETHER);
    assert_eq!(engine.balance_of(&alice()), 90 * ETHER);
    assert_eq!(engine.total_supply(), 90 * ETHER);
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &custody()),
        90 * ETHER
    );
}

#[test]
fn test_deposit_consumed_by_transfer_fee_is_rejected() {
    let (mut engine, _) = setup();
    add_local_tiers(&mut engine);
    engine
        .ledger_mut()
        .set_transfer_fee(&stake_token(), 10_000)
        .unwrap();
    engine
        .ledger_mut()
        .set_transfer_fee(&boost_token(), 10_000)
        .unwrap();

    assert!(matches!(
        engine.stake(&alice(), 100 * ETHER),
        Err(DeflectError::InvalidAmount(_))
    ));
    assert!(matches!(
        engine.purchase(&alice(), boost_token(), 1),
        Err(DeflectError::InvalidAmount(_))
    ));
    assert!(engine.account(&alice()).is_none());
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &alice()),
        1_000 * ETHER
    );
    assert_eq!(
        engine.ledger().balance_of(&boost_token(), &alice()),
        10_000 * ETHER
    );
    assert_eq!(engine.ledger().total_supply(&boost_token()), 30_000 * ETHER);
}

#[test]
fn test_withdraw_fee_goes_to_treasury() {
    let (mut engine, _) = setup();
    engine.set_fees(&admin(), 150, 0).unwrap();
    engine.stake(&alice(), 100 * ETHER).unwrap();

    let split = engine.withdraw(&alice(), 100 * ETHER).unwrap();
    assert_eq!(split.to_staker, 985 * ETHER / 10);
    assert_eq!(split.to_treasury, 15 * ETHER / 10);
    assert_eq!(split.burned, 0);
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &alice()),
        9_985 * ETHER / 10
    );
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &treasury()),
        15 * ETHER / 10
    );
    assert_eq!(engine.balance_of(&alice()), 0);
}

#[test]
fn test_token_fee_is_burned() {
    let (mut engine, _) = setup();
    engine.set_fees(&admin(), 100, 200).unwrap();
    engine.stake(&alice(), 100 * ETHER).unwrap();

    let split = engine.withdraw(&alice(), 50 * ETHER).unwrap();
    assert_eq!(split.to_treasury, ETHER / 2);
    assert_eq!(split.burned, ETHER);
    assert_eq!(split.to_staker, 485 * ETHER / 10);
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &Address::DEAD),
        ETHER
    );
    assert_eq!(engine.balance_of(&alice()), 50 * ETHER);
}

// ---------------------------------------------------------------------------
// Boosts
// ---------------------------------------------------------------------------

fn add_local_tiers(engine: &mut Engine) {
    engine
        .add_local_boost(
            &admin(),
            boost_token(),
            &[2_500 * ETHER, 3_000 * ETHER, 3_500 * ETHER, 4_000 * ETHER],
            &[500, 1_000, 2_000, 3_000],
        )
        .unwrap();
}

#[test]
fn test_boost_payment_split() {
    let (mut engine, _) = setup();
    add_local_tiers(&mut engine);

    let split = engine.purchase(&alice(), boost_token(), 1).unwrap();
    assert_eq!(split.to_dev_fund, 625 * ETHER);
    assert_eq!(split.to_treasury, 1_875 * ETHER);
    assert_eq!(
        engine.ledger().balance_of(&boost_token(), &dev_fund()),
        625 * ETHER
    );
    assert_eq!(
        engine.ledger().balance_of(&boost_token(), &treasury()),
        1_875 * ETHER
    );
    assert_eq!(
        engine.ledger().balance_of(&boost_token(), &alice()),
        7_500 * ETHER
    );
    assert_eq!(engine.ledger().balance_of(&boost_token(), &custody()), 0);
}

#[test]
fn test_purchase_only_upgrades() {
    let (mut engine, _) = setup();
    add_local_tiers(&mut engine);
    engine.purchase(&alice(), boost_token(), 2).unwrap();

    for level in [1, 2] {
        assert_eq!(
            engine.purchase(&alice(), boost_token(), level),
            Err(DeflectError::BoostAlreadyOwned {
                asset: boost_token(),
                held: 2,
                requested: level
            })
        );
    }
    assert_eq!(
        engine.purchase(&alice(), boost_token(), 5),
        Err(DeflectError::UnknownTier {
            asset: boost_token(),
            level: 5
        })
    );
    assert!(engine.purchase(&alice(), boost_token(), 3).is_ok());
    assert_eq!(engine.account(&alice()).unwrap().local_level(&boost_token()), 3);
}

#[test]
fn test_shrunk_boost_table_keeps_top_tier() {
    let (mut engine, _) = setup();
    engine
        .add_local_boost(
            &admin(),
            boost_token(),
            &[2_500 * ETHER, 3_000 * ETHER, 3_500 * ETHER],
            &[500, 1_000, 2_000],
        )
        .unwrap();
    engine.stake(&alice(), 100 * ETHER).unwrap();
    engine.purchase(&alice(), boost_token(), 3).unwrap();
    assert_eq!(engine.boosted_balance_of(&alice()), 20 * ETHER);

    engine
        .update_local_boost(&admin(), boost_token(), &[1_000 * ETHER, 2_000 * ETHER], &[700, 1_500])
        .unwrap();
    assert_eq!(engine.refresh_boost(&alice()).unwrap(), 15 * ETHER);
    assert_eq!(
        engine.purchase(&alice(), boost_token(), 2),
        Err(DeflectError::BoostAlreadyOwned {
            asset: boost_token(),
            held: 2,
            requested: 2
        })
    );
    assert_eq!(
        engine.purchase(&alice(), boost_token(), 3),
        Err(DeflectError::UnknownTier {
            asset: boost_token(),
            level: 3
        })
    );
    assert_eq!(
        engine.ledger().balance_of(&boost_token(), &alice()),
        6_500 * ETHER
    );

    // Growing the table back restores the purchased level.
    engine
        .update_local_boost(
            &admin(),
            boost_token(),
            &[2_500 * ETHER, 3_000 * ETHER, 3_500 * ETHER, 4_000 * ETHER],
            &[500, 1_000, 2_000, 3_000],
        )
        .unwrap();
    assert_eq!(engine.refresh_boost(&alice()).unwrap(), 20 * ETHER);
    assert!(engine.purchase(&alice(), boost_token(), 4).is_ok());
    assert_supply_consistent(&engine);
}

#[test]
fn test_global_and_local_boost_weights_add() {
    let (mut engine, _) = setup();
    add_local_tiers(&mut engine);
    engine
        .add_global_boost(
            &admin(),
            governance_token(),
            &[100 * ETHER, 500 * ETHER],
            &[1_000, 2_500],
        )
        .unwrap();
    engine
        .ledger_mut()
        .mint(&governance_token(), &alice(), 600 * ETHER)
        .unwrap();

    engine.stake(&alice(), 100 * ETHER).unwrap();
    assert_eq!(engine.boosted_balance_of(&alice()), 25 * ETHER);

    engine.purchase(&alice(), boost_token(), 2).unwrap();
    assert_eq!(engine.boosted_balance_of(&alice()), 35 * ETHER);
    assert_eq!(engine.balance_of(&alice()), 100 * ETHER);

    // Dropping below the first global tier is picked up on refresh.
    engine
        .ledger_mut()
        .transfer(&governance_token(), &alice(), &bob(), 550 * ETHER)
        .unwrap();
    assert_eq!(engine.refresh_boost(&alice()).unwrap(), 10 * ETHER);
    assert_eq!(engine.boosted_total_supply(), 10 * ETHER);
    assert_supply_consistent(&engine);
}

#[test]
fn test_boosted_stake_earns_more() {
    let (mut engine, clock) = setup();
    engine
        .add_local_boost(&admin(), boost_token(), &[1_000 * ETHER], &[10_000])
        .unwrap();
    engine.purchase(&alice(), boost_token(), 1).unwrap();
    engine.stake(&alice(), 50 * ETHER).unwrap();
    engine.stake(&bob(), 100 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);

    clock.advance(4_000);
    assert_within(engine.earned(&alice(), 0).unwrap(), 500 * ETHER, DUST, "boosted alice");
    assert_within(engine.earned(&bob(), 0).unwrap(), 500 * ETHER, DUST, "plain bob");
}

// ---------------------------------------------------------------------------
// Accounting and failure atomicity
// ---------------------------------------------------------------------------

#[test]
fn test_total_supply_tracks_principals() {
    let (mut engine, clock) = setup();
    engine
        .ledger_mut()
        .set_transfer_fee(&stake_token(), 250)
        .unwrap();
    engine.set_fees(&admin(), 150, 50).unwrap();
    add_local_tiers(&mut engine);

    engine.stake(&alice(), 40 * ETHER).unwrap();
    engine.stake(&bob(), 33 * ETHER).unwrap();
    engine.purchase(&bob(), boost_token(), 3).unwrap();
    clock.advance(60);
    engine.withdraw(&alice(), 10 * ETHER).unwrap();
    engine.stake(&carol(), 1).unwrap();
    engine.exit(&bob()).unwrap();
    engine.stake(&alice(), 7 * ETHER).unwrap();

    assert_supply_consistent(&engine);
    assert_eq!(engine.balance_of(&bob()), 0);
    assert_eq!(engine.boosted_balance_of(&bob()), 0);
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &custody()),
        engine.total_supply()
    );
}

#[test]
fn test_failed_stake_leaves_pool_untouched() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);
    clock.advance(500);

    let before = engine.pool(0).unwrap().clone();
    let err = engine.stake(&bob(), 5_000 * ETHER).unwrap_err();
    assert!(matches!(err, DeflectError::InsufficientBalance { .. }));
    assert_eq!(engine.pool(0).unwrap(), &before);
    assert!(engine.account(&bob()).is_none());
}

#[test]
fn test_exit_claims_and_withdraws() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);
    clock.advance(4_000);

    let receipt = engine.exit(&alice()).unwrap();
    assert_eq!(receipt.claimed.len(), 1);
    assert_within(receipt.claimed[0].1, 1_000 * ETHER, DUST, "exit claim");
    assert_eq!(receipt.withdrawn.unwrap().to_staker, 10 * ETHER);
    assert_eq!(engine.balance_of(&alice()), 0);
    assert_eq!(
        engine.ledger().balance_of(&stake_token(), &alice()),
        1_000 * ETHER
    );
}

#[test]
fn test_exit_respects_lock() {
    let (mut engine, clock) = setup();
    engine.set_lock_duration(&admin(), 3 * 3_600).unwrap();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);
    clock.advance(3_600);

    assert_eq!(
        engine.exit(&alice()),
        Err(DeflectError::StakeLocked {
            unlocks_at: START + 3 * 3_600
        })
    );
    assert_eq!(engine.ledger().balance_of(&reward_token(), &alice()), 0);

    clock.advance(2 * 3_600);
    assert!(engine.exit(&alice()).is_ok());
}

#[test]
fn test_rejected_exit_pays_no_rewards() {
    let (mut engine, clock) = setup();
    engine.stake(&alice(), 10 * ETHER).unwrap();
    fund_and_start(&mut engine, 1_000 * ETHER, 4_000);
    clock.advance(4_000);
    engine
        .ledger_mut()
        .transfer(&stake_token(), &custody(), &carol(), ETHER)
        .unwrap();

    assert_eq!(
        engine.exit(&alice()),
        Err(DeflectError::InsufficientBalance {
            requested: 10 * ETHER,
            available: 9 * ETHER
        })
    );
    assert_eq!(engine.ledger().balance_of(&reward_token(), &alice()), 0);
    assert_eq!(engine.balance_of(&alice()), 10 * ETHER);
    assert_within(engine.earned(&alice(), 0).unwrap(), 1_000 * ETHER, DUST, "kept earnings");
}

#[test]
fn test_admin_only_operations() {
    let (mut engine, _) = setup();
    let unauthorized = Err(DeflectError::Unauthorized(bob()));
    assert_eq!(engine.set_lock_duration(&bob(), 1), unauthorized);
    assert_eq!(engine.transfer_admin(&bob(), bob()), unauthorized);
    assert_eq!(
        engine.add_local_boost(&bob(), boost_token(), &[1], &[1]),
        unauthorized
    );
    assert!(matches!(
        engine.add_reward_pool(&bob(), second_reward_token()),
        Err(DeflectError::Unauthorized(_))
    ));
    assert!(matches!(
        engine.start_reward_pool(&bob(), 0, ETHER, 10),
        Err(DeflectError::Unauthorized(_))
    ));
    assert_eq!(engine.pool_length(), 1);
    assert_eq!(engine.config().admin, admin());
}
