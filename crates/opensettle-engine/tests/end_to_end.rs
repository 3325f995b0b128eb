//! End-to-end settlement scenarios.
//!
//! These tests exercise the full engine surface in realistic flows: direct
//! and swap-mediated settlement, fee accrual and claim, provider
//! governance, adversarial exchanges (reentrancy, under-delivery, opaque
//! failures), and the atomicity guarantee that a failed call leaves every
//! balance untouched.

use opensettle_engine::{
    ExchangeCall, ExchangeInvoker, InvokeOutcome, SettlementEngine, SettlementHost,
};
use opensettle_ledger::{AssetLedger, InMemoryLedger};
use opensettle_types::{
    AccountId, Amount, AssetId, CallContext, EngineConfig, OrderRef, RequestKind, SettleError,
    SwapDirection, SwapInstruction, TransferRequest,
};

const ADMIN: AccountId = AccountId([0xadu8; 20]);
const ENGINE: AccountId = AccountId([0xeeu8; 20]);
const ALICE: AccountId = AccountId([0x01u8; 20]);
const MERCHANT: AccountId = AccountId([0x02u8; 20]);
const EXCHANGE: AccountId = AccountId([0x0du8; 20]);
const TREASURY: AccountId = AccountId([0x77u8; 20]);

fn usdc() -> AssetId {
    AssetId::token("USDC")
}

fn weth() -> AssetId {
    AssetId::token("WETH")
}

/// Scenario harness: a funded payer, a stocked exchange, and an engine with
/// the exchange whitelisted.
struct Harness {
    eng: SettlementEngine<InMemoryLedger>,
}

impl Harness {
    fn new() -> Self {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(ALICE, &usdc(), Amount::new(1_000));
        ledger.mint(ALICE, &weth(), Amount::new(1_000));
        ledger.mint(EXCHANGE, &usdc(), Amount::new(100_000));
        ledger
            .approve(&usdc(), ALICE, ENGINE, Amount::UNLIMITED)
            .unwrap();
        ledger
            .approve(&weth(), ALICE, ENGINE, Amount::UNLIMITED)
            .unwrap();

        let mut eng = SettlementEngine::new(EngineConfig::new(ENGINE, ADMIN), ledger);
        eng.approve_provider(ADMIN, EXCHANGE).unwrap();
        Self { eng }
    }

    fn direct_request(&self, order: &str, input: u128, output: u128) -> TransferRequest {
        TransferRequest {
            order_ref: OrderRef::new(order),
            input_asset: usdc(),
            output_asset: usdc(),
            input_amount: Amount::new(input),
            output_amount: Amount::new(output),
            merchant: MERCHANT,
            deadline: 1_000,
        }
    }

    fn swap_request(&self, order: &str, input: u128, output: u128) -> TransferRequest {
        TransferRequest {
            order_ref: OrderRef::new(order),
            input_asset: weth(),
            output_asset: usdc(),
            input_amount: Amount::new(input),
            output_amount: Amount::new(output),
            merchant: MERCHANT,
            deadline: 1_000,
        }
    }

    fn instruction(&self, direction: SwapDirection) -> SwapInstruction {
        SwapInstruction {
            direction,
            exchange: EXCHANGE,
            native_value: Amount::ZERO,
            payload: vec![0x01],
            grant_allowance: true,
        }
    }

    fn ctx(&self) -> CallContext {
        CallContext::new(ALICE, 500)
    }

    fn balances(&self) -> Vec<(AccountId, AssetId, Amount)> {
        let accounts = [ALICE, MERCHANT, EXCHANGE, ENGINE, TREASURY];
        let assets = [usdc(), weth(), AssetId::Native];
        let mut out = Vec::new();
        for account in accounts {
            for asset in &assets {
                out.push((account, asset.clone(), self.eng.ledger().balance_of(account, asset)));
            }
        }
        out
    }
}

/// Exchange that takes `take` input via allowance and delivers `give`
/// output from its own inventory.
struct Dex {
    take: Amount,
    give: Amount,
}

impl ExchangeInvoker for Dex {
    fn invoke(&mut self, host: &mut dyn SettlementHost, call: ExchangeCall<'_>) -> InvokeOutcome {
        let ledger = host.ledger_mut();
        if ledger
            .transfer_from(&weth(), call.exchange, ENGINE, call.exchange, self.take)
            .is_err()
        {
            return InvokeOutcome::Reverted(b"allowance".to_vec());
        }
        if ledger
            .transfer(&usdc(), call.exchange, ENGINE, self.give)
            .is_err()
        {
            return InvokeOutcome::Reverted(b"inventory".to_vec());
        }
        InvokeOutcome::Delivered
    }
}

// =============================================================================
// Direct settlement
// =============================================================================

#[test]
fn e2e_direct_payment() {
    // request{in=100 USDC, out=95 USDC}: merchant gets 95, engine keeps 5.
    let mut h = Harness::new();
    let req = h.direct_request("order-100", 100, 95);

    let outcome = h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();
    assert_eq!(outcome.spent, Amount::new(100));
    assert_eq!(outcome.fee, Amount::new(5));

    assert_eq!(h.eng.ledger().balance_of(MERCHANT, &usdc()), Amount::new(95));
    assert_eq!(h.eng.accrued_fees(&usdc()), Amount::new(5));
    assert_eq!(h.eng.ledger().balance_of(ALICE, &usdc()), Amount::new(900));

    let event = h.eng.events().last().unwrap();
    assert_eq!(event.order_ref, OrderRef::new("order-100"));
    assert_eq!(event.fee, Amount::new(5));
    assert_eq!(event.output_amount, Amount::new(95));
    assert_eq!(event.merchant, MERCHANT);
}

#[test]
fn e2e_expired_request_aborts_every_path() {
    let mut h = Harness::new();
    let before = h.balances();

    let mut direct = h.direct_request("late-1", 100, 95);
    direct.deadline = 499;
    let err = h.eng.settle(&h.ctx(), RequestKind::Payment, &direct).unwrap_err();
    assert!(matches!(err, SettleError::Expired { .. }));

    let mut swap = h.swap_request("late-2", 100, 95);
    swap.deadline = 499;
    let instruction = h.instruction(SwapDirection::Sell);
    let err = h
        .eng
        .settle_with_swap(
            &h.ctx(),
            RequestKind::Payment,
            &swap,
            &instruction,
            &mut Dex {
                take: Amount::new(100),
                give: Amount::new(95),
            },
        )
        .unwrap_err();
    assert!(matches!(err, SettleError::Expired { .. }));

    // No asset moved anywhere on either path.
    assert_eq!(h.balances(), before);
    assert!(h.eng.events().is_empty());
}

// =============================================================================
// Swap settlement
// =============================================================================

#[test]
fn e2e_sell_swap_full_input_with_fee() {
    // WETH -> USDC via SELL: exchange produces 100, merchant is owed 95,
    // engine retains 5, spent is the full declared input, no refund.
    let mut h = Harness::new();
    let req = h.swap_request("swap-1", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);

    let outcome = h
        .eng
        .settle_with_swap(
            &h.ctx(),
            RequestKind::Payment,
            &req,
            &instruction,
            &mut Dex {
                take: Amount::new(1_000),
                give: Amount::new(100),
            },
        )
        .unwrap();

    assert_eq!(outcome.spent, Amount::new(1_000));
    assert_eq!(outcome.fee, Amount::new(5));
    assert_eq!(h.eng.ledger().balance_of(MERCHANT, &usdc()), Amount::new(95));
    assert_eq!(h.eng.accrued_fees(&usdc()), Amount::new(5));
    assert_eq!(h.eng.ledger().balance_of(ALICE, &weth()), Amount::ZERO);

    let event = h.eng.events().last().unwrap();
    assert_eq!(event.input_amount, Amount::new(1_000));
    assert_eq!(event.input_asset, weth());
    assert_eq!(event.output_asset, usdc());
}

#[test]
fn e2e_exact_delivery_zero_fee() {
    let mut h = Harness::new();
    let req = h.swap_request("swap-2", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);

    let outcome = h
        .eng
        .settle_with_swap(
            &h.ctx(),
            RequestKind::Payment,
            &req,
            &instruction,
            &mut Dex {
                take: Amount::new(1_000),
                give: Amount::new(95),
            },
        )
        .unwrap();

    assert_eq!(outcome.fee, Amount::ZERO);
    // Net of the merchant transfer the engine holds no output asset.
    assert_eq!(h.eng.accrued_fees(&usdc()), Amount::ZERO);
}

#[test]
fn e2e_buy_swap_refunds_remainder() {
    let mut h = Harness::new();
    let req = h.swap_request("swap-3", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Buy);

    let outcome = h
        .eng
        .settle_with_swap(
            &h.ctx(),
            RequestKind::Payment,
            &req,
            &instruction,
            &mut Dex {
                take: Amount::new(650),
                give: Amount::new(95),
            },
        )
        .unwrap();

    assert_eq!(outcome.spent, Amount::new(650));
    // Exactly declared - spent comes back.
    assert_eq!(h.eng.ledger().balance_of(ALICE, &weth()), Amount::new(350));
}

#[test]
fn e2e_non_whitelisted_provider_always_rejected() {
    let mut h = Harness::new();
    h.eng.revoke_provider(ADMIN, EXCHANGE).unwrap();

    let req = h.swap_request("swap-4", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);
    let before = h.balances();

    let err = h
        .eng
        .settle_with_swap(
            &h.ctx(),
            RequestKind::Payment,
            &req,
            &instruction,
            &mut Dex {
                take: Amount::new(1_000),
                give: Amount::new(100),
            },
        )
        .unwrap_err();

    assert!(matches!(err, SettleError::ProviderNotWhitelisted(e) if e == EXCHANGE));
    assert_eq!(h.balances(), before);
}

#[test]
fn e2e_exchange_failure_unwinds_and_preserves_diagnostic() {
    struct Failing;
    impl ExchangeInvoker for Failing {
        fn invoke(&mut self, _: &mut dyn SettlementHost, _: ExchangeCall<'_>) -> InvokeOutcome {
            InvokeOutcome::Reverted(vec![0x4e, 0x48, 0x3b])
        }
    }

    let mut h = Harness::new();
    let req = h.swap_request("swap-5", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);
    let before = h.balances();

    let err = h
        .eng
        .settle_with_swap(&h.ctx(), RequestKind::Payment, &req, &instruction, &mut Failing)
        .unwrap_err();

    match err {
        SettleError::ExternalCallFailure { payload } => {
            assert_eq!(payload, vec![0x4e, 0x48, 0x3b]);
        }
        other => panic!("expected ExternalCallFailure, got {other:?}"),
    }
    assert_eq!(h.balances(), before);
}

// =============================================================================
// Adversarial exchange: reentrancy
// =============================================================================

/// Exchange that tries to re-enter the settlement entry point mid-call and
/// records what it observed.
struct Reentrant {
    observed: Option<SettleError>,
    then_deliver: bool,
}

impl ExchangeInvoker for Reentrant {
    fn invoke(&mut self, host: &mut dyn SettlementHost, call: ExchangeCall<'_>) -> InvokeOutcome {
        let inner_req = TransferRequest {
            order_ref: OrderRef::new("reentry"),
            input_asset: AssetId::token("USDC"),
            output_asset: AssetId::token("USDC"),
            input_amount: Amount::new(10),
            output_amount: Amount::new(10),
            merchant: EXCHANGE,
            deadline: u64::MAX,
        };
        let inner_ctx = CallContext::new(ALICE, 500);
        self.observed = host
            .settle(&inner_ctx, RequestKind::Payment, &inner_req)
            .err();

        if self.then_deliver {
            let ledger = host.ledger_mut();
            if ledger
                .transfer_from(
                    &AssetId::token("WETH"),
                    call.exchange,
                    ENGINE,
                    call.exchange,
                    Amount::new(1_000),
                )
                .is_err()
            {
                return InvokeOutcome::Reverted(b"allowance".to_vec());
            }
            if ledger
                .transfer(&AssetId::token("USDC"), call.exchange, ENGINE, Amount::new(95))
                .is_err()
            {
                return InvokeOutcome::Reverted(b"inventory".to_vec());
            }
            InvokeOutcome::Delivered
        } else {
            InvokeOutcome::Reverted(b"reentry blocked".to_vec())
        }
    }
}

#[test]
fn e2e_reentrant_call_is_rejected_but_outer_settles() {
    let mut h = Harness::new();
    let req = h.swap_request("swap-6", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);
    let mut attacker = Reentrant {
        observed: None,
        then_deliver: true,
    };

    let outcome = h
        .eng
        .settle_with_swap(&h.ctx(), RequestKind::Payment, &req, &instruction, &mut attacker)
        .unwrap();

    // The inner attempt was rejected by the guard; the outer call is intact.
    assert!(matches!(attacker.observed, Some(SettleError::ReentrantCall)));
    assert_eq!(outcome.spent, Amount::new(1_000));
    assert_eq!(h.eng.ledger().balance_of(MERCHANT, &usdc()), Amount::new(95));
    // Exactly one event: the outer settlement.
    assert_eq!(h.eng.events().len(), 1);
}

#[test]
fn e2e_reentrant_exchange_revert_unwinds_everything() {
    let mut h = Harness::new();
    let req = h.swap_request("swap-7", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);
    let before = h.balances();
    let mut attacker = Reentrant {
        observed: None,
        then_deliver: false,
    };

    let err = h
        .eng
        .settle_with_swap(&h.ctx(), RequestKind::Payment, &req, &instruction, &mut attacker)
        .unwrap_err();

    assert!(matches!(attacker.observed, Some(SettleError::ReentrantCall)));
    assert!(matches!(err, SettleError::ExternalCallFailure { .. }));
    assert_eq!(h.balances(), before);
    assert!(h.eng.events().is_empty());
}

// =============================================================================
// Replay and donations
// =============================================================================

#[test]
fn e2e_replay_same_order_ref_settles_again() {
    // No per-order replay protection: the same correlation id settles twice
    // and the merchant is paid twice. Divergence from the documented
    // "one payment per order" guarantee is recorded in DESIGN.md.
    let mut h = Harness::new();
    let req = h.direct_request("order-dup", 100, 95);

    h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();
    h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();

    assert_eq!(h.eng.ledger().balance_of(MERCHANT, &usdc()), Amount::new(190));
    assert_eq!(h.eng.events().len(), 2);
    let refs: Vec<_> = h.eng.events().iter().map(|e| e.order_ref.clone()).collect();
    assert_eq!(refs, vec![OrderRef::new("order-dup"), OrderRef::new("order-dup")]);
}

#[test]
fn e2e_donation_deadline_enforced() {
    // Donations run through the same validator as payments.
    let mut h = Harness::new();
    let mut req = h.direct_request("donation-1", 100, 100);
    req.deadline = 499;

    let err = h.eng.settle(&h.ctx(), RequestKind::Donation, &req).unwrap_err();
    assert!(matches!(err, SettleError::Expired { .. }));

    req.deadline = 1_000;
    let outcome = h.eng.settle(&h.ctx(), RequestKind::Donation, &req).unwrap();
    assert_eq!(outcome.fee, Amount::ZERO);
    assert_eq!(h.eng.events().last().unwrap().kind, RequestKind::Donation);
}

// =============================================================================
// Fees and governance
// =============================================================================

#[test]
fn e2e_fee_accrual_and_claim() {
    let mut h = Harness::new();

    // Two settlements accrue 5 + 3 USDC of fees.
    let req = h.direct_request("fee-1", 100, 95);
    h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();
    let req = h.direct_request("fee-2", 50, 47);
    h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();

    assert_eq!(h.eng.accrued_fees(&usdc()), Amount::new(8));

    let claimed = h.eng.claim_fees(ADMIN, &usdc(), TREASURY).unwrap();
    assert_eq!(claimed, Amount::new(8));
    assert_eq!(h.eng.ledger().balance_of(TREASURY, &usdc()), Amount::new(8));
    assert_eq!(h.eng.accrued_fees(&usdc()), Amount::ZERO);
}

#[test]
fn e2e_direct_transfer_inflates_claimable_fee() {
    // Residual-balance fee model: tokens sent straight to the engine outside
    // of settlement become claimable too.
    let mut h = Harness::new();
    let req = h.direct_request("fee-3", 100, 95);
    h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();

    // Alice "tips" the engine directly on the ledger.
    // (900 remaining after the settlement above.)
    let mut eng_ledger = h.eng.ledger().clone();
    eng_ledger
        .transfer(&usdc(), ALICE, ENGINE, Amount::new(10))
        .unwrap();
    let mut eng = SettlementEngine::new(EngineConfig::new(ENGINE, ADMIN), eng_ledger);
    assert_eq!(eng.accrued_fees(&usdc()), Amount::new(15));

    let claimed = eng.claim_fees(ADMIN, &usdc(), TREASURY).unwrap();
    assert_eq!(claimed, Amount::new(15));
}

#[test]
fn e2e_allowance_grant_survives_call_until_reset() {
    let mut h = Harness::new();
    let req = h.swap_request("swap-8", 1_000, 95);
    let instruction = h.instruction(SwapDirection::Sell);

    h.eng
        .settle_with_swap(
            &h.ctx(),
            RequestKind::Payment,
            &req,
            &instruction,
            &mut Dex {
                take: Amount::new(1_000),
                give: Amount::new(95),
            },
        )
        .unwrap();

    // The unlimited grant is still outstanding after settlement.
    assert_eq!(
        h.eng.ledger().allowance(&weth(), ENGINE, EXCHANGE),
        Amount::UNLIMITED
    );

    h.eng.reset_allowance(ADMIN, &weth(), EXCHANGE).unwrap();
    assert_eq!(h.eng.ledger().allowance(&weth(), ENGINE, EXCHANGE), Amount::ZERO);
}

// =============================================================================
// Audit trail
// =============================================================================

#[test]
fn e2e_events_are_ordered_and_digestible() {
    let mut h = Harness::new();
    for (order, input, output) in [("a", 100u128, 95u128), ("b", 50, 50), ("c", 30, 20)] {
        let req = h.direct_request(order, input, output);
        h.eng.settle(&h.ctx(), RequestKind::Payment, &req).unwrap();
    }

    let refs: Vec<_> = h
        .eng
        .events()
        .iter()
        .map(|e| e.order_ref.as_str().to_string())
        .collect();
    assert_eq!(refs, ["a", "b", "c"]);

    for event in h.eng.events().iter() {
        assert_eq!(event.digest_hex().len(), 64);
    }
}
