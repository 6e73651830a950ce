//! # Admission Scenarios
//!
//! Fee floors, priority and the free-message lane, exercised through the
//! minimal chain the way the candidate pool sees them.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ante_handler::domain::{ErrorKind, StdTx, MIN_PRIORITY};
    use ante_handler::{AnteConfig, AnteError, ExecutionMode};
    use proptest::prelude::*;

    fn funded_sender(node: &Node) -> TestKey {
        let key = TestKey::secp256k1();
        node.fund(&key, uinit(10_000_000));
        key
    }

    fn send_tx(key: &TestKey, fee: shared_types::Coins) -> StdTx {
        sign(
            StdTx::new(vec![send(key)]).with_fee(fee, GAS),
            &[(key, 0)],
            CHAIN_ID,
        )
    }

    // =========================================================================
    // PRIORITY
    // =========================================================================

    #[test]
    fn test_priority_counts_every_convertible_denom() {
        let node = Node::new();
        let alice = funded_sender(&node);
        // 2,000 uinit + 1,000 uusdc at 2 uinit each.
        let tx = send_tx(&alice, coins(&[("uinit", 2_000), ("uusdc", 1_000)]));

        let (ctx, result) = node.run(ExecutionMode::Check, &tx);
        result.unwrap();
        assert_eq!(ctx.priority(), 4_000);
    }

    #[test]
    fn test_unpriced_denom_adds_nothing() {
        let node = Node::new();
        let alice = funded_sender(&node);
        let tx = send_tx(&alice, coins(&[("uatom", 1_000_000), ("uinit", 2_000)]));

        let (ctx, result) = node.run(ExecutionMode::Check, &tx);
        result.unwrap();
        assert_eq!(ctx.priority(), 2_000);
    }

    #[test]
    fn test_live_floor_rejection_names_both_prices() {
        let node = Node::new();
        let alice = funded_sender(&node);
        let tx = send_tx(&alice, uinit(1_000));

        let (_, result) = node.run(ExecutionMode::Check, &tx);
        assert_eq!(
            result.unwrap_err(),
            AnteError::GasPriceTooLow {
                effective: "0.005000000000000000".into(),
                base_gas_price: "0.010000000000000000".into(),
            }
        );
    }

    #[test]
    fn test_recheck_prices_without_reverifying() {
        let node = Node::new();
        let alice = funded_sender(&node);
        let tx = sign(
            StdTx::new(vec![send(&alice)]).with_fee(uinit(3_000), GAS),
            &[(&alice, 0)],
            "some-other-chain",
        );

        let (_, check) = node.run(ExecutionMode::Check, &tx);
        assert!(matches!(check, Err(AnteError::Unauthorized(_))));

        let (ctx, recheck) = node.run(ExecutionMode::ReCheck, &tx);
        recheck.unwrap();
        assert_eq!(ctx.priority(), 3_000);
    }

    // =========================================================================
    // FLOORS
    // =========================================================================

    #[test]
    fn test_floors_are_independent() {
        // Validator floor in a denom the fee does not carry; live floor met.
        let node = Node::with_config(AnteConfig {
            min_gas_prices: "1uatom".parse().unwrap(),
            ..Default::default()
        });
        let alice = funded_sender(&node);
        let (_, result) = node.run(ExecutionMode::Check, &send_tx(&alice, uinit(2_000)));
        result.unwrap();

        // Live floor far above the fee; validator floor met.
        let node = Node::with_config(AnteConfig {
            min_gas_prices: "0.001uinit".parse().unwrap(),
            ..Default::default()
        });
        node.dynamic_fee.set_base_gas_price(dec("1"));
        let bob = funded_sender(&node);
        let (_, result) = node.run(ExecutionMode::Check, &send_tx(&bob, uinit(2_000)));
        result.unwrap();

        // Neither.
        let carol = funded_sender(&node);
        let (_, result) = node.run(ExecutionMode::Check, &send_tx(&carol, uinit(100)));
        assert_eq!(
            result.unwrap_err(),
            AnteError::InsufficientFee {
                got: "100uinit".into(),
                required: "200uinit".into(),
            }
        );
    }

    #[test]
    fn test_validator_floor_met_through_conversion() {
        // 200,000 * 0.02 = 4,000 uinit required; 2,000 uusdc converts to 4,000.
        let node = Node::with_config(AnteConfig {
            min_gas_prices: "0.02uinit".parse().unwrap(),
            ..Default::default()
        });
        node.dynamic_fee.set_base_gas_price(dec("1"));
        let alice = funded_sender(&node);
        let (ctx, result) = node.run(ExecutionMode::Check, &send_tx(&alice, coins(&[("uusdc", 2_000)])));
        result.unwrap();
        assert_eq!(ctx.priority(), 4_000);
    }

    // =========================================================================
    // FREE MESSAGES
    // =========================================================================

    #[test]
    fn test_free_messages_are_all_or_nothing() {
        let node = Node::new();
        let relayer = funded_sender(&node);

        let free = sign(
            StdTx::new(vec![update_client(&relayer)]).with_fee(uinit(0), GAS),
            &[(&relayer, 0)],
            CHAIN_ID,
        );
        let (ctx, result) = node.run(ExecutionMode::Check, &free);
        result.unwrap();
        assert_eq!(ctx.priority(), MIN_PRIORITY);

        let mixed = sign(
            StdTx::new(vec![update_client(&relayer), send(&relayer)]).with_fee(uinit(0), GAS),
            &[(&relayer, 0)],
            CHAIN_ID,
        );
        let (_, result) = node.run(ExecutionMode::Check, &mixed);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::InsufficientFee);
    }

    #[test]
    fn test_eth_key_signer_admitted() {
        let node = Node::new();
        let eve = TestKey::eth_secp256k1();
        node.fund(&eve, uinit(1_000_000));
        let tx = send_tx(&eve, uinit(2_000));

        let (ctx, result) = node.run(ExecutionMode::Check, &tx);
        result.unwrap();
        assert_eq!(ctx.priority(), 2_000);
    }

    // =========================================================================
    // DETERMINISM
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_same_state_same_verdict(base in 0u128..6_000, usdc in 0u128..2_000) {
            let node = Node::new();
            let alice = funded_sender(&node);
            let mut fee = vec![("uinit", base), ("uusdc", usdc)];
            fee.retain(|(_, amount)| *amount > 0);
            let tx = send_tx(&alice, coins(&fee));

            let (first_ctx, first) = node.fork().run(ExecutionMode::Check, &tx);
            let (second_ctx, second) = node.fork().run(ExecutionMode::Check, &tx);
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first_ctx.priority(), second_ctx.priority());
            prop_assert_eq!(first.is_ok(), base + 2 * usdc >= 2_000);
        }
    }
}
