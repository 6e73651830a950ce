//! # Block Gas Scenarios
//!
//! Only finalized txs feed the block gas total, and the total drives the next
//! block's base gas price.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ante_handler::domain::{ErrorKind, StdTx};
    use ante_handler::{AnteConfig, AnteError, ExecutionMode};
    use shared_types::DecCoins;

    fn signed_send(key: &TestKey, sequence: u64, gas: u64) -> StdTx {
        sign(
            StdTx::new(vec![send(key)]).with_fee(uinit(2_000), gas),
            &[(key, sequence)],
            CHAIN_ID,
        )
    }

    #[test]
    fn test_only_finalize_accumulates() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx = signed_send(&alice, 0, GAS);

        for mode in [
            ExecutionMode::Check,
            ExecutionMode::ReCheck,
            ExecutionMode::Simulate,
        ] {
            let snapshot = node.fork();
            let (_, result) = snapshot.run(mode, &tx);
            result.unwrap();
            assert_eq!(snapshot.dynamic_fee.accumulated_gas(), 0, "{mode}");
        }

        let (_, result) = node.run(ExecutionMode::Finalize, &tx);
        result.unwrap();
        assert_eq!(node.dynamic_fee.accumulated_gas(), 200_000);
    }

    #[test]
    fn test_gas_prices_published() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx = signed_send(&alice, 0, GAS);

        let (ctx, result) = node.fork().run(ExecutionMode::Check, &tx);
        result.unwrap();
        let expected: DecCoins = "0.01uinit".parse().unwrap();
        assert_eq!(ctx.gas_prices(), Some(&expected));

        let quiet = Node::with_config(AnteConfig {
            publish_gas_prices: false,
            ..Default::default()
        });
        quiet.fund(&alice, uinit(1_000_000));
        let (ctx, result) = quiet.run(ExecutionMode::Finalize, &tx);
        result.unwrap();
        assert_eq!(ctx.gas_prices(), None);
        // Accumulation does not depend on publishing.
        assert_eq!(quiet.dynamic_fee.accumulated_gas(), 200_000);
    }

    #[test]
    fn test_zero_gas_only_allowed_when_simulating() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx = signed_send(&alice, 0, 0);

        let (_, check) = node.fork().run(ExecutionMode::Check, &tx);
        assert_eq!(check.unwrap_err(), AnteError::ZeroGas);

        let (_, finalize) = node.fork().run(ExecutionMode::Finalize, &tx);
        assert_eq!(finalize.unwrap_err().kind(), ErrorKind::OutOfGas);

        let (_, simulate) = node.fork().run(ExecutionMode::Simulate, &tx);
        simulate.unwrap();
    }

    #[test]
    fn test_full_block_raises_admission_floor() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(10_000_000));

        // Ten finalized txs: twice the target.
        for sequence in 0..10 {
            let (_, result) = node.run(ExecutionMode::Finalize, &signed_send(&alice, sequence, GAS));
            result.unwrap();
        }
        assert_eq!(node.dynamic_fee.accumulated_gas(), 2_000_000);
        assert_eq!(node.dynamic_fee.end_block(), dec("0.011"));

        // 2,000 uinit no longer covers 200,000 gas at 0.011.
        let (_, result) = node.run(ExecutionMode::Check, &signed_send(&alice, 10, GAS));
        assert!(matches!(result, Err(AnteError::GasPriceTooLow { .. })));
    }
}
