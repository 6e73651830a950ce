//! # Chain Scenarios
//!
//! What the minimal and full chains do differently to state, and how a
//! rejection stops everything behind it.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ante_handler::adapters::InMemoryAccountAbstraction;
    use ante_handler::decorators::FEE_COLLECTOR;
    use ante_handler::domain::{SignatureV2, SignerData, StdTx, MIN_PRIORITY};
    use ante_handler::{AnteDecorator, AnteError, Context, ExecutionMode, Next, Tx};
    use parking_lot::Mutex;
    use shared_types::{Msg, Packet};
    use std::sync::Arc;

    /// Counts how often the full chain reaches its tail.
    struct Probe(Arc<Mutex<Vec<ExecutionMode>>>);

    impl AnteDecorator for Probe {
        fn name(&self) -> &'static str {
            "auction_probe"
        }

        fn ante_handle(
            &self,
            ctx: &mut Context,
            tx: &dyn Tx,
            simulate: bool,
            next: Next<'_>,
        ) -> Result<(), AnteError> {
            self.0.lock().push(ctx.mode());
            next.run(ctx, tx, simulate)
        }
    }

    fn probed_node() -> (Node, Arc<Mutex<Vec<ExecutionMode>>>) {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let node = Node::new().with_auction(Arc::new(Probe(hits.clone())));
        (node, hits)
    }

    // =========================================================================
    // MINIMAL VS FULL
    // =========================================================================

    #[test]
    fn test_check_leaves_balance_and_sequence() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx = sign(
            StdTx::new(vec![send(&alice)]).with_fee(uinit(5_000), GAS),
            &[(&alice, 0)],
            CHAIN_ID,
        );

        let (ctx, result) = node.run(ExecutionMode::Check, &tx);
        result.unwrap();
        assert_eq!(ctx.priority(), 5_000);
        assert_eq!(node.bank.balance(&alice.address), uinit(1_000_000));
        assert_eq!(node.bank.module_balance(FEE_COLLECTOR), uinit(0));
        assert_eq!(node.accounts.account(&alice.address).unwrap().sequence, 0);

        let (ctx, result) = node.run(ExecutionMode::Finalize, &tx);
        result.unwrap();
        assert_eq!(ctx.priority(), MIN_PRIORITY);
        assert_eq!(node.bank.balance(&alice.address), uinit(995_000));
        assert_eq!(node.bank.module_balance(FEE_COLLECTOR), uinit(5_000));
        assert_eq!(node.accounts.account(&alice.address).unwrap().sequence, 1);
    }

    #[test]
    fn test_check_admits_fee_payer_who_cannot_pay() {
        // Balance is a deduction concern; the minimal chain never looks.
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(10));
        let tx = sign(
            StdTx::new(vec![send(&alice)]).with_fee(uinit(5_000), GAS),
            &[(&alice, 0)],
            CHAIN_ID,
        );

        let (_, check) = node.run(ExecutionMode::Check, &tx);
        check.unwrap();
        let (_, finalize) = node.run(ExecutionMode::Finalize, &tx);
        assert!(matches!(finalize, Err(AnteError::InsufficientFunds(_))));
    }

    #[test]
    fn test_simulate_without_keys_or_signatures() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx = StdTx::new(vec![send(&alice)])
            .with_fee(uinit(5_000), GAS)
            .with_signatures(vec![SignatureV2 {
                pub_key: None,
                data: Vec::new(),
                sequence: 0,
            }]);

        let (ctx, result) = node.run(ExecutionMode::Simulate, &tx);
        result.unwrap();
        assert!(ctx.gas_meter().gas_consumed() > 0);
        assert!(ctx.gas_meter().is_infinite());
    }

    #[test]
    fn test_check_admits_pending_sequences_from_one_sender() {
        let node = Node::new();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx_at = |sequence| {
            sign(
                StdTx::new(vec![send(&alice)]).with_fee(uinit(5_000), GAS),
                &[(&alice, sequence)],
                CHAIN_ID,
            )
        };

        let (_, first) = node.run(ExecutionMode::Check, &tx_at(0));
        first.unwrap();
        let (_, second) = node.run(ExecutionMode::Check, &tx_at(1));
        second.unwrap();

        // Finalize still wants the committed sequence exactly.
        let (_, early) = node.fork().run(ExecutionMode::Finalize, &tx_at(1));
        assert_eq!(
            early.unwrap_err(),
            AnteError::WrongSequence { expected: 0, got: 1 }
        );
        let (_, committed) = node.run(ExecutionMode::Finalize, &tx_at(0));
        committed.unwrap();

        let (_, stale) = node.run(ExecutionMode::Check, &tx_at(0));
        assert_eq!(
            stale.unwrap_err(),
            AnteError::WrongSequence { expected: 1, got: 0 }
        );
        let (_, next) = node.run(ExecutionMode::Check, &tx_at(1));
        next.unwrap();
    }

    // =========================================================================
    // SHORT-CIRCUIT
    // =========================================================================

    #[test]
    fn test_invalid_signature_stops_chain() {
        let (node, hits) = probed_node();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let forged = sign(
            StdTx::new(vec![send(&alice)]).with_fee(uinit(5_000), GAS),
            &[(&alice, 0)],
            "wrong-chain",
        );

        let (_, result) = node.run(ExecutionMode::Finalize, &forged);
        assert!(matches!(result, Err(AnteError::Unauthorized(_))));
        assert!(hits.lock().is_empty());
        assert_eq!(node.accounts.account(&alice.address).unwrap().sequence, 0);

        let valid = sign(
            StdTx::new(vec![send(&alice)]).with_fee(uinit(5_000), GAS),
            &[(&alice, 0)],
            CHAIN_ID,
        );
        let (_, result) = node.fork().run(ExecutionMode::Finalize, &valid);
        result.unwrap();
        assert_eq!(*hits.lock(), vec![ExecutionMode::Finalize]);
    }

    #[test]
    fn test_probe_not_in_minimal_chain() {
        let (node, hits) = probed_node();
        let alice = TestKey::secp256k1();
        node.fund(&alice, uinit(1_000_000));
        let tx = sign(
            StdTx::new(vec![send(&alice)]).with_fee(uinit(5_000), GAS),
            &[(&alice, 0)],
            CHAIN_ID,
        );
        let (_, result) = node.run(ExecutionMode::Check, &tx);
        result.unwrap();
        assert!(hits.lock().is_empty());
    }

    // =========================================================================
    // FEE GRANTS
    // =========================================================================

    #[test]
    fn test_granter_pays_in_finalize() {
        let node = Node::new();
        let sponsor = TestKey::secp256k1();
        let user = TestKey::secp256k1();
        node.fund(&sponsor, uinit(1_000_000));
        node.fund(&user, uinit(0));
        node.feegrant
            .grant(sponsor.address, user.address, uinit(8_000));

        let tx = sign(
            StdTx::new(vec![send(&user)])
                .with_fee(uinit(5_000), GAS)
                .with_granter(sponsor.address),
            &[(&user, 0)],
            CHAIN_ID,
        );
        let (_, result) = node.run(ExecutionMode::Finalize, &tx);
        result.unwrap();
        assert_eq!(node.bank.balance(&sponsor.address), uinit(995_000));
        assert_eq!(
            node.feegrant.allowance(&sponsor.address, &user.address),
            Some(uinit(3_000))
        );

        // The remaining allowance no longer covers the fee.
        let again = sign(
            StdTx::new(vec![send(&user)])
                .with_fee(uinit(5_000), GAS)
                .with_granter(sponsor.address),
            &[(&user, 1)],
            CHAIN_ID,
        );
        let (_, result) = node.run(ExecutionMode::Finalize, &again);
        assert!(matches!(result, Err(AnteError::Unauthorized(_))));
    }

    // =========================================================================
    // ACCOUNT ABSTRACTION
    // =========================================================================

    #[test]
    fn test_abstracted_account_admitted() {
        let node = Node::new();
        let wallet = TestKey::secp256k1();
        node.fund(&wallet, uinit(1_000_000));
        // The keeper's authenticator replaces the ECDSA signature.
        node.account_abstraction
            .register(wallet.address, b"session-key".to_vec());

        let unsigned = StdTx::new(vec![send(&wallet)]).with_fee(uinit(5_000), GAS);
        let sign_bytes = unsigned
            .sign_bytes(&SignerData {
                chain_id: CHAIN_ID.into(),
                address: wallet.address,
                sequence: 0,
            })
            .unwrap();
        let tx = unsigned.with_signatures(vec![SignatureV2 {
            pub_key: None,
            data: InMemoryAccountAbstraction::authenticate(b"session-key", &sign_bytes),
            sequence: 0,
        }]);

        let (_, result) = node.run(ExecutionMode::Check, &tx);
        result.unwrap();
        let (_, result) = node.run(ExecutionMode::Finalize, &tx);
        result.unwrap();
        assert_eq!(node.accounts.account(&wallet.address).unwrap().sequence, 1);
    }

    // =========================================================================
    // IBC RELAY
    // =========================================================================

    #[test]
    fn test_redundant_relay_rejected_in_check_only() {
        let node = Node::new();
        let relayer = TestKey::secp256k1();
        node.fund(&relayer, uinit(1_000_000));
        let packet = Packet {
            sequence: 7,
            source_port: "transfer".into(),
            source_channel: "channel-0".into(),
            destination_port: "transfer".into(),
            destination_channel: "channel-3".into(),
        };
        node.ibc.mark_received(&packet);

        let tx = sign(
            StdTx::new(vec![Msg::RecvPacket {
                packet,
                signer: relayer.address,
            }])
            .with_fee(uinit(5_000), GAS),
            &[(&relayer, 0)],
            CHAIN_ID,
        );

        let (_, check) = node.fork().run(ExecutionMode::Check, &tx);
        assert_eq!(check.unwrap_err(), AnteError::RedundantRelay);
        let (_, finalize) = node.fork().run(ExecutionMode::Finalize, &tx);
        finalize.unwrap();
    }
}
