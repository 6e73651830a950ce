//! # Account-Number Scenarios
//!
//! Check, simulate and finalize each run on their own snapshot of the same
//! state. Accounts they create must land in disjoint number ranges.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use ante_handler::domain::StdTx;
    use ante_handler::{AnteConfig, ExecutionMode};
    use shared_types::Msg;
    use std::thread;

    const N: u64 = 50;

    /// Funded payer plus a co-signer with no account yet.
    fn setup() -> (Node, TestKey, TestKey, StdTx) {
        let node = Node::new();
        let payer = TestKey::secp256k1();
        node.fund(&payer, uinit(1_000_000));
        node.accounts.set_next_number(N);

        let newcomer = TestKey::secp256k1();
        let tx = sign(
            StdTx::new(vec![
                send(&payer),
                Msg::Other {
                    type_url: "/custom.v1.MsgRegister".into(),
                    signers: vec![newcomer.address],
                },
            ])
            .with_fee(uinit(5_000), GAS),
            &[(&payer, 0), (&newcomer, 0)],
            CHAIN_ID,
        );
        (node, payer, newcomer, tx)
    }

    fn number_assigned(node: &Node, mode: ExecutionMode, tx: &StdTx, who: &TestKey) -> u64 {
        let (_, result) = node.run(mode, tx);
        result.unwrap();
        node.accounts.account(&who.address).unwrap().account_number
    }

    #[test]
    fn test_modes_assign_disjoint_numbers() {
        let (node, _, newcomer, tx) = setup();

        let check = number_assigned(&node.fork(), ExecutionMode::Check, &tx, &newcomer);
        let recheck = number_assigned(&node.fork(), ExecutionMode::ReCheck, &tx, &newcomer);
        let simulate = number_assigned(&node.fork(), ExecutionMode::Simulate, &tx, &newcomer);
        let finalize = number_assigned(&node.fork(), ExecutionMode::Finalize, &tx, &newcomer);

        assert_eq!(check, N + 1_000_000);
        assert_eq!(recheck, N + 1_000_000);
        assert_eq!(simulate, N + 2_000_000);
        assert_eq!(finalize, N);

        // Snapshots were thrown away; the committed counter never moved.
        assert_eq!(node.accounts.next_number(), N);
        assert!(node.accounts.account(&newcomer.address).is_none());
    }

    #[test]
    fn test_concurrent_snapshots_stay_disjoint() {
        let (node, _, newcomer, tx) = setup();
        let snapshots = [
            (ExecutionMode::Check, node.fork()),
            (ExecutionMode::Simulate, node.fork()),
            (ExecutionMode::Finalize, node.fork()),
        ];

        let numbers: Vec<u64> = thread::scope(|scope| {
            let handles: Vec<_> = snapshots
                .iter()
                .map(|(mode, snapshot)| {
                    let tx = &tx;
                    let newcomer = &newcomer;
                    scope.spawn(move || number_assigned(snapshot, *mode, tx, newcomer))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(numbers, vec![N + 1_000_000, N + 2_000_000, N]);
    }

    #[test]
    fn test_offset_follows_config() {
        let node = Node::with_config(AnteConfig {
            account_number_offset: 10,
            ..Default::default()
        });
        let payer = TestKey::secp256k1();
        node.fund(&payer, uinit(1_000_000));
        node.accounts.set_next_number(N);
        let newcomer = TestKey::secp256k1();
        let tx = sign(
            StdTx::new(vec![
                send(&payer),
                Msg::Other {
                    type_url: "/custom.v1.MsgRegister".into(),
                    signers: vec![newcomer.address],
                },
            ])
            .with_fee(uinit(5_000), GAS),
            &[(&payer, 0), (&newcomer, 0)],
            CHAIN_ID,
        );

        assert_eq!(
            number_assigned(&node.fork(), ExecutionMode::Check, &tx, &newcomer),
            N + 10
        );
        assert_eq!(
            number_assigned(&node.fork(), ExecutionMode::Simulate, &tx, &newcomer),
            N + 20
        );
    }
}
