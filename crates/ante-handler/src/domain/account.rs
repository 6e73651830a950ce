use super::keys::PubKey;
use shared_types::Address;

/// Account state the pipeline reads and updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseAccount {
    pub address: Address,
    pub account_number: u64,
    pub sequence: u64,
    pub pub_key: Option<PubKey>,
}

impl BaseAccount {
    pub fn new(address: Address, account_number: u64) -> Self {
        Self {
            address,
            account_number,
            sequence: 0,
            pub_key: None,
        }
    }
}
