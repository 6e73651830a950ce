//! # Message Model
//!
//! The messages a transaction carries. The ante pipeline never executes
//! messages; it only needs to recognise a handful of concrete kinds by type
//! (IBC relay messages for fee exemption and redundancy checks) and to learn
//! each message's signers.

use crate::entities::{Address, Coins};
use serde::{Deserialize, Serialize};

pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const MSG_UPDATE_CLIENT_TYPE_URL: &str = "/ibc.core.client.v1.MsgUpdateClient";
pub const MSG_RECV_PACKET_TYPE_URL: &str = "/ibc.core.channel.v1.MsgRecvPacket";
pub const MSG_ACKNOWLEDGEMENT_TYPE_URL: &str = "/ibc.core.channel.v1.MsgAcknowledgement";
pub const MSG_TIMEOUT_TYPE_URL: &str = "/ibc.core.channel.v1.MsgTimeout";
pub const MSG_TIMEOUT_ON_CLOSE_TYPE_URL: &str = "/ibc.core.channel.v1.MsgTimeoutOnClose";

/// Identifies an IBC packet on both ends of a channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Packet {
    pub sequence: u64,
    pub source_port: String,
    pub source_channel: String,
    pub destination_port: String,
    pub destination_channel: String,
}

/// A transaction message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Bank transfer.
    Send {
        from_address: Address,
        to_address: Address,
        amount: Coins,
    },
    /// Light-client header update.
    UpdateClient { client_id: String, signer: Address },
    /// Inbound packet delivery.
    RecvPacket { packet: Packet, signer: Address },
    /// Acknowledgement of a previously sent packet.
    Acknowledgement { packet: Packet, signer: Address },
    /// Timeout of a previously sent packet.
    Timeout { packet: Packet, signer: Address },
    /// Timeout triggered by the counterparty closing the channel.
    TimeoutOnClose { packet: Packet, signer: Address },
    /// Any message the pipeline treats opaquely.
    Other {
        type_url: String,
        signers: Vec<Address>,
    },
}

impl Msg {
    /// Fully-qualified type URL of the message.
    pub fn type_url(&self) -> &str {
        match self {
            Msg::Send { .. } => MSG_SEND_TYPE_URL,
            Msg::UpdateClient { .. } => MSG_UPDATE_CLIENT_TYPE_URL,
            Msg::RecvPacket { .. } => MSG_RECV_PACKET_TYPE_URL,
            Msg::Acknowledgement { .. } => MSG_ACKNOWLEDGEMENT_TYPE_URL,
            Msg::Timeout { .. } => MSG_TIMEOUT_TYPE_URL,
            Msg::TimeoutOnClose { .. } => MSG_TIMEOUT_ON_CLOSE_TYPE_URL,
            Msg::Other { type_url, .. } => type_url,
        }
    }

    /// Addresses that must sign for this message.
    pub fn signers(&self) -> Vec<Address> {
        match self {
            Msg::Send { from_address, .. } => vec![*from_address],
            Msg::UpdateClient { signer, .. }
            | Msg::RecvPacket { signer, .. }
            | Msg::Acknowledgement { signer, .. }
            | Msg::Timeout { signer, .. }
            | Msg::TimeoutOnClose { signer, .. } => vec![*signer],
            Msg::Other { signers, .. } => signers.clone(),
        }
    }

    /// True for messages that relay a packet (receive, ack, timeout).
    pub fn is_packet_msg(&self) -> bool {
        matches!(
            self,
            Msg::RecvPacket { .. }
                | Msg::Acknowledgement { .. }
                | Msg::Timeout { .. }
                | Msg::TimeoutOnClose { .. }
        )
    }

    /// The relayed packet, if any.
    pub fn packet(&self) -> Option<&Packet> {
        match self {
            Msg::RecvPacket { packet, .. }
            | Msg::Acknowledgement { packet, .. }
            | Msg::Timeout { packet, .. }
            | Msg::TimeoutOnClose { packet, .. } => Some(packet),
            _ => None,
        }
    }
}
