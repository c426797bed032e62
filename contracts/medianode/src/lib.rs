//! Per-node escrow contract. One instance is deployed by the factory for
//! every registered media node; it owns the node record, accumulates
//! deposits until the creation fee is reached and refunds depositors when
//! the owner tears the node down.

use crate::errors::MediaNodeError;
use crate::state::MediaNodeState;
use medianode_types::{MediaNodeRecord, UpdateMediaNodeInput};
use near_sdk::json_types::U128;
use near_sdk::{env, near, AccountId};

pub mod errors;
mod events;
pub mod state;

#[near(contract_state)]
#[derive(Default)]
pub struct MediaNodeContract {
    state: MediaNodeState,
}

#[near]
impl MediaNodeContract {
    /// One-time setup, called by the factory in the deployment batch. The
    /// prototype record's timestamps are replaced with the current ledger
    /// time; `creation_fee` and `min_deposit` are snapshots of the factory
    /// parameters this node was registered under.
    #[handle_result]
    pub fn initialize(
        &mut self,
        record: MediaNodeRecord,
        factory_address: AccountId,
        creation_fee: U128,
        min_deposit: U128,
    ) -> Result<(), MediaNodeError> {
        self.state.initialize(
            &env::predecessor_account_id(),
            record,
            factory_address,
            creation_fee,
            min_deposit,
        )
    }

    /// Owner-only sparse update: zero / empty-string fields are left
    /// unchanged.
    #[handle_result]
    pub fn update_media_node(&mut self, update: UpdateMediaNodeInput) -> Result<(), MediaNodeError> {
        self.state
            .update_media_node(&env::predecessor_account_id(), update)
    }

    /// Records the attached value as a deposit from the caller. Any account
    /// may deposit; crossing the creation fee activates the node.
    #[payable]
    #[handle_result]
    pub fn deposit_media_node(&mut self) -> Result<(), MediaNodeError> {
        self.state.deposit_media_node(
            &env::predecessor_account_id(),
            env::attached_deposit().as_yoctonear(),
        )
    }

    #[handle_result]
    pub fn delete_media_node(&mut self) -> Result<(), MediaNodeError> {
        self.state.delete_media_node(&env::predecessor_account_id())
    }

    /// Factory-only toggle for the lease flag that gates deletion.
    #[handle_result]
    pub fn set_leased(&mut self, leased: bool) -> Result<(), MediaNodeError> {
        self.state.set_leased(&env::predecessor_account_id(), leased)
    }

    #[handle_result]
    pub fn get_media_node_details(&self) -> Result<MediaNodeRecord, MediaNodeError> {
        self.state.get_media_node_details()
    }

    pub fn get_factory_address(&self) -> Option<AccountId> {
        self.state.factory_id.clone()
    }
}
