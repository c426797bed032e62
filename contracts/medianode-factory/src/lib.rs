//! Registry factory for leasable media nodes. Validates registration
//! requests, enforces registry-wide id and url uniqueness, and deploys one
//! `medianode` escrow contract per node as a numbered subaccount, forwarding
//! the attached deposit into it.

use crate::errors::FactoryError;
use crate::state::FactoryState;
use crate::types::{FactoryParams, RegisterMediaNodeInput};
use medianode_types::MediaNodeRecord;
use near_sdk::json_types::{Base64VecU8, U128};
use near_sdk::{env, ext_contract, near, AccountId, PanicOnDefault, Promise};

pub mod errors;
mod events;
pub mod state;
pub mod types;

#[ext_contract(ext_medianode)]
pub trait MediaNodeInstance {
    fn get_media_node_details(&self) -> MediaNodeRecord;
}

#[ext_contract(ext_self)]
pub trait RegistrationResolver {
    fn resolve_registration(&mut self, id: String, url: String, owner: AccountId, value: U128);
}

#[near(contract_state)]
#[derive(PanicOnDefault)]
pub struct MediaNodeFactory {
    state: FactoryState,
}

#[near]
impl MediaNodeFactory {
    #[init]
    pub fn new(owner_id: AccountId) -> Self {
        Self {
            state: FactoryState::new(owner_id),
        }
    }

    /// One-shot, owner-only configuration. All parameters are validated and
    /// committed atomically; the factory accepts registrations afterwards.
    #[handle_result]
    pub fn instantiate(
        &mut self,
        creation_fee: U128,
        min_lease_hours: u64,
        max_lease_hours: u64,
        initial_deposit_percentage: u8,
        min_deposit: U128,
    ) -> Result<(), FactoryError> {
        self.state.instantiate(
            &env::predecessor_account_id(),
            creation_fee,
            min_lease_hours,
            max_lease_hours,
            initial_deposit_percentage,
            min_deposit,
        )
    }

    /// Stores the wasm deployed into each new node subaccount. Owner-only;
    /// replacing the blob only affects nodes registered afterwards.
    #[handle_result]
    pub fn set_node_code(&mut self, code: Base64VecU8) -> Result<(), FactoryError> {
        self.state
            .set_node_code(&env::predecessor_account_id(), code.into())
    }

    /// Registers a node owned by the caller; the attached value becomes the
    /// node's first deposit and is custodied by the new instance contract.
    #[payable]
    #[handle_result]
    pub fn register_media_node(
        &mut self,
        input: RegisterMediaNodeInput,
    ) -> Result<Promise, FactoryError> {
        self.state.register_media_node(
            &env::predecessor_account_id(),
            input,
            env::attached_deposit().as_yoctonear(),
        )
    }

    /// Callback on the deployment batch. When the batch failed the node
    /// account was never created, so the index entries are rolled back and
    /// the registrant is refunded.
    #[private]
    pub fn resolve_registration(&mut self, id: String, url: String, owner: AccountId, value: U128) {
        self.state
            .resolve_registration(id, url, owner, value, near_sdk::is_promise_success());
    }

    /// Delegates to the instance's detail view. Not a view method itself:
    /// the delegation is a cross-contract call.
    #[handle_result]
    pub fn get_node_details(&self, id: String) -> Result<Promise, FactoryError> {
        self.state.get_node_details(&id)
    }

    pub fn get_params(&self) -> FactoryParams {
        self.state.params.clone()
    }

    pub fn get_instantiated_status(&self) -> bool {
        self.state.instantiated
    }

    pub fn media_node_count(&self) -> u64 {
        self.state.node_count
    }

    pub fn media_node_contract_addresses_map(&self, id: String) -> Option<AccountId> {
        self.state.nodes.get(&id).cloned()
    }

    pub fn get_owner(&self) -> AccountId {
        self.state.owner_id.clone()
    }
}
