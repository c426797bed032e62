//! Record types shared by the factory and the per-node instance contract.
//!
//! The factory constructs a [`MediaNodeRecord`] prototype at registration time
//! and hands it to the freshly deployed instance through `initialize`; both
//! sides and the integration tests deserialize the same shapes.

use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

/// Lifecycle of a node record. Transitions only move forward:
/// Deposit -> Active -> Deleted.
#[near(serializers = [json, borsh])]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaNodeStatus {
    Deposit,
    Active,
    Deleted,
}

#[near(serializers = [json, borsh])]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HardwareSpecs {
    pub cpu: u32,
    pub ram_in_gb: u32,
    pub storage_in_gb: u32,
}

/// One recorded value transfer into a node. Amounts are yoctoNEAR.
#[near(serializers = [json, borsh])]
#[derive(Clone, Debug, PartialEq)]
pub struct Deposit {
    pub amount: U128,
    pub sender: AccountId,
    pub deposited_at: u64,
}

#[near(serializers = [json, borsh])]
#[derive(Clone, Debug, PartialEq)]
pub struct MediaNodeRecord {
    pub id: String,
    pub owner: AccountId,
    pub price_per_hour: U128,
    pub name: String,
    pub description: String,
    pub url: String,
    pub hardware_specs: HardwareSpecs,
    pub status: MediaNodeStatus,
    pub leased: bool,
    pub created_at: u64,
    pub updated_at: u64,
    pub deposits: Vec<Deposit>,
}

impl MediaNodeRecord {
    /// Cumulative deposited value. Monotonically non-decreasing until deletion.
    pub fn total_deposited(&self) -> u128 {
        self.deposits.iter().map(|d| d.amount.0).sum()
    }
}

/// Sparse update input for `update_media_node`. Zero and empty-string are
/// "leave unchanged" sentinels, so a field cannot be explicitly cleared
/// through this type.
#[near(serializers = [json, borsh])]
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateMediaNodeInput {
    pub price_per_hour: U128,
    pub name: String,
    pub description: String,
    pub url: String,
    pub cpu: u32,
    pub ram_in_gb: u32,
    pub storage_in_gb: u32,
}

impl Default for UpdateMediaNodeInput {
    fn default() -> Self {
        Self {
            price_per_hour: U128(0),
            name: String::new(),
            description: String::new(),
            url: String::new(),
            cpu: 0,
            ram_in_gb: 0,
            storage_in_gb: 0,
        }
    }
}
