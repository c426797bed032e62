use medianode_types::HardwareSpecs;
use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

/// Immutable-after-set factory configuration. All-zero until `instantiate`
/// runs; callers that need valid parameters check `get_instantiated_status`
/// first.
#[near(serializers = [json, borsh])]
#[derive(Clone, Debug, PartialEq)]
pub struct FactoryParams {
    pub instantiator: Option<AccountId>,
    pub creation_fee: U128,
    pub min_lease_hours: u64,
    pub max_lease_hours: u64,
    pub initial_deposit_percentage: u8,
    pub min_deposit: U128,
}

impl Default for FactoryParams {
    fn default() -> Self {
        Self {
            instantiator: None,
            creation_fee: U128(0),
            min_lease_hours: 0,
            max_lease_hours: 0,
            initial_deposit_percentage: 0,
            min_deposit: U128(0),
        }
    }
}

#[near(serializers = [json, borsh])]
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterMediaNodeInput {
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub price_per_hour: U128,
    pub hardware_specs: HardwareSpecs,
}
