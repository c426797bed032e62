use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "medianode"))]
pub enum FactoryEvent {
    #[event_version("1.0.0")]
    MediaNodeFactoryInstantiated {
        instantiator: AccountId,
        creation_fee: U128,
        min_lease_hours: u64,
        max_lease_hours: u64,
        initial_deposit_percentage: u8,
        min_deposit: U128,
    },
    #[event_version("1.0.0")]
    MediaNodeRegistered {
        id: String,
        owner: AccountId,
        instance: AccountId,
    },
    #[event_version("1.0.0")]
    MediaNodeRegistrationFailed {
        id: String,
        owner: AccountId,
        refund: U128,
    },
    #[event_version("1.0.0")]
    NodeCodeStored { size: u64 },
}
