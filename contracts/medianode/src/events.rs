use near_sdk::json_types::U128;
use near_sdk::{near, AccountId};

#[near(event_json(standard = "medianode"))]
pub enum MediaNodeEvent {
    #[event_version("1.0.0")]
    MediaNodeUpdated {
        id: String,
        price_per_hour: U128,
        name: String,
        description: String,
        url: String,
        cpu: u32,
        ram_in_gb: u32,
        storage_in_gb: u32,
    },
    #[event_version("1.0.0")]
    MediaNodeDeposited { id: String, sender: AccountId, amount: U128 },
    #[event_version("1.0.0")]
    MediaNodeDeleted { id: String, refunded_total: U128 },
    #[event_version("1.0.0")]
    PartialRefund { id: String, unpaid: Vec<AccountId> },
    #[event_version("1.0.0")]
    LeaseFlagChanged { id: String, leased: bool },
}
