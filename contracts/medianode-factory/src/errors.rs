use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;

#[derive(Debug, PartialEq, NearSchema, BorshSerialize, BorshDeserialize)]
#[abi(borsh)]
pub enum FactoryError {
    UnauthorizedAccess,
    AlreadyInstantiated,
    NotInstantiated,
    NodeCodeMissing,
    InvalidCreationFee(U128),
    InvalidMinLeaseHours(u64),
    InvalidMaxLeaseHours(u64),
    InvalidInitialDepositPercentage(u8),
    InvalidMinDeposit(U128),
    InvalidId(String),
    InvalidName(String),
    InvalidDescription(String),
    InvalidUrl(String),
    InvalidPricePerHour(U128),
    InvalidCpu(u32),
    InvalidRam(u32),
    InvalidStorage(u32),
    MediaNodeIdAlreadyExists(String),
    UrlAlreadyExists(String),
    InvalidDeposit(U128),
    NodeNotFound(String),
}

impl FunctionError for FactoryError {
    fn panic(&self) -> ! {
        let message = match self {
            FactoryError::UnauthorizedAccess => "Unauthorized access".to_string(),
            FactoryError::AlreadyInstantiated => "Already instantiated".to_string(),
            FactoryError::NotInstantiated => "Factory not instantiated".to_string(),
            FactoryError::NodeCodeMissing => "Media node code not stored".to_string(),
            FactoryError::InvalidCreationFee(value) => {
                format!("Invalid creation fee: {}", value.0)
            }
            FactoryError::InvalidMinLeaseHours(value) => {
                format!("Invalid min lease hours: {}", value)
            }
            FactoryError::InvalidMaxLeaseHours(value) => {
                format!("Invalid max lease hours: {}", value)
            }
            FactoryError::InvalidInitialDepositPercentage(value) => {
                format!("Invalid initial deposit percentage: {}", value)
            }
            FactoryError::InvalidMinDeposit(value) => {
                format!("Invalid min deposit: {}", value.0)
            }
            FactoryError::InvalidId(value) => format!("Invalid id: {:?}", value),
            FactoryError::InvalidName(value) => format!("Invalid name: {:?}", value),
            FactoryError::InvalidDescription(value) => {
                format!("Invalid description: {:?}", value)
            }
            FactoryError::InvalidUrl(value) => format!("Invalid url: {:?}", value),
            FactoryError::InvalidPricePerHour(value) => {
                format!("Invalid price per hour: {}", value.0)
            }
            FactoryError::InvalidCpu(value) => format!("Invalid cpu: {}", value),
            FactoryError::InvalidRam(value) => format!("Invalid ram: {}", value),
            FactoryError::InvalidStorage(value) => format!("Invalid storage: {}", value),
            FactoryError::MediaNodeIdAlreadyExists(id) => {
                format!("Media node id already exists: {}", id)
            }
            FactoryError::UrlAlreadyExists(url) => format!("Url already exists: {}", url),
            FactoryError::InvalidDeposit(value) => format!("Invalid deposit: {}", value.0),
            FactoryError::NodeNotFound(id) => format!("Media node not found: {}", id),
        };
        env::panic_str(&message)
    }
}
