use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::{env, FunctionError};
use near_sdk_macros::NearSchema;

#[derive(Debug, PartialEq, NearSchema, BorshSerialize, BorshDeserialize)]
#[abi(borsh)]
pub enum MediaNodeError {
    UnauthorizedAccess,
    AlreadyInitialized,
    NotInitialized,
    InvalidFactoryAddress,
    NoDepositsProvided,
    InvalidDepositAmount,
    DepositAmountTooLow(U128),
    MediaNodeCurrentlyLeased,
    MediaNodeDeleted,
    RefundFailed,
}

impl FunctionError for MediaNodeError {
    fn panic(&self) -> ! {
        let message = match self {
            MediaNodeError::UnauthorizedAccess => "Unauthorized access".to_string(),
            MediaNodeError::AlreadyInitialized => "Already initialized".to_string(),
            MediaNodeError::NotInitialized => "Media node not initialized".to_string(),
            MediaNodeError::InvalidFactoryAddress => "Invalid factory address".to_string(),
            MediaNodeError::NoDepositsProvided => {
                "No deposits provided during initialization".to_string()
            }
            MediaNodeError::InvalidDepositAmount => "Deposit amount must be positive".to_string(),
            MediaNodeError::DepositAmountTooLow(amount) => {
                format!("Deposit amount too low: {}", amount.0)
            }
            MediaNodeError::MediaNodeCurrentlyLeased => "Media node currently leased".to_string(),
            MediaNodeError::MediaNodeDeleted => "Media node already deleted".to_string(),
            MediaNodeError::RefundFailed => "Refund failed".to_string(),
        };
        env::panic_str(&message)
    }
}
