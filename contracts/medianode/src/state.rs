use crate::errors::MediaNodeError;
use crate::events::MediaNodeEvent;
use medianode_types::{Deposit, MediaNodeRecord, MediaNodeStatus, UpdateMediaNodeInput};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::{env, log, AccountId, NearToken, Promise};

/// State of one deployed media node instance. The contract starts out with
/// the `Default` (uninitialized) state and becomes usable only after the
/// factory calls `initialize` in the deployment batch.
#[derive(Default, BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct MediaNodeState {
    pub record: Option<MediaNodeRecord>,
    pub factory_id: Option<AccountId>,
    /// Snapshot of the factory's creation fee at initialization, in yoctoNEAR.
    pub creation_fee: u128,
    /// Snapshot of the factory's minimum deposit at initialization, in yoctoNEAR.
    pub min_deposit: u128,
}

/// Outcome of walking the deposit ledger against the spendable balance.
/// Every entry is classified; policy is applied only after the walk.
pub struct RefundPlan {
    pub paid: Vec<(AccountId, u128)>,
    pub unpaid: Vec<AccountId>,
    pub refunded_total: u128,
}

/// Classifies each deposit in original order: an entry is payable while the
/// remaining spendable balance covers its amount, otherwise its sender is
/// recorded as unpaid. Never aborts mid-walk.
pub fn plan_refunds(deposits: &[Deposit], spendable: u128) -> RefundPlan {
    let mut plan = RefundPlan {
        paid: Vec::new(),
        unpaid: Vec::new(),
        refunded_total: 0,
    };
    let mut remaining = spendable;
    for deposit in deposits {
        if deposit.amount.0 <= remaining {
            remaining -= deposit.amount.0;
            plan.refunded_total += deposit.amount.0;
            plan.paid.push((deposit.sender.clone(), deposit.amount.0));
        } else {
            plan.unpaid.push(deposit.sender.clone());
        }
    }
    plan
}

/// Balance this account can pay out without dropping below the storage
/// requirement for its own code and state.
fn spendable_balance() -> u128 {
    let storage_lock =
        env::storage_byte_cost().as_yoctonear() * u128::from(env::storage_usage());
    env::account_balance()
        .as_yoctonear()
        .saturating_sub(storage_lock)
}

impl MediaNodeState {
    pub fn initialize(
        &mut self,
        caller: &AccountId,
        record: MediaNodeRecord,
        factory_address: AccountId,
        creation_fee: U128,
        min_deposit: U128,
    ) -> Result<(), MediaNodeError> {
        if self.record.is_some() {
            return Err(MediaNodeError::AlreadyInitialized);
        }
        if caller != &factory_address {
            return Err(MediaNodeError::InvalidFactoryAddress);
        }
        if record.deposits.is_empty() {
            return Err(MediaNodeError::NoDepositsProvided);
        }

        // Timestamps always come from the ledger, not from the prototype.
        let now = env::block_timestamp_ms();
        let mut record = record;
        record.created_at = now;
        record.updated_at = now;

        log!(
            "Initializing media node {} for factory {}",
            record.id,
            factory_address
        );
        self.factory_id = Some(factory_address);
        self.creation_fee = creation_fee.0;
        self.min_deposit = min_deposit.0;
        self.record = Some(record);
        Ok(())
    }

    pub fn update_media_node(
        &mut self,
        caller: &AccountId,
        update: UpdateMediaNodeInput,
    ) -> Result<(), MediaNodeError> {
        let record = self
            .record
            .as_mut()
            .ok_or(MediaNodeError::NotInitialized)?;
        if caller != &record.owner {
            return Err(MediaNodeError::UnauthorizedAccess);
        }
        if record.status == MediaNodeStatus::Deleted {
            return Err(MediaNodeError::MediaNodeDeleted);
        }

        // Sparse merge: zero / empty-string means "leave unchanged".
        if update.price_per_hour.0 > 0 {
            record.price_per_hour = update.price_per_hour;
        }
        if !update.name.is_empty() {
            record.name = update.name;
        }
        if !update.description.is_empty() {
            record.description = update.description;
        }
        if !update.url.is_empty() {
            record.url = update.url;
        }
        if update.cpu > 0 {
            record.hardware_specs.cpu = update.cpu;
        }
        if update.ram_in_gb > 0 {
            record.hardware_specs.ram_in_gb = update.ram_in_gb;
        }
        if update.storage_in_gb > 0 {
            record.hardware_specs.storage_in_gb = update.storage_in_gb;
        }
        record.updated_at = env::block_timestamp_ms();

        MediaNodeEvent::MediaNodeUpdated {
            id: record.id.clone(),
            price_per_hour: record.price_per_hour,
            name: record.name.clone(),
            description: record.description.clone(),
            url: record.url.clone(),
            cpu: record.hardware_specs.cpu,
            ram_in_gb: record.hardware_specs.ram_in_gb,
            storage_in_gb: record.hardware_specs.storage_in_gb,
        }
        .emit();
        Ok(())
    }

    pub fn deposit_media_node(
        &mut self,
        sender: &AccountId,
        amount: u128,
    ) -> Result<(), MediaNodeError> {
        if amount == 0 {
            return Err(MediaNodeError::InvalidDepositAmount);
        }
        let record = self
            .record
            .as_mut()
            .ok_or(MediaNodeError::NotInitialized)?;
        if record.status == MediaNodeStatus::Deleted {
            return Err(MediaNodeError::MediaNodeDeleted);
        }
        if record.status == MediaNodeStatus::Deposit && amount < self.min_deposit {
            return Err(MediaNodeError::DepositAmountTooLow(U128(amount)));
        }

        let now = env::block_timestamp_ms();
        record.deposits.push(Deposit {
            amount: U128(amount),
            sender: sender.clone(),
            deposited_at: now,
        });
        if record.status == MediaNodeStatus::Deposit
            && record.total_deposited() >= self.creation_fee
        {
            log!("Media node {} reached its creation fee, activating", record.id);
            record.status = MediaNodeStatus::Active;
        }
        record.updated_at = now;

        MediaNodeEvent::MediaNodeDeposited {
            id: record.id.clone(),
            sender: sender.clone(),
            amount: U128(amount),
        }
        .emit();
        Ok(())
    }

    /// Tears the node down, paying every recorded depositor back in original
    /// order from the instance balance. Individual refunds may fail without
    /// blocking deletion; only the case where nobody can be paid aborts.
    pub fn delete_media_node(&mut self, caller: &AccountId) -> Result<(), MediaNodeError> {
        let record = self
            .record
            .as_mut()
            .ok_or(MediaNodeError::NotInitialized)?;
        if caller != &record.owner {
            return Err(MediaNodeError::UnauthorizedAccess);
        }
        if record.status == MediaNodeStatus::Deleted {
            return Err(MediaNodeError::MediaNodeDeleted);
        }
        if record.leased {
            return Err(MediaNodeError::MediaNodeCurrentlyLeased);
        }

        let plan = plan_refunds(&record.deposits, spendable_balance());
        if plan.paid.is_empty() {
            return Err(MediaNodeError::RefundFailed);
        }

        for (receiver, amount) in &plan.paid {
            let _ = Promise::new(receiver.clone())
                .transfer(NearToken::from_yoctonear(*amount));
        }

        record.status = MediaNodeStatus::Deleted;
        record.updated_at = env::block_timestamp_ms();

        if plan.unpaid.is_empty() {
            MediaNodeEvent::MediaNodeDeleted {
                id: record.id.clone(),
                refunded_total: U128(plan.refunded_total),
            }
            .emit();
        } else {
            log!(
                "Media node {} deleted with {} unpaid depositor(s)",
                record.id,
                plan.unpaid.len()
            );
            MediaNodeEvent::PartialRefund {
                id: record.id.clone(),
                unpaid: plan.unpaid,
            }
            .emit();
        }
        Ok(())
    }

    pub fn set_leased(&mut self, caller: &AccountId, leased: bool) -> Result<(), MediaNodeError> {
        let factory_id = self
            .factory_id
            .as_ref()
            .ok_or(MediaNodeError::NotInitialized)?;
        if caller != factory_id {
            return Err(MediaNodeError::UnauthorizedAccess);
        }
        let record = self
            .record
            .as_mut()
            .ok_or(MediaNodeError::NotInitialized)?;
        if record.status == MediaNodeStatus::Deleted {
            return Err(MediaNodeError::MediaNodeDeleted);
        }
        record.leased = leased;
        record.updated_at = env::block_timestamp_ms();
        MediaNodeEvent::LeaseFlagChanged {
            id: record.id.clone(),
            leased,
        }
        .emit();
        Ok(())
    }

    pub fn get_media_node_details(&self) -> Result<MediaNodeRecord, MediaNodeError> {
        self.record.clone().ok_or(MediaNodeError::NotInitialized)
    }
}
