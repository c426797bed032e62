use crate::errors::FactoryError;
use crate::events::FactoryEvent;
use crate::{ext_medianode, ext_self};
use crate::types::{FactoryParams, RegisterMediaNodeInput};
use medianode_types::{Deposit, MediaNodeRecord, MediaNodeStatus};
use near_sdk::borsh::{BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde_json::json;
use near_sdk::store::{IterableSet, LookupMap};
use near_sdk::{env, log, serde_json, AccountId, BorshStorageKey, Gas, NearToken, Promise};

const INITIALIZE_GAS: Gas = Gas::from_tgas(50);
const GET_DETAILS_GAS: Gas = Gas::from_tgas(10);
const RESOLVE_GAS: Gas = Gas::from_tgas(10);

#[derive(BorshSerialize, BorshDeserialize, BorshStorageKey)]
#[borsh(crate = "near_sdk::borsh")]
pub enum StorageKey {
    Nodes,
    Urls,
}

#[derive(BorshSerialize, BorshDeserialize)]
#[borsh(crate = "near_sdk::borsh")]
pub struct FactoryState {
    pub owner_id: AccountId,
    pub params: FactoryParams,
    pub instantiated: bool,
    /// Node id -> instance contract account. Ids are never reused, even
    /// after the instance deletes itself out of service.
    pub nodes: LookupMap<String, AccountId>,
    /// Every url ever registered, for registry-wide uniqueness.
    pub urls: IterableSet<String>,
    pub node_count: u64,
    /// Allocator for subaccount numbering. Unlike `node_count` it never
    /// decreases, so a rolled-back registration cannot hand its number to a
    /// later one and collide with an existing account.
    pub node_sequence: u64,
    /// Wasm deployed into each new node subaccount.
    pub node_code: Option<Vec<u8>>,
}

impl FactoryState {
    pub fn new(owner_id: AccountId) -> Self {
        Self {
            owner_id,
            params: FactoryParams::default(),
            instantiated: false,
            nodes: LookupMap::new(StorageKey::Nodes),
            urls: IterableSet::new(StorageKey::Urls),
            node_count: 0,
            node_sequence: 0,
            node_code: None,
        }
    }

    pub fn instantiate(
        &mut self,
        caller: &AccountId,
        creation_fee: U128,
        min_lease_hours: u64,
        max_lease_hours: u64,
        initial_deposit_percentage: u8,
        min_deposit: U128,
    ) -> Result<(), FactoryError> {
        if caller != &self.owner_id {
            return Err(FactoryError::UnauthorizedAccess);
        }
        if self.instantiated {
            return Err(FactoryError::AlreadyInstantiated);
        }
        if creation_fee.0 == 0 {
            return Err(FactoryError::InvalidCreationFee(creation_fee));
        }
        if min_lease_hours == 0 {
            return Err(FactoryError::InvalidMinLeaseHours(min_lease_hours));
        }
        if max_lease_hours == 0 {
            return Err(FactoryError::InvalidMaxLeaseHours(max_lease_hours));
        }
        if min_lease_hours > max_lease_hours {
            return Err(FactoryError::InvalidMinLeaseHours(min_lease_hours));
        }
        if initial_deposit_percentage == 0 || initial_deposit_percentage > 100 {
            return Err(FactoryError::InvalidInitialDepositPercentage(
                initial_deposit_percentage,
            ));
        }
        if min_deposit.0 == 0 {
            return Err(FactoryError::InvalidMinDeposit(min_deposit));
        }

        // All parameters are committed together or not at all.
        self.params = FactoryParams {
            instantiator: Some(caller.clone()),
            creation_fee,
            min_lease_hours,
            max_lease_hours,
            initial_deposit_percentage,
            min_deposit,
        };
        self.instantiated = true;

        log!("Factory instantiated by {}", caller);
        FactoryEvent::MediaNodeFactoryInstantiated {
            instantiator: caller.clone(),
            creation_fee,
            min_lease_hours,
            max_lease_hours,
            initial_deposit_percentage,
            min_deposit,
        }
        .emit();
        Ok(())
    }

    pub fn set_node_code(&mut self, caller: &AccountId, code: Vec<u8>) -> Result<(), FactoryError> {
        if caller != &self.owner_id {
            return Err(FactoryError::UnauthorizedAccess);
        }
        let size = code.len() as u64;
        self.node_code = Some(code);
        FactoryEvent::NodeCodeStored { size }.emit();
        Ok(())
    }

    /// Validates the request, reserves the id and url, and returns the batch
    /// promise that creates the node subaccount, funds it with the attached
    /// value, deploys the node code and initializes it. The index mutation
    /// commits with this call, so two registrations with the same id or url
    /// can never both pass validation; the batch itself runs as a later
    /// receipt, and `resolve_registration` rolls the reservation back and
    /// refunds the registrant if it fails.
    pub fn register_media_node(
        &mut self,
        caller: &AccountId,
        input: RegisterMediaNodeInput,
        value: u128,
    ) -> Result<Promise, FactoryError> {
        if !self.instantiated {
            return Err(FactoryError::NotInstantiated);
        }
        let code = self
            .node_code
            .clone()
            .ok_or(FactoryError::NodeCodeMissing)?;
        validate_registration(&input)?;
        if self.nodes.contains_key(&input.id) {
            return Err(FactoryError::MediaNodeIdAlreadyExists(input.id));
        }
        if self.urls.contains(&input.url) {
            return Err(FactoryError::UrlAlreadyExists(input.url));
        }
        if value < self.params.min_deposit.0 {
            return Err(FactoryError::InvalidDeposit(U128(value)));
        }

        let node_account = self.next_node_account();
        let record = build_registration_record(
            caller,
            &input,
            value,
            self.params.creation_fee.0,
            env::block_timestamp_ms(),
        );

        self.nodes.insert(input.id.clone(), node_account.clone());
        self.urls.insert(input.url.clone());
        self.node_count += 1;
        self.node_sequence += 1;

        log!(
            "Registering media node {} at {} with deposit {}",
            input.id,
            node_account,
            value
        );
        FactoryEvent::MediaNodeRegistered {
            id: input.id.clone(),
            owner: caller.clone(),
            instance: node_account.clone(),
        }
        .emit();

        let args = serde_json::to_vec(&json!({
            "record": record,
            "factory_address": env::current_account_id(),
            "creation_fee": self.params.creation_fee,
            "min_deposit": self.params.min_deposit,
        }))
        .unwrap_or_else(|_| env::panic_str("Failed to serialize initialize args"));

        Ok(Promise::new(node_account)
            .create_account()
            .transfer(NearToken::from_yoctonear(value))
            .deploy_contract(code)
            .function_call(
                "initialize".to_string(),
                args,
                NearToken::from_near(0),
                INITIALIZE_GAS,
            )
            .then(
                ext_self::ext(env::current_account_id())
                    .with_static_gas(RESOLVE_GAS)
                    .resolve_registration(input.id, input.url, caller.clone(), U128(value)),
            ))
    }

    /// Settles a registration after its deployment batch ran. On failure the
    /// node account was never created (batch actions are all-or-nothing), so
    /// the id and url reservations are released, the count is rolled back and
    /// the attached value, which bounced back to the factory, is returned to
    /// the registrant. `node_sequence` stays as allocated.
    pub fn resolve_registration(
        &mut self,
        id: String,
        url: String,
        owner: AccountId,
        value: U128,
        deployed: bool,
    ) {
        if deployed {
            return;
        }
        self.nodes.remove(&id);
        self.urls.remove(&url);
        self.node_count = self.node_count.saturating_sub(1);
        log!(
            "Deployment for media node {} failed, releasing its registration and refunding {}",
            id,
            owner
        );
        FactoryEvent::MediaNodeRegistrationFailed {
            id,
            owner: owner.clone(),
            refund: value,
        }
        .emit();
        let _ = Promise::new(owner).transfer(NearToken::from_yoctonear(value.0));
    }

    pub fn get_node_details(&self, id: &str) -> Result<Promise, FactoryError> {
        let instance = self
            .nodes
            .get(id)
            .ok_or_else(|| FactoryError::NodeNotFound(id.to_string()))?;
        Ok(ext_medianode::ext(instance.clone())
            .with_static_gas(GET_DETAILS_GAS)
            .get_media_node_details())
    }

    /// Instance accounts are numbered subaccounts of the factory; the
    /// id -> account map is the authoritative lookup.
    pub fn next_node_account(&self) -> AccountId {
        format!("node-{}.{}", self.node_sequence, env::current_account_id())
            .parse()
            .unwrap_or_else(|_| env::panic_str("Node account id out of range"))
    }
}

fn validate_registration(input: &RegisterMediaNodeInput) -> Result<(), FactoryError> {
    if input.id.is_empty() {
        return Err(FactoryError::InvalidId(input.id.clone()));
    }
    if input.name.is_empty() {
        return Err(FactoryError::InvalidName(input.name.clone()));
    }
    if input.description.is_empty() {
        return Err(FactoryError::InvalidDescription(input.description.clone()));
    }
    if input.url.is_empty() {
        return Err(FactoryError::InvalidUrl(input.url.clone()));
    }
    if input.price_per_hour.0 == 0 {
        return Err(FactoryError::InvalidPricePerHour(input.price_per_hour));
    }
    if input.hardware_specs.cpu == 0 {
        return Err(FactoryError::InvalidCpu(input.hardware_specs.cpu));
    }
    if input.hardware_specs.ram_in_gb == 0 {
        return Err(FactoryError::InvalidRam(input.hardware_specs.ram_in_gb));
    }
    if input.hardware_specs.storage_in_gb == 0 {
        return Err(FactoryError::InvalidStorage(input.hardware_specs.storage_in_gb));
    }
    Ok(())
}

/// Record prototype handed to the new instance: the caller owns the node,
/// the attached value is its first deposit, and the node starts out ACTIVE
/// only when that value already covers the creation fee.
pub fn build_registration_record(
    caller: &AccountId,
    input: &RegisterMediaNodeInput,
    value: u128,
    creation_fee: u128,
    now: u64,
) -> MediaNodeRecord {
    MediaNodeRecord {
        id: input.id.clone(),
        owner: caller.clone(),
        price_per_hour: input.price_per_hour,
        name: input.name.clone(),
        description: input.description.clone(),
        url: input.url.clone(),
        hardware_specs: input.hardware_specs,
        status: if value >= creation_fee {
            MediaNodeStatus::Active
        } else {
            MediaNodeStatus::Deposit
        },
        leased: false,
        created_at: now,
        updated_at: now,
        deposits: vec![Deposit {
            amount: U128(value),
            sender: caller.clone(),
            deposited_at: now,
        }],
    }
}
