use anyhow::Result;
use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine;
use near_workspaces::network::Sandbox;
use near_workspaces::types::NearToken;
use near_workspaces::{sandbox, Account, Contract, Worker};
use serde_json::json;
use std::env;
use std::fs;

pub const CREATION_FEE: NearToken = NearToken::from_near(5);
pub const MIN_DEPOSIT: NearToken = NearToken::from_near(2);

pub async fn setup_sandbox() -> Result<Worker<Sandbox>> {
    let mut last_err = None;
    for attempt in 1..=6 {
        match sandbox().await {
            Ok(worker) => return Ok(worker),
            Err(e) => {
                last_err = Some(e);
                eprintln!(
                    "[setup_sandbox] Attempt {}/6 failed, retrying in 5s: {}",
                    attempt,
                    last_err.as_ref().unwrap()
                );
                tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            }
        }
    }
    Err(anyhow::anyhow!(
        "Failed to set up sandbox after 6 attempts: {}",
        last_err.unwrap()
    ))
}

pub fn get_wasm_path(contract_name: &str) -> String {
    env::var(format!("{}_WASM_PATH", contract_name.to_uppercase().replace('-', "_")))
        .unwrap_or_else(|_| {
            format!(
                "../target/near/{0}/{0}.wasm",
                contract_name.replace('-', "_")
            )
        })
}

pub fn read_wasm(contract_name: &str) -> Result<Vec<u8>> {
    let path = get_wasm_path(contract_name);
    Ok(fs::read(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read {} wasm at {}: {}", contract_name, path, e))?)
}

/// Deploys the factory, initializes it with `owner`, instantiates it with
/// the standard test parameters and uploads the node wasm.
pub async fn setup_factory(worker: &Worker<Sandbox>, owner: &Account) -> Result<Contract> {
    let factory = worker.dev_deploy(&read_wasm("medianode-factory")?).await?;

    factory
        .call("new")
        .args_json(json!({ "owner_id": owner.id() }))
        .transact()
        .await?
        .into_result()?;

    owner
        .call(factory.id(), "instantiate")
        .args_json(json!({
            "creation_fee": CREATION_FEE.as_yoctonear().to_string(),
            "min_lease_hours": 1,
            "max_lease_hours": 24,
            "initial_deposit_percentage": 10,
            "min_deposit": MIN_DEPOSIT.as_yoctonear().to_string(),
        }))
        .transact()
        .await?
        .into_result()?;

    let node_wasm = read_wasm("medianode")?;
    owner
        .call(factory.id(), "set_node_code")
        .args_json(json!({ "code": BASE64_ENGINE.encode(&node_wasm) }))
        .transact()
        .await?
        .into_result()?;

    Ok(factory)
}

pub fn registration_input(id: &str, url: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Test Node",
        "description": "A test media node.",
        "url": url,
        "price_per_hour": "10",
        "hardware_specs": { "cpu": 8, "ram_in_gb": 16, "storage_in_gb": 512 }
    })
}

pub async fn register_node(
    factory: &Contract,
    registrant: &Account,
    id: &str,
    url: &str,
    deposit: NearToken,
) -> Result<()> {
    registrant
        .call(factory.id(), "register_media_node")
        .args_json(json!({ "input": registration_input(id, url) }))
        .deposit(deposit)
        .max_gas()
        .transact()
        .await?
        .into_result()?;
    Ok(())
}

pub async fn node_instance_id(
    factory: &Contract,
    id: &str,
) -> Result<near_workspaces::types::AccountId> {
    let instance: Option<String> = factory
        .view("media_node_contract_addresses_map")
        .args_json(json!({ "id": id }))
        .await?
        .json()?;
    Ok(instance
        .ok_or_else(|| anyhow::anyhow!("No instance registered for id {}", id))?
        .parse()?)
}

pub async fn node_details(
    worker: &Worker<Sandbox>,
    factory: &Contract,
    id: &str,
) -> Result<serde_json::Value> {
    let instance = node_instance_id(factory, id).await?;
    Ok(worker
        .view(&instance, "get_media_node_details")
        .args_json(json!({}))
        .await?
        .json()?)
}
