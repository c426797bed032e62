//! Sandbox tests for the per-node instance lifecycle: deposit-driven
//! activation, sparse updates, and deletion with depositor refunds.

use anyhow::Result;
use near_workspaces::types::NearToken;
use serde_json::json;

use crate::utils::{
    node_details, node_instance_id, register_node, setup_factory, setup_sandbox, CREATION_FEE,
};

#[tokio::test]
async fn test_deposit_accumulates_and_activates() -> Result<()> {
    let worker = setup_sandbox().await?;
    let owner = worker.dev_create_account().await?;
    let factory = setup_factory(&worker, &owner).await?;

    register_node(&factory, &owner, "n1", "http://n1.example", NearToken::from_near(4)).await?;
    let instance = node_instance_id(&factory, "n1").await?;

    // Anyone may deposit, not only the node owner.
    let depositor = worker.dev_create_account().await?;

    // Below the minimum while the node is still in DEPOSIT status.
    let result = depositor
        .call(&instance, "deposit_media_node")
        .deposit(NearToken::from_millinear(500))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Deposit amount too low"));

    // 4 + 2 NEAR crosses the 5 NEAR creation fee.
    depositor
        .call(&instance, "deposit_media_node")
        .deposit(NearToken::from_near(2))
        .transact()
        .await?
        .into_result()?;

    let details = node_details(&worker, &factory, "n1").await?;
    assert_eq!(details["status"], json!("Active"));
    let deposits = details["deposits"].as_array().unwrap();
    assert_eq!(deposits.len(), 2);
    assert_eq!(deposits[1]["sender"], json!(depositor.id()));
    Ok(())
}

#[tokio::test]
async fn test_update_merges_sparsely() -> Result<()> {
    let worker = setup_sandbox().await?;
    let owner = worker.dev_create_account().await?;
    let factory = setup_factory(&worker, &owner).await?;

    register_node(&factory, &owner, "n1", "http://n1.example", CREATION_FEE).await?;
    let instance = node_instance_id(&factory, "n1").await?;

    // Only the node owner may update.
    let outsider = worker.dev_create_account().await?;
    let result = outsider
        .call(&instance, "update_media_node")
        .args_json(json!({ "update": {
            "price_per_hour": "20", "name": "x", "description": "", "url": "",
            "cpu": 0, "ram_in_gb": 0, "storage_in_gb": 0
        }}))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Unauthorized access"));

    owner
        .call(&instance, "update_media_node")
        .args_json(json!({ "update": {
            "price_per_hour": "0", "name": "Renamed Node", "description": "", "url": "",
            "cpu": 32, "ram_in_gb": 0, "storage_in_gb": 0
        }}))
        .transact()
        .await?
        .into_result()?;

    let details = node_details(&worker, &factory, "n1").await?;
    assert_eq!(details["name"], json!("Renamed Node"));
    assert_eq!(details["hardware_specs"]["cpu"], json!(32));
    // Sentinel fields kept their registered values.
    assert_eq!(details["price_per_hour"], json!("10"));
    assert_eq!(details["url"], json!("http://n1.example"));
    assert_eq!(details["description"], json!("A test media node."));
    Ok(())
}

#[tokio::test]
async fn test_delete_refunds_depositors_and_finalizes() -> Result<()> {
    let worker = setup_sandbox().await?;
    let owner = worker.dev_create_account().await?;
    let factory = setup_factory(&worker, &owner).await?;

    register_node(&factory, &owner, "n1", "http://n1.example", NearToken::from_near(4)).await?;
    let instance = node_instance_id(&factory, "n1").await?;

    let depositor = worker.dev_create_account().await?;
    depositor
        .call(&instance, "deposit_media_node")
        .deposit(NearToken::from_near(2))
        .transact()
        .await?
        .into_result()?;

    // Top the instance up so its balance covers storage plus all refunds,
    // mirroring an operator funding the teardown.
    owner
        .transfer_near(&instance, NearToken::from_near(5))
        .await?
        .into_result()?;

    // Only the node owner may delete.
    let result = depositor.call(&instance, "delete_media_node").transact().await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Unauthorized access"));

    let depositor_before = worker.view_account(depositor.id()).await?.balance;

    owner
        .call(&instance, "delete_media_node")
        .max_gas()
        .transact()
        .await?
        .into_result()?;

    let details = node_details(&worker, &factory, "n1").await?;
    assert_eq!(details["status"], json!("Deleted"));

    // The depositor got their 2 NEAR back (minus nothing; gas was paid by
    // the owner's call).
    let depositor_after = worker.view_account(depositor.id()).await?.balance;
    let refunded = depositor_after.saturating_sub(depositor_before);
    assert!(
        refunded >= NearToken::from_millinear(1_900),
        "expected ~2 NEAR refund, got {}",
        refunded
    );

    // A deleted node accepts no further deposits, updates or deletions.
    let result = depositor
        .call(&instance, "deposit_media_node")
        .deposit(NearToken::from_near(2))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("already deleted"));

    let result = owner.call(&instance, "delete_media_node").max_gas().transact().await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("already deleted"));
    Ok(())
}

#[tokio::test]
async fn test_initialize_is_one_shot_and_factory_gated() -> Result<()> {
    let worker = setup_sandbox().await?;
    let owner = worker.dev_create_account().await?;
    let factory = setup_factory(&worker, &owner).await?;

    register_node(&factory, &owner, "n1", "http://n1.example", CREATION_FEE).await?;
    let instance = node_instance_id(&factory, "n1").await?;

    let factory_address: Option<String> = worker
        .view(&instance, "get_factory_address")
        .args_json(json!({}))
        .await?
        .json()?;
    assert_eq!(factory_address.as_deref(), Some(factory.id().as_str()));

    // Re-initialization attempts bounce off, whoever sends them.
    let record = node_details(&worker, &factory, "n1").await?;
    let result = owner
        .call(&instance, "initialize")
        .args_json(json!({
            "record": record,
            "factory_address": owner.id(),
            "creation_fee": "1",
            "min_deposit": "1",
        }))
        .transact()
        .await?;
    assert!(format!("{:?}", result.into_result().unwrap_err()).contains("Already initialized"));
    Ok(())
}
