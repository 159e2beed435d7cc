mod support;

use std::sync::Arc;
use std::time::Duration;

use deployctl::application::{ConfirmationPolicy, ContractDeployer};
use deployctl::error::{Error, PipelineError};
use deployctl::port::{PrivateStateStore, TxStatus};
use deployctl::testkit::{
    contract, fast_policies, MemoryPrivateStateStore, RecordingReporter, ScriptedLedger,
    ScriptedSubmit,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use support::pipeline::local_bundle;

fn deployer(ledger: &Arc<ScriptedLedger>, policy: ConfirmationPolicy) -> ContractDeployer {
    ContractDeployer::new(
        ledger.clone(),
        contract(),
        policy,
        Arc::new(RecordingReporter::new()),
    )
}

fn initial_state() -> serde_json::Value {
    json!({ "privateCounter": 0 })
}

#[tokio::test]
async fn confirmed_deployment_stores_private_state_under_address() {
    let ledger = Arc::new(ScriptedLedger::confirming("0200abcd"));
    let store = Arc::new(MemoryPrivateStateStore::new());
    let bundle = local_bundle(store.clone()).await;

    let result = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.address, "0200abcd");
    assert_eq!(result.tx.tx_id, "tx-1");
    assert_eq!(result.tx.block_height, Some(1));

    let entry = store
        .get(&contract().private_state_id)
        .unwrap()
        .expect("private state stored");
    assert_eq!(entry.contract_address, "0200abcd");
    assert_eq!(entry.state, initial_state());

    let requests = ledger.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].contract, contract().name);
    assert_eq!(requests[0].initial_private_state, initial_state());
}

#[tokio::test]
async fn rejection_is_not_retried() {
    let ledger = Arc::new(ScriptedLedger::new(ScriptedSubmit::Reject(
        "insufficient fee".into(),
    )));
    let bundle = local_bundle(Arc::new(MemoryPrivateStateStore::new())).await;

    let err = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::Pipeline(PipelineError::DeploymentRejected { reason }) => {
            assert_eq!(reason, "insufficient fee");
        }
        other => panic!("expected DeploymentRejected, got {other:?}"),
    }
    assert_eq!(ledger.submit_calls(), 1);
    assert_eq!(ledger.status_calls(), 0);
}

#[tokio::test]
async fn transport_failure_on_submit_is_unconfirmed_without_tx() {
    let ledger = Arc::new(ScriptedLedger::new(ScriptedSubmit::Fail(
        "connection reset".into(),
    )));
    let bundle = local_bundle(Arc::new(MemoryPrivateStateStore::new())).await;

    let err = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::Pipeline(PipelineError::DeploymentUnconfirmed { tx_id, reason }) => {
            assert_eq!(tx_id, None);
            assert!(reason.contains("connection reset"), "reason: {reason}");
        }
        other => panic!("expected DeploymentUnconfirmed, got {other:?}"),
    }
    assert_eq!(ledger.submit_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn pending_past_timeout_is_unconfirmed_with_tx() {
    let ledger = Arc::new(ScriptedLedger::new(ScriptedSubmit::Accept("tx-9".into())));
    let store = Arc::new(MemoryPrivateStateStore::new());
    let bundle = local_bundle(store.clone()).await;

    let err = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        Error::Pipeline(PipelineError::DeploymentUnconfirmed { tx_id, .. }) => {
            assert_eq!(tx_id.as_deref(), Some("tx-9"));
        }
        other => panic!("expected DeploymentUnconfirmed, got {other:?}"),
    }
    assert_eq!(ledger.submit_calls(), 1);
    assert!(ledger.status_calls() > 1);
    assert!(store.get(&contract().private_state_id).unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn status_errors_are_tolerated_until_confirmation() {
    let ledger = Arc::new(
        ScriptedLedger::new(ScriptedSubmit::Accept("tx-2".into())).with_statuses(vec![
            Err("502 bad gateway".into()),
            Ok(TxStatus::Pending),
            Ok(TxStatus::Confirmed {
                contract_address: "0200beef".into(),
                block_height: None,
            }),
        ]),
    );
    let bundle = local_bundle(Arc::new(MemoryPrivateStateStore::new())).await;

    let result = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.address, "0200beef");
    assert_eq!(result.tx.block_height, None);
    assert_eq!(ledger.status_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn unbounded_confirmation_timeout_still_confirms() {
    let ledger = Arc::new(
        ScriptedLedger::new(ScriptedSubmit::Accept("tx-3".into())).with_statuses(vec![
            Ok(TxStatus::Pending),
            Ok(TxStatus::Confirmed {
                contract_address: "0200cafe".into(),
                block_height: Some(7),
            }),
        ]),
    );
    let bundle = local_bundle(Arc::new(MemoryPrivateStateStore::new())).await;
    let policy = ConfirmationPolicy {
        timeout: Duration::from_secs(u64::MAX),
        ..fast_policies().confirmation
    };

    let result = deployer(&ledger, policy)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.address, "0200cafe");
    assert_eq!(ledger.status_calls(), 2);
}

#[tokio::test]
async fn rejection_in_block_is_rejected() {
    let ledger = Arc::new(
        ScriptedLedger::new(ScriptedSubmit::Accept("tx-3".into())).with_statuses(vec![Ok(
            TxStatus::Rejected {
                reason: "contract already exists".into(),
            },
        )]),
    );
    let bundle = local_bundle(Arc::new(MemoryPrivateStateStore::new())).await;

    let err = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "DeploymentRejectedError");
}

#[tokio::test]
async fn cancellation_during_submission_interrupts() {
    let ledger = Arc::new(
        ScriptedLedger::confirming("0200abcd")
            .with_submit_latency(Duration::from_secs(60)),
    );
    let bundle = local_bundle(Arc::new(MemoryPrivateStateStore::new())).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = deployer(&ledger, fast_policies().confirmation)
        .deploy(bundle, initial_state(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::Interrupted { .. })
    ));
}
