mod support;

use std::sync::Arc;
use std::time::Duration;

use deployctl::application::{FundingPolicy, WalletBootstrapper};
use deployctl::domain::GENESIS_SEED;
use deployctl::error::{Error, PipelineError};
use deployctl::testkit::{RecordingReporter, ScriptedWallet};
use tokio_test::assert_ok;
use tokio_util::sync::CancellationToken;

fn bootstrapper(
    wallet: &Arc<ScriptedWallet>,
    policy: FundingPolicy,
) -> (WalletBootstrapper, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    (
        WalletBootstrapper::new(wallet.clone(), policy, reporter.clone()),
        reporter,
    )
}

#[tokio::test(start_paused = true)]
async fn funds_arrive_on_fourth_poll() {
    let wallet = Arc::new(ScriptedWallet::balances([0, 0, 0, 100]));
    let (bootstrapper, reporter) =
        bootstrapper(&wallet, FundingPolicy::fixed(Duration::from_secs(1)));

    let identity = bootstrapper.bootstrap(GENESIS_SEED).unwrap();
    let funded = bootstrapper
        .await_funds(
            identity,
            50,
            Duration::from_secs(60),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(funded.balance(), Some(100));
    assert_eq!(wallet.balance_calls(), 4);
    assert_eq!(reporter.funding_polls(), 4);
}

#[tokio::test(start_paused = true)]
async fn unfunded_wallet_times_out_near_deadline() {
    let wallet = Arc::new(ScriptedWallet::always(0));
    let (bootstrapper, _) = bootstrapper(&wallet, FundingPolicy::fixed(Duration::from_secs(1)));
    let identity = bootstrapper.bootstrap(GENESIS_SEED).unwrap();
    let address = identity.address().to_string();

    let err = bootstrapper
        .await_funds(
            identity,
            1,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        Error::Pipeline(PipelineError::FundingTimeout {
            address: reported,
            waited,
            last_balance,
        }) => {
            assert_eq!(reported, address);
            assert!(waited >= Duration::from_secs(5), "waited {waited:?}");
            assert!(waited < Duration::from_secs(6), "waited {waited:?}");
            assert_eq!(last_balance, 0);
        }
        other => panic!("expected FundingTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_seed_never_contacts_funding_source() {
    let wallet = Arc::new(ScriptedWallet::always(1_000));
    let (bootstrapper, reporter) = bootstrapper(&wallet, FundingPolicy::default());

    let short = "a".repeat(63);
    let non_hex = "g".repeat(64);
    for seed in ["", "xyz", short.as_str(), non_hex.as_str()] {
        let err = bootstrapper.bootstrap(seed).unwrap_err();
        assert!(
            matches!(err, Error::Pipeline(PipelineError::InvalidSeed { .. })),
            "seed {seed:?} gave {err:?}"
        );
    }

    assert_eq!(wallet.balance_calls(), 0);
    assert!(reporter.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unanswered_source_is_reported_as_unavailable() {
    let wallet = Arc::new(ScriptedWallet::failing("connection refused"));
    let policy = FundingPolicy {
        max_consecutive_failures: 100,
        ..FundingPolicy::fixed(Duration::from_secs(1))
    };
    let (bootstrapper, _) = bootstrapper(&wallet, policy);
    let identity = bootstrapper.bootstrap(GENESIS_SEED).unwrap();

    let err = bootstrapper
        .await_funds(
            identity,
            1,
            Duration::from_secs(3),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    match err {
        Error::Pipeline(PipelineError::FundingSourceUnavailable { reason, .. }) => {
            assert!(reason.contains("connection refused"), "reason: {reason}");
        }
        other => panic!("expected FundingSourceUnavailable, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn hanging_source_is_bounded_by_deadline_plus_interval() {
    let wallet = Arc::new(ScriptedWallet::always(100).with_latency(Duration::from_secs(3600)));
    let (bootstrapper, _) = bootstrapper(&wallet, FundingPolicy::fixed(Duration::from_secs(1)));
    let identity = bootstrapper.bootstrap(GENESIS_SEED).unwrap();

    let started = tokio::time::Instant::now();
    let err = bootstrapper
        .await_funds(
            identity,
            1,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(elapsed <= Duration::from_secs(6), "returned after {elapsed:?}");
    match err {
        Error::Pipeline(PipelineError::FundingSourceUnavailable { reason, .. }) => {
            assert!(reason.contains("timed out"), "reason: {reason}");
        }
        other => panic!("expected FundingSourceUnavailable, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn unbounded_timeout_still_waits_for_funds() {
    let wallet = Arc::new(ScriptedWallet::balances([0, 100]));
    let (bootstrapper, _) = bootstrapper(&wallet, FundingPolicy::fixed(Duration::from_secs(1)));
    let identity = bootstrapper.bootstrap(GENESIS_SEED).unwrap();

    let funded = assert_ok!(
        bootstrapper
            .await_funds(
                identity,
                1,
                Duration::from_secs(u64::MAX),
                &CancellationToken::new(),
            )
            .await
    );

    assert_eq!(funded.balance(), Some(100));
    assert_eq!(wallet.balance_calls(), 2);
}
