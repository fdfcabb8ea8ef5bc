//! Delivery behavior tests: DM rounds and admin fan-out.

use std::sync::Arc;

use concierge::config::RosterConfig;
use concierge::discord::notifier::AdminNotifier;
use concierge::discord::port::ChatPort;
use concierge::tasks::DmRound;

mod common;
use common::{RecordingPort, Sent};

fn roster(admins: &[u64], targets: &[u64]) -> RosterConfig {
    RosterConfig {
        admins: admins.to_vec(),
        dm_targets: targets.to_vec(),
        dm_message: "ping".to_string(),
        dm_interval_secs: 3600,
    }
}

fn round_with(port: &Arc<RecordingPort>, roster: &RosterConfig) -> DmRound {
    let chat: Arc<dyn ChatPort> = Arc::clone(port) as Arc<dyn ChatPort>;
    let notifier = Arc::new(AdminNotifier::new(Arc::clone(&chat), roster));
    DmRound::new(chat, notifier, roster)
}

#[tokio::test]
async fn clean_round_sends_single_success_notice_per_admin() {
    let port = Arc::new(RecordingPort::new());
    let round = round_with(&port, &roster(&[10, 11], &[1, 2, 3]));

    let report = round.run_round().await;

    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed, 0);
    for target in [1, 2, 3] {
        assert_eq!(port.dms_to(target), vec!["ping".to_string()]);
    }
    for admin in [10, 11] {
        let notices = port.dms_to(admin);
        assert_eq!(notices.len(), 1, "admin {} should get exactly one notice", admin);
        assert!(notices[0].contains("✅"));
        assert!(notices[0].contains("Completed at:"));
    }
}

#[tokio::test]
async fn failure_notifies_admins_and_round_continues() {
    let port = Arc::new(RecordingPort::new().failing_users(&[2]));
    let round = round_with(&port, &roster(&[10], &[1, 2, 3]));

    let report = round.run_round().await;

    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(port.dms_to(1), vec!["ping".to_string()]);
    assert!(port.dms_to(2).is_empty());
    assert_eq!(port.dms_to(3), vec!["ping".to_string()]);

    let notices = port.dms_to(10);
    assert_eq!(notices.len(), 1, "one failure, one notice");
    assert!(notices[0].contains('2'), "notice should name the failed recipient");
    assert!(!notices[0].contains("✅"), "no success notice after a failure");
}

#[tokio::test]
async fn failure_notice_is_sent_before_later_targets() {
    let port = Arc::new(RecordingPort::new().failing_users(&[1]));
    let round = round_with(&port, &roster(&[10], &[1, 2]));

    round.run_round().await;

    let log = port.log();
    let notice_pos = log
        .iter()
        .position(|sent| matches!(sent, Sent::Dm { to: 10, .. }))
        .expect("admin notice missing");
    let second_target_pos = log
        .iter()
        .position(|sent| matches!(sent, Sent::Dm { to: 2, .. }))
        .expect("second target DM missing");
    assert!(
        notice_pos < second_target_pos,
        "failure notice should be delivered inline, before the next target"
    );
}

#[tokio::test]
async fn every_failure_gets_its_own_notice() {
    let port = Arc::new(RecordingPort::new().failing_users(&[1, 3]));
    let round = round_with(&port, &roster(&[10], &[1, 2, 3]));

    let report = round.run_round().await;

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 2);

    let notices = port.dms_to(10);
    assert_eq!(notices.len(), 2);
    assert!(notices[0].contains('1'));
    assert!(notices[1].contains('3'));
}

#[tokio::test]
async fn unresolvable_target_counts_as_failure() {
    let port = Arc::new(RecordingPort::new().unresolvable_users(&[5]));
    let round = round_with(&port, &roster(&[10], &[5]));

    let report = round.run_round().await;

    assert_eq!(report.failed, 1);
    let notices = port.dms_to(10);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains('5'));
}

#[tokio::test]
async fn empty_target_list_still_reports_a_clean_round() {
    let port = Arc::new(RecordingPort::new());
    let round = round_with(&port, &roster(&[10], &[]));

    let report = round.run_round().await;

    assert_eq!(report.delivered, 0);
    assert_eq!(report.failed, 0);
    let notices = port.dms_to(10);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("✅"));
}

#[tokio::test]
async fn one_failing_admin_does_not_block_the_rest() {
    let port = Arc::new(RecordingPort::new().failing_users(&[10]));
    let chat: Arc<dyn ChatPort> = Arc::clone(&port) as Arc<dyn ChatPort>;
    let notifier = AdminNotifier::new(chat, &roster(&[10, 11, 12], &[]));

    let delivered = notifier.notify_admins("heads up").await;

    assert_eq!(delivered, 2);
    assert!(port.dms_to(10).is_empty());
    assert_eq!(port.dms_to(11), vec!["heads up".to_string()]);
    assert_eq!(port.dms_to(12), vec!["heads up".to_string()]);
}

#[tokio::test]
async fn started_task_refuses_a_second_start() {
    let port = Arc::new(RecordingPort::new());
    let round = Arc::new(round_with(&port, &roster(&[], &[])));
    let shutdown = concierge::lifecycle::Shutdown::new();

    assert!(Arc::clone(&round).start(shutdown.subscribe()));
    assert!(
        !Arc::clone(&round).start(shutdown.subscribe()),
        "second start must be a no-op"
    );

    shutdown.trigger();
}
