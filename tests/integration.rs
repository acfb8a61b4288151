//! Integration tests for the gem commands.

use gem_ledger::{
    AdjustmentKind, AmountArg, AuditEntry, AuditFeed, AuditFeedConfig, ChannelId, Command,
    CommandHandlers, Config, LedgerStore, MemberInfo, Rejection, Reply, Responder, RoleId,
    StoreConfig, UserId,
};
use parking_lot::Mutex;
use tempfile::TempDir;

const ADMIN_ROLE: RoleId = RoleId(1000);
const LOG_CHANNEL: ChannelId = ChannelId(2000);

fn test_config(dir: &TempDir) -> Config {
    Config {
        admin_role_id: ADMIN_ROLE,
        log_channel_id: LOG_CHANNEL,
        token: "test-token".to_string(),
        stats_path: dir.path().join("gem_stats.json"),
    }
}

fn test_store(config: &Config) -> LedgerStore {
    LedgerStore::open(config.store_config()).unwrap()
}

fn admin() -> MemberInfo {
    MemberInfo::new("1", "alice")
        .with_role(ADMIN_ROLE)
        .with_avatar("https://cdn.example/alice.png")
}

fn donor() -> MemberInfo {
    MemberInfo::new("2", "bob").with_avatar("https://cdn.example/bob.png")
}

/// Collects replies as the platform would send them.
#[derive(Default)]
struct RecordingResponder {
    sent: Mutex<Vec<(UserId, Reply, bool)>>,
}

impl Responder for RecordingResponder {
    fn respond(&self, actor: &UserId, reply: &Reply, private: bool) {
        self.sent.lock().push((actor.clone(), reply.clone(), private));
    }
}

// --- Realistic Workflow Tests ---

#[test]
fn test_donations_accumulate() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = test_store(&config);
    let handlers = CommandHandlers::new(&config, &store);
    let (admin, donor) = (admin(), donor());

    handlers
        .record_donation(&admin, &donor, &AmountArg::from("10k"))
        .unwrap();
    let outcome = handlers
        .record_donation(&admin, &donor, &AmountArg::from("5,000"))
        .unwrap();

    match outcome.reply {
        Reply::Adjusted {
            kind, new_total, ..
        } => {
            assert_eq!(kind, AdjustmentKind::Logged);
            assert_eq!(new_total, 15_000);
        }
        other => panic!("expected Adjusted, got {:?}", other),
    }
    assert_eq!(store.get(&UserId::from("2")).unwrap().gems_given, 15_000);
}

#[test]
fn test_full_dispatch_flow() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = test_store(&config);
    let handlers = CommandHandlers::new(&config, &store);
    let feed = AuditFeed::new();
    let log = feed.subscribe(LOG_CHANNEL, AuditFeedConfig::default());
    let responder = RecordingResponder::default();
    let (admin, donor) = (admin(), donor());

    let reply = handlers.dispatch(
        &admin,
        Command::Log {
            user: &donor,
            amount: AmountArg::from("2.5m"),
        },
        &responder,
        &feed,
    );
    assert!(!reply.is_rejected());

    let sent = responder.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, UserId::from("1"));
    assert!(sent[0].2, "replies are private");

    let entries: Vec<AuditEntry> = log.drain();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 2_500_000);
    assert_eq!(entries[0].new_total, 2_500_000);
    assert_eq!(entries[0].target.avatar_url.as_deref(), Some("https://cdn.example/bob.png"));

    let text = entries[0].to_string();
    assert!(text.contains("Donor: bob"));
    assert!(text.contains("Total Donated: 2,500,000 💎"));
    assert!(text.contains("Admin: alice"));
}

#[test]
fn test_remove_then_stats() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = test_store(&config);
    let handlers = CommandHandlers::new(&config, &store);
    let (admin, donor) = (admin(), donor());

    handlers
        .record_donation(&admin, &donor, &AmountArg::from("1b"))
        .unwrap();
    let outcome = handlers
        .remove_donation(&admin, &donor, &AmountArg::from("250m"))
        .unwrap();
    assert_eq!(outcome.audit.unwrap().kind, AdjustmentKind::Removed);

    let own = handlers.run(&donor, Command::Stats);
    match &own.reply {
        Reply::OwnStats { user, total } => {
            assert_eq!(user.name, "bob");
            assert_eq!(*total, 750_000_000);
        }
        other => panic!("expected OwnStats, got {:?}", other),
    }
    assert!(own.reply.to_string().contains("750,000,000 💎"));
    assert!(own.audit.is_none());

    let other = handlers.run(&admin, Command::AdminStats { user: &donor });
    match other.reply {
        Reply::AdminStats {
            total,
            requested_by,
            ..
        } => {
            assert_eq!(total, 750_000_000);
            assert_eq!(requested_by.name, "alice");
        }
        other => panic!("expected AdminStats, got {:?}", other),
    }
}

#[test]
fn test_own_stats_for_new_user_is_zero() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = test_store(&config);
    let handlers = CommandHandlers::new(&config, &store);

    let outcome = handlers.run(&MemberInfo::new("99", "newcomer"), Command::Stats);
    assert_eq!(
        outcome.reply,
        Reply::OwnStats {
            user: gem_ledger::UserRef {
                id: UserId::from("99"),
                name: "newcomer".to_string(),
                avatar_url: None,
            },
            total: 0,
        }
    );
    assert!(!config.stats_path.exists());
}

#[test]
fn test_missing_log_channel_is_skipped() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = test_store(&config);
    let handlers = CommandHandlers::new(&config, &store);
    let feed = AuditFeed::new();
    let responder = RecordingResponder::default();
    let (admin, donor) = (admin(), donor());

    // No subscriber on the log channel
    let reply = handlers.dispatch(
        &admin,
        Command::Log {
            user: &donor,
            amount: AmountArg::from(300),
        },
        &responder,
        &feed,
    );

    assert!(!reply.is_rejected());
    assert_eq!(store.get(&UserId::from("2")).unwrap().gems_given, 300);
}

#[test]
fn test_ledger_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);

    {
        let store = test_store(&config);
        let handlers = CommandHandlers::new(&config, &store);
        handlers
            .record_donation(&admin(), &donor(), &AmountArg::from("42k"))
            .unwrap();
    }

    let store = LedgerStore::open(StoreConfig::at(config.stats_path.clone())).unwrap();
    assert_eq!(store.get(&UserId::from("2")).unwrap().gems_given, 42_000);
}

#[test]
fn test_rejections_reach_responder() {
    let dir = TempDir::new().unwrap();
    let config = test_config(&dir);
    let store = test_store(&config);
    let handlers = CommandHandlers::new(&config, &store);
    let feed = AuditFeed::new();
    let log = feed.subscribe(LOG_CHANNEL, AuditFeedConfig::default());
    let responder = RecordingResponder::default();
    let (admin, donor) = (admin(), donor());

    let reply = handlers.dispatch(
        &admin,
        Command::RemoveStats {
            user: &donor,
            amount: AmountArg::from("1k"),
        },
        &responder,
        &feed,
    );

    assert_eq!(reply.rejection(), Some(Rejection::InsufficientBalance));
    assert_eq!(
        reply.to_string(),
        "❌ Cannot remove more gems than the user has."
    );
    assert_eq!(responder.sent.lock().len(), 1);
    assert!(log.drain().is_empty());
}
