use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gridlaunch_core::action_executor::RecordingOpener;
use gridlaunch_core::catalog::Catalog;
use gridlaunch_core::config::Config;
use gridlaunch_core::core_service::CoreService;
use gridlaunch_core::discovery::{
    DiscoveredApp, DiscoveryProvider, FixtureProvider, ProviderError,
};
use gridlaunch_core::hotkey::Modifier;
use gridlaunch_core::kv_store;
use gridlaunch_core::launcher_state::{LauncherEffect, LauncherEvent};
use gridlaunch_core::model::LaunchItem;
use gridlaunch_core::navigator::{Focus, NavKey};
use gridlaunch_core::view::SectionKind;

fn unique_db_path(label: &str) -> PathBuf {
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir()
        .join(format!("gridlaunch-{label}-{unique}"))
        .join("history.sqlite3")
}

fn config_at(db_path: PathBuf) -> Config {
    Config {
        scan_roots: Vec::new(),
        history_db_path: db_path,
        ..Default::default()
    }
}

fn fixture_providers(count: usize) -> Vec<Box<dyn DiscoveryProvider>> {
    let apps = (1..=count)
        .map(|i| {
            DiscoveredApp::new(
                &format!("/Applications/App{i:02}.app"),
                &format!("App {i:02}"),
            )
        })
        .collect();
    vec![Box::new(FixtureProvider::from_apps(apps))]
}

fn service_with(label: &str, opener: &Arc<RecordingOpener>) -> CoreService {
    let config = config_at(unique_db_path(label));
    CoreService::new(config)
        .unwrap()
        .with_providers(fixture_providers(10))
        .with_opener(Box::new(Arc::clone(opener)))
}

#[test]
fn query_navigate_activate_launches_and_records() {
    let opener = Arc::new(RecordingOpener::default());
    let mut service = service_with("launch-flow", &opener);
    assert_eq!(service.rebuild_catalog(), 10);

    service.handle(LauncherEvent::Toggle { has_focus: false }).unwrap();
    service
        .handle(LauncherEvent::QueryChanged("app 03".into()))
        .unwrap();
    assert_eq!(service.state().flattened().len(), 1);

    service.handle(LauncherEvent::Navigate(NavKey::Down)).unwrap();
    assert_eq!(service.state().focus(), Focus::Index(0));

    let effect = service.handle(LauncherEvent::Activate).unwrap();
    match effect {
        LauncherEffect::Launch(item) => assert_eq!(item.id, "/Applications/App03.app"),
        other => panic!("unexpected effect: {other:?}"),
    }

    assert_eq!(opener.opened(), vec!["/Applications/App03.app".to_string()]);
    assert_eq!(service.history().count("/Applications/App03.app"), 1);
    assert_eq!(service.state().query(), "");
    assert_eq!(service.state().focus(), Focus::Search);
    assert!(!service.state().is_visible());

    let sections = service.state().sections();
    assert_eq!(sections[0].kind, SectionKind::Recent);
    assert_eq!(sections[0].items[0].id, "/Applications/App03.app");
    assert_eq!(sections[1].kind, SectionKind::All);
}

#[test]
fn launch_history_survives_restart() {
    let db_path = unique_db_path("history-restart");
    let opener = Arc::new(RecordingOpener::default());

    {
        let mut service = CoreService::new(config_at(db_path.clone()))
            .unwrap()
            .with_providers(fixture_providers(5))
            .with_opener(Box::new(Arc::clone(&opener)));
        service.rebuild_catalog();
        service.handle(LauncherEvent::ActivateAt(1)).unwrap();
        service.handle(LauncherEvent::ActivateAt(4)).unwrap();
    }

    let db = kv_store::open_file(&db_path).unwrap();
    let history = kv_store::load_history(&db, 8);
    assert_eq!(history.recent_ids().len(), 2);
    assert_eq!(history.count("/Applications/App02.app"), 1);

    let mut restarted = CoreService::with_connection(config_at(db_path.clone()), db)
        .unwrap()
        .with_providers(fixture_providers(5));
    restarted.rebuild_catalog();
    assert_eq!(restarted.state().sections()[0].kind, SectionKind::Recent);
    assert_eq!(restarted.state().sections()[0].len(), 2);

    if let Some(dir) = db_path.parent() {
        std::fs::remove_dir_all(dir).unwrap();
    }
}

#[test]
fn background_rescan_publishes_catalog() {
    let opener = Arc::new(RecordingOpener::default());
    let mut service = service_with("background-scan", &opener);
    assert!(service.state().catalog().is_empty());
    assert!(!service.poll_catalog());

    service.spawn_rescan();
    assert!(service.wait_for_catalog(Duration::from_secs(5)));
    assert_eq!(service.state().catalog().len(), 10);
    assert!(!service.poll_catalog());
}

#[test]
fn shrinking_catalog_resets_stale_focus() {
    let opener = Arc::new(RecordingOpener::default());
    let mut service = service_with("stale-focus", &opener);
    service.rebuild_catalog();

    service.handle(LauncherEvent::Navigate(NavKey::Down)).unwrap();
    for _ in 0..9 {
        service.handle(LauncherEvent::Navigate(NavKey::Right)).unwrap();
    }
    assert_eq!(service.state().focus(), Focus::Index(9));

    let smaller = Catalog::new(vec![
        LaunchItem::new("/Applications/App01.app", "App 01"),
        LaunchItem::new("/Applications/App02.app", "App 02"),
    ]);
    service.handle(LauncherEvent::CatalogReplaced(smaller)).unwrap();
    assert_eq!(service.state().focus(), Focus::Search);
    assert_eq!(service.state().selected_item(), None);
}

#[test]
fn opener_failure_still_records_launch() {
    let mut service = CoreService::new(config_at(unique_db_path("open-failure")))
        .unwrap()
        .with_providers(vec![Box::new(FixtureProvider::from_apps(vec![
            DiscoveredApp::new("/nonexistent/gridlaunch/Ghost.app", "Ghost"),
        ]))]);
    service.rebuild_catalog();

    let effect = service.handle(LauncherEvent::ActivateAt(0)).unwrap();
    assert!(matches!(effect, LauncherEffect::Launch(_)));
    assert_eq!(service.history().count("/nonexistent/gridlaunch/Ghost.app"), 1);
}

#[test]
fn builds_double_tap_detector_from_config() {
    let opener = Arc::new(RecordingOpener::default());
    let service = service_with("detector", &opener);
    let mut detector = service.double_tap_detector().unwrap();

    assert!(!detector.on_modifiers_changed(&[Modifier::Command], Duration::from_millis(1_000)));
    assert!(detector.on_modifiers_changed(&[Modifier::Command], Duration::from_millis(1_200)));
}

#[test]
fn rejects_invalid_config() {
    let config = Config {
        columns: 0,
        ..config_at(unique_db_path("invalid-config"))
    };
    assert!(CoreService::new(config).is_err());
}

/// The first scan is slow and sees the old install; later scans are instant.
struct SlowFirstScan {
    calls: Arc<AtomicUsize>,
}

impl DiscoveryProvider for SlowFirstScan {
    fn provider_name(&self) -> &'static str {
        "slow-first-scan"
    }

    fn discover(&self) -> Result<Vec<DiscoveredApp>, ProviderError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            std::thread::sleep(Duration::from_millis(300));
            return Ok(vec![DiscoveredApp::new("/Applications/Old.app", "Old")]);
        }
        Ok(vec![
            DiscoveredApp::new("/Applications/Old.app", "Old"),
            DiscoveredApp::new("/Applications/New.app", "New"),
        ])
    }
}

#[test]
fn synchronous_rescan_supersedes_background_scan() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut service = CoreService::new(config_at(unique_db_path("superseded-scan")))
        .unwrap()
        .with_providers(vec![Box::new(SlowFirstScan {
            calls: Arc::clone(&calls),
        })]);

    service.spawn_rescan();
    while calls.load(Ordering::SeqCst) == 0 {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(service.rebuild_catalog(), 2);

    std::thread::sleep(Duration::from_millis(600));
    assert!(!service.poll_catalog());
    assert!(!service.wait_for_catalog(Duration::from_millis(10)));
    assert_eq!(service.state().catalog().len(), 2);
    assert!(service.state().catalog().lookup("/Applications/New.app").is_some());
}

#[test]
fn corrupt_history_database_starts_with_empty_history() {
    let db_path = unique_db_path("corrupt-db");
    let dir = db_path.parent().unwrap().to_path_buf();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(&db_path, vec![0xAB_u8; 4096]).unwrap();

    let mut service = CoreService::new(config_at(db_path.clone()))
        .unwrap()
        .with_providers(fixture_providers(3))
        .with_opener(Box::new(RecordingOpener::default()));
    assert!(service.history().recent_ids().is_empty());
    assert!(service.history().counts().is_empty());

    service.rebuild_catalog();
    service.handle(LauncherEvent::ActivateAt(0)).unwrap();

    let reopened = kv_store::open_file(&db_path).unwrap();
    assert_eq!(kv_store::load_history(&reopened, 8).recent_ids().len(), 1);

    let set_aside = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
        .count();
    assert_eq!(set_aside, 1);

    drop(reopened);
    drop(service);
    std::fs::remove_dir_all(&dir).unwrap();
}
