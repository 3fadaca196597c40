use chrono::NaiveDate;
use taqvim::cli::{self, Commands};
use taqvim::dashboard::{Dashboard, NOTES_KEY};
use taqvim::notes::NoteDraft;
use taqvim::{Config, Database, KeyValueStore, MemoryStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 9, 6).unwrap()
}

fn run(store: &mut dyn KeyValueStore, command: Commands) -> String {
    let mut out = Vec::new();
    cli::run(command, store, &Config::default(), today(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn dashboard_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("taqvim.db");
    let path = path.to_str().unwrap();

    {
        let mut db = Database::new(path).unwrap();
        let mut dashboard = Dashboard::load(&db).unwrap();
        dashboard.seed_sample_roadmap().unwrap();
        dashboard
            .save_note(NoteDraft {
                id: None,
                date: "2023-09-06".to_string(),
                title: "تماس با بانک".to_string(),
                content: String::new(),
                importance: 70,
                note_type: Default::default(),
            })
            .unwrap();
        dashboard.sections.add("طراحی", "Palette", 500.0).unwrap();
        dashboard.save(&mut db).unwrap();
    }

    let db = Database::new(path).unwrap();
    let dashboard = Dashboard::load(&db).unwrap();
    assert_eq!(dashboard.notes.len(), 1);
    assert_eq!(dashboard.events.len(), 8);
    assert_eq!(dashboard.dependencies.len(), 7);
    assert_eq!(dashboard.sections.len(), 1);

    // Only user notes are stored; timeline notes are derived
    let stored = db.get(NOTES_KEY).unwrap().unwrap();
    assert!(!stored.contains("timeline-"));
}

#[test]
fn malformed_values_fall_back_to_defaults() {
    let mut store = MemoryStore::new();
    store.set(NOTES_KEY, "not json").unwrap();
    store.set("timelineEvents", "{\"oops\":1}").unwrap();
    let dashboard = Dashboard::load(&store).unwrap();
    assert!(dashboard.notes.is_empty());
    assert!(dashboard.events.is_empty());
}

#[test]
fn cli_session_against_one_store() {
    let mut store = MemoryStore::new();
    run(&mut store, Commands::Seed { force: false });

    let timeline = run(
        &mut store,
        Commands::Timeline {
            status: vec![],
            search: None,
            view: None,
            deps: false,
        },
    );
    assert!(timeline.contains("1402/06"));

    run(
        &mut store,
        Commands::SwapEvents {
            dragged: "1".to_string(),
            target: "2".to_string(),
        },
    );
    let dashboard = Dashboard::load(&store).unwrap();
    let date_of = |id: &str| dashboard.events.iter().find(|e| e.id == id).unwrap().date.clone();
    assert_eq!(date_of("1"), "1402/08/10");
    assert_eq!(date_of("2"), "1402/06/15");

    let analytics = run(&mut store, Commands::Analytics { json: true });
    let value: serde_json::Value = serde_json::from_str(&analytics).unwrap();
    assert_eq!(value["total"], 8);
}
