use agenda_core::db::open_db_in_memory;
use agenda_core::{
    AgendaService, AgendaSession, CalendarDay, CommittedRange, PeriodPatch, ServiceError,
    SqliteAgendaStore,
};

fn day(value: &str) -> CalendarDay {
    CalendarDay::parse(value).unwrap()
}

fn range(start: &str, end: &str) -> CommittedRange {
    CommittedRange {
        start: day(start),
        end: day(end),
        days: agenda_core::date_range(day(start), day(end)).unwrap(),
    }
}

#[test]
fn session_follows_store_writes_through_the_feed() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteAgendaStore::try_new(&conn).unwrap());
    let agenda_id = service.ensure_default_agenda().unwrap();

    let mut session = AgendaSession::new();
    let mut feed = service.open_feed(&mut session).unwrap();
    assert_eq!(session.selected_agenda_id(), Some(agenda_id));
    assert_eq!(feed.watched_agenda(), Some(agenda_id));
    assert!(session.periods().is_empty());

    let period_id = service
        .create_period_from_selection(
            agenda_id,
            &range("2025-09-28", "2025-10-02"),
            "Trip",
            "",
            "#F59E0B",
        )
        .unwrap();
    assert!(session.periods().is_empty());

    assert!(service.pump(&mut feed, &mut session).unwrap());
    assert_eq!(session.periods().len(), 1);
    assert_eq!(
        session.day_coverage(day("2025-09-30"), 3).visible[0].id,
        period_id
    );
    assert!(session.day_coverage(day("2025-10-03"), 3).visible.is_empty());

    session.select_period(period_id).unwrap();
    service
        .update_period(
            period_id,
            &PeriodPatch {
                name: Some("Holiday".to_string()),
                ..PeriodPatch::default()
            },
        )
        .unwrap();
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.selected_period().unwrap().name, "Holiday");

    service.delete_period(period_id).unwrap();
    service.pump(&mut feed, &mut session).unwrap();
    assert!(session.periods().is_empty());
    assert_eq!(session.selected_period_id(), None);
}

#[test]
fn switching_agendas_retargets_the_period_feed() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteAgendaStore::try_new(&conn).unwrap());
    let work = service.create_agenda("Work").unwrap();
    let home = service.create_agenda("Home").unwrap();
    service
        .create_period_from_selection(
            work,
            &range("2025-09-01", "2025-09-02"),
            "Sprint",
            "",
            "#3B82F6",
        )
        .unwrap();
    service
        .create_period_from_selection(
            home,
            &range("2025-09-05", "2025-09-05"),
            "Party",
            "",
            "#EC4899",
        )
        .unwrap();

    let mut session = AgendaSession::new();
    let mut feed = service.open_feed(&mut session).unwrap();
    assert_eq!(session.selected_agenda_id(), Some(work));
    assert_eq!(session.periods()[0].name, "Sprint");

    session.select_agenda(home).unwrap();
    assert!(session.periods().is_empty());
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(feed.watched_agenda(), Some(home));
    assert_eq!(session.periods().len(), 1);
    assert_eq!(session.periods()[0].name, "Party");

    session.select_agenda(work).unwrap();
    session.select_agenda(home).unwrap();
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.periods()[0].name, "Party");
}

#[test]
fn deleting_the_selected_agenda_falls_back_without_orphans() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteAgendaStore::try_new(&conn).unwrap());
    let first = service.create_agenda("First").unwrap();
    let second = service.create_agenda("Second").unwrap();
    service
        .create_period_from_selection(
            second,
            &range("2025-09-10", "2025-09-12"),
            "Gone",
            "",
            "#EF4444",
        )
        .unwrap();

    let mut session = AgendaSession::new();
    let mut feed = service.open_feed(&mut session).unwrap();
    session.select_agenda(second).unwrap();
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.periods().len(), 1);

    service.delete_agenda(second).unwrap();
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.selected_agenda_id(), Some(first));
    assert!(session.periods().is_empty());
    assert!(session.index().is_empty());

    assert!(matches!(
        service.delete_agenda(second),
        Err(ServiceError::AgendaNotFound(_))
    ));
}

#[test]
fn duplicate_shows_up_as_a_new_agenda() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteAgendaStore::try_new(&conn).unwrap());
    let source = service.ensure_default_agenda().unwrap();
    service
        .create_period_from_selection(
            source,
            &range("2025-09-01", "2025-09-03"),
            "Sprint",
            "",
            "#3B82F6",
        )
        .unwrap();

    let mut session = AgendaSession::new();
    let mut feed = service.open_feed(&mut session).unwrap();
    let copy = service.duplicate_agenda(source).unwrap();
    service.pump(&mut feed, &mut session).unwrap();

    let names: Vec<&str> = session
        .agendas()
        .iter()
        .map(|agenda| agenda.name.as_str())
        .collect();
    assert_eq!(names, ["My Agenda", "My Agenda (Copy)"]);

    session.select_agenda(copy).unwrap();
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.periods().len(), 1);
    assert_eq!(session.periods()[0].agenda_id, copy);
}

#[test]
fn new_agendas_can_be_selected_before_their_snapshot_arrives() {
    let conn = open_db_in_memory().unwrap();
    let service = AgendaService::new(SqliteAgendaStore::try_new(&conn).unwrap());
    let source = service.ensure_default_agenda().unwrap();
    service
        .create_period_from_selection(
            source,
            &range("2025-09-01", "2025-09-03"),
            "Sprint",
            "",
            "#3B82F6",
        )
        .unwrap();

    let mut session = AgendaSession::new();
    let mut feed = service.open_feed(&mut session).unwrap();

    let created = service.create_agenda("Side project").unwrap();
    session.select_agenda_when_listed(created);
    assert_eq!(session.selected_agenda_id(), Some(source));
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.selected_agenda_id(), Some(created));
    assert_eq!(feed.watched_agenda(), Some(created));
    assert!(session.periods().is_empty());

    let copy = service.duplicate_agenda(source).unwrap();
    session.select_agenda_when_listed(copy);
    service.pump(&mut feed, &mut session).unwrap();
    assert_eq!(session.selected_agenda_id(), Some(copy));
    assert_eq!(session.periods().len(), 1);
    assert_eq!(session.periods()[0].agenda_id, copy);
    assert_eq!(session.pending_agenda_id(), None);
}
