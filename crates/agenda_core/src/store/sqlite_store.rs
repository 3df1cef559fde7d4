//! SQLite-backed agenda store.
//!
//! # Responsibility
//! - Implement the `AgendaStore` contract over the `agendas`/`periods` tables.
//! - Publish full snapshots to subscribers after every committed write.
//!
//! # Invariants
//! - Multi-row writes (cascade delete, duplication) run in one immediate
//!   transaction; a failure leaves no partial state behind.
//! - Read paths reject persisted rows whose day list does not match their
//!   bounds instead of masking them.
//! - Listings are ordered by insertion sequence (creation order).

use crate::calendar::day::CalendarDay;
use crate::db::migrations::{current_version, latest_version};
use crate::model::agenda::{
    duplicate_agenda_name, normalize_agenda_name, Agenda, AgendaId, AgendaPatch,
};
use crate::model::color::Color;
use crate::model::period::{Period, PeriodDraft, PeriodFields, PeriodId, PeriodPatch};
use crate::store::subscription::{Snapshot, SnapshotChannel, Subscription};
use crate::store::{AgendaStore, StoreError, StoreResult};
use log::{debug, error, info};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use uuid::Uuid;

const AGENDA_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    created_at,
    updated_at
FROM agendas";

const PERIOD_SELECT_SQL: &str = "SELECT
    uuid,
    agenda_uuid,
    name,
    description,
    color,
    start_day,
    end_day,
    days_json,
    created_at,
    updated_at
FROM periods";

/// SQLite store bound to one migrated connection.
///
/// Single-writer by construction: the connection is borrowed, and
/// subscriber bookkeeping uses non-`Sync` interior mutability.
pub struct SqliteAgendaStore<'conn> {
    conn: &'conn Connection,
    revision: Cell<u64>,
    agenda_channel: RefCell<Option<SnapshotChannel<Agenda>>>,
    period_channels: RefCell<HashMap<AgendaId, SnapshotChannel<Period>>>,
}

impl<'conn> SqliteAgendaStore<'conn> {
    /// Creates a store over a connection returned by `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self {
            conn,
            revision: Cell::new(0),
            agenda_channel: RefCell::new(None),
            period_channels: RefCell::new(HashMap::new()),
        })
    }

    /// Revision of the latest published snapshot.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    fn write_tx(&self) -> StoreResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    /// Bumps the revision and pushes fresh snapshots to live subscribers.
    ///
    /// Runs after commit; a failed snapshot read is logged and does not
    /// undo the write. Scopes without live subscribers are released.
    fn publish(&self) {
        let revision = self.revision.get() + 1;
        self.revision.set(revision);

        let mut agenda_channel = self.agenda_channel.borrow_mut();
        if agenda_channel.as_ref().is_some_and(SnapshotChannel::is_idle) {
            *agenda_channel = None;
        }
        if let Some(channel) = agenda_channel.as_ref() {
            match load_agendas(self.conn) {
                Ok(items) => {
                    let delivered = channel.publish(Snapshot::new(revision, items));
                    debug!(
                        "event=snapshot_publish module=store status=ok scope=agendas revision={revision} delivered={delivered}"
                    );
                }
                Err(err) => error!(
                    "event=snapshot_publish module=store status=error scope=agendas revision={revision} error={err}"
                ),
            }
        }
        drop(agenda_channel);

        let mut period_channels = self.period_channels.borrow_mut();
        period_channels.retain(|_, channel| !channel.is_idle());
        for (agenda_id, channel) in period_channels.iter() {
            match load_periods(self.conn, *agenda_id) {
                Ok(items) => {
                    let delivered = channel.publish(Snapshot::new(revision, items));
                    debug!(
                        "event=snapshot_publish module=store status=ok scope=periods agenda={agenda_id} revision={revision} delivered={delivered}"
                    );
                }
                Err(err) => error!(
                    "event=snapshot_publish module=store status=error scope=periods agenda={agenda_id} revision={revision} error={err}"
                ),
            }
        }
    }
}

impl AgendaStore for SqliteAgendaStore<'_> {
    fn subscribe_agendas(&self) -> StoreResult<Subscription<Agenda>> {
        let revision = self.revision.get();
        let mut slot = self.agenda_channel.borrow_mut();
        if let Some(channel) = slot.as_ref() {
            // A failed publish leaves the channel behind the store.
            if channel.revision() != revision {
                channel.publish(Snapshot::new(revision, load_agendas(self.conn)?));
            }
            return Ok(channel.subscribe());
        }
        let channel = SnapshotChannel::new(Snapshot::new(revision, load_agendas(self.conn)?));
        let subscription = channel.subscribe();
        *slot = Some(channel);
        Ok(subscription)
    }

    fn subscribe_periods(&self, agenda_id: AgendaId) -> StoreResult<Subscription<Period>> {
        let revision = self.revision.get();
        let mut channels = self.period_channels.borrow_mut();
        if let Some(channel) = channels.get(&agenda_id) {
            if channel.revision() != revision {
                let items = load_periods(self.conn, agenda_id)?;
                channel.publish(Snapshot::new(revision, items));
            }
            return Ok(channel.subscribe());
        }
        let items = load_periods(self.conn, agenda_id)?;
        let channel = SnapshotChannel::new(Snapshot::new(revision, items));
        let subscription = channel.subscribe();
        channels.insert(agenda_id, channel);
        Ok(subscription)
    }

    fn list_agendas(&self) -> StoreResult<Vec<Agenda>> {
        load_agendas(self.conn)
    }

    fn get_agenda(&self, id: AgendaId) -> StoreResult<Option<Agenda>> {
        load_agenda(self.conn, id)
    }

    fn create_agenda(&self, name: &str) -> StoreResult<AgendaId> {
        let name = normalize_agenda_name(name)?;
        let id = Uuid::new_v4();
        insert_agenda(self.conn, id, name.as_str())?;
        info!("event=agenda_create module=store status=ok agenda={id}");
        self.publish();
        Ok(id)
    }

    fn update_agenda(&self, id: AgendaId, patch: &AgendaPatch) -> StoreResult<Agenda> {
        let patch = patch.normalized()?;
        let tx = self.write_tx()?;
        let changed = tx.execute(
            "UPDATE agendas
             SET name = COALESCE(?2, name),
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![id.to_string(), patch.name.as_deref()],
        )?;
        if changed == 0 {
            return Err(StoreError::AgendaNotFound(id));
        }
        let agenda = load_agenda(&tx, id)?.ok_or(StoreError::AgendaNotFound(id))?;
        tx.commit()?;

        info!("event=agenda_update module=store status=ok agenda={id}");
        self.publish();
        Ok(agenda)
    }

    fn delete_agenda(&self, id: AgendaId) -> StoreResult<()> {
        let tx = self.write_tx()?;
        let removed_periods =
            tx.execute("DELETE FROM periods WHERE agenda_uuid = ?1;", [id.to_string()])?;
        let changed = tx.execute("DELETE FROM agendas WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::AgendaNotFound(id));
        }
        tx.commit()?;

        info!(
            "event=agenda_delete module=store status=ok agenda={id} removed_periods={removed_periods}"
        );
        self.publish();
        Ok(())
    }

    fn duplicate_agenda(&self, id: AgendaId) -> StoreResult<AgendaId> {
        let tx = self.write_tx()?;
        let source = load_agenda(&tx, id)?.ok_or(StoreError::AgendaNotFound(id))?;

        let copy_id = Uuid::new_v4();
        insert_agenda(&tx, copy_id, duplicate_agenda_name(source.name.as_str()).as_str())?;

        let periods = load_periods(&tx, id)?;
        for period in &periods {
            let mut copy = period.clone();
            copy.id = Uuid::new_v4();
            copy.agenda_id = copy_id;
            insert_period(&tx, &copy, Some(period.created_at))?;
        }
        tx.commit()?;

        info!(
            "event=agenda_duplicate module=store status=ok source={id} agenda={copy_id} periods={}",
            periods.len()
        );
        self.publish();
        Ok(copy_id)
    }

    fn list_periods(&self, agenda_id: AgendaId) -> StoreResult<Vec<Period>> {
        load_periods(self.conn, agenda_id)
    }

    fn get_period(&self, id: PeriodId) -> StoreResult<Option<Period>> {
        load_period(self.conn, id)
    }

    fn create_period(&self, agenda_id: AgendaId, draft: &PeriodDraft) -> StoreResult<PeriodId> {
        let fields = draft.validate()?;
        let tx = self.write_tx()?;
        if load_agenda(&tx, agenda_id)?.is_none() {
            return Err(StoreError::AgendaNotFound(agenda_id));
        }
        let period = Period::new(Uuid::new_v4(), agenda_id, fields, 0, 0);
        insert_period(&tx, &period, None)?;
        tx.commit()?;

        info!(
            "event=period_create module=store status=ok agenda={agenda_id} period={} days={}",
            period.id,
            period.day_count()
        );
        self.publish();
        Ok(period.id)
    }

    fn update_period(&self, id: PeriodId, patch: &PeriodPatch) -> StoreResult<Period> {
        let tx = self.write_tx()?;
        let mut period = load_period(&tx, id)?.ok_or(StoreError::PeriodNotFound(id))?;
        let bounds_changed = period.apply_patch(patch)?;

        tx.execute(
            "UPDATE periods
             SET name = ?2,
                 description = ?3,
                 color = ?4,
                 start_day = ?5,
                 end_day = ?6,
                 days_json = ?7,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                period.name.as_str(),
                period.description.as_str(),
                period.color.as_str(),
                period.start().to_string(),
                period.end().to_string(),
                days_to_json(period.days())?,
            ],
        )?;
        let updated = load_period(&tx, id)?.ok_or(StoreError::PeriodNotFound(id))?;
        tx.commit()?;

        info!(
            "event=period_update module=store status=ok period={id} bounds_changed={bounds_changed}"
        );
        self.publish();
        Ok(updated)
    }

    fn delete_period(&self, id: PeriodId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM periods WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(StoreError::PeriodNotFound(id));
        }

        info!("event=period_delete module=store status=ok period={id}");
        self.publish();
        Ok(())
    }
}

fn insert_agenda(conn: &Connection, id: AgendaId, name: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO agendas (uuid, name) VALUES (?1, ?2);",
        params![id.to_string(), name],
    )?;
    Ok(())
}

/// Inserts `period`; `created_at = None` stamps the current time.
fn insert_period(conn: &Connection, period: &Period, created_at: Option<i64>) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO periods (
            uuid,
            agenda_uuid,
            name,
            description,
            color,
            start_day,
            end_day,
            days_json,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, COALESCE(?9, strftime('%s', 'now') * 1000));",
        params![
            period.id.to_string(),
            period.agenda_id.to_string(),
            period.name.as_str(),
            period.description.as_str(),
            period.color.as_str(),
            period.start().to_string(),
            period.end().to_string(),
            days_to_json(period.days())?,
            created_at,
        ],
    )?;
    Ok(())
}

fn load_agendas(conn: &Connection) -> StoreResult<Vec<Agenda>> {
    let mut stmt = conn.prepare(&format!("{AGENDA_SELECT_SQL} ORDER BY seq ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut agendas = Vec::new();
    while let Some(row) = rows.next()? {
        agendas.push(parse_agenda_row(row)?);
    }
    Ok(agendas)
}

fn load_agenda(conn: &Connection, id: AgendaId) -> StoreResult<Option<Agenda>> {
    let mut stmt = conn.prepare(&format!("{AGENDA_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_agenda_row(row)?));
    }
    Ok(None)
}

fn load_periods(conn: &Connection, agenda_id: AgendaId) -> StoreResult<Vec<Period>> {
    let mut stmt = conn.prepare(&format!(
        "{PERIOD_SELECT_SQL} WHERE agenda_uuid = ?1 ORDER BY seq ASC;"
    ))?;
    let mut rows = stmt.query([agenda_id.to_string()])?;
    let mut periods = Vec::new();
    while let Some(row) = rows.next()? {
        periods.push(parse_period_row(row)?);
    }
    Ok(periods)
}

fn load_period(conn: &Connection, id: PeriodId) -> StoreResult<Option<Period>> {
    let mut stmt = conn.prepare(&format!("{PERIOD_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_period_row(row)?));
    }
    Ok(None)
}

fn parse_agenda_row(row: &Row<'_>) -> StoreResult<Agenda> {
    let agenda = Agenda {
        id: parse_uuid(row.get("uuid")?, "agendas.uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    agenda
        .validate()
        .map_err(|err| StoreError::InvalidData(format!("agenda {}: {err}", agenda.id)))?;
    Ok(agenda)
}

fn parse_period_row(row: &Row<'_>) -> StoreResult<Period> {
    let id = parse_uuid(row.get("uuid")?, "periods.uuid")?;
    let agenda_id = parse_uuid(row.get("agenda_uuid")?, "periods.agenda_uuid")?;

    let color_text: String = row.get("color")?;
    let color = Color::parse(color_text.as_str()).map_err(|_| {
        StoreError::InvalidData(format!("invalid color `{color_text}` in periods.color"))
    })?;
    let start = parse_day(row.get("start_day")?, "periods.start_day")?;
    let end = parse_day(row.get("end_day")?, "periods.end_day")?;
    let name: String = row.get("name")?;
    let description: String = row.get("description")?;

    let fields = PeriodFields::new(name.as_str(), description.as_str(), color, start, end)
        .map_err(|err| StoreError::InvalidData(format!("period {id}: {err}")))?;
    let period = Period::new(
        id,
        agenda_id,
        fields,
        row.get("created_at")?,
        row.get("updated_at")?,
    );

    let days_json: String = row.get("days_json")?;
    let stored_days: Vec<CalendarDay> = serde_json::from_str(days_json.as_str()).map_err(|err| {
        StoreError::InvalidData(format!("invalid day list in periods.days_json: {err}"))
    })?;
    if stored_days.as_slice() != period.days() {
        return Err(StoreError::InvalidData(format!(
            "day list of period {id} does not match {start}..={end}"
        )));
    }
    Ok(period)
}

fn parse_uuid(text: String, column: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(text.as_str())
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

fn parse_day(text: String, column: &str) -> StoreResult<CalendarDay> {
    CalendarDay::parse(text.as_str())
        .map_err(|err| StoreError::InvalidData(format!("{err} in {column}")))
}

fn days_to_json(days: &[CalendarDay]) -> StoreResult<String> {
    serde_json::to_string(days)
        .map_err(|err| StoreError::InvalidData(format!("cannot encode day list: {err}")))
}
