//! Table/view controller.
//!
//! Owns the active table selection and everything derived from it: schema,
//! fetched rows behind the filter/sort proxy, per-column filter text, the open
//! row form and any pending delete. Database work runs on the tokio runtime;
//! results come back as [`DbEvent`]s which the UI thread applies once per frame.

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::state::{DbStatus, ViewState};
use crate::crud::{validate_primary_key, Confirmation, CrudExecutor, CrudOutcome, MutationKind};
use crate::db::{Database, RowRecord};
use crate::error::CrudError;
use crate::proxy::{FilterSortProxy, SortOrder};
use crate::schema::{self, TableSchema};
use crate::ui::{RowForm, RowFormAction};

pub enum DbEvent {
    TablesListed {
        tables: Vec<String>,
    },
    TablesFailed {
        error: String,
    },
    TableLoaded {
        generation: u64,
        table: String,
        schema: TableSchema,
        row_count: usize,
        rows: Vec<RowRecord>,
    },
    SchemaFailed {
        generation: u64,
        table: String,
        error: String,
    },
    RowsFetched {
        generation: u64,
        table: String,
        rows: Vec<RowRecord>,
    },
    FetchFailed {
        generation: u64,
        table: String,
        error: String,
    },
    MutationFinished {
        kind: MutationKind,
        /// Table the statement ran against.
        table: String,
        result: Result<CrudOutcome, CrudError>,
    },
}

/// What the UI should do after a form action was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResponse {
    None,
    /// Ask the user before deleting the row addressed by `identity`.
    ConfirmDelete { identity: String },
}

pub struct ViewController {
    rt: Handle,
    db: Database,
    executor: CrudExecutor,
    db_events_tx: mpsc::UnboundedSender<DbEvent>,
    db_events_rx: mpsc::UnboundedReceiver<DbEvent>,

    tables: Vec<String>,
    /// Table most recently asked for, and the generation stamped on its fetch.
    requested: Option<String>,
    generation: u64,
    view_state: ViewState,

    schema: Option<TableSchema>,
    row_count: usize,
    proxy: FilterSortProxy,
    filter_inputs: Vec<String>,
    rows_version: u64,

    form: Option<RowForm>,
    pending_delete: Option<String>,
    mutation_in_flight: Option<MutationKind>,

    stale_dropped: usize,
    pub last_status: Option<String>,
    pub last_error: Option<String>,
}

impl ViewController {
    pub fn new(rt: Handle, db: Database) -> Self {
        let (db_events_tx, db_events_rx) = mpsc::unbounded_channel();
        Self {
            rt,
            executor: CrudExecutor::new(db.clone()),
            db,
            db_events_tx,
            db_events_rx,
            tables: Vec::new(),
            requested: None,
            generation: 0,
            view_state: ViewState::Unselected,
            schema: None,
            row_count: 0,
            proxy: FilterSortProxy::new(),
            filter_inputs: Vec::new(),
            rows_version: 0,
            form: None,
            pending_delete: None,
            mutation_in_flight: None,
            stale_dropped: 0,
            last_status: None,
            last_error: None,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    pub fn current_table(&self) -> Option<&str> {
        self.schema.as_ref().map(|s| s.name.as_str())
    }

    /// Table the view is switching to, or showing.
    pub fn requested_table(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn proxy(&self) -> &FilterSortProxy {
        &self.proxy
    }

    pub fn filter_inputs(&self) -> &[String] {
        &self.filter_inputs
    }

    /// Bumped whenever the fetched rows are replaced.
    pub fn rows_version(&self) -> u64 {
        self.rows_version
    }

    pub fn form(&self) -> Option<&RowForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut RowForm> {
        self.form.as_mut()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn mutation_in_flight(&self) -> bool {
        self.mutation_in_flight.is_some()
    }

    /// Fetch results discarded because a newer request superseded them.
    pub fn stale_dropped(&self) -> usize {
        self.stale_dropped
    }

    pub fn db_status(&self) -> DbStatus {
        if self.last_error.is_some() {
            DbStatus::Error
        } else if self.view_state == ViewState::Loading || self.mutation_in_flight.is_some() {
            DbStatus::Loading
        } else {
            DbStatus::Connected
        }
    }

    pub fn load_tables(&mut self) {
        let tx = self.db_events_tx.clone();
        let db = self.db.clone();
        self.rt.spawn(async move {
            let event = match db.list_tables().await {
                Ok(tables) => DbEvent::TablesListed { tables },
                Err(e) => DbEvent::TablesFailed {
                    error: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    /// Switch the view to `table`: inspect it, then fetch its rows.
    ///
    /// Filters, sort and rows of the previous table are discarded once the new
    /// schema arrives; if inspection fails the previous table stays on screen.
    pub fn select_table(&mut self, table: &str) {
        self.generation += 1;
        self.requested = Some(table.to_string());
        self.view_state = ViewState::Loading;
        self.form = None;
        self.pending_delete = None;
        self.last_error = None;
        self.last_status = Some(format!("Loading {table}..."));
        tracing::info!(table, generation = self.generation, "switching table");

        let generation = self.generation;
        let table = table.to_string();
        let tx = self.db_events_tx.clone();
        let db = self.db.clone();
        self.rt.spawn(async move {
            let event = match schema::inspect(&db, &table).await {
                Ok((schema, row_count)) => match db.fetch_rows(&table).await {
                    Ok(rows) => DbEvent::TableLoaded {
                        generation,
                        table,
                        schema,
                        row_count,
                        rows,
                    },
                    Err(e) => DbEvent::FetchFailed {
                        generation,
                        table,
                        error: e.to_string(),
                    },
                },
                Err(e) => DbEvent::SchemaFailed {
                    generation,
                    table,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    /// Re-fetch the current table's rows, keeping filters and sort.
    ///
    /// While a switch is in flight the requested table is reloaded instead,
    /// so the pending switch is never replaced by the table being left.
    pub fn refresh(&mut self) {
        if self.view_state == ViewState::Loading {
            if let Some(table) = self.requested.clone() {
                if self.schema.is_none() || self.current_table() != Some(table.as_str()) {
                    self.select_table(&table);
                    return;
                }
            }
        }
        let Some(table) = self.current_table().map(str::to_string) else {
            return;
        };

        self.generation += 1;
        self.requested = Some(table.clone());
        self.view_state = ViewState::Loading;
        tracing::debug!(table = %table, generation = self.generation, "re-fetching rows");

        let generation = self.generation;
        let tx = self.db_events_tx.clone();
        let db = self.db.clone();
        self.rt.spawn(async move {
            let event = match db.fetch_rows(&table).await {
                Ok(rows) => DbEvent::RowsFetched {
                    generation,
                    table,
                    rows,
                },
                Err(e) => DbEvent::FetchFailed {
                    generation,
                    table,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    pub fn drain_db_events(&mut self) {
        while let Ok(ev) = self.db_events_rx.try_recv() {
            self.apply_db_event(ev);
        }
    }

    /// Wait for the next event and apply it. Returns false once the channel is closed.
    pub async fn process_next_event(&mut self) -> bool {
        match self.db_events_rx.recv().await {
            Some(ev) => {
                self.apply_db_event(ev);
                true
            }
            None => false,
        }
    }

    fn is_current(&self, generation: u64, table: &str) -> bool {
        generation == self.generation && self.requested.as_deref() == Some(table)
    }

    fn drop_stale(&mut self, generation: u64, table: &str) {
        self.stale_dropped += 1;
        tracing::warn!(
            table,
            generation,
            current = self.generation,
            "dropping stale fetch result"
        );
    }

    /// Return to whatever was on screen before a failed request.
    fn settle_after_failure(&mut self) {
        self.requested = self.current_table().map(str::to_string);
        self.view_state = if self.schema.is_some() {
            ViewState::TableLoaded
        } else {
            ViewState::Unselected
        };
    }

    pub fn apply_db_event(&mut self, ev: DbEvent) {
        match ev {
            DbEvent::TablesListed { tables } => {
                tracing::debug!(count = tables.len(), "table list received");
                self.tables = tables;
                self.last_status = Some(format!("{} tables", self.tables.len()));
                if self.requested.is_none() {
                    if let Some(first) = self.tables.first().cloned() {
                        self.select_table(&first);
                    }
                }
            }
            DbEvent::TablesFailed { error } => {
                tracing::error!(error = %error, "failed to list tables");
                self.last_error = Some(format!("Failed to list tables: {error}"));
            }
            DbEvent::TableLoaded {
                generation,
                table,
                schema,
                row_count,
                rows,
            } => {
                if !self.is_current(generation, &table) {
                    self.drop_stale(generation, &table);
                    return;
                }
                tracing::info!(
                    table = %table,
                    columns = schema.column_count(),
                    row_count,
                    "table loaded"
                );
                self.filter_inputs = vec![String::new(); schema.column_count()];
                self.schema = Some(schema);
                self.row_count = row_count;
                self.proxy.reset();
                self.proxy.set_rows(rows);
                self.rows_version += 1;
                self.view_state = ViewState::TableLoaded;
                self.last_status = Some(format!("{table}: {row_count} rows"));
            }
            DbEvent::RowsFetched {
                generation,
                table,
                rows,
            } => {
                if !self.is_current(generation, &table) || self.current_table() != Some(table.as_str()) {
                    self.drop_stale(generation, &table);
                    return;
                }
                self.row_count = rows.len();
                self.proxy.set_rows(rows);
                self.rows_version += 1;
                self.view_state = ViewState::TableLoaded;
                tracing::debug!(table = %table, row_count = self.row_count, "rows refreshed");
            }
            DbEvent::SchemaFailed {
                generation,
                table,
                error,
            }
            | DbEvent::FetchFailed {
                generation,
                table,
                error,
            } => {
                if !self.is_current(generation, &table) {
                    self.drop_stale(generation, &table);
                    return;
                }
                tracing::error!(table = %table, error = %error, "failed to load table");
                self.last_error = Some(error);
                self.settle_after_failure();
            }
            DbEvent::MutationFinished {
                kind,
                table,
                result,
            } => {
                self.mutation_in_flight = None;
                self.finish_mutation(kind, &table, result);
            }
        }
    }

    fn finish_mutation(
        &mut self,
        kind: MutationKind,
        table: &str,
        result: Result<CrudOutcome, CrudError>,
    ) {
        match result {
            Ok(CrudOutcome::Completed { affected }) => {
                self.form = None;
                self.last_error = None;
                self.last_status = Some(format!(
                    "{} applied ({affected} row{} affected)",
                    capitalize(kind.label()),
                    if affected == 1 { "" } else { "s" }
                ));
                if self.requested.as_deref() == Some(table) {
                    self.refresh();
                } else {
                    tracing::debug!(table, "view moved to another table, skipping re-fetch");
                }
            }
            Ok(CrudOutcome::Cancelled) => {
                self.last_status = Some(format!("{} cancelled", capitalize(kind.label())));
            }
            Err(CrudError::Validation(e)) => match self.form.as_mut() {
                Some(form) => form.reject(e.to_string()),
                None => self.last_status = Some(e.to_string()),
            },
            Err(e) => {
                tracing::error!(kind = kind.label(), error = %e, "mutation failed");
                self.form = None;
                self.last_error = Some(format!("{} failed: {e}", capitalize(kind.label())));
            }
        }
    }

    pub fn set_filter_text(&mut self, column: usize, text: String) {
        if column >= self.filter_inputs.len() {
            return;
        }
        self.proxy.set_filter(column, &text);
        self.filter_inputs[column] = text;
    }

    pub fn clear_filters(&mut self) {
        self.proxy.clear_filters();
        for input in &mut self.filter_inputs {
            input.clear();
        }
    }

    pub fn toggle_sort(&mut self, column: usize) -> Option<SortOrder> {
        let schema = self.schema.as_ref()?;
        if column >= schema.column_count() {
            return None;
        }
        let order = self.proxy.toggle_sort(column);
        self.last_status = Some(format!("Sorted by {} {}", schema.columns[column].name, order.arrow()));
        Some(order)
    }

    pub fn clear_sort(&mut self) {
        self.proxy.clear_sort();
        self.last_status = Some("Sort cleared".to_string());
    }

    pub fn open_insert_form(&mut self) -> bool {
        let Some(schema) = self.schema.as_ref() else {
            self.last_status = Some("No table selected".to_string());
            return false;
        };
        self.form = Some(RowForm::build(schema, None));
        true
    }

    /// Open the edit form for a row as currently shown in the grid.
    pub fn open_edit_form(&mut self, visible_row: usize) -> bool {
        let Some(schema) = self.schema.as_ref() else {
            return false;
        };
        let Some(row) = self.proxy.row(visible_row) else {
            return false;
        };
        self.form = Some(RowForm::build(schema, Some(row)));
        true
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.pending_delete = None;
    }

    pub fn handle_form_action(&mut self, action: RowFormAction) -> FormResponse {
        match action {
            RowFormAction::Continue => {}
            RowFormAction::Close => self.close_form(),
            RowFormAction::Insert { values } => {
                if self.validate_form(&values) {
                    self.dispatch(MutationKind::Insert, values, None);
                }
            }
            RowFormAction::Update { values, identity } => {
                if self.validate_form(&values) {
                    self.dispatch(MutationKind::Update, values, Some(identity));
                }
            }
            RowFormAction::Delete { identity } => {
                self.pending_delete = Some(identity.clone());
                return FormResponse::ConfirmDelete { identity };
            }
        }
        FormResponse::None
    }

    /// Answer the pending delete prompt.
    pub fn resolve_delete(&mut self, confirmation: Confirmation) {
        let Some(identity) = self.pending_delete.take() else {
            return;
        };
        match confirmation {
            Confirmation::Yes => {
                self.dispatch(MutationKind::Delete, Vec::new(), Some(identity));
            }
            Confirmation::Cancel => {
                tracing::debug!(identity = %identity, "delete cancelled");
                self.last_status = Some("Delete cancelled".to_string());
            }
        }
    }

    fn validate_form(&mut self, values: &[String]) -> bool {
        let Some(schema) = self.schema.as_ref() else {
            return false;
        };
        match validate_primary_key(schema, values) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(column = %e.column, "form rejected");
                if let Some(form) = self.form.as_mut() {
                    form.reject(e.to_string());
                }
                false
            }
        }
    }

    fn dispatch(&mut self, kind: MutationKind, values: Vec<String>, identity: Option<String>) {
        if self.mutation_in_flight.is_some() {
            let busy = CrudError::Busy.to_string();
            tracing::warn!(kind = kind.label(), "mutation rejected while another is in flight");
            if let Some(form) = self.form.as_mut() {
                form.set_message(busy.clone());
            }
            self.last_status = Some(busy);
            return;
        }
        let Some(schema) = self.schema.clone() else {
            return;
        };

        // Cells are compared against the row as it was when the form opened.
        let original = self
            .form
            .as_ref()
            .and_then(|f| f.original())
            .map(<[String]>::to_vec);

        self.mutation_in_flight = Some(kind);
        self.last_status = Some(format!("Applying {}...", kind.label()));

        let table = schema.name.clone();
        let executor = self.executor.clone();
        let tx = self.db_events_tx.clone();
        self.rt.spawn(async move {
            let result = match (kind, identity) {
                (MutationKind::Insert, _) => executor.insert(&schema, values).await,
                (MutationKind::Update, Some(identity)) => match original {
                    Some(original) => {
                        executor
                            .update_changed(&schema, values, &original, identity)
                            .await
                    }
                    None => executor.update(&schema, values, identity).await,
                },
                (MutationKind::Delete, Some(identity)) => {
                    executor.delete(&schema, identity, Confirmation::Yes).await
                }
                (_, None) => Ok(CrudOutcome::Cancelled),
            };
            let _ = tx.send(DbEvent::MutationFinished {
                kind,
                table,
                result,
            });
        });
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn controller_with(sql: &str) -> ViewController {
        let db = Database::open_in_memory().await.unwrap();
        db.execute_batch(sql).await.unwrap();
        ViewController::new(Handle::current(), db)
    }

    const USERS: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
         INSERT INTO users VALUES (1, 'Alice'), (2, 'Bob'), (3, 'Carol');
         CREATE TABLE notes (body TEXT);";

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("insert"), "Insert");
        assert_eq!(capitalize(""), "");
    }

    #[tokio::test]
    async fn test_first_table_selected_on_startup() {
        let mut ctl = controller_with(USERS).await;
        ctl.load_tables();
        assert!(ctl.process_next_event().await);
        assert_eq!(ctl.tables(), &["notes".to_string(), "users".to_string()]);
        assert_eq!(ctl.view_state(), ViewState::Loading);
        assert!(ctl.process_next_event().await);
        assert_eq!(ctl.current_table(), Some("notes"));
        assert_eq!(ctl.view_state(), ViewState::TableLoaded);
    }

    #[tokio::test]
    async fn test_switch_resets_filters_and_sort() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;
        assert_eq!(ctl.row_count(), 3);
        assert_eq!(ctl.filter_inputs().len(), 2);

        ctl.set_filter_text(1, "ali".into());
        ctl.toggle_sort(1);
        assert_eq!(ctl.proxy().visible_len(), 1);

        ctl.select_table("notes");
        ctl.process_next_event().await;
        assert_eq!(ctl.current_table(), Some("notes"));
        assert!(ctl.proxy().filters().is_empty());
        assert!(ctl.proxy().sort_keys().is_empty());
        assert_eq!(ctl.filter_inputs(), &[String::new()]);
    }

    #[tokio::test]
    async fn test_stale_table_result_is_dropped() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.select_table("notes");
        ctl.process_next_event().await;
        ctl.process_next_event().await;
        assert_eq!(ctl.current_table(), Some("notes"));
        assert_eq!(ctl.stale_dropped(), 1);
    }

    #[tokio::test]
    async fn test_unknown_table_keeps_previous_view() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;

        ctl.select_table("ghost");
        ctl.process_next_event().await;
        assert_eq!(ctl.current_table(), Some("users"));
        assert_eq!(ctl.requested_table(), Some("users"));
        assert_eq!(ctl.view_state(), ViewState::TableLoaded);
        assert_eq!(ctl.proxy().source_len(), 3);
        assert!(ctl.last_error.as_deref().unwrap_or_default().contains("ghost"));
    }

    #[tokio::test]
    async fn test_empty_key_stays_in_form() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;

        assert!(ctl.open_insert_form());
        let response = ctl.handle_form_action(RowFormAction::Insert {
            values: vec![String::new(), "Dave".into()],
        });
        assert_eq!(response, FormResponse::None);
        assert!(!ctl.mutation_in_flight());
        assert_eq!(ctl.form().and_then(|f| f.message()), Some("id has no data"));
    }

    #[tokio::test]
    async fn test_second_mutation_is_rejected_while_busy() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;

        ctl.open_insert_form();
        ctl.handle_form_action(RowFormAction::Insert {
            values: vec!["4".into(), "Dave".into()],
        });
        assert!(ctl.mutation_in_flight());
        ctl.handle_form_action(RowFormAction::Insert {
            values: vec!["5".into(), "Eve".into()],
        });
        assert_eq!(
            ctl.last_status.as_deref(),
            Some("another change is still being applied")
        );

        // Mutation result, then the re-fetch it triggers.
        ctl.process_next_event().await;
        assert!(!ctl.mutation_in_flight());
        assert!(ctl.form().is_none());
        ctl.process_next_event().await;
        assert_eq!(ctl.row_count(), 4);
    }

    #[tokio::test]
    async fn test_refetch_after_mutation_keeps_filters() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;
        ctl.set_filter_text(1, "^[a-c]".into());
        ctl.toggle_sort(1);
        ctl.toggle_sort(1);
        assert_eq!(ctl.proxy().visible_len(), 3);

        ctl.open_edit_form(0);
        ctl.handle_form_action(RowFormAction::Update {
            values: vec!["3".into(), "Zed".into()],
            identity: "3".into(),
        });
        ctl.process_next_event().await;
        ctl.process_next_event().await;

        assert_eq!(ctl.filter_inputs()[1], "^[a-c]");
        assert_eq!(ctl.proxy().visible_len(), 2);
        assert_eq!(ctl.proxy().sort_keys().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;

        ctl.open_edit_form(1);
        let response = ctl.handle_form_action(RowFormAction::Delete {
            identity: "2".into(),
        });
        assert_eq!(
            response,
            FormResponse::ConfirmDelete {
                identity: "2".into()
            }
        );

        ctl.resolve_delete(Confirmation::Cancel);
        assert!(!ctl.mutation_in_flight());
        assert!(ctl.form().is_some());
        assert_eq!(ctl.pending_delete(), None);

        ctl.handle_form_action(RowFormAction::Delete {
            identity: "2".into(),
        });
        ctl.resolve_delete(Confirmation::Yes);
        ctl.process_next_event().await;
        ctl.process_next_event().await;
        assert_eq!(ctl.row_count(), 2);
        assert!(ctl.proxy().source_rows().iter().all(|r| r[0] != "2"));
    }

    #[tokio::test]
    async fn test_refresh_during_switch_keeps_the_new_table() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;

        ctl.select_table("notes");
        ctl.refresh();
        assert_eq!(ctl.requested_table(), Some("notes"));

        // The first notes load is superseded by the refresh's reload.
        ctl.process_next_event().await;
        ctl.process_next_event().await;
        assert_eq!(ctl.current_table(), Some("notes"));
        assert_eq!(ctl.view_state(), ViewState::TableLoaded);
        assert_eq!(ctl.stale_dropped(), 1);
    }

    #[tokio::test]
    async fn test_mutation_finishing_after_switch_does_not_refetch_old_table() {
        let mut ctl = controller_with(USERS).await;
        ctl.select_table("users");
        ctl.process_next_event().await;

        ctl.open_insert_form();
        ctl.handle_form_action(RowFormAction::Insert {
            values: vec!["9".into(), "Zed".into()],
        });
        ctl.handle_form_action(RowFormAction::Close);
        ctl.select_table("notes");

        // Mutation result and the notes load, in either order.
        ctl.process_next_event().await;
        ctl.process_next_event().await;
        assert_eq!(ctl.current_table(), Some("notes"));
        assert_eq!(ctl.requested_table(), Some("notes"));
        assert_eq!(ctl.view_state(), ViewState::TableLoaded);
        assert_eq!(ctl.stale_dropped(), 0);
        assert!(!ctl.mutation_in_flight());
        assert_eq!(ctl.database().row_count("users").await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_edit_leaves_untouched_blob_and_null_cells_alone() {
        let mut ctl = controller_with(
            "CREATE TABLE files (id INTEGER PRIMARY KEY, data BLOB, note TEXT);
             INSERT INTO files VALUES (1, x'010203', NULL);
             CREATE VIEW file_types AS
                 SELECT typeof(data) AS data_type, hex(data) AS data_hex,
                        typeof(note) AS note_type, note FROM files;",
        )
        .await;
        ctl.select_table("files");
        ctl.process_next_event().await;
        assert_eq!(ctl.proxy().row(0).unwrap()[1], "<3 bytes>");

        // Save without changing anything.
        ctl.open_edit_form(0);
        let values = ctl.form().unwrap().values().to_vec();
        ctl.handle_form_action(RowFormAction::Update {
            values,
            identity: "1".into(),
        });
        ctl.process_next_event().await;
        ctl.process_next_event().await;
        let rows = ctl.database().fetch_rows("file_types").await.unwrap();
        assert_eq!(rows, vec![vec!["blob", "010203", "null", ""]]);

        // Only the edited cell is written.
        ctl.open_edit_form(0);
        let mut values = ctl.form().unwrap().values().to_vec();
        values[2] = "hi".into();
        ctl.handle_form_action(RowFormAction::Update {
            values,
            identity: "1".into(),
        });
        ctl.process_next_event().await;
        ctl.process_next_event().await;
        let rows = ctl.database().fetch_rows("file_types").await.unwrap();
        assert_eq!(rows, vec![vec!["blob", "010203", "text", "hi"]]);
    }
}
