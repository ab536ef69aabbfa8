//! Page controller: owns one record type's list, query model, detail form
//! and in-flight API calls.
//!
//! Every external call is issued as a `Deferred` job. `pump` applies the
//! finished ones; after any successful mutation the list is fetched again in
//! full rather than patched locally.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{ApiError, CrudApi, ListPage};
use crate::deferred::{Deferred, Poll};
use crate::form::FormState;
use crate::models::{RecordId, PLACEHOLDER_IMAGE};
use crate::notify::{Toasts, MSG_ADDED, MSG_DELETED, MSG_INVALID_INPUT, MSG_UPDATED};
use crate::query::{QueryChange, QueryParam};
use crate::resource::Resource;
use crate::session::{Session, SessionEvent};
use crate::table::{sort_keys, TableAction, TableRecord, TableView};
use crate::upload::{upload_if_chosen, ChosenFile, UploadProgress, Uploader};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mutation {
    Create,
    Update,
}

impl Mutation {
    fn success_message(self) -> &'static str {
        match self {
            Mutation::Create => MSG_ADDED,
            Mutation::Update => MSG_UPDATED,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Mutation::Create => "add",
            Mutation::Update => "update",
        }
    }
}

/// Result of a finished background call.
enum Outcome<R: Resource> {
    Fetched(Result<ListPage<R::Record>, ApiError>),
    Saved(Mutation, Result<R::Record, ApiError>),
    Deleted(RecordId, Result<(), ApiError>),
}

impl<R: Resource> Outcome<R> {
    fn describe(&self) -> &'static str {
        match self {
            Outcome::Fetched(_) => "load",
            Outcome::Saved(mutation, _) => mutation.verb(),
            Outcome::Deleted(..) => "delete",
        }
    }
}

/// A call in flight, tagged with what it was for so a lost worker can
/// still be reported.
struct PendingCall<R: Resource> {
    what: &'static str,
    job: Deferred<Outcome<R>>,
}

pub struct PageController<R: Resource> {
    api: Arc<dyn CrudApi<R>>,
    uploader: Arc<dyn Uploader>,
    session: Arc<dyn Session>,
    records: Vec<R::Record>,
    query: QueryParam,
    total_count: u32,
    form: FormState,
    chosen_file: Option<ChosenFile>,
    uploaded_cover: String,
    selected_id: Option<RecordId>,
    editing: bool,
    detail_open: bool,
    pending: Vec<PendingCall<R>>,
    upload_progress: Option<UploadProgress>,
    toasts: Toasts,
}

impl<R: Resource> PageController<R> {
    pub fn new(
        api: Arc<dyn CrudApi<R>>,
        uploader: Arc<dyn Uploader>,
        session: Arc<dyn Session>,
    ) -> Self {
        Self {
            api,
            uploader,
            session,
            records: Vec::new(),
            query: QueryParam::new(&sort_keys(R::COLUMNS)),
            total_count: 0,
            form: FormState::new(R::FIELDS),
            chosen_file: None,
            uploaded_cover: String::new(),
            selected_id: None,
            editing: false,
            detail_open: false,
            pending: Vec::new(),
            upload_progress: None,
            toasts: Toasts::new(),
        }
    }

    /// Start from `query` instead of the defaults. Used before the first
    /// fetch, so nothing is re-queried here.
    pub fn with_query(mut self, query: QueryParam) -> Self {
        self.query = query;
        self
    }

    // --- accessors -------------------------------------------------------

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn query(&self) -> &QueryParam {
        &self.query
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn chosen_file(&self) -> Option<&ChosenFile> {
        self.chosen_file.as_ref()
    }

    /// Cover preview shown in the edit form.
    pub fn uploaded_cover(&self) -> &str {
        &self.uploaded_cover
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected_id
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail_open
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Percentage of the cover upload while a save is in flight.
    pub fn upload_percent(&self) -> Option<u8> {
        self.upload_progress.as_ref().map(UploadProgress::percent)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts {
        &mut self.toasts
    }

    /// "Add Album" / "Edit Album"
    pub fn detail_title(&self) -> String {
        let verb = if self.editing { "Edit" } else { "Add" };
        format!("{} {}", verb, R::NAME)
    }

    pub fn table(&self) -> TableView<'_, R::Record> {
        TableView::new(R::COLUMNS, &self.records, &self.query, self.total_count)
    }

    // --- session ---------------------------------------------------------

    /// Initial load, if the session allows it.
    pub fn activate(&mut self) {
        if self.session.is_signed_in() {
            self.fetch();
        }
    }

    pub fn on_session_change(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::SignedIn => self.fetch(),
            SessionEvent::SignedOut => {
                // Dropping the handles discards whatever they still return.
                if !self.pending.is_empty() {
                    tracing::debug!(
                        page = R::TITLE,
                        dropped = self.pending.len(),
                        "discarding calls on sign out"
                    );
                }
                self.pending.clear();
                self.upload_progress = None;
                self.records.clear();
                self.total_count = 0;
            }
        }
    }

    // --- list ------------------------------------------------------------

    /// Re-query the API with the current query model. Does nothing while
    /// signed out.
    pub fn fetch(&mut self) {
        if !self.session.is_signed_in() {
            tracing::debug!(page = R::TITLE, "not signed in, skipping fetch");
            return;
        }
        let api = Arc::clone(&self.api);
        let query = self.query.clone();
        self.spawn("load", move || Outcome::Fetched(api.fetch_all(&query)));
    }

    /// Apply a query change and re-fetch if anything changed.
    pub fn change_query(&mut self, change: QueryChange) {
        if self.query.apply(change) {
            self.fetch();
        }
    }

    /// Interpret an action raised by the table.
    pub fn handle(&mut self, action: TableAction) {
        match action {
            TableAction::ChangeQuery(change) => self.change_query(change),
            TableAction::Edit(id) => self.open_edit(id),
            TableAction::Delete(id) => self.delete(id),
        }
    }

    pub fn delete(&mut self, id: RecordId) {
        let api = Arc::clone(&self.api);
        self.spawn("delete", move || Outcome::Deleted(id, api.delete(id)));
    }

    // --- detail view -----------------------------------------------------

    /// Reset the form to defaults and forget any chosen file.
    pub fn clear_fields(&mut self) {
        self.form.clear();
        self.chosen_file = None;
    }

    pub fn open_add(&mut self) {
        self.clear_fields();
        self.editing = false;
        self.detail_open = true;
    }

    /// Switch to edit mode for `id`.
    ///
    /// Fields are hydrated only when `id` is in the current list; the
    /// detail view opens either way.
    pub fn open_edit(&mut self, id: RecordId) {
        self.editing = true;
        match self.records.iter().find(|r| r.id() == id) {
            Some(record) => {
                let values = R::hydrate(record);
                self.uploaded_cover = R::cover(record)
                    .filter(|c| !c.is_empty())
                    .unwrap_or(PLACEHOLDER_IMAGE)
                    .to_string();
                self.form.hydrate(values);
                self.chosen_file = None;
                self.selected_id = Some(id);
            }
            None => {
                tracing::debug!(id, "edit requested for a record not in the list");
                self.clear_fields();
                self.uploaded_cover.clear();
                self.selected_id = None;
            }
        }
        self.detail_open = true;
    }

    pub fn cancel(&mut self) {
        self.detail_open = false;
    }

    /// Choose the cover file from a path.
    pub fn choose_file(&mut self, path: impl AsRef<Path>) -> bool {
        match ChosenFile::open(path, R::COVER_KIND) {
            Ok(file) => {
                self.form.set_file_input(file.path().display().to_string());
                self.chosen_file = Some(file);
                true
            }
            Err(e) => {
                self.toasts.warn(e.to_string());
                false
            }
        }
    }

    /// Pick up a path typed into the file input, if it differs from the
    /// current choice.
    fn sync_file_input(&mut self) -> bool {
        let typed = self.form.file_input().trim().to_string();
        if typed.is_empty() {
            return true;
        }
        let unchanged = self
            .chosen_file
            .as_ref()
            .is_some_and(|f| f.path() == Path::new(&typed));
        unchanged || self.choose_file(typed)
    }

    /// Save the detail form. Returns false when rejected locally.
    pub fn confirm(&mut self) -> bool {
        if !self.sync_file_input() {
            return false;
        }
        if (!self.editing && self.chosen_file.is_none()) || !self.form.is_complete() {
            self.toasts.warn(MSG_INVALID_INPUT);
            return false;
        }

        let api = Arc::clone(&self.api);
        let uploader = Arc::clone(&self.uploader);
        let file = self.chosen_file.clone();
        let form = self.form.clone();
        let progress = UploadProgress::new();

        if self.editing {
            let Some(id) = self.selected_id else {
                self.toasts.warn(MSG_INVALID_INPUT);
                return false;
            };
            let worker_progress = progress.clone();
            self.spawn("update", move || {
                let result = upload_if_chosen(uploader.as_ref(), file.as_ref(), &worker_progress)
                    .and_then(|cover| api.update(id, &R::payload(&form, cover)));
                Outcome::Saved(Mutation::Update, result)
            });
        } else {
            let worker_progress = progress.clone();
            self.spawn("add", move || {
                let result = upload_if_chosen(uploader.as_ref(), file.as_ref(), &worker_progress)
                    .and_then(|cover| api.create(&R::payload(&form, cover)));
                Outcome::Saved(Mutation::Create, result)
            });
        }

        if self.chosen_file.is_some() {
            self.upload_progress = Some(progress);
        }
        self.detail_open = false;
        true
    }

    // --- completion ------------------------------------------------------

    fn spawn<F>(&mut self, what: &'static str, job: F)
    where
        F: FnOnce() -> Outcome<R> + Send + 'static,
    {
        tracing::debug!(page = R::TITLE, what, "dispatching call");
        self.pending.push(PendingCall {
            what,
            job: Deferred::spawn(job),
        });
    }

    /// Apply every finished call without blocking. Returns true if anything
    /// completed.
    pub fn pump(&mut self) -> bool {
        let mut finished = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for call in self.pending.drain(..) {
            match call.job.try_take() {
                Poll::Pending => still_pending.push(call),
                Poll::Ready(outcome) => finished.push(Ok(outcome)),
                Poll::Lost => finished.push(Err(call.what)),
            }
        }
        self.pending = still_pending;

        let completed = !finished.is_empty();
        for result in finished {
            match result {
                Ok(outcome) => self.complete(outcome),
                Err(what) => self.lost(what),
            }
        }
        completed
    }

    /// Drop notifications that have outlived their display time.
    pub fn expire_notifications(&mut self, now: Instant) {
        self.toasts.prune(now);
    }

    /// Block until no call is in flight, including the re-fetches that
    /// successful mutations trigger.
    pub fn settle(&mut self) {
        while !self.pending.is_empty() {
            let call = self.pending.remove(0);
            match call.job.wait() {
                Some(outcome) => self.complete(outcome),
                None => self.lost(call.what),
            }
        }
    }

    fn lost(&mut self, what: &'static str) {
        if matches!(what, "add" | "update") {
            self.upload_progress = None;
        }
        tracing::warn!(page = R::TITLE, what, "worker exited without a result");
        self.toasts
            .error(format!("Failed to {} {}: worker stopped", what, R::NAME));
    }

    fn fail(&mut self, what: &str, err: &ApiError) {
        tracing::warn!(page = R::TITLE, what, error = %err, "call failed");
        self.toasts
            .error(format!("Failed to {} {}: {}", what, R::NAME, err));
    }

    fn complete(&mut self, outcome: Outcome<R>) {
        let what = outcome.describe();
        if matches!(outcome, Outcome::Saved(..)) {
            self.upload_progress = None;
        }
        match outcome {
            Outcome::Fetched(Ok(page)) => {
                tracing::debug!(
                    page = R::TITLE,
                    rows = page.items.len(),
                    total = page.total_count,
                    "list loaded"
                );
                self.records = page.items;
                self.total_count = page.total_count;
            }
            Outcome::Saved(mutation, Ok(record)) => {
                tracing::info!(page = R::TITLE, id = record.id(), what, "saved");
                self.clear_fields();
                self.fetch();
                self.toasts.success(mutation.success_message());
            }
            Outcome::Deleted(id, Ok(())) => {
                tracing::info!(page = R::TITLE, id, "deleted");
                self.fetch();
                self.toasts.success(MSG_DELETED);
            }
            Outcome::Fetched(Err(e)) | Outcome::Saved(_, Err(e)) | Outcome::Deleted(_, Err(e)) => {
                self.fail(what, &e);
            }
        }
    }
}
