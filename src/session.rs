//! Async session: form state, preview and export behind one event loop
//!
//! A [`Session`] is a cheap, clonable handle to a single tokio task that owns
//! the [`FormStore`], the [`CertificateForm`], the [`Preview`] and the
//! [`ExportController`]. Commands are processed strictly in order. Exports run
//! as separate tasks and report back into the loop, so the loop keeps
//! answering (and rejecting overlapping exports) while one is running.

use std::sync::Arc;

use log::{debug, error};
use tokio::sync::{mpsc, oneshot, watch};

use crate::export::timer::Scheduled;
use crate::export::{banner_for, ExportController, ExportOutcome, ExportState, ExportStrategy};
use crate::form::{CertificateForm, Control, FormStatus};
use crate::preview::{Preview, Rendered};
use crate::state::FormStore;
use crate::{new_exporter, CertificateRecord, Error, Field, GeneratorConfig, Result};

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Record(Reply<CertificateRecord>),
    Edit(Field, String, Reply<CertificateRecord>),
    Replace(CertificateRecord, Reply<CertificateRecord>),
    FillSample(Reply<CertificateRecord>),
    Clear(Reply<CertificateRecord>),
    Render(Reply<Rendered>),
    Controls(Reply<Vec<Control>>),
    Status(Reply<FormStatus>),
    Export(Reply<Result<ExportOutcome>>),
    ExportState(Reply<ExportState>),
    Close(Reply<()>),
}

/// Messages from tasks the loop spawned itself
enum Internal {
    ExportFinished {
        generation: u64,
        result: Result<ExportOutcome>,
        resp: Reply<Result<ExportOutcome>>,
    },
    ExpireError(u64),
}

/// Handle to a running certificate session
#[derive(Clone)]
pub struct Session {
    cmd_tx: mpsc::UnboundedSender<Command>,
    record_rx: watch::Receiver<CertificateRecord>,
    state_rx: watch::Receiver<ExportState>,
}

impl Session {
    /// Start a session with the exporter selected by `config.strategy`.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let exporter = new_exporter(&config)?;
        Ok(Self::with_exporter(config, exporter))
    }

    /// Start a session with an explicit export strategy.
    pub fn with_exporter(config: GeneratorConfig, exporter: Arc<dyn ExportStrategy>) -> Self {
        let form = CertificateForm::new(config.policy.clone(), config.today());
        let store = FormStore::new(form.normalize(&CertificateRecord::default()));
        let record_rx = store.subscribe();
        let (state_tx, state_rx) = watch::channel(ExportState::Idle);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            store,
            form,
            preview: Preview::new(config.preview.clone()),
            controller: ExportController::new(std::time::Duration::from_millis(
                config.error_reset_delay_ms,
            )),
            exporter,
            state_tx,
        };
        tokio::spawn(worker.run(cmd_rx));

        Self { cmd_tx, record_rx, state_rx }
    }

    async fn request<T>(&self, what: &str, make: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .map_err(|_| Error::SessionClosed(format!("{} sent to a closed session", what)))?;
        rx.await
            .map_err(|e| Error::SessionClosed(format!("{} canceled: {}", what, e)))
    }

    /// The current record
    pub async fn record(&self) -> Result<CertificateRecord> {
        self.request("Record", Command::Record).await
    }

    /// Apply one control edit and return the resulting record
    pub async fn edit(&self, field: Field, value: &str) -> Result<CertificateRecord> {
        let value = value.to_string();
        self.request("Edit", |tx| Command::Edit(field, value, tx)).await
    }

    /// Replace the whole record; locked fields keep their forced values
    pub async fn replace(&self, record: CertificateRecord) -> Result<CertificateRecord> {
        self.request("Replace", |tx| Command::Replace(record, tx)).await
    }

    /// Load the sample record dated today
    pub async fn fill_sample(&self) -> Result<CertificateRecord> {
        self.request("FillSample", Command::FillSample).await
    }

    /// Reset every unlocked field to empty
    pub async fn clear(&self) -> Result<CertificateRecord> {
        self.request("Clear", Command::Clear).await
    }

    /// Render the preview for the current record and export state
    pub async fn render(&self) -> Result<Rendered> {
        self.request("Render", Command::Render).await
    }

    pub async fn controls(&self) -> Result<Vec<Control>> {
        self.request("Controls", Command::Controls).await
    }

    pub async fn status(&self) -> Result<FormStatus> {
        self.request("Status", Command::Status).await
    }

    /// Export the current record.
    ///
    /// Resolves once the export finished. Rejected immediately when the
    /// record is incomplete or another export is running.
    pub async fn export(&self) -> Result<ExportOutcome> {
        self.request("Export", Command::Export).await?
    }

    pub async fn export_state(&self) -> Result<ExportState> {
        self.request("ExportState", Command::ExportState).await
    }

    /// Receive every record change (live preview)
    pub fn subscribe(&self) -> watch::Receiver<CertificateRecord> {
        self.record_rx.clone()
    }

    /// Receive every export state change
    pub fn subscribe_export(&self) -> watch::Receiver<ExportState> {
        self.state_rx.clone()
    }

    /// Stop the event loop. Other handles get `SessionClosed` afterwards.
    pub async fn close(self) -> Result<()> {
        self.request("Close", Command::Close).await
    }
}

struct Worker {
    store: FormStore,
    form: CertificateForm,
    preview: Preview,
    controller: ExportController,
    exporter: Arc<dyn ExportStrategy>,
    state_tx: watch::Sender<ExportState>,
}

impl Worker {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<Internal>();
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => match cmd {
                    Some(Command::Close(resp)) => {
                        let _ = resp.send(());
                        break;
                    }
                    Some(cmd) => self.handle(cmd, &internal_tx),
                    None => break,
                },
                Some(msg) = internal_rx.recv() => self.handle_internal(msg, &internal_tx),
            }
        }
        debug!("session loop stopped");
    }

    fn publish_state(&self) {
        self.state_tx.send_replace(self.controller.state().clone());
    }

    fn handle(&mut self, cmd: Command, internal_tx: &mpsc::UnboundedSender<Internal>) {
        match cmd {
            Command::Record(resp) => {
                let _ = resp.send(self.store.get());
            }
            Command::Edit(field, value, resp) => {
                let next = self.form.edit(&self.store.get(), field, &value);
                self.store.set(next.clone());
                let _ = resp.send(next);
            }
            Command::Replace(record, resp) => {
                let next = self.form.normalize(&record);
                self.store.set(next.clone());
                let _ = resp.send(next);
            }
            Command::FillSample(resp) => {
                let next = self.form.normalize(&CertificateRecord::sample(self.form.today()));
                self.store.set(next.clone());
                let _ = resp.send(next);
            }
            Command::Clear(resp) => {
                let next = self.form.normalize(&CertificateRecord::default());
                self.store.set(next.clone());
                let _ = resp.send(next);
            }
            Command::Render(resp) => {
                let record = self.store.get();
                let _ = resp.send(self.preview.render(&record, self.controller.state()));
            }
            Command::Controls(resp) => {
                let _ = resp.send(self.form.controls(&self.store.get()));
            }
            Command::Status(resp) => {
                let _ = resp.send(self.form.status(&self.store.get()));
            }
            Command::ExportState(resp) => {
                let _ = resp.send(self.controller.state().clone());
            }
            Command::Export(resp) => self.start_export(resp, internal_tx),
            // handled by the loop
            Command::Close(resp) => {
                let _ = resp.send(());
            }
        }
    }

    fn start_export(
        &mut self,
        resp: Reply<Result<ExportOutcome>>,
        internal_tx: &mpsc::UnboundedSender<Internal>,
    ) {
        let record = self.form.normalize(&self.store.get());
        let generation = match self.controller.begin(record.missing_fields()) {
            Ok(generation) => generation,
            Err(e) => {
                let _ = resp.send(Err(e));
                return;
            }
        };
        self.publish_state();

        let target = self.preview.target(&record);
        let exporter = self.exporter.clone();
        let done = internal_tx.clone();
        tokio::spawn(async move {
            let result = exporter.export(&target).await;
            let _ = done.send(Internal::ExportFinished { generation, result, resp });
        });
    }

    fn handle_internal(&mut self, msg: Internal, internal_tx: &mpsc::UnboundedSender<Internal>) {
        match msg {
            Internal::ExportFinished { generation, result, resp } => {
                let outcome = match &result {
                    Ok(_) => Ok(()),
                    Err(e) => {
                        error!("export #{} failed: {}", generation, e);
                        Err(banner_for(e))
                    }
                };
                if self.controller.finish(generation, outcome) {
                    let expire = internal_tx.clone();
                    let scheduled = Scheduled::after(self.controller.reset_delay(), move || {
                        let _ = expire.send(Internal::ExpireError(generation));
                    });
                    self.controller.arm_reset(scheduled);
                }
                self.publish_state();
                let _ = resp.send(result);
            }
            Internal::ExpireError(generation) => {
                self.controller.expire(generation);
                self.publish_state();
            }
        }
    }
}
