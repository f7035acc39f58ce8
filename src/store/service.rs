//! The `Store` service: the single owner of the persisted host document.
//!
//! Every read-modify-write goes through [`Store::update`], which serialises
//! writers inside this process and checks a content fingerprint before
//! saving, so a write from another process between load and save is detected
//! as [`StoreError::Stale`] rather than silently overwritten.

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::logging::LogContext;
use crate::model::{Document, Environment, HostFields, HostRecord, PendingSelection, Settings};
use crate::probe::{check_host, HostProber, SweepObserver, SweepRun, SweepSummary};
use crate::storage::{
    StorageBackend, StorageError, DOCUMENT_KEY, PENDING_SELECTION_KEY, SETTINGS_KEY,
};
use crate::validation::validate_selection;
use crate::{log_info, log_warn};

use super::error::StoreError;
use super::ops;
use super::transfer::{export_document, import_document, Fingerprint};

/// A loaded document and the fingerprint of the blob it came from.
/// `fingerprint` is `None` when nothing was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked {
    pub document: Document,
    pub fingerprint: Option<Fingerprint>,
}

pub struct Store<B> {
    backend: B,
    last_good: RwLock<Option<Document>>,
    writer: Mutex<()>,
}

impl<B: StorageBackend> Store<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            last_good: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn fallback_document(&self) -> Document {
        self.last_good.read().clone().unwrap_or_default()
    }

    fn remember(&self, doc: &Document) {
        *self.last_good.write() = Some(doc.clone());
    }

    /// Read the persisted document. An unreadable blob degrades to the last
    /// good document but keeps its fingerprint, so the next save replaces it.
    async fn read_document(&self) -> Result<Tracked, StorageError> {
        let Some(raw) = self.backend.get(DOCUMENT_KEY).await? else {
            return Ok(Tracked {
                document: Document::default(),
                fingerprint: None,
            });
        };

        let fingerprint = Some(Fingerprint::of(&raw));
        let document = match serde_json::from_str::<Document>(&raw) {
            Ok(mut doc) => {
                doc.normalize();
                self.remember(&doc);
                doc
            }
            Err(e) => {
                log::warn!("STORE_DOCUMENT_CORRUPT error={} fallback=last_good", e);
                self.fallback_document()
            }
        };
        Ok(Tracked {
            document,
            fingerprint,
        })
    }

    /// Load with a fingerprint for a later [`Store::save_tracked`]. Storage
    /// failures are logged and yield the last good (or default) document.
    pub async fn load_tracked(&self) -> Tracked {
        match self.read_document().await {
            Ok(tracked) => tracked,
            Err(e) => {
                log::warn!("STORE_LOAD_FAILED error={} fallback=last_good", e);
                Tracked {
                    document: self.fallback_document(),
                    fingerprint: None,
                }
            }
        }
    }

    pub async fn load(&self) -> Document {
        self.load_tracked().await.document
    }

    async fn write(&self, doc: &Document) -> Result<Fingerprint, StoreError> {
        let raw = serde_json::to_string(doc)?;
        self.backend.set(DOCUMENT_KEY, &raw).await.map_err(|e| {
            log::error!("STORE_SAVE_FAILED error={}", e);
            e
        })?;
        self.remember(doc);
        Ok(Fingerprint::of(&raw))
    }

    async fn write_checked(
        &self,
        doc: &Document,
        expected: Option<&Fingerprint>,
    ) -> Result<Fingerprint, StoreError> {
        let current = self
            .backend
            .get(DOCUMENT_KEY)
            .await?
            .map(|raw| Fingerprint::of(&raw));
        if current.as_ref() != expected {
            log::warn!(
                "STORE_STALE_WRITE expected={} found={}",
                expected.map(|f| f.to_string()).unwrap_or_else(|| "none".into()),
                current.map(|f| f.to_string()).unwrap_or_else(|| "none".into())
            );
            return Err(StoreError::Stale);
        }
        self.write(doc).await
    }

    /// Unconditional replace. Last write wins.
    pub async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;
        self.write(doc).await.map(|_| ())
    }

    /// Replace only if the persisted blob still matches `expected`.
    pub async fn save_tracked(
        &self,
        doc: &Document,
        expected: Option<&Fingerprint>,
    ) -> Result<Fingerprint, StoreError> {
        let _guard = self.writer.lock().await;
        self.write_checked(doc, expected).await
    }

    /// Load a fresh document, apply `f` and save it. Nothing is written when
    /// `f` fails.
    pub async fn update<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Document) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let _guard = self.writer.lock().await;
        let Tracked {
            mut document,
            fingerprint,
        } = self.read_document().await?;
        let value = f(&mut document)?;
        self.write_checked(&document, fingerprint.as_ref()).await?;
        Ok(value)
    }

    pub async fn add_host(
        &self,
        environment_id: &str,
        fields: HostFields,
    ) -> Result<HostRecord, StoreError> {
        self.update(|doc| ops::add_host(doc, environment_id, fields))
            .await
    }

    pub async fn move_or_update_host(
        &self,
        host_id: &str,
        fields: HostFields,
    ) -> Result<HostRecord, StoreError> {
        self.update(|doc| ops::move_or_update_host(doc, host_id, fields))
            .await
    }

    pub async fn delete_host(&self, host_id: &str) -> Result<HostRecord, StoreError> {
        self.update(|doc| ops::delete_host(doc, host_id)).await
    }

    pub async fn add_environment(&self, name: &str) -> Result<Environment, StoreError> {
        self.update(|doc| ops::add_environment(doc, name)).await
    }

    /// Replace the whole document with an import file. The persisted
    /// document is untouched when the file is rejected.
    pub async fn import_json(&self, text: &str) -> Result<Document, StoreError> {
        let doc = import_document(text).map_err(|e| {
            log::warn!("IMPORT_REJECTED error={}", e);
            e
        })?;
        self.save(&doc).await?;
        log::info!(
            "IMPORT_COMPLETE environments={} hosts={}",
            doc.envs.len(),
            doc.host_count()
        );
        Ok(doc)
    }

    pub async fn export_json(&self) -> Result<String, StoreError> {
        Ok(export_document(&self.load().await)?)
    }

    /// Remove the persisted document; the next load yields the default.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.writer.lock().await;
        self.backend.remove(DOCUMENT_KEY).await?;
        *self.last_good.write() = None;
        log::info!("STORE_CLEARED");
        Ok(())
    }

    /// Stored settings merged over the defaults. Never fails.
    pub async fn load_settings(&self) -> Settings {
        let raw = match self.backend.get(SETTINGS_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("SETTINGS_LOAD_FAILED error={} fallback=defaults", e);
                None
            }
        };
        let settings = match raw.map(|raw| serde_json::from_str::<Settings>(&raw)) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("SETTINGS_CORRUPT error={} fallback=defaults", e);
                Settings::default()
            }
            None => Settings::default(),
        };
        settings.normalized()
    }

    pub async fn save_settings(&self, settings: Settings) -> Result<Settings, StoreError> {
        let settings = settings.normalized();
        self.backend
            .set(SETTINGS_KEY, &serde_json::to_string(&settings)?)
            .await?;
        log::info!(
            "SETTINGS_SAVED health_probe={} ssh_user={:?} rdp_user={:?}",
            settings.enable_health_probe,
            settings.default_ssh_user,
            settings.default_rdp_user
        );
        Ok(settings)
    }

    pub async fn reset_settings(&self) -> Result<Settings, StoreError> {
        self.save_settings(Settings::default()).await
    }

    /// Accept a page selection as a future host address. Only IPv4 literals
    /// pass.
    pub async fn stash_selection(
        &self,
        selection: &str,
        source_url: Option<&str>,
    ) -> Result<PendingSelection, StoreError> {
        let ip = validate_selection(selection)?;
        let pending = PendingSelection::new(ip, source_url);
        self.backend
            .set(PENDING_SELECTION_KEY, &serde_json::to_string(&pending)?)
            .await?;
        log::info!("SELECTION_STASHED ip={}", pending.ip);
        Ok(pending)
    }

    /// Consume the stashed selection, if any.
    pub async fn take_pending_selection(&self) -> Result<Option<PendingSelection>, StoreError> {
        let Some(raw) = self.backend.get(PENDING_SELECTION_KEY).await? else {
            return Ok(None);
        };
        self.backend.remove(PENDING_SELECTION_KEY).await?;
        match serde_json::from_str(&raw) {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                log::warn!("SELECTION_CORRUPT error={}", e);
                Ok(None)
            }
        }
    }

    /// Probe one host and commit its health onto the current document.
    pub async fn probe_host<P: HostProber>(
        &self,
        prober: &P,
        host_id: &str,
    ) -> Result<HostRecord, StoreError> {
        let mut host = self
            .load()
            .await
            .host(host_id)
            .cloned()
            .ok_or_else(|| StoreError::HostNotFound(host_id.to_string()))?;

        let ctx = LogContext::generate("probe").with_host(host_id);
        check_host(prober, &(), &mut host, &ctx).await;
        self.merge_health(&host).await
    }

    async fn merge_health(&self, probed: &HostRecord) -> Result<HostRecord, StoreError> {
        self.update(|doc| {
            let host = doc
                .host_mut(&probed.id)
                .ok_or_else(|| StoreError::HostNotFound(probed.id.clone()))?;
            host.copy_health_from(probed);
            Ok(host.clone())
        })
        .await
    }

    /// Probe every stored host in order. Each result is merged into a freshly
    /// loaded document as soon as it is known, so edits made while the sweep
    /// runs are kept. Per-host failures never stop the sweep.
    pub async fn sweep<P: HostProber, O: SweepObserver>(
        &self,
        prober: &P,
        observer: &O,
    ) -> SweepSummary {
        let snapshot = self.load().await;
        let mut run = SweepRun::start(prober, observer, snapshot.host_count());

        for mut host in snapshot.hosts().cloned() {
            run.check(&mut host).await;

            let host_ctx = run.context().with_host(&host.id);
            let committed = match self.merge_health(&host).await {
                Ok(committed) => committed,
                Err(StoreError::HostNotFound(_)) => {
                    log_info!(host_ctx, "SWEEP_HOST_GONE");
                    host
                }
                Err(e) => {
                    log_warn!(host_ctx, "SWEEP_COMMIT_FAILED", error = e.to_string());
                    host
                }
            };
            run.committed(&committed);
        }

        run.finish()
    }

    /// Sweep only when health probing is switched on in the settings.
    pub async fn sweep_if_enabled<P: HostProber, O: SweepObserver>(
        &self,
        prober: &P,
        observer: &O,
    ) -> Option<SweepSummary> {
        if !self.load_settings().await.enable_health_probe {
            log::info!("SWEEP_SKIPPED reason=health_probe_disabled");
            return None;
        }
        Some(self.sweep(prober, observer).await)
    }
}
