//! Lifecycle controller of an auto-refreshing, authorized data screen
//!
//! The controller owns the screen's [`ScreenState`] and a small state
//! machine guarded by a generation counter:
//!
//! - every issued refresh captures the generation current at issue time;
//! - unmounting and retargeting bump the generation;
//! - a completion is applied only if the screen is still mounted and its
//!   generation is still current, otherwise it is dropped silently.
//!
//! `refresh()` never starts a second refresh while one is pending: callers
//! get a [`RefreshHandle`] onto the pending request instead. Remote reads are
//! tracked per identity, so a refresh for an identity whose read is still
//! running (e.g. after retargeting away and back) joins that read.
//!
//! Lock order: `transitions`, then `lifecycle`. State is published while
//! holding `transitions` only, so readers of the state channel may freely
//! call the accessors.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use std::time::Instant;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::state::ScreenState;
use super::ticker::{spawn_ticker, Tick};
use crate::application::errors::{ClassifiedError, ErrorClassifier, ErrorRecovery};
use crate::application::ports::{DataFetcher, SecurityContext};
use crate::application::projection::ViewProjection;
use crate::config::RefreshConfig;
use crate::domain::{Resource, SessionWatch};
use crate::shared::TransportError;

/// Result of one refresh attempt as seen by its callers
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// New content applied, screen is `Ready`
    Ready,
    /// Failure classified and applied, screen is `Error`
    Failed(ClassifiedError),
    /// Completed after unmount or after being superseded; nothing applied
    Discarded,
    /// The screen was not mounted, no fetch was issued
    Skipped,
}

impl RefreshOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Failed(err) => err.kind.as_str(),
            Self::Discarded => "discarded",
            Self::Skipped => "skipped",
        }
    }
}

/// Pending refresh; every clone resolves to the same outcome.
pub type RefreshHandle = Shared<BoxFuture<'static, RefreshOutcome>>;

type SharedFetch<R> = Shared<BoxFuture<'static, Result<R, TransportError>>>;

/// Collaborators shared by every screen of the app
#[derive(Clone)]
pub struct ScreenContext {
    pub security: Arc<dyn SecurityContext>,
    pub session: SessionWatch,
    pub recovery: ErrorRecovery,
    pub refresh: RefreshConfig,
}

struct InFlight {
    generation: u64,
    handle: RefreshHandle,
}

/// A remote read still running, possibly for a superseded generation
struct PendingFetch<R> {
    seq: u64,
    fetch: SharedFetch<R>,
}

struct Lifecycle<R: Resource> {
    mounted: bool,
    focused: bool,
    foreground: bool,
    generation: u64,
    target: R::Id,
    in_flight: Option<InFlight>,
    fetches: HashMap<R::Id, PendingFetch<R>>,
    fetch_seq: u64,
    /// Cleared by failures that must not be retried automatically
    auto_refresh: bool,
    ticker: Option<JoinHandle<()>>,
}

impl<R: Resource> Lifecycle<R> {
    fn visible(&self) -> bool {
        self.focused && self.foreground
    }
}

struct Inner<R: Resource, P: ViewProjection<R>> {
    id: Uuid,
    name: &'static str,
    fetcher: Arc<dyn DataFetcher<R>>,
    projector: P,
    classifier: ErrorClassifier,
    context: ScreenContext,
    /// Serializes state transitions and their publication
    transitions: Mutex<()>,
    lifecycle: Mutex<Lifecycle<R>>,
    state: watch::Sender<ScreenState<R, P::View>>,
    visible: watch::Sender<bool>,
}

/// Drives one screen instance: mount, periodic refresh, unmount.
///
/// Must be used from within a tokio runtime. Do not hold a borrow of the
/// state channel across calls that change the screen.
pub struct ScreenController<R: Resource, P: ViewProjection<R>> {
    inner: Arc<Inner<R, P>>,
}

impl<R: Resource, P: ViewProjection<R>> Clone for ScreenController<R, P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: Resource, P: ViewProjection<R>> ScreenController<R, P> {
    pub fn new(
        name: &'static str,
        target: R::Id,
        fetcher: Arc<dyn DataFetcher<R>>,
        projector: P,
        classifier: ErrorClassifier,
        context: ScreenContext,
    ) -> Self {
        let (state, _) = watch::channel(ScreenState::new());
        let (visible, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                id: Uuid::new_v4(),
                name,
                fetcher,
                projector,
                classifier,
                context,
                transitions: Mutex::new(()),
                lifecycle: Mutex::new(Lifecycle {
                    mounted: false,
                    focused: true,
                    foreground: true,
                    generation: 0,
                    target,
                    in_flight: None,
                    fetches: HashMap::new(),
                    fetch_seq: 0,
                    auto_refresh: true,
                    ticker: None,
                }),
                state,
                visible,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    pub fn target(&self) -> R::Id {
        self.inner.lifecycle.lock().target.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.lifecycle.lock().mounted
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lifecycle.lock().visible()
    }

    /// Whether periodic refresh would currently issue fetches
    pub fn is_auto_refreshing(&self) -> bool {
        let lc = self.inner.lifecycle.lock();
        lc.mounted && lc.visible() && lc.auto_refresh
    }

    /// Current state snapshot
    pub fn state(&self) -> ScreenState<R, P::View> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScreenState<R, P::View>> {
        self.inner.state.subscribe()
    }

    /// Mark the screen live, load it and start periodic refresh.
    pub fn on_mount(&self) -> RefreshHandle {
        let _transition = self.inner.transitions.lock();
        {
            let mut lc = self.inner.lifecycle.lock();
            if lc.mounted {
                warn!(screen = self.inner.name, instance = %self.inner.id, "Screen already mounted");
                drop(lc);
                return Inner::refresh_locked(&self.inner);
            }
            lc.mounted = true;
            lc.auto_refresh = true;
            lc.generation += 1;
            self.inner.visible.send_replace(lc.visible());

            let target: Weak<dyn Tick> = Arc::downgrade(&self.inner) as Weak<dyn Tick>;
            lc.ticker = Some(spawn_ticker(
                target,
                self.inner.visible.subscribe(),
                self.inner.context.refresh.interval(),
            ));
            info!(
                screen = self.inner.name,
                instance = %self.inner.id,
                target = %lc.target,
                "Screen mounted"
            );
        }
        self.inner.state.send_replace(ScreenState::new());
        Inner::refresh_locked(&self.inner)
    }

    /// Mark the screen dead. Pending completions are discarded.
    pub fn on_unmount(&self) {
        let _transition = self.inner.transitions.lock();
        let mut lc = self.inner.lifecycle.lock();
        if !lc.mounted {
            return;
        }
        lc.mounted = false;
        lc.generation += 1;
        lc.in_flight = None;
        if let Some(ticker) = lc.ticker.take() {
            ticker.abort();
        }
        self.inner.visible.send_replace(false);
        info!(screen = self.inner.name, instance = %self.inner.id, "Screen unmounted");
    }

    /// Screen regained focus: resume auto-refresh and revalidate now.
    pub fn on_focus(&self) -> Option<RefreshHandle> {
        self.set_visibility(|lc| lc.focused = true)
    }

    /// Screen lost focus: suspend auto-refresh.
    pub fn on_blur(&self) {
        self.set_visibility(|lc| lc.focused = false);
    }

    /// App moved to the foreground or background.
    pub fn set_app_foreground(&self, foreground: bool) -> Option<RefreshHandle> {
        self.set_visibility(|lc| lc.foreground = foreground)
    }

    fn set_visibility(&self, update: impl FnOnce(&mut Lifecycle<R>)) -> Option<RefreshHandle> {
        let _transition = self.inner.transitions.lock();
        let resume = {
            let mut lc = self.inner.lifecycle.lock();
            let was_visible = lc.visible();
            update(&mut lc);
            let visible = lc.visible();
            if visible == was_visible {
                return None;
            }
            self.inner.visible.send_replace(visible && lc.mounted);
            debug!(screen = self.inner.name, instance = %self.inner.id, visible, "Visibility changed");
            visible && lc.mounted && lc.auto_refresh
        };
        resume.then(|| Inner::refresh_locked(&self.inner))
    }

    /// Fetch the resource again, or join the refresh already in flight.
    pub fn refresh(&self) -> RefreshHandle {
        Inner::refresh(&self.inner)
    }

    /// Point the screen at another resource. The pending refresh for the
    /// previous identity is superseded and the old content cleared.
    pub fn retarget(&self, target: R::Id) -> RefreshHandle {
        let _transition = self.inner.transitions.lock();
        let mounted = {
            let mut lc = self.inner.lifecycle.lock();
            if lc.target != target {
                info!(
                    screen = self.inner.name,
                    instance = %self.inner.id,
                    from = %lc.target,
                    to = %target,
                    "Screen retargeted"
                );
                lc.target = target;
                lc.generation += 1;
                lc.in_flight = None;
                lc.auto_refresh = true;
                lc.mounted
            } else {
                false
            }
        };
        if mounted {
            self.inner.state.send_replace(ScreenState::new());
        }
        Inner::refresh_locked(&self.inner)
    }
}

impl<R: Resource, P: ViewProjection<R>> Inner<R, P> {
    fn refresh(this: &Arc<Self>) -> RefreshHandle {
        let _transition = this.transitions.lock();
        Self::refresh_locked(this)
    }

    /// Caller holds `transitions`.
    fn refresh_locked(this: &Arc<Self>) -> RefreshHandle {
        let (generation, handle) = {
            let mut lc = this.lifecycle.lock();
            if !lc.mounted {
                debug!(screen = this.name, instance = %this.id, "Refresh ignored, screen not mounted");
                return futures_util::future::ready(RefreshOutcome::Skipped)
                    .boxed()
                    .shared();
            }
            if let Some(in_flight) = &lc.in_flight {
                debug!(
                    screen = this.name,
                    instance = %this.id,
                    generation = in_flight.generation,
                    "Joining in-flight refresh"
                );
                return in_flight.handle.clone();
            }

            lc.generation += 1;
            let generation = lc.generation;
            let fetch = this.fetch_for(&mut lc);

            let inner = Arc::clone(this);
            let task = tokio::spawn(async move {
                let settle = AssertUnwindSafe(Arc::clone(&inner).settle(generation, fetch));
                match settle.catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        error!(screen = inner.name, instance = %inner.id, generation, "Refresh panicked");
                        let outcome =
                            inner.fail(generation, &TransportError::no_response("refresh panicked"));
                        inner.record(&outcome);
                        outcome
                    }
                }
            });
            let handle = async move { task.await.unwrap_or(RefreshOutcome::Discarded) }
                .boxed()
                .shared();
            lc.in_flight = Some(InFlight {
                generation,
                handle: handle.clone(),
            });
            (generation, handle)
        };
        debug!(screen = this.name, instance = %this.id, generation, "Refresh issued");
        this.state.send_modify(|state| state.begin_loading());
        handle
    }

    /// Remote read for the current target, joining one still running.
    fn fetch_for(self: &Arc<Self>, lc: &mut Lifecycle<R>) -> SharedFetch<R> {
        let target = lc.target.clone();
        if let Some(pending) = lc.fetches.get(&target) {
            debug!(screen = self.name, instance = %self.id, %target, "Joining running fetch");
            return pending.fetch.clone();
        }

        lc.fetch_seq += 1;
        let seq = lc.fetch_seq;
        let fetcher = Arc::clone(&self.fetcher);
        let limit = self.context.refresh.fetch_timeout();
        let name = self.name;
        let id = target.clone();
        let task = tokio::spawn(async move {
            let started = Instant::now();
            debug!(screen = name, %id, "Fetching");
            let fetch = fetcher.fetch(&id);
            let result = match limit {
                Some(limit) => tokio::time::timeout(limit, fetch)
                    .await
                    .unwrap_or(Err(TransportError::Timeout(limit))),
                None => fetch.await,
            };
            metrics::histogram!("screen_fetch_duration_seconds", "screen" => name)
                .record(started.elapsed().as_secs_f64());
            result
        });

        let owner = Arc::downgrade(self);
        let id = target.clone();
        let fetch = async move {
            let result = match task.await {
                Ok(result) => result,
                Err(err) => {
                    error!(screen = name, %id, error = %err, "Fetch task failed");
                    Err(TransportError::no_response(format!("fetch task failed: {}", err)))
                }
            };
            if let Some(owner) = owner.upgrade() {
                owner.fetch_finished(&id, seq);
            }
            result
        }
        .boxed()
        .shared();

        lc.fetches.insert(
            target,
            PendingFetch {
                seq,
                fetch: fetch.clone(),
            },
        );
        fetch
    }

    fn fetch_finished(&self, id: &R::Id, seq: u64) {
        let mut lc = self.lifecycle.lock();
        if lc.fetches.get(id).is_some_and(|pending| pending.seq == seq) {
            lc.fetches.remove(id);
        }
    }

    async fn settle(self: Arc<Self>, generation: u64, fetch: SharedFetch<R>) -> RefreshOutcome {
        let outcome = match fetch.await {
            Ok(resource) => {
                debug!(screen = self.name, generation, id = %resource.id(), "Fetched");
                let session = self.context.session.borrow().clone();
                let capabilities = self
                    .context
                    .security
                    .resolve(session.as_deref(), resource.scope_id())
                    .await;
                let view = self.projector.project(&resource, &capabilities);
                if self.complete(generation, true, |state| {
                    state.apply_success(generation, resource, view)
                }) {
                    RefreshOutcome::Ready
                } else {
                    RefreshOutcome::Discarded
                }
            }
            Err(error) => self.fail(generation, &error),
        };
        self.record(&outcome);
        outcome
    }

    /// Classify and apply a failure; side effects only when applied.
    fn fail(&self, generation: u64, error: &TransportError) -> RefreshOutcome {
        let classified = self.classifier.classify(error);
        let applied = self.complete(generation, classified.recoverable, |state| {
            state.apply_failure(generation, classified.clone())
        });
        if !applied {
            return RefreshOutcome::Discarded;
        }
        warn!(
            screen = self.name,
            instance = %self.id,
            generation,
            error = %error,
            kind = %classified.kind,
            "Refresh failed"
        );
        self.context.recovery.apply(&classified);
        RefreshOutcome::Failed(classified)
    }

    fn record(&self, outcome: &RefreshOutcome) {
        metrics::counter!("screen_fetch_total", "screen" => self.name, "outcome" => outcome.label())
            .increment(1);
    }

    /// Apply a completion if it is still the live, current request.
    fn complete(
        &self,
        generation: u64,
        keep_auto_refresh: bool,
        apply: impl FnOnce(&mut ScreenState<R, P::View>),
    ) -> bool {
        let _transition = self.transitions.lock();
        {
            let mut lc = self.lifecycle.lock();
            if lc
                .in_flight
                .as_ref()
                .is_some_and(|f| f.generation == generation)
            {
                lc.in_flight = None;
            }
            if !lc.mounted || lc.generation != generation {
                debug!(
                    screen = self.name,
                    instance = %self.id,
                    generation,
                    current = lc.generation,
                    mounted = lc.mounted,
                    "Discarding stale completion"
                );
                return false;
            }
            lc.auto_refresh = keep_auto_refresh;
        }
        self.state.send_modify(apply);
        true
    }
}

impl<R: Resource, P: ViewProjection<R>> Tick for Inner<R, P> {
    fn on_tick(self: Arc<Self>) {
        let due = {
            let lc = self.lifecycle.lock();
            lc.mounted && lc.visible() && lc.auto_refresh
        };
        if due {
            drop(Inner::refresh(&self));
        }
    }
}
