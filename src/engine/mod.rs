//! Discovery Engine: the worker pool driving Sessions against the Frontier
//! (spec §4.E).

pub mod stats;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{ConnectionConfig, FilteringConfig, ThreadingConfig};
use crate::db::Store;
use crate::frontier::Frontier;
use crate::session;
use crate::transport::{DeviceTransport, SshTransport};

pub use stats::Stats;

/// Builds a fresh transport for each device session. Production code wires
/// this to `SshTransport::new`; tests wire it to a scripted `MockTransport`
/// (spec §4.E "one transport per session").
pub type TransportFactory = Arc<dyn Fn() -> Box<dyn DeviceTransport> + Send + Sync>;

fn default_transport_factory() -> TransportFactory {
    Arc::new(|| Box::new(SshTransport::new()) as Box<dyn DeviceTransport>)
}

#[derive(Clone)]
struct WorkerContext {
    username: String,
    password: String,
    connection: ConnectionConfig,
    filtering: FilteringConfig,
    queue_timeout: Duration,
    store: Store,
    frontier: Frontier,
    stop: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    stats: Arc<Stats>,
    transport_factory: TransportFactory,
}

/// Holds configuration, credentials, the Store, the Frontier, a stop
/// signal, the stats snapshot, and the worker handles (spec §4.E).
pub struct Engine {
    context: WorkerContext,
    workers: Vec<JoinHandle<()>>,
}

impl Engine {
    pub fn new(
        username: String,
        password: String,
        connection: ConnectionConfig,
        filtering: FilteringConfig,
        threading: &ThreadingConfig,
        store: Store,
        frontier: Frontier,
    ) -> Self {
        Self {
            context: WorkerContext {
                username,
                password,
                connection,
                filtering,
                queue_timeout: Duration::from_secs(threading.queue_timeout),
                store,
                frontier,
                stop: Arc::new(AtomicBool::new(false)),
                active: Arc::new(AtomicUsize::new(0)),
                stats: Arc::new(Stats::new()),
                transport_factory: default_transport_factory(),
            },
            workers: Vec::new(),
        }
    }

    /// Replace the transport factory (tests substitute a scripted
    /// `MockTransport` here instead of the default `SshTransport`).
    pub fn with_transport_factory(mut self, factory: TransportFactory) -> Self {
        self.context.transport_factory = factory;
        self
    }

    pub fn stats(&self) -> Arc<Stats> {
        self.context.stats.clone()
    }

    /// Launch `n` workers.
    pub fn start(&mut self, n: usize) {
        for id in 0..n {
            let ctx = self.context.clone();
            self.workers.push(tokio::spawn(worker_loop(id, ctx)));
        }
        info!(workers = n, "discovery engine started");
    }

    /// Block until the Frontier is drained and no worker is processing.
    /// Honors an external interrupt by unwinding into `stop()` (spec §5
    /// "Cancellation").
    pub async fn wait_for_completion(&mut self) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(200)) => {
                    if self.context.frontier.is_empty()
                        && self.context.active.load(Ordering::SeqCst) == 0
                    {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!("interrupt received, stopping engine");
                    self.stop().await;
                    return;
                }
            }
        }
    }

    /// Set the stop signal and join all workers. Safe to call multiple times.
    pub async fn stop(&mut self) {
        self.context.stop.store(true, Ordering::SeqCst);
        for handle in self.workers.drain(..) {
            let _ = handle.await;
        }
        self.context.stats.report_if_due(self.context.frontier.len());
        info!("discovery engine stopped");
    }
}

async fn worker_loop(id: usize, ctx: WorkerContext) {
    loop {
        if ctx.stop.load(Ordering::SeqCst) {
            break;
        }

        let Some(item) = ctx.frontier.recv_timeout_async(ctx.queue_timeout).await else {
            continue;
        };

        match ctx.store.already_claimed(&item.hostname).await {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                warn!(worker = id, host = %item.hostname, error = %e, "store check failed");
                continue;
            }
        }

        ctx.active.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = ctx.store.mark_processing(&item.hostname).await {
            warn!(worker = id, host = %item.hostname, error = %e, "mark_processing failed");
        }
        ctx.stats.started_processing(&item.hostname);

        let mut transport = (ctx.transport_factory)();
        let outcome = session::run(
            transport.as_mut(),
            &item.hostname,
            &item.ip_address,
            &ctx.username,
            &ctx.password,
            &ctx.connection,
            &ctx.filtering,
        )
        .await;

        if let Some(outcome) = outcome {
            match outcome.device.to_projection() {
                Some(projection) => {
                    if let Err(e) = ctx.store.save_device(&projection).await {
                        warn!(worker = id, host = %item.hostname, error = %e, "save_device failed");
                    }
                }
                None => warn!(worker = id, host = %item.hostname, "session succeeded without a persistable device"),
            }

            for neighbor in outcome.neighbors {
                if !neighbor.is_admissible(&ctx.filtering) {
                    continue;
                }
                match ctx.store.admit_if_absent(&neighbor.hostname, &neighbor.management_ip).await {
                    Ok(true) => {
                        ctx.frontier.push(neighbor.hostname.clone(), neighbor.management_ip.clone());
                        ctx.stats.device_discovered();
                    }
                    Ok(false) => {}
                    Err(e) => warn!(worker = id, neighbor = %neighbor.hostname, error = %e, "admit_if_absent failed"),
                }
            }
        }

        if let Err(e) = ctx.store.mark_processed(&item.hostname).await {
            warn!(worker = id, host = %item.hostname, error = %e, "mark_processed failed");
        }
        ctx.stats.finished_processing(&item.hostname);
        ctx.active.fetch_sub(1, Ordering::SeqCst);
        ctx.stats.report_if_due(ctx.frontier.len());
    }
}
