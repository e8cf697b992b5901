//! DNS 传播监控
//!
//! Detached per-domain task that polls on an escalating schedule until the
//! domain resolves and answers over HTTPS, or the schedule runs out.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep};

use crate::types::{MonitorOutcome, MonitorSettings};

use super::ServiceContext;
use super::messages;

/// One domain being watched.
#[derive(Debug, Clone)]
pub struct MonitorJob {
    pub slug: String,
    pub domain: String,
    pub contact: String,
    pub business_name: String,
}

/// Supervised set of running monitors.
#[derive(Default)]
pub struct MonitorTasks {
    set: Mutex<JoinSet<()>>,
}

impl MonitorTasks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn reap(set: &mut JoinSet<()>) {
        while let Some(result) = set.try_join_next() {
            if let Err(e) = result {
                if e.is_panic() {
                    log::error!("Propagation monitor panicked: {e}");
                }
            }
        }
    }

    /// Register a monitor task. Must be called inside a Tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut set = self.set.lock().unwrap_or_else(PoisonError::into_inner);
        Self::reap(&mut set);
        set.spawn(task);
    }

    /// Monitors still running.
    pub fn active(&self) -> usize {
        let mut set = self.set.lock().unwrap_or_else(PoisonError::into_inner);
        Self::reap(&mut set);
        set.len()
    }

    /// Abort every running monitor; returns how many were still running.
    pub async fn shutdown(&self) -> usize {
        let mut set = {
            let mut guard = self.set.lock().unwrap_or_else(PoisonError::into_inner);
            Self::reap(&mut guard);
            std::mem::take(&mut *guard)
        };
        let running = set.len();
        if running > 0 {
            log::info!("Stopping {running} propagation monitor(s)");
        }
        set.abort_all();
        while set.join_next().await.is_some() {}
        running
    }
}

/// 传播监控服务
pub struct PropagationMonitor {
    ctx: Arc<ServiceContext>,
    settings: MonitorSettings,
    tasks: Arc<MonitorTasks>,
}

impl PropagationMonitor {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, settings: MonitorSettings) -> Self {
        Self {
            ctx,
            settings,
            tasks: Arc::new(MonitorTasks::new()),
        }
    }

    pub fn tasks(&self) -> &Arc<MonitorTasks> {
        &self.tasks
    }

    /// Start watching `job.domain` in the background.
    pub fn launch(&self, job: MonitorJob) {
        let ctx = Arc::clone(&self.ctx);
        let settings = self.settings.clone();
        log::info!("[monitor] Watching {} for {}", job.domain, job.slug);
        self.tasks.spawn(async move {
            let outcome = Self::watch(&ctx, &settings, &job).await;
            log::info!("[monitor] {} finished: {outcome:?}", job.domain);
        });
    }

    /// Poll until live or the schedule is exhausted.
    pub async fn watch(
        ctx: &ServiceContext,
        settings: &MonitorSettings,
        job: &MonitorJob,
    ) -> MonitorOutcome {
        let start = Instant::now();
        let progress_window = settings.progress_window();

        for delay in settings.schedule() {
            sleep(delay).await;
            let elapsed = start.elapsed();

            if Self::is_live(ctx, &job.domain).await {
                Self::announce_live(ctx, job, elapsed).await;
                return MonitorOutcome::Live { elapsed };
            }

            if elapsed < progress_window {
                ctx.notify(
                    &job.contact,
                    &messages::still_propagating(&job.domain, elapsed),
                )
                .await;
            } else {
                log::debug!(
                    "[monitor] {} not live after {}s",
                    job.domain,
                    elapsed.as_secs()
                );
            }
        }

        let elapsed = start.elapsed();
        log::warn!(
            "[monitor] Giving up on {} after {}s",
            job.domain,
            elapsed.as_secs()
        );
        ctx.notify(&job.contact, &messages::gave_up(&job.domain)).await;
        ctx.alert_operator(&messages::gave_up_alert(&job.slug, &job.domain, elapsed))
            .await;
        MonitorOutcome::GaveUp { elapsed }
    }

    async fn is_live(ctx: &ServiceContext, domain: &str) -> bool {
        ctx.reachability.resolves(domain).await && ctx.reachability.reachable(domain).await
    }

    async fn announce_live(ctx: &ServiceContext, job: &MonitorJob, elapsed: std::time::Duration) {
        log::info!("[monitor] {} is live after {}s", job.domain, elapsed.as_secs());

        if let Err(e) = ctx
            .messenger
            .send_call_to_action(
                &job.contact,
                &messages::live(&job.business_name, &job.domain),
                &messages::share_link(&job.business_name, &job.domain),
                messages::SHARE_BUTTON,
            )
            .await
        {
            log::warn!("Failed to send live message to {}: {e}", job.contact);
        }
        ctx.alert_operator(&messages::live_alert(&job.slug, &job.domain, elapsed))
            .await;

        // 记录上线时间（仅当站点仍指向该域名）
        match ctx.site_store.find_by_slug(&job.slug).await {
            Ok(Some(mut site)) if site.custom() == Some(job.domain.as_str()) => {
                site.domain_live_at = Some(Utc::now());
                if let Err(e) = ctx.site_store.save(&site).await {
                    log::warn!("Failed to record live time for {}: {e}", job.slug);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to load {} after going live: {e}", job.slug),
        }
    }
}
