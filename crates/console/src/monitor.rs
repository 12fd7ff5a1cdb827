//! Continuous admin status monitoring.
//!
//! Re-verifies an authorized session so that mid-session revocation (account
//! deactivated, organization suspended) is noticed without a push channel.
//!
//! Triggers (timer, focus, hidden→visible) all funnel into
//! [`StatusMonitor::check`], which enforces two guards under one lock with no
//! suspension point in between:
//! - at most one check in flight
//! - at least `check_interval` between checks
//!
//! Only confirmed revocation ends the session. Ambiguous failures are logged
//! and the session is kept.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Notify, mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use adminguard_auth::{RevocationReason, Verdict, assess};
use adminguard_core::{SessionState, UserId};

use crate::config::{MIN_CHECK_INTERVAL, MonitorConfig};
use crate::credentials::CredentialContext;
use crate::fetcher::ProfileFetcher;
use crate::navigation::{ACCOUNT_ISSUE, Navigator, Route};

/// What asked for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Timer,
    Focus,
    Visible,
    Manual,
}

/// Page visibility as reported by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy)]
enum Interest {
    Focus,
    Visibility(Visibility),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Monitor disabled or session not active.
    Skipped,
    /// Another check is in flight.
    Busy,
    /// Last check was less than `check_interval` ago.
    Throttled,
    /// Revocation already handled; nothing left to check.
    AlreadyRevoked,
    /// The monitor was stopped before the result arrived.
    Discarded,
    Valid,
    /// Ambiguous failure; session kept.
    FailedOpen(String),
    Revoked(RevocationReason),
}

#[derive(Debug, Default)]
struct MonitorState {
    last_check: Option<Instant>,
    last_checked_at: Option<DateTime<Utc>>,
    in_flight: bool,
    revoked: bool,
    checks_run: u64,
}

/// Diagnostic view of the monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSnapshot {
    pub last_checked_at: Option<DateTime<Utc>>,
    pub in_flight: bool,
    pub revoked: bool,
    pub checks_run: u64,
}

/// Clears `in_flight` when dropped, including on unwind.
struct InFlight<'a> {
    state: &'a Mutex<MonitorState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight = false;
    }
}

pub struct StatusMonitor {
    config: MonitorConfig,
    session: watch::Receiver<SessionState>,
    fetcher: Arc<dyn ProfileFetcher>,
    credentials: Arc<CredentialContext>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<MonitorState>,
    /// Advanced on every stop and disarm; checks from an older epoch are
    /// discarded.
    epoch: AtomicU64,
}

impl StatusMonitor {
    pub fn new(
        mut config: MonitorConfig,
        session: watch::Receiver<SessionState>,
        fetcher: Arc<dyn ProfileFetcher>,
        credentials: Arc<CredentialContext>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        if config.check_interval < MIN_CHECK_INTERVAL {
            tracing::warn!(
                interval_ms = config.check_interval.as_millis() as u64,
                "check interval too small; using minimum"
            );
            config.check_interval = MIN_CHECK_INTERVAL;
        }
        Self {
            config,
            session,
            fetcher,
            credentials,
            navigator,
            state: Mutex::new(MonitorState::default()),
            epoch: AtomicU64::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.lock_state();
        MonitorSnapshot {
            last_checked_at: state.last_checked_at,
            in_flight: state.in_flight,
            revoked: state.revoked,
            checks_run: state.checks_run,
        }
    }

    fn is_armed(&self, session: &SessionState) -> bool {
        self.config.enabled && session.is_active()
    }

    fn account_issue_route(&self) -> Route {
        Route::new(self.config.sign_in_path.clone()).with_query(ACCOUNT_ISSUE.0, ACCOUNT_ISSUE.1)
    }

    /// Run one status check, subject to the throttle and in-flight guards.
    pub async fn check(&self, trigger: Trigger) -> CheckOutcome {
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.check_in_epoch(trigger, epoch).await
    }

    async fn check_in_epoch(&self, trigger: Trigger, epoch: u64) -> CheckOutcome {
        let armed = self.is_armed(&self.session.borrow());
        if !armed {
            tracing::debug!(?trigger, "status check skipped; monitor not armed");
            return CheckOutcome::Skipped;
        }

        let _in_flight = match self.acquire(trigger, epoch) {
            Ok(guard) => guard,
            Err(outcome) => return outcome,
        };

        let verdict = assess(self.fetcher.fetch_admin_profile().await);

        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(?trigger, "monitor stopped during check; result discarded");
            return CheckOutcome::Discarded;
        }

        match verdict {
            Verdict::Granted(_) => {
                tracing::debug!(?trigger, "admin session still valid");
                CheckOutcome::Valid
            }
            Verdict::Indeterminate(reason) => {
                tracing::warn!(?trigger, %reason, "status check failed; keeping session");
                CheckOutcome::FailedOpen(reason)
            }
            Verdict::Revoked(reason) => {
                self.revoke(&reason).await;
                CheckOutcome::Revoked(reason)
            }
        }
    }

    fn acquire(&self, trigger: Trigger, epoch: u64) -> Result<InFlight<'_>, CheckOutcome> {
        let mut state = self.lock_state();

        if self.epoch.load(Ordering::SeqCst) != epoch {
            return Err(CheckOutcome::Discarded);
        }
        if state.revoked {
            return Err(CheckOutcome::AlreadyRevoked);
        }
        if state.in_flight {
            tracing::debug!(?trigger, "status check already in flight");
            return Err(CheckOutcome::Busy);
        }

        let now = Instant::now();
        if let Some(last) = state.last_check {
            if now.duration_since(last) < self.config.check_interval {
                tracing::debug!(?trigger, "status check throttled");
                return Err(CheckOutcome::Throttled);
            }
        }

        state.in_flight = true;
        state.last_check = Some(now);
        state.last_checked_at = Some(Utc::now());
        state.checks_run += 1;

        Ok(InFlight { state: &self.state })
    }

    async fn revoke(&self, reason: &RevocationReason) {
        self.lock_state().revoked = true;
        tracing::warn!(%reason, "admin access revoked; forcing sign-out");

        if let Err(e) = self.credentials.sign_out().await {
            tracing::error!(error = %e, "forced sign-out failed; redirecting anyway");
        }

        let route = self.account_issue_route();
        tracing::info!(route = %route, "redirecting after revocation");
        self.navigator.navigate(route);
    }

    /// Mark the latest session seen and report whether it arms the monitor,
    /// along with its user.
    fn observe(&self, session: &mut watch::Receiver<SessionState>) -> (bool, Option<UserId>) {
        let current = session.borrow_and_update();
        (self.is_armed(&current), current.identity_key().2)
    }

    /// A new signed-in session starts with a clean slate: no revocation latch
    /// and no throttle window carried over from the previous one.
    fn rearm(&self) {
        let mut state = self.lock_state();
        state.revoked = false;
        state.last_check = None;
    }

    /// Results of checks started before this point belong to the previous
    /// session and are discarded.
    fn disarm(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    fn spawn_check(self: &Arc<Self>, trigger: Trigger) {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let this = self.clone();
        tokio::spawn(async move {
            this.check_in_epoch(trigger, epoch).await;
        });
    }

    /// Install the timer and interest listener.
    ///
    /// They are armed only while the monitor is enabled and the session is
    /// loaded and signed in, and disarmed as soon as that stops being true.
    pub fn start(self: &Arc<Self>) -> MonitorHandle {
        let (interest_tx, interest_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(Notify::new());

        let join = tokio::spawn(self.clone().drive(
            self.session.clone(),
            interest_rx,
            shutdown.clone(),
        ));

        MonitorHandle {
            monitor: self.clone(),
            interest: interest_tx,
            shutdown,
            stopped: AtomicBool::new(false),
            join: Some(join),
        }
    }

    async fn drive(
        self: Arc<Self>,
        mut session: watch::Receiver<SessionState>,
        mut interest: mpsc::UnboundedReceiver<Interest>,
        shutdown: Arc<Notify>,
    ) {
        tracing::info!(
            interval_ms = self.config.check_interval.as_millis() as u64,
            enabled = self.config.enabled,
            "status monitor started"
        );
        let mut visibility = Visibility::Visible;

        'lifecycle: loop {
            let (armed, armed_user) = self.observe(&mut session);

            if !armed {
                tokio::select! {
                    biased;
                    _ = shutdown.notified() => break 'lifecycle,
                    changed = session.changed() => {
                        if changed.is_err() {
                            break 'lifecycle;
                        }
                    }
                    event = interest.recv() => match event {
                        None => break 'lifecycle,
                        Some(event) => {
                            if let Interest::Visibility(next) = event {
                                visibility = next;
                            }
                            tracing::trace!("monitor disarmed; interest event ignored");
                        }
                    },
                }
                continue 'lifecycle;
            }

            tracing::debug!("status monitor armed");
            self.rearm();
            let period = self.config.check_interval;
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.notified() => break 'lifecycle,
                    changed = session.changed() => {
                        if changed.is_err() {
                            break 'lifecycle;
                        }
                        let (still_armed, user) = self.observe(&mut session);
                        if !still_armed {
                            tracing::info!("session inactive; status monitor disarmed");
                            self.disarm();
                            continue 'lifecycle;
                        }
                        if user != armed_user {
                            tracing::info!("signed-in user changed; re-arming status monitor");
                            self.disarm();
                            continue 'lifecycle;
                        }
                    }
                    _ = ticker.tick() => self.spawn_check(Trigger::Timer),
                    event = interest.recv() => match event {
                        None => break 'lifecycle,
                        Some(Interest::Focus) => self.spawn_check(Trigger::Focus),
                        Some(Interest::Visibility(next)) => {
                            let previous = std::mem::replace(&mut visibility, next);
                            if previous == Visibility::Hidden && next == Visibility::Visible {
                                self.spawn_check(Trigger::Visible);
                            }
                        }
                    },
                }
            }
        }

        tracing::info!("status monitor stopped");
    }
}

/// Running monitor. Dropping the handle stops the monitor.
pub struct MonitorHandle {
    monitor: Arc<StatusMonitor>,
    interest: mpsc::UnboundedSender<Interest>,
    shutdown: Arc<Notify>,
    stopped: AtomicBool,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl MonitorHandle {
    /// The page regained focus. Returns `false` once stopped.
    pub fn notify_focus(&self) -> bool {
        self.send(Interest::Focus)
    }

    /// The page's visibility changed. Returns `false` once stopped.
    pub fn notify_visibility(&self, visibility: Visibility) -> bool {
        self.send(Interest::Visibility(visibility))
    }

    fn send(&self, event: Interest) -> bool {
        if self.stopped.load(Ordering::SeqCst) {
            return false;
        }
        self.interest.send(event).is_ok()
    }

    pub fn monitor(&self) -> &Arc<StatusMonitor> {
        &self.monitor
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Tear down the timer and listener. Idempotent.
    ///
    /// A check already in flight completes but its result is discarded.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.monitor.epoch.fetch_add(1, Ordering::SeqCst);
        self.shutdown.notify_one();
    }

    /// Stop and wait for the driver task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use adminguard_core::{IdentityUser, ProfileStatus};

    use crate::identity::StaticIdentity;
    use crate::testing::{
        RecordingNavigator, RecordingSignOut, ScriptedFetcher, Step, active_profile,
    };

    const INTERVAL: Duration = Duration::from_secs(60);

    struct Harness {
        monitor: Arc<StatusMonitor>,
        identity: StaticIdentity,
        fetcher: Arc<ScriptedFetcher>,
        sign_out: Arc<RecordingSignOut>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness_with(config: MonitorConfig, fetcher: ScriptedFetcher, sign_out: RecordingSignOut) -> Harness {
        let identity = StaticIdentity::signed_in("tok", IdentityUser::new("user_1"));
        let fetcher = Arc::new(fetcher);
        let sign_out = Arc::new(sign_out);
        let navigator = Arc::new(RecordingNavigator::default());
        let credentials = Arc::new(CredentialContext::new());
        credentials.set_sign_out_function(sign_out.clone());

        let monitor = Arc::new(StatusMonitor::new(
            config,
            identity.subscribe(),
            fetcher.clone(),
            credentials,
            navigator.clone(),
        ));

        Harness {
            monitor,
            identity,
            fetcher,
            sign_out,
            navigator,
        }
    }

    fn harness(fetcher: ScriptedFetcher) -> Harness {
        harness_with(
            MonitorConfig::default().with_interval(INTERVAL),
            fetcher,
            RecordingSignOut::succeeding(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn timer_and_focus_inside_window_fetch_once() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        let handle = h.monitor.start();

        tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 1);

        assert!(handle.notify_focus());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 1);
        assert_eq!(h.monitor.snapshot().checks_run, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn focus_then_timer_inside_window_fetch_once() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        let handle = h.monitor.start();

        tokio::time::sleep(Duration::from_secs(30)).await;
        handle.notify_focus();
        tokio::time::sleep(Duration::from_secs(31)).await;

        // Focus at 30s ran; the 60s tick fell inside its window.
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failures_never_sign_out() {
        let h = harness(ScriptedFetcher::always(Step::err("network error: connection reset")));

        for _ in 0..100 {
            let outcome = h.monitor.check(Trigger::Manual).await;
            assert!(matches!(outcome, CheckOutcome::FailedOpen(_)));
            tokio::time::advance(INTERVAL).await;
        }

        assert_eq!(h.fetcher.calls(), 100);
        assert_eq!(h.sign_out.calls(), 0);
        assert!(h.navigator.routes().is_empty());
        assert!(!h.monitor.snapshot().revoked);
    }

    #[tokio::test(start_paused = true)]
    async fn inactive_organization_signs_out_and_redirects_even_if_sign_out_fails() {
        let h = harness_with(
            MonitorConfig::default().with_interval(INTERVAL),
            ScriptedFetcher::always(Step::ok(active_profile().with_organization("org_1", false))),
            RecordingSignOut::failing(),
        );

        let outcome = h.monitor.check(Trigger::Focus).await;

        assert_eq!(
            outcome,
            CheckOutcome::Revoked(RevocationReason::OrganizationInactive)
        );
        assert_eq!(h.sign_out.calls(), 1);
        let routes = h.navigator.routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "/sign-in");
        assert_eq!(routes[0].query_value("error"), Some("account_issue"));

        tokio::time::advance(INTERVAL).await;
        assert_eq!(h.monitor.check(Trigger::Timer).await, CheckOutcome::AlreadyRevoked);
        assert_eq!(h.sign_out.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn denial_and_inactive_account_are_confirmed_revocations() {
        let h = harness(ScriptedFetcher::new(vec![Step::err("403 Forbidden")]));
        assert!(matches!(
            h.monitor.check(Trigger::Manual).await,
            CheckOutcome::Revoked(RevocationReason::AuthorizationDenied(_))
        ));
        assert_eq!(h.sign_out.calls(), 1);

        let h = harness(ScriptedFetcher::new(vec![Step::ok(
            active_profile().with_status(ProfileStatus::Inactive),
        )]));
        assert_eq!(
            h.monitor.check(Trigger::Manual).await,
            CheckOutcome::Revoked(RevocationReason::AccountInactive)
        );
        assert_eq!(h.sign_out.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn valid_session_is_left_alone() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        assert_eq!(h.monitor.check(Trigger::Manual).await, CheckOutcome::Valid);
        assert_eq!(h.sign_out.calls(), 0);
        assert!(h.navigator.routes().is_empty());
        assert!(h.monitor.snapshot().last_checked_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_check_blocks_others() {
        let h = harness_with(
            MonitorConfig::default().with_interval(Duration::from_secs(1)),
            ScriptedFetcher::always(Step::ok(active_profile()).after(Duration::from_secs(10))),
            RecordingSignOut::succeeding(),
        );

        let monitor = h.monitor.clone();
        let first = tokio::spawn(async move { monitor.check(Trigger::Timer).await });

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(h.monitor.snapshot().in_flight);
        assert_eq!(h.monitor.check(Trigger::Focus).await, CheckOutcome::Busy);

        assert_eq!(first.await.unwrap(), CheckOutcome::Valid);
        assert!(!h.monitor.snapshot().in_flight);
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_window_is_measured_from_last_check() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));

        assert_eq!(h.monitor.check(Trigger::Manual).await, CheckOutcome::Valid);
        tokio::time::advance(INTERVAL - Duration::from_secs(1)).await;
        assert_eq!(h.monitor.check(Trigger::Focus).await, CheckOutcome::Throttled);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(h.monitor.check(Trigger::Focus).await, CheckOutcome::Valid);
        assert_eq!(h.fetcher.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_removes_timer_and_listeners() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        let handle = h.monitor.start();

        handle.stop();
        handle.stop();
        assert!(handle.is_stopped());

        tokio::time::sleep(INTERVAL * 5).await;
        assert!(!handle.notify_focus());
        assert!(!handle.notify_visibility(Visibility::Visible));
        tokio::time::sleep(INTERVAL).await;

        assert_eq!(h.fetcher.calls(), 0);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_monitor() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        drop(h.monitor.start());

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(h.fetcher.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn result_arriving_after_stop_is_discarded() {
        let h = harness_with(
            MonitorConfig::default().with_interval(INTERVAL),
            ScriptedFetcher::always(
                Step::ok(active_profile().with_status(ProfileStatus::Inactive))
                    .after(Duration::from_secs(10)),
            ),
            RecordingSignOut::succeeding(),
        );
        let handle = h.monitor.start();

        handle.notify_focus();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 1);

        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(20)).await;

        assert_eq!(h.sign_out.calls(), 0);
        assert!(h.navigator.routes().is_empty());
        assert!(!h.monitor.snapshot().in_flight);
    }

    #[tokio::test(start_paused = true)]
    async fn visibility_triggers_only_on_hidden_to_visible() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        let handle = h.monitor.start();

        handle.notify_visibility(Visibility::Visible);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 0);

        handle.notify_visibility(Visibility::Hidden);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 0);

        handle.notify_visibility(Visibility::Visible);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_monitor_never_arms() {
        let h = harness_with(
            MonitorConfig::default().with_interval(INTERVAL).disabled(),
            ScriptedFetcher::always(Step::ok(active_profile())),
            RecordingSignOut::succeeding(),
        );
        let handle = h.monitor.start();

        handle.notify_focus();
        tokio::time::sleep(INTERVAL * 3).await;

        assert_eq!(h.fetcher.calls(), 0);
        assert_eq!(h.monitor.check(Trigger::Manual).await, CheckOutcome::Skipped);
    }

    #[tokio::test(start_paused = true)]
    async fn disarms_on_sign_out_and_rearms_on_sign_in() {
        let h = harness(ScriptedFetcher::always(Step::ok(active_profile())));
        let handle = h.monitor.start();

        tokio::time::sleep(Duration::from_secs(1)).await;
        h.identity.publish(SessionState::signed_out());
        tokio::time::sleep(INTERVAL * 3).await;
        handle.notify_focus();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 0);

        h.identity
            .publish(SessionState::signed_in(IdentityUser::new("user_1")));
        tokio::time::sleep(INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn new_session_after_revocation_is_monitored_again() {
        let h = harness(ScriptedFetcher::new(vec![
            Step::ok(active_profile().with_status(ProfileStatus::Inactive)),
            Step::ok(active_profile()),
        ]));
        let handle = h.monitor.start();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(
            h.monitor.check(Trigger::Manual).await,
            CheckOutcome::Revoked(RevocationReason::AccountInactive)
        );
        assert!(h.monitor.snapshot().revoked);

        h.identity.publish(SessionState::signed_out());
        tokio::time::sleep(Duration::from_secs(1)).await;
        h.identity
            .publish(SessionState::signed_in(IdentityUser::new("user_2")));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!h.monitor.snapshot().revoked);

        // Well inside the old throttle window; the new session starts fresh.
        assert!(handle.notify_focus());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(h.fetcher.calls(), 2);
        assert_eq!(h.sign_out.calls(), 1);
        assert_eq!(h.navigator.routes().len(), 1);
        assert!(!h.monitor.snapshot().revoked);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_user_rearms_even_if_sign_out_failed() {
        let h = harness_with(
            MonitorConfig::default().with_interval(INTERVAL),
            ScriptedFetcher::new(vec![
                Step::ok(active_profile().with_organization("org_1", false)),
                Step::ok(active_profile()),
            ]),
            RecordingSignOut::failing(),
        );
        let handle = h.monitor.start();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(matches!(
            h.monitor.check(Trigger::Manual).await,
            CheckOutcome::Revoked(_)
        ));
        tokio::time::advance(INTERVAL).await;
        assert_eq!(h.monitor.check(Trigger::Manual).await, CheckOutcome::AlreadyRevoked);

        h.identity
            .publish(SessionState::signed_in(IdentityUser::new("user_2")));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(handle.notify_focus());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(h.fetcher.calls(), 2);
        assert!(!h.monitor.snapshot().revoked);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_raised_to_minimum() {
        let h = harness_with(
            MonitorConfig {
                check_interval: Duration::ZERO,
                ..MonitorConfig::default()
            },
            ScriptedFetcher::always(Step::ok(active_profile())),
            RecordingSignOut::succeeding(),
        );
        assert_eq!(h.monitor.config.check_interval, MIN_CHECK_INTERVAL);

        let handle = h.monitor.start();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(h.fetcher.calls() >= 1);
        assert!(!handle.join.as_ref().is_some_and(|join| join.is_finished()));
        handle.shutdown().await;
    }
}
