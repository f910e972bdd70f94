use std::time::Duration;

use foundation::ids::InstanceId;
use foundation::time::Millis;
use runtime::timer::OneShotTimer;
use scene::visibility::{ScreenRect, VisibilityProbe};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::MapConfig;
use crate::degradation::DegradationState;
use crate::error::InitError;

/// Per-instance lifecycle of the heavy map surface.
///
/// `NotVisible -> Loading -> {Ready | Errored}`; `Errored` immediately moves
/// on to `SimplifiedFallback`, which only an explicit retry leaves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum MountState {
    NotVisible,
    Loading,
    Ready,
    Errored,
    SimplifiedFallback,
}

/// Identifies one initialization attempt of one instance.
///
/// Results are applied only if their ticket matches the attempt in flight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InitTicket {
    pub instance: InstanceId,
    pub attempt: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitTrigger {
    Visibility,
    Timeout,
    Manual,
    Retry,
}

/// What a controller input did.
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    Unchanged,
    /// The host must start initializing the surface for this ticket.
    BeginInit(InitTicket),
    /// Retry accepted; initialization restarts after the retry delay.
    RetryScheduled,
    Ready,
    Degraded(InitError),
    /// A result for a stale attempt or a torn-down instance.
    Discarded,
}

/// Decides when the map surface initializes and what happens when it fails.
///
/// The controller is synchronous: the host feeds it time, visibility and
/// initialization results, and services the [`InitTicket`]s it hands out.
#[derive(Debug)]
pub struct DeferredMountController {
    instance: InstanceId,
    state: MountState,
    degradation: DegradationState,
    probe: VisibilityProbe,
    fallback_timeout: Duration,
    retry_delay: Duration,
    fallback_timer: OneShotTimer,
    retry_timer: OneShotTimer,
    observing: bool,
    attempt: u32,
    in_flight: Option<InitTicket>,
    last_error: Option<InitError>,
    torn_down: bool,
}

impl DeferredMountController {
    /// Mounts a controller.
    ///
    /// The degradation flag is read once here and the starting state decided
    /// in the same step: a tripped flag starts the instance in
    /// `SimplifiedFallback` without arming anything.
    pub fn new(
        instance: InstanceId,
        degradation: DegradationState,
        config: &MapConfig,
        now: Millis,
    ) -> Self {
        let mut c = Self {
            instance,
            state: MountState::NotVisible,
            degradation,
            probe: config.visibility_probe(),
            fallback_timeout: config.fallback_timeout(),
            retry_delay: config.retry_delay(),
            fallback_timer: OneShotTimer::new(),
            retry_timer: OneShotTimer::new(),
            observing: false,
            attempt: 0,
            in_flight: None,
            last_error: None,
            torn_down: false,
        };

        if c.degradation.has_failed_before() {
            debug!(%instance, "earlier map failure recorded; starting in list fallback");
            c.state = MountState::SimplifiedFallback;
        } else {
            c.observing = true;
            c.fallback_timer.arm(now, c.fallback_timeout);
        }
        c
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn state(&self) -> MountState {
        self.state
    }

    /// Whether the host should keep delivering visibility signals.
    pub fn wants_visibility(&self) -> bool {
        self.observing
    }

    pub fn in_flight(&self) -> Option<InitTicket> {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&InitError> {
        self.last_error.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Earliest timer deadline the host should wake up for.
    pub fn next_deadline(&self) -> Option<Millis> {
        match (self.fallback_timer.deadline(), self.retry_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Geometry-based visibility signal.
    pub fn on_visibility(&mut self, region: &ScreenRect, viewport: &ScreenRect) -> MountOutcome {
        let near = self.probe.is_near(region, viewport);
        self.on_visibility_signal(near)
    }

    /// Visibility signal from an observer that already applied the margin.
    pub fn on_visibility_signal(&mut self, near: bool) -> MountOutcome {
        if !near || !self.observing || self.state != MountState::NotVisible {
            return MountOutcome::Unchanged;
        }
        self.begin(InitTrigger::Visibility)
    }

    /// "Load now": skips waiting for visibility.
    pub fn load_now(&mut self) -> MountOutcome {
        if self.torn_down || self.state != MountState::NotVisible {
            return MountOutcome::Unchanged;
        }
        self.begin(InitTrigger::Manual)
    }

    /// Advances timers to `now`.
    pub fn tick(&mut self, now: Millis) -> MountOutcome {
        if self.torn_down {
            return MountOutcome::Unchanged;
        }

        if self.fallback_timer.poll(now) && self.state == MountState::NotVisible {
            return self.begin(InitTrigger::Timeout);
        }

        if self.retry_timer.poll(now)
            && self.state == MountState::Loading
            && self.in_flight.is_none()
        {
            debug!(instance = %self.instance, trigger = ?InitTrigger::Retry, "map init started");
            return MountOutcome::BeginInit(self.issue_ticket());
        }

        MountOutcome::Unchanged
    }

    /// Applies the result of the initialization identified by `ticket`.
    pub fn complete_init(
        &mut self,
        ticket: InitTicket,
        result: Result<(), InitError>,
    ) -> MountOutcome {
        if self.torn_down || self.in_flight != Some(ticket) || self.state != MountState::Loading {
            trace!(instance = %self.instance, ?ticket, "discarding stale init result");
            return MountOutcome::Discarded;
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                self.state = MountState::Ready;
                self.degradation.record_initialized();
                debug!(instance = %self.instance, attempt = ticket.attempt, "map ready");
                MountOutcome::Ready
            }
            Err(err) => self.fail(err),
        }
    }

    /// Error reported by the surface while loading or after it became ready.
    pub fn report_runtime_error(&mut self, err: InitError) -> MountOutcome {
        if self.torn_down {
            return MountOutcome::Discarded;
        }
        match self.state {
            MountState::Loading | MountState::Ready => self.fail(err),
            _ => MountOutcome::Unchanged,
        }
    }

    /// Explicit user retry from the fallback notice.
    ///
    /// Clears the shared degradation flags and re-attempts initialization
    /// after the retry delay.
    pub fn retry(&mut self, now: Millis) -> MountOutcome {
        if self.torn_down
            || !matches!(
                self.state,
                MountState::Errored | MountState::SimplifiedFallback
            )
        {
            return MountOutcome::Unchanged;
        }

        self.degradation.reset();
        self.state = MountState::Loading;
        self.in_flight = None;
        self.last_error = None;
        self.retry_timer.arm(now, self.retry_delay);
        debug!(
            instance = %self.instance,
            delay_ms = self.retry_delay.as_millis() as u64,
            "map retry scheduled"
        );
        MountOutcome::RetryScheduled
    }

    /// Unmount: cancels timers, stops observing and invalidates any
    /// in-flight attempt. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.observing = false;
        self.fallback_timer.cancel();
        self.retry_timer.cancel();
        self.in_flight = None;
        trace!(instance = %self.instance, "map controller torn down");
    }

    fn begin(&mut self, trigger: InitTrigger) -> MountOutcome {
        self.state = MountState::Loading;
        self.observing = false;
        self.fallback_timer.cancel();
        debug!(instance = %self.instance, ?trigger, "map init started");
        MountOutcome::BeginInit(self.issue_ticket())
    }

    fn issue_ticket(&mut self) -> InitTicket {
        self.attempt += 1;
        let ticket = InitTicket {
            instance: self.instance,
            attempt: self.attempt,
        };
        self.in_flight = Some(ticket);
        ticket
    }

    fn fail(&mut self, err: InitError) -> MountOutcome {
        self.state = MountState::Errored;
        self.in_flight = None;
        self.retry_timer.cancel();
        warn!(instance = %self.instance, error = %err, "map unavailable; falling back to list");
        self.degradation.record_failure();
        self.last_error = Some(err.clone());
        self.state = MountState::SimplifiedFallback;
        MountOutcome::Degraded(err)
    }
}
