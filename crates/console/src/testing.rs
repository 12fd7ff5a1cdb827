//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use adminguard_core::{AdminProfile, CredentialError, ProfileError};

use crate::credentials::SignOutHandler;
use crate::fetcher::ProfileFetcher;
use crate::navigation::{Navigator, Route};

pub fn active_profile() -> AdminProfile {
    AdminProfile::active("ops@example.com", "platform_admin").with_organization("org_1", true)
}

/// One scripted fetch: wait `delay`, then return `result`.
#[derive(Debug, Clone)]
pub struct Step {
    pub delay: Duration,
    pub result: Result<AdminProfile, ProfileError>,
}

impl Step {
    pub fn ok(profile: AdminProfile) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(profile),
        }
    }

    pub fn err(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(ProfileError::new(message)),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Fetcher that replays steps in order, then repeats `fallback`.
#[derive(Debug)]
pub struct ScriptedFetcher {
    steps: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            fallback: Step::err("no scripted response"),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn always(step: Step) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            fallback: step,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileFetcher for ScriptedFetcher {
    async fn fetch_admin_profile(&self) -> Result<AdminProfile, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .steps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        step.result
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.routes().iter().map(|r| r.to_string()).collect()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}

#[derive(Debug)]
pub struct RecordingSignOut {
    fail: bool,
    calls: AtomicUsize,
}

impl RecordingSignOut {
    pub fn succeeding() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignOutHandler for RecordingSignOut {
    async fn sign_out(&self) -> Result<(), CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(CredentialError::provider("sign-out request failed"))
        } else {
            Ok(())
        }
    }
}
