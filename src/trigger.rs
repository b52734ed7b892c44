//! Owner-bound active schedule with atomic reconfiguration.
//!
//! An [`ActiveSchedule`] owns the raw specification text and the
//! currently live [`ScheduleList`]. The live list is an immutable
//! snapshot behind an `Arc`, swapped whole on reconfiguration: in-flight
//! checks observe either the fully-old or fully-new list, never a partial
//! view. A failed reparse is logged and the previous valid list keeps
//! serving, so a bad edit never makes a running schedule go dark.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::params::{self, ParameterMap};
use crate::schedule::{ScheduleList, Seed};
use crate::types::TickInstant;

/// A schedule specification bound to a live, atomically replaceable list.
pub struct ActiveSchedule {
    spec: String,
    current: RwLock<Arc<ScheduleList>>,
}

impl ActiveSchedule {
    /// Parse `spec` with the default seed and activate it.
    ///
    /// Initial construction fails fast: there is no prior valid state to
    /// fall back to.
    pub fn new(spec: impl Into<String>) -> Result<Self> {
        let spec = spec.into();
        let list = ScheduleList::parse(&spec)?;
        Ok(Self {
            spec,
            current: RwLock::new(Arc::new(list)),
        })
    }

    /// Reparse with a seed derived from the owner identity and swap the
    /// live list.
    ///
    /// Called once the owner is known (e.g. at trigger start). On any
    /// failure the previous list stays active and the error is logged,
    /// never raised. Returns whether the swap happened.
    pub fn bind_owner(&self, identity: &str) -> bool {
        let seed = match Seed::from_owner(identity) {
            Ok(seed) => seed,
            Err(e) => {
                warn!(owner = %identity, error = %e, "Cannot derive schedule seed");
                return false;
            }
        };
        self.rebind(seed, identity)
    }

    /// Reparse with an explicit seed and swap the live list.
    ///
    /// Same keep-on-failure contract as [`bind_owner`](Self::bind_owner).
    pub fn rebind(&self, seed: Seed, owner: &str) -> bool {
        match ScheduleList::parse_with_seed(&self.spec, seed) {
            Ok(list) => {
                *self.current.write() = Arc::new(list);
                debug!(owner, "Rebound schedule to owner seed");
                true
            }
            Err(e) => {
                // The constructor already parsed this text, so a failure
                // here is unexpected; keep the last valid list running.
                warn!(owner, error = %e, "Schedule reparse failed, keeping previous list");
                false
            }
        }
    }

    /// The live list as an immutable snapshot.
    pub fn snapshot(&self) -> Arc<ScheduleList> {
        self.current.read().clone()
    }

    /// Parameters of the first line firing at `at`, if any.
    pub fn check(&self, at: &TickInstant) -> Option<ParameterMap> {
        let list = self.snapshot();
        let line = list.check(at)?;
        info!(
            source_line = line.source_line,
            params = line.params().len(),
            "Schedule line fired"
        );
        Some(line.params().clone())
    }

    /// Merged parameters for a firing at `at`: the matched line's
    /// explicit values over `defaults`.
    pub fn fire(&self, at: &TickInstant, defaults: &ParameterMap) -> Option<ParameterMap> {
        self.check(at)
            .map(|explicit| params::merge(defaults, &explicit))
    }

    /// The raw specification text this schedule was built from.
    pub fn spec(&self) -> &str {
        &self.spec
    }
}

impl std::fmt::Debug for ActiveSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSchedule")
            .field("spec", &self.spec)
            .field("lines", &self.current.read().len())
            .finish()
    }
}
