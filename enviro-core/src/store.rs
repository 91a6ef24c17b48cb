//! Telemetry Store
//!
//! ## Overview
//!
//! The store holds, for every [`Variable`], the latest [`Measurement`] and an
//! oldest-first [`History`]. Storage is a fixed array indexed by the
//! variable enum, so there is no string lookup on the hot path and every
//! variable exists from construction onward, holding
//! [`Measurement::SENTINEL`] until its first write.
//!
//! ```text
//! channels[Variable::Temperature.index()]
//! ┌──────────────────────────────┐
//! │ current:  21.4 C @ t=9000    │  ← always the latest add
//! │ history:  [.., 21.3, 21.4]   │  ← oldest first, tail == current
//! │ extremes: min 18.9, max 23.0 │  ← survives trimming
//! └──────────────────────────────┘
//! ```
//!
//! ## Retention
//!
//! Trimming on every append would make each write O(n). Instead the store
//! counts writes and, once the count exceeds `history_check`, walks every
//! variable once: any history longer than `limit_history` loses its oldest
//! `chunk` samples. The counter then restarts. The cost is amortised over
//! thousands of cheap appends. `current` is never touched by a trim.
//!
//! ## Concurrency
//!
//! `TelemetryStore` is a plain single-owner value. When a sampling thread
//! and a display/export thread share it, wrap it in [`SharedTelemetryStore`]
//! (requires `std`), which serialises every operation behind one lock so a
//! reader can never see a `current` newer than the history tail.
//!
//! ## Usage
//!
//! ```rust
//! use enviro_core::store::{RetentionPolicy, TelemetryStore};
//! use enviro_core::time::FixedTime;
//! use enviro_core::Variable;
//!
//! let mut store = TelemetryStore::with_clock(RetentionPolicy::default(), FixedTime::new(0));
//! store.add_at(Variable::Temperature, 21.4, 1_000);
//! store.add_at(Variable::Temperature, 21.6, 2_000);
//!
//! assert_eq!(store.get_current(Variable::Temperature).value(), 21.6);
//! assert_eq!(store.get_history(Variable::Temperature, 5).len(), 2);
//! assert!(store.get_current(Variable::Noise).is_sentinel());
//! ```

use alloc::vec::Vec;

use crate::buffer::History;
use crate::constants::retention::{
    DEFAULT_HISTORY_CHECK, DEFAULT_HISTORY_QUERY, DEFAULT_LIMIT_HISTORY, DEFAULT_TRIM_CHUNK,
};
use crate::errors::{EnviroError, EnviroResult};
use crate::measurement::Measurement;
use crate::time::{TimeSource, Timestamp};
use crate::units::Variable;

/// When and how much history to drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetentionPolicy {
    /// History length above which a variable is trimmed
    pub limit_history: usize,
    /// Writes between retention checks
    pub history_check: u32,
    /// Oldest samples removed per trim
    pub chunk: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            limit_history: DEFAULT_LIMIT_HISTORY,
            history_check: DEFAULT_HISTORY_CHECK,
            chunk: DEFAULT_TRIM_CHUNK,
        }
    }
}

impl RetentionPolicy {
    /// Create a validated policy
    pub fn new(limit_history: usize, history_check: u32, chunk: usize) -> EnviroResult<Self> {
        let policy = Self { limit_history, history_check, chunk };
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies that could never shrink a history, or could empty one
    ///
    /// A trim only runs on a history longer than `limit_history`, so a
    /// `chunk` no larger than the limit always leaves the newest sample.
    pub fn validate(&self) -> EnviroResult<()> {
        if self.limit_history == 0 {
            return Err(EnviroError::InvalidRetention { reason: "limit_history must be positive" });
        }
        if self.chunk == 0 {
            return Err(EnviroError::InvalidRetention { reason: "chunk must be positive" });
        }
        if self.chunk > self.limit_history {
            return Err(EnviroError::InvalidRetention { reason: "chunk must not exceed limit_history" });
        }
        Ok(())
    }
}

/// Running minimum and maximum of every value written to a variable
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Extremes {
    pub min: Measurement,
    pub max: Measurement,
}

impl Extremes {
    fn update(slot: &mut Option<Extremes>, measurement: Measurement) {
        match slot {
            None => {
                *slot = Some(Extremes { min: measurement, max: measurement });
            }
            Some(extremes) => {
                if measurement.value() < extremes.min.value() {
                    extremes.min = measurement;
                }
                if measurement.value() > extremes.max.value() {
                    extremes.max = measurement;
                }
            }
        }
    }
}

/// `{current, history}` record for one variable
#[derive(Debug, Clone)]
struct Channel {
    current: Measurement,
    history: History,
    extremes: Option<Extremes>,
}

impl Channel {
    const fn new() -> Self {
        Self {
            current: Measurement::SENTINEL,
            history: History::new(),
            extremes: None,
        }
    }
}

/// Current value of every variable at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    current: [Measurement; Variable::COUNT],
}

impl Snapshot {
    /// Latest measurement for a variable (sentinel if never written)
    pub fn get(&self, variable: Variable) -> Measurement {
        self.current[variable.index()]
    }

    /// Variables in enumeration order paired with their current measurement
    pub fn iter(&self) -> impl Iterator<Item = (Variable, Measurement)> + '_ {
        Variable::ALL.iter().map(move |v| (*v, self.current[v.index()]))
    }
}

/// Bounded per-variable time-series store
#[derive(Debug, Clone)]
pub struct TelemetryStore<C: TimeSource> {
    channels: [Channel; Variable::COUNT],
    policy: RetentionPolicy,
    writes_since_trim: u32,
    clock: C,
}

#[cfg(feature = "std")]
impl TelemetryStore<crate::time::SystemTime> {
    /// Store stamped by the system clock
    pub fn new(policy: RetentionPolicy) -> Self {
        Self::with_clock(policy, crate::time::SystemTime)
    }
}

impl<C: TimeSource> TelemetryStore<C> {
    /// Store stamped by an explicit time source
    pub fn with_clock(policy: RetentionPolicy, clock: C) -> Self {
        const EMPTY: Channel = Channel::new();
        Self {
            channels: [EMPTY; Variable::COUNT],
            policy,
            writes_since_trim: 0,
            clock,
        }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Record a value stamped with the store's clock
    pub fn add(&mut self, variable: Variable, value: f64) -> Measurement {
        let now = self.clock.now();
        self.add_at(variable, value, now)
    }

    /// Record a value at an explicit timestamp
    pub fn add_at(&mut self, variable: Variable, value: f64, timestamp: Timestamp) -> Measurement {
        let measurement = Measurement::new(variable, value, timestamp);
        let channel = &mut self.channels[variable.index()];
        channel.current = measurement;
        channel.history.push(measurement);
        Extremes::update(&mut channel.extremes, measurement);
        self.check_retention();
        measurement
    }

    /// Record a value for a variable known only by name
    pub fn add_named(&mut self, name: &str, value: f64, timestamp: Timestamp) -> EnviroResult<Measurement> {
        let variable = Variable::from_name(name)?;
        Ok(self.add_at(variable, value, timestamp))
    }

    /// Latest measurement, or the sentinel if nothing was ever recorded
    pub fn get_current(&self, variable: Variable) -> Measurement {
        self.channels[variable.index()].current
    }

    /// Latest measurement for a variable known only by name
    pub fn get_current_named(&self, name: &str) -> EnviroResult<Measurement> {
        Ok(self.get_current(Variable::from_name(name)?))
    }

    /// The most recent `count` entries, oldest first
    pub fn get_history(&self, variable: Variable, count: usize) -> Vec<Measurement> {
        self.channels[variable.index()].history.last_n(count)
    }

    /// [`get_history`](Self::get_history) with the default count of five
    pub fn get_recent(&self, variable: Variable) -> Vec<Measurement> {
        self.get_history(variable, DEFAULT_HISTORY_QUERY)
    }

    /// Inclusive index range over the history; never fails (see [`History::range`])
    pub fn get_history_range(&self, variable: Variable, start_index: usize, end_index: usize) -> Vec<Measurement> {
        self.channels[variable.index()].history.range(start_index, end_index)
    }

    pub fn history_len(&self, variable: Variable) -> usize {
        self.channels[variable.index()].history.len()
    }

    /// Running min/max since start-up, `None` before the first write
    pub fn extremes(&self, variable: Variable) -> Option<Extremes> {
        self.channels[variable.index()].extremes
    }

    /// Copy of every variable's current value
    pub fn snapshot(&self) -> Snapshot {
        let mut current = [Measurement::SENTINEL; Variable::COUNT];
        for (slot, channel) in current.iter_mut().zip(self.channels.iter()) {
            *slot = channel.current;
        }
        Snapshot { current }
    }

    fn check_retention(&mut self) {
        if self.writes_since_trim > self.policy.history_check {
            for (variable, channel) in Variable::ALL.iter().zip(self.channels.iter_mut()) {
                if channel.history.len() > self.policy.limit_history {
                    let removed = channel.history.trim_oldest(self.policy.chunk);
                    log_debug!("Trimmed {} samples from {} history", removed, variable.name());
                }
            }
            self.writes_since_trim = 0;
        } else {
            self.writes_since_trim = self.writes_since_trim.saturating_add(1);
        }
    }
}

#[cfg(feature = "std")]
mod shared {
    use std::sync::{Arc, PoisonError, RwLock};
    use std::vec::Vec;

    use super::{Extremes, RetentionPolicy, Snapshot, TelemetryStore};
    use crate::errors::EnviroResult;
    use crate::measurement::Measurement;
    use crate::time::{SystemTime, TimeSource, Timestamp};
    use crate::units::Variable;

    /// Thread-safe handle to one [`TelemetryStore`]
    ///
    /// A single lock covers every variable, so `current` and the history
    /// tail are always read and written together. A poisoned lock is
    /// recovered rather than propagated: a panicking writer cannot leave a
    /// channel half-updated, because each write is a push plus a copy.
    pub struct SharedTelemetryStore<C: TimeSource = SystemTime> {
        inner: Arc<RwLock<TelemetryStore<C>>>,
    }

    impl<C: TimeSource> Clone for SharedTelemetryStore<C> {
        fn clone(&self) -> Self {
            Self { inner: Arc::clone(&self.inner) }
        }
    }

    impl SharedTelemetryStore<SystemTime> {
        pub fn new(policy: RetentionPolicy) -> Self {
            Self::from_store(TelemetryStore::new(policy))
        }
    }

    impl<C: TimeSource> SharedTelemetryStore<C> {
        pub fn from_store(store: TelemetryStore<C>) -> Self {
            Self { inner: Arc::new(RwLock::new(store)) }
        }

        /// Run a closure with exclusive access
        pub fn write<R>(&self, f: impl FnOnce(&mut TelemetryStore<C>) -> R) -> R {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut guard)
        }

        /// Run a closure with shared access
        pub fn read<R>(&self, f: impl FnOnce(&TelemetryStore<C>) -> R) -> R {
            let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            f(&guard)
        }

        pub fn add(&self, variable: Variable, value: f64) -> Measurement {
            self.write(|store| store.add(variable, value))
        }

        pub fn add_at(&self, variable: Variable, value: f64, timestamp: Timestamp) -> Measurement {
            self.write(|store| store.add_at(variable, value, timestamp))
        }

        pub fn add_named(&self, name: &str, value: f64, timestamp: Timestamp) -> EnviroResult<Measurement> {
            self.write(|store| store.add_named(name, value, timestamp))
        }

        pub fn get_current(&self, variable: Variable) -> Measurement {
            self.read(|store| store.get_current(variable))
        }

        pub fn get_history(&self, variable: Variable, count: usize) -> Vec<Measurement> {
            self.read(|store| store.get_history(variable, count))
        }

        pub fn get_recent(&self, variable: Variable) -> Vec<Measurement> {
            self.read(|store| store.get_recent(variable))
        }

        pub fn get_history_range(&self, variable: Variable, start_index: usize, end_index: usize) -> Vec<Measurement> {
            self.read(|store| store.get_history_range(variable, start_index, end_index))
        }

        pub fn extremes(&self, variable: Variable) -> Option<Extremes> {
            self.read(|store| store.extremes(variable))
        }

        pub fn snapshot(&self) -> Snapshot {
            self.read(|store| store.snapshot())
        }
    }
}

#[cfg(feature = "std")]
pub use shared::SharedTelemetryStore;
