//! Helpers shared by unit tests and the integration suites under `tests/`.
//!
//! Compiled for tests and behind the `test-support` feature.

pub mod cap_fs {
    //! Capability-scoped filesystem probes for tests.

    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// True when `path` names an existing file or directory.
    ///
    /// Opens the parent through `cap_std` since the crate avoids `std::fs`.
    pub fn path_exists(path: &Path) -> bool {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return false;
        };
        Dir::open_ambient_dir(parent, ambient_authority())
            .is_ok_and(|dir| dir.exists(Path::new(name)))
    }
}

pub mod world;

pub mod clock {
    //! A manually advanced clock for countdown and round tests.

    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock whose `now` only moves when a test advances it.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance(&self, delta: Duration) {
            let delta = match TimeDelta::from_std(delta) {
                Ok(delta) => delta,
                Err(error) => {
                    panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
                }
            };
            *self.lock_clock() += delta;
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock_clock() += TimeDelta::seconds(seconds);
        }

        fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

