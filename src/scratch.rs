// This module produces the collision-resistant scratch paths the binary emitter writes
// its intermediate artifacts to. A single process-wide StdRng is seeded from OS entropy
// on first use and lives for the process lifetime; draws go through a mutex so concurrent
// pipeline invocations never race the generator state. Each binary emission takes one
// fresh 64-bit identifier and derives a sibling pair of paths from it, <tmp>/<id>.o and
// <tmp>/<id>.hsaco, so the object file and the linked image always correspond 1:1. The
// pipeline never deletes these files; cleanup belongs to the caller or the OS.

//! Unique identifiers and scratch file paths for intermediate artifacts.

use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

static RNG: OnceLock<Mutex<StdRng>> = OnceLock::new();

/// Draw a fresh pseudorandom 64-bit identifier.
///
/// Distinct calls within a process return independent values; across process
/// restarts the generator is reseeded from OS entropy.
pub fn next_unique_id() -> u64 {
    let rng = RNG.get_or_init(|| Mutex::new(StdRng::from_entropy()));
    rng.lock().expect("scratch id generator poisoned").gen()
}

/// The `.o`/`.hsaco` path pair for one binary emission, sharing one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchPaths {
    pub object: PathBuf,
    pub hsaco: PathBuf,
}

impl ScratchPaths {
    /// Derive a new pair under the system temp directory from a fresh identifier.
    pub fn fresh() -> Self {
        let base = env::temp_dir().join(next_unique_id().to_string());
        Self {
            object: base.with_extension("o"),
            hsaco: base.with_extension("hsaco"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn sequential_ids_are_distinct() {
        let a = next_unique_id();
        let b = next_unique_id();
        assert_ne!(a, b);
    }

    #[test]
    fn concurrent_draws_never_collide() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..64).map(|_| next_unique_id()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate identifier {id}");
            }
        }
    }

    #[test]
    fn scratch_pair_shares_one_basename() {
        let paths = ScratchPaths::fresh();
        assert_eq!(paths.object.extension().unwrap(), "o");
        assert_eq!(paths.hsaco.extension().unwrap(), "hsaco");
        assert_eq!(paths.object.file_stem(), paths.hsaco.file_stem());
    }

    #[test]
    fn fresh_pairs_differ() {
        let first = ScratchPaths::fresh();
        let second = ScratchPaths::fresh();
        assert_ne!(first.object, second.object);
        assert_ne!(first.hsaco, second.hsaco);
    }
}
