//! Work generation on the local CPU.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use lattica_types::Root;

use crate::validator::work_value;
use crate::{WorkError, WorkNonce};

/// Nonces tried between checks of the shared found flag.
const BATCH: u64 = 4096;

/// Searches the nonce space with every core rayon will give it.
pub struct WorkGenerator;

impl WorkGenerator {
    /// Find a nonce whose work value reaches `min_difficulty` for `root`.
    ///
    /// Each worker walks its own stripe of the nonce space (worker `i`
    /// takes nonces `i`, `i + n`, `i + 2n`, ...), so no two workers hash
    /// the same nonce. The first hit is published through an atomic and
    /// stops the rest at their next batch boundary.
    pub fn generate(&self, root: &Root, min_difficulty: u64) -> Result<WorkNonce, WorkError> {
        if min_difficulty == 0 {
            return Ok(WorkNonce(0));
        }

        let workers = rayon::current_num_threads().max(1) as u64;
        let winner = AtomicU64::new(u64::MAX);

        (0..workers).into_par_iter().for_each(|stripe| {
            let mut nonce = stripe;
            'search: loop {
                for _ in 0..BATCH {
                    if work_value(root, nonce) >= min_difficulty {
                        winner.store(nonce, Ordering::Relaxed);
                        break 'search;
                    }
                    nonce = nonce.wrapping_add(workers);
                }
                if winner.load(Ordering::Relaxed) != u64::MAX {
                    break;
                }
            }
        });

        match winner.load(Ordering::Relaxed) {
            u64::MAX => Err(WorkError::Cancelled),
            nonce => Ok(WorkNonce(nonce)),
        }
    }
}
