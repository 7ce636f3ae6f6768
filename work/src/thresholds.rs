//! Work difficulty per block kind.
//!
//! A work nonce passes when its value (see the generator) is at least the
//! threshold for the block's kind. Operations that cost the signer nothing
//! are priced higher: receives and opens take more work than sends, and
//! epoch markers more still.

/// The shape of a block as far as work pricing is concerned.
///
/// The ledger maps its own block metadata down to this enum, which keeps
/// this crate free of any block representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkBlockKind {
    /// Sends, representative changes, and state blocks doing either.
    Base,
    /// Receives and opens. Priced above base to deter spam.
    ReceiveOrOpen,
    /// Epoch markers. The highest price of all.
    Epoch,
}

const BASE_THRESHOLD: u64 = 0xFFFFFE00_00000000;
const RECEIVE_MULTIPLIER: f64 = 8.0;
const EPOCH_MULTIPLIER: f64 = 64.0;

/// The three difficulty levels, derived from one base value.
///
/// A threshold is a floor in u64 space. Scaling works on the headroom
/// above the floor: `u64::MAX - base` divided by the multiplier gives the
/// derived headroom, so an 8x multiplier leaves an eighth as many passing
/// nonce values.
#[derive(Clone, Debug)]
pub struct WorkThresholds {
    pub base: u64,
    pub receive_multiplier: f64,
    pub epoch_multiplier: f64,
}

fn scale(base: u64, multiplier: f64) -> u64 {
    // base 0 means work checking is disabled for every kind
    if base == 0 {
        return 0;
    }
    let headroom = u64::MAX - base;
    u64::MAX - (headroom as f64 / multiplier) as u64
}

impl WorkThresholds {
    pub fn new() -> Self {
        Self::with_base(BASE_THRESHOLD)
    }

    /// Thresholds derived from a caller-chosen base. Tests and dev networks
    /// lower it; zero disables work checking entirely.
    pub fn with_base(base: u64) -> Self {
        Self {
            base,
            receive_multiplier: RECEIVE_MULTIPLIER,
            epoch_multiplier: EPOCH_MULTIPLIER,
        }
    }

    /// The floor a work value must reach for the given kind.
    pub fn threshold_for(&self, kind: WorkBlockKind) -> u64 {
        match kind {
            WorkBlockKind::Base => self.base,
            WorkBlockKind::ReceiveOrOpen => scale(self.base, self.receive_multiplier),
            WorkBlockKind::Epoch => scale(self.base, self.epoch_multiplier),
        }
    }
}

impl Default for WorkThresholds {
    fn default() -> Self {
        Self::new()
    }
}
