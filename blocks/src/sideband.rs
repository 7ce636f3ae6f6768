//! Sideband metadata attached to blocks accepted into the ledger.

use lattica_types::{Account, Amount, BlockHash, Epoch, Timestamp};

/// How a processed block was classified, fixed at processing time.
///
/// State blocks do not name their operation; the ledger derives it from the
/// balance change and link, then records the result here so later passes
/// (rollback, confirmation, pruning) never re-derive it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockDetails {
    /// Epoch the account chain is in as of this block.
    pub epoch: Epoch,
    pub is_send: bool,
    pub is_receive: bool,
    pub is_epoch: bool,
}

impl BlockDetails {
    pub fn new(epoch: Epoch, is_send: bool, is_receive: bool, is_epoch: bool) -> Self {
        Self {
            epoch,
            is_send,
            is_receive,
            is_epoch,
        }
    }

    pub(crate) fn pack_flags(&self) -> u8 {
        let mut flags = 0u8;
        if self.is_send {
            flags |= 1;
        }
        if self.is_receive {
            flags |= 1 << 1;
        }
        if self.is_epoch {
            flags |= 1 << 2;
        }
        flags
    }

    pub(crate) fn unpack(epoch_byte: u8, flags: u8) -> Option<Self> {
        if flags & !0b111 != 0 {
            return None;
        }
        Some(Self {
            epoch: Epoch::from_u8(epoch_byte)?,
            is_send: flags & 1 != 0,
            is_receive: flags & (1 << 1) != 0,
            is_epoch: flags & (1 << 2) != 0,
        })
    }
}

/// Metadata the ledger derives when accepting a block.
///
/// Stored alongside the block but never hashed or signed: recomputable in
/// principle by replaying the chain, kept so single-block reads are cheap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSideband {
    /// Height of this block in its account chain (the open block is 1).
    pub height: u64,
    /// When this node processed the block (local observation).
    pub timestamp: Timestamp,
    /// Hash of the next block in the chain; zero while this is the frontier.
    pub successor: BlockHash,
    /// Account whose chain the block belongs to.
    pub account: Account,
    /// Account balance as of this block.
    pub balance: Amount,
    pub details: BlockDetails,
    /// For receives, the epoch of the consumed receivable entry; `Epoch0`
    /// otherwise.
    pub source_epoch: Epoch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_flags_roundtrip() {
        for is_send in [false, true] {
            for is_receive in [false, true] {
                for is_epoch in [false, true] {
                    let details = BlockDetails::new(Epoch::Epoch1, is_send, is_receive, is_epoch);
                    let unpacked =
                        BlockDetails::unpack(details.epoch.as_u8(), details.pack_flags()).unwrap();
                    assert_eq!(unpacked, details);
                }
            }
        }
    }

    #[test]
    fn unpack_rejects_unknown_bits() {
        assert_eq!(BlockDetails::unpack(Epoch::Epoch0.as_u8(), 0b1000), None);
        assert_eq!(BlockDetails::unpack(200, 0), None);
    }
}
