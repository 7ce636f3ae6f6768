//! Canonical binary block codec.
//!
//! One type byte, then the variant's fixed-width field layout with
//! big-endian integers, then signature and work. The same byte layout feeds
//! the block hash, so the encoding is canonical: equal blocks encode to
//! equal bytes. `serialize_with_sideband` appends the sideband for storage,
//! and a stored block round-trips identically, sideband included.

use lattica_types::{
    Account, Amount, BlockHash, Epoch, Link, Signature, Timestamp,
};
use thiserror::Error;

use crate::sideband::{BlockDetails, BlockSideband};
use crate::{
    Block, BlockType, ChangeBlock, ChangeHashables, OpenBlock, OpenHashables, ReceiveBlock,
    ReceiveHashables, SendBlock, SendHashables, StateBlock, StateHashables,
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BlockCodecError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unknown block type tag: {0}")]
    UnknownBlockType(u8),
    #[error("invalid sideband encoding")]
    InvalidSideband,
    #[error("trailing bytes after block")]
    TrailingBytes,
}

/// Encode a block without its sideband (the signed wire form).
pub fn serialize(block: &Block) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(224);
    write_block(block, &mut bytes);
    bytes
}

/// Decode a block without sideband, rejecting trailing bytes.
pub fn deserialize(bytes: &[u8]) -> Result<Block, BlockCodecError> {
    let mut reader = Reader::new(bytes);
    let block = read_block(&mut reader)?;
    reader.finish()?;
    Ok(block)
}

/// Encode a block followed by its sideband (the storage form).
///
/// # Panics
/// Panics if the block has no sideband attached.
pub fn serialize_with_sideband(block: &Block) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(320);
    write_block(block, &mut bytes);
    write_sideband(block.sideband(), &mut bytes);
    bytes
}

/// Decode a block and its sideband from the storage form.
pub fn deserialize_with_sideband(bytes: &[u8]) -> Result<Block, BlockCodecError> {
    let mut reader = Reader::new(bytes);
    let mut block = read_block(&mut reader)?;
    let sideband = read_sideband(&mut reader)?;
    reader.finish()?;
    block.sideband_set(sideband);
    Ok(block)
}

fn write_block(block: &Block, out: &mut Vec<u8>) {
    out.push(block.block_type().as_u8());
    match block {
        Block::Send(b) => {
            out.extend_from_slice(b.hashables.previous.as_bytes());
            out.extend_from_slice(b.hashables.destination.as_bytes());
            out.extend_from_slice(&b.hashables.balance.to_be_bytes());
            out.extend_from_slice(b.signature.as_bytes());
            out.extend_from_slice(&b.work.to_be_bytes());
        }
        Block::Receive(b) => {
            out.extend_from_slice(b.hashables.previous.as_bytes());
            out.extend_from_slice(b.hashables.source.as_bytes());
            out.extend_from_slice(b.signature.as_bytes());
            out.extend_from_slice(&b.work.to_be_bytes());
        }
        Block::Open(b) => {
            out.extend_from_slice(b.hashables.source.as_bytes());
            out.extend_from_slice(b.hashables.representative.as_bytes());
            out.extend_from_slice(b.hashables.account.as_bytes());
            out.extend_from_slice(b.signature.as_bytes());
            out.extend_from_slice(&b.work.to_be_bytes());
        }
        Block::Change(b) => {
            out.extend_from_slice(b.hashables.previous.as_bytes());
            out.extend_from_slice(b.hashables.representative.as_bytes());
            out.extend_from_slice(b.signature.as_bytes());
            out.extend_from_slice(&b.work.to_be_bytes());
        }
        Block::State(b) => {
            out.extend_from_slice(b.hashables.account.as_bytes());
            out.extend_from_slice(b.hashables.previous.as_bytes());
            out.extend_from_slice(b.hashables.representative.as_bytes());
            out.extend_from_slice(&b.hashables.balance.to_be_bytes());
            out.extend_from_slice(b.hashables.link.as_bytes());
            out.extend_from_slice(b.signature.as_bytes());
            out.extend_from_slice(&b.work.to_be_bytes());
        }
    }
}

fn read_block(reader: &mut Reader<'_>) -> Result<Block, BlockCodecError> {
    let tag = reader.take_u8()?;
    let block_type =
        BlockType::from_u8(tag).ok_or(BlockCodecError::UnknownBlockType(tag))?;
    let block = match block_type {
        BlockType::Send => {
            let hashables = SendHashables {
                previous: BlockHash::new(reader.take_32()?),
                destination: Account::new(reader.take_32()?),
                balance: Amount::from_be_bytes(reader.take_16()?),
            };
            let signature = Signature(reader.take_64()?);
            let work = reader.take_u64()?;
            Block::Send(SendBlock::new(hashables, signature, work))
        }
        BlockType::Receive => {
            let hashables = ReceiveHashables {
                previous: BlockHash::new(reader.take_32()?),
                source: BlockHash::new(reader.take_32()?),
            };
            let signature = Signature(reader.take_64()?);
            let work = reader.take_u64()?;
            Block::Receive(ReceiveBlock::new(hashables, signature, work))
        }
        BlockType::Open => {
            let hashables = OpenHashables {
                source: BlockHash::new(reader.take_32()?),
                representative: Account::new(reader.take_32()?),
                account: Account::new(reader.take_32()?),
            };
            let signature = Signature(reader.take_64()?);
            let work = reader.take_u64()?;
            Block::Open(OpenBlock::new(hashables, signature, work))
        }
        BlockType::Change => {
            let hashables = ChangeHashables {
                previous: BlockHash::new(reader.take_32()?),
                representative: Account::new(reader.take_32()?),
            };
            let signature = Signature(reader.take_64()?);
            let work = reader.take_u64()?;
            Block::Change(ChangeBlock::new(hashables, signature, work))
        }
        BlockType::State => {
            let hashables = StateHashables {
                account: Account::new(reader.take_32()?),
                previous: BlockHash::new(reader.take_32()?),
                representative: Account::new(reader.take_32()?),
                balance: Amount::from_be_bytes(reader.take_16()?),
                link: Link::new(reader.take_32()?),
            };
            let signature = Signature(reader.take_64()?);
            let work = reader.take_u64()?;
            Block::State(StateBlock::new(hashables, signature, work))
        }
    };
    Ok(block)
}

fn write_sideband(sideband: &BlockSideband, out: &mut Vec<u8>) {
    out.extend_from_slice(sideband.account.as_bytes());
    out.extend_from_slice(sideband.successor.as_bytes());
    out.extend_from_slice(&sideband.balance.to_be_bytes());
    out.extend_from_slice(&sideband.height.to_be_bytes());
    out.extend_from_slice(&sideband.timestamp.as_secs().to_be_bytes());
    out.push(sideband.details.epoch.as_u8());
    out.push(sideband.details.pack_flags());
    out.push(sideband.source_epoch.as_u8());
}

fn read_sideband(reader: &mut Reader<'_>) -> Result<BlockSideband, BlockCodecError> {
    let account = Account::new(reader.take_32()?);
    let successor = BlockHash::new(reader.take_32()?);
    let balance = Amount::from_be_bytes(reader.take_16()?);
    let height = reader.take_u64()?;
    let timestamp = Timestamp::new(reader.take_u64()?);
    let epoch_byte = reader.take_u8()?;
    let flags = reader.take_u8()?;
    let details =
        BlockDetails::unpack(epoch_byte, flags).ok_or(BlockCodecError::InvalidSideband)?;
    let source_epoch =
        Epoch::from_u8(reader.take_u8()?).ok_or(BlockCodecError::InvalidSideband)?;
    Ok(BlockSideband {
        height,
        timestamp,
        successor,
        account,
        balance,
        details,
        source_epoch,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], BlockCodecError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(BlockCodecError::UnexpectedEnd)?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8, BlockCodecError> {
        Ok(self.take(1)?[0])
    }

    fn take_16(&mut self) -> Result<[u8; 16], BlockCodecError> {
        let mut out = [0u8; 16];
        out.copy_from_slice(self.take(16)?);
        Ok(out)
    }

    fn take_32(&mut self) -> Result<[u8; 32], BlockCodecError> {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.take(32)?);
        Ok(out)
    }

    fn take_64(&mut self) -> Result<[u8; 64], BlockCodecError> {
        let mut out = [0u8; 64];
        out.copy_from_slice(self.take(64)?);
        Ok(out)
    }

    fn take_u64(&mut self) -> Result<u64, BlockCodecError> {
        let mut out = [0u8; 8];
        out.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(out))
    }

    fn finish(&self) -> Result<(), BlockCodecError> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(BlockCodecError::TrailingBytes)
        }
    }
}
