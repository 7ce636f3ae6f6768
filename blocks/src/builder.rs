//! Fluent block constructors.
//!
//! The builders compute the block hash and signature at `build()` time, so
//! fields can be supplied in any order. A builder never signed produces a
//! zero signature, which is useful for exercising rejection paths.

use lattica_crypto::sign_message;
use lattica_types::{Account, Amount, BlockHash, KeyPair, Link, PrivateKey, Signature};

use crate::{
    Block, ChangeBlock, ChangeHashables, OpenBlock, OpenHashables, ReceiveBlock,
    ReceiveHashables, SendBlock, SendHashables, StateBlock, StateHashables,
};

/// Entry point for constructing blocks of every type.
pub struct BlockBuilder;

impl BlockBuilder {
    pub fn send() -> SendBlockBuilder {
        SendBlockBuilder::default()
    }

    pub fn receive() -> ReceiveBlockBuilder {
        ReceiveBlockBuilder::default()
    }

    pub fn open() -> OpenBlockBuilder {
        OpenBlockBuilder::default()
    }

    pub fn change() -> ChangeBlockBuilder {
        ChangeBlockBuilder::default()
    }

    pub fn state() -> StateBlockBuilder {
        StateBlockBuilder::default()
    }
}

#[derive(Default)]
pub struct SendBlockBuilder {
    hashables: SendHashables,
    work: u64,
    signer: Option<PrivateKey>,
}

impl SendBlockBuilder {
    pub fn previous(mut self, previous: BlockHash) -> Self {
        self.hashables.previous = previous;
        self
    }

    pub fn destination(mut self, destination: Account) -> Self {
        self.hashables.destination = destination;
        self
    }

    pub fn balance(mut self, balance: Amount) -> Self {
        self.hashables.balance = balance;
        self
    }

    pub fn work(mut self, work: u64) -> Self {
        self.work = work;
        self
    }

    pub fn sign(mut self, key: &KeyPair) -> Self {
        self.signer = Some(PrivateKey(key.private.0));
        self
    }

    pub fn build(self) -> Block {
        let mut block = SendBlock::new(self.hashables, Signature::ZERO, self.work);
        if let Some(signer) = &self.signer {
            block.signature = sign_message(block.hash().as_bytes(), signer);
        }
        Block::Send(block)
    }
}

#[derive(Default)]
pub struct ReceiveBlockBuilder {
    hashables: ReceiveHashables,
    work: u64,
    signer: Option<PrivateKey>,
}

impl ReceiveBlockBuilder {
    pub fn previous(mut self, previous: BlockHash) -> Self {
        self.hashables.previous = previous;
        self
    }

    pub fn source(mut self, source: BlockHash) -> Self {
        self.hashables.source = source;
        self
    }

    pub fn work(mut self, work: u64) -> Self {
        self.work = work;
        self
    }

    pub fn sign(mut self, key: &KeyPair) -> Self {
        self.signer = Some(PrivateKey(key.private.0));
        self
    }

    pub fn build(self) -> Block {
        let mut block = ReceiveBlock::new(self.hashables, Signature::ZERO, self.work);
        if let Some(signer) = &self.signer {
            block.signature = sign_message(block.hash().as_bytes(), signer);
        }
        Block::Receive(block)
    }
}

#[derive(Default)]
pub struct OpenBlockBuilder {
    hashables: OpenHashables,
    work: u64,
    signer: Option<PrivateKey>,
}

impl OpenBlockBuilder {
    pub fn source(mut self, source: BlockHash) -> Self {
        self.hashables.source = source;
        self
    }

    pub fn representative(mut self, representative: Account) -> Self {
        self.hashables.representative = representative;
        self
    }

    pub fn account(mut self, account: Account) -> Self {
        self.hashables.account = account;
        self
    }

    pub fn work(mut self, work: u64) -> Self {
        self.work = work;
        self
    }

    pub fn sign(mut self, key: &KeyPair) -> Self {
        self.signer = Some(PrivateKey(key.private.0));
        self
    }

    pub fn build(self) -> Block {
        let mut block = OpenBlock::new(self.hashables, Signature::ZERO, self.work);
        if let Some(signer) = &self.signer {
            block.signature = sign_message(block.hash().as_bytes(), signer);
        }
        Block::Open(block)
    }
}

#[derive(Default)]
pub struct ChangeBlockBuilder {
    hashables: ChangeHashables,
    work: u64,
    signer: Option<PrivateKey>,
}

impl ChangeBlockBuilder {
    pub fn previous(mut self, previous: BlockHash) -> Self {
        self.hashables.previous = previous;
        self
    }

    pub fn representative(mut self, representative: Account) -> Self {
        self.hashables.representative = representative;
        self
    }

    pub fn work(mut self, work: u64) -> Self {
        self.work = work;
        self
    }

    pub fn sign(mut self, key: &KeyPair) -> Self {
        self.signer = Some(PrivateKey(key.private.0));
        self
    }

    pub fn build(self) -> Block {
        let mut block = ChangeBlock::new(self.hashables, Signature::ZERO, self.work);
        if let Some(signer) = &self.signer {
            block.signature = sign_message(block.hash().as_bytes(), signer);
        }
        Block::Change(block)
    }
}

#[derive(Default)]
pub struct StateBlockBuilder {
    hashables: StateHashables,
    work: u64,
    signer: Option<PrivateKey>,
}

impl StateBlockBuilder {
    pub fn account(mut self, account: Account) -> Self {
        self.hashables.account = account;
        self
    }

    pub fn previous(mut self, previous: BlockHash) -> Self {
        self.hashables.previous = previous;
        self
    }

    pub fn representative(mut self, representative: Account) -> Self {
        self.hashables.representative = representative;
        self
    }

    pub fn balance(mut self, balance: Amount) -> Self {
        self.hashables.balance = balance;
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.hashables.link = link;
        self
    }

    pub fn work(mut self, work: u64) -> Self {
        self.work = work;
        self
    }

    pub fn sign(mut self, key: &KeyPair) -> Self {
        self.signer = Some(PrivateKey(key.private.0));
        self
    }

    pub fn build(self) -> Block {
        let mut block = StateBlock::new(self.hashables, Signature::ZERO, self.work);
        if let Some(signer) = &self.signer {
            block.signature = sign_message(block.hash().as_bytes(), signer);
        }
        Block::State(block)
    }
}
