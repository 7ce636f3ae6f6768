use lattica_store_lmdb::StoreError;
use lattica_types::BlockHash;
use thiserror::Error;

/// Reasons the ledger refuses a block.
///
/// Gap errors mean a dependency has not arrived yet and the block may become
/// valid later; everything else is a permanent rejection for this block.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// The block is already in the ledger, or was pruned after cementing.
    #[error("block already exists")]
    Old,
    /// The signature does not verify against the required signing key.
    #[error("bad signature")]
    BadSignature,
    /// A send declares a balance higher than the account holds.
    #[error("negative spend")]
    NegativeSpend,
    /// A different block already occupies this chain position.
    #[error("fork")]
    Fork,
    /// The referenced send has no matching receivable entry for this account.
    #[error("unreceivable")]
    Unreceivable,
    /// The predecessor block is not in the ledger yet.
    #[error("gap previous")]
    GapPrevious,
    /// The source send is not in the ledger yet.
    #[error("gap source")]
    GapSource,
    /// An epoch block cannot open an account with nothing receivable.
    #[error("gap epoch open pending")]
    GapEpochOpenPending,
    /// The declared balance does not match the computed balance.
    #[error("balance mismatch")]
    BalanceMismatch,
    /// An epoch block tried to change the account representative.
    #[error("representative mismatch")]
    RepresentativeMismatch,
    /// The block type is not allowed at this position in the chain.
    #[error("block position")]
    BlockPosition,
    /// The attached proof of work does not meet the required threshold.
    #[error("insufficient work")]
    InsufficientWork,
    /// The burn account can never be opened.
    #[error("opened burn account")]
    OpenedBurnAccount,
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Reasons a rollback request fails outright.
///
/// Rolling back a cemented block is a caller bug and panics instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RollbackError {
    #[error("block {0} is not in the ledger")]
    BlockNotFound(BlockHash),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
