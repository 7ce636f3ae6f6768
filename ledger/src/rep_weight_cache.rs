//! In-memory voting weight per representative.
//!
//! The cache mirrors the `rep_weight` table exactly. Readers never touch the
//! store; writers adjust both under the ledger's write transaction.

use std::collections::HashMap;
use std::sync::RwLock;

use lattica_types::{Account, Amount};

pub struct RepWeightCache {
    weights: RwLock<HashMap<Account, Amount>>,
}

impl RepWeightCache {
    pub fn new() -> Self {
        Self {
            weights: RwLock::new(HashMap::new()),
        }
    }

    /// Voting weight delegated to `representative`, zero if none.
    pub fn weight(&self, representative: &Account) -> Amount {
        self.weights
            .read()
            .unwrap()
            .get(representative)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Number of representatives holding a non-zero weight.
    pub fn len(&self) -> usize {
        self.weights.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A point-in-time copy of every weight entry.
    pub fn snapshot(&self) -> HashMap<Account, Amount> {
        self.weights.read().unwrap().clone()
    }

    pub(crate) fn credit(&self, representative: &Account, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        let mut weights = self.weights.write().unwrap();
        let entry = weights.entry(*representative).or_insert(Amount::ZERO);
        *entry = entry
            .checked_add(amount)
            .unwrap_or_else(|| panic!("weight overflow for representative {representative}"));
    }

    pub(crate) fn debit(&self, representative: &Account, amount: Amount) {
        if amount.is_zero() {
            return;
        }
        let mut weights = self.weights.write().unwrap();
        let entry = weights
            .get_mut(representative)
            .unwrap_or_else(|| panic!("weight underflow for representative {representative}"));
        *entry = entry
            .checked_sub(amount)
            .unwrap_or_else(|| panic!("weight underflow for representative {representative}"));
        if entry.is_zero() {
            weights.remove(representative);
        }
    }

    pub(crate) fn copy_from(&self, weights: HashMap<Account, Amount>) {
        *self.weights.write().unwrap() = weights;
    }
}

impl Default for RepWeightCache {
    fn default() -> Self {
        Self::new()
    }
}
