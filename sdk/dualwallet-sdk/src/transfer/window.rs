use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

/// A recent blockhash and the last block height at which it is accepted.
///
/// Not `Clone`: one window belongs to one attempt and is
/// consumed by [`bind`](Self::bind).
#[derive(Debug, PartialEq, Eq)]
pub struct BlockhashWindow {
    blockhash: Hash,
    last_valid_block_height: u64,
}

impl BlockhashWindow {
    pub fn new(blockhash: Hash, last_valid_block_height: u64) -> Self {
        Self {
            blockhash,
            last_valid_block_height,
        }
    }

    pub fn blockhash(&self) -> &Hash {
        &self.blockhash
    }

    pub fn last_valid_block_height(&self) -> u64 {
        self.last_valid_block_height
    }

    /// Build the unsigned transaction anchored to this window.
    pub fn bind(self, instruction: Instruction, fee_payer: &Pubkey) -> BoundTransaction {
        let message = Message::new_with_blockhash(&[instruction], Some(fee_payer), &self.blockhash);
        BoundTransaction {
            transaction: Transaction::new_unsigned(message),
            last_valid_block_height: self.last_valid_block_height,
        }
    }
}

/// Unsigned transaction plus the deadline inherited from its window.
#[derive(Debug)]
pub struct BoundTransaction {
    pub transaction: Transaction,
    pub last_valid_block_height: u64,
}
