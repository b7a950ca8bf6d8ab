//! # Deterministic Proposal Id
//!
//! Computes the canonical proposal id: keccak-256 over the ABI encoding of
//! `(address[], uint256[], bytes[], bytes32)` where the last word is the
//! keccak-256 of the description text. Pure and total; any two parties
//! computing the id from the same payload agree byte-for-byte, which is
//! what lets event-derived and persisted copies of a proposal merge
//! without coordination.
//!
//! Identity is content-addressed: changing one byte of any field, the
//! description text included, yields a different id. Two proposals that do
//! the same thing with different wording are distinct entities.

use gov_types::{Address, Hash, U256};
use sha3::{Digest, Keccak256};

const WORD: usize = 32;

/// Compute keccak-256 of a byte slice.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash the human-readable description text.
#[must_use]
pub fn hash_description(description: &str) -> Hash {
    keccak256(description.as_bytes())
}

/// Compute the canonical proposal id from the immutable fields.
#[must_use]
pub fn hash_proposal(
    targets: &[Address],
    values: &[U256],
    calldatas: &[Vec<u8>],
    description_hash: &Hash,
) -> Hash {
    let targets_enc = encode_address_array(targets);
    let values_enc = encode_u256_array(values);
    let calldatas_enc = encode_bytes_array(calldatas);

    // Tuple head: three offsets into the tail area plus the inline bytes32.
    let head_len = 4 * WORD;
    let mut buf =
        Vec::with_capacity(head_len + targets_enc.len() + values_enc.len() + calldatas_enc.len());
    buf.extend_from_slice(&offset_word(head_len));
    buf.extend_from_slice(&offset_word(head_len + targets_enc.len()));
    buf.extend_from_slice(&offset_word(head_len + targets_enc.len() + values_enc.len()));
    buf.extend_from_slice(description_hash);
    buf.extend_from_slice(&targets_enc);
    buf.extend_from_slice(&values_enc);
    buf.extend_from_slice(&calldatas_enc);

    keccak256(&buf)
}

/// A 32-byte big-endian word holding a small unsigned integer.
fn offset_word(n: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(n as u64).to_be_bytes());
    word
}

/// A 32-byte big-endian word holding a `U256`.
fn u256_word(value: &U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

/// An address left-padded to a full word.
fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address);
    word
}

/// `address[]`: length word, then one padded word per element.
fn encode_address_array(addresses: &[Address]) -> Vec<u8> {
    let mut enc = Vec::with_capacity((1 + addresses.len()) * WORD);
    enc.extend_from_slice(&offset_word(addresses.len()));
    for address in addresses {
        enc.extend_from_slice(&address_word(address));
    }
    enc
}

/// `uint256[]`: length word, then one word per element.
fn encode_u256_array(values: &[U256]) -> Vec<u8> {
    let mut enc = Vec::with_capacity((1 + values.len()) * WORD);
    enc.extend_from_slice(&offset_word(values.len()));
    for value in values {
        enc.extend_from_slice(&u256_word(value));
    }
    enc
}

/// `bytes[]`: length word, per-element offsets (relative to the start of
/// the element area), then each element as a length word plus its data
/// right-padded to a word boundary.
fn encode_bytes_array(items: &[Vec<u8>]) -> Vec<u8> {
    let heads_len = items.len() * WORD;
    let mut tails: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::with_capacity(items.len());

    for item in items {
        offsets.push(heads_len + tails.len());
        tails.extend_from_slice(&offset_word(item.len()));
        tails.extend_from_slice(item);
        // Right-pad the data to a word boundary
        let rem = item.len() % WORD;
        if rem != 0 {
            tails.extend(std::iter::repeat(0u8).take(WORD - rem));
        }
    }

    let mut enc = Vec::with_capacity(WORD + heads_len + tails.len());
    enc.extend_from_slice(&offset_word(items.len()));
    for offset in offsets {
        enc.extend_from_slice(&offset_word(offset));
    }
    enc.extend_from_slice(&tails);
    enc
}
