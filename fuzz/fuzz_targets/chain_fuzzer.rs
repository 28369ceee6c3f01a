//! Fuzz target for sending and receiving chains
//!
//! Drives a sender and a receiver built from the same root key through
//! arbitrary encrypt, deliver, tamper and lookahead sequences.
//!
//! # Invariants
//!
//! - Root key import accepts any length (HMAC keys are unbounded)
//! - Chains never panic
//! - Every delivered message decrypts to its plaintext, in any order
//! - Corrupted ciphertext or a wrong counter fails decryption
//! - The receiver cache always holds exactly `counter` keys
//! - A rejected lookahead leaves the receiver unchanged

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ratchetline_core::{ChainConfig, RatchetError, ReceivingChain, SendingChain};
use ratchetline_crypto::RustCryptoProvider;

#[derive(Debug, Clone, Arbitrary)]
struct ChainScenario {
    /// Shared root key (variable length)
    root_key: Vec<u8>,
    /// Receiver lookahead bound (kept small so cases stay fast)
    max_skip: u8,
    /// Operations to perform
    operations: Vec<ChainOperation>,
}

#[derive(Debug, Clone, Arbitrary)]
enum ChainOperation {
    /// Encrypt and hold the message for later delivery
    Encrypt { message: Vec<u8> },
    /// Deliver a held message (index wraps)
    Deliver { index: u16 },
    /// Deliver a held message with one byte flipped
    Tamper { index: u16, position: u16 },
    /// Deliver a held message at the wrong counter
    Misdeliver { index: u16, offset: u8 },
    /// Request a key directly
    GetKey { counter: u16 },
}

fuzz_target!(|scenario: ChainScenario| {
    let provider = RustCryptoProvider::new();
    let config = ChainConfig::with_max_skip(u32::from(scenario.max_skip));

    let Ok(mut sender) = SendingChain::from_secret(provider, &scenario.root_key) else {
        return;
    };
    let mut receiver = ReceivingChain::from_secret(provider, &scenario.root_key, config)
        .expect("receiver import must succeed where sender import did");

    let mut held: Vec<(Vec<u8>, Vec<u8>, u32)> = Vec::new();

    for op in scenario.operations {
        match op {
            ChainOperation::Encrypt { message } => {
                let expected_counter = sender.counter();
                let sealed = sender.encrypt(&message).expect("encrypt must succeed");
                assert_eq!(sealed.counter, expected_counter);
                assert_eq!(sender.counter(), expected_counter + 1);
                held.push((message, sealed.payload, sealed.counter));
            },

            ChainOperation::Deliver { index } => {
                let Some((plaintext, ciphertext, counter)) = pick(&held, index) else {
                    continue;
                };
                match receiver.decrypt(ciphertext, *counter) {
                    Ok(opened) => assert_eq!(&opened.payload, plaintext),
                    Err(RatchetError::SkippedMessageLimitExceeded { .. }) => {},
                    Err(err) => panic!("valid message failed to decrypt: {err}"),
                }
            },

            ChainOperation::Tamper { index, position } => {
                let Some((_, ciphertext, counter)) = pick(&held, index) else {
                    continue;
                };
                let mut corrupted = ciphertext.clone();
                let position = usize::from(position) % corrupted.len();
                corrupted[position] ^= 0x01;

                let result = receiver.decrypt(&corrupted, *counter);
                assert!(result.is_err(), "corrupted ciphertext must fail decryption");
            },

            ChainOperation::Misdeliver { index, offset } => {
                let Some((_, ciphertext, counter)) = pick(&held, index) else {
                    continue;
                };
                let wrong = counter.wrapping_add(u32::from(offset) + 1);

                let result = receiver.decrypt(ciphertext, wrong);
                assert!(result.is_err(), "wrong counter must fail decryption");
            },

            ChainOperation::GetKey { counter } => {
                let before = receiver.counter();
                match receiver.get_key(u32::from(counter)) {
                    Ok(key) => assert_eq!(key.counter(), u32::from(counter)),
                    Err(RatchetError::SkippedMessageLimitExceeded { .. }) => {
                        assert_eq!(receiver.counter(), before, "rejected lookahead must not advance");
                    },
                    Err(err) => panic!("unexpected get_key error: {err}"),
                }
            },
        }

        assert_eq!(receiver.cached_keys(), receiver.counter() as usize);
    }
});

fn pick(held: &[(Vec<u8>, Vec<u8>, u32)], index: u16) -> Option<&(Vec<u8>, Vec<u8>, u32)> {
    if held.is_empty() {
        return None;
    }
    held.get(usize::from(index) % held.len())
}
