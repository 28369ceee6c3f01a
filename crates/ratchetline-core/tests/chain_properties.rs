//! Property-based tests for sending and receiving chains
//!
//! These verify:
//! - Chains are deterministic for a given root key
//! - Every encrypt advances the counter by exactly one
//! - A receiver decrypts everything the matching sender produced, in any
//!   order
//! - Skipped keys are identical to keys reached in ascending order
//! - Any modified ciphertext is rejected
//! - Requests beyond the lookahead bound change nothing

use proptest::prelude::*;
use ratchetline_core::{ChainConfig, RatchetError, ReceivingChain, SendingChain};
use ratchetline_crypto::RustCryptoProvider;

fn sending(seed: &[u8; 32]) -> SendingChain<RustCryptoProvider> {
    SendingChain::from_secret(RustCryptoProvider::new(), seed).unwrap()
}

fn receiving(seed: &[u8; 32], max_skip: u32) -> ReceivingChain<RustCryptoProvider> {
    let config = ChainConfig::with_max_skip(max_skip);
    ReceivingChain::from_secret(RustCryptoProvider::new(), seed, config).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_chain_is_deterministic(
        seed in prop::array::uniform32(any::<u8>()),
        messages in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..8),
    ) {
        let mut first = sending(&seed);
        let mut second = sending(&seed);

        for message in &messages {
            let a = first.encrypt(message).unwrap();
            let b = second.encrypt(message).unwrap();
            prop_assert_eq!(a.payload, b.payload);
            prop_assert_eq!(a.counter, b.counter);
        }
    }

    #[test]
    fn prop_encrypt_advances_counter_by_one(
        seed in prop::array::uniform32(any::<u8>()),
        count in 1usize..20,
    ) {
        let mut chain = sending(&seed);

        for expected in 0..count as u32 {
            prop_assert_eq!(chain.counter(), expected);
            let message = chain.encrypt(b"payload").unwrap();
            prop_assert_eq!(message.counter, expected);
            prop_assert_eq!(chain.counter(), expected + 1);
        }
    }

    #[test]
    fn prop_receiver_decrypts_any_delivery_order(
        seed in prop::array::uniform32(any::<u8>()),
        order in Just((0u8..12).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut sender = sending(&seed);
        let sealed: Vec<_> = (0u8..12).map(|i| sender.encrypt(&[i; 5]).unwrap()).collect();

        let mut receiver = receiving(&seed, 100);
        for index in order {
            let message = &sealed[index as usize];
            let opened = receiver.decrypt(&message.payload, message.counter).unwrap();
            prop_assert_eq!(opened.payload, vec![index; 5]);
        }

        prop_assert_eq!(receiver.cached_keys(), 12);
        prop_assert_eq!(receiver.counter(), 12);
    }

    #[test]
    fn prop_skipped_keys_match_sequential_keys(
        seed in prop::array::uniform32(any::<u8>()),
        requests in prop::collection::vec(0u32..50, 1..10),
    ) {
        let mut skipping = receiving(&seed, 100);
        let mut sequential = receiving(&seed, 100);

        let highest = requests.iter().copied().max().unwrap_or(0);
        let expected: Vec<_> = (0..=highest).map(|c| sequential.get_key(c).unwrap()).collect();

        for counter in requests {
            let key = skipping.get_key(counter).unwrap();
            prop_assert_eq!(key.counter(), counter);
            prop_assert_eq!(key.key(), expected[counter as usize].key());
            prop_assert_eq!(skipping.cached_keys(), skipping.counter() as usize);
        }
    }

    #[test]
    fn prop_bit_flip_is_rejected(
        seed in prop::array::uniform32(any::<u8>()),
        message in prop::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let mut sender = sending(&seed);
        let mut sealed = sender.encrypt(&message).unwrap();

        let index = position.index(sealed.payload.len());
        sealed.payload[index] ^= 1 << bit;

        let mut receiver = receiving(&seed, 100);
        let result = receiver.decrypt(&sealed.payload, sealed.counter);
        prop_assert!(result.is_err_and(|err| err.is_decryption_failure()));
    }

    #[test]
    fn prop_limit_rejects_without_mutation(
        seed in prop::array::uniform32(any::<u8>()),
        max_skip in 0u32..20,
        reached in 0u32..10,
        excess in 1u32..100,
    ) {
        let mut chain = receiving(&seed, max_skip.max(reached));
        chain.get_key(reached).unwrap();

        let current = chain.counter();
        let cached = chain.cached_keys();
        let requested = current + max_skip.max(reached) + excess;

        let result = chain.get_key(requested);
        let is_limit_error = matches!(
            result,
            Err(RatchetError::SkippedMessageLimitExceeded { requested: r, .. }) if r == requested
        );
        prop_assert!(is_limit_error);
        prop_assert_eq!(chain.counter(), current);
        prop_assert_eq!(chain.cached_keys(), cached);
    }
}
