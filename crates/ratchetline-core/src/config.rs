//! Chain configuration

/// Default maximum lookahead of a receiving chain.
pub const DEFAULT_MAX_SKIP: u32 = 1000;

/// Configuration for a [`ReceivingChain`](crate::ReceivingChain).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConfig {
    /// Maximum number of keys a single request may skip past the current
    /// counter. Every skipped key is cached for the lifetime of the chain,
    /// so this bounds the memory one hostile counter can cost.
    pub max_skip: u32,
}

impl ChainConfig {
    /// Configuration with an explicit lookahead bound.
    pub fn with_max_skip(max_skip: u32) -> Self {
        Self { max_skip }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self { max_skip: DEFAULT_MAX_SKIP }
    }
}
