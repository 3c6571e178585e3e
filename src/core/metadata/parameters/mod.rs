/// Metadata supplied by the wallet to the protocol engine.
pub mod wallet;
