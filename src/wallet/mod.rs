//! Chain access handles
//!
//! Contract helpers accept either a read-only provider or a signer. A read
//! provider can always be recovered from either; only the signer variant can
//! submit transactions.

mod signer;

pub use signer::SecureWallet;

use crate::{Error, Result};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};

/// A provider that signs transactions as `address`
#[derive(Debug, Clone)]
pub struct SigningProvider<P> {
    provider: P,
    address: Address,
}

impl<P: Provider + Clone> SigningProvider<P> {
    /// Pair a wallet-filled provider with the address it signs for
    pub fn new(provider: P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Sender address of submitted transactions
    pub fn address(&self) -> Address {
        self.address
    }
}

/// Either a read-only provider or a signer
#[derive(Debug, Clone)]
pub enum ChainAccess<P> {
    Provider(P),
    Signer(SigningProvider<P>),
}

impl<P: Provider + Clone> ChainAccess<P> {
    /// Provider for read calls, available for both variants
    pub fn read_provider(&self) -> &P {
        match self {
            ChainAccess::Provider(provider) => provider,
            ChainAccess::Signer(signer) => signer.provider(),
        }
    }

    /// Signing capability, only present when a signer was supplied
    pub fn signer(&self) -> Option<&SigningProvider<P>> {
        match self {
            ChainAccess::Provider(_) => None,
            ChainAccess::Signer(signer) => Some(signer),
        }
    }
}

impl<P> From<SigningProvider<P>> for ChainAccess<P> {
    fn from(signer: SigningProvider<P>) -> Self {
        ChainAccess::Signer(signer)
    }
}

/// Read-only HTTP provider for an RPC URL
pub fn read_only_provider(rpc_url: &str) -> Result<DynProvider> {
    let url: url::Url = rpc_url
        .parse()
        .map_err(|e| Error::Config(format!("Invalid RPC URL: {}", e)))?;

    Ok(ProviderBuilder::new().connect_http(url).erased())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn test_chain_access_capabilities() {
        let provider = read_only_provider("http://127.0.0.1:8545").unwrap();
        let from = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

        let read = ChainAccess::Provider(provider.clone());
        assert!(read.signer().is_none());

        let signed: ChainAccess<DynProvider> = SigningProvider::new(provider, from).into();
        assert_eq!(signed.signer().map(|s| s.address()), Some(from));
    }

    #[test]
    fn test_read_only_provider_rejects_bad_url() {
        assert!(matches!(
            read_only_provider("::nope::"),
            Err(Error::Config(_))
        ));
    }
}
