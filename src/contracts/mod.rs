//! On-chain access to Huma V2 contracts
//!
//! Contract errors are hard failures: an unresolvable pool or contract is a
//! caller configuration problem and is returned as [`crate::Error::NotFound`].

pub mod bindings;
mod pool;
mod receivable;
mod resolver;

pub use pool::{FirstLossCoverPosition, LenderPosition, PoolHelper, PoolOverview};
pub use receivable::{GasOptions, ReceivableHelper};
pub use resolver::{ContractResolver, FirstLossCoverIndex, TrancheKind};
