//! Extension traits

mod amount;
mod depot;
mod result;

pub(crate) use amount::AmountExt as _;
pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
