mod blacklist;
mod whitelist;

pub use blacklist::{BlacklistHit, BlacklistPolicy, BlacklistTier, Candidates};
pub use whitelist::{is_whitelisted, WhitelistMatcher};
