//! Contest rules: the phase store, the photo registry, the vote ledger and the
//! results projection. Handlers stay thin and call into these functions.

pub mod phase;
pub mod photos;
pub mod results;
pub mod votes;
