//! Reservability lookups against the reservation provider.

use std::collections::HashMap;

use crate::error::Result;

/// Local id -> whether a patron can place a reservation right now.
pub type Reservability = HashMap<String, bool>;

/// Batch reservability lookup. One call per set of ids.
pub trait AvailabilityProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_reservable(&self, local_ids: &[String]) -> Result<Reservability>;
}

/// Flag for one id from a batch result. Ids the provider left out are not reservable.
pub fn reservable(map: &Reservability, local_id: &str) -> bool {
    map.get(local_id).copied().unwrap_or(false)
}
