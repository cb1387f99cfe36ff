//! Geocoder port — resolve a postal address to coordinates.

use std::future::Future;

use hubsetup_domain::error::SetupError;
use hubsetup_domain::registration::Location;

/// Address lookup service.
pub trait Geocoder {
    /// One entry per place matching `address`, best match first; `None`
    /// for a place whose coordinates are missing or unusable.
    ///
    /// An unknown address is an empty list, not an error.
    fn lookup(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Vec<Option<Location>>, SetupError>> + Send;
}
