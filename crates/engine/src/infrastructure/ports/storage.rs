//! Portal persistence port.

use portal2exit_domain::Portal;

use super::error::StoreError;

#[cfg_attr(test, mockall::automock)]
pub trait PortalStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<Portal>, StoreError>;

    fn save_all(&self, portals: &[Portal]) -> Result<(), StoreError>;
}
