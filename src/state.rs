use crate::{db::BookingStore, relay::RelayClient};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no database is configured.
    pub store: Option<BookingStore>,
    pub relay: RelayClient,
    pub business_name: String,
}

impl AppState {
    pub fn store(&self) -> Option<&BookingStore> {
        self.store.as_ref()
    }
}
