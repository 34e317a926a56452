use crate::fne::P25DataEvent;

/// Trait for consumers of FNE P25 traffic
/// Used by FneDriver for dispatching inbound events
pub trait P25DataHandler: Send + Sync {
    /// Decide whether an event is processed at all
    fn validate(&self, ev: &P25DataEvent) -> bool;

    /// Called for every validated event before `on_data` (optional)
    fn preprocess(&self, _ev: &P25DataEvent) {}

    /// Handle a validated event
    fn on_data(&self, ev: &P25DataEvent);
}

impl<T: P25DataHandler + ?Sized> P25DataHandler for std::sync::Arc<T> {
    fn validate(&self, ev: &P25DataEvent) -> bool {
        (**self).validate(ev)
    }

    fn preprocess(&self, ev: &P25DataEvent) {
        (**self).preprocess(ev)
    }

    fn on_data(&self, ev: &P25DataEvent) {
        (**self).on_data(ev)
    }
}
