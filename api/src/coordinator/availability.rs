use crate::configuration::{BackendKind, Settings};

/// Whether the configured backend can take submissions at all. Computed once
/// at start-up; the coordinator never checks again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

pub fn check_availability(settings: &Settings) -> Availability {
    let relay = &settings.email_relay;

    let missing = match settings.database.backend {
        BackendKind::Mock => None,
        BackendKind::DocumentStore if settings.database.table_name.trim().is_empty() => {
            Some("no document store table is configured")
        }
        BackendKind::DocumentStore if settings.database.use_local
            && settings.database.local_endpoint.trim().is_empty() =>
        {
            Some("a local document store was requested without an endpoint")
        }
        BackendKind::DocumentStore => None,
        BackendKind::RelayOnly if relay.base_url.trim().is_empty() => {
            Some("no email relay base url is configured")
        }
        BackendKind::RelayOnly
            if relay.newsletter_endpoint.trim().is_empty()
                || relay.contact_endpoint.trim().is_empty() =>
        {
            Some("an email relay endpoint is not configured")
        }
        BackendKind::RelayOnly => None,
    };

    match missing {
        Some(reason) => Availability::Unavailable(reason.to_string()),
        None => Availability::Available,
    }
}
