use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("askcli.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("askcli.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("askcli.client.request_duration_seconds");

pub(crate) static STREAM_LINES: Counter = Counter::new("askcli.stream.lines");
pub(crate) static STREAM_DELTAS: Counter = Counter::new("askcli.stream.deltas");
pub(crate) static STREAM_MALFORMED: Counter = Counter::new("askcli.stream.malformed");
pub(crate) static STREAM_BYTES: Counter = Counter::new("askcli.stream.bytes");
pub(crate) static STREAM_DURATION: Moments = Moments::new("askcli.stream.duration_seconds");

pub(crate) static STORE_SAVES: Counter = Counter::new("askcli.store.saves");
pub(crate) static STORE_LOADS: Counter = Counter::new("askcli.store.loads");
pub(crate) static STORE_ERRORS: Counter = Counter::new("askcli.store.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&STREAM_LINES);
    collector.register_counter(&STREAM_DELTAS);
    collector.register_counter(&STREAM_MALFORMED);
    collector.register_counter(&STREAM_BYTES);
    collector.register_moments(&STREAM_DURATION);

    collector.register_counter(&STORE_SAVES);
    collector.register_counter(&STORE_LOADS);
    collector.register_counter(&STORE_ERRORS);
}
