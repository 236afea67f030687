use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

use crate::error::AppError;

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub booking_operations_total: IntCounterVec,
    pub booking_conflicts_total: IntCounter,
    pub availability_search_latency_seconds: Histogram,
    pub vehicles_registered: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let booking_operations_total = IntCounterVec::new(
            Opts::new(
                "booking_operations_total",
                "Booking operations by operation and outcome",
            ),
            &["operation", "outcome"],
        )
        .expect("valid booking_operations_total metric");

        let booking_conflicts_total = IntCounter::new(
            "booking_conflicts_total",
            "Bookings rejected because the vehicle was already booked",
        )
        .expect("valid booking_conflicts_total metric");

        let availability_search_latency_seconds = Histogram::with_opts(HistogramOpts::new(
            "availability_search_latency_seconds",
            "Latency of availability searches in seconds",
        ))
        .expect("valid availability_search_latency_seconds metric");

        let vehicles_registered =
            IntGauge::new("vehicles_registered", "Number of vehicles registered")
                .expect("valid vehicles_registered metric");

        registry
            .register(Box::new(booking_operations_total.clone()))
            .expect("register booking_operations_total");
        registry
            .register(Box::new(booking_conflicts_total.clone()))
            .expect("register booking_conflicts_total");
        registry
            .register(Box::new(availability_search_latency_seconds.clone()))
            .expect("register availability_search_latency_seconds");
        registry
            .register(Box::new(vehicles_registered.clone()))
            .expect("register vehicles_registered");

        Self {
            registry,
            booking_operations_total,
            booking_conflicts_total,
            availability_search_latency_seconds,
            vehicles_registered,
        }
    }

    pub fn observe_booking<T>(&self, operation: &str, result: &Result<T, AppError>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(AppError::BadRequest(_)) => "bad_request",
            Err(AppError::NotFound(_)) => "not_found",
            Err(AppError::Conflict(_)) => "conflict",
            Err(AppError::InvalidState(_)) => "invalid_state",
            Err(AppError::Internal(_)) => "error",
        };

        self.booking_operations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Metrics;
    use crate::error::AppError;

    #[test]
    fn outcomes_are_labelled_by_error_kind() {
        let metrics = Metrics::new();
        metrics.observe_booking("create", &Ok::<(), AppError>(()));
        metrics.observe_booking::<()>("create", &Err(AppError::Conflict("taken".to_string())));
        metrics.observe_booking::<()>("create", &Err(AppError::Conflict("taken".to_string())));

        let counter = |outcome: &str| {
            metrics
                .booking_operations_total
                .with_label_values(&["create", outcome])
                .get()
        };
        assert_eq!(counter("success"), 1);
        assert_eq!(counter("conflict"), 2);

        let text = metrics.encode().unwrap();
        assert!(text.contains("booking_operations_total"));
    }
}
