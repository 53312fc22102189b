use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: reservations committed. Labels: none.
pub const RESERVATIONS_CREATED_TOTAL: &str = "reserva_reservations_created_total";

/// Counter: reservations cancelled by their owner.
pub const RESERVATIONS_CANCELLED_TOTAL: &str = "reserva_reservations_cancelled_total";

/// Counter: creates refused because a blocking reservation overlapped.
pub const RESERVATION_CONFLICTS_TOTAL: &str = "reserva_reservation_conflicts_total";

/// Counter: availability listings computed.
pub const AVAILABILITY_QUERIES_TOTAL: &str = "reserva_availability_queries_total";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
