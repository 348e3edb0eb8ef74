use payment_gate::observability::{get_metrics, LatencyTimer, LogConfig, LogFormat, Metrics};

#[test]
fn test_log_config_default() {
    let config = LogConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.include_target);
    assert!(!config.include_file);
    assert!(!config.include_line);
}

#[test]
fn test_log_format_from_str() {
    assert_eq!(LogFormat::from("json"), LogFormat::Json);
    assert_eq!(LogFormat::from("COMPACT"), LogFormat::Compact);
    assert_eq!(LogFormat::from(""), LogFormat::Pretty);
}

#[test]
fn test_latency_timer_is_monotonic() {
    let timer = LatencyTimer::new();
    let first = timer.elapsed_ms();
    let second = timer.elapsed_ms();
    assert!(first >= 0.0);
    assert!(second >= first);
}

#[test]
fn test_global_metrics_is_shared() {
    let a: &Metrics = get_metrics();
    let b: &Metrics = get_metrics();
    assert!(std::ptr::eq(a, b));
}
