//! Integration tests for the MonitorService tick pipeline.
//!
//! Drives full ticks against the mock board, display and telemetry and
//! checks what reaches each output.

use crate::mock_hw::{DisplayCall, Journal, LogSink, MockBoard, MockDisplay, MockTelemetry, Step};

use pt100_monitor::app::events::AppEvent;
use pt100_monitor::app::service::MonitorService;
use pt100_monitor::calibration::RangeStatus;
use pt100_monitor::config::{MonitorConfig, MQTT_TOPIC_STATUS, MQTT_TOPIC_TEMPERATURE, TEMP_OFFSET_C};
use pt100_monitor::display_mode::DisplayMode;
use pt100_monitor::error::SensorFault;
use pt100_monitor::shared::SharedState;

struct Rig {
    board: MockBoard,
    display: MockDisplay,
    telemetry: MockTelemetry,
    sink: LogSink,
}

impl Rig {
    fn new(script: &[Result<f32, SensorFault>]) -> Self {
        Self {
            board: MockBoard::new(script),
            display: MockDisplay::new(),
            telemetry: MockTelemetry::default(),
            sink: LogSink::new(),
        }
    }

    fn tick(&mut self, svc: &mut MonitorService<'_>) -> pt100_monitor::app::service::TickReport {
        svc.tick(&mut self.board, &mut self.display, &mut self.telemetry, &mut self.sink)
    }
}

// ── Scenario A: in-band reading ───────────────────────────────

#[test]
fn in_band_reading_shows_current_and_clears_alert() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0)]);

    let report = rig.tick(&mut svc);

    assert_eq!(report.status, RangeStatus::Ok);
    assert!(!report.alert_active);
    assert!(!rig.board.alert_on());
    assert_eq!(report.mode, DisplayMode::Current);
    assert_eq!(rig.display.screen(), vec!["Temp. PT100", "Atual: 4.30C", "OK"]);
}

#[test]
fn frame_is_drawn_at_fixed_positions_then_flushed() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0)]);
    rig.tick(&mut svc);

    let positions: Vec<(i32, i32, bool)> = rig
        .display
        .calls
        .iter()
        .filter_map(|c| match c {
            DisplayCall::Text { x, y, inverted, .. } => Some((*x, *y, *inverted)),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![(10, 10, false), (22, 30, false), (30, 50, false)]);
    assert_eq!(rig.display.calls.first(), Some(&DisplayCall::Clear));
    assert_eq!(rig.display.calls.last(), Some(&DisplayCall::Flush));
}

// ── Scenario B: band edges ────────────────────────────────────

#[test]
fn offset_keeps_zero_raw_in_band_and_half_below_out() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(0.0), Ok(-0.5)]);

    let first = rig.tick(&mut svc);
    assert_eq!(first.status, RangeStatus::Ok);
    assert!(!first.alert_active);

    let second = rig.tick(&mut svc);
    assert_eq!(second.status, RangeStatus::BelowIdeal);
    assert!(second.alert_active);
    assert!(rig.board.alert_on());
    assert_eq!(second.frame.line3.as_str(), "ABAIXO");
}

#[test]
fn above_band_raises_alert() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(25.0)]);

    let report = rig.tick(&mut svc);
    assert_eq!(report.status, RangeStatus::AboveIdeal);
    assert_eq!(report.frame.line3.as_str(), "ACIMA");
    assert!(rig.board.alert_on());
}

// ── Scenario C: fault after two valid ticks ───────────────────

#[test]
fn fault_tick_keeps_extremes_and_shows_failure() {
    let shared = SharedState::new();
    shared.link.set(true);
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0), Ok(4.7), Err(SensorFault::Rtd(0x80))]);

    rig.tick(&mut svc);
    rig.tick(&mut svc);
    let before = svc.extremes().unwrap();
    rig.telemetry.sent.clear();

    let report = rig.tick(&mut svc);

    assert_eq!(svc.extremes(), Some(before));
    assert_eq!(before.max_c, 10.0 + TEMP_OFFSET_C);
    assert!((before.min_c - (-1.0)).abs() < 1e-4);
    assert_eq!(report.status, RangeStatus::SensorError);
    assert_eq!(report.frame.line2.as_str(), "Falha Leitura");
    assert_eq!(report.frame.line3.as_str(), "ERRO");
    assert!(report.alert_active);
    assert!(!report.published);
    assert!(rig.telemetry.sent.is_empty());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SensorFault(SensorFault::Rtd(0x80)))),
        1
    );
}

#[test]
fn fault_before_any_valid_reading_leaves_extremes_empty() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Err(SensorFault::Bus)]);
    shared.mode.advance();

    let report = rig.tick(&mut svc);

    assert_eq!(svc.extremes(), None);
    assert_eq!(report.frame.line2.as_str(), "Falha Leitura");
}

// ── Scenario D: mode cycling ──────────────────────────────────

#[test]
fn three_advances_return_to_current_formatting() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0)]);

    for _ in 0..3 {
        shared.mode.advance();
    }
    let report = rig.tick(&mut svc);

    assert_eq!(report.mode, DisplayMode::Current);
    assert_eq!(report.frame.line2.as_str(), "Atual: 4.30C");
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::ModeChanged { .. })), 0);
}

#[test]
fn max_and_min_modes_show_tracked_extremes() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0), Ok(4.7), Ok(6.0)]);

    rig.tick(&mut svc);
    rig.tick(&mut svc);
    shared.mode.advance();
    let max = rig.tick(&mut svc);
    assert_eq!(max.mode, DisplayMode::Max);
    assert_eq!(max.frame.line2.as_str(), "Max: 4.30C");

    shared.mode.advance();
    let min = rig.tick(&mut svc);
    assert_eq!(min.mode, DisplayMode::Min);
    assert_eq!(min.frame.line2.as_str(), "Min: -1.00C");

    assert_eq!(
        rig.sink.events.iter().filter(|e| matches!(e, AppEvent::ModeChanged { .. })).count(),
        2
    );
}

#[test]
fn extreme_set_this_tick_is_shown_on_the_same_tick() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0), Ok(4.0)]);

    shared.mode.advance();
    let first = rig.tick(&mut svc);
    assert_eq!(first.mode, DisplayMode::Max);
    assert_eq!(first.frame.line2.as_str(), "Max: 4.30C");
    assert_eq!(rig.display.screen()[1], "Max: 4.30C");
    assert_eq!(rig.board.alert_writes, vec![false]);

    shared.mode.advance();
    let second = rig.tick(&mut svc);
    assert_eq!(second.mode, DisplayMode::Min);
    assert_eq!(second.frame.line2.as_str(), "Min: -1.70C");
}

// ── Per-tick ordering ─────────────────────────────────────────

fn journal_tick(shared: &SharedState, reading: Result<f32, SensorFault>) -> Vec<Step> {
    let journal = Journal::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), shared);
    let mut board = journal.board(&[reading]);
    let mut display = journal.display();
    let mut telemetry = journal.telemetry();
    let mut sink = LogSink::new();
    svc.tick(&mut board, &mut display, &mut telemetry, &mut sink);
    journal.steps()
}

#[test]
fn valid_tick_reads_alerts_renders_then_publishes() {
    let shared = SharedState::new();
    shared.link.set(true);
    let steps = journal_tick(&shared, Ok(10.0));

    assert_eq!(
        steps,
        vec![
            Step::Read,
            Step::Alert(false),
            Step::Clear,
            Step::Text("Temp. PT100".to_string()),
            Step::Text("Atual: 4.30C".to_string()),
            Step::Text("OK".to_string()),
            Step::Flush,
            Step::Publish(MQTT_TOPIC_TEMPERATURE.to_string()),
            Step::Publish(MQTT_TOPIC_STATUS.to_string()),
        ]
    );
}

#[test]
fn fault_tick_raises_alert_before_the_screen_changes() {
    let shared = SharedState::new();
    shared.link.set(true);
    let steps = journal_tick(&shared, Err(SensorFault::Rtd(0x84)));

    let alert = steps.iter().position(|s| *s == Step::Alert(true));
    let clear = steps.iter().position(|s| *s == Step::Clear);
    assert!(alert.is_some() && clear.is_some(), "{steps:?}");
    assert!(alert < clear, "{steps:?}");
    assert!(!steps.iter().any(|s| matches!(s, Step::Publish(_))), "{steps:?}");
}

// ── Publish truth table ───────────────────────────────────────

fn publish_case(valid: bool, link_up: bool) -> (bool, Vec<(String, String)>) {
    let shared = SharedState::new();
    shared.link.set(link_up);
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let reading = if valid { Ok(10.0) } else { Err(SensorFault::Bus) };
    let mut rig = Rig::new(&[reading]);
    let report = rig.tick(&mut svc);
    (report.published, rig.telemetry.sent)
}

#[test]
fn publishes_only_when_valid_and_linked() {
    let (published, sent) = publish_case(true, true);
    assert!(published);
    assert_eq!(
        sent,
        vec![
            (MQTT_TOPIC_TEMPERATURE.to_string(), "4.30".to_string()),
            (MQTT_TOPIC_STATUS.to_string(), "OK".to_string()),
        ]
    );

    for (valid, link) in [(true, false), (false, true), (false, false)] {
        let (published, sent) = publish_case(valid, link);
        assert!(!published, "valid={valid} link={link}");
        assert!(sent.is_empty(), "valid={valid} link={link}");
    }
}

#[test]
fn link_drop_between_ticks_stops_publishing() {
    let shared = SharedState::new();
    shared.link.set(true);
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0)]);

    assert!(rig.tick(&mut svc).published);
    shared.link.set(false);
    assert!(!rig.tick(&mut svc).published);
    assert_eq!(rig.telemetry.sent.len(), 2);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Published { .. })), 1);
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn start_then_extremes_events() {
    let shared = SharedState::new();
    let mut svc = MonitorService::new(&MonitorConfig::default(), &shared);
    let mut rig = Rig::new(&[Ok(10.0), Ok(12.0), Ok(11.0)]);

    svc.start(&mut rig.sink);
    for _ in 0..3 {
        rig.tick(&mut svc);
    }

    assert_eq!(rig.sink.events.first(), Some(&AppEvent::Started));
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::NewMaximum(_))), 2);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::NewMinimum(_))), 1);
    assert_eq!(svc.tick_count(), 3);
}
