//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full history
//! without touching real SPI, I2C or GPIO registers.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};

use pt100_monitor::app::events::AppEvent;
use pt100_monitor::app::ports::{AlertPort, DisplayPort, EventSink, SensorPort, TelemetryPort};
use pt100_monitor::error::{CommsError, DisplayFault, SensorFault};

// ── MockBoard (SensorPort + AlertPort) ────────────────────────

/// Replays scripted sensor results; the last one repeats forever.
pub struct MockBoard {
    script: VecDeque<Result<f32, SensorFault>>,
    last: Result<f32, SensorFault>,
    pub alert_writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new(script: &[Result<f32, SensorFault>]) -> Self {
        Self {
            script: script.iter().copied().collect(),
            last: Err(SensorFault::Bus),
            alert_writes: Vec::new(),
        }
    }

    pub fn alert_on(&self) -> bool {
        self.alert_writes.last().copied().unwrap_or(false)
    }
}

impl SensorPort for MockBoard {
    fn read(&mut self) -> Result<f32, SensorFault> {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}

impl AlertPort for MockBoard {
    fn set_alert(&mut self, active: bool) {
        self.alert_writes.push(active);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Clear,
    Text { x: i32, y: i32, text: String, inverted: bool },
    Flush,
}

#[derive(Default)]
pub struct MockDisplay {
    pub calls: Vec<DisplayCall>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texts drawn since the last `Clear`.
    pub fn screen(&self) -> Vec<&str> {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == DisplayCall::Clear)
            .map_or(0, |i| i + 1);
        self.calls[start..]
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DisplayPort for MockDisplay {
    fn clear(&mut self) -> Result<(), DisplayFault> {
        self.calls.push(DisplayCall::Clear);
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, inverted: bool) -> Result<(), DisplayFault> {
        self.calls.push(DisplayCall::Text {
            x,
            y,
            text: text.to_string(),
            inverted,
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayFault> {
        self.calls.push(DisplayCall::Flush);
        Ok(())
    }
}

// ── MockTelemetry ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockTelemetry {
    pub sent: Vec<(String, String)>,
}

impl TelemetryPort for MockTelemetry {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        self.sent.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

/// Collects emitted events.
#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Journal (shared call order across ports) ──────────────────

/// One port call, in the order the service made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Read,
    Alert(bool),
    Clear,
    Text(String),
    Flush,
    Publish(String),
}

/// A single timeline that board, display and telemetry all append to.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Step>>>);

#[allow(dead_code)]
impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, step: Step) {
        self.0.borrow_mut().push(step);
    }

    pub fn steps(&self) -> Vec<Step> {
        self.0.borrow().clone()
    }

    pub fn board(&self, script: &[Result<f32, SensorFault>]) -> JournalBoard {
        JournalBoard {
            inner: MockBoard::new(script),
            journal: self.clone(),
        }
    }

    pub fn display(&self) -> JournalDisplay {
        JournalDisplay(self.clone())
    }

    pub fn telemetry(&self) -> JournalTelemetry {
        JournalTelemetry(self.clone())
    }
}

pub struct JournalBoard {
    inner: MockBoard,
    journal: Journal,
}

impl SensorPort for JournalBoard {
    fn read(&mut self) -> Result<f32, SensorFault> {
        self.journal.push(Step::Read);
        self.inner.read()
    }
}

impl AlertPort for JournalBoard {
    fn set_alert(&mut self, active: bool) {
        self.journal.push(Step::Alert(active));
        self.inner.set_alert(active);
    }
}

pub struct JournalDisplay(Journal);

impl DisplayPort for JournalDisplay {
    fn clear(&mut self) -> Result<(), DisplayFault> {
        self.0.push(Step::Clear);
        Ok(())
    }

    fn draw_text(&mut self, _x: i32, _y: i32, text: &str, _inverted: bool) -> Result<(), DisplayFault> {
        self.0.push(Step::Text(text.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayFault> {
        self.0.push(Step::Flush);
        Ok(())
    }
}

pub struct JournalTelemetry(Journal);

impl TelemetryPort for JournalTelemetry {
    fn publish(&mut self, topic: &str, _payload: &str) -> Result<(), CommsError> {
        self.0.push(Step::Publish(topic.to_string()));
        Ok(())
    }
}

// ── FakeMax31865 (SpiDevice register file) ────────────────────

/// Emulates the MAX31865 register file behind an `SpiDevice`.
///
/// Reads return consecutive registers from the addressed one; writes
/// (address bit 7 set) store into the register file and are logged.
pub struct FakeMax31865 {
    pub regs: [u8; 8],
    pub writes: Vec<(u8, u8)>,
    /// Fail every transaction.
    pub fail: bool,
    /// Fail reads only, so construction still succeeds.
    pub fail_reads: bool,
}

#[allow(dead_code)]
impl FakeMax31865 {
    pub fn new() -> Self {
        Self {
            regs: [0; 8],
            writes: Vec::new(),
            fail: false,
            fail_reads: false,
        }
    }

    /// Load an RTD code (15-bit) and the fault flag into registers 1/2.
    pub fn set_rtd(&mut self, code: u16, fault: bool) {
        let raw = (code << 1) | u16::from(fault);
        let [msb, lsb] = raw.to_be_bytes();
        self.regs[1] = msb;
        self.regs[2] = lsb;
    }

    /// Code the converter would report for `ohms` with a 430 Ω reference.
    pub fn code_for_ohms(ohms: f32) -> u16 {
        (ohms / 430.0 * 32768.0).round() as u16
    }
}

impl ErrorType for FakeMax31865 {
    type Error = ErrorKind;
}

impl SpiDevice for FakeMax31865 {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        if self.fail {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            match op {
                Operation::Write(buf) => {
                    let addr = usize::from(buf[0] & 0x7F);
                    for (i, b) in buf[1..].iter().enumerate() {
                        self.regs[addr + i] = *b;
                        self.writes.push(((addr + i) as u8, *b));
                    }
                }
                Operation::TransferInPlace(_) if self.fail_reads => {
                    return Err(ErrorKind::Other);
                }
                Operation::TransferInPlace(buf) => {
                    let addr = usize::from(buf[0] & 0x7F);
                    buf[0] = 0;
                    for i in 1..buf.len() {
                        buf[i] = self.regs[addr + i - 1];
                    }
                }
                _ => return Err(ErrorKind::Other),
            }
        }
        Ok(())
    }
}
