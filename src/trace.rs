use core::fmt::Write;

use crate::hal::TraceSink;
use crate::timer::IntervalTimer;
use crate::types::TickReport;

pub const PLOT_LINE_CAP: usize = 128;

// Serial-plotter line for one loop iteration, tab-separated so a host can
// chart the channels directly.
pub fn plot_line(report: &TickReport) -> heapless::String<PLOT_LINE_CAP> {
    let mut line = heapless::String::new();
    let _ = write!(
        line,
        "current: {}\tcalibration: {}\taverage: {}\ttouched: {}\ttarget: {}\tposition: {}",
        report.raw,
        report.calibration_avg,
        report.touch_avg,
        report.touched as u8,
        report.target,
        report.position
    );
    line
}

// Throttles plot output to the debug interval so the text sink is not
// flooded at loop rate.
pub struct PlotTrace {
    timer: IntervalTimer,
}

impl PlotTrace {
    pub const fn new(debug_interval_ms: u64) -> Self {
        Self {
            timer: IntervalTimer::new(debug_interval_ms),
        }
    }

    pub fn maybe_line(
        &mut self,
        now_ms: u64,
        report: &TickReport,
    ) -> Option<heapless::String<PLOT_LINE_CAP>> {
        if !self.timer.check(now_ms) {
            return None;
        }
        Some(plot_line(report))
    }

    // Formats and delivers one line to the sink when the debug interval is
    // due. Returns whether a line was written.
    pub fn emit<S: TraceSink>(&mut self, now_ms: u64, report: &TickReport, sink: &mut S) -> bool {
        match self.maybe_line(now_ms, report) {
            Some(line) => {
                sink.write_line(line.as_str());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HandState;

    fn report() -> TickReport {
        TickReport {
            state: HandState::Closing,
            touched: true,
            raw: 612,
            calibration_avg: 540,
            touch_avg: 601,
            target: 380,
            position: 214,
        }
    }

    struct CollectingSink {
        lines: std::vec::Vec<std::string::String>,
    }

    impl TraceSink for CollectingSink {
        fn write_line(&mut self, line: &str) {
            self.lines.push(line.into());
        }
    }

    #[test]
    fn plot_line_matches_the_serial_plotter_format() {
        let line = plot_line(&report());
        assert_eq!(
            line.as_str(),
            "current: 612\tcalibration: 540\taverage: 601\ttouched: 1\ttarget: 380\tposition: 214"
        );
    }

    #[test]
    fn plot_output_is_gated_by_the_debug_interval() {
        let mut trace = PlotTrace::new(100);
        assert!(trace.maybe_line(50, &report()).is_none());
        assert!(trace.maybe_line(100, &report()).is_some());
        assert!(trace.maybe_line(150, &report()).is_none());
        assert!(trace.maybe_line(205, &report()).is_some());
    }

    #[test]
    fn emit_writes_due_lines_into_the_sink() {
        let mut trace = PlotTrace::new(100);
        let mut sink = CollectingSink {
            lines: std::vec::Vec::new(),
        };
        assert!(!trace.emit(50, &report(), &mut sink));
        assert!(trace.emit(100, &report(), &mut sink));
        assert!(!trace.emit(150, &report(), &mut sink));
        assert_eq!(sink.lines.len(), 1);
        assert!(sink.lines[0].starts_with("current: 612"));
    }
}
