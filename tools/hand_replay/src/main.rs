//! Replays a recorded raw-reading trace through the touch classifier and
//! the hand machine, printing a line for every verdict or state change.
//! With `--expect`, the emitted lines are compared against a file instead.

use std::{
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use beckon::{HandCommand, HandEngine, TouchClassifier, REFERENCE_MOTOR, REFERENCE_TOUCH};

// Virtual actuator speed while replaying, in steps per millisecond.
const REPLAY_STEPS_PER_MS: i32 = 4;
// Trace time before this mark only warms the classifier stack.
const DEFAULT_WARM_MS: u64 = 100;

#[derive(Clone, Copy)]
struct TraceSample {
    ms: u64,
    raw: u16,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut warm_ms = DEFAULT_WARM_MS;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "--warm-ms" => {
                idx += 1;
                let Some(value) = args.get(idx) else {
                    return Err("missing value after --warm-ms".into());
                };
                warm_ms = value
                    .parse()
                    .map_err(|_| format!("bad --warm-ms value: {value}"))?;
            }
            arg if arg.starts_with("--") => return Err(format!("unknown flag: {arg}")),
            path => {
                if trace_path.is_some() {
                    return Err(usage());
                }
                trace_path = Some(PathBuf::from(path));
            }
        }
        idx += 1;
    }

    let Some(trace_path) = trace_path else {
        return Err(usage());
    };

    let samples = load_trace(&trace_path)?;
    let lines = replay(&samples, warm_ms);

    match expect_path {
        None => {
            for line in &lines {
                println!("{line}");
            }
        }
        Some(expect_path) => {
            let expected = load_lines(&expect_path)?;
            compare(&lines, &expected)?;
            println!("ok: {} lines matched", lines.len());
        }
    }
    Ok(())
}

fn replay(samples: &[TraceSample], warm_ms: u64) -> Vec<String> {
    let mut classifier = TouchClassifier::new(REFERENCE_TOUCH);
    let mut engine = HandEngine::new(REFERENCE_MOTOR, 0x5EED_0000);
    let mut position = 0i32;
    let mut last_ms = 0u64;
    let mut was_touched = false;
    let mut last_state = engine.state(position);
    let mut lines = Vec::new();

    for sample in samples {
        if sample.ms < warm_ms {
            let _ = classifier.warm(sample.ms, sample.raw);
            last_ms = sample.ms;
            continue;
        }

        let touched = classifier.sample(sample.ms, sample.raw);
        let verdict_changed = touched != was_touched;
        if verdict_changed {
            let command = if touched {
                HandCommand::Close
            } else {
                HandCommand::Open
            };
            engine.command(command, sample.ms, position);
            was_touched = touched;
        }

        let request = engine.step(sample.ms, position);
        if let Some(request) = request {
            let max_travel = REPLAY_STEPS_PER_MS * sample.ms.saturating_sub(last_ms) as i32;
            let delta = request.target - position;
            position += delta.clamp(-max_travel, max_travel);
        }
        last_ms = sample.ms;

        let state = engine.state(position);
        if verdict_changed || state != last_state || lines.is_empty() {
            lines.push(format!(
                "t={} touched={} state={} position={} target={}",
                sample.ms,
                touched as u8,
                state.label(),
                position,
                request.map_or(position, |r| r.target),
            ));
            last_state = state;
        }
    }
    lines
}

fn load_trace(path: &Path) -> Result<Vec<TraceSample>, String> {
    let file = File::open(path).map_err(|err| format!("{}: {err}", path.display()))?;
    let mut samples = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|err| format!("{}: {err}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(ms), Some(raw)) = (fields.next(), fields.next()) else {
            return Err(format!("{}:{}: expected `<ms> <raw>`", path.display(), number + 1));
        };
        let ms = ms
            .parse()
            .map_err(|_| format!("{}:{}: bad ms: {ms}", path.display(), number + 1))?;
        let raw = raw
            .parse()
            .map_err(|_| format!("{}:{}: bad raw: {raw}", path.display(), number + 1))?;
        samples.push(TraceSample { ms, raw });
    }
    if samples.is_empty() {
        return Err(format!("{}: empty trace", path.display()));
    }
    Ok(samples)
}

fn load_lines(path: &Path) -> Result<Vec<String>, String> {
    let file = File::open(path).map_err(|err| format!("{}: {err}", path.display()))?;
    let mut lines = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|err| format!("{}: {err}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    Ok(lines)
}

fn compare(actual: &[String], expected: &[String]) -> Result<(), String> {
    for (index, expected_line) in expected.iter().enumerate() {
        match actual.get(index) {
            Some(actual_line) if actual_line == expected_line => {}
            Some(actual_line) => {
                return Err(format!(
                    "line {}: expected `{expected_line}`, got `{actual_line}`",
                    index + 1
                ));
            }
            None => {
                return Err(format!(
                    "line {}: expected `{expected_line}`, got end of output",
                    index + 1
                ));
            }
        }
    }
    if actual.len() > expected.len() {
        return Err(format!(
            "unexpected extra output: `{}`",
            actual[expected.len()]
        ));
    }
    Ok(())
}

fn usage() -> String {
    "usage: hand_replay <trace.txt> [--expect <expected.txt>] [--warm-ms <ms>]\n\
     trace lines: `<ms> <raw>`; `#` starts a comment"
        .to_string()
}
