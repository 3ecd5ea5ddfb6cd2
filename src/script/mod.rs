//! The screening-script engine.
//!
//! A script is a small infix expression over numeric literals,
//! parenthesized groups, and `{variable}` references, evaluated against a
//! time series to a single numeric string. Screening callers read `"0"` as
//! false and anything else as true.
//!
//! Evaluation is two independent passes, each splicing innermost groups
//! back into the expression text: first `{}` variable substitution, then
//! `()` reduction followed by five left-to-right operator sweeps, one per
//! precedence tier. There is no grammar; delimiter matching scans for a
//! closing delimiter and counts backward to its opener, and a mismatch
//! aborts the whole evaluation with `"0"`.

mod value;

pub use value::Value;

use crate::error::{Result, TascanError};
use crate::indicators;
use crate::rollup::Period;
use crate::series::TimeSeries;

/// Indicator defaults used when a script references `rsi`, `sma`, `ema`,
/// `bb_top` or `bb_bottom`. Explicit so embedders can retune them.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    pub rsi_period: usize,
    pub sma_period: usize,
    pub ema_period: usize,
    pub bollinger_period: usize,
    pub bollinger_deviations: f64,
    /// Bars held back from the requested count so the slowest default
    /// window is always warmed up before index 0 is read.
    pub warmup: i64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            sma_period: 20,
            ema_period: 20,
            bollinger_period: 20,
            bollinger_deviations: 2.0,
            warmup: 26,
        }
    }
}

/// Script evaluator. Holds per-call diagnostics: each variable resolved
/// during the last `parse` is logged once, by name, with its value.
#[derive(Debug, Default)]
pub struct ScriptEngine {
    config: ScriptConfig,
    last_variables: String,
    seen: Vec<String>,
}

/// Operator sweeps in precedence order; each sweep fully reduces its tier
/// left-to-right before the next runs.
const PASSES: [&str; 5] = ["^", "*x/%", "+-", "><=", "|&"];

const DIGITS: &[u8] = b"0123456789.";

impl ScriptEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScriptConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Evaluate a script against a series, returning the result as a
    /// numeric string. Structural errors (mismatched delimiters) and empty
    /// scripts yield `"0"`; malformed-but-balanced input degrades to `0`
    /// operands instead of failing.
    pub fn parse(&mut self, script: &str, series: &TimeSeries) -> String {
        self.last_variables.clear();
        self.seen.clear();

        if script.is_empty() {
            return "0".to_string();
        }

        log::trace!("Script: {}", script);

        let expr = match self.replace_variables(script, series) {
            Ok(expr) => expr,
            Err(e) => {
                log::error!("{}", e);
                return "0".to_string();
            }
        };

        let result = match self.reduce_parens(&expr) {
            Ok(result) => result,
            Err(e) => {
                log::error!("{}", e);
                return "0".to_string();
            }
        };

        log::trace!("End of run: {}", result);
        result
    }

    /// `name = value` pairs for every variable the last `parse` resolved.
    pub fn last_evaluated_variables(&self) -> &str {
        &self.last_variables
    }

    /// Brace pass: resolve the innermost `{...}` group, splice its value
    /// back in, repeat until no groups remain.
    fn replace_variables(&mut self, script: &str, series: &TimeSeries) -> Result<String> {
        let mut expr = script.to_string();

        while let Some(close) = expr.find('}') {
            let open = find_matching_open(&expr, close, b'{', b'}').ok_or_else(|| {
                TascanError::MismatchedDelimiters {
                    open: '{',
                    close: '}',
                    script: script.to_string(),
                }
            })?;

            let repl = self.resolve_variable(&expr[open + 1..close], series);
            log::trace!("Replacing: {}", &expr[open + 1..close]);
            expr.replace_range(open..=close, &repl);
        }

        log::trace!("Replaced variables: {}", expr);
        Ok(expr)
    }

    /// Resolve one variable reference: `name` or `name:periodspec`. The
    /// periodspec rolls the series up before the lookup, so `{close:52week}`
    /// reads the close of the newest 52-week bucket.
    fn resolve_variable(&mut self, request: &str, series: &TimeSeries) -> String {
        let (name, periodspec) = match request.split_once(':') {
            Some((name, spec)) => (name, spec),
            None => (request, ""),
        };

        let rolled;
        let working = if periodspec.is_empty() {
            series
        } else {
            let (number, period) = parse_period(periodspec);
            let mut source = series.clone();
            rolled = source.rollup(number, period, None);
            &rolled
        };

        let newest = match working.get(0) {
            Some(bar) => bar,
            None => return "0".to_string(),
        };

        let cfg = &self.config;
        let count = working.len() as i64 - cfg.warmup;

        match name {
            "open" => self.record(request, &format_float(newest.open)),
            "high" => self.record(request, &format_float(newest.high)),
            "low" => self.record(request, &format_float(newest.low)),
            "close" => self.record(request, &format_float(newest.close)),
            "volume" => self.record(request, &newest.volume.to_string()),
            "rsi" => {
                let data = indicators::rsi(working, cfg.rsi_period, count);
                self.record(request, &format_float(data[0]))
            }
            "sma" => {
                let data = indicators::sma(working, cfg.sma_period, count);
                self.record(request, &format_float(data[0]))
            }
            "ema" => {
                let data = indicators::ema(working, cfg.ema_period, count);
                self.record(request, &format_float(data[0]))
            }
            "bb_top" => {
                let mid = indicators::sma(working, cfg.sma_period, count);
                let band = indicators::bollinger_bands(
                    working,
                    cfg.bollinger_period,
                    cfg.bollinger_deviations,
                    count,
                );
                self.record(request, &format_float(mid[0] + band[0]))
            }
            "bb_bottom" => {
                let mid = indicators::sma(working, cfg.sma_period, count);
                let band = indicators::bollinger_bands(
                    working,
                    cfg.bollinger_period,
                    cfg.bollinger_deviations,
                    count,
                );
                self.record(request, &format_float(mid[0] - band[0]))
            }
            _ => {
                log::trace!("Unknown script variable: {}", name);
                "0".to_string()
            }
        }
    }

    /// Log a resolved variable into the per-call diagnostic string,
    /// deduplicated by the full reference text.
    fn record(&mut self, name: &str, value: &str) -> String {
        if !self.seen.iter().any(|seen| seen == name) {
            if !self.last_variables.is_empty() {
                self.last_variables.push_str(", ");
            }
            self.last_variables.push_str(name);
            self.last_variables.push_str(" = ");
            self.last_variables.push_str(value);
            self.seen.push(name.to_string());
        }
        value.to_string()
    }

    /// Paren pass: reduce the innermost `(...)` group to a scalar, splice
    /// it back, repeat; then run the operator sweeps on what is left.
    fn reduce_parens(&self, expr: &str) -> Result<String> {
        let mut expr = expr.to_string();

        while let Some(close) = expr.find(')') {
            let open = find_matching_open(&expr, close, b'(', b')').ok_or_else(|| {
                TascanError::MismatchedDelimiters {
                    open: '(',
                    close: ')',
                    script: expr.clone(),
                }
            })?;

            let repl = self.calculate(&expr[open + 1..close]);
            expr.replace_range(open..=close, &repl);
        }

        Ok(self.calculate(&expr))
    }

    /// Run the five precedence sweeps over a flat (paren-free) chunk.
    fn calculate(&self, chunk: &str) -> String {
        log::trace!("Script chunk: {}", chunk);

        let mut result = chunk.to_string();
        for operators in PASSES {
            result = sweep(&result, operators);
        }

        log::trace!("Script chunk reduced: {}", result);
        result
    }
}

/// One left-to-right reduction sweep for a single precedence tier: scan
/// for `number operator number` triples, collapse each in place, and
/// re-scan from the collapse point so the result can feed the next
/// adjacent operation.
fn sweep(chunk: &str, operators: &str) -> String {
    let mut ret = chunk.to_string();
    let mut x = 0;
    let mut start = 0;
    let mut number_started = false;

    while x < ret.len() {
        let c = ret.as_bytes()[x];

        if c.is_ascii_whitespace() {
            x += 1;
            continue;
        }

        let is_digit = DIGITS.contains(&c);
        if !number_started && is_digit {
            number_started = true;
            start = x;
        } else if number_started && operators.as_bytes().contains(&c) {
            let operation = x;

            // Scan ahead for the second operand.
            let mut found_rhs = false;
            x += 1;
            while x < ret.len() {
                if DIGITS.contains(&ret.as_bytes()[x]) {
                    found_rhs = true;
                    break;
                }
                x += 1;
            }

            if found_rhs {
                let mut end = ret.len() - 1;
                x += 1;
                while x < ret.len() {
                    if !DIGITS.contains(&ret.as_bytes()[x]) {
                        end = x - 1;
                        break;
                    }
                    x += 1;
                }

                let lhs = Value::parse(&ret[start..operation]);
                let rhs = Value::parse(&ret[operation + 1..=end]);
                let op = ret.as_bytes()[operation] as char;
                log::trace!("Script operation: {} {} {}", lhs, op, rhs);

                let result = lhs.apply(op, rhs).to_string();
                ret.replace_range(start..=end, &result);

                // Re-scan from the spliced result; it may start the next
                // calculation in this tier.
                x = start;
            }
        } else if !is_digit {
            // Not a digit, space, or operator for this tier: whatever
            // number we were tracking cannot be a left operand here.
            number_started = false;
        }

        x += 1;
    }

    ret
}

/// Walk backward from a closing delimiter, counting nesting, to find the
/// matching opener. `None` when the counts never balance.
fn find_matching_open(expr: &str, close_pos: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut closers = 1;
    let mut openers = 0;

    for pos in (0..close_pos).rev() {
        if bytes[pos] == close {
            closers += 1;
        } else if bytes[pos] == open {
            openers += 1;
            if openers == closers {
                return Some(pos);
            }
        }
    }

    None
}

/// Split a periodspec like `52week` or `3month` into its count and period.
/// A missing or zero count means 1; an unrecognized suffix means days.
fn parse_period(spec: &str) -> (u32, Period) {
    let digits: String = spec.chars().take_while(|c| c.is_ascii_digit()).collect();
    let mut number: u32 = digits.parse().unwrap_or(0);
    if number == 0 {
        number = 1;
    }

    let suffix = &spec[digits.len()..];
    let period = if suffix.starts_with("week") {
        Period::Week
    } else if suffix.starts_with("month") {
        Period::Month
    } else if suffix.starts_with("year") {
        Period::Year
    } else {
        Period::Day
    };

    (number, period)
}

fn format_float(value: f64) -> String {
    format!("{:.6}", value)
}
