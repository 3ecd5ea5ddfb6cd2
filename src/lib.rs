//! # tascan
//!
//! A technical time-series analysis and scripting engine for daily OHLCV
//! bars: a newest-first time-series container with calendar-aware rollup,
//! a library of sliding-window indicators (SMA, EMA, RSI, MACD, Bollinger
//! bands, rolling extremes), and a small infix expression language for
//! composing them into screening conditions.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tascan::prelude::*;
//!
//! let series = TimeSeries::load("data/goog.csv")?;
//! let mut engine = ScriptEngine::new();
//!
//! // True when the latest close sits below the lower Bollinger band on
//! // above-average volume.
//! let hit = engine.parse("({close} < {bb_bottom}) & ({volume} > 1000000)", &series);
//! if hit != "0" {
//!     println!("matched: {}", engine.last_evaluated_variables());
//! }
//! # Ok::<(), tascan::TascanError>(())
//! ```

pub mod data;
pub mod error;
pub mod indicators;
pub mod rollup;
pub mod script;
pub mod series;
pub mod types;

pub use error::{Result, TascanError};
pub use rollup::Period;
pub use script::{ScriptConfig, ScriptEngine};
pub use series::TimeSeries;
pub use types::Bar;

pub mod prelude {
    //! Commonly used types
    pub use crate::error::{Result, TascanError};
    pub use crate::rollup::Period;
    pub use crate::script::{ScriptConfig, ScriptEngine};
    pub use crate::series::TimeSeries;
    pub use crate::types::Bar;
}
