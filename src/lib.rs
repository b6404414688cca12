//! 時間単価で駐車料金を計算するフォーム。
//!
//! 入庫・出庫時刻(`HH:mm`)と時間単価から駐車時間と料金を求め、表示用に整形する。

pub mod calc_command;
pub mod calculator;
pub mod clock_time;
pub mod config;
pub mod console;
pub mod currency;
pub mod datetime;
pub mod duration;
pub mod error;
pub mod form_command;
pub mod session;

pub use calculator::{compute_cost, FeeResult};
pub use clock_time::{parse_clock_time, ClockTime};
pub use currency::{format_currency, CurrencyFormat};
pub use datetime::current_time_label;
pub use duration::format_duration;
pub use error::FeeError;
pub use session::Session;
