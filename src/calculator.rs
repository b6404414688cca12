use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::clock_time::{parse_clock_time, ClockTime};
use crate::error::FeeError;

/// 入庫・出庫時刻を載せる基準日。差分だけを使うので日付自体に意味はない。
const REFERENCE_DATE: (i32, u32, u32) = (2023, 9, 6);

const MILLISECONDS_PER_MINUTE: f64 = 60_000.0;
const MINUTES_PER_HOUR: f64 = 60.0;

/// 駐車時間と料金の計算結果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeResult {
    /// 切り上げた駐車時間(分)。出庫が入庫より前なら負になる。
    pub minutes: i64,
    /// 丸める前の料金。
    pub cost: f64,
}

impl FeeResult {
    /// 料金を小数点以下2桁の固定小数点文字列で返す。
    ///
    /// 浮動小数点数の正確な値をもとに、ちょうど半分の端数は0から遠い方へ丸める。
    pub fn fixed_cost(&self) -> String {
        if self.cost.is_nan() {
            return "NaN".to_string();
        }
        // 負のゼロには符号を付けない
        let sign = if self.cost < 0.0 { "-" } else { "" };
        if self.cost.is_infinite() {
            return format!("{}Infinity", sign);
        }

        match Decimal::from_f64_retain(self.cost.abs()) {
            Some(value) => format!(
                "{}{:.2}",
                sign,
                value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            ),
            None => format!("{}{:.2}", sign, self.cost.abs()),
        }
    }
}

/// 入庫・出庫時刻と時間単価から駐車時間と料金を計算する。
///
/// 両方の時刻を同じ基準日に載せてミリ秒単位の差分を取り、分へ切り上げる。
/// 出庫が入庫より前でもエラーにはせず、負の時間と料金を返す。
///
/// # Arguments
///
/// * `entry` - 入庫時刻(`HH:mm`)
/// * `exit` - 出庫時刻(`HH:mm`)
/// * `rate` - 1時間あたりの料金。`NaN`はそのまま料金に伝播する
///
/// # Examples
///
/// ```
/// use parking_calculator::compute_cost;
///
/// let result = compute_cost("08:00", "09:30", 10.0).unwrap();
/// assert_eq!(result.minutes, 90);
/// assert_eq!(result.fixed_cost(), "15.00");
/// ```
pub fn compute_cost(entry: &str, exit: &str, rate: f64) -> Result<FeeResult, FeeError> {
    let entry_at = anchor(parse_clock_time(entry)?)
        .ok_or_else(|| FeeError::MalformedTime(entry.to_string()))?;
    let exit_at = anchor(parse_clock_time(exit)?)
        .ok_or_else(|| FeeError::MalformedTime(exit.to_string()))?;

    let diff_milliseconds = (exit_at - entry_at).num_milliseconds();
    let minutes = (diff_milliseconds as f64 / MILLISECONDS_PER_MINUTE).ceil() as i64;
    let cost = (minutes as f64 / MINUTES_PER_HOUR) * rate;
    debug!(
        "Entry at: {}, Exit at: {}, Minutes: {}, Cost: {}",
        entry_at, exit_at, minutes, cost
    );

    Ok(FeeResult { minutes, cost })
}

/// 時刻を基準日の0時からのオフセットとして日時に変換する。
///
/// 範囲外の時・分は翌日や前日へ繰り越される。表現できないほど大きい値は`None`を返す。
fn anchor(time: ClockTime) -> Option<NaiveDateTime> {
    let (year, month, day) = REFERENCE_DATE;
    let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    let offset = TimeDelta::try_hours(time.hour)?.checked_add(&TimeDelta::try_minutes(time.minute)?)?;

    midnight.checked_add_signed(offset)
}
