use log::{debug, info};
use serde::Serialize;

use crate::calculator::{compute_cost, FeeResult};
use crate::currency::coerce_number;
use crate::datetime::current_time_label;
use crate::error::FeeError;

/// 料金計算フォームの1セッション分の状態。
///
/// 入力欄(時間単価、ナンバープレート、入庫時刻、出庫時刻)は自由入力のテキストとして保持し、
/// 計算結果(駐車時間、料金)は`calculate`を呼んだときだけ更新する。
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    hourly_rate: String,
    vehicle_plate: String,
    entry_time: String,
    exit_time: String,
    total_minutes: Option<i64>,
    total_cost: Option<String>,
}

impl Session {
    /// 空のセッションを返す。
    pub fn new() -> Self {
        Self::default()
    }

    /// 時間単価を入力済みのセッションを返す。
    pub fn with_hourly_rate(hourly_rate: impl Into<String>) -> Self {
        Self {
            hourly_rate: hourly_rate.into(),
            ..Self::default()
        }
    }

    pub fn hourly_rate(&self) -> &str {
        &self.hourly_rate
    }

    pub fn vehicle_plate(&self) -> &str {
        &self.vehicle_plate
    }

    pub fn entry_time(&self) -> &str {
        &self.entry_time
    }

    pub fn exit_time(&self) -> &str {
        &self.exit_time
    }

    /// 最後に計算した駐車時間(分)。
    pub fn total_minutes(&self) -> Option<i64> {
        self.total_minutes
    }

    /// 最後に計算した料金(小数点以下2桁の文字列)。
    pub fn total_cost(&self) -> Option<&str> {
        self.total_cost.as_deref()
    }

    pub fn set_hourly_rate(&mut self, value: impl Into<String>) {
        self.hourly_rate = value.into();
    }

    pub fn set_vehicle_plate(&mut self, value: impl Into<String>) {
        self.vehicle_plate = value.into();
    }

    pub fn set_entry_time(&mut self, value: impl Into<String>) {
        self.entry_time = value.into();
    }

    pub fn set_exit_time(&mut self, value: impl Into<String>) {
        self.exit_time = value.into();
    }

    /// 入庫時刻に現在時刻を打刻する。打刻後も自由に編集できる。
    pub fn stamp_entry_time(&mut self) {
        self.entry_time = current_time_label();
        debug!("Entry time stamped: {}", self.entry_time);
    }

    /// 出庫時刻に現在時刻を打刻する。
    pub fn stamp_exit_time(&mut self) {
        self.exit_time = current_time_label();
        debug!("Exit time stamped: {}", self.exit_time);
    }

    /// 入庫・出庫時刻と時間単価から駐車時間と料金を計算し、結果をセッションに保存する。
    ///
    /// 時刻の形式を先に検証する。時間単価は空欄なら0とし、有限の数値として読めなければエラーにする。
    /// エラーの場合、計算結果の欄は変更しない。
    pub fn calculate(&mut self) -> Result<FeeResult, FeeError> {
        let rate = coerce_number(&self.hourly_rate);
        let result = compute_cost(&self.entry_time, &self.exit_time, rate)?;
        if !rate.is_finite() {
            return Err(FeeError::InvalidRate(self.hourly_rate.clone()));
        }

        self.total_minutes = Some(result.minutes);
        self.total_cost = Some(result.fixed_cost());
        info!(
            "Calculated: plate={:?}, minutes={}, cost={}",
            self.vehicle_plate,
            result.minutes,
            result.fixed_cost()
        );

        Ok(result)
    }

    /// 時間単価以外の欄をすべて空に戻す。
    pub fn clear(&mut self) {
        *self = Self::with_hourly_rate(std::mem::take(&mut self.hourly_rate));
    }
}
