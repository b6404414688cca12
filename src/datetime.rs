use chrono::{DateTime, Local, Timelike};

#[cfg(not(test))]
/// 現在のローカル時刻を取得する。
pub fn now() -> DateTime<Local> {
    Local::now()
}


#[cfg(test)]
pub use mock_datetime::now;

/// 現在時刻を`HH:mm`形式で返す。
///
/// 入庫・出庫時刻の欄に現在時刻を打刻するときに使う。
pub fn current_time_label() -> String {
    let now = now();
    format!("{:02}:{:02}", now.hour(), now.minute())
}
