use thiserror::Error;

/// 時刻の形式が不正な場合にユーザーへ通知するメッセージ。
pub const MALFORMED_TIME_MESSAGE: &str = "Por favor, insira a hora no formato HH:mm";

/// 時間単価が数値として解釈できない場合にユーザーへ通知するメッセージ。
pub const INVALID_RATE_MESSAGE: &str = "Por favor, insira um valor/hora válido";

/// 料金計算で発生するエラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    /// `HH:mm`として2つの数値に分割できない時刻。
    #[error("malformed time: {0:?}")]
    MalformedTime(String),

    /// 数値として解釈できない時間単価。
    #[error("invalid hourly rate: {0:?}")]
    InvalidRate(String),
}

impl FeeError {
    /// アラートとしてユーザーに表示するメッセージを返す。
    pub fn user_message(&self) -> &'static str {
        match self {
            FeeError::MalformedTime(_) => MALFORMED_TIME_MESSAGE,
            FeeError::InvalidRate(_) => INVALID_RATE_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{FeeError, INVALID_RATE_MESSAGE, MALFORMED_TIME_MESSAGE};

    #[rstest]
    #[case::malformed_time(FeeError::MalformedTime("9".to_string()), MALFORMED_TIME_MESSAGE)]
    #[case::invalid_rate(FeeError::InvalidRate("abc".to_string()), INVALID_RATE_MESSAGE)]
    fn test_user_message(#[case] error: FeeError, #[case] expected: &str) {
        assert_eq!(error.user_message(), expected);
    }

    /// ログ出力用のメッセージには入力値が含まれること。
    #[test]
    fn test_display_contains_input() {
        let error = FeeError::MalformedTime("25h".to_string());

        assert_eq!(error.to_string(), "malformed time: \"25h\"");
    }
}
