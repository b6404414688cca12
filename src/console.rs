use std::io::Write;

use anyhow::{Context, Result};
#[cfg(test)]
use mockall::automock;

use crate::currency::{coerce_number, CurrencyFormat};
use crate::duration::format_duration;
use crate::session::Session;

/// フォームの状態とアラートを表示するためのtrait。
#[cfg_attr(test, automock)]
pub trait FormPresenter {
    /// セッションの全項目を表示する。
    ///
    /// # Arguments
    ///
    /// * `session` - 表示するセッション
    fn show_session(&mut self, session: &Session) -> Result<()>;

    /// 入力エラーをユーザーに通知する。
    fn alert(&mut self, message: &str) -> Result<()>;

    /// ヘルプなどの補足メッセージを表示する。
    fn show_message(&mut self, message: &str) -> Result<()>;
}

/// セッションをラベル付きのテキスト形式で表示する。
///
/// アラートはフォームとは別の出力先(通常は標準エラー出力)に書き出す。
pub struct ConsoleForm<'a, W: Write, E: Write> {
    writer: &'a mut W,
    alerts: &'a mut E,
    currency: CurrencyFormat,
}

impl<'a, W: Write, E: Write> ConsoleForm<'a, W, E> {
    /// 新しい`ConsoleForm`を返す。
    ///
    /// # Arguments
    ///
    /// * `writer` - フォームの出力先
    /// * `alerts` - アラートの出力先
    /// * `currency` - 時間単価と料金の表示形式
    pub fn new(writer: &'a mut W, alerts: &'a mut E, currency: CurrencyFormat) -> Self {
        Self {
            writer,
            alerts,
            currency,
        }
    }
}

impl<'a, W: Write, E: Write> FormPresenter for ConsoleForm<'a, W, E> {
    // 未計算の駐車時間は空欄、料金は0として表示する。
    fn show_session(&mut self, session: &Session) -> Result<()> {
        let total_time = session
            .total_minutes()
            .map(format_duration)
            .unwrap_or_default();
        let total_cost = coerce_number(session.total_cost().unwrap_or_default());

        let lines = [
            "Parking Calculator".to_string(),
            format!(
                "Valor/Hora: {}",
                self.currency.format(coerce_number(session.hourly_rate()))
            ),
            format!("Placa do Veículo: {}", session.vehicle_plate()),
            format!("Hora/Entrada: {}", session.entry_time()),
            format!("Hora/Saída: {}", session.exit_time()),
            format!("Tempo: {}", total_time),
            format!("Valor a pagar: {}", self.currency.format(total_cost)),
        ];
        for line in lines {
            writeln!(self.writer, "{}", line)
                .with_context(|| format!("Failed to write line: {}", line))?;
        }

        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        writeln!(self.alerts, "[!] {}", message)
            .with_context(|| format!("Failed to write alert: {}", message))
    }

    fn show_message(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message).context("Failed to write message")
    }
}

/// セッションをJSONで出力する。アラートは別の出力先に1行のJSONとして書き出す。
pub struct JsonSnapshot<'a, W: Write, E: Write> {
    writer: &'a mut W,
    alerts: &'a mut E,
}

impl<'a, W: Write, E: Write> JsonSnapshot<'a, W, E> {
    /// 新しい`JsonSnapshot`を返す。
    pub fn new(writer: &'a mut W, alerts: &'a mut E) -> Self {
        Self { writer, alerts }
    }
}

/// 値を1行のJSONとして書き出す。
fn write_json_line<T: Write>(writer: &mut T, value: &serde_json::Value) -> Result<()> {
    serde_json::to_writer(&mut *writer, value).context("Failed to serialize JSON")?;
    writeln!(writer).context("Failed to write JSON")
}

impl<'a, W: Write, E: Write> FormPresenter for JsonSnapshot<'a, W, E> {
    fn show_session(&mut self, session: &Session) -> Result<()> {
        let value = serde_json::to_value(session).context("Failed to serialize session")?;
        write_json_line(self.writer, &value)
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        write_json_line(self.alerts, &serde_json::json!({ "alert": message }))
    }

    fn show_message(&mut self, message: &str) -> Result<()> {
        write_json_line(self.writer, &serde_json::json!({ "message": message }))
    }
}
