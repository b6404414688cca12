use anyhow::{Context, Result};
use log::{info, warn};

use crate::console::FormPresenter;
use crate::session::Session;

/// 1回だけ料金を計算するためのサブコマンド。
#[derive(Debug, clap::Args)]
pub struct CalcArgs {
    #[clap(
        short = 'e',
        long = "entry",
        help = "Entry time in the format HH:mm (defaults to the current time)"
    )]
    entry: Option<String>,

    #[clap(
        short = 'x',
        long = "exit",
        help = "Exit time in the format HH:mm (defaults to the current time)"
    )]
    exit: Option<String>,

    #[clap(short = 'r', long = "rate", help = "Hourly rate, e.g. 7.50")]
    rate: Option<String>,

    #[clap(short = 'p', long = "plate", help = "Vehicle plate, e.g. ABC-1234")]
    plate: Option<String>,

    #[clap(long = "json", help = "Print the session as JSON")]
    pub json: bool,
}

pub struct CalcCommand<'a, P: FormPresenter> {
    presenter: &'a mut P,
    default_rate: String,
}

impl<'a, P: FormPresenter> CalcCommand<'a, P> {
    /// 新しい`CalcCommand`を返す。
    ///
    /// # Arguments
    /// * `presenter` - 計算結果とアラートの表示先
    /// * `default_rate` - `--rate`が指定されなかったときの時間単価
    pub fn new(presenter: &'a mut P, default_rate: impl Into<String>) -> Self {
        Self {
            presenter,
            default_rate: default_rate.into(),
        }
    }

    /// `calc`サブコマンドの処理を行う。
    ///
    /// 入庫・出庫時刻が指定されていない場合は現在時刻を打刻してから計算する。
    /// 入力エラーはアラートとして表示し、`false`を返す。
    ///
    /// # Arguments
    ///
    /// * `calc` - `calc`サブコマンドの引数
    pub fn run(&mut self, calc: CalcArgs) -> Result<bool> {
        let mut session =
            Session::with_hourly_rate(calc.rate.unwrap_or_else(|| self.default_rate.clone()));
        session.set_vehicle_plate(calc.plate.unwrap_or_default());
        match calc.entry {
            Some(entry) => session.set_entry_time(entry),
            None => session.stamp_entry_time(),
        }
        match calc.exit {
            Some(exit) => session.set_exit_time(exit),
            None => session.stamp_exit_time(),
        }
        info!(
            "Entry: {}, Exit: {}, Rate: {:?}",
            session.entry_time(),
            session.exit_time(),
            session.hourly_rate()
        );

        match session.calculate() {
            Ok(_) => {
                self.presenter
                    .show_session(&session)
                    .context("Failed to show calculation result")?;
                Ok(true)
            }
            Err(error) => {
                warn!("Calculation rejected: {}", error);
                self.presenter
                    .alert(error.user_message())
                    .context("Failed to show alert")?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use rstest::rstest;

    use super::{CalcArgs, CalcCommand};
    use crate::console::{ConsoleForm, JsonSnapshot, MockFormPresenter};
    use crate::currency::CurrencyFormat;
    use crate::datetime::mock_datetime;
    use crate::error::{INVALID_RATE_MESSAGE, MALFORMED_TIME_MESSAGE};

    fn args(entry: Option<&str>, exit: Option<&str>, rate: Option<&str>) -> CalcArgs {
        CalcArgs {
            entry: entry.map(str::to_string),
            exit: exit.map(str::to_string),
            rate: rate.map(str::to_string),
            plate: Some("ABC-1234".to_string()),
            json: false,
        }
    }

    #[test]
    fn test_calc_command() {
        let mut presenter = MockFormPresenter::new();
        presenter
            .expect_show_session()
            .withf(|session| {
                session.total_minutes() == Some(90)
                    && session.total_cost() == Some("15.00")
                    && session.vehicle_plate() == "ABC-1234"
            })
            .times(1)
            .returning(|_| Ok(()));
        presenter.expect_alert().times(0);

        let mut command = CalcCommand::new(&mut presenter, "");
        let result = command.run(args(Some("08:00"), Some("09:30"), Some("10")));

        assert!(result.unwrap());
    }

    /// `--rate`が指定されない場合は設定の時間単価を使う。
    #[test]
    fn test_calc_command_default_rate() {
        let mut presenter = MockFormPresenter::new();
        presenter
            .expect_show_session()
            .withf(|session| session.hourly_rate() == "4" && session.total_cost() == Some("4.00"))
            .times(1)
            .returning(|_| Ok(()));

        let mut command = CalcCommand::new(&mut presenter, "4");
        let result = command.run(args(Some("08:00"), Some("09:00"), None));

        assert!(result.unwrap());
    }

    /// 時刻が指定されない場合は現在時刻が打刻される。
    #[test]
    fn test_calc_command_stamps_current_time() {
        mock_datetime::set_mock_time(Local.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap());
        let mut presenter = MockFormPresenter::new();
        presenter
            .expect_show_session()
            .withf(|session| {
                session.exit_time() == "10:15" && session.total_minutes() == Some(15)
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut command = CalcCommand::new(&mut presenter, "");
        let result = command.run(args(Some("10:00"), None, Some("2")));
        mock_datetime::clear_mock_time();

        assert!(result.unwrap());
    }

    #[rstest]
    #[case::malformed_entry(Some("9"), Some("09:30"), Some("10"), MALFORMED_TIME_MESSAGE)]
    #[case::malformed_exit(Some("09:00"), Some("9h30"), Some("10"), MALFORMED_TIME_MESSAGE)]
    #[case::invalid_rate(Some("09:00"), Some("09:30"), Some("dez"), INVALID_RATE_MESSAGE)]
    fn test_calc_command_alert(
        #[case] entry: Option<&str>,
        #[case] exit: Option<&str>,
        #[case] rate: Option<&str>,
        #[case] message: &'static str,
    ) {
        let mut presenter = MockFormPresenter::new();
        presenter.expect_show_session().times(0);
        presenter
            .expect_alert()
            .withf(move |actual| actual == message)
            .times(1)
            .returning(|_| Ok(()));

        let mut command = CalcCommand::new(&mut presenter, "");
        let result = command.run(args(entry, exit, rate));

        assert!(!result.unwrap());
    }

    /// 入力エラーのアラートはアラート用の出力先にだけ書き出され、フォームは表示されない。
    #[test]
    fn test_calc_command_alert_stream() {
        let mut writer: Vec<u8> = Vec::new();
        let mut alerts: Vec<u8> = Vec::new();
        let mut presenter = ConsoleForm::new(&mut writer, &mut alerts, CurrencyFormat::default());

        let mut command = CalcCommand::new(&mut presenter, "");
        let accepted = command.run(args(Some("9"), Some("09:30"), Some("10"))).unwrap();

        assert!(!accepted);
        assert!(writer.is_empty());
        assert_eq!(
            String::from_utf8(alerts).unwrap(),
            format!("[!] {}\n", MALFORMED_TIME_MESSAGE)
        );
    }

    #[test]
    fn test_calc_command_json_streams() {
        let mut writer: Vec<u8> = Vec::new();
        let mut alerts: Vec<u8> = Vec::new();
        let mut presenter = JsonSnapshot::new(&mut writer, &mut alerts);

        let mut command = CalcCommand::new(&mut presenter, "");
        let accepted = command.run(args(Some("08:00"), Some("09:00"), Some("dez"))).unwrap();

        assert!(!accepted);
        assert!(writer.is_empty());
        let alert: serde_json::Value = serde_json::from_slice(&alerts).unwrap();
        assert_eq!(alert["alert"], INVALID_RATE_MESSAGE);
    }
}
