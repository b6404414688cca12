use std::io::BufRead;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::console::FormPresenter;
use crate::session::Session;

/// `form`サブコマンドのヘルプ。
pub const HELP: &str = "\
Comandos:
  valor <valor>      define o valor/hora (rate)
  placa <placa>      define a placa do veículo (plate)
  entrada [HH:mm]    define a hora de entrada, sem valor usa a hora atual (entry)
  saida [HH:mm]      define a hora de saída, sem valor usa a hora atual (exit)
  calcular           calcula o tempo e o valor a pagar (calc)
  limpar             limpa os campos, mantendo o valor/hora (clear)
  mostrar            mostra o formulário (show)
  ajuda              mostra esta ajuda (help)
  sair               encerra (quit)";

/// 1行の入力から読み取ったフォーム操作。
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormAction {
    SetRate(String),
    SetPlate(String),
    /// 時刻が省略された場合は現在時刻を打刻する。
    SetEntry(Option<String>),
    SetExit(Option<String>),
    Calculate,
    Clear,
    Show,
    Help,
    Quit,
    Unknown(String),
}

/// 入力行をフォーム操作に変換する。空行は`None`を返す。
fn parse_action(line: &str) -> Option<FormAction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (line, ""),
    };
    let optional = || (!argument.is_empty()).then(|| argument.to_string());

    let action = match command.to_lowercase().as_str() {
        "valor" | "rate" => FormAction::SetRate(argument.to_string()),
        "placa" | "plate" => FormAction::SetPlate(argument.to_string()),
        "entrada" | "entry" => FormAction::SetEntry(optional()),
        "saida" | "saída" | "exit" => FormAction::SetExit(optional()),
        "calcular" | "calc" => FormAction::Calculate,
        "limpar" | "clear" => FormAction::Clear,
        "mostrar" | "show" => FormAction::Show,
        "ajuda" | "help" => FormAction::Help,
        "sair" | "quit" => FormAction::Quit,
        _ => FormAction::Unknown(command.to_string()),
    };

    Some(action)
}

/// 対話形式で料金計算フォームを操作するためのサブコマンド。
pub struct FormCommand<'a, R: BufRead, P: FormPresenter> {
    input: R,
    presenter: &'a mut P,
    session: Session,
}

impl<'a, R: BufRead, P: FormPresenter> FormCommand<'a, R, P> {
    /// 新しい`FormCommand`を返す。
    ///
    /// # Arguments
    /// * `input` - 1行に1つの操作を読み取る入力
    /// * `presenter` - フォームとアラートの表示先
    /// * `session` - 操作対象のセッション
    pub fn new(input: R, presenter: &'a mut P, session: Session) -> Self {
        Self {
            input,
            presenter,
            session,
        }
    }

    /// `form`サブコマンドの処理を行う。
    ///
    /// 入力が終わるか`sair`を受け取るまで操作を繰り返し、最後のセッションを返す。
    /// 状態を変える操作のあとはフォームを表示し直す。
    pub fn run(mut self) -> Result<Session> {
        self.presenter.show_session(&self.session)?;

        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("Failed to read form input")?;
            if read == 0 {
                debug!("End of form input");
                break;
            }
            let Some(action) = parse_action(&line) else {
                continue;
            };
            debug!("Form action: {:?}", action);
            if action == FormAction::Quit {
                break;
            }
            self.apply(action)?;
        }
        info!("Form session finished");

        Ok(self.session)
    }

    fn apply(&mut self, action: FormAction) -> Result<()> {
        match action {
            FormAction::SetRate(rate) => self.session.set_hourly_rate(rate),
            FormAction::SetPlate(plate) => self.session.set_vehicle_plate(plate),
            FormAction::SetEntry(Some(entry)) => self.session.set_entry_time(entry),
            FormAction::SetEntry(None) => self.session.stamp_entry_time(),
            FormAction::SetExit(Some(exit)) => self.session.set_exit_time(exit),
            FormAction::SetExit(None) => self.session.stamp_exit_time(),
            FormAction::Calculate => {
                if let Err(error) = self.session.calculate() {
                    warn!("Calculation rejected: {}", error);
                    return self.presenter.alert(error.user_message());
                }
            }
            FormAction::Clear => self.session.clear(),
            FormAction::Show => {}
            FormAction::Help => return self.presenter.show_message(HELP),
            FormAction::Unknown(command) => {
                return self.presenter.show_message(&format!(
                    "Comando desconhecido: {}. Digite 'ajuda' para ver os comandos.",
                    command
                ));
            }
            FormAction::Quit => return Ok(()),
        }

        self.presenter.show_session(&self.session)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use mockall::Sequence;
    use rstest::rstest;

    use super::{parse_action, FormAction, FormCommand, HELP};
    use crate::console::MockFormPresenter;
    use crate::datetime::mock_datetime;
    use crate::error::MALFORMED_TIME_MESSAGE;
    use crate::session::Session;

    #[rstest]
    #[case::rate("valor 7.50", FormAction::SetRate("7.50".to_string()))]
    #[case::rate_english("rate 3", FormAction::SetRate("3".to_string()))]
    #[case::empty_rate("valor", FormAction::SetRate("".to_string()))]
    #[case::plate("placa  ABC-1234 ", FormAction::SetPlate("ABC-1234".to_string()))]
    #[case::entry("entrada 08:00", FormAction::SetEntry(Some("08:00".to_string())))]
    #[case::stamp_entry("entrada", FormAction::SetEntry(None))]
    #[case::exit_accent("Saída 09:30", FormAction::SetExit(Some("09:30".to_string())))]
    #[case::stamp_exit("exit", FormAction::SetExit(None))]
    #[case::calculate("calcular", FormAction::Calculate)]
    #[case::clear("LIMPAR", FormAction::Clear)]
    #[case::show("mostrar", FormAction::Show)]
    #[case::help("ajuda", FormAction::Help)]
    #[case::quit("sair", FormAction::Quit)]
    #[case::unknown("pagar 10", FormAction::Unknown("pagar".to_string()))]
    fn test_parse_action(#[case] line: &str, #[case] expected: FormAction) {
        assert_eq!(parse_action(line), Some(expected));
    }

    /// ヘルプには受け付けるすべての操作が載っている。
    #[rstest]
    #[case::rate("valor")]
    #[case::plate("placa")]
    #[case::entry("entrada")]
    #[case::exit("saida")]
    #[case::calculate("calcular")]
    #[case::clear("limpar")]
    #[case::show("mostrar")]
    #[case::help("ajuda")]
    #[case::quit("sair")]
    fn test_help_lists_command(#[case] command: &str) {
        let listed = HELP
            .lines()
            .any(|line| line.trim_start().split_whitespace().next() == Some(command));

        assert!(listed, "{} is missing from the help", command);
        assert_ne!(parse_action(command), Some(FormAction::Unknown(command.to_string())));
    }

    #[test]
    fn test_parse_action_blank() {
        assert_eq!(parse_action("   \n"), None);
    }

    #[test]
    fn test_form_command_calculates() {
        let input = "valor 10\nplaca ABC-1234\nentrada 08:00\nsaida 09:30\ncalcular\nsair\n";
        let mut presenter = MockFormPresenter::new();
        // 初期表示と5回の操作
        presenter
            .expect_show_session()
            .times(6)
            .returning(|_| Ok(()));
        presenter.expect_alert().times(0);

        let command = FormCommand::new(input.as_bytes(), &mut presenter, Session::new());
        let session = command.run().unwrap();

        assert_eq!(session.vehicle_plate(), "ABC-1234");
        assert_eq!(session.total_minutes(), Some(90));
        assert_eq!(session.total_cost(), Some("15.00"));
    }

    /// 形式エラーではアラートだけを表示し、フォームは再表示しない。
    #[test]
    fn test_form_command_alerts_malformed_time() {
        let input = "entrada 9\nsaida 09:30\ncalcular\n";
        let mut sequence = Sequence::new();
        let mut presenter = MockFormPresenter::new();
        presenter
            .expect_show_session()
            .times(3)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));
        presenter
            .expect_alert()
            .withf(|message| message == MALFORMED_TIME_MESSAGE)
            .times(1)
            .in_sequence(&mut sequence)
            .returning(|_| Ok(()));

        let command = FormCommand::new(input.as_bytes(), &mut presenter, Session::new());
        let session = command.run().unwrap();

        assert_eq!(session.total_minutes(), None);
        assert_eq!(session.total_cost(), None);
    }

    /// 時刻を省略すると現在時刻が打刻され、`limpar`では時間単価だけが残る。
    #[test]
    fn test_form_command_stamp_and_clear() {
        mock_datetime::set_mock_time(Local.with_ymd_and_hms(2024, 6, 1, 14, 7, 0).unwrap());
        let mut presenter = MockFormPresenter::new();
        presenter
            .expect_show_session()
            .withf(|session| session.entry_time() == "14:07")
            .times(1)
            .returning(|_| Ok(()));
        presenter
            .expect_show_session()
            .withf(|session| session.entry_time() != "14:07")
            .times(2)
            .returning(|_| Ok(()));

        let command = FormCommand::new(
            "entrada\nlimpar\n".as_bytes(),
            &mut presenter,
            Session::with_hourly_rate("5"),
        );
        let session = command.run();
        mock_datetime::clear_mock_time();

        assert_eq!(session.unwrap(), Session::with_hourly_rate("5"));
    }

    #[rstest]
    #[case::help("ajuda\n", HELP.to_string())]
    #[case::unknown(
        "pagar\n",
        "Comando desconhecido: pagar. Digite 'ajuda' para ver os comandos.".to_string(),
    )]
    fn test_form_command_messages(#[case] input: &str, #[case] expected: String) {
        let mut presenter = MockFormPresenter::new();
        presenter
            .expect_show_session()
            .times(1)
            .returning(|_| Ok(()));
        presenter
            .expect_show_message()
            .withf(move |message| message == expected)
            .times(1)
            .returning(|_| Ok(()));

        let command = FormCommand::new(input.as_bytes(), &mut presenter, Session::new());

        assert!(command.run().is_ok());
    }
}
