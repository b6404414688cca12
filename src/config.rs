use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Deserialize;

use crate::currency::CurrencyFormat;

/// 設定ファイルのパスを上書きする環境変数。
pub const CONFIG_ENV: &str = "PARKING_CALCULATOR_CONFIG";
/// 通貨表示のロケールを上書きする環境変数。
pub const LOCALE_ENV: &str = "PARKING_CALCULATOR_LOCALE";
/// 新しいセッションに入力しておく時間単価を上書きする環境変数。
pub const RATE_ENV: &str = "PARKING_CALCULATOR_RATE";

/// アプリケーションの設定。
///
/// 設定ファイル(JSON)、環境変数の順に読み込み、後のものが優先される。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 通貨表示に使うロケール。
    pub locale: String,
    /// 新しいセッションの時間単価欄に入れておくテキスト。
    pub hourly_rate: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".to_string(),
            hourly_rate: String::new(),
        }
    }
}

impl Config {
    /// 設定を読み込む。
    ///
    /// パスが明示されていない場合は`PARKING_CALCULATOR_CONFIG`、
    /// それもなければユーザーの設定ディレクトリにある`config.json`を使う。
    /// 明示したファイルが存在しない場合はエラーを返すが、既定の場所にない場合はデフォルト値を使う。
    ///
    /// # Arguments
    ///
    /// * `path` - コマンドライン引数で指定された設定ファイルのパス
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_overrides(env::var(LOCALE_ENV).ok(), env::var(RATE_ENV).ok());

        Ok(config)
    }

    /// JSONの設定ファイルを読み込む。
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("Configuration file not found: {}", path.display());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        info!("Configuration loaded from {}", path.display());

        Ok(config)
    }

    /// 指定された値で設定を上書きする。`None`の項目は変更しない。
    pub fn apply_overrides(&mut self, locale: Option<String>, hourly_rate: Option<String>) {
        if let Some(locale) = locale {
            self.locale = locale;
        }
        if let Some(hourly_rate) = hourly_rate {
            self.hourly_rate = hourly_rate;
        }
    }

    /// 設定されたロケールの通貨表示形式を返す。
    pub fn currency_format(&self) -> Result<CurrencyFormat> {
        CurrencyFormat::for_locale(&self.locale).context("Failed to resolve currency format")
    }
}

/// 既定の設定ファイルのパスを返す。
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("parking-calculator").join("config.json"))
}
