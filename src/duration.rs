/// 駐車時間(分)を表示用の文字列に変換する。
///
/// 59分以下(0分や負の値を含む)は分のまま表示し、それ以上は時と分に分けて表示する。
/// 「hora」は1時間のときだけ単数形にする。
///
/// # Examples
///
/// ```
/// use parking_calculator::format_duration;
///
/// assert_eq!(format_duration(125), "2 horas e 5 minutos");
/// ```
pub fn format_duration(minutes: i64) -> String {
    if minutes <= 59 {
        return format!("{} minutos", minutes);
    }

    let hours = minutes / 60;
    let remaining_minutes = minutes % 60;
    let plural = if hours == 1 { "" } else { "s" };

    if remaining_minutes == 0 {
        format!("{} hora{}", hours, plural)
    } else {
        format!("{} hora{} e {} minutos", hours, plural, remaining_minutes)
    }
}
