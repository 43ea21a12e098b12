//! Text helpers shared by the components: escaping, the message content
//! transform, avatar initials and relative timestamps.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

/// `**text**`, shortest match.
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("emphasis pattern is valid"));

/// Escape text for use in HTML content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render message text as HTML.
///
/// Newlines become `<br/>` and `**x**` becomes `<strong>x</strong>`. Every
/// other character is shown as typed.
#[must_use]
pub fn render_content(text: &str) -> String {
    let escaped = escape_html(text).replace('\n', "<br/>");
    EMPHASIS
        .replace_all(&escaped, "<strong>$1</strong>")
        .into_owned()
}

/// Uppercased first letter of each space-separated word.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase()
}

const MINUTES_IN_DAY: i64 = 1440;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;
const MINUTES_IN_YEAR: i64 = 525_600;

/// Human distance between `then` and `now` with an "ago" suffix,
/// e.g. "less than a minute ago", "about 2 hours ago".
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = (seconds + 30) / 60;

    let distance = match minutes {
        0 => "less than a minute".to_string(),
        m if m < 45 => plural(m, "minute"),
        m if m < 90 => "about 1 hour".to_string(),
        m if m < MINUTES_IN_DAY => format!("about {}", plural(round_div(m, 60), "hour")),
        m if m < 2520 => "1 day".to_string(),
        m if m < MINUTES_IN_MONTH => plural(round_div(m, MINUTES_IN_DAY), "day"),
        m if m < MINUTES_IN_TWO_MONTHS => {
            format!("about {}", plural(round_div(m, MINUTES_IN_MONTH), "month"))
        }
        m if m < MINUTES_IN_YEAR => plural(round_div(m, MINUTES_IN_MONTH), "month"),
        m => format!("about {}", plural(round_div(m, MINUTES_IN_YEAR), "year")),
    };

    format!("{distance} ago")
}

fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}
