use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Matches a leading `[MM:SS.ff]` or `[MM:SS.fff]` tag and captures the rest of the line
static CUE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d{2}):(\d{2})\.(\d{2,3})\](.*)$").expect("valid cue regex"));

/// One timed lyric line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LyricCue {
    /// Seconds from the start of the track
    pub time: f64,
    pub text: String,
}

/// Parse LRC text into cues sorted by time.
///
/// Lines without a tag, and tagged lines with no text, are skipped. The
/// fractional field is read as hundredths or thousandths of a second
/// depending on how many digits it has.
pub fn parse_lyric_cues(text: &str) -> Vec<LyricCue> {
    let mut cues: Vec<LyricCue> = text.lines().filter_map(parse_line).collect();
    cues.sort_by(|a, b| a.time.total_cmp(&b.time));
    cues
}

fn parse_line(line: &str) -> Option<LyricCue> {
    let caps = CUE_TAG.captures(line.trim_start())?;

    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    let fraction_digits = &caps[3];
    let fraction: f64 = fraction_digits.parse().ok()?;
    let scale = if fraction_digits.len() == 3 { 1000.0 } else { 100.0 };

    let text = caps[4].trim();
    if text.is_empty() {
        return None;
    }

    Some(LyricCue {
        time: minutes * 60.0 + seconds + fraction / scale,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_out_of_order_lines_are_sorted() {
        let cues = parse_lyric_cues("[00:12.50]Hello\n[00:05.00]World");
        assert_eq!(
            cues,
            vec![
                LyricCue { time: 5.0, text: "World".to_string() },
                LyricCue { time: 12.5, text: "Hello".to_string() },
            ]
        );
    }

    #[test]
    fn test_fraction_scale_follows_digit_count() {
        let cues = parse_lyric_cues("[01:02.50]two digits\n[01:03.050]three digits");
        assert_relative_eq!(cues[0].time, 62.5);
        assert_relative_eq!(cues[1].time, 63.05);
    }

    #[test]
    fn test_blank_text_is_skipped() {
        assert!(parse_lyric_cues("[00:10.000]   ").is_empty());
        assert!(parse_lyric_cues("[00:10.00]").is_empty());
    }

    #[test]
    fn test_untagged_and_malformed_lines_are_skipped() {
        let lrc = "[ti:Some Title]\n\
                   [ar:Some Artist]\n\
                   plain line\n\
                   [0:01.00]short minutes\n\
                   [00:01.5]one digit fraction\n\
                   [00:02.00]kept\n\
                   \n\
                   [00:01.00]  padded text  \r";
        let cues = parse_lyric_cues(lrc);

        let texts: Vec<&str> = cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["padded text", "kept"]);
    }

    #[test]
    fn test_equal_times_keep_file_order() {
        let cues = parse_lyric_cues("[00:03.00]first\n[00:03.00]second");
        assert_eq!(cues[0].text, "first");
        assert_eq!(cues[1].text, "second");
    }
}
