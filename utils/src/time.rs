//! Time formatting helpers.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a stage length such as `600` as `10m`, keeping at most the two
/// largest non-zero units (`1d 2h`, `1h 30m`).
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let mut rest = secs;
    let mut parts = Vec::with_capacity(2);
    for (size, unit) in UNITS {
        let n = rest / size;
        rest %= size;
        if n > 0 {
            parts.push(format!("{n}{unit}"));
        } else if !parts.is_empty() {
            // a gap ends the run so `1d 0h 5m` reads as `1d`
            break;
        }
        if parts.len() == 2 {
            break;
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_stage_lengths() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(600), "10m");
        assert_eq!(format_duration(1_230), "20m 30s");
        assert_eq!(format_duration(7_260), "2h 1m");
        assert_eq!(format_duration(604_800), "7d");
    }

    #[test]
    fn drops_units_after_a_gap() {
        assert_eq!(format_duration(86_400 + 300), "1d");
        assert_eq!(format_duration(90_000), "1d 1h");
    }
}
