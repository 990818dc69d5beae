//! Deterministic marker colours.

/// Used for ids without a hex digest suffix.
const FALLBACK: &str = "#888888";

/// Colour of an issue marker, derived from the digest suffix of the issue id
/// so that repeated runs render identically. Saturation and value stay in a
/// readable band.
pub fn issue_color(id: &str) -> String {
    let Some(digest) = id
        .rsplit_once('-')
        .and_then(|(_, suffix)| u64::from_str_radix(suffix, 16).ok())
    else {
        return FALLBACK.to_string();
    };
    let hue = (digest % 360) as f64 / 360.0;
    let saturation = 0.5 + ((digest >> 16) % 40) as f64 / 100.0;
    let value = 0.7 + ((digest >> 32) % 25) as f64 / 100.0;
    let (r, g, b) = hsv_to_rgb(hue, saturation, value);
    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0) as u8,
        (g * 255.0) as u8,
        (b * 255.0) as u8
    )
}

/// `h`, `s`, `v` in `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0) as u32;
    let f = (h * 6.0) - f64::from(sector);
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_are_stable() {
        insta::assert_snapshot!(issue_color("invalid-date-0123456789ab"), @"#3bdbc3");
        insta::assert_snapshot!(issue_color("duplicate-identifier-a1b2c3d4e5f6"), @"#1fe233");
    }

    #[test]
    fn colour_follows_the_digest_not_the_rule() {
        assert_eq!(
            issue_color("invalid-date-a1b2c3d4e5f6"),
            issue_color("duplicate-identifier-a1b2c3d4e5f6")
        );
        assert_ne!(
            issue_color("invalid-date-0123456789ab"),
            issue_color("invalid-date-0123456789ac")
        );
    }

    #[test]
    fn id_without_digest_gets_fallback() {
        assert_eq!(issue_color("custom"), FALLBACK);
        assert_eq!(issue_color("custom-zz"), FALLBACK);
    }

    #[test]
    fn colours_are_hex() {
        let color = issue_color("missing-column-000000000000");
        assert_eq!(color.len(), 7);
        assert!(color.starts_with('#'));
        assert!(color[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
