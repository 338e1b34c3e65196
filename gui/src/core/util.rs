use crate::core::fprintd;

/// Format finger name for display (replace dashes, capitalize).
pub fn display_finger_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let mut s = name.replace('-', " ");
    let mut chars = s.chars();
    if let Some(first) = chars.next() {
        let upper = first.to_ascii_uppercase().to_string();
        s.replace_range(0..first.len_utf8(), &upper);
    }
    s
}

/// Pick the finger to enroll next: index fingers first, then the rest in fprintd order.
pub fn next_finger_to_enroll(enrolled: &[String]) -> Option<&'static str> {
    const PREFERRED: &[&str] = &["right-index-finger", "left-index-finger"];

    PREFERRED
        .iter()
        .chain(fprintd::FINGERS.iter())
        .copied()
        .find(|finger| !enrolled.iter().any(|e| e == finger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_finger_names() {
        assert_eq!(display_finger_name("left-thumb"), "Left thumb");
        assert_eq!(
            display_finger_name("right-index-finger"),
            "Right index finger"
        );
        assert_eq!(display_finger_name(""), "");
    }

    #[test]
    fn prefers_right_index_finger() {
        assert_eq!(next_finger_to_enroll(&[]), Some("right-index-finger"));
    }

    #[test]
    fn skips_enrolled_fingers() {
        let enrolled = vec![
            "right-index-finger".to_string(),
            "left-index-finger".to_string(),
        ];
        assert_eq!(next_finger_to_enroll(&enrolled), Some("left-thumb"));
    }

    #[test]
    fn none_left_when_all_enrolled() {
        let enrolled: Vec<String> = fprintd::FINGERS.iter().map(|f| f.to_string()).collect();
        assert_eq!(next_finger_to_enroll(&enrolled), None);
    }
}
