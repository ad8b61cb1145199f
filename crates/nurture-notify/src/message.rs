//! Subject/body splitting for generated messages.

/// Split an AI-generated, email-like message into (subject, body).
///
/// A leading `Subject:` line (case-insensitive) becomes the subject and
/// the remainder the body; otherwise the subject is empty and the whole
/// text is the body. Line endings are normalized first.
pub fn split_subject_body(message: &str) -> (String, String) {
    if message.is_empty() {
        return (String::new(), String::new());
    }

    let normalized = message.trim().replace("\r\n", "\n");

    if normalized.to_lowercase().starts_with("subject:") {
        let mut parts = normalized.splitn(2, '\n');
        let subject_line = parts.next().unwrap_or("");
        let subject = subject_line["Subject:".len()..].trim().to_string();
        let body = parts
            .next()
            .map(|rest| rest.trim_start_matches('\n').to_string())
            .unwrap_or_default();
        return (subject, body);
    }

    (String::new(), normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_prefix_is_split() {
        let (subject, body) = split_subject_body("Subject: Special Offer\nHello there");
        assert_eq!(subject, "Special Offer");
        assert_eq!(body, "Hello there");
    }

    #[test]
    fn test_no_prefix_yields_full_body() {
        let (subject, body) = split_subject_body("Just a message");
        assert_eq!(subject, "");
        assert_eq!(body, "Just a message");
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(split_subject_body(""), (String::new(), String::new()));
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let (subject, body) = split_subject_body("SUBJECT: Launch\nBody text");
        assert_eq!(subject, "Launch");
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_crlf_normalized() {
        let (subject, body) = split_subject_body("Subject: Hi\r\nLine one\r\nLine two");
        assert_eq!(subject, "Hi");
        assert_eq!(body, "Line one\nLine two");
    }

    #[test]
    fn test_subject_only_no_body() {
        let (subject, body) = split_subject_body("Subject: Alone");
        assert_eq!(subject, "Alone");
        assert_eq!(body, "");
    }

    #[test]
    fn test_blank_line_after_subject_is_stripped() {
        let (subject, body) = split_subject_body("Subject: Hi\n\nBody starts here");
        assert_eq!(subject, "Hi");
        assert_eq!(body, "Body starts here");
    }
}
