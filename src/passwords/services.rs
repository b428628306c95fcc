//! Link and message construction for the reset flow. Pure functions so they
//! unit-test without a database or transport.

pub const RESET_SUBJECT: &str = "Password Reset Request";

/// The emailed link targets our own redirect endpoint so the token never
/// depends on the landing page's URL shape.
pub fn reset_link(public_base_url: &str, token: &str) -> String {
    format!(
        "{}/api/passwords/reset?token={}",
        public_base_url.trim_end_matches('/'),
        token
    )
}

/// Where the redirect endpoint sends the browser: the configured landing
/// page with the token appended.
pub fn landing_url(reset_page_url: &str, token: &str) -> String {
    let sep = if reset_page_url.contains('?') { '&' } else { '?' };
    format!("{reset_page_url}{sep}token={token}")
}

pub fn reset_email_body(link: &str) -> String {
    format!(
        "Click the link to reset the password\n\
         for your cafe dashboard account:\n\
         {link}\n\n\
         If you did not request this, you can ignore this email."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_link_shape() {
        let link = reset_link("http://localhost:8080", "abc.def.ghi");
        assert_eq!(
            link,
            "http://localhost:8080/api/passwords/reset?token=abc.def.ghi"
        );
    }

    #[test]
    fn reset_link_tolerates_trailing_slash() {
        let link = reset_link("http://localhost:8080/", "tok");
        assert_eq!(link, "http://localhost:8080/api/passwords/reset?token=tok");
    }

    #[test]
    fn landing_url_appends_token() {
        assert_eq!(
            landing_url("http://app.test/reset", "tok"),
            "http://app.test/reset?token=tok"
        );
        assert_eq!(
            landing_url("http://app.test/reset?lang=en", "tok"),
            "http://app.test/reset?lang=en&token=tok"
        );
    }

    #[test]
    fn email_body_contains_link() {
        let body = reset_email_body("http://x.test/reset?token=tok");
        assert!(body.contains("http://x.test/reset?token=tok"));
        assert!(body.contains("reset the password"));
    }
}
