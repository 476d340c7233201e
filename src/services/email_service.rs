use serde::Serialize;

// HTTP mail gateway (Resend-style JSON API)
const MAIL_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

fn mail_api_url() -> String {
    std::env::var("MAIL_API_URL").unwrap_or_else(|_| "https://api.resend.com/emails".to_string())
}

fn mail_api_key() -> Result<String, String> {
    std::env::var("MAIL_API_KEY").map_err(|_| "MAIL_API_KEY not configured".to_string())
}

fn mail_sender() -> String {
    std::env::var("MAIL_SENDER")
        .unwrap_or_else(|_| "Feedback Service <no-reply@feedback-service.dev>".to_string())
}

/// Delivers one HTML email through the mail gateway.
pub async fn send_email(to: &str, subject: &str, html: &str) -> Result<(), String> {
    let api_key = mail_api_key()?;
    let from = mail_sender();

    let client = reqwest::Client::new();
    let response = client
        .post(mail_api_url())
        .bearer_auth(api_key)
        .timeout(std::time::Duration::from_secs(MAIL_TIMEOUT_SECS))
        .json(&MailRequest {
            from: &from,
            to,
            subject,
            html,
        })
        .send()
        .await
        .map_err(|e| format!("Failed to reach mail gateway: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Mail gateway error: {}", response.status()));
    }

    log::info!("📧 Mail sent to {}: {}", to, subject);

    Ok(())
}

pub fn verification_email_body(user_name: &str, otp: &str) -> String {
    format!(
        r#"<html lang="en">
  <head>
    <title>Hii {user_name}</title>
  </head>
  <body>
    <div style="font-weight: 500; font-size: small">
      Thank you <strong>{user_name}</strong> for joining us and for your
      patience. We will send you a note when we have something new to share.
      <div>
        Your verification code to signup:
        <h1 style="display: inline">{otp}</h1>
      </div>
    </div>
  </body>
</html>"#
    )
}

pub async fn send_verification_email(to: &str, user_name: &str, otp: &str) -> Result<(), String> {
    send_email(to, "Verify your mail", &verification_email_body(user_name, otp)).await
}

pub fn new_message_email_body(user_name: &str) -> String {
    let company = std::env::var("MAIL_COMPANY").unwrap_or_else(|_| "Feedback Service".to_string());
    format!(
        r#"<html lang="en">
  <head>
    <title>Hii {user_name}</title>
  </head>
  <body>
    <div style="font-weight: 500; font-size: small">
      Don't miss out! A new message is waiting for you in
      <strong>{company}</strong>. Login and read your feedback.
    </div>
  </body>
</html>"#
    )
}

pub async fn send_new_message_email(to: &str, user_name: &str) -> Result<(), String> {
    send_email(to, "You have a message waiting", &new_message_email_body(user_name)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_body_carries_the_code() {
        let body = verification_email_body("Some_User9", "123456");
        assert!(body.contains("123456"));
        assert!(body.contains("Some_User9"));
        assert!(body.contains("verification code"));
    }

    #[test]
    fn test_notification_body_addresses_the_recipient() {
        let body = new_message_email_body("Some_User9");
        assert!(body.contains("Some_User9"));
        assert!(body.contains("message is waiting"));
    }
}
