use reqwest::Client;
use serde::Serialize;

#[derive(Clone)]
pub struct SmsClient {
    client: Client,
    gateway_url: String,
    api_key: String,
    sender: String,
}

#[derive(Debug, Serialize)]
struct SendSmsRequest {
    from: String,
    to: String,
    body: String,
}

impl SmsClient {
    pub fn new(gateway_url: &str, api_key: &str, sender: &str) -> Self {
        Self {
            client: Client::new(),
            gateway_url: gateway_url.to_string(),
            api_key: api_key.to_string(),
            sender: sender.to_string(),
        }
    }

    pub async fn send(&self, to: &str, body: &str) -> Result<(), String> {
        let request = SendSmsRequest {
            from: self.sender.clone(),
            to: to.to_string(),
            body: body.to_string(),
        };

        let response = self.client
            .post(format!("{}/messages", self.gateway_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("sms send failed: {e}"))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("sms gateway error: {body}"));
        }

        tracing::debug!(to = %to, "sms sent");
        Ok(())
    }

    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), String> {
        let body = format!("Your Noble verification code is {code}. It expires in 5 minutes.");
        self.send(to, &body).await
    }
}
