// https://api.textlocal.in/docs/sendsms

use std::collections::HashMap;

pub mod models;
use reqwest::Client;

use crate::models::SendSmsResponse;

const SEND_URL: &str = "https://api.textlocal.in/send/";

#[derive(Debug, Clone)]
pub struct TextlocalOptions {
    pub api_key: String,
    pub sender: String,
}

#[derive(Debug, Clone)]
pub struct TextlocalService {
    options: TextlocalOptions,
}

impl TextlocalService {
    pub fn new(options: TextlocalOptions) -> Self {
        Self { options }
    }

    /// Send a text message. `numbers` is the recipient in E.164 form
    /// without the leading plus (e.g. "919812345678").
    pub async fn send_sms(
        &self,
        numbers: &str,
        message: &str,
    ) -> Result<SendSmsResponse, &'static str> {
        let mut form_body: HashMap<&str, String> = HashMap::new();
        form_body.insert("apikey", self.options.api_key.clone());
        form_body.insert("sender", self.options.sender.clone());
        form_body.insert("numbers", numbers.to_string());
        form_body.insert("message", message.to_string());

        let client = Client::new();
        let res = client.post(SEND_URL).form(&form_body).send().await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    // Log the error response from Textlocal
                    let error_body = response.text().await.unwrap_or_default();
                    eprintln!("Textlocal error ({}): {}", status, error_body);
                    return Err("Textlocal returned an error");
                }

                let result = response.json::<SendSmsResponse>().await;
                match result {
                    Ok(data) => {
                        // Textlocal reports API-level failures with a 200 status
                        if data.status == "success" {
                            Ok(data)
                        } else {
                            eprintln!("Textlocal rejected the message: {:?}", data.errors);
                            Err("Textlocal rejected the message")
                        }
                    }
                    Err(e) => {
                        eprintln!("Failed to parse Textlocal response: {}", e);
                        Err("Error parsing send response")
                    }
                }
            }
            Err(e) => {
                eprintln!("Request to Textlocal failed: {}", e);
                Err("Error sending SMS")
            }
        }
    }
}
