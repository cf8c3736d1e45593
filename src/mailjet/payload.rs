use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    #[serde(rename = "Messages")]
    pub messages: Vec<OutgoingMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OutgoingMessage<'a> {
    #[serde(rename = "From")]
    pub from: Address<'a>,
    #[serde(rename = "To")]
    pub to: Vec<Address<'a>>,
    #[serde(rename = "Subject")]
    pub subject: &'a str,
    #[serde(rename = "TextPart")]
    pub text_part: &'a str,
}

#[derive(Debug, Serialize)]
pub struct Address<'a> {
    #[serde(rename = "Email")]
    pub email: &'a str,
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

pub fn build_request<'a>(
    sender: &'a str,
    sender_name: &'a str,
    receiver: &'a str,
    subject: &'a str,
    text: &'a str,
) -> SendRequest<'a> {
    SendRequest {
        messages: vec![OutgoingMessage {
            from: Address {
                email: sender,
                name: Some(sender_name),
            },
            to: vec![Address {
                email: receiver,
                name: None,
            }],
            subject,
            text_part: text,
        }],
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SendResponse {
    #[serde(rename = "Messages", default)]
    pub messages: Vec<MessageResult>,
}

#[derive(Debug, Deserialize)]
pub struct MessageResult {
    #[serde(rename = "Status")]
    pub status: String,
}

impl SendResponse {
    /// First non-`success` status reported by the provider, if any.
    pub fn first_failure(&self) -> Option<&str> {
        self.messages
            .iter()
            .map(|msg| msg.status.as_str())
            .find(|status| !status.eq_ignore_ascii_case("success"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_matches_mailjet_v31_shape() {
        let request = build_request("from@example.com", "Visa Monitor", "to@example.com", "Hi", "Body");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Messages": [{
                    "From": {"Email": "from@example.com", "Name": "Visa Monitor"},
                    "To": [{"Email": "to@example.com"}],
                    "Subject": "Hi",
                    "TextPart": "Body"
                }]
            })
        );
    }

    #[test]
    fn response_reports_failed_message_status() {
        let ok: SendResponse =
            serde_json::from_str(r#"{"Messages":[{"Status":"success","To":[]}]}"#).unwrap();
        assert_eq!(ok.first_failure(), None);

        let failed: SendResponse =
            serde_json::from_str(r#"{"Messages":[{"Status":"error","Errors":[]}]}"#).unwrap();
        assert_eq!(failed.first_failure(), Some("error"));
    }
}
