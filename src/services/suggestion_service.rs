use futures::{Stream, StreamExt};
use serde_json::json;

const SUGGESTION_MODEL: &str = "command-r-plus-08-2024";
const AI_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const SUGGESTION_PROMPT: &str = "Generate three positive feedback messages for a user, ensuring that each message is encouraging and uplifting. The messages should not contain any abusive, demotivating, self-down, or negative words. Each message should include positive language and may include motivational sentiments. Separate each message with a pipe (|). Example Output: \"Your contributions are truly valuable and make a difference! | Keep up the great work; your efforts are inspiring! | You have a wonderful ability to uplift those around you; continue shining bright!\"";

fn ai_api_url() -> String {
    std::env::var("COHERE_API_URL").unwrap_or_else(|_| "https://api.cohere.com/v2/chat".to_string())
}

fn ai_api_key() -> Result<String, String> {
    std::env::var("COHERE_API_KEY").map_err(|_| "COHERE_API_KEY not configured".to_string())
}

/// Pulls the text out of every complete `content-delta` event in `buffer`.
/// SSE frames can split anywhere across network chunks, so the trailing
/// partial line is handed back for the next read.
pub fn drain_deltas(buffer: &str) -> (Vec<String>, String) {
    let mut parts: Vec<&str> = buffer.split('\n').collect();
    let rest = parts.pop().unwrap_or("").to_string();

    let mut deltas = Vec::new();
    for line in parts {
        let line = line.trim();
        let data = match line.strip_prefix("data:") {
            Some(data) => data.trim(),
            None => continue,
        };
        if let Ok(event) = serde_json::from_str::<serde_json::Value>(data) {
            if event["type"] == "content-delta" {
                if let Some(text) = event["delta"]["message"]["content"]["text"].as_str() {
                    deltas.push(text.to_string());
                }
            }
        }
    }

    (deltas, rest)
}

/// Opens a streamed chat completion and yields text fragments as they
/// arrive. Dropping the returned stream closes the upstream connection, so a
/// client disconnect cancels the completion promptly.
pub async fn stream_suggestions() -> Result<impl Stream<Item = Result<String, String>>, String> {
    let api_key = ai_api_key()?;

    let client = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(AI_CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("Failed to build AI client: {}", e))?;

    let response = client
        .post(ai_api_url())
        .bearer_auth(api_key)
        .json(&json!({
            "model": SUGGESTION_MODEL,
            "stream": true,
            "messages": [
                { "role": "user", "content": SUGGESTION_PROMPT }
            ],
        }))
        .send()
        .await
        .map_err(|e| format!("Failed to reach AI API: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("AI API error: {}", response.status()));
    }

    let stream = response
        .bytes_stream()
        .scan(String::new(), |buffer, chunk| {
            let item = match chunk {
                Ok(bytes) => {
                    buffer.push_str(&String::from_utf8_lossy(&bytes));
                    let (deltas, rest) = drain_deltas(buffer);
                    *buffer = rest;
                    Ok(deltas.concat())
                }
                Err(e) => Err(format!("error while reading ai stream: {}", e)),
            };
            futures::future::ready(Some(item))
        })
        .filter(|item| {
            let keep = !matches!(item, Ok(text) if text.is_empty());
            futures::future::ready(keep)
        });

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_extracts_delta_text() {
        let buffer = "event: content-delta\ndata: {\"type\":\"content-delta\",\"delta\":{\"message\":{\"content\":{\"text\":\"Keep going!\"}}}}\n";
        let (deltas, rest) = drain_deltas(buffer);
        assert_eq!(deltas, vec!["Keep going!".to_string()]);
        assert_eq!(rest, "");
    }

    #[test]
    fn test_drain_ignores_other_event_types() {
        let buffer = "data: {\"type\":\"message-start\"}\ndata: {\"type\":\"content-delta\",\"delta\":{\"message\":{\"content\":{\"text\":\"A\"}}}}\ndata: {\"type\":\"message-end\"}\n";
        let (deltas, _) = drain_deltas(buffer);
        assert_eq!(deltas, vec!["A".to_string()]);
    }

    #[test]
    fn test_partial_line_is_carried_over() {
        let chunk1 = "data: {\"type\":\"content-delta\",\"delta\":{\"message\":{\"content\"";
        let (deltas, rest) = drain_deltas(chunk1);
        assert!(deltas.is_empty());
        assert_eq!(rest, chunk1);

        let full = format!("{}:{{\"text\":\"split\"}}}}}}}}\n", rest);
        let (deltas, rest) = drain_deltas(&full);
        assert_eq!(deltas, vec!["split".to_string()]);
        assert_eq!(rest, "");
    }

    #[test]
    fn test_garbage_data_lines_are_skipped() {
        let (deltas, rest) = drain_deltas("data: not json\n\n");
        assert!(deltas.is_empty());
        assert_eq!(rest, "");
    }

    #[test]
    fn test_prompt_asks_for_pipe_separated_output() {
        assert!(SUGGESTION_PROMPT.contains("Separate each message with a pipe (|)"));
    }
}
