//! Per-channel rendering of notification content.

use serde_json::Value;

use crate::domain::notification::NotificationType;
use crate::port::outbound::channel::RenderedNotification;

/// Profit percentage above which WhatsApp uses the high-profit template.
pub const HIGH_PROFIT_PERCENT: f64 = 5.0;

/// Escape text for Telegram MarkdownV2.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
        '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Bold title, blank line, body.
pub fn telegram_text(content: &RenderedNotification) -> String {
    format!(
        "*{}*\n\n{}",
        escape_markdown(&content.title),
        escape_markdown(&content.message)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn email_html(content: &RenderedNotification) -> String {
    let body = escape_html(&content.message).replace('\n', "<br>\n");
    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"font-family: Arial, sans-serif; color: #222;\">\n\
         <h2>{}</h2>\n<div>{}</div>\n\
         <p style=\"color: #888; font-size: 12px;\">You receive this because email alerts are enabled in your notification settings.</p>\n\
         </body>\n</html>\n",
        escape_html(&content.title),
        body
    )
}

/// Strip a leading `+` and require 10 to 15 digits.
pub fn normalize_phone_number(raw: &str) -> Option<String> {
    let digits = raw.trim().trim_start_matches('+');
    let valid = (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
    valid.then(|| digits.to_string())
}

/// WhatsApp message template name and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WhatsappTemplate {
    pub name: &'static str,
    pub parameters: Vec<String>,
}

fn text_field(value: &Value, pointer: &str) -> String {
    match value.pointer(pointer) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "N/A".into(),
        Some(other) => other.to_string(),
    }
}

fn money_field(value: &Value, pointer: &str) -> String {
    format!("{:.2}", value.pointer(pointer).and_then(Value::as_f64).unwrap_or(0.0))
}

/// Pick the approved template for `content`.
pub fn whatsapp_template(content: &RenderedNotification) -> WhatsappTemplate {
    let payload = &content.payload;
    let is_opportunity = content.kind == NotificationType::ArbitrageOpportunity
        && payload.get("opportunity").is_some();

    if !is_opportunity {
        return WhatsappTemplate {
            name: "account_notification",
            parameters: vec![content.title.clone(), content.message.clone()],
        };
    }

    let profit_percent = payload
        .get("profit_percent")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    if profit_percent > HIGH_PROFIT_PERCENT {
        WhatsappTemplate {
            name: "high_profit_alert",
            parameters: vec![
                text_field(payload, "/opportunity/token_symbol"),
                format!("{profit_percent:.2}"),
                text_field(payload, "/opportunity/buy_exchange"),
                text_field(payload, "/opportunity/sell_exchange"),
                money_field(payload, "/profit_on_10000"),
            ],
        }
    } else {
        WhatsappTemplate {
            name: "arbitrage_alert",
            parameters: vec![
                text_field(payload, "/opportunity/token_symbol"),
                text_field(payload, "/opportunity/buy_exchange"),
                text_field(payload, "/opportunity/sell_exchange"),
                format!("{profit_percent:.2}"),
                format!("${}", money_field(payload, "/raw_price_difference")),
                money_field(payload, "/profit_on_500"),
                money_field(payload, "/profit_on_1000"),
                money_field(payload, "/profit_on_5000"),
                money_field(payload, "/profit_on_10000"),
                money_field(payload, "/min_investment_required"),
            ],
        }
    }
}
