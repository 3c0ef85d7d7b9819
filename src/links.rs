use crate::models::{ReminderSettings, TestLinksResponse};
use chrono::NaiveDate;

/// Reminder deep link for one schedule entry. Opens the messaging web
/// endpoint with a pre-filled text; nothing is sent from here.
pub fn schedule_reminder_link(medication_name: &str, date: NaiveDate, time: &str) -> String {
    let message = format!(
        "Medication reminder: {} - {} at {}",
        medication_name,
        date.format("%d/%m/%Y"),
        time
    );
    format!("https://wa.me/?text={}", urlencoding::encode(&message))
}

/// Keeps digits only and prefixes the country code when absent.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with("55") {
        digits
    } else {
        format!("55{digits}")
    }
}

/// The "send a test message" pair: one link targeting the configured
/// number, one numberless variant that lets the user pick a contact.
pub fn test_message_links(settings: &ReminderSettings) -> TestLinksResponse {
    let message = format!("{} (test message)", settings.custom_message);
    let encoded = urlencoding::encode(&message).into_owned();
    TestLinksResponse {
        direct_url: format!("https://wa.me/?text={encoded}"),
        phone_url: format!(
            "https://api.whatsapp.com/send?phone={}&text={}",
            normalize_phone(&settings.phone_number),
            encoded
        ),
    }
}
