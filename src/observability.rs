use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemini_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("gemini_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemini_chat.client.request_duration_seconds");

pub(crate) static CLIENT_UPLOADS: Counter = Counter::new("gemini_chat.client.uploads");
pub(crate) static CLIENT_UPLOAD_ERRORS: Counter = Counter::new("gemini_chat.client.upload_errors");
pub(crate) static CLIENT_UPLOAD_BYTES: Counter = Counter::new("gemini_chat.client.upload_bytes");

pub(crate) static CHAT_TURNS: Counter = Counter::new("gemini_chat.chat.turns");
pub(crate) static CHAT_TURN_ERRORS: Counter = Counter::new("gemini_chat.chat.turn_errors");
pub(crate) static CHAT_ATTACHMENTS_CONSUMED: Counter =
    Counter::new("gemini_chat.chat.attachments_consumed");
pub(crate) static CHAT_ATTACHMENTS_REPLACED: Counter =
    Counter::new("gemini_chat.chat.attachments_replaced");
pub(crate) static CHAT_COMMANDS: Counter = Counter::new("gemini_chat.chat.commands");
pub(crate) static CHAT_EXPORTS: Counter = Counter::new("gemini_chat.chat.exports");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CLIENT_UPLOADS);
    collector.register_counter(&CLIENT_UPLOAD_ERRORS);
    collector.register_counter(&CLIENT_UPLOAD_BYTES);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_ERRORS);
    collector.register_counter(&CHAT_ATTACHMENTS_CONSUMED);
    collector.register_counter(&CHAT_ATTACHMENTS_REPLACED);
    collector.register_counter(&CHAT_COMMANDS);
    collector.register_counter(&CHAT_EXPORTS);
}
