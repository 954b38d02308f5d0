use super::responses::message_response::MessageResponse;

/// Events pushed by the relay after the durability point and drained by the
/// socket broadcaster task. Pushing only after a successful persist is what
/// enforces the broadcast-after-persist ordering.
#[derive(Debug, Clone)]
pub enum AppEvent {
    MessageCreated(MessageResponse),
}
