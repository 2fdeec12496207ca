use felix_core::{error::CommandError, model::message::IncomingMessage};

pub fn ping(_tokens: &[String], _message: &IncomingMessage) -> Result<Vec<String>, CommandError> {
    Ok(vec!["pong".to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    use felix_core::model::message::Platform;

    #[test]
    fn ping_replies_pong() {
        let message = IncomingMessage::new(Platform::Irc, "alice", "alice", "!ping");
        let lines = ping(&["ping".to_string()], &message).expect("infallible");
        assert_eq!(lines, vec!["pong"]);
    }
}
